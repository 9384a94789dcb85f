// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The eleven districts of the province, in the order used by the dashboard map.
pub const REGIONS: [&str; 11] = [
    "단양", "제천", "충주", "음성", "진천", "괴산", "증평", "청주", "보은", "옥천", "영동",
];

/// Number of points in a support series.
pub const SERIES_MONTHS: usize = 12;

/// A registered candidate, as found in the polling roster.
#[derive(PartialEq, Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub party: String,
    /// Poll support, in percent.
    pub poll_support: f64,
}

/// Precomputed network centrality for one candidate.
///
/// These values come from an external network analysis. They are consumed as
/// opaque numbers and never recomputed here.
#[derive(PartialEq, Debug, Clone)]
pub struct CentralityRecord {
    pub name: String,
    pub page_rank: f64,
    pub betweenness: f64,
    pub composite_score: f64,
}

/// A piece of evidence tying two candidates to a news excerpt.
///
/// The pair is unordered: (A, B) and (B, A) describe the same relationship.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RelationshipRecord {
    pub person1: String,
    pub person2: String,
    pub relation_type: String,
    pub sentiment: String,
    pub evidence: String,
    pub source_article: String,
    pub date: String,
    pub keyword: String,
}

impl RelationshipRecord {
    pub fn involves(&self, name: &str) -> bool {
        self.person1 == name || self.person2 == name
    }

    /// The other member of the pair, if `name` is part of it.
    pub fn counterpart(&self, name: &str) -> Option<&str> {
        if self.person1 == name {
            Some(self.person2.as_str())
        } else if self.person2 == name {
            Some(self.person1.as_str())
        } else {
            None
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct RegionalScore {
    pub region: String,
    pub candidate: String,
    pub final_score: f64,
}

/// Static stress test results for one candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct StressRecord {
    pub candidate: String,
    pub avg_risk: f64,
    pub resilience_score: f64,
    pub max_vulnerability: f64,
    pub crit_scenario: String,
}

// ******** Output data structures *********

/// The display record of a candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateStats {
    pub name: String,
    pub party: String,
    pub support: f64,
    pub influence: f64,
    pub risk: f64,
    pub win_prob: u32,
    pub resilience: f64,
    /// Human readable provenance of the numbers above, in display order.
    pub rationale: Vec<String>,
}

/// One month of the support series.
#[derive(PartialEq, Debug, Clone)]
pub struct SeriesRow {
    pub month: String,
    pub values: Vec<(String, f64)>,
}

/// Relationship records grouped by unordered pair.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RelationshipPair {
    pub person1: String,
    pub person2: String,
    pub count: u64,
    pub dominant_relation: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RegionalDominance {
    pub region: String,
    /// None when no score was recorded for this region.
    pub leader: Option<String>,
    pub scores: Vec<(String, f64)>,
}

/// Headline numbers of the dashboard.
#[derive(PartialEq, Debug, Clone)]
pub struct Overview {
    pub num_candidates: usize,
    pub num_relationships: usize,
    pub average_risk: f64,
    pub average_resilience: f64,
    pub win_prob_leader: Option<String>,
    pub influence_leader: Option<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct CrisisImpact {
    pub candidate: String,
    pub scenario: CrisisScenario,
    pub support_before: f64,
    pub support_after: f64,
    pub loss: f64,
    pub win_prob_before: u32,
    pub win_prob_after: u32,
}

/// Errors that prevent a dataset from being assembled.
#[derive(PartialEq, Debug, Clone)]
pub enum DashboardErrors {
    DuplicateCandidate(String),
    InvalidSupport { name: String, value: f64 },
    NonFiniteValue { name: String, field: &'static str },
    UnknownRegion(String),
    EmptyName,
}

impl Error for DashboardErrors {}

impl Display for DashboardErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {} appears more than once in the roster", name)
            }
            DashboardErrors::InvalidSupport { name, value } => {
                write!(f, "poll support of {} is out of range: {}", name, value)
            }
            DashboardErrors::NonFiniteValue { name, field } => {
                write!(f, "field {} of {} is not a finite number", field, name)
            }
            DashboardErrors::UnknownRegion(region) => write!(f, "unknown region {}", region),
            DashboardErrors::EmptyName => write!(f, "empty candidate name"),
        }
    }
}

// ********* Configuration **********

/// The support trajectories the simulation chart can show.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Scenario {
    Baseline,
    /// Same-party candidates consolidate behind their best-supported member.
    Unification,
    /// The named candidate is hit by a scandal halfway through the horizon.
    ScandalShock(String),
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CrisisScenario {
    Scandal,
    NetworkLoss,
    FramingAttack,
}

impl CrisisScenario {
    pub const ALL: [CrisisScenario; 3] = [
        CrisisScenario::Scandal,
        CrisisScenario::NetworkLoss,
        CrisisScenario::FramingAttack,
    ];

    /// Base support loss, in points, before risk and resilience are applied.
    pub fn base_penalty(&self) -> f64 {
        match self {
            CrisisScenario::Scandal => 8.0,
            CrisisScenario::NetworkLoss => 5.0,
            CrisisScenario::FramingAttack => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrisisScenario::Scandal => "scandal",
            CrisisScenario::NetworkLoss => "network_loss",
            CrisisScenario::FramingAttack => "framing_attack",
        }
    }
}

/// The heuristics used to derive the display numbers.
///
/// None of these weights has a statistical derivation. They reproduce the
/// numbers shown by the dashboard.
#[derive(PartialEq, Debug, Clone)]
pub struct StatsRules {
    pub support_weight: f64,
    /// Page rank is scaled first, then weighted. Both products are kept
    /// separate so the result rounds like the dashboard does.
    pub page_rank_scale: f64,
    pub page_rank_weight: f64,
    pub max_win_prob: u32,
    /// Influence given per point of support when no centrality is known.
    pub influence_per_support: f64,
    pub default_risk: f64,
    pub default_resilience: f64,
    pub high_risk_threshold: f64,
    pub low_resilience_threshold: f64,
    pub high_influence_threshold: f64,
    pub low_support_threshold: f64,
}

impl StatsRules {
    pub const DEFAULT_RULES: StatsRules = StatsRules {
        support_weight: 1.5,
        page_rank_scale: 10.0,
        page_rank_weight: 20.0,
        max_win_prob: 99,
        influence_per_support: 4.0,
        default_risk: 50.0,
        default_resilience: 50.0,
        high_risk_threshold: 40.0,
        low_resilience_threshold: 50.0,
        high_influence_threshold: 70.0,
        low_support_threshold: 10.0,
    };
}

impl Default for StatsRules {
    fn default() -> Self {
        StatsRules::DEFAULT_RULES
    }
}

/// The record returned for names that are not in the roster.
pub const DEFAULT_PARTY: &str = "기타";
pub const DEFAULT_SUPPORT: f64 = 5.0;
pub const DEFAULT_INFLUENCE: f64 = 50.0;
pub const DEFAULT_WIN_PROB: u32 = 15;
