mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

/// The static datasets of the dashboard, joined by candidate name.
///
/// A dataset is immutable once built. All the aggregates are recomputed from
/// scratch on every call: the tables hold at most a few dozen rows.
#[derive(PartialEq, Debug, Clone)]
pub struct Dataset {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) centrality: Vec<CentralityRecord>,
    pub(crate) relationships: Vec<RelationshipRecord>,
    pub(crate) regional: Vec<RegionalScore>,
    pub(crate) stress: Vec<StressRecord>,
    pub(crate) rules: StatsRules,
}

/// Rounds to the nearest integer, halfway cases towards positive infinity.
///
/// This matches `Math.round` of the dashboard, including just below one half
/// where `floor(x + 0.5)` would round up.
pub fn round_half_up(x: f64) -> f64 {
    let lower = x.floor();
    if x - lower >= 0.5 {
        lower + 1.0
    } else {
        lower
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The win probability heuristic, in percent.
///
/// This is a fixed linear blend of support and page rank, clamped to
/// `[0, max_win_prob]`. It is not a calibrated estimate.
pub fn win_probability(support: f64, page_rank: f64, rules: &StatsRules) -> u32 {
    let raw = round_half_up(
        support * rules.support_weight + page_rank * rules.page_rank_scale * rules.page_rank_weight,
    );
    raw.clamp(0.0, rules.max_win_prob as f64) as u32
}

/// The label of the month at the given (zero-based) index.
pub fn month_label(idx: usize) -> String {
    format!("{}월", idx + 1)
}

// Keeps the first occurrence of every name.
fn dedup_names(names: &[String]) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    names
        .iter()
        .map(|s| s.as_str())
        .filter(|s| seen.insert(*s))
        .collect()
}

impl Dataset {
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn relationships(&self) -> &[RelationshipRecord] {
        &self.relationships
    }

    pub fn rules(&self) -> &StatsRules {
        &self.rules
    }

    pub fn candidate_names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    pub fn candidate(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    pub fn centrality(&self, name: &str) -> Option<&CentralityRecord> {
        self.centrality.iter().find(|c| c.name == name)
    }

    pub fn stress_record(&self, name: &str) -> Option<&StressRecord> {
        self.stress.iter().find(|s| s.candidate == name)
    }

    /// The display record of a candidate.
    ///
    /// Names that are not in the roster get the fixed default record. This
    /// function never fails.
    pub fn candidate_stats(&self, name: &str) -> CandidateStats {
        let rules = &self.rules;
        let cand = match self.candidate(name) {
            Some(c) => c,
            None => {
                debug!("candidate_stats: {} not in roster, using defaults", name);
                return CandidateStats {
                    name: name.to_string(),
                    party: DEFAULT_PARTY.to_string(),
                    support: DEFAULT_SUPPORT,
                    influence: DEFAULT_INFLUENCE,
                    risk: rules.default_risk,
                    win_prob: DEFAULT_WIN_PROB,
                    resilience: rules.default_resilience,
                    rationale: vec![format!("{} is not in the roster: default record", name)],
                };
            }
        };

        let support = cand.poll_support;
        let mut rationale = vec![format!("poll support {:.1}% from the roster", support)];

        let (influence, page_rank) = match self.centrality(name) {
            Some(c) => {
                rationale.push(format!(
                    "influence from composite centrality {:.3}",
                    c.composite_score
                ));
                (round2(c.composite_score * 100.0), c.page_rank)
            }
            None => {
                rationale.push("no centrality record: influence derived from support".to_string());
                (
                    round2((support * rules.influence_per_support).clamp(0.0, 100.0)),
                    0.0,
                )
            }
        };

        let win_prob = win_probability(support, page_rank, rules);
        rationale.push(format!(
            "win probability {}% from support {:.1} and page rank {:.3}",
            win_prob, support, page_rank
        ));

        let (risk, resilience) = match self.stress_record(name) {
            Some(s) => {
                rationale.push(format!(
                    "risk {:.1} and resilience {:.1} from the stress test",
                    s.avg_risk, s.resilience_score
                ));
                (s.avg_risk, s.resilience_score)
            }
            None => {
                rationale.push("no stress test record: default risk and resilience".to_string());
                (rules.default_risk, rules.default_resilience)
            }
        };

        CandidateStats {
            name: cand.name.clone(),
            party: cand.party.clone(),
            support,
            influence,
            risk,
            win_prob,
            resilience,
            rationale,
        }
    }

    /// The 12-month support series of the given candidates.
    ///
    /// The series is a deterministic drift keyed off the length of each name:
    /// calling it twice with the same inputs returns the same rows. Duplicate
    /// names are only reported once.
    pub fn simulation_series(&self, names: &[String], scenario: &Scenario) -> Vec<SeriesRow> {
        let names = dedup_names(names);
        let stats: Vec<CandidateStats> = names.iter().map(|n| self.candidate_stats(n)).collect();

        // One column per candidate, before clamping.
        let mut columns: Vec<Vec<f64>> = stats
            .iter()
            .map(|s| {
                let len = s.name.chars().count() as f64;
                (0..SERIES_MONTHS)
                    .map(|i| {
                        let i = i as f64;
                        s.support + 0.1 * len * i + 1.5 * (i / 2.0 + len).sin()
                    })
                    .collect()
            })
            .collect();

        let shock_start = SERIES_MONTHS / 2;
        match scenario {
            Scenario::Baseline => {}
            Scenario::Unification => {
                // Names outside the roster only carry the placeholder party.
                let in_roster: Vec<usize> = (0..stats.len())
                    .filter(|idx| self.candidate(&stats[*idx].name).is_some())
                    .collect();
                let mut parties: Vec<&str> = Vec::new();
                for idx in in_roster.iter() {
                    let party = stats[*idx].party.as_str();
                    if !parties.contains(&party) {
                        parties.push(party);
                    }
                }
                for party in parties {
                    let members: Vec<usize> = in_roster
                        .iter()
                        .copied()
                        .filter(|idx| stats[*idx].party == party)
                        .collect();
                    // The first best-supported member leads.
                    let mut leader = members[0];
                    for idx in members.iter() {
                        if stats[*idx].support > stats[leader].support {
                            leader = *idx;
                        }
                    }
                    debug!("simulation_series: {} unifies behind {}", party, stats[leader].name);
                    for month in shock_start..SERIES_MONTHS {
                        let mut transferred = 0.0;
                        for idx in members.iter().filter(|idx| **idx != leader) {
                            let half = columns[*idx][month] / 2.0;
                            columns[*idx][month] = half;
                            transferred += half;
                        }
                        columns[leader][month] += transferred;
                    }
                }
            }
            Scenario::ScandalShock(target) => {
                if let Some(idx) = stats.iter().position(|s| s.name == *target) {
                    let loss = self.crisis_impact(target, CrisisScenario::Scandal).loss;
                    for month in shock_start..SERIES_MONTHS {
                        columns[idx][month] -= loss;
                    }
                }
            }
        }

        (0..SERIES_MONTHS)
            .map(|month| SeriesRow {
                month: month_label(month),
                values: stats
                    .iter()
                    .zip(columns.iter())
                    .map(|(s, col)| (s.name.clone(), round2(col[month].clamp(0.0, 100.0))))
                    .collect(),
            })
            .collect()
    }

    /// All the relationship records between members of the selection.
    ///
    /// The pair is matched regardless of order. Records are returned in
    /// dataset order.
    pub fn relationships_among(&self, names: &[String]) -> Vec<&RelationshipRecord> {
        let selected: HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
        self.relationships
            .iter()
            .filter(|r| {
                selected.contains(r.person1.as_str()) && selected.contains(r.person2.as_str())
            })
            .collect()
    }

    /// The relationship records of the selection, grouped by unordered pair.
    pub fn relationship_pairs(&self, names: &[String]) -> Vec<RelationshipPair> {
        let mut groups: HashMap<(String, String), HashMap<String, u64>> = HashMap::new();
        for r in self.relationships_among(names) {
            let key = if r.person1 <= r.person2 {
                (r.person1.clone(), r.person2.clone())
            } else {
                (r.person2.clone(), r.person1.clone())
            };
            *groups
                .entry(key)
                .or_default()
                .entry(r.relation_type.clone())
                .or_insert(0) += 1;
        }

        let mut res: Vec<RelationshipPair> = groups
            .into_iter()
            .map(|((person1, person2), relations)| {
                let count = relations.values().sum();
                let dominant_relation = most_frequent(relations).unwrap_or_default();
                RelationshipPair {
                    person1,
                    person2,
                    count,
                    dominant_relation,
                }
            })
            .collect();
        res.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.person1.cmp(&b.person1))
                .then_with(|| a.person2.cmp(&b.person2))
        });
        res
    }

    /// The regional scores of a candidate, best first.
    pub fn regional_scores(&self, candidate: &str) -> Vec<&RegionalScore> {
        let mut res: Vec<&RegionalScore> = self
            .regional
            .iter()
            .filter(|r| r.candidate == candidate)
            .collect();
        res.sort_by(|a, b| {
            b.final_score
                .total_cmp(&a.final_score)
                .then_with(|| a.region.cmp(&b.region))
        });
        res
    }

    /// One entry per district, in map order.
    pub fn regional_dominance(&self) -> Vec<RegionalDominance> {
        REGIONS
            .iter()
            .map(|region| {
                let mut scores: Vec<(String, f64)> = self
                    .regional
                    .iter()
                    .filter(|r| r.region == *region)
                    .map(|r| (r.candidate.clone(), r.final_score))
                    .collect();
                scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                RegionalDominance {
                    region: region.to_string(),
                    leader: scores.first().map(|p| p.0.clone()),
                    scores,
                }
            })
            .collect()
    }

    /// The stress records, most resilient first.
    pub fn stress_ranking(&self) -> Vec<&StressRecord> {
        let mut res: Vec<&StressRecord> = self.stress.iter().collect();
        res.sort_by(|a, b| {
            b.resilience_score
                .total_cmp(&a.resilience_score)
                .then_with(|| a.candidate.cmp(&b.candidate))
        });
        res
    }

    /// Counts of the sentiment labels in the relationships of a candidate.
    pub fn sentiment_breakdown(&self, candidate: &str) -> Vec<(String, u64)> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for r in self.relationships.iter().filter(|r| r.involves(candidate)) {
            *counts.entry(r.sentiment.clone()).or_insert(0) += 1;
        }
        let mut res: Vec<(String, u64)> = counts.into_iter().collect();
        res.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        res
    }

    /// The headline numbers for a selection of candidates.
    pub fn overview(&self, names: &[String]) -> Overview {
        let stats: Vec<CandidateStats> = dedup_names(names)
            .iter()
            .map(|n| self.candidate_stats(n))
            .collect();
        let n = stats.len();
        let average = |f: fn(&CandidateStats) -> f64| {
            if n == 0 {
                0.0
            } else {
                round2(stats.iter().map(f).sum::<f64>() / n as f64)
            }
        };

        // Ties go to the first candidate of the selection.
        let mut win_prob_leader: Option<&CandidateStats> = None;
        let mut influence_leader: Option<&CandidateStats> = None;
        for s in stats.iter() {
            if win_prob_leader.map_or(true, |l| s.win_prob > l.win_prob) {
                win_prob_leader = Some(s);
            }
            if influence_leader.map_or(true, |l| s.influence > l.influence) {
                influence_leader = Some(s);
            }
        }

        let res = Overview {
            num_candidates: n,
            num_relationships: self.relationships_among(names).len(),
            average_risk: average(|s| s.risk),
            average_resilience: average(|s| s.resilience),
            win_prob_leader: win_prob_leader.map(|s| s.name.clone()),
            influence_leader: influence_leader.map(|s| s.name.clone()),
        };
        info!("overview: {:?}", res);
        res
    }

    /// Strategy recommendations for a candidate, most urgent first.
    pub fn prescriptions(&self, name: &str) -> Vec<String> {
        let rules = &self.rules;
        let stats = self.candidate_stats(name);
        let mut res: Vec<String> = Vec::new();

        if stats.risk >= rules.high_risk_threshold {
            match self.stress_record(name) {
                Some(s) if !s.crit_scenario.trim().is_empty() => res.push(format!(
                    "Contain exposure to '{}' (average risk {:.1})",
                    s.crit_scenario, stats.risk
                )),
                _ => res.push(format!("Contain exposure (average risk {:.1})", stats.risk)),
            }
        }

        if stats.resilience < rules.low_resilience_threshold {
            res.push(format!(
                "Reinforce organisational cohesion (resilience {:.1})",
                stats.resilience
            ));
        }

        if stats.influence >= rules.high_influence_threshold
            && stats.support < rules.low_support_threshold
        {
            res.push(format!(
                "Convert network influence ({:.1}) into public support ({:.1}%)",
                stats.influence, stats.support
            ));
        }

        if let Some(weakest) = self.regional_scores(name).last() {
            res.push(format!(
                "Target {}: weakest regional score ({:.3})",
                weakest.region, weakest.final_score
            ));
        }

        let mut rivals: HashMap<String, u64> = HashMap::new();
        for r in self
            .relationships
            .iter()
            .filter(|r| r.relation_type.contains("경쟁"))
        {
            if let Some(other) = r.counterpart(name) {
                *rivals.entry(other.to_string()).or_insert(0) += 1;
            }
        }
        if let Some(rival) = most_frequent(rivals.clone()) {
            res.push(format!(
                "Counter {} ({} competition records)",
                rival, rivals[&rival]
            ));
        }

        if res.is_empty() {
            res.push("Hold course: no vulnerability above threshold".to_string());
        }
        debug!("prescriptions: {}: {:?}", name, res);
        res
    }

    /// The projected effect of a crisis on a candidate.
    ///
    /// The loss is the scenario's base penalty, amplified by risk and damped
    /// by resilience.
    pub fn crisis_impact(&self, name: &str, scenario: CrisisScenario) -> CrisisImpact {
        let stats = self.candidate_stats(name);
        let page_rank = self.centrality(name).map_or(0.0, |c| c.page_rank);
        let risk = stats.risk.clamp(0.0, 100.0) / 100.0;
        let resilience = stats.resilience.clamp(0.0, 100.0) / 100.0;
        let loss = scenario.base_penalty() * (1.0 + risk) * (1.0 - resilience);
        let support_after = (stats.support - loss).clamp(0.0, 100.0);
        CrisisImpact {
            candidate: stats.name.clone(),
            scenario,
            support_before: stats.support,
            support_after: round2(support_after),
            loss: round2(loss),
            win_prob_before: stats.win_prob,
            win_prob_after: win_probability(support_after, page_rank, &self.rules),
        }
    }
}

// The key with the highest count. Ties go to the smallest key.
fn most_frequent(counts: HashMap<String, u64>) -> Option<String> {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.into_iter().next().map(|p| p.0)
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn candidate(name: &str, party: &str, poll_support: f64) -> Candidate {
        Candidate {
            name: name.to_string(),
            party: party.to_string(),
            poll_support,
        }
    }

    fn relation(p1: &str, p2: &str, relation_type: &str, sentiment: &str) -> RelationshipRecord {
        RelationshipRecord {
            person1: p1.to_string(),
            person2: p2.to_string(),
            relation_type: relation_type.to_string(),
            sentiment: sentiment.to_string(),
            evidence: format!("{} / {}", p1, p2),
            source_article: "".to_string(),
            date: "2026-01-15".to_string(),
            keyword: "".to_string(),
        }
    }

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Dataset {
        let mut b = Builder::new()
            .candidates(&[
                candidate("신용한", "더불어민주당", 9.6),
                candidate("노영민", "더불어민주당", 8.0),
                candidate("이종배", "국민의힘", 4.0),
            ])
            .unwrap();
        b.add_centrality(CentralityRecord {
            name: "신용한".to_string(),
            page_rank: 0.09,
            betweenness: 0.2,
            composite_score: 0.85,
        })
        .unwrap();
        b.add_centrality(CentralityRecord {
            name: "이종배".to_string(),
            page_rank: 0.04,
            betweenness: 0.1,
            composite_score: 0.65,
        })
        .unwrap();
        b.add_stress(StressRecord {
            candidate: "신용한".to_string(),
            avg_risk: 32.0,
            resilience_score: 60.0,
            max_vulnerability: 0.4,
            crit_scenario: "조직 이탈".to_string(),
        })
        .unwrap();
        b.add_stress(StressRecord {
            candidate: "노영민".to_string(),
            avg_risk: 45.0,
            resilience_score: 40.0,
            max_vulnerability: 0.7,
            crit_scenario: "세대 교체론".to_string(),
        })
        .unwrap();
        b.add_relationship(relation("신용한", "노영민", "경쟁", "부정"))
            .unwrap();
        b.add_relationship(relation("노영민", "신용한", "경쟁", "중립"))
            .unwrap();
        b.add_relationship(relation("신용한", "이종배", "협력", "긍정"))
            .unwrap();
        b.add_regional_score("청주", "신용한", 0.62).unwrap();
        b.add_regional_score("청주", "노영민", 0.58).unwrap();
        b.add_regional_score("충주", "이종배", 0.71).unwrap();
        b.add_regional_score("충주", "신용한", 0.21).unwrap();
        b.build()
    }

    #[test]
    fn stats_known_candidate() {
        init();
        let ds = sample();
        let s = ds.candidate_stats("신용한");
        assert_eq!(s.party, "더불어민주당");
        assert_eq!(s.support, 9.6);
        assert_eq!(s.influence, 85.0);
        assert_eq!(s.win_prob, 32);
        assert_eq!(s.risk, 32.0);
        assert_eq!(s.resilience, 60.0);
        assert_eq!(s.rationale.len(), 4);
    }

    #[test]
    fn stats_unknown_candidate() {
        init();
        let ds = sample();
        let s = ds.candidate_stats("홍길동");
        assert_eq!(s.name, "홍길동");
        assert_eq!(s.party, "기타");
        assert_eq!(s.support, 5.0);
        assert_eq!(s.win_prob, 15);
        assert_eq!(s.influence, DEFAULT_INFLUENCE);
    }

    #[test]
    fn stats_without_centrality() {
        let ds = sample();
        let s = ds.candidate_stats("노영민");
        // 8.0 * 1.5
        assert_eq!(s.win_prob, 12);
        assert_eq!(s.influence, 32.0);
    }

    #[test]
    fn win_prob_is_clamped() {
        let rules = StatsRules::DEFAULT_RULES;
        assert_eq!(win_probability(100.0, 10.0, &rules), 99);
        assert_eq!(win_probability(0.0, -1.0, &rules), 0);
        assert_eq!(win_probability(9.6, 0.09, &rules), 32);

        let mut b = Builder::new()
            .candidates(&[candidate("A", "x", 100.0)])
            .unwrap();
        b.add_centrality(CentralityRecord {
            name: "A".to_string(),
            page_rank: 10.0,
            betweenness: 0.0,
            composite_score: 1.0,
        })
        .unwrap();
        assert_eq!(b.build().candidate_stats("A").win_prob, 99);
    }

    #[test]
    fn win_prob_rounds_like_the_dashboard() {
        let rules = StatsRules::DEFAULT_RULES;
        // 0.3 + 0.086 * 10 * 20 is just below 17.5.
        assert_eq!(win_probability(0.2, 0.086, &rules), 17);
        assert_eq!(win_probability(1.0, 0.0, &rules), 2);

        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(17.499999999999996), 17.0);
    }

    #[test]
    fn custom_rules() {
        let rules = StatsRules {
            max_win_prob: 20,
            default_risk: 45.0,
            high_risk_threshold: 60.0,
            ..StatsRules::DEFAULT_RULES
        };
        let ds = Builder::new()
            .rules(&rules)
            .candidates(&[candidate("A", "x", 30.0)])
            .unwrap()
            .build();
        assert_eq!(ds.rules(), &rules);

        let stats = ds.candidate_stats("A");
        assert_eq!(stats.win_prob, 20);
        assert_eq!(stats.risk, 45.0);
        // Risk 45 is under the raised threshold, resilience 50 is not low.
        assert_eq!(
            ds.prescriptions("A"),
            vec!["Hold course: no vulnerability above threshold".to_string()]
        );

        let default = Builder::new()
            .candidates(&[candidate("A", "x", 30.0)])
            .unwrap()
            .build();
        assert_eq!(default.rules(), &StatsRules::DEFAULT_RULES);
        assert_eq!(default.candidate_stats("A").win_prob, 45);
    }

    #[test]
    fn builder_rejects_bad_records() {
        let res = Builder::new().candidates(&[candidate("A", "x", 1.0), candidate("A", "y", 2.0)]);
        assert!(matches!(res, Err(DashboardErrors::DuplicateCandidate(_))));

        let res = Builder::new().candidates(&[candidate("A", "x", 101.0)]);
        assert!(matches!(res, Err(DashboardErrors::InvalidSupport { .. })));

        let res = Builder::new().candidates(&[candidate("A", "x", f64::NAN)]);
        assert!(matches!(res, Err(DashboardErrors::NonFiniteValue { .. })));

        let mut b = Builder::new();
        assert_eq!(
            b.add_regional_score("서울", "A", 0.5),
            Err(DashboardErrors::UnknownRegion("서울".to_string()))
        );
    }

    #[test]
    fn series_is_deterministic() {
        let ds = sample();
        let sel = names(&["신용한", "노영민", "홍길동"]);
        let s1 = ds.simulation_series(&sel, &Scenario::Baseline);
        let s2 = ds.simulation_series(&sel, &Scenario::Baseline);
        assert_eq!(s1, s2);
        assert_eq!(s1.len(), 12);
        assert_eq!(s1[0].month, "1월");
        assert_eq!(s1[11].month, "12월");
        assert_eq!(s1[0].values[0].0, "신용한");
        assert!((s1[0].values[0].1 - 9.81).abs() < 1e-9);
    }

    #[test]
    fn series_edge_cases() {
        let ds = sample();
        let empty = ds.simulation_series(&[], &Scenario::Unification);
        assert_eq!(empty.len(), 12);
        assert!(empty.iter().all(|r| r.values.is_empty()));

        let single = ds.simulation_series(&names(&["이종배"]), &Scenario::Unification);
        assert!(single.iter().all(|r| r.values.len() == 1));

        let dup = ds.simulation_series(&names(&["이종배", "이종배"]), &Scenario::Baseline);
        assert!(dup.iter().all(|r| r.values.len() == 1));
    }

    #[test]
    fn series_scenarios() {
        let ds = sample();
        let sel = names(&["신용한", "노영민"]);
        let base = ds.simulation_series(&sel, &Scenario::Baseline);
        let unified = ds.simulation_series(&sel, &Scenario::Unification);
        // Identical before the shock.
        assert_eq!(base[..6], unified[..6]);
        for month in 6..12 {
            assert!(unified[month].values[0].1 > base[month].values[0].1);
            assert!(unified[month].values[1].1 < base[month].values[1].1);
        }

        let strangers = names(&["홍길동", "김철수"]);
        assert_eq!(
            ds.simulation_series(&strangers, &Scenario::Unification),
            ds.simulation_series(&strangers, &Scenario::Baseline)
        );
        let mixed = names(&["이종배", "홍길동"]);
        assert_eq!(
            ds.simulation_series(&mixed, &Scenario::Unification),
            ds.simulation_series(&mixed, &Scenario::Baseline)
        );

        let shocked = ds.simulation_series(&sel, &Scenario::ScandalShock("신용한".to_string()));
        assert_eq!(base[..6], shocked[..6]);
        assert!(shocked[6].values[0].1 < base[6].values[0].1);
        assert_eq!(shocked[6].values[1], base[6].values[1]);
    }

    #[test]
    fn relationships_are_symmetric() {
        let ds = sample();
        let ab = ds.relationships_among(&names(&["신용한", "노영민"]));
        let ba = ds.relationships_among(&names(&["노영민", "신용한"]));
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 2);
        assert_eq!(ab[1].person1, "노영민");

        assert!(ds.relationships_among(&names(&["신용한"])).is_empty());
        assert_eq!(ds.relationships_among(&ds.candidate_names()).len(), 3);
    }

    #[test]
    fn relationship_pairs_grouped() {
        let ds = sample();
        let pairs = ds.relationship_pairs(&ds.candidate_names());
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].count, 2);
        assert_eq!(pairs[0].dominant_relation, "경쟁");
        assert_eq!(pairs[1].count, 1);
        assert_eq!(pairs[1].dominant_relation, "협력");
    }

    #[test]
    fn regional_lookups() {
        let ds = sample();
        let dom = ds.regional_dominance();
        assert_eq!(dom.len(), 11);
        assert_eq!(dom[0].region, "단양");
        assert_eq!(dom[0].leader, None);
        let cheongju = dom.iter().find(|d| d.region == "청주").unwrap();
        assert_eq!(cheongju.leader, Some("신용한".to_string()));
        assert_eq!(cheongju.scores.len(), 2);

        let scores = ds.regional_scores("신용한");
        assert_eq!(scores[0].region, "청주");
        assert_eq!(scores[1].region, "충주");
        assert!(ds.regional_scores("홍길동").is_empty());
    }

    #[test]
    fn stress_and_sentiment() {
        let ds = sample();
        let ranking = ds.stress_ranking();
        assert_eq!(ranking[0].candidate, "신용한");
        assert_eq!(ranking[1].candidate, "노영민");

        let sentiments = ds.sentiment_breakdown("신용한");
        assert_eq!(sentiments.len(), 3);
        assert!(sentiments.iter().all(|(_, c)| *c == 1));
        assert_eq!(sentiments[0].0, "긍정");
        assert!(ds.sentiment_breakdown("홍길동").is_empty());
    }

    #[test]
    fn overview_of_selection() {
        let ds = sample();
        let o = ds.overview(&ds.candidate_names());
        assert_eq!(o.num_candidates, 3);
        assert_eq!(o.num_relationships, 3);
        // (32 + 45 + 50) / 3
        assert_eq!(o.average_risk, 42.33);
        assert_eq!(o.win_prob_leader, Some("신용한".to_string()));
        assert_eq!(o.influence_leader, Some("신용한".to_string()));

        let empty = ds.overview(&[]);
        assert_eq!(empty.num_candidates, 0);
        assert_eq!(empty.average_risk, 0.0);
        assert_eq!(empty.win_prob_leader, None);
    }

    #[test]
    fn prescriptions_follow_thresholds() {
        let ds = sample();
        let p = ds.prescriptions("노영민");
        assert!(p[0].contains("세대 교체론"));
        assert!(p[1].starts_with("Reinforce"));
        assert!(p.iter().any(|s| s == "Target 청주: weakest regional score (0.580)"));
        assert!(p.iter().any(|s| s.starts_with("Counter 신용한 (2")));

        let p = ds.prescriptions("신용한");
        assert!(p.iter().any(|s| s.starts_with("Convert network influence")));
        assert!(p.iter().any(|s| s.starts_with("Target 충주")));

        let mut b = Builder::new()
            .candidates(&[candidate("A", "x", 30.0)])
            .unwrap();
        b.add_stress(StressRecord {
            candidate: "A".to_string(),
            avg_risk: 10.0,
            resilience_score: 90.0,
            max_vulnerability: 0.1,
            crit_scenario: "".to_string(),
        })
        .unwrap();
        let p = b.build().prescriptions("A");
        assert_eq!(p, vec!["Hold course: no vulnerability above threshold".to_string()]);
    }

    #[test]
    fn crisis_penalties() {
        let ds = sample();
        let impact = ds.crisis_impact("신용한", CrisisScenario::Scandal);
        // 8 * 1.32 * 0.4
        assert_eq!(impact.loss, 4.22);
        assert_eq!(impact.support_after, 5.38);
        assert_eq!(impact.win_prob_before, 32);
        assert_eq!(impact.win_prob_after, 26);

        let milder = ds.crisis_impact("신용한", CrisisScenario::FramingAttack);
        assert!(milder.loss < impact.loss);

        let mut b = Builder::new()
            .candidates(&[candidate("A", "x", 1.0)])
            .unwrap();
        b.add_stress(StressRecord {
            candidate: "A".to_string(),
            avg_risk: 100.0,
            resilience_score: 0.0,
            max_vulnerability: 1.0,
            crit_scenario: "".to_string(),
        })
        .unwrap();
        let floor = b.build().crisis_impact("A", CrisisScenario::Scandal);
        assert_eq!(floor.support_after, 0.0);
        assert_eq!(floor.win_prob_after, 0);
    }
}
