use crate::dash::*;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use strategy_metrics::builder::Builder;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName")]
    pub dashboard_name: String,
    #[serde(rename = "reportDate")]
    pub report_date: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dashboard_name: "Strategy dashboard".to_string(),
            report_date: None,
            output_directory: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSources {
    pub roster: String,
    pub evidence: Option<String>,
    pub events: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "dataSources")]
    pub data_sources: DataSources,
    pub candidates: Option<Vec<String>>,
    pub scenario: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub party: Option<String>,
    #[serde(alias = "support")]
    pub poll_support: Option<JSValue>,
}

/// The roster may be written as a bare list or wrapped in an object.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RosterFile {
    List(Vec<RosterEntry>),
    Wrapped { candidates: Vec<RosterEntry> },
}

impl RosterFile {
    pub fn entries(&self) -> &[RosterEntry] {
        match self {
            RosterFile::List(l) => l,
            RosterFile::Wrapped { candidates } => candidates,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CentralityRow {
    #[serde(alias = "이름", alias = "candidate")]
    pub name: String,
    #[serde(rename = "pageRank", alias = "페이지랭크", alias = "page_rank")]
    pub page_rank: Option<JSValue>,
    #[serde(alias = "매개중심성")]
    pub betweenness: Option<JSValue>,
    #[serde(rename = "compositeScore", alias = "종합점수", alias = "composite_score")]
    pub composite_score: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRow {
    pub person1: String,
    pub person2: String,
    #[serde(default)]
    pub relation_type: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub source_article: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub keyword: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegionalRow {
    pub region: String,
    pub candidate: String,
    pub final_score: Option<JSValue>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StressRow {
    pub candidate: String,
    #[serde(rename = "Avg_Risk")]
    pub avg_risk: Option<JSValue>,
    #[serde(rename = "Resilience_Score")]
    pub resilience_score: Option<JSValue>,
    #[serde(rename = "Max_Vulnerability")]
    pub max_vulnerability: Option<JSValue>,
    #[serde(rename = "Crit_Scenario")]
    pub crit_scenario: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceBundle {
    #[serde(default)]
    pub centrality: Vec<CentralityRow>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRow>,
    #[serde(default)]
    pub regional: Vec<RegionalRow>,
    #[serde(default)]
    pub stress: Vec<StressRow>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EventImpactRow {
    pub official: Option<JSValue>,
    pub private: Option<JSValue>,
    pub sentiment: Option<JSValue>,
    pub regional: Option<JSValue>,
    pub reason: Option<String>,
}

/// The output of the event impact analysis.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct EventImpactFile {
    pub analysis: Option<String>,
    #[serde(default)]
    pub impact_matrix: BTreeMap<String, EventImpactRow>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EventImpact {
    pub candidate: String,
    pub official: f64,
    pub private: f64,
    pub sentiment: f64,
    pub regional: f64,
    pub reason: String,
}

/// A checked event impact analysis. Impacts are sorted by candidate name.
#[derive(PartialEq, Debug, Clone)]
pub struct EventReport {
    pub analysis: String,
    pub impacts: Vec<EventImpact>,
}

pub fn read_json_file<T: DeserializeOwned>(path: &str) -> DashResult<T> {
    info!("Attempting to read {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let config: DashConfig = read_json_file(path)?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_roster(path: &str) -> DashResult<Vec<RosterEntry>> {
    let roster: RosterFile = read_json_file(path)?;
    debug!("read_roster: {} entries", roster.entries().len());
    Ok(roster.entries().to_vec())
}

pub fn read_evidence(path: &str) -> DashResult<EvidenceBundle> {
    let bundle: EvidenceBundle = read_json_file(path)?;
    debug!(
        "read_evidence: {} centrality, {} relationships, {} regional, {} stress",
        bundle.centrality.len(),
        bundle.relationships.len(),
        bundle.regional.len(),
        bundle.stress.len()
    );
    Ok(bundle)
}

pub fn read_events(path: &str) -> DashResult<EventReport> {
    let file: EventImpactFile = read_json_file(path)?;
    let report = build_event_report(&file)?;
    debug!("read_events: {} impacts", report.impacts.len());
    Ok(report)
}

/// Missing deltas count as no change.
pub fn build_event_report(file: &EventImpactFile) -> DashResult<EventReport> {
    let mut impacts: Vec<EventImpact> = Vec::new();
    for (name, row) in file.impact_matrix.iter() {
        impacts.push(EventImpact {
            candidate: name.clone(),
            official: read_js_float(&row.official, "official")?.unwrap_or(0.0),
            private: read_js_float(&row.private, "private")?.unwrap_or(0.0),
            sentiment: read_js_float(&row.sentiment, "sentiment")?.unwrap_or(0.0),
            regional: read_js_float(&row.regional, "regional")?.unwrap_or(0.0),
            reason: row.reason.clone().unwrap_or_default(),
        });
    }
    Ok(EventReport {
        analysis: file.analysis.clone().unwrap_or_default(),
        impacts,
    })
}

/// Assembles the dataset, validating every record on the way.
pub fn build_dataset(roster: &[RosterEntry], evidence: &EvidenceBundle) -> DashResult<Dataset> {
    let mut builder = Builder::new();
    for entry in roster.iter() {
        let poll_support = required_float(&entry.poll_support, "poll_support", &entry.name)?;
        let party = match entry.party.clone() {
            Some(p) if !p.trim().is_empty() => p,
            _ => {
                warn!("build_dataset: no party for {}", entry.name);
                DEFAULT_PARTY.to_string()
            }
        };
        builder
            .add_candidate(Candidate {
                name: entry.name.clone(),
                party,
                poll_support,
            })
            .context(InvalidDatasetSnafu {})?;
    }

    for row in evidence.centrality.iter() {
        builder
            .add_centrality(CentralityRecord {
                name: row.name.clone(),
                page_rank: required_float(&row.page_rank, "pageRank", &row.name)?,
                betweenness: read_js_float(&row.betweenness, "betweenness")?.unwrap_or(0.0),
                composite_score: required_float(&row.composite_score, "compositeScore", &row.name)?,
            })
            .context(InvalidDatasetSnafu {})?;
    }

    for row in evidence.relationships.iter() {
        builder
            .add_relationship(RelationshipRecord {
                person1: row.person1.clone(),
                person2: row.person2.clone(),
                relation_type: row.relation_type.clone(),
                sentiment: row.sentiment.clone(),
                evidence: row.evidence.clone(),
                source_article: row.source_article.clone(),
                date: row.date.clone(),
                keyword: row.keyword.clone(),
            })
            .context(InvalidDatasetSnafu {})?;
    }

    for row in evidence.regional.iter() {
        let score = required_float(&row.final_score, "final_score", &row.candidate)?;
        builder
            .add_regional_score(row.region.trim(), &row.candidate, score)
            .context(InvalidDatasetSnafu {})?;
    }

    for row in evidence.stress.iter() {
        builder
            .add_stress(StressRecord {
                candidate: row.candidate.clone(),
                avg_risk: required_float(&row.avg_risk, "Avg_Risk", &row.candidate)?,
                resilience_score: required_float(
                    &row.resilience_score,
                    "Resilience_Score",
                    &row.candidate,
                )?,
                max_vulnerability: read_js_float(&row.max_vulnerability, "Max_Vulnerability")?
                    .unwrap_or(0.0),
                crit_scenario: row.crit_scenario.clone().unwrap_or_default(),
            })
            .context(InvalidDatasetSnafu {})?;
    }

    let dataset = builder.build();
    info!(
        "build_dataset: {} candidates, {} relationships",
        dataset.candidates().len(),
        dataset.relationships().len()
    );
    Ok(dataset)
}

fn required_float(x: &Option<JSValue>, field: &str, name: &str) -> DashResult<f64> {
    read_js_float(x, field)?.context(MissingFieldSnafu { field, name })
}

/// Reads a number that may also be written as a string.
///
/// Absent values, nulls and blank strings are `None`.
pub fn read_js_float(x: &Option<JSValue>, field: &str) -> DashResult<Option<f64>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_f64()
            .map(Some)
            .context(ParsingJsonNumberSnafu {
                field,
                content: n.to_string(),
            }),
        Some(JSValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Some)
            .context(ParsingJsonNumberSnafu {
                field,
                content: s.clone(),
            }),
        Some(other) => None.context(ParsingJsonNumberSnafu {
            field,
            content: other.to_string(),
        }),
    }
}
