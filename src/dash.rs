use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use strategy_metrics::*;

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dash::config_reader::*;
use crate::dash::io_common::{resolve_path, simplify_file_name, write_output};

pub mod config_reader;
mod io_common;
mod io_csv;
mod report;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the output"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Field {field} is not a number: {content}"))]
    ParsingJsonNumber { field: String, content: String },
    #[snafu(display("Missing field {field} for {name}"))]
    MissingField { field: String, name: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No roster provided: use --roster or --config"))]
    MissingRoster {},
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Invalid dataset"))]
    InvalidDataset { source: DashboardErrors },
    #[snafu(display("Error rendering the report"))]
    RenderingReport { source: std::fmt::Error },
    #[snafu(display("Difference detected between the computed output and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;
pub type BDashResult<T> = Result<T, Box<DashError>>;

/// The possible outputs of a run.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum View {
    Summary,
    Stats,
    Series,
    Relationships,
    Regions,
    Stress,
    Report,
}

pub fn parse_view(s: &str) -> DashResult<View> {
    match s {
        "summary" => Ok(View::Summary),
        "stats" => Ok(View::Stats),
        "series" => Ok(View::Series),
        "relationships" => Ok(View::Relationships),
        "regions" => Ok(View::Regions),
        "stress" => Ok(View::Stress),
        "report" => Ok(View::Report),
        x => whatever!("Unknown view {:?}", x),
    }
}

pub fn parse_scenario(s: &str) -> DashResult<Scenario> {
    match s.split_once(':') {
        None if s == "baseline" => Ok(Scenario::Baseline),
        None if s == "unification" => Ok(Scenario::Unification),
        Some(("scandal", name)) if !name.trim().is_empty() => {
            Ok(Scenario::ScandalShock(name.trim().to_string()))
        }
        _ => whatever!("Unknown scenario {:?}", s),
    }
}

fn scenario_label(s: &Scenario) -> String {
    match s {
        Scenario::Baseline => "baseline".to_string(),
        Scenario::Unification => "unification".to_string(),
        Scenario::ScandalShock(name) => format!("scandal:{}", name),
    }
}

/// Everything a run needs, once the configuration file and the flags are merged.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub settings: OutputSettings,
    pub roster: String,
    pub evidence: Option<String>,
    pub events: Option<String>,
    pub candidates: Option<Vec<String>>,
    pub scenario: Scenario,
    pub view: View,
    pub out: Option<String>,
    pub reference: Option<String>,
}

/// Merges the configuration file (if any) with the command line flags. Flags win.
pub fn resolve_options(args: &Args) -> DashResult<RunOptions> {
    let config: Option<(DashConfig, String)> = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?;
            let root = root_p.as_os_str().to_string_lossy().to_string();
            Some((config, root))
        }
        None => None,
    };

    let roster = match (&args.roster, &config) {
        (Some(p), _) => p.clone(),
        (None, Some((c, root))) => resolve_path(Path::new(root), &c.data_sources.roster),
        (None, None) => return MissingRosterSnafu {}.fail(),
    };
    let evidence = match (&args.evidence, &config) {
        (Some(p), _) => Some(p.clone()),
        (None, Some((c, root))) => c
            .data_sources
            .evidence
            .as_ref()
            .map(|e| resolve_path(Path::new(root), e)),
        (None, None) => None,
    };
    let events = match (&args.events, &config) {
        (Some(p), _) => Some(p.clone()),
        (None, Some((c, root))) => c
            .data_sources
            .events
            .as_ref()
            .map(|e| resolve_path(Path::new(root), e)),
        (None, None) => None,
    };

    let scenario_s: Option<String> = args
        .scenario
        .clone()
        .or_else(|| config.as_ref().and_then(|(c, _)| c.scenario.clone()));
    let scenario = match scenario_s {
        Some(s) => parse_scenario(&s)?,
        None => Scenario::Baseline,
    };
    let view = match &args.view {
        Some(v) => parse_view(v)?,
        None => View::Summary,
    };

    let settings = config
        .as_ref()
        .and_then(|(c, _)| c.output_settings.clone())
        .unwrap_or_default();

    // Without --out, the output directory of the configuration is used.
    let out = match (&args.out, &settings.output_directory, &config) {
        (Some(o), _, _) => Some(o.clone()),
        (None, Some(dir), Some((_, root))) => {
            let file_name = match view {
                View::Report => "report.md".to_string(),
                v => format!("{:?}.json", v).to_lowercase(),
            };
            let dir = resolve_path(Path::new(root), dir);
            Some(resolve_path(Path::new(&dir), &file_name))
        }
        _ => None,
    };

    Ok(RunOptions {
        settings,
        roster,
        evidence,
        events,
        candidates: args
            .candidates
            .clone()
            .or_else(|| config.as_ref().and_then(|(c, _)| c.candidates.clone())),
        scenario,
        view,
        out,
        reference: args.reference.clone(),
    })
}

pub fn load_dataset(opts: &RunOptions) -> DashResult<Dataset> {
    let roster = read_roster(&opts.roster)?;
    let evidence = match &opts.evidence {
        Some(p) => read_evidence(p)?,
        None => {
            warn!("load_dataset: no evidence bundle, only the roster is used");
            EvidenceBundle::default()
        }
    };
    build_dataset(&roster, &evidence)
}

pub fn load_events(opts: &RunOptions) -> DashResult<Option<EventReport>> {
    match &opts.events {
        Some(p) => Ok(Some(read_events(p)?)),
        None => Ok(None),
    }
}

/// The selected candidates, without duplicates. Defaults to the whole roster.
pub fn selection(dataset: &Dataset, candidates: &Option<Vec<String>>) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    let names = candidates
        .clone()
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| dataset.candidate_names());
    for n in names {
        let n = n.trim().to_string();
        if n.is_empty() || res.contains(&n) {
            continue;
        }
        if dataset.candidate(&n).is_none() {
            warn!("selection: {} is not in the roster, default values are used", n);
        }
        res.push(n);
    }
    res
}

fn stats_to_json(s: &CandidateStats) -> JSValue {
    json!({
        "name": s.name,
        "party": s.party,
        "support": s.support,
        "influence": s.influence,
        "risk": s.risk,
        "resilience": s.resilience,
        "winProb": s.win_prob,
        "rationale": s.rationale,
    })
}

fn series_to_json(rows: &[SeriesRow]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for row in rows.iter() {
        let mut obj: JSMap<String, JSValue> = JSMap::new();
        obj.insert("month".to_string(), json!(row.month));
        for (name, value) in row.values.iter() {
            obj.insert(name.clone(), json!(value));
        }
        l.push(JSValue::Object(obj));
    }
    l
}

fn relationships_to_json(dataset: &Dataset, names: &[String]) -> JSValue {
    let records: Vec<JSValue> = dataset
        .relationships_among(names)
        .iter()
        .map(|r| {
            json!({
                "person1": r.person1,
                "person2": r.person2,
                "relation_type": r.relation_type,
                "sentiment": r.sentiment,
                "evidence": r.evidence,
                "source_article": r.source_article,
                "date": r.date,
                "keyword": r.keyword,
            })
        })
        .collect();
    let pairs: Vec<JSValue> = dataset
        .relationship_pairs(names)
        .iter()
        .map(|p| {
            json!({
                "person1": p.person1,
                "person2": p.person2,
                "count": p.count,
                "dominantRelation": p.dominant_relation,
            })
        })
        .collect();
    json!({ "records": records, "pairs": pairs })
}

fn regions_to_json(dataset: &Dataset) -> Vec<JSValue> {
    dataset
        .regional_dominance()
        .iter()
        .map(|d| {
            let scores: Vec<JSValue> = d
                .scores
                .iter()
                .map(|(c, s)| json!({"candidate": c, "final_score": s}))
                .collect();
            json!({"region": d.region, "leader": d.leader, "scores": scores})
        })
        .collect()
}

fn stress_to_json(dataset: &Dataset) -> Vec<JSValue> {
    dataset
        .stress_ranking()
        .iter()
        .map(|r| {
            json!({
                "candidate": r.candidate,
                "Avg_Risk": r.avg_risk,
                "Resilience_Score": r.resilience_score,
                "Max_Vulnerability": r.max_vulnerability,
                "Crit_Scenario": r.crit_scenario,
            })
        })
        .collect()
}

fn candidate_detail_to_json(dataset: &Dataset, name: &str) -> JSValue {
    let mut js = stats_to_json(&dataset.candidate_stats(name));
    let sentiments: JSMap<String, JSValue> = dataset
        .sentiment_breakdown(name)
        .into_iter()
        .map(|(label, count)| (label, json!(count)))
        .collect();
    let crises: Vec<JSValue> = CrisisScenario::ALL
        .iter()
        .map(|scenario| {
            let impact = dataset.crisis_impact(name, *scenario);
            json!({
                "scenario": scenario.label(),
                "loss": impact.loss,
                "supportAfter": impact.support_after,
                "winProbAfter": impact.win_prob_after,
            })
        })
        .collect();
    js["sentiment"] = JSValue::Object(sentiments);
    js["prescriptions"] = json!(dataset.prescriptions(name));
    js["crisis"] = JSValue::Array(crises);
    js
}

fn events_to_json(events: &EventReport) -> JSValue {
    let impacts: Vec<JSValue> = events
        .impacts
        .iter()
        .map(|i| {
            json!({
                "candidate": i.candidate,
                "official": i.official,
                "private": i.private,
                "sentiment": i.sentiment,
                "regional": i.regional,
                "reason": i.reason,
            })
        })
        .collect();
    json!({ "analysis": events.analysis, "impacts": impacts })
}

pub fn build_summary_js(
    opts: &RunOptions,
    dataset: &Dataset,
    names: &[String],
    events: Option<&EventReport>,
) -> JSValue {
    let overview = dataset.overview(names);
    let candidates: Vec<JSValue> = names
        .iter()
        .map(|n| candidate_detail_to_json(dataset, n))
        .collect();
    let mut js = json!({
        "config": {
            "dashboard": opts.settings.dashboard_name,
            "date": opts.settings.report_date,
            "roster": simplify_file_name(&opts.roster),
            "evidence": opts.evidence.as_deref().map(simplify_file_name),
            "events": opts.events.as_deref().map(simplify_file_name),
            "candidates": names,
            "scenario": scenario_label(&opts.scenario),
        },
        "overview": {
            "numCandidates": overview.num_candidates,
            "numRelationships": overview.num_relationships,
            "averageRisk": overview.average_risk,
            "averageResilience": overview.average_resilience,
            "winProbLeader": overview.win_prob_leader,
            "influenceLeader": overview.influence_leader,
        },
        "candidates": candidates,
        "series": series_to_json(&dataset.simulation_series(names, &opts.scenario)),
        "relationships": relationships_to_json(dataset, names),
        "regions": regions_to_json(dataset),
        "stress": stress_to_json(dataset),
    });
    if let Some(e) = events {
        js["events"] = events_to_json(e);
    }
    js
}

/// Renders the requested view.
pub fn render_view(
    opts: &RunOptions,
    dataset: &Dataset,
    names: &[String],
    events: Option<&EventReport>,
) -> DashResult<String> {
    let js = match opts.view {
        View::Report => {
            return report::render_report(&opts.settings, dataset, names, events)
                .context(RenderingReportSnafu {});
        }
        View::Summary => build_summary_js(opts, dataset, names, events),
        View::Stats => {
            let l: Vec<JSValue> = names
                .iter()
                .map(|n| stats_to_json(&dataset.candidate_stats(n)))
                .collect();
            json!({ "candidates": l })
        }
        View::Series => json!({
            "scenario": scenario_label(&opts.scenario),
            "series": series_to_json(&dataset.simulation_series(names, &opts.scenario)),
        }),
        View::Relationships => relationships_to_json(dataset, names),
        View::Regions => json!({ "regions": regions_to_json(dataset) }),
        View::Stress => json!({ "stress": stress_to_json(dataset) }),
    };
    serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})
}

/// Reads a reference output. JSON references are normalized so that only the
/// content is compared, not the formatting.
pub fn read_reference(path: &str, view: View) -> DashResult<String> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    if view == View::Report {
        return Ok(contents.trim_end().to_string());
    }
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})
}

pub fn run_dashboard(args: &Args) -> BDashResult<()> {
    let opts = resolve_options(args)?;
    info!("run_dashboard: options: {:?}", opts);

    let dataset = load_dataset(&opts)?;
    let events = load_events(&opts)?;
    let names = selection(&dataset, &opts.candidates);
    info!("run_dashboard: selected candidates: {:?}", names);

    let output = render_view(&opts, &dataset, &names, events.as_ref())?;
    debug!("run_dashboard: output size {}", output.len());

    if let Some(reference_p) = &opts.reference {
        let reference = read_reference(reference_p, opts.view)?;
        if reference != output.trim_end() {
            warn!("Found differences with the reference output");
            print_diff(reference.as_str(), output.trim_end(), "\n");
            return Err(Box::new(DashError::ReferenceMismatch {
                path: reference_p.clone(),
            }));
        }
        info!("run_dashboard: output matches {:?}", reference_p);
    }

    write_output(&opts.out, &output)?;
    Ok(())
}

/// Writes the evidence bundle consolidated from the CSV exports of a directory.
pub fn run_consolidate(dir: &str, out: &Option<String>) -> BDashResult<()> {
    let bundle = io_csv::consolidate_evidence(dir)?;
    // Only write bundles that would load.
    build_dataset(&[], &bundle)?;
    let js = serde_json::to_string_pretty(&bundle).context(WritingJsonSnafu {})?;
    write_output(out, &js)?;
    Ok(())
}
