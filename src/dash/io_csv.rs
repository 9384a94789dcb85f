// Primitives for consolidating the CSV exports of the analysis pipeline.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::dash::{config_reader::EvidenceBundle, io_common::simplify_file_name, *};

pub const CENTRALITY_FILE: &str = "centrality_scores.csv";
pub const RELATIONSHIPS_FILE: &str = "relationships_raw.csv";
pub const REGIONAL_FILE: &str = "regional_dominance_data.csv";
pub const STRESS_FILE: &str = "stress_test_summary.csv";

/// Reads a CSV file with a header row. Every line becomes an object keyed by
/// the header, with string values.
pub fn read_csv_table(path: &str) -> BDashResult<Vec<JSValue>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    // Exports written with a byte order mark carry it in the first header.
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    debug!("read_csv_table: {:?} headers: {:?}", path, headers);

    let mut res: Vec<JSValue> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let mut obj: JSMap<String, JSValue> = JSMap::new();
        for (header, field) in headers.iter().zip(line.iter()) {
            obj.insert(header.clone(), JSValue::String(field.to_string()));
        }
        res.push(JSValue::Object(obj));
    }
    Ok(res)
}

fn read_section<T: DeserializeOwned>(dir: &str, file: &str, mandatory: bool) -> BDashResult<Vec<T>> {
    let p: PathBuf = [dir, file].iter().collect();
    let path = p.as_path().display().to_string();
    if !mandatory && !p.exists() {
        warn!("read_section: {:?} not found, skipping", path);
        return Ok(Vec::new());
    }
    info!("Attempting to read {:?}", path);
    let rows = read_csv_table(&path)?;
    let parsed: Vec<T> =
        serde_json::from_value(JSValue::Array(rows)).context(ParsingJsonSnafu { path: &path })?;
    info!("Read {} rows from {}", parsed.len(), simplify_file_name(&path));
    Ok(parsed)
}

/// Builds an evidence bundle out of the CSV exports found in a directory.
pub fn consolidate_evidence(dir: &str) -> BDashResult<EvidenceBundle> {
    Ok(EvidenceBundle {
        centrality: read_section(dir, CENTRALITY_FILE, true)?,
        relationships: read_section(dir, RELATIONSHIPS_FILE, true)?,
        regional: read_section(dir, REGIONAL_FILE, false)?,
        stress: read_section(dir, STRESS_FILE, false)?,
    })
}
