use clap::Parser;

/// This is the aggregation program behind the election strategy dashboard.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the run (data sources, selected candidates, scenario).
    /// For more information about the file format, read the documentation of the manual module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected output. If provided, stratdash will
    /// check that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the output will be written to the given
    /// location. Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The polling roster in JSON format. Overrides the roster of the --config option.
    #[clap(long, value_parser)]
    pub roster: Option<String>,

    /// (file path) The evidence bundle in JSON format. Overrides the evidence of the --config option.
    #[clap(long, value_parser)]
    pub evidence: Option<String>,

    /// (file path) The event impact analysis in JSON format. Overrides the events of the --config option.
    #[clap(long, value_parser)]
    pub events: Option<String>,

    /// (list of names or not specified) The candidates to display. Defaults to the whole roster.
    #[clap(long, value_parser)]
    pub candidates: Option<Vec<String>>,

    /// (default summary) What to output: summary, stats, series, relationships, regions, stress or report.
    #[clap(long, value_parser)]
    pub view: Option<String>,

    /// (default baseline) The scenario of the support series: baseline, unification or scandal:<name>.
    #[clap(long, value_parser)]
    pub scenario: Option<String>,

    /// (directory) If specified, consolidates the CSV exports of this directory into an evidence
    /// bundle instead of computing the dashboard.
    #[clap(long, value_parser)]
    pub consolidate: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
