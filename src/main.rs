mod args;
mod dash;

use clap::Parser;
use log::{info, warn, LevelFilter};
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    info!("args: {:?}", args);

    let res = match &args.consolidate {
        Some(dir) => dash::run_consolidate(dir, &args.out),
        None => dash::run_dashboard(&args),
    };

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(source) = std::error::Error::source(e.as_ref()) {
            eprintln!("caused by: {}", source);
        }
        if let Some(bt) = ErrorCompat::backtrace(e.as_ref()) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
