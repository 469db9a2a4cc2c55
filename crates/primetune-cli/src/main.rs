mod cli;
mod error;
mod logging;
mod scorer;
mod ui;

use crate::cli::Cli;
use crate::error::Result;
use crate::scorer::CommandScorer;
use crate::ui::CliProgressHandler;
use clap::Parser;
use primetune::engine::config::SearchConfig;
use primetune::engine::progress::ProgressReporter;
use primetune::workflows;
use std::sync::Arc;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("primetune v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let options = cli.merged_options()?;
    let command_scorer = CommandScorer::new(&cli.command)?;
    let config = SearchConfig::from_options(&options, Arc::new(command_scorer));

    let window = if config.is_unbounded() {
        format!("[{}, unbounded)", config.min_value)
    } else {
        format!("[{}, {}]", config.min_value, config.max_value)
    };
    println!(
        "Tuning over {} with {} lineage(s) in {} mode.",
        window, config.branches, config.direction
    );

    let progress_handler = CliProgressHandler::new(options.verbose);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core tune workflow.");
    let outcome = workflows::tune::run(&config, &reporter);
    progress_handler.finish();
    let result = outcome?;

    println!(
        "✓ Best parameter: {} (score {:.6})",
        result.best_param, result.best_score
    );
    println!(
        "  {} candidate(s) scored over {} round(s).",
        result.evaluations, result.rounds
    );

    Ok(())
}
