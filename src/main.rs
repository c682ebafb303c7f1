use std::process::ExitCode;

use clap::Parser;
use nodestats::config::{Cli, StatsConfig};
use nodestats::driver;
use nodestats::logger::{self, log, LogSeverity::*};
use nodestats::store::SqliteStore;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.log_level);

    let store = match SqliteStore::open(&cli.world) {
        Ok(store) => store,
        Err(open_error) => {
            log(format!("Failed to open world: {}", open_error), Fatal);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log("Interrupted, abandoning remaining map blocks".to_owned(), Warning);
            interrupt.cancel();
        }
    });

    let config = StatsConfig::from(&cli);
    let report = match driver::run(store, &config, cancel).await {
        Ok(report) => report,
        Err(run_error) => {
            log(format!("{}", run_error), Fatal);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(json_error) => {
                log(format!("Failed to serialize report: {}", json_error), Fatal);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report);
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
