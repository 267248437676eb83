use clap::Parser;
use tracing::info;

use prdash::cli::{Cli, CliCommand};
use prdash::config::Config;
use prdash::error::Result;
use prdash::service::ReviewService;
use prdash::store::DirStore;

fn init_logging() {
    // stdout carries the JSON payload; logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    info!("prdash starting");

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(?config, "config loaded");

    if let Err(e) = run(&cli, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let store = DirStore::new(&config.reviews_dir);
    let service = ReviewService::new(store, config.estimation);

    let payload = match cli.command {
        CliCommand::Reports => {
            let reports = service.list_reports(chrono::Utc::now())?;
            encode(&reports, cli.pretty)?
        }
        CliCommand::Metrics => {
            let metrics = service.corpus_metrics()?;
            encode(&metrics, cli.pretty)?
        }
    };

    println!("{payload}");
    Ok(())
}

fn encode<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
