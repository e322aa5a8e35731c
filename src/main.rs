use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use player_stats::config::Config;
use player_stats::extractor::Extractor;
use player_stats::roster::load_roster;
use player_stats::runner::run_batch;

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = Config::from_env();
    let roster = load_roster(&config.roster_path).context("load player roster")?;
    let extractor = Extractor::from_config(config)?;

    let summary = run_batch(&extractor, &roster);
    println!(
        "Players: {}/{} ok, {} files written",
        summary.players_succeeded,
        summary.players_total,
        summary.written.len()
    );
    for err in &summary.errors {
        println!("ERR {err}");
    }
    Ok(())
}
