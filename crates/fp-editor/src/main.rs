//! Replay a recorded wall-drawing script and print the resulting floor plan

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fp_editor::ConfigManager;
use fp_editor::replay::{ReplayError, load_script, replay};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Replay script (RON list of input events)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Editor configuration file, instead of the one in the OS config directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fp_editor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, ReplayError> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    tracing::info!("Replaying {:?}", args.script);
    let events = load_script(&args.script)?;
    let report = replay(&events, manager.config())?;
    tracing::info!(
        "Replayed {} events: {} walls, {} junctions",
        events.len(),
        report.walls.len(),
        report.junctions.len()
    );
    report.to_ron()
}
