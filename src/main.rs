//! dubmerge command line entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dubmerge::cli::Args;
use dubmerge::command::{DryRunRemuxer, FfmpegRemuxer, Remuxer};
use dubmerge::config::{LogFormat, LoggingConfig};
use dubmerge::config_file::load_or_default;
use dubmerge::probe::FfprobeProber;
use dubmerge::{prepare_merge, MergeConfig, Result};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "dubmerge";

fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let (config_path, explicit) = args.config_path();
    let (config, load_error) = load_or_default(&config_path, explicit);

    init_logging(&config.logging);
    tracing::debug!("{} v{} starting", APP_NAME, VERSION);
    if let Some(e) = load_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path.display(),
            e
        );
    }
    tracing::debug!("Configuration loaded: {:?}", config);

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &MergeConfig) -> Result<()> {
    let prober = FfprobeProber::new(config.tools.ffprobe.clone());
    let prepared = prepare_merge(&args.merge_request(), config, &prober)?;

    if args.json {
        let json = serde_json::to_string_pretty(&prepared.command)
            .map_err(|e| dubmerge::MergeError::Config(format!("cannot encode command: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}", prepared.command.command_line());
    }

    let remuxer: Box<dyn Remuxer> = if args.dry_run {
        Box::new(DryRunRemuxer)
    } else {
        Box::new(FfmpegRemuxer)
    };
    prepared.execute(remuxer.as_ref())?;

    if !args.dry_run {
        println!("Wrote {}", prepared.command.output_path.display());
    }
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
