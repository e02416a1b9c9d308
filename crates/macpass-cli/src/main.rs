//! macpass - request temporary network access for a hardware address
//!
//! Authenticates the user against the directory, asks for a MAC address
//! and a duration, and hands the request to the local macpass daemon.

mod dispatch;
mod pipeline;
mod prompt;

use clap::Parser;
use colored::Colorize;
use dispatch::UnixSocketNotifier;
use macpass_auth::LdapConnector;
use macpass_core::{Error, MacpassConfig};
use pipeline::Pipeline;
use prompt::TerminalPrompter;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "macpass")]
#[command(author = "Macpass Team")]
#[command(version = macpass_core::VERSION)]
#[command(about = "Request temporary network access for a hardware address", long_about = None)]
struct Cli {
    /// Configuration file path (default: config.toml next to the executable)
    #[arg(short, long, env = "MACPASS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MACPASS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompts
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = load_config(cli.config.as_deref())?;

    let connector = LdapConnector::new(&config);
    let notifier = UnixSocketNotifier::new(&config.socket_path, config.timeout());
    let mut prompter = TerminalPrompter::new();

    let mut pipeline = Pipeline::new(&config, &connector, &notifier);
    let request = match pipeline.run(&mut prompter).await {
        Ok(request) => request,
        Err(e) => {
            error!(stage = %pipeline.stage(), "{}", diagnostic(&e));
            std::process::exit(1);
        }
    };

    println!("{} {}", "✓".green(), request.summary());

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MacpassConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => MacpassConfig::default_path()?,
    };

    let mut config = MacpassConfig::from_file(&path)?;
    config.apply_env();
    config.validate()?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// `<kind>: <message>`, the single line reported for a failed run
fn diagnostic(e: &Error) -> String {
    format!("{}: {}", e.kind(), e)
}
