//! shoutscope CLI - main entry point

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use shoutscope_cli::{app::ShoutscopeApp, cli::Cli, config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::example_config());
        return Ok(());
    }

    setup_logging(cli.verbose);

    let mut config = load_configuration(&cli)?;
    if let Some(name) = &cli.name {
        config.node.name = name.clone();
    }
    config.validate()?;

    let app = match ShoutscopeApp::start(config, !cli.no_simulation).await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let session = app.run_interactive().await;
    if let Err(e) = &session {
        error!("Interactive session failed: {}", e);
    }
    app.stop().await?;
    session?;

    info!("shoutscope exited successfully");
    Ok(())
}

/// Setup logging based on verbosity level
///
/// Logs go to stderr so they never interleave with shouts on stdout.
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    let Some(config_path) = &cli.config else {
        info!("Using default configuration");
        return Ok(AppConfig::default());
    };

    info!("Loading configuration from: {}", config_path);
    let config = AppConfig::load_from_file(config_path)
        .with_context(|| format!("Failed to load configuration file {}", config_path))?;
    Ok(config)
}
