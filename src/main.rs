use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;
use tracing::{error, info};

use metrics_dash::app::App;
use metrics_dash::cli::{Cli, Commands, ConfigCommands, OutputFormat};
use metrics_dash::core::MetricsClient;
use metrics_dash::screens::model::Panels;
use metrics_dash::screens::report::render_report;
use metrics_dash::utils::{init_logging, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry METRICS_DASH_ENDPOINT; clap reads it from the environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logging is best-effort; the dashboard still works without a log file.
    // The guard flushes buffered events on exit.
    let _log_guard = match init_logging() {
        Ok((_, guard)) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    let config = AppConfig::load()?.with_overrides(cli.endpoint.clone(), cli.timeout);

    match cli.command {
        None => {
            info!(endpoint = %config.endpoint, "Starting dashboard");
            let mut app = App::new(&config)?;
            app.run().await?;
        }
        Some(Commands::Snapshot { format, no_color }) => {
            handle_snapshot(&config, format, no_color).await?;
        }
        Some(Commands::Config { command }) => {
            handle_config(config, command)?;
        }
    }

    Ok(())
}

async fn handle_snapshot(config: &AppConfig, format: OutputFormat, no_color: bool) -> Result<()> {
    let client = MetricsClient::new(&config.endpoint, config.request_timeout())?;
    let interactive = std::io::stderr().is_terminal();

    let spinner = if interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        pb.set_message(format!("Fetching {}", client.url()));
        pb.enable_steady_tick(config.spinner_interval().max(Duration::from_millis(50)));
        Some(pb)
    } else {
        None
    };

    let result = client.fetch().await;

    // Stop the spinner on every path before printing
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Snapshot fetch failed");
            println!("✗ {}", e);
            bail!("failed to fetch metrics from {}", client.url());
        }
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Text => {
            let color = !no_color && std::io::stdout().is_terminal();
            print!("{}", render_report(&Panels::from_snapshot(&snapshot), color));
        }
    }

    Ok(())
}

fn handle_config(mut config: AppConfig, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::View => {
            println!("Configuration ({}):\n", AppConfig::config_path()?.display());
            println!("{:<25} {}", "endpoint", config.endpoint);
            println!(
                "{:<25} {}",
                "request timeout",
                humantime::format_duration(config.request_timeout())
            );
            println!(
                "{:<25} {}",
                "spinner interval",
                humantime::format_duration(config.spinner_interval())
            );
            println!(
                "{:<25} {}",
                "metrics url",
                metrics_dash::core::client::metrics_url(&config.endpoint)
            );
        }
        ConfigCommands::Validate => {
            let errors = config.validate();

            if errors.is_empty() {
                println!("✓ Configuration is valid");
            } else {
                println!("✗ Configuration errors:");
                for error in &errors {
                    println!("  - {}", error);
                }
                bail!("{} configuration error(s)", errors.len());
            }
        }
        ConfigCommands::SetEndpoint { url } => {
            // Persist against the file contents, not CLI/env overrides
            let mut stored = AppConfig::load()?;
            stored.endpoint = url.trim().to_string();
            let errors = stored.validate();
            if !errors.is_empty() {
                bail!("Invalid endpoint: {}", errors.join("; "));
            }
            stored.save()?;
            config.endpoint = stored.endpoint;
            println!("✓ Endpoint set to {}", config.endpoint);
        }
        ConfigCommands::SetTimeout { seconds } => {
            if seconds == 0 {
                bail!("Timeout must be greater than 0");
            }
            let mut stored = AppConfig::load()?;
            stored.request_timeout_secs = seconds;
            stored.save()?;
            println!(
                "✓ Request timeout set to {}",
                humantime::format_duration(Duration::from_secs(seconds))
            );
        }
    }

    Ok(())
}
