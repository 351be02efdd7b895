/// CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};

// Build timestamp injected at compile time
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(name = "metrics-dash")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// Base URL of the metrics service (the /json path is appended)
    #[arg(short, long, global = true, env = "METRICS_DASH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one snapshot and print it
    Snapshot {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// View effective configuration
    View,

    /// Validate the configuration file
    Validate,

    /// Persist the metrics service base URL
    SetEndpoint { url: String },

    /// Persist the request timeout in seconds
    SetTimeout { seconds: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_snapshot_json() {
        let cli = Cli::parse_from(["metrics-dash", "--endpoint", "http://h:1", "snapshot", "--format", "json"]);
        assert_eq!(cli.endpoint.as_deref(), Some("http://h:1"));
        assert!(matches!(
            cli.command,
            Some(Commands::Snapshot { format: OutputFormat::Json, no_color: false })
        ));
    }

    #[test]
    fn test_no_command_launches_tui() {
        let cli = Cli::parse_from(["metrics-dash", "-t", "3"]);
        assert_eq!(cli.timeout, Some(3));
        assert!(cli.command.is_none());
    }
}
