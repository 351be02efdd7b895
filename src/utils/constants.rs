/// Defaults and fixed names

pub const APP_DIR_NAME: &str = "metrics-dash";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "metrics-dash.log";

/// Environment variable overriding the log file path
pub const LOG_PATH_ENV: &str = "METRICS_DASH_LOG";

/// The metrics service listens on 8080 and mounts `/json` at the root
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SPINNER_INTERVAL_MS: u64 = 100;
pub const MIN_SPINNER_INTERVAL_MS: u64 = 10;

/// Terminal event poll period
pub const EVENT_POLL_MS: u64 = 100;
