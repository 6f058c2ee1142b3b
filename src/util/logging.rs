//! Structured logging setup for compdb
//!
//! Logs are written to stderr so they never mix with a compilation database
//! written to stdout by callers of the library.
//!
//! # Example
//!
//! ```no_run
//! use compdb::util::logging;
//!
//! // With environment: COMPDB_LOG_LEVEL=debug
//! logging::init_from_env();
//!
//! tracing::debug!("[pid: {}] command: {}", 42, "gcc -c a.c");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable with the default log level
pub const LOG_LEVEL_ENV: &str = "COMPDB_LOG_LEVEL";
/// Environment variable switching on JSON log lines
pub const LOG_JSON_ENV: &str = "COMPDB_LOG_JSON";

static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level of the compdb events
    pub level: Level,

    /// One JSON object per log line
    pub use_json: bool,

    /// Include the module target (e.g., compdb::semantic::pipeline) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Reads `COMPDB_LOG_LEVEL` and `COMPDB_LOG_JSON`, defaults for anything unset
    pub fn from_env() -> Self {
        let level = env::var(LOG_LEVEL_ENV)
            .map(|value| parse_level(&value))
            .unwrap_or(Level::INFO);
        let use_json = env::var(LOG_JSON_ENV)
            .ok()
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }

    /// Filter directive for the compdb targets
    fn directive(&self) -> String {
        format!("compdb={}", self.level)
    }
}

/// Parses a log level from a string, case-insensitive
///
/// Unknown names fall back to `INFO` with a warning on stderr.
///
/// ```
/// use compdb::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Level::DEBUG);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the `tracing` subscriber, later calls are ignored
///
/// `RUST_LOG`, when set, takes over the filtering entirely.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            let mut filter = EnvFilter::new("warn");
            if let Ok(directive) = config.directive().parse() {
                filter = filter.add_directive(directive);
            }
            filter
        };

        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    });
}

/// Initializes logging from `COMPDB_LOG_LEVEL` and `COMPDB_LOG_JSON`
pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}
