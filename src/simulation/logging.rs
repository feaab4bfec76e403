//! Logging and tracing configuration
//!
//! Diagnostics go through `tracing`. The simulation's own output (train
//! records, statistics) is written separately by the front end.

use std::error::Error;
use std::io;
use tracing::{debug, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Error returned when a subscriber cannot be installed
pub type LoggingError = Box<dyn Error + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Maximum level for the crate's own events
    pub level: Level,
    /// Emit JSON lines instead of human-readable output
    pub json_format: bool,
    /// Also write to a daily rolling file
    pub log_to_file: bool,
    /// Directory of the rolling file
    pub log_directory: Option<String>,
    /// File name prefix of the rolling file
    pub log_file_prefix: String,
    /// Log span enter/exit
    pub enable_span_events: bool,
    /// ANSI colors on the console
    pub enable_ansi: bool,
    /// Overrides both `level` and `RUST_LOG`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_to_file: false,
            log_directory: None,
            log_file_prefix: "rail-network-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

/// Keeps the background log writers alive; drop it to flush and stop them
#[derive(Debug)]
#[must_use = "dropping the guard stops the background log writers"]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_to_file = true;
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither `env_filter` nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            self.level
        )
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.env_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn console_layer(&self, guards: &mut Vec<WorkerGuard>) -> BoxedLayer {
        let (writer, guard) = non_blocking(io::stderr());
        guards.push(guard);
        if self.json_format {
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_span_events(self.span_events())
                .boxed()
        } else {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(writer)
                .with_ansi(self.enable_ansi)
                .with_span_events(self.span_events())
                .boxed()
        }
    }

    // Files always get JSON lines
    fn file_layer(&self, guards: &mut Vec<WorkerGuard>) -> BoxedLayer {
        let directory = self.log_directory.as_deref().unwrap_or("logs");
        let appender = rolling::daily(directory, &self.log_file_prefix);
        let (writer, guard) = non_blocking(appender);
        guards.push(guard);
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(self.span_events())
            .boxed()
    }

    /// Install the global tracing subscriber
    ///
    /// Fails if the filter does not parse or a global subscriber is already set.
    pub fn init(self) -> Result<LoggingGuard, LoggingError> {
        let filter = self.build_filter()?;
        let mut guards = Vec::new();
        let mut layers = vec![self.console_layer(&mut guards)];
        if self.log_to_file {
            layers.push(self.file_layer(&mut guards));
        }

        Registry::default().with(layers).with(filter).try_init()?;
        debug!("Logging initialized: {:?}", self);
        Ok(LoggingGuard { _guards: guards })
    }

    /// Initialize logging for development (pretty console output)
    pub fn init_dev() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }

    /// Initialize logging for production (JSON format with file logging)
    pub fn init_prod(log_dir: impl Into<String>) -> Result<LoggingGuard, LoggingError> {
        Self::new()
            .with_level(Level::INFO)
            .with_json_format()
            .with_file_logging(log_dir)
            .without_ansi()
            .init()
    }

    /// Initialize logging for tests; a subscriber installed by an earlier
    /// test is kept
    pub fn init_test() -> Option<LoggingGuard> {
        Self::new().with_level(Level::WARN).without_ansi().init().ok()
    }

    /// Initialize verbose logging (INFO level with span events)
    pub fn init_verbose() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::INFO).with_span_events().init()
    }

    /// Initialize debug logging (DEBUG level with span events)
    pub fn init_debug() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::DEBUG).with_span_events().init()
    }
}

/// Structured log event tagged with the simulation component
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            component = "simulation",
            $($key = $value,)*
            "{}",
            $message
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(component = "simulation", "{}", $message);
    };
}

/// Span measuring one stretch of simulation work
#[macro_export]
macro_rules! perf_span {
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info_span!(
            $name,
            component = "performance",
            $($key = $value,)*
        )
    };
    ($name:expr) => {
        tracing::info_span!($name, component = "performance")
    };
}
