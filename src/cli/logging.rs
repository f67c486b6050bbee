//! Logging setup for the keypath CLI
//!
//! The library only emits `tracing` events; the binary decides where they go.
//! Logs are written to stderr so stdout stays clean JSON.

use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level filter, in `EnvFilter` syntax
    pub level: String,
    /// Include module targets in each line
    pub targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            targets: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from the number of `-v` flags
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {}
            1 => config.level = "info".to_string(),
            2 => config.level = "debug".to_string(),
            _ => {
                config.level = "trace".to_string();
                config.targets = true;
            }
        }

        config
    }

    /// Apply environment overrides. `RUST_LOG` takes precedence.
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            if !rust_log.trim().is_empty() {
                self.level = rust_log;
            }
        }
    }

    /// Install the global subscriber. A second call is a no-op.
    pub fn init(&self) {
        let filter = EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("warn"));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(self.targets)
            .try_init();

        if installed.is_err() {
            tracing::debug!("logging already initialised");
        }
    }
}
