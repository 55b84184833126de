// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry initialization and configuration.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log file name inside the state directory.
pub const LOG_FILE_NAME: &str = "straico.log";

/// Where the interactive client writes its log.
///
/// Uses the platform state directory, falling back to the cache directory
/// on platforms that have none.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join(crate::config::CONFIG_DIR_NAME).join(LOG_FILE_NAME))
}

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default log level if RUST_LOG is not set.
    pub default_level: Level,

    /// Whether to include file/line information.
    pub include_file_line: bool,

    /// Whether to include target module path.
    pub include_target: bool,

    /// Whether to use ANSI colors in output. Forced off for log files.
    pub ansi_colors: bool,

    /// Custom filter directive (overrides default_level).
    pub filter_directive: Option<String>,

    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
            filter_directive: None,
            log_file: None,
        }
    }
}

impl TelemetryConfig {
    /// Config for the full-screen client: the terminal belongs to the UI,
    /// so everything goes to a file.
    pub fn interactive(log_file: impl Into<PathBuf>) -> Self {
        Self {
            ansi_colors: false,
            log_file: Some(log_file.into()),
            ..Self::default()
        }
    }

    /// Config for one-shot commands: warnings only, on stderr.
    pub fn command_line() -> Self {
        Self {
            default_level: Level::WARN,
            include_target: false,
            ..Self::default()
        }
    }

    /// Set the default log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set a custom filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_directive = Some(filter.into());
        self
    }

    /// Include source file and line in each event.
    pub fn with_file_line(mut self, enabled: bool) -> Self {
        self.include_file_line = enabled;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi_colors = ansi;
        self
    }

    fn build_filter(&self) -> EnvFilter {
        // RUST_LOG wins unless an explicit directive was configured.
        match &self.filter_directive {
            Some(directive) => EnvFilter::try_new(directive)
                .unwrap_or_else(|_| EnvFilter::new(self.default_level.to_string())),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_level.to_string())),
        }
    }
}

/// Guard returned by [`init_telemetry`].
///
/// Keep this guard alive for the duration of the program.
pub struct TelemetryGuard {
    log_file: Option<PathBuf>,
}

impl TelemetryGuard {
    /// The file logs are written to, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

fn open_log_file(path: &Path) -> io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize telemetry with the given configuration.
///
/// This should be called once at application startup.
///
/// # Example
///
/// ```rust,ignore
/// use straico::telemetry::{init_telemetry, TelemetryConfig};
///
/// let _guard = init_telemetry(&TelemetryConfig::command_line())?;
/// ```
pub fn init_telemetry(config: &TelemetryConfig) -> io::Result<TelemetryGuard> {
    let filter = config.build_filter();

    let (writer, ansi) = match &config.log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), config.ansi_colors),
    };

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    Ok(TelemetryGuard {
        log_file: config.log_file.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.ansi_colors);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_telemetry_config_interactive() {
        let config = TelemetryConfig::interactive("/tmp/straico.log");
        assert!(!config.ansi_colors);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/straico.log")));
    }

    #[test]
    fn test_telemetry_config_command_line() {
        let config = TelemetryConfig::command_line();
        assert_eq!(config.default_level, Level::WARN);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_telemetry_config_builder() {
        let config = TelemetryConfig::default()
            .with_level(Level::DEBUG)
            .with_filter("straico=trace")
            .with_file_line(true)
            .with_ansi(false);

        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.filter_directive, Some("straico=trace".to_string()));
        assert!(config.include_file_line);
        assert!(!config.ansi_colors);
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state").join(LOG_FILE_NAME);
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_default_log_path_name() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with(LOG_FILE_NAME));
        }
    }
}
