//! Structured logging setup for autobench
//!
//! Events go to two places: the console (stderr) and the run log,
//! `<output>/<project>.log`. The run log is opened in append mode and shared
//! with every child process as its stderr, so Maven and JVM diagnostics end up
//! interleaved with our own events.
//!
//! Filtering follows `RUST_LOG` when it is set; otherwise the configured level
//! applies to the `autobench` target.

use anyhow::{Context, Result};
use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

pub const LOG_LEVEL_ENV: &str = "AUTOBENCH_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "AUTOBENCH_LOG_JSON";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for the `autobench` target
    pub level: Level,

    /// JSON lines on the console instead of the human format
    pub use_json: bool,

    /// Include the module target (e.g., autobench::reconcile) in console lines
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
    /// Level from the command line flags, falling back to `AUTOBENCH_LOG_LEVEL`
    ///
    /// An explicit `--log-level` wins over `-v` and `-q`. Debug and trace output
    /// also carries targets and source locations on the console.
    pub fn from_flags(log_level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        let level = if let Some(level_str) = log_level {
            parse_level(level_str)
        } else if verbose {
            Level::DEBUG
        } else if quiet {
            Level::ERROR
        } else {
            let level_str = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());
            parse_level(&level_str)
        };

        let use_json = env::var(LOG_JSON_ENV)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let detailed = matches!(level, Level::DEBUG | Level::TRACE);
        Self {
            level,
            use_json,
            include_target: detailed,
            include_location: detailed,
        }
    }
}

/// Parses a log level from a string, case-insensitively; unknown values mean INFO
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

/// The per-run log file
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Opens (or creates) the log in append mode, creating its directory if needed
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create log directory {:?}", parent))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .context(format!("Failed to open log file {:?}", path))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Another handle on the same open file; appends from both stay ordered
    pub fn handle(&self) -> io::Result<File> {
        self.file.try_clone()
    }
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("autobench={}", level)))
}

/// Installs the global subscriber; later calls are ignored
pub fn init_logging(config: LoggingConfig, run_log: Option<File>) {
    INIT.call_once(|| {
        let console = if config.use_json {
            fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .boxed()
        };

        let file_layer = run_log.map(|file| {
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file))
        });

        tracing_subscriber::registry()
            .with(env_filter(config.level))
            .with(console)
            .with(file_layer)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    #[serial]
    fn test_from_flags() {
        env::remove_var(LOG_LEVEL_ENV);
        assert_eq!(LoggingConfig::from_flags(None, false, false).level, Level::INFO);
        assert_eq!(LoggingConfig::from_flags(Some("warn"), false, false).level, Level::WARN);
        assert_eq!(LoggingConfig::from_flags(Some("warn"), true, false).level, Level::WARN);
        assert_eq!(LoggingConfig::from_flags(None, true, false).level, Level::DEBUG);
        assert_eq!(LoggingConfig::from_flags(None, false, true).level, Level::ERROR);
    }

    #[test]
    #[serial]
    fn test_debug_output_is_detailed() {
        env::remove_var(LOG_LEVEL_ENV);
        let verbose = LoggingConfig::from_flags(None, true, false);
        assert!(verbose.include_target);
        assert!(verbose.include_location);

        let normal = LoggingConfig::from_flags(None, false, false);
        assert!(!normal.include_target);
        assert!(!normal.include_location);
    }

    #[test]
    #[serial]
    fn test_from_flags_reads_env() {
        env::set_var(LOG_LEVEL_ENV, "trace");
        assert_eq!(LoggingConfig::from_flags(None, false, false).level, Level::TRACE);
        assert_eq!(LoggingConfig::from_flags(Some("info"), false, false).level, Level::INFO);
        env::remove_var(LOG_LEVEL_ENV);
    }

    #[test]
    fn test_run_log_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("app.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "earlier run\n").unwrap();

        let log = RunLog::open(&path).unwrap();
        assert_eq!(log.path(), path);
        let mut handle = log.handle().unwrap();
        writeln!(handle, "child stderr").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "earlier run\nchild stderr\n");
    }

    #[test]
    fn test_run_log_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/results/app.log");
        RunLog::open(&path).unwrap();
        assert!(path.is_file());
    }
}
