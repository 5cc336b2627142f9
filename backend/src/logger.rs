use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing_subscriber::EnvFilter;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages
///
/// The level can be set via the `LOG_LEVEL` environment variable or at runtime
/// using `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive).
    ///
    /// Valid values: "silent", "error", "warn", "info", "debug"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

/// Rotates log files, keeping only the last 5 rotated files next to `log_file`.
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match log_file.try_exists() {
        Ok(true) => {}
        // Nothing to rotate, or not allowed to look
        Ok(false) | Err(_) => return Ok(()),
    }

    let metadata = std::fs::metadata(log_file)?;
    let modified = metadata.modified()?;

    let datetime: DateTime<Local> = modified.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let stem = log_file.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
    let new_path = parent.join(format!("{}.{}.txt", stem, timestamp));

    std::fs::rename(log_file, &new_path)?;

    let rotated_prefix = format!("{}.", stem);
    let current_name = log_file.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                filename.starts_with(&rotated_prefix) && filename.ends_with(".txt") && filename != current_name
            } else {
                false
            }
        })
        .collect();

    // Sort by filename, which sorts by datetime
    log_files.sort();

    if log_files.len() > 5 {
        for file in &log_files[0..log_files.len() - 5] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

pub struct Logger {
    log_file: Option<PathBuf>,
    enable_print_log: bool,
    level: Arc<Mutex<Level>>,
}

impl Logger {
    /// Configure from the environment:
    ///
    /// - `LOG_FILE`: append log lines to this file (rotated on start)
    /// - `DISABLE_LOG=true`: never write the log file
    /// - `ENABLE_PRINT_LOG=false`: don't print through tracing
    /// - `LOG_LEVEL`: see [`Level`]
    pub fn new() -> Self {
        let disable_log = std::env::var("DISABLE_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let log_file = if disable_log {
            None
        } else {
            std::env::var("LOG_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        if let Some(path) = &log_file {
            if let Err(e) = rotate_log_files(path) {
                eprintln!("Failed to rotate log files: {}", e);
            }
        }

        let enable_print_log = std::env::var("ENABLE_PRINT_LOG")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_str(&v))
            .unwrap_or(Level::Info);

        Logger {
            log_file,
            enable_print_log,
            level: Arc::new(Mutex::new(level)),
        }
    }

    /// Levels are gated by [`Level`], so the default filter lets everything through.
    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(log_file) = &self.log_file else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        let log_line = format!("[{}] {}\n", timestamp, message);

        file.write_all(log_line.as_bytes())?;

        Ok(())
    }

    fn enabled(&self, at: Level) -> bool {
        self.level.lock().map(|l| *l >= at).unwrap_or(true)
    }

    pub fn debug(&self, msg: &str) {
        if !self.enabled(Level::Debug) {
            return;
        }
        if self.enable_print_log {
            tracing::debug!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("DEBUG: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.enabled(Level::Info) {
            return;
        }
        if self.enable_print_log {
            tracing::info!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("INFO: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.enabled(Level::Warn) {
            return;
        }
        if self.enable_print_log {
            tracing::warn!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("WARN: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn error(&self, msg: &str) {
        if !self.enabled(Level::Error) {
            return;
        }
        if self.enable_print_log {
            tracing::error!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("ERROR: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    /// Returns Level::Info if the lock is poisoned.
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new()
    }
}

// Global logger instance
pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    TRACING_INITIALIZED.get_or_init(|| {
        // Fails if the host application already installed a subscriber, which is fine.
        let _ = Logger::init_tracing();
    });

    let logger = LOGGER.get_or_init(Logger::new);

    f(logger)
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.info(msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}

/// Set the log level from a string (case insensitive).
///
/// Returns true if successful, false if the string is not a valid level.
pub fn set_log_level_str(level_str: &str) -> bool {
    if let Some(level) = Level::from_str(level_str) {
        set_log_level(level);
        true
    } else {
        false
    }
}

/// Format a duration as HH:MM:SS.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::from_str("warn"), Some(Level::Warn));
        assert_eq!(Level::from_str("verbose"), None);
        assert!(Level::Debug > Level::Info);
        assert!(Level::Silent < Level::Error);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_duration(Duration::from_millis(900)), "00:00:00");
    }

    #[test]
    fn test_logger_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("log.txt");
        let logger = Logger {
            log_file: Some(log_file.clone()),
            enable_print_log: false,
            level: Arc::new(Mutex::new(Level::Warn)),
        };

        logger.info("hidden");
        logger.warn("shown");
        logger.set_level(Level::Debug);
        logger.debug("also shown");

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(!content.contains("hidden"));
        assert!(content.contains("WARN: shown"));
        assert!(content.contains("DEBUG: also shown"));
    }

    #[test]
    fn test_rotate_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("log.txt");
        std::fs::write(&log_file, "old").unwrap();

        rotate_log_files(&log_file).unwrap();

        assert!(!log_file.exists());
        let rotated: Vec<_> = std::fs::read_dir(dir.path()).unwrap()
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        assert_eq!(rotated.len(), 1);
        assert!(rotated[0].starts_with("log.") && rotated[0].ends_with(".txt"));
    }
}
