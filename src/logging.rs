//! Diagnostic logging for Diallaleh
//!
//! Everything goes to the terminal (Info+) and to `diallaleh.log` (Debug+)
//! in the per-user log directory. `DIALLALEH_LOG=<level>` raises or lowers
//! both at once, e.g. `DIALLALEH_LOG=trace` to see every engine command.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV_VAR: &str = "DIALLALEH_LOG";

const LOG_FILE_NAME: &str = "diallaleh.log";
const ROTATED_SUFFIX: &str = "old";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Log directory: `~/Library/Logs/Diallaleh` on macOS,
/// `<data-local>/Diallaleh/logs` elsewhere
pub fn get_log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Logs").join("Diallaleh"))
    } else {
        dirs::data_local_dir().map(|d| d.join("Diallaleh").join("logs"))
    }
}

pub fn get_log_file_path() -> Option<PathBuf> {
    get_log_directory().map(|d| d.join(LOG_FILE_NAME))
}

/// Terminal and file levels, honouring the environment override
fn levels_from(override_value: Option<&str>) -> (LevelFilter, LevelFilter) {
    match override_value.map(|v| LevelFilter::from_str(v.trim())) {
        Some(Ok(level)) => (level, level),
        _ => (LevelFilter::Info, LevelFilter::Debug),
    }
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

/// Move `log_path` to `<log_path>.old` once it exceeds `max_bytes`
///
/// Returns true if the file was rotated.
fn rotate_if_large(log_path: &Path, max_bytes: u64) -> bool {
    let too_large = fs::metadata(log_path)
        .map(|m| m.len() > max_bytes)
        .unwrap_or(false);
    if !too_large {
        return false;
    }
    fs::rename(log_path, log_path.with_extension(format!("log.{}", ROTATED_SUFFIX))).is_ok()
}

fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), String> {
    fs::create_dir_all(log_dir)
        .map_err(|e| format!("Could not create log directory: {}", e))?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_large(&log_path, MAX_LOG_BYTES);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("Could not open log file: {}", e))?;
    Ok((file, log_path))
}

/// Install the global logger
///
/// Returns the log file path, or None when only terminal logging could be
/// set up.
pub fn init_logging() -> Option<PathBuf> {
    let override_value = std::env::var(LOG_LEVEL_ENV_VAR).ok();
    let (term_level, file_level) = levels_from(override_value.as_deref());

    let opened = get_log_directory()
        .ok_or_else(|| "Could not determine log directory".to_string())
        .and_then(|dir| open_log_file(&dir));

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        log_config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    let log_path = match opened {
        Ok((file, path)) => {
            loggers.push(WriteLogger::new(file_level, log_config(), file));
            Some(path)
        }
        Err(e) => {
            eprintln!("Warning: {}; logging to terminal only", e);
            None
        }
    };

    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!("=== Diallaleh session started ===");
    if let Some(ref path) = log_path {
        log::info!("Log file: {}", path.display());
    }

    log_path
}

/// Open the log directory in the file manager
pub fn open_log_directory() -> Result<(), String> {
    let log_dir =
        get_log_directory().ok_or_else(|| "Could not determine log directory".to_string())?;
    crate::viewer::open_directory(&log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_lives_in_app_log_directory() {
        let dir = get_log_directory().unwrap();
        let file = get_log_file_path().unwrap();

        assert!(dir.to_string_lossy().contains("Diallaleh"));
        assert!(file.starts_with(&dir));
        assert!(file.to_string_lossy().ends_with("diallaleh.log"));
    }

    #[test]
    fn test_levels_default_without_override() {
        assert_eq!(levels_from(None), (LevelFilter::Info, LevelFilter::Debug));
    }

    #[test]
    fn test_levels_from_override() {
        assert_eq!(
            levels_from(Some("trace")),
            (LevelFilter::Trace, LevelFilter::Trace)
        );
        assert_eq!(
            levels_from(Some(" WARN ")),
            (LevelFilter::Warn, LevelFilter::Warn)
        );
    }

    #[test]
    fn test_levels_ignore_garbage_override() {
        assert_eq!(
            levels_from(Some("loud")),
            (LevelFilter::Info, LevelFilter::Debug)
        );
    }

    #[test]
    fn test_rotate_only_when_large() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);
        fs::write(&log_path, vec![b'x'; 64]).unwrap();

        assert!(!rotate_if_large(&log_path, 1024));
        assert!(log_path.exists());

        assert!(rotate_if_large(&log_path, 16));
        assert!(!log_path.exists());
        assert!(temp_dir.path().join("diallaleh.log.old").exists());
    }

    #[test]
    fn test_rotate_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!rotate_if_large(&temp_dir.path().join(LOG_FILE_NAME), 0));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("logs");

        let (_file, path) = open_log_file(&dir).unwrap();
        assert_eq!(path, dir.join(LOG_FILE_NAME));
        assert!(path.exists());
    }
}
