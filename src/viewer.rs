//! Hand files to the platform's default viewer/player

use std::path::Path;
use std::process::Command;

/// MIME type hint passed along with converted files
pub const AUDIO_MIME_HINT: &str = "audio/*";

/// Open a file with the system's default application for `mime_hint`
///
/// Fails with "File does not exist" if the file is missing.
pub fn open_file(path: &Path, mime_hint: &str) -> Result<(), String> {
    if !path.is_file() {
        return Err("File does not exist".to_string());
    }

    log::info!("Opening {} ({})", path.display(), mime_hint);
    launch(path)
}

/// Reveal a directory in the system file manager
pub fn open_directory(path: &Path) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("Directory does not exist: {}", path.display()));
    }
    launch(path)
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(windows)]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    // Empty title argument so paths with spaces aren't taken as the title
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

fn launch(path: &Path) -> Result<(), String> {
    opener(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.mp3");
        let err = open_file(&missing, AUDIO_MIME_HINT).unwrap_err();
        assert_eq!(err, "File does not exist");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(open_file(temp_dir.path(), AUDIO_MIME_HINT).is_err());
    }

    #[test]
    fn test_open_missing_directory() {
        assert!(open_directory(Path::new("/nonexistent/diallaleh-dir")).is_err());
    }
}
