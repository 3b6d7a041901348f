//! Audio conversion module
//!
//! Locates the ffmpeg binary, prepares output paths, and runs conversions
//! through the [`ConversionEngine`].

mod engine;

pub use engine::{ConversionEngine, EngineEvent, ExecutionId, ReturnCode};

use std::path::{Path, PathBuf};

/// Environment variable overriding the ffmpeg location
pub const FFMPEG_ENV_VAR: &str = "DIALLALEH_FFMPEG";

#[cfg(windows)]
const FFMPEG_BINARY: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const FFMPEG_BINARY: &str = "ffmpeg";

/// Get the path to the ffmpeg binary
///
/// Search order:
/// 1. `DIALLALEH_FFMPEG`
/// 2. CARGO_MANIFEST_DIR/resources/bin/ffmpeg (development)
/// 3. Next to the executable, including the macOS bundle Resources dir
/// 4. `ffmpeg` on PATH
pub fn get_ffmpeg_path() -> Result<PathBuf, String> {
    if let Ok(env_path) = std::env::var(FFMPEG_ENV_VAR) {
        let env_path = PathBuf::from(env_path);
        if env_path.exists() {
            log::debug!("Found ffmpeg via {}: {:?}", FFMPEG_ENV_VAR, env_path);
            return Ok(env_path);
        }
        log::warn!("{} points to missing file {:?}", FFMPEG_ENV_VAR, env_path);
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let dev_path = PathBuf::from(manifest_dir)
            .join("resources")
            .join("bin")
            .join(FFMPEG_BINARY);

        if dev_path.exists() {
            log::debug!("Found ffmpeg at development path: {:?}", dev_path);
            return Ok(dev_path);
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            // macOS app bundle: Contents/MacOS/../Resources/bin/ffmpeg
            let bundle_path = exe_dir
                .join("..")
                .join("Resources")
                .join("bin")
                .join(FFMPEG_BINARY);

            if bundle_path.exists() {
                log::debug!("Found ffmpeg at bundle path: {:?}", bundle_path);
                return Ok(bundle_path);
            }

            let local_path = exe_dir.join("resources").join("bin").join(FFMPEG_BINARY);
            if local_path.exists() {
                log::debug!("Found ffmpeg at local path: {:?}", local_path);
                return Ok(local_path);
            }
        }
    }

    if let Some(path) = find_on_path(FFMPEG_BINARY) {
        log::debug!("Found ffmpeg on PATH: {:?}", path);
        return Ok(path);
    }

    Err("ffmpeg binary not found. Install ffmpeg or set DIALLALEH_FFMPEG".to_string())
}

fn find_on_path(binary: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

/// Get the output directory for converted files
///
/// `~/Music/Diallaleh` where a music directory exists, otherwise
/// `<data dir>/Diallaleh/Music`.
pub fn get_output_dir() -> Result<PathBuf, String> {
    if let Some(audio_dir) = dirs::audio_dir() {
        return Ok(audio_dir.join("Diallaleh"));
    }

    dirs::data_dir()
        .map(|d| d.join("Diallaleh").join("Music"))
        .ok_or_else(|| "Could not determine output directory".to_string())
}

/// Create the output directory if it doesn't exist
pub fn ensure_output_dir(output_dir: &Path) -> Result<(), String> {
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| format!("Failed to create output directory: {}", e))?;
        log::info!("Created output directory: {:?}", output_dir);
    }
    Ok(())
}

/// Verify that converted files can be written to `output_dir`
pub fn check_storage_access(output_dir: &Path) -> Result<(), String> {
    ensure_output_dir(output_dir)?;

    let probe = output_dir.join(".diallaleh-write-test");
    std::fs::write(&probe, b"")
        .map_err(|e| format!("Output directory is not writable: {}", e))?;
    let _ = std::fs::remove_file(&probe);
    Ok(())
}

/// Output path for a source file: same stem, `.mp3` extension
pub fn output_path_for(input_path: &Path, output_dir: &Path) -> PathBuf {
    let file_stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}.mp3", file_stem))
}

/// Build the engine arguments for converting `input_path` to `output_path`
///
/// -nostdin / -y : never block on an overwrite prompt
/// -i <input>    : input file
/// <output>      : output file, format inferred from the .mp3 extension
pub fn conversion_args(input_path: &Path, output_path: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input_path.to_string_lossy().into_owned(),
        output_path.to_string_lossy().into_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_replaces_extension() {
        let out = output_path_for(Path::new("/music/Song Title.m4a"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/Song Title.mp3"));
    }

    #[test]
    fn test_output_path_without_extension() {
        let out = output_path_for(Path::new("/music/recording"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/recording.mp3"));
    }

    #[test]
    fn test_conversion_args_input_then_output() {
        let args = conversion_args(Path::new("/in/a.m4a"), Path::new("/out/a.mp3"));
        let i = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[i + 1], "/in/a.m4a");
        assert_eq!(args.last().map(String::as_str), Some("/out/a.mp3"));
    }

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("a").join("b");
        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_check_storage_access_leaves_no_probe() {
        let temp_dir = TempDir::new().unwrap();
        check_storage_access(temp_dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_get_output_dir_mentions_app() {
        if let Ok(dir) = get_output_dir() {
            assert!(dir.to_string_lossy().contains("Diallaleh"));
        }
    }
}
