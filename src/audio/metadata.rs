use std::fs::File;
use std::path::Path;

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Details shown for the selected input file
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDetails {
    /// Short codec name, e.g. "aac" or "pcm_s16le"
    pub codec: String,
    /// Duration in seconds (0 when the container doesn't say)
    pub duration_secs: f64,
    pub size_bytes: u64,
}

/// Probe an audio file's container for codec and duration
pub fn probe_audio(path: &Path) -> Result<AudioDetails, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let size_bytes = file
        .metadata()
        .map_err(|e| format!("Failed to get file metadata: {}", e))?
        .len();
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("Failed to probe audio format: {}", e))?;

    let format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| "No default track found".to_string())?;

    let duration_secs = match (track.codec_params.n_frames, track.codec_params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => frames as f64 / rate as f64,
        _ => 0.0,
    };

    let codec = symphonia::default::get_codecs()
        .get_codec(track.codec_params.codec)
        .map(|descriptor| descriptor.short_name.to_string())
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
        })
        .unwrap_or_else(|| "unknown".to_string());

    log::debug!(
        "Probed {:?}: codec={}, duration={:.1}s",
        path.file_name(),
        codec,
        duration_secs
    );

    Ok(AudioDetails {
        codec,
        duration_secs,
        size_bytes,
    })
}

/// Format a byte count for display
pub fn format_size(bytes: u64) -> String {
    const MB: f64 = 1_000_000.0;
    const KB: f64 = 1_000.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.0} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Format seconds as m:ss or h:mm:ss
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    /// Write a mono 16-bit PCM WAV of `secs` seconds of silence
    fn write_wav(path: &Path, sample_rate: u32, secs: u32) {
        let data_len = sample_rate * secs * 2;
        let mut f = File::create(path).unwrap();
        f.write_all(b"RIFF").unwrap();
        f.write_all(&(36 + data_len).to_le_bytes()).unwrap();
        f.write_all(b"WAVEfmt ").unwrap();
        f.write_all(&16u32.to_le_bytes()).unwrap();
        f.write_all(&1u16.to_le_bytes()).unwrap(); // PCM
        f.write_all(&1u16.to_le_bytes()).unwrap(); // mono
        f.write_all(&sample_rate.to_le_bytes()).unwrap();
        f.write_all(&(sample_rate * 2).to_le_bytes()).unwrap();
        f.write_all(&2u16.to_le_bytes()).unwrap();
        f.write_all(&16u16.to_le_bytes()).unwrap();
        f.write_all(b"data").unwrap();
        f.write_all(&data_len.to_le_bytes()).unwrap();
        f.write_all(&vec![0u8; data_len as usize]).unwrap();
    }

    #[test]
    fn test_probe_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path, 8000, 2);

        let details = probe_audio(&path).unwrap();
        assert!(details.codec.contains("pcm"), "codec was {}", details.codec);
        assert!((details.duration_secs - 2.0).abs() < 0.01);
        assert_eq!(details.size_bytes, 44 + 8000 * 2 * 2);
    }

    #[test]
    fn test_probe_rejects_non_audio() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.m4a");
        fs::write(&path, b"definitely not audio").unwrap();

        assert!(probe_audio(&path).is_err());
    }

    #[test]
    fn test_probe_missing_file() {
        assert!(probe_audio(Path::new("/nonexistent/file.m4a")).is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(65.4), "1:05");
        assert_eq!(format_duration(3725.0), "1:02:05");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(4_100), "4 KB");
        assert_eq!(format_size(4_100_000), "4.1 MB");
    }
}
