//! Converted files list
//!
//! The list of converted output paths is persisted as a single preference
//! string: every entry is followed by a comma, e.g. `/a.mp3,/b.mp3,`.
//! There is no escaping, so paths containing the delimiter are refused.

use std::path::{Path, PathBuf};

use super::Preferences;

/// Preference key holding the serialized list
pub const PREFS_KEY_CONVERTED_FILES: &str = "converted_files";

/// Entry delimiter in the serialized list
pub const DELIMITER: char = ',';

/// Outcome of appending a path to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Path was new and has been stored
    Added,
    /// Path was already present; nothing changed
    AlreadyPresent,
}

/// Split a serialized list into its non-empty entries, in order
pub fn decode(serialized: &str) -> Vec<PathBuf> {
    serialized
        .split(DELIMITER)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Append `path` to a serialized list
///
/// Returns the new serialized string, or `None` when the path is already an
/// entry of the list.
pub fn append(serialized: &str, path: &Path) -> Result<Option<String>, String> {
    let entry = entry_str(path)?;

    if serialized
        .split(DELIMITER)
        .any(|existing| existing == entry)
    {
        return Ok(None);
    }

    let mut out = String::with_capacity(serialized.len() + entry.len() + 1);
    out.push_str(serialized);
    // Tolerate a hand-edited value that lost its trailing delimiter
    if !out.is_empty() && !out.ends_with(DELIMITER) {
        out.push(DELIMITER);
    }
    out.push_str(&entry);
    out.push(DELIMITER);
    Ok(Some(out))
}

/// Validate a path for storage and return its string form
fn entry_str(path: &Path) -> Result<String, String> {
    let s = path
        .to_str()
        .ok_or_else(|| format!("Path is not valid UTF-8: {}", path.display()))?;

    if s.is_empty() {
        return Err("Cannot store an empty path".to_string());
    }
    if s.contains(DELIMITER) {
        return Err(format!(
            "Cannot store a path containing '{}': {}",
            DELIMITER, s
        ));
    }
    Ok(s.to_string())
}

/// In-memory view of the converted files, backed by a preferences store
///
/// Mirrors the persisted value: `files` is always the decoded form of the
/// string stored under [`PREFS_KEY_CONVERTED_FILES`] as of the last `load`.
#[derive(Debug, Default, Clone)]
pub struct ConvertedFiles {
    files: Vec<PathBuf>,
}

impl ConvertedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read the list from the preferences store
    pub fn load(&mut self, prefs: &Preferences) {
        let serialized = prefs.get_string(PREFS_KEY_CONVERTED_FILES, "");
        self.files = decode(&serialized);
        log::debug!("Loaded {} converted files", self.files.len());
    }

    /// Store a newly converted file and persist the preferences
    ///
    /// `prefs` is only updated once the new value is on disk, so a failed
    /// write leaves it matching the file. Does not refresh the in-memory
    /// list; call `load` afterwards.
    pub fn save(prefs: &mut Preferences, path: &Path) -> Result<AppendOutcome, String> {
        let existing = prefs.get_string(PREFS_KEY_CONVERTED_FILES, "");
        match append(&existing, path)? {
            Some(updated) => {
                let mut staged = prefs.clone();
                staged.put_string(PREFS_KEY_CONVERTED_FILES, updated);
                staged.save()?;
                *prefs = staged;
                log::info!("Recorded converted file: {}", path.display());
                Ok(AppendOutcome::Added)
            }
            None => {
                log::debug!("Converted file already recorded: {}", path.display());
                Ok(AppendOutcome::AlreadyPresent)
            }
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn get(&self, index: usize) -> Option<&PathBuf> {
        self.files.get(index)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_discards_empty_segments() {
        let files = decode(",/music/a.mp3,,/music/b.mp3,");
        assert_eq!(
            files,
            vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.mp3")]
        );
    }

    #[test]
    fn test_decode_empty_string() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_append_uses_trailing_delimiter() {
        let first = append("", Path::new("/a.mp3")).unwrap().unwrap();
        let second = append(&first, Path::new("/b.mp3")).unwrap().unwrap();
        assert_eq!(second, "/a.mp3,/b.mp3,");
    }

    #[test]
    fn test_append_reconstructs_appended_paths() {
        let paths = ["/music/one.mp3", "/music/two.mp3", "/music/three.mp3"];
        let mut serialized = String::new();
        for p in paths {
            serialized = append(&serialized, Path::new(p)).unwrap().unwrap();
        }

        let decoded = decode(&serialized);
        let expected: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_append_rejects_duplicate() {
        let serialized = append("", Path::new("/music/song.mp3")).unwrap().unwrap();
        let again = append(&serialized, Path::new("/music/song.mp3")).unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn test_append_allows_path_that_is_prefix_of_existing() {
        // Whole-entry comparison: "/m/a.mp3" is not a duplicate of "/m/a.mp3.bak"
        let serialized = "/m/a.mp3.bak,";
        let updated = append(serialized, Path::new("/m/a.mp3")).unwrap().unwrap();
        assert_eq!(decode(&updated).len(), 2);
    }

    #[test]
    fn test_append_repairs_missing_trailing_delimiter() {
        let updated = append("/m/a.mp3", Path::new("/m/b.mp3")).unwrap().unwrap();
        assert_eq!(updated, "/m/a.mp3,/m/b.mp3,");
    }

    #[test]
    fn test_append_refuses_delimiter_in_path() {
        let result = append("", Path::new("/music/a,b.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn test_append_refuses_empty_path() {
        assert!(append("", Path::new("")).is_err());
    }

    #[test]
    fn test_save_then_load_grows_by_one() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open(temp_dir.path().join("prefs.json"));

        let mut list = ConvertedFiles::new();
        list.load(&prefs);
        assert!(list.is_empty());

        let outcome = ConvertedFiles::save(&mut prefs, Path::new("/out/first.mp3")).unwrap();
        assert_eq!(outcome, AppendOutcome::Added);
        list.load(&prefs);
        assert_eq!(list.len(), 1);

        let outcome = ConvertedFiles::save(&mut prefs, Path::new("/out/second.mp3")).unwrap();
        assert_eq!(outcome, AppendOutcome::Added);
        list.load(&prefs);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1), Some(&PathBuf::from("/out/second.mp3")));
    }

    #[test]
    fn test_save_duplicate_leaves_list_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open(temp_dir.path().join("prefs.json"));

        ConvertedFiles::save(&mut prefs, Path::new("/out/song.mp3")).unwrap();
        let outcome = ConvertedFiles::save(&mut prefs, Path::new("/out/song.mp3")).unwrap();
        assert_eq!(outcome, AppendOutcome::AlreadyPresent);

        let mut list = ConvertedFiles::new();
        list.load(&prefs);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_list_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the preferences directory should be
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let mut prefs = Preferences::open(blocker.join("prefs.json"));

        let result = ConvertedFiles::save(&mut prefs, Path::new("/out/song.mp3"));
        assert!(result.is_err());

        let mut list = ConvertedFiles::new();
        list.load(&prefs);
        assert!(list.is_empty());
        assert_eq!(prefs.get_string(PREFS_KEY_CONVERTED_FILES, ""), "");
    }

    #[test]
    fn test_saved_list_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let prefs_path = temp_dir.path().join("prefs.json");

        {
            let mut prefs = Preferences::open(prefs_path.clone());
            ConvertedFiles::save(&mut prefs, Path::new("/out/kept.mp3")).unwrap();
        }

        let prefs = Preferences::open(prefs_path);
        let mut list = ConvertedFiles::new();
        list.load(&prefs);
        assert_eq!(list.files(), &[PathBuf::from("/out/kept.mp3")]);
    }
}
