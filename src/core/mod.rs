//! Core application logic and state
//!
//! This module contains:
//! - Key-value preferences persisted to disk
//! - The converted files list and its comma-joined storage format
//! - Conversion session state (selected file, execution in flight)
//! - Transient notices
//! - Resolution of platform file locators

mod converted_files;
mod locator;
mod notice;
mod preferences;
mod session;

pub use converted_files::{AppendOutcome, ConvertedFiles, PREFS_KEY_CONVERTED_FILES};
pub use locator::resolve_locator;
pub use notice::{NoticeLength, Notices};
pub use preferences::Preferences;
pub use session::{CompletionOutcome, ConversionPhase, ConversionSession};
