//! ConverterView component - The main application view
//!
//! Holds the selected file, the conversion in flight, and the persisted list
//! of converted files, and wires the Pick / Convert / Cancel / Open buttons
//! to them.

mod conversion;
mod polling;
mod render;

use gpui::{Context, FocusHandle, ScrollHandle};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use crate::audio::AudioDetails;
use crate::conversion::{ConversionEngine, EngineEvent};
use crate::core::{ConversionSession, ConvertedFiles, NoticeLength, Notices, Preferences};

/// The main converter view
pub struct ConverterView {
    /// Key-value store holding the converted files list
    pub(crate) prefs: Preferences,
    /// Converted files as of the last load
    pub(crate) converted: ConvertedFiles,
    pub(crate) session: ConversionSession,
    pub(crate) notices: Notices,
    /// None when no ffmpeg binary could be found
    pub(crate) engine: Option<ConversionEngine>,
    /// Completion callbacks send here from the engine's worker thread
    pub(crate) engine_tx: mpsc::Sender<EngineEvent>,
    pub(crate) engine_rx: mpsc::Receiver<EngineEvent>,
    /// Where converted files are written
    pub(crate) output_dir: PathBuf,
    /// Probed details of the selected file (None if unreadable)
    pub(crate) selected_details: Option<AudioDetails>,
    pub(crate) conversion_started_at: Option<Instant>,
    pub(crate) scroll_handle: ScrollHandle,
    /// Focus handle for receiving actions (None in tests)
    pub(crate) focus_handle: Option<FocusHandle>,
    pub(crate) appearance_subscription_set: bool,
    pub(crate) needs_initial_focus: bool,
}

impl ConverterView {
    pub fn new(
        prefs: Preferences,
        output_dir: PathBuf,
        engine: Option<ConversionEngine>,
        cx: &mut Context<Self>,
    ) -> Self {
        let mut view = Self::with_parts(prefs, output_dir, engine);
        view.focus_handle = Some(cx.focus_handle());
        view.needs_initial_focus = true;
        view.initialize();
        view
    }

    /// Create a ConverterView for testing (without GPUI context)
    #[cfg(test)]
    pub fn new_for_test(
        prefs: Preferences,
        output_dir: PathBuf,
        engine: Option<ConversionEngine>,
    ) -> Self {
        let mut view = Self::with_parts(prefs, output_dir, engine);
        view.initialize();
        view
    }

    fn with_parts(
        prefs: Preferences,
        output_dir: PathBuf,
        engine: Option<ConversionEngine>,
    ) -> Self {
        let (engine_tx, engine_rx) = mpsc::channel();
        Self {
            prefs,
            converted: ConvertedFiles::new(),
            session: ConversionSession::new(),
            notices: Notices::new(),
            engine,
            engine_tx,
            engine_rx,
            output_dir,
            selected_details: None,
            conversion_started_at: None,
            scroll_handle: ScrollHandle::new(),
            focus_handle: None,
            appearance_subscription_set: false,
            needs_initial_focus: false,
        }
    }

    /// Startup checks, then load the stored list
    fn initialize(&mut self) {
        if let Err(e) = crate::conversion::check_storage_access(&self.output_dir) {
            log::warn!("Storage check failed for {:?}: {}", self.output_dir, e);
            self.notices.show(
                "Storage permission is required to load files",
                NoticeLength::Short,
            );
        }

        if self.engine.is_none() {
            log::warn!("No conversion engine available");
        }

        self.load_converted_files();
    }

    /// Re-read the converted files list from preferences
    pub fn load_converted_files(&mut self) {
        self.converted.load(&self.prefs);
    }

    pub fn converted_files(&self) -> &[PathBuf] {
        self.converted.files()
    }
}
