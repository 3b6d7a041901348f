//! File selection, conversion and playback for ConverterView
//!
//! None of these need a GPUI context; callers notify after mutating.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::{is_audio_file, probe_audio};
use crate::conversion::{self, EngineEvent};
use crate::core::{resolve_locator, AppendOutcome, CompletionOutcome, ConvertedFiles, NoticeLength};
use crate::viewer::{self, AUDIO_MIME_HINT};

use super::ConverterView;

impl ConverterView {
    /// Select an input file (from the picker or a drop)
    ///
    /// Returns true if the selection changed.
    pub fn select_file(&mut self, path: PathBuf) -> bool {
        if !is_audio_file(&path) {
            log::info!("Ignoring non-audio file: {:?}", path);
            self.notices.show("Please choose an audio file", NoticeLength::Short);
            return false;
        }

        if let Err(e) = self.session.select_file(path.clone()) {
            self.notices.show(e, NoticeLength::Short);
            return false;
        }

        self.selected_details = match probe_audio(&path) {
            Ok(details) => Some(details),
            Err(e) => {
                // The engine reads more formats than the prober does
                log::debug!("Could not probe {:?}: {}", path, e);
                None
            }
        };

        log::info!("Selected file: {}", path.display());
        true
    }

    /// Select a file from a platform locator (open-URL, picker result)
    pub fn select_locator(&mut self, locator: &str) -> bool {
        match resolve_locator(locator) {
            Some(path) => self.select_file(path),
            None => {
                log::warn!("Could not resolve locator: {}", locator);
                self.notices.show("Unsupported file location", NoticeLength::Short);
                false
            }
        }
    }

    /// Start converting the selected file to MP3
    pub fn convert(&mut self) {
        let Some(input) = self.session.selected_file().map(Path::to_path_buf) else {
            self.notices.show("Please select a file first", NoticeLength::Short);
            return;
        };

        let Some(engine) = self.engine.clone() else {
            self.notices.show("Conversion engine not available", NoticeLength::Short);
            return;
        };

        if let Err(e) = conversion::ensure_output_dir(&self.output_dir) {
            log::error!("{}", e);
            self.notices.show(
                "Storage permission is required to save files",
                NoticeLength::Short,
            );
            return;
        }

        let output = conversion::output_path_for(&input, &self.output_dir);
        if let Err(e) = self.session.begin(output.clone()) {
            self.notices.show(e, NoticeLength::Short);
            return;
        }

        let args = conversion::conversion_args(&input, &output);
        let tx = self.engine_tx.clone();
        let id = engine.execute_async(args, move |id, return_code| {
            let _ = tx.send(EngineEvent::Finished { id, return_code });
        });

        self.session.started(id);
        self.conversion_started_at = Some(Instant::now());
        log::info!(
            "Conversion {} started: {} -> {}",
            id,
            input.display(),
            output.display()
        );
    }

    /// Apply an engine completion on the UI thread
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        let EngineEvent::Finished { id, return_code } = event;

        match self.session.complete(id, return_code) {
            CompletionOutcome::Succeeded(output) => {
                self.conversion_started_at = None;
                self.notices.show("Conversion completed", NoticeLength::Long);
                self.record_converted_file(&output);
                self.load_converted_files();
            }
            CompletionOutcome::Failed(code) => {
                self.conversion_started_at = None;
                log::warn!("Conversion {} failed with return code {}", id, code);
                self.notices.show("Conversion failed", NoticeLength::Short);
            }
            CompletionOutcome::Ignored => {
                log::debug!("Ignoring completion of {} ({})", id, return_code);
            }
        }
    }

    fn record_converted_file(&mut self, output: &Path) {
        match ConvertedFiles::save(&mut self.prefs, output) {
            Ok(AppendOutcome::Added) | Ok(AppendOutcome::AlreadyPresent) => {}
            Err(e) => {
                log::error!("Failed to record converted file: {}", e);
                self.notices.show(
                    "Converted, but the file could not be added to the list",
                    NoticeLength::Long,
                );
            }
        }
    }

    /// Cancel the running conversion, if any
    pub fn cancel_conversion(&mut self) {
        let Some(id) = self.session.cancel() else {
            return;
        };

        if let Some(ref engine) = self.engine {
            engine.cancel(id);
        }
        self.conversion_started_at = None;
        self.notices.show("Conversion canceled", NoticeLength::Short);
    }

    /// Open the output of the last successful conversion
    pub fn open_converted_file(&mut self) {
        let Some(output) = self.session.output_file().map(Path::to_path_buf) else {
            self.notices.show("File does not exist", NoticeLength::Short);
            return;
        };
        self.open_path(&output);
    }

    /// Open the converted file at `index` in the list
    pub fn open_converted_at(&mut self, index: usize) {
        match self.converted.get(index).cloned() {
            Some(path) => self.open_path(&path),
            None => log::warn!("No converted file at index {}", index),
        }
    }

    fn open_path(&mut self, path: &Path) {
        if let Err(e) = viewer::open_file(path, AUDIO_MIME_HINT) {
            log::warn!("Could not open {:?}: {}", path, e);
            self.notices.show(e, NoticeLength::Short);
        }
    }
}
