//! Conversion session state
//!
//! Tracks the selected file, the output of the current (or last) conversion
//! and the execution in flight. At most one execution is tracked at a time.
//! Button visibility is derived from the phase:
//!
//! | phase      | Convert          | progress + Cancel | Open  |
//! |------------|------------------|-------------------|-------|
//! | Idle       | enabled if file  | hidden            | hidden|
//! | Converting | disabled         | shown             | hidden|
//! | Completed  | disabled         | hidden            | shown |
//! | Failed     | enabled          | hidden            | hidden|
//! | Cancelled  | enabled          | hidden            | hidden|

use std::path::{Path, PathBuf};

use crate::conversion::{ExecutionId, ReturnCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionPhase {
    #[default]
    Idle,
    Converting,
    Completed,
    Failed,
    Cancelled,
}

/// What a completion callback meant for the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Conversion succeeded; the output path should be recorded
    Succeeded(PathBuf),
    Failed(ReturnCode),
    /// Completion for an execution no longer tracked (e.g. already cancelled)
    Ignored,
}

#[derive(Debug, Default, Clone)]
pub struct ConversionSession {
    selected_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    execution: Option<ExecutionId>,
    phase: ConversionPhase,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a new input file
    ///
    /// Ignored while a conversion is running.
    pub fn select_file(&mut self, path: PathBuf) -> Result<(), String> {
        if self.is_converting() {
            return Err("Wait for the current conversion to finish".to_string());
        }
        self.selected_file = Some(path);
        self.phase = ConversionPhase::Idle;
        Ok(())
    }

    /// Enter the converting phase, writing to `output_file`
    pub fn begin(&mut self, output_file: PathBuf) -> Result<&Path, String> {
        if self.is_converting() {
            return Err("A conversion is already running".to_string());
        }
        let Some(ref input) = self.selected_file else {
            return Err("Please select a file first".to_string());
        };

        self.output_file = Some(output_file);
        self.execution = None;
        self.phase = ConversionPhase::Converting;
        Ok(input)
    }

    /// Record the execution handle returned by the engine
    pub fn started(&mut self, id: ExecutionId) {
        if self.is_converting() {
            self.execution = Some(id);
        }
    }

    /// Apply a completion callback
    pub fn complete(&mut self, id: ExecutionId, return_code: ReturnCode) -> CompletionOutcome {
        if !self.is_converting() || self.execution != Some(id) {
            return CompletionOutcome::Ignored;
        }

        self.execution = None;
        if return_code.is_success() {
            self.phase = ConversionPhase::Completed;
            match self.output_file.clone() {
                Some(output) => CompletionOutcome::Succeeded(output),
                None => CompletionOutcome::Failed(return_code),
            }
        } else if return_code.is_cancel() {
            self.phase = ConversionPhase::Cancelled;
            CompletionOutcome::Ignored
        } else {
            self.phase = ConversionPhase::Failed;
            CompletionOutcome::Failed(return_code)
        }
    }

    /// Leave the converting phase; returns the execution to signal, if any
    pub fn cancel(&mut self) -> Option<ExecutionId> {
        if !self.is_converting() {
            return None;
        }
        let id = self.execution.take()?;
        self.phase = ConversionPhase::Cancelled;
        Some(id)
    }

    /// Abort a conversion that never got an execution handle
    pub fn abort(&mut self) {
        if self.is_converting() {
            self.execution = None;
            self.phase = ConversionPhase::Failed;
        }
    }

    pub fn phase(&self) -> ConversionPhase {
        self.phase
    }

    pub fn is_converting(&self) -> bool {
        self.phase == ConversionPhase::Converting
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn execution(&self) -> Option<ExecutionId> {
        self.execution
    }

    pub fn convert_enabled(&self) -> bool {
        self.selected_file.is_some()
            && matches!(
                self.phase,
                ConversionPhase::Idle | ConversionPhase::Failed | ConversionPhase::Cancelled
            )
    }

    pub fn show_progress(&self) -> bool {
        self.is_converting()
    }

    pub fn show_open(&self) -> bool {
        self.phase == ConversionPhase::Completed
    }
}
