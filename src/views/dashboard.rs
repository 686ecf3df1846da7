//! Upload-and-summarize screen state
//!
//! ```text
//! NoFileSelected --select--> FileSelected --upload--> Uploading
//!        ^                      ^   |                    |
//!        |                      |   +--clear--+          | failure
//!        |                      +-------------|----------+
//!        +------upload_another------ ResultShown <-------+ success
//! ```
//!
//! A file that fails the type gate is never stored and never uploaded; the
//! state is left as it was and the message goes to `error`.

use crate::api::classify::UNEXPECTED_MESSAGE;
use crate::api::{CallsumApi, SummaryResponse};
use crate::audio::AudioFile;
use crate::error::{user_message, CallsumError, Result};

/// Where the dashboard is in its upload flow
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    /// Waiting for the user to pick a recording
    #[default]
    NoFileSelected,
    /// A valid recording is staged for upload
    FileSelected(AudioFile),
    /// The staged recording is being summarized
    Uploading(AudioFile),
    /// The backend returned a summary
    ResultShown(SummaryResponse),
}

/// Dashboard view model
#[derive(Debug, Default)]
pub struct Dashboard {
    state: DashboardState,
    error: Option<String>,
}

impl Dashboard {
    /// Create a dashboard with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Inline error message, if the last action failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The summary being shown, if any
    pub fn result(&self) -> Option<&SummaryResponse> {
        match &self.state {
            DashboardState::ResultShown(summary) => Some(summary),
            _ => None,
        }
    }

    /// Stage `file` for upload after checking its type.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Validation` when the file type is not
    /// accepted. The message is also kept in [`error`](Self::error) and the
    /// previous state is unchanged.
    pub fn select_file(&mut self, file: AudioFile) -> Result<()> {
        if let Err(e) = file.validate() {
            self.error = Some(user_message(&e));
            return Err(e);
        }
        tracing::debug!("Selected {} ({} bytes)", file.file_name, file.size());
        self.state = DashboardState::FileSelected(file);
        self.error = None;
        Ok(())
    }

    /// Drop the staged file and any error.
    pub fn clear_file(&mut self) {
        if matches!(self.state, DashboardState::FileSelected(_)) {
            self.state = DashboardState::NoFileSelected;
        }
        self.error = None;
    }

    /// Move the staged file into the uploading state.
    ///
    /// Returns the file to send, or `None` when nothing is staged.
    pub fn begin_upload(&mut self) -> Option<AudioFile> {
        match std::mem::take(&mut self.state) {
            DashboardState::FileSelected(file) => {
                self.error = None;
                self.state = DashboardState::Uploading(file.clone());
                Some(file)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Apply the outcome of an upload started with
    /// [`begin_upload`](Self::begin_upload).
    ///
    /// # Errors
    ///
    /// Hands a failed outcome back to the caller after recording its
    /// message and returning to the file-selected state.
    pub fn finish_upload(&mut self, outcome: Result<SummaryResponse>) -> Result<()> {
        let file = match std::mem::take(&mut self.state) {
            DashboardState::Uploading(file) => file,
            other => {
                tracing::warn!("Upload finished while not uploading, ignoring");
                self.state = other;
                return Ok(());
            }
        };
        match outcome {
            Ok(summary) => {
                tracing::info!("Summarized {}", file.file_name);
                self.state = DashboardState::ResultShown(summary);
                Ok(())
            }
            Err(e) => {
                self.error = Some(user_message(&e));
                self.state = DashboardState::FileSelected(file);
                Err(e)
            }
        }
    }

    /// Summarize the staged file through `api`.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Validation` when no file is staged, or the
    /// classified API error when the call fails. A failed call also leaves
    /// its message in [`error`](Self::error).
    pub async fn upload(&mut self, api: &dyn CallsumApi) -> Result<&SummaryResponse> {
        let Some(file) = self.begin_upload() else {
            return Err(CallsumError::Validation("No file selected".to_string()).into());
        };
        let outcome = api.summarize_audio(&file).await;
        self.finish_upload(outcome)?;
        self.result()
            .ok_or_else(|| CallsumError::Api(UNEXPECTED_MESSAGE.to_string()).into())
    }

    /// Discard the shown result and start over.
    ///
    /// Only applies while a result is shown.
    pub fn upload_another(&mut self) {
        if matches!(self.state, DashboardState::ResultShown(_)) {
            self.state = DashboardState::NoFileSelected;
            self.error = None;
        }
    }
}
