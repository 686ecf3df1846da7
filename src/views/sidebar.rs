//! Stored-recordings list
//!
//! The sidebar loads the signed-in user's recordings once on mount and
//! again whenever the user retries, uploads, or deletes one.

use chrono::{DateTime, Utc};

use crate::api::{AudioFileMetadata, AudioFileUploadResponse, CallsumApi};
use crate::audio::AudioFile;
use crate::error::{user_message, Result};
use crate::session::SessionState;

const BYTE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size using 1024-based units.
///
/// # Examples
///
/// ```
/// use callsum::views::sidebar::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 Bytes");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut value = bytes as f64;
    // Compare after rounding so 1023.999 KB is shown as 1 MB.
    while (value * 100.0).round() / 100.0 >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, BYTE_UNITS[unit])
}

/// Relative age of `then` as seen at `now`.
///
/// Anything older than 30 days is shown as a date, e.g. `Mar 04, 2025`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }
    then.format("%b %d, %Y").to_string()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Sidebar view model
#[derive(Debug, Default)]
pub struct Sidebar {
    files: Vec<AudioFileMetadata>,
    loading: bool,
    error: Option<String>,
}

impl Sidebar {
    /// Create an empty sidebar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recordings as last loaded
    pub fn files(&self) -> &[AudioFileMetadata] {
        &self.files
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error message, if the last action failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Load the list if the user is signed in; do nothing otherwise.
    pub async fn mount(&mut self, api: &dyn CallsumApi, session: &SessionState) -> Result<()> {
        if !session.is_authenticated() {
            tracing::debug!("Not signed in, skipping file list");
            return Ok(());
        }
        self.load(api).await
    }

    /// Fetch the user's recordings.
    ///
    /// # Errors
    ///
    /// Returns the classified API error; the message is kept in
    /// [`error`](Self::error) and the previous list is kept.
    pub async fn load(&mut self, api: &dyn CallsumApi) -> Result<()> {
        self.loading = true;
        self.error = None;
        let outcome = api.list_files().await;
        self.loading = false;
        match outcome {
            Ok(files) => {
                tracing::debug!("Loaded {} files", files.len());
                self.files = files;
                Ok(())
            }
            Err(e) => {
                self.error = Some(user_message(&e));
                Err(e)
            }
        }
    }

    /// Re-issue the same load after a failure.
    pub async fn retry(&mut self, api: &dyn CallsumApi) -> Result<()> {
        self.load(api).await
    }

    /// Store a recording and reload the list.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Validation` without calling the backend when
    /// the file type is rejected, or the classified API error.
    pub async fn upload(
        &mut self,
        api: &dyn CallsumApi,
        file: &AudioFile,
    ) -> Result<AudioFileUploadResponse> {
        self.error = None;
        let outcome = match file.validate() {
            Ok(()) => api.upload_file(file).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(uploaded) => {
                tracing::info!("Stored {} as {}", uploaded.filename, uploaded.file_id);
                self.reload_quietly(api).await;
                Ok(uploaded)
            }
            Err(e) => {
                self.error = Some(user_message(&e));
                Err(e)
            }
        }
    }

    /// Delete a recording and reload the list.
    pub async fn delete_file(&mut self, api: &dyn CallsumApi, id: &str) -> Result<()> {
        self.error = None;
        if let Err(e) = api.delete_file(id).await {
            self.error = Some(user_message(&e));
            return Err(e);
        }
        self.reload_quietly(api).await;
        Ok(())
    }

    async fn reload_quietly(&mut self, api: &dyn CallsumApi) {
        if let Err(e) = self.load(api).await {
            tracing::warn!("Failed to reload files: {}", e);
        }
    }
}
