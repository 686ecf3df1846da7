//! Audio file payloads and the client-side file-type gate
//!
//! Only the file type is checked locally. Size and duration limits are
//! enforced by the backend.

use std::path::Path;

use crate::error::{CallsumError, Result};

/// File extensions accepted for upload, lowercase with leading dot
pub const ALLOWED_EXTENSIONS: [&str; 5] = [".wav", ".mp3", ".m4a", ".flac", ".ogg"];

/// MIME types accepted when the extension is not recognized
pub const ALLOWED_MIME_TYPES: [&str; 6] = [
    "audio/wav",
    "audio/mpeg",
    "audio/mp4",
    "audio/x-m4a",
    "audio/flac",
    "audio/ogg",
];

/// Multipart field name the backend expects the recording under
pub const AUDIO_FIELD_NAME: &str = "audio_file";

/// An audio recording ready to be uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    /// File name as shown to the user and sent to the backend
    pub file_name: String,
    /// MIME type reported by the file source, if any
    pub mime_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl AudioFile {
    /// Create a file payload, guessing the MIME type from the extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = extension_of(&file_name)
            .and_then(|ext| mime_for_extension(&ext))
            .map(str::to_string);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Override the MIME type reported for this file.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Io` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(CallsumError::Io)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check this file against the upload gate.
    pub fn validate(&self) -> Result<()> {
        validate_audio_file(&self.file_name, self.mime_type.as_deref())
    }

    /// Build the multipart form carrying this file under `audio_file`.
    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form> {
        let mime = self
            .mime_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        let part = reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(mime)
            .map_err(|e| CallsumError::Validation(format!("Invalid MIME type '{}': {}", mime, e)))?;
        Ok(reqwest::multipart::Form::new().part(AUDIO_FIELD_NAME, part))
    }
}

/// Lowercase extension of `file_name` including the leading dot.
///
/// The extension is whatever follows the last dot, so a bare `.wav` counts
/// as a WAV file. Returns `None` when there is no dot or nothing after it.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// MIME type conventionally used for an allowed extension
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        ".wav" => Some("audio/wav"),
        ".mp3" => Some("audio/mpeg"),
        ".m4a" => Some("audio/x-m4a"),
        ".flac" => Some("audio/flac"),
        ".ogg" => Some("audio/ogg"),
        _ => None,
    }
}

/// Accept a file if its extension is allowed, or failing that its MIME type.
///
/// # Errors
///
/// Returns `CallsumError::Validation` naming the supported extensions when
/// neither check passes.
///
/// # Examples
///
/// ```
/// use callsum::audio::validate_audio_file;
///
/// assert!(validate_audio_file("clip.WAV", None).is_ok());
/// assert!(validate_audio_file("voice-note", Some("audio/ogg")).is_ok());
///
/// let err = validate_audio_file("clip.txt", Some("text/plain")).unwrap_err();
/// assert!(err.to_string().contains(".wav, .mp3, .m4a, .flac, .ogg"));
/// ```
pub fn validate_audio_file(file_name: &str, mime_type: Option<&str>) -> Result<()> {
    let extension_ok = extension_of(file_name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    if extension_ok {
        return Ok(());
    }

    let mime_ok = mime_type
        .map(|mime| ALLOWED_MIME_TYPES.contains(&mime))
        .unwrap_or(false);
    if mime_ok {
        return Ok(());
    }

    Err(CallsumError::Validation(format!(
        "Invalid file format. Supported formats: {}",
        ALLOWED_EXTENSIONS.join(", ")
    ))
    .into())
}
