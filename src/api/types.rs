//! Wire types for the summarization backend
//!
//! Field names match the backend's JSON exactly. Optional fields default to
//! `None` so that older or partial responses still deserialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Service metadata
// ---------------------------------------------------------------------------

/// Response of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Welcome message
    pub message: String,
    /// Backend version
    pub version: String,
    /// Path of the interactive API docs
    pub docs: String,
    /// Path of the model test endpoint
    pub model: String,
}

/// Request body of `POST /models`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTestRequest {
    /// Numeric model selector (1 = Gemini, 2 = Groq on the reference backend)
    pub user_choice: i64,
    /// Free-text query sent to the model
    pub query: String,
}

/// One or several model identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelIds {
    /// A single model identifier
    One(String),
    /// Several identifiers
    Many(Vec<String>),
}

impl std::fmt::Display for ModelIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelIds::One(id) => write!(f, "{}", id),
            ModelIds::Many(ids) => write!(f, "{}", ids.join(", ")),
        }
    }
}

/// Model details attached to a model test response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model that answered the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<ModelIds>,
    /// Models the backend offers, sent when the selector was invalid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Vec<String>>,
    /// Speech-to-text model size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whisper_model: Option<String>,
    /// Whether retrieval augmentation is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_enabled: Option<bool>,
}

/// Response of `POST /models`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTestResponse {
    /// "Success" or "Failed"
    pub status: String,
    /// Human-readable outcome
    pub message: String,
    /// Optional model details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
}

// ---------------------------------------------------------------------------
// Summarization
// ---------------------------------------------------------------------------

/// Processing details attached to a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    /// Original file name
    pub file_name: String,
    /// Size of the upload in bytes
    pub file_size: u64,
    /// Server-side processing time in seconds
    pub processing_time: f64,
}

/// Result of analyzing one recording (`POST /summarize`)
///
/// Held only in view state; never persisted client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Processing status reported by the backend
    #[serde(default)]
    pub status: String,
    /// Concise call summary
    pub summary: String,
    /// Full transcript, when returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Call duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    /// Number of distinct participants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_of_participants: Option<u32>,
    /// "Positive", "Negative" or "Neutral"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Key discussion points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_aspects: Option<Vec<String>>,
    /// Processing metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SummaryMetadata>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The signed-in user
    User,
    /// The call assistant
    Assistant,
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
    /// Audio file the message refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file_id: Option<String>,
    /// Server timestamp, present on hydrated messages
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::option"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Create a user message with no file reference or timestamp
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            audio_file_id: None,
            created_at: None,
        }
    }

    /// Create an assistant message with no file reference or timestamp
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            audio_file_id: None,
            created_at: None,
        }
    }
}

/// Request body of `POST /chat/save`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveConversationRequest {
    /// Derived conversation title
    pub title: String,
    /// Full message sequence in insertion order
    pub messages: Vec<ChatMessage>,
}

/// A saved chat thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-assigned identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Owner of the conversation
    #[serde(default)]
    pub user_id: String,
    /// Title derived from the first user message
    pub title: String,
    /// Messages in insertion order
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Creation time
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Entry of `GET /chat/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationListItem {
    /// Conversation identifier
    pub id: String,
    /// Conversation title
    pub title: String,
    /// Number of stored messages
    pub message_count: usize,
    /// Creation time
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body of `POST /chat/query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatQueryRequest {
    /// The user's question
    pub question: String,
    /// Earlier turns for context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,
    /// "gemini" or "groq"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<String>,
}

/// A retrieved passage backing a chatbot answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Passage text
    pub content: String,
    /// Retrieval metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Response of `POST /chat/query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatQueryResponse {
    /// Generated answer
    pub answer: String,
    /// Passages used to answer
    #[serde(default)]
    pub sources: Vec<SourceDocument>,
    /// Model that produced the answer
    pub model_used: String,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// An uploaded recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFileMetadata {
    /// File identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Owner of the file
    #[serde(default)]
    pub user_id: String,
    /// Original file name
    pub filename: String,
    /// Location inside the storage bucket
    pub storage_path: String,
    /// Size in bytes
    pub file_size: u64,
    /// Duration in seconds, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Upload time
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of `POST /storage/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFileUploadResponse {
    /// Identifier of the stored file
    pub file_id: String,
    /// Original file name
    pub filename: String,
    /// Public or signed URL of the stored object
    pub storage_url: String,
    /// Confirmation message
    pub message: String,
}

/// Response of `GET /storage/file/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFileDetails {
    /// File identifier
    pub file_id: String,
    /// Original file name
    pub filename: String,
    /// Download URL
    pub url: String,
    /// Size in bytes
    pub file_size: u64,
    /// Upload time
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Request body of `POST /auth/signup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Account email
    pub email: String,
    /// Account password (at least 6 characters on the reference backend)
    pub password: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Request body of `POST /auth/signin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// A user identity as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    pub id: String,
    /// Account email
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Account creation time as reported by the identity provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Credentials issued on sign-up or sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer access token
    pub access_token: String,
    /// Token type, normally "bearer"
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Refresh token, when issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// User the token belongs to
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response of `POST /auth/signup` and `POST /auth/signin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed-in user
    pub user: UserProfile,
    /// Issued credentials
    pub session: TokenResponse,
}

/// Generic `{message}` acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Acknowledgement text
    pub message: String,
}

/// Structured error body sent with non-2xx responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// User-facing error message
    #[serde(default)]
    pub error: Option<String>,
    /// HTTP status echoed by the backend
    #[serde(default)]
    pub status_code: Option<u16>,
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Serde helpers for backend timestamps.
///
/// The backend emits RFC 3339 strings with an offset in some places and
/// naive ISO 8601 strings (implicitly UTC) in others.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};

    /// Parse an RFC 3339 or naive ISO 8601 timestamp as UTC.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// `Option<DateTime<Utc>>` field adapter
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) => super::parse(&s).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {}", s))
                }),
            }
        }
    }
}
