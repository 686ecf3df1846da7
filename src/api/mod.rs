//! Backend API access
//!
//! This module provides everything needed to talk to the summarization
//! backend: wire types, the interceptor pipeline, failure classification,
//! and the typed client.
//!
//! # Module Layout
//!
//! - [`types`] -- request and response shapes
//! - [`middleware`] -- request/response interceptors around every call
//! - [`classify`] -- normalization of failures into one user-facing error
//! - [`client`] -- [`ApiClient`], the single outbound gateway

use async_trait::async_trait;

use crate::audio::AudioFile;
use crate::error::Result;

pub mod classify;
pub mod client;
pub mod middleware;
pub mod types;

pub use client::{ApiClient, DEFAULT_HISTORY_LIMIT};
pub use middleware::{BearerAuth, Pipeline, RequestInterceptor, ResponseInterceptor};
pub use types::{
    AudioFileDetails, AudioFileMetadata, AudioFileUploadResponse, ChatMessage, ChatQueryRequest,
    ChatQueryResponse, Conversation, ConversationListItem, Role, SaveConversationRequest,
    SummaryResponse,
};

/// Backend operations used by the feature views
///
/// [`ApiClient`] is the production implementation. Views depend on this
/// trait so they can be driven without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallsumApi: Send + Sync {
    /// `POST /summarize` -- upload a recording and receive its summary
    async fn summarize_audio(&self, file: &AudioFile) -> Result<SummaryResponse>;

    /// `POST /chat/save` -- persist a conversation
    async fn save_conversation(&self, request: &SaveConversationRequest) -> Result<Conversation>;

    /// `GET /chat/history?limit=N` -- the user's conversations, newest first
    async fn conversation_history(&self, limit: Option<u32>) -> Result<Vec<ConversationListItem>>;

    /// `GET /chat/{id}` -- one full conversation
    async fn get_conversation(&self, id: &str) -> Result<Conversation>;

    /// `DELETE /chat/{id}`
    async fn delete_conversation(&self, id: &str) -> Result<()>;

    /// `POST /chat/query` -- ask the backend assistant a question
    async fn query_chat(&self, request: &ChatQueryRequest) -> Result<ChatQueryResponse>;

    /// `POST /storage/upload` -- store a recording without summarizing it
    async fn upload_file(&self, file: &AudioFile) -> Result<AudioFileUploadResponse>;

    /// `GET /storage/files` -- the user's stored recordings
    async fn list_files(&self) -> Result<Vec<AudioFileMetadata>>;

    /// `GET /storage/file/{id}` -- details and download URL of one recording
    async fn get_file(&self, id: &str) -> Result<AudioFileDetails>;

    /// `DELETE /storage/file/{id}`
    async fn delete_file(&self, id: &str) -> Result<()>;
}
