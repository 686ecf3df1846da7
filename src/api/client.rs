//! The single outbound gateway to the summarization backend
//!
//! [`ApiClient`] owns the HTTP client, the base URL and the interceptor
//! [`Pipeline`]. Every endpoint method builds a request, hands it to
//! [`ApiClient::send`] (the only place a request is executed) and either
//! returns typed data or a classified [`CallsumError::Api`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::classify::{classify, classify_response, classify_transport, Failure};
use crate::api::middleware::Pipeline;
use crate::api::types::{
    AudioFileDetails, AudioFileMetadata, AudioFileUploadResponse, AuthResponse, ChatQueryRequest,
    ChatQueryResponse, Conversation, ConversationListItem, HealthResponse, MessageResponse,
    ModelTestRequest, ModelTestResponse, SaveConversationRequest, SignInRequest, SignUpRequest,
    SummaryResponse, UserProfile,
};
use crate::api::CallsumApi;
use crate::audio::AudioFile;
use crate::config::ApiConfig;
use crate::error::{CallsumError, Result};
use crate::session::SessionProvider;

/// Page size of `GET /chat/history` when the caller gives none
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Typed client for the summarization backend
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use callsum::api::ApiClient;
/// use callsum::session::SessionHandle;
///
/// # async fn example() -> callsum::error::Result<()> {
/// let session = SessionHandle::with_session(None);
/// let client = ApiClient::new(
///     "http://localhost:8000",
///     Duration::from_secs(30),
///     Arc::new(session),
/// )?;
/// let health = client.health().await?;
/// println!("{} v{}", health.message, health.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying reqwest HTTP client.
    http: reqwest::Client,
    /// Backend base URL; endpoint paths are appended to it.
    base_url: Url,
    /// Interceptors applied to every call.
    pipeline: Pipeline,
}

impl ApiClient {
    /// Create a client with the standard interceptor chain.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend base URL, e.g. `http://localhost:8000`
    /// * `timeout` - Per-request timeout
    /// * `sessions` - Source of the bearer token for each request
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Config` if the URL cannot be parsed or the
    /// HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self> {
        Self::with_pipeline(base_url, timeout, Pipeline::standard(sessions))
    }

    /// Create a client from the `api` configuration section.
    pub fn from_config(config: &ApiConfig, sessions: Arc<dyn SessionProvider>) -> Result<Self> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_seconds),
            sessions,
        )
    }

    /// Create a client with a custom interceptor chain.
    pub fn with_pipeline(base_url: &str, timeout: Duration, pipeline: Pipeline) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            CallsumError::Config(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CallsumError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            pipeline,
        })
    }

    /// Backend base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                CallsumError::Config(format!("API base URL cannot be a base: {}", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    /// Execute one call through the interceptor chain.
    ///
    /// This is the only place a request leaves the client. Success statuses
    /// are returned untouched; every failure is classified.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|e| {
            tracing::debug!("Failed to build request: {}", e);
            classify(Failure::Other)
        })?;

        let response = self
            .pipeline
            .execute(&self.http, request)
            .await
            .map_err(classify_transport)?;

        if !response.status().is_success() {
            return Err(classify_response(response).await.into());
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::debug!("Failed to decode response body: {}", e);
            classify(Failure::Other).into()
        })
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Service
    // -----------------------------------------------------------------------

    /// `GET /` -- service metadata
    pub async fn health(&self) -> Result<HealthResponse> {
        self.send_json(self.request(Method::GET, &[])?).await
    }

    /// `POST /models` -- ask one of the backend's models a test query
    pub async fn test_model(&self, request: &ModelTestRequest) -> Result<ModelTestResponse> {
        self.send_json(self.request(Method::POST, &["models"])?.json(request))
            .await
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// `POST /auth/signup` -- create an account
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse> {
        self.send_json(self.request(Method::POST, &["auth", "signup"])?.json(request))
            .await
    }

    /// `POST /auth/signin` -- exchange credentials for a session
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse> {
        self.send_json(self.request(Method::POST, &["auth", "signin"])?.json(request))
            .await
    }

    /// `POST /auth/signout` -- invalidate the current token server-side
    pub async fn sign_out(&self) -> Result<MessageResponse> {
        self.send_json(self.request(Method::POST, &["auth", "signout"])?)
            .await
    }

    /// `GET /auth/user` -- the user the current token belongs to
    pub async fn current_user(&self) -> Result<UserProfile> {
        self.send_json(self.request(Method::GET, &["auth", "user"])?)
            .await
    }

    // -----------------------------------------------------------------------
    // Transcription
    // -----------------------------------------------------------------------

    /// `POST /transcript` -- plain transcript of a recording, no summary
    ///
    /// The backend answers with the transcript as a bare JSON string.
    pub async fn transcribe(&self, file: &AudioFile) -> Result<String> {
        let form = file.to_form()?;
        self.send_json(self.request(Method::POST, &["transcript"])?.multipart(form))
            .await
    }
}

#[async_trait]
impl CallsumApi for ApiClient {
    async fn summarize_audio(&self, file: &AudioFile) -> Result<SummaryResponse> {
        let form = file.to_form()?;
        self.send_json(self.request(Method::POST, &["summarize"])?.multipart(form))
            .await
    }

    async fn save_conversation(&self, request: &SaveConversationRequest) -> Result<Conversation> {
        self.send_json(self.request(Method::POST, &["chat", "save"])?.json(request))
            .await
    }

    async fn conversation_history(&self, limit: Option<u32>) -> Result<Vec<ConversationListItem>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.send_json(
            self.request(Method::GET, &["chat", "history"])?
                .query(&[("limit", limit)]),
        )
        .await
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation> {
        self.send_json(self.request(Method::GET, &["chat", id])?)
            .await
    }

    async fn delete_conversation(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &["chat", id])?)
            .await
    }

    async fn query_chat(&self, request: &ChatQueryRequest) -> Result<ChatQueryResponse> {
        self.send_json(self.request(Method::POST, &["chat", "query"])?.json(request))
            .await
    }

    async fn upload_file(&self, file: &AudioFile) -> Result<AudioFileUploadResponse> {
        let form = file.to_form()?;
        self.send_json(
            self.request(Method::POST, &["storage", "upload"])?
                .multipart(form),
        )
        .await
    }

    async fn list_files(&self) -> Result<Vec<AudioFileMetadata>> {
        self.send_json(self.request(Method::GET, &["storage", "files"])?)
            .await
    }

    async fn get_file(&self, id: &str) -> Result<AudioFileDetails> {
        self.send_json(self.request(Method::GET, &["storage", "file", id])?)
            .await
    }

    async fn delete_file(&self, id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &["storage", "file", id])?)
            .await
    }
}
