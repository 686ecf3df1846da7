//! Request/response interceptor chain around the single HTTP-call primitive
//!
//! Every outbound call goes through one [`Pipeline`]: request interceptors
//! run in order before the request is sent, response interceptors observe
//! the response before it is handed back. Interceptors cannot fail and
//! cannot block a call. There is no per-call override.
//!
//! The standard chain is:
//!
//! - [`BearerAuth`] -- attaches `Authorization: Bearer <token>` when a valid
//!   session exists; sends the request without it otherwise.
//! - [`UnauthorizedLogger`] -- logs `401` responses. It does not sign the
//!   user out or redirect; the calling view decides how to react.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response, StatusCode};

use crate::session::SessionProvider;

/// Runs before every outbound request.
#[async_trait]
pub trait RequestInterceptor: Send + Sync + std::fmt::Debug {
    /// Inspect or modify `request` before it is sent.
    async fn before_request(&self, request: &mut Request);
}

/// Observes every response that was received, successful or not.
pub trait ResponseInterceptor: Send + Sync + std::fmt::Debug {
    /// Inspect `response`. The response is passed on unchanged.
    fn after_response(&self, response: &Response);
}

// ---------------------------------------------------------------------------
// BearerAuth
// ---------------------------------------------------------------------------

/// Attaches the current session's access token to every request.
///
/// The header is present if and only if the provider returns a session.
/// A provider failure is logged and the request proceeds unauthenticated.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    provider: Arc<dyn SessionProvider>,
}

impl BearerAuth {
    /// Create an interceptor reading sessions from `provider`.
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl RequestInterceptor for BearerAuth {
    async fn before_request(&self, request: &mut Request) {
        match self.provider.current_session().await {
            Ok(Some(session)) => {
                match HeaderValue::from_str(&format!("Bearer {}", session.access_token)) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        request.headers_mut().insert(AUTHORIZATION, value);
                    }
                    Err(e) => {
                        tracing::warn!("Session token is not a valid header value: {}", e);
                        request.headers_mut().remove(AUTHORIZATION);
                    }
                }
            }
            Ok(None) => {
                request.headers_mut().remove(AUTHORIZATION);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not acquire session, sending request without credentials: {}",
                    e
                );
                request.headers_mut().remove(AUTHORIZATION);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// UnauthorizedLogger
// ---------------------------------------------------------------------------

/// Logs `401 Unauthorized` responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthorizedLogger;

impl ResponseInterceptor for UnauthorizedLogger {
    fn after_response(&self, response: &Response) {
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                "Backend rejected credentials for {} (401); the session may be invalid or expired",
                response.url().path()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Ordered interceptor chain applied uniformly to every call
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use callsum::api::middleware::Pipeline;
/// use callsum::session::SessionHandle;
///
/// let session = SessionHandle::with_session(None);
/// let pipeline = Pipeline::standard(Arc::new(session));
/// assert_eq!(pipeline.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    request: Vec<Arc<dyn RequestInterceptor>>,
    response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl Pipeline {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: bearer injection and 401 logging.
    pub fn standard(provider: Arc<dyn SessionProvider>) -> Self {
        Self::new()
            .with_request(BearerAuth::new(provider))
            .with_response(UnauthorizedLogger)
    }

    /// Append a request interceptor.
    pub fn with_request(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request.push(Arc::new(interceptor));
        self
    }

    /// Append a response interceptor.
    pub fn with_response(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.response.push(Arc::new(interceptor));
        self
    }

    /// Total number of interceptors in the chain
    pub fn len(&self) -> usize {
        self.request.len() + self.response.len()
    }

    /// Whether the chain has no interceptors
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run all request interceptors on `request`.
    pub async fn prepare(&self, request: &mut Request) {
        for interceptor in &self.request {
            interceptor.before_request(request).await;
        }
    }

    /// Run all response interceptors on `response`.
    pub fn observe(&self, response: &Response) {
        for interceptor in &self.response {
            interceptor.after_response(response);
        }
    }

    /// Send `request` through the chain.
    ///
    /// # Errors
    ///
    /// Returns the transport error when no response was received. Error
    /// statuses are returned as `Ok` responses; classification happens in
    /// the caller.
    pub async fn execute(
        &self,
        http: &reqwest::Client,
        mut request: Request,
    ) -> reqwest::Result<Response> {
        self.prepare(&mut request).await;
        tracing::debug!(
            "{} {} (authenticated: {})",
            request.method(),
            request.url().path(),
            request.headers().contains_key(AUTHORIZATION)
        );
        let response = http.execute(request).await?;
        self.observe(&response);
        Ok(response)
    }
}
