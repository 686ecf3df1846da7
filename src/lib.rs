//! CallSum - client library for the call-recording summarization service
//!
//! CallSum uploads call recordings to a summarization backend, shows the
//! resulting summary, transcript, and key aspects, and keeps saved chat
//! conversations about them.
//!
//! # Architecture
//!
//! The main components are:
//!
//! - [`api`]: the single outbound gateway ([`api::ApiClient`]) with its
//!   interceptor pipeline and failure classification
//! - [`session`]: the explicitly shared session handle and its persistence
//! - [`routes`]: protected/public route guards over the session state
//! - [`views`]: UI-agnostic dashboard, chat, and sidebar state machines
//! - [`audio`]: upload payloads and the client-side file-type gate
//! - [`config`]: layered configuration (file, environment, CLI)
//! - [`commands`]: terminal front end used by the `callsum` binary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use callsum::api::ApiClient;
//! use callsum::config::Config;
//! use callsum::session::SessionHandle;
//! use callsum::views::ChatPanel;
//!
//! # async fn example() -> callsum::error::Result<()> {
//! let config = Config::default();
//! let session = SessionHandle::with_session(None);
//! let client = ApiClient::from_config(&config.api, Arc::new(session))?;
//!
//! let mut chat = ChatPanel::default();
//! chat.send(&client, "What were the action items?").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod audio;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod views;

pub use config::Config;
pub use error::{CallsumError, Result};
