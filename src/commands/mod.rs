//! Command handlers for the `callsum` binary
//!
//! Each submodule renders one screen of the application in the terminal.
//! [`AppContext`] carries the explicitly shared pieces every handler needs:
//! configuration, the session handle, the session store, and the API client.
//!
//! # Module Layout
//!
//! - [`service`] -- health check and model test (no session needed)
//! - [`auth`] -- sign up, sign in, sign out, whoami
//! - [`summarize`] -- the dashboard upload flow and plain transcription
//! - [`chat`] -- interactive chat and saved conversations
//! - [`files`] -- stored recordings

use std::sync::Arc;

use colored::Colorize;

use crate::api::ApiClient;
use crate::cli::{AuthCommand, ChatCommand, Cli, Commands, FilesCommand};
use crate::config::Config;
use crate::error::{CallsumError, Result};
use crate::routes::{self, GuardOutcome};
use crate::session::{self, SessionHandle, SessionStore};

pub mod auth;
pub mod chat;
pub mod files;
pub mod service;
pub mod summarize;

/// Shared state handed to every command handler
pub struct AppContext {
    /// Effective configuration
    pub config: Config,
    /// Current session, shared with the API client's interceptors
    pub session: SessionHandle,
    /// Where the session is persisted between runs
    pub store: Box<dyn SessionStore>,
    /// Backend client
    pub api: ApiClient,
}

impl AppContext {
    /// Build the context using the store selected by `config`.
    ///
    /// The stored session is restored before this returns.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Config` if the API client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let store = session::store::from_config(&config);
        Self::with_store(config, store)
    }

    /// Build the context around an explicit session store.
    pub fn with_store(config: Config, store: Box<dyn SessionStore>) -> Result<Self> {
        let session = SessionHandle::new();
        let api = ApiClient::from_config(&config.api, Arc::new(session.clone()))?;
        session.restore_from(store.as_ref());
        Ok(Self {
            config,
            session,
            store,
            api,
        })
    }

    /// Apply the protected-route guard.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::NotAuthenticated` naming the redirect target
    /// when no session exists.
    pub fn require_signed_in(&self) -> Result<()> {
        match routes::protected(&self.session.snapshot()) {
            GuardOutcome::Render => Ok(()),
            GuardOutcome::Redirect { to, .. } => {
                Err(CallsumError::NotAuthenticated(to.to_string()).into())
            }
            GuardOutcome::Loading | GuardOutcome::Nothing => {
                Err(CallsumError::Session("session is still loading".to_string()).into())
            }
        }
    }

    /// Apply the public-route guard.
    ///
    /// Returns `false` (after telling the user) when someone is already
    /// signed in and the auth screen should not be shown.
    pub fn allow_signed_out_screen(&self) -> bool {
        let state = self.session.snapshot();
        match routes::public(&state) {
            GuardOutcome::Render => true,
            GuardOutcome::Redirect { .. } => {
                if let Some(session) = state.session {
                    println!(
                        "{}",
                        format!(
                            "Already signed in as {}. Run `callsum auth signout` first.",
                            session.user.email
                        )
                        .yellow()
                    );
                }
                false
            }
            GuardOutcome::Loading | GuardOutcome::Nothing => false,
        }
    }
}

/// Run the command selected on the command line.
pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Health => service::health(&ctx).await,
        Commands::ModelTest { choice, query } => service::model_test(&ctx, choice, &query).await,
        Commands::Auth { command } => match command {
            AuthCommand::Signup {
                email,
                password,
                full_name,
            } => auth::sign_up(&ctx, email, password, full_name).await,
            AuthCommand::Signin { email, password } => auth::sign_in(&ctx, email, password).await,
            AuthCommand::Signout => auth::sign_out(&ctx).await,
            AuthCommand::Whoami => auth::whoami(&ctx).await,
        },
        Commands::Summarize { file, json } => summarize::run_summarize(&ctx, &file, json).await,
        Commands::Transcribe { file } => summarize::run_transcribe(&ctx, &file).await,
        Commands::Chat { command } => match command {
            None => chat::run_chat(&ctx).await,
            Some(ChatCommand::History { limit }) => chat::list_history(&ctx, limit).await,
            Some(ChatCommand::Show { id }) => chat::show_conversation(&ctx, &id).await,
            Some(ChatCommand::Delete { id }) => chat::delete_conversation(&ctx, &id).await,
        },
        Commands::Files { command } => match command {
            FilesCommand::List => files::list_files(&ctx).await,
            FilesCommand::Upload { file } => files::upload_file(&ctx, &file).await,
            FilesCommand::Show { id } => files::show_file(&ctx, &id).await,
            FilesCommand::Delete { id } => files::delete_file(&ctx, &id).await,
        },
    }
}
