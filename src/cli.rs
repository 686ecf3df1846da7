//! Command-line interface definition for CallSum
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, summarization, chat, and
//! stored audio file management.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CallSum - summarize call recordings and chat about them
///
/// Upload an audio recording, receive a summary, transcript, sentiment and
/// key aspects, and discuss the call with an assistant.
#[derive(Parser, Debug, Clone)]
#[command(name = "callsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Format of diagnostic log lines on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// How diagnostics are written
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Available commands for CallSum
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check that the backend is reachable
    Health,

    /// Send a test query to one of the backend's models
    ModelTest {
        /// Numeric model selector understood by the backend
        #[arg(long, default_value_t = 1)]
        choice: i64,

        /// Free-text query
        #[arg(short, long)]
        query: String,
    },

    /// Sign up, sign in, sign out, or show the current user
    Auth {
        /// Authentication subcommand
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Summarize an audio recording
    Summarize {
        /// Audio file (.wav, .mp3, .m4a, .flac, .ogg)
        file: PathBuf,

        /// Print the raw JSON response instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// Transcribe an audio recording without summarizing it
    Transcribe {
        /// Audio file (.wav, .mp3, .m4a, .flac, .ogg)
        file: PathBuf,
    },

    /// Chat with the call assistant, or manage saved conversations
    Chat {
        /// Conversation management subcommand; omit for an interactive session
        #[command(subcommand)]
        command: Option<ChatCommand>,
    },

    /// Manage uploaded audio files
    Files {
        /// File management subcommand
        #[command(subcommand)]
        command: FilesCommand,
    },
}

/// Authentication subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Create an account and sign in
    Signup {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Optional display name
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Sign in with an existing account
    Signin {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Signout,

    /// Show the signed-in user
    Whoami,
}

/// Saved conversation subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatCommand {
    /// List saved conversations, most recent first
    History {
        /// Maximum number of conversations to list
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Print a saved conversation
    Show {
        /// Conversation ID
        id: String,
    },

    /// Delete a saved conversation
    Delete {
        /// Conversation ID
        id: String,
    },
}

/// Audio file subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FilesCommand {
    /// List uploaded audio files
    List,

    /// Upload an audio file to storage
    Upload {
        /// Audio file (.wav, .mp3, .m4a, .flac, .ogg)
        file: PathBuf,
    },

    /// Show metadata and a download URL for one file
    Show {
        /// File ID
        id: String,
    },

    /// Delete an uploaded file
    Delete {
        /// File ID
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            base_url: None,
            verbose: false,
            log_format: LogFormat::Text,
            command: Commands::Health,
        }
    }
}
