//! Feature view models
//!
//! UI-agnostic state machines for the three screens. Each view owns its
//! local state, talks to the backend only through [`CallsumApi`], and keeps
//! the message of its last failure for rendering.
//!
//! [`CallsumApi`]: crate::api::CallsumApi

pub mod chat;
pub mod dashboard;
pub mod sidebar;

pub use chat::{derive_title, ChatPanel, ChatSettings};
pub use dashboard::{Dashboard, DashboardState};
pub use sidebar::{format_bytes, time_ago, Sidebar};
