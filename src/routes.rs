//! Route guards
//!
//! Two predicates over [`SessionState`] decide what a screen shows while the
//! session is being resolved and after. They are pure: the caller performs
//! the rendering or navigation the returned [`GuardOutcome`] asks for.

use crate::session::SessionState;

/// Path of the sign-in / sign-up screen
pub const AUTH_ROUTE: &str = "/auth";

/// Path of the main screen
pub const ROOT_ROUTE: &str = "/";

/// What a guarded screen should do for the current session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show a neutral loading indicator
    Loading,
    /// Show nothing at all
    Nothing,
    /// Show the guarded content
    Render,
    /// Navigate elsewhere; `replace` drops the current history entry
    Redirect {
        /// Target path
        to: &'static str,
        /// Replace the current history entry instead of pushing a new one
        replace: bool,
    },
}

/// Guard for screens that require a session.
///
/// # Examples
///
/// ```
/// use callsum::routes::{protected, GuardOutcome, AUTH_ROUTE};
/// use callsum::session::SessionState;
///
/// assert_eq!(protected(&SessionState::loading()), GuardOutcome::Loading);
/// assert_eq!(
///     protected(&SessionState::resolved(None)),
///     GuardOutcome::Redirect { to: AUTH_ROUTE, replace: true }
/// );
/// ```
pub fn protected(state: &SessionState) -> GuardOutcome {
    if state.loading {
        GuardOutcome::Loading
    } else if state.is_authenticated() {
        GuardOutcome::Render
    } else {
        GuardOutcome::Redirect {
            to: AUTH_ROUTE,
            replace: true,
        }
    }
}

/// Guard for screens only meant for signed-out users (the auth form).
pub fn public(state: &SessionState) -> GuardOutcome {
    if state.loading {
        GuardOutcome::Nothing
    } else if state.is_authenticated() {
        GuardOutcome::Redirect {
            to: ROOT_ROUTE,
            replace: true,
        }
    } else {
        GuardOutcome::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::test_user;
    use crate::session::Session;

    fn signed_in() -> SessionState {
        SessionState::resolved(Some(Session::new("tok", test_user())))
    }

    #[test]
    fn test_protected_while_loading_shows_indicator_only() {
        assert_eq!(protected(&SessionState::loading()), GuardOutcome::Loading);
    }

    #[test]
    fn test_protected_without_session_redirects_with_replace() {
        assert_eq!(
            protected(&SessionState::resolved(None)),
            GuardOutcome::Redirect {
                to: "/auth",
                replace: true
            }
        );
    }

    #[test]
    fn test_protected_with_session_renders() {
        assert_eq!(protected(&signed_in()), GuardOutcome::Render);
    }

    #[test]
    fn test_protected_loading_with_stale_session_still_waits() {
        let mut state = signed_in();
        state.loading = true;
        assert_eq!(protected(&state), GuardOutcome::Loading);
    }

    #[test]
    fn test_public_while_loading_renders_nothing() {
        assert_eq!(public(&SessionState::loading()), GuardOutcome::Nothing);
    }

    #[test]
    fn test_public_signed_in_redirects_to_root() {
        assert_eq!(
            public(&signed_in()),
            GuardOutcome::Redirect {
                to: "/",
                replace: true
            }
        );
    }

    #[test]
    fn test_public_signed_out_renders() {
        assert_eq!(public(&SessionState::resolved(None)), GuardOutcome::Render);
    }
}
