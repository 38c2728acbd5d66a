//! Route guard decisions for session-gated screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded routes apply identical behavior: a placeholder while the session
//! resolves, a history-replacing redirect to `/login` when anonymous, and
//! the guarded content once a user is present.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{SessionPhase, SessionState};

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Loading,
    Redirect { to: &'static str, replace: bool },
    Render,
}

pub fn guard_decision(state: &SessionState) -> GuardDecision {
    match state.phase() {
        SessionPhase::Bootstrapping => GuardDecision::Loading,
        SessionPhase::Anonymous => GuardDecision::Redirect { to: LOGIN_ROUTE, replace: true },
        SessionPhase::Authenticated(_) => GuardDecision::Render,
    }
}

/// Navigation options for a guard redirect. Replacing the entry keeps the
/// back button from returning to the guarded page.
pub fn redirect_options(replace: bool) -> NavigateOptions {
    NavigateOptions { replace, ..NavigateOptions::default() }
}

/// Redirect to `/login` whenever the session settles without a user.
pub fn install_unauth_redirect<F>(session: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let GuardDecision::Redirect { to, replace } = guard_decision(&session.get()) {
            navigate(to, redirect_options(replace));
        }
    });
}
