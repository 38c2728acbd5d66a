//! Guard wrapper for routes that need a signed-in user.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionState;
use crate::util::guard::{GuardDecision, guard_decision, install_unauth_redirect};

/// Render `children` only for an authenticated session.
///
/// Shows a placeholder while the session resolves and redirects to `/login`
/// (replacing history) once it settles anonymous.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    install_unauth_redirect(session, use_navigate());

    move || match guard_decision(&session.get()) {
        GuardDecision::Loading => view! { <div class="route-loading">"Loading..."</div> }.into_any(),
        GuardDecision::Redirect { .. } => ().into_any(),
        GuardDecision::Render => children().into_any(),
    }
}
