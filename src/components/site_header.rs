//! Top navigation bar with the session badge.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads `SessionState` for the username and calls `SessionStore::logout`
//! through the `SessionHandle` context.

#[cfg(test)]
#[path = "site_header_test.rs"]
mod site_header_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::net::types::UserProfile;
use crate::state::session::SessionState;

/// Links shown in the account area of the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum AccountArea {
    Pending,
    SignedOut,
    SignedIn { greeting: String, admin: bool },
}

/// Primary navigation entries; every href is a route registered in `app::App`.
pub(crate) const NAV_LINKS: &[(&str, &str)] = &[("/", "Home"), ("/account", "Account")];

pub(crate) fn account_area(state: &SessionState) -> AccountArea {
    if state.resolving {
        return AccountArea::Pending;
    }
    match &state.user {
        Some(user) => AccountArea::SignedIn { greeting: greeting(user), admin: user.is_admin() },
        None => AccountArea::SignedOut,
    }
}

fn greeting(user: &UserProfile) -> String {
    format!("Signed in as {}", user.display_name())
}

#[component]
pub fn SiteHeader() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let store = expect_context::<SessionHandle>();
    let navigate = use_navigate();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        store.with_value(|s| s.logout());
        navigate("/", NavigateOptions::default());
    };

    view! {
        <header class="site-header">
            <a class="site-header__brand" href="/">"Re:Frame"</a>
            <nav class="site-header__nav">
                {NAV_LINKS
                    .iter()
                    .map(|(href, label)| view! { <a href=*href>{*label}</a> })
                    .collect_view()}
            </nav>
            <div class="site-header__account">
                {move || match account_area(&session.get()) {
                    AccountArea::Pending => ().into_any(),
                    AccountArea::SignedOut => view! {
                        <a href="/login">"Log in"</a>
                        <a href="/signup">"Sign up"</a>
                    }
                    .into_any(),
                    AccountArea::SignedIn { greeting, admin } => view! {
                        <span class="site-header__user">{greeting}</span>
                        {admin.then(|| view! { <span class="site-header__badge">"Admin"</span> })}
                        <button class="site-header__logout" on:click=on_logout.clone()>"Log out"</button>
                    }
                    .into_any(),
                }}
            </div>
        </header>
    }
}
