//! Username + password login page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
#[cfg(any(test, feature = "hydrate"))]
use crate::net::error::ApiError;
use crate::net::types::Credentials;
#[cfg(any(test, feature = "hydrate"))]
use crate::state::session::SessionPhase;

const MISSING_CREDENTIALS: &str = "Enter both username and password.";

fn validate_login_input(username: &str, password: &str) -> Result<Credentials, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    Ok(Credentials { username: username.to_owned(), password: password.to_owned() })
}

/// Message to show after a sign-in attempt; `None` means navigate away.
#[cfg(any(test, feature = "hydrate"))]
fn sign_in_message(result: &Result<SessionPhase, ApiError>) -> Option<String> {
    match result {
        Ok(SessionPhase::Authenticated(_)) => None,
        Ok(_) => Some("Signed in, but your profile could not be loaded. Try again.".to_owned()),
        Err(ApiError::Status { status, .. }) if (400..500).contains(status) => {
            Some("Login failed. Check your username and password.".to_owned())
        }
        Err(e) => Some(format!("Login failed: {e}")),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<SessionHandle>();
    let navigate = use_navigate();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_login_input(&username.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let session = store.get_value();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let result = session.sign_in(&credentials).await;
                busy.set(false);
                match sign_in_message(&result) {
                    None => navigate("/", NavigateOptions::default()),
                    Some(message) => {
                        password.set(String::new());
                        info.set(message);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (credentials, store, &navigate);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Log in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        name="username"
                        placeholder="Username"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        name="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Log in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__subtitle">
                    "No account yet? "
                    <a href="/signup">"Sign up"</a>
                </p>
            </div>
        </div>
    }
}
