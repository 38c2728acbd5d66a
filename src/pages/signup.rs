//! Account registration page.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::SessionHandle;
use crate::net::api::PASSWORD_MISMATCH;
#[cfg(any(test, feature = "hydrate"))]
use crate::net::error::ApiError;
use crate::net::types::Registration;

const MISSING_FIELDS: &str = "Fill in every field.";

fn validate_signup_input(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<Registration, &'static str> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(MISSING_FIELDS);
    }
    if password != confirm {
        return Err(PASSWORD_MISMATCH);
    }
    Ok(Registration {
        username: username.to_owned(),
        email: email.to_owned(),
        password1: password.to_owned(),
        password2: confirm.to_owned(),
    })
}

#[cfg(any(test, feature = "hydrate"))]
fn signup_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status: 400, body } if !body.is_empty() => format!("Sign-up failed: {body}"),
        other => format!("Sign-up failed: {other}"),
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let store = expect_context::<SessionHandle>();
    let navigate = use_navigate();
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let registration = match validate_signup_input(&username.get(), &email.get(), &password.get(), &confirm.get()) {
            Ok(registration) => registration,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let client = store.with_value(|s| s.api().clone());
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::register(&client, &registration).await {
                    Ok(()) => navigate("/login", NavigateOptions::default()),
                    Err(e) => {
                        info.set(signup_failure_message(&e));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (registration, store, &navigate);
        }
    };

    let field = |label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <input
                class="login-input"
                type=kind
                placeholder=label
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign up"</h1>
                <form class="login-form" on:submit=on_submit>
                    {field("Username", "text", username)}
                    {field("Email", "email", email)}
                    {field("Password", "password", password)}
                    {field("Confirm password", "password", confirm)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
