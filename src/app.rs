//! Root application component with routing and the session context.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::require_auth::RequireAuth;
use crate::components::site_header::SiteHeader;
use crate::config::ClientConfig;
use crate::net::http::{ApiClient, BearerAuth};
use crate::net::transport::BrowserTransport;
use crate::pages::{account::AccountPage, home::HomePage, login::LoginPage, signup::SignupPage};
use crate::state::session::SessionStore;
use crate::state::token_store::{BrowserTokenStore, TokenStore};

/// Context handle to the process-wide session store.
pub type SessionHandle = StoredValue<SessionStore, LocalStorage>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Build the session layer: token store, bearer-injecting client, store.
pub fn build_session(config: &ClientConfig) -> SessionStore {
    let tokens: Rc<dyn TokenStore> = Rc::new(BrowserTokenStore::new());
    let api = ApiClient::new(config.api_base_url(), Rc::new(BrowserTransport))
        .with_layer(BearerAuth::new(Rc::clone(&tokens)));
    SessionStore::new(api, tokens)
}

/// Root application component.
///
/// Provides the session contexts and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env().unwrap_or_else(|e| {
        log::warn!("{e}; using default API base URL");
        ClientConfig::default()
    });
    let store = build_session(&config);

    // Mirror store transitions into a signal so guards re-render reactively.
    let session = RwSignal::new(store.state());
    store.subscribe(move |state| session.set(state.clone()));

    provide_context(session);
    provide_context::<SessionHandle>(StoredValue::new_local(store.clone()));

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let phase = store.bootstrap().await;
        log::debug!("session bootstrap settled: {}", phase.label());
    });
    #[cfg(not(feature = "hydrate"))]
    drop(store);

    view! {
        <Stylesheet id="leptos" href="/pkg/reframe.css"/>
        <Title text="Re:Frame"/>

        <Router>
            <SiteHeader/>
            <main class="page">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("signup") view=SignupPage/>
                    <Route
                        path=StaticSegment("account")
                        view=|| view! { <RequireAuth><AccountPage/></RequireAuth> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
