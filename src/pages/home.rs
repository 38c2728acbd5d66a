//! Public landing page.

use leptos::prelude::*;

use crate::state::session::SessionState;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let welcome = move || match session.get().user {
        Some(user) => format!("Welcome back, {}.", user.display_name()),
        None => "Restore old photos and share them with the community.".to_owned(),
    };

    view! {
        <section class="home-page">
            <h1>"Re:Frame"</h1>
            <p class="home-page__lead">{welcome}</p>
        </section>
    }
}
