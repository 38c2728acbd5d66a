//! Signed-in account overview. Mounted behind `RequireAuth`.

use leptos::prelude::*;

use crate::state::session::SessionState;

#[component]
pub fn AccountPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();

    move || {
        session.get().user.map(|user| {
            let admin = user.is_admin();
            view! {
                <section class="account-page">
                    <h1>{user.username.clone()}</h1>
                    <dl class="account-page__details">
                        <dt>"Account ID"</dt>
                        <dd>{user.id}</dd>
                        <dt>"Email"</dt>
                        <dd>{user.email.clone().unwrap_or_else(|| "-".to_owned())}</dd>
                    </dl>
                    {admin.then(|| view! { <p class="account-page__badge">"Administrator"</p> })}
                </section>
            }
        })
    }
}
