use futures::executor::block_on;

use super::*;
use crate::state::session::SessionPhase;

#[test]
fn build_session_points_client_at_configured_origin() {
    let config = ClientConfig::new("https://api.reframe.example/api").unwrap();
    let store = build_session(&config);
    assert_eq!(store.api().url("auth/user/"), "https://api.reframe.example/api/auth/user/");
    assert_eq!(store.phase(), SessionPhase::Bootstrapping);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn build_session_bootstraps_anonymous_outside_the_browser() {
    let store = build_session(&ClientConfig::default());
    assert_eq!(block_on(store.bootstrap()), SessionPhase::Anonymous);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn login_without_reachable_api_falls_back_to_anonymous() {
    let store = build_session(&ClientConfig::default());
    assert_eq!(block_on(store.login("tok")), SessionPhase::Anonymous);
    assert_eq!(store.state().token, None);
}
