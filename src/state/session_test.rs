use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::net::http::AUTHORIZATION;
use crate::net::testing::{ScriptedTransport, authed_client};
use crate::state::token_store::MemoryTokenStore;

const ADMIN: &str = r#"{"id":1,"username":"admin","is_staff":true}"#;
const MINA: &str = r#"{"id":2,"username":"mina"}"#;

struct Harness {
    transport: Rc<ScriptedTransport>,
    tokens: Rc<MemoryTokenStore>,
    store: SessionStore,
}

fn harness_with(tokens: Rc<MemoryTokenStore>) -> Harness {
    let transport = ScriptedTransport::new();
    let store = SessionStore::new(authed_client(&transport, tokens.clone()), tokens.clone());
    Harness { transport, tokens, store }
}

fn harness(token: Option<&str>) -> Harness {
    let tokens = Rc::new(MemoryTokenStore::default());
    if let Some(token) = token {
        tokens.set(token);
    }
    harness_with(tokens)
}

fn user(json: &str) -> UserProfile {
    serde_json::from_str(json).unwrap()
}

fn credentials() -> Credentials {
    Credentials { username: "admin".to_owned(), password: "pw".to_owned() }
}

// =============================================================
// Bootstrap
// =============================================================

#[test]
fn new_store_starts_bootstrapping_without_requests() {
    let h = harness(Some("tok"));
    assert_eq!(h.store.phase(), SessionPhase::Bootstrapping);
    assert!(h.store.is_resolving());
    assert_eq!(h.store.state().token.as_deref(), Some("tok"));
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn bootstrap_without_token_is_anonymous_without_network() {
    let h = harness(None);
    let pending = h.store.bootstrap();
    assert_eq!(h.store.phase(), SessionPhase::Anonymous);
    assert!(!h.store.is_resolving());
    assert_eq!(block_on(pending), SessionPhase::Anonymous);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn bootstrap_with_valid_token_authenticates() {
    let h = harness(Some("tok"));
    let pending = h.store.bootstrap();
    assert!(h.store.is_resolving());
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.transport.request(0).header(AUTHORIZATION), Some("Bearer tok"));

    h.transport.respond_json(0, 200, ADMIN);
    assert_eq!(block_on(pending), SessionPhase::Authenticated(user(ADMIN)));
    let state = h.store.state();
    assert!(!state.resolving);
    assert_eq!(state.token.as_deref(), Some("tok"));
    assert!(h.store.user().is_some_and(|u| u.is_admin()));
}

#[test]
fn bootstrap_with_rejected_token_clears_store() {
    let h = harness(Some("expired"));
    let pending = h.store.bootstrap();
    h.transport.respond_json(0, 401, r#"{"detail":"Given token not valid"}"#);
    assert_eq!(block_on(pending), SessionPhase::Anonymous);
    assert_eq!(h.tokens.get(), None);
    assert_eq!(h.store.state(), SessionState::anonymous());
}

#[test]
fn bootstrap_network_failure_degrades_to_anonymous() {
    let h = harness(Some("tok"));
    let pending = h.store.bootstrap();
    h.transport.fail(0);
    assert_eq!(block_on(pending), SessionPhase::Anonymous);
    assert_eq!(h.tokens.get(), None);
}

#[test]
fn bootstrap_malformed_profile_degrades_to_anonymous() {
    let h = harness(Some("tok"));
    let pending = h.store.bootstrap();
    h.transport.respond_json(0, 200, r#"{"username":"no-id"}"#);
    assert_eq!(block_on(pending), SessionPhase::Anonymous);
    assert_eq!(h.tokens.get(), None);
}

#[test]
fn resolving_flips_to_false_exactly_once() {
    let h = harness(Some("tok"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.store.subscribe(move |state| sink.borrow_mut().push(state.resolving));

    let pending = h.store.bootstrap();
    h.transport.respond_json(0, 200, ADMIN);
    block_on(pending);

    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[test]
fn resolving_is_false_immediately_without_token() {
    let h = harness(None);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.store.subscribe(move |state| sink.borrow_mut().push(state.resolving));

    block_on(h.store.bootstrap());
    assert_eq!(*seen.borrow(), vec![false]);
}

// =============================================================
// Login / logout
// =============================================================

#[test]
fn login_persists_token_and_authenticates() {
    let h = harness(None);
    block_on(h.store.bootstrap());

    let pending = h.store.login("T");
    assert_eq!(h.tokens.get().as_deref(), Some("T"));
    assert_eq!(h.store.state().token.as_deref(), Some("T"));
    assert_eq!(h.store.phase(), SessionPhase::Bootstrapping);
    assert_eq!(h.transport.request(0).header(AUTHORIZATION), Some("Bearer T"));

    h.transport.respond_json(0, 200, MINA);
    assert_eq!(block_on(pending), SessionPhase::Authenticated(user(MINA)));
}

#[test]
fn login_clears_previous_user_until_resolved() {
    let h = harness(Some("old"));
    let pending = h.store.bootstrap();
    h.transport.respond_json(0, 200, ADMIN);
    block_on(pending);

    let _pending = h.store.login("new");
    assert_eq!(h.store.user(), None);
    assert!(h.store.is_resolving());
}

#[test]
fn login_with_rejected_token_stays_anonymous() {
    let h = harness(None);
    block_on(h.store.bootstrap());
    let pending = h.store.login("bogus");
    h.transport.respond_json(0, 401, "{}");
    assert_eq!(block_on(pending), SessionPhase::Anonymous);
    assert_eq!(h.tokens.get(), None);
}

#[test]
fn login_with_blank_token_is_anonymous_without_network() {
    let h = harness(None);
    assert_eq!(block_on(h.store.login("  ")), SessionPhase::Anonymous);
    assert_eq!(h.transport.call_count(), 0);
    assert_eq!(h.tokens.get(), None);
}

#[test]
fn logout_is_local_and_clears_everything() {
    let h = harness(Some("tok"));
    let pending = h.store.bootstrap();
    h.transport.respond_json(0, 200, ADMIN);
    block_on(pending);

    h.store.logout();
    assert_eq!(h.store.state(), SessionState::anonymous());
    assert_eq!(h.tokens.get(), None);
    assert_eq!(h.transport.call_count(), 1);
}

// =============================================================
// Ordering races (generation guard)
// =============================================================

#[test]
fn logout_before_fetch_settles_stays_anonymous() {
    let h = harness(None);
    block_on(h.store.bootstrap());

    let pending = h.store.login("T");
    h.store.logout();
    h.transport.respond_json(0, 200, ADMIN);

    assert_eq!(block_on(pending), SessionPhase::Anonymous);
    assert_eq!(h.store.user(), None);
    assert_eq!(h.tokens.get(), None);
}

#[test]
fn logout_during_token_exchange_discards_issued_token() {
    let h = harness(None);
    block_on(h.store.bootstrap());

    let creds = credentials();
    let mut pending = Box::pin(h.store.sign_in(&creds));
    let outcome = block_on(async {
        assert!(futures::poll!(&mut pending).is_pending());
        h.store.logout();
        h.transport.respond_json(0, 200, r#"{"access":"fresh"}"#);
        pending.await
    });

    assert_eq!(outcome, Ok(SessionPhase::Anonymous));
    assert_eq!(h.tokens.get(), None);
    assert_eq!(h.store.state(), SessionState::anonymous());
    assert_eq!(h.transport.call_count(), 1);
}

#[test]
fn latest_login_wins_when_earlier_fetch_settles_last() {
    let h = harness(None);
    let first = h.store.login("T1");
    let second = h.store.login("T2");
    assert_eq!(h.transport.request(0).header(AUTHORIZATION), Some("Bearer T1"));
    assert_eq!(h.transport.request(1).header(AUTHORIZATION), Some("Bearer T2"));

    h.transport.respond_json(1, 200, MINA);
    assert_eq!(block_on(second), SessionPhase::Authenticated(user(MINA)));
    h.transport.respond_json(0, 200, ADMIN);
    assert_eq!(block_on(first), SessionPhase::Authenticated(user(MINA)));

    assert_eq!(h.store.user(), Some(user(MINA)));
    assert_eq!(h.tokens.get().as_deref(), Some("T2"));
}

#[test]
fn latest_login_wins_when_earlier_fetch_settles_first() {
    let h = harness(None);
    let first = h.store.login("T1");
    let second = h.store.login("T2");

    h.transport.respond_json(0, 200, ADMIN);
    assert_eq!(block_on(first), SessionPhase::Bootstrapping);
    assert_eq!(h.store.user(), None);

    h.transport.respond_json(1, 200, MINA);
    assert_eq!(block_on(second), SessionPhase::Authenticated(user(MINA)));
}

#[test]
fn stale_fetch_failure_does_not_clear_newer_token() {
    let h = harness(None);
    let first = h.store.login("T1");
    let second = h.store.login("T2");

    h.transport.respond_json(0, 401, "{}");
    block_on(first);
    assert_eq!(h.tokens.get().as_deref(), Some("T2"));

    h.transport.respond_json(1, 200, MINA);
    assert_eq!(block_on(second), SessionPhase::Authenticated(user(MINA)));
}

// =============================================================
// Persistence across restarts
// =============================================================

#[test]
fn login_then_restart_restores_same_user() {
    let tokens = Rc::new(MemoryTokenStore::default());

    let first = harness_with(tokens.clone());
    block_on(first.store.bootstrap());
    let pending = first.store.login("T");
    first.transport.respond_json(0, 200, ADMIN);
    let before = block_on(pending);
    drop(first);

    let second = harness_with(tokens);
    let pending = second.store.bootstrap();
    assert_eq!(second.transport.request(0).header(AUTHORIZATION), Some("Bearer T"));
    second.transport.respond_json(0, 200, ADMIN);
    assert_eq!(block_on(pending), before);
    assert_eq!(before, SessionPhase::Authenticated(user(ADMIN)));
}

// =============================================================
// sign_in
// =============================================================

#[test]
fn sign_in_exchanges_credentials_then_resolves_user() {
    let h = harness(None);
    block_on(h.store.bootstrap());

    let creds = credentials();
    let mut pending = Box::pin(h.store.sign_in(&creds));
    let outcome = block_on(async {
        assert!(futures::poll!(&mut pending).is_pending());
        assert_eq!(h.transport.request(0).header(AUTHORIZATION), None);
        h.transport.respond_json(0, 200, r#"{"access":"fresh"}"#);

        assert!(futures::poll!(&mut pending).is_pending());
        assert_eq!(h.transport.request(1).header(AUTHORIZATION), Some("Bearer fresh"));
        h.transport.respond_json(1, 200, ADMIN);

        pending.await
    });

    assert_eq!(outcome, Ok(SessionPhase::Authenticated(user(ADMIN))));
    assert_eq!(h.tokens.get().as_deref(), Some("fresh"));
}

#[test]
fn sign_in_with_bad_credentials_leaves_session_untouched() {
    let h = harness(None);
    block_on(h.store.bootstrap());

    let creds = credentials();
    let mut pending = Box::pin(h.store.sign_in(&creds));
    let outcome = block_on(async {
        assert!(futures::poll!(&mut pending).is_pending());
        h.transport.respond_json(0, 400, r#"{"non_field_errors":["Unable to log in."]}"#);
        pending.await
    });

    assert!(matches!(outcome, Err(ApiError::Status { status: 400, .. })));
    assert_eq!(h.store.phase(), SessionPhase::Anonymous);
    assert_eq!(h.transport.call_count(), 1);
}

// =============================================================
// Listeners and state helpers
// =============================================================

#[test]
fn listeners_may_read_the_store_reentrantly() {
    let h = harness(Some("tok"));
    let phases = Rc::new(RefCell::new(Vec::new()));
    let sink = phases.clone();
    let observed = h.store.clone();
    h.store.subscribe(move |_| sink.borrow_mut().push(observed.phase().label()));

    let pending = h.store.bootstrap();
    h.transport.respond_json(0, 200, ADMIN);
    block_on(pending);
    h.store.logout();

    assert_eq!(*phases.borrow(), vec!["bootstrapping", "authenticated", "anonymous"]);
}

#[test]
fn state_debug_redacts_token() {
    let state = SessionState { token: Some("secret-token".to_owned()), user: None, resolving: false };
    let rendered = format!("{state:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn default_state_is_bootstrapping() {
    assert_eq!(SessionState::default().phase(), SessionPhase::Bootstrapping);
    assert_eq!(SessionState::default().user, None);
}
