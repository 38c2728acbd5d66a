//! Session state machine for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` is built by `app::App` and shared by context. Route
//! guards and user-aware components observe its `SessionState`; pages call
//! `login`, `logout`, and `sign_in`.
//!
//! DESIGN
//! ======
//! Phases are `Bootstrapping -> Anonymous | Authenticated(user)`. Every
//! identity fetch is tagged with a generation number; `bootstrap`, `login`,
//! and `logout` each advance it, and a fetch that settles under an older
//! generation writes nothing. The most recent call therefore decides the
//! final state no matter in which order responses arrive.
//!
//! ERROR HANDLING
//! ==============
//! No error escapes the store except from `sign_in`, whose caller needs a
//! failed-login signal. A failed identity fetch of any kind clears the token
//! and lands in `Anonymous`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use super::token_store::TokenStore;
use crate::net::api;
use crate::net::error::ApiError;
use crate::net::http::ApiClient;
use crate::net::types::{Credentials, UserProfile};

/// Observable snapshot of the session.
///
/// `resolving` is true only while an identity fetch for `token` is in
/// flight; `user` is present only when the latest fetch for `token`
/// succeeded.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub resolving: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { token: None, user: None, resolving: true }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("resolving", &self.resolving)
            .finish()
    }
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self { token: None, user: None, resolving: false }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.resolving {
            SessionPhase::Bootstrapping
        } else if let Some(user) = &self.user {
            SessionPhase::Authenticated(user.clone())
        } else {
            SessionPhase::Anonymous
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Bootstrapping,
    Anonymous,
    Authenticated(UserProfile),
}

impl SessionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bootstrapping => "bootstrapping",
            Self::Anonymous => "anonymous",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

type Listener = Rc<dyn Fn(&SessionState)>;

struct SessionInner {
    api: ApiClient,
    tokens: Rc<dyn TokenStore>,
    state: RefCell<SessionState>,
    generation: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

/// Shared handle to the session; clones refer to the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.state.borrow())
            .field("generation", &self.inner.generation.get())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store in the `Bootstrapping` phase. Nothing is fetched
    /// until [`SessionStore::bootstrap`] runs.
    pub fn new(api: ApiClient, tokens: Rc<dyn TokenStore>) -> Self {
        let state = SessionState { token: tokens.get(), user: None, resolving: true };
        Self {
            inner: Rc::new(SessionInner {
                api,
                tokens,
                state: RefCell::new(state),
                generation: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_resolving(&self) -> bool {
        self.inner.state.borrow().resolving
    }

    /// Register a listener invoked with the new state after every change.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Resolve the persisted token into a user.
    ///
    /// Without a stored token the store becomes `Anonymous` before this
    /// returns and no request is made.
    pub fn bootstrap(&self) -> impl Future<Output = SessionPhase> + 'static {
        let token = self.inner.tokens.get();
        self.begin(token)
    }

    /// Persist `token` and resolve the user it belongs to.
    ///
    /// The token is written and the identity request issued before this
    /// returns; the future only waits for the response.
    pub fn login(&self, token: impl Into<String>) -> impl Future<Output = SessionPhase> + 'static {
        let token = token.into();
        if token.trim().is_empty() {
            self.inner.tokens.clear();
            return self.begin(None);
        }
        self.inner.tokens.set(&token);
        self.begin(Some(token))
    }

    /// Drop the session locally. Any in-flight identity fetch is ignored
    /// when it settles.
    pub fn logout(&self) {
        self.advance();
        self.inner.tokens.clear();
        self.replace(SessionState::anonymous());
    }

    /// Exchange credentials for a token, then [`SessionStore::login`] with it.
    ///
    /// A `logout` (or any other transition) while the exchange is in flight
    /// wins: the issued token is dropped and the current phase returned.
    ///
    /// # Errors
    ///
    /// Returns the login endpoint's error when the exchange fails; the
    /// session is left untouched in that case.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SessionPhase, ApiError> {
        let generation = self.inner.generation.get();
        let token = api::obtain_token(&self.inner.api, credentials).await?;
        if generation != self.inner.generation.get() {
            log::debug!("discarding token exchange from superseded generation {generation}");
            return Ok(self.phase());
        }
        Ok(self.login(token).await)
    }

    fn begin(&self, token: Option<String>) -> impl Future<Output = SessionPhase> + 'static {
        let generation = self.advance();
        let pending = token.as_ref().map(|_| api::fetch_current_user(&self.inner.api));
        self.replace(SessionState { resolving: pending.is_some(), token, user: None });
        let store = self.clone();
        async move {
            match pending {
                Some(fetch) => store.settle(generation, fetch.await),
                None => store.phase(),
            }
        }
    }

    fn settle(&self, generation: u64, outcome: Result<UserProfile, ApiError>) -> SessionPhase {
        if generation != self.inner.generation.get() {
            log::debug!("discarding identity fetch from superseded generation {generation}");
            return self.phase();
        }
        match outcome {
            Ok(user) => {
                let mut next = self.state();
                next.user = Some(user);
                next.resolving = false;
                self.replace(next);
            }
            Err(err) => {
                log::warn!("identity fetch failed, signing out: {err}");
                self.inner.tokens.clear();
                self.replace(SessionState::anonymous());
            }
        }
        self.phase()
    }

    fn advance(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    fn replace(&self, next: SessionState) {
        log::debug!("session -> {}", next.phase().label());
        *self.inner.state.borrow_mut() = next;
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.state();
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
