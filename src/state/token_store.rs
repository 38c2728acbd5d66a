//! Durable storage for the bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token lives in `localStorage` under `accessToken` so a reload keeps
//! the user signed in. `net::http::BearerAuth` reads it before every
//! request; only the session store writes it.
//!
//! TRADE-OFFS
//! ==========
//! Storage is best-effort: when `localStorage` is missing or throws, the
//! store silently keeps the token in memory for the rest of the process,
//! while still deleting whatever was persisted before the failure.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::cell::{Cell, RefCell};

pub const TOKEN_STORAGE_KEY: &str = "accessToken";

/// Synchronous get/set/clear over a single opaque token.
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        non_blank(self.token.borrow().clone())
    }

    fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_owned());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

/// Storage is unreachable or refused the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("persistent storage unavailable")]
pub struct StorageUnavailable;

/// Origin-scoped key/value surface behind a [`PersistentTokenStore`].
/// Every operation fails with [`StorageUnavailable`] when the area is missing
/// or throws.
#[allow(clippy::missing_errors_doc)]
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageUnavailable>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageUnavailable>;
    fn remove(&self, key: &str) -> Result<(), StorageUnavailable>;
}

/// The browser's `window.localStorage`. Unavailable outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageArea;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageUnavailable> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageUnavailable)
}

impl KeyValueStorage for LocalStorageArea {
    fn read(&self, key: &str) -> Result<Option<String>, StorageUnavailable> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).map_err(|_| StorageUnavailable)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageUnavailable)
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageUnavailable> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.set_item(key, value).map_err(|_| StorageUnavailable)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageUnavailable)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageUnavailable> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.remove_item(key).map_err(|_| StorageUnavailable)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageUnavailable)
        }
    }
}

/// Durable token storage with an in-memory fallback.
///
/// After the first failure the store reads from memory only, but it keeps
/// removing the persisted key on every write and clear so a token written
/// before the failure cannot outlive a later login or logout.
#[derive(Debug)]
pub struct PersistentTokenStore<S> {
    storage: S,
    degraded: Cell<bool>,
    fallback: MemoryTokenStore,
}

/// Token store over `localStorage` under [`TOKEN_STORAGE_KEY`].
pub type BrowserTokenStore = PersistentTokenStore<LocalStorageArea>;

impl BrowserTokenStore {
    pub fn new() -> Self {
        Self::with_storage(LocalStorageArea)
    }
}

impl Default for BrowserTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyValueStorage> PersistentTokenStore<S> {
    pub fn with_storage(storage: S) -> Self {
        Self { storage, degraded: Cell::new(false), fallback: MemoryTokenStore::default() }
    }

    fn degrade(&self, op: &str) {
        if !self.degraded.replace(true) {
            log::warn!("token storage unavailable during {op}; keeping token in memory");
        }
    }

    fn purge(&self) {
        if self.storage.remove(TOKEN_STORAGE_KEY).is_err() {
            log::debug!("could not remove persisted token");
        }
    }
}

impl<S: KeyValueStorage> TokenStore for PersistentTokenStore<S> {
    fn get(&self) -> Option<String> {
        if !self.degraded.get() {
            match self.storage.read(TOKEN_STORAGE_KEY) {
                Ok(value) => return non_blank(value),
                Err(_) => self.degrade("read"),
            }
        }
        self.fallback.get()
    }

    fn set(&self, token: &str) {
        self.fallback.set(token);
        if self.degraded.get() {
            self.purge();
            return;
        }
        if self.storage.write(TOKEN_STORAGE_KEY, token).is_err() {
            self.degrade("write");
            self.purge();
        }
    }

    fn clear(&self) {
        self.fallback.clear();
        if self.storage.remove(TOKEN_STORAGE_KEY).is_err() {
            self.degrade("clear");
        }
    }
}

fn non_blank(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}
