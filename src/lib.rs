//! # reframe-client
//!
//! Leptos + WASM frontend for the Re:Frame community and photo-restoration
//! site. The REST API lives on a separate origin; this crate owns the
//! browser-side session layer that every screen depends on.
//!
//! This crate contains the token store, the bearer-injecting HTTP client,
//! the session state machine, the route guard, and the auth pages that
//! drive them.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install console hooks and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
