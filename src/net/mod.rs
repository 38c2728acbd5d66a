//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the request pipeline (base URL, request layers, transport),
//! `transport` binds it to the browser, `api` holds the typed auth endpoints,
//! and `types` defines the wire schema.

pub mod api;
pub mod error;
pub mod http;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;
pub mod types;
