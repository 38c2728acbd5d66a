//! Client-side session state.
//!
//! DESIGN
//! ======
//! `token_store` owns the durable credential; `session` owns the reactive
//! view of who is signed in and drives the identity fetch.

pub mod session;
pub mod token_store;
