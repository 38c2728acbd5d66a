//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates session work to
//! `state::session` through the `SessionHandle` context.

pub mod account;
pub mod home;
pub mod login;
pub mod signup;
