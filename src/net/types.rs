//! Wire DTOs for the auth endpoints.
//!
//! DESIGN
//! ======
//! Identity payloads are validated at the boundary: a profile without an id
//! or a username never reaches the session store, and capability flags the
//! server omits default to `false` instead of staying undefined.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Server-resolved identity of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUserProfile")]
pub struct UserProfile {
    /// Primary key of the account.
    pub id: u64,
    /// Login name, also used as the display name.
    pub username: String,
    /// Contact address, when the server exposes it.
    pub email: Option<String>,
    /// Django staff flag.
    pub is_staff: bool,
    /// Django superuser flag. Independent of `is_staff`.
    pub is_superuser: bool,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        &self.username
    }

    /// Admin-only UI is shown when either capability flag is set.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

#[derive(Deserialize)]
struct RawUserProfile {
    #[serde(alias = "pk")]
    id: Option<u64>,
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    is_staff: bool,
    #[serde(default)]
    is_superuser: bool,
}

impl TryFrom<RawUserProfile> for UserProfile {
    type Error = &'static str;

    fn try_from(raw: RawUserProfile) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or("user profile is missing `id`")?;
        let username = raw
            .username
            .filter(|name| !name.trim().is_empty())
            .ok_or("user profile is missing `username`")?;
        Ok(Self {
            id,
            username,
            email: raw.email.filter(|email| !email.is_empty()),
            is_staff: raw.is_staff,
            is_superuser: raw.is_superuser,
        })
    }
}

/// Body of `POST auth/login/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST auth/registration/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Response of `POST auth/login/`.
///
/// JWT backends answer with `access`; plain token-auth backends answer
/// with `key`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

impl LoginResponse {
    /// The bearer token to persist, if the server issued a non-blank one.
    pub fn into_token(self) -> Option<String> {
        self.access
            .or(self.key)
            .filter(|token| !token.trim().is_empty())
    }
}
