//! Typed calls against the dj-rest-auth endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`; non-2xx answers become
//! `ApiError::Status` and unparseable bodies `ApiError::Decode`. Callers
//! decide whether a failure is user-visible.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use super::error::ApiError;
use super::http::{ApiClient, ApiResponse, TransportResult};
use super::types::{Credentials, LoginResponse, Registration, UserProfile};

pub const CURRENT_USER_PATH: &str = "auth/user/";
pub const LOGIN_PATH: &str = "auth/login/";
pub const REGISTRATION_PATH: &str = "auth/registration/";

pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";

/// Fetch the profile of the user owning the attached bearer token.
///
/// The request is issued before this returns, carrying whatever token is
/// stored at call time; the future only waits for and decodes the response.
/// It resolves to an error if the request fails, the token is rejected, or
/// the profile payload is malformed.
pub fn fetch_current_user(client: &ApiClient) -> impl Future<Output = Result<UserProfile, ApiError>> + 'static {
    let pending = client.get(CURRENT_USER_PATH);
    async move { decode_current_user(pending.await) }
}

fn decode_current_user(result: TransportResult) -> Result<UserProfile, ApiError> {
    let resp = successful(result)?;
    Ok(resp.json::<UserProfile>()?)
}

/// Exchange credentials for a bearer token at `POST auth/login/`.
///
/// The request is always sent without a stored token attached.
///
/// # Errors
///
/// Returns an error if the request fails, the credentials are rejected, or
/// the response carries no token.
pub async fn obtain_token(client: &ApiClient, credentials: &Credentials) -> Result<String, ApiError> {
    let result = client.unauthenticated().post(LOGIN_PATH, credentials).await;
    let resp = successful(result)?;
    resp.json::<LoginResponse>()?
        .into_token()
        .ok_or_else(|| ApiError::Decode("login response carried no access token".to_owned()))
}

/// Create an account at `POST auth/registration/`.
///
/// # Errors
///
/// Returns an error if the passwords differ, the request fails, or the
/// server rejects the registration.
pub async fn register(client: &ApiClient, registration: &Registration) -> Result<(), ApiError> {
    if registration.password1 != registration.password2 {
        return Err(ApiError::Invalid(PASSWORD_MISMATCH));
    }
    let result = client.unauthenticated().post(REGISTRATION_PATH, registration).await;
    successful(result).map(|_| ())
}

fn successful(result: TransportResult) -> Result<ApiResponse, ApiError> {
    let resp = result?;
    if !resp.is_success() {
        return Err(ApiError::Status { status: resp.status, body: resp.body });
    }
    Ok(resp)
}
