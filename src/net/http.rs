//! Pre-configured request pipeline for the REST API.
//!
//! DESIGN
//! ======
//! A request flows `ApiClient` -> each `RequestLayer` -> `Transport`. Layers
//! run synchronously when a verb is called, before the returned future is
//! first polled, so the credential attached is the one current at call time.
//! The client never interprets status codes: responses and transport
//! failures reach the caller unchanged.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::TransportError;
use crate::state::token_store::TokenStore;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Set `name`, replacing any existing value (case-insensitive).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }
}

/// Raw response as received from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub type TransportResult = Result<ApiResponse, TransportError>;

/// Issues a resolved request over the network.
pub trait Transport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, TransportResult>;
}

/// Rewrites a request before it is handed to the transport.
pub trait RequestLayer {
    fn apply(&self, request: &mut ApiRequest);
}

/// Attaches the stored bearer token to every request, when one exists.
pub struct BearerAuth {
    tokens: Rc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(tokens: Rc<dyn TokenStore>) -> Self {
        Self { tokens }
    }
}

impl RequestLayer for BearerAuth {
    fn apply(&self, request: &mut ApiRequest) {
        if let Some(token) = self.tokens.get() {
            request.set_header(AUTHORIZATION, format!("Bearer {token}"));
        }
    }
}

/// Request-issuing handle bound to one API origin.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn Transport>,
    layers: Vec<Rc<dyn RequestLayer>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn Transport>) -> Self {
        Self { base_url: base_url.into(), transport, layers: Vec::new() }
    }

    /// Append a layer; layers run in insertion order.
    #[must_use]
    pub fn with_layer(mut self, layer: impl RequestLayer + 'static) -> Self {
        self.layers.push(Rc::new(layer));
        self
    }

    /// Same origin and transport with every layer stripped.
    ///
    /// Credential exchanges go through this so a stale stored token is never
    /// presented alongside a password.
    #[must_use]
    pub fn unauthenticated(&self) -> Self {
        Self { base_url: self.base_url.clone(), transport: Rc::clone(&self.transport), layers: Vec::new() }
    }

    /// Resolve `path` against the base URL with exactly one `/` between them.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub fn get(&self, path: &str) -> LocalBoxFuture<'static, TransportResult> {
        self.send(Method::Get, path, None)
    }

    pub fn delete(&self, path: &str) -> LocalBoxFuture<'static, TransportResult> {
        self.send(Method::Delete, path, None)
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> LocalBoxFuture<'static, TransportResult> {
        self.send_json(Method::Post, path, body)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> LocalBoxFuture<'static, TransportResult> {
        self.send_json(Method::Put, path, body)
    }

    pub fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> LocalBoxFuture<'static, TransportResult> {
        self.send_json(Method::Patch, path, body)
    }

    fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> LocalBoxFuture<'static, TransportResult> {
        match serde_json::to_string(body) {
            Ok(json) => self.send(method, path, Some(json)),
            Err(err) => futures::future::ready(Err(TransportError::Build(err.to_string()))).boxed_local(),
        }
    }

    /// Build the request, run every layer, and hand it to the transport.
    pub fn send(&self, method: Method, path: &str, body: Option<String>) -> LocalBoxFuture<'static, TransportResult> {
        let mut request = ApiRequest::new(method, self.url(path));
        if body.is_some() {
            request.set_header(CONTENT_TYPE, "application/json");
        }
        request.body = body;
        for layer in &self.layers {
            layer.apply(&mut request);
        }
        log::debug!("{} {}", request.method, request.url);
        self.transport.send(request)
    }
}
