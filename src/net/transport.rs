//! Browser transport for `ApiClient`.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: every request fails with
//! `TransportError::Unavailable`, since the API is only reachable from the
//! browser.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use futures::future::{FutureExt, LocalBoxFuture};

use super::error::TransportError;
use super::http::{ApiRequest, Transport, TransportResult};
#[cfg(feature = "hydrate")]
use super::http::{ApiResponse, Method};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, TransportResult> {
        fetch(request).boxed_local()
    }
}

async fn fetch(request: ApiRequest) -> TransportResult {
    #[cfg(feature = "hydrate")]
    {
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };
        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;
        let resp = built
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(TransportError::Unavailable)
    }
}
