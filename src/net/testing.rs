//! Test-only transport whose responses are settled by hand.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

use super::error::TransportError;
use super::http::{ApiClient, ApiRequest, ApiResponse, BearerAuth, Transport, TransportResult};
use crate::state::token_store::TokenStore;

pub(crate) const BASE_URL: &str = "https://api.reframe.test/api/";

struct Call {
    request: ApiRequest,
    responder: Option<oneshot::Sender<TransportResult>>,
}

/// Records every request and leaves it pending until the test answers it.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    calls: RefCell<Vec<Call>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub(crate) fn request(&self, index: usize) -> ApiRequest {
        self.calls.borrow()[index].request.clone()
    }

    pub(crate) fn respond(&self, index: usize, result: TransportResult) {
        let responder = self.calls.borrow_mut()[index].responder.take();
        if let Some(tx) = responder {
            let _ = tx.send(result);
        }
    }

    pub(crate) fn respond_json(&self, index: usize, status: u16, body: &str) {
        self.respond(index, Ok(ApiResponse { status, body: body.to_owned() }));
    }

    pub(crate) fn fail(&self, index: usize) {
        self.respond(index, Err(TransportError::Network("connection refused".to_owned())));
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, TransportResult> {
        let (tx, rx) = oneshot::channel();
        self.calls.borrow_mut().push(Call { request, responder: Some(tx) });
        async move {
            rx.await
                .unwrap_or_else(|_| Err(TransportError::Network("response dropped".to_owned())))
        }
        .boxed_local()
    }
}

/// Client over `transport` with bearer injection from `tokens`.
pub(crate) fn authed_client(transport: &Rc<ScriptedTransport>, tokens: Rc<dyn TokenStore>) -> ApiClient {
    let transport: Rc<dyn Transport> = transport.clone();
    ApiClient::new(BASE_URL, transport).with_layer(BearerAuth::new(tokens))
}
