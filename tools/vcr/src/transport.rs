use crate::errors::VcrError;
use crate::message::{FormFields, HttpRequest, HttpResponse, ResponseBody};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Live network capability injected into the engine.
pub trait HttpTransport: Send + Sync {
    /// Send a fully built request. The engine buffers the body beforehand.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, VcrError>;
    fn get(&self, url: &str) -> Result<HttpResponse, VcrError>;
    fn post_form(&self, url: &str, fields: &FormFields) -> Result<HttpResponse, VcrError>;
}

// ── ReqwestTransport ──────────────────────────────────────────────────────────

/// Default transport over `reqwest::blocking`. The response body is handed
/// back as a stream straight off the connection.
///
/// Must not be constructed or used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, VcrError> {
        Self::with_options(None, None)
    }

    pub fn with_options(
        timeout: Option<Duration>,
        user_agent: Option<&str>,
    ) -> Result<Self, VcrError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| VcrError::Transport(format!("building http client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    fn send(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> Result<HttpResponse, VcrError> {
        let response = builder
            .send()
            .map_err(|e| VcrError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status: response.status(),
            version: response.version(),
            headers: response.headers().clone(),
            body: ResponseBody::Streaming(Box::new(response)),
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, VcrError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = request.body_bytes()? {
            builder = builder.body(body.clone());
        }
        self.send(builder)
    }

    fn get(&self, url: &str) -> Result<HttpResponse, VcrError> {
        self.send(self.client.get(url))
    }

    fn post_form(&self, url: &str, fields: &FormFields) -> Result<HttpResponse, VcrError> {
        self.send(
            self.client
                .request(Method::POST, url)
                .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
                .body(fields.encode()),
        )
    }
}

// ── FakeTransport ─────────────────────────────────────────────────────────────

/// A call observed by [`FakeTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Execute { method: String, url: String, body: Vec<u8> },
    Get { url: String },
    PostForm { url: String, body: String },
}

type Responder = dyn Fn(&TransportCall, usize) -> Result<HttpResponse, VcrError> + Send + Sync;

/// Scripted transport for tests. Queued responses are served first, then the
/// responder (if any) is asked; with neither, the call fails.
#[derive(Clone, Default)]
pub struct FakeTransport {
    queued: Arc<Mutex<VecDeque<Result<HttpResponse, VcrError>>>>,
    responder: Option<Arc<Responder>>,
    calls: Arc<Mutex<Vec<TransportCall>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call with `responder(call, index)`, `index` counting calls
    /// from zero.
    pub fn with_responder(
        responder: impl Fn(&TransportCall, usize) -> Result<HttpResponse, VcrError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            responder: Some(Arc::new(responder)),
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: Result<HttpResponse, VcrError>) {
        self.queued
            .lock()
            .expect("queued lock")
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn respond(&self, call: TransportCall) -> Result<HttpResponse, VcrError> {
        let index = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push(call.clone());
            calls.len() - 1
        };
        if let Some(queued) = self.queued.lock().expect("queued lock").pop_front() {
            return queued;
        }
        match &self.responder {
            Some(responder) => responder(&call, index),
            None => Err(VcrError::Transport(
                "fake transport has no scripted response".to_string(),
            )),
        }
    }
}

impl HttpTransport for FakeTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, VcrError> {
        let body = request
            .body_bytes()?
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        self.respond(TransportCall::Execute {
            method: request.method.to_string(),
            url: request.url.to_string(),
            body,
        })
    }

    fn get(&self, url: &str) -> Result<HttpResponse, VcrError> {
        self.respond(TransportCall::Get {
            url: url.to_string(),
        })
    }

    fn post_form(&self, url: &str, fields: &FormFields) -> Result<HttpResponse, VcrError> {
        self.respond(TransportCall::PostForm {
            url: url.to_string(),
            body: fields.encode(),
        })
    }
}
