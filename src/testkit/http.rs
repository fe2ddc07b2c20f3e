//! Scripted [`HttpTransport`] for exercising adapters without a network.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{TransportError, TransportErrorKind};
use crate::port::outbound::{HttpRequest, HttpResponse, HttpTransport};

type Reply = Result<HttpResponse, TransportError>;

/// Replies per exact URL. Replies queued for a URL are served in order and
/// the last one repeats; unknown URLs answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, url: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a 200 response with `body`.
    pub fn ok(self, url: &str, body: impl Into<String>) -> Self {
        self.push(url, Ok(HttpResponse::new(200, body)))
    }

    /// Queue a 200 response with `value` serialized as JSON.
    pub fn json(self, url: &str, value: &serde_json::Value) -> Self {
        self.ok(url, value.to_string())
    }

    /// Queue an empty response with `status`.
    pub fn status(self, url: &str, status: u16) -> Self {
        self.push(url, Ok(HttpResponse::new(status, "")))
    }

    /// Queue a transport failure.
    pub fn fail(self, url: &str, kind: TransportErrorKind) -> Self {
        self.push(url, Err(TransportError::new(kind, "scripted failure")))
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests sent to `url`.
    pub fn count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }

    /// Total number of requests.
    pub fn total(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());

        let mut routes = self.routes.lock();
        let Some(queue) = routes.get_mut(request.url.as_str()) else {
            return Ok(HttpResponse::new(404, "not found"));
        };
        if queue.len() > 1 {
            if let Some(reply) = queue.pop_front() {
                return reply;
            }
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "not found")))
    }
}
