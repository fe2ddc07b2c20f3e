//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::warn;

use super::settings::HttpSettings;
use crate::error::{TransportError, TransportErrorKind};
use crate::port::outbound::{HttpRequest, HttpResponse, HttpTransport};

/// Production transport. Owns its own connection pool, so each build
/// worker gets a separate instance.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: HttpClient,
}

impl ReqwestTransport {
    #[must_use]
    pub fn from_settings(settings: &HttpSettings) -> Self {
        let http = HttpClient::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self { http }
    }
}

fn classify(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() || err.is_request() {
        TransportErrorKind::Connect
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Other
    }
}

fn transport_error(err: &reqwest::Error) -> TransportError {
    TransportError::new(classify(err), err.to_string())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.http.get(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|err| transport_error(&err))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            let mut err = transport_error(&err);
            if err.kind == TransportErrorKind::Other {
                err.kind = TransportErrorKind::Body;
            }
            err
        })?;

        Ok(HttpResponse::new(status, body))
    }
}
