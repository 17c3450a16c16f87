use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::error::TransportError;
use crate::web::models::{QueryRequest, ResponseSource};

/// What a session gets back from the gateway. Both fields are optional; a
/// missing answer is handled by the session, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayReply {
    pub response: Option<String>,
    pub source: Option<ResponseSource>,
}

impl GatewayReply {
    /// Read a 2xx body field by field. Anything unusable becomes `None`
    /// instead of failing the whole reply.
    pub fn from_body(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };
        Self {
            response: value
                .get("response")
                .and_then(Value::as_str)
                .map(str::to_string),
            source: value
                .get("source")
                .and_then(|source| serde_json::from_value(source.clone()).ok()),
        }
    }
}

/// One round trip from a session to the chat gateway.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &QueryRequest) -> Result<GatewayReply, TransportError>;
}

/// Talks to a gateway's `POST /api/chat` endpoint.
pub struct HttpChatTransport {
    endpoint: String,
    client: Client,
}

impl HttpChatTransport {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/chat", gateway_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &QueryRequest) -> Result<GatewayReply, TransportError> {
        debug!("POST {} {:?}", self.endpoint, request);
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(GatewayReply::from_body(&body))
    }
}
