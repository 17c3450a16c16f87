use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::UpstreamError;
use crate::language::Language;

/// Body of the outbound `POST /query` call.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamQuery<'a> {
    pub query: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpstreamReply {
    response: Option<serde_json::Value>,
}

/// The natural-language service that actually answers visitor questions.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn answer(&self, query: &str, language: Language) -> Result<String, UpstreamError>;
}

/// Answering service reached over HTTP.
pub struct HttpAnswerService {
    base_url: String,
    client: Client,
}

impl HttpAnswerService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Using answering service at: {}", base_url);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn answer(&self, query: &str, language: Language) -> Result<String, UpstreamError> {
        let url = format!("{}/query", self.base_url);
        let payload = UpstreamQuery {
            query,
            language: language.code(),
        };
        debug!("Forwarding to {}: {:?}", url, payload);

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Upstream body: {}", body);

        let reply: UpstreamReply =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        match reply.response {
            Some(serde_json::Value::String(text)) => {
                info!("Upstream answer length: {} characters", text.len());
                Ok(text)
            }
            Some(other) => Err(UpstreamError::Malformed(format!(
                "`response` is not a string: {}",
                other
            ))),
            None => Err(UpstreamError::Malformed("missing `response` field".to_string())),
        }
    }
}
