use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::language::Language;

/// Body accepted by the chat endpoint. Deployments have sent the visitor's
/// text as either `query` or `message`; both are accepted.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Kept as raw JSON so an unusable value resolves to English instead of
    /// rejecting the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Value>,
}

impl ChatRequest {
    /// The visitor's trimmed text, preferring `query` over `message`.
    /// `None` when neither carries anything but whitespace.
    pub fn text(&self) -> Option<&str> {
        [self.query.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// Requested language, or `default` when none was sent.
    pub fn language_or(&self, default: Language) -> Language {
        match &self.language {
            None | Some(Value::Null) => default,
            Some(Value::String(code)) => Language::from_code(code),
            Some(_) => Language::En,
        }
    }
}

/// What a session sends for each visitor turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Service,
    Fallback,
    #[serde(other)]
    Unknown,
}

/// Normalized answer returned by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub response: String,
    pub source: ResponseSource,
}
