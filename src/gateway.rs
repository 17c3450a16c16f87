//! Stateless mediator between visitors and the answering service.

use log::{debug, error, info};
use std::sync::Arc;

use crate::copy::CopyCatalog;
use crate::error::GatewayError;
use crate::language::Language;
use crate::model::AnswerService;
use crate::web::models::{ChatRequest, GatewayResponse, ResponseSource};

/// Forwards each query to the answering service exactly once and degrades
/// to a localized fallback answer whenever that service fails.
///
/// Holds no per-request state, so one instance can serve any number of
/// concurrent requests.
#[derive(Clone)]
pub struct ChatGateway {
    upstream: Arc<dyn AnswerService>,
    copy: Arc<CopyCatalog>,
    default_language: Language,
}

impl ChatGateway {
    pub fn new(
        upstream: Arc<dyn AnswerService>,
        copy: Arc<CopyCatalog>,
        default_language: Language,
    ) -> Self {
        Self {
            upstream,
            copy,
            default_language,
        }
    }

    /// Answer one visitor query.
    ///
    /// Only an empty or missing query is an error; every upstream failure is
    /// absorbed into a `fallback` response.
    pub async fn handle_query(&self, request: &ChatRequest) -> Result<GatewayResponse, GatewayError> {
        let query = request
            .text()
            .ok_or_else(|| GatewayError::BadRequest("No query provided".to_string()))?;

        let language = request.language_or(self.default_language);

        info!("Forwarding query ({}, {} characters)", language, query.chars().count());
        debug!("Query text: {}", query);

        match self.upstream.answer(query, language).await {
            Ok(response) => Ok(GatewayResponse {
                response,
                source: ResponseSource::Service,
            }),
            Err(e) => {
                error!("Answering service failed ({}): {}", e.kind(), e);
                Ok(GatewayResponse {
                    response: self.copy.gateway_fallback(language, query),
                    source: ResponseSource::Fallback,
                })
            }
        }
    }
}
