use actix_web::{error::InternalError, web, HttpRequest, HttpResponse, Responder};
use log::warn;
use serde_json::json;

use crate::error::GatewayError;
use crate::web::models::ChatRequest;
use crate::web::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, GatewayError> {
    let response = data.gateway.handle_query(&req).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Answers unparseable chat bodies with the same JSON error shape as an empty
/// query.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    warn!("Rejected chat body: {}", err);
    let body = json!({ "error": format!("Invalid request body: {}", err) });
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
