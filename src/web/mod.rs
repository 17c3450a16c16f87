pub mod handlers;
pub mod models;
pub mod routes;

use crate::gateway::ChatGateway;

/// Shared state handed to every request handler.
pub struct AppState {
    pub gateway: ChatGateway,
}
