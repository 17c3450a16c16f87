use actix_web::{middleware::Logger, App, HttpServer, web::Data};
use dotenv::dotenv;
use log::{info, error};
use std::sync::Arc;

use museum_chat::config::GatewayConfig;
use museum_chat::copy::CopyCatalog;
use museum_chat::gateway::ChatGateway;
use museum_chat::model::HttpAnswerService;
use museum_chat::web::{routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting museum chat gateway");

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let upstream = match HttpAnswerService::new(&config.ml_service_url, config.upstream_timeout) {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to set up answering service client: {}", e);
            std::process::exit(1);
        }
    };

    let copy = match CopyCatalog::new() {
        Ok(copy) => copy,
        Err(e) => {
            error!("Copy template parsing error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = Data::new(AppState {
        gateway: ChatGateway::new(Arc::new(upstream), Arc::new(copy), config.default_language),
    });

    info!(
        "Listening on {}:{} (upstream timeout {:?})",
        config.host, config.port, config.upstream_timeout
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
