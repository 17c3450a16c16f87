//! End-to-end: a conversation session talking to a live gateway, which in
//! turn talks to a stubbed answering service.

use actix_web::{web::Data, App, HttpServer};
use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use museum_chat::copy::CopyCatalog;
use museum_chat::gateway::ChatGateway;
use museum_chat::language::Language;
use museum_chat::model::HttpAnswerService;
use museum_chat::session::{
    ConversationSession, HttpChatTransport, Role, SessionContext, SubmitOutcome,
};
use museum_chat::web::models::ResponseSource;
use museum_chat::web::{routes, AppState};

/// Starts a gateway on a free port and returns its base URL.
fn start_gateway(upstream_url: &str, timeout: Duration) -> (String, actix_web::dev::ServerHandle) {
    let upstream = HttpAnswerService::new(upstream_url, timeout).unwrap();
    let state = Data::new(AppState {
        gateway: ChatGateway::new(
            Arc::new(upstream),
            Arc::new(CopyCatalog::new().unwrap()),
            Language::En,
        ),
    });

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://127.0.0.1:{}", port), handle)
}

fn visitor_session(gateway_url: &str, language: Language) -> ConversationSession {
    ConversationSession::new(
        SessionContext::new("1", "Ethnographic Museum – Huye", language),
        Arc::new(HttpChatTransport::new(gateway_url)),
        Arc::new(CopyCatalog::new().unwrap()),
    )
}

#[actix_web::test]
async fn visitor_question_is_answered_by_service() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({ "query": "Tell me about the drum", "language": "en" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "It is sacred.",
            "language": "en"
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (gateway_url, handle) = start_gateway(&upstream.uri(), Duration::from_secs(5));
    let session = visitor_session(&gateway_url, Language::En);

    let outcome = session.submit("Tell me about the drum").await;

    assert_eq!(outcome, SubmitOutcome::Answered(Some(ResponseSource::Service)));
    let messages = session.snapshot();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].text, "Tell me about the drum");
    assert_eq!(messages[2].role, Role::Bot);
    assert_eq!(messages[2].text, "It is sacred.");

    handle.stop(true).await;
}

#[actix_web::test]
async fn upstream_outage_yields_fallback_answer() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&upstream)
        .await;

    let (gateway_url, handle) = start_gateway(&upstream.uri(), Duration::from_secs(5));
    let session = visitor_session(&gateway_url, Language::Rw);

    let outcome = session.submit("Iyi ngoma ni iyihe?").await;

    assert_eq!(outcome, SubmitOutcome::Answered(Some(ResponseSource::Fallback)));
    let reply = session.snapshot().pop().unwrap();
    assert_eq!(
        reply.text,
        CopyCatalog::new()
            .unwrap()
            .gateway_fallback(Language::Rw, "Iyi ngoma ni iyihe?")
    );

    handle.stop(true).await;
}

#[actix_web::test]
async fn slow_upstream_is_bounded_by_timeout() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "too late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&upstream)
        .await;

    let (gateway_url, handle) = start_gateway(&upstream.uri(), Duration::from_millis(100));
    let session = visitor_session(&gateway_url, Language::En);

    let outcome = session.submit("Anyone there?").await;

    assert_eq!(outcome, SubmitOutcome::Answered(Some(ResponseSource::Fallback)));
    assert!(!session.is_pending());

    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_gateway_yields_connection_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let session = visitor_session(&format!("http://127.0.0.1:{}", port), Language::Fr);

    let outcome = session.submit("What is this?").await;

    assert_eq!(outcome, SubmitOutcome::ConnectionFailed);
    let messages = session.snapshot();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].text, "What is this?");
    assert_eq!(
        messages[2].text,
        CopyCatalog::new().unwrap().connection_error(Language::Fr)
    );
}

#[actix_web::test]
async fn whitespace_never_reaches_the_network() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "x" })))
        .expect(0)
        .mount(&upstream)
        .await;

    let (gateway_url, handle) = start_gateway(&upstream.uri(), Duration::from_secs(5));
    let session = visitor_session(&gateway_url, Language::En);

    assert_eq!(session.submit("  ").await, SubmitOutcome::Ignored);
    assert_eq!(session.message_count(), 1);

    handle.stop(true).await;
}

#[actix_web::test]
async fn unexpected_source_still_shows_the_answer() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "It is sacred.",
            "source": 5
        })))
        .expect(1)
        .mount(&gateway)
        .await;

    let session = visitor_session(&gateway.uri(), Language::En);

    let outcome = session.submit("Tell me about the drum").await;

    assert_eq!(outcome, SubmitOutcome::Answered(None));
    let reply = session.snapshot().pop().unwrap();
    assert_eq!(reply.role, Role::Bot);
    assert_eq!(reply.text, "It is sacred.");
}

#[actix_web::test]
async fn non_json_success_body_shows_not_understood() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&gateway)
        .await;

    let session = visitor_session(&gateway.uri(), Language::En);

    let outcome = session.submit("What is this?").await;

    assert_eq!(outcome, SubmitOutcome::Answered(None));
    let messages = session.snapshot();
    assert_eq!(messages.len(), 3);
    assert_eq!(
        messages[2].text,
        CopyCatalog::new().unwrap().not_understood(Language::En)
    );
    assert!(!session.is_pending());
}
