//! Terminal chat client: one conversation session against a running gateway.
//!
//! Type a question and press enter. `/lang <en|fr|rw>` switches language and
//! restarts the conversation; `/quit` exits.

use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use museum_chat::copy::CopyCatalog;
use museum_chat::language::Language;
use museum_chat::session::{ConversationSession, HttpChatTransport, Message, Role, SessionContext};

enum Command<'a> {
    Quit,
    Lang(Language),
    Unknown(&'a str),
    Ask(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    if !line.starts_with('/') {
        return Command::Ask(line);
    }
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("/quit"), None, _) => Command::Quit,
        (Some("/lang"), Some(code), None) => Command::Lang(Language::from_code(code)),
        _ => Command::Unknown(line),
    }
}

fn print_messages(messages: &[Message]) {
    for message in messages {
        let who = match message.role {
            Role::User => "you",
            Role::Bot => "guide",
        };
        println!("[{}] {}: {}", message.timestamp.format("%H:%M"), who, message.text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let gateway_url =
        env::var("GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let language = env::var("VISITOR_LANGUAGE")
        .map(|code| Language::from_code(&code))
        .unwrap_or_default();
    let artifact_id = env::var("ARTIFACT_ID").unwrap_or_else(|_| "1".to_string());
    let museum_name =
        env::var("MUSEUM_NAME").unwrap_or_else(|_| "Ethnographic Museum – Huye".to_string());

    info!("Using gateway at {}", gateway_url);

    let copy = Arc::new(CopyCatalog::new().context("failed to load copy templates")?);
    let transport = Arc::new(HttpChatTransport::new(&gateway_url));
    let session = ConversationSession::new(
        SessionContext::new(artifact_id, museum_name, language),
        transport,
        copy,
    );

    info!("Session {} started", session.id());
    print_messages(&session.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let question = match parse_command(line.trim()) {
            Command::Quit => break,
            Command::Lang(language) => {
                let mut context = session.context();
                context.language = language;
                if session.set_context(context) {
                    println!("-- {} --", language.label());
                    print_messages(&session.snapshot());
                }
                continue;
            }
            Command::Unknown(command) => {
                println!("unknown command: {} (try /lang <en|fr|rw> or /quit)", command);
                continue;
            }
            Command::Ask(question) => question,
        };

        let before = session.message_count();
        session.submit(question).await;
        let messages = session.snapshot();
        print_messages(&messages[before.min(messages.len())..]);
    }

    Ok(())
}
