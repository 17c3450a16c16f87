//! Client-side conversation state for one chat surface.
//!
//! A [`ConversationSession`] owns the transcript shown to the visitor and
//! allows at most one gateway round trip in flight at a time.

pub mod transport;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::copy::CopyCatalog;
use crate::language::Language;
use crate::web::models::{QueryRequest, ResponseSource};

pub use transport::{ChatTransport, GatewayReply, HttpChatTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One turn in the transcript. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// Display only; transcript order is append order.
    pub timestamp: DateTime<Utc>,
    /// Where a bot answer came from, for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ResponseSource>,
}

impl Message {
    fn new(role: Role, text: String, source: Option<ResponseSource>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            timestamp: Utc::now(),
            source,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into(), None)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text.into(), None)
    }
}

/// The artifact and language a session is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub artifact_id: String,
    pub museum_name: String,
    pub language: Language,
}

impl SessionContext {
    pub fn new(artifact_id: impl Into<String>, museum_name: impl Into<String>, language: Language) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            museum_name: museum_name.into(),
            language,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Awaiting,
}

/// How a call to [`ConversationSession::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or another submit was still awaiting its reply.
    Ignored,
    /// The gateway answered; carries the answer's source if it reported one.
    Answered(Option<ResponseSource>),
    /// The gateway could not be reached; a connectivity message was appended.
    ConnectionFailed,
    /// The session was re-initialized while the reply was in flight, so the
    /// reply was dropped.
    Discarded,
}

struct Transcript {
    context: SessionContext,
    messages: Vec<Message>,
    pending: bool,
    // Bumped by every reset so replies to a previous context can be recognized.
    generation: u64,
}

pub struct ConversationSession {
    id: Uuid,
    transport: Arc<dyn ChatTransport>,
    copy: Arc<CopyCatalog>,
    transcript: Mutex<Transcript>,
}

impl ConversationSession {
    pub fn new(
        context: SessionContext,
        transport: Arc<dyn ChatTransport>,
        copy: Arc<CopyCatalog>,
    ) -> Self {
        let greeting = Message::bot(copy.welcome(context.language, &context.museum_name));
        Self {
            id: Uuid::new_v4(),
            transport,
            copy,
            transcript: Mutex::new(Transcript {
                context,
                messages: vec![greeting],
                pending: false,
                generation: 0,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Reset the transcript to a single greeting for `context` and clear the
    /// pending flag. This is the only way messages are ever removed.
    pub fn initialize(&self, context: SessionContext) {
        let greeting = Message::bot(self.copy.welcome(context.language, &context.museum_name));
        let mut transcript = self.lock();
        debug!(
            "Session {} initialized for artifact {} ({})",
            self.id, context.artifact_id, context.language
        );
        transcript.context = context;
        transcript.messages = vec![greeting];
        transcript.pending = false;
        transcript.generation += 1;
    }

    /// Re-initialize only if `context` differs from the current one.
    /// Returns whether a reset happened.
    pub fn set_context(&self, context: SessionContext) -> bool {
        if self.lock().context == context {
            return false;
        }
        self.initialize(context);
        true
    }

    /// Send one visitor turn.
    ///
    /// Appends the trimmed user message immediately, then exactly one bot
    /// message once the gateway round trip resolves. Blank input or a call
    /// made while another submit is awaiting its reply changes nothing.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let (request, generation) = {
            let mut transcript = self.lock();
            let query = text.trim();
            if query.is_empty() {
                debug!("Session {}: ignoring blank input", self.id);
                return SubmitOutcome::Ignored;
            }
            if transcript.pending {
                debug!("Session {}: ignoring submit while awaiting a reply", self.id);
                return SubmitOutcome::Ignored;
            }

            transcript.messages.push(Message::user(query));
            transcript.pending = true;
            (
                QueryRequest {
                    query: query.to_string(),
                    language: transcript.context.language,
                },
                transcript.generation,
            )
        };

        let result = self.transport.send(&request).await;

        let mut transcript = self.lock();
        if transcript.generation != generation {
            debug!("Session {}: dropping reply for a previous context", self.id);
            return SubmitOutcome::Discarded;
        }

        let (reply, outcome) = match result {
            Ok(GatewayReply { response, source }) => {
                let text = response
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| self.copy.not_understood(request.language));
                (
                    Message::new(Role::Bot, text, source),
                    SubmitOutcome::Answered(source),
                )
            }
            Err(e) => {
                warn!("Session {}: gateway request failed: {}", self.id, e);
                (
                    Message::bot(self.copy.connection_error(request.language)),
                    SubmitOutcome::ConnectionFailed,
                )
            }
        };

        transcript.messages.push(reply);
        transcript.pending = false;
        outcome
    }

    /// Copy of the transcript in conversational order.
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Number of messages in the transcript, greeting included.
    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    pub fn state(&self) -> SessionState {
        if self.is_pending() {
            SessionState::Awaiting
        } else {
            SessionState::Idle
        }
    }

    pub fn context(&self) -> SessionContext {
        self.lock().context.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Transcript> {
        // No invariant is left half-updated across a panic point, so a
        // poisoned lock is still usable.
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
