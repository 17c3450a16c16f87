//! Localized visitor-facing strings.
//!
//! Every string the gateway or a session synthesizes itself lives here, as a
//! small tera template per language so the greeting and the fallback answer
//! can be parameterized.

use log::error;
use tera::{Context, Tera};

use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyKey {
    Welcome,
    ConnectionError,
    NotUnderstood,
    GatewayFallback,
}

impl CopyKey {
    fn name(self) -> &'static str {
        match self {
            CopyKey::Welcome => "welcome",
            CopyKey::ConnectionError => "connection_error",
            CopyKey::NotUnderstood => "not_understood",
            CopyKey::GatewayFallback => "gateway_fallback",
        }
    }

    // Used only if a template somehow fails to render.
    fn last_resort(self) -> &'static str {
        match self {
            CopyKey::Welcome => "Hello! Ask me anything about this artefact.",
            CopyKey::ConnectionError => "Sorry, I could not connect to the museum guide.",
            CopyKey::NotUnderstood => "Sorry, I could not understand that.",
            CopyKey::GatewayFallback => "The museum guide is unavailable right now.",
        }
    }
}

const TEMPLATES: &[(Language, CopyKey, &str)] = &[
    (
        Language::En,
        CopyKey::Welcome,
        "Hello! Welcome to {{ museum }}. Ask me anything about this artefact.",
    ),
    (
        Language::Fr,
        CopyKey::Welcome,
        "Bonjour ! Bienvenue au {{ museum }}. Posez-moi vos questions sur cet artefact.",
    ),
    (
        Language::Rw,
        CopyKey::Welcome,
        "Muraho! Murakaza neza kuri {{ museum }}. Mumbaze ikibazo cyose kuri iki gihangano.",
    ),
    (
        Language::En,
        CopyKey::ConnectionError,
        "Sorry, I could not connect to the museum guide. Please check your connection and try again.",
    ),
    (
        Language::Fr,
        CopyKey::ConnectionError,
        "Désolé, impossible de joindre le guide du musée. Vérifiez votre connexion et réessayez.",
    ),
    (
        Language::Rw,
        CopyKey::ConnectionError,
        "Mutwihanganire, ntibyashobotse kugera ku muyobozi w'inzu ndangamurage. Reba murandasi yawe wongere ugerageze.",
    ),
    (
        Language::En,
        CopyKey::NotUnderstood,
        "Sorry, I could not understand that. Could you rephrase your question?",
    ),
    (
        Language::Fr,
        CopyKey::NotUnderstood,
        "Désolé, je n'ai pas compris. Pouvez-vous reformuler votre question ?",
    ),
    (
        Language::Rw,
        CopyKey::NotUnderstood,
        "Mutwihanganire, sinabyumvise. Mwasubiramo ikibazo cyanyu mu bundi buryo?",
    ),
    (
        Language::En,
        CopyKey::GatewayFallback,
        "The museum guide is unavailable right now, so I cannot answer \"{{ query }}\" yet. Please try again in a moment.",
    ),
    (
        Language::Fr,
        CopyKey::GatewayFallback,
        "Le guide du musée est indisponible pour le moment, je ne peux donc pas encore répondre à « {{ query }} ». Réessayez dans un instant.",
    ),
    (
        Language::Rw,
        CopyKey::GatewayFallback,
        "Umuyobozi w'inzu ndangamurage ntaboneka ubu, sinshobora gusubiza \"{{ query }}\" ubu. Mwongere mugerageze mu kanya.",
    ),
];

fn template_name(language: Language, key: CopyKey) -> String {
    format!("{}/{}", language.code(), key.name())
}

/// Compiled copy templates for every supported language.
pub struct CopyCatalog {
    tera: Tera,
}

impl CopyCatalog {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        // Template names carry no extension, so tera never autoescapes them.
        tera.add_raw_templates(
            TEMPLATES
                .iter()
                .map(|(language, key, body)| (template_name(*language, *key), *body)),
        )?;
        Ok(Self { tera })
    }

    /// Greeting that seeds every fresh session.
    pub fn welcome(&self, language: Language, museum: &str) -> String {
        let mut context = Context::new();
        context.insert("museum", museum);
        self.render(language, CopyKey::Welcome, &context)
    }

    pub fn connection_error(&self, language: Language) -> String {
        self.render(language, CopyKey::ConnectionError, &Context::new())
    }

    pub fn not_understood(&self, language: Language) -> String {
        self.render(language, CopyKey::NotUnderstood, &Context::new())
    }

    /// Answer the gateway synthesizes when the answering service is unusable.
    pub fn gateway_fallback(&self, language: Language, query: &str) -> String {
        let mut context = Context::new();
        context.insert("query", query);
        self.render(language, CopyKey::GatewayFallback, &context)
    }

    fn render(&self, language: Language, key: CopyKey, context: &Context) -> String {
        match self.tera.render(&template_name(language, key), context) {
            Ok(text) => text,
            Err(e) => {
                error!("Copy template {} failed to render: {}", template_name(language, key), e);
                key.last_resort().to_string()
            }
        }
    }
}
