use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the visitor-facing copy is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "rw")]
    Rw,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Rw];

    /// Resolve a client-supplied code. Anything outside the supported set
    /// resolves to English rather than failing.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Language::Fr,
            "rw" => Language::Rw,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Rw => "rw",
        }
    }

    /// Label shown in the language picker, in the language itself.
    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
            Language::Rw => "Kinyarwanda",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
