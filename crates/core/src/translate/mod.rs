mod dummy;
mod lingvanex;

use crate::config::ConfigError;
use crate::lang::{self, LangError};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::lang::AUTO;
pub use dummy::DummyTranslator;
pub use lingvanex::LingvanexTranslator;

/// Outcome of a translate call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Translated {
    /// Source language: the service's detected code when the request used
    /// `auto`, otherwise the requested source.
    pub src: String,
    /// Destination language exactly as requested.
    pub dest: String,
    pub origin: String,
    pub text: String,
    /// Raw response body.
    pub extra_data: serde_json::Value,
}

impl fmt::Display for Translated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Translated(src={}, dest={}, text={})",
            self.src, self.dest, self.text
        )
    }
}

/// Outcome of a detect call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Detected {
    pub lang: String,
    pub confidence: Option<f64>,
}

impl Detected {
    /// Two-letter code of the detected language, if it is a known full code.
    pub fn alpha1(&self) -> Option<&'static str> {
        lang::alpha1_of(&self.lang)
    }
}

impl fmt::Display for Detected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.confidence {
            Some(c) => write!(f, "Detected(lang={}, confidence={})", self.lang, c),
            None => write!(f, "Detected(lang={}, confidence=None)", self.lang),
        }
    }
}

/// One entry of the service's language listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LanguageInfo {
    #[serde(default)]
    pub full_code: String,
    #[serde(default)]
    pub code_alpha_1: String,
    #[serde(default, rename = "englishName")]
    pub english_name: String,
    #[serde(default, rename = "codeName")]
    pub code_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The remote answered, but not with a usable result.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unparseable response ({message}): {body}")]
    InvalidResponse { message: String, body: String },

    #[error("service error: {message}")]
    Api { message: String },
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("translator is closed")]
    Closed,

    #[error("text must not be empty")]
    EmptyText,

    #[error(transparent)]
    UnknownLanguage(#[from] LangError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TranslateError {
    pub fn is_network(&self) -> bool {
        matches!(self, TranslateError::Network(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, TranslateError::Service(_))
    }
}

pub(crate) fn ensure_text(text: &str) -> Result<(), TranslateError> {
    if text.trim().is_empty() {
        return Err(TranslateError::EmptyText);
    }
    Ok(())
}

pub trait Translator: Send + Sync {
    fn translate<'a>(
        &'a self,
        text: &'a str,
        dest: &'a str,
        src: &'a str,
    ) -> BoxFuture<'a, Result<Translated, TranslateError>>;

    fn detect<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Detected, TranslateError>>;

    /// Releases the session. Safe to call more than once.
    fn close(&self) -> BoxFuture<'_, ()>;
}
