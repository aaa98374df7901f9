use crate::lang::{self, AUTO};
use crate::translate::{ensure_text, Detected, TranslateError, Translated, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Offline translator: echoes the input and reports a fixed language.
/// Validates input and honours `close` the same way the HTTP client does.
#[derive(Debug)]
pub struct DummyTranslator {
    detected: &'static str,
    closed: AtomicBool,
}

impl DummyTranslator {
    pub fn new() -> Self {
        Self::with_detected("en_US")
    }

    pub fn with_detected(full_code: &'static str) -> Self {
        Self {
            detected: full_code,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), TranslateError> {
        if self.is_closed() {
            return Err(TranslateError::Closed);
        }
        Ok(())
    }
}

impl Default for DummyTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for DummyTranslator {
    fn translate<'a>(
        &'a self,
        text: &'a str,
        dest: &'a str,
        src: &'a str,
    ) -> BoxFuture<'a, Result<Translated, TranslateError>> {
        async move {
            ensure_text(text)?;
            lang::normalize_lang(dest)?;
            let src_code = lang::normalize_lang(src)?;
            self.ensure_open()?;

            let src = if src_code == AUTO { self.detected } else { src };
            Ok(Translated {
                src: src.to_owned(),
                dest: dest.to_owned(),
                origin: text.to_owned(),
                text: text.to_owned(),
                extra_data: serde_json::Value::Null,
            })
        }
        .boxed()
    }

    fn detect<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Detected, TranslateError>> {
        async move {
            ensure_text(text)?;
            self.ensure_open()?;
            Ok(Detected {
                lang: self.detected.to_owned(),
                confidence: None,
            })
        }
        .boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        async move {
            self.closed.store(true, Ordering::Release);
        }
        .boxed()
    }
}
