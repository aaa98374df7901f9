use crate::config::{ConfigError, ProxyConfig, TranslatorConfig};
use crate::lang::{self, AUTO};
use crate::translate::{
    ensure_text, Detected, LanguageInfo, ServiceError, TranslateError, Translated, Translator,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use url::Url;

const LOG_TARGET: &str = "translate::lingvanex";
const TRANSLATE_PATH: &str = "translate";
const LANGUAGES_PATH: &str = "getLanguages";
const DETECT_PLATFORM: &str = "dp";
const DETECT_DEST: &str = "en_US";
const LANGUAGES_LOCALE: &str = "en_GB";
const UNKNOWN_LANG: &str = "unknown";

/// Client for the Lingvanex B2B translation API.
///
/// Owns one HTTP session. Calls may run concurrently; each clones the
/// session handle and performs one request. After [`close`](Self::close)
/// every call fails with [`TranslateError::Closed`] until
/// [`reopen`](Self::reopen) or [`set_proxy`](Self::set_proxy).
#[derive(Debug)]
pub struct LingvanexTranslator {
    config: TranslatorConfig,
    translate_url: Url,
    languages_url: Url,
    session: RwLock<Session>,
}

#[derive(Debug)]
struct Session {
    client: Option<Client>,
    proxy: Option<ProxyConfig>,
}

impl LingvanexTranslator {
    pub fn new(config: TranslatorConfig) -> Result<Self, TranslateError> {
        let translate_url = config.base_url.join(TRANSLATE_PATH)?;
        let languages_url = config.base_url.join(LANGUAGES_PATH)?;
        let proxy = config.proxy.clone();
        let client = build_client(&config, proxy.as_ref())?;

        tracing::debug!(
            target: LOG_TARGET,
            base_url = %config.base_url,
            proxied = proxy.is_some(),
            "session opened"
        );

        Ok(Self {
            config,
            translate_url,
            languages_url,
            session: RwLock::new(Session {
                client: Some(client),
                proxy,
            }),
        })
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub async fn is_closed(&self) -> bool {
        self.session.read().await.client.is_none()
    }

    /// Drops the session and its connection pool. No request is sent.
    pub async fn close(&self) {
        let mut session = self.session.write().await;
        if session.client.take().is_some() {
            tracing::debug!(target: LOG_TARGET, "session closed");
        }
    }

    /// Opens a fresh session after [`close`](Self::close). No-op when open.
    pub async fn reopen(&self) -> Result<(), TranslateError> {
        let mut session = self.session.write().await;
        if session.client.is_none() {
            session.client = Some(build_client(&self.config, session.proxy.as_ref())?);
            tracing::debug!(target: LOG_TARGET, "session reopened");
        }
        Ok(())
    }

    /// Replaces the session with one routed through `proxy`, or a direct one
    /// for `None`. The old session is dropped first, so a failure here leaves
    /// the translator closed.
    pub async fn set_proxy(&self, proxy: Option<ProxyConfig>) -> Result<(), TranslateError> {
        let mut session = self.session.write().await;
        drop(session.client.take());
        session.client = Some(build_client(&self.config, proxy.as_ref())?);
        tracing::info!(
            target: LOG_TARGET,
            proxy = %proxy
                .as_ref()
                .map(|p| p.redacted_url().to_string())
                .unwrap_or_else(|| "none".to_owned()),
            "proxy changed"
        );
        session.proxy = proxy;
        Ok(())
    }

    pub async fn translate(
        &self,
        text: &str,
        dest: &str,
        src: &str,
    ) -> Result<Translated, TranslateError> {
        ensure_text(text)?;
        let dest_code = lang::normalize_lang(dest)?;
        let src_code = lang::normalize_lang(src)?;
        let client = self.client().await?;

        let mut form = vec![("to", dest_code), ("text", text)];
        if src_code != AUTO {
            form.push(("from", src_code));
        }

        tracing::debug!(
            target: LOG_TARGET,
            to = dest_code,
            from = src_code,
            chars = text.chars().count(),
            "translate request"
        );
        let body = send(client.post(self.translate_url.clone()).form(&form)).await?;

        Ok(translated_from_body(body, text, dest, src, src_code))
    }

    pub async fn detect(&self, text: &str) -> Result<Detected, TranslateError> {
        ensure_text(text)?;
        let client = self.client().await?;

        tracing::debug!(
            target: LOG_TARGET,
            chars = text.chars().count(),
            "detect request"
        );
        let request = client
            .post(self.translate_url.clone())
            .query(&[("platform", DETECT_PLATFORM)])
            .form(&[("to", DETECT_DEST), ("text", text)]);
        let body = send(request).await?;

        Ok(detected_from_body(&body))
    }

    /// Languages supported by the service, as it describes them.
    pub async fn get_languages(&self) -> Result<Vec<LanguageInfo>, TranslateError> {
        let client = self.client().await?;

        tracing::debug!(target: LOG_TARGET, "languages request");
        let request = client
            .get(self.languages_url.clone())
            .query(&[("platform", "api"), ("code", LANGUAGES_LOCALE)]);
        let mut body = send(request).await?;

        match body.remove("result") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(result) => Vec::<LanguageInfo>::deserialize(&result).map_err(|e| {
                TranslateError::from(ServiceError::InvalidResponse {
                    message: e.to_string(),
                    body: result.to_string(),
                })
            }),
        }
    }

    async fn client(&self) -> Result<Client, TranslateError> {
        self.session
            .read()
            .await
            .client
            .clone()
            .ok_or(TranslateError::Closed)
    }
}

impl Translator for LingvanexTranslator {
    fn translate<'a>(
        &'a self,
        text: &'a str,
        dest: &'a str,
        src: &'a str,
    ) -> BoxFuture<'a, Result<Translated, TranslateError>> {
        LingvanexTranslator::translate(self, text, dest, src).boxed()
    }

    fn detect<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Detected, TranslateError>> {
        LingvanexTranslator::detect(self, text).boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        LingvanexTranslator::close(self).boxed()
    }
}

fn build_client(
    config: &TranslatorConfig,
    proxy: Option<&ProxyConfig>,
) -> Result<Client, TranslateError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.token {
        let mut value = HeaderValue::from_str(token.header_value())
            .map_err(|_| ConfigError::InvalidApiToken)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .pool_max_idle_per_host(config.max_idle_per_host);
    builder = match proxy {
        Some(proxy) => builder.proxy(proxy.to_reqwest().map_err(TranslateError::Client)?),
        // Only an explicitly configured proxy is used, never the environment's.
        None => builder.no_proxy(),
    };

    builder.build().map_err(TranslateError::Client)
}

async fn send(request: RequestBuilder) -> Result<Map<String, Value>, TranslateError> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(target: LOG_TARGET, error = %e, "request failed");
        TranslateError::Network(e)
    })?;
    let status = response.status();
    let body = response.text().await.map_err(TranslateError::Network)?;

    parse_body(status, body).map_err(|e| {
        tracing::warn!(target: LOG_TARGET, status = status.as_u16(), error = %e, "service error");
        TranslateError::from(e)
    })
}

fn parse_body(status: StatusCode, body: String) -> Result<Map<String, Value>, ServiceError> {
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let value: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            return Err(ServiceError::InvalidResponse {
                message: e.to_string(),
                body,
            })
        }
    };
    let Value::Object(map) = value else {
        return Err(ServiceError::InvalidResponse {
            message: "expected a JSON object".to_owned(),
            body,
        });
    };

    if let Some(message) = api_error(&map) {
        return Err(ServiceError::Api { message });
    }
    Ok(map)
}

/// The `err` field, when it holds anything other than an empty value.
fn api_error(body: &Map<String, Value>) -> Option<String> {
    match body.get("err")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn non_empty_str<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn translated_from_body(
    body: Map<String, Value>,
    origin: &str,
    dest: &str,
    src: &str,
    src_code: &str,
) -> Translated {
    let text = body
        .get("result")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let src = match non_empty_str(&body, "from") {
        Some(detected) if src_code == AUTO => detected.to_owned(),
        _ => src.to_owned(),
    };

    Translated {
        src,
        dest: dest.to_owned(),
        origin: origin.to_owned(),
        text,
        extra_data: Value::Object(body),
    }
}

fn detected_from_body(body: &Map<String, Value>) -> Detected {
    let lang = non_empty_str(body, "sourceLanguage")
        .or_else(|| non_empty_str(body, "from"))
        .unwrap_or(UNKNOWN_LANG)
        .to_owned();

    Detected {
        lang,
        confidence: body.get("score").and_then(Value::as_f64),
    }
}
