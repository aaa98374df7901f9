use std::{fmt, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api-b2b.backenster.com/b1/api/v3/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 100;
pub const ENV_API_TOKEN: &str = "LINGVANEX_API_TOKEN";
pub const ENV_BASE_URL: &str = "LINGVANEX_BASE_URL";
pub const ENV_PROXY: &str = "LINGVANEX_PROXY";

const BEARER_PREFIX: &str = "Bearer ";
const PROXY_SCHEMES: &[&str] = &["http", "https", "socks4", "socks4a", "socks5", "socks5h"];

/// Bearer token sent in the `Authorization` header of every request.
///
/// Accepts either the raw token or the full `Bearer <token>` form.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        let v = v.trim();
        if v.is_empty() || v == BEARER_PREFIX.trim_end() {
            return Err(ConfigError::EmptyApiToken);
        }
        if !v.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            return Err(ConfigError::InvalidApiToken);
        }
        if v.starts_with(BEARER_PREFIX) {
            Ok(Self(v.to_owned()))
        } else {
            Ok(Self(format!("{BEARER_PREFIX}{v}")))
        }
    }

    /// Full header value, always prefixed with `Bearer `.
    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(**redacted**)")
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Outbound proxy. HTTP(S) proxies may carry basic auth; SOCKS proxies take
/// their credentials from the URL itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: Url,
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(url).map_err(ConfigError::InvalidProxyUrl)?;
        if !PROXY_SCHEMES.contains(&url.scheme()) {
            return Err(ConfigError::UnsupportedProxyScheme(url.scheme().to_owned()));
        }
        Ok(Self { url, auth: None })
    }

    pub fn with_auth<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.auth = Some(ProxyAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// The proxy url with any password masked, safe to log.
    pub fn redacted_url(&self) -> Url {
        let mut url = self.url.clone();
        if url.password().is_some() {
            let _ = url.set_password(Some("**redacted**"));
        }
        url
    }

    pub fn is_socks(&self) -> bool {
        self.url.scheme().starts_with("socks")
    }

    pub(crate) fn to_reqwest(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        let proxy = reqwest::Proxy::all(self.url.as_str())?;
        Ok(match (&self.auth, self.is_socks()) {
            (Some(auth), false) => proxy.basic_auth(&auth.username, &auth.password),
            _ => proxy,
        })
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("url", &self.redacted_url().as_str())
            .field("auth", &self.auth)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub token: Option<ApiToken>,
    pub base_url: Url,
    pub timeout: Duration,
    pub max_idle_per_host: usize,
    pub proxy: Option<ProxyConfig>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            proxy: None,
        }
    }
}

impl TranslatorConfig {
    /// Reads token, base url and proxy from the environment, falling back to
    /// defaults for anything unset.
    pub fn from_env(env: &impl Env) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.token = resolve_api_token(None, ENV_API_TOKEN, env)?;
        if let Some(base_url) = env.var(ENV_BASE_URL) {
            cfg = cfg.with_base_url(&base_url)?;
        }
        if let Some(proxy) = env.var(ENV_PROXY) {
            cfg.proxy = Some(ProxyConfig::new(&proxy)?);
        }
        Ok(cfg)
    }

    pub fn with_token(mut self, token: ApiToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_max_idle_per_host(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }
}

/// Parses a base url, adding a trailing slash so endpoint paths join under it
/// instead of replacing its last segment.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value).map_err(ConfigError::InvalidBaseUrl)?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api token must not be empty")]
    EmptyApiToken,
    #[error("api token contains characters not allowed in a header")]
    InvalidApiToken,
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(url::ParseError),
    #[error("invalid proxy url: {0}")]
    InvalidProxyUrl(url::ParseError),
    #[error("unsupported proxy scheme: {0}")]
    UnsupportedProxyScheme(String),
    #[error("timeout must be > 0")]
    ZeroTimeout,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_api_token(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiToken>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(ApiToken::new(v)?)),
        None => match env.var(env_key) {
            Some(v) => Ok(Some(ApiToken::new(v)?)),
            None => Ok(None),
        },
    }
}
