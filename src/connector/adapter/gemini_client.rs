use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::GenerationClient;
use crate::domain::{DomainError, GenerateContentRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
const API_VERSION_PATH: &str = "/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_LOGGED_BODY_CHARS: usize = 512;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
pub const MODEL_VAR: &str = "GEMINI_MODEL";

/// Connection settings for the `generateContent` endpoint.
///
/// The key always comes from the environment (or the caller), never from
/// source. `Debug` output redacts it.
#[derive(Clone)]
pub struct GeminiConfig {
    api_key: String,
    base_url: String,
    model: String,
    request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable          | Default                                     |
    /// |-------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`  | required                                    |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_MODEL`    | `gemini-2.5-flash-preview-05-20`            |
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!("{API_KEY_VAR} is not set"))
            })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_model(model);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into().trim().to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full endpoint, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta/models/<model>:generateContent`.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            API_VERSION_PATH,
            self.model
        )
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// HTTP client for the Gemini `generateContent` API.
///
/// One call is one POST. Connection errors, timeouts and non-2xx statuses
/// come back as [`DomainError::Transport`]; the body of a 2xx response is
/// returned untouched for the use case to parse.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let url = config.endpoint();
        Self {
            client: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .unwrap_or_default(),
            api_key: config.api_key,
            url,
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, DomainError> {
        debug!("GeminiClient: POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("GeminiClient: API returned {status}");
            let body = response.text().await.unwrap_or_default();
            debug!("GeminiClient: error body: {}", truncate_for_log(&body));
            return Err(DomainError::transport(format!(
                "HTTP error! status: {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::transport(format!("failed to read response body: {e}")))
    }
}

/// First [`MAX_LOGGED_BODY_CHARS`] characters of `body`, marked when cut.
fn truncate_for_log(body: &str) -> String {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &body[..cut], body.len()),
        None => body.to_string(),
    }
}
