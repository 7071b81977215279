use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{AskObserver, AskQuestionUseCase, GenerationClient};
use crate::connector::{GeminiClient, GeminiConfig, ScriptedGenerationClient};
use crate::domain::RetryPolicy;

/// Canned reply used with `--mock`.
pub const MOCK_ANSWER: &str = "This is a mock answer. Unset --mock to ask the real model.";

pub struct ContainerConfig {
    /// Answer every question locally instead of calling the API.
    pub mock: bool,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub initial_delay: Duration,
    pub max_retries: u32,
    /// Upper bound for one question, retries included. Expiry cancels it.
    pub timeout: Option<Duration>,
    /// Draw a spinner on stderr while waiting.
    pub spinner: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock: false,
            base_url: None,
            model: None,
            initial_delay: RetryPolicy::DEFAULT_INITIAL_DELAY,
            max_retries: RetryPolicy::DEFAULT_MAX_RETRIES,
            timeout: None,
            spinner: true,
        }
    }
}

pub struct Container {
    client: Arc<dyn GenerationClient>,
    retry_policy: RetryPolicy,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let client: Arc<dyn GenerationClient> = if config.mock {
            debug!("Using mock generation client");
            Arc::new(ScriptedGenerationClient::repeating(MOCK_ANSWER))
        } else {
            let mut gemini = GeminiConfig::from_env()
                .context("Set GEMINI_API_KEY (or pass --mock) to ask questions")?;
            if let Some(base_url) = config.base_url.as_deref() {
                gemini = gemini.with_base_url(base_url);
            }
            if let Some(model) = config.model.as_deref() {
                gemini = gemini.with_model(model);
            }
            debug!(
                "Using Gemini model {} at {}",
                gemini.model(),
                gemini.base_url()
            );
            Arc::new(GeminiClient::new(gemini))
        };

        Ok(Self::with_client(client, config))
    }

    /// Wire an explicit client, bypassing environment configuration.
    pub fn with_client(client: Arc<dyn GenerationClient>, config: ContainerConfig) -> Self {
        let retry_policy = RetryPolicy::default()
            .with_initial_delay(config.initial_delay)
            .with_max_retries(config.max_retries);

        Self {
            client,
            retry_policy,
            config,
        }
    }

    pub fn ask_use_case(&self, observer: Arc<dyn AskObserver>) -> AskQuestionUseCase {
        AskQuestionUseCase::new(self.client.clone())
            .with_retry_policy(self.retry_policy)
            .with_observer(observer)
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    pub fn spinner(&self) -> bool {
        self.config.spinner
    }
}
