use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::application::GenerationClient;
use crate::domain::{DomainError, GenerateContentRequest};

/// One scripted reply of a [`ScriptedGenerationClient`].
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// A 2xx response with this raw body.
    Body(String),
    /// A transport failure (connection error or non-success status).
    Fail(String),
    /// Never completes. Useful for exercising cancellation.
    Hang,
}

impl ScriptStep {
    /// A well-formed `generateContent` body answering with `text`.
    pub fn answer(text: &str) -> Self {
        Self::Body(success_body(text))
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// Builds a successful `generateContent` response body.
pub fn success_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[derive(Default)]
struct Recorded {
    requests: Vec<GenerateContentRequest>,
    attempt_times: Vec<Instant>,
}

/// In-process [`GenerationClient`] that replays a fixed script.
///
/// Each call pops the next step; once the script runs out the `fallback`
/// step (if any) is repeated, otherwise the call fails as a transport error.
/// Every request is recorded for inspection.
pub struct ScriptedGenerationClient {
    script: Arc<Mutex<VecDeque<ScriptStep>>>,
    fallback: Option<ScriptStep>,
    recorded: Arc<Mutex<Recorded>>,
}

impl ScriptedGenerationClient {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(steps.into_iter().collect())),
            fallback: None,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Answers every question with the same text.
    pub fn repeating(text: &str) -> Self {
        Self::new([]).with_fallback(ScriptStep::answer(text))
    }

    pub fn with_fallback(mut self, step: ScriptStep) -> Self {
        self.fallback = Some(step);
        self
    }

    pub async fn attempts(&self) -> usize {
        self.recorded.lock().await.requests.len()
    }

    pub async fn requests(&self) -> Vec<GenerateContentRequest> {
        self.recorded.lock().await.requests.clone()
    }

    /// Tokio clock reading at the start of each attempt.
    pub async fn attempt_times(&self) -> Vec<Instant> {
        self.recorded.lock().await.attempt_times.clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerationClient {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, DomainError> {
        {
            let mut recorded = self.recorded.lock().await;
            recorded.requests.push(request.clone());
            recorded.attempt_times.push(Instant::now());
        }

        let step = self.script.lock().await.pop_front().or_else(|| self.fallback.clone());
        debug!("ScriptedGenerationClient replaying {:?}", step);

        match step {
            Some(ScriptStep::Body(body)) => Ok(body),
            Some(ScriptStep::Fail(message)) => Err(DomainError::transport(message)),
            Some(ScriptStep::Hang) => std::future::pending().await,
            None => Err(DomainError::transport(
                "ScriptedGenerationClient: no scripted response left",
            )),
        }
    }
}
