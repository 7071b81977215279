use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::{AskObserver, GenerationClient, NoopObserver};
use crate::domain::{
    AnswerResult, DomainError, GenerateContentRequest, GenerateContentResponse, GuardedPrompt,
    Question, RetryPolicy,
};

/// Answers one question: validate, wrap in the guardrail prompt, send with
/// retries, extract the first candidate's text.
///
/// Holds no per-request state, so a single instance can serve any number of
/// concurrent calls.
pub struct AskQuestionUseCase {
    client: Arc<dyn GenerationClient>,
    retry_policy: RetryPolicy,
    observer: Arc<dyn AskObserver>,
}

impl AskQuestionUseCase {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            retry_policy: RetryPolicy::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AskObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub async fn ask(&self, question: &str) -> AnswerResult {
        self.ask_with_cancellation(question, &CancellationToken::new())
            .await
    }

    /// Like [`Self::ask`], but `cancel` aborts the in-flight attempt or the
    /// pending backoff sleep and yields [`DomainError::Cancelled`].
    pub async fn ask_with_cancellation(
        &self,
        question: &str,
        cancel: &CancellationToken,
    ) -> AnswerResult {
        let question = Question::parse(question)?;

        info!("Asking: {}", question);
        let start_time = Instant::now();
        self.observer.on_start(&question);

        let result = self.answer(&question, cancel).await;

        match &result {
            Ok(answer) => info!(
                "Answered in {:?} ({} chars, refusal={})",
                start_time.elapsed(),
                answer.text().len(),
                answer.is_refusal()
            ),
            Err(DomainError::Cancelled) => info!("Request cancelled after {:?}", start_time.elapsed()),
            Err(e) => error!("Failed to answer after {:?}: {}", start_time.elapsed(), e),
        }

        self.observer.on_settled(&result);
        result
    }

    async fn answer(&self, question: &Question, cancel: &CancellationToken) -> AnswerResult {
        let prompt = GuardedPrompt::build(question);
        let request = GenerateContentRequest::from_prompt(&prompt);

        let body = self.send_with_retry(&request, cancel).await?;
        GenerateContentResponse::parse_answer(&body)
    }

    async fn send_with_retry(
        &self,
        request: &GenerateContentRequest,
        cancel: &CancellationToken,
    ) -> Result<String, DomainError> {
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt: u32 = 1;

        loop {
            debug!("Generation attempt {}/{}", attempt, max_attempts);

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                outcome = self.client.generate(request) => outcome,
            };

            let err = match outcome {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            if attempt >= max_attempts {
                warn!("Attempt {}/{} failed: {}. Giving up.", attempt, max_attempts, err);
                let last_error = match err {
                    DomainError::Transport(message) => message,
                    other => other.to_string(),
                };
                return Err(DomainError::unavailable(attempt, last_error));
            }

            let delay = self.retry_policy.delay_before_retry(attempt);
            warn!(
                "Attempt {}/{} failed: {}. Retrying in {:?}",
                attempt, max_attempts, err, delay
            );
            self.observer.on_retry(attempt, delay, &err);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DomainError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}
