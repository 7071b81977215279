use std::time::Duration;

use crate::domain::{AnswerResult, DomainError, Question};

/// Request lifecycle events for whatever is presenting the answer.
///
/// A presenter keeps its own state (spinner, input enabled) and changes it
/// only from these callbacks. `on_settled` fires exactly once for every
/// `on_start`, whatever the outcome.
pub trait AskObserver: Send + Sync {
    fn on_start(&self, _question: &Question) {}

    /// Called before sleeping ahead of retry number `retry` (1-based).
    fn on_retry(&self, _retry: u32, _delay: Duration, _error: &DomainError) {}

    fn on_settled(&self, _result: &AnswerResult) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AskObserver for NoopObserver {}
