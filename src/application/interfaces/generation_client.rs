use async_trait::async_trait;

use crate::domain::{DomainError, GenerateContentRequest};

/// Sends one `generateContent` request to a text-generation endpoint.
///
/// Implementors own transport and authentication. They make exactly one
/// attempt per call; retries belong to [`crate::application::AskQuestionUseCase`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Returns the raw body of a 2xx response.
    ///
    /// Network failures and non-success statuses must be reported as
    /// [`DomainError::Transport`] so the caller can retry them.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String, DomainError>;
}
