use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

use super::is_refusal;

/// Text returned by the model for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    text: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether the model answered with the fixed out-of-domain refusal.
    pub fn is_refusal(&self) -> bool {
        is_refusal(&self.text)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Outcome of a single `ask` call.
pub type AnswerResult = Result<Answer, DomainError>;
