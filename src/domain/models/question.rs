use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A user's question, trimmed and guaranteed non-empty.
///
/// Only [`Question::parse`] can build one, so holding a `Question` means
/// validation has already happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
}

impl Question {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(DomainError::invalid_input("Please enter a question."));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
