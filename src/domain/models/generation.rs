use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

use super::{Answer, GuardedPrompt};

/// `generateContent` request body:
/// `{"contents":[{"parts":[{"text":"..."}]}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &GuardedPrompt) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.as_str().to_string()),
                }],
            }],
        }
    }

    /// Text of the single prompt part, if present.
    pub fn prompt_text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Subset of the `generateContent` response we read. Every field is optional
/// so shape problems surface as `MalformedResponse` rather than a serde error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Parse a raw response body and extract the first part of the first
    /// candidate.
    pub fn parse_answer(body: &str) -> Result<Answer, DomainError> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::malformed(format!("response is not valid JSON: {e}")))?;
        response.into_answer()
    }

    pub fn into_answer(self) -> Result<Answer, DomainError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::malformed("Invalid response structure from API: no candidates"))?;

        let part = candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .ok_or_else(|| DomainError::malformed("Invalid response structure from API: no content parts"))?;

        part.text
            .map(Answer::new)
            .ok_or_else(|| DomainError::malformed("Invalid response structure from API: part has no text"))
    }
}
