use super::Question;

/// Sentence the model must reply with, verbatim, for out-of-domain questions.
pub const REFUSAL_MESSAGE: &str = "I am a JPMC specialist and can only answer questions about \
JPMorgan Chase. Please ask me something related to the company.";

/// Instruction block prepended to every question.
///
/// Scope is enforced by the model only; nothing here filters questions
/// locally. Must contain [`REFUSAL_MESSAGE`] verbatim.
pub const SYSTEM_INSTRUCTION: &str = "You are a specialized Q&A assistant for JPMorgan Chase \
(JPMC). Your sole purpose is to answer questions related to JPMC's business, history, \
financials, and operations. If a user asks a question that is NOT about JPMC, you MUST \
respond with: 'I am a JPMC specialist and can only answer questions about JPMorgan Chase. \
Please ask me something related to the company.' Do not answer any questions about other \
topics, people, or companies.";

/// Returns true when `text` is the guardrail refusal, ignoring surrounding
/// whitespace and the quotes models sometimes wrap it in.
pub fn is_refusal(text: &str) -> bool {
    let trimmed = text.trim().trim_matches(|c: char| c == '\'' || c == '"').trim();
    trimmed == REFUSAL_MESSAGE
}

/// The full prompt sent on the wire: system instruction plus the user's
/// question.
///
/// Built only from a validated [`Question`], so a raw question can never be
/// sent without the guardrail around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedPrompt {
    text: String,
}

impl GuardedPrompt {
    pub fn build(question: &Question) -> Self {
        Self {
            text: format!(
                "{SYSTEM_INSTRUCTION}\n\nUser's question: \"{}\"",
                question.text()
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
