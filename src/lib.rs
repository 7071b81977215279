pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{AskObserver, AskQuestionUseCase, GenerationClient, NoopObserver};

pub use cli::Commands;

pub use connector::{
    success_body, GeminiClient, GeminiConfig, ScriptStep, ScriptedGenerationClient,
};

pub use domain::{
    is_refusal, Answer, AnswerResult, DomainError, FailureKind, GenerateContentRequest,
    GenerateContentResponse, GuardedPrompt, Question, RetryPolicy, REFUSAL_MESSAGE,
    SYSTEM_INSTRUCTION,
};
