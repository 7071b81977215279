//! # Domain Layer
//!
//! Questions, answers, the guardrail prompt, wire shapes of the generation
//! API, and the retry policy. Nothing here performs I/O.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
