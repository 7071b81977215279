//! # Application Layer
//!
//! The ask use case and the ports it talks through.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
