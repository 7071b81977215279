//! # Connector Layer
//!
//! Implementations of the application ports and the CLI host:
//! - Generation (Gemini over HTTP, scripted in-process client)
//! - API (container, router, controllers, terminal spinner)

pub mod adapter;
pub mod api;

pub use adapter::*;
