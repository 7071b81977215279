mod gemini_client;
mod scripted_generation_client;

pub use gemini_client::*;
pub use scripted_generation_client::*;
