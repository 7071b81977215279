mod ask_observer;
mod generation_client;

pub use ask_observer::*;
pub use generation_client::*;
