pub mod ask_controller;

pub use ask_controller::{user_message, AskController};
