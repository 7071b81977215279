pub mod container;
pub mod controller;
pub mod interrupt;
pub mod router;
pub mod spinner;

pub use container::{Container, ContainerConfig, MOCK_ANSWER};
pub use controller::{user_message, AskController};
pub use interrupt::{cancel_on_interrupt, spawn_ctrl_c_watcher};
pub use router::Router;
pub use spinner::SpinnerObserver;
