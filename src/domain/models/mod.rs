mod answer;
mod generation;
mod prompt;
mod question;
mod retry_policy;

pub use answer::*;
pub use generation::*;
pub use prompt::*;
pub use question::*;
pub use retry_policy::*;
