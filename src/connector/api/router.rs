use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::Commands;

use super::container::Container;
use super::controller::AskController;
use super::interrupt::spawn_ctrl_c_watcher;

pub struct Router<'a> {
    ask_controller: AskController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        let interrupt = CancellationToken::new();
        let watcher = spawn_ctrl_c_watcher(interrupt.clone());

        let output = match command {
            Commands::Ask { question } => {
                self.ask_controller
                    .ask(question.join(" "), &interrupt)
                    .await
            }
            Commands::Repl => {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                self.ask_controller
                    .repl(stdin, tokio::io::stdout(), &interrupt)
                    .await
            }
        };

        watcher.abort();
        output
    }
}
