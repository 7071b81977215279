use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::{AskObserver, AskQuestionUseCase, NoopObserver};
use crate::connector::api::SpinnerObserver;
use crate::domain::{AnswerResult, DomainError};

use super::super::Container;

const REPL_BANNER: &str =
    "Ask a question about JPMorgan Chase. Type 'exit' or press Ctrl-D to quit.";

/// Text shown to the user for a failed question. Technical details stay in
/// the log.
pub fn user_message(error: &DomainError) -> &'static str {
    match error {
        DomainError::InvalidInput(_) => "Please enter a question.",
        DomainError::Cancelled => "Request cancelled.",
        _ => "Sorry, something went wrong while fetching the answer. Please try again.",
    }
}

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Ask one question. Cancelling `interrupt` aborts it.
    pub async fn ask(&self, question: String, interrupt: &CancellationToken) -> Result<String> {
        let use_case = self.use_case();
        match self.ask_once(&use_case, &question, interrupt).await {
            Ok(answer) => Ok(answer.into_text()),
            Err(e) => Err(anyhow!(user_message(&e))),
        }
    }

    /// Read questions line by line until EOF, `exit`/`quit`, or `interrupt`
    /// is cancelled, answering each. A failed question never ends the
    /// session; an interrupt ends it whether a question is in flight or the
    /// prompt is waiting for input.
    pub async fn repl<R, W>(
        &self,
        input: R,
        mut output: W,
        interrupt: &CancellationToken,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let use_case = self.use_case();
        let mut lines = input.lines();
        let mut asked = 0usize;
        let mut answered = 0usize;

        output.write_all(format!("{REPL_BANNER}\n> ").as_bytes()).await?;
        output.flush().await?;

        loop {
            let line = tokio::select! {
                biased;
                _ = interrupt.cancelled() => {
                    output.write_all(b"\n").await?;
                    break;
                }
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };

            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                break;
            }

            let reply = match self.ask_once(&use_case, &line, interrupt).await {
                Ok(answer) => {
                    asked += 1;
                    answered += 1;
                    answer.into_text()
                }
                Err(e) => {
                    if !e.is_invalid_input() {
                        asked += 1;
                    }
                    user_message(&e).to_string()
                }
            };

            output.write_all(format!("{reply}\n").as_bytes()).await?;
            if interrupt.is_cancelled() {
                break;
            }
            output.write_all(b"\n> ").await?;
            output.flush().await?;
        }

        output.flush().await?;
        Ok(format!("Answered {answered} of {asked} questions."))
    }

    fn use_case(&self) -> AskQuestionUseCase {
        let observer: Arc<dyn AskObserver> = if self.container.spinner() {
            Arc::new(SpinnerObserver::new(self.container.retry_policy().max_retries()))
        } else {
            Arc::new(NoopObserver)
        };
        self.container.ask_use_case(observer)
    }

    /// Ask one question under a child of `interrupt`, also cancelled when the
    /// configured timeout expires.
    async fn ask_once(
        &self,
        use_case: &AskQuestionUseCase,
        question: &str,
        interrupt: &CancellationToken,
    ) -> AnswerResult {
        let cancel = interrupt.child_token();

        let timer = self.container.timeout().map(|limit| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                debug!("Timed out after {:?}", limit);
                cancel.cancel();
            })
        });

        let result = use_case.ask_with_cancellation(question, &cancel).await;
        if let Some(timer) = timer {
            timer.abort();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::connector::api::{ContainerConfig, MOCK_ANSWER};
    use crate::connector::{ScriptStep, ScriptedGenerationClient};

    fn quiet_config() -> ContainerConfig {
        ContainerConfig {
            mock: true,
            spinner: false,
            initial_delay: Duration::from_millis(1),
            ..ContainerConfig::default()
        }
    }

    #[tokio::test]
    async fn ask_returns_answer_text() {
        let container = Container::new(quiet_config()).unwrap();
        let answer = AskController::new(&container)
            .ask("When was JPMorgan Chase founded?".to_string(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(answer, MOCK_ANSWER);
    }

    #[tokio::test]
    async fn ask_maps_failures_to_user_messages() {
        let container = Container::new(quiet_config()).unwrap();
        let err = AskController::new(&container)
            .ask("   ".to_string(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a question.");

        let failing = Arc::new(
            ScriptedGenerationClient::new([]).with_fallback(ScriptStep::fail("HTTP error! status: 500")),
        );
        let container = Container::with_client(failing, quiet_config());
        let err = AskController::new(&container)
            .ask("Who is JPMC's CEO?".to_string(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sorry, something went wrong while fetching the answer. Please try again."
        );
    }

    #[tokio::test]
    async fn timeout_cancels_the_question() {
        let hanging = Arc::new(ScriptedGenerationClient::new([ScriptStep::Hang]));
        let config = ContainerConfig {
            timeout: Some(Duration::from_millis(50)),
            ..quiet_config()
        };
        let container = Container::with_client(hanging, config);

        let err = AskController::new(&container)
            .ask("Will this ever return?".to_string(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request cancelled.");
    }

    #[tokio::test]
    async fn repl_keeps_going_after_failures() {
        let client = Arc::new(ScriptedGenerationClient::new([
            ScriptStep::answer("Founded in 1799"),
            ScriptStep::Body(r#"{"candidates":[]}"#.to_string()),
            ScriptStep::answer("New York City"),
        ]));
        let container = Container::with_client(client.clone(), quiet_config());
        let input: &[u8] =
            b"When was JPMC founded?\n\nWhat is JPMC?\nWhere is JPMC headquartered?\nexit\nignored\n";
        let mut output = Vec::new();

        let summary = AskController::new(&container)
            .repl(input, &mut output, &CancellationToken::new())
            .await
            .unwrap();

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.starts_with(REPL_BANNER));
        assert!(transcript.contains("Founded in 1799\n"));
        assert!(transcript.contains("Please enter a question.\n"));
        assert!(transcript.contains("Sorry, something went wrong"));
        assert!(transcript.contains("New York City\n"));
        assert!(!transcript.contains("ignored"));
        assert_eq!(summary, "Answered 2 of 3 questions.");
        assert_eq!(client.attempts().await, 3);
    }

    #[tokio::test]
    async fn interrupt_cancels_a_single_question() {
        let hanging = Arc::new(ScriptedGenerationClient::new([ScriptStep::Hang]));
        let container = Container::with_client(hanging, quiet_config());
        let interrupt = CancellationToken::new();
        interrupt.cancel();

        let err = AskController::new(&container)
            .ask("Who is JPMC's CEO?".to_string(), &interrupt)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request cancelled.");
    }

    #[tokio::test]
    async fn repl_ends_when_interrupted_at_the_prompt() {
        let container = Container::new(quiet_config()).unwrap();
        // The writer half stays open, so reading blocks forever.
        let (_stdin_writer, stdin_reader) = tokio::io::duplex(64);
        let interrupt = CancellationToken::new();
        let mut output = Vec::new();

        let trigger = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            AskController::new(&container).repl(
                tokio::io::BufReader::new(stdin_reader),
                &mut output,
                &interrupt,
            ),
        )
        .await
        .expect("repl should stop on interrupt")
        .unwrap();

        assert_eq!(summary, "Answered 0 of 0 questions.");
    }

    #[tokio::test]
    async fn repl_ends_when_interrupted_mid_question() {
        let client = Arc::new(ScriptedGenerationClient::new([ScriptStep::Hang]));
        let container = Container::with_client(client.clone(), quiet_config());
        let input: &[u8] = b"Who founded JPMorgan?\nWhat is Chase?\n";
        let interrupt = CancellationToken::new();
        let mut output = Vec::new();

        let trigger = interrupt.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let summary = AskController::new(&container)
            .repl(input, &mut output, &interrupt)
            .await
            .unwrap();

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.ends_with("Request cancelled.\n"));
        assert_eq!(summary, "Answered 0 of 1 questions.");
        assert_eq!(client.attempts().await, 1);
    }

    #[test]
    fn user_messages_cover_taxonomy() {
        assert_eq!(user_message(&DomainError::Cancelled), "Request cancelled.");
        assert_eq!(
            user_message(&DomainError::malformed("no candidates")),
            user_message(&DomainError::unavailable(4, "503"))
        );
    }
}
