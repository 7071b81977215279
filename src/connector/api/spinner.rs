use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::AskObserver;
use crate::domain::{AnswerResult, DomainError, Question};

const TICK: Duration = Duration::from_millis(100);

/// Terminal spinner shown while a question is in flight.
///
/// Visible from `on_start` until `on_settled`; the spinner is the only state
/// it owns.
pub struct SpinnerObserver {
    max_retries: u32,
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            bar: Mutex::new(None),
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.bar.lock().map(|bar| bar.is_some()).unwrap_or(false)
    }
}

impl AskObserver for SpinnerObserver {
    fn on_start(&self, _question: &Question) {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Thinking...");
        bar.enable_steady_tick(TICK);

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_retry(&self, retry: u32, delay: Duration, _error: &DomainError) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_message(format!(
                    "Still working... retry {}/{} in {:.1}s",
                    retry,
                    self.max_retries,
                    delay.as_secs_f32()
                ));
            }
        }
    }

    fn on_settled(&self, _result: &AnswerResult) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
