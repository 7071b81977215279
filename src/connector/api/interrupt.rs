use std::future::Future;
use std::io;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Cancels `cancel` once Ctrl-C is pressed. Lives for the whole command, so
/// the signal is observed both while a question is in flight and while the
/// REPL waits for input.
pub fn spawn_ctrl_c_watcher(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(cancel_on_interrupt(tokio::signal::ctrl_c(), cancel))
}

/// Waits for `signal`, then cancels. If the signal handler could not be
/// installed the failure is logged and nothing is ever cancelled.
pub async fn cancel_on_interrupt<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            debug!("Interrupted");
            cancel.cancel();
        }
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {}. Interrupts are disabled.", e);
            std::future::pending::<()>().await;
        }
    }
}
