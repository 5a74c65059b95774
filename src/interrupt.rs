//! Interrupt Watcher
//!
//! Watches an input source for a single operator keypress and flips a
//! one-shot cancellation token. Purely advisory: the session controller
//! observes the token in its wait-select; nothing is forcibly aborted.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Background task turning the first byte of input into a stop signal.
pub struct InterruptWatcher {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl InterruptWatcher {
    /// Spawn a watcher over any byte source. The first byte read cancels
    /// the token exactly once; EOF without data is not a stop signal.
    pub fn spawn<R>(mut input: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let token = CancellationToken::new();
        let signal = token.clone();
        let handle = tokio::spawn(async move {
            let mut buf = [0u8; 1];
            if matches!(input.read(&mut buf).await, Ok(n) if n > 0) {
                tracing::info!("stop requested by operator");
                signal.cancel();
            }
        });
        Self { token, handle }
    }

    /// Watch stdin; any keypress followed by enter stops the poll.
    pub fn spawn_stdin() -> Self {
        Self::spawn(tokio::io::stdin())
    }

    /// Token the session races against its deadline.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop observing. Safe to call after the signal has fired.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}
