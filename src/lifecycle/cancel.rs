//! Caller-initiated request cancellation.
//!
//! The original timeout-only design left no way for a caller (say, a
//! dismissed screen) to abandon an in-flight request early; this pair
//! closes that gap.

use tokio::sync::watch;

/// Create a linked canceller/token pair.
pub fn cancel_pair() -> (Canceller, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (Canceller { tx }, CancelToken { rx })
}

/// The cancelling side. Held by the caller that may abort the request.
pub struct Canceller {
    tx: watch::Sender<bool>,
}

impl Canceller {
    /// Cancel every request holding a token from this pair.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// The observing side, passed along with a request.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Resolves once cancellation fires.
    ///
    /// If the `Canceller` is dropped without firing, this future never
    /// resolves; the request runs to its own completion or timeout.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Canceller dropped without firing.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Whether cancellation has already fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_fires() {
        let (canceller, token) = cancel_pair();
        assert!(!token.is_cancelled());

        canceller.cancel();
        assert!(token.is_cancelled());

        // Resolves immediately even for a token observed after the signal.
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("cancelled() should resolve after cancel()");
    }

    #[tokio::test]
    async fn test_dropping_canceller_does_not_cancel() {
        let (canceller, token) = cancel_pair();
        drop(canceller);

        assert!(!token.is_cancelled());
        let result =
            tokio::time::timeout(Duration::from_millis(100), token.cancelled()).await;
        assert!(result.is_err(), "cancelled() must not resolve on drop");
    }
}
