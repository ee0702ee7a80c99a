//! View lifetimes and cancellation of in-flight fetches.
//!
//! A [`ViewScope`] lives as long as a page is shown. Every fetch started
//! for the page carries a [`CancelToken`] from its scope; once the scope is
//! cancelled or dropped, pending fetches resolve to
//! [`FraudShieldError::Cancelled`] and their responses are discarded.

use core::future::Future;

use tokio::sync::watch;

use crate::error::{FraudShieldError, Result};

/// Owner of a page view's lifetime.
#[derive(Debug)]
pub struct ViewScope {
    /// Broadcasts the cancelled flag; dropping it cancels every token.
    sender: watch::Sender<bool>,
}

impl Default for ViewScope {
    #[inline]
    fn default() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self { sender }
    }
}

impl ViewScope {
    /// Opens a new, live scope.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a token tied to this scope.
    #[inline]
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: self.sender.subscribe(),
        }
    }

    /// Cancels every token of this scope. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        if !self.sender.send_replace(true) {
            tracing::debug!("view scope cancelled");
        }
    }

    /// Whether [`Self::cancel`] has been called.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

/// Cancellation handle carried by one fetch.
#[derive(Debug, Clone)]
pub struct CancelToken {
    /// Observes the owning scope.
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    /// Whether the owning scope was cancelled or dropped.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Resolves once the owning scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        while !*receiver.borrow_and_update() {
            if receiver.changed().await.is_err() {
                break;
            }
        }
    }

    /// Drives `work` to completion unless the scope closes first.
    ///
    /// A scope that is already closed wins over work that is already
    /// complete, so a late response is never handed back.
    ///
    /// # Errors
    ///
    /// Returns [`FraudShieldError::Cancelled`] if the scope closes before
    /// `work` finishes.
    pub async fn run<F: Future>(&self, work: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(FraudShieldError::Cancelled),
            output = work => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    #[tokio::test]
    async fn live_scope_lets_work_finish() {
        let scope = ViewScope::new();
        let token = scope.token();
        assert!(!token.is_cancelled());
        let output = token.run(async { 7 }).await.unwrap();
        assert_eq!(output, 7);
    }

    #[tokio::test]
    async fn cancelled_scope_wins_over_ready_work() {
        let scope = ViewScope::new();
        let token = scope.token();
        scope.cancel();
        assert!(scope.is_cancelled());
        assert!(token.is_cancelled());
        let result = token.run(async { 7 }).await;
        assert!(matches!(result, Err(FraudShieldError::Cancelled)));
    }

    #[tokio::test]
    async fn dropping_scope_cancels() {
        let scope = ViewScope::new();
        let token = scope.token();
        drop(scope);
        assert!(token.is_cancelled());
        let result = token.run(async { 7 }).await;
        assert!(matches!(result, Err(FraudShieldError::Cancelled)));
    }

    #[tokio::test]
    async fn cancel_interrupts_pending_work() {
        let scope = ViewScope::new();
        let token = scope.token();
        let pending = tokio::spawn(async move {
            token
                .run(tokio::time::sleep(Duration::from_secs(30)))
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        scope.cancel();
        let result = pending.await.unwrap();
        assert!(matches!(result, Err(FraudShieldError::Cancelled)));
    }

    #[tokio::test]
    async fn tokens_from_one_scope_share_fate() {
        let scope = ViewScope::new();
        let first = scope.token();
        let second = first.clone();
        let third = scope.token();
        scope.cancel();
        scope.cancel();
        assert!(first.is_cancelled() && second.is_cancelled() && third.is_cancelled());
    }
}
