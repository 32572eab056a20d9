//! Request-scoped cancellation and deadlines.
//!
//! Every network call made on behalf of a request runs through
//! [`RequestContext::run`], so a cancelled or expired request drops the
//! in-flight HTTP future instead of waiting for it to complete.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Why a request stopped before its work finished
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline that is only stopped by cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Tie this context to an externally owned token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fail fast at stage boundaries
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the request is cancelled or its deadline passes first.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        self.check()?;

        let expiry = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            _ = expiry => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_without_interruption() {
        let ctx = RequestContext::new();
        let result = ctx.run(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_cancelled_context_stops_pending_work() {
        let ctx = RequestContext::new();
        let token = ctx.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(result, Err(Interrupted::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let result = ctx
            .run(tokio::time::sleep(Duration::from_secs(60)))
            .await;
        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
        assert_eq!(ctx.check(), Err(Interrupted::DeadlineExceeded));
    }

    #[test]
    fn test_check_reports_cancellation() {
        let ctx = RequestContext::new();
        assert!(ctx.check().is_ok());
        ctx.cancel();
        assert_eq!(ctx.check(), Err(Interrupted::Cancelled));
    }
}
