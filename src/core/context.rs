use crate::utils::error::{EntregadorError, Result};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// The three stages of a registration, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Persist,
    ResolveRecipient,
    Notify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Persist => "persist",
            Stage::ResolveRecipient => "resolve_recipient",
            Stage::Notify => "notify",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
struct Cancellation {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Per-request token threaded through every collaborator call.
///
/// Clones share the same cancellation state, so a handle kept by the caller can
/// cancel an in-flight registration.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    deadline: Option<Instant>,
    cancellation: Arc<Cancellation>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            deadline: None,
            cancellation: Arc::new(Cancellation::default()),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancellation.cancelled.store(true, Ordering::SeqCst);
        self.cancellation.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    pub fn ensure_active(&self, stage: Stage) -> Result<()> {
        if self.is_cancelled() {
            return Err(EntregadorError::Cancelled { stage });
        }
        if self.is_expired() {
            return Err(EntregadorError::DeadlineExceeded { stage });
        }
        Ok(())
    }

    /// Runs one stage's collaborator call under this context.
    ///
    /// Fails fast when the context is already cancelled or expired, and drops the
    /// call if cancellation or the deadline arrives while it is in flight.
    pub async fn guard<T, F>(&self, stage: Stage, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let cancelled = self.cancellation.notify.notified();
        tokio::pin!(cancelled);
        // Register interest before checking the flag so a concurrent cancel is not lost.
        cancelled.as_mut().enable();

        self.ensure_active(stage)?;

        match self.deadline {
            Some(deadline) => tokio::select! {
                result = call => result,
                _ = &mut cancelled => Err(EntregadorError::Cancelled { stage }),
                _ = tokio::time::sleep_until(deadline) => {
                    Err(EntregadorError::DeadlineExceeded { stage })
                }
            },
            None => tokio::select! {
                result = call => result,
                _ = &mut cancelled => Err(EntregadorError::Cancelled { stage }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_passes_through_result() {
        let ctx = RequestContext::new().with_request_id("req-1");
        let value = ctx.guard(Stage::Persist, async { Ok(42) }).await.unwrap();

        assert_eq!(value, 42);
        assert_eq!(ctx.request_id(), "req-1");
    }

    #[tokio::test]
    async fn test_guard_fails_fast_when_already_cancelled() {
        let ctx = RequestContext::new();
        ctx.cancel();

        let called = AtomicBool::new(false);
        let result = ctx
            .guard(Stage::ResolveRecipient, async {
                called.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(
            result,
            Err(EntregadorError::Cancelled {
                stage: Stage::ResolveRecipient
            })
        ));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_enforces_deadline_on_slow_call() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));

        let result: Result<()> = ctx
            .guard(Stage::Notify, async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;

        assert!(matches!(
            result,
            Err(EntregadorError::DeadlineExceeded {
                stage: Stage::Notify
            })
        ));
    }

    #[tokio::test]
    async fn test_guard_aborts_on_cancel_in_flight() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });

        let result: Result<()> = ctx
            .guard(Stage::Persist, async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await;

        canceller.await.unwrap();
        assert!(matches!(
            result,
            Err(EntregadorError::Cancelled {
                stage: Stage::Persist
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_context_is_reported_before_call() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(1));
        tokio::time::advance(Duration::from_millis(5)).await;

        assert!(ctx.is_expired());
        assert!(matches!(
            ctx.ensure_active(Stage::Persist),
            Err(EntregadorError::DeadlineExceeded { .. })
        ));
    }
}
