// crates/laptop-core/src/context.rs
//
// CallContext: the cancellation and deadline state of one in-flight RPC.
//
// Long-running loops (search scan, upload chunk loop, rating loop) poll
// `err()` / `check()` once per iteration, and race blocking receives against
// `done()`, so a cancelled or expired call stops within one iteration.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::LaptopError;

/// Cancellation token plus optional deadline for a single call.
///
/// Clones share the same token: cancelling any clone cancels them all.
#[derive(Debug, Clone)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context with no deadline that is cancelled only explicitly.
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Build a context from the value of a `grpc-timeout` header, if any.
    ///
    /// A missing or unparseable header yields a context without a deadline.
    pub fn from_grpc_timeout(header: Option<&str>) -> Self {
        match header.and_then(parse_grpc_timeout) {
            Some(timeout) => Self::with_timeout(timeout),
            None => Self::new(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle on the underlying token, e.g. to cancel from another task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The reason this call should stop, or `None` while it is still live.
    pub fn err(&self) -> Option<LaptopError> {
        if self.cancel.is_cancelled() {
            return Some(LaptopError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(LaptopError::DeadlineExceeded),
            _ => None,
        }
    }

    /// `err()` as a `Result`, for use with `?`.
    pub fn check(&self) -> Result<(), LaptopError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolve once the call is cancelled or its deadline passes.
    pub async fn done(&self) -> LaptopError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancel.cancelled() => LaptopError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => LaptopError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                LaptopError::Cancelled
            }
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a gRPC `grpc-timeout` value: up to 8 ASCII digits followed by one of
/// `H` (hours), `M` (minutes), `S`, `m` (millis), `u` (micros), `n` (nanos).
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.len() < 2 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(amount * 60 * 60)),
        "M" => Some(Duration::from_secs(amount * 60)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grpc_timeout() {
        assert_eq!(parse_grpc_timeout("5S"), Some(Duration::from_secs(5)));
        assert_eq!(parse_grpc_timeout("2M"), Some(Duration::from_secs(120)));
        assert_eq!(parse_grpc_timeout("1H"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_grpc_timeout("10u"), Some(Duration::from_micros(10)));
        assert_eq!(parse_grpc_timeout("99n"), Some(Duration::from_nanos(99)));
    }

    #[test]
    fn test_parse_grpc_timeout_rejects_garbage() {
        assert_eq!(parse_grpc_timeout(""), None);
        assert_eq!(parse_grpc_timeout("S"), None);
        assert_eq!(parse_grpc_timeout("5x"), None);
        assert_eq!(parse_grpc_timeout("-5S"), None);
        assert_eq!(parse_grpc_timeout("123456789S"), None);
    }

    #[test]
    fn test_fresh_context_is_live() {
        let ctx = CallContext::new();
        assert!(ctx.err().is_none());
        assert!(ctx.check().is_ok());
        assert!(CallContext::from_grpc_timeout(None).deadline().is_none());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let ctx = CallContext::new();
        let clone = ctx.clone();
        clone.cancel();
        assert!(matches!(ctx.err(), Some(LaptopError::Cancelled)));
    }

    #[test]
    fn test_elapsed_deadline() {
        let ctx = CallContext::with_timeout(Duration::ZERO);
        assert!(matches!(ctx.check(), Err(LaptopError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_done_resolves_on_cancel() {
        let ctx = CallContext::new();
        let token = ctx.cancellation_token();
        tokio::spawn(async move { token.cancel() });
        assert!(matches!(ctx.done().await, LaptopError::Cancelled));
    }

    #[tokio::test]
    async fn test_done_resolves_on_deadline() {
        let ctx = CallContext::with_timeout(Duration::from_millis(10));
        assert!(matches!(ctx.done().await, LaptopError::DeadlineExceeded));
    }
}
