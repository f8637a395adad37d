// crates/laptop-rpc/src/handlers/mod.rs
//
// Handler modules for all RPC endpoints.
// Handlers take the stores and a `CallContext` explicitly and know nothing
// about the generated service traits, so they can be driven directly in tests.

pub mod auth;
pub mod laptop;

use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Status};

use laptop_core::{CallContext, LaptopError};

/// Build the call context for an incoming request from its `grpc-timeout` header.
pub fn call_context<T>(request: &Request<T>) -> CallContext {
    let timeout = request
        .metadata()
        .get("grpc-timeout")
        .and_then(|value| value.to_str().ok());
    CallContext::from_grpc_timeout(timeout)
}

/// Receive the next message from a client stream, racing the call context.
///
/// `Ok(None)` means the client half-closed the stream.
pub(crate) async fn next_message<S, T>(
    ctx: &CallContext,
    stream: &mut S,
) -> Result<Option<Result<T, Status>>, LaptopError>
where
    S: Stream<Item = Result<T, Status>> + Unpin,
{
    ctx.check()?;
    tokio::select! {
        biased;
        err = ctx.done() => Err(err),
        message = stream.next() => Ok(message),
    }
}

/// Send one response on a server stream, racing the call context so a client
/// that stops reading cannot hold the handler past its deadline.
///
/// `Ok(false)` means the receiving side is gone.
pub(crate) async fn send_message<T>(
    ctx: &CallContext,
    tx: &mpsc::Sender<Result<T, Status>>,
    message: T,
) -> Result<bool, LaptopError> {
    ctx.check()?;
    tokio::select! {
        biased;
        err = ctx.done() => Err(err),
        sent = tx.send(Ok(message)) => Ok(sent.is_ok()),
    }
}
