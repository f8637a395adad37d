use thiserror::Error;

/// Error taxonomy shared by the store layer and the RPC handlers.
///
/// Handlers re-classify these into gRPC status codes at the service boundary.
#[derive(Debug, Error)]
pub enum LaptopError {
    /// A record with the same key is already stored.
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input (bad identifier, oversize payload, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,

    /// The request deadline passed before the work finished.
    #[error("Deadline is exceeded")]
    DeadlineExceeded,

    /// Store failure (poisoned lock, index corruption).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem failure while persisting image data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else that should never happen.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LaptopError {
    /// Whether this error comes from the call lifecycle rather than the work itself.
    pub fn is_context_error(&self) -> bool {
        matches!(self, LaptopError::Cancelled | LaptopError::DeadlineExceeded)
    }
}
