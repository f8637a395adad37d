use thiserror::Error;

/// Authentication and authorization failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token is malformed, uses an unexpected algorithm, or its signature does not match.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token was valid but its expiry has passed.
    #[error("Token has expired")]
    Expired,

    /// A restricted method was called without a token.
    #[error("Authorization token is not provided")]
    MissingToken,

    /// The caller is not allowed to invoke the method.
    #[error("No permission to access {0}")]
    PermissionDenied(String),

    /// Token signing failed.
    #[error("Cannot sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Whether the caller failed to prove who they are (as opposed to lacking rights).
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken(_) | AuthError::Expired | AuthError::MissingToken
        )
    }
}
