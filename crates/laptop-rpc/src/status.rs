// crates/laptop-rpc/src/status.rs
//
// Mapping from domain and auth errors to gRPC statuses.
//
// Every status a handler returns goes through `log_status`, so failures are
// logged once at the boundary where they leave the service.

use tonic::{Code, Status};

use laptop_auth::AuthError;
use laptop_core::LaptopError;

/// Log a status on its way out and hand it back.
///
/// Server-side failures log at `error`, caller-caused ones at `warn`.
pub fn log_status(status: Status) -> Status {
    match status.code() {
        Code::Internal | Code::Unknown | Code::DataLoss => {
            tracing::error!(code = ?status.code(), "{}", status.message());
        }
        _ => {
            tracing::warn!(code = ?status.code(), "{}", status.message());
        }
    }
    status
}

/// Classify a domain error into a status, prefixing the message with `context`.
pub fn status_from_error(context: &str, err: &LaptopError) -> Status {
    let status = match err {
        LaptopError::Cancelled => Status::cancelled("request is cancelled"),
        LaptopError::DeadlineExceeded => Status::deadline_exceeded("deadline is exceeded"),
        LaptopError::AlreadyExists(_) => Status::already_exists(format!("{}: {}", context, err)),
        LaptopError::NotFound(_) => Status::not_found(format!("{}: {}", context, err)),
        LaptopError::InvalidArgument(_) => {
            Status::invalid_argument(format!("{}: {}", context, err))
        }
        LaptopError::Storage(_) | LaptopError::Io(_) | LaptopError::Internal(_) => {
            Status::internal(format!("{}: {}", context, err))
        }
    };
    log_status(status)
}

/// Classify an authorization failure for `method`.
pub fn auth_status(method: &str, err: &AuthError) -> Status {
    let status = match err {
        AuthError::MissingToken => Status::unauthenticated(err.to_string()),
        AuthError::InvalidToken(_) | AuthError::Expired => {
            Status::unauthenticated(format!("access token is invalid: {}", err))
        }
        AuthError::PermissionDenied(_) => Status::permission_denied(err.to_string()),
        AuthError::Signing(_) => Status::internal(format!("{}: {}", method, err)),
    };
    log_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_codes() {
        let cases = [
            (LaptopError::AlreadyExists("laptop a".into()), Code::AlreadyExists),
            (LaptopError::NotFound("laptop a".into()), Code::NotFound),
            (LaptopError::InvalidArgument("bad id".into()), Code::InvalidArgument),
            (LaptopError::Cancelled, Code::Cancelled),
            (LaptopError::DeadlineExceeded, Code::DeadlineExceeded),
            (LaptopError::Storage("poisoned".into()), Code::Internal),
            (LaptopError::Internal("boom".into()), Code::Internal),
        ];
        for (err, code) in cases {
            assert_eq!(status_from_error("ctx", &err).code(), code, "{}", err);
        }
    }

    #[test]
    fn test_message_carries_context() {
        let status = status_from_error(
            "cannot save laptop to the store",
            &LaptopError::AlreadyExists("laptop a".into()),
        );
        assert!(status.message().starts_with("cannot save laptop to the store:"));
    }

    #[test]
    fn test_auth_error_codes() {
        let method = "/laptop.v1.LaptopService/CreateLaptop";
        assert_eq!(auth_status(method, &AuthError::MissingToken).code(), Code::Unauthenticated);
        assert_eq!(auth_status(method, &AuthError::Expired).code(), Code::Unauthenticated);
        assert_eq!(
            auth_status(method, &AuthError::InvalidToken("bad".into())).code(),
            Code::Unauthenticated
        );
        assert_eq!(
            auth_status(method, &AuthError::PermissionDenied(method.into())).code(),
            Code::PermissionDenied
        );
    }
}
