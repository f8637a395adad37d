// crates/laptop-auth/src/lib.rs
//
// laptop-auth: Access tokens and authorization decisions.
//
// `TokenManager` issues and verifies HS256-signed, time-bound claims without
// any store lookup. `AccessPolicy` maps gRPC method paths to the roles allowed
// to call them and makes the allow/deny decision as a pure function, so the
// transport-facing interceptor in laptop-rpc stays a thin adapter.

pub mod error;
pub mod policy;
pub mod token;

pub use error::AuthError;
pub use policy::{methods, Access, AccessPolicy};
pub use token::{TokenManager, UserClaims};
