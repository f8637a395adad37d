// crates/laptop-rpc/src/lib.rs
//
// laptop-rpc: gRPC services, handlers, and client for the laptop catalog.
//
// Provides a tonic-based server exposing LaptopService (create, search,
// upload image, rate) and AuthService (login), an authorization guard that
// wraps both, and a client library with automatic token refresh. Messages are
// prost structs in `proto`; only the service stubs are generated.

pub mod client;
pub mod convert;
pub mod handlers;
pub mod middleware;
pub mod proto;
pub mod server;
pub mod status;

// Re-export the main server type for ergonomic access.
pub use server::LaptopRpcServer;
pub use server::RpcConfig;

pub use client::{spawn_token_refresher, AuthClient, ClientError, LaptopClient, TokenInterceptor};
pub use handlers::laptop::LaptopStores;
pub use middleware::AuthGuard;
