// crates/laptop-rpc/src/server.rs
//
// RPC server setup: LaptopRpcServer and RpcConfig.
//
// Two generated tonic services are registered, LaptopService and
// AuthService, each wrapped in an `AuthGuard` so the access policy is
// enforced before any handler runs.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::server::Router;
use tonic::transport::{Server, ServerTlsConfig};
use tonic::{Request, Response, Status, Streaming};

use laptop_auth::{AccessPolicy, TokenManager, UserClaims};
use laptop_core::traits::UserStore;
use laptop_core::Filter;

use crate::handlers;
use crate::handlers::laptop::LaptopStores;
use crate::middleware::AuthGuard;
use crate::proto::{
    AuthService, AuthServiceServer, CreateLaptopRequest, CreateLaptopResponse, LaptopService,
    LaptopServiceServer, LoginRequest, LoginResponse, RateLaptopRequest, RateLaptopResponse,
    SearchLaptopRequest, SearchLaptopResponse, UploadImageRequest, UploadImageResponse,
};

/// Responses buffered per streaming call before the handler waits on the client.
const STREAM_BUFFER: usize = 16;

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

// ---------------------------------------------------------------------------
// LaptopRpcServer
// ---------------------------------------------------------------------------

/// The RPC server for the laptop catalog.
///
/// Holds Arc references to the stores and the token manager and exposes
/// the guarded tonic services.
#[derive(Clone)]
pub struct LaptopRpcServer {
    config: RpcConfig,
    stores: LaptopStores,
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenManager>,
    policy: Arc<AccessPolicy>,
    tls: Option<ServerTlsConfig>,
}

impl std::fmt::Debug for LaptopRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaptopRpcServer")
            .field("config", &self.config)
            .field("tls", &self.tls.is_some())
            .finish()
    }
}

impl LaptopRpcServer {
    /// Create a server with the default access policy and no TLS.
    pub fn new(
        config: RpcConfig,
        stores: LaptopStores,
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            config,
            stores,
            users,
            tokens,
            policy: Arc::new(AccessPolicy::laptop_service_defaults()),
            tls: None,
        }
    }

    /// Replace the access policy.
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Serve over TLS with the given server configuration.
    pub fn with_tls(mut self, tls: ServerTlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// The guarded LaptopService.
    pub fn laptop_service(&self) -> AuthGuard<LaptopServiceServer<LaptopServiceImpl>> {
        let service = LaptopServiceImpl {
            stores: self.stores.clone(),
        };
        AuthGuard::new(
            LaptopServiceServer::new(service),
            self.tokens.clone(),
            self.policy.clone(),
        )
    }

    /// The guarded AuthService.
    pub fn auth_service(&self) -> AuthGuard<AuthServiceServer<AuthServiceImpl>> {
        let service = AuthServiceImpl {
            users: self.users.clone(),
            tokens: self.tokens.clone(),
        };
        AuthGuard::new(
            AuthServiceServer::new(service),
            self.tokens.clone(),
            self.policy.clone(),
        )
    }

    /// Build the tonic router with both services registered.
    ///
    /// Use this to serve on a listener of your own (`serve_with_incoming`).
    pub fn router(&self) -> Result<Router, tonic::transport::Error> {
        let mut builder = Server::builder();
        if let Some(tls) = self.tls.clone() {
            builder = builder.tls_config(tls)?;
        }

        Ok(builder
            .add_service(self.auth_service())
            .add_service(self.laptop_service()))
    }

    /// Start the RPC server on the configured address and serve until
    /// `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()>,
    {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!(
            "Laptop RPC server starting on {}, TLS = {}",
            addr,
            self.tls.is_some()
        );

        self.router()?
            .serve_with_shutdown(addr, shutdown)
            .await?;

        tracing::info!("Laptop RPC server stopped");
        Ok(())
    }
}

/// Username of the authorized caller, or "anonymous" on public methods.
fn caller<T>(request: &Request<T>) -> String {
    request
        .extensions()
        .get::<UserClaims>()
        .map(|claims| claims.username.clone())
        .unwrap_or_else(|| "anonymous".to_string())
}

// ---------------------------------------------------------------------------
// LaptopService
// ---------------------------------------------------------------------------

/// LaptopService implementation: adapts the generated trait to the handlers.
#[derive(Debug, Clone)]
pub struct LaptopServiceImpl {
    stores: LaptopStores,
}

#[tonic::async_trait]
impl LaptopService for LaptopServiceImpl {
    async fn create_laptop(
        &self,
        request: Request<CreateLaptopRequest>,
    ) -> Result<Response<CreateLaptopResponse>, Status> {
        let ctx = handlers::call_context(&request);
        tracing::debug!(caller = %caller(&request), "CreateLaptop");

        let response = handlers::laptop::handle_create_laptop(
            self.stores.laptops.as_ref(),
            &ctx,
            request.into_inner(),
        )?;
        Ok(Response::new(response))
    }

    type SearchLaptopStream = ReceiverStream<Result<SearchLaptopResponse, Status>>;

    async fn search_laptop(
        &self,
        request: Request<SearchLaptopRequest>,
    ) -> Result<Response<Self::SearchLaptopStream>, Status> {
        let ctx = handlers::call_context(&request);
        tracing::debug!(caller = %caller(&request), "SearchLaptop");

        let filter = request
            .into_inner()
            .filter
            .map(Filter::from)
            .unwrap_or_else(Filter::unconstrained);
        let laptops = self.stores.laptops.clone();
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        tokio::spawn(async move {
            if let Err(status) =
                handlers::laptop::handle_search_laptop(laptops, ctx, filter, tx.clone()).await
            {
                let _ = tx.send(Err(status)).await;
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn upload_image(
        &self,
        request: Request<Streaming<UploadImageRequest>>,
    ) -> Result<Response<UploadImageResponse>, Status> {
        let ctx = handlers::call_context(&request);
        tracing::debug!(caller = %caller(&request), "UploadImage");

        let response = handlers::laptop::handle_upload_image(
            self.stores.laptops.as_ref(),
            self.stores.images.as_ref(),
            &ctx,
            request.into_inner(),
        )
        .await?;
        Ok(Response::new(response))
    }

    type RateLaptopStream = ReceiverStream<Result<RateLaptopResponse, Status>>;

    async fn rate_laptop(
        &self,
        request: Request<Streaming<RateLaptopRequest>>,
    ) -> Result<Response<Self::RateLaptopStream>, Status> {
        let ctx = handlers::call_context(&request);
        tracing::debug!(caller = %caller(&request), "RateLaptop");

        let requests = request.into_inner();
        let stores = self.stores.clone();
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        tokio::spawn(async move {
            // Stop receiving as soon as the client stops listening.
            let watcher = {
                let tx = tx.clone();
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    tx.closed().await;
                    ctx.cancel();
                })
            };

            let result = handlers::laptop::handle_rate_laptop(
                stores.laptops.as_ref(),
                stores.ratings.as_ref(),
                &ctx,
                requests,
                &tx,
            )
            .await;
            watcher.abort();

            if let Err(status) = result {
                let _ = tx.send(Err(status)).await;
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

/// AuthService implementation.
#[derive(Clone)]
pub struct AuthServiceImpl {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenManager>,
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, request: Request<LoginRequest>) -> Result<Response<LoginResponse>, Status> {
        let response = handlers::auth::handle_login(
            self.users.as_ref(),
            &self.tokens,
            request.into_inner(),
        )?;
        Ok(Response::new(response))
    }
}
