// crates/laptop-rpc/src/client.rs
//
// Client library for the laptop catalog service.
//
// `AuthClient` logs in; `TokenInterceptor` attaches the current access token
// to every outgoing call; `spawn_token_refresher` keeps that token fresh in
// the background; `LaptopClient` wraps the four catalog calls.

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::interceptor::InterceptedService;
use tonic::service::Interceptor;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request, Status};

use laptop_core::{Filter, Laptop};

use crate::proto::{
    upload_image_request, AuthServiceClient, CreateLaptopRequest, ImageInfo, LaptopServiceClient,
    LoginRequest, RateLaptopRequest, RateLaptopResponse, SearchLaptopRequest, UploadImageRequest,
    UploadImageResponse,
};

/// Size of each chunk sent by `upload_image`.
pub const UPLOAD_CHUNK_SIZE: usize = 1 << 10;

/// Default per-call timeout, sent to the server as `grpc-timeout`.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors returned by the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("RPC failed: {0}")]
    Rpc(#[from] Status),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open a channel to `endpoint`, optionally over TLS.
pub async fn connect(endpoint: &str, tls: Option<ClientTlsConfig>) -> Result<Channel, ClientError> {
    let mut endpoint = Endpoint::from_shared(endpoint.to_string())?;
    if let Some(tls) = tls {
        endpoint = endpoint.tls_config(tls)?;
    }
    Ok(endpoint.connect().await?)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Logs in with a fixed username and password.
#[derive(Debug, Clone)]
pub struct AuthClient {
    service: AuthServiceClient<Channel>,
    username: String,
    password: String,
}

impl AuthClient {
    pub fn new(channel: Channel, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            service: AuthServiceClient::new(channel),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Log in and return a fresh access token.
    pub async fn login(&mut self) -> Result<String, ClientError> {
        let mut request = Request::new(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        });
        request.set_timeout(DEFAULT_CALL_TIMEOUT);

        let response = self.service.login(request).await?.into_inner();
        Ok(response.access_token)
    }
}

/// Interceptor that attaches `authorization: Bearer <token>` to every call
/// once a token has been set. Clones share the same token slot.
#[derive(Debug, Clone, Default)]
pub struct TokenInterceptor {
    token: Arc<RwLock<String>>,
}

impl TokenInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: String) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    /// The current token, if one has been set.
    pub fn token(&self) -> Option<String> {
        let token = match self.token.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

impl Interceptor for TokenInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(token) = self.token() {
            let value: AsciiMetadataValue = format!("Bearer {}", token)
                .parse()
                .map_err(|_| Status::unauthenticated("access token is not valid metadata"))?;
            request.metadata_mut().insert("authorization", value);
        }
        Ok(request)
    }
}

/// Log in once, then keep re-logging in every `refresh_interval`, storing
/// each new token in `interceptor`.
///
/// Fails if the first login fails. Later failures are logged and retried on
/// the next tick; abort the returned handle to stop refreshing.
pub async fn spawn_token_refresher(
    mut auth: AuthClient,
    interceptor: TokenInterceptor,
    refresh_interval: Duration,
) -> Result<JoinHandle<()>, ClientError> {
    let token = auth.login().await?;
    interceptor.set_token(token);
    tracing::info!("Token refreshed");

    Ok(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh_interval);
        // The first tick completes immediately; we just logged in.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match auth.login().await {
                Ok(token) => {
                    interceptor.set_token(token);
                    tracing::info!("Token refreshed");
                }
                Err(e) => tracing::warn!("Cannot refresh token: {}", e),
            }
        }
    }))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Client for LaptopService calls, authenticated through a `TokenInterceptor`.
#[derive(Debug, Clone)]
pub struct LaptopClient {
    service: LaptopServiceClient<InterceptedService<Channel, TokenInterceptor>>,
    timeout: Duration,
}

impl LaptopClient {
    pub fn new(channel: Channel, interceptor: TokenInterceptor) -> Self {
        Self {
            service: LaptopServiceClient::with_interceptor(channel, interceptor),
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.timeout);
        request
    }

    /// Create a laptop and return its ID.
    ///
    /// Returns `Ok(None)` if a laptop with the same ID already exists.
    pub async fn create_laptop(&mut self, laptop: Laptop) -> Result<Option<String>, ClientError> {
        tracing::info!(laptop_id = %laptop.id, "Going to create laptop");
        let request = self.request(CreateLaptopRequest {
            laptop: Some(laptop.into()),
        });

        match self.service.create_laptop(request).await {
            Ok(response) => {
                let id = response.into_inner().id;
                tracing::info!(laptop_id = %id, "Created laptop");
                Ok(Some(id))
            }
            Err(status) if status.code() == Code::AlreadyExists => {
                tracing::info!("Laptop already exists");
                Ok(None)
            }
            Err(status) => Err(status.into()),
        }
    }

    /// Search the catalog and collect every match.
    pub async fn search_laptop(&mut self, filter: Filter) -> Result<Vec<Laptop>, ClientError> {
        tracing::info!(?filter, "Going to search laptops");
        let request = self.request(SearchLaptopRequest {
            filter: Some(filter.into()),
        });

        let mut stream = self.service.search_laptop(request).await?.into_inner();
        let mut found = Vec::new();
        while let Some(response) = stream.message().await? {
            if let Some(laptop) = response.laptop {
                tracing::info!(laptop_id = %laptop.id, "Found laptop");
                found.push(laptop.into());
            }
        }
        Ok(found)
    }

    /// Upload the image at `image_path` for a laptop. The file extension
    /// (with its dot) becomes the image type.
    pub async fn upload_image(
        &mut self,
        laptop_id: &str,
        image_path: &Path,
    ) -> Result<UploadImageResponse, ClientError> {
        let data = tokio::fs::read(image_path).await?;
        let image_type = image_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        self.upload_image_bytes(laptop_id, &image_type, &data).await
    }

    /// Upload raw image bytes: the metadata message, then
    /// `UPLOAD_CHUNK_SIZE` chunks.
    pub async fn upload_image_bytes(
        &mut self,
        laptop_id: &str,
        image_type: &str,
        data: &[u8],
    ) -> Result<UploadImageResponse, ClientError> {
        let mut messages = vec![UploadImageRequest {
            data: Some(upload_image_request::Data::Info(ImageInfo {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
            })),
        }];
        messages.extend(data.chunks(UPLOAD_CHUNK_SIZE).map(|chunk| UploadImageRequest {
            data: Some(upload_image_request::Data::ChunkData(chunk.to_vec())),
        }));
        tracing::info!(laptop_id, chunks = messages.len() - 1, "Going to upload image");

        let request = self.request(tokio_stream::iter(messages));
        let response = self.service.upload_image(request).await?.into_inner();

        tracing::info!(image_id = %response.id, size = response.size, "Image uploaded");
        Ok(response)
    }

    /// Rate several laptops over one stream, receiving the running
    /// aggregates while the requests are still being sent.
    pub async fn rate_laptops(
        &mut self,
        ratings: Vec<(String, f64)>,
    ) -> Result<Vec<RateLaptopResponse>, ClientError> {
        tracing::info!(count = ratings.len(), "Going to rate laptops");
        let requests = ratings
            .into_iter()
            .map(|(laptop_id, score)| RateLaptopRequest { laptop_id, score })
            .collect::<Vec<_>>();

        let request = self.request(tokio_stream::iter(requests));
        let mut stream = self.service.rate_laptop(request).await?.into_inner();

        let mut responses = Vec::new();
        while let Some(response) = stream.message().await? {
            tracing::info!(
                laptop_id = %response.laptop_id,
                rated_count = response.rated_count,
                average_score = response.average_score,
                "Received rating"
            );
            responses.push(response);
        }
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interceptor_without_token_adds_nothing() {
        let mut interceptor = TokenInterceptor::new();
        let request = interceptor.call(Request::new(())).unwrap();
        assert!(request.metadata().get("authorization").is_none());
    }

    #[test]
    fn test_interceptor_attaches_bearer_token() {
        let interceptor = TokenInterceptor::new();
        let mut attached = interceptor.clone();
        interceptor.set_token("abc.def.ghi".to_string());

        let request = attached.call(Request::new(())).unwrap();
        assert_eq!(
            request.metadata().get("authorization").unwrap(),
            "Bearer abc.def.ghi"
        );
    }

    #[test]
    fn test_interceptor_rejects_unprintable_token() {
        let mut interceptor = TokenInterceptor::new();
        interceptor.set_token("bad\ntoken".to_string());
        let status = interceptor.call(Request::new(())).unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }
}
