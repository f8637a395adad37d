// crates/laptop-rpc/src/middleware.rs
//
// Middleware for the RPC server: the authorization guard.
//
// `AuthGuard` wraps a generated tonic server. It runs once per HTTP/2
// request, before the body is read, so unary and streaming calls alike are
// checked exactly once and a rejected stream never reaches its handler.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tonic::body::BoxBody;
use tonic::server::NamedService;
use tonic::Status;

use laptop_auth::{AccessPolicy, TokenManager};

use crate::status::auth_status;

/// Extract the access token from the `authorization` header.
///
/// Accepts both `Bearer <token>` and a bare token.
pub fn bearer_token(headers: &http::HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Build a trailers-only gRPC response carrying `status`.
fn status_response(status: &Status) -> http::Response<BoxBody> {
    let mut response = http::Response::new(tonic::body::empty_body());
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/grpc"));
    headers.insert("grpc-status", HeaderValue::from(status.code() as i32));
    if let Ok(message) = HeaderValue::from_str(status.message()) {
        headers.insert("grpc-message", message);
    }
    response
}

/// Tower service that authorizes each call against an `AccessPolicy` before
/// handing it to the wrapped service.
///
/// On success the verified `UserClaims` (if any) are placed in the request
/// extensions, where handlers can read them with `request.extensions()`.
pub struct AuthGuard<S> {
    inner: S,
    tokens: Arc<TokenManager>,
    policy: Arc<AccessPolicy>,
}

impl<S> AuthGuard<S> {
    pub fn new(inner: S, tokens: Arc<TokenManager>, policy: Arc<AccessPolicy>) -> Self {
        Self {
            inner,
            tokens,
            policy,
        }
    }
}

impl<S: Clone> Clone for AuthGuard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            tokens: self.tokens.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<S> std::fmt::Debug for AuthGuard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: NamedService> NamedService for AuthGuard<S> {
    const NAME: &'static str = S::NAME;
}

impl<S, B> tower_service::Service<http::Request<B>> for AuthGuard<S>
where
    S: tower_service::Service<
            http::Request<B>,
            Response = http::Response<BoxBody>,
            Error = Infallible,
        > + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        let method = req.uri().path().to_string();
        let token = bearer_token(req.headers());
        tracing::info!(method = %method, "--> auth guard");

        match self.policy.authorize(&self.tokens, &method, token.as_deref()) {
            Ok(claims) => {
                if let Some(claims) = claims {
                    tracing::debug!(username = %claims.username, role = %claims.role, "Authorized");
                    req.extensions_mut().insert(claims);
                }
                // The clone may not be ready; keep the one poll_ready was called on.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                let status = auth_status(&method, &err);
                Box::pin(async move { Ok(status_response(&status)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use laptop_auth::{methods, UserClaims};
    use laptop_core::User;
    use tower_service::Service;

    use super::*;

    /// Inner service that records whether it was reached and echoes the
    /// caller's username back in a header.
    #[derive(Clone, Default)]
    struct Probe {
        calls: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl NamedService for Probe {
        const NAME: &'static str = "laptop.v1.Probe";
    }

    impl tower_service::Service<http::Request<()>> for Probe {
        type Response = http::Response<BoxBody>;
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<()>) -> Self::Future {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let username = req
                .extensions()
                .get::<UserClaims>()
                .map(|c| c.username.clone())
                .unwrap_or_default();
            Box::pin(async move {
                let mut response = http::Response::new(tonic::body::empty_body());
                response
                    .headers_mut()
                    .insert("x-user", HeaderValue::from_str(&username).unwrap());
                Ok(response)
            })
        }
    }

    fn guard() -> (AuthGuard<Probe>, Probe, Arc<TokenManager>) {
        let probe = Probe::default();
        let tokens = Arc::new(TokenManager::new("secret", Duration::from_secs(60)));
        let policy = Arc::new(AccessPolicy::laptop_service_defaults());
        (AuthGuard::new(probe.clone(), tokens.clone(), policy), probe, tokens)
    }

    fn request(method: &str, authorization: Option<&str>) -> http::Request<()> {
        let mut builder = http::Request::builder().uri(format!("http://localhost{}", method));
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap()
    }

    fn grpc_status(response: &http::Response<BoxBody>) -> Option<i32> {
        response
            .headers()
            .get("grpc-status")
            .map(|v| v.to_str().unwrap().parse().unwrap())
    }

    fn calls(probe: &Probe) -> usize {
        probe.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    #[test]
    fn test_bearer_token_forms() {
        let mut headers = http::HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_guard_keeps_inner_name() {
        assert_eq!(<AuthGuard<Probe> as NamedService>::NAME, "laptop.v1.Probe");
    }

    #[tokio::test]
    async fn test_public_method_passes_without_token() {
        let (mut guard, probe, _) = guard();
        let response = guard.call(request(methods::SEARCH_LAPTOP, None)).await.unwrap();

        assert_eq!(grpc_status(&response), None);
        assert_eq!(calls(&probe), 1);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let (mut guard, probe, _) = guard();
        let response = guard.call(request(methods::CREATE_LAPTOP, None)).await.unwrap();

        assert_eq!(grpc_status(&response), Some(tonic::Code::Unauthenticated as i32));
        assert_eq!(calls(&probe), 0);
    }

    #[tokio::test]
    async fn test_wrong_role_is_permission_denied() {
        let (mut guard, probe, tokens) = guard();
        let token = tokens.generate(&User::new("rob", "pw", "role2")).unwrap();
        let bearer = format!("Bearer {}", token);

        let response = guard
            .call(request(methods::RATE_LAPTOP, Some(&bearer)))
            .await
            .unwrap();

        assert_eq!(grpc_status(&response), Some(tonic::Code::PermissionDenied as i32));
        assert_eq!(calls(&probe), 0);
    }

    #[tokio::test]
    async fn test_allowed_call_carries_claims() {
        let (mut guard, probe, tokens) = guard();
        let token = tokens.generate(&User::new("kay", "pw", "role1")).unwrap();
        let bearer = format!("Bearer {}", token);

        let response = guard
            .call(request(methods::RATE_LAPTOP, Some(&bearer)))
            .await
            .unwrap();

        assert_eq!(grpc_status(&response), None);
        assert_eq!(response.headers().get("x-user").unwrap(), "kay");
        assert_eq!(calls(&probe), 1);
    }

    #[tokio::test]
    async fn test_unlisted_method_is_denied() {
        let (mut guard, probe, tokens) = guard();
        let token = tokens.generate(&User::new("jay", "pw", "admin")).unwrap();

        let response = guard
            .call(request("/laptop.v1.LaptopService/DeleteLaptop", Some(&token)))
            .await
            .unwrap();

        assert_eq!(grpc_status(&response), Some(tonic::Code::PermissionDenied as i32));
        assert_eq!(calls(&probe), 0);
    }
}
