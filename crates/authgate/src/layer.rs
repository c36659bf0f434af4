use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::AuthError;
use crate::gate::{AuthGate, TokenVerifier};

/// Tower layer that puts an [`AuthGate`] in front of the inner service.
pub struct AuthGateLayer<V> {
    gate: Arc<AuthGate<V>>,
}

impl<V: TokenVerifier> AuthGateLayer<V> {
    pub fn new(gate: AuthGate<V>) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}

impl<V> Clone for AuthGateLayer<V> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S, V: TokenVerifier> Layer<S> for AuthGateLayer<V> {
    type Service = AuthGateService<S, V>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthGateService {
            inner,
            gate: Arc::clone(&self.gate),
        }
    }
}

/// Service produced by [`AuthGateLayer`] and [`protect`].
///
/// Rejected requests never reach `inner`. Accepted ones carry a
/// [`Uid`](crate::Uid) extension.
pub struct AuthGateService<S, V> {
    inner: S,
    gate: Arc<AuthGate<V>>,
}

impl<S: Clone, V> Clone for AuthGateService<S, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S, V> Service<Request<Body>> for AuthGateService<S, V>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    V: TokenVerifier,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // Verification runs here, before the future exists, so the only
        // await point is the inner service.
        let uid = match self.gate.authenticate(req.headers()) {
            Ok(uid) => uid,
            Err(err) => {
                log_rejection(&err, &req);
                let response = err.into_response();
                return Box::pin(async move { Ok(response) });
            }
        };

        tracing::trace!(uid = %uid, "request authenticated");
        req.extensions_mut().insert(uid);

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

fn log_rejection(err: &AuthError, req: &Request<Body>) {
    match err {
        AuthError::Configuration(fault) => tracing::error!(
            key = fault.key(),
            path = %req.uri().path(),
            "authentication secret is not configured"
        ),
        _ => tracing::debug!(
            reason = %err,
            path = %req.uri().path(),
            "request rejected"
        ),
    }
}

/// Wrap `handler` so it only runs for requests carrying a token signed with
/// the secret named `secret_key_name`. The value of `claim_key_name` is
/// attached to the request as [`Uid`](crate::Uid).
///
/// ```ignore
/// let secrets = SecretStore::from_env();
/// let guarded = protect(secrets, "JWT_SECRET", "uid", service_fn(handler));
/// ```
#[cfg(feature = "jwt")]
pub fn protect<S>(
    secrets: impl crate::SecretSource,
    secret_key_name: impl Into<String>,
    claim_key_name: impl Into<String>,
    handler: S,
) -> AuthGateService<S, crate::jwt::Hs256Verifier> {
    let config = crate::GateConfig::new(secret_key_name).claim_key(claim_key_name);
    AuthGateLayer::new(AuthGate::hs256(config, secrets)).layer(handler)
}

/// Extension trait for putting routes behind an [`AuthGate`].
pub trait AuthGateExt {
    /// Gate every route added so far.
    fn with_auth_gate<V: TokenVerifier>(self, gate: AuthGate<V>) -> Self;
}

impl<St: Clone + Send + Sync + 'static> AuthGateExt for Router<St> {
    fn with_auth_gate<V: TokenVerifier>(self, gate: AuthGate<V>) -> Self {
        self.layer(AuthGateLayer::new(gate))
    }
}
