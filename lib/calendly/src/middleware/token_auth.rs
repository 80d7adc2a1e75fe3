//! API key authentication.
//!
//! Sets the configured header (`X-Token` by default) to the API key on every
//! outgoing request. Requests fail with [`Error::MissingConfig`] when no
//! credential was configured and with [`Error::MissingApiKey`] when the key is
//! empty; in both cases the inner transport is never called.
//!
//! [`TokenAuth`] is both a Tower [`Service`] (for [`HyperClient`] layering)
//! and an [`HttpClient`] wrapper (for any transport).
//!
//! [`HyperClient`]: crate::HyperClient

use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use calendly_core::HttpClient;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result, TokenConfig};

/// Layer that authenticates requests with an API key.
///
/// ```ignore
/// use calendly::{HyperClient, TokenConfig};
/// use calendly::middleware::TokenAuthLayer;
///
/// let client = HyperClient::builder()
///     .layer(TokenAuthLayer::new(TokenConfig::new("my-api-key")))
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenAuthLayer {
    config: Option<Arc<TokenConfig>>,
}

impl TokenAuthLayer {
    /// Authenticate with `config`, falling back to `X-Token` when its header
    /// name is empty.
    #[must_use]
    pub fn new(config: TokenConfig) -> Self {
        Self {
            config: Some(Arc::new(config.resolve_header_key())),
        }
    }

    /// A layer with no credential; every request fails with
    /// [`Error::MissingConfig`].
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::default()
    }
}

impl<S> Layer<S> for TokenAuthLayer {
    type Service = TokenAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TokenAuth {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service that authenticates requests with an API key.
#[derive(Debug, Clone)]
pub struct TokenAuth<S> {
    inner: S,
    config: Option<Arc<TokenConfig>>,
}

impl<S> TokenAuth<S> {
    /// Wrap `inner`, authenticating with `config`.
    pub fn new(inner: S, config: TokenConfig) -> Self {
        TokenAuthLayer::new(config).layer(inner)
    }

    /// The wrapped transport.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// The credential in use, if any.
    pub fn config(&self) -> Option<&TokenConfig> {
        self.config.as_deref()
    }

    fn authorize(&self, request: &mut Request<Bytes>) -> Result<()> {
        let config = self.config.as_deref().ok_or(Error::MissingConfig)?;
        if config.api_key().is_empty() {
            return Err(Error::MissingApiKey);
        }

        request.set_header(config.header_key(), config.api_key());
        Ok(())
    }
}

impl<S> Service<Request<Bytes>> for TokenAuth<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        if let Err(err) = self.authorize(&mut request) {
            return Box::pin(async move { Err(err) });
        }

        // Keep the service that was polled ready
        let clone = self.inner.clone();
        let mut inner = mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}

impl<S: HttpClient> HttpClient for TokenAuth<S> {
    async fn execute(&self, mut request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.authorize(&mut request)?;
        self.inner.execute(request).await
    }
}
