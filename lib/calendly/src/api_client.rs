//! The Calendly client core.
//!
//! [`CalendlyClient`] resolves paths against the API root, attaches the
//! standard headers, sends requests through any [`HttpClient`] and classifies
//! the responses. The resource accessors ([`Users`], [`EventTypes`],
//! [`Webhooks`]) are thin layers over [`CalendlyClient::send`].

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::resources::{EventTypes, Users, Webhooks};
use crate::{
    ClientConfigBuilder, Error, HttpClient, HyperClient, Method, Request, RequestBuilder,
    Response, Result, TokenConfig, check_response, middleware::LoggingLayer,
};

/// Root of the Calendly v1 API.
pub const DEFAULT_BASE_URL: &str = "https://calendly.com/api/v1/";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("calendly-rs-", env!("CARGO_PKG_VERSION"));

/// Response of the `echo` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Echo {
    /// Email of the account owning the API key.
    #[serde(default)]
    pub email: String,
}

/// Client for the Calendly REST API.
///
/// Generic over the transport so tests and embedders can plug their own
/// [`HttpClient`]. Cloning is as cheap as cloning the transport.
///
/// ```ignore
/// use calendly::CalendlyClient;
///
/// let client = CalendlyClient::builder().api_key("my-api-key").build()?;
/// let me = client.users().about_me().await?;
/// println!("{}", me.body());
/// ```
#[derive(Debug, Clone)]
pub struct CalendlyClient<C> {
    http: C,
    base_url: Url,
    user_agent: String,
}

impl CalendlyClient<HyperClient> {
    /// Create a builder for a client over the hyper transport.
    #[must_use]
    pub fn builder() -> CalendlyClientBuilder {
        CalendlyClientBuilder::default()
    }
}

impl<C> CalendlyClient<C> {
    /// Wrap `http`, targeting [`DEFAULT_BASE_URL`].
    ///
    /// Authentication is the transport's concern: wrap it in
    /// [`TokenAuth`](crate::middleware::TokenAuth) or build it with
    /// [`HyperClientBuilder::with_token_auth`](crate::HyperClientBuilder::with_token_auth).
    ///
    /// # Errors
    ///
    /// Never fails in practice; the default URL is checked at runtime.
    pub fn new(http: C) -> Result<Self> {
        Ok(Self::with_url(http, Url::parse(DEFAULT_BASE_URL)?))
    }

    /// Wrap `http`, targeting `base_url`.
    #[must_use]
    pub fn with_url(http: C, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// The URL relative paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the base URL.
    ///
    /// Keep the trailing `/`: without it the last path segment is replaced
    /// when resolving relative paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `base_url` is not an absolute URL; the
    /// previous base URL is kept.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Url::parse(base_url)?;
        Ok(())
    }

    /// The `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Replace the `User-Agent` header value. An empty value omits the header.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    /// The transport.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.http
    }

    /// Resolve `path` against the base URL and attach the standard headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `path` cannot be resolved.
    pub fn request_builder(&self, method: Method, path: &str) -> Result<RequestBuilder<Bytes>> {
        let url = self.base_url.join(path)?;

        let mut builder = Request::builder(method, url).header("Accept", "application/json");
        if !self.user_agent.is_empty() {
            builder = builder.header("User-Agent", self.user_agent.as_str());
        }
        Ok(builder)
    }

    /// Build a request for `path`, with `body` encoded as JSON when present.
    ///
    /// No I/O happens here.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `path` cannot be resolved
    /// - [`Error::JsonSerialization`] if `body` cannot be encoded
    pub fn new_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request<Bytes>>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request_builder(method, path)?;
        let builder = match body {
            Some(body) => builder.json(body)?,
            None => builder,
        };
        Ok(builder.build())
    }

    /// Build a `GET` request for `path`.
    pub fn get(&self, path: &str) -> Result<Request<Bytes>> {
        self.new_request::<()>(Method::Get, path, None)
    }

    /// Build a `DELETE` request for `path`.
    pub fn delete(&self, path: &str) -> Result<Request<Bytes>> {
        self.new_request::<()>(Method::Delete, path, None)
    }

    /// Build a `POST` request for `path` with a JSON body.
    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Request<Bytes>> {
        self.new_request(Method::Post, path, Some(body))
    }

    /// Build a `PUT` request for `path` with a JSON body.
    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Request<Bytes>> {
        self.new_request(Method::Put, path, Some(body))
    }

    /// Access the `users` resource.
    #[must_use]
    pub fn users(&self) -> Users<'_, C> {
        Users::new(self)
    }

    /// Access the `event_types` resource.
    #[must_use]
    pub fn event_types(&self) -> EventTypes<'_, C> {
        EventTypes::new(self)
    }

    /// Access the `hooks` resource.
    #[must_use]
    pub fn webhooks(&self) -> Webhooks<'_, C> {
        Webhooks::new(self)
    }
}

impl<C: HttpClient> CalendlyClient<C> {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let method = request.method();
        let url = request.url().clone();
        debug!(%method, %url, "sending API request");

        let response = self.http.execute(request).await?;
        check_response(method, &url, response).inspect_err(|err| {
            if let Some(rejected) = err.error_response() {
                warn!(
                    %method,
                    %url,
                    status = rejected.status(),
                    request_id = rejected.request_id().unwrap_or_default(),
                    "API request rejected"
                );
            }
        })
    }

    /// Send `request` and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// - Transport and configuration errors from the [`HttpClient`]
    /// - [`Error::Status`] for a non-2xx response
    /// - [`Error::Decode`] if the body does not match `T`
    pub async fn send<T: DeserializeOwned>(&self, request: Request<Bytes>) -> Result<Response<T>> {
        self.execute(request).await?.decode_json()
    }

    /// Send `request` and copy the body verbatim into `sink`.
    ///
    /// The response body holds the number of bytes written.
    pub async fn send_raw<W: Write + ?Sized>(
        &self,
        request: Request<Bytes>,
        sink: &mut W,
    ) -> Result<Response<u64>> {
        self.execute(request).await?.copy_to(sink)
    }

    /// Send `request`, keeping only status and headers.
    pub async fn send_empty(&self, request: Request<Bytes>) -> Result<Response<()>> {
        Ok(self.execute(request).await?.discard_body())
    }

    /// Check the API key against the `echo` endpoint.
    pub async fn echo(&self) -> Result<Response<Echo>> {
        self.send(self.get("echo")?).await
    }
}

/// Run `operation` until it completes or `signal` fires.
///
/// Dropping the operation aborts the in-flight HTTP call.
///
/// ```ignore
/// let (tx, rx) = tokio::sync::oneshot::channel::<()>();
/// let result = calendly::cancel_on(async { rx.await.ok(); }, client.echo()).await;
/// ```
///
/// # Errors
///
/// Returns [`Error::Cancelled`] if `signal` completes first, otherwise the
/// result of `operation`.
pub async fn cancel_on<T, S, F>(signal: S, operation: F) -> Result<T>
where
    S: Future<Output = ()>,
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = signal => Err(Error::Cancelled),
        result = operation => result,
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for a [`CalendlyClient`] over [`HyperClient`].
///
/// Without an API key every request fails with [`Error::MissingApiKey`]
/// before reaching the network.
#[derive(Debug, Default)]
pub struct CalendlyClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    token: TokenConfig,
    transport: ClientConfigBuilder,
    logging: Option<LoggingLayer>,
}

impl CalendlyClientBuilder {
    /// Target another API root, e.g. a mock server.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the whole credential.
    #[must_use]
    pub fn token(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        let header_key = self.token.header_key().to_owned();
        self.token = TokenConfig::new(api_key).with_header_key(header_key);
        self
    }

    /// Send the API key in `header_key` instead of `X-Token`.
    #[must_use]
    pub fn header_key(mut self, header_key: impl Into<String>) -> Self {
        self.token = self.token.with_header_key(header_key);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.connect_timeout(timeout);
        self
    }

    /// Log requests and responses with `tracing`.
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.logging = Some(LoggingLayer::new());
        self
    }

    /// Log at debug level, including request header names.
    #[must_use]
    pub fn with_debug_logging(mut self) -> Self {
        self.logging = Some(LoggingLayer::debug());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL is not absolute.
    pub fn build(self) -> Result<CalendlyClient<HyperClient>> {
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let mut http = HyperClient::builder().config(self.transport);
        if let Some(logging) = self.logging {
            http = http.layer(logging);
        }
        let http = http.with_token_auth(self.token).build();

        let mut client = CalendlyClient::with_url(http, base_url);
        if let Some(user_agent) = self.user_agent {
            client.set_user_agent(user_agent);
        }
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    /// Transport that must never be reached.
    #[derive(Debug, Clone, Copy)]
    struct Unreachable;

    impl HttpClient for Unreachable {
        async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
            Err(Error::connection("unreachable"))
        }
    }

    fn client() -> CalendlyClient<Unreachable> {
        let_assert!(Ok(client) = CalendlyClient::new(Unreachable));
        client
    }

    #[derive(Serialize)]
    struct Payload {
        name: &'static str,
        count: u32,
    }

    #[test]
    fn defaults() {
        let client = client();
        check!(client.base_url().as_str() == "https://calendly.com/api/v1/");
        check!(client.user_agent().starts_with("calendly-rs-"));
    }

    #[test]
    fn resolves_relative_path() {
        let_assert!(Ok(request) = client().get("users/me"));
        check!(request.url().as_str() == "https://calendly.com/api/v1/users/me");
        check!(request.method() == Method::Get);
    }

    #[test]
    fn resolves_absolute_path_against_host() {
        let_assert!(Ok(request) = client().get("/other"));
        check!(request.url().as_str() == "https://calendly.com/other");
    }

    #[test]
    fn standard_headers_without_body() {
        let_assert!(Ok(request) = client().get("echo"));
        check!(request.header("accept") == Some("application/json"));
        check!(request.header("user-agent") == Some(DEFAULT_USER_AGENT));
        check!(request.header("content-type") == None);
        check!(request.body() == None);
    }

    #[test]
    fn json_body_is_canonical() {
        let_assert!(Ok(request) = client().post("hooks", &Payload { name: "a", count: 2 }));
        check!(request.method() == Method::Post);
        check!(request.header("content-type") == Some("application/json"));
        check!(request.body().map(|body| body.to_vec()) == Some(br#"{"name":"a","count":2}"#.to_vec()));
    }

    #[test]
    fn unencodable_body_fails() {
        let mut body = std::collections::HashMap::new();
        body.insert(vec![1_u8], 1);

        let result = client().put("hooks", &body);
        let_assert!(Err(Error::JsonSerialization(_)) = result);
    }

    #[test]
    fn empty_user_agent_is_omitted() {
        let mut client = client();
        client.set_user_agent("");

        let_assert!(Ok(request) = client.get("echo"));
        check!(request.header("user-agent") == None);
    }

    #[test]
    fn set_base_url_rejects_relative() {
        let mut client = client();
        let_assert!(Err(Error::InvalidUrl(_)) = client.set_base_url("not a url"));
        check!(client.base_url().as_str() == DEFAULT_BASE_URL);

        let_assert!(Ok(()) = client.set_base_url("http://127.0.0.1:8080/api/"));
        let_assert!(Ok(request) = client.delete("hooks/1"));
        check!(request.url().as_str() == "http://127.0.0.1:8080/api/hooks/1");
    }

    #[tokio::test]
    async fn cancel_on_signal() {
        let pending = std::future::pending::<Result<u32>>();
        let_assert!(Err(Error::Cancelled) = cancel_on(async {}, pending).await);
    }

    #[tokio::test]
    async fn cancel_on_completes() {
        let_assert!(Ok(7) = cancel_on(std::future::pending(), async { Ok(7) }).await);
    }

    #[test]
    fn builder_rejects_bad_base_url() {
        let result = CalendlyClient::builder().base_url("::nope").build();
        let_assert!(Err(Error::InvalidUrl(_)) = result);
    }
}
