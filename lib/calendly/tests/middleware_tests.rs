//! Integration tests for the transport middleware.

use std::sync::Arc;

use calendly::middleware::{ServiceBuilder, TokenAuth, TokenAuthLayer};
use calendly::{CalendlyClient, Error, HttpClient, HyperClient, Method, Request, TokenConfig};
use tower::{Service, ServiceExt};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

/// Token auth adds the API key header.
#[tokio::test]
async fn test_token_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("X-Token", "my-secret-key"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_token_auth(TokenConfig::new("my-secret-key"))
        .build();

    let url = url::Url::parse(&format!("{}/protected", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

/// Token auth replaces a header of the same name set by the caller.
#[tokio::test]
async fn test_token_auth_overrides_existing_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("X-Token", "configured"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_token_auth(TokenConfig::new("configured"))
        .build();

    let url = url::Url::parse(&format!("{}/protected", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url)
        .header("x-token", "stale")
        .build();

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);

    let requests = mock_server.received_requests().await.expect("recording");
    let [received] = requests.as_slice() else {
        panic!("expected one request, got {}", requests.len());
    };
    assert_eq!(received.headers.get_all("x-token").iter().count(), 1);
}

/// An unconfigured authenticator fails before the transport is reached.
#[tokio::test]
async fn test_unconfigured_token_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(TokenAuthLayer::unconfigured())
        .build();

    let url = url::Url::parse(&format!("{}/protected", mock_server.uri())).expect("url");
    let result = client.execute(Request::builder(Method::Get, url).build()).await;

    assert!(matches!(result, Err(Error::MissingConfig)));
}

/// Logging and authentication composed together.
#[tokio::test]
async fn test_middleware_composition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/composed"))
        .and(header("X-Token", "key"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_debug_logging()
        .with_token_auth(TokenConfig::new("key"))
        .build();

    let url = url::Url::parse(&format!("{}/composed", mock_server.uri())).expect("url");
    let response = client
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    // The transport hands back non-2xx responses untouched
    assert_eq!(response.status(), 404);
    assert_eq!(&response.body()[..], b"nope");
}

/// `TokenAuth` wraps any `HttpClient`, not only tower services.
#[tokio::test]
async fn test_token_auth_as_http_client_wrapper() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/echo"))
        .and(header("Authorization-Token", "wrapped"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"email": "w@example.com"})),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = TokenConfig::new("wrapped").with_header_key("Authorization-Token");
    let http = Arc::new(TokenAuth::new(HyperClient::new(), config));
    let base_url = url::Url::parse(&format!("{}/api/v1/", mock_server.uri())).expect("url");

    // Two clients sharing one transport
    let first = CalendlyClient::with_url(Arc::clone(&http), base_url.clone());
    let second = CalendlyClient::with_url(http, base_url);

    let (a, b) = tokio::join!(first.echo(), second.echo());
    assert_eq!(a.expect("first").body().email, "w@example.com");
    assert_eq!(b.expect("second").body().email, "w@example.com");
}

/// The layers compose with plain tower services too.
#[tokio::test]
async fn test_service_builder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc"))
        .and(header("X-Token", "svc-key"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut service = ServiceBuilder::new()
        .layer(TokenAuthLayer::new(TokenConfig::new("svc-key")))
        .service(HyperClient::new());

    let url = url::Url::parse(&format!("{}/svc", mock_server.uri())).expect("url");
    let response = service
        .ready()
        .await
        .expect("ready")
        .call(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    assert!(response.is_success());
}
