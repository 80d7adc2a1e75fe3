//! Simple authentication demo
//!
//! Reads the API key from `CALENDLY_API_KEY` (and optionally the header name
//! from `CALENDLY_HEADER_KEY`), then checks it against the `echo` endpoint.

#![allow(clippy::print_stdout)]

use calendly::prelude::*;

async fn run(client: &CalendlyClient<HyperClient>) -> calendly::Result<String> {
    let echo = client.echo().await?;
    Ok(format!("authenticated as {}", echo.body().email))
}

#[tokio::main]
async fn main() -> calendly::Result<()> {
    let client = CalendlyClient::builder()
        .token(TokenConfig::from_env())
        .with_logging()
        .build()?;

    println!("{}", run(&client).await?);
    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    #[tokio::test]
    async fn test_echo_with_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/echo"))
            .and(header("X-Token", "demo-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"email": "demo@example.com"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CalendlyClient::builder()
            .base_url(format!("{}/api/v1/", mock_server.uri()))
            .api_key("demo-key")
            .build()
            .expect("client");

        let message = run(&client).await.expect("echo");
        assert_eq!(message, "authenticated as demo@example.com");
    }

    #[tokio::test]
    async fn test_echo_without_token() {
        let client = CalendlyClient::builder()
            .base_url("http://127.0.0.1:1/api/v1/")
            .build()
            .expect("client");

        let err = run(&client).await.expect_err("missing key");
        assert!(err.is_config());
    }
}
