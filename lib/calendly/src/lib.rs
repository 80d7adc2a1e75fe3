//! Async client for the Calendly REST API.
//!
//! # Example
//!
//! ```ignore
//! use calendly::prelude::*;
//!
//! let client = CalendlyClient::builder()
//!     .api_key("my-api-key")
//!     .with_logging()
//!     .build()?;
//!
//! let event_types = client
//!     .event_types()
//!     .list(Some(&EventTypesOpts { include: Some(IncludeType::Owner) }))
//!     .await?;
//! for event_type in event_types.body() {
//!     println!("{event_type}");
//! }
//! ```
//!
//! The transport is pluggable: [`CalendlyClient`] works over any
//! [`HttpClient`]. [`HyperClient`] is the default, with the
//! [`middleware`] layers for authentication and logging.

mod api_client;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
pub mod resources;

pub use api_client::{
    CalendlyClient, CalendlyClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, Echo, cancel_on,
};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{
    API_KEY_ENV, ClientConfig, ClientConfigBuilder, DEFAULT_HEADER_KEY, HEADER_KEY_ENV,
    TokenConfig,
};
pub use connector::https_connector;
pub use resources::{
    AboutMe, EventHookType, EventType, EventTypes, EventTypesOpts, IncludeType, Users, Webhook,
    Webhooks, WebhooksOpts,
};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use calendly_core::{
    ContentType, DecodeError, Error, ErrorResponse, HttpClient, Method, Request, RequestBuilder,
    Response, Result, SerdeQuery, StatusCode, ToQueryParams, add_url_options, check_response,
    from_json, to_json, to_query_string,
};
