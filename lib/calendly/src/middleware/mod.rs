//! Tower middleware layers for the HTTP transport.
//!
//! - [`TokenAuthLayer`] - Sets the API key header (`X-Token` by default)
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Layers are added through [`HyperClientBuilder::layer`], or through its
//! helpers [`with_token_auth`] and [`with_logging`]. The first layer added
//! sees the request first.
//!
//! ```ignore
//! use calendly::{HyperClient, TokenConfig};
//!
//! let client = HyperClient::builder()
//!     .with_logging()
//!     .with_token_auth(TokenConfig::from_env())
//!     .build();
//! ```
//!
//! [`HyperClientBuilder::layer`]: crate::HyperClientBuilder::layer
//! [`with_token_auth`]: crate::HyperClientBuilder::with_token_auth
//! [`with_logging`]: crate::HyperClientBuilder::with_logging

mod logging;
mod token_auth;

pub use logging::{LogLevel, Logging, LoggingLayer};
pub use token_auth::{TokenAuth, TokenAuthLayer};

pub use tower::{Layer, ServiceBuilder};
