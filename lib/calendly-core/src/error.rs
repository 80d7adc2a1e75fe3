//! Error types for the calendly client.

use std::collections::HashMap;
use std::fmt;

use derive_more::{Display, Error, From};
use serde::Deserialize;

use crate::Method;

// ============================================================================
// API error payload
// ============================================================================

/// Wire shape of an API error: `{"message": string, "request_id": string}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: Option<String>,
}

/// A non-2xx answer from the API.
///
/// Built from the response that caused it: the message and request id come
/// from the JSON error payload when the body has that shape, otherwise the raw
/// body text becomes the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    method: Method,
    url: url::Url,
    status: u16,
    headers: HashMap<String, String>,
    message: String,
    request_id: Option<String>,
}

impl ErrorResponse {
    /// Build the error for a response to `method url`.
    #[must_use]
    pub fn new(
        method: Method,
        url: url::Url,
        status: u16,
        headers: HashMap<String, String>,
        body: &[u8],
    ) -> Self {
        let payload = if body.is_empty() {
            ErrorPayload::default()
        } else {
            serde_json::from_slice::<ErrorPayload>(body).unwrap_or_else(|_| ErrorPayload {
                message: String::from_utf8_lossy(body).into_owned(),
                request_id: None,
            })
        };

        Self {
            method,
            url,
            status,
            headers,
            message: payload.message,
            request_id: payload.request_id.filter(|id| !id.is_empty()),
        }
    }

    /// Method of the request that failed.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// URL of the request that failed.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Error message reported by the API, or the raw body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Request id returned by the API, useful when contacting support.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.request_id {
            Some(id) => write!(
                f,
                "{} {}: {} (request {id:?}) {}",
                self.method, self.url, self.status, self.message
            ),
            None => write!(
                f,
                "{} {}: {} {}",
                self.method, self.url, self.status, self.message
            ),
        }
    }
}

impl std::error::Error for ErrorResponse {}

/// A 2xx response whose body does not decode into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("cannot decode {status} response at '{path}': {message}")]
pub struct DecodeError {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// JSON path to the field that failed.
    pub path: String,
    /// Decoder message.
    pub message: String,
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for calendly operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[display("{_0}")]
    #[from(skip)]
    Status(#[error(not(source))] Box<ErrorResponse>),

    /// A 2xx body could not be decoded into the destination type.
    #[display("{_0}")]
    #[from(skip)]
    Decode(#[error(not(source))] Box<DecodeError>),

    /// The authenticator has no configuration bound.
    #[display("token authenticator has no configuration")]
    #[from(skip)]
    MissingConfig,

    /// The configured API key is empty.
    #[display("API key token is missing")]
    #[from(skip)]
    MissingApiKey,

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The caller cancelled the in-flight request.
    #[display("request cancelled")]
    #[from(skip)]
    Cancelled,

    /// Invalid request parameters.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "data[0].attributes.name").
        path: String,
        /// Error message.
        message: String,
    },

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing or resolution error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Writing the response body into a raw sink failed.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach response metadata to a body decoding failure.
    ///
    /// Other errors are returned unchanged.
    #[must_use]
    pub fn into_decode(self, status: u16, headers: HashMap<String, String>) -> Self {
        match self {
            Self::JsonDeserialization { path, message } => Self::Decode(Box::new(DecodeError {
                status,
                headers,
                path,
                message,
            })),
            other => other,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the caller cancelled the request.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` for credential configuration errors.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::MissingConfig | Self::MissingApiKey)
    }

    /// The API error, if the server rejected the request.
    #[must_use]
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status code for status and decode errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(response) => Some(response.status()),
            Self::Decode(decode) => Some(decode.status),
            _ => None,
        }
    }

    /// Returns the response headers for status and decode errors.
    #[must_use]
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        match self {
            Self::Status(response) => Some(response.headers()),
            Self::Decode(decode) => Some(&decode.headers),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the request with a 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.error_response()
            .is_some_and(|r| (400..500).contains(&r.status()))
    }

    /// Returns `true` if the server failed with a 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.error_response()
            .is_some_and(|r| (500..600).contains(&r.status()))
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.error_response().is_some_and(|r| r.status() == 404)
    }
}
