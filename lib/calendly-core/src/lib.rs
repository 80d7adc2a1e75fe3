//! Core types and traits for the calendly API client.
//!
//! This crate holds the transport-agnostic plumbing:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - request descriptors
//! - [`Response`] - status, headers and body; also the envelope of decoded results
//! - [`check_response`] - 2xx classification into [`Error::Status`]
//! - [`Error`], [`ErrorResponse`], [`DecodeError`] and [`Result`] - error handling
//! - [`HttpClient`] - the pluggable transport trait
//! - [`ToQueryParams`], [`SerdeQuery`] and [`add_url_options`] - query option encoding
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)

mod body;
mod client;
mod error;
mod method;
pub mod prelude;
mod query;
mod request;
mod response;

pub use body::{ContentType, from_json, to_json, to_query_string};
pub use client::HttpClient;
pub use error::{DecodeError, Error, ErrorResponse, Result};
pub use method::Method;
pub use query::{SerdeQuery, ToQueryParams, add_url_options};
pub use request::{Request, RequestBuilder};
pub use response::{Response, check_response};

// Re-export http crate types for status codes
pub use http::StatusCode;
