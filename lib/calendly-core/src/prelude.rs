//! Prelude module for convenient imports.
//!
//! ```ignore
//! use calendly_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Error, HttpClient, Method, Request, RequestBuilder, Response, Result,
    SerdeQuery, ToQueryParams, add_url_options, check_response, from_json, to_json,
};
