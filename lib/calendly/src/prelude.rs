//! Prelude module for convenient imports.
//!
//! ```ignore
//! use calendly::prelude::*;
//! ```

pub use crate::{
    AboutMe, CalendlyClient, ClientConfig, Error, EventHookType, EventType, EventTypesOpts,
    HttpClient, HyperClient, IncludeType, Method, Request, Response, Result, StatusCode,
    TokenConfig, ToQueryParams, Webhook, WebhooksOpts, cancel_on,
};
