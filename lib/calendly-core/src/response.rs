//! HTTP response handling.
//!
//! A [`Response`] carries the status, headers and body of an answer. The same
//! type is the envelope handed back to callers once the body is decoded:
//! `Response<Vec<EventType>>` still exposes rate-limit or pagination headers.
//!
//! [`check_response`] classifies a raw response: 2xx passes through, anything
//! else becomes an [`Error::Status`].

use std::collections::HashMap;
use std::io::Write;

use bytes::Bytes;

use crate::{Error, ErrorResponse, Method, Result};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
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

    /// Header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Transform the body with a function.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl Response<Bytes> {
    /// Decode the body as JSON, keeping status and headers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] with the status, headers and JSON path.
    pub fn decode_json<T: serde::de::DeserializeOwned>(self) -> Result<Response<T>> {
        let Self {
            status,
            headers,
            body,
        } = self;
        match crate::from_json(&body) {
            Ok(data) => Ok(Response::new(status, headers, data)),
            Err(err) => Err(err.into_decode(status, headers)),
        }
    }

    /// Copy the body verbatim into `sink`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink rejects the write.
    pub fn copy_to<W: Write + ?Sized>(self, sink: &mut W) -> Result<Response<u64>> {
        sink.write_all(&self.body)?;
        sink.flush()?;
        let written = u64::try_from(self.body.len()).unwrap_or(u64::MAX);
        Ok(self.map_body(|_| written))
    }

    /// Drop the body, keeping status and headers.
    #[must_use]
    pub fn discard_body(self) -> Response<()> {
        self.map_body(|_| ())
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// Classify a response to `method url`.
///
/// Statuses 200 through 299 are returned unchanged. Any other status becomes
/// [`Error::Status`], with the message and request id taken from the error
/// payload when the body has that shape.
///
/// # Errors
///
/// Returns [`Error::Status`] for every non-2xx status, even with an empty body.
pub fn check_response(
    method: Method,
    url: &url::Url,
    response: Response<Bytes>,
) -> Result<Response<Bytes>> {
    if response.is_success() {
        return Ok(response);
    }

    let (status, headers, body) = response.into_parts();
    Err(Error::Status(Box::new(ErrorResponse::new(
        method,
        url.clone(),
        status,
        headers,
        &body,
    ))))
}
