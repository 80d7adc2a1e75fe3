//! Body serialization utilities.

use bytes::Bytes;

use crate::Result;

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`), used for every API payload.
    Json,
    /// Plain text content type (`text/plain`), used by webhook creation.
    PlainText,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::PlainText => "text/plain",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to its canonical (compact) JSON encoding.
///
/// # Errors
///
/// Returns an error if JSON serialization fails, e.g. for a map whose keys
/// are not strings.
///
/// # Example
///
/// ```
/// use calendly_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Echo { email: String }
///
/// let echo = Echo { email: "echo@echo.com".to_string() };
/// let bytes = to_json(&echo).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"email":"echo@echo.com"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a record to a query string.
///
/// Uses `serde_html_form`: `Option::None` fields flagged with
/// `skip_serializing_if` are left out and `Vec<T>` fields become repeated keys.
///
/// # Errors
///
/// Returns an error if the value is not a record (struct or map).
pub fn to_query_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns [`Error::JsonDeserialization`](crate::Error::JsonDeserialization)
/// carrying the path to the offending field (e.g. `data[1].attributes.name`).
///
/// # Example
///
/// ```
/// use calendly_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Echo { email: String }
///
/// let echo: Echo = from_json(br#"{"email":"echo@echo.com"}"#).expect("deserialize");
/// assert_eq!(echo.email, "echo@echo.com");
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })?;
    deserializer
        .end()
        .map_err(|e| crate::Error::json_deserialization(".", e.to_string()))?;
    Ok(value)
}
