//! Resource accessors.
//!
//! Each accessor borrows the [`CalendlyClient`](crate::CalendlyClient) it was
//! created from and unwraps the `{"data": ...}` envelope the API puts around
//! every payload.

mod event_types;
mod users;
mod webhooks;

pub use event_types::{
    EventType, EventTypeAttributes, EventTypes, EventTypesOpts, IncludeType, Owner, OwnerData,
    Relationships,
};
pub use users::{AboutMe, Avatar, UserAttributes, Users};
pub use webhooks::{EventHookType, Webhook, WebhookAttributes, Webhooks, WebhooksOpts};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The `{"data": ...}` success envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: T,
}

/// A payload that may or may not come wrapped in the envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MaybeEnveloped<T> {
    Enveloped(Envelope<T>),
    Bare(T),
}

impl<T> MaybeEnveloped<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Enveloped(envelope) => envelope.data,
            Self::Bare(data) => data,
        }
    }
}

/// `{prefix}/{id}` with `id` escaped as one path segment.
pub(crate) fn item_path(prefix: &str, id: &str) -> String {
    format!("{prefix}/{}", utf8_percent_encode(id, PATH_SEGMENT))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[derive(Debug, Default, PartialEq, Eq, Deserialize)]
    struct Item {
        #[serde(default)]
        id: String,
    }

    #[test]
    fn item_path_escapes_segment() {
        check!(item_path("hooks", "123") == "hooks/123");
        check!(item_path("hooks", "a/b c") == "hooks/a%2Fb%20c");
        check!(item_path("hooks", "../x?y") == "hooks/..%2Fx%3Fy");
    }

    #[test]
    fn envelope_first() {
        let_assert!(Ok(value) = serde_json::from_str::<MaybeEnveloped<Item>>(r#"{"data":{"id":"1"}}"#));
        check!(value.into_inner() == Item { id: "1".into() });
    }

    #[test]
    fn bare_payload() {
        let_assert!(Ok(value) = serde_json::from_str::<MaybeEnveloped<Item>>(r#"{"id":"123"}"#));
        check!(value.into_inner() == Item { id: "123".into() });
    }
}
