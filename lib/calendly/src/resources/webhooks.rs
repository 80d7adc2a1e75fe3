//! Webhook subscriptions (`hooks`).
//!
//! Subscription creation does not take JSON: the API expects the form
//! `url=<url>&events[]=<event>...`, query-escaped as a whole, sent as a JSON
//! string with `Content-Type: text/plain`. [`Webhooks::create`] reproduces
//! those bytes exactly.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use url::Url;

use super::{Envelope, MaybeEnveloped, item_path};
use crate::{CalendlyClient, ContentType, Error, HttpClient, Method, Response, Result};

/// Everything but `A-Z a-z 0-9 - _ . ~` is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A webhook subscription.
///
/// Identifiers are kept as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    /// Subscription identifier. Required.
    pub id: String,
    /// Resource type, `hooks`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Subscription details.
    #[serde(default)]
    pub attributes: Option<WebhookAttributes>,
}

/// Subscription details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookAttributes {
    /// Callback URL.
    pub url: String,
    /// Creation timestamp, as sent by the API.
    pub created_at: String,
    /// Subscribed events.
    pub events: Vec<String>,
    /// `active` or `disabled`.
    pub state: String,
}

impl fmt::Display for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(attributes) = &self.attributes {
            write!(
                f,
                " -> {} [{}] ({})",
                attributes.url,
                attributes.events.join(", "),
                attributes.state
            )?;
        }
        Ok(())
    }
}

/// An event a webhook can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventHookType(Cow<'static, str>);

impl EventHookType {
    /// An invitee scheduled an event.
    pub const INVITEE_CREATED: Self = Self(Cow::Borrowed("invitee.created"));

    /// An invitee cancelled an event.
    pub const INVITEE_CANCELLED: Self = Self(Cow::Borrowed("invitee.cancelled"));

    /// Any other event name accepted by the API.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The event name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventHookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subscription to create with [`Webhooks::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhooksOpts {
    /// Absolute callback URL, sent as written apart from the scheme case.
    pub url: String,
    /// Events to subscribe to.
    pub events: Vec<EventHookType>,
}

impl WebhooksOpts {
    /// Subscribe `url` to `events`.
    pub fn new(url: impl Into<String>, events: impl IntoIterator<Item = EventHookType>) -> Self {
        Self {
            url: url.into(),
            events: events.into_iter().collect(),
        }
    }

    /// The request body: the escaped form as a JSON string, newline terminated.
    fn encode(&self) -> Result<Bytes> {
        let url = self.callback_url()?;

        let mut form = query_escape(&format!("url={url}"));
        for event in &self.events {
            form.push_str(&query_escape(&format!("&events[]={event}")));
        }

        let mut body = serde_json::to_vec(&form)?;
        body.push(b'\n');
        Ok(Bytes::from(body))
    }

    /// The callback URL with a lowercase scheme, otherwise as written.
    ///
    /// The host must survive parsing unchanged: percent escapes there are
    /// decoded by the parser and would not match the bytes sent.
    fn callback_url(&self) -> Result<String> {
        let invalid = |reason: &dyn fmt::Display| {
            Error::invalid_request(format!("webhook url {:?}: {reason}", self.url))
        };

        let parsed = Url::parse(&self.url).map_err(|err| invalid(&err))?;
        let Some((scheme, rest)) = self.url.split_once(':') else {
            return Err(invalid(&"missing scheme"));
        };
        if !scheme.eq_ignore_ascii_case(parsed.scheme()) {
            return Err(invalid(&"scheme is not at the start"));
        }

        if let Some(after_slashes) = rest.strip_prefix("//") {
            let authority = after_slashes
                .split(['/', '?', '#'])
                .next()
                .unwrap_or_default();
            let host = authority.rsplit('@').next().unwrap_or_default();
            if host.contains('%') {
                return Err(invalid(&"escaped characters in host"));
            }
        }

        Ok(format!("{}:{rest}", parsed.scheme()))
    }
}

/// Escape `value` as a query component, with spaces as `+`.
fn query_escape(value: &str) -> String {
    // '%' is always escaped, so "%20" can only come from a space
    utf8_percent_encode(value, QUERY_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

/// Accessor for `hooks`.
#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a, C> {
    client: &'a CalendlyClient<C>,
}

impl<'a, C> Webhooks<'a, C> {
    pub(crate) const fn new(client: &'a CalendlyClient<C>) -> Self {
        Self { client }
    }
}

impl<C: HttpClient> Webhooks<'_, C> {
    /// Create a subscription.
    ///
    /// The response is accepted with or without the `data` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] without any network call if
    /// `opts.url` is not an absolute URL or has escapes in its host.
    /// A 2xx body without a webhook `id` is an [`Error::Decode`].
    pub async fn create(&self, opts: &WebhooksOpts) -> Result<Response<Webhook>> {
        let body = opts.encode()?;
        let request = self
            .client
            .request_builder(Method::Post, "hooks")?
            .header("Content-Type", ContentType::PlainText.as_str())
            .body(body)
            .build();

        let response = self.client.send::<MaybeEnveloped<Webhook>>(request).await?;
        Ok(response.map_body(MaybeEnveloped::into_inner))
    }

    /// List subscriptions, in response order.
    pub async fn list(&self) -> Result<Response<Vec<Webhook>>> {
        let request = self.client.get("hooks")?;
        let response = self.client.send::<Envelope<Vec<Webhook>>>(request).await?;
        Ok(response.map_body(|envelope| envelope.data))
    }

    /// Fetch one subscription.
    pub async fn get(&self, id: &str) -> Result<Response<Webhook>> {
        let request = self.client.get(&item_path("hooks", id))?;
        let response = self.client.send::<Envelope<Webhook>>(request).await?;
        Ok(response.map_body(|envelope| envelope.data))
    }

    /// Delete a subscription. The response body is ignored.
    pub async fn delete(&self, id: &str) -> Result<Response<()>> {
        let request = self.client.delete(&item_path("hooks", id))?;
        self.client.send_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn query_escape_matches_form_rules() {
        check!(query_escape("a b") == "a+b");
        check!(query_escape("A-z_0.9~") == "A-z_0.9~");
        check!(query_escape("url=http://x/?q&r") == "url%3Dhttp%3A%2F%2Fx%2F%3Fq%26r");
        check!(query_escape("100%") == "100%25");
        check!(query_escape("é") == "%C3%A9");
    }

    #[test]
    fn encode_reproduces_wire_bytes() {
        let opts = WebhooksOpts::new("http://webhook", [EventHookType::INVITEE_CANCELLED]);

        let_assert!(Ok(body) = opts.encode());
        check!(
            body == Bytes::from_static(
                b"\"url%3Dhttp%3A%2F%2Fwebhook%26events%5B%5D%3Dinvitee.cancelled\"\n"
            )
        );
    }

    #[test]
    fn encode_lowercases_scheme_only() {
        let opts = WebhooksOpts::new(
            "HTTP://Example.com:80/hook",
            [EventHookType::INVITEE_CREATED, EventHookType::new("invitee.canceled")],
        );

        let_assert!(Ok(body) = opts.encode());
        check!(
            body == Bytes::from_static(
                b"\"url%3Dhttp%3A%2F%2FExample.com%3A80%2Fhook%26events%5B%5D%3Dinvitee.created%26events%5B%5D%3Dinvitee.canceled\"\n"
            )
        );
    }

    #[test]
    fn encode_rejects_relative_url() {
        let opts = WebhooksOpts::new("webhook", [EventHookType::INVITEE_CREATED]);
        let_assert!(Err(Error::InvalidRequest(message)) = opts.encode());
        check!(message.contains("webhook"));
    }

    #[test]
    fn encode_rejects_invalid_params() {
        let_assert!(Err(Error::InvalidRequest(_)) = WebhooksOpts::default().encode());

        let opts = WebhooksOpts::new("", [EventHookType::INVITEE_CREATED]);
        let_assert!(Err(Error::InvalidRequest(_)) = opts.encode());

        let opts = WebhooksOpts::new("http://192.168.0.%31/", [EventHookType::INVITEE_CREATED]);
        let_assert!(Err(Error::InvalidRequest(message)) = opts.encode());
        check!(message.contains("host"));

        let opts = WebhooksOpts::new("http://user%40x@192.168.0.%31:8080/", []);
        let_assert!(Err(Error::InvalidRequest(_)) = opts.encode());
    }

    #[test]
    fn encode_allows_escapes_outside_host() {
        let opts = WebhooksOpts::new("https://user%40x@example.com/a%20b?q=%31", []);

        let_assert!(Ok(body) = opts.encode());
        check!(
            body == Bytes::from_static(
                b"\"url%3Dhttps%3A%2F%2Fuser%2540x%40example.com%2Fa%2520b%3Fq%3D%2531\"\n"
            )
        );
    }

    #[test]
    fn webhook_requires_id() {
        let_assert!(Err(_) = serde_json::from_str::<MaybeEnveloped<Webhook>>(r#"{"data":{"id":123}}"#));
        let_assert!(Err(_) = serde_json::from_str::<MaybeEnveloped<Webhook>>(r#"{"message":"oops"}"#));

        let_assert!(Ok(value) = serde_json::from_str::<MaybeEnveloped<Webhook>>(r#"{"id":"9"}"#));
        check!(value.into_inner() == Webhook { id: "9".into(), ..Webhook::default() });
    }

    #[test]
    fn display_webhook() {
        let webhook = Webhook {
            id: "12345".into(),
            kind: "hooks".into(),
            attributes: Some(WebhookAttributes {
                url: "https://example.com/hook".into(),
                created_at: "2019-08-07T06:05:04Z".into(),
                events: vec!["invitee.created".into(), "invitee.canceled".into()],
                state: "active".into(),
            }),
        };
        check!(
            webhook.to_string()
                == "12345 -> https://example.com/hook [invitee.created, invitee.canceled] (active)"
        );
    }
}
