//! The current user (`users/me`).

use std::fmt;

use serde::Deserialize;

use super::Envelope;
use crate::{CalendlyClient, HttpClient, Response, Result};

/// The account owning the API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AboutMe {
    /// Resource type, `users`.
    #[serde(rename = "type")]
    pub kind: String,
    /// User identifier.
    pub id: String,
    /// Profile details.
    pub attributes: Option<UserAttributes>,
}

/// Profile details of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserAttributes {
    /// Display name.
    pub name: String,
    /// Scheduling page slug.
    pub slug: String,
    /// Account email.
    pub email: String,
    /// Scheduling page URL.
    pub url: String,
    /// IANA time zone, e.g. `Europe/Paris`.
    pub timezone: String,
    /// Profile picture.
    pub avatar: Option<Avatar>,
    /// Creation timestamp, as sent by the API.
    pub created_at: String,
    /// Last update timestamp, as sent by the API.
    pub updated_at: String,
}

/// Profile picture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Avatar {
    /// Image URL.
    pub url: String,
}

impl fmt::Display for AboutMe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attributes {
            Some(attributes) => write!(
                f,
                "{} <{}> ({}, {})",
                attributes.name, attributes.email, self.id, attributes.timezone
            ),
            None => write!(f, "{} {}", self.kind, self.id),
        }
    }
}

/// Accessor for `users`.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a, C> {
    client: &'a CalendlyClient<C>,
}

impl<'a, C> Users<'a, C> {
    pub(crate) const fn new(client: &'a CalendlyClient<C>) -> Self {
        Self { client }
    }
}

impl<C: HttpClient> Users<'_, C> {
    /// Fetch the account owning the API key.
    pub async fn about_me(&self) -> Result<Response<AboutMe>> {
        let request = self.client.get("users/me")?;
        let response = self.client.send::<Envelope<AboutMe>>(request).await?;
        Ok(response.map_body(|envelope| envelope.data))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn decode_about_me() {
        let json = r#"{
            "data": {
                "type": "users",
                "id": "ABCDEF",
                "attributes": {
                    "name": "Jane Doe",
                    "slug": "jane",
                    "email": "jane@example.com",
                    "url": "https://calendly.com/jane",
                    "timezone": "Europe/Paris",
                    "avatar": {"url": "https://example.com/a.png"},
                    "created_at": "2019-01-01T10:00:00Z",
                    "updated_at": "2019-01-02T10:00:00Z"
                }
            }
        }"#;

        let_assert!(Ok(envelope) = serde_json::from_str::<Envelope<AboutMe>>(json));
        let me = envelope.data;
        check!(me.kind == "users");
        check!(me.id == "ABCDEF");
        let_assert!(Some(attributes) = &me.attributes);
        check!(attributes.avatar.as_ref().map(|a| a.url.as_str()) == Some("https://example.com/a.png"));
        check!(me.to_string() == "Jane Doe <jane@example.com> (ABCDEF, Europe/Paris)");
    }

    #[test]
    fn display_without_attributes() {
        let me = AboutMe {
            kind: "users".into(),
            id: "X".into(),
            attributes: None,
        };
        check!(me.to_string() == "users X");
    }
}
