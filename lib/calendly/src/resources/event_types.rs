//! Event types of the current user (`users/me/event_types`).

use std::fmt;

use serde::Deserialize;

use super::Envelope;
use crate::{CalendlyClient, HttpClient, Response, Result, ToQueryParams, add_url_options};

/// An event type of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventType {
    /// Resource type, `event_types`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Event type identifier.
    pub id: String,
    /// Event type details.
    pub attributes: Option<EventTypeAttributes>,
    /// Present when the owner was requested with [`IncludeType::Owner`].
    pub relationships: Option<Relationships>,
}

/// Event type details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventTypeAttributes {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Duration in minutes.
    pub duration: i64,
    /// Booking page slug.
    pub slug: String,
    /// Hex color, e.g. `#fff200`.
    pub color: String,
    /// Whether the event type can be booked.
    pub active: bool,
    /// Creation timestamp, as sent by the API.
    pub created_at: String,
    /// Last update timestamp, as sent by the API.
    pub updated_at: String,
    /// Booking page URL.
    pub url: String,
}

/// Relationships of an event type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Relationships {
    /// The owning user.
    pub owner: Owner,
}

/// Owner relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Owner {
    /// Reference to the owning user.
    pub data: OwnerData,
}

/// Reference to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OwnerData {
    /// Resource type, `users`.
    #[serde(rename = "type")]
    pub kind: String,
    /// User identifier.
    pub id: String,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(attributes) = &self.attributes {
            write!(f, " {} ({} min)", attributes.name, attributes.duration)?;
            if !attributes.active {
                write!(f, " [inactive]")?;
            }
        }
        Ok(())
    }
}

/// Related resources the API can embed in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeType {
    /// Embed the owning user.
    Owner,
}

impl IncludeType {
    /// Value of the `include` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
        }
    }
}

/// Options for [`EventTypes::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTypesOpts {
    /// Related resources to embed, sent as `include`.
    pub include: Option<IncludeType>,
}

impl ToQueryParams for EventTypesOpts {
    fn to_query_params(&self) -> Result<Vec<(String, Option<String>)>> {
        Ok(vec![(
            "include".to_owned(),
            self.include.map(|include| include.as_str().to_owned()),
        )])
    }
}

/// Accessor for `users/me/event_types`.
#[derive(Debug, Clone, Copy)]
pub struct EventTypes<'a, C> {
    client: &'a CalendlyClient<C>,
}

impl<'a, C> EventTypes<'a, C> {
    pub(crate) const fn new(client: &'a CalendlyClient<C>) -> Self {
        Self { client }
    }
}

impl<C: HttpClient> EventTypes<'_, C> {
    /// List the event types of the current user, in response order.
    pub async fn list(&self, opts: Option<&EventTypesOpts>) -> Result<Response<Vec<EventType>>> {
        let path = add_url_options("users/me/event_types", opts)?;
        let request = self.client.get(&path)?;
        let response = self.client.send::<Envelope<Vec<EventType>>>(request).await?;
        Ok(response.map_body(|envelope| envelope.data))
    }
}
