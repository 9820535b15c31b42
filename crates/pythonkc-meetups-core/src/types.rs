//! Domain types returned by the Meetup.com client.
//!
//! These records are the stable output schema of the client and are
//! independent of the wire format. Every scalar field is optional: the
//! upstream API omits fields freely and a missing field never invalidates
//! the rest of a record.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A Meetup.com identifier.
///
/// Events are identified by strings while venues, members and photos use
/// integers. The value is kept exactly as upstream sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// A numeric identifier.
    Number(i64),
    /// A textual identifier.
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A meetup event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Meetup.com ID for the event.
    pub id: Option<Identifier>,
    /// Name of the event.
    pub name: Option<String>,
    /// Description of the event. May include markup.
    pub description: Option<String>,
    /// When the event starts, in the offset upstream reported for it.
    pub time: Option<DateTime<FixedOffset>>,
    /// Status of the event, e.g. `upcoming` or `past`.
    pub status: Option<String>,
    /// Where the event takes place.
    pub venue: Option<Venue>,
    /// Number of "yes" RSVPs.
    pub yes_rsvp_count: Option<i64>,
    /// Number of "maybe" RSVPs.
    pub maybe_rsvp_count: Option<i64>,
    /// URL of the Meetup event page.
    pub event_url: Option<String>,
    /// URL of the event photo.
    pub photo_url: Option<String>,
    /// Members that RSVP'd to the event. Only populated for past events.
    pub attendees: Option<Vec<Member>>,
    /// Photos taken at the event. Only populated for past events.
    pub photos: Option<Vec<Photo>>,
}

impl Event {
    /// Returns true if attendees and photos were fetched for this event.
    pub fn has_sub_resources(&self) -> bool {
        self.attendees.is_some() && self.photos.is_some()
    }
}

/// The location of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Option<Identifier>,
    pub name: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub address_3: Option<String>,
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    pub country: Option<String>,
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Longitude in degrees.
    pub lon: Option<f64>,
}

impl Venue {
    /// Returns the non-empty address lines in order.
    pub fn address_lines(&self) -> Vec<&str> {
        [&self.address_1, &self.address_2, &self.address_3]
            .into_iter()
            .filter_map(|line| line.as_deref())
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// Returns the coordinates when both latitude and longitude are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

/// A group member, as seen through an RSVP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<Identifier>,
    /// Full name (first and last).
    pub name: Option<String>,
    /// The member's profile photo.
    pub photo: Option<Photo>,
}

/// A photo resource with its size variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Option<Identifier>,
    /// URL of the full photo.
    pub url: Option<String>,
    /// URL of the high-resolution version.
    pub highres_url: Option<String>,
    /// URL of the thumbnail version.
    pub thumb_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_deserializes_numbers_and_strings() {
        let n: Identifier = serde_json::from_str("42").unwrap();
        let s: Identifier = serde_json::from_str(r#""qxbmhlyqbkb""#).unwrap();

        assert_eq!(n, Identifier::Number(42));
        assert_eq!(s, Identifier::Text("qxbmhlyqbkb".to_string()));
    }

    #[test]
    fn identifier_display_is_raw_value() {
        assert_eq!(Identifier::from(7).to_string(), "7");
        assert_eq!(Identifier::from("abc").to_string(), "abc");
    }

    #[test]
    fn venue_address_lines_skip_missing_and_blank() {
        let venue = Venue {
            address_1: Some("1 Main St".to_string()),
            address_2: Some("  ".to_string()),
            address_3: Some("Suite 200".to_string()),
            ..Default::default()
        };

        assert_eq!(venue.address_lines(), vec!["1 Main St", "Suite 200"]);
    }

    #[test]
    fn venue_coordinates_need_both_axes() {
        let mut venue = Venue {
            lat: Some(39.1),
            ..Default::default()
        };
        assert!(venue.coordinates().is_none());

        venue.lon = Some(-94.5);
        assert_eq!(venue.coordinates(), Some((39.1, -94.5)));
    }

    #[test]
    fn event_sub_resources_absent_by_default() {
        let event = Event::default();
        assert!(!event.has_sub_resources());

        let event = Event {
            attendees: Some(vec![]),
            photos: Some(vec![]),
            ..Default::default()
        };
        assert!(event.has_sub_resources());
    }

    #[test]
    fn event_serializes_to_json() {
        let event = Event {
            id: Some(Identifier::from("evt1")),
            name: Some("Monthly meetup".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], "evt1");
        assert_eq!(json["name"], "Monthly meetup");
        assert!(json["venue"].is_null());
    }
}
