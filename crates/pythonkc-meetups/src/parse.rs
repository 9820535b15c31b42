//! Conversion of Meetup.com response data into domain types.
//!
//! Upstream records are loosely typed and omit fields freely, so every field
//! is read through [`field`], which turns a missing key, a JSON `null` or a
//! value of an unexpected JSON type into `None`. One bad field never
//! discards the rest of a record.

use serde::Deserialize;
use serde::de::Error as _;
use serde_json::Value;

use pythonkc_meetups_core::{Event, Member, Photo, Venue};

use crate::error::{MeetupsError, MeetupsResult};

pub use pythonkc_meetups_core::parse_datetime;

/// Reads `key` from a JSON object, defaulting to `None`.
pub fn field<'a, T>(raw: &'a Value, key: &str) -> Option<T>
where
    T: Deserialize<'a>,
{
    match raw.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => T::deserialize(value).ok(),
    }
}

/// Returns the `results` array of a listing response.
///
/// # Errors
///
/// Returns `BadJson` if `results` is missing or is not an array.
pub fn parse_results(data: Value) -> MeetupsResult<Vec<Value>> {
    #[derive(Deserialize)]
    struct Listing {
        results: Vec<Value>,
    }

    serde_json::from_value::<Listing>(data)
        .map(|listing| listing.results)
        .map_err(MeetupsError::bad_json)
}

/// Parses an [`Event`].
///
/// `attendees` and `photos` are attached as given; they come from separate
/// requests and are never read from `raw`.
pub fn parse_event(
    raw: &Value,
    attendees: Option<Vec<Member>>,
    photos: Option<Vec<Photo>>,
) -> Event {
    Event {
        id: field(raw, "id"),
        name: field(raw, "name"),
        description: field(raw, "description"),
        time: parse_datetime(field(raw, "time"), field(raw, "utc_offset")),
        status: field(raw, "status"),
        venue: raw.get("venue").filter(|v| !v.is_null()).map(parse_venue),
        yes_rsvp_count: field(raw, "yes_rsvp_count"),
        maybe_rsvp_count: field(raw, "maybe_rsvp_count"),
        event_url: field(raw, "event_url"),
        photo_url: field(raw, "photo_url"),
        attendees,
        photos,
    }
}

/// Parses a [`Venue`].
pub fn parse_venue(raw: &Value) -> Venue {
    Venue {
        id: field(raw, "id"),
        name: field(raw, "name"),
        address_1: field(raw, "address_1"),
        address_2: field(raw, "address_2"),
        address_3: field(raw, "address_3"),
        city: field(raw, "city"),
        state: field(raw, "state"),
        zip: field(raw, "zip"),
        country: field(raw, "country"),
        lat: field(raw, "lat"),
        lon: field(raw, "lon"),
    }
}

/// Parses the [`Member`] behind an RSVP.
///
/// # Errors
///
/// Every RSVP must carry a `member` object; one without it is a broken
/// upstream contract and yields `BadJson`.
pub fn parse_member_from_rsvp(raw: &Value) -> MeetupsResult<Member> {
    let member = raw
        .get("member")
        .filter(|m| m.is_object())
        .ok_or_else(|| MeetupsError::bad_json(serde_json::Error::missing_field("member")))?;

    Ok(Member {
        id: field(member, "member_id"),
        name: field(member, "name"),
        photo: raw
            .get("member_photo")
            .filter(|p| !p.is_null())
            .map(parse_photo),
    })
}

/// Parses a [`Photo`]. `photo_id` takes precedence over `id`.
pub fn parse_photo(raw: &Value) -> Photo {
    Photo {
        id: field(raw, "photo_id").or_else(|| field(raw, "id")),
        url: field(raw, "photo_link"),
        highres_url: field(raw, "highres_link"),
        thumb_url: field(raw, "thumb_link"),
    }
}
