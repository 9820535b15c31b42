//! Meetup.com API facade for one organizer group.
//!
//! [`MeetupsClient`] builds the query for each operation, fetches it through
//! the [`RetryClient`] and hands the `results` array to the parsers. Errors
//! from either layer are returned unchanged.

use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use pythonkc_meetups_core::{Event, Member, Photo};

use crate::config::ClientConfig;
use crate::error::MeetupsResult;
use crate::parse::{parse_event, parse_member_from_rsvp, parse_photo, parse_results};
use crate::retry::RetryClient;
use crate::transport::{HttpTransport, ReqwestTransport, TransportError};

/// Path of the events listing.
pub const EVENTS_PATH: &str = "/2/events.json";
/// Path of the RSVPs listing.
pub const RSVPS_PATH: &str = "/2/rsvps.json";
/// Path of the photos listing.
pub const PHOTOS_PATH: &str = "/2/photos.json";

/// Retrieves events, attendees and photos of a Meetup.com group.
#[derive(Debug, Clone)]
pub struct MeetupsClient {
    config: ClientConfig,
    http: RetryClient,
}

impl MeetupsClient {
    /// Creates a client that talks to the API over `reqwest`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let http = RetryClient::new(transport, config.timeout, config.retries);
        Self { config, http }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Gets upcoming events of the group, ordered by time ascending as
    /// returned by upstream.
    #[instrument(skip(self), fields(group = %self.config.group_urlname))]
    pub async fn get_upcoming_events(&self) -> MeetupsResult<Vec<Event>> {
        let url = self.events_url(&[]);
        let events = self.fetch_results(&url).await?;

        debug!(count = events.len(), "fetched upcoming events");
        Ok(events
            .iter()
            .map(|event| parse_event(event, None, None))
            .collect())
    }

    /// Gets past events of the group, most recent first, each with its
    /// attendees and photos.
    ///
    /// Events without an id cannot be queried for sub-resources and are
    /// returned with `attendees` and `photos` set to `None`.
    #[instrument(skip(self), fields(group = %self.config.group_urlname))]
    pub async fn get_past_events(&self) -> MeetupsResult<Vec<Event>> {
        let url = self.events_url(&[("status", "past"), ("desc", "true")]);
        let raw_events = self.fetch_results(&url).await?;
        debug!(count = raw_events.len(), "fetched past events");

        let mut events = Vec::with_capacity(raw_events.len());
        for raw in &raw_events {
            let event = parse_event(raw, None, None);
            let Some(id) = event.id.as_ref().map(ToString::to_string) else {
                debug!("past event has no id, skipping attendees and photos");
                events.push(event);
                continue;
            };

            let attendees = self.get_event_attendees(&id).await?;
            let photos = self.get_event_photos(&id).await?;
            events.push(Event {
                attendees: Some(attendees),
                photos: Some(photos),
                ..event
            });
        }

        Ok(events)
    }

    /// Gets the members that RSVP'd to an event, in upstream order.
    #[instrument(skip(self))]
    pub async fn get_event_attendees(&self, event_id: &str) -> MeetupsResult<Vec<Member>> {
        let url = self.event_url(RSVPS_PATH, event_id);
        let rsvps = self.fetch_results(&url).await?;

        debug!(count = rsvps.len(), "fetched rsvps");
        rsvps.iter().map(parse_member_from_rsvp).collect()
    }

    /// Gets the photos of an event, in upstream order.
    #[instrument(skip(self))]
    pub async fn get_event_photos(&self, event_id: &str) -> MeetupsResult<Vec<Photo>> {
        let url = self.event_url(PHOTOS_PATH, event_id);
        let photos = self.fetch_results(&url).await?;

        debug!(count = photos.len(), "fetched photos");
        Ok(photos.iter().map(parse_photo).collect())
    }

    async fn fetch_results(&self, url: &Url) -> MeetupsResult<Vec<serde_json::Value>> {
        let data = self.http.get_json(url).await?;
        parse_results(data)
    }

    /// Builds an events listing URL scoped to the configured group.
    pub fn events_url(&self, filters: &[(&str, &str)]) -> Url {
        let mut url = self.config.endpoint(EVENTS_PATH);
        url.query_pairs_mut()
            .append_pair("key", &self.config.api_key)
            .append_pair("group_urlname", &self.config.group_urlname)
            .extend_pairs(filters);
        url
    }

    /// Builds a per-event listing URL.
    pub fn event_url(&self, path: &str, event_id: &str) -> Url {
        let mut url = self.config.endpoint(path);
        url.query_pairs_mut()
            .append_pair("key", &self.config.api_key)
            .append_pair("event_id", event_id);
        url
    }
}
