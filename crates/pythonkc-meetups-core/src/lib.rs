//! Core types: events, venues, members, photos, timestamps, tracing

pub mod time;
pub mod tracing;
pub mod types;

pub use time::{fixed_offset, parse_datetime};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use types::{Event, Identifier, Member, Photo, Venue};
