//! Read-only Meetup.com client for the PythonKC group.
//!
//! The crate is layered, leaf first:
//!
//! ```text
//! ┌────────────────┐   query URL    ┌──────────────┐   one GET    ┌───────────────┐
//! │ MeetupsClient  │ ─────────────▶ │ RetryClient  │ ───────────▶ │ HttpTransport │
//! └───────┬────────┘                └──────┬───────┘              └───────────────┘
//!         │ results                        │ JSON / MeetupsError
//!         ▼                                ▼
//! ┌────────────────┐               ┌───────────────┐
//! │ parse_*        │ ────────────▶ │ Event, Member │
//! └────────────────┘               │ Photo, Venue  │
//!                                  └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pythonkc_meetups::{ClientConfig, MeetupsClient};
//!
//! let client = MeetupsClient::new(ClientConfig::from_env()?)?;
//! for event in client.get_upcoming_events().await? {
//!     println!("{:?} at {:?}", event.name, event.time);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod retry;
pub mod transport;

pub use client::MeetupsClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ErrorCode, MeetupsError, MeetupsResult};
pub use retry::RetryClient;
pub use transport::{
    BoxFuture, HttpResponse, HttpTransport, ReqwestTransport, TransportError, TransportErrorKind,
};

pub use pythonkc_meetups_core::{Event, Identifier, Member, Photo, Venue};
