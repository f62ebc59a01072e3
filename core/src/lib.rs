//! Synchronous client core for the Onfleet delivery API.
//!
//! # Overview
//! Composes resource paths, encodes domain records into the provider's JSON
//! shape, and turns provider responses back into records or typed errors.
//! The network round-trip goes through the [`Transport`] trait, so the core
//! itself stays deterministic and testable.
//!
//! # Design
//! - `registry` holds the static wire tables; `encoder` walks records
//!   through them.
//! - `path` accumulates segments for one request; `client::Call` wraps it
//!   with the terminal operations.
//! - `classify` recognizes provider error envelopes, including the
//!   ambiguous-destination case; `dispatch` picks a record parser from the
//!   request path.
//! - `OnfleetClient` is stateless apart from configuration; concurrent
//!   callers each get their own `Call`.
//!
//! ```no_run
//! use onfleet_core::{ClientConfig, OnfleetClient};
//!
//! let client = OnfleetClient::from_config(ClientConfig::from_env()?);
//! let task = client.tasks().segment("abc123").get()?.into_record();
//! println!("{task:?}");
//! # Ok::<(), onfleet_core::Error>(())
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod http;
pub mod path;
pub mod registry;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

pub use classify::extract_options;
pub use client::{Call, OnfleetClient};
pub use config::{ClientConfig, ONFLEET_API_ENDPOINT};
pub use dispatch::Response;
pub use encoder::Body;
pub use error::{Error, MultipleDestinationsError, OnfleetError};
pub use http::{Credential, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use path::PathBuilder;
pub use registry::RecordKind;
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{
    Address, Administrator, Destination, DomainRecord, FieldValue, Organization, Recipient,
    Record, Ref, Task, Vehicle, VehicleType, Worker,
};
