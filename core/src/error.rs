//! Error types for the Onfleet client core.
//!
//! # Design
//! Provider failures come in two shapes. `OnfleetError` is the generic
//! envelope the provider returns for every failed call. When the free-text
//! `cause` of that envelope lists candidate addresses, the failure is
//! surfaced as `MultipleDestinationsError` instead, which wraps the generic
//! error and adds the candidates. Callers that only care about "the provider
//! said no" use [`Error::onfleet`], which answers for both variants.
//!
//! Everything else is local: bad path segments, payloads the encoder cannot
//! represent, and transport or decoding failures.

use serde_json::Value;
use thiserror::Error;

use crate::registry::RecordKind;

/// Errors returned by the client core.
#[derive(Debug, Error)]
pub enum Error {
    /// An empty segment was appended to a request path.
    #[error("invalid path segment {0:?}: segments must be non-empty")]
    InvalidSegment(String),

    /// The provider answered with a generic error envelope.
    #[error(transparent)]
    Onfleet(#[from] OnfleetError),

    /// The provider could not pick a single destination for an address.
    #[error(transparent)]
    MultipleDestinations(#[from] MultipleDestinationsError),

    /// The encoder was handed something it has no wire shape for.
    #[error("cannot encode value of type `{type_name}`: {reason}")]
    UnknownType { type_name: String, reason: String },

    /// A required field is not an attribute of the record being encoded.
    #[error("required field `{field}` is missing on {kind}")]
    MissingField { kind: RecordKind, field: &'static str },

    /// A non-2xx response whose body is not a JSON document.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The transport could not complete the round-trip.
    #[error("transport error: {0}")]
    Transport(String),

    /// Client configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The provider error carried by this failure, for either provider variant.
    pub fn onfleet(&self) -> Option<&OnfleetError> {
        match self {
            Error::Onfleet(err) => Some(err),
            Error::MultipleDestinations(err) => Some(&err.error),
            _ => None,
        }
    }

    /// Candidate destinations, present only on disambiguation failures.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Error::MultipleDestinations(err) => Some(&err.options),
            _ => None,
        }
    }
}

/// Generic error reported by the provider.
///
/// `error_type` is the top-level `code` marker of the envelope (for example
/// `"InvalidArgument"`); `code` is the nested numeric code. `cause` is a
/// string for geocoding failures and an object for most other categories.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("onfleet error {error_type} ({code}): {message}")]
pub struct OnfleetError {
    pub message: String,
    pub error_type: String,
    pub code: Value,
    pub cause: Value,
}

/// Disambiguation error: the provider matched an address to several places.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("multiple destinations match ({n} options): {msg}", n = .options.len(), msg = .error.message)]
pub struct MultipleDestinationsError {
    pub options: Vec<String>,
    pub error: OnfleetError,
}

impl MultipleDestinationsError {
    pub fn message(&self) -> &str {
        &self.error.message
    }

    pub fn error_type(&self) -> &str {
        &self.error.error_type
    }

    pub fn code(&self) -> &Value {
        &self.error.code
    }

    pub fn cause(&self) -> &Value {
        &self.error.cause
    }
}
