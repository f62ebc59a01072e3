//! Request payload encoding.
//!
//! # Design
//! A payload is either a domain record or a document that is already JSON.
//! Records are walked through their `registry` descriptor: required fields
//! are always written (an unset one becomes `null`), optional fields only
//! when set, and timestamps as epoch seconds. Nested records
//! and lists of records go through the same walk. JSON documents are emitted
//! unchanged.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::registry::{self, FieldKind, FieldSpec};
use crate::types::{DomainRecord, FieldValue};

/// Request body handed to a terminal call.
#[derive(Clone)]
pub enum Body<'a> {
    Record(&'a dyn DomainRecord),
    Json(Value),
}

impl Body<'static> {
    /// Wrap any serializable value.
    ///
    /// Fails with `UnknownType` when serde cannot represent it as JSON
    /// (for example a map keyed by tuples).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| Error::UnknownType {
                type_name: std::any::type_name::<T>().to_string(),
                reason: e.to_string(),
            })
    }
}

impl<'a, R: DomainRecord> From<&'a R> for Body<'a> {
    fn from(record: &'a R) -> Self {
        Body::Record(record)
    }
}

impl From<Value> for Body<'static> {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl std::fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Record(r) => f.debug_tuple("Record").field(&r.kind()).finish(),
            Body::Json(v) => f.debug_tuple("Json").field(v).finish(),
        }
    }
}

/// Encode a body into its wire document.
pub fn encode(body: &Body<'_>) -> Result<Value, Error> {
    match body {
        Body::Record(record) => encode_record(*record),
        Body::Json(value) => Ok(value.clone()),
    }
}

/// Encode a body into the JSON text sent on the wire.
pub fn encode_to_string(body: &Body<'_>) -> Result<String, Error> {
    let value = encode(body)?;
    serde_json::to_string(&value).map_err(|e| Error::UnknownType {
        type_name: "serde_json::Value".to_string(),
        reason: e.to_string(),
    })
}

/// Encode one domain record through its wire descriptor.
pub fn encode_record(record: &dyn DomainRecord) -> Result<Value, Error> {
    let kind = record.kind();
    let descriptor = registry::descriptor(kind).ok_or_else(|| Error::UnknownType {
        type_name: kind.to_string(),
        reason: "record type is not accepted as a payload".to_string(),
    })?;

    let mut payload = Map::new();
    for spec in descriptor.required {
        let value = record.field(spec.name).ok_or(Error::MissingField {
            kind,
            field: spec.name,
        })?;
        payload.insert(spec.wire.to_string(), encode_field(spec, value)?);
    }
    for spec in descriptor.optional {
        match record.field(spec.name) {
            Some(value) if !value.is_null() => {
                payload.insert(spec.wire.to_string(), encode_field(spec, value)?);
            }
            _ => {}
        }
    }
    Ok(Value::Object(payload))
}

fn encode_field(spec: &FieldSpec, value: FieldValue<'_>) -> Result<Value, Error> {
    match (spec.kind, value) {
        (FieldKind::Timestamp, FieldValue::Timestamp(at)) => Ok(Value::from(at.timestamp())),
        (_, value) => encode_value(value),
    }
}

fn encode_value(value: FieldValue<'_>) -> Result<Value, Error> {
    Ok(match value {
        FieldValue::Null => Value::Null,
        FieldValue::Json(value) => value,
        FieldValue::Timestamp(at) => Value::from(at.timestamp()),
        FieldValue::Record(record) => encode_record(record)?,
        FieldValue::List(items) => Value::Array(
            items
                .into_iter()
                .map(encode_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
    })
}
