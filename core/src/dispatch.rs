//! Response parsing and record-type selection.
//!
//! # Design
//! The record type of a response is inferred from the request path: every
//! segment is looked up in a fixed table (`workers` → `Worker`, ...), and when
//! more than one segment matches, the last matching segment in path order
//! wins. `workers/w1/tasks` therefore parses as tasks. Paths without a
//! match, and callers that asked for raw output, get the JSON unchanged.
//!
//! Deletes never read a body.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::classify::check_envelope;
use crate::error::Error;
use crate::http::{HttpMethod, HttpResponse};
use crate::registry::RecordKind;
use crate::types::Record;

const PARSERS: [(&str, RecordKind); 6] = [
    ("workers", RecordKind::Worker),
    ("tasks", RecordKind::Task),
    ("recipients", RecordKind::Recipient),
    ("destinations", RecordKind::Destination),
    ("organization", RecordKind::Organization),
    ("admins", RecordKind::Administrator),
];

/// Result of a terminal call.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Nothing was read (delete).
    Empty,
    /// JSON returned as-is.
    Raw(Value),
    Record(Record),
    Records(Vec<Record>),
}

impl Response {
    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Response::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Response::Records(records) => Some(records),
            _ => None,
        }
    }

    pub fn into_raw(self) -> Option<Value> {
        match self {
            Response::Raw(value) => Some(value),
            _ => None,
        }
    }
}

/// The record type a response on this path parses into, if any.
pub fn parser_for(segments: &[String]) -> Option<RecordKind> {
    segments
        .iter()
        .filter_map(|segment| {
            PARSERS
                .iter()
                .find(|(name, _)| *name == segment.as_str())
                .map(|(_, kind)| *kind)
        })
        .last()
}

/// Parse one JSON document as a record of `kind`.
///
/// Only record types that appear in responses are parseable; vehicles and
/// addresses arrive nested inside workers and destinations.
pub fn parse_record(kind: RecordKind, value: Value) -> Result<Record, Error> {
    Ok(match kind {
        RecordKind::Worker => Record::Worker(from_value(value)?),
        RecordKind::Task => Record::Task(from_value(value)?),
        RecordKind::Recipient => Record::Recipient(from_value(value)?),
        RecordKind::Destination => Record::Destination(from_value(value)?),
        RecordKind::Organization => Record::Organization(from_value(value)?),
        RecordKind::Administrator => Record::Administrator(from_value(value)?),
        RecordKind::Address | RecordKind::Vehicle => {
            return Err(Error::Deserialization(format!(
                "{kind} is not a top-level response type"
            )))
        }
    })
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::Deserialization(e.to_string()))
}

/// Turn a raw response into a typed result.
///
/// Error envelopes are classified and returned as `Err`. With
/// `parse_response == false` the successful JSON is returned raw.
pub fn parse_response(
    segments: &[String],
    method: HttpMethod,
    parse_response: bool,
    response: HttpResponse,
) -> Result<Response, Error> {
    if method == HttpMethod::Delete {
        return Ok(Response::Empty);
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(_) if !response.is_success() => {
            return Err(Error::HttpStatus {
                status: response.status,
                body: response.body,
            })
        }
        Err(e) => return Err(Error::Deserialization(e.to_string())),
    };
    check_envelope(&body)?;
    if !response.is_success() {
        return Err(Error::HttpStatus {
            status: response.status,
            body: response.body,
        });
    }

    if !parse_response {
        return Ok(Response::Raw(body));
    }
    let Some(kind) = parser_for(segments) else {
        return Ok(Response::Raw(body));
    };
    debug!(%kind, "parsing provider response");

    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| parse_record(kind, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Response::Records),
        other => parse_record(kind, other).map(Response::Record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn parser_follows_resource_segment() {
        assert_eq!(parser_for(&segments(&["workers"])), Some(RecordKind::Worker));
        assert_eq!(parser_for(&segments(&["tasks", "abc"])), Some(RecordKind::Task));
        assert_eq!(parser_for(&segments(&["admins"])), Some(RecordKind::Administrator));
        assert_eq!(parser_for(&segments(&["organization"])), Some(RecordKind::Organization));
        assert_eq!(parser_for(&segments(&["teams", "t1"])), None);
        assert_eq!(parser_for(&segments(&["organizations", "o1"])), None);
    }

    #[test]
    fn last_matching_segment_wins() {
        assert_eq!(parser_for(&segments(&["workers", "w1", "tasks"])), Some(RecordKind::Task));
        assert_eq!(parser_for(&segments(&["tasks", "x", "workers"])), Some(RecordKind::Worker));
        assert_eq!(
            parser_for(&segments(&["recipients", "r1", "teams"])),
            Some(RecordKind::Recipient)
        );
    }

    #[test]
    fn array_on_workers_parses_each_element() {
        let response = ok(r#"[{"id":"w1","name":"Ada"},{"id":"w2","name":"Bo"}]"#);
        let parsed = parse_response(&segments(&["workers"]), HttpMethod::Get, true, response).unwrap();
        let records = parsed.into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_worker().unwrap().name.as_deref(), Some("Bo"));
    }

    #[test]
    fn object_parses_as_single_record() {
        let response = ok(r#"{"id":"t1","shortId":"abc","state":0}"#);
        let parsed = parse_response(&segments(&["tasks", "t1"]), HttpMethod::Get, true, response).unwrap();
        let task = parsed.into_record().unwrap();
        assert_eq!(task.as_task().unwrap().short_id.as_deref(), Some("abc"));
    }

    #[test]
    fn delete_never_reads_body() {
        let response = ok("this is not json at all");
        let parsed = parse_response(&segments(&["workers", "w1"]), HttpMethod::Delete, true, response).unwrap();
        assert!(parsed.is_empty());

        let envelope = ok(r#"{"code":"NotFound","message":{"error":1402,"message":"gone","cause":null}}"#);
        let parsed = parse_response(&segments(&["tasks", "t1"]), HttpMethod::Delete, true, envelope).unwrap();
        assert_eq!(parsed, Response::Empty);
    }

    #[test]
    fn opting_out_returns_raw_json() {
        let response = ok(r#"[{"id":"w1"}]"#);
        let parsed = parse_response(&segments(&["workers"]), HttpMethod::Get, false, response).unwrap();
        assert_eq!(parsed, Response::Raw(json!([{"id": "w1"}])));
    }

    #[test]
    fn unmatched_path_returns_raw_json() {
        let response = ok(r#"{"id":"team-1","name":"Night shift"}"#);
        let parsed = parse_response(&segments(&["teams", "team-1"]), HttpMethod::Get, true, response).unwrap();
        assert_eq!(parsed.into_raw().unwrap()["name"], "Night shift");
    }

    #[test]
    fn envelope_is_classified_before_parsing() {
        let response = HttpResponse {
            status: 400,
            headers: Vec::new(),
            body: r#"{"code":"InvalidArgument","message":{"error":1000,"message":"bad","cause":"Options = [\"a\", \"b\"]"}}"#
                .to_string(),
        };
        let err = parse_response(&segments(&["destinations"]), HttpMethod::Post, true, response).unwrap_err();
        assert_eq!(err.options(), Some(&["a".to_string(), "b".to_string()][..]));
    }

    #[test]
    fn non_json_bodies() {
        let response = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: "<html>bad gateway</html>".to_string(),
        };
        let err = parse_response(&segments(&["workers"]), HttpMethod::Get, true, response).unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 502, .. }));

        let err = parse_response(&segments(&["workers"]), HttpMethod::Get, true, ok("")).unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn failed_status_with_plain_json_is_http_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: r#"{"error":"internal"}"#.to_string(),
        };
        let err = parse_response(&segments(&["workers"]), HttpMethod::Get, true, response).unwrap_err();
        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, r#"{"error":"internal"}"#);
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[test]
    fn failed_status_with_envelope_is_provider_error() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: r#"{"code":"ResourceNotFound","message":{"error":1402,"message":"gone"}}"#.to_string(),
        };
        let err = parse_response(&segments(&["workers", "w1"]), HttpMethod::Get, true, response).unwrap_err();
        assert_eq!(err.onfleet().unwrap().error_type, "ResourceNotFound");
    }

    #[test]
    fn malformed_record_is_deserialization_error() {
        let response = ok(r#"["not-a-worker"]"#);
        let err = parse_response(&segments(&["workers"]), HttpMethod::Get, true, response).unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }
}
