//! Provider error envelope classification.
//!
//! # Design
//! The provider reports failures as
//! `{"code": <type>, "message": {"error": <code>, "message": <text>, "cause": <string|object>}}`
//! and uses one envelope for every category. The only way to tell an
//! ambiguous-address failure apart is the prose of a string `cause`, which
//! then contains `Options = [...]` with a JSON array of candidates. That
//! match is textual and deliberately loose: an envelope whose prose differs
//! is reported as a generic `OnfleetError`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, MultipleDestinationsError, OnfleetError};

static OPTIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Options = (\[.*\])").expect("valid options regex"));

/// Pull the candidate list out of a free-text `cause`.
///
/// Returns `None` when the pattern is absent or the bracketed text is not a
/// JSON array of strings.
pub fn extract_options(cause: &str) -> Option<Vec<String>> {
    let captures = OPTIONS_RE.captures(cause)?;
    serde_json::from_str(&captures[1]).ok()
}

/// Whether `body` is an error envelope rather than a successful payload.
pub fn is_error_envelope(body: &Value) -> bool {
    body.as_object().is_some_and(|map| map.contains_key("code"))
}

/// Turn an error envelope into the matching error, or `None` for a success payload.
pub fn classify(body: &Value) -> Option<Error> {
    if !is_error_envelope(body) {
        return None;
    }

    let error_type = match &body["code"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let detail = &body["message"];
    let message = match detail {
        Value::String(s) => s.clone(),
        _ => detail["message"].as_str().unwrap_or_default().to_string(),
    };
    let error = OnfleetError {
        message,
        error_type,
        code: detail["error"].clone(),
        cause: detail["cause"].clone(),
    };

    let options = error
        .cause
        .as_str()
        .and_then(extract_options)
        .filter(|options| !options.is_empty());
    if let Some(options) = options {
        warn!(
            error_type = %error.error_type,
            code = %error.code,
            options = options.len(),
            "provider could not pick a single destination"
        );
        return Some(MultipleDestinationsError { options, error }.into());
    }

    warn!(
        error_type = %error.error_type,
        code = %error.code,
        message = %error.message,
        "provider returned an error"
    );
    Some(error.into())
}

/// `Ok(())` for success payloads, the classified error otherwise.
pub fn check_envelope(body: &Value) -> Result<(), Error> {
    match classify(body) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
