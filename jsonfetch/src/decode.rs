//! JSON body decoding.
//!
//! Failures are captured as a [`DecodeFailureDetail`] straight from the JSON
//! decoder and rendered by [`classify`], whichever entry point was used.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_path_to_error::{Path, Segment};

use crate::{
    classify::{classify, DecodeContext, DecodeFailureDetail},
    request::RawResponse,
    validate::{truncate_body, validate},
    ApiError,
};

const NOT_VALID_JSON: &str = "The given data was not valid JSON.";

/// How date/time values are represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDecoding {
    /// A JSON number counting seconds since 1970-01-01T00:00:00Z. Fractional
    /// parts are sub-second precision.
    SecondsSince1970,
}

/// The date convention every decoder in this crate uses.
///
/// Target types opt in per field with [`crate::epoch_seconds`].
pub const DATE_DECODING: DateDecoding = DateDecoding::SecondsSince1970;

impl DateDecoding {
    pub fn seconds_to_datetime(self, secs: i64) -> Option<DateTime<Utc>> {
        match self {
            DateDecoding::SecondsSince1970 => DateTime::from_timestamp(secs, 0),
        }
    }

    pub fn fractional_seconds_to_datetime(self, secs: f64) -> Option<DateTime<Utc>> {
        if !secs.is_finite() {
            return None;
        }
        match self {
            DateDecoding::SecondsSince1970 => {
                let whole = secs.floor();
                if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
                    return None;
                }
                let mut whole = whole as i64;
                let mut nanos = ((secs - secs.floor()) * 1e9).round() as u32;
                if nanos >= 1_000_000_000 {
                    whole = whole.checked_add(1)?;
                    nanos -= 1_000_000_000;
                }
                DateTime::from_timestamp(whole, nanos)
            }
        }
    }
}

/// Decodes `bytes` as JSON into `T`.
///
/// Nothing is returned on failure, so a partially populated `T` never escapes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    decode_detailed(bytes).map_err(|detail| {
        let reason = classify(&detail);
        tracing::error!(
            "Failed to decode body: {} | body: {}",
            reason,
            truncate_body(bytes)
        );
        ApiError::Parse { reason }
    })
}

/// Validates the status of an already received response, then decodes its body.
pub fn decode_response<T: DeserializeOwned>(
    response: RawResponse,
    call_context: &str,
) -> Result<T, ApiError> {
    let body = validate(response, call_context)?;
    decode(&body)
}

/// Decodes `bytes`, keeping the structured failure instead of a reason string.
pub(crate) fn decode_detailed<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeFailureDetail> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(|e| {
        let path = path_segments(e.path());
        failure_detail(path, e.into_inner())
    })?;
    de.end().map_err(|e| failure_detail(Vec::new(), e))?;
    Ok(value)
}

fn path_segments(path: &Path) -> Vec<String> {
    path.iter()
        .map(|segment| match segment {
            Segment::Seq { index } => index.to_string(),
            Segment::Map { key } => key.clone(),
            Segment::Enum { variant } => variant.clone(),
            Segment::Unknown => "?".to_string(),
        })
        .collect()
}

fn failure_detail(path: Vec<String>, err: serde_json::Error) -> DecodeFailureDetail {
    match err.classify() {
        Category::Syntax | Category::Eof => DecodeFailureDetail::CorruptedPayload(DecodeContext {
            path,
            debug_description: NOT_VALID_JSON.to_string(),
            underlying: Some(err.to_string()),
        }),
        Category::Data => data_failure(path, message_without_position(&err)),
        Category::Io => DecodeFailureDetail::Unknown {
            description: err.to_string(),
        },
    }
}

/// Sorts a data error by the message serde produced for it.
fn data_failure(path: Vec<String>, message: String) -> DecodeFailureDetail {
    if let Some(key) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return DecodeFailureDetail::KeyNotFound {
            key: key.to_string(),
            context: DecodeContext {
                path,
                debug_description: format!("No value associated with key \"{}\".", key),
                underlying: None,
            },
        };
    }

    // the found value comes from the payload, so split on the last separator
    if let Some((found, expected)) = message
        .strip_prefix("invalid type: ")
        .and_then(|rest| rest.rsplit_once(", expected "))
    {
        let expected = expected.to_string();
        if found == "null" || found == "unit value" {
            return DecodeFailureDetail::ValueNotFound {
                context: DecodeContext {
                    path,
                    debug_description: format!("Expected {} value but found null instead.", expected),
                    underlying: None,
                },
                expected,
            };
        }
        return DecodeFailureDetail::TypeMismatch {
            context: DecodeContext {
                path,
                debug_description: format!(
                    "Expected to decode {} but found {} instead.",
                    expected, found
                ),
                underlying: None,
            },
            expected,
        };
    }

    DecodeFailureDetail::CorruptedPayload(DecodeContext {
        path,
        debug_description: message,
        underlying: None,
    })
}

fn message_without_position(err: &serde_json::Error) -> String {
    let message = err.to_string();
    if err.line() == 0 {
        return message;
    }
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match message.strip_suffix(&suffix) {
        Some(stripped) => stripped.to_string(),
        None => message,
    }
}
