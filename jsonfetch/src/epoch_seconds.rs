//! Serde helpers for `DateTime<Utc>` fields sent as seconds since the Unix epoch.
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Event {
//!     #[serde(with = "jsonfetch::epoch_seconds")]
//!     at: DateTime<Utc>,
//! }
//!
//! let event: Event = jsonfetch::decode(br#"{"at": 1700000000}"#).unwrap();
//! assert_eq!(event.at.timestamp(), 1_700_000_000);
//! ```
//!
//! Integers and fractional numbers are accepted. Strings are rejected, so an
//! ISO-8601 value surfaces as a type mismatch rather than being guessed at.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserializer, Serializer};

use crate::decode::DATE_DECODING;

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(SecondsVisitor)
}

/// Writes whole seconds as an integer and anything finer as a float.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let nanos = value.timestamp_subsec_nanos();
    if nanos == 0 {
        serializer.serialize_i64(value.timestamp())
    } else {
        serializer.serialize_f64(value.timestamp() as f64 + f64::from(nanos) / 1e9)
    }
}

struct SecondsVisitor;

impl<'de> de::Visitor<'de> for SecondsVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number of seconds since the Unix epoch")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        DATE_DECODING
            .seconds_to_datetime(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .ok()
            .and_then(|secs| DATE_DECODING.seconds_to_datetime(secs))
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        DATE_DECODING
            .fractional_seconds_to_datetime(value)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Float(value), &self))
    }
}

/// Same convention for `Option<DateTime<Utc>>`; `null` decodes to `None`.
pub mod option {
    use std::fmt;

    use chrono::{DateTime, Utc};
    use serde::{de, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionVisitor)
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    struct OptionVisitor;

    impl<'de> de::Visitor<'de> for OptionVisitor {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number of seconds since the Unix epoch or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::deserialize(deserializer).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    use crate::{decode, DecodeFailureDetail};

    #[derive(Debug, Deserialize, Serialize)]
    struct Event {
        #[serde(with = "crate::epoch_seconds")]
        at: DateTime<Utc>,
        #[serde(default, with = "crate::epoch_seconds::option")]
        ended: Option<DateTime<Utc>>,
    }

    #[test]
    fn integer_seconds_are_not_milliseconds() {
        let event: Event = decode(br#"{"at": 1700000000}"#).unwrap();
        assert_eq!(event.at, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(event.at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert!(event.ended.is_none());
    }

    #[test]
    fn fractional_seconds() {
        let event: Event = decode(br#"{"at": 1700000000.5, "ended": null}"#).unwrap();
        assert_eq!(event.at.timestamp(), 1_700_000_000);
        assert_eq!(event.at.timestamp_subsec_millis(), 500);
        assert!(event.ended.is_none());
    }

    #[test]
    fn optional_field_present() {
        let event: Event = decode(br#"{"at": 0, "ended": 60}"#).unwrap();
        assert_eq!(event.at, Utc.timestamp_opt(0, 0).unwrap());
        assert_eq!(event.ended.unwrap().timestamp(), 60);
    }

    #[test]
    fn iso_string_is_type_mismatch() {
        let detail =
            crate::decode::decode_detailed::<Event>(br#"{"at": "2023-11-14T22:13:20Z"}"#)
                .unwrap_err();
        match detail {
            DecodeFailureDetail::TypeMismatch { expected, context } => {
                assert_eq!(expected, "a number of seconds since the Unix epoch");
                assert_eq!(context.path, ["at".to_string()]);
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = decode::<Event>(br#"{"at": 9223372036854775807}"#).unwrap_err();
        assert!(err.reason().contains("invalid value"));
        assert!(err.reason().ends_with("- (at)"));
    }

    #[test]
    fn serializes_whole_and_fractional_seconds() {
        let event = Event {
            at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            ended: Some(Utc.timestamp_opt(10, 250_000_000).unwrap()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["at"], 1_700_000_000);
        assert_eq!(json["ended"], 10.25);
    }
}
