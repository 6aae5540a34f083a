//! Serde wiring for [`TimeSpan`] plus shared JSON helpers.
//!
//! A span serializes as its canonical `[-]HH:MM:SS` string. It
//! deserializes from the same shapes `parse` accepts on the wire: an
//! integer or float millisecond count, a canonical string, or a
//! component map.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::errors::{Result, TimeSpanError};
use crate::parse::{parse_canonical, TimeComponents};
use crate::span::TimeSpan;

impl Serialize for TimeSpan {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSpan {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimeSpanVisitor)
    }
}

struct TimeSpanVisitor;

impl<'de> Visitor<'de> for TimeSpanVisitor {
    type Value = TimeSpan;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a millisecond count, a [-][D.]HH:MM:SS[.fff] string, or a map of time components")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<TimeSpan, E> {
        Ok(TimeSpan::new(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<TimeSpan, E> {
        Ok(TimeSpan::new(value as i64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<TimeSpan, E> {
        Ok(TimeSpan::new(value as i64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<TimeSpan, E> {
        parse_canonical(value).map_err(de::Error::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<TimeSpan, A::Error> {
        let c = TimeComponents::deserialize(de::value::MapAccessDeserializer::new(map))?;
        TimeSpan::from_time_full(c.days, c.hours, c.minutes, c.seconds, c.milliseconds)
            .map_err(de::Error::custom)
    }
}

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| TimeSpanError::SerializationError(err.to_string()))
}

/// Deserializes a JSON string into the provided type with shared error semantics.
pub fn from_json_str<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
    serde_json::from_str(input).map_err(|err| TimeSpanError::DeserializationError(err.to_string()))
}
