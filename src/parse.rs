//! Polymorphic construction of [`TimeSpan`] values.
//!
//! `parse` accepts every input shape a caller can reasonably hold a
//! duration in: an existing span, a UTC instant (read as "elapsed time
//! since"), a raw millisecond count, a component breakdown, or the
//! canonical text form `[-][D.]HH:MM:SS[.fff]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TimeSpanError};
use crate::span::TimeSpan;

/// A day/hour/minute/second/millisecond breakdown with every field
/// optional on the wire; absent fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeComponents {
    #[serde(default)]
    pub days: i64,
    #[serde(default)]
    pub hours: i64,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub seconds: i64,
    #[serde(default)]
    pub milliseconds: i64,
}

/// Any value `TimeSpan::parse` knows how to interpret.
#[derive(Debug, Clone)]
pub enum TimeSpanLike {
    /// An already-built span, returned unchanged.
    Span(TimeSpan),
    /// A UTC instant; parsed as the elapsed time from it until now.
    Instant(DateTime<Utc>),
    /// A raw millisecond count.
    Millis(f64),
    /// A component breakdown.
    Components(TimeComponents),
    /// The canonical text form. Empty text means "no value".
    Text(String),
}

impl From<TimeSpan> for TimeSpanLike {
    fn from(span: TimeSpan) -> Self {
        TimeSpanLike::Span(span)
    }
}

impl From<DateTime<Utc>> for TimeSpanLike {
    fn from(instant: DateTime<Utc>) -> Self {
        TimeSpanLike::Instant(instant)
    }
}

impl From<f64> for TimeSpanLike {
    fn from(millis: f64) -> Self {
        TimeSpanLike::Millis(millis)
    }
}

impl From<i64> for TimeSpanLike {
    fn from(millis: i64) -> Self {
        TimeSpanLike::Millis(millis as f64)
    }
}

impl From<TimeComponents> for TimeSpanLike {
    fn from(components: TimeComponents) -> Self {
        TimeSpanLike::Components(components)
    }
}

impl From<&str> for TimeSpanLike {
    fn from(text: &str) -> Self {
        TimeSpanLike::Text(text.to_string())
    }
}

impl From<String> for TimeSpanLike {
    fn from(text: String) -> Self {
        TimeSpanLike::Text(text)
    }
}

impl TimeSpan {
    /// Builds a span from any [`TimeSpanLike`] input.
    ///
    /// Returns `Ok(None)` only for empty text, the one input that means
    /// "no value" rather than an error. Raw millisecond inputs pass
    /// through the unvalidated constructor: fractions truncate toward
    /// zero and no range check is applied.
    pub fn parse(value: impl Into<TimeSpanLike>) -> Result<Option<TimeSpan>> {
        match value.into() {
            TimeSpanLike::Span(span) => Ok(Some(span)),
            TimeSpanLike::Instant(instant) => {
                let elapsed = Utc::now().signed_duration_since(instant);
                Ok(Some(TimeSpan::new(elapsed.num_milliseconds())))
            }
            TimeSpanLike::Millis(millis) => Ok(Some(TimeSpan::new(millis as i64))),
            TimeSpanLike::Components(c) => {
                TimeSpan::from_time_full(c.days, c.hours, c.minutes, c.seconds, c.milliseconds)
                    .map(Some)
            }
            TimeSpanLike::Text(text) if text.is_empty() => Ok(None),
            TimeSpanLike::Text(text) => parse_canonical(&text).map(Some),
        }
    }
}

/// Parses the canonical grammar `[-][D.]HH:MM:SS[.fff]`.
///
/// A leading sign binds to the first numeric token only. Of a fractional
/// seconds part, at most the first three digits are kept and read as the
/// millisecond count exactly as written (`"SS.5"` is 5 ms, not 500).
pub(crate) fn parse_canonical(text: &str) -> Result<TimeSpan> {
    let tokens: Vec<&str> = text.split(':').collect();
    let &[first, minutes, seconds] = tokens.as_slice() else {
        tracing::trace!(input = text, "rejected time span text: token count");
        return Err(TimeSpanError::MalformedInput(format!(
            "expected HH:MM:SS, got {text:?}"
        )));
    };

    let (whole_seconds, millis) = match seconds.split_once('.') {
        Some((whole, fraction)) => {
            let kept = fraction.get(..3).unwrap_or(fraction);
            (whole, parse_field(text, kept)?)
        }
        None => (seconds, 0),
    };

    let minutes = parse_field(text, minutes)?;
    let whole_seconds = parse_field(text, whole_seconds)?;

    match first.split_once('.') {
        Some((days, hours)) => TimeSpan::from_time_full(
            parse_field(text, days)?,
            parse_field(text, hours)?,
            minutes,
            whole_seconds,
            millis,
        ),
        None => TimeSpan::from_time_millis(
            parse_field(text, first)?,
            minutes,
            whole_seconds,
            millis,
        ),
    }
}

fn parse_field(input: &str, field: &str) -> Result<i64> {
    field.parse().map_err(|_| {
        tracing::trace!(input, field, "rejected time span text: non-numeric field");
        TimeSpanError::MalformedInput(format!("non-numeric field {field:?} in {input:?}"))
    })
}

impl std::str::FromStr for TimeSpan {
    type Err = TimeSpanError;

    /// Strict variant of the text branch of [`TimeSpan::parse`]: empty
    /// input is malformed here, since `FromStr` cannot express absence.
    fn from_str(s: &str) -> Result<TimeSpan> {
        parse_canonical(s)
    }
}
