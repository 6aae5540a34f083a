//! The `TimeSpan` value type.
//!
//! A `TimeSpan` is an immutable signed count of milliseconds. Every
//! accessor is a pure function of that count, and every arithmetic
//! operation returns a new value.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::sync::OnceLock;

use chrono::Local;

use crate::errors::{Result, TimeSpanError};

/// Largest millisecond count exactly representable in an `f64`
/// (`2^53 - 1`). The validating factories reject anything outside
/// `[-MAX_SAFE_MILLIS, MAX_SAFE_MILLIS]`.
const MAX_SAFE_MILLIS: i64 = (1 << 53) - 1;
const MIN_SAFE_MILLIS: i64 = -MAX_SAFE_MILLIS;

static TIMEZONE_OFFSET: OnceLock<TimeSpan> = OnceLock::new();

/// A signed span of elapsed time, stored as whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSpan {
    millis: i64,
}

impl TimeSpan {
    pub const MILLIS_PER_SECOND: i64 = 1000;
    pub const MILLIS_PER_MINUTE: i64 = 60 * Self::MILLIS_PER_SECOND;
    pub const MILLIS_PER_HOUR: i64 = 60 * Self::MILLIS_PER_MINUTE;
    pub const MILLIS_PER_DAY: i64 = 24 * Self::MILLIS_PER_HOUR;

    /// The zero-length span.
    pub const ZERO: TimeSpan = TimeSpan::new(0);
    /// The longest representable span.
    pub const MAX: TimeSpan = TimeSpan::new(MAX_SAFE_MILLIS);
    /// The most negative representable span.
    pub const MIN: TimeSpan = TimeSpan::new(MIN_SAFE_MILLIS);

    /// Raw constructor. Performs no range validation; the validating
    /// factories are responsible for bounds before calling this.
    pub(crate) const fn new(millis: i64) -> Self {
        TimeSpan { millis }
    }

    /// Local wall-clock offset from UTC, captured once per process on
    /// first access and cached for the process lifetime. Later timezone
    /// or DST changes are not reflected.
    pub fn timezone_offset() -> TimeSpan {
        *TIMEZONE_OFFSET.get_or_init(|| {
            let seconds = Local::now().offset().local_minus_utc() as i64;
            let minutes = seconds / 60;
            tracing::debug!(offset_minutes = minutes, "captured local timezone offset");
            TimeSpan::new(minutes * Self::MILLIS_PER_MINUTE)
        })
    }

    // ---- unit factories ---------------------------------------------------

    /// Span of `value` days, rounded to the nearest millisecond.
    pub fn from_days(value: f64) -> Result<TimeSpan> {
        Self::interval(value, Self::MILLIS_PER_DAY)
    }

    /// Span of `value` hours, rounded to the nearest millisecond.
    pub fn from_hours(value: f64) -> Result<TimeSpan> {
        Self::interval(value, Self::MILLIS_PER_HOUR)
    }

    /// Span of `value` minutes, rounded to the nearest millisecond.
    pub fn from_minutes(value: f64) -> Result<TimeSpan> {
        Self::interval(value, Self::MILLIS_PER_MINUTE)
    }

    /// Span of `value` seconds, rounded to the nearest millisecond.
    pub fn from_seconds(value: f64) -> Result<TimeSpan> {
        Self::interval(value, Self::MILLIS_PER_SECOND)
    }

    /// Span of `value` milliseconds, rounded to the nearest whole one.
    pub fn from_milliseconds(value: f64) -> Result<TimeSpan> {
        Self::interval(value, 1)
    }

    /// Span from an hour/minute/second breakdown.
    pub fn from_time(hours: i64, minutes: i64, seconds: i64) -> Result<TimeSpan> {
        Self::from_time_millis(hours, minutes, seconds, 0)
    }

    /// Span from a full day/hour/minute/second/millisecond breakdown.
    pub fn from_time_full(
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
    ) -> Result<TimeSpan> {
        let total = days
            .checked_mul(Self::MILLIS_PER_DAY)
            .and_then(|t| t.checked_add(hours.checked_mul(Self::MILLIS_PER_HOUR)?))
            .and_then(|t| t.checked_add(minutes.checked_mul(Self::MILLIS_PER_MINUTE)?))
            .and_then(|t| t.checked_add(seconds.checked_mul(Self::MILLIS_PER_SECOND)?))
            .and_then(|t| t.checked_add(milliseconds))
            .ok_or(TimeSpanError::TimeSpanTooLong)?;

        if !(MIN_SAFE_MILLIS..=MAX_SAFE_MILLIS).contains(&total) {
            return Err(TimeSpanError::TimeSpanTooLong);
        }
        Ok(TimeSpan::new(total))
    }

    /// Shared path for the hour-based breakdown: the seconds total is
    /// bound-checked before the milliseconds are appended, matching the
    /// canonical grammar's day-less branch.
    pub(crate) fn from_time_millis(
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
    ) -> Result<TimeSpan> {
        let total_seconds = hours
            .checked_mul(3600)
            .and_then(|t| t.checked_add(minutes.checked_mul(60)?))
            .and_then(|t| t.checked_add(seconds))
            .ok_or(TimeSpanError::TimeSpanTooLong)?;

        let bound = MAX_SAFE_MILLIS / Self::MILLIS_PER_SECOND;
        if !(-bound..=bound).contains(&total_seconds) {
            return Err(TimeSpanError::TimeSpanTooLong);
        }
        Ok(TimeSpan::new(
            total_seconds * Self::MILLIS_PER_SECOND + milliseconds,
        ))
    }

    /// Scale `value` by `scale` milliseconds per unit and round half
    /// away from zero.
    fn interval(value: f64, scale: i64) -> Result<TimeSpan> {
        if value.is_nan() {
            return Err(TimeSpanError::InvalidArgument(
                "value must not be NaN".to_string(),
            ));
        }

        let millis = round_half_away(value * scale as f64);
        if !(MIN_SAFE_MILLIS as f64..=MAX_SAFE_MILLIS as f64).contains(&millis) {
            return Err(TimeSpanError::TimeSpanTooLong);
        }
        Ok(TimeSpan::new(millis as i64))
    }

    // ---- component views --------------------------------------------------

    /// Whole days, truncated toward zero.
    pub const fn days(&self) -> i64 {
        self.millis / Self::MILLIS_PER_DAY
    }

    /// Hour component, wrapped to `-23..=23`.
    pub const fn hours(&self) -> i64 {
        (self.millis / Self::MILLIS_PER_HOUR) % 24
    }

    /// Minute component, wrapped to `-59..=59`.
    pub const fn minutes(&self) -> i64 {
        (self.millis / Self::MILLIS_PER_MINUTE) % 60
    }

    /// Second component, wrapped to `-59..=59`.
    pub const fn seconds(&self) -> i64 {
        (self.millis / Self::MILLIS_PER_SECOND) % 60
    }

    /// Millisecond component, wrapped to `-999..=999`.
    pub const fn milliseconds(&self) -> i64 {
        self.millis % 1000
    }

    // ---- total views ------------------------------------------------------

    /// The whole span expressed in days, unrounded.
    pub fn total_days(&self) -> f64 {
        self.millis as f64 / Self::MILLIS_PER_DAY as f64
    }

    /// The whole span expressed in hours, unrounded.
    pub fn total_hours(&self) -> f64 {
        self.millis as f64 / Self::MILLIS_PER_HOUR as f64
    }

    /// The whole span expressed in minutes, unrounded.
    pub fn total_minutes(&self) -> f64 {
        self.millis as f64 / Self::MILLIS_PER_MINUTE as f64
    }

    /// The whole span expressed in seconds, unrounded.
    pub fn total_seconds(&self) -> f64 {
        self.millis as f64 / Self::MILLIS_PER_SECOND as f64
    }

    /// The raw stored millisecond count.
    pub const fn total_milliseconds(&self) -> i64 {
        self.millis
    }

    // ---- arithmetic -------------------------------------------------------

    // Arithmetic never re-validates against the safe range: values built
    // through the factories stay far from the i64 limits, and saturation
    // covers spans smuggled in through the raw parse path.

    /// Sum of the two spans.
    pub const fn add(&self, other: TimeSpan) -> TimeSpan {
        TimeSpan::new(self.millis.saturating_add(other.millis))
    }

    /// Difference of the two spans.
    pub const fn subtract(&self, other: TimeSpan) -> TimeSpan {
        TimeSpan::new(self.millis.saturating_sub(other.millis))
    }

    /// This span plus `value` days.
    pub fn add_days(&self, value: f64) -> TimeSpan {
        self.shift(value, Self::MILLIS_PER_DAY)
    }

    /// This span minus `value` days.
    pub fn subtract_days(&self, value: f64) -> TimeSpan {
        self.shift(-value, Self::MILLIS_PER_DAY)
    }

    /// This span plus `value` hours.
    pub fn add_hours(&self, value: f64) -> TimeSpan {
        self.shift(value, Self::MILLIS_PER_HOUR)
    }

    /// This span minus `value` hours.
    pub fn subtract_hours(&self, value: f64) -> TimeSpan {
        self.shift(-value, Self::MILLIS_PER_HOUR)
    }

    /// This span plus `value` minutes.
    pub fn add_minutes(&self, value: f64) -> TimeSpan {
        self.shift(value, Self::MILLIS_PER_MINUTE)
    }

    /// This span minus `value` minutes.
    pub fn subtract_minutes(&self, value: f64) -> TimeSpan {
        self.shift(-value, Self::MILLIS_PER_MINUTE)
    }

    /// This span plus `value` seconds.
    pub fn add_seconds(&self, value: f64) -> TimeSpan {
        self.shift(value, Self::MILLIS_PER_SECOND)
    }

    /// This span minus `value` seconds.
    pub fn subtract_seconds(&self, value: f64) -> TimeSpan {
        self.shift(-value, Self::MILLIS_PER_SECOND)
    }

    /// This span plus `value` milliseconds.
    pub fn add_milliseconds(&self, value: f64) -> TimeSpan {
        self.shift(value, 1)
    }

    /// This span minus `value` milliseconds.
    pub fn subtract_milliseconds(&self, value: f64) -> TimeSpan {
        self.shift(-value, 1)
    }

    /// The span with its sign flipped.
    pub const fn negate(&self) -> TimeSpan {
        TimeSpan::new(self.millis.saturating_neg())
    }

    fn shift(&self, value: f64, scale: i64) -> TimeSpan {
        let delta = round_half_away(value * scale as f64) as i64;
        TimeSpan::new(self.millis.saturating_add(delta))
    }
}

/// Round half away from zero: add 0.5 toward the value's sign, then
/// truncate toward zero.
fn round_half_away(value: f64) -> f64 {
    let nudged = if value >= 0.0 { value + 0.5 } else { value - 0.5 };
    nudged.trunc()
}

impl Add for TimeSpan {
    type Output = TimeSpan;

    fn add(self, rhs: TimeSpan) -> TimeSpan {
        TimeSpan::new(self.millis.saturating_add(rhs.millis))
    }
}

impl Sub for TimeSpan {
    type Output = TimeSpan;

    fn sub(self, rhs: TimeSpan) -> TimeSpan {
        self.subtract(rhs)
    }
}

impl Neg for TimeSpan {
    type Output = TimeSpan;

    fn neg(self) -> TimeSpan {
        self.negate()
    }
}

impl From<TimeSpan> for i64 {
    fn from(span: TimeSpan) -> i64 {
        span.millis
    }
}

impl PartialEq<i64> for TimeSpan {
    fn eq(&self, other: &i64) -> bool {
        self.millis == *other
    }
}

impl PartialEq<TimeSpan> for i64 {
    fn eq(&self, other: &TimeSpan) -> bool {
        *self == other.millis
    }
}

impl PartialOrd<i64> for TimeSpan {
    fn partial_cmp(&self, other: &i64) -> Option<std::cmp::Ordering> {
        self.millis.partial_cmp(other)
    }
}

impl PartialOrd<TimeSpan> for i64 {
    fn partial_cmp(&self, other: &TimeSpan) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.millis)
    }
}

impl fmt::Display for TimeSpan {
    /// Canonical form `[-]HH:MM:SS`. The hour field is the floored
    /// absolute total hours and is not wrapped at 24; milliseconds are
    /// never emitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.millis.unsigned_abs();
        let hours = magnitude / Self::MILLIS_PER_HOUR as u64;
        let minutes = (magnitude / Self::MILLIS_PER_MINUTE as u64) % 60;
        let seconds = (magnitude / Self::MILLIS_PER_SECOND as u64) % 60;

        if self.millis < 0 {
            write!(f, "-")?;
        }
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_unit_factories_agree() {
        let hour = TimeSpan::from_hours(1.0).expect("one hour");
        assert_eq!(TimeSpan::from_minutes(60.0).expect("60 min"), hour);
        assert_eq!(TimeSpan::from_seconds(3600.0).expect("3600 s"), hour);
        assert_eq!(TimeSpan::from_milliseconds(3_600_000.0).expect("ms"), hour);
        assert_eq!(TimeSpan::from_days(1.0 / 24.0).expect("1/24 day"), hour);
    }

    #[test]
    fn test_component_decomposition() {
        let span = TimeSpan::from_time_full(1, 2, 30, 15, 500).expect("span");
        assert_eq!(span.days(), 1);
        assert_eq!(span.hours(), 2);
        assert_eq!(span.minutes(), 30);
        assert_eq!(span.seconds(), 15);
        assert_eq!(span.milliseconds(), 500);
        assert_eq!(
            span.total_milliseconds(),
            86_400_000 + 2 * 3_600_000 + 30 * 60_000 + 15 * 1000 + 500
        );
    }

    #[test]
    fn test_negative_components_keep_sign() {
        let span = TimeSpan::from_hours(-25.5).expect("span");
        assert_eq!(span.days(), -1);
        assert_eq!(span.hours(), -1);
        assert_eq!(span.minutes(), -30);
        assert_eq!(span.total_hours(), -25.5);
    }

    #[test_case(1.5, 1500 ; "positive fraction rounds")]
    #[test_case(-1.5, -1500 ; "negative fraction rounds")]
    #[test_case(0.0004, 0 ; "sub-millisecond rounds toward zero")]
    #[test_case(0.0006, 1 ; "half and above rounds away")]
    fn test_from_seconds_rounding(value: f64, expected_millis: i64) {
        let span = TimeSpan::from_seconds(value).expect("span");
        assert_eq!(span.total_milliseconds(), expected_millis);
    }

    #[test]
    fn test_nan_is_invalid_argument() {
        assert!(matches!(
            TimeSpan::from_hours(f64::NAN),
            Err(TimeSpanError::InvalidArgument(_))
        ));
    }

    #[test_case(f64::INFINITY ; "positive infinity")]
    #[test_case(f64::NEG_INFINITY ; "negative infinity")]
    #[test_case(1e16 ; "past the safe range")]
    fn test_oversized_unit_value_is_too_long(value: f64) {
        assert!(matches!(
            TimeSpan::from_milliseconds(value),
            Err(TimeSpanError::TimeSpanTooLong)
        ));
    }

    #[test]
    fn test_from_time_bound_check() {
        let limit_seconds = MAX_SAFE_MILLIS / 1000;
        assert!(TimeSpan::from_time(0, 0, limit_seconds).is_ok());
        assert!(matches!(
            TimeSpan::from_time(0, 0, limit_seconds + 1),
            Err(TimeSpanError::TimeSpanTooLong)
        ));
    }

    #[test]
    fn test_from_time_full_overflow() {
        assert!(matches!(
            TimeSpan::from_time_full(i64::MAX / 1000, 0, 0, 0, 0),
            Err(TimeSpanError::TimeSpanTooLong)
        ));
        assert!(matches!(
            TimeSpan::from_time_full(MAX_SAFE_MILLIS / TimeSpan::MILLIS_PER_DAY + 1, 0, 0, 0, 0),
            Err(TimeSpanError::TimeSpanTooLong)
        ));
    }

    #[test]
    fn test_additivity() {
        let sum = TimeSpan::from_hours(2.0)
            .expect("2h")
            .add(TimeSpan::from_hours(3.0).expect("3h"));
        assert_eq!(sum.total_hours(), 5.0);
        assert_eq!(sum, TimeSpan::from_hours(2.0).expect("2h") + TimeSpan::from_hours(3.0).expect("3h"));
    }

    #[test]
    fn test_receiver_is_untouched() {
        let base = TimeSpan::from_hours(1.0).expect("1h");
        let shifted = base.add_minutes(30.0);
        assert_eq!(base.total_minutes(), 60.0);
        assert_eq!(shifted.total_minutes(), 90.0);
    }

    #[test]
    fn test_unit_arithmetic() {
        let one = TimeSpan::from_seconds(1.0).expect("1s");
        assert_eq!(one.add_seconds(1.0).total_seconds(), 2.0);
        assert_eq!(
            TimeSpan::from_milliseconds(200.0)
                .expect("200ms")
                .subtract_milliseconds(100.0)
                .total_milliseconds(),
            100
        );
        assert_eq!(one.add_days(0.5).total_milliseconds(), 43_201_000);
    }

    #[test]
    fn test_negate() {
        let span = TimeSpan::from_hours(2.0).expect("2h");
        assert_eq!(span.negate().total_hours(), -2.0);
        assert_eq!((-span).total_hours(), -2.0);
        assert_eq!(span.negate().negate(), span);
    }

    #[test]
    fn test_numeric_comparison() {
        let span = TimeSpan::from_seconds(1.0).expect("1s");
        assert_eq!(span, 1000_i64);
        assert_eq!(1000_i64, span);
        assert!(span > 999_i64);
        assert!(500_i64 < span);
        assert_eq!(i64::from(span), 1000);
    }

    #[test_case(30.0, "30:00:00" ; "hours are not wrapped at 24")]
    #[test_case(2.5, "02:30:00" ; "half hour")]
    #[test_case(-1.25, "-01:15:00" ; "negative sign leads")]
    #[test_case(0.0, "00:00:00" ; "zero")]
    fn test_display(hours: f64, expected: &str) {
        let span = TimeSpan::from_hours(hours).expect("span");
        assert_eq!(span.to_string(), expected);
    }

    #[test]
    fn test_display_drops_milliseconds() {
        let span = TimeSpan::from_milliseconds(1999.0).expect("span");
        assert_eq!(span.to_string(), "00:00:01");
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(TimeSpan::ZERO.total_milliseconds(), 0);
        assert_eq!(TimeSpan::MAX.total_milliseconds(), MAX_SAFE_MILLIS);
        assert_eq!(TimeSpan::MIN, TimeSpan::MAX.negate());
    }

    #[test]
    fn test_timezone_offset_is_stable_whole_minutes() {
        let first = TimeSpan::timezone_offset();
        let second = TimeSpan::timezone_offset();
        assert_eq!(first, second);
        assert_eq!(first.total_milliseconds() % TimeSpan::MILLIS_PER_MINUTE, 0);
    }
}
