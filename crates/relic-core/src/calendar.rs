//! Calendar-day arithmetic over epoch-millisecond timestamps.
//!
//! Streaks and the daily puzzle operate on calendar days, not on elapsed
//! time. A [`Calendar`] maps a timestamp to the date it falls on at a fixed
//! UTC offset (UTC by default). All derivations are pure; nothing here
//! reads the wall clock.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use relic_types::Timestamp;

/// Milliseconds in one hour.
pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Seconds in one minute, for offset conversion.
const SECONDS_PER_MINUTE: i32 = 60;

/// Errors that can occur when building a calendar or resolving a date.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// The UTC offset is outside the representable range.
    #[error("invalid UTC offset: {minutes} minutes")]
    InvalidOffset {
        /// The rejected offset in minutes.
        minutes: i32,
    },

    /// The timestamp lies outside the range `chrono` can represent.
    #[error("timestamp out of range: {0}")]
    OutOfRange(Timestamp),
}

/// Maps timestamps to calendar days at a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    /// A calendar whose days start at UTC midnight.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// A calendar whose days start at midnight `minutes` east of UTC.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidOffset`] unless the offset is
    /// strictly within one day of UTC.
    pub fn with_offset_minutes(minutes: i32) -> Result<Self, CalendarError> {
        let offset = minutes
            .checked_mul(SECONDS_PER_MINUTE)
            .and_then(FixedOffset::east_opt)
            .ok_or(CalendarError::InvalidOffset { minutes })?;
        Ok(Self { offset })
    }

    /// The configured UTC offset.
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar day `timestamp` falls on.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] for timestamps `chrono` cannot
    /// represent.
    pub fn day_of(&self, timestamp: Timestamp) -> Result<NaiveDate, CalendarError> {
        DateTime::from_timestamp_millis(timestamp)
            .map(|utc| utc.with_timezone(&self.offset).date_naive())
            .ok_or(CalendarError::OutOfRange(timestamp))
    }
}

/// Absolute number of calendar days between two dates.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> u64 {
    a.signed_duration_since(b).num_days().unsigned_abs()
}

/// Render a millisecond duration as `H:MM:SS`, the countdown format shown
/// next to the claim button. Negative durations render as `0:00:00`.
pub fn format_countdown(ms: i64) -> String {
    let total_seconds = ms.max(0).checked_div(1000).unwrap_or(0);
    let hours = total_seconds.checked_div(3600).unwrap_or(0);
    let minutes = total_seconds
        .checked_rem(3600)
        .and_then(|rem| rem.checked_div(60))
        .unwrap_or(0);
    let seconds = total_seconds.checked_rem(60).unwrap_or(0);
    format!("{hours}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 2026-10-16T00:00:00Z in epoch ms.
    const OCT_16_MIDNIGHT: Timestamp = 1_792_108_800_000;

    #[test]
    fn utc_day_boundaries() {
        let cal = Calendar::utc();
        assert_eq!(cal.day_of(OCT_16_MIDNIGHT).unwrap(), day(2026, 10, 16));
        assert_eq!(cal.day_of(OCT_16_MIDNIGHT - 1).unwrap(), day(2026, 10, 15));
        assert_eq!(cal.day_of(0).unwrap(), day(1970, 1, 1));
    }

    #[test]
    fn offset_shifts_the_day_boundary() {
        // UTC-5: midnight UTC is still the previous evening.
        let cal = Calendar::with_offset_minutes(-300).unwrap();
        assert_eq!(cal.day_of(OCT_16_MIDNIGHT).unwrap(), day(2026, 10, 15));
        assert_eq!(
            cal.day_of(OCT_16_MIDNIGHT + 5 * MS_PER_HOUR).unwrap(),
            day(2026, 10, 16)
        );
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        assert!(Calendar::with_offset_minutes(24 * 60).is_err());
        assert!(Calendar::with_offset_minutes(-24 * 60).is_err());
        assert!(Calendar::with_offset_minutes(i32::MAX).is_err());
        assert!(Calendar::with_offset_minutes(23 * 60).is_ok());
    }

    #[test]
    fn extreme_timestamp_is_out_of_range() {
        assert!(Calendar::utc().day_of(i64::MAX).is_err());
    }

    #[test]
    fn days_between_is_symmetric() {
        assert_eq!(days_between(day(2026, 1, 1), day(2026, 1, 1)), 0);
        assert_eq!(days_between(day(2026, 1, 1), day(2026, 1, 2)), 1);
        assert_eq!(days_between(day(2026, 1, 2), day(2026, 1, 1)), 1);
        assert_eq!(days_between(day(2025, 12, 31), day(2026, 3, 1)), 60);
    }

    #[test]
    fn countdown_formatting() {
        assert_eq!(format_countdown(0), "0:00:00");
        assert_eq!(format_countdown(-5_000), "0:00:00");
        assert_eq!(format_countdown(999), "0:00:00");
        assert_eq!(format_countdown(61_000), "0:01:01");
        assert_eq!(format_countdown(12 * MS_PER_HOUR), "12:00:00");
        assert_eq!(format_countdown(3 * MS_PER_HOUR + 4 * 60_000 + 5_000), "3:04:05");
    }
}
