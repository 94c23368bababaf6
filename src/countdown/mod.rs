//! Time left until Christmas.
//!
//! The target is the next December 25, 00:00:00 in the selected zone. An
//! instant after that midnight rolls the target to the following year; the
//! exact instant is the only one that yields the all-zero "reached" value.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

mod driver;
mod timezone;

pub use driver::{Countdown, CountdownDriver, DriverState};
pub use timezone::{TIMEZONE_OPTIONS, TimezoneOption, TimezoneSelection};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Decomposition of a non-negative millisecond delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemainingTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl RemainingTime {
    pub const REACHED: Self = Self { days: 0, hours: 0, minutes: 0, seconds: 0 };

    /// Deltas `<= 0` collapse to [`RemainingTime::REACHED`].
    pub fn from_millis(delta_ms: i64) -> Self {
        if delta_ms <= 0 {
            return Self::REACHED;
        }
        Self {
            days: (delta_ms / MS_PER_DAY) as u64,
            hours: ((delta_ms / MS_PER_HOUR) % 24) as u64,
            minutes: ((delta_ms / MS_PER_MINUTE) % 60) as u64,
            seconds: ((delta_ms / MS_PER_SECOND) % 60) as u64,
        }
    }

    pub fn is_reached(&self) -> bool {
        *self == Self::REACHED
    }

    /// Whole seconds represented by this value.
    pub fn total_seconds(&self) -> u64 {
        ((self.days * 24 + self.hours) * 60 + self.minutes) * 60 + self.seconds
    }
}

/// December 25, 00:00 of `year` in `zone`, as a UTC instant.
///
/// A midnight skipped or repeated by a DST change resolves to the earliest
/// valid local time; `None` only for years chrono cannot represent.
pub fn christmas_midnight<Z: TimeZone>(year: i32, zone: &Z) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(year, 12, 25)?.and_hms_opt(0, 0, 0)?;
    let local = zone
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc));
    Some(local.unwrap_or_else(|| naive.and_utc()))
}

/// The Christmas midnight the countdown at `now` is heading for.
pub fn next_christmas<Z: TimeZone>(now: DateTime<Utc>, zone: &Z) -> Option<DateTime<Utc>> {
    let year = now.with_timezone(zone).year();
    let this_year = christmas_midnight(year, zone)?;
    if now > this_year {
        christmas_midnight(year + 1, zone)
    } else {
        Some(this_year)
    }
}

pub fn time_left<Z: TimeZone>(now: DateTime<Utc>, zone: &Z) -> RemainingTime {
    next_christmas(now, zone).map_or(RemainingTime::REACHED, |target| {
        RemainingTime::from_millis((target - now).num_milliseconds())
    })
}
