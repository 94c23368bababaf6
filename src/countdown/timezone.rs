use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::{RemainingTime, time_left};

/// One entry of the timezone `<select>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TimezoneOption {
    pub value: &'static str,
    pub label: &'static str,
    pub offset: &'static str,
}

const fn option(value: &'static str, label: &'static str, offset: &'static str) -> TimezoneOption {
    TimezoneOption { value, label, offset }
}

pub const TIMEZONE_OPTIONS: &[TimezoneOption] = &[
    option("local", "Local Time", "auto"),
    option("UTC", "UTC", "+0"),
    option("America/New_York", "New York (EST/EDT)", "-5/-4"),
    option("America/Los_Angeles", "Los Angeles (PST/PDT)", "-8/-7"),
    option("America/Chicago", "Chicago (CST/CDT)", "-6/-5"),
    option("Europe/London", "London (GMT/BST)", "+0/+1"),
    option("Europe/Paris", "Paris (CET/CEST)", "+1/+2"),
    option("Asia/Tokyo", "Tokyo (JST)", "+9"),
    option("Asia/Shanghai", "Shanghai (CST)", "+8"),
    option("Australia/Sydney", "Sydney (AEDT/AEST)", "+11/+10"),
];

/// Which clock the countdown follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimezoneSelection {
    #[default]
    Local,
    Utc,
    Named(Tz),
}

impl TimezoneSelection {
    /// Parse a selector value. Anything outside [`TIMEZONE_OPTIONS`] is `Local`.
    pub fn parse(value: &str) -> Self {
        match value {
            "local" => TimezoneSelection::Local,
            "UTC" => TimezoneSelection::Utc,
            other if TIMEZONE_OPTIONS.iter().any(|o| o.value == other) => other
                .parse::<Tz>()
                .map(TimezoneSelection::Named)
                .unwrap_or_default(),
            _ => TimezoneSelection::Local,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            TimezoneSelection::Local => "local",
            TimezoneSelection::Utc => "UTC",
            TimezoneSelection::Named(tz) => tz.name(),
        }
    }

    pub fn label(&self) -> &'static str {
        let value = self.value();
        TIMEZONE_OPTIONS
            .iter()
            .find(|o| o.value == value)
            .map_or(value, |o| o.label)
    }

    pub fn time_left(&self, now: DateTime<Utc>) -> RemainingTime {
        match self {
            TimezoneSelection::Local => time_left(now, &chrono::Local),
            TimezoneSelection::Utc => time_left(now, &Utc),
            TimezoneSelection::Named(tz) => time_left(now, tz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn every_option_round_trips() {
        for opt in TIMEZONE_OPTIONS {
            assert_eq!(TimezoneSelection::parse(opt.value).value(), opt.value);
            assert_eq!(TimezoneSelection::parse(opt.value).label(), opt.label);
        }
    }

    #[test]
    fn unknown_values_fall_back_to_local() {
        assert_eq!(TimezoneSelection::parse("Mars/Olympus_Mons"), TimezoneSelection::Local);
        assert_eq!(TimezoneSelection::parse(""), TimezoneSelection::Local);
        // valid IANA zone, but not one the selector offers
        assert_eq!(TimezoneSelection::parse("Europe/Berlin"), TimezoneSelection::Local);
    }

    #[test]
    fn named_zone_differs_from_utc() {
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).single().unwrap();
        let utc = TimezoneSelection::Utc.time_left(now);
        let ny = TimezoneSelection::parse("America/New_York").time_left(now);
        assert_eq!(utc, RemainingTime { days: 23, hours: 12, minutes: 0, seconds: 0 });
        // New York is UTC-5 in December, so its midnight is five hours later.
        assert_eq!(ny, RemainingTime { days: 23, hours: 17, minutes: 0, seconds: 0 });
    }
}
