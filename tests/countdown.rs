// Native integration tests for the countdown math and its JSON views.

use chrono::{TimeZone, Utc};
use christmas_countdown::countdown::{CountdownDriver, DriverState, next_christmas};
use christmas_countdown::{RemainingTime, TimezoneSelection, time_left};

#[test]
fn first_of_december_noon_utc() {
    let now = Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap();
    let left = TimezoneSelection::Utc.time_left(now);
    assert_eq!(left, RemainingTime { days: 23, hours: 12, minutes: 0, seconds: 0 });
}

#[test]
fn christmas_midnight_is_reached() {
    let now = Utc.with_ymd_and_hms(2024, 12, 25, 0, 0, 0).unwrap();
    let left = time_left(now, &Utc);
    assert!(left.is_reached());
    assert_eq!(left, RemainingTime::REACHED);
}

#[test]
fn one_second_after_midnight_rolls_over() {
    let now = Utc.with_ymd_and_hms(2024, 12, 25, 0, 0, 1).unwrap();
    let target = next_christmas(now, &Utc).unwrap();
    assert_eq!(target, Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).unwrap());
    assert!(!time_left(now, &Utc).is_reached());
}

#[test]
fn named_zone_counts_to_its_own_midnight() {
    // Christmas in Tokyo starts at 15:00 UTC on the 24th.
    let now = Utc.with_ymd_and_hms(2024, 12, 24, 14, 0, 0).unwrap();
    let tokyo = TimezoneSelection::parse("Asia/Tokyo");
    assert_eq!(tokyo.value(), "Asia/Tokyo");
    assert_eq!(tokyo.time_left(now), RemainingTime { days: 0, hours: 1, minutes: 0, seconds: 0 });
}

#[test]
fn unlisted_zone_values_mean_local() {
    assert_eq!(TimezoneSelection::parse("Mars/Olympus_Mons"), TimezoneSelection::Local);
    assert_eq!(TimezoneSelection::parse("Europe/Berlin"), TimezoneSelection::Local);
}

#[test]
fn driver_publishes_only_while_running() {
    let mut driver = CountdownDriver::new(TimezoneSelection::Utc);
    let t0 = Utc.with_ymd_and_hms(2024, 12, 24, 23, 59, 58).unwrap();
    assert_eq!(driver.tick(t0), None);

    let first = driver.mount(t0);
    assert_eq!(driver.state(), DriverState::Running);
    assert_eq!(first.total_seconds(), 2);

    let t2 = Utc.with_ymd_and_hms(2024, 12, 25, 0, 0, 0).unwrap();
    assert_eq!(driver.tick(t2), Some(RemainingTime::REACHED));

    driver.unmount();
    assert_eq!(driver.state(), DriverState::Idle);
    assert_eq!(driver.tick(t2), None);
}

#[test]
fn remaining_json_matches_struct_fields() {
    let now = Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap();
    let json = christmas_countdown::remaining_to_json("UTC", now).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["days"], 23);
    assert_eq!(v["hours"], 12);
}
