use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::{RemainingTime, TimezoneSelection};
use crate::error::Result;
use crate::scheduler::Interval;

pub const TICK_MS: i32 = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Tick logic of the countdown, independent of the browser timer.
#[derive(Clone, Debug)]
pub struct CountdownDriver {
    state: DriverState,
    selection: TimezoneSelection,
    latest: Option<RemainingTime>,
}

impl CountdownDriver {
    pub fn new(selection: TimezoneSelection) -> Self {
        Self { state: DriverState::Idle, selection, latest: None }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn selection(&self) -> TimezoneSelection {
        self.selection
    }

    pub fn latest(&self) -> Option<RemainingTime> {
        self.latest
    }

    /// Idle -> Running. Returns the first snapshot, published right away.
    pub fn mount(&mut self, now: DateTime<Utc>) -> RemainingTime {
        self.state = DriverState::Running;
        self.compute(now)
    }

    /// One tick. `None` while idle.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<RemainingTime> {
        match self.state {
            DriverState::Running => Some(self.compute(now)),
            DriverState::Idle => None,
        }
    }

    /// Switch zones; a running driver recomputes immediately.
    pub fn set_timezone(
        &mut self,
        selection: TimezoneSelection,
        now: DateTime<Utc>,
    ) -> Option<RemainingTime> {
        self.selection = selection;
        self.tick(now)
    }

    pub fn unmount(&mut self) {
        self.state = DriverState::Idle;
    }

    fn compute(&mut self, now: DateTime<Utc>) -> RemainingTime {
        let left = self.selection.time_left(now);
        self.latest = Some(left);
        left
    }
}

type Publish = Rc<dyn Fn(RemainingTime)>;

/// A mounted countdown: the driver plus the one-second interval feeding it.
/// Dropping it clears the interval.
pub struct Countdown {
    driver: Rc<RefCell<CountdownDriver>>,
    interval: Option<Interval>,
    publish: Publish,
}

impl Countdown {
    pub fn mount(
        selection: TimezoneSelection,
        publish: impl Fn(RemainingTime) + 'static,
    ) -> Result<Self> {
        let publish: Publish = Rc::new(publish);
        let driver = Rc::new(RefCell::new(CountdownDriver::new(selection)));
        let first = driver.borrow_mut().mount(Utc::now());
        publish(first);

        let tick_driver = driver.clone();
        let tick_publish = publish.clone();
        let interval = Interval::start(TICK_MS, move || {
            let snapshot = tick_driver.borrow_mut().tick(Utc::now());
            if let Some(left) = snapshot {
                tick_publish(left);
            }
        })?;
        Ok(Self { driver, interval: Some(interval), publish })
    }

    pub fn selection(&self) -> TimezoneSelection {
        self.driver.borrow().selection()
    }

    pub fn latest(&self) -> Option<RemainingTime> {
        self.driver.borrow().latest()
    }

    pub fn set_timezone(&self, selection: TimezoneSelection) {
        let snapshot = self.driver.borrow_mut().set_timezone(selection, Utc::now());
        if let Some(left) = snapshot {
            (self.publish)(left);
        }
    }

    pub fn unmount(&mut self) {
        self.interval = None;
        self.driver.borrow_mut().unmount();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 24, h, 0, 0).single().unwrap()
    }

    #[test]
    fn idle_driver_does_not_tick() {
        let mut d = CountdownDriver::new(TimezoneSelection::Utc);
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.tick(at(0)), None);
        assert_eq!(d.latest(), None);
    }

    #[test]
    fn mount_tick_unmount() {
        let mut d = CountdownDriver::new(TimezoneSelection::Utc);
        let first = d.mount(at(0));
        assert_eq!(first, RemainingTime { days: 1, hours: 0, minutes: 0, seconds: 0 });
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.tick(at(23)).map(|r| r.hours), Some(1));
        d.unmount();
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.tick(at(22)), None);
        // last published value survives unmount
        assert_eq!(d.latest().map(|r| r.hours), Some(1));
    }

    #[test]
    fn timezone_change_recomputes_only_when_running() {
        let tokyo = TimezoneSelection::parse("Asia/Tokyo");
        let mut d = CountdownDriver::new(TimezoneSelection::Utc);
        assert_eq!(d.set_timezone(tokyo, at(0)), None);
        assert_eq!(d.selection(), tokyo);
        d.mount(at(0));
        let back = d.set_timezone(TimezoneSelection::Utc, at(0));
        assert_eq!(back, Some(RemainingTime { days: 1, hours: 0, minutes: 0, seconds: 0 }));
    }
}
