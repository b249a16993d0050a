//! Real-time clock peripheral interface and a software implementation.
//!
//! Provides the [`RealTimeClock`] trait the controller and renderer consume,
//! and [`SoftRtc`], a calendar kept in RAM that stands in for the hardware
//! peripheral on the host and in tests.

use core::cell::RefCell;
use critical_section::Mutex;

use crate::calendar::days_in_month;
use crate::types::{AlarmTime, ClockError, DateTime, MAX_YEAR};

/// Trait for abstracting the real-time clock peripheral.
///
/// Both execution contexts hold a shared reference: the renderer reads the
/// clock every frame while the controller writes it and arms the alarm.
/// Implementations provide their own interior synchronization.
///
/// When the live time compare-matches the armed [`AlarmTime`], the
/// peripheral's interrupt glue must call
/// [`SharedState::notify_compare_match`](crate::SharedState::notify_compare_match).
pub trait RealTimeClock {
    /// Reads the current date and time.
    ///
    /// # Errors
    /// `PeripheralUnavailable` if the clock is not running.
    fn datetime(&self) -> Result<DateTime, ClockError>;

    /// Writes the date and time.
    ///
    /// # Errors
    /// `InvalidDateTime` if any field is out of range.
    fn set_datetime(&self, datetime: &DateTime) -> Result<(), ClockError>;

    /// Installs `time` in the compare register, replacing any previous alarm.
    fn arm_alarm(&self, time: AlarmTime);

    /// Removes the compare registration.
    fn disarm_alarm(&self);
}

#[derive(Debug)]
struct SoftRtcState {
    now: DateTime,
    running: bool,
    alarm: Option<AlarmTime>,
}

/// Software real-time clock advancing one second per [`tick_second`](SoftRtc::tick_second).
pub struct SoftRtc {
    state: Mutex<RefCell<SoftRtcState>>,
}

impl SoftRtc {
    /// Creates a running clock starting at `start`.
    pub const fn new(start: DateTime) -> Self {
        Self {
            state: Mutex::new(RefCell::new(SoftRtcState {
                now: start,
                running: true,
                alarm: None,
            })),
        }
    }

    /// Halts the clock; reads fail until it is started or written.
    pub fn stop(&self) {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).running = false);
    }

    pub fn start(&self) {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).running = true);
    }

    /// The alarm currently installed in the compare register.
    pub fn armed_alarm(&self) -> Option<AlarmTime> {
        critical_section::with(|cs| self.state.borrow_ref(cs).alarm)
    }

    /// Advances the clock by one second.
    ///
    /// Returns true when the new time compare-matches the armed alarm.
    pub fn tick_second(&self) -> bool {
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            if !state.running {
                return false;
            }
            advance_second(&mut state.now);
            let now = state.now;
            state.alarm.is_some_and(|alarm| alarm.matches(&now))
        })
    }
}

impl RealTimeClock for SoftRtc {
    fn datetime(&self) -> Result<DateTime, ClockError> {
        critical_section::with(|cs| {
            let state = self.state.borrow_ref(cs);
            if state.running {
                Ok(state.now)
            } else {
                Err(ClockError::PeripheralUnavailable)
            }
        })
    }

    fn set_datetime(&self, datetime: &DateTime) -> Result<(), ClockError> {
        if !datetime.is_valid() {
            return Err(ClockError::InvalidDateTime);
        }
        critical_section::with(|cs| {
            let mut state = self.state.borrow_ref_mut(cs);
            state.now = *datetime;
            state.running = true;
        });
        Ok(())
    }

    fn arm_alarm(&self, time: AlarmTime) {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).alarm = Some(time));
    }

    fn disarm_alarm(&self) {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).alarm = None);
    }
}

fn advance_second(now: &mut DateTime) {
    now.second += 1;
    if now.second < 60 {
        return;
    }
    now.second = 0;
    now.minute += 1;
    if now.minute < 60 {
        return;
    }
    now.minute = 0;
    now.hour += 1;
    if now.hour < 24 {
        return;
    }
    now.hour = 0;
    now.weekday = (now.weekday + 1) % 7;
    now.day += 1;
    if now.day <= days_in_month(now.year, now.month) {
        return;
    }
    now.day = 1;
    now.month += 1;
    if now.month <= 12 {
        return;
    }
    now.month = 1;
    now.year = if now.year >= MAX_YEAR { 0 } else { now.year + 1 };
}
