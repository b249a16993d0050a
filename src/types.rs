//! Core value types shared by the controller, the alarm engine and the renderer.

use crate::calendar::days_in_month;

/// Largest year the real-time peripheral can hold.
pub const MAX_YEAR: u16 = 4095;

/// A calendar date with time of day.
///
/// `weekday` is stored rather than derived: the peripheral keeps whatever
/// the user entered, 0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// 0..=4095
    pub year: u16,
    /// 1..=12
    pub month: u8,
    /// 1..=days_in_month(year, month)
    pub day: u8,
    /// 0..=6, 0 = Sunday
    pub weekday: u8,
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
}

impl DateTime {
    /// Power-up value of the appliance clock: Friday 2022-07-01 00:00:00.
    pub const DEFAULT: DateTime = DateTime {
        year: 2022,
        month: 7,
        day: 1,
        weekday: 5,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Returns true if every field is inside its range, including the
    /// day-of-month bound for this year and month.
    pub fn is_valid(&self) -> bool {
        self.year <= MAX_YEAR
            && (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.weekday <= 6
            && self.alarm_time().is_valid()
    }

    /// The time-of-day part, as compared against an armed alarm.
    #[inline]
    pub fn alarm_time(&self) -> AlarmTime {
        AlarmTime::new(self.hour, self.minute, self.second)
    }

    /// Pulls `day` down to the last day of the current month if needed.
    pub fn clamp_day(&mut self) {
        let last = days_in_month(self.year, self.month);
        if self.day > last {
            self.day = last;
        }
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Time of day an alarm goes off. Matches on every date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl AlarmTime {
    /// Power-up alarm setting, 08:00:00.
    pub const DEFAULT: AlarmTime = AlarmTime::new(8, 0, 0);

    #[inline]
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59 && self.second <= 59
    }

    /// Compare-match predicate: hour, minute and second equal, date ignored.
    #[inline]
    pub fn matches(&self, now: &DateTime) -> bool {
        self.hour == now.hour && self.minute == now.minute && self.second == now.second
    }
}

/// Recoverable failures reported by the real-time peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The peripheral rejected a date/time write.
    InvalidDateTime,

    /// The clock is not running and cannot be read.
    PeripheralUnavailable,
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ClockError::InvalidDateTime => {
                write!(f, "date/time rejected by the real-time clock")
            }
            ClockError::PeripheralUnavailable => {
                write!(f, "real-time clock is not running")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClockError {}
