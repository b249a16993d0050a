//! UI modes and the editable fields of the two wizards.

use crate::calendar::days_in_month;
use crate::types::{AlarmTime, DateTime, MAX_YEAR};

/// Direction of a Left/Right field edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Adjust {
    /// Left: decrement, wrapping from the minimum to the maximum.
    Down,
    /// Right: increment, wrapping from the maximum to the minimum.
    Up,
}

/// Steps `value` one place inside `min..=max`, wrapping at both ends.
///
/// A value already outside the range is treated as sitting on the nearer bound.
pub(crate) fn cycle(value: u16, min: u16, max: u16, adjust: Adjust) -> u16 {
    match adjust {
        Adjust::Up if value >= max => min,
        Adjust::Up => value.max(min) + 1,
        Adjust::Down if value <= min => max,
        Adjust::Down => value.min(max + 1) - 1,
    }
}

/// Fields of the clock-edit wizard, in editing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockField {
    Year,
    Month,
    Day,
    Weekday,
    Hour,
    Minute,
    Second,
}

impl ClockField {
    pub const ALL: [ClockField; 7] = [
        ClockField::Year,
        ClockField::Month,
        ClockField::Day,
        ClockField::Weekday,
        ClockField::Hour,
        ClockField::Minute,
        ClockField::Second,
    ];

    /// The field Select advances to, `None` after the last field (commit).
    pub fn next(self) -> Option<ClockField> {
        match self {
            ClockField::Year => Some(ClockField::Month),
            ClockField::Month => Some(ClockField::Day),
            ClockField::Day => Some(ClockField::Weekday),
            ClockField::Weekday => Some(ClockField::Hour),
            ClockField::Hour => Some(ClockField::Minute),
            ClockField::Minute => Some(ClockField::Second),
            ClockField::Second => None,
        }
    }

    /// The field Back returns to, `None` from the first field (exit).
    pub fn prev(self) -> Option<ClockField> {
        match self {
            ClockField::Year => None,
            ClockField::Month => Some(ClockField::Year),
            ClockField::Day => Some(ClockField::Month),
            ClockField::Weekday => Some(ClockField::Day),
            ClockField::Hour => Some(ClockField::Weekday),
            ClockField::Minute => Some(ClockField::Hour),
            ClockField::Second => Some(ClockField::Minute),
        }
    }

    /// Inclusive range of the field for `draft`. The day range depends on
    /// the draft's year and month.
    pub fn bounds(self, draft: &DateTime) -> (u16, u16) {
        match self {
            ClockField::Year => (0, MAX_YEAR),
            ClockField::Month => (1, 12),
            ClockField::Day => (1, days_in_month(draft.year, draft.month) as u16),
            ClockField::Weekday => (0, 6),
            ClockField::Hour => (0, 23),
            ClockField::Minute | ClockField::Second => (0, 59),
        }
    }

    pub fn value(self, draft: &DateTime) -> u16 {
        match self {
            ClockField::Year => draft.year,
            ClockField::Month => draft.month as u16,
            ClockField::Day => draft.day as u16,
            ClockField::Weekday => draft.weekday as u16,
            ClockField::Hour => draft.hour as u16,
            ClockField::Minute => draft.minute as u16,
            ClockField::Second => draft.second as u16,
        }
    }

    /// Applies one Left/Right edit to this field of `draft`.
    pub fn adjust(self, draft: &mut DateTime, adjust: Adjust) {
        let (min, max) = self.bounds(draft);
        let value = cycle(self.value(draft), min, max, adjust);
        match self {
            ClockField::Year => draft.year = value,
            ClockField::Month => draft.month = value as u8,
            ClockField::Day => draft.day = value as u8,
            ClockField::Weekday => draft.weekday = value as u8,
            ClockField::Hour => draft.hour = value as u8,
            ClockField::Minute => draft.minute = value as u8,
            ClockField::Second => draft.second = value as u8,
        }
    }
}

/// Fields of the alarm-edit wizard, in editing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmField {
    Hour,
    Minute,
    Second,
}

impl AlarmField {
    pub const ALL: [AlarmField; 3] = [AlarmField::Hour, AlarmField::Minute, AlarmField::Second];

    pub fn next(self) -> Option<AlarmField> {
        match self {
            AlarmField::Hour => Some(AlarmField::Minute),
            AlarmField::Minute => Some(AlarmField::Second),
            AlarmField::Second => None,
        }
    }

    pub fn prev(self) -> Option<AlarmField> {
        match self {
            AlarmField::Hour => None,
            AlarmField::Minute => Some(AlarmField::Hour),
            AlarmField::Second => Some(AlarmField::Minute),
        }
    }

    pub fn max(self) -> u8 {
        match self {
            AlarmField::Hour => 23,
            AlarmField::Minute | AlarmField::Second => 59,
        }
    }

    pub fn value(self, draft: &AlarmTime) -> u8 {
        match self {
            AlarmField::Hour => draft.hour,
            AlarmField::Minute => draft.minute,
            AlarmField::Second => draft.second,
        }
    }

    pub fn adjust(self, draft: &mut AlarmTime, adjust: Adjust) {
        let value = cycle(self.value(draft) as u16, 0, self.max() as u16, adjust) as u8;
        match self {
            AlarmField::Hour => draft.hour = value,
            AlarmField::Minute => draft.minute = value,
            AlarmField::Second => draft.second = value,
        }
    }
}

/// The active UI mode.
///
/// Exactly one mode is active at a time; it alone decides how input is
/// routed and what is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Top menu: CLOCK, SET CLOCK, ALARM.
    #[default]
    Menu,
    /// Live clock face; idles into `Sleep`.
    Clock,
    /// Clock-edit wizard, one field at a time.
    SetClock(ClockField),
    /// Result of committing the clock draft.
    SetConfirmed,
    /// Alarm menu: ENABLE/DISABLE, SET.
    AlarmMenu,
    /// Result of toggling the alarm on or off.
    AlarmDisabledConfirmed,
    /// Alarm-edit wizard, one field at a time.
    SetAlarm(AlarmField),
    /// Alarm draft committed and armed.
    SetAlarmConfirmed,
    /// Display blanked until any button is pressed.
    Sleep,
}

impl Mode {
    /// Number of selectable entries for menu modes, `None` otherwise.
    pub fn menu_len(self) -> Option<u8> {
        match self {
            Mode::Menu => Some(3),
            Mode::AlarmMenu => Some(2),
            _ => None,
        }
    }

    /// Terminal confirmation screens accept only Select.
    pub fn is_confirmation(self) -> bool {
        matches!(
            self,
            Mode::SetConfirmed | Mode::AlarmDisabledConfirmed | Mode::SetAlarmConfirmed
        )
    }

    /// Compact encoding for lock-free sharing between contexts.
    pub const fn code(self) -> u8 {
        match self {
            Mode::Menu => 0,
            Mode::Clock => 1,
            Mode::SetClock(field) => 2 + field as u8,
            Mode::SetConfirmed => 9,
            Mode::AlarmMenu => 10,
            Mode::AlarmDisabledConfirmed => 11,
            Mode::SetAlarm(field) => 12 + field as u8,
            Mode::SetAlarmConfirmed => 15,
            Mode::Sleep => 16,
        }
    }

    /// Inverse of [`code`](Mode::code).
    pub fn from_code(code: u8) -> Option<Mode> {
        let mode = match code {
            0 => Mode::Menu,
            1 => Mode::Clock,
            2..=8 => Mode::SetClock(ClockField::ALL[(code - 2) as usize]),
            9 => Mode::SetConfirmed,
            10 => Mode::AlarmMenu,
            11 => Mode::AlarmDisabledConfirmed,
            12..=14 => Mode::SetAlarm(AlarmField::ALL[(code - 12) as usize]),
            15 => Mode::SetAlarmConfirmed,
            16 => Mode::Sleep,
            _ => return None,
        };
        Some(mode)
    }
}
