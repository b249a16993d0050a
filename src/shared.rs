//! State shared between the control context and the rendering context.
//!
//! Every field is an independent atomic cell with exactly one writer:
//!
//! | field | writer |
//! |---|---|
//! | mode, cursor, drafts, clock commit result | controller |
//! | armed, firing, stored alarm | alarm engine |
//! | flash counter | renderer (reset to zero by the alarm engine on fire/stop) |
//! | compare-pending | RTC interrupt (cleared by the alarm engine) |
//!
//! Fields are stored with `Release` and loaded with `Acquire`, and only
//! plain loads and stores are used, so the same code runs on cores without
//! compare-and-swap. Readers must not assume two fields were observed
//! together; the renderer simply redraws every frame.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use crate::mode::Mode;
use crate::types::{AlarmTime, DateTime};

struct AtomicAlarmTime {
    hour: AtomicU8,
    minute: AtomicU8,
    second: AtomicU8,
}

impl AtomicAlarmTime {
    const fn new(time: AlarmTime) -> Self {
        Self {
            hour: AtomicU8::new(time.hour),
            minute: AtomicU8::new(time.minute),
            second: AtomicU8::new(time.second),
        }
    }

    fn load(&self) -> AlarmTime {
        AlarmTime {
            hour: self.hour.load(Ordering::Acquire),
            minute: self.minute.load(Ordering::Acquire),
            second: self.second.load(Ordering::Acquire),
        }
    }

    fn store(&self, time: AlarmTime) {
        self.hour.store(time.hour, Ordering::Release);
        self.minute.store(time.minute, Ordering::Release);
        self.second.store(time.second, Ordering::Release);
    }
}

struct AtomicDateTime {
    year: AtomicU16,
    month: AtomicU8,
    day: AtomicU8,
    weekday: AtomicU8,
    time: AtomicAlarmTime,
}

impl AtomicDateTime {
    const fn new(dt: DateTime) -> Self {
        Self {
            year: AtomicU16::new(dt.year),
            month: AtomicU8::new(dt.month),
            day: AtomicU8::new(dt.day),
            weekday: AtomicU8::new(dt.weekday),
            time: AtomicAlarmTime::new(AlarmTime::new(dt.hour, dt.minute, dt.second)),
        }
    }

    fn load(&self) -> DateTime {
        let time = self.time.load();
        DateTime {
            year: self.year.load(Ordering::Acquire),
            month: self.month.load(Ordering::Acquire),
            day: self.day.load(Ordering::Acquire),
            weekday: self.weekday.load(Ordering::Acquire),
            hour: time.hour,
            minute: time.minute,
            second: time.second,
        }
    }

    fn store(&self, dt: &DateTime) {
        self.year.store(dt.year, Ordering::Release);
        self.month.store(dt.month, Ordering::Release);
        self.day.store(dt.day, Ordering::Release);
        self.weekday.store(dt.weekday, Ordering::Release);
        self.time.store(dt.alarm_time());
    }
}

/// One frame's worth of shared state, as seen by the renderer.
///
/// The drafts are only meaningful while their wizard's mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub mode: Mode,
    pub cursor: u8,
    pub armed: bool,
    pub firing: bool,
    pub flash: u8,
    /// Whether the last clock commit was accepted by the peripheral.
    pub clock_committed: bool,
    /// The stored (armed or not) alarm time.
    pub alarm: AlarmTime,
    pub clock_draft: DateTime,
    pub alarm_draft: AlarmTime,
}

/// Lock-free state shared by the control and rendering contexts.
///
/// `new` is `const`, so a board crate typically keeps a single instance in
/// a `static` and hands `&'static SharedState` to both contexts.
pub struct SharedState {
    mode: AtomicU8,
    cursor: AtomicU8,
    armed: AtomicBool,
    firing: AtomicBool,
    flash: AtomicU8,
    clock_committed: AtomicBool,
    compare_pending: AtomicBool,
    alarm: AtomicAlarmTime,
    clock_draft: AtomicDateTime,
    alarm_draft: AtomicAlarmTime,
}

impl SharedState {
    /// Power-up state: top menu, alarm 08:00:00 disarmed.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(Mode::Menu.code()),
            cursor: AtomicU8::new(0),
            armed: AtomicBool::new(false),
            firing: AtomicBool::new(false),
            flash: AtomicU8::new(0),
            clock_committed: AtomicBool::new(false),
            compare_pending: AtomicBool::new(false),
            alarm: AtomicAlarmTime::new(AlarmTime::DEFAULT),
            clock_draft: AtomicDateTime::new(DateTime::DEFAULT),
            alarm_draft: AtomicAlarmTime::new(AlarmTime::DEFAULT),
        }
    }

    /// Loads every field once.
    pub fn frame(&self) -> Frame {
        Frame {
            mode: self.mode(),
            cursor: self.cursor.load(Ordering::Acquire),
            armed: self.is_armed(),
            firing: self.is_firing(),
            flash: self.flash(),
            clock_committed: self.clock_committed.load(Ordering::Acquire),
            alarm: self.alarm.load(),
            clock_draft: self.clock_draft.load(),
            alarm_draft: self.alarm_draft.load(),
        }
    }

    pub fn mode(&self) -> Mode {
        Mode::from_code(self.mode.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn is_firing(&self) -> bool {
        self.firing.load(Ordering::Acquire)
    }

    pub fn flash(&self) -> u8 {
        self.flash.load(Ordering::Acquire)
    }

    /// Records a compare match. Safe to call from the RTC interrupt.
    pub fn notify_compare_match(&self) {
        self.compare_pending.store(true, Ordering::Release);
    }

    /// Consumes a pending compare match.
    ///
    /// Two matches arriving before one is consumed coalesce into one.
    pub fn take_compare_match(&self) -> bool {
        if self.compare_pending.load(Ordering::Acquire) {
            self.compare_pending.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Renderer: stores the flicker counter.
    pub fn set_flash(&self, value: u8) {
        self.flash.store(value, Ordering::Release);
    }

    /// Controller: publishes the active mode.
    pub fn set_mode(&self, mode: Mode) {
        self.mode.store(mode.code(), Ordering::Release);
    }

    /// Controller: publishes the menu cursor.
    pub fn set_cursor(&self, cursor: u8) {
        self.cursor.store(cursor, Ordering::Release);
    }

    /// Controller: publishes the result of the last clock commit.
    pub fn set_clock_committed(&self, committed: bool) {
        self.clock_committed.store(committed, Ordering::Release);
    }

    /// Alarm engine: publishes the stored alarm time.
    pub fn set_alarm(&self, time: AlarmTime) {
        self.alarm.store(time);
    }

    /// Controller: publishes the clock-wizard draft.
    pub fn set_clock_draft(&self, draft: &DateTime) {
        self.clock_draft.store(draft);
    }

    /// Controller: publishes the alarm-wizard draft.
    pub fn set_alarm_draft(&self, draft: AlarmTime) {
        self.alarm_draft.store(draft);
    }

    /// Alarm engine: publishes the armed flag.
    pub fn set_armed(&self, armed: bool) {
        self.armed.store(armed, Ordering::Release);
    }

    /// Alarm engine: publishes the firing flag.
    pub fn set_firing(&self, firing: bool) {
        self.firing.store(firing, Ordering::Release);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
