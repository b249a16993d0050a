//! Shared test infrastructure for alarm-clock-core integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use alarm_clock_core::{
    AlarmOutput, Button, ButtonInput, ButtonSet, ClockConfig, DateTime, ModeController,
    RealTimeClock, SharedState, SoftRtc, TextDisplay, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Buttons
// ============================================================================

/// Buttons whose held levels are set directly by the test
#[derive(Default)]
pub struct ScriptedButtons {
    levels: ButtonSet,
}

impl ScriptedButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, button: Button) {
        self.levels.set(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.levels.set(button, false);
    }

    pub fn release_all(&mut self) {
        self.levels = ButtonSet::EMPTY;
    }
}

impl ButtonInput for ScriptedButtons {
    fn sample(&mut self) -> ButtonSet {
        self.levels
    }
}

// ============================================================================
// Mock Buzzer / Indicator
// ============================================================================

/// Alarm output that records what the engine asked for
#[derive(Default)]
pub struct RecordingOutput {
    pub tone_quanta: u32,
    pub last_tone_hz: Option<u32>,
    pub silenced: u32,
    pub indicator: bool,
}

impl AlarmOutput for RecordingOutput {
    fn tone(&mut self, frequency_hz: u32) {
        self.tone_quanta += 1;
        self.last_tone_hz = Some(frequency_hz);
    }

    fn silence(&mut self) {
        self.silenced += 1;
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator = on;
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Text display that keeps the most recently shown frame
#[derive(Default)]
pub struct RecordingDisplay {
    pending: Vec<(u8, u8, String)>,
    pub shown: Vec<(u8, u8, String)>,
    pub frames: u32,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shows(&self, text: &str) -> bool {
        self.shown.iter().any(|(_, _, line)| line == text)
    }

    pub fn is_blank(&self) -> bool {
        self.shown.is_empty()
    }
}

impl TextDisplay for RecordingDisplay {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn print(&mut self, x: u8, y: u8, text: &str) {
        self.pending.push((x, y, text.to_string()));
    }

    fn show(&mut self) {
        self.shown = self.pending.clone();
        self.frames += 1;
    }
}

// ============================================================================
// Test Harness
// ============================================================================

pub type TestController<'a, R = SoftRtc> =
    ModeController<'a, TestInstant, MockTimeSource, R, ScriptedButtons, RecordingOutput>;

/// One quantum of the default configuration, in milliseconds
pub const QUANTUM: u64 = 20;

pub fn controller<'a, R: RealTimeClock>(
    rtc: &'a R,
    timer: &'a MockTimeSource,
    shared: &'a SharedState,
) -> TestController<'a, R> {
    ModeController::new(
        &ClockConfig::DEFAULT,
        rtc,
        timer,
        shared,
        ScriptedButtons::new(),
        RecordingOutput::default(),
    )
}

/// Presses and releases `button`, one quantum each
pub fn press<R: RealTimeClock>(
    controller: &mut TestController<'_, R>,
    timer: &MockTimeSource,
    button: Button,
) {
    controller.input_mut().hold(button);
    step(controller, timer);
    controller.input_mut().release(button);
    step(controller, timer);
}

/// Presses each button in turn
pub fn press_all<R: RealTimeClock>(
    controller: &mut TestController<'_, R>,
    timer: &MockTimeSource,
    buttons: &[Button],
) {
    for &button in buttons {
        press(controller, timer, button);
    }
}

/// Advances mock time one quantum and ticks
pub fn step<R: RealTimeClock>(controller: &mut TestController<'_, R>, timer: &MockTimeSource) {
    timer.advance(TestDuration(QUANTUM));
    controller.tick();
}

pub fn date(year: u16, month: u8, day: u8, weekday: u8) -> DateTime {
    DateTime {
        year,
        month,
        day,
        weekday,
        hour: 0,
        minute: 0,
        second: 0,
    }
}
