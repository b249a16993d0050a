//! Integration tests for DisplayLoop

mod common;
use common::*;

use std::cell::Cell;

use alarm_clock_core::{
    AlarmTime, Button, ClockConfig, ClockError, ClockField, DateTime, DisplayLoop, FrameOutcome,
    Mode, RealTimeClock, SharedState, SoftRtc,
};

fn display_loop<'a>(
    rtc: &'a SoftRtc,
    shared: &'a SharedState,
) -> DisplayLoop<'a, SoftRtc, RecordingDisplay> {
    DisplayLoop::new(&ClockConfig::DEFAULT, rtc, shared, RecordingDisplay::new())
}

#[test]
fn renders_menu_at_power_up() {
    let rtc = SoftRtc::new(DateTime::DEFAULT);
    let shared = SharedState::new();
    let mut display = display_loop(&rtc, &shared);

    assert_eq!(display.render(), FrameOutcome::Shown);
    let shown = &display.display().shown;
    assert_eq!(shown[0], (8, 0, "CLOCK".to_string()));
    assert_eq!(shown[1], (8, 20, "SET CLOCK".to_string()));
    assert_eq!(shown[2], (8, 40, "ALARM".to_string()));
    assert_eq!(shown[3], (0, 0, "-".to_string()));
}

#[test]
fn clock_face_tracks_rtc_every_frame() {
    let rtc = SoftRtc::new(DateTime {
        hour: 9,
        minute: 5,
        second: 59,
        ..DateTime::DEFAULT
    });
    let shared = SharedState::new();
    shared.set_mode(Mode::Clock);
    let mut display = display_loop(&rtc, &shared);

    display.render();
    assert!(display.display().shows("01 Jul 2022"));
    assert!(display.display().shows("09:05:59"));
    assert!(display.display().shows("Friday"));

    rtc.tick_second();
    display.render();
    assert!(display.display().shows("09:06:00"));

    rtc.stop();
    display.render();
    assert!(display.display().shows("RTC NOT"));
    assert!(display.display().shows("WORKING"));

    rtc.start();
    display.render();
    assert!(display.display().shows("09:06:00"));
}

#[test]
fn editor_shows_published_draft() {
    let rtc = SoftRtc::new(DateTime::DEFAULT);
    let shared = SharedState::new();
    shared.set_clock_draft(&DateTime {
        year: 7,
        ..DateTime::DEFAULT
    });
    shared.set_mode(Mode::SetClock(ClockField::Year));
    let mut display = display_loop(&rtc, &shared);

    display.render();
    assert!(display.display().shows("YEAR"));
    assert!(display.display().shows("0007"));
}

#[test]
fn firing_message_flickers() {
    let rtc = SoftRtc::new(DateTime::DEFAULT);
    let shared = SharedState::new();
    shared.set_mode(Mode::Clock);
    shared.set_alarm(AlarmTime::new(6, 15, 0));
    shared.set_firing(true);
    let mut display = display_loop(&rtc, &shared);

    for _ in 0..8 {
        assert_eq!(display.render(), FrameOutcome::Shown);
        assert!(display.display().shows("ALARM"));
        assert!(display.display().shows("06:15:00"));
    }
    assert_eq!(shared.flash(), 8);

    assert_eq!(display.render(), FrameOutcome::Blank { hold_ms: 80 });
    assert!(display.display().is_blank());
    assert_eq!(shared.flash(), 0);

    assert_eq!(display.render(), FrameOutcome::Shown);
    assert!(display.display().shows("ALARM"));
}

#[test]
fn firing_overrides_sleep() {
    let rtc = SoftRtc::new(DateTime::DEFAULT);
    let shared = SharedState::new();
    shared.set_mode(Mode::Sleep);
    let mut display = display_loop(&rtc, &shared);

    assert_eq!(display.render(), FrameOutcome::Asleep);
    assert!(display.display().is_blank());

    shared.set_firing(true);
    assert_eq!(display.render(), FrameOutcome::Shown);
    assert!(display.display().shows("ALARM"));
}

/// Counts how often the renderer reads the clock.
struct CountingRtc {
    rtc: SoftRtc,
    reads: Cell<u32>,
}

impl RealTimeClock for CountingRtc {
    fn datetime(&self) -> Result<DateTime, ClockError> {
        self.reads.set(self.reads.get() + 1);
        self.rtc.datetime()
    }

    fn set_datetime(&self, datetime: &DateTime) -> Result<(), ClockError> {
        self.rtc.set_datetime(datetime)
    }

    fn arm_alarm(&self, time: AlarmTime) {
        self.rtc.arm_alarm(time);
    }

    fn disarm_alarm(&self) {
        self.rtc.disarm_alarm();
    }
}

#[test]
fn firing_frames_do_not_read_the_clock() {
    let rtc = CountingRtc {
        rtc: SoftRtc::new(DateTime::DEFAULT),
        reads: Cell::new(0),
    };
    let shared = SharedState::new();
    shared.set_mode(Mode::Clock);
    shared.set_firing(true);
    let mut display =
        DisplayLoop::new(&ClockConfig::DEFAULT, &rtc, &shared, RecordingDisplay::new());

    for _ in 0..9 {
        display.render();
    }
    assert_eq!(rtc.reads.get(), 0);

    shared.set_firing(false);
    display.render();
    assert_eq!(rtc.reads.get(), 1);
    assert!(display.display().shows("00:00:00"));
}

#[test]
fn follows_controller_through_clock_commit() {
    let rtc = SoftRtc::new(DateTime::DEFAULT);
    let timer = MockTimeSource::new();
    let shared = SharedState::new();
    let mut controller = controller(&rtc, &timer, &shared);
    let mut display = display_loop(&rtc, &shared);

    press_all(&mut controller, &timer, &[Button::Right, Button::Select]);
    display.render();
    assert!(display.display().shows("2022"));

    for _ in 0..7 {
        press(&mut controller, &timer, Button::Select);
    }
    display.render();
    assert!(display.display().shows("CLOCK"));
    assert!(display.display().shows("IS SET"));
}
