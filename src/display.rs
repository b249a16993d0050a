//! Rendering context: maps shared state to text on the display.
//!
//! The renderer never mutates control state. Its only write is the flicker
//! counter used while the alarm is firing.

use core::fmt::Write;
use heapless::{String, Vec};

use crate::calendar::{month_abbrev, weekday_name};
use crate::config::ClockConfig;
use crate::mode::{AlarmField, ClockField, Mode};
use crate::rtc::RealTimeClock;
use crate::shared::{Frame, SharedState};
use crate::time::Delay;
use crate::types::{AlarmTime, ClockError, DateTime};

/// Longest line any screen prints.
pub const LINE_CAPACITY: usize = 16;

/// Most lines any screen prints.
pub const MAX_LINES: usize = 4;

/// Horizontal offsets centring each weekday name on the clock face.
const WEEKDAY_X: [u8; 7] = [28, 24, 22, 8, 18, 32, 20];

/// Trait for abstracting the character display driver.
pub trait TextDisplay {
    /// Clears the frame buffer.
    fn clear(&mut self);

    /// Writes `text` into the frame buffer at pixel position (`x`, `y`).
    fn print(&mut self, x: u8, y: u8, text: &str);

    /// Pushes the frame buffer to the panel.
    fn show(&mut self);
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub x: u8,
    pub y: u8,
    pub text: String<LINE_CAPACITY>,
}

/// Display content for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    lines: Vec<Text, MAX_LINES>,
}

impl Screen {
    /// An empty screen.
    pub fn blank() -> Self {
        Self { lines: Vec::new() }
    }

    /// The firing message for the alarm set at `time`.
    pub fn alarm(time: AlarmTime) -> Self {
        let mut screen = Self::blank();
        screen.push(32, 8, "ALARM");
        screen.push_time(20, 32, time);
        screen
    }

    /// Builds the screen for `frame`. `now` is the clock as read this frame.
    pub fn from_frame(frame: &Frame, now: Result<DateTime, ClockError>) -> Self {
        if frame.firing {
            return Self::alarm(frame.alarm);
        }

        let mut screen = Self::blank();

        match frame.mode {
            Mode::Menu => {
                screen.push(8, 0, "CLOCK");
                screen.push(8, 20, "SET CLOCK");
                screen.push(8, 40, "ALARM");
                screen.push_cursor(frame.cursor);
            }
            Mode::AlarmMenu => {
                screen.push(8, 0, if frame.armed { "DISABLE" } else { "ENABLE" });
                screen.push(8, 20, "SET");
                screen.push_cursor(frame.cursor);
            }
            Mode::AlarmDisabledConfirmed => {
                screen.push(12, 8, "ALARM IS");
                if frame.armed {
                    screen.push(14, 32, "ENABLED");
                } else {
                    screen.push(12, 32, "DISABLED");
                }
            }
            Mode::Clock => match now {
                Ok(now) => {
                    let mut date = String::<LINE_CAPACITY>::new();
                    let _ = write!(
                        date,
                        "{:02} {} {:04}",
                        now.day,
                        month_abbrev(now.month),
                        now.year
                    );
                    screen.push(2, 0, &date);
                    screen.push_time(16, 20, now.alarm_time());
                    let x = WEEKDAY_X.get(now.weekday as usize).copied().unwrap_or(0);
                    screen.push(x, 40, weekday_name(now.weekday));
                }
                Err(_) => {
                    screen.push(24, 8, "RTC NOT");
                    screen.push(24, 32, "WORKING");
                }
            },
            Mode::SetClock(field) => {
                let draft = &frame.clock_draft;
                let mut value = String::<LINE_CAPACITY>::new();
                let title = match field {
                    ClockField::Year => {
                        let _ = write!(value, "{:04}", draft.year);
                        "YEAR"
                    }
                    ClockField::Month => {
                        let _ = value.push_str(month_abbrev(draft.month));
                        "MONTH"
                    }
                    ClockField::Day => {
                        let _ = write!(value, "{:02}", draft.day);
                        "DAY"
                    }
                    ClockField::Weekday => {
                        let _ = value.push_str(weekday_name(draft.weekday));
                        "WEEKDAY"
                    }
                    ClockField::Hour => {
                        let _ = write!(value, "{:02}", draft.hour);
                        "HOUR"
                    }
                    ClockField::Minute => {
                        let _ = write!(value, "{:02}", draft.minute);
                        "MIN"
                    }
                    ClockField::Second => {
                        let _ = write!(value, "{:02}", draft.second);
                        "SEC"
                    }
                };
                screen.push(8, 8, title);
                screen.push(8, 28, &value);
            }
            Mode::SetConfirmed => {
                if frame.clock_committed {
                    screen.push(30, 8, "CLOCK");
                    screen.push(30, 32, "IS SET");
                } else {
                    screen.push(8, 8, "INVALID");
                    screen.push(24, 32, "DATE");
                }
            }
            Mode::SetAlarm(field) => {
                let title = match field {
                    AlarmField::Hour => "ALARM HOUR",
                    AlarmField::Minute => "ALARM MIN",
                    AlarmField::Second => "ALARM SEC",
                };
                let mut value = String::<LINE_CAPACITY>::new();
                let _ = write!(value, "{:02}", field.value(&frame.alarm_draft));
                screen.push(0, 8, title);
                screen.push(0, 28, &value);
            }
            Mode::SetAlarmConfirmed => {
                screen.push(30, 8, "ALARM");
                screen.push(30, 32, "IS SET");
            }
            Mode::Sleep => {}
        }

        screen
    }

    pub fn lines(&self) -> &[Text] {
        &self.lines
    }

    pub fn is_blank(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns true if some line reads exactly `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line.text.as_str() == text)
    }

    /// Clears the display, prints every line and pushes the frame.
    pub fn draw<D: TextDisplay>(&self, display: &mut D) {
        display.clear();
        for line in &self.lines {
            display.print(line.x, line.y, &line.text);
        }
        display.show();
    }

    fn push(&mut self, x: u8, y: u8, text: &str) {
        let mut line = String::<LINE_CAPACITY>::new();
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        let _ = self.lines.push(Text { x, y, text: line });
    }

    fn push_time(&mut self, x: u8, y: u8, time: AlarmTime) {
        let mut text = String::<LINE_CAPACITY>::new();
        let _ = write!(text, "{:02}:{:02}:{:02}", time.hour, time.minute, time.second);
        self.push(x, y, &text);
    }

    fn push_cursor(&mut self, cursor: u8) {
        self.push(0, cursor.saturating_mul(20), "-");
    }
}

/// What a call to [`DisplayLoop::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// A frame was drawn.
    Shown,
    /// The firing screen flickered off; hold the blank for `hold_ms`.
    Blank { hold_ms: u32 },
    /// The display was blanked for SleepMode.
    Asleep,
}

/// The rendering context's loop body.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared clock and state
/// * `R` - Real-time clock implementation type
/// * `D` - Display implementation type
pub struct DisplayLoop<'a, R: RealTimeClock, D: TextDisplay> {
    rtc: &'a R,
    shared: &'a SharedState,
    display: D,
    visible_frames: u8,
    blank_ms: u32,
    quantum_ms: u32,
}

impl<'a, R: RealTimeClock, D: TextDisplay> DisplayLoop<'a, R, D> {
    pub fn new(config: &ClockConfig, rtc: &'a R, shared: &'a SharedState, display: D) -> Self {
        Self {
            rtc,
            shared,
            display,
            visible_frames: config.flash_visible_frames(),
            blank_ms: config.flash_blank_ms(),
            quantum_ms: config.quantum_ms(),
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Renders one frame from the current shared state.
    ///
    /// While the alarm fires, the message is shown for the configured
    /// number of frames and then blanked once, after which the flicker
    /// counter starts over.
    pub fn render(&mut self) -> FrameOutcome {
        let frame = self.shared.frame();

        if frame.firing {
            if frame.flash < self.visible_frames {
                self.shared.set_flash(frame.flash + 1);
                Screen::alarm(frame.alarm).draw(&mut self.display);
                return FrameOutcome::Shown;
            }
            Screen::blank().draw(&mut self.display);
            self.shared.set_flash(0);
            return FrameOutcome::Blank {
                hold_ms: self.blank_ms,
            };
        }

        if frame.mode == Mode::Sleep {
            Screen::blank().draw(&mut self.display);
            return FrameOutcome::Asleep;
        }

        Screen::from_frame(&frame, self.rtc.datetime()).draw(&mut self.display);
        FrameOutcome::Shown
    }

    /// Runs the display loop forever.
    ///
    /// Shown frames are not delayed; the display transfer paces the loop.
    pub fn run<L: Delay>(&mut self, delay: &mut L) -> ! {
        loop {
            match self.render() {
                FrameOutcome::Shown => {}
                FrameOutcome::Blank { hold_ms } => delay.delay_ms(hold_ms),
                FrameOutcome::Asleep => {
                    while self.shared.mode() == Mode::Sleep && !self.shared.is_firing() {
                        delay.delay_ms(self.quantum_ms);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(mode: Mode) -> Frame {
        let mut frame = SharedState::new().frame();
        frame.mode = mode;
        frame
    }

    #[test]
    fn menu_cursor_follows_index() {
        let mut menu = frame(Mode::Menu);
        menu.cursor = 2;
        let screen = Screen::from_frame(&menu, Ok(DateTime::DEFAULT));
        assert!(screen.contains("SET CLOCK"));
        let cursor = screen.lines().iter().find(|line| line.text.as_str() == "-").unwrap();
        assert_eq!((cursor.x, cursor.y), (0, 40));
    }

    #[test]
    fn clock_face() {
        let screen = Screen::from_frame(&frame(Mode::Clock), Ok(DateTime::DEFAULT));
        assert!(screen.contains("01 Jul 2022"));
        assert!(screen.contains("00:00:00"));
        let weekday = &screen.lines()[2];
        assert_eq!((weekday.x, weekday.text.as_str()), (32, "Friday"));
    }

    #[test]
    fn unreadable_clock() {
        let screen = Screen::from_frame(
            &frame(Mode::Clock),
            Err(ClockError::PeripheralUnavailable),
        );
        assert!(screen.contains("RTC NOT"));
        assert!(screen.contains("WORKING"));
    }

    #[test]
    fn alarm_menu_offers_opposite_of_armed() {
        let mut alarm_menu = frame(Mode::AlarmMenu);
        assert!(Screen::from_frame(&alarm_menu, Ok(DateTime::DEFAULT)).contains("ENABLE"));
        alarm_menu.armed = true;
        assert!(Screen::from_frame(&alarm_menu, Ok(DateTime::DEFAULT)).contains("DISABLE"));
    }

    #[test]
    fn editors_show_draft() {
        let mut editor = frame(Mode::SetClock(ClockField::Month));
        editor.clock_draft.month = 2;
        let screen = Screen::from_frame(&editor, Ok(DateTime::DEFAULT));
        assert!(screen.contains("MONTH"));
        assert!(screen.contains("Feb"));

        let mut editor = frame(Mode::SetAlarm(AlarmField::Minute));
        editor.alarm_draft = AlarmTime::new(7, 5, 0);
        let screen = Screen::from_frame(&editor, Ok(DateTime::DEFAULT));
        assert!(screen.contains("ALARM MIN"));
        assert!(screen.contains("05"));
    }

    #[test]
    fn rejected_commit_reads_invalid_date() {
        let confirmed = frame(Mode::SetConfirmed);
        let screen = Screen::from_frame(&confirmed, Ok(DateTime::DEFAULT));
        assert!(screen.contains("INVALID"));
        assert!(screen.contains("DATE"));
    }

    #[test]
    fn firing_overrides_mode() {
        let mut firing = frame(Mode::Menu);
        firing.firing = true;
        firing.alarm = AlarmTime::new(6, 30, 0);
        let screen = Screen::from_frame(&firing, Ok(DateTime::DEFAULT));
        assert!(screen.contains("ALARM"));
        assert!(screen.contains("06:30:00"));
        assert!(!screen.contains("SET CLOCK"));
        assert_eq!(screen, Screen::alarm(firing.alarm));
    }

    #[test]
    fn sleep_is_blank() {
        assert!(Screen::from_frame(&frame(Mode::Sleep), Ok(DateTime::DEFAULT)).is_blank());
    }
}
