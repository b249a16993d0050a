//! The mode state machine driving the appliance from button edges and timers.
//!
//! Provides [`ModeController`], which owns the active [`Mode`], the menu
//! cursor, both wizard drafts, the Clock idle timer and the
//! [`AlarmEngine`]. It is a cooperative state machine: each call to
//! [`tick`](ModeController::tick) is one polling quantum, samples the buttons
//! once, applies at most one transition and returns. The control loop is
//! then just `tick` followed by a quantum delay, and tests drive `tick`
//! directly without real time passing.

use crate::alarm::{AlarmEngine, AlarmOutput, AlarmStatus};
use crate::config::ClockConfig;
use crate::input::{Button, ButtonInput, EdgeDetector};
use crate::mode::{Adjust, AlarmField, ClockField, Mode, cycle};
use crate::rtc::RealTimeClock;
use crate::shared::SharedState;
use crate::time::{Delay, TimeInstant, TimeSource};
use crate::types::{AlarmTime, ClockError, DateTime};

/// A mode change applied during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

/// The controller core of the appliance.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared peripherals and state
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `R` - Real-time clock implementation type
/// * `B` - Button input implementation type
/// * `O` - Buzzer/indicator implementation type
pub struct ModeController<'a, I, T, R, B, O>
where
    I: TimeInstant,
    T: TimeSource<I>,
    R: RealTimeClock,
    B: ButtonInput,
    O: AlarmOutput,
{
    rtc: &'a R,
    time_source: &'a T,
    shared: &'a SharedState,
    input: B,
    output: O,
    alarm: AlarmEngine<I>,
    edges: EdgeDetector,
    mode: Mode,
    cursor: u8,
    clock_draft: DateTime,
    alarm_draft: AlarmTime,
    idle: u32,
    idle_threshold: u32,
    quantum_ms: u32,
    default_datetime: DateTime,
}

impl<'a, I, T, R, B, O> ModeController<'a, I, T, R, B, O>
where
    I: TimeInstant,
    T: TimeSource<I>,
    R: RealTimeClock,
    B: ButtonInput,
    O: AlarmOutput,
{
    /// Creates a controller in the top menu with the alarm disarmed and
    /// publishes that state.
    pub fn new(
        config: &ClockConfig,
        rtc: &'a R,
        time_source: &'a T,
        shared: &'a SharedState,
        input: B,
        mut output: O,
    ) -> Self {
        output.silence();
        output.set_indicator(false);

        let alarm = AlarmEngine::new(config);
        shared.set_alarm(alarm.alarm_time());
        shared.set_armed(false);
        shared.set_firing(false);
        shared.set_clock_committed(false);

        let controller = Self {
            rtc,
            time_source,
            shared,
            input,
            output,
            alarm_draft: alarm.alarm_time(),
            alarm,
            edges: EdgeDetector::new(),
            mode: Mode::Menu,
            cursor: 0,
            clock_draft: config.datetime(),
            idle: 0,
            idle_threshold: config.idle_threshold(),
            quantum_ms: config.quantum_ms(),
            default_datetime: config.datetime(),
        };
        controller.publish();
        controller
    }

    /// Writes the compiled-in default date and time to the peripheral.
    pub fn reset_clock(&self) -> Result<(), ClockError> {
        self.rtc.set_datetime(&self.default_datetime)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    pub fn clock_draft(&self) -> &DateTime {
        &self.clock_draft
    }

    pub fn alarm_draft(&self) -> AlarmTime {
        self.alarm_draft
    }

    pub fn alarm(&self) -> &AlarmEngine<I> {
        &self.alarm
    }

    /// Clock-mode quanta counted towards SleepMode.
    pub fn idle_ticks(&self) -> u32 {
        self.idle
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn input_mut(&mut self) -> &mut B {
        &mut self.input
    }

    /// Runs one polling quantum.
    ///
    /// Returns the mode transition applied, if any.
    pub fn tick(&mut self) -> Option<Transition> {
        let levels = self.input.sample();
        let now = self.time_source.now();

        if self.shared.take_compare_match() {
            self.alarm.fire(now, self.shared, &mut self.output);
        }

        match self.alarm.service(
            levels.contains(Button::Select),
            now,
            self.shared,
            &mut self.output,
        ) {
            AlarmStatus::Quiet => {}
            AlarmStatus::Ringing | AlarmStatus::Settling => return None,
            AlarmStatus::Stopped(_) => {
                self.edges.latch(levels);
                return None;
            }
        }

        let pressed = self.edges.update(levels);
        let from = self.mode;

        if let Some(button) = pressed.first() {
            trace!("button {}", button);
            self.handle(button);
        }

        if from == Mode::Clock && self.mode == Mode::Clock {
            self.idle += 1;
            if self.idle >= self.idle_threshold {
                self.enter(Mode::Sleep);
            }
        }

        self.publish();

        if self.mode == from {
            None
        } else {
            debug!("mode {} -> {}", from, self.mode);
            Some(Transition {
                from,
                to: self.mode,
            })
        }
    }

    /// Runs the control loop forever, one [`tick`](Self::tick) per quantum.
    pub fn run<D: Delay>(&mut self, delay: &mut D) -> ! {
        loop {
            self.tick();
            delay.delay_ms(self.quantum_ms);
        }
    }

    fn handle(&mut self, button: Button) {
        match self.mode {
            Mode::Menu => self.handle_menu(button),
            Mode::Clock => {
                if button == Button::Back {
                    self.enter(Mode::Menu);
                }
            }
            Mode::Sleep => self.enter(Mode::Clock),
            Mode::SetClock(field) => self.handle_clock_field(field, button),
            Mode::AlarmMenu => self.handle_alarm_menu(button),
            Mode::SetAlarm(field) => self.handle_alarm_field(field, button),
            confirmation => {
                debug_assert!(confirmation.is_confirmation());
                if button == Button::Select {
                    self.enter(Mode::Clock);
                }
            }
        }
    }

    fn handle_menu(&mut self, button: Button) {
        let last = Mode::Menu.menu_len().unwrap_or(1) as u16 - 1;
        match button {
            Button::Left => self.cursor = cycle(self.cursor as u16, 0, last, Adjust::Down) as u8,
            Button::Right => self.cursor = cycle(self.cursor as u16, 0, last, Adjust::Up) as u8,
            Button::Select => match self.cursor {
                0 => self.enter(Mode::Clock),
                1 => {
                    self.clock_draft = match self.rtc.datetime() {
                        Ok(now) => now,
                        Err(_) => {
                            warn!("clock unreadable, editing from the default date");
                            self.default_datetime
                        }
                    };
                    self.enter(Mode::SetClock(ClockField::Year));
                }
                _ => self.enter(Mode::AlarmMenu),
            },
            Button::Back => {}
        }
    }

    fn handle_clock_field(&mut self, field: ClockField, button: Button) {
        match button {
            Button::Left => field.adjust(&mut self.clock_draft, Adjust::Down),
            Button::Right => field.adjust(&mut self.clock_draft, Adjust::Up),
            Button::Select => match field.next() {
                Some(next) => {
                    if next == ClockField::Day {
                        self.clock_draft.clamp_day();
                    }
                    self.enter(Mode::SetClock(next));
                }
                None => self.commit_clock(),
            },
            Button::Back => match field.prev() {
                Some(prev) => self.enter(Mode::SetClock(prev)),
                None => self.enter(Mode::Menu),
            },
        }
    }

    fn commit_clock(&mut self) {
        let committed = match self.rtc.set_datetime(&self.clock_draft) {
            Ok(()) => true,
            Err(_) => {
                warn!("clock rejected {}", self.clock_draft);
                false
            }
        };
        self.shared.set_clock_committed(committed);
        self.enter(Mode::SetConfirmed);
    }

    fn handle_alarm_menu(&mut self, button: Button) {
        match button {
            Button::Left | Button::Right => self.cursor = 1 - self.cursor.min(1),
            Button::Select => {
                if self.cursor == 0 {
                    if self.alarm.is_armed() {
                        self.alarm.disarm(self.rtc, self.shared);
                    } else {
                        let time = self.alarm.alarm_time();
                        self.alarm.arm(self.rtc, self.shared, time);
                    }
                    self.enter(Mode::AlarmDisabledConfirmed);
                } else {
                    self.alarm_draft = self.alarm.alarm_time();
                    self.enter(Mode::SetAlarm(AlarmField::Hour));
                }
            }
            Button::Back => self.enter(Mode::Menu),
        }
    }

    fn handle_alarm_field(&mut self, field: AlarmField, button: Button) {
        match button {
            Button::Left => field.adjust(&mut self.alarm_draft, Adjust::Down),
            Button::Right => field.adjust(&mut self.alarm_draft, Adjust::Up),
            Button::Select => match field.next() {
                Some(next) => self.enter(Mode::SetAlarm(next)),
                None => {
                    self.alarm.arm(self.rtc, self.shared, self.alarm_draft);
                    self.enter(Mode::SetAlarmConfirmed);
                }
            },
            Button::Back => match field.prev() {
                Some(prev) => self.enter(Mode::SetAlarm(prev)),
                None => self.enter(Mode::Menu),
            },
        }
    }

    fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.cursor = 0;
        self.idle = 0;
    }

    fn publish(&self) {
        self.shared.set_clock_draft(&self.clock_draft);
        self.shared.set_alarm_draft(self.alarm_draft);
        self.shared.set_cursor(self.cursor);
        self.shared.set_mode(self.mode);
    }
}
