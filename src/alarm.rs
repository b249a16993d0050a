//! Alarm engine: armed state and the fire/acknowledge protocol.
//!
//! ```text
//!            arm()                 compare match
//!  Disarmed ───────► Armed ─────────────────────► Firing
//!     ▲   ◄───────     ▲                            │
//!     │   disarm()     │  Select press+release      │
//!     │                └──── or ring time-out ──────┘
//! ```
//!
//! While firing, the engine is serviced once per control quantum: it keeps
//! the tone going and watches the Select level for a press followed by a
//! release. The ring is bounded by `max_ring_secs`; when it stops the engine
//! applies a short settle period during which the controller ignores input.

use crate::config::ClockConfig;
use crate::rtc::RealTimeClock;
use crate::shared::SharedState;
use crate::time::{TimeDuration, TimeInstant};
use crate::types::AlarmTime;

/// Trait for abstracting the buzzer and the alarm indicator LED.
pub trait AlarmOutput {
    /// Drives the buzzer at `frequency_hz` for the current quantum.
    fn tone(&mut self, frequency_hz: u32);

    /// Stops the buzzer.
    fn silence(&mut self);

    /// Switches the alarm indicator LED.
    fn set_indicator(&mut self, on: bool);
}

/// Externally visible state of the alarm engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// No compare registration.
    Disarmed,
    /// Installed in the peripheral, waiting for a compare match.
    Armed,
    /// Ringing until acknowledged or timed out.
    Firing,
}

/// Why a ring ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// Select was pressed and released.
    Acknowledged,
    /// The ring reached its maximum duration.
    TimedOut,
}

/// Result of servicing the engine for one quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmStatus {
    /// Not ringing; the controller handles input normally.
    Quiet,
    /// Ringing; buttons belong to the acknowledgement protocol.
    Ringing,
    /// The ring ended during this quantum.
    Stopped(StopReason),
    /// Post-ring settle quantum; input is ignored.
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AckPhase {
    AwaitPress,
    AwaitRelease,
}

#[derive(Debug, Clone, Copy)]
struct Ring<I> {
    started: I,
    phase: AckPhase,
}

/// Owns the armed flag, the stored alarm time and the ring protocol.
///
/// # Type Parameters
/// * `I` - Time instant type used to bound the ring duration
pub struct AlarmEngine<I: TimeInstant> {
    time: AlarmTime,
    armed: bool,
    ring: Option<Ring<I>>,
    settle: u8,
    max_ring_ms: u64,
    tone_hz: u32,
    settle_quanta: u8,
}

impl<I: TimeInstant> AlarmEngine<I> {
    /// Creates a disarmed engine holding the configured power-up alarm time.
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            time: config.alarm(),
            armed: false,
            ring: None,
            settle: 0,
            max_ring_ms: config.max_ring_ms(),
            tone_hz: config.tone_hz(),
            settle_quanta: config.settle_quanta(),
        }
    }

    pub fn state(&self) -> AlarmState {
        if self.ring.is_some() {
            AlarmState::Firing
        } else if self.armed {
            AlarmState::Armed
        } else {
            AlarmState::Disarmed
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_firing(&self) -> bool {
        self.ring.is_some()
    }

    /// The stored alarm time, armed or not.
    pub fn alarm_time(&self) -> AlarmTime {
        self.time
    }

    /// Stores `time`, installs it in the peripheral and arms.
    ///
    /// Arming an armed engine replaces the installed time; the state stays `Armed`.
    pub fn arm<R: RealTimeClock>(&mut self, rtc: &R, shared: &SharedState, time: AlarmTime) {
        self.time = time;
        rtc.arm_alarm(time);
        self.armed = true;
        shared.set_alarm(time);
        shared.set_armed(true);
        info!("alarm armed for {}", time);
    }

    /// Removes the peripheral registration and disarms.
    ///
    /// A ring already in progress is not interrupted; it runs its protocol
    /// to completion and the engine then rests in `Disarmed`.
    pub fn disarm<R: RealTimeClock>(&mut self, rtc: &R, shared: &SharedState) {
        rtc.disarm_alarm();
        self.armed = false;
        shared.set_armed(false);
        info!("alarm disarmed");
    }

    /// Handles a compare match: starts ringing if armed and not already ringing.
    ///
    /// Returns true if a ring started.
    pub fn fire<O: AlarmOutput>(&mut self, now: I, shared: &SharedState, output: &mut O) -> bool {
        if !self.armed || self.ring.is_some() {
            trace!("compare match ignored");
            return false;
        }

        self.ring = Some(Ring {
            started: now,
            phase: AckPhase::AwaitPress,
        });
        self.settle = 0;
        shared.set_flash(0);
        shared.set_firing(true);
        output.set_indicator(true);
        info!("alarm fired");
        true
    }

    /// Services the engine for one quantum.
    ///
    /// `select_held` is the current Select level.
    pub fn service<O: AlarmOutput>(
        &mut self,
        select_held: bool,
        now: I,
        shared: &SharedState,
        output: &mut O,
    ) -> AlarmStatus {
        if let Some(mut ring) = self.ring {
            if now.duration_since(ring.started).as_millis() >= self.max_ring_ms {
                return self.stop(StopReason::TimedOut, shared, output);
            }

            match ring.phase {
                AckPhase::AwaitPress if select_held => ring.phase = AckPhase::AwaitRelease,
                AckPhase::AwaitRelease if !select_held => {
                    return self.stop(StopReason::Acknowledged, shared, output);
                }
                _ => {}
            }

            self.ring = Some(ring);
            output.tone(self.tone_hz);
            return AlarmStatus::Ringing;
        }

        if self.settle > 0 {
            self.settle -= 1;
            return AlarmStatus::Settling;
        }

        AlarmStatus::Quiet
    }

    fn stop<O: AlarmOutput>(
        &mut self,
        reason: StopReason,
        shared: &SharedState,
        output: &mut O,
    ) -> AlarmStatus {
        output.silence();
        output.set_indicator(false);
        self.ring = None;
        self.settle = self.settle_quanta;
        shared.set_firing(false);
        shared.set_flash(0);
        info!("alarm stopped: {}", reason);
        AlarmStatus::Stopped(reason)
    }
}
