//! Compiled-in tunables.
//!
//! The appliance has no runtime or persisted settings: every value here is
//! fixed at build time and all state resets to these defaults on power-up.
//! All delays are a polling quantum multiplied by a count.

use crate::types::{AlarmTime, DateTime};

/// Timing and power-up defaults for the controller, alarm engine and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    quantum_ms: u32,
    idle_timeout_ms: u32,
    max_ring_secs: u32,
    tone_hz: u32,
    settle_quanta: u8,
    flash_visible_frames: u8,
    flash_blank_ms: u32,
    alarm: AlarmTime,
    datetime: DateTime,
}

impl ClockConfig {
    /// The appliance's factory settings.
    pub const DEFAULT: ClockConfig = ClockConfig {
        quantum_ms: 20,
        idle_timeout_ms: 10_000,
        max_ring_secs: 60,
        tone_hz: 466,
        settle_quanta: 1,
        flash_visible_frames: 8,
        flash_blank_ms: 80,
        alarm: AlarmTime::DEFAULT,
        datetime: DateTime::DEFAULT,
    };

    /// Creates a builder seeded with [`ClockConfig::DEFAULT`].
    pub fn builder() -> ClockConfigBuilder {
        ClockConfigBuilder::new()
    }

    /// Polling quantum in milliseconds.
    pub fn quantum_ms(&self) -> u32 {
        self.quantum_ms
    }

    /// Number of Clock-mode quanta before entering SleepMode. Only Back
    /// (leaving the clock face) resets the count.
    pub fn idle_threshold(&self) -> u32 {
        self.idle_timeout_ms / self.quantum_ms
    }

    /// Upper bound on a single alarm ring, in milliseconds.
    pub fn max_ring_ms(&self) -> u64 {
        self.max_ring_secs as u64 * 1000
    }

    /// Buzzer tone frequency.
    pub fn tone_hz(&self) -> u32 {
        self.tone_hz
    }

    /// Quanta of input blackout after an alarm stops.
    pub fn settle_quanta(&self) -> u8 {
        self.settle_quanta
    }

    /// Frames the alarm screen stays visible between blank gaps.
    pub fn flash_visible_frames(&self) -> u8 {
        self.flash_visible_frames
    }

    /// Length of each blank gap of the alarm flicker.
    pub fn flash_blank_ms(&self) -> u32 {
        self.flash_blank_ms
    }

    /// Alarm time stored at power-up.
    pub fn alarm(&self) -> AlarmTime {
        self.alarm
    }

    /// Clock value written to the peripheral at power-up.
    pub fn datetime(&self) -> DateTime {
        self.datetime
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Quantum of zero milliseconds.
    ZeroQuantum,

    /// Idle timeout shorter than one quantum.
    IdleTimeoutTooShort,

    /// Alarm ring bound of zero seconds.
    ZeroRingDuration,

    /// Buzzer tone of zero hertz.
    ZeroTone,

    /// Alarm flicker with no visible frames.
    ZeroFlashFrames,

    /// Power-up alarm time out of range.
    InvalidAlarm,

    /// Power-up date/time out of range.
    InvalidDateTime,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroQuantum => write!(f, "polling quantum must be non-zero"),
            ConfigError::IdleTimeoutTooShort => {
                write!(f, "idle timeout must be at least one quantum")
            }
            ConfigError::ZeroRingDuration => write!(f, "alarm ring duration must be non-zero"),
            ConfigError::ZeroTone => write!(f, "buzzer tone must be non-zero"),
            ConfigError::ZeroFlashFrames => {
                write!(f, "alarm flicker needs at least one visible frame")
            }
            ConfigError::InvalidAlarm => write!(f, "default alarm time is out of range"),
            ConfigError::InvalidDateTime => write!(f, "default date/time is out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Builder for validated [`ClockConfig`] values.
#[derive(Debug, Clone, Copy)]
pub struct ClockConfigBuilder {
    config: ClockConfig,
}

impl ClockConfigBuilder {
    /// Creates a builder holding the factory settings.
    pub fn new() -> Self {
        Self {
            config: ClockConfig::DEFAULT,
        }
    }

    pub fn quantum_ms(mut self, ms: u32) -> Self {
        self.config.quantum_ms = ms;
        self
    }

    pub fn idle_timeout_ms(mut self, ms: u32) -> Self {
        self.config.idle_timeout_ms = ms;
        self
    }

    pub fn max_ring_secs(mut self, secs: u32) -> Self {
        self.config.max_ring_secs = secs;
        self
    }

    pub fn tone_hz(mut self, hz: u32) -> Self {
        self.config.tone_hz = hz;
        self
    }

    pub fn settle_quanta(mut self, quanta: u8) -> Self {
        self.config.settle_quanta = quanta;
        self
    }

    /// Sets the alarm flicker cadence: visible frames, then a blank gap.
    pub fn flash(mut self, visible_frames: u8, blank_ms: u32) -> Self {
        self.config.flash_visible_frames = visible_frames;
        self.config.flash_blank_ms = blank_ms;
        self
    }

    pub fn alarm(mut self, alarm: AlarmTime) -> Self {
        self.config.alarm = alarm;
        self
    }

    pub fn datetime(mut self, datetime: DateTime) -> Self {
        self.config.datetime = datetime;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn build(self) -> Result<ClockConfig, ConfigError> {
        let c = self.config;
        if c.quantum_ms == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if c.idle_timeout_ms < c.quantum_ms {
            return Err(ConfigError::IdleTimeoutTooShort);
        }
        if c.max_ring_secs == 0 {
            return Err(ConfigError::ZeroRingDuration);
        }
        if c.tone_hz == 0 {
            return Err(ConfigError::ZeroTone);
        }
        if c.flash_visible_frames == 0 {
            return Err(ConfigError::ZeroFlashFrames);
        }
        if !c.alarm.is_valid() {
            return Err(ConfigError::InvalidAlarm);
        }
        if !c.datetime.is_valid() {
            return Err(ConfigError::InvalidDateTime);
        }
        Ok(c)
    }
}

impl Default for ClockConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
