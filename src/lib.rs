#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Mode`**: The active UI mode; the only thing deciding input routing and rendering
//! - **`ModeController`**: Runs one polling quantum per `tick()`: buttons, alarm, idle timer
//! - **`AlarmEngine`**: Armed state plus the bounded, acknowledgeable ring protocol
//! - **`SharedState`**: Lock-free, single-writer-per-field state read by the renderer
//! - **`DisplayLoop`** / **`Screen`**: Turn a `Frame` of shared state into display text
//! - **`RealTimeClock`**, **`ButtonInput`**, **`AlarmOutput`**, **`TextDisplay`**: Traits
//!   to implement for your hardware
//! - **`TimeSource`** / **`Delay`**: Traits to implement for your timing system
//!
//! Hardware is only reached through these traits, so the whole control core
//! runs and is tested on the host.

#[macro_use]
mod log;

pub mod alarm;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod display;
pub mod input;
pub mod mode;
pub mod rtc;
pub mod shared;
pub mod time;
pub mod types;

pub use alarm::{AlarmEngine, AlarmOutput, AlarmState, AlarmStatus, StopReason};
pub use calendar::{days_in_month, is_leap_year};
pub use config::{ClockConfig, ClockConfigBuilder, ConfigError};
pub use controller::{ModeController, Transition};
pub use display::{DisplayLoop, FrameOutcome, Screen, TextDisplay};
pub use input::{Button, ButtonInput, ButtonSet, DebouncedButtons, EdgeDetector, RawButtons};
pub use mode::{Adjust, AlarmField, ClockField, Mode};
pub use rtc::{RealTimeClock, SoftRtc};
pub use shared::{Frame, SharedState};
pub use time::{Delay, TimeDuration, TimeInstant, TimeSource};
pub use types::{AlarmTime, ClockError, DateTime};
