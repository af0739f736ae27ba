//! Glint Animation System
//!
//! Timing building blocks for the page effects.
//!
//! # Features
//!
//! - **Easing**: CSS-compatible timing curves, usable both numerically and as CSS text
//! - **Ramps**: fixed-duration, frame-sampled eased interpolation
//! - **Timer queue**: virtual-time scheduling so animations can be driven by manual ticks
//! - **Delay sources**: injectable randomness for jittered timing

pub mod easing;
pub mod jitter;
pub mod ramp;
pub mod scheduler;

pub use easing::Easing;
pub use jitter::{DelaySource, FixedDelay, RandomDelay, SequenceDelay};
pub use ramp::Ramp;
pub use scheduler::{TimerId, TimerQueue};
