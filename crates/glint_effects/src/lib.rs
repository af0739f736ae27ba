//! Glint Effects
//!
//! The page effects, each written against the [`Document`](glint_core::Document)
//! capability and driven by visibility triggers and a virtual-time task queue:
//!
//! - [`RevealEngine`]: fade and slide elements in, staggered by sibling order
//! - [`CounterEngine`]: ramp stat counters up to their target with an ease-out curve
//! - [`TypewriterEngine`]: type pre-authored code lines character by character
//! - [`ParallaxEngine`]: shift decorative glows with the pointer
//!
//! Engines never call each other. The owner routes [`Trigger`]s from the
//! visibility observer to the matching engine and dispatches due [`Task`]s.

pub mod counter;
pub mod parallax;
pub mod reveal;
pub mod task;
pub mod typewriter;

pub use counter::{parse_target, CounterConfig, CounterEngine, CounterState, CounterTarget};
pub use parallax::{glow_offset, ParallaxConfig, ParallaxEngine};
pub use reveal::{
    sibling_index, RevealConfig, RevealEngine, RevealState, RevealTarget, StyleSnapshot,
};
pub use task::{Task, TaskQueue, Trigger, TriggerObserver};
pub use typewriter::{
    Step, Typewriter, TypewriterConfig, TypewriterCursor, TypewriterEngine, TypewriterLine,
    TypewriterPhase, TypewriterTiming, CURSOR_MARKUP, DEFAULT_SNIPPET,
};
