//! Glint Viewport
//!
//! Viewport geometry and push-based visibility tracking.
//!
//! The host reports viewport changes (scroll, resize); a [`VisibilityObserver`]
//! evaluates its registered elements against the new viewport and hands back
//! each element's payload the first time it becomes visible enough. Nothing is
//! polled on a timer.

pub mod observer;
pub mod viewport;

pub use observer::{intersection_ratio, Fired, ObservationId, ObserveOptions, VisibilityObserver};
pub use viewport::{MarginError, MarginLength, RootMargin, Viewport};
