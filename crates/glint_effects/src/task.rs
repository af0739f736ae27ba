//! Vocabulary shared between the engines and their owner

use glint_animation::TimerQueue;
use glint_core::NodeId;
use glint_viewport::VisibilityObserver;

/// Which engine an observation belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    Reveal,
    Counter,
    Typewriter,
}

/// A unit of deferred work
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Apply the visible style to a reveal target
    Reveal(NodeId),
    /// Render the next frame of a stat counter
    CounterFrame(NodeId),
    /// Advance the typewriter by one character or line
    TypewriterStep,
    /// Detach the typewriter's trailing cursor
    TypewriterCursorExpired,
}

pub type TaskQueue = TimerQueue<Task>;

pub type TriggerObserver = VisibilityObserver<Trigger>;
