//! Stat counters
//!
//! Each stat element carries an integer target in a data attribute and holds a
//! display node. Once the stat is half visible the display ramps from 0 to the
//! target over a fixed duration with an ease-out curve, one frame per task.

use std::time::Duration;

use glint_animation::{Easing, Ramp};
use glint_core::{Document, NodeId, Selector};
use glint_viewport::{ObserveOptions, RootMargin};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::task::{Task, TaskQueue, Trigger, TriggerObserver};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Stat container elements
    #[serde(default = "default_selector")]
    pub selector: Selector,
    /// Display node searched for inside each stat
    #[serde(default = "default_display_selector")]
    pub display_selector: Selector,
    /// Attribute holding the integer target
    #[serde(default = "default_target_attribute")]
    pub target_attribute: String,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub root_margin: RootMargin,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_easing")]
    pub easing: Easing,
}

fn default_selector() -> Selector {
    Selector::parse(".stat[data-target]").expect("default counter selector is valid")
}

fn default_display_selector() -> Selector {
    Selector::parse(".counter").expect("default counter display selector is valid")
}

fn default_target_attribute() -> String {
    "data-target".to_string()
}

fn default_threshold() -> f32 {
    0.5
}

fn default_duration_ms() -> u64 {
    2000
}

fn default_fps() -> u32 {
    60
}

fn default_easing() -> Easing {
    Easing::EaseOutCubic
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            display_selector: default_display_selector(),
            target_attribute: default_target_attribute(),
            threshold: default_threshold(),
            root_margin: RootMargin::zero(),
            duration_ms: default_duration_ms(),
            fps: default_fps(),
            easing: default_easing(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterState {
    Pending,
    Running,
    Done,
}

#[derive(Clone, Debug)]
pub struct CounterTarget {
    pub stat: NodeId,
    pub display: NodeId,
    pub target: i64,
    /// Last value written to the display node
    pub displayed: Option<i64>,
    pub state: CounterState,
    ramp: Ramp,
}

impl CounterTarget {
    pub fn total_frames(&self) -> u32 {
        self.ramp.total_frames()
    }

    pub fn frame(&self) -> u32 {
        self.ramp.frame()
    }
}

/// Runs the count-up animation of every stat, at most once each
pub struct CounterEngine {
    config: CounterConfig,
    targets: FxHashMap<NodeId, CounterTarget>,
}

impl CounterEngine {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            targets: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    pub fn options(&self) -> ObserveOptions {
        ObserveOptions::new(self.config.threshold).with_root_margin(self.config.root_margin)
    }

    fn ramp_to(&self, target: i64) -> Ramp {
        Ramp::new(
            0.0,
            target as f64,
            Duration::from_millis(self.config.duration_ms),
            self.config.fps,
            self.config.easing,
        )
    }

    /// Register every stat that has a display node. Returns the number of
    /// newly mounted stats.
    pub fn mount<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        observer: &mut TriggerObserver,
    ) -> usize {
        let options = self.options();
        let mut mounted = 0;

        for stat in doc.select_all(&self.config.selector) {
            if self.targets.contains_key(&stat) {
                continue;
            }
            let Some(display) = doc.select_within(stat, &self.config.display_selector) else {
                continue;
            };
            let target = doc
                .attribute(stat, &self.config.target_attribute)
                .map(|raw| parse_target(&raw))
                .unwrap_or(0);

            observer.observe(doc, stat, options, Trigger::Counter);
            self.targets.insert(
                stat,
                CounterTarget {
                    stat,
                    display,
                    target,
                    displayed: None,
                    state: CounterState::Pending,
                    ramp: self.ramp_to(target),
                },
            );
            mounted += 1;
        }

        debug!(mounted, "counters mounted");
        mounted
    }

    /// Start the ramp for a stat that just became visible.
    ///
    /// Returns false if the stat is unknown or already started.
    pub fn on_visible(&mut self, stat: NodeId, queue: &mut TaskQueue) -> bool {
        let Some(counter) = self.targets.get_mut(&stat) else {
            return false;
        };
        if counter.state != CounterState::Pending {
            return false;
        }

        counter.state = CounterState::Running;
        queue.schedule(counter.ramp.frame_interval(), Task::CounterFrame(stat));
        debug!(
            ?stat,
            target = counter.target,
            frames = counter.ramp.total_frames(),
            "counter started"
        );
        true
    }

    /// Render the next frame and schedule the one after it.
    ///
    /// Returns the value written, or `None` when the stat is not running.
    pub fn frame<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        stat: NodeId,
        queue: &mut TaskQueue,
    ) -> Option<i64> {
        let counter = self.targets.get_mut(&stat)?;
        if counter.state != CounterState::Running {
            return None;
        }

        let value = match counter.ramp.step() {
            Some(_) if counter.ramp.is_finished() => counter.target,
            Some(sample) => round_half_up(sample),
            None => counter.target,
        };
        doc.set_text(counter.display, &value.to_string());
        counter.displayed = Some(value);
        trace!(?stat, frame = counter.ramp.frame(), value, "counter frame");

        if counter.ramp.is_finished() {
            counter.state = CounterState::Done;
            debug!(?stat, value, "counter finished");
        } else {
            queue.schedule(counter.ramp.frame_interval(), Task::CounterFrame(stat));
        }
        Some(value)
    }

    pub fn target(&self, stat: NodeId) -> Option<&CounterTarget> {
        self.targets.get(&stat)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Parse the leading integer of a data attribute.
///
/// Leading whitespace and a sign are accepted, anything after the digits is
/// ignored, and a value with no leading digits yields 0.
pub fn parse_target(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return 0;
    }

    let magnitude = rest[..digits]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
