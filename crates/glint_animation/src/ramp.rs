//! Frame-sampled eased ramps

use std::time::Duration;

use crate::easing::Easing;

/// A fixed-duration interpolation sampled at a fixed frame rate.
///
/// The frame count is `round(duration / (1s / fps))` and frames are spaced
/// evenly across the duration. The last frame always lands exactly on `to`.
#[derive(Clone, Debug)]
pub struct Ramp {
    from: f64,
    to: f64,
    easing: Easing,
    total_frames: u32,
    frame_interval: Duration,
    frame: u32,
}

impl Ramp {
    pub fn new(from: f64, to: f64, duration: Duration, fps: u32, easing: Easing) -> Self {
        let total_frames = (duration.as_secs_f64() * fps.max(1) as f64).round().max(1.0) as u32;
        Self {
            from,
            to,
            easing,
            total_frames,
            frame_interval: duration / total_frames,
            frame: 0,
        }
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Time between consecutive frames
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of frames already produced
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.total_frames
    }

    /// Value at an arbitrary frame index
    pub fn sample(&self, frame: u32) -> f64 {
        if frame >= self.total_frames {
            return self.to;
        }
        let progress = frame as f64 / self.total_frames as f64;
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Produce the next frame's value, or `None` once finished
    pub fn step(&mut self) -> Option<f64> {
        if self.is_finished() {
            return None;
        }
        self.frame += 1;
        Some(self.sample(self.frame))
    }
}
