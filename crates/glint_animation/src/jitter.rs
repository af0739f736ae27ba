//! Delay sources for jittered timing
//!
//! Animations that want human-looking timing draw their delays from a
//! [`DelaySource`] instead of calling an RNG directly, so tests can substitute
//! fixed or scripted delays.

use std::ops::Range;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies a delay from a half-open range
pub trait DelaySource {
    fn sample(&mut self, range: Range<Duration>) -> Duration;
}

/// Uniformly random delays
pub struct RandomDelay<R: Rng = StdRng> {
    rng: R,
}

impl RandomDelay<StdRng> {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomDelay<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DelaySource for RandomDelay<R> {
    fn sample(&mut self, range: Range<Duration>) -> Duration {
        if range.is_empty() {
            return range.start;
        }
        let secs = self
            .rng
            .gen_range(range.start.as_secs_f64()..range.end.as_secs_f64());
        // Nanosecond conversion can round up onto the excluded end
        Duration::from_secs_f64(secs).clamp(range.start, range.end - Duration::from_nanos(1))
    }
}

/// Always the same delay, ignoring the requested range
#[derive(Clone, Copy, Debug)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn sample(&mut self, _range: Range<Duration>) -> Duration {
        self.0
    }
}

/// Replays a scripted list of delays, cycling when exhausted
#[derive(Clone, Debug)]
pub struct SequenceDelay {
    delays: Vec<Duration>,
    index: usize,
}

impl SequenceDelay {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays, index: 0 }
    }
}

impl DelaySource for SequenceDelay {
    fn sample(&mut self, range: Range<Duration>) -> Duration {
        if self.delays.is_empty() {
            return range.start;
        }
        let delay = self.delays[self.index % self.delays.len()];
        self.index += 1;
        delay
    }
}
