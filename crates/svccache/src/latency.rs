//! Rolling window of recent operation durations

use std::collections::VecDeque;
use std::time::Duration;

/// Number of samples kept unless configured otherwise
pub const DEFAULT_WINDOW: usize = 100;

/// Keeps the most recent `window` durations; the oldest sample is dropped first.
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<Duration>,
    window: usize,
}

impl LatencyWindow {
    /// Window of `window` samples (at least one)
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Add a sample, dropping the oldest when full
    pub fn record(&mut self, duration: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(duration);
    }

    /// Mean of the kept samples, zero when empty
    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    /// Most recent sample
    pub fn last(&self) -> Option<Duration> {
        self.samples.back().copied()
    }

    /// Number of kept samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
