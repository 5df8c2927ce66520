//! Rolling per-agent performance samples.

use std::collections::VecDeque;
use std::time::Duration;

/// Outcome of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Time the agent took to answer.
    pub latency: Duration,
    /// Whether the agent produced a response.
    pub success: bool,
}

/// Rolling window of recent request outcomes for one agent.
///
/// An agent with no samples reports a perfect record: full success and no
/// latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMetrics {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl AgentMetrics {
    /// Creates an empty window holding at most `capacity` samples.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let bounded = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(bounded),
            capacity: bounded,
        }
    }

    /// Records an outcome, evicting the oldest sample when full.
    pub fn record(&mut self, latency: Duration, success: bool) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { latency, success });
    }

    /// Returns the number of samples held.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Returns the window capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the success rate in permille.
    #[must_use]
    pub fn success_permille(&self) -> u32 {
        let successes = self.samples.iter().filter(|sample| sample.success).count();
        permille(successes, self.samples.len()).unwrap_or(1_000)
    }

    /// Returns the average latency in milliseconds.
    #[must_use]
    pub fn average_latency_ms(&self) -> u64 {
        let total: u128 = self
            .samples
            .iter()
            .map(|sample| sample.latency.as_millis())
            .sum();
        let count = u128::try_from(self.samples.len()).unwrap_or(u128::MAX);
        total
            .checked_div(count)
            .map_or(0, |average| u64::try_from(average).unwrap_or(u64::MAX))
    }
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self::new(super::MonitorConfig::default().window_size)
    }
}

fn permille(part: usize, whole: usize) -> Option<u32> {
    let scaled = u64::try_from(part).ok()?.checked_mul(1_000)?;
    let average = scaled.checked_div(u64::try_from(whole).ok()?)?;
    u32::try_from(average).ok()
}
