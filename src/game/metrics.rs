use super::constants::TICK_SAMPLE_WINDOW;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of tick execution costs. Samples are kept in
/// chronological order; percentile reads sort a copy so the window itself
/// is never reordered.
#[derive(Debug)]
pub struct TickMetrics {
    samples: VecDeque<Duration>,
    window: usize,
}

impl TickMetrics {
    pub fn new() -> Self {
        Self::with_window(TICK_SAMPLE_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn record(&mut self, sample: Duration) {
        self.samples.push_back(sample);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: Duration = self.samples.iter().sum();
        total.as_secs_f64() * 1_000.0 / self.samples.len() as f64
    }

    pub fn p95_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<Duration> = self.samples.iter().copied().collect();
        sorted.sort_unstable();
        let index = (sorted.len() * 95 / 100).min(sorted.len() - 1);
        sorted[index].as_secs_f64() * 1_000.0
    }
}

impl Default for TickMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub player_count: usize,
    pub tick_rate: u32,
    pub average_tick_ms: f64,
    pub p95_tick_ms: f64,
    pub pellet_count: usize,
    pub power_up_count: usize,
    pub rounds_played: u32,
    pub uptime_seconds: u64,
}
