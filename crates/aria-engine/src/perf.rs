//! Frame timing and budget monitoring.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of frame durations for FPS and budget checks.
pub struct FrameTimer {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    max_samples: usize,
    budget: Duration,
    over_budget: bool,
}

impl FrameTimer {
    /// 120-sample window with the given per-frame budget.
    pub fn new(budget_ms: f64) -> Self {
        Self {
            frame_times: VecDeque::new(),
            last_frame: Instant::now(),
            max_samples: 120,
            budget: Duration::from_secs_f64(budget_ms.max(0.0) / 1000.0),
            over_budget: false,
        }
    }

    /// Mark the start of a frame and return the time since the previous one.
    pub fn begin_frame(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        self.record(dt);
        dt
    }

    /// Add one frame duration to the window.
    pub fn record(&mut self, dt: Duration) {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        // Only judge a full window, and only log on transitions.
        if self.frame_times.len() < self.max_samples {
            return;
        }
        let over = self.frame_time_ms() > self.budget.as_secs_f64() * 1000.0;
        if over && !self.over_budget {
            tracing::warn!(
                frame_ms = self.frame_time_ms(),
                budget_ms = self.budget.as_secs_f64() * 1000.0,
                "average frame time over budget"
            );
        } else if !over && self.over_budget {
            tracing::info!(frame_ms = self.frame_time_ms(), "frame time back within budget");
        }
        self.over_budget = over;
    }

    pub fn fps(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: f64 = self.frame_times.iter().map(|d| d.as_secs_f64()).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.frame_times.len() as f64 / total
    }

    /// Average frame time in milliseconds.
    pub fn frame_time_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: f64 = self.frame_times.iter().map(|d| d.as_secs_f64()).sum();
        (total / self.frame_times.len() as f64) * 1000.0
    }

    pub fn is_over_budget(&self) -> bool {
        self.over_budget
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(16.0)
    }
}
