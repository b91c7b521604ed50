//! Periodic eye blinks.
//!
//! A blink is a piecewise-linear close/open cycle: the first half of the
//! duration ramps 0 → 1, the second half 1 → 0. Blink starts are spaced
//! by a uniform random interval measured start-to-start.

use aria_config::schema::BlinkConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::AvatarModel;
use crate::weights::TargetFrame;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkState {
    pub is_blinking: bool,
    pub blink_start: f64,
    pub next_blink: f64,
    pub weight: f32,
}

pub struct BlinkController {
    state: BlinkState,
    enabled: bool,
    duration: f64,
    min_interval: f64,
    max_interval: f64,
    names: Vec<String>,
    bound: Vec<String>,
    rng: StdRng,
}

impl BlinkController {
    pub fn from_config(config: &BlinkConfig, now: f64) -> Self {
        Self::with_rng(config, now, StdRng::from_entropy())
    }

    pub fn with_rng(config: &BlinkConfig, now: f64, rng: StdRng) -> Self {
        let mut controller = Self {
            state: BlinkState {
                is_blinking: false,
                blink_start: now,
                next_blink: now,
                weight: 0.0,
            },
            enabled: config.enabled,
            duration: config.duration,
            min_interval: config.min_interval,
            max_interval: config.max_interval,
            names: config.expressions.clone(),
            bound: Vec::new(),
            rng,
        };
        controller.state.next_blink = now + controller.interval();
        controller
    }

    /// Retune without disturbing the current schedule.
    pub fn apply_config(&mut self, config: &BlinkConfig) {
        self.enabled = config.enabled;
        self.duration = config.duration;
        self.min_interval = config.min_interval;
        self.max_interval = config.max_interval;
        self.names = config.expressions.clone();
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    /// Blink expressions present on `model`, matched case-insensitively.
    pub fn attach(&mut self, model: &AvatarModel) {
        self.bound = model
            .expressions()
            .names()
            .filter(|name| self.names.iter().any(|b| b.eq_ignore_ascii_case(name)))
            .map(str::to_string)
            .collect();
        if self.bound.is_empty() {
            tracing::debug!(model = model.name(), "no blink expressions, blinking disabled");
        }
    }

    pub fn bound_expressions(&self) -> &[String] {
        &self.bound
    }

    fn interval(&mut self) -> f64 {
        if self.max_interval > self.min_interval {
            self.rng.gen_range(self.min_interval..self.max_interval)
        } else {
            self.min_interval
        }
    }

    /// Advance to `now` and return the blink weight.
    pub fn update(&mut self, now: f64) -> f32 {
        if !self.enabled {
            self.state.is_blinking = false;
            self.state.weight = 0.0;
            return 0.0;
        }

        if !self.state.is_blinking && now >= self.state.next_blink {
            self.state.is_blinking = true;
            // Anchor to the schedule unless the loop stalled past a whole blink.
            self.state.blink_start = if now - self.state.next_blink < self.duration {
                self.state.next_blink
            } else {
                now
            };
        }

        if self.state.is_blinking {
            let elapsed = now - self.state.blink_start;
            if elapsed >= self.duration {
                self.state.is_blinking = false;
                self.state.weight = 0.0;
                self.state.next_blink = self.state.blink_start + self.interval();
            } else {
                let half = self.duration / 2.0;
                let weight = if elapsed < half {
                    elapsed / half
                } else {
                    (self.duration - elapsed) / half
                };
                self.state.weight = weight.clamp(0.0, 1.0) as f32;
            }
        }

        self.state.weight
    }

    /// Cancel any blink in progress and reschedule from `now`.
    pub fn reset(&mut self, now: f64) {
        self.state.is_blinking = false;
        self.state.weight = 0.0;
        self.state.next_blink = now + self.interval();
    }

    /// Blink weights are forced, not smoothed, so the short cycle keeps its shape.
    pub fn contribute(&self, frame: &mut TargetFrame) {
        for name in &self.bound {
            frame.force(name, self.state.weight);
        }
    }
}
