//! The host loop: input, polling, one orchestrator frame, pacing.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use aria_audio::AudioState;
use aria_common::Event;
use aria_config::AriaConfig;
use aria_engine::{FrameReport, FrameTimer};

use super::core::AvatarApp;
use crate::input::Command;

impl AvatarApp {
    /// Run until `:quit`, or until input closes and the avatar has
    /// nothing left to say.
    pub fn run(&mut self, input: mpsc::Receiver<Command>) {
        self.running = true;
        tracing::info!(frame_rate = self.config.performance.frame_rate, "entering frame loop");

        while self.running {
            let started = Instant::now();
            self.drain_input(&input);
            self.tick();

            if self.input_closed && self.is_settled() {
                tracing::info!("input closed and avatar idle, stopping");
                self.running = false;
            }

            let period = frame_period(self.config.performance.frame_rate);
            if let Some(remaining) = period.checked_sub(started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    fn drain_input(&mut self, input: &mpsc::Receiver<Command>) {
        if self.input_closed {
            return;
        }
        loop {
            match input.try_recv() {
                Ok(command) => self.handle_command(command),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.input_closed = true;
                    break;
                }
            }
        }
    }

    /// No reply pending and no speech loading, playing or awaiting a gesture.
    pub(super) fn is_settled(&self) -> bool {
        !self.awaiting_reply
            && matches!(
                self.audio.state(),
                AudioState::Idle | AudioState::Ended | AudioState::Failed
            )
    }

    /// One loop iteration outside of input handling.
    pub fn tick(&mut self) -> FrameReport {
        let dt = self.timer.begin_frame();
        let now = self.now();

        self.poll_config();
        self.poll_conversation(now);
        self.audio.poll(now);
        self.drain_audio_notices();

        let report = self
            .orchestrator
            .frame(dt.as_secs_f32(), &mut self.stage, &mut self.audio);
        self.log_frame_summary(&report);
        report
    }

    fn log_frame_summary(&self, report: &FrameReport) {
        let interval = u64::from(self.config.logging.frame_summary_interval);
        let frames = self.orchestrator.frames();
        if interval == 0 || frames == 0 || frames % interval != 0 {
            return;
        }
        tracing::debug!(
            frame = frames,
            fps = self.timer.fps(),
            frame_ms = self.timer.frame_time_ms(),
            emotion = %self.orchestrator.emotion(),
            loudness = report.loudness.unwrap_or(0.0),
            mouth = report.mouth_level,
            blink = report.blink_weight,
            gaze = ?report.gaze,
            audio = ?self.audio.state(),
            "frame summary"
        );
    }

    fn poll_config(&mut self) {
        let Some(rx) = self.config_rx.as_mut() else {
            return;
        };
        match rx.has_changed() {
            Ok(true) => {
                let config = rx.borrow_and_update().clone();
                self.apply_config(config);
            }
            Ok(false) => {}
            Err(_) => {
                tracing::debug!("config reload channel closed");
                self.config_rx = None;
            }
        }
    }

    /// Apply a reloaded config. Tuning takes effect on the next frame;
    /// the audio output kind and the service settings need a restart.
    pub(super) fn apply_config(&mut self, config: AriaConfig) {
        self.orchestrator.apply_tuning(&config, &self.stage);
        self.audio.apply_config(&config.audio, &config.lipsync);
        if (config.performance.frame_budget_ms - self.config.performance.frame_budget_ms).abs()
            > f64::EPSILON
        {
            self.timer = FrameTimer::new(config.performance.frame_budget_ms);
        }
        if config.audio.output != self.config.audio.output {
            tracing::warn!("audio output change takes effect after restart");
        }
        self.config = config;
        self.bus.publish(Event::ConfigReloaded);
    }
}

fn frame_period(frame_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_period_from_rate() {
        assert!((frame_period(50).as_secs_f64() - 0.02).abs() < 1e-9);
        assert!((frame_period(0).as_secs_f64() - 1.0).abs() < 1e-9);
    }
}
