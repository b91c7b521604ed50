//! The fixed per-frame update order.

use aria_common::{Emotion, Viewport};
use aria_config::schema::{AriaConfig, DriverKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::source::VolumeSource;
use crate::blink::{BlinkController, BlinkState};
use crate::clips::ClipPlayer;
use crate::expression::ExpressionBlender;
use crate::gaze::GazeController;
use crate::idle::IdleMotion;
use crate::lipsync::LipSync;
use crate::model::AvatarModel;
use crate::pose::PoseCorrector;
use crate::stage::{ActiveCharacter, Stage};
use crate::warn_once::WarnOnce;
use crate::weights::{ExpressionWeightMap, TargetFrame};

/// What one frame did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// No model was loaded; nothing ran.
    pub skipped: bool,
    /// Sampled loudness, `None` when nothing was playing.
    pub loudness: Option<f32>,
    /// Mouth level after gating and compression.
    pub mouth_level: f32,
    pub blink_weight: f32,
    /// Applied (yaw, pitch), `None` when gaze was a no-op.
    pub gaze: Option<(f32, f32)>,
}

pub struct FrameOrchestrator {
    weights: ExpressionWeightMap,
    targets: TargetFrame,
    blender: ExpressionBlender,
    blink: BlinkController,
    lipsync: LipSync,
    gaze: GazeController,
    idle: IdleMotion,
    pose: PoseCorrector,
    clips: ClipPlayer,
    warn: WarnOnce,
    emotion: Emotion,
    elapsed: f64,
    frames: u64,
    attached: Option<u64>,
}

impl FrameOrchestrator {
    pub fn new(config: &AriaConfig) -> Self {
        Self::build(config, StdRng::from_entropy(), StdRng::from_entropy())
    }

    /// Deterministic blink schedule and clip choices.
    pub fn with_seed(config: &AriaConfig, seed: u64) -> Self {
        Self::build(
            config,
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        )
    }

    fn build(config: &AriaConfig, blink_rng: StdRng, clip_rng: StdRng) -> Self {
        let blender = ExpressionBlender::from_config(&config.animation);
        let base_rate = blender.rate();
        Self {
            weights: ExpressionWeightMap::new(),
            targets: TargetFrame::new(),
            blink: BlinkController::with_rng(&config.blink, 0.0, blink_rng),
            lipsync: LipSync::from_config(&config.lipsync, base_rate),
            gaze: GazeController::from_config(&config.gaze),
            idle: IdleMotion::from_config(&config.idle),
            pose: PoseCorrector::from_config(&config.pose),
            clips: ClipPlayer::with_rng(&config.clips, clip_rng),
            blender,
            warn: WarnOnce::new(),
            emotion: Emotion::Neutral,
            elapsed: 0.0,
            frames: 0,
            attached: None,
        }
    }

    /// Run one frame. `dt` is seconds since the previous frame; negative
    /// or non-finite values are treated as zero.
    pub fn frame(&mut self, dt: f32, stage: &mut Stage, audio: &mut dyn VolumeSource) -> FrameReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += f64::from(dt);

        // 1. Nothing to animate until a model is loaded.
        let generation = stage.generation();
        let Some(active) = stage.active_mut() else {
            return FrameReport {
                skipped: true,
                ..FrameReport::default()
            };
        };
        if self.attached != Some(generation) {
            self.attach(&active.model);
            self.attached = Some(generation);
        }
        self.frames += 1;

        let ActiveCharacter {
            driver,
            model,
            mixer,
            ..
        } = active;

        // 2. Clip timeline.
        if *driver == DriverKind::Clips {
            mixer.update(dt);
            mixer.apply(model);
        }

        // 3. Loudness, only while audible.
        let loudness = audio.is_playing().then(|| audio.live_volume());

        // 4. Expression targets, blended once per name.
        self.targets.clear();
        self.blender
            .contribute(self.emotion, model, &mut self.targets, &mut self.warn);
        let blink_weight = self.blink.update(self.elapsed);
        self.blink.contribute(&mut self.targets);
        let mouth_level = self.lipsync.level(loudness);
        self.lipsync.contribute(mouth_level, &mut self.targets);
        self.weights.blend(&self.targets, dt);
        for (name, weight) in self.weights.iter() {
            if let Err(e) = model.set_expression(name, weight) {
                self.warn.warn(&format!("expression:{name}"), e);
            }
        }
        self.lipsync
            .drive_jaw(mouth_level, dt, model, &mut self.warn);

        // 5. Gaze.
        let gaze = self.gaze.update(dt, model);

        // 6. Commit.
        model.commit();

        // 7. Body layers for skeleton characters, after commit.
        if *driver == DriverKind::Skeleton {
            self.pose.apply(dt, model, &mut self.warn);
            self.idle.apply(self.elapsed, model, &mut self.warn);
        }

        tracing::trace!(
            frame = self.frames,
            dt,
            loudness = ?loudness,
            mouth_level,
            blink_weight,
            "frame"
        );

        FrameReport {
            skipped: false,
            loudness,
            mouth_level,
            blink_weight,
            gaze,
        }
    }

    fn attach(&mut self, model: &AvatarModel) {
        self.weights.clear();
        self.warn.clear();
        self.pose.reset();
        self.blink.attach(model);
        self.lipsync.attach(model);
        tracing::debug!(model = model.name(), "frame orchestrator attached");
    }

    pub fn set_emotion(&mut self, emotion: Emotion) {
        if emotion != self.emotion {
            tracing::info!(from = %self.emotion, to = %emotion, "emotion changed");
            self.emotion = emotion;
        }
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport: Viewport) -> bool {
        self.gaze.pointer_moved(x, y, viewport)
    }

    /// A conversational response arrived: adopt its emotion and, for clip
    /// characters, start a matching clip. Returns the clip started.
    pub fn on_response(&mut self, text: &str, emotion: Emotion, stage: &mut Stage) -> Option<String> {
        self.set_emotion(emotion);
        let active = stage.active_mut()?;
        if active.driver != DriverKind::Clips {
            return None;
        }
        self.clips
            .on_response(text, emotion, &mut active.mixer, &active.model, &mut self.warn)
    }

    /// Manual clip trigger (clip characters only).
    pub fn trigger_clip(&mut self, stage: &mut Stage) -> Option<String> {
        let active = stage.active_mut()?;
        if active.driver != DriverKind::Clips {
            return None;
        }
        self.clips
            .trigger_random(&mut active.mixer, &active.model, &mut self.warn)
    }

    /// Speech ended: close the mouth and restart the blink schedule.
    pub fn audio_stopped(&mut self, stage: &mut Stage) {
        let model = stage.active_mut().map(|a| &mut a.model);
        self.lipsync.reset(&mut self.weights, model);
        for name in self.blink.bound_expressions() {
            self.weights.set(name, 0.0);
        }
        self.blink.reset(self.elapsed);
        tracing::debug!("speech ended, mouth and blink reset");
    }

    /// Live-tune every controller from a reloaded config.
    pub fn apply_tuning(&mut self, config: &AriaConfig, stage: &Stage) {
        self.blender = ExpressionBlender::from_config(&config.animation);
        self.blink.apply_config(&config.blink);
        self.lipsync.apply_config(&config.lipsync, self.blender.rate());
        self.gaze.apply_config(&config.gaze);
        self.idle.apply_config(&config.idle);
        self.pose.apply_config(&config.pose);
        self.clips.apply_config(&config.clips);
        if let Some(active) = stage.active() {
            self.blink.attach(&active.model);
            self.lipsync.attach(&active.model);
        }
        tracing::info!("animation tuning applied");
    }

    pub fn weights(&self) -> &ExpressionWeightMap {
        &self.weights
    }

    pub fn blink_state(&self) -> BlinkState {
        self.blink.state()
    }

    pub fn lipsync(&self) -> &LipSync {
        &self.lipsync
    }

    pub fn gaze(&self) -> &GazeController {
        &self.gaze
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
