//! Pointer-driven gaze.
//!
//! Pointer pixels are unprojected through the camera to a point a fixed
//! distance along the view ray. The look-at point eases toward it, and
//! the direction from the head anchor becomes a clamped yaw/pitch.
//!
//! Angles are in model space where forward is -Z: yaw turns toward -X
//! as it grows (rotation about +Y), pitch raises the gaze.

use aria_common::Viewport;
use aria_config::schema::{CameraConfig, GazeConfig};
use glam::{Vec2, Vec3};

use crate::model::AvatarModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let position = Vec3::from_array(config.position.map(|c| c as f32));
        let target = Vec3::from_array(config.look_at.map(|c| c as f32));
        let forward = (target - position).try_normalize().unwrap_or(Vec3::NEG_Z);
        Self {
            position,
            forward,
            fov_y: (config.fov as f32).to_radians(),
        }
    }

    /// World-space direction through a point in normalised device coordinates.
    pub fn ray_direction(&self, ndc: Vec2, aspect: f32) -> Vec3 {
        let right = self
            .forward
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let up = right.cross(self.forward);
        let half_height = (self.fov_y * 0.5).tan();
        (self.forward + right * (ndc.x * half_height * aspect) + up * (ndc.y * half_height))
            .normalize_or_zero()
    }
}

/// Yaw/pitch that turn the -Z forward axis toward `dir`.
pub fn direction_to_angles(dir: Vec3) -> (f32, f32) {
    let yaw = (-dir.x).atan2(-dir.z);
    let pitch = dir.y.atan2(Vec2::new(dir.x, dir.z).length());
    (yaw, pitch)
}

pub struct GazeController {
    enabled: bool,
    ease_rate: f32,
    distance: f32,
    max_yaw: f32,
    max_pitch: f32,
    camera: Camera,
    pointer_target: Vec3,
    current: Vec3,
    angles: (f32, f32),
}

impl GazeController {
    pub fn from_config(config: &GazeConfig) -> Self {
        let camera = Camera::from_config(&config.camera);
        let distance = config.distance as f32;
        let resting = camera.position + camera.forward * distance;
        Self {
            enabled: config.enabled,
            ease_rate: config.ease_rate as f32,
            distance,
            max_yaw: config.max_yaw as f32,
            max_pitch: config.max_pitch as f32,
            camera,
            pointer_target: resting,
            current: resting,
            angles: (0.0, 0.0),
        }
    }

    /// Retune bounds and easing; the current look-at point is kept.
    pub fn apply_config(&mut self, config: &GazeConfig) {
        self.enabled = config.enabled;
        self.ease_rate = config.ease_rate as f32;
        self.distance = config.distance as f32;
        self.max_yaw = config.max_yaw as f32;
        self.max_pitch = config.max_pitch as f32;
        self.camera = Camera::from_config(&config.camera);
    }

    /// Record a pointer position in pixels. Non-finite coordinates and
    /// degenerate viewports are ignored; returns whether the target moved.
    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport: Viewport) -> bool {
        if !x.is_finite() || !y.is_finite() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return false;
        }
        let ndc = Vec2::new(
            (x / viewport.width) * 2.0 - 1.0,
            -(y / viewport.height) * 2.0 + 1.0,
        );
        let dir = self.camera.ray_direction(ndc, viewport.aspect());
        let target = self.camera.position + dir * self.distance;
        if !target.is_finite() || dir == Vec3::ZERO {
            return false;
        }
        self.pointer_target = target;
        true
    }

    pub fn pointer_target(&self) -> Vec3 {
        self.pointer_target
    }

    pub fn current_target(&self) -> Vec3 {
        self.current
    }

    /// Last applied (yaw, pitch).
    pub fn angles(&self) -> (f32, f32) {
        self.angles
    }

    /// Ease toward the pointer target and write look-at into the model.
    /// Returns the applied angles, or `None` when gaze is a no-op.
    pub fn update(&mut self, dt: f32, model: &mut AvatarModel) -> Option<(f32, f32)> {
        if !self.enabled || !model.supports_look_at() {
            return None;
        }

        let alpha = 1.0 - (-self.ease_rate * dt.max(0.0)).exp();
        self.current = self.current.lerp(self.pointer_target, alpha);

        let dir = model.to_model_direction(self.current - model.head_anchor());
        if dir.length_squared() > 1e-10 {
            let (yaw, pitch) = direction_to_angles(dir);
            self.angles = (
                yaw.clamp(-self.max_yaw, self.max_yaw),
                pitch.clamp(-self.max_pitch, self.max_pitch),
            );
        }

        model.set_look_at(self.angles.0, self.angles.1);
        Some(self.angles)
    }
}
