use super::*;
use aria_common::{CharacterId, Emotion, Viewport};
use aria_config::schema::{AriaConfig, DriverKind, PoseMode};
use glam::Quat;

use crate::model::{AvatarModel, BoneRole, RigDescriptor};
use crate::stage::Stage;

const DT: f32 = 1.0 / 60.0;

fn rig(extra: &str) -> AvatarModel {
    let json = format!(
        r#"{{
            "name": "unit",
            "bones": [
                {{"name": "hips", "translation": [0, 1, 0]}},
                {{"name": "chest", "parent": "hips"}},
                {{"name": "head", "parent": "chest", "translation": [0, 0.5, 0]}},
                {{"name": "jaw", "parent": "head"}},
                {{"name": "leftEye", "parent": "head"}},
                {{"name": "rightEye", "parent": "head"}},
                {{"name": "leftUpperArm", "parent": "chest"}},
                {{"name": "rightUpperArm", "parent": "chest"}}
            ],
            "look_at": {{}}
            {extra}
        }}"#
    );
    AvatarModel::from_descriptor(&RigDescriptor::from_json_str(&json).unwrap()).unwrap()
}

fn faces() -> AvatarModel {
    rig(r#", "expressions": ["neutral", "happy", "sad", "blink", "aa"]"#)
}

fn stage_with(model: AvatarModel, driver: DriverKind) -> Stage {
    let mut stage = Stage::new();
    stage.replace(CharacterId::from("unit"), driver, model);
    stage
}

fn orchestrator() -> FrameOrchestrator {
    FrameOrchestrator::with_seed(&AriaConfig::default(), 42)
}

#[test]
fn skips_until_a_model_is_loaded() {
    let mut orch = orchestrator();
    let mut stage = Stage::new();
    let report = orch.frame(DT, &mut stage, &mut Silence);
    assert!(report.skipped);
    assert_eq!(orch.frames(), 0);
    assert!(orch.elapsed() > 0.0);
}

#[test]
fn weights_are_written_into_the_model_each_frame() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);
    orch.set_emotion(Emotion::Happy);
    for _ in 0..10 {
        orch.frame(DT, &mut stage, &mut Silence);
    }
    let model = &stage.active().unwrap().model;
    let happy = model.expression_weight("happy").unwrap();
    assert!(happy > 0.0);
    assert!((happy - orch.weights().get("happy")).abs() < 1e-6);
}

#[test]
fn bad_dt_is_treated_as_zero() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);
    orch.set_emotion(Emotion::Happy);
    orch.frame(f32::NAN, &mut stage, &mut Silence);
    orch.frame(-1.0, &mut stage, &mut Silence);
    assert_eq!(orch.elapsed(), 0.0);
    assert_eq!(orch.weights().get("happy"), 0.0);
}

#[test]
fn loudness_is_sampled_only_while_playing() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);

    let report = orch.frame(DT, &mut stage, &mut ConstantVolume { playing: false, volume: 0.9 });
    assert_eq!(report.loudness, None);
    assert_eq!(report.mouth_level, 0.0);

    let report = orch.frame(DT, &mut stage, &mut ConstantVolume::playing(0.5));
    assert_eq!(report.loudness, Some(0.5));
    assert!(report.mouth_level > 0.0);
    assert!(orch.weights().get("aa") > 0.0);
}

#[test]
fn jaw_fallback_when_no_mouth_expressions() {
    let mut orch = orchestrator();
    let mut stage = stage_with(rig(""), DriverKind::Skeleton);
    for _ in 0..30 {
        orch.frame(DT, &mut stage, &mut ConstantVolume::playing(1.0));
    }
    assert!(orch.lipsync().uses_jaw());
    let jaw = stage.active().unwrap().model.role_bone(BoneRole::Jaw).unwrap();
    let angle = jaw.local.rotation.angle_between(jaw.rest.rotation);
    assert!(angle > 0.3 && angle <= 0.35 + 1e-4, "angle = {angle}");

    orch.audio_stopped(&mut stage);
    let jaw = stage.active().unwrap().model.role_bone(BoneRole::Jaw).unwrap();
    assert_eq!(jaw.local.rotation, jaw.rest.rotation);
}

#[test]
fn pose_and_idle_run_after_commit_for_skeleton_characters() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);
    orch.frame(DT, &mut stage, &mut Silence);
    let model = &stage.active().unwrap().model;
    let arm = model.role_bone(BoneRole::LeftUpperArm).unwrap().local.rotation;
    // A-pose plus a small breathing sway
    assert!(arm.angle_between(Quat::from_rotation_z(1.2)) < 0.06);
}

#[test]
fn clip_characters_skip_pose_and_idle() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Clips);
    orch.frame(DT, &mut stage, &mut Silence);
    let model = &stage.active().unwrap().model;
    assert_eq!(
        model.role_bone(BoneRole::LeftUpperArm).unwrap().local.rotation,
        Quat::IDENTITY
    );
}

#[test]
fn response_starts_clip_only_for_clip_characters() {
    let clips = r#", "clips": [{"name": "Wave", "duration": 1.0,
        "tracks": [{"bone": "head", "times": [0, 1], "rotations": [[0,0,0,1],[0.1,0,0,0.995]]}]}]"#;
    let mut orch = orchestrator();

    let mut stage = stage_with(rig(clips), DriverKind::Skeleton);
    assert_eq!(orch.on_response("hello!", Emotion::Happy, &mut stage), None);
    assert_eq!(orch.emotion(), Emotion::Happy);

    let mut stage = stage_with(rig(clips), DriverKind::Clips);
    assert_eq!(orch.on_response("hello!", Emotion::Happy, &mut stage).as_deref(), Some("Wave"));
    orch.frame(0.5, &mut stage, &mut Silence);
    let head = stage.active().unwrap().model.role_bone(BoneRole::Head).unwrap();
    assert!(head.local.rotation.angle_between(Quat::IDENTITY) > 0.05);
}

#[test]
fn gaze_follows_pointer_within_bounds() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);
    assert!(orch.pointer_moved(0.0, 0.0, Viewport::default()));
    let mut last = None;
    for _ in 0..120 {
        last = orch.frame(DT, &mut stage, &mut Silence).gaze;
    }
    let (yaw, pitch) = last.unwrap();
    assert!(yaw.abs() <= 0.5 && pitch.abs() <= 0.5);
    assert!(yaw != 0.0 || pitch != 0.0);
}

#[test]
fn switching_models_rebinds_controllers() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);
    orch.frame(DT, &mut stage, &mut Silence);
    assert_eq!(orch.lipsync().mouth_expressions().count(), 1);

    stage.replace(CharacterId::from("bare"), DriverKind::Skeleton, rig(""));
    orch.frame(DT, &mut stage, &mut Silence);
    assert_eq!(orch.lipsync().mouth_expressions().count(), 0);
    assert!(orch.weights().is_empty());
}

#[test]
fn tuning_reload_applies_live() {
    let mut orch = orchestrator();
    let mut stage = stage_with(faces(), DriverKind::Skeleton);
    orch.frame(DT, &mut stage, &mut Silence);

    let mut config = AriaConfig::default();
    config.lipsync.enabled = false;
    config.pose.mode = PoseMode::Smooth;
    orch.apply_tuning(&config, &stage);

    let report = orch.frame(DT, &mut stage, &mut ConstantVolume::playing(1.0));
    assert_eq!(report.mouth_level, 0.0);
}
