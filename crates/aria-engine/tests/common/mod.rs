#![allow(dead_code)]

use std::path::PathBuf;

use aria_common::CharacterId;
use aria_config::schema::{AriaConfig, CharacterConfig, DriverKind};
use aria_engine::{AvatarModel, FrameOrchestrator, RigDescriptor, Stage};

pub const DT: f32 = 1.0 / 60.0;

/// Resolve a path relative to the workspace root.
pub fn workspace_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").join(rel)
}

/// The default roster with rig paths made absolute.
pub fn roster() -> Vec<CharacterConfig> {
    AriaConfig::default()
        .characters
        .roster
        .into_iter()
        .map(|mut c| {
            c.rig = workspace_path(&c.rig.to_string_lossy());
            c
        })
        .collect()
}

pub fn character(id: &str) -> CharacterConfig {
    roster()
        .into_iter()
        .find(|c| c.id == id)
        .unwrap_or_else(|| panic!("no roster entry '{id}'"))
}

pub fn test_stage() -> Stage {
    let mut stage = Stage::new();
    stage.load(&character("test")).unwrap();
    stage
}

pub fn inline_stage(json: &str) -> Stage {
    let model = AvatarModel::from_descriptor(&RigDescriptor::from_json_str(json).unwrap()).unwrap();
    let mut stage = Stage::new();
    stage.replace(CharacterId::from("inline"), DriverKind::Skeleton, model);
    stage
}

pub fn orchestrator() -> FrameOrchestrator {
    FrameOrchestrator::with_seed(&AriaConfig::default(), 1234)
}

pub fn weight(stage: &Stage, name: &str) -> f32 {
    stage
        .active()
        .and_then(|a| a.model.expression_weight(name))
        .unwrap_or(0.0)
}
