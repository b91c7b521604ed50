//! Body motion configuration types: idle motion, pose correction and clips.

use serde::{Deserialize, Serialize};

/// Procedural idle motion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub enabled: bool,
    /// Scales every idle offset; 0 disables motion.
    pub amplitude: f64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            amplitude: 1.0,
        }
    }
}

/// How the pose corrector reaches its target rotations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PoseMode {
    #[default]
    Snap,
    Smooth,
}

/// A-pose corrector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    pub enabled: bool,
    pub mode: PoseMode,
    /// Slerp rate per second in `smooth` mode.
    pub smooth_rate: f64,
    /// Upper-arm Z rotation in radians (left positive, right negative).
    pub upper_arm_angle: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: PoseMode::Snap,
            smooth_rate: 10.0,
            upper_arm_angle: 1.2,
        }
    }
}

/// One weighted clip choice inside a keyword group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipCandidate {
    pub clip: String,
    #[serde(default = "default_candidate_weight")]
    pub weight: f64,
}

fn default_candidate_weight() -> f64 {
    1.0
}

impl ClipCandidate {
    pub fn new(clip: impl Into<String>, weight: f64) -> Self {
        Self {
            clip: clip.into(),
            weight,
        }
    }
}

/// Response keywords that trigger a set of candidate clips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordGroup {
    pub name: String,
    pub triggers: Vec<String>,
    pub candidates: Vec<ClipCandidate>,
    #[serde(default)]
    pub priority: i32,
}

/// Fallback clip names per emotion when no keyword group matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EmotionClipTable {
    pub neutral: Vec<String>,
    pub happy: Vec<String>,
    pub sad: Vec<String>,
    pub angry: Vec<String>,
    pub surprised: Vec<String>,
}

/// Clip player settings and selection tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipsConfig {
    /// Crossfade duration in seconds.
    pub crossfade: f64,
    pub groups: Vec<KeywordGroup>,
    pub emotions: EmotionClipTable,
}

impl Default for ClipsConfig {
    fn default() -> Self {
        Self {
            crossfade: 0.5,
            groups: vec![
                KeywordGroup {
                    name: "greeting".into(),
                    triggers: vec!["hello".into(), "hi ".into(), "bye".into()],
                    candidates: vec![ClipCandidate::new("Wave", 1.0)],
                    priority: 10,
                },
                KeywordGroup {
                    name: "celebrate".into(),
                    triggers: vec!["congrat".into(), "great".into(), "awesome".into()],
                    candidates: vec![
                        ClipCandidate::new("Jump", 2.0),
                        ClipCandidate::new("Clap", 1.0),
                    ],
                    priority: 5,
                },
                KeywordGroup {
                    name: "think".into(),
                    triggers: vec!["hmm".into(), "maybe".into(), "think".into()],
                    candidates: vec![ClipCandidate::new("Think", 1.0)],
                    priority: 1,
                },
            ],
            emotions: EmotionClipTable {
                neutral: vec!["Idle".into()],
                happy: vec!["Jump".into(), "Clap".into()],
                sad: vec!["Sigh".into()],
                angry: vec!["Stomp".into()],
                surprised: vec!["Startle".into()],
            },
        }
    }
}
