//! Clip selection from response text and emotion.
//!
//! Everything here is data in, data out: tables come from config and the
//! random source is passed in, so selection is reproducible with a seeded rng.

use aria_common::Emotion;
use aria_config::schema::{ClipsConfig, EmotionClipTable};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ClipGroup {
    pub name: String,
    /// Lowercased substrings matched against the lowercased response.
    pub triggers: Vec<String>,
    pub candidates: Vec<(String, f64)>,
    pub priority: i32,
}

impl ClipGroup {
    pub fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| text.contains(t.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipTables {
    /// Highest priority first; ties keep config order.
    groups: Vec<ClipGroup>,
    emotions: EmotionClipTable,
}

impl ClipTables {
    pub fn from_config(config: &ClipsConfig) -> Self {
        let mut groups: Vec<ClipGroup> = config
            .groups
            .iter()
            .map(|g| ClipGroup {
                name: g.name.clone(),
                triggers: g.triggers.iter().map(|t| t.to_lowercase()).collect(),
                candidates: g
                    .candidates
                    .iter()
                    .map(|c| (c.clip.clone(), c.weight))
                    .collect(),
                priority: g.priority,
            })
            .collect();
        groups.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self {
            groups,
            emotions: config.emotions.clone(),
        }
    }

    pub fn groups(&self) -> &[ClipGroup] {
        &self.groups
    }

    /// First (highest-priority) group with a trigger in `text`.
    pub fn matching_group(&self, text: &str) -> Option<&ClipGroup> {
        let text = text.to_lowercase();
        self.groups.iter().find(|g| g.matches(&text))
    }

    pub fn emotion_clips(&self, emotion: Emotion) -> &[String] {
        match emotion {
            Emotion::Neutral => &self.emotions.neutral,
            Emotion::Happy => &self.emotions.happy,
            Emotion::Sad => &self.emotions.sad,
            Emotion::Angry => &self.emotions.angry,
            Emotion::Surprised => &self.emotions.surprised,
        }
    }
}

/// Choose the clip to play for a response.
///
/// A matching keyword group wins over the emotion table. Within either
/// source the previous clip is excluded when something else is available.
pub fn select_clip<R: Rng + ?Sized>(
    tables: &ClipTables,
    text: &str,
    emotion: Emotion,
    previous: Option<&str>,
    rng: &mut R,
) -> Option<String> {
    if let Some(group) = tables.matching_group(text) {
        tracing::debug!(group = %group.name, "clip keyword group matched");
        let mut pool: Vec<&(String, f64)> = group.candidates.iter().collect();
        if pool.len() > 1 {
            pool.retain(|(clip, _)| Some(clip.as_str()) != previous);
        }
        let dist = WeightedIndex::new(pool.iter().map(|(_, w)| *w)).ok()?;
        return Some(pool[dist.sample(rng)].0.clone());
    }

    let names: Vec<&str> = tables
        .emotion_clips(emotion)
        .iter()
        .map(String::as_str)
        .collect();
    pick_excluding(&names, previous, rng)
}

/// Uniform pick among all clips, avoiding `current` when possible.
pub fn pick_random_clip<R: Rng + ?Sized>(
    all: &[&str],
    current: Option<&str>,
    rng: &mut R,
) -> Option<String> {
    pick_excluding(all, current, rng)
}

fn pick_excluding<R: Rng + ?Sized>(names: &[&str], exclude: Option<&str>, rng: &mut R) -> Option<String> {
    let mut pool: Vec<&str> = names.to_vec();
    if pool.len() > 1 {
        pool.retain(|n| Some(*n) != exclude);
    }
    pool.choose(rng).map(|n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aria_config::schema::{ClipCandidate, KeywordGroup};
    use rand::rngs::StdRng;

    fn tables() -> ClipTables {
        ClipTables::from_config(&ClipsConfig::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn groups_sorted_by_priority() {
        let t = tables();
        let names: Vec<&str> = t.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["greeting", "celebrate", "think"]);
    }

    #[test]
    fn greeting_beats_lower_priority_groups() {
        // "great" and "hmm" also match, greeting has the highest priority
        let t = tables();
        let clip = select_clip(&t, "Hello! Great question, hmm.", Emotion::Sad, None, &mut rng());
        assert_eq!(clip.as_deref(), Some("Wave"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = tables();
        assert_eq!(t.matching_group("HMM let me see").unwrap().name, "think");
    }

    #[test]
    fn weighted_pick_excludes_previous() {
        let t = tables();
        let mut r = rng();
        for _ in 0..50 {
            let clip = select_clip(&t, "congrats!", Emotion::Neutral, Some("Jump"), &mut r);
            assert_eq!(clip.as_deref(), Some("Clap"));
        }
    }

    #[test]
    fn weighted_pick_follows_weights() {
        let t = tables();
        let mut r = rng();
        let jumps = (0..2000)
            .filter(|_| {
                select_clip(&t, "awesome", Emotion::Neutral, None, &mut r).as_deref() == Some("Jump")
            })
            .count();
        // Jump weighs 2, Clap 1
        assert!((1200..1500).contains(&jumps), "jumps = {jumps}");
    }

    #[test]
    fn single_candidate_repeats() {
        let t = tables();
        let clip = select_clip(&t, "hello there", Emotion::Neutral, Some("Wave"), &mut rng());
        assert_eq!(clip.as_deref(), Some("Wave"));
    }

    #[test]
    fn no_keyword_falls_back_to_emotion() {
        let t = tables();
        let clip = select_clip(&t, "The sky is blue.", Emotion::Sad, None, &mut rng());
        assert_eq!(clip.as_deref(), Some("Sigh"));

        let mut r = rng();
        for _ in 0..20 {
            let clip = select_clip(&t, "ok", Emotion::Happy, Some("Clap"), &mut r);
            assert_eq!(clip.as_deref(), Some("Jump"));
        }
    }

    #[test]
    fn empty_emotion_list_selects_nothing() {
        let mut config = ClipsConfig::default();
        config.emotions.angry.clear();
        let t = ClipTables::from_config(&config);
        assert_eq!(select_clip(&t, "grr", Emotion::Angry, None, &mut rng()), None);
    }

    #[test]
    fn zero_weight_group_selects_nothing() {
        let config = ClipsConfig {
            groups: vec![KeywordGroup {
                name: "broken".into(),
                triggers: vec!["x".into()],
                candidates: vec![ClipCandidate::new("A", 0.0)],
                priority: 0,
            }],
            ..Default::default()
        };
        let t = ClipTables::from_config(&config);
        assert_eq!(select_clip(&t, "x", Emotion::Neutral, None, &mut rng()), None);
    }

    #[test]
    fn random_pick_avoids_current() {
        let mut r = rng();
        for _ in 0..30 {
            let pick = pick_random_clip(&["Idle", "Wave"], Some("Idle"), &mut r);
            assert_eq!(pick.as_deref(), Some("Wave"));
        }
        assert_eq!(pick_random_clip(&["Idle"], Some("Idle"), &mut r).as_deref(), Some("Idle"));
        assert_eq!(pick_random_clip(&[], None, &mut r), None);
    }
}
