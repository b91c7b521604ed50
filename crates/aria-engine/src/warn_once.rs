//! Deduplicated warnings for rig gaps that would otherwise log every frame.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: HashSet<String>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `message` at warn level the first time `key` is seen.
    /// Returns whether the warning was emitted.
    pub fn warn(&mut self, key: &str, message: impl std::fmt::Display) -> bool {
        if self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        tracing::warn!(key, "{message}");
        true
    }

    /// Forget everything, e.g. after a new model is attached.
    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
