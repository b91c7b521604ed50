//! Named blendable expressions with pending and committed weights.

use aria_common::RigError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ExpressionSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
    pending: Vec<f32>,
    applied: Vec<f32>,
}

impl ExpressionSet {
    pub fn new(names: &[String]) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            names: names.to_vec(),
            index,
            pending: vec![0.0; names.len()],
            applied: vec![0.0; names.len()],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Stage a weight for the next commit, clamped to `[0, 1]`.
    pub fn set(&mut self, name: &str, weight: f32) -> Result<(), RigError> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| RigError::MissingExpression(name.to_string()))?;
        self.pending[i] = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(())
    }

    pub fn pending(&self, name: &str) -> Option<f32> {
        self.index.get(name).map(|&i| self.pending[i])
    }

    /// Weight as of the last commit.
    pub fn applied(&self, name: &str) -> Option<f32> {
        self.index.get(name).map(|&i| self.applied[i])
    }

    pub(crate) fn commit(&mut self) {
        self.applied.copy_from_slice(&self.pending);
    }
}
