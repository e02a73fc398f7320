//! Label arena: stable string label ↔ integer index mapping.
//!
//! Objects and contexts are addressed by position everywhere inside the
//! lattice; labels only appear at the edges (construction, lookup,
//! persistence).

use crate::error::{LatticeError, Result};
use std::collections::HashMap;

/// An ordered, duplicate-free set of labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl LabelIndex {
    /// Build an index from labels in the given order.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self {
            labels: Vec::new(),
            positions: HashMap::new(),
        };
        for label in labels {
            let label = label.into();
            if index.positions.contains_key(&label) {
                return Err(LatticeError::DuplicateLabel(label));
            }
            index.positions.insert(label.clone(), index.labels.len());
            index.labels.push(label);
        }
        Ok(index)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of a label, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Label at a position.
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    /// Resolve a set of positions to labels.
    pub fn resolve<I>(&self, indexes: I) -> Vec<&str>
    where
        I: IntoIterator<Item = usize>,
    {
        indexes.into_iter().map(|i| self.label(i)).collect()
    }
}
