//! Concept-derived feature rows and the nearest-row classifier seam.

use crate::kernel::{BitVector, LabelIndex};
use crate::lattice::{Concept, MemorizingLattice};
use std::sync::Arc;

/// `L(..)` and `R(..)` substrings around a character position.
///
/// Widths run from 1 to `max_len` and stop at the word boundary.
pub fn word_contexts(word: &str, pos: usize, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut contexts = Vec::new();
    for i in 1..=max_len {
        if i > pos {
            break;
        }
        contexts.push(format!("L({})", chars[pos - i..pos].iter().collect::<String>()));
    }
    for i in 1..=max_len {
        if pos + i > chars.len() {
            break;
        }
        contexts.push(format!("R({})", chars[pos..pos + i].iter().collect::<String>()));
    }
    contexts
}

/// Predicted operation at a word position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub position: usize,
    pub object: String,
    pub overlap: usize,
}

/// One row per (concept, included object) holding that object's contexts.
#[derive(Clone, Debug)]
pub struct FeatureMatrix {
    contexts: Arc<LabelIndex>,
    objects: Vec<String>,
    rows: Vec<BitVector>,
}

impl FeatureMatrix {
    /// Stack the included columns of every concept as feature rows.
    ///
    /// All-zero rows are dropped.
    pub fn from_concepts(contexts: Arc<LabelIndex>, concepts: &[Concept]) -> Self {
        let mut objects = Vec::new();
        let mut rows = Vec::new();
        for concept in concepts {
            let matrix = concept.matrix();
            for object in concept.objects().iter_ones() {
                let column = matrix.column(object);
                if column.is_empty() {
                    continue;
                }
                objects.push(matrix.objects().label(object).to_string());
                rows.push(column.clone());
            }
        }
        Self {
            contexts,
            objects,
            rows,
        }
    }

    /// Feature rows of a lattice's superconcepts.
    pub fn from_lattice(lattice: &MemorizingLattice) -> Self {
        let contexts = lattice.lattice().binary_matrix().contexts().clone();
        Self::from_concepts(contexts, lattice.superconcepts())
    }

    pub fn contexts(&self) -> &Arc<LabelIndex> {
        &self.contexts
    }

    /// Object label of each row.
    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    pub fn rows(&self) -> &[BitVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Known contexts of each position `0..=len`; positions with none are
    /// skipped.
    pub fn encode_word(&self, word: &str, max_len: usize) -> Vec<(usize, BitVector)> {
        let n = word.chars().count();
        (0..=n)
            .filter_map(|pos| {
                let indexes: Vec<usize> = word_contexts(word, pos, max_len)
                    .iter()
                    .filter_map(|c| self.contexts.position(c))
                    .collect();
                if indexes.is_empty() {
                    None
                } else {
                    Some((pos, BitVector::from_indexes(self.contexts.len(), indexes)))
                }
            })
            .collect()
    }

    /// Best-overlapping row per encoded position; ties go to the earlier row.
    pub fn predict_operations(&self, word: &str, max_len: usize) -> Vec<Prediction> {
        self.encode_word(word, max_len)
            .into_iter()
            .filter_map(|(position, bits)| {
                let mut best: Option<(usize, usize)> = None;
                for (i, row) in self.rows.iter().enumerate() {
                    let overlap = row.overlap(&bits);
                    if best.map_or(true, |(_, o)| overlap > o) {
                        best = Some((i, overlap));
                    }
                }
                best.map(|(i, overlap)| Prediction {
                    position,
                    object: self.objects[i].clone(),
                    overlap,
                })
            })
            .collect()
    }
}
