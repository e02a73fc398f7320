//! Concept: one object set / context set pairing over a binary matrix.

use crate::kernel::{BinaryMatrix, BitVector};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A formal concept: objects, contexts, the binary matrix restricted to the
/// objects, and a confidence score derived from the raw counts.
///
/// Concepts are only produced by a [`Lattice`](super::Lattice), which owns
/// the authoritative matrix they are validated against. Two concepts are
/// equal iff their object and context sets are equal.
#[derive(Clone, Debug)]
pub struct Concept {
    objects: BitVector,
    contexts: BitVector,
    matrix: BinaryMatrix,
    confidence: f64,
}

impl Concept {
    pub(crate) fn new(
        matrix: BinaryMatrix,
        contexts: BitVector,
        objects: BitVector,
        confidence: f64,
    ) -> Self {
        debug_assert_eq!(objects.len(), matrix.n_objects());
        debug_assert_eq!(contexts.len(), matrix.n_contexts());
        Self {
            objects,
            contexts,
            matrix,
            confidence,
        }
    }

    pub fn objects(&self) -> &BitVector {
        &self.objects
    }

    pub fn contexts(&self) -> &BitVector {
        &self.contexts
    }

    pub fn matrix(&self) -> &BinaryMatrix {
        &self.matrix
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Positions of the included objects.
    pub fn object_indexes(&self) -> Vec<usize> {
        self.objects.iter_ones().collect()
    }

    /// Positions of the included contexts.
    pub fn context_indexes(&self) -> Vec<usize> {
        self.contexts.iter_ones().collect()
    }

    /// Labels of the included objects.
    pub fn object_labels(&self) -> Vec<&str> {
        self.matrix.objects().resolve(self.objects.iter_ones())
    }

    /// Labels of the included contexts.
    pub fn context_labels(&self) -> Vec<&str> {
        self.matrix.contexts().resolve(self.contexts.iter_ones())
    }

    /// Check the internal consistency of objects, contexts and matrix.
    ///
    /// 1. `objects` equals the column maximum of the matrix.
    /// 2. `contexts` equals the AND of the included object columns.
    /// 3. Without contexts, every object is included.
    /// 4. With contexts, at least one object is included and every included
    ///    object has every included context.
    pub fn is_consistent(&self) -> bool {
        let objects_match = self.matrix.nonzero_columns() == self.objects;
        let contexts_match = self.matrix.and_of_columns(&self.objects) == self.contexts;

        let fulfils_contexts = if self.contexts.is_empty() {
            self.objects.is_full()
        } else {
            !self.objects.is_empty()
                && self
                    .objects
                    .iter_ones()
                    .all(|o| self.contexts.is_subset_of(self.matrix.column(o)))
        };

        objects_match && contexts_match && fulfils_contexts
    }

    /// Context and object positions that carry at least one 1 in the
    /// restricted matrix, i.e. the matrix without zero rows and columns.
    pub fn trimmed_axes(&self) -> (Vec<usize>, Vec<usize>) {
        (
            self.matrix.nonzero_rows().iter_ones().collect(),
            self.matrix.nonzero_columns().iter_ones().collect(),
        )
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects && self.contexts == other.contexts
    }
}

impl Eq for Concept {}

impl Hash for Concept {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.objects.hash(state);
        self.contexts.hash(state);
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contexts: {:?}", self.context_labels())?;
        writeln!(f, "Objects: {:?}", self.object_labels())?;
        let (rows, columns) = self.trimmed_axes();
        for r in rows {
            let cells: String = columns
                .iter()
                .map(|&o| if self.matrix.get(r, o) { '1' } else { '0' })
                .collect();
            writeln!(f, "  {:>12} {}", self.matrix.contexts().label(r), cells)?;
        }
        write!(f, "Confidence: {:.6}", self.confidence)
    }
}
