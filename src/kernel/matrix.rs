//! Context and incidence matrices.
//!
//! Both matrices have contexts as rows and objects as columns.
//! [`ContextMatrix`] holds raw occurrence counts; [`BinaryMatrix`] is the
//! thresholded 0/1 view the lattice works on. Binary matrices are stored
//! column-major (one [`BitVector`] per object) because every lattice
//! derivation keeps or zeroes whole object columns.

use super::bits::BitVector;
use super::labels::LabelIndex;
use crate::error::{LatticeError, Result};
use std::sync::Arc;

// =============================================================================
// ContextMatrix
// =============================================================================

/// Occurrence counts of objects (edit operations) in contexts.
#[derive(Clone, Debug)]
pub struct ContextMatrix {
    contexts: Arc<LabelIndex>,
    objects: Arc<LabelIndex>,
    /// Row-major counts, `contexts.len() * objects.len()` cells
    counts: Vec<f64>,
}

impl ContextMatrix {
    /// Create a matrix from row-major counts.
    ///
    /// Counts must be finite and non-negative.
    pub fn new(contexts: LabelIndex, objects: LabelIndex, counts: Vec<f64>) -> Result<Self> {
        let expected = contexts.len() * objects.len();
        if counts.len() != expected {
            return Err(LatticeError::ShapeMismatch {
                expected,
                got: counts.len(),
            });
        }
        for (i, &value) in counts.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(LatticeError::InvalidCount {
                    context: contexts.label(i / objects.len()).to_string(),
                    object: objects.label(i % objects.len()).to_string(),
                    value,
                });
            }
        }
        Ok(Self {
            contexts: Arc::new(contexts),
            objects: Arc::new(objects),
            counts,
        })
    }

    /// Create a matrix from context labels, object labels and one row of
    /// counts per context.
    pub fn from_rows<C, O, S, T>(contexts: C, objects: O, rows: Vec<Vec<f64>>) -> Result<Self>
    where
        C: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let contexts = LabelIndex::new(contexts)?;
        let objects = LabelIndex::new(objects)?;
        if rows.len() != contexts.len() {
            return Err(LatticeError::ShapeMismatch {
                expected: contexts.len() * objects.len(),
                got: rows.iter().map(Vec::len).sum(),
            });
        }
        let mut counts = Vec::with_capacity(contexts.len() * objects.len());
        for row in rows {
            if row.len() != objects.len() {
                return Err(LatticeError::ShapeMismatch {
                    expected: objects.len(),
                    got: row.len(),
                });
            }
            counts.extend(row);
        }
        Self::new(contexts, objects, counts)
    }

    pub fn contexts(&self) -> &Arc<LabelIndex> {
        &self.contexts
    }

    pub fn objects(&self) -> &Arc<LabelIndex> {
        &self.objects
    }

    /// Count at (context, object) positions.
    pub fn get(&self, context: usize, object: usize) -> f64 {
        self.counts[context * self.objects.len() + object]
    }

    /// Count at (context, object) labels.
    pub fn count(&self, context: &str, object: &str) -> Option<f64> {
        let c = self.contexts.position(context)?;
        let o = self.objects.position(object)?;
        Some(self.get(c, o))
    }

    /// Total occurrences per context row.
    pub fn row_sums(&self) -> Vec<f64> {
        let width = self.objects.len();
        (0..self.contexts.len())
            .map(|c| self.counts[c * width..(c + 1) * width].iter().sum())
            .collect()
    }
}

// =============================================================================
// BinaryMatrix
// =============================================================================

/// A 0/1 context × object incidence matrix.
///
/// Every binary matrix derived from one lattice shares that lattice's label
/// arenas; columns are owned, so derived matrices never alias each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMatrix {
    contexts: Arc<LabelIndex>,
    objects: Arc<LabelIndex>,
    columns: Vec<BitVector>,
}

impl BinaryMatrix {
    /// Threshold a context matrix: a cell is 1 iff its count is `>= threshold`.
    pub fn from_threshold(matrix: &ContextMatrix, threshold: f64) -> Self {
        let n_contexts = matrix.contexts.len();
        let columns = (0..matrix.objects.len())
            .map(|o| {
                BitVector::from_indexes(
                    n_contexts,
                    (0..n_contexts).filter(|&c| matrix.get(c, o) >= threshold),
                )
            })
            .collect();
        Self {
            contexts: Arc::clone(&matrix.contexts),
            objects: Arc::clone(&matrix.objects),
            columns,
        }
    }

    /// Assemble a matrix from explicit columns over the given label arenas.
    pub fn from_columns(
        contexts: Arc<LabelIndex>,
        objects: Arc<LabelIndex>,
        columns: Vec<BitVector>,
    ) -> Result<Self> {
        if columns.len() != objects.len() {
            return Err(LatticeError::ShapeMismatch {
                expected: objects.len(),
                got: columns.len(),
            });
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != contexts.len()) {
            return Err(LatticeError::ShapeMismatch {
                expected: contexts.len(),
                got: bad.len(),
            });
        }
        Ok(Self {
            contexts,
            objects,
            columns,
        })
    }

    /// An all-zero matrix over the given label arenas.
    pub fn zeros(contexts: Arc<LabelIndex>, objects: Arc<LabelIndex>) -> Self {
        let columns = vec![BitVector::zeros(contexts.len()); objects.len()];
        Self {
            contexts,
            objects,
            columns,
        }
    }

    pub fn contexts(&self) -> &Arc<LabelIndex> {
        &self.contexts
    }

    pub fn objects(&self) -> &Arc<LabelIndex> {
        &self.objects
    }

    pub fn n_contexts(&self) -> usize {
        self.contexts.len()
    }

    pub fn n_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn get(&self, context: usize, object: usize) -> bool {
        self.columns[object].get(context)
    }

    pub(crate) fn set(&mut self, context: usize, object: usize, value: bool) {
        self.columns[object].set(context, value);
    }

    /// The contexts of one object.
    pub fn column(&self, object: usize) -> &BitVector {
        &self.columns[object]
    }

    /// The objects present in one context.
    pub fn row(&self, context: usize) -> BitVector {
        BitVector::from_indexes(
            self.n_objects(),
            (0..self.n_objects()).filter(|&o| self.get(context, o)),
        )
    }

    /// Column maximum: objects with at least one 1.
    pub fn nonzero_columns(&self) -> BitVector {
        BitVector::from_indexes(
            self.n_objects(),
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, col)| !col.is_empty())
                .map(|(o, _)| o),
        )
    }

    /// Row maximum: contexts with at least one 1.
    pub fn nonzero_rows(&self) -> BitVector {
        self.columns
            .iter()
            .fold(BitVector::zeros(self.n_contexts()), |acc, col| acc.or(col))
    }

    /// AND of the selected columns; all ones when nothing is selected.
    pub fn and_of_columns(&self, objects: &BitVector) -> BitVector {
        let mut acc = BitVector::ones(self.n_contexts());
        for o in objects.iter_ones() {
            acc.and_assign(&self.columns[o]);
        }
        acc
    }

    /// Copy with every column outside `objects` zeroed.
    pub fn keep_columns(&self, objects: &BitVector) -> Self {
        let zero = BitVector::zeros(self.n_contexts());
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(o, col)| if objects.get(o) { col.clone() } else { zero.clone() })
            .collect();
        Self {
            contexts: Arc::clone(&self.contexts),
            objects: Arc::clone(&self.objects),
            columns,
        }
    }

    /// Copy with every column that lacks one of `contexts` zeroed.
    ///
    /// A column survives iff it is a superset of `contexts`.
    pub fn keep_columns_containing(&self, contexts: &BitVector) -> Self {
        let keep = BitVector::from_indexes(
            self.n_objects(),
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, col)| contexts.is_subset_of(col))
                .map(|(o, _)| o),
        );
        self.keep_columns(&keep)
    }

    /// Objects (among all columns) whose column contains every one of `contexts`.
    pub fn columns_containing(&self, contexts: &BitVector) -> BitVector {
        BitVector::from_indexes(
            self.n_objects(),
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, col)| contexts.is_subset_of(col))
                .map(|(o, _)| o),
        )
    }

    /// True when this matrix shares label arenas with `other`.
    pub fn same_labels(&self, other: &BinaryMatrix) -> bool {
        (Arc::ptr_eq(&self.contexts, &other.contexts) || self.contexts == other.contexts)
            && (Arc::ptr_eq(&self.objects, &other.objects) || self.objects == other.objects)
    }
}
