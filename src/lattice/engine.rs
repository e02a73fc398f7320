//! Lattice: derivation of concepts from a thresholded context matrix.
//!
//! The lattice owns the authoritative [`BinaryMatrix`]. Every concept it
//! hands out is checked to be *proper* against that matrix: its restricted
//! matrix agrees with the lattice on the included objects, and no excluded
//! object carries every included context.

use super::concept::Concept;
use crate::error::{CheckRole, LatticeError, Result};
use crate::kernel::{BinaryMatrix, BitVector, ContextMatrix};
use log::trace;

/// A formal concept lattice over one context matrix and support threshold.
#[derive(Clone, Debug)]
pub struct Lattice {
    context_matrix: ContextMatrix,
    threshold: f64,
    binary_matrix: BinaryMatrix,
    /// Mean share of each context's occurrences carried by each object
    object_confidence: Vec<f64>,
}

impl Lattice {
    /// Build a lattice, thresholding counts with `count >= threshold`.
    pub fn new(context_matrix: ContextMatrix, threshold: f64) -> Self {
        let binary_matrix = BinaryMatrix::from_threshold(&context_matrix, threshold);
        let object_confidence = Self::object_confidence_table(&context_matrix);
        Self {
            context_matrix,
            threshold,
            binary_matrix,
            object_confidence,
        }
    }

    pub fn context_matrix(&self) -> &ContextMatrix {
        &self.context_matrix
    }

    pub fn binary_matrix(&self) -> &BinaryMatrix {
        &self.binary_matrix
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Objects with at least one context at or above the threshold.
    pub fn supported_objects(&self) -> BitVector {
        self.binary_matrix.nonzero_columns()
    }

    /// Position of an object label.
    pub fn object_position(&self, object: &str) -> Result<usize> {
        self.binary_matrix
            .objects()
            .position(object)
            .ok_or_else(|| LatticeError::UnknownLabel {
                kind: "object",
                label: object.to_string(),
            })
    }

    /// Derive the concept generated by a single object.
    ///
    /// The object's column is the context set; the concept keeps every
    /// object whose column contains it.
    pub fn find_concept_for_object(&self, object: &str) -> Result<Concept> {
        let position = self.object_position(object)?;
        self.find_concept_for_object_at(position)
    }

    pub(crate) fn find_concept_for_object_at(&self, position: usize) -> Result<Concept> {
        let contexts = self.binary_matrix.column(position).clone();
        if contexts.is_empty() {
            return Err(LatticeError::UnsupportedObject(
                self.binary_matrix.objects().label(position).to_string(),
            ));
        }
        let concept = self.create_concept_from_contexts(contexts);
        self.ensure_proper(&concept, CheckRole::Postcondition, "find_concept_for_object")?;
        Ok(concept)
    }

    /// Formal subconcept: intersect the object sets.
    pub fn find_subconcept(&self, concept_1: &Concept, concept_2: &Concept) -> Result<Concept> {
        self.ensure_proper(concept_1, CheckRole::Precondition, "find_subconcept")?;
        self.ensure_proper(concept_2, CheckRole::Precondition, "find_subconcept")?;

        let objects = concept_1.objects().and(concept_2.objects());
        let concept_matrix = self.binary_matrix.keep_columns(&objects);
        let contexts = concept_matrix.and_of_columns(&objects);
        let confidence = self.mean_confidence_for_objects(&objects);
        let subconcept = Concept::new(concept_matrix, contexts, objects, confidence);

        self.ensure_proper(&subconcept, CheckRole::Postcondition, "find_subconcept")?;
        Ok(subconcept)
    }

    /// Formal superconcept: intersect the context sets.
    pub fn find_superconcept(&self, concept_1: &Concept, concept_2: &Concept) -> Result<Concept> {
        self.ensure_proper(concept_1, CheckRole::Precondition, "find_superconcept")?;
        self.ensure_proper(concept_2, CheckRole::Precondition, "find_superconcept")?;

        let contexts = concept_1.contexts().and(concept_2.contexts());
        let superconcept = self.create_concept_from_contexts(contexts);

        self.ensure_proper(&superconcept, CheckRole::Postcondition, "find_superconcept")?;
        Ok(superconcept)
    }

    /// Rebuild a concept from a restricted matrix, e.g. one loaded from disk.
    ///
    /// Objects, contexts and confidence are all re-derived from the matrix.
    /// A matrix that does not describe a proper concept is rejected as a
    /// precondition failure.
    pub fn create_concept_from_concept_matrix(&self, concept_matrix: BinaryMatrix) -> Result<Concept> {
        if !concept_matrix.same_labels(&self.binary_matrix) {
            return Err(LatticeError::ShapeMismatch {
                expected: self.binary_matrix.n_contexts() * self.binary_matrix.n_objects(),
                got: concept_matrix.n_contexts() * concept_matrix.n_objects(),
            });
        }
        let objects = concept_matrix.nonzero_columns();
        let contexts = concept_matrix.and_of_columns(&objects);
        let confidence = self.mean_confidence_for_objects(&objects);
        let concept = Concept::new(concept_matrix, contexts, objects, confidence);

        self.ensure_proper(&concept, CheckRole::Precondition, "create_concept_from_concept_matrix")?;
        Ok(concept)
    }

    /// Check that a concept is consistent and agrees with this lattice.
    pub fn is_proper(&self, concept: &Concept) -> bool {
        if !concept.matrix().same_labels(&self.binary_matrix) || !concept.is_consistent() {
            return false;
        }

        let objects_match = concept
            .objects()
            .iter_ones()
            .all(|o| concept.matrix().column(o) == self.binary_matrix.column(o));
        if !objects_match {
            return false;
        }

        // No excluded object may satisfy every included context.
        let leaking = concept
            .objects()
            .iter_zeros()
            .any(|o| concept.contexts().is_subset_of(self.binary_matrix.column(o)));
        !leaking
    }

    /// Mean confidence of the given objects.
    ///
    /// Returns `0.0` for an empty object set.
    pub fn mean_confidence_for_objects(&self, objects: &BitVector) -> f64 {
        let (sum, n) = objects
            .iter_ones()
            .fold((0.0, 0usize), |(sum, n), o| (sum + self.object_confidence[o], n + 1));
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    fn create_concept_from_contexts(&self, contexts: BitVector) -> Concept {
        let concept_matrix = self.binary_matrix.keep_columns_containing(&contexts);
        let objects = concept_matrix.nonzero_columns();
        let confidence = self.mean_confidence_for_objects(&objects);
        Concept::new(concept_matrix, contexts, objects, confidence)
    }

    fn ensure_proper(&self, concept: &Concept, role: CheckRole, operation: &'static str) -> Result<()> {
        if self.is_proper(concept) {
            return Ok(());
        }
        trace!("{} rejected concept in {}: {}", role, operation, concept);
        Err(LatticeError::NotProper {
            role,
            operation,
            concept: format!(
                "objects {:?}, contexts {:?}",
                concept.object_labels(),
                concept.context_labels()
            ),
        })
    }

    /// For each object: the mean, over contexts with a non-zero total, of
    /// the object's count divided by the context total.
    fn object_confidence_table(matrix: &ContextMatrix) -> Vec<f64> {
        let row_sums = matrix.row_sums();
        let live_rows: Vec<usize> = (0..row_sums.len()).filter(|&c| row_sums[c] > 0.0).collect();
        (0..matrix.objects().len())
            .map(|o| {
                if live_rows.is_empty() {
                    return 0.0;
                }
                let total: f64 = live_rows
                    .iter()
                    .map(|&c| matrix.get(c, o) / row_sums[c])
                    .sum();
                total / live_rows.len() as f64
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::test_support::{random_counts, seven_by_seven};

    #[test]
    fn test_seven_by_seven_base_concepts() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        let concept_a = lattice.find_concept_for_object("a").unwrap();
        let concept_f = lattice.find_concept_for_object("f").unwrap();

        assert!(concept_a.is_consistent());
        assert!(concept_f.is_consistent());

        // a: {r1, r2, r5, r7}; no other column has all four
        assert_eq!(concept_a.context_labels(), vec!["r1", "r2", "r5", "r7"]);
        assert_eq!(concept_a.object_labels(), vec!["a"]);
        // f: {r1, r5, r7}; a carries all three as well
        assert_eq!(concept_f.context_labels(), vec!["r1", "r5", "r7"]);
        assert_eq!(concept_f.object_labels(), vec!["a", "f"]);
    }

    #[test]
    fn test_seven_by_seven_subconcept() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        let concept_a = lattice.find_concept_for_object("a").unwrap();
        let concept_f = lattice.find_concept_for_object("f").unwrap();

        let sub = lattice.find_subconcept(&concept_a, &concept_f).unwrap();
        assert!(lattice.is_proper(&sub));
        assert!(sub.objects().is_subset_of(concept_a.objects()));
        assert!(sub.objects().is_subset_of(concept_f.objects()));
        assert_eq!(sub.objects(), &concept_a.objects().and(concept_f.objects()));
        assert_eq!(sub.context_labels(), vec!["r1", "r2", "r5", "r7"]);
    }

    #[test]
    fn test_seven_by_seven_superconcept() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        let concept_a = lattice.find_concept_for_object("a").unwrap();
        let concept_b = lattice.find_concept_for_object("b").unwrap();

        let sup = lattice.find_superconcept(&concept_a, &concept_b).unwrap();
        assert_eq!(sup.contexts(), &concept_a.contexts().and(concept_b.contexts()));
        assert_eq!(sup.context_labels(), vec!["r1", "r2", "r5"]);
        assert_eq!(sup.object_labels(), vec!["a", "b", "e"]);
        assert!(concept_a.objects().is_subset_of(sup.objects()));
        assert!(concept_b.objects().is_subset_of(sup.objects()));
    }

    #[test]
    fn test_single_context_scenario() {
        let matrix = ContextMatrix::from_rows(
            ["p", "q"],
            ["x", "y"],
            vec![vec![5.0, 0.0], vec![0.0, 2.0]],
        )
        .unwrap();
        let lattice = Lattice::new(matrix, 1.0);
        let concept = lattice.find_concept_for_object("x").unwrap();
        assert_eq!(concept.object_labels(), vec!["x"]);
        assert_eq!(concept.context_labels(), vec!["p"]);
        assert!(lattice.is_proper(&concept));
    }

    #[test]
    fn test_superconcept_idempotent() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        for label in ["a", "b", "c", "d", "e", "f", "g"] {
            let concept = lattice.find_concept_for_object(label).unwrap();
            let same = lattice.find_superconcept(&concept, &concept).unwrap();
            assert_eq!(same, concept, "object {}", label);
        }
    }

    #[test]
    fn test_confidence_is_mean_row_share() {
        let matrix = ContextMatrix::from_rows(
            ["p", "q", "empty"],
            ["x", "y"],
            vec![vec![3.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]],
        )
        .unwrap();
        let lattice = Lattice::new(matrix, 1.0);
        let x = lattice.find_concept_for_object("x").unwrap();
        // x: (3/3 + 1/2) / 2; the all-zero row is skipped
        assert_eq!(x.object_labels(), vec!["x"]);
        assert!((x.confidence() - 0.75).abs() < 1e-10);

        let y = lattice.find_concept_for_object("y").unwrap();
        // {q} is shared by x and y; mean of 0.75 and 0.25
        assert_eq!(y.object_labels(), vec!["x", "y"]);
        assert!((y.confidence() - 0.5).abs() < 1e-10);
        assert_eq!(lattice.mean_confidence_for_objects(&BitVector::zeros(2)), 0.0);
    }

    #[test]
    fn test_unknown_and_unsupported_objects() {
        let matrix = ContextMatrix::from_rows(
            ["p"],
            ["x", "y"],
            vec![vec![5.0, 1.0]],
        )
        .unwrap();
        let lattice = Lattice::new(matrix, 2.0);
        assert!(matches!(
            lattice.find_concept_for_object("z"),
            Err(LatticeError::UnknownLabel { .. })
        ));
        assert!(matches!(
            lattice.find_concept_for_object("y"),
            Err(LatticeError::UnsupportedObject(o)) if o == "y"
        ));
        assert_eq!(lattice.supported_objects(), BitVector::from_indexes(2, [0]));
    }

    #[test]
    fn test_improper_input_is_rejected() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        let other = Lattice::new(seven_by_seven(), 1.0);
        let foreign = other.find_concept_for_object("a").unwrap();
        let native = lattice.find_concept_for_object("a").unwrap();

        let err = lattice.find_superconcept(&foreign, &native).unwrap_err();
        assert!(matches!(
            err,
            LatticeError::NotProper { role: CheckRole::Precondition, .. }
        ));
    }

    #[test]
    fn test_concept_from_concept_matrix() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        let concept = lattice.find_concept_for_object("a").unwrap();
        let rebuilt = lattice
            .create_concept_from_concept_matrix(concept.matrix().clone())
            .unwrap();
        assert_eq!(rebuilt, concept);
        assert!((rebuilt.confidence() - concept.confidence()).abs() < 1e-10);
    }

    #[test]
    fn test_improper_concept_matrix_is_rejected() {
        let lattice = Lattice::new(seven_by_seven(), 4.0);
        // e alone: a and b also carry r1, r2 and r5
        let only_e = lattice
            .binary_matrix()
            .keep_columns(&BitVector::from_indexes(7, [4]));
        let err = lattice.create_concept_from_concept_matrix(only_e).unwrap_err();
        assert!(matches!(
            err,
            LatticeError::NotProper {
                role: CheckRole::Precondition,
                operation: "create_concept_from_concept_matrix",
                ..
            }
        ));
    }

    #[test]
    fn test_random_lattices_keep_invariants() {
        for seed in 0..20u64 {
            let lattice = Lattice::new(random_counts(seed, 9, 12), 3.0);
            let supported: Vec<usize> = lattice.supported_objects().iter_ones().collect();
            let concepts: Vec<Concept> = supported
                .iter()
                .map(|&o| lattice.find_concept_for_object_at(o).unwrap())
                .collect();

            for (concept, &o) in concepts.iter().zip(supported.iter()) {
                assert!(lattice.is_proper(concept));
                assert!(concept.objects().get(o), "seed {} object {}", seed, o);
            }

            for c1 in &concepts {
                for c2 in &concepts {
                    if c1.contexts().intersects(c2.contexts()) {
                        let sup = lattice.find_superconcept(c1, c2).unwrap();
                        assert_eq!(sup.contexts(), &c1.contexts().and(c2.contexts()));
                    }
                    if c1.objects().intersects(c2.objects()) {
                        let sub = lattice.find_subconcept(c1, c2).unwrap();
                        assert_eq!(sub.objects(), &c1.objects().and(c2.objects()));
                    }
                }
            }
        }
    }
}
