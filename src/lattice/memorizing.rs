//! MemorizingLattice: base concepts, greedy superconcept merging, persistence.
//!
//! The lattice runs in two phases:
//!
//! 1. **Base phase** ([`MemorizingLattice::calculate_concepts`]) derives one
//!    concept per supported object and deduplicates them by
//!    (object set, context set), keeping the first in object order.
//! 2. **Merge phase** ([`MemorizingLattice::calculate_superconcepts`])
//!    greedily merges concepts that share a context while the merged
//!    concept keeps each side's confidence within a threshold.
//!
//! The merge is order dependent: the queue starts in base-concept order, a
//! concept merges with the *first* acceptable partner, and the merged
//! concept goes to the back of the queue. Changing that policy changes the
//! resulting superconcepts.

use super::concept::Concept;
use super::engine::Lattice;
use super::workbook::Workbook;
use crate::config::LatticeConfig;
use crate::error::{LatticeError, Result};
use crate::kernel::{BitVector, ContextMatrix};
use log::{debug, info, trace, warn};
use std::collections::{HashSet, VecDeque};
use std::path::Path;

/// Progress of a [`MemorizingLattice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing calculated yet
    Empty,
    /// Base concepts available
    BaseConcepts,
    /// Base concepts and merged superconcepts available
    Superconcepts,
    /// Superconcepts loaded from a workbook; no base concepts
    Loaded,
}

/// A lattice that remembers its base concepts and merged superconcepts.
#[derive(Clone, Debug)]
pub struct MemorizingLattice {
    lattice: Lattice,
    concepts: Vec<Concept>,
    superconcepts: Vec<Concept>,
    phase: Phase,
}

impl MemorizingLattice {
    /// Create a memorizing lattice over a context matrix.
    pub fn new(context_matrix: ContextMatrix, support_threshold: f64) -> Self {
        Self::from_lattice(Lattice::new(context_matrix, support_threshold))
    }

    /// Create a memorizing lattice using the thresholds from a config.
    pub fn with_config(context_matrix: ContextMatrix, config: &LatticeConfig) -> Self {
        Self::new(context_matrix, config.support_threshold)
    }

    pub fn from_lattice(lattice: Lattice) -> Self {
        Self {
            lattice,
            concepts: Vec::new(),
            superconcepts: Vec::new(),
            phase: Phase::Empty,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Base concepts from the last [`calculate_concepts`](Self::calculate_concepts).
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Superconcepts from the last merge or load.
    pub fn superconcepts(&self) -> &[Concept] {
        &self.superconcepts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn has_base_concepts(&self) -> bool {
        matches!(self.phase, Phase::BaseConcepts | Phase::Superconcepts)
    }

    // =========================================================================
    // Base phase
    // =========================================================================

    /// Derive one concept per supported object.
    ///
    /// Objects with no context at or above the support threshold are
    /// skipped. Duplicate concepts are dropped, keeping the first.
    pub fn calculate_concepts(&mut self) -> Result<()> {
        let n_objects = self.lattice.binary_matrix().n_objects();
        let supported = self.lattice.supported_objects();
        let mut seen: HashSet<(BitVector, BitVector)> = HashSet::new();
        let mut concepts = Vec::new();

        for o in 0..n_objects {
            if !supported.get(o) {
                warn!(
                    "Skipping object {}: no context reaches the support threshold",
                    self.lattice.binary_matrix().objects().label(o)
                );
                continue;
            }
            debug!("Base concepts left: {}", n_objects - o);
            let concept = self.lattice.find_concept_for_object_at(o)?;
            if seen.insert((concept.objects().clone(), concept.contexts().clone())) {
                concepts.push(concept);
            }
        }

        info!(
            "Calculated {} base concepts for {} objects",
            concepts.len(),
            supported.count_ones()
        );
        self.concepts = concepts;
        self.superconcepts.clear();
        self.phase = Phase::BaseConcepts;
        Ok(())
    }

    // =========================================================================
    // Merge phase
    // =========================================================================

    /// Merge base concepts into superconcepts until no merge is accepted.
    ///
    /// A merge of two concepts sharing a context is accepted when the
    /// merged confidence is at least each input's confidence minus
    /// `confidence_threshold`. The result replaces any earlier
    /// superconcepts and must cover every supported object.
    pub fn calculate_superconcepts(&mut self, confidence_threshold: f64) -> Result<()> {
        if !self.has_base_concepts() {
            return Err(LatticeError::BaseConceptsMissing);
        }

        let merged = Self::merge_concepts_til_convergence(&self.concepts, |c_1, c_2| {
            self.create_superconcept_if_better(c_1, c_2, confidence_threshold)
        })?;
        let superconcepts = Self::remove_repeating_concepts(merged);

        let missing = self.uncovered_objects(&superconcepts);
        if !missing.is_empty() {
            return Err(LatticeError::Coverage { missing });
        }

        info!(
            "Merged {} base concepts into {} superconcepts (confidence threshold {})",
            self.concepts.len(),
            superconcepts.len(),
            confidence_threshold
        );
        self.superconcepts = superconcepts;
        self.phase = Phase::Superconcepts;
        Ok(())
    }

    /// Run the merge phase with the confidence threshold from a config.
    pub fn calculate_superconcepts_with(&mut self, config: &LatticeConfig) -> Result<()> {
        self.calculate_superconcepts(config.confidence_threshold)
    }

    /// Every superconcept of a pair of base concepts that share a context.
    ///
    /// Exhaustive and quadratic; independent of queue order. Duplicates are
    /// removed, keeping the first.
    pub fn pairwise_superconcepts(&self) -> Result<Vec<Concept>> {
        if !self.has_base_concepts() {
            return Err(LatticeError::BaseConceptsMissing);
        }
        let mut superconcepts = Vec::new();
        for (i, concept_1) in self.concepts.iter().enumerate() {
            for concept_2 in &self.concepts[i + 1..] {
                // without a shared context the superconcept is the whole matrix
                if concept_1.contexts().intersects(concept_2.contexts()) {
                    superconcepts.push(self.lattice.find_superconcept(concept_1, concept_2)?);
                }
            }
        }
        Ok(Self::remove_repeating_concepts(superconcepts))
    }

    /// Greedily intersect base concepts that share an object.
    ///
    /// Runs the merge-phase queue with the subconcept as the merged concept
    /// and the same confidence bound. The result narrows object sets, so it
    /// carries no coverage check and leaves the superconcepts untouched.
    pub fn calculate_subconcepts(&self, confidence_threshold: f64) -> Result<Vec<Concept>> {
        if !self.has_base_concepts() {
            return Err(LatticeError::BaseConceptsMissing);
        }
        let merged = Self::merge_concepts_til_convergence(&self.concepts, |c_1, c_2| {
            self.create_subconcept_if_better(c_1, c_2, confidence_threshold)
        })?;
        Ok(Self::remove_repeating_concepts(merged))
    }

    fn merge_concepts_til_convergence<F>(
        concepts: &[Concept],
        merge_op: F,
    ) -> Result<Vec<Concept>>
    where
        F: Fn(&Concept, &Concept) -> Result<Option<Concept>>,
    {
        let mut queue: VecDeque<Concept> = concepts.iter().cloned().collect();
        let mut resulting_concepts = Vec::new();

        while queue.len() > 1 {
            let Some(current) = queue.pop_front() else {
                break;
            };
            let mut left_to_check = queue.len();
            trace!("Concepts left to check: {}", left_to_check);

            while left_to_check > 0 {
                let Some(next) = queue.pop_front() else {
                    break;
                };
                if let Some(merged) = merge_op(&current, &next)? {
                    queue.push_back(merged);
                    break;
                }
                queue.push_back(next);
                left_to_check -= 1;
            }

            if left_to_check == 0 {
                resulting_concepts.push(current);
            }
        }

        resulting_concepts.extend(queue);
        Ok(resulting_concepts)
    }

    fn create_superconcept_if_better(
        &self,
        concept_1: &Concept,
        concept_2: &Concept,
        confidence_threshold: f64,
    ) -> Result<Option<Concept>> {
        if !concept_1.contexts().intersects(concept_2.contexts()) {
            return Ok(None);
        }
        let superconcept = self.lattice.find_superconcept(concept_1, concept_2)?;
        if Self::is_better_confidence(concept_1, concept_2, &superconcept, confidence_threshold) {
            Ok(Some(superconcept))
        } else {
            Ok(None)
        }
    }

    fn create_subconcept_if_better(
        &self,
        concept_1: &Concept,
        concept_2: &Concept,
        confidence_threshold: f64,
    ) -> Result<Option<Concept>> {
        if !concept_1.objects().intersects(concept_2.objects()) {
            return Ok(None);
        }
        let subconcept = self.lattice.find_subconcept(concept_1, concept_2)?;
        if Self::is_better_confidence(concept_1, concept_2, &subconcept, confidence_threshold) {
            Ok(Some(subconcept))
        } else {
            Ok(None)
        }
    }

    fn is_better_confidence(
        concept_1: &Concept,
        concept_2: &Concept,
        merged: &Concept,
        confidence_threshold: f64,
    ) -> bool {
        concept_1.confidence() - confidence_threshold <= merged.confidence()
            && concept_2.confidence() - confidence_threshold <= merged.confidence()
    }

    fn remove_repeating_concepts(concepts: Vec<Concept>) -> Vec<Concept> {
        let mut seen: HashSet<(BitVector, BitVector)> = HashSet::new();
        concepts
            .into_iter()
            .filter(|c| seen.insert((c.objects().clone(), c.contexts().clone())))
            .collect()
    }

    /// Supported objects that no concept in `concepts` includes.
    fn uncovered_objects(&self, concepts: &[Concept]) -> Vec<String> {
        let supported = self.lattice.supported_objects();
        let covered = concepts
            .iter()
            .fold(BitVector::zeros(supported.len()), |acc, c| acc.or(c.objects()));
        let objects = self.lattice.binary_matrix().objects();
        supported
            .and_not(&covered)
            .iter_ones()
            .map(|o| objects.label(o).to_string())
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write every superconcept as one sheet of a JSON workbook.
    pub fn save_superconcepts(&self, path: impl AsRef<Path>) -> Result<()> {
        let workbook = Workbook::from_concepts(&self.superconcepts);
        workbook.save(path)?;
        info!("Saved {} superconcepts", workbook.len());
        Ok(())
    }

    /// Replace the superconcepts with those stored in a JSON workbook.
    ///
    /// Objects, contexts and confidence are re-derived by the lattice.
    pub fn load_superconcepts(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let workbook = Workbook::load(path)?;
        let superconcepts = workbook
            .sheets()
            .iter()
            .map(|sheet| {
                let matrix = sheet.to_binary_matrix(self.lattice.binary_matrix())?;
                self.lattice.create_concept_from_concept_matrix(matrix)
            })
            .collect::<Result<Vec<_>>>()?;
        info!("Loaded {} superconcepts", superconcepts.len());
        self.superconcepts = superconcepts;
        self.phase = if self.has_base_concepts() {
            Phase::Superconcepts
        } else {
            Phase::Loaded
        };
        Ok(())
    }

    /// Log every base concept at debug level.
    pub fn log_concepts(&self) {
        for concept in &self.concepts {
            debug!("{}", concept);
        }
    }

    /// Log every superconcept at debug level.
    pub fn log_superconcepts(&self) {
        for concept in &self.superconcepts {
            debug!("{}", concept);
        }
    }
}
