//! # morphlattice: concept lattices for morphological inflection
//!
//! Operations that turn a lemma into an inflected form (`INS(u)`, `DEL(ě)`)
//! are described by the characters around them (`L(d)`, `R(st)`). Counting
//! those contexts gives a context × operation matrix; Formal Concept Analysis
//! over its thresholded form groups operations that share contexts, and a
//! greedy merge collapses the groups into a small set of superconcepts that
//! still covers every operation.
//!
//! ## Quick Start
//!
//! ```rust
//! use morphlattice::{Config, MorphLattice};
//!
//! let mut model = MorphLattice::new(Config::default());
//! model
//!     .fit(["hradINS(u)", "sadINS(u)", "ženINS(a)", "mDEL(ě)sto"])
//!     .unwrap();
//!
//! for concept in model.superconcepts() {
//!     println!("{:?} <- {:?}", concept.object_labels(), concept.context_labels());
//! }
//!
//! let predictions = model.predict("plod").unwrap();
//! assert_eq!(predictions.last().unwrap().object, "INS(u)");
//! ```
//!
//! ## Layers
//!
//! - **kernel**: labels, packed bit vectors, count and binary matrices
//! - **lattice**: concepts, derivations, base concepts and the merge
//! - **morphology**: combined words, context extraction, prediction
//! - **config**: JSON configuration with defaults

pub mod config;
pub mod error;
pub mod kernel;
pub mod lattice;
pub mod morphology;

// Re-exports for convenience
pub use config::{Config, ContextConfig, FeatureConfig, LatticeConfig};
pub use error::{CheckRole, LatticeError, Result};
pub use kernel::{BinaryMatrix, BitVector, ContextMatrix, LabelIndex};
pub use lattice::{Concept, Lattice, MemorizingLattice, Phase, Sheet, Workbook};
pub use morphology::{
    CombinedWord, ContextMatrixBuilder, Edit, EditKind, FeatureMatrix, Operation, Prediction,
    Transformation,
};

use std::path::Path;

/// The main entry point: aligned words in, superconcepts and predictions out.
///
/// `fit` runs context extraction, base concepts and the merge with the
/// thresholds of its [`Config`]; `predict` uses the resulting feature rows.
pub struct MorphLattice {
    config: Config,
    lattice: Option<MemorizingLattice>,
    features: Option<FeatureMatrix>,
}

impl MorphLattice {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lattice: None,
            features: None,
        }
    }

    /// Create from a JSON config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Config::load(path)?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the lattice from combined strings such as `hradINS(u)`.
    pub fn fit<I, S>(&mut self, combined: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = ContextMatrixBuilder::new(self.config.context.clone());
        for word in combined {
            builder.add_word(word.as_ref())?;
        }
        self.fit_matrix(builder.build()?)
    }

    /// Build the lattice from an existing count matrix.
    pub fn fit_matrix(&mut self, counts: ContextMatrix) -> Result<()> {
        let mut lattice = MemorizingLattice::with_config(counts, &self.config.lattice);
        lattice.calculate_concepts()?;
        lattice.calculate_superconcepts_with(&self.config.lattice)?;
        self.features = Some(FeatureMatrix::from_lattice(&lattice));
        self.lattice = Some(lattice);
        Ok(())
    }

    /// Restore superconcepts saved by [`MorphLattice::save`] over `counts`.
    pub fn load(&mut self, counts: ContextMatrix, path: impl AsRef<Path>) -> Result<()> {
        let mut lattice = MemorizingLattice::with_config(counts, &self.config.lattice);
        lattice.load_superconcepts(path)?;
        self.features = Some(FeatureMatrix::from_lattice(&lattice));
        self.lattice = Some(lattice);
        Ok(())
    }

    /// Persist the superconcepts as a workbook.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.fitted()?.save_superconcepts(path)
    }

    pub fn lattice(&self) -> Option<&MemorizingLattice> {
        self.lattice.as_ref()
    }

    /// Superconcepts of the last fit; empty before fitting.
    pub fn superconcepts(&self) -> &[Concept] {
        self.lattice
            .as_ref()
            .map(|lattice| lattice.superconcepts())
            .unwrap_or(&[])
    }

    /// Most likely operation at each position of `word` that has a known context.
    pub fn predict(&self, word: &str) -> Result<Vec<Prediction>> {
        let features = self
            .features
            .as_ref()
            .ok_or(LatticeError::BaseConceptsMissing)?;
        Ok(features.predict_operations(word, self.config.features.max_context_len))
    }

    fn fitted(&self) -> Result<&MemorizingLattice> {
        self.lattice.as_ref().ok_or(LatticeError::BaseConceptsMissing)
    }
}

impl Default for MorphLattice {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [&str; 5] = [
        "hradINS(u)",
        "sadINS(u)",
        "plotINS(u)",
        "ženINS(a)",
        "mDEL(ě)sto",
    ];

    #[test]
    fn test_predict_before_fit_fails() {
        let model = MorphLattice::default();
        assert!(model.superconcepts().is_empty());
        assert!(matches!(
            model.predict("hrad"),
            Err(LatticeError::BaseConceptsMissing)
        ));
    }

    #[test]
    fn test_fit_covers_every_operation() {
        let mut model = MorphLattice::default();
        model.fit(WORDS).unwrap();

        let mut covered: Vec<&str> = model
            .superconcepts()
            .iter()
            .flat_map(|c| c.object_labels())
            .collect();
        covered.sort();
        covered.dedup();
        assert_eq!(covered, vec!["DEL(ě)", "INS(a)", "INS(u)"]);
    }

    #[test]
    fn test_predict_suffix() {
        let mut model = MorphLattice::default();
        model.fit(WORDS).unwrap();
        let predictions = model.predict("lid").unwrap();
        let last = predictions.last().unwrap();
        assert_eq!(last.position, 3);
        assert_eq!(last.object, "INS(u)");
    }

    #[test]
    fn test_save_and_load() {
        let mut model = MorphLattice::default();
        model.fit(WORDS).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("superconcepts.json");
        model.save(&path).unwrap();

        let mut counts = ContextMatrixBuilder::new(model.config().context.clone());
        for word in WORDS {
            counts.add_word(word).unwrap();
        }
        let mut restored = MorphLattice::default();
        restored.load(counts.build().unwrap(), &path).unwrap();
        assert_eq!(restored.superconcepts(), model.superconcepts());
        assert_eq!(restored.predict("lid").unwrap(), model.predict("lid").unwrap());
    }
}
