//! Morphology layer: from aligned word pairs to a context matrix, and from
//! merged concepts back to per-position operation predictions.
//!
//! ```rust
//! use morphlattice::config::ContextConfig;
//! use morphlattice::lattice::MemorizingLattice;
//! use morphlattice::morphology::{ContextMatrixBuilder, FeatureMatrix};
//!
//! let mut builder = ContextMatrixBuilder::new(ContextConfig::default());
//! for combined in ["hradINS(u)", "sadINS(u)", "ženINS(a)", "mDEL(ě)sto"] {
//!     builder.add_word(combined).unwrap();
//! }
//!
//! let mut lattice = MemorizingLattice::new(builder.build().unwrap(), 1.0);
//! lattice.calculate_concepts().unwrap();
//! lattice.calculate_superconcepts(0.0).unwrap();
//!
//! let features = FeatureMatrix::from_lattice(&lattice);
//! let predictions = features.predict_operations("plod", 2);
//! assert_eq!(predictions.last().unwrap().object, "INS(u)");
//! ```

pub mod context;
pub mod features;
pub mod operation;

pub use context::{left_context, right_context, ContextMatrixBuilder};
pub use features::{word_contexts, FeatureMatrix, Prediction};
pub use operation::{
    apply_edits, count_operations, read_transformations, CombinedWord, Edit, EditKind,
    Operation, Segment, Transformation,
};
