//! Lattice layer: formal concepts, their derivation, and merging.
//!
//! This module provides:
//!
//! - [`Concept`]: an object set / context set pair with its restricted
//!   binary matrix and a confidence score.
//!
//! - [`Lattice`]: owns the thresholded incidence matrix and derives
//!   concepts for single objects, subconcepts (object intersection) and
//!   superconcepts (context intersection), rejecting anything not proper.
//!
//! - [`MemorizingLattice`]: computes base concepts, greedily merges them
//!   into superconcepts under a confidence budget, and persists the result
//!   as a [`Workbook`].
//!
//! # Usage
//!
//! ```rust
//! use morphlattice::kernel::ContextMatrix;
//! use morphlattice::lattice::MemorizingLattice;
//!
//! let counts = ContextMatrix::from_rows(
//!     ["L(a)", "R(e)", "L(o)"],
//!     ["INS(s)", "INS(es)", "DEL(o)"],
//!     vec![
//!         vec![6.0, 1.0, 0.0],
//!         vec![5.0, 4.0, 0.0],
//!         vec![0.0, 0.0, 3.0],
//!     ],
//! )
//! .unwrap();
//!
//! let mut lattice = MemorizingLattice::new(counts, 2.0);
//! lattice.calculate_concepts().unwrap();
//! lattice.calculate_superconcepts(0.1).unwrap();
//! for concept in lattice.superconcepts() {
//!     println!("{:?} <- {:?}", concept.object_labels(), concept.context_labels());
//! }
//! ```

pub mod concept;
pub mod engine;
pub mod memorizing;
pub mod workbook;

pub use concept::Concept;
pub use engine::Lattice;
pub use memorizing::{MemorizingLattice, Phase};
pub use workbook::{Sheet, Workbook};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::kernel::ContextMatrix;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Deterministic counts in `0..6` for `c0..` × `o0..`.
    pub(crate) fn random_counts(seed: u64, contexts: usize, objects: usize) -> ContextMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows = (0..contexts)
            .map(|_| (0..objects).map(|_| rng.gen_range(0u32..6) as f64).collect())
            .collect();
        ContextMatrix::from_rows(
            (0..contexts).map(|c| format!("c{}", c)),
            (0..objects).map(|o| format!("o{}", o)),
            rows,
        )
        .unwrap()
    }

    /// Seven contexts (r1..r7) by seven objects (a..g).
    ///
    /// At threshold 4 the columns are
    /// a {r1 r2 r5 r7}, b {r1 r2 r3 r5}, c {r3 r4}, d {r3 r4 r6},
    /// e {r1 r2 r5}, f {r1 r5 r7}, g {r4 r6 r7}.
    pub(crate) fn seven_by_seven() -> ContextMatrix {
        ContextMatrix::from_rows(
            ["r1", "r2", "r3", "r4", "r5", "r6", "r7"],
            ["a", "b", "c", "d", "e", "f", "g"],
            vec![
                //    a    b    c    d    e    f    g
                vec![5.0, 4.0, 0.0, 1.0, 6.0, 4.0, 0.0],
                vec![4.0, 7.0, 2.0, 0.0, 5.0, 0.0, 1.0],
                vec![0.0, 4.0, 5.0, 4.0, 0.0, 3.0, 0.0],
                vec![1.0, 0.0, 4.0, 6.0, 0.0, 2.0, 5.0],
                vec![6.0, 5.0, 0.0, 0.0, 4.0, 8.0, 0.0],
                vec![0.0, 1.0, 3.0, 5.0, 2.0, 0.0, 4.0],
                vec![5.0, 0.0, 0.0, 1.0, 3.0, 4.0, 6.0],
            ],
        )
        .unwrap()
    }
}
