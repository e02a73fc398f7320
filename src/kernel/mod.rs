//! Kernel layer: boolean vector and matrix primitives.
//!
//! The kernel provides the dense building blocks the lattice is made of:
//! - Packed boolean label vectors ([`BitVector`])
//! - Label ↔ index arenas ([`LabelIndex`])
//! - Raw count matrices ([`ContextMatrix`]) and their thresholded
//!   incidence view ([`BinaryMatrix`])
//!
//! This layer has no dependencies on [`lattice`](crate::lattice) or
//! [`morphology`](crate::morphology).
//!
//! # Example
//!
//! ```rust
//! use morphlattice::kernel::{BinaryMatrix, ContextMatrix};
//!
//! let counts = ContextMatrix::from_rows(
//!     ["L(a)", "R(b)"],
//!     ["INS(x)", "DEL(y)"],
//!     vec![vec![4.0, 0.0], vec![1.0, 2.0]],
//! )
//! .unwrap();
//! let binary = BinaryMatrix::from_threshold(&counts, 2.0);
//! assert!(binary.get(0, 0));
//! assert!(!binary.get(1, 0));
//! ```

pub mod bits;
pub mod labels;
pub mod matrix;

pub use bits::BitVector;
pub use labels::LabelIndex;
pub use matrix::{BinaryMatrix, ContextMatrix};
