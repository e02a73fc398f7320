//! Error types for morphlattice.

use std::fmt;

use thiserror::Error;

/// Which side of a lattice derivation a properness check guarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckRole {
    /// An input concept handed to a derivation.
    Precondition,
    /// The concept a derivation produced.
    Postcondition,
}

impl fmt::Display for CheckRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckRole::Precondition => write!(f, "precondition"),
            CheckRole::Postcondition => write!(f, "postcondition"),
        }
    }
}

/// morphlattice error types.
#[derive(Error, Debug)]
pub enum LatticeError {
    /// A concept failed the properness check against its lattice
    #[error("{role} violated in {operation}: concept is not proper ({concept})")]
    NotProper {
        role: CheckRole,
        operation: &'static str,
        concept: String,
    },

    /// Merging dropped objects that no superconcept covers any more
    #[error("superconcepts do not cover objects: {missing:?}")]
    Coverage { missing: Vec<String> },

    /// The merge phase was started before base concepts were calculated
    #[error("base concepts have not been calculated")]
    BaseConceptsMissing,

    /// Label not present in the lattice
    #[error("unknown {kind} label: {label}")]
    UnknownLabel { kind: &'static str, label: String },

    /// Object whose column has no context at or above the support threshold
    #[error("object {0} has no context at or above the support threshold")]
    UnsupportedObject(String),

    /// Label listed twice in one axis
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    /// Matrix data does not fit the declared labels
    #[error("shape mismatch: expected {expected} cells, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Negative or non-finite occurrence count
    #[error("invalid count {value} at context {context}, object {object}")]
    InvalidCount {
        context: String,
        object: String,
        value: f64,
    },

    /// Persisted sheet that cannot be turned back into a concept matrix
    #[error("malformed sheet {sheet}: {reason}")]
    MalformedSheet { sheet: String, reason: String },

    /// Combined string or edit token that cannot be parsed or applied
    #[error("malformed edit: {0}")]
    MalformedEdit(String),

    /// Unparseable input line
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for morphlattice operations.
pub type Result<T> = std::result::Result<T, LatticeError>;
