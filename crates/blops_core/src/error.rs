//! Error types for blops_core.
//!
//! The per-tick engine has no failure path; everything here is raised while
//! building a simulation from caller-supplied configuration.

use thiserror::Error;

/// Configuration errors rejected at initialization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Relation matrix has no rows
    #[error("Relation matrix is empty")]
    EmptyRelations,

    /// A row length differs from the number of rows
    #[error("Relation matrix is not square: row {row} has {len} entries, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Matrix dimension does not match the declared species count
    #[error("Species count {species} does not match relation matrix size {matrix}")]
    SpeciesCountMismatch { species: usize, matrix: usize },

    #[error("Affinity at ({row}, {col}) is not finite")]
    NonFiniteAffinity { row: usize, col: usize },

    #[error("Affinity at ({row}, {col}) is {value}, outside [-1, 1]")]
    AffinityOutOfRange { row: usize, col: usize, value: f64 },

    /// A blop refers to a species the relation matrix does not cover
    #[error("Species id {id} out of range (species count {count})")]
    SpeciesOutOfRange { id: u16, count: usize },

    /// World too small to hold the wall margin (or non-finite)
    #[error("Invalid world bounds {width}x{height}: {reason}")]
    InvalidBounds {
        width: f64,
        height: f64,
        reason: String,
    },

    /// Generic physics parameter validation failure
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for blops_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    #[must_use]
    pub fn invalid_bounds<S: Into<String>>(width: f64, height: f64, reason: S) -> Self {
        Self::InvalidBounds {
            width,
            height,
            reason: reason.into(),
        }
    }
}
