//! Species relation matrix.
//!
//! A dense `S×S` table of affinities in `[-1, 1]`. Row `i`, column `j` is how
//! strongly species `i` is drawn toward (positive) or pushed away from
//! (negative) species `j`. The matrix need not be symmetric; the force model
//! only ever consumes the symmetrized value returned by
//! [`RelationModel::symmetric`].

use crate::error::{Result, SimError};
use blops_data::SpeciesId;
use std::fmt;

/// Reference four-species matrix (P, L, C, O).
pub const DEFAULT_RELATIONS: [[f64; 4]; 4] = [
    [0.3, -0.8, 0.5, -0.4],
    [-0.7, 0.2, -0.6, 0.6],
    [0.6, -0.5, 0.4, -0.7],
    [-0.3, 0.7, -0.8, 0.1],
];

#[derive(Debug, Clone, PartialEq)]
pub struct RelationModel {
    species_count: usize,
    affinity: Vec<f64>,
    labels: Vec<String>,
}

impl RelationModel {
    /// Builds a model from row-major nested rows, rejecting anything that is
    /// not a complete square matrix of finite values in `[-1, 1]`.
    pub fn new(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(SimError::EmptyRelations);
        }
        if n > usize::from(u16::MAX) {
            return Err(SimError::invalid_parameter(format!(
                "too many species ({n})"
            )));
        }

        let mut affinity = Vec::with_capacity(n * n);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != n {
                return Err(SimError::NonSquareMatrix {
                    row,
                    len: values.len(),
                    expected: n,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SimError::NonFiniteAffinity { row, col });
                }
                if !(-1.0..=1.0).contains(&value) {
                    return Err(SimError::AffinityOutOfRange { row, col, value });
                }
                affinity.push(value);
            }
        }

        Ok(Self {
            species_count: n,
            affinity,
            labels: (0..n).map(|i| i.to_string()).collect(),
        })
    }

    /// Like [`RelationModel::new`], additionally checking that the matrix
    /// covers exactly `species_count` species.
    pub fn with_species_count(species_count: usize, rows: &[Vec<f64>]) -> Result<Self> {
        if rows.len() != species_count {
            return Err(SimError::SpeciesCountMismatch {
                species: species_count,
                matrix: rows.len(),
            });
        }
        Self::new(rows)
    }

    /// Replaces the row/column labels used by the `Display` table.
    ///
    /// Missing labels fall back to the numeric index; extra ones are ignored.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (slot, label) in self.labels.iter_mut().zip(labels) {
            *slot = label.into();
        }
        self
    }

    #[must_use]
    pub fn species_count(&self) -> usize {
        self.species_count
    }

    #[must_use]
    pub fn contains(&self, species: SpeciesId) -> bool {
        species.index() < self.species_count
    }

    /// Fails with [`SimError::SpeciesOutOfRange`] if `species` has no row.
    pub fn check_species(&self, species: SpeciesId) -> Result<()> {
        if self.contains(species) {
            Ok(())
        } else {
            Err(SimError::SpeciesOutOfRange {
                id: species.0,
                count: self.species_count,
            })
        }
    }

    /// Raw directional affinity of `from` toward `to`.
    ///
    /// Both ids must be in range; the simulation validates every blop's
    /// species before the first tick.
    #[inline]
    #[must_use]
    pub fn get(&self, from: SpeciesId, to: SpeciesId) -> f64 {
        self.affinity[from.index() * self.species_count + to.index()]
    }

    /// Mean of both directions: `0.5 * (a[i][j] + a[j][i])`.
    #[inline]
    #[must_use]
    pub fn symmetric(&self, a: SpeciesId, b: SpeciesId) -> f64 {
        0.5 * (self.get(a, b) + self.get(b, a))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.affinity.chunks_exact(self.species_count)
    }
}

impl Default for RelationModel {
    fn default() -> Self {
        Self {
            species_count: 4,
            affinity: DEFAULT_RELATIONS.iter().flatten().copied().collect(),
            labels: ["P", "L", "C", "O"].iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl fmt::Display for RelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels.iter().map(String::len).max().unwrap_or(1);
        write!(f, "{:width$} │", "")?;
        for label in &self.labels {
            write!(f, " {label:>4}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}┼{}", "─".repeat(width + 1), "─".repeat(5 * self.species_count))?;
        for (label, row) in self.labels.iter().zip(self.rows()) {
            write!(f, "{label:width$} │")?;
            for value in row {
                write!(f, " {value:+.1}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
