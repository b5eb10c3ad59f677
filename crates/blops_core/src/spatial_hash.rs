use blops_data::{Blop, Position};
use std::collections::HashMap;

/// Integer grid coordinate of a cell.
pub type CellCoord = (i32, i32);

/// Offsets of the 3×3 block searched around a cell, row by row.
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Debug)]
/// Uniform grid over blop positions, rebuilt once per tick.
///
/// Maps integer cell coordinates `(floor(x / cell_size), floor(y / cell_size))`
/// to the indices of the blops inside, in insertion order. The grid is
/// unbounded: any finite position has a cell, including negative ones.
///
/// # Performance Characteristics
/// - Rebuild: O(entity_count), no allocation once every visited cell exists
/// - Neighbor query: O(entities in the 3×3 block)
///
/// # Implementation Notes
/// - Stores indices into the caller's blop slice, never the blops themselves
/// - Cell vectors are cleared rather than dropped between rebuilds, so an
///   emptied cell stays in the map with no entries; every read path treats
///   an empty cell the same as an absent one
/// - A neighbor query always covers the full 3×3 block; with the default
///   `cell_size = 200` and a 300-unit interaction radius a single-cell lookup
///   would miss most partners
///
/// # Examples
/// ```
/// use blops_core::spatial_hash::SpatialIndex;
/// use blops_data::{Blop, SpeciesId};
///
/// let blops = vec![
///     Blop::new(210.0, 100.0, SpeciesId(0)),
///     Blop::new(460.0, 100.0, SpeciesId(1)),
/// ];
/// let mut index = SpatialIndex::new(200.0);
/// index.rebuild(&blops);
///
/// let near: Vec<usize> = index.neighbors_of(1, 0).collect();
/// assert_eq!(near, vec![0, 1]);
/// ```
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellCoord, Vec<usize>>,
    len: usize,
}

impl SpatialIndex {
    /// Creates an empty index.
    ///
    /// `cell_size` must be positive and finite; non-positive sizes are
    /// rejected earlier by configuration validation.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Computes the cell holding a world coordinate.
    ///
    /// Returns `None` for non-finite coordinates and for coordinates whose
    /// cell would not fit in an `i32`.
    #[inline]
    #[must_use]
    pub fn cell_of(&self, x: f64, y: f64) -> Option<CellCoord> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let cx = (x / self.cell_size).floor();
        let cy = (y / self.cell_size).floor();
        if cx < f64::from(i32::MIN)
            || cx > f64::from(i32::MAX)
            || cy < f64::from(i32::MIN)
            || cy > f64::from(i32::MAX)
        {
            return None;
        }
        Some((cx as i32, cy as i32))
    }

    #[inline]
    #[must_use]
    pub fn cell_of_position(&self, p: &Position) -> Option<CellCoord> {
        self.cell_of(p.x, p.y)
    }

    /// Clears every cell and reinserts all blops by their current position.
    pub fn rebuild(&mut self, blops: &[Blop]) {
        self.rebuild_positions(blops.iter().map(|b| b.position));
    }

    /// Same as [`SpatialIndex::rebuild`] for bare positions; the i-th item is
    /// stored as index `i`.
    ///
    /// Positions without a cell (NaN, infinite) are left out of the index.
    pub fn rebuild_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Position>,
    {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
        self.len = 0;

        let mut skipped = 0usize;
        for (idx, p) in positions.into_iter().enumerate() {
            match self.cell_of(p.x, p.y) {
                Some(key) => {
                    self.cells.entry(key).or_default().push(idx);
                    self.len += 1;
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Positions without a grid cell left out of index");
        }
    }

    /// Entities stored in exactly one cell; empty for absent cells.
    #[must_use]
    pub fn cell(&self, cx: i32, cy: i32) -> &[usize] {
        self.cells.get(&(cx, cy)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lazily yields every entity in the 3×3 block centered on `(cx, cy)`.
    ///
    /// Absent cells (and cells off the edge of the `i32` range) contribute
    /// nothing.
    pub fn neighbors_of(&self, cx: i32, cy: i32) -> impl Iterator<Item = usize> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| Some((cx.checked_add(dx)?, cy.checked_add(dy)?)))
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|cell| cell.iter().copied())
    }

    /// Neighbor block around the cell containing `p`; empty if `p` has no cell.
    pub fn neighbors_of_position(&self, p: &Position) -> impl Iterator<Item = usize> + '_ {
        self.cell_of(p.x, p.y)
            .into_iter()
            .flat_map(move |(cx, cy)| self.neighbors_of(cx, cy))
    }

    /// Number of entities in the 3×3 block around `(cx, cy)`.
    #[must_use]
    pub fn count_nearby(&self, cx: i32, cy: i32) -> usize {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| Some((cx.checked_add(dx)?, cy.checked_add(dy)?)))
            .map(|(x, y)| self.cell(x, y).len())
            .sum()
    }

    /// Iterates over non-empty cells in unspecified order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, &[usize])> {
        self.cells
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (*k, v.as_slice()))
    }

    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.cells.values().filter(|v| !v.is_empty()).count()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(200.0)
    }
}
