//! Uniform spatial grid for radius-bounded neighbour queries.
//!
//! The grid covers the square `[0, extent) x [0, extent)` with a fixed number
//! of cells per axis. Each cell owns the points inserted inside its bounds.
//! [`SpatialGrid::points_near`] visits every cell overlapping the query square,
//! so it may return points farther away than the search radius; callers filter
//! by true distance.
use glam::Vec2;

use crate::error::{Error, Result};

/// Default cell extent as a multiple of the exclusion radius.
pub const DEFAULT_CELL_EXTENT_FACTOR: f32 = 4.0;

/// Default upper bound on the number of cells along each axis.
pub const DEFAULT_MAX_CELLS_PER_AXIS: usize = 64;

/// Sizing policy for grids built from an exclusion radius.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Desired cell extent as a multiple of the exclusion radius.
    pub cell_extent_factor: f32,
    /// Cap on cells per axis. Larger grids answer queries faster but use more memory.
    pub max_cells_per_axis: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_extent_factor: DEFAULT_CELL_EXTENT_FACTOR,
            max_cells_per_axis: DEFAULT_MAX_CELLS_PER_AXIS,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cell extent factor.
    pub fn with_cell_extent_factor(mut self, cell_extent_factor: f32) -> Self {
        self.cell_extent_factor = cell_extent_factor;
        self
    }

    /// Sets the maximum number of cells per axis.
    pub fn with_max_cells_per_axis(mut self, max_cells_per_axis: usize) -> Self {
        self.max_cells_per_axis = max_cells_per_axis;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.cell_extent_factor.is_finite() || self.cell_extent_factor <= 0.0 {
            return Err(Error::InvalidConfig(
                "cell_extent_factor must be finite and > 0".into(),
            ));
        }
        if self.max_cells_per_axis == 0 {
            return Err(Error::InvalidConfig("max_cells_per_axis must be > 0".into()));
        }
        Ok(())
    }

    /// Number of cells per axis for a unit square and the given radius.
    pub fn cells_per_axis(&self, radius: f32) -> usize {
        let desired = (1.0 / (self.cell_extent_factor * radius)).ceil();
        if desired.is_finite() && desired >= 1.0 {
            (desired as usize).min(self.max_cells_per_axis)
        } else {
            1
        }
    }
}

/// Integer coordinates of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord(
    /// Cell index along the X axis.
    pub usize,
    /// Cell index along the Y axis.
    pub usize,
);

/// Uniform grid of point buckets over a square domain anchored at the origin.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    extent: f32,
    cells_per_axis: usize,
    cells: Vec<Vec<Vec2>>,
    len: usize,
}

impl SpatialGrid {
    /// Allocate enough cells of `cell_size` to cover `[0, extent)` on both axes.
    pub fn new(cell_size: f32, extent: f32) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidConfig(
                "grid cell_size must be finite and > 0".into(),
            ));
        }
        if !extent.is_finite() || extent <= 0.0 {
            return Err(Error::InvalidConfig(
                "grid extent must be finite and > 0".into(),
            ));
        }
        let cells_per_axis = (extent / cell_size).ceil().max(1.0) as usize;
        Ok(Self::with_cells(cell_size, extent, cells_per_axis))
    }

    /// Build a grid over the unit square sized for an exclusion radius.
    pub fn for_radius(radius: f32, config: &GridConfig) -> Result<Self> {
        config.validate()?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidConfig("radius must be finite and > 0".into()));
        }
        let cells_per_axis = config.cells_per_axis(radius);
        Ok(Self::with_cells(
            1.0 / cells_per_axis as f32,
            1.0,
            cells_per_axis,
        ))
    }

    fn with_cells(cell_size: f32, extent: f32, cells_per_axis: usize) -> Self {
        Self {
            cell_size,
            extent,
            cells_per_axis,
            cells: vec![Vec::new(); cells_per_axis * cells_per_axis],
            len: 0,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Number of cells along (X, Y).
    #[inline]
    pub fn cell_index_bounds(&self) -> (usize, usize) {
        (self.cells_per_axis, self.cells_per_axis)
    }

    /// Number of points stored in the grid.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.extent && p.y >= 0.0 && p.y < self.extent
    }

    #[inline]
    fn axis_index(&self, v: f32) -> usize {
        ((v / self.cell_size) as usize).min(self.cells_per_axis - 1)
    }

    #[inline]
    fn cell_index(&self, cell: CellCoord) -> usize {
        cell.1 * self.cells_per_axis + cell.0
    }

    /// Returns the cell containing `p`.
    pub fn cell_of(&self, p: Vec2) -> Result<CellCoord> {
        if !self.contains(p) {
            return Err(Error::OutOfBounds { x: p.x, y: p.y });
        }
        Ok(CellCoord(self.axis_index(p.x), self.axis_index(p.y)))
    }

    /// Inclusive range of cells overlapping the square of half-side `search_radius` around `p`.
    pub fn cell_range_around(&self, p: Vec2, search_radius: f32) -> Result<(CellCoord, CellCoord)> {
        self.cell_of(p)?;
        let r = search_radius.max(0.0);
        let last = self.cells_per_axis - 1;
        let lo = |v: f32| ((v - r) / self.cell_size).floor().max(0.0) as usize;
        let hi = |v: f32| (((v + r) / self.cell_size).floor().max(0.0) as usize).min(last);
        Ok((
            CellCoord(lo(p.x).min(last), lo(p.y).min(last)),
            CellCoord(hi(p.x), hi(p.y)),
        ))
    }

    /// Add `p` to the cell containing it.
    pub fn insert(&mut self, p: Vec2) -> Result<CellCoord> {
        let cell = self.cell_of(p)?;
        let idx = self.cell_index(cell);
        self.cells[idx].push(p);
        self.len += 1;
        Ok(cell)
    }

    /// Points stored in a single cell, or `None` if the cell does not exist.
    pub fn points_in_cell(&self, cell: CellCoord) -> Option<&[Vec2]> {
        if cell.0 >= self.cells_per_axis || cell.1 >= self.cells_per_axis {
            return None;
        }
        Some(&self.cells[self.cell_index(cell)])
    }

    /// Lazily yield the points of every cell overlapping the square of side
    /// `2 * search_radius` centred on `p`. Order is unspecified.
    pub fn points_near(
        &self,
        p: Vec2,
        search_radius: f32,
    ) -> Result<impl Iterator<Item = Vec2> + '_> {
        let (CellCoord(x0, y0), CellCoord(x1, y1)) = self.cell_range_around(p, search_radius)?;
        let width = self.cells_per_axis;
        Ok((y0..=y1)
            .flat_map(move |y| (x0..=x1).map(move |x| y * width + x))
            .flat_map(move |idx| self.cells[idx].iter().copied()))
    }
}
