//! The square resource grid.
//!
//! Cells are stored row-major (`y * size + x`). Every cell always carries an
//! entry for each [`ResourceKind`], so a zero count is explicit rather than
//! implied by a missing key.

use std::collections::BTreeMap;

use microworld_types::{Position, ResourceKind, ResourceStatus};
use rand::Rng;

use crate::error::WorldError;

/// Resource counts at one cell.
pub type CellStock = BTreeMap<ResourceKind, u32>;

/// A `size x size` matrix of resource counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGrid {
    size: u32,
    cells: Vec<CellStock>,
}

/// A cell with every kind at zero.
fn empty_stock() -> CellStock {
    ResourceKind::ALL.iter().map(|&kind| (kind, 0)).collect()
}

impl ResourceGrid {
    /// Create a grid with every cell empty.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSize`] for a zero size, or
    /// [`WorldError::ArithmeticOverflow`] if `size * size` does not fit.
    pub fn empty(size: u32) -> Result<Self, WorldError> {
        if size == 0 {
            return Err(WorldError::InvalidSize { size });
        }
        let side = usize::try_from(size).map_err(|_e| WorldError::ArithmeticOverflow)?;
        let count = side.checked_mul(side).ok_or(WorldError::ArithmeticOverflow)?;
        Ok(Self {
            size,
            cells: vec![empty_stock(); count],
        })
    }

    /// Create a grid whose per-kind counts are drawn uniformly from
    /// `0..=max_per_kind`.
    ///
    /// Cells are filled in raster order and kinds in [`ResourceKind::ALL`]
    /// order, so the same generator state always yields the same grid.
    ///
    /// # Errors
    ///
    /// Same as [`ResourceGrid::empty`].
    pub fn seeded<R: Rng + ?Sized>(
        size: u32,
        max_per_kind: u32,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let mut grid = Self::empty(size)?;
        for stock in &mut grid.cells {
            for kind in ResourceKind::ALL {
                stock.insert(kind, rng.random_range(0..=max_per_kind));
            }
        }
        Ok(grid)
    }

    /// Side length of the grid.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of cells (`size * size`).
    pub fn cell_count(&self) -> u64 {
        u64::try_from(self.cells.len()).unwrap_or(u64::MAX)
    }

    /// Whether the position lies on the grid.
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    /// Row-major index of a position, if it is on the grid.
    fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let side = usize::try_from(self.size).ok()?;
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        y.checked_mul(side)?.checked_add(x)
    }

    /// Check that a position is on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PositionOutOfBounds`] otherwise.
    pub const fn check(&self, position: Position) -> Result<(), WorldError> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(WorldError::PositionOutOfBounds {
                position,
                size: self.size,
            })
        }
    }

    /// The resource counts at a cell.
    pub fn cell(&self, position: Position) -> Option<&CellStock> {
        self.index(position).and_then(|i| self.cells.get(i))
    }

    /// Quantity of one kind at a cell; zero for off-grid positions.
    pub fn quantity(&self, position: Position, kind: ResourceKind) -> u32 {
        self.cell(position)
            .and_then(|stock| stock.get(&kind))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite the quantity of one kind at a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PositionOutOfBounds`] for off-grid positions.
    pub fn set(
        &mut self,
        position: Position,
        kind: ResourceKind,
        quantity: u32,
    ) -> Result<(), WorldError> {
        let stock = self.cell_mut(position)?;
        stock.insert(kind, quantity);
        Ok(())
    }

    /// Mutable access to a cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PositionOutOfBounds`] for off-grid positions.
    pub fn cell_mut(&mut self, position: Position) -> Result<&mut CellStock, WorldError> {
        let size = self.size;
        self.index(position)
            .and_then(|i| self.cells.get_mut(i))
            .ok_or(WorldError::PositionOutOfBounds { position, size })
    }

    /// Set every count on the grid to zero.
    pub fn clear(&mut self) {
        for stock in &mut self.cells {
            for qty in stock.values_mut() {
                *qty = 0;
            }
        }
    }

    /// Iterate cells in raster order with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &CellStock)> {
        let size = self.size;
        (0..size)
            .flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
            .zip(self.cells.iter())
    }

    /// Iterate cells mutably in raster order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CellStock> {
        self.cells.iter_mut()
    }

    /// Every on-grid cell within Chebyshev distance `radius` of `center`,
    /// including `center`, in raster order (row by row, left to right).
    pub fn window(&self, center: Position, radius: u32) -> Vec<(Position, CellStock)> {
        if !self.contains(center) {
            return Vec::new();
        }
        let last = self.size.saturating_sub(1);
        let x_range = center.x.saturating_sub(radius)..=center.x.saturating_add(radius).min(last);
        let y_range = center.y.saturating_sub(radius)..=center.y.saturating_add(radius).min(last);

        let mut visible = Vec::new();
        for y in y_range {
            for x in x_range.clone() {
                let position = Position::new(x, y);
                if let Some(stock) = self.cell(position) {
                    visible.push((position, stock.clone()));
                }
            }
        }
        visible
    }

    /// Grid-wide total of one kind.
    pub fn total(&self, kind: ResourceKind) -> u64 {
        self.cells
            .iter()
            .map(|stock| u64::from(stock.get(&kind).copied().unwrap_or(0)))
            .fold(0_u64, u64::saturating_add)
    }

    /// Grid-wide totals and per-cell average.
    pub fn status(&self) -> ResourceStatus {
        ResourceStatus::from_totals(
            self.total(ResourceKind::Wood),
            self.total(ResourceKind::Flint),
            self.total(ResourceKind::Food),
            self.cell_count(),
        )
    }

    /// Per-cell sum across all kinds, indexed `[y][x]`.
    pub fn heat(&self) -> Vec<Vec<u32>> {
        let side = usize::try_from(self.size).unwrap_or(0).max(1);
        self.cells
            .chunks(side)
            .map(|row| row.iter().map(stock_sum).collect())
            .collect()
    }
}

/// Sum of all kinds at one cell.
pub fn stock_sum(stock: &CellStock) -> u32 {
    stock.values().fold(0_u32, |acc, &qty| acc.saturating_add(qty))
}
