//! Placement grid.
//!
//! Before a battle starts, units are placed one per cell, snapped to the
//! cell center. The top half of the rows is enemy territory and the
//! bottom half belongs to the player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{Team, UnitId};
use crate::math::{Bounds, Vec2};

/// A grid cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column, counted from the left.
    pub col: u32,
    /// Row, counted from the top.
    pub row: u32,
}

impl Cell {
    /// Create a cell address.
    #[must_use]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Column/row grid laid over the battlefield, with its occupied cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cols: u32,
    rows: u32,
    bounds: Bounds,
    occupied: BTreeMap<Cell, UnitId>,
}

impl Grid {
    /// Create an empty grid of `cols` × `rows` cells over `bounds`.
    #[must_use]
    pub fn new(cols: u32, rows: u32, bounds: Bounds) -> Self {
        Self {
            cols,
            rows,
            bounds,
            occupied: BTreeMap::new(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of one cell in pixels.
    #[must_use]
    pub fn cell_width(&self) -> f32 {
        self.bounds.width / self.cols as f32
    }

    /// Height of one cell in pixels.
    #[must_use]
    pub fn cell_height(&self) -> f32 {
        self.bounds.height / self.rows as f32
    }

    /// Check whether a cell address lies on the grid.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.col < self.cols && cell.row < self.rows
    }

    /// Cell under a battlefield point, or `None` outside the field.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<Cell> {
        if !(0.0..=self.bounds.width).contains(&point.x) || !(0.0..=self.bounds.height).contains(&point.y) {
            return None;
        }
        let cell = Cell::new(
            (point.x / self.cell_width()).floor() as u32,
            (point.y / self.cell_height()).floor() as u32,
        );
        // The far edges belong to no cell
        self.contains(cell).then_some(cell)
    }

    /// Center of a cell.
    #[must_use]
    pub fn center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            cell.col as f32 * self.cell_width() + self.cell_width() / 2.0,
            cell.row as f32 * self.cell_height() + self.cell_height() / 2.0,
        )
    }

    /// Team that owns a row.
    #[must_use]
    pub fn territory(&self, cell: Cell) -> Team {
        if (cell.row as f32) < self.rows as f32 / 2.0 {
            Team::Enemy
        } else {
            Team::Player
        }
    }

    /// Check whether a cell holds a unit.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied.contains_key(&cell)
    }

    /// Unit placed in a cell.
    #[must_use]
    pub fn occupant(&self, cell: Cell) -> Option<UnitId> {
        self.occupied.get(&cell).copied()
    }

    /// Mark a cell as holding `unit`. Returns `false` if it was taken.
    pub fn occupy(&mut self, cell: Cell, unit: UnitId) -> bool {
        if !self.contains(cell) || self.is_occupied(cell) {
            return false;
        }
        self.occupied.insert(cell, unit);
        true
    }

    /// Free a cell, returning the unit that held it.
    pub fn vacate(&mut self, cell: Cell) -> Option<UnitId> {
        self.occupied.remove(&cell)
    }

    /// Occupied cells and their units, in cell order.
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, UnitId)> + '_ {
        self.occupied.iter().map(|(c, u)| (*c, *u))
    }

    /// Free every cell.
    pub fn clear(&mut self) {
        self.occupied.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(15, 10, Bounds::new(900.0, 600.0))
    }

    #[test]
    fn test_snap_to_center() {
        let grid = grid();
        let cell = grid.cell_at(Vec2::new(130.0, 599.0)).unwrap();
        assert_eq!(cell, Cell::new(2, 9));
        assert_eq!(grid.center(cell), Vec2::new(150.0, 570.0));
    }

    #[test]
    fn test_outside_field() {
        let grid = grid();
        assert_eq!(grid.cell_at(Vec2::new(-1.0, 10.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(900.0, 10.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(10.0, 601.0)), None);
    }

    #[test]
    fn test_territory_split() {
        let grid = grid();
        assert_eq!(grid.territory(Cell::new(0, 0)), Team::Enemy);
        assert_eq!(grid.territory(Cell::new(0, 4)), Team::Enemy);
        assert_eq!(grid.territory(Cell::new(0, 5)), Team::Player);
        assert_eq!(grid.territory(Cell::new(14, 9)), Team::Player);
    }

    #[test]
    fn test_one_unit_per_cell() {
        let mut grid = grid();
        let cell = Cell::new(3, 3);
        assert!(grid.occupy(cell, UnitId(1)));
        assert!(!grid.occupy(cell, UnitId(2)));
        assert_eq!(grid.occupant(cell), Some(UnitId(1)));
        assert!(!grid.occupy(Cell::new(15, 0), UnitId(3)));
        assert_eq!(grid.vacate(cell), Some(UnitId(1)));
        assert!(!grid.is_occupied(cell));
    }
}
