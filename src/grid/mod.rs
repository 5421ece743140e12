//! Toroidal grid of cells
//!
//! Every coordinate wraps, so lookups never fail. The grid owns its cells;
//! cells only reference entities by id.

pub mod cell;

pub use cell::{Cell, CellContent, CellKind};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, Position};

/// Who is moving, which decides the cells they may step onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementRole {
    /// Avoids knights and garrisons; treasure, hideout and hunter cells are open
    Hunter,
    /// Walks only on empty ground or onto hunters
    Knight,
}

impl MovementRole {
    pub fn permits(&self, kind: CellKind) -> bool {
        match self {
            MovementRole::Hunter => !matches!(kind, CellKind::Knight | CellKind::Garrison),
            MovementRole::Knight => matches!(kind, CellKind::Empty | CellKind::Hunter),
        }
    }
}

/// Square toroidal grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty `size` x `size` grid
    pub fn new(size: i32) -> Self {
        let size = size.max(1);
        let mut cells = Vec::with_capacity(size as usize * size as usize);
        for x in 0..size {
            for y in 0..size {
                cells.push(Cell::new(Position::new(x, y)));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Wrap coordinates around the grid edges
    pub fn wrap(&self, x: i32, y: i32) -> Position {
        Position::new(x.rem_euclid(self.size), y.rem_euclid(self.size))
    }

    pub fn wrap_position(&self, position: Position) -> Position {
        self.wrap(position.x, position.y)
    }

    fn index(&self, position: Position) -> usize {
        let p = self.wrap_position(position);
        (p.x * self.size + p.y) as usize
    }

    pub fn get_cell(&self, x: i32, y: i32) -> &Cell {
        self.cell(Position::new(x, y))
    }

    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[self.index(position)]
    }

    fn cell_mut(&mut self, position: Position) -> &mut Cell {
        let index = self.index(position);
        &mut self.cells[index]
    }

    pub fn content(&self, position: Position) -> CellContent {
        self.cell(position).content()
    }

    pub fn kind(&self, position: Position) -> CellKind {
        self.cell(position).kind()
    }

    pub fn is_empty(&self, position: Position) -> bool {
        self.cell(position).is_empty()
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Place content onto an empty cell
    ///
    /// First writer wins: an occupied target is left untouched and
    /// `false` is returned.
    pub fn place(&mut self, position: Position, content: CellContent) -> bool {
        let cell = self.cell_mut(position);
        if !cell.is_empty() {
            tracing::debug!(
                "Refused to place {:?} on occupied cell {} ({:?})",
                content.kind(),
                cell.position(),
                cell.kind()
            );
            return false;
        }
        cell.content = content;
        true
    }

    /// Overwrite a cell during movement, refusing structural cells
    pub fn set_transit_content(&mut self, position: Position, content: CellContent) -> bool {
        let cell = self.cell_mut(position);
        if cell.is_structure() {
            tracing::warn!(
                "Refused to overwrite {:?} at {} with {:?}",
                cell.kind(),
                cell.position(),
                content.kind()
            );
            return false;
        }
        cell.content = content;
        true
    }

    /// Empty a cell; structural cells are left as they are
    pub fn clear_cell(&mut self, position: Position) -> bool {
        let cell = self.cell_mut(position);
        let cleared = cell.clear();
        if !cleared {
            tracing::trace!("Kept {:?} at {} while clearing", cell.kind(), cell.position());
        }
        cleared
    }

    /// Orthogonal neighbors, wrapped, in N/S/W/E order
    pub fn neighbors(&self, position: Position) -> [Position; 4] {
        Direction::ALL.map(|direction| self.wrap_position(position.offset(direction)))
    }

    /// Neighbors the given role may step onto
    pub fn neighbors_for(&self, position: Position, role: MovementRole) -> Vec<Position> {
        self.neighbors(position)
            .into_iter()
            .filter(|p| role.permits(self.kind(*p)))
            .collect()
    }

    pub fn hunter_neighbors(&self, position: Position) -> Vec<Position> {
        self.neighbors_for(position, MovementRole::Hunter)
    }

    pub fn knight_neighbors(&self, position: Position) -> Vec<Position> {
        self.neighbors_for(position, MovementRole::Knight)
    }

    /// All cells within Chebyshev distance `radius`, center excluded
    ///
    /// A cell reached twice through wrap-around on a small grid is
    /// reported once.
    pub fn get_cells_in_radius(&self, center: Position, radius: i32) -> Vec<&Cell> {
        let center = self.wrap_position(center);
        let mut seen = AHashSet::new();
        let mut cells = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = self.wrap(center.x + dx, center.y + dy);
                if p != center && seen.insert(p) {
                    cells.push(self.cell(p));
                }
            }
        }
        cells
    }

    /// Whether two positions are orthogonal neighbors under wrap
    pub fn are_adjacent(&self, a: Position, b: Position) -> bool {
        self.neighbors(a).contains(&self.wrap_position(b))
    }

    /// Count cells of a given kind
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind() == kind).count()
    }
}
