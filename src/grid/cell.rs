//! Grid cells and their occupants

use serde::{Deserialize, Serialize};

use crate::core::types::{GarrisonId, HideoutId, HunterId, KnightId, Position, TreasureId};

/// Occupant type tag of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Treasure,
    Hunter,
    Knight,
    Hideout,
    Garrison,
}

impl CellKind {
    /// Hideouts and garrisons are permanent and survive `clear`
    pub fn is_structure(&self) -> bool {
        matches!(self, CellKind::Hideout | CellKind::Garrison)
    }
}

/// What occupies a cell
///
/// Holds registry ids only; the `World` registries own the entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    Treasure(TreasureId),
    Hunter(HunterId),
    Knight(KnightId),
    Hideout(HideoutId),
    Garrison(GarrisonId),
}

impl CellContent {
    pub fn kind(&self) -> CellKind {
        match self {
            CellContent::Empty => CellKind::Empty,
            CellContent::Treasure(_) => CellKind::Treasure,
            CellContent::Hunter(_) => CellKind::Hunter,
            CellContent::Knight(_) => CellKind::Knight,
            CellContent::Hideout(_) => CellKind::Hideout,
            CellContent::Garrison(_) => CellKind::Garrison,
        }
    }
}

/// A single square of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    pub(crate) content: CellContent,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            content: CellContent::Empty,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn content(&self) -> CellContent {
        self.content
    }

    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }

    pub fn is_structure(&self) -> bool {
        self.kind().is_structure()
    }

    /// Empty the cell unless it holds a permanent structure
    ///
    /// Returns whether the cell is empty afterwards.
    pub fn clear(&mut self) -> bool {
        if self.is_structure() {
            return false;
        }
        self.content = CellContent::Empty;
        true
    }
}
