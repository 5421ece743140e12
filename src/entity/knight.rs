//! Knights: energy, rest and patrol memory

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{GarrisonId, HunterId, KnightId, Position};
use crate::grid::{Cell, CellContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnightState {
    Resting,
    Patrolling,
    Pursuing,
}

/// How a knight treats a caught hunter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMethod {
    /// Light stamina penalty plus forced drop
    Detain,
    /// Heavy stamina penalty plus forced drop
    Challenge,
}

impl InteractionMethod {
    pub fn stamina_penalty(&self, config: &SimulationConfig) -> f32 {
        match self {
            InteractionMethod::Detain => config.detain_penalty,
            InteractionMethod::Challenge => config.challenge_penalty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knight {
    pub id: KnightId,
    pub name: String,
    pub position: Position,
    /// Always within [0, 1]
    pub energy: f32,
    pub resting: bool,
    pub target: Option<HunterId>,
    /// Cells this knight has patrolled, deduplicated
    pub patrol_memory: Vec<Position>,
    /// Home garrison
    pub garrison: Option<GarrisonId>,
    /// True while off the grid inside the home garrison
    pub in_garrison: bool,
}

impl Knight {
    pub fn new(id: KnightId, name: String, position: Position) -> Self {
        Self {
            id,
            name,
            position,
            energy: 1.0,
            resting: false,
            target: None,
            patrol_memory: Vec::new(),
            garrison: None,
            in_garrison: false,
        }
    }

    pub fn state(&self) -> KnightState {
        if self.resting {
            KnightState::Resting
        } else if self.target.is_some() {
            KnightState::Pursuing
        } else {
            KnightState::Patrolling
        }
    }

    pub fn should_rest(&self, config: &SimulationConfig) -> bool {
        self.energy <= config.knight_rest_threshold
    }

    /// Recover energy; returns true once above the rest threshold
    pub fn rest(&mut self, config: &SimulationConfig) -> bool {
        self.energy = (self.energy + config.knight_rest_gain).min(1.0);
        self.energy > config.knight_rest_threshold
    }

    /// Pay the energy cost of a patrol or chase step
    pub fn exert(&mut self, config: &SimulationConfig) {
        self.energy = (self.energy - config.knight_energy_loss_per_chase).max(0.0);
    }

    /// Hunters standing in the given cells
    pub fn detect_hunters<'a>(&self, cells: impl IntoIterator<Item = &'a Cell>) -> Vec<(HunterId, Position)> {
        cells
            .into_iter()
            .filter_map(|cell| match cell.content() {
                CellContent::Hunter(id) => Some((id, cell.position())),
                _ => None,
            })
            .collect()
    }

    pub fn remember_patrol(&mut self, position: Position) {
        if !self.patrol_memory.contains(&position) {
            self.patrol_memory.push(position);
        }
    }
}
