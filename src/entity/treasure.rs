//! Treasure tiers and value decay

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Position, TreasureId};

/// Treasure tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasureTier {
    Bronze,
    Silver,
    Gold,
}

impl TreasureTier {
    pub const ALL: [TreasureTier; 3] = [TreasureTier::Bronze, TreasureTier::Silver, TreasureTier::Gold];

    /// Wealth the treasure is worth when freshly placed
    pub fn base_value(&self) -> f32 {
        match self {
            TreasureTier::Bronze => 3.0,
            TreasureTier::Silver => 7.0,
            TreasureTier::Gold => 13.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    pub id: TreasureId,
    pub tier: TreasureTier,
    pub value: f32,
    /// Last cell the treasure lay on
    pub position: Position,
}

impl Treasure {
    pub fn new(id: TreasureId, tier: TreasureTier, position: Position) -> Self {
        Self {
            id,
            tier,
            value: tier.base_value(),
            position,
        }
    }

    /// Lose a fixed share of the base value, never dropping below zero
    pub fn decay(&mut self, config: &SimulationConfig) {
        let loss = self.tier.base_value() * config.treasure_decay_percent;
        self.value = (self.value - loss).max(0.0);
    }

    pub fn is_depleted(&self, config: &SimulationConfig) -> bool {
        self.value <= config.treasure_min_value
    }
}
