//! Garrisons: knight rest stops with shared patrol knowledge

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{GarrisonId, KnightId, Position};
use crate::entity::knight::Knight;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garrison {
    pub id: GarrisonId,
    pub position: Position,
    pub capacity: usize,
    /// Knights resting inside; never longer than `capacity`
    pub knights: Vec<KnightId>,
    pub patrol_knowledge: Vec<Position>,
}

impl Garrison {
    pub fn new(id: GarrisonId, position: Position, capacity: usize) -> Self {
        Self {
            id,
            position,
            capacity,
            knights: Vec::new(),
            patrol_knowledge: Vec::new(),
        }
    }

    pub fn has_space(&self) -> bool {
        self.knights.len() < self.capacity
    }

    pub fn add_knight(&mut self, knight: KnightId) -> bool {
        if self.knights.contains(&knight) {
            return true;
        }
        if !self.has_space() {
            return false;
        }
        self.knights.push(knight);
        true
    }

    pub fn remove_knight(&mut self, knight: KnightId) {
        self.knights.retain(|k| *k != knight);
    }

    /// Pool resident patrol memories and hand the union back
    pub fn share_knowledge<'a>(&mut self, residents: impl IntoIterator<Item = &'a mut Knight>) {
        let mut residents: Vec<&mut Knight> = residents.into_iter().collect();
        for knight in residents.iter() {
            for p in &knight.patrol_memory {
                if !self.patrol_knowledge.contains(p) {
                    self.patrol_knowledge.push(*p);
                }
            }
        }
        for knight in residents.iter_mut() {
            for p in &self.patrol_knowledge {
                knight.remember_patrol(*p);
            }
        }
    }

    /// Roll for a new knight; needs two residents and spare room
    pub fn try_recruit<R: Rng>(&self, config: &SimulationConfig, rng: &mut R) -> bool {
        self.knights.len() >= 2 && self.has_space() && rng.gen_bool(config.recruit_probability)
    }
}
