//! Hideouts: shelter, treasure storage, knowledge sharing and recruitment

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{HideoutId, HunterId, Position};
use crate::entity::hunter::{Hunter, HunterSkill};
use crate::entity::treasure::Treasure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hideout {
    pub id: HideoutId,
    pub position: Position,
    pub capacity: usize,
    /// Residents; never longer than `capacity`
    pub hunters: Vec<HunterId>,
    /// Delivered treasure, off the grid for good
    pub stored_treasures: Vec<Treasure>,
    pub known_treasures: Vec<Position>,
    pub known_hideouts: Vec<Position>,
    pub known_knights: Vec<Position>,
}

impl Hideout {
    pub fn new(id: HideoutId, position: Position, capacity: usize) -> Self {
        Self {
            id,
            position,
            capacity,
            hunters: Vec::new(),
            stored_treasures: Vec::new(),
            known_treasures: Vec::new(),
            known_hideouts: vec![position],
            known_knights: Vec::new(),
        }
    }

    pub fn has_space(&self) -> bool {
        self.hunters.len() < self.capacity
    }

    /// Admit a hunter if there is room
    pub fn add_hunter(&mut self, hunter: HunterId) -> bool {
        if self.hunters.contains(&hunter) {
            return true;
        }
        if !self.has_space() {
            return false;
        }
        self.hunters.push(hunter);
        true
    }

    pub fn remove_hunter(&mut self, hunter: HunterId) {
        self.hunters.retain(|h| *h != hunter);
    }

    pub fn store(&mut self, treasure: Treasure) {
        self.stored_treasures.push(treasure);
    }

    pub fn stored_value(&self) -> f32 {
        self.stored_treasures.iter().map(|t| t.value).sum()
    }

    /// Pool resident memories into the hideout and hand the union back
    pub fn share_knowledge<'a>(&mut self, residents: impl IntoIterator<Item = &'a mut Hunter>) {
        let mut residents: Vec<&mut Hunter> = residents.into_iter().collect();

        for hunter in residents.iter() {
            merge(&mut self.known_treasures, &hunter.known_treasures);
            merge(&mut self.known_hideouts, &hunter.known_hideouts);
            merge(&mut self.known_knights, &hunter.known_knights);
        }

        for hunter in residents.iter_mut() {
            self.teach(hunter);
        }
    }

    /// Copy the hideout's knowledge into a hunter's memory
    pub fn teach(&self, hunter: &mut Hunter) {
        merge(&mut hunter.known_treasures, &self.known_treasures);
        merge(&mut hunter.known_hideouts, &self.known_hideouts);
        merge(&mut hunter.known_knights, &self.known_knights);
    }

    /// Roll for a recruit
    ///
    /// Needs at least two residents with at least two distinct skills and
    /// room to spare. Returns the recruit's skill.
    pub fn try_recruit<R: Rng>(
        &self,
        resident_skills: &[HunterSkill],
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Option<HunterSkill> {
        if resident_skills.len() < 2 || !self.has_space() {
            return None;
        }
        let mut skills = resident_skills.to_vec();
        skills.sort();
        skills.dedup();
        if skills.len() < 2 {
            return None;
        }
        if !rng.gen_bool(config.recruit_probability) {
            return None;
        }
        skills.choose(rng).copied()
    }
}

fn merge(into: &mut Vec<Position>, from: &[Position]) {
    for position in from {
        if !into.contains(position) {
            into.push(*position);
        }
    }
}
