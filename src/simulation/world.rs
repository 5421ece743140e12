//! World - the grid plus every entity registry
//!
//! Registries are the owners of all entities; grid cells only carry ids.
//! `BTreeMap`s keyed by monotonically increasing ids give insertion-order
//! iteration, which keeps step processing deterministic.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{GarrisonId, HideoutId, HunterId, KnightId, Position, Step, TreasureId};
use crate::entity::{Garrison, Hideout, Hunter, HunterSkill, Knight, Treasure, TreasureTier};
use crate::grid::{CellContent, Grid};

/// The full simulation state
pub struct World {
    pub config: SimulationConfig,
    pub grid: Grid,
    pub hunters: BTreeMap<HunterId, Hunter>,
    pub knights: BTreeMap<KnightId, Knight>,
    /// Treasure on the grid or being carried; delivered treasure lives in hideouts
    pub treasures: BTreeMap<TreasureId, Treasure>,
    pub hideouts: BTreeMap<HideoutId, Hideout>,
    pub garrisons: BTreeMap<GarrisonId, Garrison>,
    /// Random number generator (deterministic)
    pub rng: ChaCha8Rng,
    pub current_step: Step,
    pub seed: u64,
    /// Agents created by hideout and garrison recruitment so far
    pub recruit_count: u32,
    next_hunter_id: u32,
    next_knight_id: u32,
    next_treasure_id: u32,
    next_hideout_id: u32,
    next_garrison_id: u32,
}

impl World {
    /// Create an empty world, seeding from the config or at random
    pub fn new(config: SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self {
            grid: Grid::new(config.grid_size),
            config,
            hunters: BTreeMap::new(),
            knights: BTreeMap::new(),
            treasures: BTreeMap::new(),
            hideouts: BTreeMap::new(),
            garrisons: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            current_step: 0,
            seed,
            recruit_count: 0,
            next_hunter_id: 0,
            next_knight_id: 0,
            next_treasure_id: 0,
            next_hideout_id: 0,
            next_garrison_id: 0,
        }
    }

    // === PLACEMENT ===

    pub fn add_treasure(&mut self, position: Position, tier: TreasureTier) -> Option<TreasureId> {
        let position = self.grid.wrap_position(position);
        let id = TreasureId(self.next_treasure_id);
        if !self.grid.place(position, CellContent::Treasure(id)) {
            return None;
        }
        self.next_treasure_id += 1;
        self.treasures.insert(id, Treasure::new(id, tier, position));
        Some(id)
    }

    pub fn add_hunter(&mut self, name: &str, skill: HunterSkill, position: Position) -> Option<HunterId> {
        let position = self.grid.wrap_position(position);
        let id = HunterId(self.next_hunter_id);
        if !self.grid.place(position, CellContent::Hunter(id)) {
            return None;
        }
        self.next_hunter_id += 1;
        self.hunters.insert(id, Hunter::new(id, name.to_string(), skill, position));
        Some(id)
    }

    pub fn add_knight(&mut self, name: &str, position: Position) -> Option<KnightId> {
        let position = self.grid.wrap_position(position);
        let id = KnightId(self.next_knight_id);
        if !self.grid.place(position, CellContent::Knight(id)) {
            return None;
        }
        self.next_knight_id += 1;
        self.knights.insert(id, Knight::new(id, name.to_string(), position));
        Some(id)
    }

    pub fn add_hideout(&mut self, position: Position) -> Option<HideoutId> {
        let position = self.grid.wrap_position(position);
        let id = HideoutId(self.next_hideout_id);
        if !self.grid.place(position, CellContent::Hideout(id)) {
            return None;
        }
        self.next_hideout_id += 1;
        self.hideouts
            .insert(id, Hideout::new(id, position, self.config.hideout_capacity));
        Some(id)
    }

    pub fn add_garrison(&mut self, position: Position) -> Option<GarrisonId> {
        let position = self.grid.wrap_position(position);
        let id = GarrisonId(self.next_garrison_id);
        if !self.grid.place(position, CellContent::Garrison(id)) {
            return None;
        }
        self.next_garrison_id += 1;
        self.garrisons
            .insert(id, Garrison::new(id, position, self.config.garrison_capacity));
        Some(id)
    }

    /// Make `garrison` the knight's home
    pub fn assign_garrison(&mut self, knight: KnightId, garrison: GarrisonId) {
        if !self.garrisons.contains_key(&garrison) {
            return;
        }
        if let Some(k) = self.knights.get_mut(&knight) {
            k.garrison = Some(garrison);
        }
    }

    // === REMOVAL ===

    /// Take a hunter out of play entirely
    pub fn remove_hunter(&mut self, id: HunterId) -> Option<Hunter> {
        let hunter = self.hunters.remove(&id)?;
        self.retire_hunter(&hunter);
        Some(hunter)
    }

    /// Scrub every trace of a hunter that is no longer in the registry
    ///
    /// Carried treasure falls to the ground where the hunter stood, if
    /// that cell is not a structure.
    pub fn retire_hunter(&mut self, hunter: &Hunter) {
        let on_cell = self.grid.content(hunter.position) == CellContent::Hunter(hunter.id);
        if on_cell {
            self.grid.clear_cell(hunter.position);
        }
        if let Some(hid) = hunter.hideout {
            if let Some(hideout) = self.hideouts.get_mut(&hid) {
                hideout.remove_hunter(hunter.id);
            }
        }
        if let Some(tid) = hunter.carrying {
            if self.grid.place(hunter.position, CellContent::Treasure(tid)) {
                if let Some(treasure) = self.treasures.get_mut(&tid) {
                    treasure.position = hunter.position;
                }
            } else {
                self.treasures.remove(&tid);
            }
        }
        for knight in self.knights.values_mut() {
            if knight.target == Some(hunter.id) {
                knight.target = None;
            }
        }
        tracing::info!("{} removed from play at {}", hunter.name, hunter.position);
    }

    /// Drop a treasure from play, wherever it is
    pub fn remove_treasure(&mut self, id: TreasureId) -> Option<Treasure> {
        let treasure = self.treasures.remove(&id)?;
        if self.grid.content(treasure.position) == CellContent::Treasure(id) {
            self.grid.clear_cell(treasure.position);
        }
        for hunter in self.hunters.values_mut() {
            if hunter.carrying == Some(id) {
                hunter.carrying = None;
            }
        }
        Some(treasure)
    }

    // === QUERIES ===

    pub fn treasure_value(&self, id: TreasureId) -> f32 {
        self.treasures.get(&id).map(|t| t.value).unwrap_or(0.0)
    }

    /// Treasures still on the grid or in transit
    pub fn outstanding_treasures(&self) -> usize {
        self.treasures.len()
    }

    pub fn stored_treasure_count(&self) -> usize {
        self.hideouts.values().map(|h| h.stored_treasures.len()).sum()
    }

    pub fn living_hunters(&self) -> usize {
        self.hunters.values().filter(|h| h.alive).count()
    }

    /// A random empty orthogonal neighbor
    pub fn random_adjacent_empty(&mut self, position: Position) -> Option<Position> {
        let empty: Vec<Position> = self
            .grid
            .neighbors(position)
            .into_iter()
            .filter(|p| self.grid.is_empty(*p))
            .collect();
        empty.choose(&mut self.rng).copied()
    }

    /// A random empty cell anywhere, giving up after `attempts` misses
    pub fn random_empty_cell(&mut self, attempts: usize) -> Option<Position> {
        let size = self.grid.size();
        for _ in 0..attempts {
            let p = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if self.grid.is_empty(p) {
                return Some(p);
            }
        }
        None
    }
}
