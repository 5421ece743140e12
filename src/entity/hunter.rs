//! Treasure hunters: stamina, collapse lifecycle and memory
//!
//! Movement decisions live in `simulation::hunter_core`; this module only
//! holds the per-hunter state and the bookkeeping every decision relies on.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{HideoutId, HunterId, Position, TreasureId};
use crate::grid::{Cell, CellKind};
use crate::sentiment::{Mood, Opinion, SentimentAnalyzer};

/// Cosmetic specialty; has no mechanical effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HunterSkill {
    Navigation,
    Endurance,
    Stealth,
}

impl HunterSkill {
    pub const ALL: [HunterSkill; 3] = [HunterSkill::Navigation, HunterSkill::Endurance, HunterSkill::Stealth];
}

/// Behavior state, evaluated in this priority order each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HunterState {
    Dead,
    RestingInHideout,
    Collapsing,
    CarryingTreasure,
    LowStamina,
    Seeking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hunter {
    pub id: HunterId,
    pub name: String,
    pub skill: HunterSkill,
    pub position: Position,
    /// Always within [0, 1]
    pub stamina: f32,
    pub carrying: Option<TreasureId>,
    pub alive: bool,
    pub collapsing: bool,
    pub collapse_counter: u32,
    /// Hideout the hunter is currently resting in
    pub hideout: Option<HideoutId>,
    pub known_treasures: Vec<Position>,
    pub known_hideouts: Vec<Position>,
    pub known_knights: Vec<Position>,
}

impl Hunter {
    pub fn new(id: HunterId, name: String, skill: HunterSkill, position: Position) -> Self {
        Self {
            id,
            name,
            skill,
            position,
            stamina: 1.0,
            carrying: None,
            alive: true,
            collapsing: false,
            collapse_counter: 0,
            hideout: None,
            known_treasures: Vec::new(),
            known_hideouts: Vec::new(),
            known_knights: Vec::new(),
        }
    }

    /// Pay the stamina cost of one move attempt
    ///
    /// Hitting zero starts the collapse countdown.
    pub fn exert(&mut self, config: &SimulationConfig) {
        if !self.alive || self.collapsing {
            return;
        }
        self.stamina -= config.hunter_stamina_loss_per_move;
        if self.stamina <= 0.0 {
            self.stamina = 0.0;
            self.collapsing = true;
            self.collapse_counter = 0;
        }
    }

    /// Regain stamina inside a hideout
    ///
    /// Returns true once stamina is full, which also ends any collapse.
    pub fn rest(&mut self, config: &SimulationConfig) -> bool {
        if !self.alive {
            return false;
        }
        self.stamina = (self.stamina + config.hunter_rest_gain).min(1.0);
        if self.stamina >= 1.0 {
            self.collapsing = false;
            self.collapse_counter = 0;
            return true;
        }
        false
    }

    /// Advance the collapse countdown; the hunter dies when it runs out
    pub fn collapse_check(&mut self, config: &SimulationConfig) {
        if !self.collapsing {
            return;
        }
        self.collapse_counter += 1;
        if self.collapse_counter >= config.hunter_collapse_steps {
            self.alive = false;
        }
    }

    /// Lose stamina from an outside source (e.g. a knight)
    pub fn drain(&mut self, amount: f32) {
        self.stamina = (self.stamina - amount).clamp(0.0, 1.0);
    }

    pub fn is_weak(&self, config: &SimulationConfig) -> bool {
        self.stamina <= config.hunter_critical_stamina
    }

    pub fn is_resting_in_hideout(&self) -> bool {
        self.hideout.is_some()
    }

    pub fn state(&self, config: &SimulationConfig) -> HunterState {
        if !self.alive {
            HunterState::Dead
        } else if self.is_resting_in_hideout() {
            HunterState::RestingInHideout
        } else if self.collapsing || self.stamina <= 0.0 {
            HunterState::Collapsing
        } else if self.carrying.is_some() {
            HunterState::CarryingTreasure
        } else if self.is_weak(config) {
            HunterState::LowStamina
        } else {
            HunterState::Seeking
        }
    }

    pub fn remember_treasure(&mut self, position: Position) {
        remember(&mut self.known_treasures, position);
    }

    pub fn remember_hideout(&mut self, position: Position) {
        remember(&mut self.known_hideouts, position);
    }

    pub fn remember_knight(&mut self, position: Position) {
        remember(&mut self.known_knights, position);
    }

    /// Record every treasure, hideout and knight among the given cells
    pub fn scan_and_remember<'a>(&mut self, cells: impl IntoIterator<Item = &'a Cell>) {
        for cell in cells {
            match cell.kind() {
                CellKind::Treasure => self.remember_treasure(cell.position()),
                CellKind::Hideout => self.remember_hideout(cell.position()),
                CellKind::Knight => self.remember_knight(cell.position()),
                _ => {}
            }
        }
    }

    /// Put a feeling into words and score it
    pub fn express_opinion(&self, text: &str, analyzer: &dyn SentimentAnalyzer) -> Opinion {
        let opinion = Opinion::new(text, analyzer.polarity(text));
        let mood = match opinion.mood {
            Mood::Positive => "positive",
            Mood::Neutral => "neutral",
            Mood::Negative => "negative",
        };
        tracing::info!(
            "{} says \"{}\" ({}, polarity {:.2})",
            self.name,
            text,
            mood,
            opinion.polarity
        );
        opinion
    }
}

/// Append-only, deduplicated memory
fn remember(memory: &mut Vec<Position>, position: Position) {
    if !memory.contains(&position) {
        memory.push(position);
    }
}
