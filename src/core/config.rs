//! Simulation configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be loaded from a TOML
//! file; any option missing from the file keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EldoriaError, Result};

/// Largest accepted grid edge length
pub const MAX_GRID_SIZE: i32 = 4096;

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === GRID ===
    /// Edge length of the square toroidal grid
    pub grid_size: i32,

    // === TREASURE ===
    /// Fraction of a treasure's base value lost per step
    ///
    /// At 0.001, every tier fully decays in 1000 steps, which matches
    /// the default `max_steps`.
    pub treasure_decay_percent: f32,

    /// Value at or below which a treasure is depleted and removed
    pub treasure_min_value: f32,

    // === HUNTERS ===
    /// Stamina spent on every attempted move
    ///
    /// At 0.02 a fresh hunter can make 50 moves before collapsing.
    pub hunter_stamina_loss_per_move: f32,

    /// Stamina at or below which a hunter heads for a hideout
    ///
    /// 0.06 leaves room for three more moves to reach shelter.
    pub hunter_critical_stamina: f32,

    /// Stamina regained per step inside a hideout
    pub hunter_rest_gain: f32,

    /// Collapse checks a hunter survives at zero stamina
    pub hunter_collapse_steps: u32,

    /// Chebyshev radius hunters scan after every move
    pub hunter_scan_radius: i32,

    // === KNIGHTS ===
    /// Energy spent on every patrol or chase step
    pub knight_energy_loss_per_chase: f32,

    /// Energy at or below which a knight stops to rest
    pub knight_rest_threshold: f32,

    /// Energy regained per resting step
    pub knight_rest_gain: f32,

    /// Chebyshev radius in which knights detect hunters
    pub knight_radius: i32,

    /// Stamina a detained hunter loses
    pub detain_penalty: f32,

    /// Stamina a challenged hunter loses
    pub challenge_penalty: f32,

    // === STRUCTURES ===
    /// Maximum resident hunters per hideout
    pub hideout_capacity: usize,

    /// Maximum resident knights per garrison
    pub garrison_capacity: usize,

    /// Per-step chance that an eligible hideout or garrison recruits
    pub recruit_probability: f64,

    // === RUN ===
    /// Hard cap on steps for `tick::run`
    pub max_steps: u64,

    /// RNG seed; `None` picks one at random
    pub seed: Option<u64>,

    /// Entity counts used by random scenario setup
    pub scenario: ScenarioConfig,
}

/// Entity counts for a randomly populated grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub treasures: usize,
    pub hunters: usize,
    pub knights: usize,
    pub hideouts: usize,
    pub garrisons: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            treasures: 20,
            hunters: 6,
            knights: 3,
            hideouts: 3,
            garrisons: 2,
        }
    }
}

impl ScenarioConfig {
    /// Total number of entities the scenario places on the grid
    pub fn total(&self) -> usize {
        self.treasures + self.hunters + self.knights + self.hideouts + self.garrisons
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,

            treasure_decay_percent: 0.001,
            treasure_min_value: 0.0,

            hunter_stamina_loss_per_move: 0.02,
            hunter_critical_stamina: 0.06,
            hunter_rest_gain: 0.01,
            hunter_collapse_steps: 3,
            hunter_scan_radius: 1,

            knight_energy_loss_per_chase: 0.20,
            knight_rest_threshold: 0.20,
            knight_rest_gain: 0.10,
            knight_radius: 3,
            detain_penalty: 0.05,
            challenge_penalty: 0.20,

            hideout_capacity: 5,
            garrison_capacity: 5,
            recruit_probability: 0.20,

            max_steps: 1000,
            seed: None,
            scenario: ScenarioConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_size <= 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(EldoriaError::InvalidConfig(format!(
                "grid_size must be within 1..={}, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }

        let fractions = [
            ("treasure_decay_percent", self.treasure_decay_percent),
            ("hunter_stamina_loss_per_move", self.hunter_stamina_loss_per_move),
            ("hunter_critical_stamina", self.hunter_critical_stamina),
            ("hunter_rest_gain", self.hunter_rest_gain),
            ("knight_energy_loss_per_chase", self.knight_energy_loss_per_chase),
            ("knight_rest_threshold", self.knight_rest_threshold),
            ("knight_rest_gain", self.knight_rest_gain),
            ("detain_penalty", self.detain_penalty),
            ("challenge_penalty", self.challenge_penalty),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(EldoriaError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.recruit_probability) {
            return Err(EldoriaError::InvalidConfig(format!(
                "recruit_probability must be within [0, 1], got {}",
                self.recruit_probability
            )));
        }

        if self.treasure_min_value < 0.0 {
            return Err(EldoriaError::InvalidConfig(
                "treasure_min_value must not be negative".into(),
            ));
        }

        // Resting must make progress or agents stall forever
        if self.hunter_rest_gain <= 0.0 || self.knight_rest_gain <= 0.0 {
            return Err(EldoriaError::InvalidConfig("Rest gains must be positive".into()));
        }

        if self.hideout_capacity == 0 || self.garrison_capacity == 0 {
            return Err(EldoriaError::InvalidConfig("Capacities must be at least 1".into()));
        }

        if self.hunter_collapse_steps == 0 {
            return Err(EldoriaError::InvalidConfig(
                "hunter_collapse_steps must be at least 1".into(),
            ));
        }

        if self.hunter_scan_radius < 1 || self.knight_radius < 1 {
            return Err(EldoriaError::InvalidConfig("Scan radii must be at least 1".into()));
        }

        let cells = (self.grid_size as usize) * (self.grid_size as usize);
        if self.scenario.total() > cells {
            return Err(EldoriaError::InvalidConfig(format!(
                "scenario places {} entities but the grid only has {} cells",
                self.scenario.total(),
                cells
            )));
        }

        Ok(())
    }
}
