//! Random scenario population
//!
//! Structures go down first so agents never spawn on top of them, then
//! treasure, hunters and knights. Every draw uses the world's RNG, so a
//! seed fully determines the starting layout.

use rand::seq::SliceRandom;

use crate::core::error::{EldoriaError, Result};
use crate::core::types::{GarrisonId, Position};
use crate::entity::{HunterSkill, TreasureTier};
use crate::simulation::world::World;

const HUNTER_NAMES: [&str; 8] = ["Birsen", "Ceren", "Doruk", "Ece", "Kaan", "Lale", "Mert", "Selin"];
const KNIGHT_NAMES: [&str; 6] = ["Melisa", "Alp", "Bora", "Derya", "Tolga", "Yasemin"];

/// Random probes before falling back to a full scan for a free cell
const PLACEMENT_ATTEMPTS: usize = 100;

/// Fill the world according to `config.scenario`
pub fn populate_random(world: &mut World) -> Result<()> {
    let scenario = world.config.scenario.clone();

    let mut garrisons: Vec<GarrisonId> = Vec::with_capacity(scenario.garrisons);
    for _ in 0..scenario.garrisons {
        let position = free_cell(world)?;
        if let Some(id) = world.add_garrison(position) {
            garrisons.push(id);
        }
    }

    for _ in 0..scenario.hideouts {
        let position = free_cell(world)?;
        world.add_hideout(position);
    }

    for _ in 0..scenario.treasures {
        let position = free_cell(world)?;
        let tier = *TreasureTier::ALL.choose(&mut world.rng).unwrap_or(&TreasureTier::Bronze);
        world.add_treasure(position, tier);
    }

    for i in 0..scenario.hunters {
        let position = free_cell(world)?;
        let skill = *HunterSkill::ALL.choose(&mut world.rng).unwrap_or(&HunterSkill::Navigation);
        world.add_hunter(&agent_name(&HUNTER_NAMES, i), skill, position);
    }

    for i in 0..scenario.knights {
        let position = free_cell(world)?;
        if let Some(id) = world.add_knight(&agent_name(&KNIGHT_NAMES, i), position) {
            if !garrisons.is_empty() {
                world.assign_garrison(id, garrisons[i % garrisons.len()]);
            }
        }
    }

    tracing::info!(
        "Populated {}x{} grid: {} treasures, {} hunters, {} knights, {} hideouts, {} garrisons",
        world.grid.size(),
        world.grid.size(),
        world.treasures.len(),
        world.hunters.len(),
        world.knights.len(),
        world.hideouts.len(),
        world.garrisons.len()
    );
    Ok(())
}

/// Names cycle through the list, numbered once it runs out
fn agent_name(names: &[&str], index: usize) -> String {
    let base = names[index % names.len()];
    match index / names.len() {
        0 => base.to_string(),
        round => format!("{}-{}", base, round + 1),
    }
}

fn free_cell(world: &mut World) -> Result<Position> {
    if let Some(position) = world.random_empty_cell(PLACEMENT_ATTEMPTS) {
        return Ok(position);
    }
    world
        .grid
        .cells()
        .find(|c| c.is_empty())
        .map(|c| c.position())
        .ok_or_else(|| EldoriaError::InvalidConfig("No free cell left for scenario setup".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::grid::CellKind;

    fn config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.grid_size = 12;
        config
    }

    #[test]
    fn test_populate_places_every_entity() {
        let mut world = World::with_seed(config(), 9);
        populate_random(&mut world).unwrap();

        let scenario = &world.config.scenario;
        assert_eq!(world.treasures.len(), scenario.treasures);
        assert_eq!(world.hunters.len(), scenario.hunters);
        assert_eq!(world.knights.len(), scenario.knights);
        assert_eq!(world.grid.count(CellKind::Treasure), scenario.treasures);
        assert_eq!(world.grid.count(CellKind::Hideout), scenario.hideouts);
        assert_eq!(world.grid.count(CellKind::Garrison), scenario.garrisons);
        assert!(world.knights.values().all(|k| k.garrison.is_some()));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = World::with_seed(config(), 21);
        let mut b = World::with_seed(config(), 21);
        populate_random(&mut a).unwrap();
        populate_random(&mut b).unwrap();

        let layout = |w: &World| w.grid.cells().map(|c| c.content()).collect::<Vec<_>>();
        assert_eq!(layout(&a), layout(&b));
    }

    #[test]
    fn test_full_grid_fills_every_cell() {
        let mut config = SimulationConfig::default();
        config.grid_size = 3;
        config.scenario.treasures = 4;
        config.scenario.hunters = 2;
        config.scenario.knights = 1;
        config.scenario.hideouts = 1;
        config.scenario.garrisons = 1;
        let mut world = World::with_seed(config, 2);

        populate_random(&mut world).unwrap();
        assert_eq!(world.grid.count(CellKind::Empty), 0);
    }

    #[test]
    fn test_names_cycle_with_suffix() {
        assert_eq!(agent_name(&HUNTER_NAMES, 0), "Birsen");
        assert_eq!(agent_name(&HUNTER_NAMES, 8), "Birsen-2");
    }
}
