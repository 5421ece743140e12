//! Tick system - orchestrates simulation updates
//!
//! Each step runs every entity exactly once, in a fixed order, against the
//! shared grid. Nothing here runs in parallel: cell writes made by one agent
//! are visible to the next.

use serde::{Deserialize, Serialize};

use crate::core::types::{HideoutId, HunterId, KnightId, Position, Step, TreasureId};
use crate::entity::HunterSkill;
use crate::simulation::world::World;
use crate::simulation::{hunter_core, knight_core};

/// Attempts made to find a free cell for a recruited hunter
pub const RECRUIT_PLACEMENT_ATTEMPTS: usize = 20;

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: Step,
    pub deaths: usize,
    pub deliveries: usize,
    pub recruits: usize,
    pub depleted: usize,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every treasure was delivered or decayed away
    AllTreasureResolved,
    /// Every hunter has died
    NoHuntersLeft,
    /// The step cap was reached first
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HideoutSummary {
    pub id: HideoutId,
    pub position: Position,
    pub residents: usize,
    pub stored_treasures: usize,
    pub stored_value: f32,
}

/// Final state of a run, ready for printing or JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: Step,
    pub end_reason: EndReason,
    pub hunters_alive: usize,
    pub knights: usize,
    pub treasures_outstanding: usize,
    pub stored_treasures: usize,
    pub stored_value: f32,
    pub deaths: usize,
    pub recruits: usize,
    pub hideouts: Vec<HideoutSummary>,
}

/// Run a single simulation step
///
/// Order:
/// 1. Every hunter, in id order (snapshot taken before the first one moves)
/// 2. Every knight, in id order
/// 3. Hideout upkeep: knowledge sharing, then recruitment
/// 4. Garrison upkeep: knowledge sharing, then recruitment
/// 5. Treasure decay and removal of depleted treasure
/// 6. Advance the step counter
pub fn run_simulation_step(world: &mut World) -> StepReport {
    let mut report = StepReport {
        step: world.current_step,
        ..Default::default()
    };
    let stored_before = world.stored_treasure_count();

    let hunters: Vec<HunterId> = world.hunters.keys().copied().collect();
    let population = world.hunters.len();
    for id in hunters {
        hunter_core::process(world, id);
    }
    report.deaths = population.saturating_sub(world.hunters.len());

    let knights: Vec<KnightId> = world.knights.keys().copied().collect();
    for id in knights {
        knight_core::process(world, id);
    }

    report.deliveries = world.stored_treasure_count().saturating_sub(stored_before);

    hideout_upkeep(world, &mut report);
    garrison_upkeep(world, &mut report);
    decay_treasures(world, &mut report);

    world.current_step += 1;
    report
}

fn hideout_upkeep(world: &mut World, report: &mut StepReport) {
    let ids: Vec<HideoutId> = world.hideouts.keys().copied().collect();
    for hid in ids {
        let recruit = {
            let Some(hideout) = world.hideouts.get_mut(&hid) else {
                continue;
            };
            let residents = hideout.hunters.clone();
            hideout.share_knowledge(world.hunters.values_mut().filter(|h| residents.contains(&h.id)));

            let skills: Vec<HunterSkill> = residents
                .iter()
                .filter_map(|id| world.hunters.get(id))
                .map(|h| h.skill)
                .collect();
            hideout.try_recruit(&skills, &world.config, &mut world.rng)
        };
        let Some(skill) = recruit else {
            continue;
        };

        let Some(position) = world.random_empty_cell(RECRUIT_PLACEMENT_ATTEMPTS) else {
            tracing::info!("No space to place a recruited hunter");
            continue;
        };
        let name = format!("Recruited-{}", world.recruit_count + 1);
        let Some(id) = world.add_hunter(&name, skill, position) else {
            continue;
        };
        world.recruit_count += 1;
        if let (Some(hideout), Some(hunter)) = (world.hideouts.get(&hid), world.hunters.get_mut(&id)) {
            hideout.teach(hunter);
        }
        report.recruits += 1;
        tracing::info!("{} ({:?}) recruited at {}", name, skill, position);
    }
}

fn garrison_upkeep(world: &mut World, report: &mut StepReport) {
    let ids: Vec<_> = world.garrisons.keys().copied().collect();
    for gid in ids {
        let (recruit, garrison_position) = {
            let Some(garrison) = world.garrisons.get_mut(&gid) else {
                continue;
            };
            let residents = garrison.knights.clone();
            garrison.share_knowledge(world.knights.values_mut().filter(|k| residents.contains(&k.id)));
            (garrison.try_recruit(&world.config, &mut world.rng), garrison.position)
        };
        if !recruit {
            continue;
        }

        let Some(position) = world.random_adjacent_empty(garrison_position) else {
            tracing::debug!("No room outside garrison at {} for a recruit", garrison_position);
            continue;
        };
        let name = format!("Recruited-Knight-{}", world.recruit_count + 1);
        let Some(id) = world.add_knight(&name, position) else {
            continue;
        };
        world.recruit_count += 1;
        world.assign_garrison(id, gid);
        report.recruits += 1;
        tracing::info!("{} recruited at {}", name, position);
    }
}

fn decay_treasures(world: &mut World, report: &mut StepReport) {
    let config = &world.config;
    let mut depleted: Vec<TreasureId> = Vec::new();
    for treasure in world.treasures.values_mut() {
        treasure.decay(config);
        if treasure.is_depleted(config) {
            depleted.push(treasure.id);
        }
    }

    for id in depleted {
        if let Some(treasure) = world.remove_treasure(id) {
            report.depleted += 1;
            tracing::info!("{:?} treasure at {} has decayed away", treasure.tier, treasure.position);
        }
    }
}

/// Why the run should stop now, if it should
pub fn end_reason(world: &World) -> Option<EndReason> {
    if world.outstanding_treasures() == 0 {
        Some(EndReason::AllTreasureResolved)
    } else if world.living_hunters() == 0 {
        Some(EndReason::NoHuntersLeft)
    } else {
        None
    }
}

/// Step until an end condition holds or `max_steps` steps have run
pub fn run(world: &mut World, max_steps: Step) -> RunSummary {
    run_with(world, max_steps, |_, _| {})
}

/// Like [`run`], calling `on_step` after every step
pub fn run_with<F>(world: &mut World, max_steps: Step, mut on_step: F) -> RunSummary
where
    F: FnMut(&World, &StepReport),
{
    let mut steps = 0;
    let mut deaths = 0;
    let mut recruits = 0;

    let reason = loop {
        if let Some(reason) = end_reason(world) {
            break reason;
        }
        if steps >= max_steps {
            break EndReason::StepLimit;
        }
        let report = run_simulation_step(world);
        deaths += report.deaths;
        recruits += report.recruits;
        steps += 1;
        on_step(world, &report);
    };

    tracing::info!("Run ended after {} steps: {:?}", steps, reason);

    let mut summary = summarize(world, reason);
    summary.deaths = deaths;
    summary.recruits = recruits;
    summary
}

/// Snapshot the world's outcome
pub fn summarize(world: &World, end_reason: EndReason) -> RunSummary {
    let hideouts: Vec<HideoutSummary> = world
        .hideouts
        .values()
        .map(|h| HideoutSummary {
            id: h.id,
            position: h.position,
            residents: h.hunters.len(),
            stored_treasures: h.stored_treasures.len(),
            stored_value: h.stored_value(),
        })
        .collect();

    RunSummary {
        seed: world.seed,
        steps: world.current_step,
        end_reason,
        hunters_alive: world.living_hunters(),
        knights: world.knights.len(),
        treasures_outstanding: world.outstanding_treasures(),
        stored_treasures: world.stored_treasure_count(),
        stored_value: hideouts.iter().map(|h| h.stored_value).sum(),
        deaths: 0,
        recruits: 0,
        hideouts,
    }
}
