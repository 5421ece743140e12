//! Knight decision core
//!
//! Knights rest when spent, chase the nearest reachable hunter they can
//! see, and otherwise patrol at random. Catching a hunter knocks loot
//! out of its hands.

use rand::seq::SliceRandom;

use crate::core::config::SimulationConfig;
use crate::core::types::{Direction, HunterId, KnightId, Position};
use crate::entity::{InteractionMethod, Knight};
use crate::grid::{CellContent, MovementRole};
use crate::pathfinding::find_path;
use crate::simulation::world::World;

/// Run one step for a knight
pub fn process(world: &mut World, id: KnightId) {
    let Some(mut knight) = world.knights.remove(&id) else {
        return;
    };
    let config = world.config.clone();

    step_knight(world, &mut knight, &config);
    world.knights.insert(id, knight);
}

fn step_knight(world: &mut World, knight: &mut Knight, config: &SimulationConfig) {
    if knight.resting {
        if knight.rest(config) {
            if !knight.in_garrison || leave_garrison(world, knight) {
                knight.resting = false;
                tracing::debug!("{} is back on patrol at {}", knight.name, knight.position);
            }
        }
        return;
    }

    if knight.should_rest(config) {
        knight.resting = true;
        knight.target = None;
        enter_garrison(world, knight);
        tracing::debug!("{} stops to rest (energy {:.2})", knight.name, knight.energy);
        return;
    }

    if !pursue(world, knight, config) {
        knight.target = None;
        patrol(world, knight, config);
    }
}

/// Chase the hunter with the shortest route; false if none is reachable
fn pursue(world: &mut World, knight: &mut Knight, config: &SimulationConfig) -> bool {
    let grid = &world.grid;
    let visible = knight.detect_hunters(grid.get_cells_in_radius(knight.position, config.knight_radius));

    let mut best: Option<(HunterId, Vec<Position>)> = None;
    for (hid, position) in visible {
        if !world.hunters.get(&hid).map_or(false, |h| h.alive) {
            continue;
        }
        let path = find_path(grid, knight.position, position, MovementRole::Knight);
        if path.is_empty() {
            continue;
        }
        if best.as_ref().map_or(true, |(_, p)| path.len() < p.len()) {
            best = Some((hid, path));
        }
    }

    let Some((target, path)) = best else {
        return false;
    };
    if knight.target != Some(target) {
        tracing::debug!("{} gives chase to hunter {:?}", knight.name, target);
    }
    knight.target = Some(target);

    let next = path[0];
    match world.grid.content(next) {
        CellContent::Empty => relocate(world, knight, next),
        CellContent::Hunter(hid) => {
            interact_with_hunter(world, hid, InteractionMethod::Detain);
        }
        _ => {}
    }
    knight.exert(config);
    knight.remember_patrol(knight.position);
    true
}

fn patrol(world: &mut World, knight: &mut Knight, config: &SimulationConfig) {
    if let Some(direction) = Direction::ALL.choose(&mut world.rng) {
        let next = world.grid.wrap_position(knight.position.offset(*direction));
        match world.grid.content(next) {
            CellContent::Empty => relocate(world, knight, next),
            CellContent::Hunter(hid) => {
                interact_with_hunter(world, hid, InteractionMethod::Detain);
            }
            _ => {}
        }
    }
    knight.exert(config);
    knight.remember_patrol(knight.position);
}

fn relocate(world: &mut World, knight: &mut Knight, to: Position) {
    if world.grid.content(knight.position) == CellContent::Knight(knight.id) {
        world.grid.clear_cell(knight.position);
    }
    if world.grid.set_transit_content(to, CellContent::Knight(knight.id)) {
        knight.position = to;
    }
}

/// Step inside the home garrison if it has room; otherwise rest in place
fn enter_garrison(world: &mut World, knight: &mut Knight) {
    let Some(gid) = knight.garrison else {
        return;
    };
    let Some(garrison) = world.garrisons.get_mut(&gid) else {
        return;
    };
    if !garrison.add_knight(knight.id) {
        tracing::debug!("Garrison at {} is full", garrison.position);
        return;
    }
    let garrison_position = garrison.position;
    if world.grid.content(knight.position) == CellContent::Knight(knight.id) {
        world.grid.clear_cell(knight.position);
    }
    knight.position = garrison_position;
    knight.in_garrison = true;
}

/// Step out next to the garrison; false while every exit is occupied
fn leave_garrison(world: &mut World, knight: &mut Knight) -> bool {
    let Some(exit) = world.random_adjacent_empty(knight.position) else {
        return false;
    };
    if let Some(garrison) = knight.garrison.and_then(|gid| world.garrisons.get_mut(&gid)) {
        garrison.remove_knight(knight.id);
    }
    world.grid.place(exit, CellContent::Knight(knight.id));
    knight.position = exit;
    knight.in_garrison = false;
    true
}

/// Penalize a caught hunter and make it drop what it carries
///
/// Returns true if treasure was dropped.
pub fn interact_with_hunter(world: &mut World, hunter: HunterId, method: InteractionMethod) -> bool {
    let penalty = method.stamina_penalty(&world.config);
    let Some(h) = world.hunters.get_mut(&hunter) else {
        return false;
    };
    h.drain(penalty);
    tracing::info!("{} caught at {} ({:?}, stamina {:.2})", h.name, h.position, method, h.stamina);
    drop_treasure(world, hunter)
}

/// Force a hunter to step aside and leave its treasure behind
///
/// The hunter moves to a random free neighbor and the treasure takes its
/// old cell. With no free neighbor the hunter keeps its load.
pub fn drop_treasure(world: &mut World, hunter: HunterId) -> bool {
    let Some(h) = world.hunters.get(&hunter) else {
        return false;
    };
    let Some(tid) = h.carrying else {
        return false;
    };
    if h.hideout.is_some() {
        return false;
    }
    let from = h.position;

    let Some(to) = world.random_adjacent_empty(from) else {
        tracing::debug!("Hunter {:?} is boxed in and keeps its treasure", hunter);
        return false;
    };

    world.grid.set_transit_content(from, CellContent::Treasure(tid));
    world.grid.place(to, CellContent::Hunter(hunter));
    if let Some(treasure) = world.treasures.get_mut(&tid) {
        treasure.position = from;
    }
    if let Some(h) = world.hunters.get_mut(&hunter) {
        h.position = to;
        h.carrying = None;
        h.remember_treasure(from);
        tracing::info!("{} dropped its treasure at {}", h.name, from);
    }
    true
}
