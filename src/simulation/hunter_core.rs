//! Hunter decision core
//!
//! One call to [`process`] runs a hunter through its state machine for a
//! single step: rest in a hideout, count down a collapse, haul treasure
//! home, limp to shelter, or go looking for loot.

use std::cmp::Ordering;

use crate::core::config::SimulationConfig;
use crate::core::types::{HideoutId, HunterId, Position, TreasureId};
use crate::entity::{Hunter, HunterState};
use crate::grid::{CellContent, CellKind, MovementRole};
use crate::pathfinding::find_path;
use crate::simulation::world::World;

/// Why the hunter is moving this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Errand {
    /// Carrying treasure toward a hideout
    Deliver,
    /// Low on stamina, looking for shelter
    Shelter,
    /// Looking for treasure
    Explore,
}

/// Run one step for a hunter; dead hunters are removed from play
pub fn process(world: &mut World, id: HunterId) {
    let Some(mut hunter) = world.hunters.remove(&id) else {
        return;
    };
    let config = world.config.clone();

    if step_hunter(world, &mut hunter, &config) {
        world.hunters.insert(id, hunter);
    } else {
        world.retire_hunter(&hunter);
    }
}

/// Returns false once the hunter has died
fn step_hunter(world: &mut World, hunter: &mut Hunter, config: &SimulationConfig) -> bool {
    let state = hunter.state(config);
    tracing::debug!(
        "{} at {}: {:?}, stamina {:.2}, carrying {:?}",
        hunter.name,
        hunter.position,
        state,
        hunter.stamina,
        hunter.carrying
    );

    match state {
        HunterState::Dead => return false,
        HunterState::RestingInHideout => {
            rest_in_hideout(world, hunter, config);
            return true;
        }
        _ => {}
    }

    if hunter.stamina <= 0.0 && !hunter.collapsing {
        hunter.collapsing = true;
        hunter.collapse_counter = 0;
        tracing::info!("{} has run out of stamina and is collapsing", hunter.name);
    }

    if hunter.collapsing {
        hunter.collapse_check(config);
        return hunter.alive;
    }

    if hunter.carrying.is_some() {
        let path = safe_path_to_hideout(world, hunter);
        advance(world, hunter, path.first().copied(), Errand::Deliver, config);
    } else if hunter.is_weak(config) {
        let path = safe_path_to_hideout(world, hunter);
        advance(world, hunter, path.first().copied(), Errand::Shelter, config);
    } else {
        let path = safe_path_to_treasure(world, hunter);
        advance(world, hunter, path.first().copied(), Errand::Explore, config);
    }
    true
}

fn rest_in_hideout(world: &mut World, hunter: &mut Hunter, config: &SimulationConfig) {
    let Some(hid) = hunter.hideout else {
        return;
    };
    if let Some(tid) = hunter.carrying.take() {
        deliver(world, hid, tid);
    }
    if hunter.rest(config) {
        exit_hideout(world, hunter, hid);
    }
}

/// Move a treasure from the registry into a hideout's storage
fn deliver(world: &mut World, hid: HideoutId, tid: TreasureId) {
    let Some(treasure) = world.treasures.remove(&tid) else {
        return;
    };
    if let Some(hideout) = world.hideouts.get_mut(&hid) {
        tracing::info!(
            "{:?} treasure worth {:.2} stored in hideout at {}",
            treasure.tier,
            treasure.value,
            hideout.position
        );
        hideout.store(treasure);
    }
}

fn enter_hideout(world: &mut World, hunter: &mut Hunter, hid: HideoutId) -> bool {
    let Some(hideout) = world.hideouts.get_mut(&hid) else {
        return false;
    };
    if !hideout.add_hunter(hunter.id) {
        return false;
    }
    let hideout_position = hideout.position;

    if world.grid.content(hunter.position) == CellContent::Hunter(hunter.id) {
        world.grid.clear_cell(hunter.position);
    }
    hunter.position = hideout_position;
    hunter.hideout = Some(hid);
    if let Some(tid) = hunter.carrying.take() {
        deliver(world, hid, tid);
    }
    tracing::debug!("{} entered hideout at {}", hunter.name, hideout_position);
    true
}

/// Leave for a random free neighbor of the hideout, or stay put
fn exit_hideout(world: &mut World, hunter: &mut Hunter, hid: HideoutId) {
    let Some(exit) = world.random_adjacent_empty(hunter.position) else {
        tracing::debug!("{} is rested but the hideout exits are blocked", hunter.name);
        return;
    };
    if let Some(hideout) = world.hideouts.get_mut(&hid) {
        hideout.remove_hunter(hunter.id);
    }
    hunter.hideout = None;
    hunter.position = exit;
    world.grid.place(exit, CellContent::Hunter(hunter.id));
    tracing::debug!("{} left the hideout for {}", hunter.name, exit);
}

/// Take one step toward `next`, resolving whatever occupies it
///
/// Every attempt except entering a hideout costs stamina and ends with a
/// scan of the surroundings.
fn advance(
    world: &mut World,
    hunter: &mut Hunter,
    next: Option<Position>,
    errand: Errand,
    config: &SimulationConfig,
) {
    if let Some(next) = next {
        let next = world.grid.wrap_position(next);
        match world.grid.content(next) {
            CellContent::Hideout(hid) if errand != Errand::Explore => {
                if enter_hideout(world, hunter, hid) {
                    return;
                }
                tracing::debug!("Hideout at {} is full", next);
            }
            CellContent::Treasure(tid) => step_onto_treasure(world, hunter, next, tid),
            CellContent::Empty => relocate(world, hunter, next),
            other => {
                tracing::debug!("{} blocked by {:?} at {}", hunter.name, other.kind(), next);
            }
        }
    } else {
        tracing::debug!("{} has nowhere to go and waits", hunter.name);
    }

    hunter.exert(config);
    scan(world, hunter, config);
}

/// Pick up, swap for, or push aside the treasure at `next`
fn step_onto_treasure(world: &mut World, hunter: &mut Hunter, next: Position, found: TreasureId) {
    let from = hunter.position;

    let Some(carried) = hunter.carrying else {
        hunter.carrying = Some(found);
        tracing::info!(
            "{} picked up treasure worth {:.2} at {}",
            hunter.name,
            world.treasure_value(found),
            next
        );
        relocate(world, hunter, next);
        return;
    };

    if world.grid.cell(from).is_structure() {
        return;
    }

    // Whichever treasure is left behind lands on the vacated cell
    let left_behind = if world.treasure_value(found) > world.treasure_value(carried) {
        tracing::debug!("{} swaps its load for a richer find at {}", hunter.name, next);
        hunter.carrying = Some(found);
        carried
    } else {
        found
    };

    world.grid.set_transit_content(from, CellContent::Treasure(left_behind));
    if let Some(treasure) = world.treasures.get_mut(&left_behind) {
        treasure.position = from;
    }
    world.grid.set_transit_content(next, CellContent::Hunter(hunter.id));
    hunter.position = next;
}

fn relocate(world: &mut World, hunter: &mut Hunter, to: Position) {
    if world.grid.content(hunter.position) == CellContent::Hunter(hunter.id) {
        world.grid.clear_cell(hunter.position);
    }
    if world.grid.set_transit_content(to, CellContent::Hunter(hunter.id)) {
        hunter.position = to;
    }
}

fn scan(world: &World, hunter: &mut Hunter, config: &SimulationConfig) {
    let nearby = world.grid.get_cells_in_radius(hunter.position, config.hunter_scan_radius);
    hunter.scan_and_remember(nearby);
}

fn is_dangerous(kind: CellKind) -> bool {
    matches!(kind, CellKind::Knight | CellKind::Garrison)
}

/// Path to the best remembered treasure, or a single fallback step
///
/// Remembered treasures are tried nearest first, richer first on ties.
/// A path is safe when none of its cells holds a knight, garrison or
/// hideout. Without one, the hunter grabs the richest adjacent treasure
/// or steps onto any empty neighbor.
pub fn safe_path_to_treasure(world: &World, hunter: &Hunter) -> Vec<Position> {
    let grid = &world.grid;

    let mut candidates: Vec<(Position, f32)> = hunter
        .known_treasures
        .iter()
        .filter_map(|p| match grid.content(*p) {
            CellContent::Treasure(tid) => world.treasures.get(&tid).map(|t| (*p, t.value)),
            _ => None,
        })
        .collect();

    candidates.sort_by(|a, b| {
        hunter
            .position
            .manhattan(&a.0)
            .cmp(&hunter.position.manhattan(&b.0))
            .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
    });

    for (target, _) in &candidates {
        let path = find_path(grid, hunter.position, *target, MovementRole::Hunter);
        if path.is_empty() {
            tracing::trace!("No path to treasure at {}", target);
            continue;
        }
        // Hunter-role A* never expands knights or garrisons
        if path.iter().all(|p| grid.kind(*p) != CellKind::Hideout) {
            return path;
        }
    }

    let neighbors = grid.neighbors(hunter.position);

    let mut best: Option<(Position, f32)> = None;
    for n in neighbors {
        if let CellContent::Treasure(tid) = grid.content(n) {
            let value = world.treasure_value(tid);
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((n, value));
            }
        }
    }
    if let Some((n, _)) = best {
        return vec![n];
    }

    neighbors
        .into_iter()
        .find(|n| grid.is_empty(*n))
        .map(|n| vec![n])
        .unwrap_or_default()
}

/// Path to the nearest reachable hideout with room, or a fallback step
///
/// Hunter-role A* already routes around knights and garrisons. Fallbacks are an
/// adjacent hideout with room, then any neighbor free of garrisons,
/// knights and other hunters.
pub fn safe_path_to_hideout(world: &World, hunter: &Hunter) -> Vec<Position> {
    let grid = &world.grid;
    let has_room = |content: CellContent| match content {
        CellContent::Hideout(hid) => world.hideouts.get(&hid).map_or(false, |h| h.has_space()),
        _ => false,
    };

    let mut known = hunter.known_hideouts.clone();
    known.sort_by_key(|p| hunter.position.manhattan(p));

    for target in &known {
        let path = find_path(grid, hunter.position, *target, MovementRole::Hunter);
        let Some(last) = path.last() else {
            tracing::trace!("No path to hideout at {}", target);
            continue;
        };
        if has_room(grid.content(*last)) {
            return path;
        }
    }

    let neighbors = grid.neighbors(hunter.position);

    if let Some(n) = neighbors.iter().find(|n| has_room(grid.content(**n))) {
        return vec![*n];
    }

    neighbors
        .into_iter()
        .find(|n| !is_dangerous(grid.kind(*n)) && grid.kind(*n) != CellKind::Hunter)
        .map(|n| vec![n])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{HunterSkill, TreasureTier};

    fn world() -> World {
        let mut config = SimulationConfig::default();
        config.grid_size = 10;
        World::with_seed(config, 3)
    }

    fn add_hunter(w: &mut World, p: Position) -> HunterId {
        w.add_hunter("Birsen", HunterSkill::Navigation, p).unwrap()
    }

    #[test]
    fn test_hunter_collects_adjacent_treasure() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        let tid = w.add_treasure(Position::new(5, 6), TreasureTier::Gold).unwrap();
        w.hunters.get_mut(&hid).unwrap().remember_treasure(Position::new(5, 6));

        process(&mut w, hid);

        let h = &w.hunters[&hid];
        assert_eq!(h.carrying, Some(tid));
        assert_eq!(h.position, Position::new(5, 6));
        assert_eq!(w.grid.content(Position::new(5, 6)), CellContent::Hunter(hid));
        assert!(w.grid.is_empty(Position::new(5, 5)));
    }

    #[test]
    fn test_zero_stamina_starts_collapse() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        {
            let h = w.hunters.get_mut(&hid).unwrap();
            h.stamina = 0.0;
            h.collapsing = false;
        }
        process(&mut w, hid);
        let h = &w.hunters[&hid];
        assert!(h.collapsing);
        assert_eq!(h.position, Position::new(5, 5));
    }

    #[test]
    fn test_collapsed_hunter_dies_and_leaves_grid() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.hunters.get_mut(&hid).unwrap().stamina = 0.0;

        process(&mut w, hid);
        process(&mut w, hid);
        assert!(w.hunters.contains_key(&hid));
        process(&mut w, hid);

        assert!(!w.hunters.contains_key(&hid));
        assert!(w.grid.is_empty(Position::new(5, 5)));
    }

    #[test]
    fn test_dead_hunter_is_removed() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(1, 1));
        w.hunters.get_mut(&hid).unwrap().alive = false;
        process(&mut w, hid);
        assert!(w.hunters.is_empty());
        assert!(w.grid.is_empty(Position::new(1, 1)));
    }

    #[test]
    fn test_carrier_delivers_into_adjacent_hideout() {
        let mut w = world();
        let hideout = w.add_hideout(Position::new(5, 6)).unwrap();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        let tid = w.add_treasure(Position::new(0, 0), TreasureTier::Silver).unwrap();
        w.grid.clear_cell(Position::new(0, 0));
        w.hunters.get_mut(&hid).unwrap().carrying = Some(tid);

        process(&mut w, hid);

        let h = &w.hunters[&hid];
        assert_eq!(h.hideout, Some(hideout));
        assert_eq!(h.carrying, None);
        assert_eq!(h.position, Position::new(5, 6));
        assert!(w.grid.is_empty(Position::new(5, 5)));
        assert_eq!(w.hideouts[&hideout].stored_treasures.len(), 1);
        assert_eq!(w.hideouts[&hideout].hunters, vec![hid]);
        assert!(!w.treasures.contains_key(&tid));
    }

    #[test]
    fn test_full_hideout_turns_hunter_away() {
        let mut w = world();
        w.config.hideout_capacity = 1;
        let hideout = w.add_hideout(Position::new(5, 6)).unwrap();
        w.hideouts.get_mut(&hideout).unwrap().capacity = 1;
        w.hideouts.get_mut(&hideout).unwrap().add_hunter(HunterId(99));

        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.hunters.get_mut(&hid).unwrap().stamina = 0.05;
        w.hunters.get_mut(&hid).unwrap().remember_hideout(Position::new(5, 6));

        process(&mut w, hid);

        let h = &w.hunters[&hid];
        assert_eq!(h.hideout, None);
        assert_eq!(w.hideouts[&hideout].hunters.len(), 1);
        assert!((h.stamina - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_resting_hunter_recovers_and_exits() {
        let mut w = world();
        let hideout = w.add_hideout(Position::new(5, 6)).unwrap();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.hunters.get_mut(&hid).unwrap().stamina = 0.05;
        w.hunters.get_mut(&hid).unwrap().remember_hideout(Position::new(5, 6));

        process(&mut w, hid);
        assert_eq!(w.hunters[&hid].hideout, Some(hideout));

        let mut steps = 0;
        while w.hunters[&hid].hideout.is_some() && steps < 200 {
            process(&mut w, hid);
            steps += 1;
        }

        let h = &w.hunters[&hid];
        assert_eq!(h.stamina, 1.0);
        assert!(h.hideout.is_none());
        assert!(w.grid.are_adjacent(Position::new(5, 6), h.position));
        assert_eq!(w.grid.content(h.position), CellContent::Hunter(hid));
        assert!(w.hideouts[&hideout].hunters.is_empty());
    }

    #[test]
    fn test_richer_treasure_is_swapped() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        let bronze = w.add_treasure(Position::new(0, 0), TreasureTier::Bronze).unwrap();
        w.grid.clear_cell(Position::new(0, 0));
        let gold = w.add_treasure(Position::new(5, 6), TreasureTier::Gold).unwrap();
        // Every other neighbor is unavailable so the fallback step lands on the gold
        w.add_knight("k1", Position::new(4, 5));
        w.add_knight("k2", Position::new(6, 5));
        w.add_knight("k3", Position::new(5, 4));
        w.hunters.get_mut(&hid).unwrap().carrying = Some(bronze);

        process(&mut w, hid);

        let h = &w.hunters[&hid];
        assert_eq!(h.carrying, Some(gold));
        assert_eq!(h.position, Position::new(5, 6));
        assert_eq!(w.grid.content(Position::new(5, 5)), CellContent::Treasure(bronze));
        assert_eq!(w.treasures[&bronze].position, Position::new(5, 5));
    }

    #[test]
    fn test_lesser_treasure_is_pushed_aside() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        let gold = w.add_treasure(Position::new(0, 0), TreasureTier::Gold).unwrap();
        w.grid.clear_cell(Position::new(0, 0));
        let bronze = w.add_treasure(Position::new(5, 6), TreasureTier::Bronze).unwrap();
        w.add_knight("k1", Position::new(4, 5));
        w.add_knight("k2", Position::new(6, 5));
        w.add_knight("k3", Position::new(5, 4));
        w.hunters.get_mut(&hid).unwrap().carrying = Some(gold);

        process(&mut w, hid);

        let h = &w.hunters[&hid];
        assert_eq!(h.carrying, Some(gold));
        assert_eq!(h.position, Position::new(5, 6));
        assert_eq!(w.grid.content(Position::new(5, 5)), CellContent::Treasure(bronze));
    }

    #[test]
    fn test_blocked_hunter_still_pays_stamina() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.add_knight("k1", Position::new(4, 5));
        w.add_knight("k2", Position::new(6, 5));
        w.add_knight("k3", Position::new(5, 4));
        w.add_knight("k4", Position::new(5, 6));

        process(&mut w, hid);

        let h = &w.hunters[&hid];
        assert_eq!(h.position, Position::new(5, 5));
        assert!((h.stamina - 0.98).abs() < 1e-6);
        assert_eq!(h.known_knights.len(), 4);
    }

    #[test]
    fn test_treasure_path_skips_routes_through_hideouts() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.add_hideout(Position::new(5, 6));
        w.add_treasure(Position::new(5, 7), TreasureTier::Gold);
        w.hunters.get_mut(&hid).unwrap().remember_treasure(Position::new(5, 7));

        // The only shortest route crosses the hideout, so the hunter falls
        // back to a plain step instead
        let path = safe_path_to_treasure(&w, &w.hunters[&hid]);
        assert!(!path.contains(&Position::new(5, 6)));
        assert_eq!(path, vec![Position::new(4, 5)]);
    }

    #[test]
    fn test_hideout_path_detours_around_knight() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.add_hideout(Position::new(5, 8));
        w.add_knight("Melisa", Position::new(5, 6));
        w.hunters.get_mut(&hid).unwrap().remember_hideout(Position::new(5, 8));

        let path = safe_path_to_hideout(&w, &w.hunters[&hid]);
        assert_eq!(path.last(), Some(&Position::new(5, 8)));
        assert!(path.iter().all(|p| w.grid.kind(*p) != CellKind::Knight));
        assert!(path.len() > 3);
    }

    #[test]
    fn test_nearest_known_treasure_preferred() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.add_treasure(Position::new(5, 8), TreasureTier::Gold);
        w.add_treasure(Position::new(5, 7), TreasureTier::Bronze);
        {
            let h = w.hunters.get_mut(&hid).unwrap();
            h.remember_treasure(Position::new(5, 8));
            h.remember_treasure(Position::new(5, 7));
        }
        let path = safe_path_to_treasure(&w, &w.hunters[&hid]);
        assert_eq!(path.last(), Some(&Position::new(5, 7)));
    }

    #[test]
    fn test_forgotten_treasure_is_ignored() {
        let mut w = world();
        let hid = add_hunter(&mut w, Position::new(5, 5));
        w.hunters.get_mut(&hid).unwrap().remember_treasure(Position::new(8, 8));
        let path = safe_path_to_treasure(&w, &w.hunters[&hid]);
        // Falls back to the first empty neighbor
        assert_eq!(path, vec![Position::new(4, 5)]);
    }
}
