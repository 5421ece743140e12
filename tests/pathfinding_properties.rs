use eldoria::core::config::SimulationConfig;
use eldoria::core::types::{HideoutId, HunterId, KnightId, Position, TreasureId};
use eldoria::entity::{Hideout, Hunter, HunterSkill, Knight, Treasure, TreasureTier};
use eldoria::grid::{CellContent, Grid, MovementRole};
use eldoria::pathfinding::find_path;
use proptest::prelude::*;

fn tier(index: usize) -> TreasureTier {
    TreasureTier::ALL[index % TreasureTier::ALL.len()]
}

/// Scatter knights and treasure over the grid from raw coordinate pairs
fn obstacle_grid(size: i32, knights: &[(i32, i32)], treasures: &[(i32, i32)]) -> Grid {
    let mut grid = Grid::new(size);
    for (i, (x, y)) in knights.iter().enumerate() {
        grid.place(Position::new(*x, *y), CellContent::Knight(KnightId(i as u32)));
    }
    for (i, (x, y)) in treasures.iter().enumerate() {
        grid.place(Position::new(*x, *y), CellContent::Treasure(TreasureId(i as u32)));
    }
    grid
}

#[test]
fn test_hunter_detours_around_knight_wall() {
    let mut grid = Grid::new(10);
    for y in 2..8 {
        grid.place(Position::new(4, y), CellContent::Knight(KnightId(y as u32)));
    }

    let path = find_path(&grid, Position::new(2, 5), Position::new(6, 5), MovementRole::Hunter);

    assert_eq!(path.last(), Some(&Position::new(6, 5)));
    assert!(path.iter().all(|p| p.x != 4 || !(2..8).contains(&p.y)));
}

#[test]
fn test_knight_cannot_reach_across_hideout_ring() {
    let mut grid = Grid::new(10);
    let target = Position::new(5, 5);
    grid.place(target, CellContent::Hunter(HunterId(0)));
    for (i, n) in grid.neighbors(target).into_iter().enumerate() {
        grid.place(n, CellContent::Hideout(HideoutId(i as u32)));
    }

    assert!(find_path(&grid, Position::new(0, 0), target, MovementRole::Knight).is_empty());
    // Hunters may cross hideouts
    assert!(!find_path(&grid, Position::new(0, 0), target, MovementRole::Hunter).is_empty());
}

proptest! {
    #[test]
    fn property_wrap_lands_inside_grid(size in 1_i32..40, x in -500_i32..500, y in -500_i32..500) {
        let grid = Grid::new(size);
        let p = grid.wrap(x, y);
        prop_assert!(p.x >= 0 && p.x < size);
        prop_assert!(p.y >= 0 && p.y < size);
        prop_assert_eq!(grid.wrap(p.x, p.y), p);
        prop_assert_eq!(grid.wrap(x + size, y - size), p);
    }

    #[test]
    fn property_paths_are_adjacent_and_role_legal(
        size in 4_i32..16,
        start in (0_i32..16, 0_i32..16),
        goal in (0_i32..16, 0_i32..16),
        knights in prop::collection::vec((0_i32..16, 0_i32..16), 0..20),
        treasures in prop::collection::vec((0_i32..16, 0_i32..16), 0..20),
        as_knight in any::<bool>(),
    ) {
        let grid = obstacle_grid(size, &knights, &treasures);
        let start = grid.wrap(start.0, start.1);
        let goal = grid.wrap(goal.0, goal.1);
        let role = if as_knight { MovementRole::Knight } else { MovementRole::Hunter };

        let path = find_path(&grid, start, goal, role);

        if path.is_empty() {
            return Ok(());
        }
        prop_assert_eq!(*path.last().unwrap(), goal);
        prop_assert!(!path.contains(&start));
        let mut previous = start;
        for step in &path {
            prop_assert!(grid.are_adjacent(previous, *step));
            prop_assert!(role.permits(grid.kind(*step)));
            previous = *step;
        }
    }

    #[test]
    fn property_open_grid_always_has_a_path(size in 2_i32..16, a in (0_i32..16, 0_i32..16), b in (0_i32..16, 0_i32..16)) {
        let grid = Grid::new(size);
        let start = grid.wrap(a.0, a.1);
        let goal = grid.wrap(b.0, b.1);
        let path = find_path(&grid, start, goal, MovementRole::Hunter);
        prop_assert_eq!(path.is_empty(), start == goal);
    }

    #[test]
    fn property_decay_is_monotonic_and_sticky(index in 0_usize..3, percent in 0.0_f32..0.5, steps in 1_usize..60) {
        let mut config = SimulationConfig::default();
        config.treasure_decay_percent = percent;
        let mut treasure = Treasure::new(TreasureId(0), tier(index), Position::new(0, 0));

        let mut depleted = false;
        for _ in 0..steps {
            let before = treasure.value;
            treasure.decay(&config);
            prop_assert!(treasure.value <= before);
            prop_assert!(treasure.value >= 0.0);
            if depleted {
                prop_assert!(treasure.is_depleted(&config));
            }
            depleted = treasure.is_depleted(&config);
        }
    }

    #[test]
    fn property_stamina_and_energy_stay_in_range(actions in prop::collection::vec(0_u8..4, 1..300)) {
        let config = SimulationConfig::default();
        let mut hunter = Hunter::new(HunterId(0), "h".into(), HunterSkill::Stealth, Position::new(0, 0));
        let mut knight = Knight::new(KnightId(0), "k".into(), Position::new(0, 0));

        for action in actions {
            match action {
                0 => hunter.exert(&config),
                1 => { hunter.rest(&config); }
                2 => hunter.drain(config.challenge_penalty),
                _ => hunter.collapse_check(&config),
            }
            if action % 2 == 0 {
                knight.exert(&config);
            } else {
                knight.rest(&config);
            }
            prop_assert!((0.0..=1.0).contains(&hunter.stamina));
            prop_assert!((0.0..=1.0).contains(&knight.energy));
            prop_assert!(!hunter.collapsing || hunter.stamina < 1.0 || !hunter.alive);
        }
    }

    #[test]
    fn property_hideout_never_exceeds_capacity(capacity in 1_usize..8, arrivals in prop::collection::vec(0_u32..20, 0..40)) {
        let mut hideout = Hideout::new(HideoutId(0), Position::new(0, 0), capacity);
        for id in arrivals {
            let had_room = hideout.has_space() || hideout.hunters.contains(&HunterId(id));
            prop_assert_eq!(hideout.add_hunter(HunterId(id)), had_room);
            prop_assert!(hideout.hunters.len() <= capacity);
        }
    }
}
