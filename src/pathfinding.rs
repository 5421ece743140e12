//! A* pathfinding over the toroidal grid
//!
//! The search loop is shared by every agent kind. Which cells may be
//! expanded is decided by a traversability predicate passed in from
//! outside, normally derived from a [`MovementRole`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::core::types::Position;
use crate::grid::{Cell, Grid, MovementRole};

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    position: Position,
    f_cost: i32, // g_cost + heuristic
    sequence: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.sequence == other.sequence
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; equal f pops in insertion order
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manhattan distance, deliberately not wrap-aware
pub fn heuristic(a: Position, b: Position) -> i32 {
    a.manhattan(&b)
}

/// Find a path for the given movement role
///
/// Returns the steps after `start` up to and including `goal`.
/// An empty vector means the goal is unreachable (or already reached).
pub fn find_path(grid: &Grid, start: Position, goal: Position, role: MovementRole) -> Vec<Position> {
    find_path_with(grid, start, goal, |cell| role.permits(cell.kind()))
}

/// Find a path, expanding only neighbors for which `passable` holds
pub fn find_path_with<F>(grid: &Grid, start: Position, goal: Position, passable: F) -> Vec<Position>
where
    F: Fn(&Cell) -> bool,
{
    let start = grid.wrap_position(start);
    let goal = grid.wrap_position(goal);
    if start == goal {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Position, Position> = AHashMap::new();
    let mut g_scores: AHashMap<Position, i32> = AHashMap::new();
    let mut sequence = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        position: start,
        f_cost: heuristic(start, goal),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        if current.position == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        let current_g = g_scores.get(&current.position).copied().unwrap_or(i32::MAX);

        for neighbor in grid.neighbors(current.position) {
            if !passable(grid.cell(neighbor)) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(i32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.position);
                g_scores.insert(neighbor, tentative_g);

                sequence += 1;
                open_set.push(PathNode {
                    position: neighbor,
                    f_cost: tentative_g + heuristic(neighbor, goal),
                    sequence,
                });
            }
        }
    }

    tracing::trace!("No path from {} to {}", start, goal);
    Vec::new()
}

/// Walk parent pointers back from goal, dropping the start cell
fn reconstruct_path(
    came_from: &AHashMap<Position, Position>,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GarrisonId, HideoutId, HunterId, KnightId, TreasureId};
    use crate::grid::CellContent;

    #[test]
    fn test_pathfind_straight_line() {
        let grid = Grid::new(10);
        let path = find_path(&grid, Position::new(0, 0), Position::new(0, 3), MovementRole::Hunter);
        assert_eq!(
            path,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(0, 3)]
        );
    }

    #[test]
    fn test_path_excludes_start_includes_goal() {
        let grid = Grid::new(10);
        let start = Position::new(5, 5);
        let goal = Position::new(8, 8);
        let path = find_path(&grid, start, goal, MovementRole::Hunter);
        assert_eq!(path.len(), 6);
        assert!(!path.contains(&start));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn test_pathfind_wraps_around_edge() {
        let grid = Grid::new(10);
        let path = find_path(&grid, Position::new(0, 0), Position::new(9, 0), MovementRole::Hunter);
        assert!(!path.is_empty());
        assert_eq!(path.last(), Some(&Position::new(9, 0)));
        assert!(grid.are_adjacent(Position::new(0, 0), path[0]));
    }

    #[test]
    fn test_hunter_path_avoids_knight() {
        let mut grid = Grid::new(10);
        grid.place(Position::new(6, 6), CellContent::Knight(KnightId(0)));
        let path = find_path(&grid, Position::new(5, 5), Position::new(8, 8), MovementRole::Hunter);
        assert!(!path.is_empty());
        assert!(!path.contains(&Position::new(6, 6)));
    }

    #[test]
    fn test_knight_cell_goal_unreachable_for_hunter() {
        let mut grid = Grid::new(10);
        grid.place(Position::new(6, 6), CellContent::Knight(KnightId(0)));
        let path = find_path(&grid, Position::new(5, 5), Position::new(6, 6), MovementRole::Hunter);
        assert!(path.is_empty());
    }

    #[test]
    fn test_boxed_in_start_has_no_path() {
        let mut grid = Grid::new(10);
        let start = Position::new(5, 5);
        for (i, neighbor) in grid.neighbors(start).into_iter().enumerate() {
            grid.place(neighbor, CellContent::Garrison(GarrisonId(i as u32)));
        }
        let path = find_path(&grid, start, Position::new(0, 0), MovementRole::Hunter);
        assert!(path.is_empty());
    }

    #[test]
    fn test_knight_path_crosses_hunters_not_structures() {
        let mut grid = Grid::new(10);
        // Wall of hideouts and treasure with a single hunter-held gap
        grid.place(Position::new(0, 5), CellContent::Hideout(HideoutId(0)));
        grid.place(Position::new(1, 5), CellContent::Treasure(TreasureId(0)));
        grid.place(Position::new(2, 5), CellContent::Hunter(HunterId(9)));
        for x in 3..10 {
            grid.place(Position::new(x, 5), CellContent::Garrison(GarrisonId(x as u32)));
        }

        let start = Position::new(2, 3);
        let goal = Position::new(2, 7);
        let path = find_path(&grid, start, goal, MovementRole::Knight);
        assert!(path.contains(&Position::new(2, 5)));
        for p in &path {
            assert!(!matches!(
                grid.kind(*p),
                crate::grid::CellKind::Knight
                    | crate::grid::CellKind::Garrison
                    | crate::grid::CellKind::Hideout
                    | crate::grid::CellKind::Treasure
            ));
        }

        // Hunters treat the treasure cell as open ground
        let hunter_path = find_path(&grid, start, goal, MovementRole::Hunter);
        assert!(!hunter_path.is_empty());
    }

    #[test]
    fn test_same_start_and_goal_is_empty() {
        let grid = Grid::new(10);
        let p = Position::new(4, 4);
        assert!(find_path(&grid, p, p, MovementRole::Knight).is_empty());
    }

    #[test]
    fn test_custom_predicate() {
        let grid = Grid::new(5);
        // Nothing is passable
        let path = find_path_with(&grid, Position::new(0, 0), Position::new(2, 2), |_| false);
        assert!(path.is_empty());
    }
}
