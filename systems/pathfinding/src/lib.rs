#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Budgeted A* search over the four-connected floor cells of a grid.

use std::{cmp::Ordering, collections::BinaryHeap};

use delve_core::{CellCoord, Direction, TileGrid};
use tracing::trace;

/// Expansion budget used when callers have no tighter bound.
pub const DEFAULT_MAX_STEPS: u32 = 200;

/// Finds a shortest route from `start` to `goal`.
///
/// The returned cells exclude `start` and end with `goal`. An empty route is
/// returned when both cells coincide. `None` is returned when either cell
/// lies outside the grid, when the goal is not floor, when no route exists,
/// or when `max_steps` node expansions pass without reaching the goal.
///
/// The start cell itself does not need to be floor, so an entity standing on
/// an unusual tile can still leave it.
#[must_use]
pub fn find_path(
    grid: &TileGrid,
    start: CellCoord,
    goal: CellCoord,
    max_steps: u32,
) -> Option<Vec<CellCoord>> {
    if start == goal {
        return Some(Vec::new());
    }

    let start_index = grid.index(start)?;
    if grid.index(goal).is_none() || !grid.can_move_to(goal) {
        return None;
    }

    let cell_count = usize::try_from(u64::from(grid.width()) * u64::from(grid.height())).ok()?;
    let mut cost = vec![u32::MAX; cell_count];
    let mut parent: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();
    let mut sequence = 0_u64;

    cost[start_index] = 0;
    open.push(OpenNode {
        f: start.manhattan_distance(goal),
        h: start.manhattan_distance(goal),
        sequence,
        cell: start,
    });

    let mut expansions = 0_u32;
    while expansions < max_steps {
        let Some(node) = open.pop() else {
            break;
        };
        let Some(current_index) = grid.index(node.cell) else {
            continue;
        };
        if closed[current_index] {
            continue;
        }
        expansions += 1;

        if node.cell == goal {
            return Some(reconstruct(grid, &parent, start_index, current_index));
        }

        closed[current_index] = true;
        let next_cost = cost[current_index] + 1;

        for direction in Direction::ALL {
            let Some(neighbor) = node.cell.step(direction) else {
                continue;
            };
            if !grid.can_move_to(neighbor) {
                continue;
            }
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if closed[neighbor_index] || cost[neighbor_index] <= next_cost {
                continue;
            }

            cost[neighbor_index] = next_cost;
            parent[neighbor_index] = Some(current_index);
            sequence += 1;
            let h = neighbor.manhattan_distance(goal);
            open.push(OpenNode {
                f: next_cost + h,
                h,
                sequence,
                cell: neighbor,
            });
        }
    }

    trace!(
        start_column = start.column(),
        start_row = start.row(),
        goal_column = goal.column(),
        goal_row = goal.row(),
        expansions,
        "no path within budget"
    );
    None
}

fn reconstruct(
    grid: &TileGrid,
    parent: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Vec<CellCoord> {
    let mut path = Vec::new();
    let mut current = goal_index;
    while current != start_index {
        let Some(cell) = grid.cell_at(current) else {
            break;
        };
        path.push(cell);
        match parent[current] {
            Some(previous) => current = previous,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Frontier entry ordered so the heap pops the lowest `f`, then the lowest
/// `h`, then the earliest insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    h: u32,
    sequence: u64,
    cell: CellCoord,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> TileGrid {
        TileGrid::from_ascii(
            "#####
             #...#
             #...#
             #...#
             #####",
        )
    }

    fn cell(column: u32, row: u32) -> CellCoord {
        CellCoord::new(column, row)
    }

    fn assert_contiguous(start: CellCoord, path: &[CellCoord]) {
        let mut previous = start;
        for step in path {
            assert_eq!(previous.manhattan_distance(*step), 1, "{previous:?} -> {step:?}");
            previous = *step;
        }
    }

    #[test]
    fn straight_corridor_yields_direct_route() {
        let path = find_path(&open_room(), cell(1, 1), cell(3, 1), DEFAULT_MAX_STEPS);
        assert_eq!(path, Some(vec![cell(2, 1), cell(3, 1)]));
    }

    #[test]
    fn open_room_route_matches_manhattan_distance() {
        let grid = open_room();
        let path = find_path(&grid, cell(1, 1), cell(3, 3), DEFAULT_MAX_STEPS).expect("path");
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&cell(3, 3)));
        assert_contiguous(cell(1, 1), &path);
        assert!(path.iter().all(|step| grid.can_move_to(*step)));
    }

    #[test]
    fn same_start_and_goal_is_empty_route() {
        assert_eq!(
            find_path(&open_room(), cell(1, 1), cell(1, 1), DEFAULT_MAX_STEPS),
            Some(Vec::new())
        );
    }

    #[test]
    fn separated_cells_have_no_route() {
        let grid = TileGrid::from_ascii(
            "#####
             #.#.#
             #.#.#
             #.#.#
             #####",
        );
        assert_eq!(find_path(&grid, cell(1, 1), cell(3, 1), DEFAULT_MAX_STEPS), None);
    }

    #[test]
    fn unreachable_goals_are_rejected() {
        let grid = open_room();
        assert_eq!(find_path(&grid, cell(1, 1), cell(10, 10), DEFAULT_MAX_STEPS), None);
        assert_eq!(find_path(&grid, cell(1, 1), cell(0, 0), DEFAULT_MAX_STEPS), None);
        assert_eq!(find_path(&grid, cell(9, 9), cell(2, 2), DEFAULT_MAX_STEPS), None);
    }

    #[test]
    fn routes_around_obstacles() {
        let grid = TileGrid::from_ascii(
            "#######
             #..#..#
             #..#..#
             #.....#
             #..#..#
             #..#..#
             #######",
        );
        let path = find_path(&grid, cell(1, 1), cell(5, 1), DEFAULT_MAX_STEPS).expect("path");
        assert!(path.iter().any(|step| step.row() == 3));
        assert_eq!(path.len(), 8);
        assert_contiguous(cell(1, 1), &path);
    }

    #[test]
    fn exhausted_budget_returns_none() {
        let grid = TileGrid::from_ascii(
            "############
             #..........#
             ############",
        );
        assert_eq!(find_path(&grid, cell(1, 1), cell(10, 1), 3), None);
        assert!(find_path(&grid, cell(1, 1), cell(10, 1), 10).is_some());
    }
}
