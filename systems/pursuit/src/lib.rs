#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy reaction planner.
//!
//! Given an enemy and the player's position, the planner decides whether the
//! enemy holds still, attacks, or takes one step closer. The caller owns all
//! state and applies the returned [`Intent`].

use delve_core::{CellCoord, TileGrid};
use delve_system_pathfinding::find_path;
use tracing::trace;

/// Expansion budget used by enemies that plan paths.
pub const ENEMY_PATH_BUDGET: u32 = 50;

/// Movement traits of the enemy deciding its reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pursuer {
    /// Cell the enemy stands on.
    pub cell: CellCoord,
    /// Manhattan distance within which the player is noticed.
    pub detection_range: u32,
    /// Whether the enemy plans with A* rather than stepping greedily.
    pub uses_pathfinding: bool,
}

/// Reaction chosen for a single enemy turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Stay in place.
    Hold,
    /// Attack the adjacent player.
    Attack,
    /// Move to the neighbouring cell.
    Step(CellCoord),
}

/// Decides how `pursuer` reacts to the player standing on `target`.
///
/// Enemies beyond their detection range hold. Adjacent enemies attack.
/// Otherwise pathfinding enemies take the first step of an A* route limited
/// to `path_budget` expansions and fall back to greedy stepping when no route
/// is found; greedy enemies try the horizontal axis first, then the vertical
/// one. A step onto the player or onto a cell reported by `is_occupied` turns
/// into [`Intent::Hold`].
pub fn decide<F>(
    grid: &TileGrid,
    pursuer: &Pursuer,
    target: CellCoord,
    path_budget: u32,
    is_occupied: F,
) -> Intent
where
    F: Fn(CellCoord) -> bool,
{
    let distance = pursuer.cell.manhattan_distance(target);
    if distance > pursuer.detection_range {
        return Intent::Hold;
    }

    if distance == 1 {
        return Intent::Attack;
    }

    let planned = if pursuer.uses_pathfinding {
        find_path(grid, pursuer.cell, target, path_budget)
            .and_then(|path| path.first().copied())
            .or_else(|| greedy_step(grid, pursuer.cell, target))
    } else {
        greedy_step(grid, pursuer.cell, target)
    };

    match planned {
        Some(next) if next != target && next != pursuer.cell && !is_occupied(next) => {
            Intent::Step(next)
        }
        Some(next) => {
            trace!(
                column = next.column(),
                row = next.row(),
                "pursuit step blocked"
            );
            Intent::Hold
        }
        None => Intent::Hold,
    }
}

/// Single greedy step toward `target`, horizontal axis first.
#[must_use]
pub fn greedy_step(grid: &TileGrid, from: CellCoord, target: CellCoord) -> Option<CellCoord> {
    let dx = axis_sign(from.column(), target.column());
    let dy = axis_sign(from.row(), target.row());

    if dx != 0 {
        if let Some(next) = from.offset(dx, 0).filter(|cell| grid.can_move_to(*cell)) {
            return Some(next);
        }
    }

    if dy != 0 {
        if let Some(next) = from.offset(0, dy).filter(|cell| grid.can_move_to(*cell)) {
            return Some(next);
        }
    }

    None
}

fn axis_sign(from: u32, to: u32) -> i32 {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}
