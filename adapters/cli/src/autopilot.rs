//! Headless policy that walks the player toward the stairs.

use delve_core::{CellCoord, Command, Direction, ItemEffect};
use delve_system_pathfinding::find_path;
use delve_world::{query, World};

/// Expansion budget for the player's route to the stairs.
///
/// Large enough to cross the biggest floor the default scaling produces.
const ROUTE_BUDGET: u32 = 10_000;

/// Percentage of maximum hit points below which a potion is drunk.
const HEAL_THRESHOLD_PERCENT: u32 = 40;

/// Chooses the next command, or `None` once the run is over.
///
/// Priorities: drink a healing item when low, fight an adjacent enemy, then
/// follow the shortest route to the stairs. Enemies standing on the route are
/// bumped, which attacks them.
pub(crate) fn next_command(world: &World) -> Option<Command> {
    if query::is_game_over(world) {
        return None;
    }

    let player = query::player(world);
    let stats = player.stats();
    if stats.hp * 100 < stats.max_hp * HEAL_THRESHOLD_PERCENT {
        let potion = player
            .inventory()
            .items()
            .iter()
            .position(|item| matches!(item.kind.definition().effect, ItemEffect::Heal { .. }));
        if let Some(slot) = potion {
            return Some(Command::UseItem { slot });
        }
    }

    let cell = player.cell();
    if let Some(direction) = adjacent_enemy(world, cell) {
        return Some(Command::Move { direction });
    }

    let grid = query::layout(world).grid();
    let route = query::layout(world)
        .stairs_down()
        .and_then(|stairs| find_path(grid, cell, stairs, ROUTE_BUDGET));
    let direction = route
        .as_deref()
        .and_then(<[CellCoord]>::first)
        .and_then(|&next| Direction::between(cell, next))
        .or_else(|| {
            Direction::ALL.into_iter().find(|&direction| {
                cell.step(direction)
                    .is_some_and(|neighbour| grid.can_move_to(neighbour))
            })
        })?;

    Some(Command::Move { direction })
}

fn adjacent_enemy(world: &World, cell: CellCoord) -> Option<Direction> {
    Direction::ALL.into_iter().find(|&direction| {
        cell.step(direction)
            .is_some_and(|neighbour| query::enemy_at(world, neighbour).is_some())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_world::{apply, GameConfig};

    fn fresh_world(seed: u64) -> World {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        let mut events = Vec::new();
        World::new(&config, &mut events).expect("default config is valid")
    }

    #[test]
    fn first_move_follows_the_route_to_the_stairs() {
        let world = fresh_world(5);
        let layout = query::layout(&world);
        let start = query::player(&world).cell();
        let stairs = layout.stairs_down().expect("floor has rooms");
        let route = find_path(layout.grid(), start, stairs, ROUTE_BUDGET).expect("connected");

        if query::enemies(&world)
            .iter()
            .any(|enemy| enemy.cell().manhattan_distance(start) == 1)
        {
            return;
        }

        let expected = if route.is_empty() {
            None
        } else {
            Direction::between(start, route[0])
        };
        match (next_command(&world), expected) {
            (Some(Command::Move { direction }), Some(expected)) => {
                assert_eq!(direction, expected);
            }
            (Some(Command::Move { .. }), None) => {}
            (other, _) => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn autopilot_stops_when_the_run_is_over() {
        let mut world = fresh_world(9);
        let mut events = Vec::new();
        for _ in 0..5_000 {
            let Some(command) = next_command(&world) else {
                break;
            };
            apply(&mut world, command, &mut events);
            if query::floor(&world) >= 3 {
                break;
            }
        }

        if query::is_game_over(&world) {
            assert!(next_command(&world).is_none());
        } else {
            assert!(query::floor(&world) >= 2);
        }
    }
}
