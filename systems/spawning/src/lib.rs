#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic population of a freshly generated floor.
//!
//! The first room is left empty for the player. Every room between the first
//! and the last receives enemies; every room after the first may receive loot.

use delve_core::{CellCoord, DungeonLayout, EnemyKind, ItemKind, RandomSource, Room};
use delve_system_loot::LootTable;
use tracing::debug;

/// Per-room spawn limits for a floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnDensity {
    /// Upper bound of the enemy count rolled per room.
    pub max_enemies_per_room: u32,
    /// Upper bound of the loot rolls per item room.
    pub max_items_per_room: u32,
    /// Probability that a room receives any loot rolls.
    pub item_room_chance: f64,
}

/// Enemy to place on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemySpawn {
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Cell the enemy starts on.
    pub cell: CellCoord,
}

/// Item to place on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemSpawn {
    /// Kind of the item.
    pub kind: ItemKind,
    /// Cell the item lies on.
    pub cell: CellCoord,
}

/// Everything spawned onto a floor, in spawn order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Population {
    /// Enemies in room order.
    pub enemies: Vec<EnemySpawn>,
    /// Items in room order.
    pub items: Vec<ItemSpawn>,
}

/// Rolls the enemies and items for `layout`.
///
/// Enemies are placed first. For each room strictly between the first and the
/// last, `random_int(1, max_enemies_per_room)` candidates are rolled, each at
/// a random interior tile with a kind picked from those eligible on `floor`.
/// Candidates landing on a wall or on another enemy are dropped. Items follow:
/// every room after the first receives `random_int(0, max_items_per_room)`
/// loot rolls with probability `item_room_chance`.
pub fn populate<R: RandomSource>(
    layout: &DungeonLayout,
    floor: u32,
    density: &SpawnDensity,
    loot: &LootTable,
    rng: &mut R,
) -> Population {
    let mut population = Population::default();
    let rooms = layout.rooms();
    let eligible = EnemyKind::eligible_for_floor(floor);

    for room in enemy_rooms(rooms) {
        let count = rng.random_int(1, density.max_enemies_per_room.max(1));
        for _ in 0..count {
            let cell = room.random_interior_tile(rng);
            let Some(kind) = rng.pick(eligible).copied() else {
                continue;
            };
            if !layout.grid().can_move_to(cell)
                || population.enemies.iter().any(|enemy| enemy.cell == cell)
            {
                continue;
            }

            population.enemies.push(EnemySpawn { kind, cell });
        }
    }

    for room in rooms.iter().skip(1) {
        if !rng.chance(density.item_room_chance) {
            continue;
        }

        let count = rng.random_int(0, density.max_items_per_room);
        for _ in 0..count {
            let cell = room.random_interior_tile(rng);
            if !layout.grid().can_move_to(cell) {
                continue;
            }

            if let Some(kind) = loot.roll(floor, rng) {
                population.items.push(ItemSpawn { kind, cell });
            }
        }
    }

    debug!(
        floor,
        enemies = population.enemies.len(),
        items = population.items.len(),
        "populated floor"
    );
    population
}

fn enemy_rooms(rooms: &[Room]) -> &[Room] {
    if rooms.len() < 3 {
        return &[];
    }

    &rooms[1..rooms.len() - 1]
}
