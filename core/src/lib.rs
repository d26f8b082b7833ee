#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve simulation.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems, and any presentation adapter. Adapters submit
//! [`Command`] values describing the player's intent, the world resolves the
//! whole turn through its `apply` entry point, and then reports [`Event`]
//! values that a presentation layer renders. Systems never touch sprites,
//! audio or input; they consume a [`TileGrid`] and produce plain values.

mod catalog;
mod random;

use serde::{Deserialize, Serialize};

pub use catalog::{EnemyKind, EnemyProfile, ItemDefinition, ItemEffect, ItemKind};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};

/// Maximum number of slots a player inventory holds.
pub const MAX_INVENTORY_SIZE: usize = 10;

/// Commands that express every action a player may request during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Step one cell in a direction, attacking when an enemy blocks the way.
    Move {
        /// Direction of travel.
        direction: Direction,
    },
    /// Uses the inventory item stored at the provided slot index.
    UseItem {
        /// Zero-based inventory slot.
        slot: usize,
    },
}

/// Events reported by the world after resolving a command.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Human-readable log line for the message panel.
    Message {
        /// Text to display.
        text: String,
    },
    /// A new floor was generated and entered.
    FloorEntered {
        /// One-based floor number.
        floor: u32,
        /// Width of the floor grid in cells.
        width: u32,
        /// Height of the floor grid in cells.
        height: u32,
    },
    /// An attack was resolved and its damage applied.
    AttackResolved {
        /// Entity that attacked.
        attacker: Combatant,
        /// Entity that was struck.
        defender: Combatant,
        /// Outcome of the attack.
        result: AttackResult,
    },
    /// An enemy's hit points reached zero.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Kind of the defeated enemy.
        kind: EnemyKind,
        /// Cell the enemy occupied.
        cell: CellCoord,
    },
    /// An item was dropped onto the floor by a defeated enemy.
    LootDropped {
        /// Kind of the dropped item.
        kind: ItemKind,
        /// Cell the item lies on.
        cell: CellCoord,
    },
    /// The player reached a new experience level.
    LevelUp {
        /// Level after the increase.
        level: u32,
    },
    /// The player's hit points are reported after a turn.
    HpChanged {
        /// Current hit points.
        hp: u32,
        /// Maximum hit points.
        max_hp: u32,
    },
    /// The player's progression counters are reported after a turn.
    StatsChanged {
        /// Current experience level.
        level: u32,
        /// Gold carried.
        gold: u32,
    },
    /// The inventory contents after a turn.
    InventoryChanged {
        /// Slots in inventory order.
        items: Vec<InventoryItem>,
    },
    /// Visibility was recomputed around the player.
    VisibilityRefreshed {
        /// Cell the field of view was cast from.
        origin: CellCoord,
    },
    /// The player died; no further commands are accepted.
    PlayerDied {
        /// Totals for the finished run.
        summary: RunSummary,
    },
}

/// Participant in an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combatant {
    /// The player character.
    Player,
    /// An enemy identified by id.
    Enemy(EnemyId),
}

/// Totals reported when a run ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RunSummary {
    /// Deepest floor reached.
    pub floor: u32,
    /// Enemies defeated.
    pub kills: u32,
    /// Gold collected.
    pub gold: u32,
    /// Final experience level.
    pub level: u32,
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in north, south, west, east order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Converts a unit move delta into a direction.
    ///
    /// Only the four axis-aligned unit deltas are accepted; diagonal and zero
    /// deltas yield `None`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }

    /// Column and row delta described by the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Direction that leads from `from` to an adjacent `to`, if they touch.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let dx = i64::from(to.column()) - i64::from(from.column());
        let dy = i64::from(to.row()) - i64::from(from.row());
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an enemy within a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an inventory item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are unsigned, so a cell left of or above the grid cannot be
/// expressed; offsets that would leave the first quadrant yield `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell displaced by the provided deltas, if it remains non-negative.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(CellCoord::new(column, row))
    }

    /// Adjacent cell in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    /// Walkable cell.
    Floor,
    /// Blocking cell that also stops sight.
    Wall,
}

/// Dense row-major grid of tiles describing a single floor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid of the provided dimensions with every cell set to `tile`.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![tile; capacity],
        }
    }

    /// Builds a grid from rows of tiles. Rows shorter than the first are
    /// padded with walls, longer rows are truncated.
    #[must_use]
    pub fn from_rows(rows: &[Vec<Tile>]) -> Self {
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let width = rows
            .first()
            .map_or(0, |row| u32::try_from(row.len()).unwrap_or(u32::MAX));
        let mut grid = Self::filled(width, height, Tile::Wall);
        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, tile) in row.iter().enumerate() {
                let (Ok(column), Ok(row)) =
                    (u32::try_from(column_index), u32::try_from(row_index))
                else {
                    continue;
                };
                let _ = grid.set(CellCoord::new(column, row), *tile);
            }
        }
        grid
    }

    /// Parses a grid from text where `#` marks walls and anything else floors.
    #[must_use]
    pub fn from_ascii(text: &str) -> Self {
        let rows: Vec<Vec<Tile>> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|symbol| if symbol == '#' { Tile::Wall } else { Tile::Floor })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Tile stored at the cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether an entity may step onto the cell.
    ///
    /// Out-of-bounds cells are never walkable.
    #[must_use]
    pub fn can_move_to(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(Tile::Floor)
    }

    /// Overwrites the tile at the cell. Returns `false` when out of bounds.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) -> bool {
        match self.index(cell).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    /// Iterator over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.width).unwrap_or(0).max(1);
        self.tiles.chunks(width)
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.tiles.len() || self.width == 0 {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// Axis-aligned rectangular room expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    origin: CellCoord,
    size: RoomSize,
}

impl Room {
    /// Constructs a room from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: RoomSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the room.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the room measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> RoomSize {
        self.size
    }

    /// Rightmost column covered by the room.
    #[must_use]
    pub const fn right(&self) -> u32 {
        (self.origin.column() + self.size.width()).saturating_sub(1)
    }

    /// Bottom row covered by the room.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        (self.origin.row() + self.size.height()).saturating_sub(1)
    }

    /// Centre cell: origin plus half the size, rounded down.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(
            self.origin.column() + self.size.width() / 2,
            self.origin.row() + self.size.height() / 2,
        )
    }

    /// Reports whether the rooms overlap once `self` is grown by `padding`.
    #[must_use]
    pub fn intersects(&self, other: &Room, padding: u32) -> bool {
        let left = i64::from(self.origin.column());
        let top = i64::from(self.origin.row());
        let width = i64::from(self.size.width());
        let height = i64::from(self.size.height());
        let other_left = i64::from(other.origin.column());
        let other_top = i64::from(other.origin.row());
        let other_width = i64::from(other.size.width());
        let other_height = i64::from(other.size.height());
        let padding = i64::from(padding);

        left - padding < other_left + other_width
            && left + width + padding > other_left
            && top - padding < other_top + other_height
            && top + height + padding > other_top
    }

    /// Reports whether the cell lies within the room's footprint.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.size.width() > 0
            && self.size.height() > 0
            && cell.column() >= self.origin.column()
            && cell.column() <= self.right()
            && cell.row() >= self.origin.row()
            && cell.row() <= self.bottom()
    }

    /// Picks a random cell strictly inside the room's outer ring.
    ///
    /// Rooms narrower than three cells collapse onto the cell just inside
    /// the origin.
    pub fn random_interior_tile<R: RandomSource>(&self, rng: &mut R) -> CellCoord {
        let span_x = f64::from(self.size.width().saturating_sub(2));
        let span_y = f64::from(self.size.height().saturating_sub(2));
        let column = self.origin.column() + 1 + (rng.next_f64() * span_x).floor() as u32;
        let row = self.origin.row() + 1 + (rng.next_f64() * span_y).floor() as u32;
        CellCoord::new(column, row)
    }

    /// Iterator over every cell covered by the room in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size;
        (0..size.height()).flat_map(move |dy| {
            (0..size.width()).map(move |dx| CellCoord::new(origin.column() + dx, origin.row() + dy))
        })
    }
}

/// Size of a [`Room`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomSize {
    width: u32,
    height: u32,
}

impl RoomSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the room in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the room in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Generated floor: carved grid plus the rooms in placement order.
///
/// The first room hosts the player start and the last room hosts the stairs.
/// Both are `None` when generation placed no rooms at all.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DungeonLayout {
    grid: TileGrid,
    rooms: Vec<Room>,
    player_start: Option<CellCoord>,
    stairs_down: Option<CellCoord>,
}

impl DungeonLayout {
    /// Wraps a carved grid and its rooms, deriving start and stairs cells.
    #[must_use]
    pub fn new(grid: TileGrid, rooms: Vec<Room>) -> Self {
        let player_start = rooms.first().map(Room::center);
        let stairs_down = rooms.last().map(Room::center);
        Self {
            grid,
            rooms,
            player_start,
            stairs_down,
        }
    }

    /// Carved tile grid.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Rooms in placement order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Width of the floor in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Height of the floor in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Centre of the first room.
    #[must_use]
    pub const fn player_start(&self) -> Option<CellCoord> {
        self.player_start
    }

    /// Centre of the last room.
    #[must_use]
    pub const fn stairs_down(&self) -> Option<CellCoord> {
        self.stairs_down
    }
}

/// Mutable stat block owned by a single combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    /// Current hit points, never above `max_hp`.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Raw damage dealt per hit before mitigation.
    pub attack: u32,
    /// Damage subtracted from incoming hits.
    pub defense: u32,
}

impl CombatStats {
    /// Creates a stat block at full health.
    #[must_use]
    pub const fn new(max_hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            attack,
            defense,
        }
    }

    /// Reports whether any hit points remain.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtracts damage, clamping at zero, and returns the remaining hit points.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    /// Restores hit points up to the maximum and returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }
}

/// Outcome of a single attack, returned by value and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttackResult {
    /// Damage dealt after mitigation, at least one.
    pub damage: u32,
    /// Whether the hit was a critical.
    pub is_critical: bool,
    /// Whether the hit reduced the defender to zero hit points.
    pub is_kill: bool,
    /// Defender hit points after the hit, clamped at zero.
    pub remaining_hp: u32,
}

/// Single inventory slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique identifier of the slot's item.
    pub id: ItemId,
    /// Catalog kind; stackable items merge by kind.
    pub kind: ItemKind,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Whether copies merge into this slot.
    pub stackable: bool,
    /// Number of units held, at least one.
    pub count: u32,
}

impl InventoryItem {
    /// Builds a single-unit item from the catalog definition of `kind`.
    #[must_use]
    pub fn from_kind(id: ItemId, kind: ItemKind) -> Self {
        let definition = kind.definition();
        Self {
            id,
            kind,
            name: definition.name.to_owned(),
            description: definition.description.to_owned(),
            stackable: definition.stackable,
            count: 1,
        }
    }
}
