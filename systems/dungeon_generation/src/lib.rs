#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic dungeon generator that places rooms and carves corridors.
//!
//! Rooms are sampled at random and accepted only when they keep a clear
//! margin to every room already placed. Consecutive rooms are then joined by
//! L-shaped corridors between their centres. The same parameters fed the same
//! random sequence always yield the same [`DungeonLayout`].

use delve_core::{CellCoord, DungeonLayout, RandomSource, Room, RoomSize, Tile, TileGrid};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Gap, in cells, that a candidate must keep from every accepted room.
pub const ROOM_PADDING: u32 = 2;

const ATTEMPTS_PER_ROOM: u32 = 10;
const BORDER: u32 = 1;

/// Shape parameters for a single floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DungeonParams {
    /// Number of columns in the grid.
    pub width: u32,
    /// Number of rows in the grid.
    pub height: u32,
    /// Smallest room edge, inclusive.
    pub room_min_size: u32,
    /// Largest room edge, inclusive.
    pub room_max_size: u32,
    /// Upper bound on the number of rooms placed.
    pub max_rooms: u32,
}

impl DungeonParams {
    /// Checks that the parameters can produce at least one room.
    ///
    /// Generation itself never fails; it degrades to fewer (possibly zero)
    /// rooms. Callers that need a start and stairs cell validate first.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.max_rooms == 0 {
            return Err(ParamsError::NoRooms);
        }

        if self.room_min_size == 0 {
            return Err(ParamsError::EmptyRooms);
        }

        if self.room_min_size > self.room_max_size {
            return Err(ParamsError::InvertedRoomSizes {
                min: self.room_min_size,
                max: self.room_max_size,
            });
        }

        let required = self.room_min_size + 2 * BORDER;
        if self.width < required || self.height < required {
            return Err(ParamsError::GridTooSmall {
                width: self.width,
                height: self.height,
                min: self.room_min_size,
            });
        }

        Ok(())
    }
}

/// Reasons a parameter set cannot produce a usable floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// `max_rooms` was zero.
    #[error("max_rooms must be at least 1")]
    NoRooms,
    /// `room_min_size` was zero.
    #[error("room_min_size must be at least 1")]
    EmptyRooms,
    /// The minimum room edge exceeds the maximum.
    #[error("room_min_size {min} exceeds room_max_size {max}")]
    InvertedRoomSizes {
        /// Configured minimum edge.
        min: u32,
        /// Configured maximum edge.
        max: u32,
    },
    /// Not even a minimum room fits inside the border.
    #[error("a {width}x{height} grid cannot fit a {min}x{min} room inside its border")]
    GridTooSmall {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
        /// Configured minimum edge.
        min: u32,
    },
}

/// Generates a floor layout from the parameters and random source.
///
/// Up to `max_rooms * 10` candidates are sampled. Each draws width, height,
/// column and row in that order; a candidate that overlaps an accepted room
/// under [`ROOM_PADDING`] is discarded. Afterwards one coin flip per
/// consecutive pair picks the corridor orientation.
pub fn generate<R: RandomSource>(params: &DungeonParams, rng: &mut R) -> DungeonLayout {
    let mut grid = TileGrid::filled(params.width, params.height, Tile::Wall);
    let room_budget = usize::try_from(params.max_rooms).unwrap_or(usize::MAX);
    let attempts = params.max_rooms.saturating_mul(ATTEMPTS_PER_ROOM);
    let mut rooms: Vec<Room> = Vec::with_capacity(room_budget.min(64));

    for _ in 0..attempts {
        if rooms.len() >= room_budget {
            break;
        }

        let Some(candidate) = sample_room(params, rng) else {
            continue;
        };

        if rooms
            .iter()
            .any(|existing| candidate.intersects(existing, ROOM_PADDING))
        {
            continue;
        }

        carve_room(&mut grid, &candidate);
        rooms.push(candidate);
    }

    for pair in rooms.windows(2) {
        let previous = pair[0].center();
        let current = pair[1].center();

        if rng.chance(0.5) {
            carve_horizontal(&mut grid, previous.column(), current.column(), previous.row());
            carve_vertical(&mut grid, previous.row(), current.row(), current.column());
        } else {
            carve_vertical(&mut grid, previous.row(), current.row(), previous.column());
            carve_horizontal(&mut grid, previous.column(), current.column(), current.row());
        }
    }

    debug!(
        width = params.width,
        height = params.height,
        rooms = rooms.len(),
        requested = params.max_rooms,
        "generated dungeon layout"
    );
    if rooms.len() < 2 {
        warn!(
            rooms = rooms.len(),
            "dungeon layout has no separate stairs room"
        );
    }

    DungeonLayout::new(grid, rooms)
}

fn sample_room<R: RandomSource>(params: &DungeonParams, rng: &mut R) -> Option<Room> {
    let width = rng.random_int(params.room_min_size, params.room_max_size);
    let height = rng.random_int(params.room_min_size, params.room_max_size);
    let column_draw = rng.next_f64();
    let row_draw = rng.next_f64();

    let column_span = i64::from(params.width) - i64::from(width) - 2 * i64::from(BORDER);
    let row_span = i64::from(params.height) - i64::from(height) - 2 * i64::from(BORDER);
    if column_span < 0 || row_span < 0 || width == 0 || height == 0 {
        return None;
    }

    let column = BORDER + (column_draw * column_span as f64).floor() as u32;
    let row = BORDER + (row_draw * row_span as f64).floor() as u32;

    Some(Room::from_origin_and_size(
        CellCoord::new(column, row),
        RoomSize::new(width, height),
    ))
}

fn carve_room(grid: &mut TileGrid, room: &Room) {
    for cell in room.cells() {
        let _ = grid.set(cell, Tile::Floor);
    }
}

fn carve_horizontal(grid: &mut TileGrid, from_column: u32, to_column: u32, row: u32) {
    for column in from_column.min(to_column)..=from_column.max(to_column) {
        let _ = grid.set(CellCoord::new(column, row), Tile::Floor);
    }
}

fn carve_vertical(grid: &mut TileGrid, from_row: u32, to_row: u32, column: u32) {
    for row in from_row.min(to_row)..=from_row.max(to_row) {
        let _ = grid.set(CellCoord::new(column, row), Tile::Floor);
    }
}
