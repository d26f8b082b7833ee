//! Run configuration loaded from TOML.

use delve_system_dungeon_generation::{DungeonParams, ParamsError};
use delve_system_loot::LootTable;
use delve_system_pursuit::ENEMY_PATH_BUDGET;
use delve_system_spawning::SpawnDensity;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SEED: u64 = 0x0de1_7e5e_ed00_0001;
const DEFAULT_FOV_RADIUS: u32 = 8;
const BORDER_CELLS: u32 = 2;

/// Tunables for a complete run.
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Seed for the run's random stream.
    pub seed: u64,
    /// Field-of-view radius in half-cell ray steps.
    pub fov_radius: u32,
    /// Node expansions allowed for enemy pathfinding.
    pub enemy_path_budget: u32,
    /// How floor shape and density grow with depth.
    pub scaling: FloorScaling,
    /// Replacement for the default loot table.
    pub loot: Option<LootTable>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            fov_radius: DEFAULT_FOV_RADIUS,
            enemy_path_budget: ENEMY_PATH_BUDGET,
            scaling: FloorScaling::default(),
            loot: None,
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every floor can be generated and populated.
    ///
    /// Floors only grow with depth while room sizes stay fixed, so checking
    /// the first floor covers the whole run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scaling = &self.scaling;
        if !(0.0..=1.0).contains(&scaling.item_room_chance) {
            return Err(ConfigError::ItemRoomChance {
                value: scaling.item_room_chance,
            });
        }

        let first = scaling.params_for(1);
        first
            .dungeon
            .validate()
            .map_err(|source| ConfigError::Dungeon { floor: 1, source })?;

        let fits = scaling.room_max_size + BORDER_CELLS;
        if first.dungeon.width < fits || first.dungeon.height < fits {
            return Err(ConfigError::RoomTooLarge {
                size: scaling.room_max_size,
                width: first.dungeon.width,
                height: first.dungeon.height,
            });
        }

        Ok(())
    }

    /// Loot table in effect for the run.
    #[must_use]
    pub fn loot_table(&self) -> LootTable {
        self.loot.clone().unwrap_or_default()
    }
}

/// Growth curve of floor dimensions and population with depth.
///
/// Each dimension is `base + min(per_floor * floor, cap)`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloorScaling {
    /// Width before depth scaling.
    pub base_width: u32,
    /// Width added per floor.
    pub width_per_floor: u32,
    /// Cap on the width added by depth.
    pub max_extra_width: u32,
    /// Height before depth scaling.
    pub base_height: u32,
    /// Height added per floor.
    pub height_per_floor: u32,
    /// Cap on the height added by depth.
    pub max_extra_height: u32,
    /// Smallest room edge.
    pub room_min_size: u32,
    /// Largest room edge.
    pub room_max_size: u32,
    /// Room budget before depth scaling.
    pub base_rooms: u32,
    /// Rooms added per floor.
    pub rooms_per_floor: u32,
    /// Cap on the rooms added by depth.
    pub max_extra_rooms: u32,
    /// Enemy cap per room before depth scaling.
    pub base_enemies_per_room: u32,
    /// Floors needed to add one more enemy per room.
    pub floors_per_extra_enemy: u32,
    /// Item cap per room on the first floors.
    pub base_items_per_room: u32,
    /// Floors needed to remove one item per room.
    pub floors_per_fewer_item: u32,
    /// Lowest item cap per room.
    pub min_items_per_room: u32,
    /// Probability that a room receives loot.
    pub item_room_chance: f64,
}

impl Default for FloorScaling {
    fn default() -> Self {
        Self {
            base_width: 50,
            width_per_floor: 3,
            max_extra_width: 30,
            base_height: 40,
            height_per_floor: 2,
            max_extra_height: 20,
            room_min_size: 5,
            room_max_size: 12,
            base_rooms: 8,
            rooms_per_floor: 2,
            max_extra_rooms: 12,
            base_enemies_per_room: 1,
            floors_per_extra_enemy: 2,
            base_items_per_room: 3,
            floors_per_fewer_item: 3,
            min_items_per_room: 1,
            item_room_chance: 0.6,
        }
    }
}

/// Generator and spawner inputs for a single floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorParams {
    /// Layout parameters.
    pub dungeon: DungeonParams,
    /// Population limits.
    pub density: SpawnDensity,
}

impl FloorScaling {
    /// Parameters for the one-based `floor`.
    #[must_use]
    pub fn params_for(&self, floor: u32) -> FloorParams {
        let grow = |per_floor: u32, cap: u32| per_floor.saturating_mul(floor).min(cap);
        let per = |divisor: u32| floor.checked_div(divisor).unwrap_or(0);

        FloorParams {
            dungeon: DungeonParams {
                width: self.base_width + grow(self.width_per_floor, self.max_extra_width),
                height: self.base_height + grow(self.height_per_floor, self.max_extra_height),
                room_min_size: self.room_min_size,
                room_max_size: self.room_max_size,
                max_rooms: self.base_rooms + grow(self.rooms_per_floor, self.max_extra_rooms),
            },
            density: SpawnDensity {
                max_enemies_per_room: self.base_enemies_per_room
                    + per(self.floors_per_extra_enemy),
                max_items_per_room: self
                    .base_items_per_room
                    .saturating_sub(per(self.floors_per_fewer_item))
                    .max(self.min_items_per_room),
                item_room_chance: self.item_room_chance,
            },
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
    /// A floor's layout parameters cannot produce rooms.
    #[error("floor {floor} has unusable dungeon parameters")]
    Dungeon {
        /// Floor whose parameters failed.
        floor: u32,
        /// Underlying parameter error.
        #[source]
        source: ParamsError,
    },
    /// The largest room does not fit inside the first floor.
    #[error("rooms up to {size} cells do not fit a {width}x{height} floor")]
    RoomTooLarge {
        /// Configured largest room edge.
        size: u32,
        /// First-floor width.
        width: u32,
        /// First-floor height.
        height: u32,
    },
    /// The item room chance is not a probability.
    #[error("item_room_chance {value} is outside [0, 1]")]
    ItemRoomChance {
        /// Rejected value.
        value: f64,
    },
}
