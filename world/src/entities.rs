//! Player, enemy and floor-item state owned by the world.

use delve_core::{CellCoord, CombatStats, EnemyId, EnemyKind, ItemKind, RunSummary};
use delve_system_combat::Progression;
use delve_system_inventory::Inventory;

const PLAYER_MAX_HP: u32 = 100;
const PLAYER_ATTACK: u32 = 10;
const PLAYER_DEFENSE: u32 = 3;

/// The player character.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) stats: CombatStats,
    pub(crate) progression: Progression,
    pub(crate) gold: u32,
    pub(crate) kills: u32,
    pub(crate) inventory: Inventory,
    pub(crate) weapon: Option<ItemKind>,
}

impl Player {
    pub(crate) fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            stats: CombatStats::new(PLAYER_MAX_HP, PLAYER_ATTACK, PLAYER_DEFENSE),
            progression: Progression::default(),
            gold: 0,
            kills: 0,
            inventory: Inventory::default(),
            weapon: None,
        }
    }

    /// Cell the player stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current combat stats, including the equipped weapon bonus.
    #[must_use]
    pub const fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Level and experience counters.
    #[must_use]
    pub const fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Gold carried.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.gold
    }

    /// Enemies defeated during the run.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Carried items.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Equipped weapon, if any.
    #[must_use]
    pub const fn weapon(&self) -> Option<ItemKind> {
        self.weapon
    }

    pub(crate) fn summary(&self, floor: u32) -> RunSummary {
        RunSummary {
            floor,
            kills: self.kills,
            gold: self.gold,
            level: self.progression.level(),
        }
    }
}

/// A living enemy on the current floor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) name: &'static str,
    pub(crate) cell: CellCoord,
    pub(crate) stats: CombatStats,
    pub(crate) detection_range: u32,
    pub(crate) xp_reward: u32,
    pub(crate) uses_pathfinding: bool,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, floor: u32, cell: CellCoord) -> Self {
        let profile = kind.profile(floor);
        Self {
            id,
            kind,
            name: profile.name,
            cell,
            stats: profile.stats,
            detection_range: profile.detection_range,
            xp_reward: profile.xp_reward,
            uses_pathfinding: profile.uses_pathfinding,
        }
    }

    /// Identifier unique within the run.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Archetype.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Cell the enemy stands on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Current combat stats.
    #[must_use]
    pub const fn stats(&self) -> &CombatStats {
        &self.stats
    }
}

/// Item lying on the floor waiting to be picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FloorItem {
    /// Kind of the item.
    pub kind: ItemKind,
    /// Cell the item lies on.
    pub cell: CellCoord,
}
