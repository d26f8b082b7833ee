//! Static item and enemy tables keyed by kind.

use serde::{Deserialize, Serialize};

use crate::CombatStats;

/// Every item that can appear on a dungeon floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Restores a fixed amount of health.
    HealthPotion,
    /// Weakest weapon, available from the first floor.
    #[serde(rename = "weapon_rusty_sword")]
    RustySword,
    /// Mid-tier weapon.
    #[serde(rename = "weapon_iron_sword")]
    IronSword,
    /// Strongest weapon, found on deep floors only.
    #[serde(rename = "weapon_fire_blade")]
    FireBlade,
    /// Small pile of gold.
    #[serde(rename = "treasure_gold")]
    GoldCoins,
    /// Valuable gem converted to gold on pickup.
    #[serde(rename = "treasure_gem")]
    Gemstone,
}

/// What happens when an item is picked up or used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemEffect {
    /// Restores up to `amount` hit points when used.
    Heal {
        /// Hit points restored.
        amount: u32,
    },
    /// Replaces the equipped weapon bonus when stronger.
    Weapon {
        /// Attack bonus granted while equipped.
        attack: u32,
    },
    /// Adds gold immediately on pickup.
    Gold {
        /// Gold granted.
        amount: u32,
    },
}

/// Presentation and gameplay data for an [`ItemKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemDefinition {
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Effect applied by the item.
    pub effect: ItemEffect,
    /// Whether copies merge into a single inventory slot.
    pub stackable: bool,
}

impl ItemKind {
    /// All item kinds in catalog order.
    pub const ALL: [ItemKind; 6] = [
        ItemKind::HealthPotion,
        ItemKind::RustySword,
        ItemKind::IronSword,
        ItemKind::FireBlade,
        ItemKind::GoldCoins,
        ItemKind::Gemstone,
    ];

    /// Looks up the static definition for the kind.
    #[must_use]
    pub const fn definition(self) -> ItemDefinition {
        match self {
            Self::HealthPotion => ItemDefinition {
                name: "Health Potion",
                description: "Restores 30 HP",
                effect: ItemEffect::Heal { amount: 30 },
                stackable: true,
            },
            Self::RustySword => ItemDefinition {
                name: "Rusty Sword",
                description: "ATK +3",
                effect: ItemEffect::Weapon { attack: 3 },
                stackable: false,
            },
            Self::IronSword => ItemDefinition {
                name: "Iron Sword",
                description: "ATK +6",
                effect: ItemEffect::Weapon { attack: 6 },
                stackable: false,
            },
            Self::FireBlade => ItemDefinition {
                name: "Fire Blade",
                description: "ATK +10",
                effect: ItemEffect::Weapon { attack: 10 },
                stackable: false,
            },
            Self::GoldCoins => ItemDefinition {
                name: "Gold Coins",
                description: "Worth 25 gold",
                effect: ItemEffect::Gold { amount: 25 },
                stackable: false,
            },
            Self::Gemstone => ItemDefinition {
                name: "Gemstone",
                description: "Worth 100 gold",
                effect: ItemEffect::Gold { amount: 100 },
                stackable: false,
            },
        }
    }
}

/// Enemy archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Slow, weak, short-sighted.
    Slime,
    /// Fragile but hits harder than a slime.
    Bat,
    /// Durable and the only kind that plans paths.
    Skeleton,
}

/// Floor-scaled parameters for a single enemy kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyProfile {
    /// Kind the profile describes.
    pub kind: EnemyKind,
    /// Display name.
    pub name: &'static str,
    /// Starting combat stats at full health.
    pub stats: CombatStats,
    /// Manhattan distance within which the enemy notices the player.
    pub detection_range: u32,
    /// Experience granted to the player on kill.
    pub xp_reward: u32,
    /// Whether the enemy pursues with A* instead of greedy axis steps.
    pub uses_pathfinding: bool,
}

const SHALLOW_KINDS: [EnemyKind; 2] = [EnemyKind::Slime, EnemyKind::Bat];
const ALL_KINDS: [EnemyKind; 3] = [EnemyKind::Slime, EnemyKind::Bat, EnemyKind::Skeleton];
const SKELETON_FLOOR: u32 = 3;

impl EnemyKind {
    /// Kinds that may spawn on the provided floor.
    #[must_use]
    pub fn eligible_for_floor(floor: u32) -> &'static [EnemyKind] {
        if floor < SKELETON_FLOOR {
            &SHALLOW_KINDS
        } else {
            &ALL_KINDS
        }
    }

    /// Builds the profile for this kind on the provided floor.
    #[must_use]
    pub fn profile(self, floor: u32) -> EnemyProfile {
        match self {
            Self::Slime => EnemyProfile {
                kind: self,
                name: "Slime",
                stats: CombatStats::new(15 + floor * 3, 3 + floor, 0),
                detection_range: 4,
                xp_reward: 10 + floor * 2,
                uses_pathfinding: false,
            },
            Self::Bat => EnemyProfile {
                kind: self,
                name: "Bat",
                stats: CombatStats::new(10 + floor * 2, 5 + floor, 1),
                detection_range: 6,
                xp_reward: 15 + floor * 3,
                uses_pathfinding: false,
            },
            Self::Skeleton => EnemyProfile {
                kind: self,
                name: "Skeleton",
                stats: CombatStats::new(25 + floor * 5, 7 + floor * 2, 2 + floor / 2),
                detection_range: 8,
                xp_reward: 25 + floor * 5,
                uses_pathfinding: true,
            },
        }
    }
}
