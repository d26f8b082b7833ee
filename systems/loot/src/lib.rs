#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted loot selection gated by floor depth.

use delve_core::{ItemKind, RandomSource};
use serde::Deserialize;
use thiserror::Error;
use tracing::trace;

/// One weighted row of a loot table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct LootEntry {
    /// Item produced when the row is selected.
    pub kind: ItemKind,
    /// Relative selection weight, strictly positive.
    pub weight: f64,
    /// Shallowest floor on which the row is eligible.
    pub min_floor: u32,
}

impl LootEntry {
    /// Creates a new table row.
    #[must_use]
    pub const fn new(kind: ItemKind, weight: f64, min_floor: u32) -> Self {
        Self {
            kind,
            weight,
            min_floor,
        }
    }
}

/// Errors raised while assembling a loot table.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum LootTableError {
    /// The table holds no rows.
    #[error("loot table must contain at least one entry")]
    Empty,
    /// A row carries a weight that is zero, negative or not finite.
    #[error("loot entry {kind:?} has invalid weight {weight}")]
    InvalidWeight {
        /// Kind of the offending row.
        kind: ItemKind,
        /// Rejected weight.
        weight: f64,
    },
}

const DEFAULT_ENTRIES: [LootEntry; 6] = [
    LootEntry::new(ItemKind::HealthPotion, 40.0, 1),
    LootEntry::new(ItemKind::RustySword, 20.0, 1),
    LootEntry::new(ItemKind::IronSword, 10.0, 3),
    LootEntry::new(ItemKind::FireBlade, 5.0, 5),
    LootEntry::new(ItemKind::GoldCoins, 30.0, 1),
    LootEntry::new(ItemKind::Gemstone, 10.0, 2),
];

/// Validated, ordered loot table.
///
/// Deserializes from a list of entries so configuration files can override
/// the default drops.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Vec<LootEntry>")]
pub struct LootTable {
    entries: Vec<LootEntry>,
}

impl LootTable {
    /// Builds a table after checking every weight.
    pub fn new(entries: Vec<LootEntry>) -> Result<Self, LootTableError> {
        if entries.is_empty() {
            return Err(LootTableError::Empty);
        }

        if let Some(entry) = entries
            .iter()
            .find(|entry| !entry.weight.is_finite() || entry.weight <= 0.0)
        {
            return Err(LootTableError::InvalidWeight {
                kind: entry.kind,
                weight: entry.weight,
            });
        }

        Ok(Self { entries })
    }

    /// Rows in table order.
    #[must_use]
    pub fn entries(&self) -> &[LootEntry] {
        &self.entries
    }

    /// Rolls a drop for `floor`, consuming one value when any row is eligible.
    pub fn roll<R: RandomSource>(&self, floor: u32, rng: &mut R) -> Option<ItemKind> {
        roll_loot(floor, &self.entries, rng)
    }
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES.to_vec(),
        }
    }
}

impl TryFrom<Vec<LootEntry>> for LootTable {
    type Error = LootTableError;

    fn try_from(entries: Vec<LootEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

/// Selects an item kind from the rows eligible on `floor`.
///
/// Returns `None` only when no row is eligible. Otherwise the draw is scaled
/// by the total weight and walked down the eligible rows in order; residue
/// left by floating-point rounding falls back to the last eligible row.
pub fn roll_loot<R: RandomSource>(
    floor: u32,
    entries: &[LootEntry],
    rng: &mut R,
) -> Option<ItemKind> {
    let mut eligible = entries.iter().filter(|entry| entry.min_floor <= floor);
    let last = eligible.clone().last()?;
    let total: f64 = eligible.clone().map(|entry| entry.weight).sum();

    let mut roll = rng.next_f64() * total;
    let picked = eligible
        .find(|entry| {
            roll -= entry.weight;
            roll <= 0.0
        })
        .unwrap_or(last);

    trace!(floor, kind = ?picked.kind, "rolled loot");
    Some(picked.kind)
}
