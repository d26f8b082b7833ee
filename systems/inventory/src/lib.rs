#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded, ordered inventory with stacking.

use delve_core::{InventoryItem, ItemId, MAX_INVENTORY_SIZE};
use thiserror::Error;
use tracing::debug;

/// Where an added item ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Merged into an existing stack at the slot.
    Stacked {
        /// Slot that absorbed the item.
        slot: usize,
    },
    /// Appended as a new slot.
    NewSlot {
        /// Index of the new slot.
        slot: usize,
    },
}

/// Reasons an item could not be added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Every slot is taken and the item cannot stack.
    #[error("inventory is full ({capacity} slots)")]
    Full {
        /// Slot capacity of the inventory.
        capacity: usize,
    },
}

/// Ordered slots preserving insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Inventory {
    slots: Vec<InventoryItem>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(MAX_INVENTORY_SIZE)
    }
}

impl Inventory {
    /// Creates an empty inventory holding at most `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds an item.
    ///
    /// A stackable item whose kind is already held merges into that slot even
    /// when the inventory is full. Anything else needs a free slot; when none
    /// is left the inventory is unchanged.
    pub fn add_item(&mut self, item: InventoryItem) -> Result<Placement, InventoryError> {
        if item.stackable {
            if let Some((slot, existing)) = self
                .slots
                .iter_mut()
                .enumerate()
                .find(|(_, existing)| existing.kind == item.kind)
            {
                existing.count += item.count;
                return Ok(Placement::Stacked { slot });
            }
        }

        if self.is_full() {
            debug!(kind = ?item.kind, "inventory full");
            return Err(InventoryError::Full {
                capacity: self.capacity,
            });
        }

        self.slots.push(item);
        Ok(Placement::NewSlot {
            slot: self.slots.len() - 1,
        })
    }

    /// Removes one unit of the item with `id`.
    ///
    /// Stacks larger than one shrink by a single unit and a one-unit copy is
    /// returned; otherwise the whole slot is removed. Unknown ids return `None`.
    pub fn remove_item(&mut self, id: ItemId) -> Option<InventoryItem> {
        let index = self.slots.iter().position(|slot| slot.id == id)?;
        let slot = &mut self.slots[index];
        if slot.stackable && slot.count > 1 {
            slot.count -= 1;
            let mut unit = slot.clone();
            unit.count = 1;
            return Some(unit);
        }

        Some(self.slots.remove(index))
    }

    /// Consumes one unit of the item with `id`; same bookkeeping as [`Self::remove_item`].
    pub fn use_item(&mut self, id: ItemId) -> Option<InventoryItem> {
        self.remove_item(id)
    }

    /// Item stored at the slot index.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&InventoryItem> {
        self.slots.get(slot)
    }

    /// Slots in insertion order.
    #[must_use]
    pub fn items(&self) -> &[InventoryItem] {
        &self.slots
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Reports whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reports whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Maximum number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
