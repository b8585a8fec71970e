//! Button store: weak, self-healing button references
//!
//! Operators and modal handlers sometimes need to hold on to a button across
//! frames. Instead of a raw handle that may dangle once the block is rebuilt,
//! they register a [`StoreSlot`]. The store keeps every slot pointing at the
//! live button:
//!
//! - when a block is reconciled, slots move to the new block and re-resolve
//!   to the matching new button
//! - when an active button survives reconciliation, slots that resolved to
//!   the discarded twin are redirected to the survivor
//! - when a block is freed, its slots resolve to nothing
//!
//! The owning block keeps the list of its slots so only that block's entries
//! are touched on the hot path.

use slotmap::{new_key_type, SlotMap};

use crate::block::{Block, BlockId};
use crate::button::{Button, ButtonId};
use crate::identity::find_new;

new_key_type! {
    /// Stable handle to a registered button reference
    pub struct StoreSlot;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StoreEntry {
    block: Option<BlockId>,
    button: Option<ButtonId>,
}

/// Registry of external button references
#[derive(Debug, Default)]
pub struct ButtonStore {
    slots: SlotMap<StoreSlot, StoreEntry>,
}

impl ButtonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reference to `button` held against `block`
    pub fn register(&mut self, block_id: BlockId, block: &mut Block, button: ButtonId) -> StoreSlot {
        debug_assert!(block.buttons.contains(&button));
        let slot = self.slots.insert(StoreEntry {
            block: Some(block_id),
            button: Some(button),
        });
        block.butstore.push(slot);
        slot
    }

    /// Drop a registration. Returns the block the slot was listed on.
    pub fn unregister(&mut self, slot: StoreSlot) -> Option<BlockId> {
        let entry = self.slots.remove(slot);
        if entry.is_none() {
            tracing::warn!("Unregistering unknown button store slot {:?}", slot);
        }
        entry.and_then(|e| e.block)
    }

    /// Button the slot currently resolves to
    pub fn get(&self, slot: StoreSlot) -> Option<ButtonId> {
        self.slots.get(slot).and_then(|e| e.button)
    }

    pub fn contains(&self, slot: StoreSlot) -> bool {
        self.slots.contains_key(slot)
    }

    /// False once the owning block has been freed
    pub fn is_valid(&self, slot: StoreSlot) -> bool {
        self.slots.get(slot).map_or(false, |e| e.block.is_some())
    }

    /// Whether any slot of `block` resolves to `button`
    pub fn is_registered(&self, block: &Block, button: ButtonId) -> bool {
        block
            .butstore
            .iter()
            .any(|&slot| self.get(slot) == Some(button))
    }

    /// Redirect every slot of `block` resolving to `src` to `dst`
    pub fn register_update(&mut self, block: &Block, dst: ButtonId, src: ButtonId) -> bool {
        let mut found = false;
        for &slot in &block.butstore {
            if let Some(entry) = self.slots.get_mut(slot) {
                if entry.button == Some(src) {
                    entry.button = Some(dst);
                    found = true;
                }
            }
        }
        found
    }

    /// Invalidate every slot of a block that is about to be freed
    pub fn clear(&mut self, block: &Block) {
        for &slot in &block.butstore {
            if let Some(entry) = self.slots.get_mut(slot) {
                entry.block = None;
                entry.button = None;
            }
        }
    }

    /// Move the old block's slots to `block_id` and re-resolve them
    /// against the new block's buttons
    pub fn update(
        &mut self,
        blocks: &mut SlotMap<BlockId, Block>,
        buttons: &SlotMap<ButtonId, Button>,
        block_id: BlockId,
    ) {
        let Some(old_id) = blocks.get(block_id).and_then(|b| b.old_block) else {
            return;
        };
        let moved = match blocks.get_mut(old_id) {
            Some(old) => std::mem::take(&mut old.butstore),
            None => return,
        };
        let Some(block) = blocks.get_mut(block_id) else {
            return;
        };
        block.butstore.extend(moved);
        if block.butstore.is_empty() {
            return;
        }
        let block: &Block = block;

        // Few slots per block in practice, so the nested scan is fine.
        for &slot in &block.butstore {
            let Some(entry) = self.slots.get_mut(slot) else {
                continue;
            };
            debug_assert!(
                entry.block.is_none() || entry.block == Some(block_id) || entry.block == Some(old_id)
            );
            if entry.block != Some(old_id) {
                continue;
            }
            entry.block = Some(block_id);
            if let Some(old_button) = entry.button.and_then(|id| buttons.get(id)) {
                // None when the button was not redeclared this frame.
                entry.button = find_new(buttons, block, old_button);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
