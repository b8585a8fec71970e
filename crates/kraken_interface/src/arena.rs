//! Storage for blocks and buttons
//!
//! Buttons and blocks live in slotmap arenas and refer to each other by
//! handle. A button handle is listed by exactly one block; moving a button
//! between blocks moves the handle and rewrites the button's `block` field.
//! Freed handles simply stop resolving.

use slotmap::SlotMap;

use crate::block::{Block, BlockId};
use crate::butstore::ButtonStore;
use crate::button::{Button, ButtonId};

/// Blocks, buttons and the references into them
#[derive(Debug, Default)]
pub struct UiArena {
    pub buttons: SlotMap<ButtonId, Button>,
    pub blocks: SlotMap<BlockId, Block>,
    pub store: ButtonStore,
    /// The button the window system is interacting with
    pub active_button: Option<ButtonId>,
}

impl UiArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.get(id)
    }

    pub fn button_mut(&mut self, id: ButtonId) -> Option<&mut Button> {
        self.buttons.get_mut(id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    /// Buttons of a block in declaration order
    pub fn block_buttons(&self, id: BlockId) -> impl Iterator<Item = (ButtonId, &Button)> + '_ {
        self.blocks
            .get(id)
            .into_iter()
            .flat_map(|block| block.buttons.iter())
            .filter_map(move |&bid| self.buttons.get(bid).map(|b| (bid, b)))
    }

    /// Destroy a button that is no longer listed by any block.
    ///
    /// Owned sub-objects (tooltip argument, drag payload, search state,
    /// edit state) are released with it.
    pub fn free_button(&mut self, id: ButtonId) -> Option<Button> {
        if self.active_button == Some(id) {
            self.active_button = None;
        }
        self.buttons.remove(id)
    }

    /// Destroy a block with all its buttons; store slots against it
    /// resolve to nothing afterwards.
    pub fn free_block(&mut self, id: BlockId) {
        let Some(block) = self.blocks.remove(id) else {
            return;
        };
        self.store.clear(&block);
        for bid in &block.buttons {
            self.free_button(*bid);
        }
        for other in self.blocks.values_mut() {
            if other.old_block == Some(id) {
                other.old_block = None;
            }
        }
        tracing::debug!(
            "Freed block '{}' ({} buttons)",
            block.name,
            block.buttons.len()
        );
    }
}
