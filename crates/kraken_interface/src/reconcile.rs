//! Block reconciliation
//!
//! Every frame the application declares a fresh block. Before it is laid out,
//! its buttons are matched against the previous frame's block of the same
//! name so interaction state carries over:
//!
//! - **Matching**: a cursor walks the old block in step with the new one, so
//!   stable declaration order costs one comparison per button. On a miss the
//!   whole old block is scanned.
//! - **Active buttons**: the old button object survives. It takes the new
//!   button's place and geometry, swaps in selected transient state, and the
//!   new button is destroyed.
//! - **Everything else**: the new button survives and inherits a couple of
//!   flags; the old one is destroyed.
//!
//! Old buttons nobody matched stay in the old block and are freed with it.

use std::mem;

use crate::arena::UiArena;
use crate::block::BlockId;
use crate::button::{Button, ButtonId, ButtonType};
use crate::flags::{ButtonFlags, TRANSPLANT_DRAWFLAGS, TRANSPLANT_FLAGS};
use crate::identity::{buttons_equal, find_old};
use crate::label::ButtonLabel;

/// What happened while reconciling one block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Matched through the cursor
    pub reused: usize,
    /// Matched through a full scan
    pub fallback_scans: usize,
    /// Active old buttons moved into the new block
    pub transplanted: usize,
    /// New buttons with no counterpart
    pub new: usize,
}

impl ReconcileStats {
    pub fn matched(&self) -> usize {
        self.reused + self.fallback_scans
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Reconcile `block_id` against its old block, if it has one.
///
/// Afterwards the old block holds only buttons that were not redeclared and
/// the link to it is cleared.
pub fn update_from_old_block(arena: &mut UiArena, block_id: BlockId) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    let Some(old_id) = arena.blocks.get(block_id).and_then(|b| b.old_block) else {
        return stats;
    };
    if !arena.blocks.contains_key(old_id) {
        tracing::warn!("Old block of {:?} was freed before reconciliation", block_id);
        if let Some(block) = arena.blocks.get_mut(block_id) {
            block.old_block = None;
        }
        return stats;
    }

    let has_store = arena
        .blocks
        .get(old_id)
        .map_or(false, |old| !old.butstore.is_empty());
    if has_store {
        let UiArena {
            blocks,
            buttons,
            store,
            ..
        } = arena;
        store.update(blocks, buttons, block_id);
    }

    let mut cursor = Some(0usize);
    let mut index = 0;
    loop {
        let Some(new_id) = arena.blocks.get(block_id).and_then(|b| b.buttons.get(index).copied())
        else {
            break;
        };

        match match_old(arena, old_id, new_id, &mut cursor, &mut stats) {
            Some(old_index) => {
                let old_button = arena.blocks[old_id].buttons.remove(old_index);
                let survivor = if arena.buttons.get(old_button).map_or(false, Button::is_active) {
                    transplant_active(arena, block_id, index, new_id, old_button);
                    stats.transplanted += 1;
                    old_button
                } else {
                    carry_inactive(arena, new_id, old_button);
                    new_id
                };
                tracing::trace!(
                    "Reconciled button {} of block {:?} ({:?})",
                    index,
                    block_id,
                    survivor
                );
            }
            None => stats.new += 1,
        }
        index += 1;
    }

    if let Some(old) = arena.blocks.get(old_id) {
        let (auto_open, tooltip_disabled, pie_center) =
            (old.auto_open, old.tooltip_disabled, old.pie_center_spawned);
        if let Some(block) = arena.blocks.get_mut(block_id) {
            block.auto_open = auto_open;
            block.tooltip_disabled = tooltip_disabled;
            block.pie_center_spawned = pie_center;
        }
    }
    if let Some(block) = arena.blocks.get_mut(block_id) {
        block.old_block = None;
    }

    tracing::trace!("Reconcile stats for {:?}: {:?}", block_id, stats);
    stats
}

/// Find the old button matching `new_id`; returns its index in the old block.
///
/// The cursor is the index of the old button expected to match next. After a
/// match it points at the matched button's successor, which sits at the same
/// index once the match is removed. A miss leaves it where it was, so a button
/// inserted into a stable sequence does not push its successors to the scan.
fn match_old(
    arena: &UiArena,
    old_id: BlockId,
    new_id: ButtonId,
    cursor: &mut Option<usize>,
    stats: &mut ReconcileStats,
) -> Option<usize> {
    let old_block = arena.blocks.get(old_id)?;
    let new = arena.buttons.get(new_id)?;

    let fast = cursor.filter(|&i| {
        old_block
            .buttons
            .get(i)
            .and_then(|&id| arena.buttons.get(id))
            .map_or(false, |old| buttons_equal(new, old))
    });

    let found = match fast {
        Some(i) => {
            stats.reused += 1;
            Some(i)
        }
        None => {
            let i = find_old(&arena.buttons, old_block, new);
            if i.is_some() {
                stats.fallback_scans += 1;
            }
            i
        }
    };
    if found.is_some() {
        *cursor = found;
    }
    found
}

// =============================================================================
// State transfer
// =============================================================================

/// The old button is active: it replaces the new one at `index`
fn transplant_active(
    arena: &mut UiArena,
    block_id: BlockId,
    index: usize,
    new_id: ButtonId,
    old_id: ButtonId,
) {
    let Some(mut new) = arena.buttons.remove(new_id) else {
        return;
    };

    if let Some(block) = arena.blocks.get_mut(block_id) {
        debug_assert_eq!(block.buttons.get(index), Some(&new_id));
        block.buttons[index] = old_id;
    }
    if arena.active_button == Some(new_id) {
        arena.active_button = Some(old_id);
    }

    if let Some(old) = arena.buttons.get_mut(old_id) {
        old.block = block_id;
        transplant_state(old, &mut new);
    }

    if let Some(block) = arena.blocks.get(block_id) {
        arena.store.register_update(block, old_id, new_id);
    }

    tracing::debug!(
        "Kept active button '{}' across redraw",
        arena
            .buttons
            .get(old_id)
            .map(|b| b.label.as_str())
            .unwrap_or_default()
    );
    // `new` drops here, releasing whatever it received in the swaps.
}

/// Move the freshly declared state of `new` into the surviving active `old`
pub(crate) fn transplant_state(old: &mut Button, new: &mut Button) {
    old.rect = new.rect;
    old.context = new.context.clone();
    old.icon = new.icon;
    old.iconadd = new.iconadd;
    old.alignnr = new.alignnr;

    // Some menu buttons store their value in themselves; keep that wiring.
    if !old.raw.is_self_value() {
        mem::swap(&mut old.raw, &mut new.raw);
        mem::swap(&mut old.handle_n_arg, &mut new.handle_n_arg);
    }

    mem::swap(&mut old.tooltip, &mut new.tooltip);

    old.flag = (old.flag & !TRANSPLANT_FLAGS) | (new.flag & TRANSPLANT_FLAGS);
    old.drawflag = (old.drawflag & !TRANSPLANT_DRAWFLAGS) | (new.drawflag & TRANSPLANT_DRAWFLAGS);

    for icon in &mut new.extra_op_icons {
        if let Some(prev) = old
            .extra_op_icons
            .iter()
            .find(|prev| prev.optype == icon.optype && prev.icon == icon.icon)
        {
            icon.highlighted = prev.highlighted;
        }
    }
    mem::swap(&mut old.extra_op_icons, &mut new.extra_op_icons);

    // Row highlight follows the mouse; copying the bound avoids a stale one.
    if matches!(old.button_type(), ButtonType::Row | ButtonType::ListRow) {
        old.hardmax = new.hardmax;
    }

    if let (Some(old_progress), Some(new_progress)) =
        (old.kind.progress_mut(), new.kind.progress_mut())
    {
        old_progress.progress = new_progress.progress;
    }

    if let (Some(old_view), Some(new_view)) = (old.kind.view_item_mut(), new.kind.view_item_mut())
    {
        mem::swap(&mut old_view.item, &mut new_view.item);
    }

    if new.label.spilled() {
        mem::swap(&mut old.label, &mut new.label);
    } else {
        old.label = ButtonLabel::new(new.label.as_str());
    }

    if new.drag.payload.is_some() {
        mem::swap(&mut old.drag.payload, &mut new.drag.payload);
    }
    if new.drag.image.is_some() {
        mem::swap(&mut old.drag.image, &mut new.drag.image);
    }
}

/// The old button is not active: the new one survives with a few old flags
fn carry_inactive(arena: &mut UiArena, new_id: ButtonId, old_id: ButtonId) {
    let Some(mut old) = arena.free_button(old_id) else {
        return;
    };
    if let Some(new) = arena.buttons.get_mut(new_id) {
        carry_flags(new, &mut old);
    }
}

pub(crate) fn carry_flags(new: &mut Button, old: &mut Button) {
    let mut flag_copy = ButtonFlags::DRAG_MULTI;
    // A view item may sit underneath the active button; keep it highlighted.
    if new.button_type() == ButtonType::ViewItem {
        flag_copy |= ButtonFlags::ACTIVE;
    }
    new.flag = (new.flag & !flag_copy) | (old.flag & flag_copy);

    if let (Some(new_search), Some(old_search)) = (new.kind.search_mut(), old.kind.search_mut()) {
        mem::swap(&mut new_search.arg, &mut old_search.arg);
    }
}
