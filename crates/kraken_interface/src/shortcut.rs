//! Shortcut hints in menu labels
//!
//! Menus show the keyboard shortcut of each entry right-aligned after its
//! label. The shortcut is stored in the label behind [`SEP_CHAR`] and
//! `HAS_SEP_CHAR` is set so drawing and searching can split it off again.

use kraken_core::KeymapLookup;

use crate::arena::UiArena;
use crate::block::BlockId;
use crate::button::{Button, ButtonId, ICON_NONE};
use crate::flags::{BlockFlags, ButtonFlags, Emboss, RadialDirection};
use crate::label::SEP_CHAR;

/// Append `shortcut` to the label of `but`
pub fn add_shortcut(but: &mut Button, shortcut: &str) {
    let text = format!("{}{}{}", but.label_without_sep_char(), SEP_CHAR, shortcut);
    but.label.set(&text);
    but.flag.insert(ButtonFlags::HAS_SEP_CHAR);
}

fn lookup(but: &Button, keymap: &dyn KeymapLookup) -> Option<String> {
    let from_operator = but
        .operator
        .as_ref()
        .and_then(|op| keymap.operator_shortcut(op.optype, Some(&op.props)));
    from_operator.or_else(|| {
        but.property
            .as_ref()
            .and_then(|prop| keymap.property_shortcut(prop))
    })
}

/// Show shortcuts in the labels of a block that has not been bounded yet.
///
/// Pie menus show the numpad key of each direction instead. Returns the
/// buttons whose label changed.
pub fn set_keymaps(
    arena: &mut UiArena,
    block_id: BlockId,
    keymap: &dyn KeymapLookup,
) -> Vec<ButtonId> {
    let UiArena { blocks, buttons, .. } = arena;
    let Some(block) = blocks.get(block_id) else {
        return Vec::new();
    };
    if !block.rect.is_unbounded_x() {
        return Vec::new();
    }

    let mut changed = Vec::new();

    if block.flag.contains(BlockFlags::RADIAL) {
        for &id in &block.buttons {
            let Some(but) = buttons.get_mut(id) else {
                continue;
            };
            if but.pie_dir == RadialDirection::None {
                continue;
            }
            if let Some(digit) = but.pie_dir.numpad_digit() {
                add_shortcut(but, &digit.to_string());
                changed.push(id);
            }
        }
        return changed;
    }

    let show_always = block.flag.contains(BlockFlags::SHOW_SHORTCUT_ALWAYS);
    let is_loop = block.flag.contains(BlockFlags::LOOP);
    for &id in &block.buttons {
        let Some(but) = buttons.get_mut(id) else {
            continue;
        };
        if show_always {
            // Icon-only buttons (toolbars) have no room for a hint.
            if but.label.is_empty() && but.icon != ICON_NONE {
                continue;
            }
            if !is_loop && !matches!(but.emboss, Emboss::Emboss | Emboss::Radial) {
                continue;
            }
        }
        if let Some(shortcut) = lookup(but, keymap) {
            add_shortcut(but, &shortcut);
            changed.push(id);
        }
    }

    if !changed.is_empty() {
        tracing::trace!("Added {} shortcut hints to '{}'", changed.len(), block.name);
    }
    changed
}
