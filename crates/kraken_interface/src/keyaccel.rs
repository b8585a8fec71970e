//! Menu accelerator keys
//!
//! Popup menus give every entry a single letter that activates it. Letters
//! are handed out in two passes so word initials win: the first pass only
//! considers the first letter of each word, the second any letter. A 26 bit
//! mask tracks the letters in use.

use crate::arena::UiArena;
use crate::block::BlockId;
use crate::button::{Button, ButtonType};
use crate::flags::{ButtonFlags, MENU_KEY_MASK_ALL};

fn letter_bit(c: char) -> Option<u32> {
    let lower = c.to_ascii_lowercase();
    lower
        .is_ascii_lowercase()
        .then(|| 1 << (lower as u32 - 'a' as u32))
}

fn is_eligible(but: &Button) -> bool {
    matches!(
        but.button_type(),
        ButtonType::But
            | ButtonType::Menu
            | ButtonType::BlockMenu
            | ButtonType::Pulldown
            | ButtonType::IconToggle
            | ButtonType::Row
    ) && !but.flag.contains(ButtonFlags::HIDDEN)
}

/// First free letter of `label`.
///
/// With `initials_only` the scan jumps from word to word and only the first
/// character of each is tried.
fn pick_key(label: &str, mask: u32, initials_only: bool) -> Option<char> {
    let chars: Vec<char> = label.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if let Some(bit) = letter_bit(chars[i]) {
            if mask & bit == 0 {
                return Some(chars[i]);
            }
        }
        if initials_only {
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
            // the delimiter
            i += 1;
        } else {
            i += 1;
        }
    }
    None
}

/// Assign accelerator keys to the buttons of a block that has not been
/// bounded yet. Buttons with an explicit key keep it and reserve its letter.
///
/// Returns the number of keys assigned.
pub fn set_keyaccels(arena: &mut UiArena, block_id: BlockId) -> usize {
    let UiArena { blocks, buttons, .. } = arena;
    let Some(block) = blocks.get(block_id) else {
        return 0;
    };
    if !block.rect.is_unbounded_x() {
        return 0;
    }

    let mut mask = block
        .buttons
        .iter()
        .filter_map(|&id| buttons.get(id))
        .filter_map(|but| but.menu_key.and_then(letter_bit))
        .fold(0u32, |mask, bit| mask | bit);

    let mut assigned = 0;
    let mut missing = 0;
    for pass in 0..2 {
        let initials_only = pass == 0;
        for &id in &block.buttons {
            let Some(but) = buttons.get_mut(id) else {
                continue;
            };
            if !is_eligible(but) || but.menu_key.is_some() || but.label.is_empty() {
                continue;
            }

            match pick_key(but.label_without_sep_char(), mask, initials_only) {
                Some(key) => {
                    mask |= letter_bit(key).unwrap_or(0);
                    but.menu_key = Some(key);
                    assigned += 1;
                }
                None => missing += 1,
            }

            if mask == MENU_KEY_MASK_ALL {
                tracing::debug!("Ran out of accelerator keys in '{}'", block.name);
                return assigned;
            }
        }
        if missing == 0 {
            break;
        }
    }

    tracing::trace!("Assigned {} accelerator keys in '{}'", assigned, block.name);
    assigned
}
