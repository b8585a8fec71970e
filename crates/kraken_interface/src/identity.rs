//! Button identity matching
//!
//! Decides whether a freshly declared button is "the same" button as one from
//! the previous frame. Nothing here hashes; checks run in a fixed order and
//! fail fast, cheapest and most discriminating first.

use std::rc::Rc;

use slotmap::SlotMap;

use crate::block::Block;
use crate::button::{Button, ButtonId, FuncArg};

/// True when `new` should inherit the state of `old`.
///
/// 1. A custom comparator shared by both buttons (same type, same function)
///    decides on its own.
/// 2. Otherwise return value, stage property, handlers and their arguments,
///    raw value source, operator and drag kind must all agree.
/// 3. Two view items must also report the same underlying item.
pub fn buttons_equal(new: &Button, old: &Button) -> bool {
    if let Some(cmp) = &new.identity_cmp {
        let same_cmp = old
            .identity_cmp
            .as_ref()
            .map_or(false, |old_cmp| Rc::ptr_eq(cmp, old_cmp));
        if new.button_type() == old.button_type() && same_cmp {
            let result = cmp(new, old);
            debug_assert_eq!(
                result,
                cmp(old, new),
                "button identity comparator is not symmetric"
            );
            return result;
        }
    }

    if new.retval != old.retval {
        return false;
    }
    if new.property != old.property {
        return false;
    }
    if !same_fn(&new.handle, &old.handle) {
        return false;
    }
    if !same_fn(&new.handle_n, &old.handle_n) {
        return false;
    }
    if !func_arg_matches(new.handle_args.0, old.handle_args.0) {
        return false;
    }
    if !func_arg_matches(new.handle_args.1, old.handle_args.1) {
        return false;
    }
    if new.handle_n.is_none()
        && ((!new.raw.same_source(&old.raw) && !old.raw.is_self_value())
            || new.raw.raw_type() != old.raw.raw_type())
    {
        return false;
    }
    let new_op = new.operator.as_ref().map(|op| op.optype);
    let old_op = old.operator.as_ref().map(|op| op.optype);
    if new_op != old_op {
        return false;
    }
    if new.drag.kind != old.drag.kind {
        return false;
    }

    if let (Some(new_view), Some(old_view)) = (new.kind.view_item(), old.kind.view_item()) {
        match (&new_view.item, &old_view.item) {
            (Some(a), Some(b)) => {
                if !a.matches(b.as_ref()) {
                    return false;
                }
            }
            _ => return false,
        }
    }

    true
}

fn same_fn<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// An old button passing itself as argument matches any argument
fn func_arg_matches(new: FuncArg, old: FuncArg) -> bool {
    old == FuncArg::SelfButton || old == new
}

/// Index of the first button in `old_block` matching `new`
pub fn find_old(
    buttons: &SlotMap<ButtonId, Button>,
    old_block: &Block,
    new: &Button,
) -> Option<usize> {
    old_block.buttons.iter().position(|&id| {
        buttons
            .get(id)
            .map_or(false, |old| buttons_equal(new, old))
    })
}

/// The button of `new_block` that `old` would be reconciled into
pub fn find_new(
    buttons: &SlotMap<ButtonId, Button>,
    new_block: &Block,
    old: &Button,
) -> Option<ButtonId> {
    new_block.buttons.iter().copied().find(|&id| {
        buttons
            .get(id)
            .map_or(false, |new| buttons_equal(new, old))
    })
}
