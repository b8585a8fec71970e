//! Button and block flag sets

use bitflags::bitflags;

bitflags! {
    /// Per-button state bits
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ButtonFlags: u32 {
        /// Pushed/checked
        const SELECT = 1 << 0;
        /// Scrolled out of view
        const SCROLLED = 1 << 1;
        /// Hovered or being interacted with
        const ACTIVE = 1 << 2;
        const HAS_ICON = 1 << 3;
        const HIDDEN = 1 << 4;
        /// Draw as selected without being pushed
        const SELECT_DRAW = 1 << 5;
        /// Enter interaction as soon as the block is drawn
        const ACTIVATE_ON_INIT = 1 << 6;
        const DISABLED = 1 << 7;
        /// Drawn faded but still usable
        const INACTIVE = 1 << 8;
        const LAST_ACTIVE = 1 << 9;
        const UNDO = 1 << 10;
        /// Error highlight
        const REDALERT = 1 << 11;
        /// Part of a multi-button drag
        const DRAG_MULTI = 1 << 12;
        /// Label carries a `|shortcut` suffix
        const HAS_SEP_CHAR = 1 << 13;
        const ICON_SUBMENU = 1 << 14;
        const NODE_LINK = 1 << 15;
    }
}

bitflags! {
    /// Drawing hints that do not affect behaviour
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DrawFlags: u32 {
        const ICON_LEFT = 1 << 0;
        const ICON_RIGHT = 1 << 1;
        const TEXT_LEFT = 1 << 2;
        const TEXT_RIGHT = 1 << 3;
        const NO_TEXT_PADDING = 1 << 4;
        const ICON_REVERSE = 1 << 5;
        /// Show pushed state inverted (e.g. "Hide" checkboxes)
        const CHECKBOX_INVERT = 1 << 6;
        const ALIGN_TOP = 1 << 7;
        const ALIGN_LEFT = 1 << 8;
        const ALIGN_RIGHT = 1 << 9;
        const ALIGN_DOWN = 1 << 10;
        const BOX_ITEM = 1 << 11;
    }
}

bitflags! {
    /// Block policy bits
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u32 {
        /// Popup/menu style block with its own event loop
        const LOOP = 1 << 0;
        const IS_FLIP = 1 << 1;
        const NO_FLIP = 1 << 2;
        /// Number keys select items, disables letter accelerators
        const NUMSELECT = 1 << 3;
        const NO_WIN_CLIP = 1 << 4;
        const CLIPBOTTOM = 1 << 5;
        const CLIPTOP = 1 << 6;
        const MOVEMOUSE_QUIT = 1 << 7;
        const KEEP_OPEN = 1 << 8;
        const POPUP = 1 << 9;
        const SEARCH_MENU = 1 << 10;
        const POPUP_MEMORY = 1 << 11;
        const CLIP_EVENTS = 1 << 12;
        const POPUP_HOLD = 1 << 13;
        const LIST_ITEM = 1 << 14;
        /// Pie menu
        const RADIAL = 1 << 15;
        const POPOVER = 1 << 16;
        const POPOVER_ONCE = 1 << 17;
        /// Show shortcuts outside of menus too
        const SHOW_SHORTCUT_ALWAYS = 1 << 18;
        /// An alignment group is open; new buttons join it
        const ALIGN = 1 << 19;
    }
}

/// Flags an active button takes from its freshly declared counterpart
pub const TRANSPLANT_FLAGS: ButtonFlags = ButtonFlags::REDALERT
    .union(ButtonFlags::HAS_ICON)
    .union(ButtonFlags::SELECT_DRAW);

/// Draw flags an active button takes from its counterpart (none so far)
pub const TRANSPLANT_DRAWFLAGS: DrawFlags = DrawFlags::empty();

/// Accelerator mask with every letter a-z taken
pub const MENU_KEY_MASK_ALL: u32 = (1 << 26) - 1;

/// Visual style of a button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Emboss {
    /// Regular raised widget
    #[default]
    Emboss,
    None,
    /// Menu bar items
    Pulldown,
    /// Pie menu items
    Radial,
    /// Like `None` but keeps status colors
    NoneOrStatus,
}

/// Slot a button occupies in a pie menu
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RadialDirection {
    #[default]
    None,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl RadialDirection {
    /// Numpad digit laid out in the same direction
    pub fn numpad_digit(self) -> Option<u8> {
        match self {
            RadialDirection::None => None,
            RadialDirection::N => Some(8),
            RadialDirection::NE => Some(9),
            RadialDirection::E => Some(6),
            RadialDirection::SE => Some(3),
            RadialDirection::S => Some(2),
            RadialDirection::SW => Some(1),
            RadialDirection::W => Some(4),
            RadialDirection::NW => Some(7),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transplant_mask() {
        assert!(TRANSPLANT_FLAGS.contains(ButtonFlags::REDALERT));
        assert!(TRANSPLANT_FLAGS.contains(ButtonFlags::HAS_ICON));
        assert!(TRANSPLANT_FLAGS.contains(ButtonFlags::SELECT_DRAW));
        assert!(!TRANSPLANT_FLAGS.contains(ButtonFlags::SELECT));
        assert!(TRANSPLANT_DRAWFLAGS.is_empty());
    }

    #[test]
    fn test_numpad_layout() {
        assert_eq!(RadialDirection::N.numpad_digit(), Some(8));
        assert_eq!(RadialDirection::SW.numpad_digit(), Some(1));
        assert_eq!(RadialDirection::None.numpad_digit(), None);
    }

    #[test]
    fn test_key_mask_covers_alphabet() {
        assert_eq!(MENU_KEY_MASK_ALL.count_ones(), 26);
    }
}
