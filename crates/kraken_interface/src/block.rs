//! Block container
//!
//! A [`Block`] is the ordered list of buttons one region draws under one name
//! in one frame, plus the policy used to finalize it. Blocks are recreated
//! every frame; `old_block` links the previous frame's block with the same
//! name so its buttons can be reconciled into the new one.

use kraken_core::{Point, Rect, Size};
use slotmap::new_key_type;

use crate::butstore::StoreSlot;
use crate::button::ButtonId;
use crate::flags::{BlockFlags, Emboss};

new_key_type! {
    /// Handle to a block in the interface arena
    pub struct BlockId;
}

/// Identifies a screen region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegionId(pub u32);

/// The region a block is drawn in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub size: Size,
    /// Popups are built before their region is shown
    pub visible: bool,
}

impl Region {
    pub fn new(id: u32, width: f32, height: f32) -> Self {
        Self {
            id: RegionId(id),
            size: Size::new(width, height),
            visible: true,
        }
    }
}

/// How `end_block` computes the block rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BoundsCalc {
    /// Leave the rectangle alone
    #[default]
    None,
    /// Union of buttons plus margin
    Fixed,
    /// Widen columns to fit labels, then `Fixed`
    Text,
    /// Position relative to the mouse
    PopupMouse,
    /// Like `PopupMouse`, widening menus to fit labels first
    PopupMenu,
    /// Centered in the window
    PopupCenter,
    /// Centered on the pie spawn point
    PieCenter,
    /// Caller supplied rectangle
    Explicit(Rect),
}

/// An ordered collection of buttons
#[derive(Debug)]
pub struct Block {
    pub name: String,
    pub region: Option<RegionId>,
    /// Declaration order, also draw order
    pub buttons: Vec<ButtonId>,
    /// Previous frame's block with the same name, until reconciled
    pub old_block: Option<BlockId>,
    /// Registrations external code holds against buttons of this block
    pub butstore: Vec<StoreSlot>,

    pub flag: BlockFlags,
    pub emboss: Emboss,
    pub rect: Rect,
    /// `rect` grown by the safety margin, for hit testing
    pub safety: Rect,

    pub bounds_type: BoundsCalc,
    /// Margin around the buttons
    pub bounds: f32,
    /// Minimum width
    pub minbounds: f32,
    /// User offset applied to popups
    pub bounds_offset: Point,

    /// Current alignment group
    pub alignnr: u16,
    /// Drawn this frame
    pub active: bool,
    /// Finalized; no more buttons may be added
    pub ended: bool,
    pub auto_open: bool,
    pub tooltip_disabled: bool,
    /// Disables every button added while set
    pub lock: Option<String>,
    /// Size of the owning panel, used when the block is empty
    pub panel_size: Option<Size>,
    pub region_size: Size,
    pub pie_center_spawned: Point,
}

impl Block {
    pub fn new(name: impl Into<String>, emboss: Emboss) -> Self {
        Self {
            name: name.into(),
            region: None,
            buttons: Vec::new(),
            old_block: None,
            butstore: Vec::new(),
            flag: BlockFlags::empty(),
            emboss,
            rect: Rect::ZERO,
            safety: Rect::ZERO,
            bounds_type: BoundsCalc::None,
            bounds: 0.0,
            minbounds: 0.0,
            bounds_offset: Point::ZERO,
            alignnr: 0,
            active: true,
            ended: false,
            auto_open: false,
            tooltip_disabled: false,
            lock: None,
            panel_size: None,
            region_size: Size::ZERO,
            pie_center_spawned: Point::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Position of a button in declaration order
    pub fn index_of(&self, button: ButtonId) -> Option<usize> {
        self.buttons.iter().position(|&b| b == button)
    }

    // -------------------------------------------------------------------------
    // Bounds policy
    // -------------------------------------------------------------------------

    /// Union of buttons plus `margin`
    pub fn bounds_set_normal(&mut self, margin: f32) {
        self.bounds = margin;
        self.bounds_type = BoundsCalc::Fixed;
    }

    /// Column packing by label width, then `margin`
    pub fn bounds_set_text(&mut self, margin: f32) {
        self.bounds = margin;
        self.bounds_type = BoundsCalc::Text;
    }

    /// Popup placed at the mouse, shifted by `offset`
    pub fn bounds_set_popup(&mut self, margin: f32, offset: Option<Point>) {
        self.bounds = margin;
        self.bounds_type = BoundsCalc::PopupMouse;
        self.bounds_offset = offset.unwrap_or(Point::ZERO);
    }

    /// Menu placed at the mouse, shifted by `offset`
    pub fn bounds_set_menu(&mut self, margin: f32, offset: Option<Point>) {
        self.bounds = margin;
        self.bounds_type = BoundsCalc::PopupMenu;
        self.bounds_offset = offset.unwrap_or(Point::ZERO);
    }

    pub fn bounds_set_centered(&mut self, margin: f32) {
        self.bounds = margin;
        self.bounds_type = BoundsCalc::PopupCenter;
    }

    pub fn bounds_set_pie(&mut self, center: Point) {
        self.pie_center_spawned = center;
        self.bounds_type = BoundsCalc::PieCenter;
    }

    pub fn bounds_set_explicit(&mut self, rect: Rect) {
        self.bounds_type = BoundsCalc::Explicit(rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_defaults() {
        let block = Block::new("menu", Emboss::Pulldown);
        assert!(block.active);
        assert!(!block.ended);
        assert!(block.is_empty());
        assert_eq!(block.bounds_type, BoundsCalc::None);
        assert!(block.rect.is_unbounded_x());
    }

    #[test]
    fn test_bounds_setters() {
        let mut block = Block::new("popup", Emboss::Emboss);
        block.bounds_set_popup(6.0, Some(Point::new(-20.0, 10.0)));
        assert_eq!(block.bounds_type, BoundsCalc::PopupMouse);
        assert_eq!(block.bounds, 6.0);
        assert_eq!(block.bounds_offset, Point::new(-20.0, 10.0));

        block.bounds_set_menu(4.0, None);
        assert_eq!(block.bounds_type, BoundsCalc::PopupMenu);
        assert_eq!(block.bounds_offset, Point::ZERO);

        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        block.bounds_set_explicit(r);
        assert_eq!(block.bounds_type, BoundsCalc::Explicit(r));
    }
}
