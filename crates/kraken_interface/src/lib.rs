//! Kraken Interface
//!
//! Immediate-mode blocks of buttons that keep their interaction state across
//! redraws.
//!
//! Every frame the application declares its blocks from scratch. When a block
//! ends it is reconciled with the previous frame's block of the same name:
//! matching buttons inherit state, the button being interacted with survives
//! intact, and the block is laid out according to its bounds mode.
//!
//! # Example
//!
//! ```rust
//! use kraken_core::{InterfaceConfig, Rect, Size};
//! use kraken_interface::{Button, ButtonKind, Emboss, UiRuntimeContext};
//!
//! let mut ctx = UiRuntimeContext::new(InterfaceConfig::default(), Size::new(800.0, 600.0));
//!
//! let menu = ctx.begin_block(None, "file_menu", Emboss::Pulldown);
//! for (i, label) in ["Open", "Save", "Quit"].into_iter().enumerate() {
//!     let rect = Rect::new(0.0, -20.0 * i as f32, 120.0, 20.0);
//!     ctx.add_button(menu, Button::new(ButtonKind::But).label(label).rect(rect)).unwrap();
//! }
//! ctx.end_block(menu, None).unwrap();
//!
//! let keys: Vec<_> = ctx.block_buttons(menu).map(|(_, b)| b.menu_key).collect();
//! assert_eq!(keys, vec![Some('O'), Some('S'), Some('Q')]);
//! ctx.end_frame();
//! ```

pub mod arena;
pub mod block;
pub mod bounds;
pub mod butstore;
pub mod button;
pub mod error;
pub mod flags;
pub mod identity;
pub mod keyaccel;
pub mod label;
pub mod reconcile;
pub mod runtime;
pub mod shortcut;
pub mod value;

#[cfg(test)]
mod frame_tests;

pub use arena::UiArena;
pub use block::{Block, BlockId, BoundsCalc, Region, RegionId};
pub use butstore::{ButtonStore, StoreSlot};
pub use button::{
    ActiveState, Button, ButtonId, ButtonKind, ButtonType, DragKind, ExtraOpIcon, FuncArg,
    OperatorBinding, RawSlot, RawType, Tooltip,
};
pub use error::{InterfaceError, Result};
pub use flags::{BlockFlags, ButtonFlags, DrawFlags, Emboss, RadialDirection};
pub use identity::buttons_equal;
pub use label::ButtonLabel;
pub use reconcile::{update_from_old_block, ReconcileStats};
pub use runtime::UiRuntimeContext;
