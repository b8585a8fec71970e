//! Frame driver
//!
//! [`UiRuntimeContext`] owns the block and button arenas together with the
//! seams to the rest of the application (stage properties, operators,
//! keymaps and text measurement) and drives the per-frame lifecycle:
//!
//! ```text
//! begin_block ──► add_button* ──► end_block ──► (draw) ──► end_frame
//!      │                              │
//!      └─ links last frame's block    └─ reconcile, poll operators,
//!         with the same name             accelerators, shortcuts, bounds
//! ```

use kraken_core::{
    EmptyKeymap, EstimatedTextMeasurer, InterfaceConfig, KeymapLookup, MemoryStage,
    OperatorRegistry, OperatorStatus, OperatorTable, Point, PropertyAccess, PropertyValue, Size,
    TextMeasurer,
};
use rustc_hash::FxHashMap;

use crate::arena::UiArena;
use crate::block::{Block, BlockId, BoundsCalc, Region, RegionId};
use crate::butstore::StoreSlot;
use crate::button::{ActiveState, Button, ButtonId, ICON_NONE};
use crate::error::{InterfaceError, Result};
use crate::flags::{BlockFlags, ButtonFlags, Emboss};
use crate::reconcile::{update_from_old_block, ReconcileStats};
use crate::{bounds, keyaccel, shortcut, value};

/// Reason shown on buttons whose operator cannot run
const OPERATOR_UNAVAILABLE: &str = "Operator unavailable";

type BlockKey = (Option<RegionId>, String);

/// Owns every block and button and runs the frame lifecycle
pub struct UiRuntimeContext {
    arena: UiArena,
    /// Most recent block per region and name
    blocks_by_name: FxHashMap<BlockKey, BlockId>,
    config: InterfaceConfig,
    window_size: Size,
    props: Box<dyn PropertyAccess>,
    operators: Box<dyn OperatorRegistry>,
    keymap: Box<dyn KeymapLookup>,
    text: Box<dyn TextMeasurer>,
}

impl UiRuntimeContext {
    /// Create a context with an empty stage, no operators and no keymap
    pub fn new(config: InterfaceConfig, window_size: Size) -> Self {
        Self {
            arena: UiArena::new(),
            blocks_by_name: FxHashMap::default(),
            config,
            window_size,
            props: Box::new(MemoryStage::new()),
            operators: Box::new(OperatorTable::new()),
            keymap: Box::new(EmptyKeymap),
            text: Box::new(EstimatedTextMeasurer),
        }
    }

    pub fn with_properties(mut self, props: impl PropertyAccess + 'static) -> Self {
        self.props = Box::new(props);
        self
    }

    pub fn with_operators(mut self, operators: impl OperatorRegistry + 'static) -> Self {
        self.operators = Box::new(operators);
        self
    }

    pub fn with_keymap(mut self, keymap: impl KeymapLookup + 'static) -> Self {
        self.keymap = Box::new(keymap);
        self
    }

    pub fn with_text_measurer(mut self, text: impl TextMeasurer + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &InterfaceConfig {
        &self.config
    }

    pub fn window_size(&self) -> Size {
        self.window_size
    }

    /// Update the window size used to clamp popups
    pub fn set_window_size(&mut self, size: Size) {
        self.window_size = size;
    }

    pub fn arena(&self) -> &UiArena {
        &self.arena
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.arena.block(id)
    }

    /// Mutable access for setting up bounds policy and flags before `end_block`
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.arena.block_mut(id)
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.arena.button(id)
    }

    /// Buttons of a block in draw order
    pub fn block_buttons(&self, id: BlockId) -> impl Iterator<Item = (ButtonId, &Button)> + '_ {
        self.arena.block_buttons(id)
    }

    /// The block drawn last under `name` in `region`
    pub fn find_block(&self, region: Option<RegionId>, name: &str) -> Option<BlockId> {
        self.blocks_by_name
            .get(&(region, name.to_string()))
            .copied()
            .filter(|&id| self.arena.blocks.contains_key(id))
    }

    pub fn properties(&self) -> &dyn PropertyAccess {
        self.props.as_ref()
    }

    pub fn properties_mut(&mut self) -> &mut dyn PropertyAccess {
        self.props.as_mut()
    }

    pub fn operators_mut(&mut self) -> &mut dyn OperatorRegistry {
        self.operators.as_mut()
    }

    // =========================================================================
    // Block lifecycle
    // =========================================================================

    /// Start declaring a block.
    ///
    /// The block drawn last frame under the same region and name becomes the
    /// old block and is reconciled into this one by [`end_block`]. Blocks
    /// built without a visible region are menus.
    ///
    /// [`end_block`]: UiRuntimeContext::end_block
    pub fn begin_block(&mut self, region: Option<&Region>, name: &str, emboss: Emboss) -> BlockId {
        let mut block = Block::new(name, emboss);
        let key = (region.map(|r| r.id), name.to_string());

        if let Some(&old_id) = self.blocks_by_name.get(&key) {
            if let Some(old) = self.arena.blocks.get_mut(old_id) {
                old.active = false;
                block.old_block = Some(old_id);
            }
        }

        match region {
            Some(region) => {
                block.region = Some(region.id);
                block.region_size = region.size;
                if !region.visible {
                    block.auto_open = true;
                    block.flag.insert(BlockFlags::LOOP);
                }
            }
            None => {
                block.auto_open = true;
                block.flag.insert(BlockFlags::LOOP);
            }
        }

        let id = self.arena.blocks.insert(block);
        self.blocks_by_name.insert(key, id);
        tracing::debug!("Begin block '{}' ({:?})", name, id);
        id
    }

    /// Append a button to a block that has not ended yet.
    ///
    /// The button joins the open alignment group, takes the block's emboss
    /// and is disabled when the block is locked or its property cannot be
    /// edited.
    pub fn add_button(&mut self, block_id: BlockId, mut but: Button) -> Result<ButtonId> {
        let block = self
            .arena
            .blocks
            .get(block_id)
            .ok_or(InterfaceError::StaleBlock)?;
        if block.ended {
            return Err(InterfaceError::BlockEnded(block.name.clone()));
        }

        but.block = block_id;
        but.emboss = block.emboss;
        if block.flag.contains(BlockFlags::ALIGN) {
            but.alignnr = block.alignnr;
        }
        if let Some(lock) = &block.lock {
            but.disable(lock.clone());
        }
        if let Some(prop) = &but.property {
            if !self.props.is_valid(prop) {
                but.disable("Property is not available");
            } else if self.props.is_hidden(prop) {
                but.disable("Property is hidden");
            }
        }
        if but.icon != ICON_NONE {
            but.flag.insert(ButtonFlags::HAS_ICON);
        }
        value::update_drawstr(&mut but, self.props.as_ref(), &self.config);

        let id = self.arena.buttons.insert(but);
        if let Some(block) = self.arena.blocks.get_mut(block_id) {
            block.buttons.push(id);
        }
        Ok(id)
    }

    /// Finalize a block.
    ///
    /// Reconciles it with last frame's block, refreshes its buttons, assigns
    /// menu accelerators and shortcut hints and resolves its rectangle. For
    /// popups placed at `mouse`, returns the mouse position that reproduces
    /// the final placement.
    ///
    /// A block whose rectangle is still empty after that switches to fixed
    /// bounds with no margin, and its bounds are recomputed right here from
    /// the buttons.
    pub fn end_block(&mut self, block_id: BlockId, mouse: Option<Point>) -> Result<Option<Point>> {
        let block = self
            .arena
            .blocks
            .get(block_id)
            .ok_or(InterfaceError::StaleBlock)?;
        if block.ended {
            return Err(InterfaceError::BlockEnded(block.name.clone()));
        }

        let stats = update_from_old_block(&mut self.arena, block_id);

        let ids: Vec<ButtonId> = self.arena.blocks[block_id].buttons.clone();
        self.refresh_drawstr(&ids);
        self.poll_operators(&ids);

        if self.arena.active_button.is_none() {
            let on_init = ids.iter().copied().find(|&id| {
                self.arena
                    .buttons
                    .get(id)
                    .map_or(false, |b| b.flag.contains(ButtonFlags::ACTIVATE_ON_INIT))
            });
            if let Some(id) = on_init {
                self.activate_button(id)?;
                if let Some(but) = self.arena.buttons.get_mut(id) {
                    but.flag.remove(ButtonFlags::ACTIVATE_ON_INIT);
                }
            }
        }

        let flag = self.arena.blocks[block_id].flag;
        if flag.contains(BlockFlags::LOOP) && !flag.contains(BlockFlags::NUMSELECT) {
            keyaccel::set_keyaccels(&mut self.arena, block_id);
        }
        if flag.intersects(BlockFlags::LOOP | BlockFlags::SHOW_SHORTCUT_ALWAYS) {
            let changed = shortcut::set_keymaps(&mut self.arena, block_id, self.keymap.as_ref());
            self.refresh_drawstr(&changed);
        }

        let env = bounds::BoundsEnv {
            config: &self.config,
            window: self.window_size,
            text: self.text.as_ref(),
        };
        let adjusted = bounds::resolve_bounds(&mut self.arena, block_id, mouse, &env);

        let unbounded = {
            let rect = self.arena.blocks[block_id].rect;
            rect.xmin() == 0.0 && rect.xmax() == 0.0
        };
        if unbounded {
            self.arena.blocks[block_id].bounds_set_normal(0.0);
            bounds::bounds_calc(&mut self.arena, block_id, &self.config);
        }

        if self.arena.blocks[block_id].flag.contains(BlockFlags::ALIGN) {
            self.align_end(block_id)?;
        }
        bounds::update_flexible_spacing(&mut self.arena, block_id, &self.config);

        let block = &mut self.arena.blocks[block_id];
        block.ended = true;
        log_end_block(block, &stats);
        Ok(adjusted)
    }

    pub fn is_ended(&self, block_id: BlockId) -> bool {
        self.arena.blocks.get(block_id).map_or(false, |b| b.ended)
    }

    /// Free blocks that were not drawn this frame, including the old blocks
    /// replaced by a redraw. Returns how many were freed.
    pub fn end_frame(&mut self) -> usize {
        let inactive: Vec<BlockId> = self
            .arena
            .blocks
            .iter()
            .filter(|(_, block)| !block.active)
            .map(|(id, _)| id)
            .collect();
        for &id in &inactive {
            self.arena.free_block(id);
        }
        for block in self.arena.blocks.values_mut() {
            block.active = false;
        }

        let blocks = &self.arena.blocks;
        self.blocks_by_name.retain(|_, id| blocks.contains_key(*id));

        if !inactive.is_empty() {
            tracing::debug!("End frame: freed {} blocks", inactive.len());
        }
        inactive.len()
    }

    /// Disable every button added from now on, showing `reason`; `None`
    /// lifts the lock
    pub fn lock(&mut self, block_id: BlockId, reason: Option<String>) -> Result<()> {
        let block = self.live_block_mut(block_id)?;
        block.lock = reason;
        Ok(())
    }

    /// Open a new alignment group; buttons added until [`align_end`] join it
    ///
    /// [`align_end`]: UiRuntimeContext::align_end
    pub fn align_begin(&mut self, block_id: BlockId) -> Result<()> {
        let block = self.live_block_mut(block_id)?;
        block.flag.insert(BlockFlags::ALIGN);
        block.alignnr = block.alignnr.wrapping_add(1);
        Ok(())
    }

    pub fn align_end(&mut self, block_id: BlockId) -> Result<()> {
        let block = self.live_block_mut(block_id)?;
        block.flag.remove(BlockFlags::ALIGN);
        Ok(())
    }

    /// Set the bounds policy applied by `end_block`
    pub fn set_bounds(&mut self, block_id: BlockId, bounds: BoundsCalc) -> Result<()> {
        let block = self.live_block_mut(block_id)?;
        block.bounds_type = bounds;
        Ok(())
    }

    fn live_block_mut(&mut self, block_id: BlockId) -> Result<&mut Block> {
        let block = self
            .arena
            .blocks
            .get_mut(block_id)
            .ok_or(InterfaceError::StaleBlock)?;
        if block.ended {
            return Err(InterfaceError::BlockEnded(block.name.clone()));
        }
        Ok(block)
    }

    // =========================================================================
    // Button store
    // =========================================================================

    /// Hold a reference to `button` that follows it across redraws
    pub fn register_button(&mut self, block_id: BlockId, button: ButtonId) -> Result<StoreSlot> {
        let UiArena { blocks, store, .. } = &mut self.arena;
        let block = blocks.get_mut(block_id).ok_or(InterfaceError::StaleBlock)?;
        if !block.buttons.contains(&button) {
            return Err(InterfaceError::StaleButton);
        }
        Ok(store.register(block_id, block, button))
    }

    pub fn unregister_button(&mut self, slot: StoreSlot) -> Result<()> {
        if !self.arena.store.contains(slot) {
            return Err(InterfaceError::StaleSlot);
        }
        if let Some(block_id) = self.arena.store.unregister(slot) {
            if let Some(block) = self.arena.blocks.get_mut(block_id) {
                block.butstore.retain(|&s| s != slot);
            }
        }
        Ok(())
    }

    /// The button a registered reference currently points at
    pub fn slot_button(&self, slot: StoreSlot) -> Option<ButtonId> {
        self.arena.store.get(slot)
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Make `button` the one being interacted with, releasing the previous one
    pub fn activate_button(&mut self, button: ButtonId) -> Result<()> {
        if !self.arena.buttons.contains_key(button) {
            return Err(InterfaceError::StaleButton);
        }
        if let Some(previous) = self.arena.active_button {
            if previous != button {
                self.deactivate_button(previous)?;
            }
        }

        let but = self
            .arena
            .buttons
            .get_mut(button)
            .ok_or(InterfaceError::StaleButton)?;
        if but.active.is_none() {
            let orig_value = value::value_get(but, self.props.as_ref());
            but.active = Some(Box::new(ActiveState {
                orig_value: Some(orig_value),
                ..Default::default()
            }));
        }
        but.flag.insert(ButtonFlags::ACTIVE);
        self.arena.active_button = Some(button);
        tracing::trace!("Activated button {:?}", button);
        Ok(())
    }

    /// End interaction with `button`, dropping any unapplied edit
    pub fn deactivate_button(&mut self, button: ButtonId) -> Result<()> {
        let but = self
            .arena
            .buttons
            .get_mut(button)
            .ok_or(InterfaceError::StaleButton)?;
        but.active = None;
        but.flag.remove(ButtonFlags::ACTIVE);
        value::update_drawstr(but, self.props.as_ref(), &self.config);
        if self.arena.active_button == Some(button) {
            self.arena.active_button = None;
        }
        Ok(())
    }

    pub fn active_button(&self) -> Option<ButtonId> {
        self.arena.active_button
    }

    /// Replace the text being typed into `button`, activating it if needed
    pub fn set_edit_string(&mut self, button: ButtonId, text: impl Into<String>) -> Result<()> {
        if self.arena.active_button != Some(button) {
            self.activate_button(button)?;
        }
        let but = self
            .arena
            .buttons
            .get_mut(button)
            .ok_or(InterfaceError::StaleButton)?;
        if let Some(state) = but.active.as_mut() {
            state.edit_str = Some(text.into());
        }
        value::update_drawstr(but, self.props.as_ref(), &self.config);
        Ok(())
    }

    pub fn value(&self, button: ButtonId) -> Result<f64> {
        let but = self
            .arena
            .buttons
            .get(button)
            .ok_or(InterfaceError::StaleButton)?;
        Ok(value::value_get(but, self.props.as_ref()))
    }

    /// Write `value` through the button and refresh what it draws
    pub fn set_value(&mut self, button: ButtonId, value: f64) -> Result<()> {
        let but = self
            .arena
            .buttons
            .get_mut(button)
            .ok_or(InterfaceError::StaleButton)?;
        value::value_set(but, self.props.as_mut(), value)?;
        value::update_drawstr(but, self.props.as_ref(), &self.config);
        Ok(())
    }

    /// Commit pending edits of `button` and run its handlers and operator.
    ///
    /// Returns the operator status when the button is bound to one.
    pub fn apply_button(&mut self, button: ButtonId) -> Result<Option<OperatorStatus>> {
        let but = self
            .arena
            .buttons
            .get_mut(button)
            .ok_or(InterfaceError::StaleButton)?;
        if but.is_disabled() {
            tracing::debug!("Not applying disabled button {:?}", button);
            return Ok(None);
        }

        let (edit_value, edit_str) = match but.active.as_mut() {
            Some(state) => (state.edit_value.take(), state.edit_str.take()),
            None => (None, None),
        };
        if let Some(edit_value) = edit_value {
            value::value_set(but, self.props.as_mut(), edit_value)?;
        }
        if let (Some(text), Some(prop)) = (edit_str, but.property) {
            self.props.set(&prop, PropertyValue::String(text))?;
            but.cached_value = None;
        }
        value::update_drawstr(but, self.props.as_ref(), &self.config);

        if let Some(handle) = but.handle.clone() {
            let (arg1, arg2) = but.handle_args;
            handle(arg1, arg2);
        }
        if let Some(handle_n) = but.handle_n.clone() {
            handle_n(but.handle_n_arg.as_deref_mut());
        }

        let status = but
            .operator
            .clone()
            .map(|op| self.operators.invoke(op.optype, op.context, &op.props));
        Ok(status)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn refresh_drawstr(&mut self, ids: &[ButtonId]) {
        for &id in ids {
            if let Some(but) = self.arena.buttons.get_mut(id) {
                value::update_drawstr(but, self.props.as_ref(), &self.config);
            }
        }
    }

    fn poll_operators(&mut self, ids: &[ButtonId]) {
        for &id in ids {
            let Some(but) = self.arena.buttons.get_mut(id) else {
                continue;
            };
            let Some(op) = &but.operator else {
                continue;
            };
            if but.is_disabled() || self.operators.poll(op.optype, op.context) {
                continue;
            }
            let reason = self
                .operators
                .poll_message(op.optype)
                .unwrap_or_else(|| OPERATOR_UNAVAILABLE.to_string());
            but.disable(reason);
        }
    }
}

fn log_end_block(block: &Block, stats: &ReconcileStats) {
    tracing::debug!(
        "End block '{}': {} buttons, {} matched, {} transplanted, rect {:?}",
        block.name,
        block.buttons.len(),
        stats.matched(),
        stats.transplanted,
        block.rect
    );
}
