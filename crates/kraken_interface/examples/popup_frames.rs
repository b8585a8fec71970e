//! Popup Frames Demo
//!
//! Redraws a popup menu over a few frames and prints what the interface keeps
//! between them:
//! - accelerator keys and shortcut hints assigned on the first frame
//! - the hovered entry surviving a redraw that reorders the menu
//! - placement clamped into the window
//!
//! Run with: cargo run -p kraken_interface --example popup_frames [config.toml]
//! Set `RUST_LOG=kraken_interface=trace` to watch reconciliation.

use std::path::Path;

use anyhow::Result;
use kraken_core::{
    init_logging, InterfaceConfig, KeymapTable, OperatorStatus, OperatorTable, OperatorType,
    Point, Rect, Size,
};
use kraken_interface::{
    BlockId, Button, ButtonKind, Emboss, OperatorBinding, UiRuntimeContext,
};
use tracing::info;

const ENTRY_HEIGHT: f32 = 20.0;

fn main() -> Result<()> {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => InterfaceConfig::load(Path::new(&path))?,
        None => InterfaceConfig::default(),
    };

    let mut operators = OperatorTable::new();
    let mut keymap = KeymapTable::new();
    let mut entries = Vec::new();
    for (label, idname, shortcut) in [
        ("Open", "WM_OT_open_mainfile", Some("Ctrl O")),
        ("Save", "WM_OT_save_mainfile", Some("Ctrl S")),
        ("Save As", "WM_OT_save_as_mainfile", Some("Shift Ctrl S")),
        ("Quit", "WM_OT_quit", None),
    ] {
        let op = operators.register(
            OperatorType::new(idname).with_exec(|_| OperatorStatus::Finished),
        );
        if let Some(shortcut) = shortcut {
            keymap.bind_operator(op, shortcut);
        }
        entries.push((label, op));
    }

    let mut ctx = UiRuntimeContext::new(config, Size::new(800.0, 600.0))
        .with_operators(operators)
        .with_keymap(keymap);

    let mouse = Point::new(760.0, 40.0);
    let menu = draw_menu(&mut ctx, &entries, mouse)?;
    report(&ctx, menu);

    // Hover "Save", then redraw with the entries reversed.
    let save = ctx
        .block_buttons(menu)
        .nth(1)
        .map(|(id, _)| id)
        .ok_or_else(|| anyhow::anyhow!("menu has no second entry"))?;
    ctx.activate_button(save)?;
    ctx.end_frame();

    entries.reverse();
    let menu = draw_menu(&mut ctx, &entries, mouse)?;
    report(&ctx, menu);
    info!(
        "Hovered entry kept its button: {}",
        ctx.block_buttons(menu).any(|(id, _)| id == save)
    );

    if let Some(status) = ctx.apply_button(save)? {
        info!("Applied 'Save': {:?}", status);
    }
    ctx.end_frame();
    Ok(())
}

fn draw_menu(
    ctx: &mut UiRuntimeContext,
    entries: &[(&str, kraken_core::OperatorTypeId)],
    mouse: Point,
) -> Result<BlockId> {
    let menu = ctx.begin_block(None, "file_menu", Emboss::Pulldown);
    for (i, (label, op)) in entries.iter().enumerate() {
        let rect = Rect::new(0.0, -ENTRY_HEIGHT * i as f32, 100.0, ENTRY_HEIGHT);
        ctx.add_button(
            menu,
            Button::new(ButtonKind::But)
                .label(label)
                .rect(rect)
                .operator(OperatorBinding::new(*op)),
        )?;
    }
    if let Some(block) = ctx.block_mut(menu) {
        block.bounds_set_menu(4.0, None);
    }
    let adjusted = ctx.end_block(menu, Some(mouse))?;
    info!("Mouse {:?} adjusted to {:?}", mouse, adjusted);
    Ok(menu)
}

fn report(ctx: &UiRuntimeContext, menu: BlockId) {
    if let Some(block) = ctx.block(menu) {
        info!("Menu rect {:?}", block.rect);
    }
    for (id, but) in ctx.block_buttons(menu) {
        info!(
            "  {:?} '{}' key={:?} active={}",
            id,
            but.label,
            but.menu_key,
            but.is_active()
        );
    }
}
