//! Whole frames driven through `UiRuntimeContext`

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use kraken_core::{
    InterfaceConfig, MemoryStage, OperatorStatus, OperatorTable, OperatorType, Point, PrimId,
    PropertyAccess, PropertyDef, PropertyRef, PropertyType, PropertyValue, Rect, Size,
};

use crate::block::{BlockId, BoundsCalc, Region};
use crate::button::{Button, ButtonId, ButtonKind, FuncArg, OperatorBinding};
use crate::error::InterfaceError;
use crate::flags::{BlockFlags, ButtonFlags, Emboss};
use crate::runtime::UiRuntimeContext;

fn context() -> UiRuntimeContext {
    UiRuntimeContext::new(InterfaceConfig::default(), Size::new(800.0, 600.0))
}

fn string_stage(initial: &str) -> (MemoryStage, PropertyRef) {
    let mut stage = MemoryStage::new();
    let prim = stage.add_prim("/World/Cube");
    let prop = PropertyRef::new(prim, stage.define(PropertyDef::new("name", PropertyType::String)));
    stage.insert(prop, PropertyValue::String(initial.to_string()));
    (stage, prop)
}

fn text_frame(ctx: &mut UiRuntimeContext, region: &Region, prop: PropertyRef) -> (BlockId, ButtonId) {
    let block = ctx.begin_block(Some(region), "properties", Emboss::Emboss);
    let but = ctx
        .add_button(
            block,
            Button::new(ButtonKind::Text)
                .rect(Rect::new(0.0, 0.0, 120.0, 20.0))
                .property(prop),
        )
        .unwrap();
    ctx.end_block(block, None).unwrap();
    (block, but)
}

fn tools_frame(ctx: &mut UiRuntimeContext, region: &Region) -> (BlockId, Vec<ButtonId>) {
    let block = ctx.begin_block(Some(region), "tools", Emboss::Emboss);
    let ids = (1..=3)
        .map(|i| {
            ctx.add_button(
                block,
                Button::new(ButtonKind::But)
                    .label(&format!("Tool {}", i))
                    .retval(i)
                    .rect(Rect::new(0.0, 20.0 * i as f32, 80.0, 20.0)),
            )
            .unwrap()
        })
        .collect();
    ctx.end_block(block, None).unwrap();
    (block, ids)
}

#[test]
fn test_text_edit_survives_redraw() {
    let (stage, prop) = string_stage("abc");
    let mut ctx = context().with_properties(stage);
    let region = Region::new(1, 400.0, 300.0);

    let (first_block, editing) = text_frame(&mut ctx, &region, prop);
    assert_eq!(ctx.button(editing).unwrap().drawstr, "abc");
    ctx.set_edit_string(editing, "abc_extra").unwrap();
    assert!(ctx.button(editing).unwrap().is_editing());
    assert_eq!(ctx.button(editing).unwrap().drawstr, "");
    assert_eq!(ctx.end_frame(), 0);

    // Something else changes the property between frames.
    ctx.properties_mut()
        .set(&prop, PropertyValue::String("abcd".into()))
        .unwrap();
    let (second_block, declared) = text_frame(&mut ctx, &region, prop);

    // The button being edited survives, the redeclared one is discarded.
    assert!(ctx.button(declared).is_none());
    let ids: Vec<ButtonId> = ctx.block_buttons(second_block).map(|(id, _)| id).collect();
    assert_eq!(ids, vec![editing]);
    assert!(ctx.block(first_block).unwrap().is_empty());
    assert_eq!(ctx.active_button(), Some(editing));

    let survivor = ctx.button(editing).unwrap();
    assert_eq!(survivor.block, second_block);
    assert_eq!(
        survivor.active.as_ref().and_then(|s| s.edit_str.as_deref()),
        Some("abc_extra")
    );

    assert_eq!(ctx.end_frame(), 1);
    assert!(ctx.block(first_block).is_none());

    ctx.deactivate_button(editing).unwrap();
    assert_eq!(ctx.active_button(), None);
    assert_eq!(ctx.button(editing).unwrap().drawstr, "abcd");
}

#[test]
fn test_store_slot_follows_button_until_block_freed() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);

    let (block, ids) = tools_frame(&mut ctx, &region);
    let slot = ctx.register_button(block, ids[1]).unwrap();
    assert_eq!(ctx.slot_button(slot), Some(ids[1]));
    ctx.end_frame();

    let (_, redrawn) = tools_frame(&mut ctx, &region);
    assert_eq!(ctx.slot_button(slot), Some(redrawn[1]));
    assert!(ctx.button(ids[1]).is_none());
    ctx.end_frame();

    // Not redrawn this frame: freed along with its slots.
    assert_eq!(ctx.end_frame(), 1);
    assert_eq!(ctx.slot_button(slot), None);
    assert!(ctx.find_block(Some(region.id), "tools").is_none());

    ctx.unregister_button(slot).unwrap();
    assert_eq!(ctx.unregister_button(slot), Err(InterfaceError::StaleSlot));
}

#[test]
fn test_store_slot_keeps_active_button_across_redraw() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);

    let (block, ids) = tools_frame(&mut ctx, &region);
    let slot = ctx.register_button(block, ids[1]).unwrap();
    ctx.activate_button(ids[1]).unwrap();
    ctx.end_frame();

    // The active button object survives; its redeclaration is dropped.
    let (block, redrawn) = tools_frame(&mut ctx, &region);
    assert_eq!(ctx.slot_button(slot), Some(ids[1]));
    assert!(ctx.button(redrawn[1]).is_none());
    assert_eq!(ctx.active_button(), Some(ids[1]));
    let buttons: Vec<ButtonId> = ctx.block_buttons(block).map(|(id, _)| id).collect();
    assert_eq!(buttons, vec![redrawn[0], ids[1], redrawn[2]]);

    // Freeing the previous generation leaves the slot alone.
    ctx.end_frame();
    assert_eq!(ctx.slot_button(slot), Some(ids[1]));

    assert_eq!(ctx.end_frame(), 1);
    assert_eq!(ctx.slot_button(slot), None);
    assert_eq!(ctx.active_button(), None);
}

#[test]
fn test_register_foreign_button() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);
    let (block, _) = tools_frame(&mut ctx, &region);
    let other = ctx.begin_block(Some(&region), "other", Emboss::Emboss);
    let foreign = ctx.add_button(other, Button::new(ButtonKind::But)).unwrap();

    assert_eq!(
        ctx.register_button(block, foreign),
        Err(InterfaceError::StaleButton)
    );
}

#[test]
fn test_file_menu_accelerators() {
    let mut ctx = context();
    let block = ctx.begin_block(None, "file_menu", Emboss::Pulldown);
    for (i, label) in ["Open", "Save", "Save As", "Quit"].into_iter().enumerate() {
        ctx.add_button(
            block,
            Button::new(ButtonKind::But)
                .label(label)
                .rect(Rect::new(0.0, -20.0 * i as f32, 100.0, 20.0)),
        )
        .unwrap();
    }
    ctx.end_block(block, None).unwrap();

    let keys: Vec<Option<char>> = ctx.block_buttons(block).map(|(_, b)| b.menu_key).collect();
    assert_eq!(keys, vec![Some('O'), Some('S'), Some('A'), Some('Q')]);

    let menu = ctx.block(block).unwrap();
    assert!(menu.flag.contains(BlockFlags::LOOP));
    assert!(menu.auto_open);
    // Nothing chose a bounds mode, so the buttons' union is used.
    assert_eq!(menu.bounds_type, BoundsCalc::Fixed);
    assert_eq!(menu.rect, Rect::from_edges(0.0, -60.0, 100.0, 20.0));
    assert!(menu.ended);
}

#[test]
fn test_numselect_menu_has_no_accelerators() {
    let mut ctx = context();
    let block = ctx.begin_block(None, "numbers", Emboss::Pulldown);
    ctx.block_mut(block).unwrap().flag.insert(BlockFlags::NUMSELECT);
    ctx.add_button(block, Button::new(ButtonKind::But).label("One"))
        .unwrap();
    ctx.end_block(block, None).unwrap();
    assert_eq!(ctx.block_buttons(block).next().unwrap().1.menu_key, None);
}

#[test]
fn test_popup_clamped_at_window_edge() {
    let mut config = InterfaceConfig::default();
    config.screen_margin = 8.0;
    let mut ctx = UiRuntimeContext::new(config, Size::new(800.0, 600.0));

    let block = ctx.begin_block(None, "popup", Emboss::Emboss);
    ctx.add_button(
        block,
        Button::new(ButtonKind::But).rect(Rect::new(0.0, 0.0, 100.0, 40.0)),
    )
    .unwrap();
    ctx.block_mut(block).unwrap().bounds_set_popup(0.0, None);

    let adjusted = ctx.end_block(block, Some(Point::new(790.0, 10.0))).unwrap();
    assert_eq!(adjusted, Some(Point::new(692.0, 10.0)));

    let rect = ctx.block(block).unwrap().rect;
    assert_eq!(rect.xmax(), 792.0);
    assert_eq!(rect.width(), 100.0);
    assert_eq!(rect.ymin(), 10.0);
}

#[test]
fn test_ended_and_stale_blocks_rejected() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "panel", Emboss::Emboss);
    ctx.end_block(block, None).unwrap();
    assert!(ctx.is_ended(block));

    assert_eq!(
        ctx.add_button(block, Button::new(ButtonKind::But)),
        Err(InterfaceError::BlockEnded("panel".into()))
    );
    assert_eq!(
        ctx.end_block(block, None),
        Err(InterfaceError::BlockEnded("panel".into()))
    );

    ctx.end_frame();
    ctx.end_frame();
    assert!(!ctx.is_ended(block));
    assert_eq!(
        ctx.add_button(block, Button::new(ButtonKind::But)),
        Err(InterfaceError::StaleBlock)
    );
    assert_eq!(ctx.end_block(block, None), Err(InterfaceError::StaleBlock));
}

#[test]
fn test_unbounded_block_gets_fixed_bounds() {
    let config = InterfaceConfig::default();
    let safety_margin = config.safety_margin;
    let mut ctx = UiRuntimeContext::new(config, Size::new(800.0, 600.0));
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "loose", Emboss::Emboss);
    ctx.add_button(
        block,
        Button::new(ButtonKind::But).rect(Rect::new(10.0, 0.0, 100.0, 20.0)),
    )
    .unwrap();

    ctx.end_block(block, None).unwrap();

    let block = ctx.block(block).unwrap();
    assert_eq!(block.bounds_type, BoundsCalc::Fixed);
    assert_eq!((block.rect.xmin(), block.rect.xmax()), (10.0, 110.0));
    assert_eq!((block.rect.ymin(), block.rect.ymax()), (0.0, 20.0));
    assert_eq!(block.safety.xmin(), 10.0 - safety_margin);
}

#[test]
fn test_end_frame_keeps_redrawn_blocks() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);
    for name in ["header", "sidebar"] {
        let block = ctx.begin_block(Some(&region), name, Emboss::Emboss);
        ctx.end_block(block, None).unwrap();
    }
    assert_eq!(ctx.end_frame(), 0);

    let header = ctx.begin_block(Some(&region), "header", Emboss::Emboss);
    ctx.end_block(header, None).unwrap();

    // The old header and the sidebar that was not redrawn
    assert_eq!(ctx.end_frame(), 2);
    assert_eq!(ctx.find_block(Some(region.id), "header"), Some(header));
    assert_eq!(ctx.find_block(Some(region.id), "sidebar"), None);
}

#[test]
fn test_failing_poll_disables_button() {
    let mut ops = OperatorTable::new();
    let delete = ops.register(
        OperatorType::new("OBJECT_OT_delete")
            .with_poll(|_| false)
            .with_poll_message("No object selected"),
    );
    let locked = ops.register(OperatorType::new("WM_OT_locked").with_poll(|_| false));
    let open = ops.register(
        OperatorType::new("WM_OT_open").with_exec(|_| OperatorStatus::Finished),
    );

    let mut ctx = context().with_operators(ops);
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "toolbar", Emboss::Emboss);
    let ids: Vec<ButtonId> = [delete, locked, open]
        .into_iter()
        .map(|op| {
            ctx.add_button(
                block,
                Button::new(ButtonKind::But).operator(OperatorBinding::new(op)),
            )
            .unwrap()
        })
        .collect();
    ctx.end_block(block, None).unwrap();

    let info: Vec<Option<&str>> = ids
        .iter()
        .map(|&id| ctx.button(id).unwrap().disabled_info.as_deref())
        .collect();
    assert_eq!(
        info,
        vec![Some("No object selected"), Some("Operator unavailable"), None]
    );
    assert!(ctx.button(ids[0]).unwrap().is_disabled());

    assert_eq!(ctx.apply_button(ids[0]), Ok(None));
    assert_eq!(ctx.apply_button(ids[2]), Ok(Some(OperatorStatus::Finished)));
}

#[test]
fn test_lock_and_property_state_disable_buttons() {
    let mut stage = MemoryStage::new();
    let prim = stage.add_prim("/World/Cube");
    let hidden = PropertyRef::new(
        prim,
        stage.define(PropertyDef::new("secret", PropertyType::Float).hidden()),
    );
    let orphan = PropertyRef::new(
        PrimId::default(),
        stage.define(PropertyDef::new("size", PropertyType::Float)),
    );
    let mut ctx = context().with_properties(stage);
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "panel", Emboss::Emboss);

    ctx.lock(block, Some("Library data is read-only".into())).unwrap();
    let locked = ctx.add_button(block, Button::new(ButtonKind::But)).unwrap();
    ctx.lock(block, None).unwrap();
    let free = ctx.add_button(block, Button::new(ButtonKind::But)).unwrap();
    let hidden = ctx
        .add_button(block, Button::new(ButtonKind::Num(Default::default())).property(hidden))
        .unwrap();
    let orphan = ctx
        .add_button(block, Button::new(ButtonKind::Num(Default::default())).property(orphan))
        .unwrap();

    let info = |id| ctx.button(id).unwrap().disabled_info.clone();
    assert_eq!(info(locked).as_deref(), Some("Library data is read-only"));
    assert_eq!(info(free), None);
    assert_eq!(info(hidden).as_deref(), Some("Property is hidden"));
    assert_eq!(info(orphan).as_deref(), Some("Property is not available"));
}

#[test]
fn test_alignment_groups() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "row", Emboss::Emboss);

    let loose = ctx.add_button(block, Button::new(ButtonKind::But)).unwrap();
    ctx.align_begin(block).unwrap();
    let first = ctx.add_button(block, Button::new(ButtonKind::But)).unwrap();
    ctx.align_end(block).unwrap();
    ctx.align_begin(block).unwrap();
    let second = ctx.add_button(block, Button::new(ButtonKind::But)).unwrap();

    assert_eq!(ctx.button(loose).unwrap().alignnr, 0);
    assert_eq!(ctx.button(first).unwrap().alignnr, 1);
    assert_eq!(ctx.button(second).unwrap().alignnr, 2);

    // end_block closes the group left open
    ctx.end_block(block, None).unwrap();
    assert!(!ctx.block(block).unwrap().flag.contains(BlockFlags::ALIGN));
}

#[test]
fn test_block_emboss_and_icon_flag() {
    let mut ctx = context();
    let block = ctx.begin_block(None, "pie", Emboss::Radial);
    let but = ctx
        .add_button(block, Button::new(ButtonKind::But).icon(42))
        .unwrap();
    let but = ctx.button(but).unwrap();
    assert_eq!(but.emboss, Emboss::Radial);
    assert!(but.flag.contains(ButtonFlags::HAS_ICON));
    assert_eq!(but.block, block);
}

#[test]
fn test_activate_on_init() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "search", Emboss::Emboss);
    ctx.add_button(block, Button::new(ButtonKind::Label).label("Find"))
        .unwrap();
    let field = ctx
        .add_button(
            block,
            Button::new(ButtonKind::Text).flag(ButtonFlags::ACTIVATE_ON_INIT),
        )
        .unwrap();
    ctx.end_block(block, None).unwrap();

    assert_eq!(ctx.active_button(), Some(field));
    let field = ctx.button(field).unwrap();
    assert!(field.flag.contains(ButtonFlags::ACTIVE));
    assert!(!field.flag.contains(ButtonFlags::ACTIVATE_ON_INIT));
}

#[test]
fn test_only_one_active_button() {
    let mut ctx = context();
    let region = Region::new(1, 400.0, 300.0);
    let (_, ids) = tools_frame(&mut ctx, &region);

    ctx.activate_button(ids[0]).unwrap();
    ctx.activate_button(ids[2]).unwrap();
    assert!(!ctx.button(ids[0]).unwrap().is_active());
    assert!(!ctx.button(ids[0]).unwrap().flag.contains(ButtonFlags::ACTIVE));
    assert_eq!(ctx.active_button(), Some(ids[2]));
}

#[test]
fn test_apply_commits_edit_and_runs_handlers() {
    let (stage, prop) = string_stage("Cube");
    let mut ctx = context().with_properties(stage);
    let region = Region::new(1, 400.0, 300.0);

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let block = ctx.begin_block(Some(&region), "properties", Emboss::Emboss);
    let field = ctx
        .add_button(
            block,
            Button::new(ButtonKind::Text)
                .label("Name: ")
                .property(prop)
                .on_apply(
                    move |_, _| counter.set(counter.get() + 1),
                    FuncArg::Value(7),
                    FuncArg::None,
                )
                .handle_n(
                    Rc::new(|arg: Option<&mut (dyn Any + 'static)>| {
                        if let Some(n) = arg.and_then(|a| a.downcast_mut::<usize>()) {
                            *n += 1;
                        }
                    }),
                    Some(Box::new(0usize)),
                ),
        )
        .unwrap();
    ctx.end_block(block, None).unwrap();

    ctx.set_edit_string(field, "Sphere").unwrap();
    assert_eq!(ctx.apply_button(field), Ok(None));

    assert_eq!(
        ctx.properties().get(&prop),
        Some(PropertyValue::String("Sphere".into()))
    );
    let but = ctx.button(field).unwrap();
    assert_eq!(but.drawstr, "Name: Sphere");
    assert!(!but.is_editing());
    assert_eq!(calls.get(), 1);
    assert_eq!(
        but.handle_n_arg
            .as_ref()
            .and_then(|arg| arg.downcast_ref::<usize>()),
        Some(&1)
    );
}

#[test]
fn test_set_value_writes_property() {
    let mut stage = MemoryStage::new();
    let prim = stage.add_prim("/World/Light");
    let prop = PropertyRef::new(
        prim,
        stage.define(PropertyDef::new("intensity", PropertyType::Float)),
    );
    stage.insert(prop, PropertyValue::Float(1.0));
    let mut ctx = context().with_properties(stage);
    let region = Region::new(1, 400.0, 300.0);
    let block = ctx.begin_block(Some(&region), "light", Emboss::Emboss);
    let num = ctx
        .add_button(block, Button::new(ButtonKind::Num(Default::default())).property(prop))
        .unwrap();

    ctx.set_value(num, 2.5).unwrap();
    assert_eq!(ctx.value(num), Ok(2.5));
    assert_eq!(ctx.properties().get(&prop), Some(PropertyValue::Float(2.5)));
    assert_eq!(ctx.value(ButtonId::default()), Err(InterfaceError::StaleButton));
}
