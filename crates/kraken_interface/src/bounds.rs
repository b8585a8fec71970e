//! Block bounds
//!
//! Computes the rectangle a block occupies once all its buttons are known.
//! The block's [`BoundsCalc`] picks the strategy:
//!
//! - **Fixed**: union of the buttons grown by a margin
//! - **Text**: pack buttons into columns wide enough for their labels first
//! - **Popup**: place the block at the mouse and keep it inside the window
//! - **Centered / pie**: move the block to the window center or pie origin
//!
//! Every strategy ends in [`bounds_calc`], which also derives the safety rect
//! used for hit testing. It only reads button rectangles, so running it twice
//! gives the same result.

use kraken_core::{InterfaceConfig, Point, Rect, Size, TextMeasurer};

use crate::arena::UiArena;
use crate::block::{BlockId, BoundsCalc};
use crate::button::ButtonType;
use crate::flags::BlockFlags;

/// What the bounds passes need to know about the outside world
pub struct BoundsEnv<'a> {
    pub config: &'a InterfaceConfig,
    /// Window size in pixels
    pub window: Size,
    pub text: &'a dyn TextMeasurer,
}

// =============================================================================
// Strategy switch
// =============================================================================

/// Resolve the block rectangle according to its bounds mode.
///
/// Popups are placed relative to `mouse`; when one is given, the mouse
/// position that reproduces the final placement is returned.
pub fn resolve_bounds(
    arena: &mut UiArena,
    block_id: BlockId,
    mouse: Option<Point>,
    env: &BoundsEnv<'_>,
) -> Option<Point> {
    let bounds_type = arena.blocks.get(block_id)?.bounds_type;
    tracing::trace!("Resolving {:?} bounds for {:?}", bounds_type, block_id);

    match bounds_type {
        BoundsCalc::None => None,
        BoundsCalc::Fixed => {
            bounds_calc(arena, block_id, env.config);
            None
        }
        BoundsCalc::Text => {
            bounds_calc_text(arena, block_id, 0.0, env);
            bounds_calc(arena, block_id, env.config);
            None
        }
        BoundsCalc::PopupMouse | BoundsCalc::PopupMenu => {
            let adjusted =
                bounds_calc_popup(arena, block_id, mouse.unwrap_or(Point::ZERO), env);
            mouse.map(|_| adjusted)
        }
        BoundsCalc::PopupCenter => {
            bounds_calc_centered(arena, block_id, env);
            None
        }
        BoundsCalc::PieCenter => {
            bounds_calc_pie(arena, block_id, env.config);
            None
        }
        BoundsCalc::Explicit(rect) => {
            if let Some(block) = arena.blocks.get_mut(block_id) {
                block.rect = rect;
                block.safety = rect;
                block.bounds_type = BoundsCalc::None;
            }
            None
        }
    }
}

// =============================================================================
// Fixed
// =============================================================================

/// Union of button rectangles grown by the block margin.
///
/// An empty block takes the size of its panel. The width never drops below
/// `minbounds`.
pub fn bounds_calc(arena: &mut UiArena, block_id: BlockId, config: &InterfaceConfig) {
    let UiArena { blocks, buttons, .. } = arena;
    let Some(block) = blocks.get_mut(block_id) else {
        return;
    };

    if block.buttons.is_empty() {
        if let Some(panel) = block.panel_size {
            block.rect = panel.to_rect();
        }
    } else {
        let union = block
            .buttons
            .iter()
            .filter_map(|&id| buttons.get(id))
            .map(|but| but.rect)
            .reduce(|acc, rect| acc.union(&rect));
        if let Some(union) = union {
            block.rect = union.expand(block.bounds);
        }
    }

    let width = block.rect.width().max(block.minbounds);
    block.rect.set_xmax(block.rect.xmin() + width);
    block.safety = block.rect.expand(config.safety_margin);
}

// =============================================================================
// Text
// =============================================================================

/// A run of buttons laid out as one: a single button or a horizontal
/// alignment group
struct TextUnit {
    start: usize,
    end: usize,
    width: f32,
}

/// Widen buttons to fit their labels, packing them into columns.
///
/// Columns are detected from the declared layout: when the next button sits
/// to the right of the current one a new column starts. A button declared to
/// the left of its predecessor stays in the same column, so right-to-left
/// declarations do not split. Every button in a
/// column gets the width of the widest label plus the block margin; the last
/// column also honors `minbounds`.
pub fn bounds_calc_text(arena: &mut UiArena, block_id: BlockId, offset: f32, env: &BoundsEnv<'_>) {
    let UiArena { blocks, buttons, .. } = arena;
    let Some(block) = blocks.get(block_id) else {
        return;
    };
    let ids = block.buttons.clone();
    let (margin, minbounds) = (block.bounds, block.minbounds);

    let rects: Vec<Rect> = ids
        .iter()
        .map(|&id| buttons.get(id).map(|b| b.rect).unwrap_or_default())
        .collect();

    let mut units = Vec::new();
    let mut i = 0;
    while i < ids.len() {
        let start = i;
        let mut width = 0.0;
        loop {
            if let Some(but) = buttons.get(ids[i]) {
                if !but.button_type().is_separator() {
                    width += env.text.width(&but.drawstr, env.config.font_size);
                }
            }
            let joins_next = match (buttons.get(ids[i]), ids.get(i + 1).and_then(|&n| buttons.get(n))) {
                (Some(left), Some(right)) => {
                    left.alignnr != 0
                        && left.alignnr == right.alignnr
                        && left.rect.xmin() < right.rect.xmin()
                }
                _ => false,
            };
            if !joins_next {
                break;
            }
            i += 1;
        }
        units.push(TextUnit { start, end: i, width });
        i += 1;
    }

    let mut placements = Vec::with_capacity(units.len());
    let mut column_start = 0;
    let mut column_width: f32 = 0.0;
    let mut x = offset;
    for (u, unit) in units.iter().enumerate() {
        column_width = column_width.max(unit.width);
        let Some(next) = units.get(u + 1) else {
            break;
        };
        if rects[unit.end].xmin() < rects[next.start].xmin() {
            let xmax = x + column_width + margin;
            placements.push((column_start..=u, x, xmax));
            x = xmax;
            column_width = 0.0;
            column_start = u + 1;
        }
    }
    if column_start < units.len() {
        let xmax = (x + column_width + margin).max(offset + minbounds);
        placements.push((column_start..=units.len() - 1, x, xmax));
    }

    for (range, xmin, xmax) in placements {
        for unit in &units[range] {
            let dx = xmin - rects[unit.start].xmin();
            for index in unit.start..=unit.end {
                let Some(but) = buttons.get_mut(ids[index]) else {
                    continue;
                };
                if unit.start == unit.end {
                    but.rect = Rect::from_edges(xmin, but.rect.ymin(), xmax, but.rect.ymax());
                } else {
                    but.rect = but.rect.offset(dx, 0.0);
                    if index == unit.end && xmax > but.rect.xmin() {
                        but.rect.set_xmax(xmax);
                    }
                }
            }
        }
    }
}

// =============================================================================
// Popups
// =============================================================================

/// Place a popup at `mouse` and clamp it into the window.
///
/// The user offset was recorded against the block as it looked before text
/// packing, so it is scaled by how much the block grew. Returns the mouse
/// position that yields the final placement without clamping.
pub fn bounds_calc_popup(
    arena: &mut UiArena,
    block_id: BlockId,
    mouse: Point,
    env: &BoundsEnv<'_>,
) -> Point {
    let config = env.config;
    bounds_calc(arena, block_id, config);

    let Some(block) = arena.blocks.get(block_id) else {
        return mouse;
    };
    let old_size = block.rect.size();
    let old_xmin = block.rect.xmin();
    let is_menu = block.bounds_type == BoundsCalc::PopupMenu;
    let is_loop = block.flag.contains(BlockFlags::LOOP);
    let margin = block.bounds;

    // Menus first grow to fit their labels.
    if is_menu && is_loop {
        if let Some(block) = arena.blocks.get_mut(block_id) {
            block.bounds = config.menu_text_bounds();
        }
        bounds_calc_text(arena, block_id, old_xmin, env);
    }

    if let Some(block) = arena.blocks.get_mut(block_id) {
        block.bounds = margin;
    }
    bounds_calc(arena, block_id, config);

    let Some(block) = arena.blocks.get(block_id) else {
        return mouse;
    };
    let rect = block.rect;
    let (width, height) = (rect.width(), rect.height());
    let old_width = if old_size.width > 0.0 { old_size.width } else { width.max(1.0) };
    let old_height = if old_size.height > 0.0 { old_size.height } else { height.max(1.0) };

    let raw = Point::new(
        mouse.x + rect.xmin() + block.bounds_offset.x * width / old_width,
        mouse.y + rect.ymin() + block.bounds_offset.y * height / old_height,
    );

    let top = if is_menu {
        env.window.height - config.popup_menu_top
    } else {
        env.window.height - config.screen_margin
    };
    let limits = Rect::from_edges(
        config.screen_margin,
        config.screen_margin,
        env.window.width - config.screen_margin,
        top,
    );
    let placed = clamp_into(Rect::new(raw.x, raw.y, width, height), &limits);

    translate_block(
        arena,
        block_id,
        placed.xmin() - rect.xmin(),
        placed.ymin() - rect.ymin(),
    );
    bounds_calc(arena, block_id, config);

    tracing::debug!(
        "Placed popup {:?} at ({}, {})",
        block_id,
        placed.xmin(),
        placed.ymin()
    );

    Point::new(
        mouse.x + (placed.xmin() - raw.x),
        mouse.y + (placed.ymin() - raw.y),
    )
}

/// Shift `rect` into `limits`; the min edges win when it does not fit
fn clamp_into(rect: Rect, limits: &Rect) -> Rect {
    let mut rect = rect;
    if rect.xmax() > limits.xmax() {
        rect = rect.offset(limits.xmax() - rect.xmax(), 0.0);
    }
    if rect.xmin() < limits.xmin() {
        rect = rect.offset(limits.xmin() - rect.xmin(), 0.0);
    }
    if rect.ymax() > limits.ymax() {
        rect = rect.offset(0.0, limits.ymax() - rect.ymax());
    }
    if rect.ymin() < limits.ymin() {
        rect = rect.offset(0.0, limits.ymin() - rect.ymin());
    }
    rect
}

/// Center the block in the window
pub fn bounds_calc_centered(arena: &mut UiArena, block_id: BlockId, env: &BoundsEnv<'_>) {
    bounds_calc(arena, block_id, env.config);
    let Some(rect) = arena.blocks.get(block_id).map(|b| b.rect) else {
        return;
    };
    let start_x = env.window.width * 0.5 - rect.width() * 0.5;
    let start_y = env.window.height * 0.5 - rect.height() * 0.5;
    translate_block(arena, block_id, start_x - rect.xmin(), start_y - rect.ymin());
    bounds_calc(arena, block_id, env.config);
}

/// Move a pie menu to where it was spawned
pub fn bounds_calc_pie(arena: &mut UiArena, block_id: BlockId, config: &InterfaceConfig) {
    let Some(center) = arena.blocks.get(block_id).map(|b| b.pie_center_spawned) else {
        return;
    };
    translate_block(arena, block_id, center.x, center.y);
    bounds_calc(arena, block_id, config);
}

/// Move every button of the block, and the block rectangles, by `(dx, dy)`
pub fn translate_block(arena: &mut UiArena, block_id: BlockId, dx: f32, dy: f32) {
    let UiArena { blocks, buttons, .. } = arena;
    let Some(block) = blocks.get_mut(block_id) else {
        return;
    };
    for &id in &block.buttons {
        if let Some(but) = buttons.get_mut(id) {
            but.rect = but.rect.offset(dx, dy);
        }
    }
    block.rect = block.rect.offset(dx, dy);
    block.safety = block.safety.offset(dx, dy);
}

// =============================================================================
// Flexible spacing
// =============================================================================

/// Spread the free width of the region over the block's spacer buttons.
///
/// The region is split into one segment per spacer; each spacer grows until
/// the buttons following it reach the end of its segment, never using more
/// than the space left over.
pub fn update_flexible_spacing(arena: &mut UiArena, block_id: BlockId, config: &InterfaceConfig) {
    let header_offset = config.header_offset();
    let positions: Vec<f32>;
    let buttons_width;
    let region_width;
    {
        let Some(block) = arena.blocks.get(block_id) else {
            return;
        };
        positions = arena
            .block_buttons(block_id)
            .filter(|(_, but)| but.button_type() == ButtonType::SeparatorSpacer)
            .map(|(_, but)| but.rect.xmax() + header_offset)
            .collect();
        if positions.is_empty() {
            return;
        }
        let Some(last) = block.buttons.last().and_then(|&id| arena.buttons.get(id)) else {
            return;
        };
        buttons_width = last.rect.xmax() + header_offset;
        region_width = block.region_size.width;
    }
    if region_width <= buttons_width {
        return;
    }

    let count = positions.len();
    let segment_width = region_width / count as f32;
    let mut offset = 0.0;
    let mut remaining = region_width - buttons_width;
    let mut spacer = 0;

    let UiArena { blocks, buttons, .. } = arena;
    let Some(block) = blocks.get(block_id) else {
        return;
    };
    for &id in &block.buttons {
        let Some(but) = buttons.get_mut(id) else {
            continue;
        };
        but.rect = but.rect.offset(offset, 0.0);
        if but.button_type() != ButtonType::SeparatorSpacer {
            continue;
        }

        // How far the buttons after this spacer reach into its segment
        let overlap = if spacer == count - 1 {
            buttons_width - positions[spacer]
        } else {
            (positions[spacer + 1] - positions[spacer]) / 2.0
        };
        let segment_end = segment_width * (spacer + 1) as f32;
        // Positions were taken before any shifting
        let free = (segment_end - overlap - (positions[spacer] + offset)).max(0.0);
        let pixels = remaining.min(free);
        offset += pixels;
        remaining -= pixels;
        spacer += 1;
    }

    bounds_calc(arena, block_id, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::button::{Button, ButtonKind};
    use crate::flags::Emboss;
    use kraken_core::MonospaceTextMeasurer;

    fn block_with(rects: &[Rect]) -> (UiArena, BlockId) {
        let mut arena = UiArena::new();
        let id = arena.blocks.insert(Block::new("b", Emboss::Emboss));
        for &rect in rects {
            let but = arena.buttons.insert(Button::new(ButtonKind::But).rect(rect));
            arena.blocks[id].buttons.push(but);
        }
        (arena, id)
    }

    fn env<'a>(config: &'a InterfaceConfig, text: &'a dyn TextMeasurer, w: f32, h: f32) -> BoundsEnv<'a> {
        BoundsEnv {
            config,
            window: Size::new(w, h),
            text,
        }
    }

    #[test]
    fn test_fixed_bounds_union_and_margin() {
        let config = InterfaceConfig::default();
        let (mut arena, id) = block_with(&[
            Rect::new(0.0, 0.0, 50.0, 20.0),
            Rect::new(10.0, 20.0, 80.0, 20.0),
        ]);
        arena.blocks[id].bounds = 5.0;

        bounds_calc(&mut arena, id, &config);
        let block = &arena.blocks[id];
        assert_eq!(block.rect, Rect::from_edges(-5.0, -5.0, 95.0, 45.0));
        assert_eq!(block.safety, block.rect.expand(config.safety_margin));
    }

    #[test]
    fn test_fixed_bounds_idempotent() {
        let config = InterfaceConfig::default();
        let (mut arena, id) = block_with(&[Rect::new(3.0, 4.0, 30.0, 10.0)]);
        arena.blocks[id].bounds = 2.0;
        arena.blocks[id].minbounds = 100.0;

        bounds_calc(&mut arena, id, &config);
        let first = (arena.blocks[id].rect, arena.blocks[id].safety);
        bounds_calc(&mut arena, id, &config);
        assert_eq!((arena.blocks[id].rect, arena.blocks[id].safety), first);
        assert_eq!(first.0.width(), 100.0);
    }

    #[test]
    fn test_empty_block_uses_panel_size() {
        let config = InterfaceConfig::default();
        let (mut arena, id) = block_with(&[]);
        arena.blocks[id].panel_size = Some(Size::new(200.0, 120.0));
        bounds_calc(&mut arena, id, &config);
        assert_eq!(arena.blocks[id].rect, Rect::new(0.0, 0.0, 200.0, 120.0));
    }

    #[test]
    fn test_popup_clamped_into_window() {
        let mut config = InterfaceConfig::default();
        config.screen_margin = 8.0;
        let text = MonospaceTextMeasurer { advance: 6.0 };
        let (mut arena, id) = block_with(&[Rect::new(0.0, 0.0, 100.0, 40.0)]);
        arena.blocks[id].bounds_set_popup(0.0, None);

        let mouse = Point::new(790.0, 10.0);
        let adjusted = resolve_bounds(&mut arena, id, Some(mouse), &env(&config, &text, 800.0, 600.0));

        let rect = arena.blocks[id].rect;
        assert!(rect.xmax() <= 792.0);
        assert_eq!(rect.xmax(), 792.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.ymin(), 10.0);
        assert_eq!(adjusted, Some(Point::new(692.0, 10.0)));
        // buttons moved with the block
        let (_, but) = arena.block_buttons(id).next().unwrap();
        assert_eq!(but.rect, rect);
    }

    #[test]
    fn test_popup_without_mouse_reports_nothing() {
        let config = InterfaceConfig::default();
        let text = MonospaceTextMeasurer { advance: 6.0 };
        let (mut arena, id) = block_with(&[Rect::new(0.0, 0.0, 10.0, 10.0)]);
        arena.blocks[id].bounds_set_popup(0.0, None);
        let adjusted = resolve_bounds(&mut arena, id, None, &env(&config, &text, 800.0, 600.0));
        assert_eq!(adjusted, None);
        assert_eq!(arena.blocks[id].rect.xmin(), config.screen_margin);
    }

    #[test]
    fn test_popup_menu_keeps_top_margin() {
        let mut config = InterfaceConfig::default();
        config.popup_menu_top = 30.0;
        let text = MonospaceTextMeasurer { advance: 6.0 };
        let (mut arena, id) = block_with(&[Rect::new(0.0, 0.0, 100.0, 40.0)]);
        arena.blocks[id].bounds_set_menu(0.0, None);

        resolve_bounds(&mut arena, id, Some(Point::new(100.0, 590.0)), &env(&config, &text, 800.0, 600.0));
        assert_eq!(arena.blocks[id].rect.ymax(), 570.0);
    }

    #[test]
    fn test_popup_offset_scaled_by_growth() {
        let config = InterfaceConfig::default();
        let text = MonospaceTextMeasurer { advance: 10.0 };
        let (mut arena, id) = block_with(&[Rect::new(0.0, 0.0, 40.0, 20.0)]);
        let but = arena.blocks[id].buttons[0];
        arena.buttons[but].drawstr = "Twelve chars".to_string();
        arena.blocks[id].flag |= BlockFlags::LOOP;
        arena.blocks[id].bounds_set_menu(0.0, Some(Point::new(-20.0, 0.0)));

        resolve_bounds(&mut arena, id, Some(Point::new(400.0, 300.0)), &env(&config, &text, 800.0, 600.0));

        // 120px label + 50px menu padding, offset scaled from 40px to 170px
        let rect = arena.blocks[id].rect;
        assert_eq!(rect.width(), 170.0);
        assert_eq!(rect.xmin(), 400.0 - 20.0 * 170.0 / 40.0);
    }

    #[test]
    fn test_text_bounds_columns() {
        let mut config = InterfaceConfig::default();
        config.font_size = 10.0;
        let text = MonospaceTextMeasurer { advance: 10.0 };
        // two columns of two rows each
        let (mut arena, id) = block_with(&[
            Rect::new(0.0, 20.0, 10.0, 20.0),
            Rect::new(0.0, 0.0, 10.0, 20.0),
            Rect::new(50.0, 20.0, 10.0, 20.0),
            Rect::new(50.0, 0.0, 10.0, 20.0),
        ]);
        let labels = ["Open", "Recent Files", "Cut", "Copy"];
        let ids = arena.blocks[id].buttons.clone();
        for (bid, label) in ids.iter().zip(labels) {
            arena.buttons[*bid].drawstr = label.to_string();
        }
        arena.blocks[id].bounds_set_text(4.0);

        resolve_bounds(&mut arena, id, None, &env(&config, &text, 800.0, 600.0));

        let rects: Vec<Rect> = ids.iter().map(|&b| arena.buttons[b].rect).collect();
        assert_eq!((rects[0].xmin(), rects[0].xmax()), (0.0, 124.0));
        assert_eq!((rects[1].xmin(), rects[1].xmax()), (0.0, 124.0));
        assert_eq!((rects[2].xmin(), rects[2].xmax()), (124.0, 168.0));
        assert_eq!((rects[3].xmin(), rects[3].xmax()), (124.0, 168.0));
        assert_eq!(arena.blocks[id].rect.xmax(), 172.0);
    }

    #[test]
    fn test_text_bounds_leftward_button_stays_in_column() {
        let config = InterfaceConfig::default();
        let text = MonospaceTextMeasurer { advance: 10.0 };
        let (mut arena, id) = block_with(&[
            Rect::new(50.0, 0.0, 10.0, 20.0),
            Rect::new(0.0, 20.0, 10.0, 20.0),
        ]);
        let ids = arena.blocks[id].buttons.clone();
        for (bid, label) in ids.iter().zip(["Cut", "Open"]) {
            arena.buttons[*bid].drawstr = label.to_string();
        }

        bounds_calc_text(&mut arena, id, 0.0, &env(&config, &text, 800.0, 600.0));

        for bid in ids {
            let rect = arena.buttons[bid].rect;
            assert_eq!((rect.xmin(), rect.xmax()), (0.0, 40.0));
        }
    }

    #[test]
    fn test_text_bounds_keeps_aligned_row_together() {
        let config = InterfaceConfig::default();
        let text = MonospaceTextMeasurer { advance: 10.0 };
        let (mut arena, id) = block_with(&[
            Rect::new(0.0, 20.0, 30.0, 20.0),
            Rect::new(30.0, 20.0, 30.0, 20.0),
            Rect::new(0.0, 0.0, 60.0, 20.0),
        ]);
        let ids = arena.blocks[id].buttons.clone();
        for (bid, label) in ids.iter().zip(["X", "Y", "Long label"]) {
            arena.buttons[*bid].drawstr = label.to_string();
        }
        arena.buttons[ids[0]].alignnr = 1;
        arena.buttons[ids[1]].alignnr = 1;

        bounds_calc_text(&mut arena, id, 0.0, &env(&config, &text, 800.0, 600.0));

        // a single column, the row keeps its internal layout
        assert_eq!(arena.buttons[ids[0]].rect.xmin(), 0.0);
        assert_eq!(arena.buttons[ids[1]].rect.xmin(), 30.0);
        assert_eq!(arena.buttons[ids[1]].rect.xmax(), 100.0);
        assert_eq!(arena.buttons[ids[2]].rect.xmax(), 100.0);
    }

    #[test]
    fn test_centered_and_pie() {
        let config = InterfaceConfig::default();
        let text = MonospaceTextMeasurer { advance: 6.0 };
        let (mut arena, id) = block_with(&[Rect::new(0.0, 0.0, 100.0, 40.0)]);
        arena.blocks[id].bounds_set_centered(0.0);
        resolve_bounds(&mut arena, id, None, &env(&config, &text, 800.0, 600.0));
        assert_eq!(arena.blocks[id].rect, Rect::new(350.0, 280.0, 100.0, 40.0));

        let (mut arena, id) = block_with(&[Rect::new(-10.0, -10.0, 20.0, 20.0)]);
        arena.blocks[id].bounds_set_pie(Point::new(300.0, 200.0));
        resolve_bounds(&mut arena, id, None, &env(&config, &text, 800.0, 600.0));
        assert_eq!(arena.blocks[id].rect, Rect::new(290.0, 190.0, 20.0, 20.0));
    }

    #[test]
    fn test_explicit_bounds() {
        let config = InterfaceConfig::default();
        let text = MonospaceTextMeasurer { advance: 6.0 };
        let (mut arena, id) = block_with(&[Rect::new(0.0, 0.0, 10.0, 10.0)]);
        let rect = Rect::new(5.0, 5.0, 300.0, 200.0);
        arena.blocks[id].bounds_set_explicit(rect);
        resolve_bounds(&mut arena, id, None, &env(&config, &text, 800.0, 600.0));
        assert_eq!(arena.blocks[id].rect, rect);
        assert_eq!(arena.blocks[id].bounds_type, BoundsCalc::None);
    }

    #[test]
    fn test_flexible_spacing_pushes_trailing_buttons() {
        let config = InterfaceConfig::default();
        let mut arena = UiArena::new();
        let id = arena.blocks.insert(Block::new("header", Emboss::Emboss));
        let kinds = [
            (ButtonKind::But, Rect::from_edges(0.0, 0.0, 50.0, 20.0)),
            (ButtonKind::SeparatorSpacer, Rect::from_edges(50.0, 0.0, 60.0, 20.0)),
            (ButtonKind::But, Rect::from_edges(60.0, 0.0, 100.0, 20.0)),
        ];
        for (kind, rect) in kinds {
            let but = arena.buttons.insert(Button::new(kind).rect(rect));
            arena.blocks[id].buttons.push(but);
        }
        arena.blocks[id].region_size = Size::new(400.0, 30.0);

        update_flexible_spacing(&mut arena, id, &config);

        let ids = arena.blocks[id].buttons.clone();
        assert_eq!(arena.buttons[ids[0]].rect.xmin(), 0.0);
        assert_eq!(arena.buttons[ids[2]].rect.xmax(), 400.0 - config.header_offset());
    }

    #[test]
    fn test_flexible_spacing_splits_room_between_spacers() {
        let config = InterfaceConfig::default();
        let mut arena = UiArena::new();
        let id = arena.blocks.insert(Block::new("header", Emboss::Emboss));
        for i in 0..7 {
            let kind = if i % 2 == 1 {
                ButtonKind::SeparatorSpacer
            } else {
                ButtonKind::But
            };
            let x = 10.0 * i as f32;
            let but = arena
                .buttons
                .insert(Button::new(kind).rect(Rect::from_edges(x, 0.0, x + 10.0, 20.0)));
            arena.blocks[id].buttons.push(but);
        }
        arena.blocks[id].region_size = Size::new(600.0 + config.header_offset(), 30.0);

        update_flexible_spacing(&mut arena, id, &config);

        // Each spacer fills its third of the region, not the whole of it
        let ids = arena.blocks[id].buttons.clone();
        let xmin = |i: usize| arena.buttons[ids[i]].rect.xmin();
        assert_eq!(xmin(0), 0.0);
        assert!((xmin(2) - (20.0 + 164.667)).abs() < 1e-2);
        assert!((xmin(4) - (40.0 + 347.333)).abs() < 1e-2);
        assert!((xmin(6) - (60.0 + 530.0)).abs() < 1e-2);
        assert!((arena.buttons[ids[6]].rect.xmax() - 600.0).abs() < 1e-2);
    }

    #[test]
    fn test_flexible_spacing_needs_room() {
        let config = InterfaceConfig::default();
        let mut arena = UiArena::new();
        let id = arena.blocks.insert(Block::new("header", Emboss::Emboss));
        let spacer = arena.buttons.insert(
            Button::new(ButtonKind::SeparatorSpacer).rect(Rect::from_edges(0.0, 0.0, 10.0, 20.0)),
        );
        let tail = arena
            .buttons
            .insert(Button::new(ButtonKind::But).rect(Rect::from_edges(10.0, 0.0, 200.0, 20.0)));
        arena.blocks[id].buttons.extend([spacer, tail]);
        arena.blocks[id].region_size = Size::new(150.0, 30.0);

        update_flexible_spacing(&mut arena, id, &config);
        assert_eq!(arena.buttons[tail].rect.xmin(), 10.0);
    }
}
