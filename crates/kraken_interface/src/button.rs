//! Button record
//!
//! A [`Button`] describes one interactive element of a block: geometry,
//! label, where its value comes from, what runs when it is applied and the
//! type-specific payload carried in [`ButtonKind`].
//!
//! Buttons are rebuilt from scratch every frame. Everything transient that
//! must survive that (the edit state of an active button, tooltip wiring,
//! drag payloads, extra icon hover state) is owned by exactly one button at a
//! time and moved between buttons by the reconciler.
//!
//! # Example
//!
//! ```ignore
//! let but = Button::new(ButtonKind::Text)
//!     .label("Name")
//!     .rect(Rect::new(0.0, 0.0, 200.0, 20.0))
//!     .property(name_prop);
//! let id = ctx.add_button(block, but)?;
//! ```

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use kraken_core::{
    KeyModifiers, OperatorContext, OperatorTypeId, PropertyBag, PropertyRef, Rect,
};
use slotmap::new_key_type;

use crate::block::BlockId;
use crate::flags::{ButtonFlags, DrawFlags, Emboss, RadialDirection};
use crate::label::ButtonLabel;

new_key_type! {
    /// Handle to a button in the interface arena
    pub struct ButtonId;
}

/// Icon identifier, `ICON_NONE` when unset
pub type IconId = i32;

pub const ICON_NONE: IconId = 0;

// =============================================================================
// Callbacks
// =============================================================================

/// Argument passed to a legacy handler
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FuncArg {
    #[default]
    None,
    Value(usize),
    /// The button passes itself; never part of its identity
    SelfButton,
}

/// Legacy handler, called with the two stored arguments
pub type HandleFn = Rc<dyn Fn(FuncArg, FuncArg)>;

/// Generalized handler, called with the button-owned argument
pub type HandleNFn = Rc<dyn Fn(Option<&mut (dyn Any + 'static)>)>;

/// Custom identity test; must be symmetric
pub type IdentityCompareFn = Rc<dyn Fn(&Button, &Button) -> bool>;

/// Overrides the computed pushed state
pub type PushedStateFn = Rc<dyn Fn(&Button) -> bool>;

/// Builds tooltip text
pub type TooltipFn = Rc<dyn Fn(&Button, Option<&dyn Any>) -> String>;

/// Refreshes search results for a query
pub type SearchUpdateFn = Rc<dyn Fn(&str, &mut Vec<String>)>;

/// Tooltip wiring; the argument is released when the tooltip is dropped
pub struct Tooltip {
    pub func: TooltipFn,
    pub arg: Option<Box<dyn Any>>,
}

impl Tooltip {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Button, Option<&dyn Any>) -> String + 'static,
    {
        Self {
            func: Rc::new(func),
            arg: None,
        }
    }

    pub fn with_arg(mut self, arg: Box<dyn Any>) -> Self {
        self.arg = Some(arg);
        self
    }
}

impl fmt::Debug for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tooltip")
            .field("has_arg", &self.arg.is_some())
            .finish()
    }
}

// =============================================================================
// Value sources
// =============================================================================

/// Storage type of a raw value source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawType {
    Char,
    Short,
    Int,
    Float,
}

/// A shared typed value cell outside the stage
#[derive(Clone, Debug)]
pub struct RawSlot {
    pub cell: Rc<Cell<f64>>,
    pub ty: RawType,
}

impl RawSlot {
    pub fn new(ty: RawType, value: f64) -> Self {
        Self {
            cell: Rc::new(Cell::new(value)),
            ty,
        }
    }
}

/// Where a button without a stage property keeps its value
#[derive(Clone, Debug, Default)]
pub enum RawSource {
    #[default]
    None,
    /// The button stores its own value
    SelfValue { ty: RawType, value: f64 },
    Shared(RawSlot),
}

impl RawSource {
    pub fn raw_type(&self) -> Option<RawType> {
        match self {
            RawSource::None => None,
            RawSource::SelfValue { ty, .. } => Some(*ty),
            RawSource::Shared(slot) => Some(slot.ty),
        }
    }

    pub fn is_self_value(&self) -> bool {
        matches!(self, RawSource::SelfValue { .. })
    }

    /// Same storage location. A self value never equals another source.
    pub fn same_source(&self, other: &RawSource) -> bool {
        match (self, other) {
            (RawSource::None, RawSource::None) => true,
            (RawSource::Shared(a), RawSource::Shared(b)) => Rc::ptr_eq(&a.cell, &b.cell),
            _ => false,
        }
    }

    pub fn get(&self) -> Option<f64> {
        match self {
            RawSource::None => None,
            RawSource::SelfValue { value, .. } => Some(*value),
            RawSource::Shared(slot) => Some(slot.cell.get()),
        }
    }
}

// =============================================================================
// Attached objects
// =============================================================================

/// Operator run when the button is applied
#[derive(Clone, Debug)]
pub struct OperatorBinding {
    pub optype: OperatorTypeId,
    pub context: OperatorContext,
    pub props: PropertyBag,
}

impl OperatorBinding {
    pub fn new(optype: OperatorTypeId) -> Self {
        Self {
            optype,
            context: OperatorContext::default(),
            props: PropertyBag::new(),
        }
    }
}

/// Small operator icon drawn inside a button (e.g. "clear" in a text field)
#[derive(Clone, Debug)]
pub struct ExtraOpIcon {
    pub icon: IconId,
    pub optype: OperatorTypeId,
    pub props: PropertyBag,
    pub highlighted: bool,
    pub disabled: bool,
}

impl ExtraOpIcon {
    pub fn new(icon: IconId, optype: OperatorTypeId) -> Self {
        Self {
            icon,
            optype,
            props: PropertyBag::new(),
            highlighted: false,
            disabled: false,
        }
    }
}

/// What kind of data dragging the button produces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragKind {
    #[default]
    None,
    Id,
    Property,
    Path,
    Name,
    Value,
    Color,
    Asset,
}

/// Preview image shown while dragging
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

/// Drag wiring of a button
#[derive(Default)]
pub struct DragData {
    pub kind: DragKind,
    pub payload: Option<Box<dyn Any>>,
    pub image: Option<Box<ImageBuffer>>,
}

impl fmt::Debug for DragData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragData")
            .field("kind", &self.kind)
            .field("has_payload", &self.payload.is_some())
            .field("image", &self.image)
            .finish()
    }
}

/// Context entries the layout attaches to buttons
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextStore {
    pub entries: Vec<(String, PropertyRef)>,
}

/// Interaction state of the button the window system is handling
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveState {
    /// Text being typed, replaces the display string while set
    pub edit_str: Option<String>,
    /// Value being dragged/typed, overrides the stored value
    pub edit_value: Option<f64>,
    /// Value when interaction started
    pub orig_value: Option<f64>,
}

/// An item of a tree/grid view hosted by a button
pub trait ViewItem {
    /// Same logical item as `other`
    fn matches(&self, other: &dyn ViewItem) -> bool;

    fn is_active(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

// =============================================================================
// Button kinds
// =============================================================================

/// Stepping for number buttons
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberData {
    pub step_size: f32,
    /// Decimal places, `-1` picks a default
    pub precision: i32,
}

impl Default for NumberData {
    fn default() -> Self {
        Self {
            step_size: 1.0,
            precision: -1,
        }
    }
}

/// Search box state
#[derive(Default)]
pub struct SearchData {
    pub arg: Option<Box<dyn Any>>,
    pub update: Option<SearchUpdateFn>,
    pub results_are_suggestions: bool,
    /// Last results, kept while the menu is open
    pub items: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorData {
    pub is_palette_color: bool,
    pub palette_color_index: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressData {
    /// `0.0..=1.0`
    pub progress: f32,
}

#[derive(Clone, Default)]
pub struct ViewItemData {
    pub item: Option<Rc<dyn ViewItem>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HotkeyData {
    pub modifier_key: KeyModifiers,
}

/// Fieldless discriminant of [`ButtonKind`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonType {
    But,
    Num,
    NumSlider,
    Toggle,
    ToggleN,
    IconToggle,
    IconToggleN,
    Checkbox,
    CheckboxN,
    Row,
    ListRow,
    Menu,
    Pulldown,
    BlockMenu,
    Text,
    SearchMenu,
    Color,
    Tab,
    ProgressBar,
    ViewItem,
    HotkeyEvent,
    KeyEvent,
    Label,
    Separator,
    SeparatorLine,
    SeparatorSpacer,
    Image,
    HsvCube,
    HsvCircle,
    Scroll,
    Decorator,
}

impl ButtonType {
    pub fn is_separator(self) -> bool {
        matches!(
            self,
            ButtonType::Separator | ButtonType::SeparatorLine | ButtonType::SeparatorSpacer
        )
    }
}

/// Button variant with its payload
pub enum ButtonKind {
    But,
    Num(NumberData),
    NumSlider(NumberData),
    Toggle,
    ToggleN,
    IconToggle,
    IconToggleN,
    Checkbox,
    CheckboxN,
    Row,
    ListRow,
    Menu,
    Pulldown,
    /// Opens a sub-block
    BlockMenu,
    Text,
    SearchMenu(SearchData),
    Color(ColorData),
    Tab,
    ProgressBar(ProgressData),
    ViewItem(ViewItemData),
    HotkeyEvent(HotkeyData),
    KeyEvent,
    Label,
    Separator,
    SeparatorLine,
    /// Flexible spacer, absorbs free header space
    SeparatorSpacer,
    Image,
    HsvCube,
    HsvCircle,
    Scroll,
    Decorator,
}

impl ButtonKind {
    pub fn button_type(&self) -> ButtonType {
        match self {
            ButtonKind::But => ButtonType::But,
            ButtonKind::Num(_) => ButtonType::Num,
            ButtonKind::NumSlider(_) => ButtonType::NumSlider,
            ButtonKind::Toggle => ButtonType::Toggle,
            ButtonKind::ToggleN => ButtonType::ToggleN,
            ButtonKind::IconToggle => ButtonType::IconToggle,
            ButtonKind::IconToggleN => ButtonType::IconToggleN,
            ButtonKind::Checkbox => ButtonType::Checkbox,
            ButtonKind::CheckboxN => ButtonType::CheckboxN,
            ButtonKind::Row => ButtonType::Row,
            ButtonKind::ListRow => ButtonType::ListRow,
            ButtonKind::Menu => ButtonType::Menu,
            ButtonKind::Pulldown => ButtonType::Pulldown,
            ButtonKind::BlockMenu => ButtonType::BlockMenu,
            ButtonKind::Text => ButtonType::Text,
            ButtonKind::SearchMenu(_) => ButtonType::SearchMenu,
            ButtonKind::Color(_) => ButtonType::Color,
            ButtonKind::Tab => ButtonType::Tab,
            ButtonKind::ProgressBar(_) => ButtonType::ProgressBar,
            ButtonKind::ViewItem(_) => ButtonType::ViewItem,
            ButtonKind::HotkeyEvent(_) => ButtonType::HotkeyEvent,
            ButtonKind::KeyEvent => ButtonType::KeyEvent,
            ButtonKind::Label => ButtonType::Label,
            ButtonKind::Separator => ButtonType::Separator,
            ButtonKind::SeparatorLine => ButtonType::SeparatorLine,
            ButtonKind::SeparatorSpacer => ButtonType::SeparatorSpacer,
            ButtonKind::Image => ButtonType::Image,
            ButtonKind::HsvCube => ButtonType::HsvCube,
            ButtonKind::HsvCircle => ButtonType::HsvCircle,
            ButtonKind::Scroll => ButtonType::Scroll,
            ButtonKind::Decorator => ButtonType::Decorator,
        }
    }

    pub fn number(&self) -> Option<&NumberData> {
        match self {
            ButtonKind::Num(data) | ButtonKind::NumSlider(data) => Some(data),
            _ => None,
        }
    }

    pub fn search(&self) -> Option<&SearchData> {
        match self {
            ButtonKind::SearchMenu(data) => Some(data),
            _ => None,
        }
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchData> {
        match self {
            ButtonKind::SearchMenu(data) => Some(data),
            _ => None,
        }
    }

    pub fn progress_mut(&mut self) -> Option<&mut ProgressData> {
        match self {
            ButtonKind::ProgressBar(data) => Some(data),
            _ => None,
        }
    }

    pub fn view_item(&self) -> Option<&ViewItemData> {
        match self {
            ButtonKind::ViewItem(data) => Some(data),
            _ => None,
        }
    }

    pub fn view_item_mut(&mut self) -> Option<&mut ViewItemData> {
        match self {
            ButtonKind::ViewItem(data) => Some(data),
            _ => None,
        }
    }

    pub fn hotkey(&self) -> Option<&HotkeyData> {
        match self {
            ButtonKind::HotkeyEvent(data) => Some(data),
            _ => None,
        }
    }

    /// Search payload; panics naming both kinds when the button is something else
    pub fn expect_search_mut(&mut self) -> &mut SearchData {
        let ty = self.button_type();
        match self {
            ButtonKind::SearchMenu(data) => data,
            _ => panic!("expected a SearchMenu button, found {:?}", ty),
        }
    }

    /// Progress payload; panics naming both kinds when the button is something else
    pub fn expect_progress(&self) -> &ProgressData {
        match self {
            ButtonKind::ProgressBar(data) => data,
            other => panic!(
                "expected a ProgressBar button, found {:?}",
                other.button_type()
            ),
        }
    }
}

impl fmt::Debug for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonKind::Num(data) | ButtonKind::NumSlider(data) => f
                .debug_tuple(&format!("{:?}", self.button_type()))
                .field(data)
                .finish(),
            ButtonKind::ProgressBar(data) => f.debug_tuple("ProgressBar").field(data).finish(),
            ButtonKind::Color(data) => f.debug_tuple("Color").field(data).finish(),
            ButtonKind::HotkeyEvent(data) => f.debug_tuple("HotkeyEvent").field(data).finish(),
            _ => write!(f, "{:?}", self.button_type()),
        }
    }
}

// =============================================================================
// Button
// =============================================================================

/// One interactive element
pub struct Button {
    pub kind: ButtonKind,
    /// Block-local geometry
    pub rect: Rect,
    pub flag: ButtonFlags,
    pub drawflag: DrawFlags,
    pub emboss: Emboss,
    pub pie_dir: RadialDirection,

    pub label: ButtonLabel,
    /// Text actually drawn, rebuilt from label and value
    pub drawstr: String,
    pub icon: IconId,
    pub iconadd: i32,
    pub alignnr: u16,
    /// Explicit keyboard accelerator
    pub menu_key: Option<char>,
    pub retval: i32,

    pub property: Option<PropertyRef>,
    pub raw: RawSource,
    /// Bit tested for bit-toggle buttons
    pub bit: Option<u8>,
    pub hardmin: f32,
    pub hardmax: f32,
    pub softmin: f32,
    pub softmax: f32,
    /// Last value read or written, `None` when it must be re-read
    pub cached_value: Option<f64>,

    pub handle: Option<HandleFn>,
    pub handle_args: (FuncArg, FuncArg),
    pub handle_n: Option<HandleNFn>,
    pub handle_n_arg: Option<Box<dyn Any>>,
    pub operator: Option<OperatorBinding>,
    pub identity_cmp: Option<IdentityCompareFn>,
    pub pushed_state: Option<PushedStateFn>,

    pub tooltip: Option<Tooltip>,
    pub drag: DragData,
    pub extra_op_icons: Vec<ExtraOpIcon>,
    pub context: Option<Rc<ContextStore>>,
    pub disabled_info: Option<String>,

    pub active: Option<Box<ActiveState>>,
    /// Owning block, set when the button is added
    pub block: BlockId,
}

impl Button {
    pub fn new(kind: ButtonKind) -> Self {
        Self {
            kind,
            rect: Rect::ZERO,
            flag: ButtonFlags::empty(),
            drawflag: DrawFlags::empty(),
            emboss: Emboss::Emboss,
            pie_dir: RadialDirection::None,
            label: ButtonLabel::default(),
            drawstr: String::new(),
            icon: ICON_NONE,
            iconadd: 0,
            alignnr: 0,
            menu_key: None,
            retval: 0,
            property: None,
            raw: RawSource::None,
            bit: None,
            hardmin: f32::MIN,
            hardmax: f32::MAX,
            softmin: f32::MIN,
            softmax: f32::MAX,
            cached_value: None,
            handle: None,
            handle_args: (FuncArg::None, FuncArg::None),
            handle_n: None,
            handle_n_arg: None,
            operator: None,
            identity_cmp: None,
            pushed_state: None,
            tooltip: None,
            drag: DragData::default(),
            extra_op_icons: Vec::new(),
            context: None,
            disabled_info: None,
            active: None,
            block: BlockId::default(),
        }
    }

    pub fn button_type(&self) -> ButtonType {
        self.kind.button_type()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.active
            .as_ref()
            .map_or(false, |state| state.edit_str.is_some())
    }

    pub fn is_disabled(&self) -> bool {
        self.flag.contains(ButtonFlags::DISABLED)
    }

    /// Disable with a reason shown in the tooltip
    pub fn disable(&mut self, reason: impl Into<String>) {
        self.flag.insert(ButtonFlags::DISABLED);
        self.disabled_info = Some(reason.into());
    }

    pub fn tooltip_text(&self) -> Option<String> {
        self.tooltip
            .as_ref()
            .map(|tip| (tip.func)(self, tip.arg.as_deref()))
    }

    /// Label text without a shortcut hint.
    ///
    /// Only labels flagged `HAS_SEP_CHAR` carry a hint; any other label is
    /// returned whole, separator characters included.
    pub fn label_without_sep_char(&self) -> &str {
        if self.flag.contains(ButtonFlags::HAS_SEP_CHAR) {
            self.label.without_shortcut()
        } else {
            self.label.as_str()
        }
    }

    pub fn shortcut_hint(&self) -> Option<&str> {
        if self.flag.contains(ButtonFlags::HAS_SEP_CHAR) {
            self.label.shortcut()
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    pub fn label(mut self, text: &str) -> Self {
        self.label.set(text);
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn icon(mut self, icon: IconId) -> Self {
        self.icon = icon;
        self
    }

    pub fn property(mut self, prop: PropertyRef) -> Self {
        self.property = Some(prop);
        self
    }

    pub fn raw(mut self, slot: RawSlot) -> Self {
        self.raw = RawSource::Shared(slot);
        self
    }

    /// Store the value inside the button itself
    pub fn self_value(mut self, ty: RawType, value: f64) -> Self {
        self.raw = RawSource::SelfValue { ty, value };
        self
    }

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.hardmin = min;
        self.hardmax = max;
        self.softmin = min;
        self.softmax = max;
        self
    }

    pub fn bit(mut self, bit: u8) -> Self {
        self.bit = Some(bit);
        self
    }

    pub fn retval(mut self, retval: i32) -> Self {
        self.retval = retval;
        self
    }

    pub fn menu_key(mut self, key: char) -> Self {
        self.menu_key = Some(key);
        self
    }

    pub fn pie_dir(mut self, dir: RadialDirection) -> Self {
        self.pie_dir = dir;
        self
    }

    pub fn flag(mut self, flag: ButtonFlags) -> Self {
        self.flag.insert(flag);
        self
    }

    pub fn drawflag(mut self, flag: DrawFlags) -> Self {
        self.drawflag.insert(flag);
        self
    }

    pub fn on_apply<F>(mut self, handle: F, arg1: FuncArg, arg2: FuncArg) -> Self
    where
        F: Fn(FuncArg, FuncArg) + 'static,
    {
        self.handle = Some(Rc::new(handle));
        self.handle_args = (arg1, arg2);
        self
    }

    /// Use an existing legacy handler, keeping its identity
    pub fn handle(mut self, handle: HandleFn, arg1: FuncArg, arg2: FuncArg) -> Self {
        self.handle = Some(handle);
        self.handle_args = (arg1, arg2);
        self
    }

    /// Use an existing generalized handler with an owned argument
    pub fn handle_n(mut self, handle: HandleNFn, arg: Option<Box<dyn Any>>) -> Self {
        self.handle_n = Some(handle);
        self.handle_n_arg = arg;
        self
    }

    pub fn operator(mut self, binding: OperatorBinding) -> Self {
        self.operator = Some(binding);
        self
    }

    pub fn identity_cmp(mut self, cmp: IdentityCompareFn) -> Self {
        self.identity_cmp = Some(cmp);
        self
    }

    pub fn pushed_state(mut self, func: PushedStateFn) -> Self {
        self.pushed_state = Some(func);
        self
    }

    pub fn tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn drag(mut self, kind: DragKind, payload: Option<Box<dyn Any>>) -> Self {
        self.drag.kind = kind;
        self.drag.payload = payload;
        self
    }

    pub fn drag_image(mut self, image: ImageBuffer) -> Self {
        self.drag.image = Some(Box::new(image));
        self
    }

    pub fn extra_op_icon(mut self, icon: ExtraOpIcon) -> Self {
        self.extra_op_icons.push(icon);
        self
    }

    pub fn context(mut self, context: Rc<ContextStore>) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("rect", &self.rect)
            .field("flag", &self.flag)
            .field("active", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_discriminant() {
        assert_eq!(
            ButtonKind::Num(NumberData::default()).button_type(),
            ButtonType::Num
        );
        assert_eq!(
            ButtonKind::SearchMenu(SearchData::default()).button_type(),
            ButtonType::SearchMenu
        );
        assert!(ButtonType::SeparatorSpacer.is_separator());
        assert!(!ButtonType::Label.is_separator());
    }

    #[test]
    fn test_separator_in_plain_label_is_text() {
        let plain = Button::new(ButtonKind::But).label("Input|Output");
        assert_eq!(plain.label_without_sep_char(), "Input|Output");
        assert_eq!(plain.shortcut_hint(), None);

        let hinted = Button::new(ButtonKind::But)
            .label("Input|Output|Ctrl I")
            .flag(ButtonFlags::HAS_SEP_CHAR);
        assert_eq!(hinted.label_without_sep_char(), "Input|Output");
        assert_eq!(hinted.shortcut_hint(), Some("Ctrl I"));
    }

    #[test]
    fn test_raw_source_identity() {
        let slot = RawSlot::new(RawType::Int, 3.0);
        let a = RawSource::Shared(slot.clone());
        let b = RawSource::Shared(slot);
        let c = RawSource::Shared(RawSlot::new(RawType::Int, 3.0));
        assert!(a.same_source(&b));
        assert!(!a.same_source(&c));
        assert!(RawSource::None.same_source(&RawSource::None));

        let s = RawSource::SelfValue {
            ty: RawType::Int,
            value: 0.0,
        };
        assert!(!s.same_source(&s.clone()));
        assert_eq!(s.raw_type(), Some(RawType::Int));
    }

    #[test]
    fn test_builder() {
        let but = Button::new(ButtonKind::But)
            .label("Open")
            .rect(Rect::new(0.0, 0.0, 100.0, 20.0))
            .retval(4)
            .menu_key('o');
        assert_eq!(but.label.as_str(), "Open");
        assert_eq!(but.retval, 4);
        assert_eq!(but.menu_key, Some('o'));
        assert!(!but.is_active());
    }

    #[test]
    fn test_tooltip_text() {
        let but = Button::new(ButtonKind::But).label("Render").tooltip(
            Tooltip::new(|b, arg| {
                let n = arg.and_then(|a| a.downcast_ref::<i32>()).copied().unwrap_or(0);
                format!("{} ({})", b.label, n)
            })
            .with_arg(Box::new(7i32)),
        );
        assert_eq!(but.tooltip_text().as_deref(), Some("Render (7)"));
    }

    #[test]
    #[should_panic(expected = "expected a ProgressBar button, found Label")]
    fn test_expect_wrong_kind_panics() {
        ButtonKind::Label.expect_progress();
    }
}
