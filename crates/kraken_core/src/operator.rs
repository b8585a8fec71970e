//! Operator and keymap seams
//!
//! Buttons may be bound to an operator. The interface never runs operators
//! during layout; it only asks whether they can run ([`OperatorRegistry::poll`])
//! and which shortcut triggers them ([`KeymapLookup`]).

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::scene::{PropertyRef, PropertyValue};

new_key_type! {
    /// Handle to a registered operator type
    pub struct OperatorTypeId;
}

/// Execution context an operator is called in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OperatorContext {
    #[default]
    InvokeDefault,
    InvokeRegionWin,
    InvokeArea,
    ExecDefault,
    ExecRegionWin,
}

/// Result of running an operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorStatus {
    Finished,
    Cancelled,
    RunningModal,
    PassThrough,
}

/// Named arguments passed to an operator
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lookup, poll and invoke operators
pub trait OperatorRegistry {
    fn find(&self, idname: &str) -> Option<OperatorTypeId>;

    /// Whether the operator can run in `context`
    fn poll(&self, op: OperatorTypeId, context: OperatorContext) -> bool;

    /// Reason reported to the user when `poll` fails
    fn poll_message(&self, op: OperatorTypeId) -> Option<String> {
        let _ = op;
        None
    }

    fn invoke(
        &mut self,
        op: OperatorTypeId,
        context: OperatorContext,
        props: &PropertyBag,
    ) -> OperatorStatus;

    fn idname(&self, op: OperatorTypeId) -> Option<&str>;
}

pub type PollFn = Rc<dyn Fn(OperatorContext) -> bool>;
pub type ExecFn = Rc<dyn Fn(&PropertyBag) -> OperatorStatus>;

/// A registered operator type
#[derive(Clone)]
pub struct OperatorType {
    pub idname: String,
    pub poll: Option<PollFn>,
    pub poll_message: Option<String>,
    pub exec: Option<ExecFn>,
}

impl fmt::Debug for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorType")
            .field("idname", &self.idname)
            .field("has_poll", &self.poll.is_some())
            .field("has_exec", &self.exec.is_some())
            .finish()
    }
}

impl OperatorType {
    pub fn new(idname: impl Into<String>) -> Self {
        Self {
            idname: idname.into(),
            poll: None,
            poll_message: None,
            exec: None,
        }
    }

    pub fn with_poll<F>(mut self, poll: F) -> Self
    where
        F: Fn(OperatorContext) -> bool + 'static,
    {
        self.poll = Some(Rc::new(poll));
        self
    }

    pub fn with_poll_message(mut self, msg: impl Into<String>) -> Self {
        self.poll_message = Some(msg.into());
        self
    }

    pub fn with_exec<F>(mut self, exec: F) -> Self
    where
        F: Fn(&PropertyBag) -> OperatorStatus + 'static,
    {
        self.exec = Some(Rc::new(exec));
        self
    }
}

/// In-memory operator registry
#[derive(Default)]
pub struct OperatorTable {
    types: SlotMap<OperatorTypeId, OperatorType>,
    by_name: FxHashMap<String, OperatorTypeId>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ot: OperatorType) -> OperatorTypeId {
        let name = ot.idname.clone();
        let id = self.types.insert(ot);
        if self.by_name.insert(name.clone(), id).is_some() {
            tracing::warn!("Operator {} registered twice, newest wins", name);
        }
        id
    }
}

impl OperatorRegistry for OperatorTable {
    fn find(&self, idname: &str) -> Option<OperatorTypeId> {
        self.by_name.get(idname).copied()
    }

    fn poll(&self, op: OperatorTypeId, context: OperatorContext) -> bool {
        match self.types.get(op) {
            Some(ot) => ot.poll.as_ref().map_or(true, |poll| poll(context)),
            None => false,
        }
    }

    fn poll_message(&self, op: OperatorTypeId) -> Option<String> {
        self.types.get(op).and_then(|ot| ot.poll_message.clone())
    }

    fn invoke(
        &mut self,
        op: OperatorTypeId,
        context: OperatorContext,
        props: &PropertyBag,
    ) -> OperatorStatus {
        if !self.poll(op, context) {
            return OperatorStatus::Cancelled;
        }
        match self.types.get(op).and_then(|ot| ot.exec.clone()) {
            Some(exec) => exec(props),
            None => OperatorStatus::PassThrough,
        }
    }

    fn idname(&self, op: OperatorTypeId) -> Option<&str> {
        self.types.get(op).map(|ot| ot.idname.as_str())
    }
}

// =============================================================================
// Keymaps
// =============================================================================

bitflags! {
    /// Keyboard modifier state
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const OSKEY = 1 << 3;
    }
}

/// Resolve keyboard shortcuts for display next to button labels
pub trait KeymapLookup {
    /// Shortcut bound to an operator (with matching properties, when given)
    fn operator_shortcut(&self, op: OperatorTypeId, props: Option<&PropertyBag>) -> Option<String>;

    /// Shortcut bound to toggling or setting a property
    fn property_shortcut(&self, prop: &PropertyRef) -> Option<String>;
}

/// Keymap that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyKeymap;

impl KeymapLookup for EmptyKeymap {
    fn operator_shortcut(&self, _op: OperatorTypeId, _props: Option<&PropertyBag>) -> Option<String> {
        None
    }

    fn property_shortcut(&self, _prop: &PropertyRef) -> Option<String> {
        None
    }
}

/// In-memory keymap
#[derive(Debug, Default)]
pub struct KeymapTable {
    operators: FxHashMap<OperatorTypeId, String>,
    properties: FxHashMap<PropertyRef, String>,
}

impl KeymapTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_operator(&mut self, op: OperatorTypeId, shortcut: impl Into<String>) {
        self.operators.insert(op, shortcut.into());
    }

    pub fn bind_property(&mut self, prop: PropertyRef, shortcut: impl Into<String>) {
        self.properties.insert(prop, shortcut.into());
    }
}

impl KeymapLookup for KeymapTable {
    fn operator_shortcut(&self, op: OperatorTypeId, _props: Option<&PropertyBag>) -> Option<String> {
        self.operators.get(&op).cloned()
    }

    fn property_shortcut(&self, prop: &PropertyRef) -> Option<String> {
        self.properties.get(prop).cloned()
    }
}

/// Human readable name of a key code.
///
/// Codes follow ASCII for printable keys; anything else renders as its number.
pub fn key_event_string(code: i32) -> String {
    match code {
        0 => String::new(),
        8 => "Backspace".to_string(),
        9 => "Tab".to_string(),
        13 => "Return".to_string(),
        27 => "Esc".to_string(),
        32 => "Space".to_string(),
        127 => "Delete".to_string(),
        33..=126 => {
            let c = code as u8 as char;
            c.to_ascii_uppercase().to_string()
        }
        _ => format!("Key {}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_register_and_find() {
        let mut table = OperatorTable::new();
        let id = table.register(OperatorType::new("WM_OT_open"));
        assert_eq!(table.find("WM_OT_open"), Some(id));
        assert_eq!(table.find("WM_OT_missing"), None);
        assert_eq!(table.idname(id), Some("WM_OT_open"));
    }

    #[test]
    fn test_poll_and_invoke() {
        let ran = Rc::new(Cell::new(0));
        let ran_in = ran.clone();
        let mut table = OperatorTable::new();
        let id = table.register(
            OperatorType::new("OBJECT_OT_delete")
                .with_poll(|ctx| ctx == OperatorContext::ExecDefault)
                .with_poll_message("Nothing selected")
                .with_exec(move |_| {
                    ran_in.set(ran_in.get() + 1);
                    OperatorStatus::Finished
                }),
        );

        assert!(!table.poll(id, OperatorContext::InvokeDefault));
        assert_eq!(table.poll_message(id).as_deref(), Some("Nothing selected"));
        assert_eq!(
            table.invoke(id, OperatorContext::InvokeDefault, &PropertyBag::new()),
            OperatorStatus::Cancelled
        );
        assert_eq!(
            table.invoke(id, OperatorContext::ExecDefault, &PropertyBag::new()),
            OperatorStatus::Finished
        );
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn test_property_bag_overwrites() {
        let mut bag = PropertyBag::new().with("mode", PropertyValue::Int(1));
        bag.set("mode", PropertyValue::Int(2));
        assert_eq!(bag.get("mode"), Some(&PropertyValue::Int(2)));
    }

    #[test]
    fn test_key_event_string() {
        assert_eq!(key_event_string('a' as i32), "A");
        assert_eq!(key_event_string(32), "Space");
        assert_eq!(key_event_string(0), "");
    }
}
