//! Scene-graph property seam
//!
//! Buttons read and write their values through [`PropertyAccess`]. The real
//! implementation sits on top of the USD stage; [`MemoryStage`] is a headless
//! stand-in that keeps values in a hash map, used by tests and demos.
//!
//! A [`PropertyRef`] is a plain `(prim, property, index)` triple. Two buttons
//! whose triples are equal display the same value, which is what the
//! interface's identity matching relies on.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::PropertyError;

new_key_type! {
    /// Handle to a prim on the stage
    pub struct PrimId;

    /// Handle to a property definition
    pub struct PropId;
}

/// Where a button's value lives on the stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    pub prim: PrimId,
    pub prop: PropId,
    /// Array element, `-1` for non-array properties
    pub index: i32,
}

impl PropertyRef {
    pub fn new(prim: PrimId, prop: PropId) -> Self {
        Self {
            prim,
            prop,
            index: -1,
        }
    }

    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }
}

/// Property storage types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Bool,
    Int,
    Float,
    Enum,
    /// Enum stored as a bit set
    EnumFlag,
    String,
    Pointer,
    Collection,
}

/// Display hint for numeric properties
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropertySubtype {
    #[default]
    None,
    Percentage,
    Pixel,
    Factor,
}

/// A typed property value
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Enum(i32),
    String(String),
}

impl PropertyValue {
    /// Numeric view used by number buttons, `None` for strings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            PropertyValue::Int(i) | PropertyValue::Enum(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f as f64),
            PropertyValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a numeric value into the storage representation of `ty`
    pub fn from_f64(ty: PropertyType, value: f64) -> Option<Self> {
        match ty {
            PropertyType::Bool => Some(PropertyValue::Bool(value != 0.0)),
            PropertyType::Int => Some(PropertyValue::Int(value.round() as i32)),
            PropertyType::Float => Some(PropertyValue::Float(value as f32)),
            PropertyType::Enum | PropertyType::EnumFlag => {
                Some(PropertyValue::Enum(value.round() as i32))
            }
            _ => None,
        }
    }
}

/// Read/write access to stage properties
pub trait PropertyAccess {
    fn get(&self, prop: &PropertyRef) -> Option<PropertyValue>;

    fn set(&mut self, prop: &PropertyRef, value: PropertyValue) -> Result<(), PropertyError>;

    fn property_type(&self, prop: &PropertyRef) -> Option<PropertyType>;

    /// Hard range as `(min, max)`
    fn range(&self, prop: &PropertyRef) -> Option<(f64, f64)>;

    fn subtype(&self, prop: &PropertyRef) -> PropertySubtype {
        let _ = prop;
        PropertySubtype::None
    }

    fn is_hidden(&self, prop: &PropertyRef) -> bool;

    fn is_valid(&self, prop: &PropertyRef) -> bool;

    /// UI name of the property, used as a fallback label
    fn display_name(&self, prop: &PropertyRef) -> Option<String> {
        let _ = prop;
        None
    }
}

// =============================================================================
// MemoryStage
// =============================================================================

/// Definition of a property on the in-memory stage
#[derive(Clone, Debug)]
pub struct PropertyDef {
    pub name: String,
    pub ty: PropertyType,
    pub subtype: PropertySubtype,
    pub range: (f64, f64),
    pub hidden: bool,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, ty: PropertyType) -> Self {
        Self {
            name: name.into(),
            ty,
            subtype: PropertySubtype::None,
            range: (f64::from(f32::MIN), f64::from(f32::MAX)),
            hidden: false,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn with_subtype(mut self, subtype: PropertySubtype) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Clone, Debug)]
struct Prim {
    path: String,
}

/// Headless property store
#[derive(Default)]
pub struct MemoryStage {
    prims: SlotMap<PrimId, Prim>,
    props: SlotMap<PropId, PropertyDef>,
    values: FxHashMap<PropertyRef, PropertyValue>,
    writes: usize,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prim(&mut self, path: impl Into<String>) -> PrimId {
        self.prims.insert(Prim { path: path.into() })
    }

    pub fn prim_path(&self, prim: PrimId) -> Option<&str> {
        self.prims.get(prim).map(|p| p.path.as_str())
    }

    pub fn define(&mut self, def: PropertyDef) -> PropId {
        self.props.insert(def)
    }

    /// Seed a value without counting it as a write
    pub fn insert(&mut self, prop: PropertyRef, value: PropertyValue) {
        self.values.insert(prop, value);
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn def(&self, prop: &PropertyRef) -> Option<&PropertyDef> {
        if !self.prims.contains_key(prop.prim) {
            return None;
        }
        self.props.get(prop.prop)
    }
}

impl PropertyAccess for MemoryStage {
    fn get(&self, prop: &PropertyRef) -> Option<PropertyValue> {
        self.values.get(prop).cloned()
    }

    fn set(&mut self, prop: &PropertyRef, value: PropertyValue) -> Result<(), PropertyError> {
        let def = self
            .def(prop)
            .ok_or_else(|| PropertyError::Unknown(format!("{:?}", prop.prop)))?;
        if def.hidden {
            return Err(PropertyError::Hidden(def.name.clone()));
        }
        let expected = match def.ty {
            PropertyType::Bool => "bool",
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::Enum | PropertyType::EnumFlag => "enum",
            PropertyType::String => "string",
            PropertyType::Pointer | PropertyType::Collection => "pointer",
        };
        let ok = matches!(
            (def.ty, &value),
            (PropertyType::Bool, PropertyValue::Bool(_))
                | (PropertyType::Int, PropertyValue::Int(_))
                | (PropertyType::Float, PropertyValue::Float(_))
                | (PropertyType::Enum, PropertyValue::Enum(_))
                | (PropertyType::EnumFlag, PropertyValue::Enum(_))
                | (PropertyType::String, PropertyValue::String(_))
        );
        if !ok {
            return Err(PropertyError::TypeMismatch {
                prop: def.name.clone(),
                expected,
            });
        }
        self.values.insert(*prop, value);
        self.writes += 1;
        Ok(())
    }

    fn property_type(&self, prop: &PropertyRef) -> Option<PropertyType> {
        self.def(prop).map(|d| d.ty)
    }

    fn range(&self, prop: &PropertyRef) -> Option<(f64, f64)> {
        self.def(prop).map(|d| d.range)
    }

    fn subtype(&self, prop: &PropertyRef) -> PropertySubtype {
        self.def(prop).map(|d| d.subtype).unwrap_or_default()
    }

    fn is_hidden(&self, prop: &PropertyRef) -> bool {
        self.def(prop).map(|d| d.hidden).unwrap_or(false)
    }

    fn is_valid(&self, prop: &PropertyRef) -> bool {
        self.def(prop).is_some()
    }

    fn display_name(&self, prop: &PropertyRef) -> Option<String> {
        self.def(prop).map(|d| d.name.clone())
    }
}
