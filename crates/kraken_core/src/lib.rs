//! Kraken Core
//!
//! Shared foundations for the Kraken interface:
//!
//! - **Geometry**: points, sizes and edge-addressable rectangles
//! - **Configuration**: layout constants loaded from TOML
//! - **Scene seam**: typed property access backed by the stage
//! - **Operator seam**: operator lookup/poll/invoke and keymap shortcuts
//! - **Text measurement**: label widths for text-driven layout
//!
//! # Example
//!
//! ```rust
//! use kraken_core::scene::{MemoryStage, PropertyAccess, PropertyDef, PropertyRef, PropertyType, PropertyValue};
//!
//! let mut stage = MemoryStage::new();
//! let prim = stage.add_prim("/World/Light");
//! let prop = stage.define(PropertyDef::new("intensity", PropertyType::Float));
//! let intensity = PropertyRef::new(prim, prop);
//!
//! stage.set(&intensity, PropertyValue::Float(4.0)).unwrap();
//! assert_eq!(stage.get(&intensity), Some(PropertyValue::Float(4.0)));
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod operator;
pub mod scene;
pub mod text_measure;

pub use config::{FactorDisplay, InterfaceConfig};
pub use error::{ConfigError, PropertyError};
pub use geometry::{Point, Rect, Size};
pub use logging::init_logging;
pub use operator::{
    key_event_string, EmptyKeymap, KeyModifiers, KeymapLookup, KeymapTable, OperatorContext,
    OperatorRegistry, OperatorStatus, OperatorTable, OperatorType, OperatorTypeId, PropertyBag,
};
pub use scene::{
    MemoryStage, PrimId, PropId, PropertyAccess, PropertyDef, PropertyRef, PropertySubtype,
    PropertyType, PropertyValue,
};
pub use text_measure::{EstimatedTextMeasurer, MonospaceTextMeasurer, TextMeasurer, TextMetrics};
