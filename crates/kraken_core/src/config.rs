//! Interface configuration
//!
//! Sizes and margins the layout passes depend on. Everything has a sensible
//! default so an empty `interface.toml` (or none at all) is valid:
//!
//! ```toml
//! widget_unit = 20.0
//! screen_margin = 10.0
//!
//! [display]
//! factor_display = "percentage"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// How factor properties render in number buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorDisplay {
    /// `0.250`
    #[default]
    Factor,
    /// `25.0%`
    Percentage,
}

/// Display preferences
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub factor_display: FactorDisplay,
}

/// Layout constants for blocks and buttons
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InterfaceConfig {
    /// Base widget size in pixels (one "unit")
    #[serde(default = "default_widget_unit")]
    pub widget_unit: f32,
    /// Distance popups keep from the window edges
    #[serde(default = "default_screen_margin")]
    pub screen_margin: f32,
    /// Extra distance popup menus keep from the top of the window
    #[serde(default = "default_popup_menu_top")]
    pub popup_menu_top: f32,
    /// Hit-test tolerance around a block
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f32,
    /// Widget font size used for text-driven layout
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_widget_unit() -> f32 {
    20.0
}

fn default_screen_margin() -> f32 {
    10.0
}

fn default_popup_menu_top() -> f32 {
    10.0
}

fn default_safety_margin() -> f32 {
    40.0
}

fn default_font_size() -> f32 {
    11.0
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            widget_unit: default_widget_unit(),
            screen_margin: default_screen_margin(),
            popup_menu_top: default_popup_menu_top(),
            safety_margin: default_safety_margin(),
            font_size: default_font_size(),
            display: DisplayConfig::default(),
        }
    }
}

impl InterfaceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded interface config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: InterfaceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.widget_unit <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "widget_unit",
                reason: format!("must be positive, got {}", self.widget_unit),
            });
        }
        if self.screen_margin < 0.0 {
            return Err(ConfigError::Invalid {
                field: "screen_margin",
                reason: format!("must not be negative, got {}", self.screen_margin),
            });
        }
        Ok(())
    }

    /// Text padding used when widening popup menus to fit their labels
    pub fn menu_text_bounds(&self) -> f32 {
        2.5 * self.widget_unit
    }

    /// Gap kept after the last header button before flexible spacing kicks in
    pub fn header_offset(&self) -> f32 {
        0.4 * self.widget_unit
    }
}
