//! Button values and display strings
//!
//! A button reads its value from, in order of preference, the edit state of
//! an active interaction, a stage property, or its raw source. Writes go the
//! same way and keep the `SELECT` flag in sync with the pushed state.

use kraken_core::{
    key_event_string, FactorDisplay, InterfaceConfig, KeyModifiers, PropertyAccess,
    PropertySubtype, PropertyType, PropertyValue,
};

use crate::button::{Button, ButtonType, RawSource, RawType};
use crate::error::Result;
use crate::flags::{ButtonFlags, DrawFlags};

/// Most decimal places a float button displays
pub const PRECISION_FLOAT_MAX: i32 = 6;

/// Scale applied to step sizes before testing them for integrality
const PRECISION_FLOAT_SCALE: f32 = 0.01;

// =============================================================================
// Reading and writing
// =============================================================================

/// Current numeric value of a button
pub fn value_get(but: &Button, props: &dyn PropertyAccess) -> f64 {
    if let Some(edit) = but.active.as_ref().and_then(|state| state.edit_value) {
        return edit;
    }
    if let Some(prop) = &but.property {
        return props
            .get(prop)
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
    }
    but.raw.get().unwrap_or(0.0)
}

/// Store `value` into the button's source.
///
/// Stage properties that are hidden or no longer valid are left untouched.
/// Raw sources are rounded and clamped to their storage type first.
pub fn value_set(but: &mut Button, props: &mut dyn PropertyAccess, value: f64) -> Result<()> {
    if let Some(prop) = but.property {
        if !props.is_hidden(&prop) && props.is_valid(&prop) {
            let converted = props
                .property_type(&prop)
                .and_then(|ty| PropertyValue::from_f64(ty, value));
            if let Some(converted) = converted {
                props.set(&prop, converted)?;
            }
        }
        // Whatever happened, the next read must go back to the stage.
        but.cached_value = None;
    } else if let Some(ty) = but.raw.raw_type() {
        let value = round_to_raw(ty, value);
        if let Some(edit) = but.active.as_mut().and_then(|state| state.edit_value.as_mut()) {
            *edit = value;
        } else {
            match &mut but.raw {
                RawSource::SelfValue { value: stored, .. } => *stored = value,
                RawSource::Shared(slot) => slot.cell.set(value),
                RawSource::None => {}
            }
        }
        but.cached_value = Some(value);
    }

    update_select_flag(but, props);
    Ok(())
}

fn round_to_raw(ty: RawType, value: f64) -> f64 {
    match ty {
        RawType::Char => value.round().clamp(0.0, u8::MAX as f64),
        RawType::Short => value.round().clamp(i16::MIN as f64, i16::MAX as f64),
        RawType::Int => value.round().clamp(i32::MIN as f64, i32::MAX as f64),
        RawType::Float => {
            let f = value as f32;
            // no negative zero
            if (-0.00001..=0.00001).contains(&f) {
                0.0
            } else {
                f as f64
            }
        }
    }
}

/// Whether the value is shown with a fractional part
pub fn is_float(but: &Button, props: &dyn PropertyAccess) -> bool {
    if but.raw.raw_type() == Some(RawType::Float) {
        return true;
    }
    but.property
        .as_ref()
        .and_then(|prop| props.property_type(prop))
        == Some(PropertyType::Float)
}

/// Text value of text and search buttons
pub fn string_get(but: &Button, props: &dyn PropertyAccess) -> String {
    let Some(prop) = &but.property else {
        return String::new();
    };
    match props.get(prop) {
        Some(PropertyValue::String(s)) => s,
        Some(other) => other
            .as_f64()
            .map(|v| format_float(v, button_float_precision(but, v)))
            .unwrap_or_default(),
        None => String::new(),
    }
}

// =============================================================================
// Pushed state
// =============================================================================

/// Whether the button draws pressed; `None` for kinds without a pushed state
pub fn is_pushed(but: &Button, props: &dyn PropertyAccess) -> Option<bool> {
    if let Some(pushed) = &but.pushed_state {
        return Some(pushed(but));
    }

    let ty = but.button_type();
    let pushed = if let Some(bit) = but.bit {
        let state = !matches!(
            ty,
            ButtonType::ToggleN | ButtonType::IconToggleN | ButtonType::CheckboxN
        );
        let value = value_get(but, props) as i64;
        let set = (value >> bit) & 1 != 0;
        Some(if set { state } else { !state })
    } else {
        match ty {
            ButtonType::But
            | ButtonType::HotkeyEvent
            | ButtonType::KeyEvent
            | ButtonType::Color
            | ButtonType::Decorator => None,
            ButtonType::Toggle | ButtonType::IconToggle | ButtonType::Checkbox => {
                Some(value_get(but, props) != but.hardmin as f64)
            }
            ButtonType::ToggleN | ButtonType::IconToggleN | ButtonType::CheckboxN => {
                Some(value_get(but, props) == 0.0)
            }
            ButtonType::Row | ButtonType::ListRow | ButtonType::Tab => {
                if but.operator.is_some() {
                    Some(false)
                } else {
                    let value = value_get(but, props);
                    let is_flag = but
                        .property
                        .as_ref()
                        .and_then(|prop| props.property_type(prop))
                        == Some(PropertyType::EnumFlag);
                    if is_flag {
                        Some((value as i64) & (but.hardmax as i64) != 0)
                    } else {
                        Some(value == but.hardmax as f64)
                    }
                }
            }
            ButtonType::ViewItem => but
                .kind
                .view_item()
                .and_then(|data| data.item.as_ref())
                .map(|item| item.is_active()),
            _ => None,
        }
    };

    if but.drawflag.contains(DrawFlags::CHECKBOX_INVERT) {
        pushed.map(|p| !p)
    } else {
        pushed
    }
}

/// Sync `SELECT` with the pushed state; kinds without one keep the flag as is
pub fn update_select_flag(but: &mut Button, props: &dyn PropertyAccess) {
    match is_pushed(but, props) {
        Some(true) => but.flag.insert(ButtonFlags::SELECT),
        Some(false) => but.flag.remove(ButtonFlags::SELECT),
        None => {}
    }
}

// =============================================================================
// Precision
// =============================================================================

/// Decimal places needed so small values do not collapse to zero.
///
/// Values below `10^-prec` get enough extra places to show their leading
/// significant digits (up to three of them), capped at [`PRECISION_FLOAT_MAX`].
pub fn calc_float_precision(prec: i32, value: f64) -> i32 {
    const POW10_NEG: [f64; PRECISION_FLOAT_MAX as usize + 1] =
        [1e0, 1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6];
    const MAX_POW: f64 = 10_000_000.0;
    const PREC_SPAN: i32 = 3;

    let mut prec = prec.clamp(0, PRECISION_FLOAT_MAX);
    let value = value.abs();

    if value < POW10_NEG[prec as usize] && value > 1.0 / MAX_POW {
        let mut value_i = (value * MAX_POW).round() as i64;
        if value_i != 0 {
            let mut prec_min = -1;
            let mut dec_flag: i32 = 0;
            let mut i = PRECISION_FLOAT_MAX;
            while i != 0 && value_i != 0 {
                if value_i % 10 != 0 {
                    dec_flag |= 1 << i;
                    prec_min = i;
                }
                value_i /= 10;
                i -= 1;
            }

            let mut test_prec = prec_min;
            dec_flag = (dec_flag >> (prec_min + 1)) & ((1 << PREC_SPAN) - 1);
            while dec_flag != 0 {
                test_prec += 1;
                dec_flag >>= 1;
            }

            if test_prec > prec {
                prec = test_prec;
            }
        }
    }

    prec.clamp(0, PRECISION_FLOAT_MAX)
}

fn step_size(but: &Button) -> f32 {
    but.kind.number().map_or(0.0, |num| num.step_size)
}

/// Integral value stepped by an integral amount: no fraction shown
fn hide_fraction(but: &Button, value: f64) -> bool {
    if value.floor() != value {
        return false;
    }
    let step = step_size(but) * PRECISION_FLOAT_SCALE;
    step.floor() == step
}

/// Decimal places a float button shows for `value`
pub fn button_float_precision(but: &Button, value: f64) -> i32 {
    if hide_fraction(but, value) {
        return 0;
    }
    let prec = but.kind.number().map_or(-1, |num| num.precision);
    let prec = if prec == -1 {
        if but.hardmax < 10.001 {
            3
        } else {
            2
        }
    } else {
        prec.clamp(0, PRECISION_FLOAT_MAX)
    };
    calc_float_precision(prec, value)
}

fn format_float(value: f64, prec: i32) -> String {
    format!("{:.*}", prec.max(0) as usize, value)
}

// =============================================================================
// Display string
// =============================================================================

/// Rebuild `drawstr` from the label and the current value
pub fn update_drawstr(but: &mut Button, props: &dyn PropertyAccess, config: &InterfaceConfig) {
    update_select_flag(but, props);

    if matches!(
        but.button_type(),
        ButtonType::IconToggle | ButtonType::IconToggleN
    ) && but.property.is_none()
    {
        but.iconadd = i32::from(but.flag.contains(ButtonFlags::SELECT));
    }

    let label = but.label.as_str();
    let drawstr = match but.button_type() {
        ButtonType::Num | ButtonType::NumSlider => {
            if but.is_editing() {
                None
            } else {
                let value = value_get(but, props);
                let subtype = subtype_of(but, props);
                if is_float(but, props) {
                    Some(float_drawstr(but, label, value, subtype, config))
                } else {
                    Some(int_drawstr(label, value as i32, subtype))
                }
            }
        }
        ButtonType::Label => {
            if is_float(but, props) {
                let value = value_get(but, props);
                let prec = button_float_precision(but, value);
                Some(format!("{}{}", label, format_float(value + 0.0, prec)))
            } else {
                Some(label.to_string())
            }
        }
        ButtonType::Text | ButtonType::SearchMenu => {
            if but.is_editing() {
                None
            } else {
                Some(format!("{}{}", label, string_get(but, props)))
            }
        }
        ButtonType::KeyEvent => {
            let key = if but.flag.contains(ButtonFlags::SELECT) {
                "Press a key".to_string()
            } else {
                key_event_string(value_get(but, props) as i32)
            };
            Some(format!("{}{}", label, key))
        }
        ButtonType::HotkeyEvent => {
            if but.flag.contains(ButtonFlags::SELECT) {
                let modifiers = but
                    .kind
                    .hotkey()
                    .map(|hotkey| hotkey.modifier_key)
                    .unwrap_or_default();
                if modifiers.is_empty() {
                    Some("Press a key".to_string())
                } else {
                    Some(modifier_names(modifiers))
                }
            } else {
                Some(label.to_string())
            }
        }
        ButtonType::HsvCube | ButtonType::HsvCircle => None,
        _ => Some(label.to_string()),
    };

    if let Some(drawstr) = drawstr {
        but.drawstr = drawstr;
    }
    // Text being typed is drawn instead.
    if but.is_editing() {
        but.drawstr.clear();
    }
}

fn subtype_of(but: &Button, props: &dyn PropertyAccess) -> PropertySubtype {
    but.property
        .as_ref()
        .map_or(PropertySubtype::None, |prop| props.subtype(prop))
}

fn float_drawstr(
    but: &Button,
    label: &str,
    value: f64,
    subtype: PropertySubtype,
    config: &InterfaceConfig,
) -> String {
    // -0.0 + 0.0 is 0.0
    let value = value + 0.0;

    if value == f32::MAX as f64 {
        return format!("{}inf", label);
    }
    if value == -(f32::MAX as f64) {
        return format!("{}-inf", label);
    }

    let prec = button_float_precision(but, value);
    match subtype {
        PropertySubtype::Percentage => format!("{}{}%", label, format_float(value, prec)),
        PropertySubtype::Pixel => format!("{}{} px", label, format_float(value, prec)),
        PropertySubtype::Factor => match config.display.factor_display {
            FactorDisplay::Factor => format!("{}{}", label, format_float(value, prec)),
            FactorDisplay::Percentage => {
                format!("{}{}%", label, format_float(value * 100.0, (prec - 2).max(0)))
            }
        },
        PropertySubtype::None => format!("{}{}", label, format_float(value, prec)),
    }
}

fn int_drawstr(label: &str, value: i32, subtype: PropertySubtype) -> String {
    match subtype {
        PropertySubtype::Percentage => format!("{}{}%", label, value),
        PropertySubtype::Pixel => format!("{}{} px", label, value),
        _ => format!("{}{}", label, value),
    }
}

fn modifier_names(modifiers: KeyModifiers) -> String {
    let mut out = String::new();
    if modifiers.contains(KeyModifiers::SHIFT) {
        out.push_str("Shift ");
    }
    if modifiers.contains(KeyModifiers::CTRL) {
        out.push_str("Ctrl ");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        out.push_str("Alt ");
    }
    if modifiers.contains(KeyModifiers::OSKEY) {
        out.push_str("Cmd ");
    }
    out
}
