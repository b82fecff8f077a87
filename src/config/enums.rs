//! Configuration enum types.

use crate::draw::{Color, RED};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, pink, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Unknown color names fall back to red with a warning. RGB arrays are
    /// converted from 0-255 to 0.0-1.0 with full opacity.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using red", name);
                RED
            }),
            ColorSpec::Rgb([r, g, b]) => Color {
                r: *r as f64 / 255.0,
                g: *g as f64 / 255.0,
                b: *b as f64 / 255.0,
                a: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_components_are_normalized() {
        let color = ColorSpec::Rgb([255, 0, 51]).to_color();
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 0.2).abs() < 1e-9);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn unknown_name_falls_back_to_red() {
        assert_eq!(ColorSpec::Name("mauve-ish".into()).to_color(), RED);
        assert_eq!(ColorSpec::Name("Blue".into()).to_color(), crate::draw::BLUE);
    }
}
