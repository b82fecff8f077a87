//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the style every tool starts with when an image is opened. The
/// wheel adjusts these live while editing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default stroke color - either a named color (red, green, blue, yellow, orange, pink, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1.0 - 10.0)
    #[serde(default = "default_thickness")]
    pub default_thickness: f64,

    /// Default font size for the text tool in pixels (valid range: 14.0 - 32.0)
    #[serde(default = "default_font_size")]
    pub default_font_size: f64,

    /// Text color, same format as `default_color`
    #[serde(default = "default_color")]
    pub text_color: ColorSpec,

    /// Font family name for text and numbered markers (e.g., "Sans", "Monospace")
    /// Falls back to "Sans" if the specified font is not available
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    /// Can be a named weight or a numeric value (100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_thickness: default_thickness(),
            default_font_size: default_font_size(),
            text_color: default_color(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
        }
    }
}

/// Marker pen (highlighter) settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MarkerConfig {
    /// Marker width in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_marker_thickness")]
    pub thickness: f64,

    /// Marker opacity (valid range: 0.05 - 1.0)
    #[serde(default = "default_marker_opacity")]
    pub opacity: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            thickness: default_marker_thickness(),
            opacity: default_marker_opacity(),
        }
    }
}

/// Where exported images go when no explicit output path is given.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for exported images. A leading `~` expands to the home directory
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// Filename template using chrono format specifiers (extension is appended)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_thickness() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    14.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_marker_thickness() -> f64 {
    20.0
}

fn default_marker_opacity() -> f64 {
    0.3
}

fn default_save_directory() -> String {
    "~/Pictures/Snapscribe".to_string()
}

fn default_filename_template() -> String {
    "snapscribe_%Y-%m-%d_%H%M%S".to_string()
}
