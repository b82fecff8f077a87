//! Configuration file support for snapscribe.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/snapscribe/config.toml`. Settings include the initial tool
//! style, marker pen appearance, and where exports are saved.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{DrawingConfig, ExportConfig, MarkerConfig};

use crate::draw::FontDescriptor;
use crate::editor::EditorOptions;
use crate::export::FileSaveConfig;
use crate::export::file::expand_tilde;
use crate::input::StyleContext;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// default_thickness = 2.0
/// default_font_size = 16.0
///
/// [marker]
/// thickness = 20.0
/// opacity = 0.3
///
/// [export]
/// save_directory = "~/Pictures/Snapscribe"
/// filename_template = "snapscribe_%Y-%m-%d_%H%M%S"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Initial tool style (color, stroke width, font)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Marker pen appearance
    #[serde(default)]
    pub marker: MarkerConfig,

    /// Export destination
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_thickness`: 1.0 - 10.0
    /// - `default_font_size`: 14.0 - 32.0
    /// - `marker.thickness`: 1.0 - 50.0
    /// - `marker.opacity`: 0.05 - 1.0
    pub fn validate_and_clamp(&mut self) {
        // Thickness: 1.0 - 10.0
        if !(1.0..=10.0).contains(&self.drawing.default_thickness) {
            log::warn!(
                "Invalid default_thickness {:.1}, clamping to 1.0-10.0 range",
                self.drawing.default_thickness
            );
            self.drawing.default_thickness = self.drawing.default_thickness.clamp(1.0, 10.0);
        }

        // Font size: 14.0 - 32.0
        if !(14.0..=32.0).contains(&self.drawing.default_font_size) {
            log::warn!(
                "Invalid default_font_size {:.1}, clamping to 14.0-32.0 range",
                self.drawing.default_font_size
            );
            self.drawing.default_font_size = self.drawing.default_font_size.clamp(14.0, 32.0);
        }

        if !(1.0..=50.0).contains(&self.marker.thickness) {
            log::warn!(
                "Invalid marker thickness {:.1}, clamping to 1.0-50.0 range",
                self.marker.thickness
            );
            self.marker.thickness = self.marker.thickness.clamp(1.0, 50.0);
        }

        if !(0.05..=1.0).contains(&self.marker.opacity) {
            log::warn!(
                "Invalid marker opacity {:.2}, clamping to 0.05-1.0 range",
                self.marker.opacity
            );
            self.marker.opacity = self.marker.opacity.clamp(0.05, 1.0);
        }

        // Validate font weight is reasonable
        let valid_weight = matches!(
            self.drawing.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold"
        ) || self
            .drawing
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'normal'",
                self.drawing.font_weight
            );
            self.drawing.font_weight = "normal".to_string();
        }

        if !matches!(
            self.drawing.font_style.to_lowercase().as_str(),
            "normal" | "italic" | "oblique"
        ) {
            log::warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                self.drawing.font_style
            );
            self.drawing.font_style = "normal".to_string();
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!("Empty filename_template, falling back to the default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/snapscribe/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("snapscribe");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path. A missing file yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema of the configuration file, for editors and tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Initial tool styles derived from this configuration.
    pub fn editor_options(&self) -> EditorOptions {
        let color = self.drawing.default_color.to_color();
        EditorOptions {
            stroke: StyleContext {
                stroke_width: self.drawing.default_thickness,
                stroke_color: color,
            },
            marker: StyleContext {
                stroke_width: self.marker.thickness,
                stroke_color: color.with_alpha(self.marker.opacity),
            },
            font: FontDescriptor::new(
                self.drawing.font_family.clone(),
                self.drawing.font_weight.clone(),
                self.drawing.font_style.clone(),
            ),
            font_size: self.drawing.default_font_size,
            text_color: self.drawing.text_color.to_color(),
        }
    }

    /// Where exports go when no output path is given.
    pub fn file_save_config(&self) -> FileSaveConfig {
        FileSaveConfig {
            save_directory: expand_tilde(&self.export.save_directory),
            filename_template: self.export.filename_template.clone(),
            ..FileSaveConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, RED};
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.drawing.default_thickness, 1.0);
        assert_eq!(config.drawing.default_font_size, 14.0);
        assert_eq!(config.marker.thickness, 20.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[drawing]
default_color = "blue"
default_thickness = 40.0
default_font_size = 8.0
font_weight = "chunky"

[marker]
opacity = 2.0
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.drawing.default_thickness, 10.0);
        assert_eq!(config.drawing.default_font_size, 14.0);
        assert_eq!(config.drawing.font_weight, "normal");
        assert_eq!(config.marker.opacity, 1.0);
        assert_eq!(config.drawing.default_color.to_color(), BLUE);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[drawing\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn editor_options_carry_marker_translucency() {
        let options = Config::default().editor_options();
        assert_eq!(options.stroke.stroke_color, RED);
        assert_eq!(options.marker.stroke_width, 20.0);
        assert_eq!(options.marker.stroke_color.a, 0.3);
        assert_eq!(options.font.family, "Sans");
    }

    #[test]
    fn schema_names_every_section() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        for section in ["drawing", "marker", "export"] {
            assert!(schema.contains(section), "schema lacks {section}");
        }
    }
}
