//! Scripted editing sessions.
//!
//! A script is a TOML file of `[[step]]` tables, each tagged by `action`,
//! replayed against an [`Editor`] in order:
//!
//! ```toml
//! [[step]]
//! action = "tool"
//! name = "RectangleTool"
//!
//! [[step]]
//! action = "drag"
//! from = [10.0, 10.0]
//! to = [120.0, 80.0]
//!
//! [[step]]
//! action = "undo"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::editor::{Editor, EditorError};
use crate::input::{MouseButton, PointerEvent, WheelEvent};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Step {index} ({action}) failed: {source}")]
    Step {
        index: usize,
        action: &'static str,
        #[source]
        source: EditorError,
    },
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Activate a tool by name, e.g. `"ArrowTool"`
    Tool { name: String },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
    },
    /// Pointer motion. `buttons` defaults to the primary button held.
    Move {
        x: f64,
        y: f64,
        #[serde(default = "default_buttons")]
        buttons: u8,
        #[serde(default)]
        alt: bool,
    },
    Up { x: f64, y: f64 },
    /// Down at `from`, `steps` evenly spaced moves ending at `to`, then up.
    Drag {
        from: [f64; 2],
        to: [f64; 2],
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    /// Wheel over the active tool
    Wheel {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        delta: f64,
    },
    /// Wheel over the viewport (zooms outside edit mode)
    Zoom { delta: f64 },
    Text { content: String },
    Commit,
    Undo,
    Redo,
    Exit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl From<ScriptButton> for MouseButton {
    fn from(button: ScriptButton) -> Self {
        match button {
            ScriptButton::Left => MouseButton::Left,
            ScriptButton::Right => MouseButton::Right,
            ScriptButton::Middle => MouseButton::Middle,
        }
    }
}

fn default_buttons() -> u8 {
    1
}

fn default_drag_steps() -> u32 {
    1
}

impl Step {
    fn action(&self) -> &'static str {
        match self {
            Step::Tool { .. } => "tool",
            Step::Down { .. } => "down",
            Step::Move { .. } => "move",
            Step::Up { .. } => "up",
            Step::Drag { .. } => "drag",
            Step::Wheel { .. } => "wheel",
            Step::Zoom { .. } => "zoom",
            Step::Text { .. } => "text",
            Step::Commit => "commit",
            Step::Undo => "undo",
            Step::Redo => "redo",
            Step::Exit => "exit",
        }
    }

    fn apply(&self, editor: &mut Editor) -> Result<(), EditorError> {
        match self {
            Step::Tool { name } => editor.active_tool(name)?,
            Step::Down { x, y, button } => {
                let event = match button {
                    ScriptButton::Left => PointerEvent::down(*x, *y),
                    ScriptButton::Right => {
                        PointerEvent::down(*x, *y).with_button(MouseButton::Right, 0b10)
                    }
                    ScriptButton::Middle => {
                        PointerEvent::down(*x, *y).with_button(MouseButton::Middle, 0b100)
                    }
                };
                editor.handle_input(event);
            }
            Step::Move { x, y, buttons, alt } => {
                editor.handle_input(PointerEvent::moved(*x, *y, *buttons).with_alt(*alt));
            }
            Step::Up { x, y } => editor.handle_input(PointerEvent::up(*x, *y)),
            Step::Drag { from, to, steps } => {
                let steps = (*steps).max(1);
                editor.handle_input(PointerEvent::down(from[0], from[1]));
                for i in 1..=steps {
                    let t = i as f64 / steps as f64;
                    let x = from[0] + (to[0] - from[0]) * t;
                    let y = from[1] + (to[1] - from[1]) * t;
                    editor.handle_input(PointerEvent::moved(x, y, 1));
                }
                editor.handle_input(PointerEvent::up(to[0], to[1]));
            }
            Step::Wheel { x, y, delta } => editor.handle_input(WheelEvent::new(*x, *y, *delta)),
            Step::Zoom { delta } => {
                editor.on_viewport_wheel(*delta)?;
            }
            Step::Text { content } => {
                if !editor.text_input(content) {
                    log::warn!("No focused text editor for {:?}", content);
                }
            }
            Step::Commit => {
                editor.commit_text();
            }
            Step::Undo => {
                editor.undo();
            }
            Step::Redo => {
                editor.redo();
            }
            Step::Exit => editor.exit_edit_mode(),
        }
        Ok(())
    }
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::parse(&source)?;
        log::info!("Loaded {} script steps from {}", script.steps.len(), path.display());
        Ok(script)
    }

    /// Replays every step against `editor`, stopping at the first failure.
    /// Returns the number of steps applied.
    pub fn run(&self, editor: &mut Editor) -> Result<usize, ScriptError> {
        for (index, step) in self.steps.iter().enumerate() {
            log::debug!("Script step {}: {:?}", index, step);
            step.apply(editor).map_err(|source| ScriptError::Step {
                index,
                action: step.action(),
                source,
            })?;
        }
        Ok(self.steps.len())
    }
}
