//! Screenshot annotation editor core.
//!
//! Opens a raster image, turns pointer and wheel input into annotation
//! graphs through the active tool, keeps an undo/redo history of those
//! graphs, and flattens background plus annotations into a PNG.
//!
//! The [`Editor`] ties the pieces together; the subsystems are public so
//! hosts and tools (such as the schema dumper) can reuse them directly.

pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod input;
pub mod observer;
pub mod script;
pub mod stack;
pub mod util;

pub use config::Config;
pub use editor::{Editor, EditorError, EditorOptions};
pub use script::{Script, ScriptError};
