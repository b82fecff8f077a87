//! Input handling and the annotation tool state machine.
//!
//! The host feeds pointer and wheel events into a [`Touchpad`], which fans
//! them out to whichever tool is active. Tools turn those events into graph
//! mutations on the shared container.

pub mod cursor;
pub mod events;
pub mod tool;
pub mod tools;
pub mod touchpad;

// Re-export commonly used types at module level
pub use cursor::{CursorShape, CustomCursor};
pub use events::{EventKind, InputEvent, MouseButton, PointerEvent, PointerEventKind, WheelEvent};
pub use tool::ToolName;
pub use tools::{AnnotationTool, SharedTool, StyleContext};
pub use touchpad::{ListenerId, Touchpad};
