//! Rendering primitives, graph storage, and the layered compositor (Cairo-based).
//!
//! This module defines the core drawing types used for annotation:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Graph`]: The annotation kinds (rectangles, lines, text, effects, etc.)
//! - [`GraphHandle`]: Shared, observable reference to one graph
//! - [`GraphContainer`]: Committed and undone graphs (undo/redo)
//! - [`Renderer`]: Background, annotation and merge surfaces plus zoom

pub mod canvas_set;
pub mod color;
pub mod container;
pub mod effects;
pub mod font;
pub mod graph;
pub mod handle;
pub mod render;
pub mod renderer;
pub mod text;
pub mod zoom;

// Re-export commonly used types at module level
pub use color::Color;
pub use container::GraphContainer;
pub use effects::{BackgroundImageExtractor, PixelBlock};
pub use font::FontDescriptor;
pub use graph::{BoxData, Graph, GraphKind, ImageData, StrokeStyle, TextData};
pub use handle::GraphHandle;
pub use render::{RenderPass, render_graph, render_text};
pub use renderer::{RenderError, Renderer};
pub use zoom::{ZoomDirection, ZoomResult};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
