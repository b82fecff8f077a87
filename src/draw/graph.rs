//! Annotation graph definitions.
//!
//! Every field of a graph's data record is optional: tools create graphs with
//! nothing set on pointer-down and fill them in while dragging. Rendering
//! checks the required subset at draw time (see [`super::render`]).

use std::fmt;

use super::{Color, FontDescriptor};
use crate::util::Point;

/// Stroke overrides. Unset fields fall back to the ambient surface state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrokeStyle {
    pub color: Option<Color>,
    pub width: Option<f64>,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color: Some(color),
            width: Some(width),
        }
    }
}

/// Axis-aligned region shared by the box-shaped graphs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl BoxData {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Returns `(x, y, width, height)` once every field is set.
    pub fn complete(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.x?, self.y?, self.width?, self.height?))
    }

    fn scale(&mut self, ratio: f64) {
        for field in [&mut self.x, &mut self.y, &mut self.width, &mut self.height] {
            if let Some(value) = field {
                *value *= ratio;
            }
        }
    }
}

/// Multi-row text anchored at its first row's vertical middle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub content: Option<String>,
    pub font: Option<FontDescriptor>,
    /// Font size in pixels, paired with `font`
    pub font_size: Option<f64>,
    pub font_color: Option<Color>,
    pub line_height: Option<f64>,
    pub max_width: Option<f64>,
    /// `Some(false)` hides the text unless the render pass is forced
    pub visible: Option<bool>,
}

/// A raster drawn at a position, optionally resized.
#[derive(Clone, Default)]
pub struct ImageData {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub source: Option<cairo::ImageSurface>,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field(
                "source",
                &self
                    .source
                    .as_ref()
                    .map(|surface| (surface.width(), surface.height())),
            )
            .finish()
    }
}

/// Kind tag of a [`Graph`], used for logging and tool wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    Rect,
    Ellipse,
    Line,
    Arrow,
    Text,
    Image,
    Eraser,
    Mosaic,
    GaussianBlur,
}

impl GraphKind {
    /// Whether graphs of this kind sample the rendered background.
    ///
    /// Only pixel effects do; the renderer hands them an extractor each pass.
    pub fn is_background_image_aware(self) -> bool {
        matches!(self, GraphKind::Mosaic | GraphKind::GaussianBlur)
    }
}

/// A single renderable annotation.
#[derive(Debug, Clone)]
pub enum Graph {
    /// Stroked rectangle outline
    Rect { bounds: BoxData, stroke: StrokeStyle },
    /// Stroked ellipse inscribed in `bounds`
    Ellipse { bounds: BoxData, stroke: StrokeStyle },
    /// Open polyline (straight lines and freehand curves)
    Line {
        points: Option<Vec<Point>>,
        stroke: StrokeStyle,
    },
    /// Line from `points[0]` to `points[1]` with a head at the end
    Arrow {
        points: Option<Vec<Point>>,
        stroke: StrokeStyle,
    },
    Text(TextData),
    Image(ImageData),
    /// Clears its region of the annotation surface
    Eraser { bounds: BoxData },
    /// Pixelates the background under its region
    Mosaic { bounds: BoxData },
    /// Blurs the background under its region
    GaussianBlur { bounds: BoxData },
}

impl Graph {
    /// Empty graph of the given kind, as created on pointer-down.
    pub fn empty(kind: GraphKind) -> Self {
        match kind {
            GraphKind::Rect => Graph::Rect {
                bounds: BoxData::default(),
                stroke: StrokeStyle::default(),
            },
            GraphKind::Ellipse => Graph::Ellipse {
                bounds: BoxData::default(),
                stroke: StrokeStyle::default(),
            },
            GraphKind::Line => Graph::Line {
                points: None,
                stroke: StrokeStyle::default(),
            },
            GraphKind::Arrow => Graph::Arrow {
                points: None,
                stroke: StrokeStyle::default(),
            },
            GraphKind::Text => Graph::Text(TextData::default()),
            GraphKind::Image => Graph::Image(ImageData::default()),
            GraphKind::Eraser => Graph::Eraser {
                bounds: BoxData::default(),
            },
            GraphKind::Mosaic => Graph::Mosaic {
                bounds: BoxData::default(),
            },
            GraphKind::GaussianBlur => Graph::GaussianBlur {
                bounds: BoxData::default(),
            },
        }
    }

    pub fn kind(&self) -> GraphKind {
        match self {
            Graph::Rect { .. } => GraphKind::Rect,
            Graph::Ellipse { .. } => GraphKind::Ellipse,
            Graph::Line { .. } => GraphKind::Line,
            Graph::Arrow { .. } => GraphKind::Arrow,
            Graph::Text(_) => GraphKind::Text,
            Graph::Image(_) => GraphKind::Image,
            Graph::Eraser { .. } => GraphKind::Eraser,
            Graph::Mosaic { .. } => GraphKind::Mosaic,
            Graph::GaussianBlur { .. } => GraphKind::GaussianBlur,
        }
    }

    pub fn is_background_image_aware(&self) -> bool {
        self.kind().is_background_image_aware()
    }

    /// Region of the box-shaped variants.
    pub fn bounds(&self) -> Option<&BoxData> {
        match self {
            Graph::Rect { bounds, .. }
            | Graph::Ellipse { bounds, .. }
            | Graph::Eraser { bounds }
            | Graph::Mosaic { bounds }
            | Graph::GaussianBlur { bounds } => Some(bounds),
            _ => None,
        }
    }

    pub fn bounds_mut(&mut self) -> Option<&mut BoxData> {
        match self {
            Graph::Rect { bounds, .. }
            | Graph::Ellipse { bounds, .. }
            | Graph::Eraser { bounds }
            | Graph::Mosaic { bounds }
            | Graph::GaussianBlur { bounds } => Some(bounds),
            _ => None,
        }
    }

    /// Point list of the line-shaped variants.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Graph::Line { points, .. } | Graph::Arrow { points, .. } => points.as_deref(),
            _ => None,
        }
    }

    /// Point list of the line-shaped variants, created empty on first access.
    pub fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match self {
            Graph::Line { points, .. } | Graph::Arrow { points, .. } => {
                Some(points.get_or_insert_with(Vec::new))
            }
            _ => None,
        }
    }

    pub fn stroke(&self) -> Option<&StrokeStyle> {
        match self {
            Graph::Rect { stroke, .. }
            | Graph::Ellipse { stroke, .. }
            | Graph::Line { stroke, .. }
            | Graph::Arrow { stroke, .. } => Some(stroke),
            _ => None,
        }
    }

    pub fn stroke_mut(&mut self) -> Option<&mut StrokeStyle> {
        match self {
            Graph::Rect { stroke, .. }
            | Graph::Ellipse { stroke, .. }
            | Graph::Line { stroke, .. }
            | Graph::Arrow { stroke, .. } => Some(stroke),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextData> {
        match self {
            Graph::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextData> {
        match self {
            Graph::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageData> {
        match self {
            Graph::Image(data) => Some(data),
            _ => None,
        }
    }

    /// Multiplies every positional and size field that is set by `ratio`.
    ///
    /// Stroke widths and font sizes are left alone. Text only moves its
    /// anchor.
    pub fn scale(&mut self, ratio: f64) {
        match self {
            Graph::Rect { bounds, .. }
            | Graph::Ellipse { bounds, .. }
            | Graph::Eraser { bounds }
            | Graph::Mosaic { bounds }
            | Graph::GaussianBlur { bounds } => bounds.scale(ratio),
            Graph::Line { points, .. } | Graph::Arrow { points, .. } => {
                if let Some(points) = points {
                    for (x, y) in points.iter_mut() {
                        *x *= ratio;
                        *y *= ratio;
                    }
                }
            }
            Graph::Text(data) => {
                if let Some(x) = data.x.as_mut() {
                    *x *= ratio;
                }
                if let Some(y) = data.y.as_mut() {
                    *y *= ratio;
                }
            }
            Graph::Image(data) => {
                for field in [&mut data.x, &mut data.y, &mut data.width, &mut data.height] {
                    if let Some(value) = field {
                        *value *= ratio;
                    }
                }
            }
        }
    }
}
