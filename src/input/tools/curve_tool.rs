//! Freehand tools: free curve and the translucent marker pen.

use std::rc::Rc;

use super::{AnnotationTool, StyleContext, ToolCore, wheel_step};
use crate::draw::{Graph, GraphContainer, GraphHandle, GraphKind};
use crate::input::cursor::{CircleStyle, CustomCursor};
use crate::input::events::{PointerEvent, WheelEvent};
use crate::input::tool::ToolName;
use crate::input::touchpad::Touchpad;

/// Marker pen width bounds.
pub const MIN_MARKER_WIDTH: f64 = 1.0;
pub const MAX_MARKER_WIDTH: f64 = 50.0;

/// Default marker pen stroke: wide and translucent.
pub const DEFAULT_MARKER_WIDTH: f64 = 20.0;
pub const DEFAULT_MARKER_OPACITY: f64 = 0.3;

/// Seeds a polyline on pointer-down and appends every move.
pub struct CurveTool {
    marker: bool,
    core: ToolCore,
    cursor: CustomCursor,
    graph: Option<GraphHandle>,
}

impl CurveTool {
    pub fn free_curve(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        let mut cursor = CustomCursor::cross_hair();
        cursor.set_stroke_width(style.stroke_width);
        cursor.set_stroke_color(style.stroke_color);
        Self {
            marker: false,
            core: ToolCore::new(container, touchpad, style),
            cursor,
            graph: None,
        }
    }

    /// Marker pen. `style.stroke_color` should already carry the
    /// translucency; the cursor previews the stroke as a filled circle.
    pub fn marker_pen(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        let cursor = CustomCursor::circle(CircleStyle {
            diameter: style.stroke_width,
            stroke_width: 0.0,
            stroke_color: style.stroke_color,
            fill_color: style.stroke_color,
        });
        Self {
            marker: true,
            core: ToolCore::new(container, touchpad, style),
            cursor,
            graph: None,
        }
    }
}

impl AnnotationTool for CurveTool {
    fn name(&self) -> ToolName {
        if self.marker {
            ToolName::MarkerPen
        } else {
            ToolName::FreeCurve
        }
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn cursor(&self) -> &CustomCursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut CustomCursor {
        &mut self.cursor
    }

    fn on_mouse_down(&mut self, event: &PointerEvent) {
        let mut graph = Graph::empty(GraphKind::Line);
        if let Some(points) = graph.points_mut() {
            points.push((event.x, event.y));
        }
        if let Some(stroke) = graph.stroke_mut() {
            *stroke = self.core.style.stroke();
        }
        let handle = GraphHandle::new(graph);
        self.graph = Some(handle.clone());
        self.add(handle);
    }

    fn on_mouse_move(&mut self, event: &PointerEvent) {
        let Some(graph) = self.graph.as_ref() else {
            return;
        };
        let stroke = self.core.style.stroke();
        graph.set(|graph| {
            if let Some(points) = graph.points_mut() {
                points.push((event.x, event.y));
            }
            if let Some(target) = graph.stroke_mut() {
                *target = stroke;
            }
        });
    }

    fn on_mouse_up(&mut self, _event: &PointerEvent) {
        self.graph = None;
    }

    fn on_wheel(&mut self, event: &WheelEvent) {
        if !self.marker {
            let width = wheel_step(
                self.core.style.stroke_width,
                event,
                super::MIN_STROKE_WIDTH,
                super::MAX_STROKE_WIDTH,
            );
            self.core.style.stroke_width = width;
            self.cursor.set_stroke_width(width);
            return;
        }

        let width = wheel_step(
            self.core.style.stroke_width,
            event,
            MIN_MARKER_WIDTH,
            MAX_MARKER_WIDTH,
        );
        self.core.style.stroke_width = width;
        self.cursor.set_diameter(width);
        log::debug!("Marker pen width -> {}", width);
    }

    fn is_dragging(&self) -> bool {
        self.graph.is_some()
    }
}
