//! Two-point tools: straight line and arrow.

use std::rc::Rc;

use super::{AnnotationTool, StyleContext, ToolCore};
use crate::draw::{Graph, GraphContainer, GraphHandle, GraphKind};
use crate::input::cursor::CustomCursor;
use crate::input::events::PointerEvent;
use crate::input::tool::ToolName;
use crate::input::touchpad::Touchpad;
use crate::util::Point;

/// Pointer-down fixes the start point; every move replaces the end point.
pub struct LineTool {
    arrow: bool,
    core: ToolCore,
    cursor: CustomCursor,
    graph: Option<GraphHandle>,
    start: Option<Point>,
}

impl LineTool {
    fn new(
        arrow: bool,
        container: Rc<GraphContainer>,
        touchpad: Rc<Touchpad>,
        style: StyleContext,
    ) -> Self {
        let mut cursor = CustomCursor::cross_hair();
        cursor.set_stroke_width(style.stroke_width);
        cursor.set_stroke_color(style.stroke_color);
        Self {
            arrow,
            core: ToolCore::new(container, touchpad, style),
            cursor,
            graph: None,
            start: None,
        }
    }

    pub fn straight_line(
        container: Rc<GraphContainer>,
        touchpad: Rc<Touchpad>,
        style: StyleContext,
    ) -> Self {
        Self::new(false, container, touchpad, style)
    }

    pub fn arrow(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        Self::new(true, container, touchpad, style)
    }
}

impl AnnotationTool for LineTool {
    fn name(&self) -> ToolName {
        if self.arrow {
            ToolName::Arrow
        } else {
            ToolName::StraightLine
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
        let start = (event.x, event.y);
        let mut graph = Graph::empty(if self.arrow {
            GraphKind::Arrow
        } else {
            GraphKind::Line
        });
        if let Some(stroke) = graph.stroke_mut() {
            *stroke = self.core.style.stroke();
        }
        // An arrow has no direction until the pointer moves
        if !self.arrow
            && let Some(points) = graph.points_mut()
        {
            points.push(start);
        }
        let handle = GraphHandle::new(graph);

        self.start = Some(start);
        self.graph = Some(handle.clone());
        self.add(handle);
    }

    fn on_mouse_move(&mut self, event: &PointerEvent) {
        let (Some(start), Some(graph)) = (self.start, self.graph.as_ref()) else {
            return;
        };
        let stroke = self.core.style.stroke();
        graph.set(|graph| {
            if let Some(points) = graph.points_mut() {
                *points = vec![start, (event.x, event.y)];
            }
            if let Some(target) = graph.stroke_mut() {
                *target = stroke;
            }
        });
    }

    fn on_mouse_up(&mut self, _event: &PointerEvent) {
        self.start = None;
        self.graph = None;
    }

    fn is_dragging(&self) -> bool {
        self.start.is_some()
    }
}
