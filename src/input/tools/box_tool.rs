//! Drag-a-box tools: rectangle, ellipse, eraser, mosaic and blur.

use std::rc::Rc;

use super::{AnnotationTool, StyleContext, ToolCore};
use crate::draw::{BoxData, Graph, GraphContainer, GraphHandle, GraphKind};
use crate::input::cursor::CustomCursor;
use crate::input::events::PointerEvent;
use crate::input::tool::ToolName;
use crate::input::touchpad::Touchpad;
use crate::util::{self, Point};

/// Creates a box-shaped graph on pointer-down and stretches it from the
/// anchor to the pointer while dragging.
pub struct BoxTool {
    name: ToolName,
    kind: GraphKind,
    core: ToolCore,
    cursor: CustomCursor,
    graph: Option<GraphHandle>,
    anchor: Option<Point>,
}

impl BoxTool {
    fn new(
        name: ToolName,
        kind: GraphKind,
        container: Rc<GraphContainer>,
        touchpad: Rc<Touchpad>,
        style: StyleContext,
    ) -> Self {
        let mut cursor = CustomCursor::cross_hair();
        cursor.set_stroke_width(style.stroke_width);
        cursor.set_stroke_color(style.stroke_color);
        Self {
            name,
            kind,
            core: ToolCore::new(container, touchpad, style),
            cursor,
            graph: None,
            anchor: None,
        }
    }

    pub fn rectangle(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        Self::new(ToolName::Rectangle, GraphKind::Rect, container, touchpad, style)
    }

    pub fn ellipse(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        Self::new(ToolName::Ellipse, GraphKind::Ellipse, container, touchpad, style)
    }

    pub fn eraser(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        Self::new(ToolName::Eraser, GraphKind::Eraser, container, touchpad, style)
    }

    pub fn mosaic(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        Self::new(ToolName::Mosaic, GraphKind::Mosaic, container, touchpad, style)
    }

    pub fn gaussian_blur(
        container: Rc<GraphContainer>,
        touchpad: Rc<Touchpad>,
        style: StyleContext,
    ) -> Self {
        Self::new(
            ToolName::GaussianBlur,
            GraphKind::GaussianBlur,
            container,
            touchpad,
            style,
        )
    }

    fn apply(&self, graph: &mut Graph, bounds: BoxData) {
        if let Some(target) = graph.bounds_mut() {
            *target = bounds;
        }
        if let Some(stroke) = graph.stroke_mut() {
            *stroke = self.core.style.stroke();
        }
    }
}

impl AnnotationTool for BoxTool {
    fn name(&self) -> ToolName {
        self.name
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
        let mut graph = Graph::empty(self.kind);
        self.apply(&mut graph, BoxData::new(event.x, event.y, 0.0, 0.0));
        let handle = GraphHandle::new(graph);

        self.anchor = Some((event.x, event.y));
        self.graph = Some(handle.clone());
        self.add(handle);
    }

    fn on_mouse_move(&mut self, event: &PointerEvent) {
        let (Some(anchor), Some(graph)) = (self.anchor, self.graph.as_ref()) else {
            return;
        };
        let (x, y, width, height) = util::normalize_rect(anchor, (event.x, event.y));
        let bounds = BoxData::new(x, y, width, height);
        graph.set(|graph| self.apply(graph, bounds));
    }

    fn on_mouse_up(&mut self, _event: &PointerEvent) {
        self.anchor = None;
        self.graph = None;
    }

    fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }
}
