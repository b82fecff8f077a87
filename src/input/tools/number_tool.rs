//! Numbered-marker stamping tool.

use std::rc::Rc;

use super::{AnnotationTool, StyleContext, ToolCore, wheel_step};
use crate::draw::{Graph, GraphContainer, GraphHandle, ImageData};
use crate::input::cursor::{CircleNumberStyle, CursorShape, CustomCursor};
use crate::input::events::{PointerEvent, WheelEvent};
use crate::input::tool::ToolName;
use crate::input::touchpad::Touchpad;

pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 100;

/// Stamps a circled number centred on each pointer-down and counts up.
///
/// The wheel sets the next number directly.
pub struct NumberTool {
    core: ToolCore,
    cursor: CustomCursor,
    num: u32,
}

impl NumberTool {
    pub fn new(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        let cursor = CustomCursor::new(CursorShape::CircleNumber(CircleNumberStyle {
            fill_color: style.stroke_color,
            stroke_color: style.stroke_color,
            ..CircleNumberStyle::default()
        }));
        Self {
            core: ToolCore::new(container, touchpad, style),
            cursor,
            num: MIN_NUMBER,
        }
    }

    /// Number the next stamp will carry.
    pub fn next_number(&self) -> u32 {
        self.num
    }

    fn set_number(&mut self, num: u32) {
        self.num = num;
        self.cursor.set_number(num);
    }
}

impl AnnotationTool for NumberTool {
    fn name(&self) -> ToolName {
        ToolName::Number
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
        let CursorShape::CircleNumber(style) = self.cursor.shape() else {
            return;
        };
        let diameter = style.diameter();
        let stamp = match style.rasterize() {
            Ok(stamp) => stamp,
            Err(err) => {
                log::warn!("Failed to rasterize number {}: {}", self.num, err);
                return;
            }
        };
        let (width, height) = (stamp.width() as f64, stamp.height() as f64);

        self.add(GraphHandle::new(Graph::Image(ImageData {
            x: Some(event.x - diameter / 2.0),
            y: Some(event.y - diameter / 2.0),
            width: Some(width),
            height: Some(height),
            source: Some(stamp),
        })));
        log::debug!("Stamped number {} at ({}, {})", self.num, event.x, event.y);

        self.set_number(self.num + 1);
    }

    fn on_mouse_move(&mut self, _event: &PointerEvent) {}

    fn on_wheel(&mut self, event: &WheelEvent) {
        let num = wheel_step(
            self.num as f64,
            event,
            MIN_NUMBER as f64,
            MAX_NUMBER as f64,
        );
        self.set_number(num as u32);
    }
}
