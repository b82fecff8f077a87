//! Annotation tools: the input state machine that turns pointer and wheel
//! events into graph mutations.
//!
//! A tool is inactive until [`activate`] attaches its listeners to the
//! touchpad, and goes back to inactive on [`deactivate`]. Every tool creates
//! its graph on pointer-down, commits it to the container right away, and
//! mutates it in place while the pointer moves.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::cursor::CustomCursor;
use super::events::{EventKind, InputEvent, MouseButton, PointerEvent, WheelEvent};
use super::tool::ToolName;
use super::touchpad::{ListenerId, Touchpad};
use crate::draw::{Color, GraphContainer, GraphHandle, RED, StrokeStyle};

pub mod box_tool;
pub mod curve_tool;
pub mod line_tool;
pub mod number_tool;
pub mod text_tool;


pub use box_tool::BoxTool;
pub use curve_tool::CurveTool;
pub use line_tool::LineTool;
pub use number_tool::NumberTool;
pub use text_tool::{EditorId, EditorRegistry, TextEditor, TextTool};

/// Stroke width bounds for the default wheel behaviour.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MAX_STROKE_WIDTH: f64 = 10.0;

/// Per-tool mutable style, adjusted live by the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleContext {
    pub stroke_width: f64,
    pub stroke_color: Color,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            stroke_color: RED,
        }
    }
}

impl StyleContext {
    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle::new(self.stroke_color, self.stroke_width)
    }
}

/// State every tool carries: where it commits graphs, where it listens, and
/// its current style.
pub struct ToolCore {
    pub container: Rc<GraphContainer>,
    pub touchpad: Rc<Touchpad>,
    pub style: StyleContext,
    primary_button_only: bool,
    listeners: Vec<ListenerId>,
}

impl ToolCore {
    pub fn new(container: Rc<GraphContainer>, touchpad: Rc<Touchpad>, style: StyleContext) -> Self {
        Self {
            container,
            touchpad,
            style,
            primary_button_only: true,
            listeners: Vec::new(),
        }
    }

    /// Deliver pointer events regardless of which buttons are held.
    pub fn accept_any_button(mut self) -> Self {
        self.primary_button_only = false;
        self
    }

    pub fn primary_button_only(&self) -> bool {
        self.primary_button_only
    }

    pub fn is_active(&self) -> bool {
        !self.listeners.is_empty()
    }
}

/// Steps `value` by one in the wheel's direction, clamped to `[min, max]`.
/// A zero delta leaves it unchanged.
pub fn wheel_step(value: f64, event: &WheelEvent, min: f64, max: f64) -> f64 {
    if event.delta_y == 0.0 {
        value
    } else if event.is_scroll_up() {
        (value + 1.0).min(max)
    } else {
        (value - 1.0).max(min)
    }
}

/// Behaviour shared by all annotation tools.
pub trait AnnotationTool {
    fn name(&self) -> ToolName;

    fn core(&self) -> &ToolCore;

    fn core_mut(&mut self) -> &mut ToolCore;

    fn cursor(&self) -> &CustomCursor;

    fn cursor_mut(&mut self) -> &mut CustomCursor;

    fn on_mouse_down(&mut self, event: &PointerEvent);

    fn on_mouse_move(&mut self, event: &PointerEvent);

    fn on_mouse_up(&mut self, _event: &PointerEvent) {}

    /// Adjusts the stroke width within `[1, 10]` and mirrors it into the
    /// cursor.
    fn on_wheel(&mut self, event: &WheelEvent) {
        let width = wheel_step(
            self.core().style.stroke_width,
            event,
            MIN_STROKE_WIDTH,
            MAX_STROKE_WIDTH,
        );
        self.core_mut().style.stroke_width = width;
        self.cursor_mut().set_stroke_width(width);
        log::debug!("{} stroke width -> {}", self.name(), width);
    }

    /// True between pointer-down and pointer-up.
    fn is_dragging(&self) -> bool {
        false
    }

    fn on_activate(&mut self) {}

    fn on_deactivate(&mut self) {}

    fn add(&self, graph: GraphHandle) {
        self.core().container.add(graph);
    }
}

pub type SharedTool = Rc<RefCell<dyn AnnotationTool>>;

// ============================================================================
// Activation
// ============================================================================

/// Attaches the tool's pointer, wheel and leave listeners to its touchpad.
/// Does nothing if the tool is already active.
pub fn activate(tool: &SharedTool) {
    if tool.borrow().core().is_active() {
        log::debug!("Annotation tool {} already active", tool.borrow().name());
        return;
    }
    let touchpad = Rc::clone(&tool.borrow().core().touchpad);
    let weak = Rc::downgrade(tool);

    let listeners = vec![
        touchpad.add_listener(EventKind::PointerDown, forward(&weak, on_pointer_down)),
        touchpad.add_listener(EventKind::PointerMove, forward(&weak, on_pointer_move)),
        touchpad.add_listener(EventKind::PointerUp, forward(&weak, on_pointer_up)),
        touchpad.add_listener(EventKind::PointerLeave, forward(&weak, on_pointer_leave)),
        touchpad.add_listener(EventKind::Wheel, forward(&weak, on_wheel)),
    ];

    let mut tool = tool.borrow_mut();
    tool.core_mut().listeners = listeners;
    tool.cursor_mut().activate();
    tool.on_activate();
    log::debug!("Annotation tool {} activated", tool.name());
}

/// Detaches the tool's listeners. Safe on a tool that was never activated.
pub fn deactivate(tool: &SharedTool) {
    let (touchpad, listeners) = {
        let mut tool = tool.borrow_mut();
        let listeners = std::mem::take(&mut tool.core_mut().listeners);
        (Rc::clone(&tool.core().touchpad), listeners)
    };
    for id in listeners {
        touchpad.remove_listener(id);
    }

    let mut tool = tool.borrow_mut();
    tool.cursor_mut().deactivate();
    tool.on_deactivate();
    log::debug!("Annotation tool {} deactivated", tool.name());
}

fn forward(
    weak: &Weak<RefCell<dyn AnnotationTool>>,
    handler: fn(&mut dyn AnnotationTool, &InputEvent),
) -> Rc<dyn Fn(&InputEvent)> {
    let weak = weak.clone();
    Rc::new(move |event| {
        let Some(tool) = weak.upgrade() else {
            return;
        };
        let Ok(mut tool) = tool.try_borrow_mut() else {
            log::warn!("Dropping {:?}: tool is busy", event.kind());
            return;
        };
        handler(&mut *tool, event);
    })
}

fn on_pointer_down(tool: &mut dyn AnnotationTool, event: &InputEvent) {
    let InputEvent::Pointer(event) = event else {
        return;
    };
    if tool.core().primary_button_only && !event.is_primary_pressed() {
        log::trace!("Ignoring non-primary pointer-down");
        return;
    }
    tool.on_mouse_down(event);
}

fn on_pointer_move(tool: &mut dyn AnnotationTool, event: &InputEvent) {
    let InputEvent::Pointer(event) = event else {
        return;
    };
    tool.cursor_mut().on_pointer_move(event.x, event.y);

    if tool.core().primary_button_only && !event.is_primary_pressed() {
        // Released outside the surface: the up event never arrived
        if tool.is_dragging() {
            log::warn!(
                "{} missed pointer-up, finishing drag at ({}, {})",
                tool.name(),
                event.x,
                event.y
            );
            tool.on_mouse_up(event);
        }
        return;
    }
    tool.on_mouse_move(event);
}

fn on_pointer_up(tool: &mut dyn AnnotationTool, event: &InputEvent) {
    let InputEvent::Pointer(event) = event else {
        return;
    };
    if tool.core().primary_button_only && event.button != MouseButton::Left {
        return;
    }
    tool.on_mouse_up(event);
}

fn on_pointer_leave(tool: &mut dyn AnnotationTool, _event: &InputEvent) {
    tool.cursor_mut().on_pointer_leave();
}

fn on_wheel(tool: &mut dyn AnnotationTool, event: &InputEvent) {
    if let InputEvent::Wheel(event) = event {
        tool.on_wheel(event);
    }
}
