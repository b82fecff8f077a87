//! Generic pointer and wheel event types delivered by the input surface.
//!
//! Coordinates are logical pixels in the same space as graph geometry.

/// Button bit for the primary (left) button in [`PointerEvent::buttons`].
pub const PRIMARY_BUTTON: u8 = 1;

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (primary drawing button)
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// Pointer left the input surface
    Leave,
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    /// Button that changed state (meaningful for down/up)
    pub button: MouseButton,
    /// Bitmask of buttons held while the event fired
    pub buttons: u8,
    /// Alt modifier held
    pub alt: bool,
}

impl PointerEvent {
    /// Primary button pressed at `(x, y)`.
    pub fn down(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Down,
            x,
            y,
            button: MouseButton::Left,
            buttons: PRIMARY_BUTTON,
            alt: false,
        }
    }

    /// Motion to `(x, y)` with `buttons` held.
    pub fn moved(x: f64, y: f64, buttons: u8) -> Self {
        Self {
            kind: PointerEventKind::Move,
            x,
            y,
            button: MouseButton::Left,
            buttons,
            alt: false,
        }
    }

    /// Primary button released at `(x, y)`.
    pub fn up(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Up,
            x,
            y,
            button: MouseButton::Left,
            buttons: 0,
            alt: false,
        }
    }

    pub fn leave(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Leave,
            x,
            y,
            button: MouseButton::Left,
            buttons: 0,
            alt: false,
        }
    }

    pub fn with_button(mut self, button: MouseButton, buttons: u8) -> Self {
        self.button = button;
        self.buttons = buttons;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    /// True when exactly the primary button is held.
    pub fn is_primary_pressed(&self) -> bool {
        self.buttons == PRIMARY_BUTTON
    }
}

/// A wheel event. Negative `delta_y` scrolls up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub x: f64,
    pub y: f64,
    pub delta_y: f64,
}

impl WheelEvent {
    pub fn new(x: f64, y: f64, delta_y: f64) -> Self {
        Self { x, y, delta_y }
    }

    pub fn is_scroll_up(&self) -> bool {
        self.delta_y < 0.0
    }
}

/// Listener slot on the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Pointer(event) => match event.kind {
                PointerEventKind::Down => EventKind::PointerDown,
                PointerEventKind::Move => EventKind::PointerMove,
                PointerEventKind::Up => EventKind::PointerUp,
                PointerEventKind::Leave => EventKind::PointerLeave,
            },
            InputEvent::Wheel(_) => EventKind::Wheel,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match self {
            InputEvent::Pointer(event) => (event.x, event.y),
            InputEvent::Wheel(event) => (event.x, event.y),
        }
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        InputEvent::Pointer(event)
    }
}

impl From<WheelEvent> for InputEvent {
    fn from(event: WheelEvent) -> Self {
        InputEvent::Wheel(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_filter_requires_only_left_button() {
        assert!(PointerEvent::down(0.0, 0.0).is_primary_pressed());
        assert!(!PointerEvent::moved(0.0, 0.0, 0).is_primary_pressed());
        // left + right held is not a primary-only press
        assert!(!PointerEvent::moved(0.0, 0.0, 0b11).is_primary_pressed());
        let right = PointerEvent::down(0.0, 0.0).with_button(MouseButton::Right, 0b10);
        assert!(!right.is_primary_pressed());
    }

    #[test]
    fn event_kinds_map_to_listener_slots() {
        let events: [InputEvent; 5] = [
            PointerEvent::down(1.0, 2.0).into(),
            PointerEvent::moved(1.0, 2.0, 1).into(),
            PointerEvent::up(1.0, 2.0).into(),
            PointerEvent::leave(1.0, 2.0).into(),
            WheelEvent::new(1.0, 2.0, -1.0).into(),
        ];
        let kinds: Vec<EventKind> = events.iter().map(InputEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::PointerDown,
                EventKind::PointerMove,
                EventKind::PointerUp,
                EventKind::PointerLeave,
                EventKind::Wheel,
            ]
        );
        assert!(events.iter().all(|event| event.position() == (1.0, 2.0)));
    }
}
