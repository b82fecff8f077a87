//! The input surface tools attach their listeners to.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::events::{EventKind, InputEvent};

pub type Listener = Rc<dyn Fn(&InputEvent)>;

/// Registration token returned by [`Touchpad::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Viewport-sized input surface.
///
/// Hosts feed pointer and wheel events in through [`Touchpad::dispatch`];
/// listeners registered for the event's kind run in registration order.
pub struct Touchpad {
    listeners: RefCell<Vec<(ListenerId, EventKind, Listener)>>,
    next_id: Cell<u64>,
    viewport: Cell<(f64, f64)>,
}

impl Touchpad {
    pub fn new(width: f64, height: f64) -> Rc<Self> {
        Rc::new(Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            viewport: Cell::new((width, height)),
        })
    }

    pub fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, listener));
        id
    }

    /// Removes a listener. Unknown or already-removed ids are ignored.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        before != listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers `event` to every listener of its kind.
    ///
    /// Listeners may add or remove listeners while running; the change takes
    /// effect from the next dispatch.
    pub fn dispatch(&self, event: &InputEvent) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        log::trace!("Dispatching {:?} to {} listener(s)", kind, snapshot.len());
        for listener in snapshot {
            listener(event);
        }
    }

    /// Logical size of the visible area.
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport.get()
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.viewport.set((width, height));
    }
}
