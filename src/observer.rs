//! Change notification between stateful entities and whoever watches them.
//!
//! Graphs, the graph container and the renderer talk to each other through
//! this channel instead of holding direct references in both directions.
//! Observers are held weakly so a watcher going away never keeps the watched
//! entity alive (and vice versa).

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Type tag carried by every observable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservableType {
    /// A single annotation shape.
    Graph,
    /// The owner of the committed/undone graph stacks.
    GraphContainer,
}

/// An entity that can be watched.
pub trait TypedObservable {
    fn type_name(&self) -> ObservableType;
}

/// Receives "I changed" announcements from observables it registered with.
pub trait Observer {
    fn update(&self, source: &dyn TypedObservable);
}

/// Identity-based set of registered observers.
#[derive(Default)]
pub struct ObserverSet {
    observers: RefCell<Vec<Weak<dyn Observer>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Returns `false` if it was already registered.
    pub fn add(&self, observer: Weak<dyn Observer>) -> bool {
        let mut observers = self.observers.borrow_mut();
        observers.retain(|existing| existing.strong_count() > 0);
        if observers
            .iter()
            .any(|existing| Weak::ptr_eq(existing, &observer))
        {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Unregisters an observer. Returns `false` if it was not registered.
    pub fn remove(&self, observer: &Weak<dyn Observer>) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|existing| !Weak::ptr_eq(existing, observer));
        observers.len() != before
    }

    /// Number of live observers.
    pub fn len(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `update` on every live observer.
    ///
    /// Iterates over a snapshot, so observers may register or unregister
    /// (themselves or others) from inside `update`.
    pub fn notify(&self, source: &dyn TypedObservable) {
        let snapshot: Vec<Rc<dyn Observer>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|observer| observer.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };

        for observer in snapshot {
            observer.update(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Source;

    impl TypedObservable for Source {
        fn type_name(&self) -> ObservableType {
            ObservableType::Graph
        }
    }

    #[derive(Default)]
    struct Counter {
        hits: Cell<usize>,
    }

    impl Observer for Counter {
        fn update(&self, source: &dyn TypedObservable) {
            assert_eq!(source.type_name(), ObservableType::Graph);
            self.hits.set(self.hits.get() + 1);
        }
    }

    fn weak_of(counter: &Rc<Counter>) -> Weak<dyn Observer> {
        let weak: Weak<Counter> = Rc::downgrade(counter);
        weak
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let set = ObserverSet::new();
        let counter = Rc::new(Counter::default());

        assert!(set.add(weak_of(&counter)));
        assert!(!set.add(weak_of(&counter)));
        set.notify(&Source);

        assert_eq!(counter.hits.get(), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn removed_observer_is_not_notified() {
        let set = ObserverSet::new();
        let counter = Rc::new(Counter::default());
        set.add(weak_of(&counter));

        assert!(set.remove(&weak_of(&counter)));
        assert!(!set.remove(&weak_of(&counter)));
        set.notify(&Source);

        assert_eq!(counter.hits.get(), 0);
    }

    #[test]
    fn dropped_observers_are_pruned() {
        let set = ObserverSet::new();
        let counter = Rc::new(Counter::default());
        set.add(weak_of(&counter));
        drop(counter);

        set.notify(&Source);
        assert!(set.is_empty());
    }

    struct SelfRemoving {
        set: Rc<ObserverSet>,
        me: RefCell<Option<Weak<dyn Observer>>>,
        hits: Cell<usize>,
    }

    impl Observer for SelfRemoving {
        fn update(&self, _source: &dyn TypedObservable) {
            self.hits.set(self.hits.get() + 1);
            if let Some(me) = self.me.borrow().as_ref() {
                self.set.remove(me);
            }
        }
    }

    #[test]
    fn observer_can_unregister_during_notify() {
        let set = Rc::new(ObserverSet::new());
        let observer = Rc::new(SelfRemoving {
            set: Rc::clone(&set),
            me: RefCell::new(None),
            hits: Cell::new(0),
        });
        let weak: Weak<SelfRemoving> = Rc::downgrade(&observer);
        let weak: Weak<dyn Observer> = weak;
        *observer.me.borrow_mut() = Some(weak.clone());
        set.add(weak);

        set.notify(&Source);
        set.notify(&Source);

        assert_eq!(observer.hits.get(), 1);
    }
}
