//! Committed/undone graph storage: the undo/redo domain object.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::handle::GraphHandle;
use crate::observer::{ObservableType, Observer, ObserverSet, TypedObservable};
use crate::stack::Stack;

/// Owns the committed (undo) and undone (redo) stacks of graphs.
///
/// Iterating the container yields committed graphs bottom-to-top, which is
/// also paint order. The container observes every graph it has been given
/// and relays their change notifications to its own observers.
pub struct GraphContainer {
    committed: RefCell<Stack<GraphHandle>>,
    undone: RefCell<Stack<GraphHandle>>,
    observers: ObserverSet,
    self_ref: Weak<GraphContainer>,
}

impl GraphContainer {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            committed: RefCell::new(Stack::new()),
            undone: RefCell::new(Stack::new()),
            observers: ObserverSet::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Commits a graph. Any redo history is discarded.
    pub fn add(&self, graph: GraphHandle) {
        let relay: Weak<dyn Observer> = self.self_ref.clone();
        graph.add_observer(relay);

        log::debug!("Committing {:?} graph", graph.kind());
        self.committed.borrow_mut().push(graph);
        self.undone.borrow_mut().clear();

        self.notify_observers();
    }

    /// Moves the most recent committed graph to the redo stack.
    ///
    /// Returns `false` (and notifies nobody) when there is nothing to undo.
    pub fn undo_add(&self) -> bool {
        let graph = {
            let mut committed = self.committed.borrow_mut();
            if committed.is_empty() {
                return false;
            }
            match committed.pop() {
                Ok(graph) => graph,
                Err(err) => {
                    log::warn!("Undo skipped: {}", err);
                    return false;
                }
            }
        };
        self.undone.borrow_mut().push(graph);
        self.notify_observers();
        true
    }

    /// Moves the most recently undone graph back onto the committed stack.
    ///
    /// Returns `false` (and notifies nobody) when there is nothing to redo.
    pub fn redo_add(&self) -> bool {
        let graph = {
            let mut undone = self.undone.borrow_mut();
            if undone.is_empty() {
                return false;
            }
            match undone.pop() {
                Ok(graph) => graph,
                Err(err) => {
                    log::warn!("Redo skipped: {}", err);
                    return false;
                }
            }
        };
        self.committed.borrow_mut().push(graph);
        self.notify_observers();
        true
    }

    /// Snapshot of the committed graphs in paint order.
    pub fn graphs(&self) -> Vec<GraphHandle> {
        self.committed.borrow().iter().cloned().collect()
    }

    /// Most recently committed graph.
    pub fn top(&self) -> Option<GraphHandle> {
        self.committed.borrow().peek().cloned()
    }

    pub fn is_committed(&self, graph: &GraphHandle) -> bool {
        self.committed.borrow().iter().any(|g| g == graph)
    }

    pub fn is_undone(&self, graph: &GraphHandle) -> bool {
        self.undone.borrow().iter().any(|g| g == graph)
    }

    pub fn committed_len(&self) -> usize {
        self.committed.borrow().len()
    }

    pub fn undone_len(&self) -> usize {
        self.undone.borrow().len()
    }

    pub fn add_observer(&self, observer: Weak<dyn Observer>) -> bool {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, observer: &Weak<dyn Observer>) -> bool {
        self.observers.remove(observer)
    }

    fn notify_observers(&self) {
        self.observers.notify(self);
    }
}

impl TypedObservable for GraphContainer {
    fn type_name(&self) -> ObservableType {
        ObservableType::GraphContainer
    }
}

impl Observer for GraphContainer {
    fn update(&self, _source: &dyn TypedObservable) {
        self.notify_observers();
    }
}

impl IntoIterator for &GraphContainer {
    type Item = GraphHandle;
    type IntoIter = std::vec::IntoIter<GraphHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.graphs().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::graph::{BoxData, Graph, GraphKind};
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        hits: Cell<usize>,
        last: Cell<Option<ObservableType>>,
    }

    impl Observer for Counter {
        fn update(&self, source: &dyn TypedObservable) {
            self.hits.set(self.hits.get() + 1);
            self.last.set(Some(source.type_name()));
        }
    }

    fn watch(container: &GraphContainer) -> Rc<Counter> {
        let counter = Rc::new(Counter::default());
        let weak: Weak<Counter> = Rc::downgrade(&counter);
        container.add_observer(weak);
        counter
    }

    fn rect() -> GraphHandle {
        GraphHandle::new(Graph::empty(GraphKind::Rect))
    }

    #[test]
    fn add_clears_redo_history() {
        let container = GraphContainer::new();
        container.add(rect());
        container.add(rect());
        container.undo_add();
        container.undo_add();
        assert_eq!(container.undone_len(), 2);

        container.add(rect());

        assert_eq!(container.undone_len(), 0);
        assert!(!container.redo_add());
        assert_eq!(container.committed_len(), 1);
    }

    #[test]
    fn undo_redo_round_trip_restores_identity() {
        let container = GraphContainer::new();
        container.add(rect());
        let top = rect();
        container.add(top.clone());

        assert!(container.undo_add());
        assert!(container.redo_add());

        assert_eq!(container.top(), Some(top));
        assert_eq!(container.committed_len(), 2);
        assert_eq!(container.undone_len(), 0);
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_silent() {
        let container = GraphContainer::new();
        let counter = watch(&container);

        assert!(!container.undo_add());
        assert!(!container.redo_add());
        assert_eq!(counter.hits.get(), 0);
    }

    #[test]
    fn mutations_notify_observers() {
        let container = GraphContainer::new();
        let counter = watch(&container);

        container.add(rect());
        container.undo_add();
        container.redo_add();

        assert_eq!(counter.hits.get(), 3);
        assert_eq!(counter.last.get(), Some(ObservableType::GraphContainer));
    }

    #[test]
    fn graph_changes_are_relayed() {
        let container = GraphContainer::new();
        let graph = rect();
        container.add(graph.clone());
        let counter = watch(&container);

        graph.set(|g| {
            if let Some(bounds) = g.bounds_mut() {
                *bounds = BoxData::new(0.0, 0.0, 5.0, 5.0);
            }
        });

        assert_eq!(counter.hits.get(), 1);
        assert_eq!(counter.last.get(), Some(ObservableType::GraphContainer));
        assert_eq!(graph.observer_count(), 1);
    }

    #[test]
    fn iteration_follows_paint_order() {
        let container = GraphContainer::new();
        let a = rect();
        let b = rect();
        let c = rect();
        for graph in [&a, &b, &c] {
            container.add(graph.clone());
        }

        let order: Vec<GraphHandle> = (&*container).into_iter().collect();
        assert_eq!(order, vec![a, b, c]);
    }
}
