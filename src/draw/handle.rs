//! Shared, observable references to graphs.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use super::graph::{Graph, GraphKind};
use super::render::{self, RenderPass};
use crate::observer::{ObservableType, Observer, ObserverSet, TypedObservable};

/// Storage behind a [`GraphHandle`]: the graph plus whoever watches it.
pub struct GraphNode {
    graph: RefCell<Graph>,
    observers: ObserverSet,
}

impl TypedObservable for GraphNode {
    fn type_name(&self) -> ObservableType {
        ObservableType::Graph
    }
}

/// Reference-counted handle to a graph.
///
/// Cloning copies the reference, never the graph. Equality and hashing are by
/// identity, so the same graph can be found in the undo and redo stacks.
#[derive(Clone)]
pub struct GraphHandle(Rc<GraphNode>);

impl GraphHandle {
    pub fn new(graph: Graph) -> Self {
        Self(Rc::new(GraphNode {
            graph: RefCell::new(graph),
            observers: ObserverSet::new(),
        }))
    }

    pub fn kind(&self) -> GraphKind {
        self.0.graph.borrow().kind()
    }

    /// Reads the graph.
    pub fn with<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        f(&self.0.graph.borrow())
    }

    /// Mutates the graph in place, then notifies observers.
    ///
    /// The graph borrow ends before observers run, so they may read it.
    pub fn set<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        let result = {
            let mut graph = self.0.graph.borrow_mut();
            f(&mut graph)
        };
        self.0.observers.notify(self.0.as_ref());
        result
    }

    /// Scales geometry without notifying; zoom redraws everything afterwards.
    pub fn scale(&self, ratio: f64) {
        self.0.graph.borrow_mut().scale(ratio);
    }

    pub fn render(&self, ctx: &cairo::Context, pass: &RenderPass<'_>) {
        render::render_graph(ctx, &self.0.graph.borrow(), pass);
    }

    pub fn add_observer(&self, observer: Weak<dyn Observer>) -> bool {
        self.0.observers.add(observer)
    }

    pub fn remove_observer(&self, observer: &Weak<dyn Observer>) -> bool {
        self.0.observers.remove(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.0.observers.len()
    }

    pub fn ptr_eq(&self, other: &GraphHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for GraphHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for GraphHandle {}

impl Hash for GraphHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for GraphHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.graph.try_borrow() {
            Ok(graph) => f.debug_tuple("GraphHandle").field(&*graph).finish(),
            Err(_) => f.debug_tuple("GraphHandle").field(&"<borrowed>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::graph::BoxData;
    use std::cell::Cell;

    #[derive(Default)]
    struct WidthReader {
        target: RefCell<Option<GraphHandle>>,
        seen: Cell<Option<f64>>,
    }

    impl Observer for WidthReader {
        fn update(&self, _source: &dyn TypedObservable) {
            if let Some(handle) = self.target.borrow().as_ref() {
                let width = handle.with(|graph| graph.bounds().and_then(|b| b.width));
                self.seen.set(width);
            }
        }
    }

    #[test]
    fn observers_see_the_mutation_that_notified_them() {
        let handle = GraphHandle::new(Graph::empty(GraphKind::Rect));
        let reader = Rc::new(WidthReader::default());
        *reader.target.borrow_mut() = Some(handle.clone());
        let weak: Weak<WidthReader> = Rc::downgrade(&reader);
        handle.add_observer(weak);

        handle.set(|graph| {
            if let Some(bounds) = graph.bounds_mut() {
                *bounds = BoxData::new(0.0, 0.0, 42.0, 10.0);
            }
        });

        assert_eq!(reader.seen.get(), Some(42.0));
    }

    #[test]
    fn clones_share_identity() {
        let a = GraphHandle::new(Graph::empty(GraphKind::Ellipse));
        let b = GraphHandle::new(Graph::empty(GraphKind::Ellipse));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn scale_does_not_notify() {
        let handle = GraphHandle::new(Graph::Rect {
            bounds: BoxData::new(1.0, 2.0, 3.0, 4.0),
            stroke: Default::default(),
        });
        let reader = Rc::new(WidthReader::default());
        *reader.target.borrow_mut() = Some(handle.clone());
        let weak: Weak<WidthReader> = Rc::downgrade(&reader);
        handle.add_observer(weak);

        handle.scale(2.0);

        assert_eq!(reader.seen.get(), None);
        assert_eq!(
            handle.with(|graph| graph.bounds().and_then(|b| b.width)),
            Some(6.0)
        );
    }
}
