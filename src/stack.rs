//! LIFO storage for committed and undone annotation graphs.

use thiserror::Error;

/// Errors reported by [`Stack`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("Failed to pop stack element because stack is empty")]
    Empty,
}

/// Generic LIFO stack, iterable from bottom (first pushed) to top.
///
/// Items are owned values, so an absent item can never be pushed.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the top item.
    ///
    /// Callers that can race an empty stack should check [`Stack::is_empty`] first.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.items.pop().ok_or(StackError::Empty)
    }

    /// Returns the top item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns the item at `index`, counted from the bottom of the stack.
    pub fn peek_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates from bottom to top (insertion order).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
