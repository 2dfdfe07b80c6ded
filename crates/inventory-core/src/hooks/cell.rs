//! State Cell
//!
//! Storage seam for hook state.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, interior-mutable slot holding one hook's state.
///
/// Implementations must not hold a borrow past the closure; hooks call
/// these between awaits, never across them.
pub trait StateCell<T> {
    fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    fn update_state<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> StateCell<T> for Rc<RefCell<T>> {
    fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.borrow())
    }

    fn update_state<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}
