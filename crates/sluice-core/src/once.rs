//! [`AssignOnce`]: a value that is fixed exactly once during setup.
//!
//! Several run constants (the frozen column count, padding widths) are not
//! known when their owner is constructed but must never change afterwards.
//! Assigning twice, or reading before assignment, is a programming error
//! and panics with the value's name.

use std::fmt;
use std::sync::OnceLock;

/// A write-once slot with a diagnostic name.
///
/// # Examples
///
/// ```
/// use sluice_core::AssignOnce;
///
/// let width: AssignOnce<usize> = AssignOnce::new("n_width");
/// assert!(!width.is_set());
/// width.set(6);
/// assert_eq!(*width.get(), 6);
/// ```
pub struct AssignOnce<T> {
    name: &'static str,
    slot: OnceLock<T>,
}

impl<T> AssignOnce<T> {
    /// An unset slot.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: OnceLock::new(),
        }
    }

    /// Assign the value.
    ///
    /// # Panics
    ///
    /// If the slot has already been assigned.
    pub fn set(&self, value: T) {
        if self.slot.set(value).is_err() {
            panic!("'{}' assigned more than once", self.name);
        }
    }

    /// Read the value.
    ///
    /// # Panics
    ///
    /// If the slot has not been assigned yet.
    pub fn get(&self) -> &T {
        match self.slot.get() {
            Some(v) => v,
            None => panic!("'{}' read before it was assigned", self.name),
        }
    }

    /// Read the value if it has been assigned.
    pub fn try_get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Whether [`set`](Self::set) has been called.
    pub fn is_set(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Diagnostic name given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Clone> Clone for AssignOnce<T> {
    fn clone(&self) -> Self {
        let slot = OnceLock::new();
        if let Some(v) = self.slot.get() {
            let _ = slot.set(v.clone());
        }
        Self {
            name: self.name,
            slot,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AssignOnce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(v) => write!(f, "{} = {v:?}", self.name),
            None => write!(f, "{} = <unset>", self.name),
        }
    }
}
