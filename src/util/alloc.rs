//! Element types for observing construction and destruction from tests.

use std::cell::Cell;
use std::rc::Rc;

/// A zero-sized element type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZeroSized;

/// Shared counters for [`Tracked`] elements.
#[derive(Debug, Default)]
pub struct Counters {
    /// The number of elements created via [`Tracked::new`] or [`Clone`].
    pub constructed: Cell<usize>,
    /// The number of elements dropped.
    pub dropped: Cell<usize>,
}

impl Counters {
    /// Creates a new, shared set of counters, starting at zero.
    pub fn new() -> Rc<Counters> {
        Rc::new(Counters::default())
    }

    /// The number of constructed elements that haven't been dropped yet.
    pub fn live(&self) -> usize {
        self.constructed.get() - self.dropped.get()
    }
}

/// An element that counts its constructions and drops. Moves aren't observable, in the same way
/// that moving any Rust value is a bitwise copy.
#[derive(Debug)]
pub struct Tracked {
    /// The counters that this element reports to.
    pub counters: Rc<Counters>,
    /// A payload, used for equality.
    pub value: i32,
}

impl Tracked {
    /// Creates a new element, counting its construction.
    pub fn new(counters: &Rc<Counters>, value: i32) -> Tracked {
        counters.constructed.set(counters.constructed.get() + 1);
        Tracked {
            counters: Rc::clone(counters),
            value,
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Tracked::new(&self.counters, self.value)
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counters.dropped.set(self.counters.dropped.get() + 1);
    }
}

/// An element that counts its drops like [`Tracked`] and, when armed, panics while being dropped.
#[derive(Debug)]
pub struct PanicOnDrop {
    /// The counters that this element reports to.
    pub counters: Rc<Counters>,
    /// Whether dropping this element panics.
    pub armed: bool,
}

impl PanicOnDrop {
    /// Creates a new element, counting its construction.
    pub fn new(counters: &Rc<Counters>, armed: bool) -> PanicOnDrop {
        counters.constructed.set(counters.constructed.get() + 1);
        PanicOnDrop {
            counters: Rc::clone(counters),
            armed,
        }
    }
}

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        self.counters.dropped.set(self.counters.dropped.get() + 1);
        if self.armed {
            panic!("armed element dropped");
        }
    }
}
