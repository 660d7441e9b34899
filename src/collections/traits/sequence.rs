use std::ops::DerefMut;

use crate::collections::contiguous::SmallVector;

/// A growable sequence backed by inline storage, independent of how many elements fit inline.
///
/// This allows interfaces to accept any [`SmallVector<T, N>`] through `&mut dyn Sequence<T>`
/// without naming `N`. Read access goes through the slice, via [`Deref`](std::ops::Deref).
///
/// # Examples
/// ```
/// # use compact_lib::collections::contiguous::SmallVector;
/// # use compact_lib::collections::traits::Sequence;
/// fn fill(seq: &mut dyn Sequence<u8>, count: u8) {
///     for i in 0..count {
///         seq.push_back(i);
///     }
/// }
///
/// let mut small = SmallVector::<u8, 4>::new();
/// let mut large = SmallVector::<u8, 16>::new();
/// fill(&mut small, 6);
/// fill(&mut large, 6);
/// assert_eq!(&*small, &*large);
/// assert!(!small.is_small());
/// assert!(large.is_small());
/// ```
pub trait Sequence<T>: DerefMut<Target = [T]> {
    /// Returns the number of elements the sequence can hold without growing.
    fn capacity(&self) -> usize;

    /// Returns true if the elements are stored inline rather than on the heap.
    fn is_small(&self) -> bool;

    /// Appends `value`, growing if required.
    fn push_back(&mut self, value: T);

    /// Drops the last element.
    ///
    /// # Panics
    /// Panics if the sequence is empty.
    fn pop_back(&mut self);

    /// Drops all elements past the first `len`.
    fn truncate(&mut self, len: usize);

    /// Drops all elements, keeping the capacity.
    fn clear(&mut self) {
        self.truncate(0);
    }
}

impl<T, const N: usize> Sequence<T> for SmallVector<T, N> {
    fn capacity(&self) -> usize {
        SmallVector::capacity(self)
    }

    fn is_small(&self) -> bool {
        SmallVector::is_small(self)
    }

    fn push_back(&mut self, value: T) {
        SmallVector::push_back(self, value);
    }

    fn pop_back(&mut self) {
        SmallVector::pop_back(self);
    }

    fn truncate(&mut self, len: usize) {
        SmallVector::truncate(self, len);
    }

    fn clear(&mut self) {
        SmallVector::clear(self);
    }
}
