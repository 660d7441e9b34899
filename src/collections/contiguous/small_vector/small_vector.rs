use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

use super::storage::Storage;
use crate::collections::contiguous::capacity::next_capacity;
use crate::collections::contiguous::raw::{
    self, BufferGuard, destroy_range, uninitialized_move_and_destroy_range,
};
use crate::util::error::CapacityOverflow;
use crate::util::result::ResultExtension;
use crate::{guarantees, invariant, requires};

/// A contiguous, growable collection that stores up to `N` elements inline, within the
/// SmallVector itself, before moving them to a heap allocation.
///
/// Every SmallVector starts out "small": its elements live in the inline buffer. Once more than
/// the current capacity is needed, the elements are moved into a heap buffer whose capacity is
/// the smallest power of two that covers the requested length (see
/// [`next_capacity`](crate::collections::contiguous::next_capacity)). A SmallVector never moves
/// back into its inline buffer by itself, not even after [`clear`](SmallVector::clear). Only
/// [`take`](SmallVector::take) and [`assign_from`](SmallVector::assign_from) leave a SmallVector
/// small and empty again.
///
/// Misuse, such as indexing out of bounds or popping from an empty SmallVector, is reported
/// through the [`contract`](crate::contract) facility.
///
/// `N` must be at least 1, which is checked at compile time.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the SmallVector.
/// - `m`: The number of items being added.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `push_back` | `O(1)`*, `O(n)` |
/// | `pop_back` | `O(1)` |
/// | `clear` | `O(n)` |
/// | `resize` | `O(n+m)` |
/// | `append` | `O(n+m)` |
/// | `take` | `O(1)`**, `O(n)` |
///
/// \* If the SmallVector doesn't have enough capacity for the new element, `push_back` will take
/// `O(n)`.
///
/// \** Taking a heap backed SmallVector only moves its buffer, while a small one moves each
/// element.
pub struct SmallVector<T, const N: usize> {
    pub(crate) storage: Storage<T, N>,
    pub(crate) len: usize,
}

impl<T, const N: usize> SmallVector<T, N> {
    const NON_EMPTY_INLINE: () = assert!(N >= 1, "A SmallVector needs at least one inline slot.");

    /// Creates a new, empty SmallVector using its inline storage, with capacity `N`.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let vec: SmallVector<u8, 8> = SmallVector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.capacity(), 8);
    /// assert!(vec.is_small());
    /// ```
    pub const fn new() -> SmallVector<T, N> {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY_INLINE;

        SmallVector {
            storage: Storage::inline(),
            len: 0,
        }
    }

    /// Creates a SmallVector from an iterator with a known length, growing at most once.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let vec = SmallVector::<u8, 2>::from_iter_sized(1_u8..=3);
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// assert_eq!(vec.capacity(), 4);
    /// ```
    pub fn from_iter_sized<I>(iter: I) -> SmallVector<T, N>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut vec = SmallVector::new();
        vec.append(iter);
        vec
    }

    /// Returns the number of elements in the SmallVector.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the SmallVector contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the SmallVector can hold without growing. This is `N` while
    /// the SmallVector is small, and a power of two afterwards.
    pub const fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns true if the elements are stored inline rather than on the heap.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<u32, 1>::new();
    /// vec.push_back(1);
    /// assert!(vec.is_small());
    /// vec.push_back(2);
    /// assert!(!vec.is_small());
    /// ```
    pub const fn is_small(&self) -> bool {
        self.storage.is_inline()
    }

    /// Returns a raw pointer to the first element slot. The pointer is invalidated by growth, and
    /// moving a small SmallVector moves its elements along with it.
    pub const fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns a mutable raw pointer to the first element slot. See [`SmallVector::as_ptr`].
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Returns the elements of the SmallVector as a slice.
    pub const fn as_slice(&self) -> &[T] {
        // SAFETY: The first len slots are initialized, properly aligned and contained in a single
        // buffer. Borrowing self prevents mutation for the lifetime of the slice.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Returns the elements of the SmallVector as a mutable slice.
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: See as_slice, with the mutable borrow of self guaranteeing exclusivity.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Appends `value` to the end of the SmallVector, growing if required.
    ///
    /// # Panics
    /// Panics if the capacity required for growth can't be represented.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<i32, 2>::new();
    /// vec.push_back(33);
    /// vec.push_back(34);
    /// assert_eq!(vec.capacity(), 2);
    /// vec.push_back(35);
    /// assert_eq!(vec.capacity(), 4);
    /// assert_eq!(&*vec, &[33, 34, 35]);
    /// ```
    #[inline]
    pub fn push_back(&mut self, value: T) {
        if self.len == self.capacity() {
            self.grow_to_hold_at_least(self.len + 1);
        }
        // SAFETY: There is room for at least one more element.
        unsafe { self.push_unchecked(value) }
    }

    /// Appends an element produced by `make` to the end of the SmallVector, growing before `make`
    /// is called. Returns a reference to the new element.
    ///
    /// If `make` panics, the SmallVector keeps its elements, although it may have grown.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<String, 2>::new();
    /// vec.emplace_back(|| "hello".to_owned()).push_str(" world");
    /// assert_eq!(vec[0], "hello world");
    /// ```
    pub fn emplace_back<F: FnOnce() -> T>(&mut self, make: F) -> &mut T {
        if self.len == self.capacity() {
            self.grow_to_hold_at_least(self.len + 1);
        }
        // SAFETY: There is room for at least one more element.
        unsafe { self.push_unchecked(make()) };
        let last = self.len - 1;
        &mut self.as_mut_slice()[last]
    }

    /// Writes `value` into the slot after the last element.
    ///
    /// # Safety
    /// The SmallVector must have room for at least one more element.
    pub(crate) unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: The caller guarantees that the slot at len is within capacity.
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Drops the last element of the SmallVector.
    ///
    /// # Panics
    /// Panics if the SmallVector is empty. When contract checks are disabled, popping from an empty
    /// SmallVector does nothing.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<i32, 4>::from_iter_sized([1, 2, 3]);
    /// vec.pop_back();
    /// assert_eq!(&*vec, &[1, 2]);
    /// ```
    pub fn pop_back(&mut self) {
        requires!(!self.is_empty());
        if self.len > 0 {
            self.truncate(self.len - 1);
        }
    }

    /// Removes the last element of the SmallVector and returns it, or returns [`None`] if it is
    /// empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        // SAFETY: The slot at the old len - 1 is initialized, and is no longer counted by len, so
        // reading it moves the value out.
        Some(unsafe { self.as_ptr().add(self.len).read() })
    }

    /// Returns a reference to the first element.
    ///
    /// # Panics
    /// Panics if the SmallVector is empty.
    pub fn front(&self) -> &T {
        requires!(!self.is_empty());
        &self.as_slice()[0]
    }

    /// Returns a mutable reference to the first element.
    ///
    /// # Panics
    /// Panics if the SmallVector is empty.
    pub fn front_mut(&mut self) -> &mut T {
        requires!(!self.is_empty());
        &mut self.as_mut_slice()[0]
    }

    /// Returns a reference to the last element.
    ///
    /// # Panics
    /// Panics if the SmallVector is empty.
    pub fn back(&self) -> &T {
        requires!(!self.is_empty());
        &self.as_slice()[self.len.wrapping_sub(1)]
    }

    /// Returns a mutable reference to the last element.
    ///
    /// # Panics
    /// Panics if the SmallVector is empty.
    pub fn back_mut(&mut self) -> &mut T {
        requires!(!self.is_empty());
        let last = self.len.wrapping_sub(1);
        &mut self.as_mut_slice()[last]
    }

    /// Drops all elements past the first `len`. Does nothing if the SmallVector holds `len` or
    /// fewer elements. The capacity is unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let excess = self.len - len;
        // Shorten first, so that a panicking drop can't cause a double drop.
        self.len = len;
        // SAFETY: The slots from len to the old len were initialized and are no longer counted.
        unsafe { destroy_range(self.as_mut_ptr().add(len), excess) };
    }

    /// Drops all elements. The capacity is unchanged and a heap backed SmallVector stays on the
    /// heap.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<i32, 1>::from_iter_sized([1, 2, 3]);
    /// vec.clear();
    /// assert!(vec.is_empty());
    /// assert_eq!(vec.capacity(), 4);
    /// assert!(!vec.is_small());
    /// ```
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the SmallVector to `len` elements, calling `make` to create each missing element.
    ///
    /// # Panics
    /// Panics if the capacity required for growth can't be represented.
    pub fn resize_with<F: FnMut() -> T>(&mut self, len: usize, mut make: F) {
        if len <= self.len {
            self.truncate(len);
            return;
        }

        if len > self.capacity() {
            self.grow_to_hold_at_least(len);
        }
        while self.len < len {
            // SAFETY: The capacity is at least len.
            unsafe { self.push_unchecked(make()) };
        }

        guarantees!(self.len == len);
    }

    /// Ensures that the SmallVector can hold `extra` more elements without growing again.
    ///
    /// # Panics
    /// Panics if the required capacity can't be represented.
    pub fn reserve(&mut self, extra: usize) {
        let required = self
            .len
            .checked_add(extra)
            .ok_or(CapacityOverflow { requested: usize::MAX })
            .throw();

        if required > self.capacity() {
            self.grow_to_hold_at_least(required);
        }
    }

    /// Appends all elements produced by `iter`, whose length is known ahead of time. The
    /// SmallVector grows at most once, before any element is appended.
    ///
    /// Iterators with an unknown length can be appended with [`SmallVector::append_iter`].
    ///
    /// # Panics
    /// Panics if the capacity required for growth can't be represented.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<i32, 2>::new();
    /// vec.push_back(1);
    /// vec.append([2, 3, 4, 5]);
    /// assert_eq!(vec.capacity(), 8);
    /// assert_eq!(&*vec, &[1, 2, 3, 4, 5]);
    /// ```
    pub fn append<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        self.reserve(iter.len());

        // An iterator that reports the wrong length only costs extra growth.
        for item in iter {
            self.push_back(item);
        }
    }

    /// Appends all elements produced by `iter` one at a time, growing as needed.
    ///
    /// # Panics
    /// Panics if the capacity required for growth can't be represented.
    pub fn append_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }

    /// Moves all elements out of `self` into a new SmallVector, leaving `self` empty and small.
    ///
    /// A heap backed SmallVector hands over its buffer without touching any element. A small
    /// one moves its elements one by one into the new SmallVector's inline storage.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<i32, 2>::from_iter_sized([1, 2, 3]);
    /// let ptr = vec.as_ptr();
    ///
    /// let taken = vec.take();
    /// assert_eq!(taken.as_ptr(), ptr);
    /// assert!(vec.is_empty());
    /// assert!(vec.is_small());
    /// ```
    pub fn take(&mut self) -> SmallVector<T, N> {
        let mut taken = SmallVector::new();
        taken.assign_from(self);
        taken
    }

    /// Replaces the elements of `self` with those of `other`, leaving `other` empty and small.
    ///
    /// If `other` is heap backed, `self` drops its own elements, releases its storage and adopts
    /// the buffer of `other`. If `other` is small, `self` returns to its inline storage (when it
    /// isn't there already), overwrites its existing elements with those of `other`, drops any
    /// elements that are left over, and then moves the remaining elements of `other` in.
    pub fn assign_from(&mut self, other: &mut SmallVector<T, N>) {
        if let Some((ptr, cap)) = other.storage.heap_parts() {
            self.reset();
            self.storage = Storage::Heap { ptr, cap };
            self.len = mem::replace(&mut other.len, 0);
            other.storage = Storage::inline();
            return;
        }

        if !self.is_small() {
            self.reset();
        }

        let incoming = mem::replace(&mut other.len, 0);
        let reused = cmp::min(self.len, incoming);
        let src = other.as_mut_ptr();

        for i in 0..reused {
            // SAFETY: Slot i is initialized in both SmallVectors. The value in other is no longer
            // counted by its len, so reading it moves it.
            let old = unsafe { ptr::replace(self.as_mut_ptr().add(i), src.add(i).read()) };
            drop(old);
        }
        self.truncate(incoming);

        // SAFETY: The slots of other from reused to incoming are initialized and uncounted. self is
        // small with capacity N >= incoming, and its slots from reused onwards are uninitialized.
        unsafe {
            uninitialized_move_and_destroy_range(
                src.add(reused),
                incoming - reused,
                self.as_mut_ptr().add(reused),
            );
        }
        self.len = incoming;

        invariant!(other.is_small() && other.is_empty());
    }

    /// Moves all elements into a new heap buffer that can hold at least `required` elements.
    ///
    /// # Panics
    /// Panics if `required` doesn't exceed the current capacity, or if the new capacity can't be
    /// represented.
    pub(crate) fn grow_to_hold_at_least(&mut self, required: usize) {
        requires!(required > self.capacity());
        if required <= self.capacity() {
            return;
        }

        let new_cap = next_capacity(required);
        let new_ptr = raw::allocate::<T>(new_cap);

        // SAFETY: The first len slots of the current buffer are initialized, and the new buffer is
        // a separate allocation with room for new_cap >= len elements.
        unsafe { uninitialized_move_and_destroy_range(self.as_ptr(), self.len, new_ptr.as_ptr()) };

        let old = mem::replace(&mut self.storage, Storage::Heap { ptr: new_ptr, cap: new_cap });
        if let Some((old_ptr, old_cap)) = old.heap_parts() {
            // SAFETY: The old heap buffer was allocated with old_cap, and its elements have been
            // moved out.
            unsafe { raw::deallocate(old_ptr, old_cap) };
        }

        guarantees!(self.capacity() >= required);
    }

    /// Drops all elements, releases any heap buffer and returns to fresh inline storage.
    ///
    /// The SmallVector is small and empty afterwards, even if dropping an element panics, and the
    /// heap buffer is released either way.
    fn reset(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        let mut old = mem::replace(&mut self.storage, Storage::inline());
        // SAFETY: The heap buffer was allocated with cap, and is released after its elements are
        // destroyed.
        let _buffer = old.heap_parts().map(|(ptr, cap)| unsafe { BufferGuard::new(ptr, cap) });

        // SAFETY: The first len slots of old are initialized and no longer reachable from self.
        unsafe { destroy_range(old.as_mut_ptr(), len) };
    }
}

impl<T: Default, const N: usize> SmallVector<T, N> {
    /// Resizes the SmallVector to `len` elements. Excess elements are dropped and missing elements
    /// are created with [`Default::default`]. Existing elements keep their values.
    ///
    /// # Panics
    /// Panics if the capacity required for growth can't be represented.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let mut vec = SmallVector::<i32, 8>::new();
    /// vec.push_back(456);
    /// vec.resize(4);
    /// assert_eq!(&*vec, &[456, 0, 0, 0]);
    /// vec.resize(1);
    /// assert_eq!(&*vec, &[456]);
    /// ```
    pub fn resize(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }
}

impl<T: Clone, const N: usize> SmallVector<T, N> {
    /// Clones and appends all elements of `other`.
    ///
    /// # Panics
    /// Panics if the capacity required for growth can't be represented.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.append(other.iter().cloned());
    }
}

impl<T, const N: usize> Drop for SmallVector<T, N> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T, const N: usize> Default for SmallVector<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for SmallVector<T, N> {
    /// Clones each element in order. A clone that would fill its inline storage is moved to the
    /// heap up front, with room for one more element than it holds.
    ///
    /// # Examples
    /// ```
    /// # use compact_lib::collections::contiguous::SmallVector;
    /// let vec = SmallVector::<i32, 2>::from_iter_sized([4, 3]);
    /// let copy = vec.clone();
    /// assert_eq!(copy, vec);
    /// assert_eq!(copy.capacity(), 4);
    /// ```
    fn clone(&self) -> Self {
        let mut vec = SmallVector::new();
        if self.len >= N {
            vec.grow_to_hold_at_least(self.len + 1);
        }
        vec.extend_from_slice(self);
        vec
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend_from_slice(source);
    }
}

impl<T, const N: usize> Extend<T> for SmallVector<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        self.append_iter(iter);
    }
}

impl<T, const N: usize> FromIterator<T> for SmallVector<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = SmallVector::new();
        vec.extend(iter);
        vec
    }
}

impl<T, const N: usize> Index<usize> for SmallVector<T, N> {
    type Output = T;

    /// # Panics
    /// Panics if `index` is out of bounds.
    fn index(&self, index: usize) -> &T {
        requires!(index < self.len);
        &self.as_slice()[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for SmallVector<T, N> {
    /// # Panics
    /// Panics if `index` is out of bounds.
    fn index_mut(&mut self, index: usize) -> &mut T {
        requires!(index < self.len);
        &mut self.as_mut_slice()[index]
    }
}

impl<T, const N: usize> Deref for SmallVector<T, N> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for SmallVector<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> AsRef<[T]> for SmallVector<T, N> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> AsMut<[T]> for SmallVector<T, N> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> Borrow<[T]> for SmallVector<T, N> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> BorrowMut<[T]> for SmallVector<T, N> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

// SAFETY: A SmallVector uniquely owns its buffer, so it can be sent to another thread when T: Send.
unsafe impl<T: Send, const N: usize> Send for SmallVector<T, N> {}
// SAFETY: The safe API of SmallVector obeys the borrow checker without interior mutability, so
// sharing it is as safe as sharing T.
unsafe impl<T: Sync, const N: usize> Sync for SmallVector<T, N> {}

impl<T: PartialEq, const N: usize, const M: usize> PartialEq<SmallVector<T, M>>
    for SmallVector<T, N>
{
    fn eq(&self, other: &SmallVector<T, M>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for SmallVector<T, N> {}

impl<T: Hash, const N: usize> Hash for SmallVector<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: Debug, const N: usize> Debug for SmallVector<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmallVector")
            .field("contents", &self.as_slice())
            .field("len", &self.len)
            .field("cap", &self.capacity())
            .field("small", &self.is_small())
            .finish()
    }
}
