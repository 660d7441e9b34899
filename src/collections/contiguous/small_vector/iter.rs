use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::mem;
use std::slice;

use super::SmallVector;
use crate::collections::contiguous::raw::destroy_range;

impl<T, const N: usize> IntoIterator for SmallVector<T, N> {
    type Item = T;

    type IntoIter = IntoIter<T, N>;

    fn into_iter(mut self) -> Self::IntoIter {
        // The iterator owns the elements from here on; the SmallVector only keeps the buffer.
        let end = mem::replace(&mut self.len, 0);
        IntoIter {
            vec: self,
            start: 0,
            end,
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a SmallVector<T, N> {
    type Item = &'a T;

    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut SmallVector<T, N> {
    type Item = &'a mut T;

    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

/// A type for owned iteration over a [`SmallVector`], created by its [`IntoIterator`]
/// implementation.
///
/// Elements that haven't been yielded are dropped along with the iterator.
pub struct IntoIter<T, const N: usize> {
    vec: SmallVector<T, N>,
    start: usize,
    end: usize,
}

impl<T, const N: usize> IntoIter<T, N> {
    /// Returns the elements that haven't been yielded yet as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The slots from start to end are initialized and owned by the iterator.
        unsafe { slice::from_raw_parts(self.vec.as_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        // SAFETY: The slot at start is initialized, and incrementing start afterwards moves the
        // value out of the buffer.
        let value = unsafe { self.vec.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;
        // SAFETY: The slot at the decremented end is initialized and no longer counted.
        Some(unsafe { self.vec.as_ptr().add(self.end).read() })
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.start = self.end;
        // SAFETY: The remaining slots are initialized and never read again. The SmallVector itself
        // has len 0, so dropping it only releases the buffer.
        unsafe { destroy_range(self.vec.as_mut_ptr().add(self.end - remaining), remaining) };
    }
}

impl<T: Debug, const N: usize> Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
