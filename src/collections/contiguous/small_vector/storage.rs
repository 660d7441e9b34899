use std::mem::MaybeUninit;
use std::ptr::NonNull;

/// The backing buffer of a [`SmallVector`](super::SmallVector). Exactly one regime is active at a
/// time, and the tag is the only thing that decides which.
///
/// Storage never drops elements or frees memory by itself; the owning vector does both.
pub(crate) enum Storage<T, const N: usize> {
    Inline([MaybeUninit<T>; N]),
    Heap { ptr: NonNull<T>, cap: usize },
}

impl<T, const N: usize> Storage<T, N> {
    pub(crate) const fn inline() -> Storage<T, N> {
        Storage::Inline([const { MaybeUninit::uninit() }; N])
    }

    pub(crate) const fn is_inline(&self) -> bool {
        matches!(self, Storage::Inline(_))
    }

    pub(crate) const fn capacity(&self) -> usize {
        match self {
            Storage::Inline(_) => N,
            Storage::Heap { cap, .. } => *cap,
        }
    }

    /// Returns the heap buffer and its capacity, if the heap regime is active.
    pub(crate) const fn heap_parts(&self) -> Option<(NonNull<T>, usize)> {
        match self {
            Storage::Inline(_) => None,
            Storage::Heap { ptr, cap } => Some((*ptr, *cap)),
        }
    }

    pub(crate) const fn as_ptr(&self) -> *const T {
        match self {
            Storage::Inline(buf) => buf.as_ptr().cast(),
            Storage::Heap { ptr, .. } => ptr.as_ptr().cast_const(),
        }
    }

    pub(crate) const fn as_mut_ptr(&mut self) -> *mut T {
        match self {
            Storage::Inline(buf) => buf.as_mut_ptr().cast(),
            Storage::Heap { ptr, .. } => ptr.as_ptr(),
        }
    }
}
