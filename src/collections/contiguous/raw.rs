//! Operations over raw, possibly uninitialized element buffers.
//!
//! These are the only places where elements are destroyed or relocated in bulk and where buffers
//! are allocated or released, so that inline and heap storage share the same behavior.

use std::alloc::{self, Layout};
use std::mem;
use std::ptr::{self, NonNull};

use crate::util::error::CapacityOverflow;
use crate::util::result::ResultExtension;

/// Drops the `len` elements starting at `begin`, in order.
///
/// For types without drop glue (see [`mem::needs_drop`]) this doesn't touch the memory at all. The
/// decision is made per type at compile time.
///
/// # Safety
/// `begin` must be valid for reads and writes of `len` initialized, properly aligned elements of
/// `T`. After this call, those elements are uninitialized and must not be used again.
#[inline]
pub unsafe fn destroy_range<T>(begin: *mut T, len: usize) {
    if !mem::needs_drop::<T>() {
        return;
    }

    // SAFETY: The caller guarantees that the range holds len initialized elements that are never
    // used again.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(begin, len)) }
}

/// Moves the `len` elements starting at `begin` into the uninitialized memory starting at `dst`,
/// leaving the source slots uninitialized. Returns a pointer one past the last element written.
///
/// Every Rust value is movable and a move is a bitwise copy, so this never runs any element code
/// and can't fail part way through.
///
/// # Safety
/// - `begin` must be valid for reads of `len` initialized elements of `T`.
/// - `dst` must be valid for writes of `len` elements of `T`.
/// - The two ranges must not overlap.
///
/// After this call, the source slots are logically uninitialized; they must not be read or dropped.
#[inline]
pub unsafe fn uninitialized_move_and_destroy_range<T>(
    begin: *const T,
    len: usize,
    dst: *mut T,
) -> *mut T {
    // SAFETY: The caller guarantees that both ranges are valid for len elements and disjoint.
    unsafe {
        ptr::copy_nonoverlapping(begin, dst, len);
        dst.add(len)
    }
}

/// Creates a [`Layout`] for `cap` elements of `T`.
///
/// # Panics
/// Panics if the layout's size would exceed [`isize::MAX`].
pub(crate) fn make_layout<T>(cap: usize) -> Layout {
    Layout::array::<T>(cap)
        .map_err(|_| CapacityOverflow { requested: cap })
        .throw()
}

/// Allocates an uninitialized buffer for `cap` elements of `T`. Returns a dangling pointer for a
/// zero-sized layout.
///
/// # Panics
/// Panics if the layout's size would exceed [`isize::MAX`].
///
/// # Errors
/// In the event of an allocation error, this method calls [`alloc::handle_alloc_error`], which
/// doesn't return.
pub(crate) fn allocate<T>(cap: usize) -> NonNull<T> {
    let layout = make_layout::<T>(cap);
    if layout.size() == 0 {
        return NonNull::dangling();
    }

    // SAFETY: Zero-sized layouts have been guarded against.
    NonNull::new(unsafe { alloc::alloc(layout).cast() })
        .unwrap_or_else(|| alloc::handle_alloc_error(layout))
}

/// Releases a buffer obtained from [`allocate`].
///
/// # Safety
/// `ptr` must have been returned by [`allocate`] with the same `T` and `cap`, and must not be used
/// after this call. Any elements still in the buffer are leaked, not dropped.
pub(crate) unsafe fn deallocate<T>(ptr: NonNull<T>, cap: usize) {
    let layout = make_layout::<T>(cap);
    if layout.size() == 0 {
        return;
    }

    // SAFETY: The caller guarantees that ptr was allocated with this layout.
    unsafe { alloc::dealloc(ptr.as_ptr().cast(), layout) }
}

/// Releases a buffer obtained from [`allocate`] when dropped, including while unwinding.
pub(crate) struct BufferGuard<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> BufferGuard<T> {
    /// Takes responsibility for releasing the buffer at `ptr`.
    ///
    /// # Safety
    /// The same requirements as [`deallocate`] apply, at the point where the guard is dropped.
    pub(crate) const unsafe fn new(ptr: NonNull<T>, cap: usize) -> BufferGuard<T> {
        BufferGuard { ptr, cap }
    }
}

impl<T> Drop for BufferGuard<T> {
    fn drop(&mut self) {
        // SAFETY: The creator of the guard upholds the requirements of deallocate.
        unsafe { deallocate(self.ptr, self.cap) }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{ManuallyDrop, MaybeUninit};

    use super::*;
    use crate::util::alloc::{Counters, Tracked, ZeroSized};

    #[test]
    fn test_destroy_range_drops_each_element_once() {
        let counters = Counters::new();
        let mut slots = [
            MaybeUninit::new(Tracked::new(&counters, 1)),
            MaybeUninit::new(Tracked::new(&counters, 2)),
            MaybeUninit::new(Tracked::new(&counters, 3)),
        ];

        // SAFETY: The first two slots are initialized and never used again.
        unsafe { destroy_range(slots.as_mut_ptr().cast::<Tracked>(), 2) };
        assert_eq!(counters.dropped.get(), 2, "Only the destroyed range should be dropped.");

        // SAFETY: The last slot is still initialized.
        unsafe { slots[2].assume_init_drop() };
        assert_eq!(counters.live(), 0);
    }

    #[test]
    fn test_destroy_range_skips_trivial_types() {
        let counters = Counters::new();
        let mut slots = [
            ManuallyDrop::new(Tracked::new(&counters, 1)),
            ManuallyDrop::new(Tracked::new(&counters, 2)),
        ];
        assert!(!mem::needs_drop::<ManuallyDrop<Tracked>>());

        // SAFETY: Both slots are initialized.
        unsafe { destroy_range(slots.as_mut_ptr(), 2) };
        assert_eq!(
            counters.dropped.get(),
            0,
            "Types without drop glue shouldn't observe any cleanup."
        );

        for slot in slots.iter_mut() {
            // SAFETY: Each slot is dropped exactly once here.
            unsafe { ManuallyDrop::drop(slot) };
        }
        assert_eq!(counters.dropped.get(), 2);
    }

    #[test]
    fn test_move_and_destroy_range() {
        let counters = Counters::new();
        let src = [Tracked::new(&counters, 7), Tracked::new(&counters, 8)];
        let src = ManuallyDrop::new(src);
        let mut dst: [MaybeUninit<Tracked>; 3] = [const { MaybeUninit::uninit() }; 3];

        // SAFETY: src holds two initialized elements that are forgotten afterwards, and dst has
        // room for them.
        let end = unsafe {
            uninitialized_move_and_destroy_range(src.as_ptr(), 2, dst.as_mut_ptr().cast())
        };
        assert_eq!(end, dst[2].as_mut_ptr(), "The returned pointer should follow the last move.");
        assert_eq!(counters.constructed.get(), 2, "Moves shouldn't construct anything.");
        assert_eq!(counters.dropped.get(), 0, "Moves shouldn't drop anything.");

        // SAFETY: The first two slots of dst were just initialized.
        let moved = unsafe { [dst[0].assume_init_read(), dst[1].assume_init_read()] };
        assert_eq!(moved.iter().map(|t| t.value).collect::<Vec<_>>(), [7, 8]);
        drop(moved);
        assert_eq!(counters.live(), 0);
    }

    #[test]
    fn test_allocate_round_trip() {
        let ptr = allocate::<u64>(16);
        for i in 0..16 {
            // SAFETY: The buffer has room for 16 elements.
            unsafe { ptr.add(i).write(i as u64) };
        }
        // SAFETY: Element 15 was just written.
        assert_eq!(unsafe { ptr.add(15).read() }, 15);
        // SAFETY: ptr came from allocate with the same cap.
        unsafe { deallocate(ptr, 16) };

        let zst = allocate::<ZeroSized>(usize::MAX);
        assert_eq!(zst, NonNull::dangling(), "Zero-sized layouts shouldn't allocate.");
        // SAFETY: zst came from allocate with the same cap.
        unsafe { deallocate(zst, usize::MAX) };
    }

    #[test]
    #[should_panic(expected = "Capacity overflow")]
    fn test_layout_overflow() {
        let _ = make_layout::<u64>(usize::MAX / 4);
    }
}
