//! The capacity policy shared by growable contiguous collections.

use crate::util::error::CapacityOverflow;
use crate::util::result::ResultExtension;

/// The largest power of two representable as a [`usize`].
pub const MAX_POWER_OF_TWO: usize = 1 << (usize::BITS - 1);

/// Returns the smallest power of two that is greater than or equal to `requested`. A request for
/// zero elements still yields a usable capacity of one.
///
/// # Panics
/// Panics if `requested` exceeds [`MAX_POWER_OF_TWO`], because the result wouldn't be
/// representable.
///
/// # Examples
/// ```
/// # use compact_lib::collections::contiguous::next_capacity;
/// assert_eq!(next_capacity(0), 1);
/// assert_eq!(next_capacity(3), 4);
/// assert_eq!(next_capacity(8), 8);
/// assert_eq!(next_capacity(9), 16);
/// ```
#[inline]
pub fn next_capacity(requested: usize) -> usize {
    if requested > MAX_POWER_OF_TWO {
        Err::<(), _>(CapacityOverflow { requested }).throw();
    }
    // Smearing requested - 1 rather than requested keeps exact powers of two in place. Zero
    // saturates to zero and comes out as one.
    smear_bits(requested.saturating_sub(1)).wrapping_add(1)
}

/// Sets every bit below the highest set bit, giving a value of the form `0..0111..1`.
#[cfg(target_pointer_width = "64")]
#[inline]
const fn smear_bits(n: usize) -> usize {
    smear_bits_64(n as u64) as usize
}

#[cfg(target_pointer_width = "32")]
#[inline]
const fn smear_bits(n: usize) -> usize {
    smear_bits_32(n as u32) as usize
}

#[cfg(target_pointer_width = "16")]
#[inline]
const fn smear_bits(n: usize) -> usize {
    let mut n = n;
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n
}

#[allow(dead_code)]
#[inline]
const fn smear_bits_32(mut n: u32) -> u32 {
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n
}

#[allow(dead_code)]
#[inline]
const fn smear_bits_64(mut n: u64) -> u64 {
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n |= n >> 32;
    n
}
