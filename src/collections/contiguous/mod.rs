//! Collections that store their elements contiguously.
//!
//! Alongside [`SmallVector`], this module exposes the pieces it is built from: the capacity policy
//! ([`next_capacity`]) and the [`raw`] operations used to destroy and relocate elements in bulk.

pub mod capacity;
pub mod raw;
pub mod small_vector;

#[doc(inline)]
pub use capacity::next_capacity;
#[doc(inline)]
pub use small_vector::SmallVector;
