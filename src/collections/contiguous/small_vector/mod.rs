//! A module containing [`SmallVector`] and associated types.
//!
//! Besides the vector itself, this module provides [`IntoIter`] for owned iteration.
//! [`IterMut`](std::slice::IterMut) and [`Iter`](std::slice::Iter) from [`std::slice`] are used
//! for borrowed iteration.
//!
//! [`SmallVector`] is also re-exported under the parent module.

mod iter;
mod small_vector;
mod storage;

pub use iter::*;
pub use small_vector::*;
