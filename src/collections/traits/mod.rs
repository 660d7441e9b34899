//! Traits shared by collections in this crate.

mod sequence;

pub use sequence::*;
