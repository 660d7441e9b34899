use derive_more::{Display, Error};

/// The requested number of elements can't be represented as a buffer layout, or as a power of two
/// of the platform's word size.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Capacity overflow: {requested} elements can't be allocated!")]
pub struct CapacityOverflow {
    /// The element count that caused the overflow.
    pub requested: usize,
}
