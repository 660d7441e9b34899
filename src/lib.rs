//! This crate provides a small-buffer-optimized vector, [`SmallVector`], along with the pieces it
//! is built from.
//!
//! # Purpose
//! A lot of sequences in practice are short. [`SmallVector`] keeps its first few elements inside
//! the value itself, so that building such a sequence doesn't touch the allocator at all. Once it
//! outgrows that inline storage, it behaves like an ordinary growable vector.
//!
//! # Method
//! The vector is split into three layers:
//! - A capacity policy, [`next_capacity`](collections::contiguous::next_capacity), which picks the
//!   smallest power of two that covers a request.
//! - [Raw operations](collections::contiguous::raw) over uninitialized buffers, which destroy and
//!   relocate elements in bulk and skip work entirely for types without drop glue.
//! - The container itself, which owns either an inline buffer or a heap buffer, tracked by an
//!   explicit tag rather than by comparing pointers.
//!
//! # Error Handling
//! Misusing the container (indexing out of bounds, popping from an empty vector, etc.) is a
//! programmer error and is reported through the [`contract`] facility, which panics with the
//! location and the written form of the failed check. Those checks can be compiled out by disabling
//! the `contracts` feature. Memory safety never depends on them.
//!
//! Capacity overflow also panics, with a strongly typed error as the message, and allocation
//! failure is handled by [`std::alloc::handle_alloc_error`]. There are no recoverable errors.
//!
//! # Dependencies
//! This crate depends on some derive macros for its error types because they remove the need for
//! some very repetitive programming.
//!
//! [`SmallVector`]: collections::contiguous::SmallVector

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;
pub mod contract;

pub(crate) mod util;
