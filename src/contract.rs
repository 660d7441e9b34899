//! A process-wide facility for checking preconditions, postconditions and invariants.
//!
//! Checks are written with [`requires!`](crate::requires), [`guarantees!`](crate::guarantees) and
//! [`invariant!`](crate::invariant). A failing check is a programmer error: it reports the source
//! location and the written form of the condition, then panics. Violations are never returned as
//! [`Result`]s.
//!
//! All checks are controlled by the `contracts` feature, which is enabled by default. Building
//! without it turns every check into a no-op, without evaluating the condition.
//!
//! # Examples
//! ```
//! # use compact_lib::requires;
//! fn halve(value: u32) -> u32 {
//!     requires!(value % 2 == 0);
//!     value / 2
//! }
//! assert_eq!(halve(4), 2);
//! ```

use std::convert::Infallible;

use derive_more::{Display, Error, IsVariant};

use crate::util::result::ResultExtension;

/// Whether contract checks are compiled in. Mirrors the `contracts` feature.
pub const CHECKS_ENABLED: bool = cfg!(feature = "contracts");

/// The kind of condition that was violated.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum ContractKind {
    /// A condition that must hold when an operation is invoked.
    #[display("precondition")]
    Precondition,
    /// A condition that must hold when an operation returns.
    #[display("postcondition")]
    Postcondition,
    /// A condition that must hold at any point between operations.
    #[display("invariant")]
    Invariant,
}

/// A failed contract check, identifying what failed and where.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("{file}:{line}: {kind} failed: {condition}")]
pub struct ContractViolation {
    /// The kind of the violated condition.
    pub kind: ContractKind,
    /// The file containing the check.
    pub file: &'static str,
    /// The line of the check within `file`.
    pub line: u32,
    /// The written form of the condition.
    pub condition: &'static str,
}

/// Reports a contract violation and diverges.
///
/// # Panics
/// Always, with the [`Display`](std::fmt::Display) form of `violation` as the message.
#[cold]
#[inline(never)]
pub fn fail(violation: ContractViolation) -> ! {
    match Err::<Infallible, _>(violation).throw() {}
}

#[doc(hidden)]
#[macro_export]
macro_rules! __contract_check {
    ($kind:ident, $cond:expr) => {
        if $crate::contract::CHECKS_ENABLED && !($cond) {
            $crate::contract::fail($crate::contract::ContractViolation {
                kind: $crate::contract::ContractKind::$kind,
                file: ::core::file!(),
                line: ::core::line!(),
                condition: ::core::stringify!($cond),
            });
        }
    };
}

/// Checks a precondition.
///
/// # Panics
/// Panics if contract checks are enabled and the condition is false.
#[macro_export]
macro_rules! requires {
    ($cond:expr $(,)?) => {
        $crate::__contract_check!(Precondition, $cond)
    };
}

/// Checks a postcondition.
///
/// # Panics
/// Panics if contract checks are enabled and the condition is false.
#[macro_export]
macro_rules! guarantees {
    ($cond:expr $(,)?) => {
        $crate::__contract_check!(Postcondition, $cond)
    };
}

/// Checks an invariant.
///
/// # Panics
/// Panics if contract checks are enabled and the condition is false.
#[macro_export]
macro_rules! invariant {
    ($cond:expr $(,)?) => {
        $crate::__contract_check!(Invariant, $cond)
    };
}
