/*
    Traits relevant to rounding
*/

use crate::Number;

/// A specification for rounding behavior.
///
/// For any computer number system, most mathematical operators
/// can be decomposed into two operations:
///  - a real number operation: `R^n -> R`, and
///  - a rounding operation: `R -> R`.
/// A `Context` describes the second operation, the rounding behavior that
/// should be used to apply a "fit-to-representation" on a real number output.
pub trait Context: Sized {}

/// A fit-to-context rounding operation.
///
/// Applies only the rounding half of an operation: the input is taken as
/// exact, and the context decides what representation it must fit into.
pub trait Round: Number {
    /// Rounds this value to the representation described by `ctx`,
    /// discarding the condition flags the rounding raised.
    fn round(&self, ctx: &Self::Ctx) -> Self;
}
