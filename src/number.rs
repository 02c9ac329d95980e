/*
    Defines a number
*/

use crate::Context;

/// The number type.
///
/// The central type of this library.
/// A `Number` encodes a number with some exceptions, say NaN from IEEE-754.
/// Arithmetic is directed by a rounding context, and the context may escalate
/// any condition it observes into a failure, so every operation returns a
/// `Result`.
pub trait Number: Clone + Default {
    /// The rounding context associated with this `Number`.
    type Ctx: Context;

    /// The failure raised when the context traps a condition.
    type Error;

    /// Returns true if this `Number` encodes a zero.
    fn is_zero(&self) -> bool;

    /// Returns true if this `Number` encodes an infinity.
    fn is_infinity(&self) -> bool;

    /// Returns true if this `Number` does not encode a number.
    fn is_nan(&self) -> bool;

    /// Returns true if this `Number` encodes a finite number.
    fn is_finite(&self) -> bool;

    /// Negates this `Number`, rounding the result according
    /// to the provided context.
    fn negate(&self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;

    /// Takes the absolute value of this `Number`, rounding the
    /// result according to the provided context.
    fn abs(&self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;

    /// Adds this `Number` and another, rounding the result
    /// according to the provided context.
    fn add(&self, other: &Self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;

    /// Subtracts another `Number` from this one, rounding the result
    /// according to the provided context.
    fn sub(&self, other: &Self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;

    /// Multiplies this `Number` and another, rounding the result
    /// according to the provided context.
    fn mul(&self, other: &Self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;

    /// Divides this `Number` by another, rounding the result
    /// according to the provided context.
    fn div(&self, other: &Self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;

    /// Computes the remainder of this `Number` divided by another,
    /// rounding the result according to the provided context.
    fn remainder(&self, other: &Self, ctx: &mut Self::Ctx) -> Result<Self, Self::Error>;
}
