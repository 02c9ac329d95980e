/*
    Arbitrary-precision binary floating-point numbers
*/

mod arithmetic;
mod context;
mod convert;
mod exceptions;
mod number;
mod round;
mod util;

pub use context::Context;
pub use exceptions::{ConversionError, Flags, TrapError};
pub use round::Rounded;

use bitvec::prelude::Lsb0;
use num_bigint::{BigInt, BigUint};

pub(crate) use util::*;

type BitVec = bitvec::prelude::BitVec<u32, Lsb0>;

// Minimal floating-point encoding grouped by classification
#[derive(Clone, Debug)]
enum FloatNum {
    // signed zero or finite number
    // => (sign, exponent, mantissa)
    // value is (-1)^sign * mantissa * 2^exponent
    Finite(bool, BigInt, BigUint),
    // infinity (+/-)
    // => (sign)
    Infinity(bool),
    // not-a-number
    // => (sign, signaling, payload)
    Nan(bool, bool, BigUint),
}

/** An arbitrary-precision binary floating-point number.
 *
 * A `BigFloat` is immutable: every operation produces a new value.
 * The significand and the exponent are both unbounded, so a `BigFloat`
 * denotes its number exactly; rounding happens only when a [`Context`]
 * asks for it. Distinct (mantissa, exponent) pairs may denote the same
 * number, and comparison is by denoted value, never by representation.
 *
 * Besides finite numbers (including signed zeros), a `BigFloat` may
 * encode a signed infinity or a NaN. NaNs carry a signaling bit and an
 * arbitrary-precision diagnostic payload that survives conversion to
 * and from the native float formats.
 */
#[derive(Clone, Debug)]
pub struct BigFloat {
    num: FloatNum,
}

/// Defines the supported rounding modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round to nearest, ties to the even mantissa (half-even).
    NearestEven,
    /// Round to nearest, ties away from zero (half-up).
    NearestAway,
    /// Round to nearest, ties toward zero (half-down).
    NearestZero,
    /// Round toward positive infinity (ceiling).
    ToPositive,
    /// Round toward negative infinity (floor).
    ToNegative,
    /// Round toward zero (truncation).
    ToZero,
    /// Round away from zero.
    AwayZero,
    /// Round to odd.
    ToOdd,
}

/// The direction to round a number based on sign and rounding mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingDirection {
    ToZero,
    AwayZero,
    ToEven,
    ToOdd,
}
