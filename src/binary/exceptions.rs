/*
    Exceptions
*/

use std::fmt;

use bitflags::bitflags;

use super::{BigFloat, Context};

bitflags! {
    /** Condition flags raised by arithmetic and rounding.
     *
     * Besides returning a (possibly) numerical result, any computation with
     * floating-point numbers may also raise conditions depending on certain
     * circumstances. A condition never interrupts a computation by itself:
     * it is recorded on the [`Context`] and produces a defined result. Only
     * the context's trap mask can escalate a condition into a [`TrapError`].
     */
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// Result required rounding and differs from the exact value.
        const INEXACT = 1;
        /// Low-order digits were discarded while fitting the precision.
        const ROUNDED = 2;
        /// Adjusted exponent fell below the context's minimum.
        const SUBNORMAL = 4;
        /// Subnormal result lost digits to the exponent floor.
        const UNDERFLOW = 8;
        /// Adjusted exponent exceeded the context's maximum.
        const OVERFLOW = 16;
        /// Exponent was pinned to the edge of the representable range.
        const CLAMPED = 32;
        /// The operation is mathematically undefined.
        const INVALID = 64;
        /// A nonzero finite number was divided by zero.
        const DIVIDE_BY_ZERO = 128;
    }
}

// Trap delivery tests conditions in this fixed order; the first newly-set
// flag that is also enabled in the trap mask wins.
pub(crate) const TRAP_ORDER: [Flags; 8] = [
    Flags::INVALID,
    Flags::DIVIDE_BY_ZERO,
    Flags::OVERFLOW,
    Flags::UNDERFLOW,
    Flags::SUBNORMAL,
    Flags::INEXACT,
    Flags::ROUNDED,
    Flags::CLAMPED,
];

impl Flags {
    /// Returns the display name of a single condition flag.
    /// Composite or unrecognized flag sets are named `"Trap"`.
    pub fn name(&self) -> &'static str {
        match *self {
            Flags::CLAMPED => "Clamped",
            Flags::DIVIDE_BY_ZERO => "DivideByZero",
            Flags::INEXACT => "Inexact",
            Flags::INVALID => "Invalid",
            Flags::OVERFLOW => "Overflow",
            Flags::ROUNDED => "Rounded",
            Flags::SUBNORMAL => "Subnormal",
            Flags::UNDERFLOW => "Underflow",
            _ => "Trap",
        }
    }
}

/** Failure raised when a trapped condition fires.
 *
 * Carries exactly one condition flag, a snapshot of the context that was
 * active when the condition fired, and the result the operation would have
 * returned had the trap been disabled. A caller that wants to continue can
 * recover that result with [`TrapError::into_result`].
 */
#[derive(Clone, Debug)]
pub struct TrapError {
    flag: Flags,
    ctx: Option<Context>,
    result: BigFloat,
}

impl TrapError {
    /// Creates a new trap failure for a single condition flag.
    /// The context, when present, is copied at this point: later mutation
    /// of the caller's context cannot alter the snapshot.
    pub fn new(flag: Flags, ctx: Option<&Context>, result: BigFloat) -> Self {
        Self {
            flag,
            ctx: ctx.cloned(),
            result,
        }
    }

    /// Returns the condition flag that fired. This is always a single flag.
    pub fn flag(&self) -> Flags {
        self.flag
    }

    /// Returns the context captured when the trap fired, if any.
    pub fn context(&self) -> Option<&Context> {
        self.ctx.as_ref()
    }

    /// Returns the defined result of the operation that caused the trap.
    pub fn result(&self) -> &BigFloat {
        &self.result
    }

    /// Consumes the trap, yielding the defined result.
    pub fn into_result(self) -> BigFloat {
        self.result
    }
}

impl fmt::Display for TrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag.name())
    }
}

impl std::error::Error for TrapError {}

/// Errors raised at the native-type conversion boundary.
///
/// Unlike condition flags, these have no defined result to fall back to
/// and are always surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionError {
    /// Source is non-finite, or the truncated integer does not fit the
    /// target type's range.
    OutOfRange,
    /// An exact conversion was requested but the value has a nonzero
    /// fractional part.
    Inexact,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::OutOfRange => {
                write!(f, "value is non-finite or outside the target range")
            }
            ConversionError::Inexact => {
                write!(f, "value is not an exact integer")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_names() {
        assert_eq!(Flags::INVALID.name(), "Invalid");
        assert_eq!(Flags::DIVIDE_BY_ZERO.name(), "DivideByZero");
        assert_eq!((Flags::INEXACT | Flags::ROUNDED).name(), "Trap");
        assert_eq!(Flags::empty().name(), "Trap");
    }

    #[test]
    fn trap_order_starts_with_invalid() {
        assert_eq!(TRAP_ORDER[0], Flags::INVALID);
        assert_eq!(TRAP_ORDER[7], Flags::CLAMPED);
    }

    #[test]
    fn flag_bits_are_stable() {
        assert_eq!(Flags::INEXACT.bits(), 1);
        assert_eq!(Flags::ROUNDED.bits(), 2);
        assert_eq!(Flags::SUBNORMAL.bits(), 4);
        assert_eq!(Flags::UNDERFLOW.bits(), 8);
        assert_eq!(Flags::OVERFLOW.bits(), 16);
        assert_eq!(Flags::CLAMPED.bits(), 32);
        assert_eq!(Flags::INVALID.bits(), 64);
        assert_eq!(Flags::DIVIDE_BY_ZERO.bits(), 128);
    }
}
