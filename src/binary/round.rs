/*
    Rounding
*/

use num_bigint::{BigInt, BigUint};
use num_traits::{One, ToPrimitive, Zero};

use super::*;

/// The outcome of one rounding operation: the fitted value together with
/// the condition flags the fit raised. The flags are exactly the ones
/// newly raised by this operation, not an accumulated set.
#[derive(Clone, Debug)]
pub struct Rounded {
    pub value: BigFloat,
    pub flags: Flags,
}

impl Rounded {
    pub(crate) fn exact(value: BigFloat) -> Self {
        Self {
            value,
            flags: Flags::empty(),
        }
    }

    pub(crate) fn with_flags(value: BigFloat, flags: Flags) -> Self {
        Self { value, flags }
    }
}

impl RoundingMode {
    /// Translates a `RoundingMode` and sign bit to a `RoundingDirection`
    /// and a boolean indicating if the direction only specifies tie-breaking behavior.
    pub fn direction(&self, sign: bool) -> (bool, RoundingDirection) {
        match (self, sign) {
            (RoundingMode::NearestEven, _) => (true, RoundingDirection::ToEven),
            (RoundingMode::NearestAway, _) => (true, RoundingDirection::AwayZero),
            (RoundingMode::NearestZero, _) => (true, RoundingDirection::ToZero),
            (RoundingMode::ToPositive, false) => (false, RoundingDirection::AwayZero),
            (RoundingMode::ToPositive, true) => (false, RoundingDirection::ToZero),
            (RoundingMode::ToNegative, false) => (false, RoundingDirection::ToZero),
            (RoundingMode::ToNegative, true) => (false, RoundingDirection::AwayZero),
            (RoundingMode::ToZero, _) => (false, RoundingDirection::ToZero),
            (RoundingMode::AwayZero, _) => (false, RoundingDirection::AwayZero),
            (RoundingMode::ToOdd, _) => (false, RoundingDirection::ToOdd),
        }
    }
}

// Returns true if the rounding information implies the mantissa, viewed as
// an integer, should be incremented by 1. `half` is the most significant
// discarded bit; `sticky` is the OR of every bit below it.
fn round_requires_increment(
    sign: bool,
    lsb: bool,
    half: bool,
    sticky: bool,
    rm: RoundingMode,
) -> bool {
    match rm.direction(sign) {
        (true, RoundingDirection::ToEven) => {
            // no half bit => truncate
            // half bit and sticky bit => increment
            // tie => increment if lsb since we want it to be 0
            half && (sticky || lsb)
        }
        (true, RoundingDirection::AwayZero) => {
            // no half bit => truncate
            // half bit => increment (tie requires increment)
            half
        }
        (true, RoundingDirection::ToZero) => {
            // tie => truncate
            half && sticky
        }
        (true, RoundingDirection::ToOdd) => {
            // (unused)
            // tie => increment if even
            half && !lsb
        }
        (false, RoundingDirection::AwayZero) => {
            // increment if not exact
            half || sticky
        }
        (false, RoundingDirection::ToZero) => {
            // always truncate
            false
        }
        (false, RoundingDirection::ToOdd) => {
            // LSB of an inexact result needs to be 1
            !lsb && (half || sticky)
        }
        (false, RoundingDirection::ToEven) => {
            // (unused)
            // LSB of the mantissa needs to be 0
            lsb
        }
    }
}

// Assuming overflow has occured, return true if the result should be
// rounded to +/- infinity (rather than the largest finite value).
fn overflow_to_infinity(sign: bool, rm: RoundingMode) -> bool {
    match rm.direction(sign) {
        // nearest carries all overflows to infinity
        (true, _) => true,
        (_, RoundingDirection::AwayZero) => true,
        // carry all overflows to the largest finite value
        (_, RoundingDirection::ToZero) => false,
        // the largest finite value has an odd lsb
        (_, RoundingDirection::ToEven) => true,
        (_, RoundingDirection::ToOdd) => false,
    }
}

impl Context {
    /// Rounds a value into this context's precision and exponent range,
    /// reporting the conditions the fit raised.
    ///
    /// This is the bare rounding step: nothing is merged into the
    /// accumulated flags and no trap fires. A signaling NaN operand is
    /// quieted here and raises `INVALID`, per the general NaN rule.
    pub fn round(&self, x: &BigFloat) -> Rounded {
        match x.repr() {
            FloatNum::Finite(s, e, m) => self.round_parts(*s, e.clone(), m.clone()),
            FloatNum::Infinity(_) => Rounded::exact(x.clone()),
            FloatNum::Nan(s, signaling, payload) => {
                if *signaling {
                    Rounded::with_flags(BigFloat::nan(*s, false, payload.clone()), Flags::INVALID)
                } else {
                    Rounded::exact(x.clone())
                }
            }
        }
    }

    // Fits a raw (sign, exponent, mantissa) triple into this context.
    // The triple is taken as exact; arithmetic that has already lost digits
    // must fold them into the mantissa as a sticky bit beforehand.
    pub(crate) fn round_parts(&self, sign: bool, exp: BigInt, m: BigUint) -> Rounded {
        let mut flags = Flags::empty();

        // exact zero: nothing to fit
        if m.is_zero() {
            return Rounded::exact(BigFloat::from_parts(sign, exp, m));
        }

        let p = self.precision();
        let mut exp = exp;
        let mut m = m;
        let bits = m.bits();

        // lowest scale exponent the range admits
        let etiny = self.emin().map(|emin| {
            if self.is_adjusting() && p > 0 {
                BigInt::from(emin) - (p as i64 - 1)
            } else {
                BigInt::from(emin)
            }
        });

        // every bit of the value sits strictly below the half position of
        // the smallest representable value: only the sticky bit survives
        if let Some(et) = &etiny {
            if &exp + BigInt::from(bits) < *et {
                flags |= Flags::ROUNDED
                    | Flags::INEXACT
                    | Flags::SUBNORMAL
                    | Flags::UNDERFLOW;
                if round_requires_increment(sign, false, false, true, self.rounding_mode()) {
                    let value = BigFloat::from_parts(sign, et.clone(), BigUint::one());
                    return Rounded::with_flags(value, flags);
                }
                flags |= Flags::CLAMPED;
                let value = BigFloat::from_parts(sign, et.clone(), BigUint::zero());
                return Rounded::with_flags(value, flags);
            }
        }

        // discard count: the larger of the precision excess and the
        // subnormal deficit, so one pass sees every discarded bit
        let mut drop = if p > 0 && bits > p { bits - p } else { 0 };
        if let Some(et) = &etiny {
            let deficit = et - &exp;
            if deficit > BigInt::from(drop) {
                // deficit <= bits here, so it fits a u64
                drop = deficit.to_u64().unwrap_or(bits);
            }
        }

        if drop > 0 {
            let half = m.bit(drop - 1);
            let sticky = low_bits_any(&m, drop - 1);
            let lsb = m.bit(drop);

            m = &m >> drop;
            exp += drop;
            flags |= Flags::ROUNDED;
            if half || sticky {
                flags |= Flags::INEXACT;
            }

            if round_requires_increment(sign, lsb, half, sticky, self.rounding_mode()) {
                m += 1u32;
                if p > 0 && m.bits() > p {
                    // carried into a power of two; the dropped bit is zero
                    m = &m >> 1u32;
                    exp += 1;
                }
            }
        }

        // exponent-range enforcement on the rounded result
        if m.is_zero() {
            // rounded away to nothing below the subnormal range
            flags |= Flags::SUBNORMAL | Flags::UNDERFLOW | Flags::CLAMPED;
            return Rounded::with_flags(BigFloat::from_parts(sign, exp, m), flags);
        }

        let high = if self.is_adjusting() {
            &exp + (m.bits() as i64 - 1)
        } else {
            exp.clone()
        };

        if let Some(emax) = self.emax() {
            if high > BigInt::from(emax) {
                flags |= Flags::OVERFLOW | Flags::INEXACT | Flags::ROUNDED;
                tracing::trace!(%exp, "exponent range overflow");
                if p == 0 || overflow_to_infinity(sign, self.rounding_mode()) {
                    return Rounded::with_flags(BigFloat::infinity(sign), flags);
                }
                let top = (BigUint::one() << p) - 1u32;
                let e = if self.is_adjusting() {
                    BigInt::from(emax) - (p as i64 - 1)
                } else {
                    BigInt::from(emax)
                };
                return Rounded::with_flags(BigFloat::from_parts(sign, e, top), flags);
            }
        }

        if let Some(emin) = self.emin() {
            if high < BigInt::from(emin) {
                flags |= Flags::SUBNORMAL;
                if flags.contains(Flags::INEXACT) {
                    flags |= Flags::UNDERFLOW;
                }
            }
        }

        // pin high exponents to the top of the range by padding the mantissa
        if self.is_clamping() && p > 0 {
            if let Some(emax) = self.emax() {
                let top = if self.is_adjusting() {
                    BigInt::from(emax) - (p as i64 - 1)
                } else {
                    BigInt::from(emax)
                };
                if exp > top {
                    // bounded by p - 1 since the adjusted exponent is in range
                    let pad = (&exp - &top).to_u64().unwrap_or(0);
                    m <<= pad;
                    exp = top;
                    flags |= Flags::CLAMPED;
                }
            }
        }

        Rounded::with_flags(BigFloat::from_parts(sign, exp, m), flags)
    }
}

impl crate::Round for BigFloat {
    fn round(&self, ctx: &Context) -> BigFloat {
        ctx.round(self).value
    }
}
