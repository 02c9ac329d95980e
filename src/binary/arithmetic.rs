/*
    Arithmetic
*/

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use super::round::Rounded;
use super::*;

// Applies the NaN propagation rule to an operand list: the first signaling
// NaN (left to right) raises INVALID and propagates quieted; failing that,
// the first quiet NaN propagates silently.
fn propagate_nan(a: &BigFloat, b: Option<&BigFloat>) -> Option<Rounded> {
    for x in [Some(a), b].into_iter().flatten() {
        if let FloatNum::Nan(s, true, payload) = x.repr() {
            return Some(Rounded::with_flags(
                BigFloat::nan(*s, false, payload.clone()),
                Flags::INVALID,
            ));
        }
    }
    for x in [Some(a), b].into_iter().flatten() {
        if let FloatNum::Nan(s, false, payload) = x.repr() {
            return Some(Rounded::exact(BigFloat::nan(*s, false, payload.clone())));
        }
    }
    None
}

fn invalid_nan() -> Rounded {
    Rounded::with_flags(BigFloat::nan(false, false, BigUint::zero()), Flags::INVALID)
}

// Raw operation bodies. Each computes the exact result of one operation,
// fits it through the context's rounding engine, and reports the flags it
// raised; trap delivery happens in the public wrappers.
impl BigFloat {
    fn add_sub_raw(&self, other: &Self, subtract: bool, ctx: &Context) -> Rounded {
        if let Some(r) = propagate_nan(self, Some(other)) {
            return r;
        }

        match (self.repr(), other.repr()) {
            (FloatNum::Infinity(s1), FloatNum::Infinity(s2)) => {
                if *s1 == (s2 ^ subtract) {
                    Rounded::exact(BigFloat::infinity(*s1))
                } else {
                    // opposite infinities cancel to nothing definable
                    invalid_nan()
                }
            }
            (FloatNum::Infinity(s1), _) => Rounded::exact(BigFloat::infinity(*s1)),
            (_, FloatNum::Infinity(s2)) => Rounded::exact(BigFloat::infinity(s2 ^ subtract)),
            (FloatNum::Finite(s1, e1, m1), FloatNum::Finite(s2, e2, m2)) => {
                let s2 = s2 ^ subtract;
                if m1.is_zero() && m2.is_zero() {
                    let sign = if *s1 == s2 {
                        *s1
                    } else {
                        ctx.rounding_mode() == RoundingMode::ToNegative
                    };
                    let e = e1.min(e2).clone();
                    return Rounded::exact(BigFloat::from_parts(sign, e, BigUint::zero()));
                }
                if m1.is_zero() {
                    return ctx.round_parts(s2, e2.clone(), m2.clone());
                }
                if m2.is_zero() {
                    return ctx.round_parts(*s1, e1.clone(), m1.clone());
                }

                // order the operands by exponent; the larger one is scaled
                // down to the smaller one's scale
                let (s_hi, e_hi, m_hi, s_lo, e_lo, m_lo) = if e1 >= e2 {
                    (*s1, e1, m1, s2, e2, m2)
                } else {
                    (s2, e2, m2, *s1, e1, m1)
                };

                let p = ctx.precision();
                let gap = e_hi - e_lo;
                let far = match gap.to_u64() {
                    Some(g) => p > 0 && g > p + m_hi.bits() + m_lo.bits() + 4,
                    None => true,
                };

                if far {
                    if p == 0 {
                        // exact alignment would not fit in memory
                        tracing::debug!("alignment shift exceeds the addressable range");
                        return invalid_nan();
                    }
                    // the far operand sits entirely below the guard window;
                    // a one-ulp surrogate rounds identically
                    let g = p + 4;
                    let scaled = m_hi << g;
                    let m = if s_hi == s_lo {
                        scaled + 1u32
                    } else {
                        scaled - 1u32
                    };
                    return ctx.round_parts(s_hi, e_hi - g, m);
                }

                let g = gap.to_u64().unwrap_or(0);
                let m_hi = m_hi << g;
                if s_hi == s_lo {
                    ctx.round_parts(s_hi, e_lo.clone(), m_hi + m_lo)
                } else {
                    match m_hi.cmp(m_lo) {
                        Ordering::Equal => {
                            // exact cancellation: +0 except when rounding floorward
                            let sign = ctx.rounding_mode() == RoundingMode::ToNegative;
                            Rounded::exact(BigFloat::from_parts(
                                sign,
                                e_lo.clone(),
                                BigUint::zero(),
                            ))
                        }
                        Ordering::Greater => ctx.round_parts(s_hi, e_lo.clone(), m_hi - m_lo),
                        Ordering::Less => ctx.round_parts(s_lo, e_lo.clone(), m_lo - m_hi),
                    }
                }
            }
            _ => unreachable!("NaN operands are handled above"),
        }
    }

    fn mul_raw(&self, other: &Self, ctx: &Context) -> Rounded {
        if let Some(r) = propagate_nan(self, Some(other)) {
            return r;
        }

        match (self.repr(), other.repr()) {
            (FloatNum::Infinity(s1), FloatNum::Infinity(s2)) => {
                Rounded::exact(BigFloat::infinity(s1 ^ s2))
            }
            (FloatNum::Infinity(s1), FloatNum::Finite(s2, _, m2)) => {
                if m2.is_zero() {
                    invalid_nan()
                } else {
                    Rounded::exact(BigFloat::infinity(s1 ^ s2))
                }
            }
            (FloatNum::Finite(s1, _, m1), FloatNum::Infinity(s2)) => {
                if m1.is_zero() {
                    invalid_nan()
                } else {
                    Rounded::exact(BigFloat::infinity(s1 ^ s2))
                }
            }
            (FloatNum::Finite(s1, e1, m1), FloatNum::Finite(s2, e2, m2)) => {
                ctx.round_parts(s1 ^ s2, e1 + e2, m1 * m2)
            }
            _ => unreachable!("NaN operands are handled above"),
        }
    }

    fn div_raw(&self, other: &Self, ctx: &Context) -> Rounded {
        if let Some(r) = propagate_nan(self, Some(other)) {
            return r;
        }

        match (self.repr(), other.repr()) {
            (FloatNum::Infinity(_), FloatNum::Infinity(_)) => invalid_nan(),
            (FloatNum::Infinity(s1), FloatNum::Finite(s2, _, _)) => {
                Rounded::exact(BigFloat::infinity(s1 ^ s2))
            }
            (FloatNum::Finite(s1, _, _), FloatNum::Infinity(s2)) => {
                Rounded::exact(BigFloat::from_parts(
                    s1 ^ s2,
                    BigInt::zero(),
                    BigUint::zero(),
                ))
            }
            (FloatNum::Finite(s1, e1, m1), FloatNum::Finite(s2, e2, m2)) => {
                let sign = s1 ^ s2;
                if m2.is_zero() {
                    if m1.is_zero() {
                        return invalid_nan();
                    }
                    return Rounded::with_flags(
                        BigFloat::infinity(sign),
                        Flags::DIVIDE_BY_ZERO,
                    );
                }
                if m1.is_zero() {
                    return Rounded::exact(BigFloat::from_parts(
                        sign,
                        e1 - e2,
                        BigUint::zero(),
                    ));
                }

                let p = ctx.precision();
                if p == 0 {
                    // unbounded precision admits only terminating quotients;
                    // the quotient terminates exactly when the reduced
                    // divisor is a power of two
                    let g = m1.gcd(m2);
                    let d = m2 / &g;
                    if d.count_ones() == 1 {
                        let n = m1 / &g;
                        let k = d.trailing_zeros().unwrap_or(0);
                        ctx.round_parts(sign, e1 - e2 - k, n)
                    } else {
                        tracing::debug!("quotient has no terminating binary expansion");
                        invalid_nan()
                    }
                } else {
                    // produce at least p + 2 quotient bits; a nonzero
                    // remainder folds into a trailing sticky bit
                    let shift = (m2.bits() + p + 2).saturating_sub(m1.bits());
                    let (q, r) = (m1 << shift).div_rem(m2);
                    let mut e = e1 - e2 - shift;
                    let mut q = q;
                    if !r.is_zero() {
                        q = (q << 1u32) + 1u32;
                        e -= 1;
                    } else {
                        // exact: give back the scaling zeros so the result
                        // returns to its ideal exponent
                        let strip = q.trailing_zeros().unwrap_or(0).min(shift);
                        q = &q >> strip;
                        e += strip;
                    }
                    ctx.round_parts(sign, e, q)
                }
            }
            _ => unreachable!("NaN operands are handled above"),
        }
    }

    fn remainder_raw(&self, other: &Self, ctx: &Context) -> Rounded {
        if let Some(r) = propagate_nan(self, Some(other)) {
            return r;
        }

        match (self.repr(), other.repr()) {
            (FloatNum::Infinity(_), _) => invalid_nan(),
            (FloatNum::Finite(s1, e1, m1), FloatNum::Infinity(_)) => {
                ctx.round_parts(*s1, e1.clone(), m1.clone())
            }
            (FloatNum::Finite(s1, e1, m1), FloatNum::Finite(_, e2, m2)) => {
                if m2.is_zero() {
                    return invalid_nan();
                }
                if m1.is_zero() {
                    let e = e1.min(e2).clone();
                    return Rounded::exact(BigFloat::from_parts(*s1, e, BigUint::zero()));
                }

                // align both operands on the smaller exponent; the result is
                // dividend - trunc(dividend/divisor) * divisor, exactly
                let e0 = e1.min(e2);
                let ga = (e1 - e0).to_u64();
                let gb = (e2 - e0).to_u64();
                let (ga, gb) = match (ga, gb) {
                    (Some(ga), Some(gb)) => (ga, gb),
                    _ => {
                        tracing::debug!("alignment shift exceeds the addressable range");
                        return invalid_nan();
                    }
                };
                let a = m1 << ga;
                let b = m2 << gb;
                let r = a % b;
                ctx.round_parts(*s1, e0.clone(), r)
            }
            _ => unreachable!("NaN operands are handled above"),
        }
    }

    fn negate_raw(&self, ctx: &Context) -> Rounded {
        match self.repr() {
            FloatNum::Nan(s, signaling, payload) => {
                if *signaling {
                    Rounded::with_flags(BigFloat::nan(!s, false, payload.clone()), Flags::INVALID)
                } else {
                    Rounded::exact(BigFloat::nan(!s, false, payload.clone()))
                }
            }
            FloatNum::Infinity(s) => Rounded::exact(BigFloat::infinity(!s)),
            FloatNum::Finite(s, e, m) => ctx.round_parts(!s, e.clone(), m.clone()),
        }
    }

    fn abs_raw(&self, ctx: &Context) -> Rounded {
        match self.repr() {
            FloatNum::Nan(_, signaling, payload) => {
                if *signaling {
                    Rounded::with_flags(
                        BigFloat::nan(false, false, payload.clone()),
                        Flags::INVALID,
                    )
                } else {
                    Rounded::exact(BigFloat::nan(false, false, payload.clone()))
                }
            }
            FloatNum::Infinity(_) => Rounded::exact(BigFloat::infinity(false)),
            FloatNum::Finite(_, e, m) => ctx.round_parts(false, e.clone(), m.clone()),
        }
    }
}

// The named operation surface. Every operation fits its exact result
// through the context and then lets the context deliver any trapped
// condition; on the trap path the error still carries the result the
// operation would have produced.
impl BigFloat {
    /// Adds two values under `ctx`.
    pub fn add(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.add_sub_raw(other, false, ctx);
        ctx.resolve(r)
    }

    /// Subtracts `other` from this value under `ctx`.
    pub fn sub(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.add_sub_raw(other, true, ctx);
        ctx.resolve(r)
    }

    /// Multiplies two values under `ctx`.
    pub fn mul(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.mul_raw(other, ctx);
        ctx.resolve(r)
    }

    /// Divides this value by `other` under `ctx`.
    ///
    /// A nonzero value divided by zero yields signed infinity and raises
    /// `DIVIDE_BY_ZERO`. Under unbounded precision a quotient with no
    /// terminating binary expansion yields a quiet NaN and raises
    /// `INVALID`.
    pub fn div(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.div_raw(other, ctx);
        ctx.resolve(r)
    }

    /// Computes the remainder `self - trunc(self / other) * other`.
    /// The sign of a nonzero remainder follows `self`.
    pub fn remainder(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.remainder_raw(other, ctx);
        ctx.resolve(r)
    }

    /// Negates this value under `ctx`. Negating a zero flips its sign.
    pub fn negate(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.negate_raw(ctx);
        ctx.resolve(r)
    }

    /// Takes the absolute value under `ctx`.
    pub fn abs(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.abs_raw(ctx);
        ctx.resolve(r)
    }

    /// Adds one to this value under `ctx`.
    pub fn increment(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.add_sub_raw(&BigFloat::one(), false, ctx);
        ctx.resolve(r)
    }

    /// Subtracts one from this value under `ctx`.
    pub fn decrement(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = self.add_sub_raw(&BigFloat::one(), true, ctx);
        ctx.resolve(r)
    }

    /// Rounds this value to the context's precision and exponent range,
    /// recording flags and honoring the trap mask like any operation.
    pub fn round_to_precision(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        let r = ctx.round(self);
        ctx.resolve(r)
    }
}

impl crate::Number for BigFloat {
    type Ctx = Context;
    type Error = TrapError;

    fn is_zero(&self) -> bool {
        BigFloat::is_zero(self)
    }

    fn is_infinity(&self) -> bool {
        BigFloat::is_infinity(self)
    }

    fn is_nan(&self) -> bool {
        BigFloat::is_nan(self)
    }

    fn is_finite(&self) -> bool {
        BigFloat::is_finite(self)
    }

    fn negate(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::negate(self, ctx)
    }

    fn abs(&self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::abs(self, ctx)
    }

    fn add(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::add(self, other, ctx)
    }

    fn sub(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::sub(self, other, ctx)
    }

    fn mul(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::mul(self, other, ctx)
    }

    fn div(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::div(self, other, ctx)
    }

    fn remainder(&self, other: &Self, ctx: &mut Context) -> Result<Self, TrapError> {
        BigFloat::remainder(self, other, ctx)
    }
}

// Operator forms delegate to the named operations under a fresh unlimited
// context. An unlimited context has an empty trap mask, so the error arm
// cannot fire; it still recovers the defined result rather than panicking.
macro_rules! operator_impl {
    ($trait:ident, $method:ident, $named:ident) => {
        impl $trait for &BigFloat {
            type Output = BigFloat;

            fn $method(self, other: &BigFloat) -> BigFloat {
                let mut ctx = Context::unlimited();
                match BigFloat::$named(self, other, &mut ctx) {
                    Ok(v) => v,
                    Err(trap) => trap.into_result(),
                }
            }
        }

        impl $trait for BigFloat {
            type Output = BigFloat;

            fn $method(self, other: BigFloat) -> BigFloat {
                $trait::$method(&self, &other)
            }
        }
    };
}

operator_impl!(Add, add, add);
operator_impl!(Sub, sub, sub);
operator_impl!(Mul, mul, mul);
operator_impl!(Div, div, div);
operator_impl!(Rem, rem, remainder);

impl Neg for &BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        let mut ctx = Context::unlimited();
        match BigFloat::negate(self, &mut ctx) {
            Ok(v) => v,
            Err(trap) => trap.into_result(),
        }
    }
}

impl Neg for BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        -&self
    }
}
