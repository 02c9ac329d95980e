/*
    Definition of `BigFloat` constructors, accessors, and comparison
*/

use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use super::*;

// Constructors and getters
impl BigFloat {
    /// Creates a new `BigFloat` initialized to +0.
    pub fn new() -> Self {
        Self {
            num: FloatNum::Finite(false, BigInt::zero(), BigUint::zero()),
        }
    }

    /// Returns a zero with a particular sign.
    pub fn zero(sign: bool) -> Self {
        Self {
            num: FloatNum::Finite(sign, BigInt::zero(), BigUint::zero()),
        }
    }

    /// Returns the value 1.
    pub fn one() -> Self {
        Self {
            num: FloatNum::Finite(false, BigInt::zero(), BigUint::one()),
        }
    }

    /// Returns an infinity with a particular sign.
    pub fn infinity(sign: bool) -> Self {
        Self {
            num: FloatNum::Infinity(sign),
        }
    }

    /// Returns a NaN value with the specified sign, signaling status,
    /// and diagnostic payload.
    pub fn nan(sign: bool, signaling: bool, payload: BigUint) -> Self {
        Self {
            num: FloatNum::Nan(sign, signaling, payload),
        }
    }

    /// Creates a finite number `(-1)^sign * mantissa * 2^exponent`.
    /// The triple is stored as given; no normalization is applied, so
    /// distinct triples may denote the same number.
    pub fn from_parts(sign: bool, exponent: BigInt, mantissa: BigUint) -> Self {
        Self {
            num: FloatNum::Finite(sign, exponent, mantissa),
        }
    }

    pub(crate) fn repr(&self) -> &FloatNum {
        &self.num
    }

    /// Returns the sign of this `BigFloat`; `true` means negative.
    /// The sign is meaningful for every kind of value, including zeros
    /// and NaNs.
    pub fn sign(&self) -> bool {
        match self.num {
            FloatNum::Finite(s, _, _) => s,
            FloatNum::Infinity(s) => s,
            FloatNum::Nan(s, _, _) => s,
        }
    }

    /// Returns the exponent of this `BigFloat`.
    /// The result is wrapped in an option since only finite
    /// numbers have a valid exponent.
    pub fn exponent(&self) -> Option<&BigInt> {
        match &self.num {
            FloatNum::Finite(_, exp, _) => Some(exp),
            _ => None,
        }
    }

    /// Returns the unsigned significand of this `BigFloat`.
    /// The result is wrapped in an option since only finite
    /// numbers have a valid significand.
    pub fn significand(&self) -> Option<&BigUint> {
        match &self.num {
            FloatNum::Finite(_, _, c) => Some(c),
            _ => None,
        }
    }

    /// Returns true if this `BigFloat` encodes a zero of either sign.
    pub fn is_zero(&self) -> bool {
        match &self.num {
            FloatNum::Finite(_, _, c) => c.is_zero(),
            _ => false,
        }
    }

    /// Returns true if this `BigFloat` encodes a finite number.
    pub fn is_finite(&self) -> bool {
        matches!(self.num, FloatNum::Finite(_, _, _))
    }

    /// Returns true if this `BigFloat` encodes an infinity.
    pub fn is_infinity(&self) -> bool {
        matches!(self.num, FloatNum::Infinity(_))
    }

    /// Returns true if this `BigFloat` encodes a NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.num, FloatNum::Nan(_, _, _))
    }

    /// Returns true if this `BigFloat` encodes a signaling NaN.
    /// The result is wrapped in an option since only NaNs can be signaling.
    pub fn is_signaling_nan(&self) -> Option<bool> {
        match self.num {
            FloatNum::Nan(_, signal, _) => Some(signal),
            _ => None,
        }
    }

    /// Returns the NaN payload of this `BigFloat`.
    /// The result is wrapped in an option since only a NaN has a payload.
    pub fn nan_payload(&self) -> Option<&BigUint> {
        match &self.num {
            FloatNum::Nan(_, _, payload) => Some(payload),
            _ => None,
        }
    }
}

// Implementing `Default` for `BigFloat`
impl Default for BigFloat {
    fn default() -> Self {
        Self::new()
    }
}

// Compares two finite, nonzero magnitudes given as (exponent, mantissa).
fn magnitude_cmp(e1: &BigInt, m1: &BigUint, e2: &BigInt, m2: &BigUint) -> Ordering {
    // exponent of the most significant bit decides unless it ties
    let a1 = e1 + (m1.bits() as i64 - 1);
    let a2 = e2 + (m2.bits() as i64 - 1);
    match a1.cmp(&a2) {
        Ordering::Equal => {
            // equal adjusted exponents: the scale gap equals the width gap,
            // so the alignment shift is small
            let b1 = m1.bits();
            let b2 = m2.bits();
            if b2 >= b1 {
                (m1 << (b2 - b1)).cmp(m2)
            } else {
                m1.cmp(&(m2 << (b1 - b2)))
            }
        }
        ord => ord,
    }
}

// Comparison is by denoted value: every member of a cohort compares equal,
// +0 equals -0, and any NaN is unordered.
impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.num, &other.num) {
            (FloatNum::Nan(_, _, _), _) | (_, FloatNum::Nan(_, _, _)) => None,
            (FloatNum::Infinity(s1), FloatNum::Infinity(s2)) => {
                if s1 == s2 {
                    Some(Ordering::Equal)
                } else if *s1 {
                    Some(Ordering::Less)
                } else {
                    Some(Ordering::Greater)
                }
            }
            (FloatNum::Infinity(s), _) => {
                if *s {
                    Some(Ordering::Less)
                } else {
                    Some(Ordering::Greater)
                }
            }
            (_, FloatNum::Infinity(s)) => {
                if *s {
                    Some(Ordering::Greater)
                } else {
                    Some(Ordering::Less)
                }
            }
            (FloatNum::Finite(s1, e1, m1), FloatNum::Finite(s2, e2, m2)) => {
                if m1.is_zero() && m2.is_zero() {
                    Some(Ordering::Equal)
                } else if m1.is_zero() {
                    if *s2 {
                        Some(Ordering::Greater)
                    } else {
                        Some(Ordering::Less)
                    }
                } else if m2.is_zero() {
                    if *s1 {
                        Some(Ordering::Less)
                    } else {
                        Some(Ordering::Greater)
                    }
                } else if s1 != s2 {
                    if *s1 {
                        Some(Ordering::Less)
                    } else {
                        Some(Ordering::Greater)
                    }
                } else {
                    let mag = magnitude_cmp(e1, m1, e2, m2);
                    if *s1 {
                        Some(mag.reverse())
                    } else {
                        Some(mag)
                    }
                }
            }
        }
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(sign: bool, exp: i64, m: u64) -> BigFloat {
        BigFloat::from_parts(sign, BigInt::from(exp), BigUint::from(m))
    }

    #[test]
    fn cohort_members_compare_equal() {
        // 1 * 2^1 == 2 * 2^0 == 4 * 2^-1
        assert_eq!(finite(false, 1, 1), finite(false, 0, 2));
        assert_eq!(finite(false, 1, 1), finite(false, -1, 4));
    }

    #[test]
    fn signed_zeros_compare_equal() {
        assert_eq!(BigFloat::zero(false), BigFloat::zero(true));
        // zero exponent does not matter either
        assert_eq!(BigFloat::zero(false), finite(true, 40, 0));
    }

    #[test]
    fn ordering() {
        let neg_one = finite(true, 0, 1);
        let two = finite(false, 1, 1);
        assert!(neg_one < BigFloat::zero(false));
        assert!(BigFloat::zero(true) < BigFloat::one());
        assert!(BigFloat::one() < two);
        assert!(two < BigFloat::infinity(false));
        assert!(BigFloat::infinity(true) < neg_one);
        assert!(finite(true, 1, 1) < neg_one);
    }

    #[test]
    fn nan_is_unordered() {
        let nan = BigFloat::nan(false, false, BigUint::zero());
        assert_eq!(nan.partial_cmp(&BigFloat::one()), None);
        assert_eq!(BigFloat::one().partial_cmp(&nan), None);
        assert!(nan != nan.clone());
    }
}
