/*
    Conversions to and from `BigFloat`
*/

use bitvec::field::BitField;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};

use super::*;

// Embedding the native integers: always exact, exponent 0, never raises.

macro_rules! from_unsigned_impl {
    ($($t:ty)*) => {$(
        impl From<$t> for BigFloat {
            fn from(x: $t) -> Self {
                BigFloat::from_parts(false, BigInt::zero(), BigUint::from(x))
            }
        }
    )*};
}

macro_rules! from_signed_impl {
    ($($t:ty)*) => {$(
        impl From<$t> for BigFloat {
            fn from(x: $t) -> Self {
                BigFloat::from_parts(x < 0, BigInt::zero(), BigUint::from(x.unsigned_abs()))
            }
        }
    )*};
}

from_unsigned_impl! { u8 u16 u32 u64 }
from_signed_impl! { i8 i16 i32 i64 }

impl From<bool> for BigFloat {
    /// Converts `true` to 1 and `false` to +0.
    fn from(b: bool) -> Self {
        if b {
            BigFloat::one()
        } else {
            BigFloat::new()
        }
    }
}

// Truncation core shared by every integer conversion policy.
impl BigFloat {
    /// Truncates this value toward zero to an arbitrary-precision integer.
    ///
    /// Any fractional part is discarded without rounding or raising flags.
    /// Non-finite values have no integer to truncate to and fail with
    /// [`ConversionError::OutOfRange`], as does a scale so large that the
    /// integer could not be materialized.
    pub fn to_bigint(&self) -> Result<BigInt, ConversionError> {
        match self.repr() {
            FloatNum::Finite(s, e, m) => {
                if m.is_zero() {
                    return Ok(BigInt::zero());
                }
                let mag = match e.sign() {
                    Sign::Minus => {
                        let sh = (-e).to_u64().unwrap_or(u64::MAX);
                        if sh >= m.bits() {
                            BigUint::zero()
                        } else {
                            m >> sh
                        }
                    }
                    _ => {
                        let sh = e
                            .to_u64()
                            .and_then(|v| usize::try_from(v).ok())
                            .ok_or(ConversionError::OutOfRange)?;
                        m << sh
                    }
                };
                if mag.is_zero() {
                    Ok(BigInt::zero())
                } else {
                    let sign = if *s { Sign::Minus } else { Sign::Plus };
                    Ok(BigInt::from_biguint(sign, mag))
                }
            }
            _ => Err(ConversionError::OutOfRange),
        }
    }

    /// Converts this value to an arbitrary-precision integer only if it is
    /// already an exact integer; otherwise fails with
    /// [`ConversionError::Inexact`].
    pub fn to_bigint_exact(&self) -> Result<BigInt, ConversionError> {
        match self.repr() {
            FloatNum::Finite(_, e, m) => {
                if !m.is_zero() && e.sign() == Sign::Minus {
                    let fractional = match m.trailing_zeros() {
                        Some(tz) => BigInt::from(tz) < -e,
                        None => false,
                    };
                    if fractional {
                        return Err(ConversionError::Inexact);
                    }
                }
                self.to_bigint()
            }
            _ => Err(ConversionError::OutOfRange),
        }
    }

    // Low `width` bits of the truncated value's two's-complement form,
    // computed without materializing the full integer. Non-finite values
    // collapse to 0.
    fn wrapped_bits(&self, width: u64) -> u64 {
        let (s, e, m) = match self.repr() {
            FloatNum::Finite(s, e, m) => (s, e, m),
            _ => return 0,
        };
        if m.is_zero() {
            return 0;
        }
        let mag = match e.sign() {
            Sign::Minus => {
                let sh = (-e).to_u64().unwrap_or(u64::MAX);
                if sh >= m.bits() {
                    BigUint::zero()
                } else {
                    (m >> sh) & low_mask(width)
                }
            }
            _ => match e.to_u64() {
                // shifting by the width or more leaves nothing in the window
                Some(sh) if sh < width => ((m & low_mask(width)) << sh) & low_mask(width),
                _ => BigUint::zero(),
            },
        };
        let bits = mag.to_u64().unwrap_or(0);
        let mask = u64::MAX >> (64 - width as u32);
        if *s {
            bits.wrapping_neg() & mask
        } else {
            bits
        }
    }
}

// The three-policy conversion surface for one native width: checked
// (truncate, then range-check), wrapping (truncate, reduce modulo 2^width),
// and exact (reject fractional values, then range-check). The per-width
// entry points all run through the shared truncation core above.
macro_rules! int_conversions {
    ($t:ty, $to_prim:ident, $checked:ident, $wrapping:ident, $exact:ident, $width:expr) => {
        impl BigFloat {
            /// Truncates toward zero and converts, failing if the source is
            /// non-finite or the truncated integer does not fit the target.
            pub fn $checked(&self) -> Result<$t, ConversionError> {
                if self.is_zero() {
                    return Ok(0);
                }
                self.to_bigint()?
                    .$to_prim()
                    .ok_or(ConversionError::OutOfRange)
            }

            /// Truncates toward zero and returns the least-significant bits
            /// of the two's-complement form. Non-finite values convert to 0.
            pub fn $wrapping(&self) -> $t {
                self.wrapped_bits($width) as $t
            }

            /// Converts only if this value is an exact integer that fits the
            /// target; a fractional value is rejected before truncation.
            pub fn $exact(&self) -> Result<$t, ConversionError> {
                if self.is_zero() {
                    return Ok(0);
                }
                self.to_bigint_exact()?
                    .$to_prim()
                    .ok_or(ConversionError::OutOfRange)
            }
        }

        impl TryFrom<&BigFloat> for $t {
            type Error = ConversionError;

            fn try_from(x: &BigFloat) -> Result<$t, ConversionError> {
                x.$checked()
            }
        }

        impl TryFrom<BigFloat> for $t {
            type Error = ConversionError;

            fn try_from(x: BigFloat) -> Result<$t, ConversionError> {
                x.$checked()
            }
        }
    };
}

int_conversions!(u8, to_u8, to_u8_checked, to_u8_wrapping, to_u8_exact, 8);
int_conversions!(i8, to_i8, to_i8_checked, to_i8_wrapping, to_i8_exact, 8);
int_conversions!(u16, to_u16, to_u16_checked, to_u16_wrapping, to_u16_exact, 16);
int_conversions!(i16, to_i16, to_i16_checked, to_i16_wrapping, to_i16_exact, 16);
int_conversions!(u32, to_u32, to_u32_checked, to_u32_wrapping, to_u32_exact, 32);
int_conversions!(i32, to_i32, to_i32_checked, to_i32_wrapping, to_i32_exact, 32);
int_conversions!(u64, to_u64, to_u64_checked, to_u64_wrapping, to_u64_exact, 64);
int_conversions!(i64, to_i64, to_i64_checked, to_i64_wrapping, to_i64_exact, 64);

// Native binary32/64 conversions. Rounding always runs against the exact
// value of this number, never through a decimal intermediate.

fn binary64_context() -> Context {
    Context::for_precision(53).exponent_range(-1022, 1023)
}

fn binary32_context() -> Context {
    Context::for_precision(24).exponent_range(-126, 127)
}

impl BigFloat {
    /// Creates a value from a 64-bit float, decomposing its exact binary
    /// representation; no precision is lost, regardless of magnitude.
    pub fn from_f64(f: f64) -> Self {
        let mut bv = BitVec::repeat(false, 64);
        bv.store(f.to_bits());
        Self::unpack_native(&bv, 11, 52)
    }

    /// Creates a value from a 32-bit float, decomposing its exact binary
    /// representation; no precision is lost, regardless of magnitude.
    pub fn from_f32(f: f32) -> Self {
        let mut bv = BitVec::repeat(false, 32);
        bv.store(f.to_bits());
        Self::unpack_native(&bv, 8, 23)
    }

    /// Converts this value to its closest 64-bit float under half-even
    /// rounding of the exact magnitude. Values beyond the binary64 range
    /// saturate to signed infinity. NaN sign, quieting, and low payload
    /// bits carry over into the encoded pattern.
    pub fn to_f64(&self) -> f64 {
        let bv = self.pack_native(11, 52, &binary64_context());
        f64::from_bits(bv[..64].load())
    }

    /// Converts this value to its closest 32-bit float under half-even
    /// rounding of the exact magnitude. Values beyond the binary32 range
    /// saturate to signed infinity. NaN sign, quieting, and low payload
    /// bits carry over into the encoded pattern.
    pub fn to_f32(&self) -> f32 {
        let bv = self.pack_native(8, 23, &binary32_context());
        f32::from_bits(bv[..32].load())
    }

    // Splices a packed native-float representation into its sign,
    // exponent, and mantissa fields and rebuilds the exact value.
    fn unpack_native(bv: &BitVec, ebits: usize, mbits: usize) -> Self {
        let n = 1 + ebits + mbits;
        let s = bv[n - 1];
        let e_field = bitvec_to_biguint(&BitVec::from(&bv[mbits..n - 1]))
            .to_u64()
            .unwrap_or(0);
        let m_field = bitvec_to_biguint(&BitVec::from(&bv[..mbits]));
        let bias = (1i64 << (ebits - 1)) - 1;

        if e_field == (1u64 << ebits) - 1 {
            if m_field.is_zero() {
                // infinity
                Self::infinity(s)
            } else {
                // NaN: the top mantissa bit is the quiet bit,
                // everything below it is payload
                let quiet = m_field.bit(mbits as u64 - 1);
                let payload = m_field & low_mask(mbits as u64 - 1);
                Self::nan(s, !quiet, payload)
            }
        } else if e_field == 0 {
            if m_field.is_zero() {
                // zero
                Self::zero(s)
            } else {
                // subnormal
                let exp = 1 - bias - mbits as i64;
                Self::from_parts(s, BigInt::from(exp), m_field)
            }
        } else {
            // normal: restore the implicit leading bit
            let m = m_field | (BigUint::one() << mbits);
            let exp = e_field as i64 - bias - mbits as i64;
            Self::from_parts(s, BigInt::from(exp), m)
        }
    }

    // Packs this value into a native-float bit pattern, rounding finite
    // values through `ctx` (which must describe the target format).
    fn pack_native(&self, ebits: usize, mbits: usize, ctx: &Context) -> BitVec {
        let bias = (1i64 << (ebits - 1)) - 1;
        let e_inf = (1u64 << ebits) - 1;

        match self.repr() {
            FloatNum::Nan(s, signaling, payload) => {
                let pbits = mbits as u64 - 1;
                let mut m = payload & low_mask(pbits);
                if *signaling && m.is_zero() {
                    // a payloadless signaling NaN would encode as infinity;
                    // force the next-highest payload bit instead
                    m.set_bit(pbits - 1, true);
                }
                let mut mv = biguint_to_bitvec(&m, mbits);
                mv.set(mbits - 1, !*signaling);
                Self::pack_fields(*s, e_inf, mv, ebits, mbits)
            }
            FloatNum::Infinity(s) => {
                Self::pack_fields(*s, e_inf, BitVec::repeat(false, mbits), ebits, mbits)
            }
            FloatNum::Finite(_, _, _) => {
                let rounded = ctx.round(self).value;
                match rounded.repr() {
                    FloatNum::Infinity(s) => {
                        Self::pack_fields(*s, e_inf, BitVec::repeat(false, mbits), ebits, mbits)
                    }
                    FloatNum::Finite(s, e, m) => {
                        if m.is_zero() {
                            return Self::pack_fields(
                                *s,
                                0,
                                BitVec::repeat(false, mbits),
                                ebits,
                                mbits,
                            );
                        }
                        let prec = mbits as u64 + 1;
                        let e_i = e.to_i64().unwrap_or(0);
                        let adjusted = e_i + m.bits() as i64 - 1;
                        if adjusted >= 1 - bias {
                            // normal: widen the mantissa to full precision
                            // and drop the implicit leading bit
                            let sh = prec - m.bits();
                            let m = m << sh;
                            let e_field = (e_i - sh as i64 + bias + mbits as i64) as u64;
                            Self::pack_fields(*s, e_field, biguint_to_bitvec(&m, mbits), ebits, mbits)
                        } else {
                            // subnormal: align the mantissa to the format's
                            // smallest scale exponent
                            let etiny = 1 - bias - mbits as i64;
                            let sh = (e_i - etiny) as u64;
                            let m = m << sh;
                            Self::pack_fields(*s, 0, biguint_to_bitvec(&m, mbits), ebits, mbits)
                        }
                    }
                    FloatNum::Nan(_, _, _) => panic!("unreachable"),
                }
            }
        }
    }

    // Packs sign, exponent field, and mantissa field into one bit pattern.
    fn pack_fields(sign: bool, e_field: u64, mantissa: BitVec, ebits: usize, mbits: usize) -> BitVec {
        let n = 1 + ebits + mbits;
        let mut bv = BitVec::repeat(false, n);
        for (i, b) in mantissa.iter().enumerate() {
            bv.set(i, *b);
        }
        let mut e = e_field;
        for i in 0..ebits {
            bv.set(mbits + i, (e % 2) != 0);
            e >>= 1;
        }
        bv.set(n - 1, sign);
        bv
    }
}

impl From<f64> for BigFloat {
    fn from(f: f64) -> Self {
        Self::from_f64(f)
    }
}

impl From<f32> for BigFloat {
    fn from(f: f32) -> Self {
        Self::from_f32(f)
    }
}
