use bigfloat::binary::*;
use num_bigint::{BigInt, BigUint};

fn fin(sign: bool, exp: i64, m: u64) -> BigFloat {
    BigFloat::from_parts(sign, BigInt::from(exp), BigUint::from(m))
}

#[test]
fn integer_round_trips() {
    for x in [0u8, 1, 127, 128, 255] {
        assert_eq!(BigFloat::from(x).to_u8_checked(), Ok(x));
    }
    for x in [i8::MIN, -1, 0, 1, i8::MAX] {
        assert_eq!(BigFloat::from(x).to_i8_checked(), Ok(x));
    }
    for x in [0u16, 255, 256, u16::MAX] {
        assert_eq!(BigFloat::from(x).to_u16_checked(), Ok(x));
    }
    for x in [i16::MIN, -1, 0, i16::MAX] {
        assert_eq!(BigFloat::from(x).to_i16_checked(), Ok(x));
    }
    for x in [0u32, 1 << 16, u32::MAX] {
        assert_eq!(BigFloat::from(x).to_u32_checked(), Ok(x));
    }
    for x in [i32::MIN, -1, 0, i32::MAX] {
        assert_eq!(BigFloat::from(x).to_i32_checked(), Ok(x));
    }
    for x in [0u64, 1 << 32, u64::MAX] {
        assert_eq!(BigFloat::from(x).to_u64_checked(), Ok(x));
    }
    for x in [i64::MIN, -1, 0, i64::MAX] {
        assert_eq!(BigFloat::from(x).to_i64_checked(), Ok(x));
    }
}

#[test]
fn checked_range_is_exact() {
    // one past each edge must fail, the edge itself must not
    assert_eq!(BigFloat::from(256u16).to_u8_checked(), Err(ConversionError::OutOfRange));
    assert_eq!(BigFloat::from(255u16).to_u8_checked(), Ok(255));
    assert_eq!(BigFloat::from(-1i8).to_u8_checked(), Err(ConversionError::OutOfRange));
    assert_eq!(BigFloat::from(128u8).to_i8_checked(), Err(ConversionError::OutOfRange));
    assert_eq!(BigFloat::from(-129i16).to_i8_checked(), Err(ConversionError::OutOfRange));
    assert_eq!(BigFloat::from(65536u32).to_u16_checked(), Err(ConversionError::OutOfRange));
    assert_eq!(BigFloat::from(65535u32).to_u16_checked(), Ok(65535));
    assert_eq!(
        BigFloat::from(u64::MAX).to_i64_checked(),
        Err(ConversionError::OutOfRange)
    );
}

#[test]
fn truncation_toward_zero_then_range_check() {
    // the truncated integer is 0, which is always in range
    for v in [-0.1, -0.4, -0.5, -0.6] {
        let x = BigFloat::from_f64(v);
        assert_eq!(x.to_u16_checked(), Ok(0), "{}", v);
        assert_eq!(x.to_u32_checked(), Ok(0), "{}", v);
        assert_eq!(x.to_u64_checked(), Ok(0), "{}", v);
    }
    // the truncated integer is -1, which no unsigned width accepts
    for v in [-1.0, -1.4, -1.5, -1.6] {
        let x = BigFloat::from_f64(v);
        assert_eq!(x.to_u16_checked(), Err(ConversionError::OutOfRange), "{}", v);
        assert_eq!(x.to_u32_checked(), Err(ConversionError::OutOfRange), "{}", v);
        assert_eq!(x.to_u64_checked(), Err(ConversionError::OutOfRange), "{}", v);
    }
}

#[test]
fn non_finite_checked_conversions_fail() {
    for x in [
        BigFloat::infinity(false),
        BigFloat::infinity(true),
        BigFloat::nan(false, false, BigUint::default()),
        BigFloat::nan(false, true, BigUint::default()),
    ] {
        assert_eq!(x.to_u8_checked(), Err(ConversionError::OutOfRange));
        assert_eq!(x.to_i64_checked(), Err(ConversionError::OutOfRange));
        assert_eq!(x.to_u32_exact(), Err(ConversionError::OutOfRange));
    }
}

#[test]
fn wrapping_conversions() {
    assert_eq!(BigFloat::from(256u16).to_u8_wrapping(), 0);
    assert_eq!(BigFloat::from(257u16).to_u8_wrapping(), 1);
    assert_eq!(BigFloat::from(-1i8).to_u8_wrapping(), 255);
    assert_eq!(BigFloat::from(-1i8).to_u16_wrapping(), u16::MAX);
    assert_eq!(BigFloat::from(-1i8).to_u64_wrapping(), u64::MAX);
    assert_eq!(BigFloat::from(130u8).to_i8_wrapping(), -126);
    assert_eq!(BigFloat::from_f64(2.9).to_u8_wrapping(), 2);
    assert_eq!(BigFloat::from_f64(-2.9).to_u8_wrapping(), 254);
    // non-finite values collapse to zero instead of raising
    assert_eq!(BigFloat::infinity(false).to_u8_wrapping(), 0);
    assert_eq!(BigFloat::infinity(true).to_i32_wrapping(), 0);
    assert_eq!(
        BigFloat::nan(false, false, BigUint::default()).to_u64_wrapping(),
        0
    );
}

#[test]
fn exact_conversions_reject_fractions() {
    assert_eq!(
        BigFloat::from_f64(2.5).to_u16_exact(),
        Err(ConversionError::Inexact)
    );
    assert_eq!(BigFloat::from_f64(2.0).to_u16_exact(), Ok(2));
    assert_eq!(
        BigFloat::from_f64(-0.5).to_u16_exact(),
        Err(ConversionError::Inexact)
    );
    // fractional values are rejected before the range check
    assert_eq!(
        BigFloat::from_f64(256.5).to_u8_exact(),
        Err(ConversionError::Inexact)
    );
    assert_eq!(
        BigFloat::from_f64(256.0).to_u8_exact(),
        Err(ConversionError::OutOfRange)
    );
}

#[test]
fn boolean_embedding() {
    assert_eq!(BigFloat::from(true), BigFloat::one());
    assert!(BigFloat::from(false).is_zero());
}

#[test]
fn try_from_is_the_checked_policy() {
    let x = BigFloat::from_f64(-0.5);
    assert_eq!(u16::try_from(&x), Ok(0));
    let x = BigFloat::from_f64(-1.5);
    assert_eq!(u16::try_from(&x), Err(ConversionError::OutOfRange));
    assert_eq!(i32::try_from(BigFloat::from(-40i8)), Ok(-40));
}

#[test]
fn big_integer_truncation() {
    let x = fin(false, 100, 1);
    assert_eq!(x.to_bigint(), Ok(BigInt::from(1) << 100));
    let x = fin(true, -3, 25); // -25/8 = -3.125
    assert_eq!(x.to_bigint(), Ok(BigInt::from(-3)));
}

#[test]
fn f64_round_trip_is_bit_exact() {
    let values = [
        0.0,
        -0.0,
        1.0,
        -1.0,
        0.1,
        -2.5,
        1e300,
        -1e-300,
        f64::MAX,
        f64::MIN_POSITIVE,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::from_bits(1),                     // smallest subnormal
        f64::from_bits(0x000F_FFFF_FFFF_FFFF), // largest subnormal
        f64::from_bits(0x0010_0000_0000_0000), // smallest normal
    ];
    for v in values {
        let rt = BigFloat::from_f64(v).to_f64();
        assert_eq!(rt.to_bits(), v.to_bits(), "{:e}", v);
    }
    assert!(BigFloat::from_f64(f64::NAN).to_f64().is_nan());
}

#[test]
fn f32_round_trip_is_bit_exact() {
    let values = [
        0.0f32,
        -0.0,
        1.5,
        -1.5,
        0.1,
        f32::MAX,
        f32::MIN_POSITIVE,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::from_bits(1),
    ];
    for v in values {
        let rt = BigFloat::from_f32(v).to_f32();
        assert_eq!(rt.to_bits(), v.to_bits(), "{:e}", v);
    }
}

#[test]
fn f64_decomposition_is_exact() {
    let x = BigFloat::from_f64(1.0);
    assert_eq!(x.exponent(), Some(&BigInt::from(-52)));
    assert_eq!(x.significand(), Some(&(BigUint::from(1u32) << 52)));

    let x = BigFloat::from_f64(f64::from_bits(1));
    assert_eq!(x.exponent(), Some(&BigInt::from(-1074)));
    assert_eq!(x.significand(), Some(&BigUint::from(1u32)));

    let x = BigFloat::from_f64(-0.0);
    assert!(x.is_zero() && x.sign());
}

#[test]
fn to_f64_rounds_half_even() {
    // 2^53 + 1 is the first integer binary64 cannot hold
    let x = BigFloat::from((1u64 << 53) + 1);
    assert_eq!(x.to_f64(), 9007199254740992.0);
    // u64::MAX rounds exactly as the native cast does
    let x = BigFloat::from(u64::MAX);
    assert_eq!(x.to_f64(), u64::MAX as f64);
}

#[test]
fn to_f64_saturates() {
    assert_eq!(fin(false, 2000, 1).to_f64(), f64::INFINITY);
    assert_eq!(fin(true, 2000, 1).to_f64(), f64::NEG_INFINITY);
    assert_eq!(fin(false, 300, 1).to_f32(), f32::INFINITY);
}

#[test]
fn to_f64_flushes_tiny_values() {
    // half of the smallest subnormal ties to even, which is zero
    assert_eq!(fin(false, -1075, 1).to_f64().to_bits(), 0.0f64.to_bits());
    assert_eq!(
        fin(true, -1075, 1).to_f64().to_bits(),
        (-0.0f64).to_bits()
    );
    // 1.5 * 2^-1074 ties up to the even neighbor, 2^-1073
    assert_eq!(fin(false, -1075, 3).to_f64().to_bits(), 2);
    // the smallest subnormal itself survives
    assert_eq!(fin(false, -1074, 1).to_f64().to_bits(), 1);
}

#[test]
fn nan_payload_encoding() {
    // quiet NaN: quiet bit plus payload bits
    let x = BigFloat::nan(false, false, BigUint::from(5u32));
    assert_eq!(x.to_f64().to_bits(), 0x7FF8_0000_0000_0005);

    // signaling NaN keeps the quiet bit clear and its payload
    let x = BigFloat::nan(false, true, BigUint::from(5u32));
    assert_eq!(x.to_f64().to_bits(), 0x7FF0_0000_0000_0005);

    // a payloadless signaling NaN gets the next-highest bit forced
    let x = BigFloat::nan(false, true, BigUint::default());
    assert_eq!(x.to_f64().to_bits(), 0x7FF4_0000_0000_0000);

    // the sign carries over
    let x = BigFloat::nan(true, false, BigUint::default());
    assert_eq!(x.to_f64().to_bits(), 0xFFF8_0000_0000_0000);

    // and the same layout holds for binary32
    let x = BigFloat::nan(false, false, BigUint::from(3u32));
    assert_eq!(x.to_f32().to_bits(), 0x7FC0_0003);
    let x = BigFloat::nan(false, true, BigUint::default());
    assert_eq!(x.to_f32().to_bits(), 0x7FA0_0000);
}

#[test]
fn nan_payload_decoding() {
    let x = BigFloat::from_f64(f64::from_bits(0x7FF0_0000_0000_0001));
    assert_eq!(x.is_signaling_nan(), Some(true));
    assert_eq!(x.nan_payload(), Some(&BigUint::from(1u32)));

    let x = BigFloat::from_f64(f64::NAN);
    assert_eq!(x.is_signaling_nan(), Some(false));

    // payload survives a full decode/encode cycle
    let bits = 0x7FF8_0000_0000_1234u64;
    let x = BigFloat::from_f64(f64::from_bits(bits));
    assert_eq!(x.to_f64().to_bits(), bits);
}
