/*
    Utilities
*/

use std::ops::ShlAssign;

use num_bigint::BigUint;

use super::*;

// Converts a `BitVec` to a `BigUint`
pub(crate) fn bitvec_to_biguint(bv: &BitVec) -> BigUint {
    let mut i = BigUint::default();
    for b in bv.iter().rev() {
        i.shl_assign(1);
        i.set_bit(0, *b);
    }
    i
}

// Converts a `BigUint` to a `BitVec` of exactly `width` bits,
// truncating or zero-extending at the high end.
pub(crate) fn biguint_to_bitvec(i: &BigUint, width: usize) -> BitVec {
    let mut bv = BitVec::from_vec(i.to_u32_digits());
    bv.resize(width, false);
    bv
}

// Returns a mask covering the low `width` bits.
pub(crate) fn low_mask(width: u64) -> BigUint {
    (BigUint::from(1u32) << width) - 1u32
}

// Returns true if any of the low `n` bits of `m` is set.
pub(crate) fn low_bits_any(m: &BigUint, n: u64) -> bool {
    match m.trailing_zeros() {
        Some(tz) => tz < n,
        None => false,
    }
}
