//! Thin layer over the Goldilocks prime field.
//!
//! Every trace and ROM value lives in this field. The rest of the crate only
//! relies on normalization of signed literals, the zero test and the guarded
//! inverse defined here.

use p3_field::{Field, PrimeCharacteristicRing, PrimeField64};
pub use p3_goldilocks::Goldilocks as F;

/// The field modulus `p = 2^64 - 2^32 + 1`.
pub const MODULUS: u64 = 0xffff_ffff_0000_0001;

/// Maps a signed integer literal into the field, adding `p` to negative
/// values.
pub fn from_i128(value: i128) -> F {
    F::from_u64(value.rem_euclid(MODULUS as i128) as u64)
}

pub fn from_u64(value: u64) -> F {
    F::from_u64(value)
}

/// Field element for a selector flag.
pub fn from_bool(flag: bool) -> F {
    if flag {
        F::ONE
    } else {
        F::ZERO
    }
}

pub fn is_zero(value: F) -> bool {
    value == F::ZERO
}

/// Multiplicative inverse, or `None` for zero.
pub fn inverse(value: F) -> Option<F> {
    if is_zero(value) {
        return None;
    }
    value.try_inverse()
}

/// Canonical integer representative in `[0, p)`.
pub fn to_u64(value: F) -> u64 {
    value.as_canonical_u64()
}
