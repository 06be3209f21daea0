//! Built-in curves: the SEC 2 / NIST production curves plus three
//! low-cardinality curves whose groups are small enough to reason about
//! by hand in tests.
//!
//! Each static is validated on first access; the parameters are the
//! published standard ones, so construction cannot fail.

use crate::curve::{Curve, CurveParams};
use std::sync::LazyLock;

/// secp256k1, the Bitcoin curve.
pub static SECP256K1: LazyLock<Curve> = LazyLock::new(|| {
    let params = CurveParams::from_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
        "00",
        "07",
        "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        1,
        128,
    )
    .expect("hardcoded hex");
    Curve::new(params).expect("standard parameters")
});

/// secp256r1, also known as NIST P-256.
pub static SECP256R1: LazyLock<Curve> = LazyLock::new(|| {
    let params = CurveParams::from_hex(
        "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
        "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC",
        "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
        "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
        "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
        "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
        1,
        128,
    )
    .expect("hardcoded hex");
    Curve::new(params).expect("standard parameters")
});

/// secp384r1, also known as NIST P-384.
pub static SECP384R1: LazyLock<Curve> = LazyLock::new(|| {
    let params = CurveParams::from_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE\
         FFFFFFFF0000000000000000FFFFFFFF",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE\
         FFFFFFFF0000000000000000FFFFFFFC",
        "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875A\
         C656398D8A2ED19D2A85C8EDD3EC2AEF",
        "AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A38\
         5502F25DBF55296C3A545E3872760AB7",
        "3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C0\
         0A60B1CE1D7E819D7A431D7C90EA0E5F",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF\
         581A0DB248B0A77AECEC196ACCC52973",
        1,
        192,
    )
    .expect("hardcoded hex");
    Curve::new(params).expect("standard parameters")
});

/// secp112r1, the smallest SEC 2 random curve. Weak by modern standards
/// and kept for interop and mid-size testing.
pub static SECP112R1: LazyLock<Curve> = LazyLock::new(|| {
    let params = CurveParams::from_hex(
        "DB7C2ABF62E35E668076BEAD208B",
        "DB7C2ABF62E35E668076BEAD2088",
        "659EF8BA043916EEDE8911702B22",
        "09487239995A5EE76B55F9C2F098",
        "A89CE5AF8724C0A23E0E0FF77500",
        "DB7C2ABF62E35E7628DFAC6561C5",
        1,
        56,
    )
    .expect("hardcoded hex");
    Curve::new(params).expect("standard parameters")
});

/// secp160r1. Its order n is 161 bits, one more than the field size, so
/// scalars serialize one byte wider than coordinates.
pub static SECP160R1: LazyLock<Curve> = LazyLock::new(|| {
    let params = CurveParams::from_hex(
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7FFFFFFF",
        "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7FFFFFFC",
        "1C97BEFC54BD7A8B65ACF89F81D4D4ADC565FA45",
        "4A96B5688EF573284664698968C38BB913CBFC82",
        "23A628553168947D59DCC912042351377AC5FB32",
        "0100000000000000000001F4C8F927AED3CA752257",
        1,
        80,
    )
    .expect("hardcoded hex");
    Curve::new(params).expect("standard parameters")
});

/// Order-7 curve over F_11: y² = x³ + 2x + 7, every point enumerable by
/// hand. p ≡ 3 (mod 4), so the sqrt fast path and the quadratic-residue
/// y disambiguation both apply.
pub static EC11_7: LazyLock<Curve> = LazyLock::new(|| {
    Curve::new(CurveParams::from_u64(11, 2, 7, 6, 9, 7, 1, 1)).expect("hand-verified parameters")
});

/// Order-19 curve over F_17: y² = x³ + 2x + 2. p ≡ 1 (mod 4), exercising
/// the Tonelli–Shanks square-root path.
pub static EC17_19: LazyLock<Curve> = LazyLock::new(|| {
    Curve::new(CurveParams::from_u64(17, 2, 2, 5, 1, 19, 1, 1)).expect("hand-verified parameters")
});

/// Order-31 curve over F_23: y² = x³ + 5x + 1, with n > p so scalar and
/// coordinate ranges differ even at one byte each.
pub static EC23_31: LazyLock<Curve> = LazyLock::new(|| {
    Curve::new(CurveParams::from_u64(23, 5, 1, 0, 1, 31, 1, 1)).expect("hand-verified parameters")
});

/// Look a built-in curve up by its conventional name.
pub fn curve_by_name(name: &str) -> Option<&'static Curve> {
    match name {
        "secp112r1" => Some(&SECP112R1),
        "secp160r1" => Some(&SECP160R1),
        "secp256k1" => Some(&SECP256K1),
        "secp256r1" | "P-256" => Some(&SECP256R1),
        "secp384r1" | "P-384" => Some(&SECP384R1),
        "ec11_7" => Some(&EC11_7),
        "ec17_19" => Some(&EC17_19),
        "ec23_31" => Some(&EC23_31),
        _ => None,
    }
}

/// Every built-in curve, production and test alike.
pub fn all_curves() -> Vec<&'static Curve> {
    vec![
        &SECP112R1,
        &SECP160R1,
        &SECP256K1,
        &SECP256R1,
        &SECP384R1,
        &EC11_7,
        &EC17_19,
        &EC23_31,
    ]
}

/// Just the low-cardinality curves, for tests that enumerate group
/// elements exhaustively.
pub fn low_card_curves() -> Vec<&'static Curve> {
    vec![&EC11_7, &EC17_19, &EC23_31]
}
