//! Modular arithmetic primitives the group law is built from.
//!
//! Everything here works on plain [`BigUint`]s so it can be reused for any
//! odd prime modulus, not just a curve's field prime.

use crate::errors::DomainError;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Miller–Rabin witnesses. Deterministic for every integer below 3.3·10²⁴;
/// for larger inputs the test is probabilistic with error below 4⁻¹².
const MILLER_RABIN_WITNESSES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Miller–Rabin primality test with a fixed witness set.
pub fn is_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if n.is_even() {
        return *n == two;
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_1 = n - 1u32;
    let s = n_minus_1.trailing_zeros().expect("n > 1 and odd");
    let d = &n_minus_1 >> s;

    'witness: for w in MILLER_RABIN_WITNESSES {
        let a = BigUint::from(w);
        if &a % n == BigUint::zero() {
            continue;
        }
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Inverse of `a` modulo `m`: the unique b in [1, m−1] with a·b ≡ 1 (mod m).
///
/// Fails with [`DomainError::NotInvertible`] when gcd(a, m) ≠ 1.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, DomainError> {
    let a = BigInt::from_biguint(Sign::Plus, a % m);
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let gcd = a.extended_gcd(&m_signed);
    if !gcd.gcd.is_one() {
        return Err(DomainError::NotInvertible);
    }
    let inv = gcd.x.mod_floor(&m_signed);
    Ok(inv.to_biguint().expect("mod_floor of positive modulus"))
}

/// Legendre symbol (a/p) by Euler's criterion: 1 for a residue, −1 for a
/// non-residue, 0 for a ≡ 0 (mod p). Assumes p is an odd prime.
pub fn legendre_symbol(a: &BigUint, p: &BigUint) -> i32 {
    let a = a % p;
    if a.is_zero() {
        return 0;
    }
    let exp = (p - 1u32) >> 1;
    if a.modpow(&exp, p).is_one() { 1 } else { -1 }
}

/// A square root of `a` modulo the odd prime `p`.
///
/// Uses the exponentiation shortcut for p ≡ 3 (mod 4) and Tonelli–Shanks
/// otherwise. The result r satisfies r² ≡ a (mod p); the other root is p−r.
/// Fails with [`DomainError::NonResidue`] when no root exists.
pub fn mod_sqrt(a: &BigUint, p: &BigUint) -> Result<BigUint, DomainError> {
    let a = a % p;
    if a.is_zero() {
        return Ok(BigUint::zero());
    }
    if legendre_symbol(&a, p) != 1 {
        return Err(DomainError::NonResidue);
    }

    if (p % 4u32) == BigUint::from(3u32) {
        let exp = (p + 1u32) >> 2;
        return Ok(a.modpow(&exp, p));
    }

    tonelli_shanks(&a, p)
}

// General case for p ≡ 1 (mod 4). `a` is a known residue, reduced mod p.
fn tonelli_shanks(a: &BigUint, p: &BigUint) -> Result<BigUint, DomainError> {
    let two = BigUint::from(2u32);

    // p - 1 = q * 2^s with q odd
    let p_minus_1 = p - 1u32;
    let s = p_minus_1.trailing_zeros().expect("p odd prime > 2");
    let q = &p_minus_1 >> s;

    // smallest quadratic non-residue; found after ~2 tries on average
    let mut z = two.clone();
    while legendre_symbol(&z, p) != -1 {
        z += 1u32;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = a.modpow(&q, p);
    let mut r = a.modpow(&((&q + 1u32) >> 1), p);

    while !t.is_one() {
        // least i in (0, m) with t^(2^i) = 1
        let mut i = 0u64;
        let mut sq = t.clone();
        while !sq.is_one() {
            sq = sq.modpow(&two, p);
            i += 1;
            if i == m {
                // unreachable for a verified residue
                return Err(DomainError::NonResidue);
            }
        }

        let mut b = c.clone();
        for _ in 0..(m - i - 1) {
            b = b.modpow(&two, p);
        }
        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }

    Ok(r)
}
