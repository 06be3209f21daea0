//! Recoverable ECDSA over [`weierstrassfun`] curves, plus the Bitcoin
//! message-signing protocol that binds a signature to an address.
//!
//! The crate root holds the raw DSA operations: deterministic RFC 6979
//! signing, plain verification, and candidate public-key recovery. [`signmessage`] layers the
//! "Bitcoin Signed Message" convention on top; [`address`] provides the
//! address codec it compares against.
//!
//! ```
//! use msgsign_fun::signmessage;
//! use num_bigint::BigUint;
//! use msgsign_fun::address::Network;
//!
//! let privkey = BigUint::from(0x1337u32);
//! let (addr, sig) = signmessage::sign(b"hello world", &privkey, true, Network::Mainnet)?;
//! assert!(signmessage::verify(b"hello world", &addr, &sig));
//! assert!(!signmessage::verify(b"hello worlds", &addr, &sig));
//! # Ok::<(), msgsign_fun::signmessage::SignMessageError>(())
//! ```

pub mod address;
pub mod nonce;
pub mod signature;
pub mod signmessage;

pub use signature::Signature;

use digest::{core_api::BlockSizeUser, Digest};
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::RngCore;
use weierstrassfun::{numbertheory::mod_inverse, octets, Curve, DomainError, Point};

/// Reduce a message digest to a scalar: keep the leftmost `bits(n)` bits
/// when the digest is wider than the group order, the whole digest
/// otherwise. The result may still exceed n; callers reduce mod n.
pub fn truncate_digest(ec: &Curve, digest: &[u8]) -> BigUint {
    let z = octets::uint_from_be_bytes(digest);
    let digest_bits = 8 * digest.len() as u64;
    let n_bits = ec.n().bits();
    if digest_bits > n_bits {
        z >> (digest_bits - n_bits)
    } else {
        z
    }
}

// One signing attempt with a fixed nonce. None when r or s degenerates
// to zero, which the retry loop treats as "next nonce".
fn sign_once(ec: &Curve, z: &BigUint, privkey: &BigUint, k: &BigUint) -> Option<Signature> {
    let n = ec.n();
    let big_r = ec.mult(k);
    let r = big_r.x()? % n;
    if r.is_zero() {
        return None;
    }
    let k_inv = mod_inverse(k, n).expect("k in [1, n-1], n prime");
    let s = (&k_inv * (z + &r * privkey)) % n;
    if s.is_zero() {
        return None;
    }
    // low-s normalization: (r, n−s) signs the same digest
    let s = if &s > &(n >> 1) { n - s } else { s };
    Some(Signature { r, s })
}

fn check_scalar(ec: &Curve, k: &BigUint) -> Result<(), DomainError> {
    if k.is_zero() || k >= ec.n() {
        return Err(DomainError::ScalarOutOfRange);
    }
    Ok(())
}

/// Sign a message digest with the RFC 6979 deterministic nonce, derived
/// by HMAC-`D` from the private key and the digest. Candidates are
/// consumed until both r and s are non-zero, so the result always has
/// r, s ∈ [1, n−1] and never changes for the same (key, digest) pair.
pub fn sign<D: Digest + BlockSizeUser>(
    ec: &Curve,
    digest: &[u8],
    privkey: &BigUint,
) -> Result<Signature, DomainError> {
    sign_with_extra_entropy::<D>(ec, digest, privkey, &[])
}

/// Like [`sign`], but feeds fresh randomness from `rng` into the
/// RFC 6979 section 3.6 additional-data slot. A broken RNG degrades
/// this to [`sign`], never worse.
pub fn sign_with_rng<D: Digest + BlockSizeUser, R: RngCore>(
    ec: &Curve,
    digest: &[u8],
    privkey: &BigUint,
    rng: &mut R,
) -> Result<Signature, DomainError> {
    let mut extra = [0u8; 32];
    rng.fill_bytes(&mut extra);
    sign_with_extra_entropy::<D>(ec, digest, privkey, &extra)
}

fn sign_with_extra_entropy<D: Digest + BlockSizeUser>(
    ec: &Curve,
    digest: &[u8],
    privkey: &BigUint,
    extra: &[u8],
) -> Result<Signature, DomainError> {
    check_scalar(ec, privkey)?;
    let z = truncate_digest(ec, digest) % ec.n();
    let mut nonces = nonce::Rfc6979::<D>::new(ec, privkey, digest, extra);
    loop {
        if let Some(sig) = sign_once(ec, &z, privkey, &nonces.next_candidate()) {
            return Ok(sig);
        }
    }
}

/// Sign with an externally supplied nonce. The nonce must be in
/// [1, n−1] and must not produce a degenerate r or s; either defect is
/// [`DomainError::ScalarOutOfRange`].
pub fn sign_with_nonce(
    ec: &Curve,
    digest: &[u8],
    privkey: &BigUint,
    nonce: &BigUint,
) -> Result<Signature, DomainError> {
    check_scalar(ec, privkey)?;
    check_scalar(ec, nonce)?;
    let z = truncate_digest(ec, digest) % ec.n();
    sign_once(ec, &z, privkey, nonce).ok_or(DomainError::ScalarOutOfRange)
}

/// Plain ECDSA verification of a digest against a known public key.
/// Total: every malformed input is simply `false`.
pub fn verify(ec: &Curve, digest: &[u8], pubkey: &Point, sig: &Signature) -> bool {
    let n = ec.n();
    if sig.r.is_zero() || sig.r >= *n || sig.s.is_zero() || sig.s >= *n {
        return false;
    }
    if pubkey.is_infinity() || ec.is_on_curve(pubkey) != Ok(true) {
        return false;
    }
    if ec.h() > 1 && !ec.mult_point(n, pubkey).is_infinity() {
        return false;
    }
    let z = truncate_digest(ec, digest) % n;
    let s_inv = match mod_inverse(&sig.s, n) {
        Ok(inv) => inv,
        Err(_) => return false,
    };
    let u1 = (&z * &s_inv) % n;
    let u2 = (&sig.r * &s_inv) % n;
    let big_r = ec.add(&ec.mult(&u1), &ec.mult_point(&u2, pubkey));
    match big_r.x() {
        Some(x) => x % n == sig.r,
        None => false,
    }
}

/// Every public key the signature could have been made with, in key_id
/// order: slot `2j + parity` holds the candidate built from
/// `x = r + j·n` with the even (`parity` 0) or odd (`parity` 1) root.
///
/// Always exactly `2·(h+1)` slots; a slot is `None` when its x exceeds
/// the field, has no point, or the candidate leaves the order-n
/// subgroup. For a signature produced by [`sign`], exactly one slot
/// holds the signer's public key.
pub fn pubkey_recovery(ec: &Curve, digest: &[u8], sig: &Signature) -> Vec<Option<Point>> {
    let n = ec.n();
    let slot_count = 2 * (ec.h() as usize + 1);
    let r_inv = match mod_inverse(&sig.r, n) {
        Ok(inv) => inv,
        Err(_) => return vec![None; slot_count],
    };
    if sig.s.is_zero() || sig.s >= *n || sig.r >= *n {
        return vec![None; slot_count];
    }

    let z = truncate_digest(ec, digest) % n;
    // Q = r⁻¹·(s·R − z·G) = u1·G + u2·R
    let u1 = ((n - &z) * &r_inv) % n;
    let u2 = (&sig.s * &r_inv) % n;
    let u1_g = ec.mult(&u1);

    let mut slots = Vec::with_capacity(slot_count);
    for j in 0..=ec.h() {
        let x = &sig.r + BigUint::from(j) * n;
        if x >= *ec.p() {
            slots.push(None);
            slots.push(None);
            continue;
        }
        for odd in [false, true] {
            let y = match ec.y_odd(&x, odd) {
                Ok(y) => y,
                Err(_) => {
                    slots.push(None);
                    continue;
                }
            };
            let big_r = Point::affine(x.clone(), y);
            if ec.h() > 1 && !ec.mult_point(n, &big_r).is_infinity() {
                slots.push(None);
                continue;
            }
            let q = ec.add(&u1_g, &ec.mult_point(&u2, &big_r));
            slots.push(if q.is_infinity() { None } else { Some(q) });
        }
    }
    slots
}

#[cfg(test)]
mod test {
    use super::*;
    use sha2::{Digest as _, Sha256};
    use weierstrassfun::curves;

    fn digest_of(msg: &[u8]) -> Vec<u8> {
        Sha256::digest(msg).to_vec()
    }

    #[test]
    fn sign_verify_roundtrip_all_curves() {
        for ec in curves::all_curves() {
            let privkey = BigUint::from(5u32) % ec.n();
            let privkey = if privkey.is_zero() { BigUint::from(1u32) } else { privkey };
            let pubkey = ec.mult(&privkey);
            let digest = digest_of(b"the message");

            let sig = sign::<Sha256>(ec, &digest, &privkey).unwrap();
            assert!(!sig.r.is_zero() && sig.r < *ec.n());
            assert!(!sig.s.is_zero() && sig.s < *ec.n());
            assert!(verify(ec, &digest, &pubkey, &sig));
            // a different digest on a tiny group can collide mod n
            if ec.nsize() >= 16 {
                assert!(!verify(ec, &digest_of(b"another message"), &pubkey, &sig));
            }
        }
    }

    #[test]
    fn deterministic_signing_is_deterministic() {
        let ec = &*curves::SECP256K1;
        let privkey = BigUint::from(0xdeadbeefu32);
        let digest = digest_of(b"same input, same signature");
        let sig1 = sign::<Sha256>(ec, &digest, &privkey).unwrap();
        let sig2 = sign::<Sha256>(ec, &digest, &privkey).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn rfc6979_reference_vectors() {
        // the widely replicated secp256k1 RFC 6979 vectors (trezor-crypto,
        // haskoin, python-ecdsa): private key 1, z = SHA256(message)
        let ec = &*curves::SECP256K1;
        let privkey = BigUint::from(1u32);
        let cases = [
            (
                &b"Satoshi Nakamoto"[..],
                "934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d8",
                "2442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
            ),
            (
                &b"All those moments will be lost in time, like tears in rain. Time to die..."[..],
                "8600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b",
                "547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21",
            ),
        ];
        for (msg, r_hex, s_hex) in cases {
            let sig = sign::<Sha256>(ec, &digest_of(msg), &privkey).unwrap();
            assert_eq!(sig.r, BigUint::parse_bytes(r_hex.as_bytes(), 16).unwrap());
            assert_eq!(sig.s, BigUint::parse_bytes(s_hex.as_bytes(), 16).unwrap());
        }
    }

    #[test]
    fn rng_signing_verifies_too() {
        let ec = &*curves::SECP256K1;
        let privkey = BigUint::from(42u32);
        let pubkey = ec.mult(&privkey);
        let digest = digest_of(b"entropy mixed in");
        let mut rng = rand::thread_rng();
        let sig = sign_with_rng::<Sha256, _>(ec, &digest, &privkey, &mut rng).unwrap();
        assert!(verify(ec, &digest, &pubkey, &sig));
    }

    #[test]
    fn explicit_nonce_signing() {
        let ec = &*curves::SECP256K1;
        let privkey = BigUint::from(42u32);
        let pubkey = ec.mult(&privkey);
        let digest = digest_of(b"fixed nonce");

        let sig = sign_with_nonce(ec, &digest, &privkey, &BigUint::from(77u32)).unwrap();
        assert!(verify(ec, &digest, &pubkey, &sig));

        assert_eq!(
            sign_with_nonce(ec, &digest, &privkey, &BigUint::from(0u32)),
            Err(DomainError::ScalarOutOfRange)
        );
        assert_eq!(
            sign_with_nonce(ec, &digest, &privkey, ec.n()),
            Err(DomainError::ScalarOutOfRange)
        );
        assert_eq!(
            sign::<Sha256>(ec, &digest, &BigUint::from(0u32)),
            Err(DomainError::ScalarOutOfRange)
        );
    }

    #[test]
    fn signatures_are_low_s() {
        let ec = &*curves::SECP256K1;
        let digest = digest_of(b"low s");
        for key in 1u32..20 {
            let sig = sign::<Sha256>(ec, &digest, &BigUint::from(key)).unwrap();
            assert!(sig.s <= (ec.n() >> 1));
        }
    }

    #[test]
    fn recovery_finds_the_signer() {
        for ec in curves::all_curves() {
            let privkey = BigUint::from(3u32) % ec.n();
            let privkey = if privkey.is_zero() { BigUint::from(2u32) } else { privkey };
            let pubkey = ec.mult(&privkey);
            let digest = digest_of(b"recover me");

            let sig = sign::<Sha256>(ec, &digest, &privkey).unwrap();
            let slots = pubkey_recovery(ec, &digest, &sig);
            assert_eq!(slots.len(), 2 * (ec.h() as usize + 1));

            let hits = slots
                .iter()
                .filter(|slot| slot.as_ref() == Some(&pubkey))
                .count();
            assert_eq!(hits, 1, "exactly one slot holds the signer");

            // every recovered candidate verifies the signature
            for candidate in slots.into_iter().flatten() {
                assert!(verify(ec, &digest, &candidate, &sig));
            }
        }
    }

    #[test]
    fn recovery_never_panics_on_junk() {
        let ec = &*curves::SECP256K1;
        let digest = digest_of(b"junk");
        let junk = Signature {
            r: ec.n() - 1u32,
            s: BigUint::from(1u32),
        };
        let slots = pubkey_recovery(ec, &digest, &junk);
        assert_eq!(slots.len(), 4);
        // r + n ≥ p on secp256k1, so the j = 1 slots are empty
        assert!(slots[2].is_none() && slots[3].is_none());
    }

    #[test]
    fn digest_truncation_keeps_leftmost_bits() {
        let ec = &*curves::EC11_7;
        // n = 7, bits(n) = 3: a 1-byte digest keeps its top 3 bits
        let z = truncate_digest(ec, &[0b1011_0001]);
        assert_eq!(z, BigUint::from(0b101u32));
        // digest narrower than n is taken whole
        let ec = &*curves::SECP256K1;
        let z = truncate_digest(ec, &[0xff, 0x01]);
        assert_eq!(z, BigUint::from(0xff01u32));
    }
}
