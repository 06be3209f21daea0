//! Deterministic nonce derivation per RFC 6979.
//!
//! The generator is an HMAC-DRBG seeded with the private key and the
//! (order-reduced) message digest; successive candidates come out of the
//! section 3.2 loop, already filtered to [1, n−1]. Signing consumes
//! candidates until one yields non-zero r and s, so the same
//! (key, digest) pair always produces the same signature.

use crate::truncate_digest;
use core::marker::PhantomData;
use digest::{core_api::BlockSizeUser, Digest};
use hmac::{Mac, SimpleHmac};
use num_bigint::BigUint;
use num_traits::Zero;
use weierstrassfun::{octets, Curve};

fn hmac_parts<D: Digest + BlockSizeUser>(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut mac = SimpleHmac::<D>::new_from_slice(key).expect("HMAC takes any key length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

/// The RFC 6979 candidate stream for one (curve, key, digest) triple.
///
/// `extra` feeds the section 3.6 "additional data" slot: empty for fully
/// deterministic signing, RNG output for entropy-mixed signing.
pub struct Rfc6979<'a, D: Digest + BlockSizeUser> {
    ec: &'a Curve,
    k: Vec<u8>,
    v: Vec<u8>,
    _hash: PhantomData<D>,
}

impl<'a, D: Digest + BlockSizeUser> Rfc6979<'a, D> {
    /// Seed the HMAC-DRBG (RFC 6979 section 3.2, steps b–g).
    /// `privkey` must already be in [1, n−1].
    pub fn new(ec: &'a Curve, privkey: &BigUint, digest: &[u8], extra: &[u8]) -> Self {
        let nsize = ec.nsize();
        // int2octets(x) and bits2octets(h1)
        let x = octets::uint_to_be_bytes(privkey, nsize).expect("privkey < n fits nsize bytes");
        let h = octets::uint_to_be_bytes(&(truncate_digest(ec, digest) % ec.n()), nsize)
            .expect("reduced mod n fits nsize bytes");

        let hlen = <D as Digest>::output_size();
        let v = vec![0x01u8; hlen];
        let k = vec![0x00u8; hlen];
        let k = hmac_parts::<D>(&k, &[&v, &[0x00], &x, &h, extra]);
        let v = hmac_parts::<D>(&k, &[&v]);
        let k = hmac_parts::<D>(&k, &[&v, &[0x01], &x, &h, extra]);
        let v = hmac_parts::<D>(&k, &[&v]);
        Rfc6979 { ec, k, v, _hash: PhantomData }
    }

    /// The next nonce candidate in [1, n−1] (section 3.2, step h).
    pub fn next_candidate(&mut self) -> BigUint {
        let qbits = self.ec.n().bits();
        loop {
            let mut t = Vec::new();
            while 8 * (t.len() as u64) < qbits {
                self.v = hmac_parts::<D>(&self.k, &[&self.v]);
                t.extend_from_slice(&self.v);
            }
            let k = truncate_digest(self.ec, &t);
            // advance the DRBG state so a rejected candidate (here, or
            // by the caller on r = 0 / s = 0) never repeats
            self.k = hmac_parts::<D>(&self.k, &[&self.v, &[0x00]]);
            self.v = hmac_parts::<D>(&self.k, &[&self.v]);
            if !k.is_zero() && k < *self.ec.n() {
                return k;
            }
        }
    }
}
