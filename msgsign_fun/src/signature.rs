//! The compact ECDSA signature representation.

use num_bigint::BigUint;
use num_traits::Zero;
use weierstrassfun::{octets, Curve, FormatError};

/// An ECDSA signature: the pair `(r, s)`, each in `[1, n−1]`.
///
/// [`crate::sign`] and [`Signature::from_bytes`] both guarantee the range
/// invariant; a hand-built out-of-range signature simply fails to verify
/// and recovers nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

impl Signature {
    /// Serialize as `r ‖ s`, each a fixed-width big-endian scalar of the
    /// curve's scalar size (64 bytes total on the 256-bit curves).
    pub fn to_bytes(&self, ec: &Curve) -> Result<Vec<u8>, FormatError> {
        let nsize = ec.nsize();
        let mut out = octets::uint_to_be_bytes(&self.r, nsize)?;
        out.extend_from_slice(&octets::uint_to_be_bytes(&self.s, nsize)?);
        Ok(out)
    }

    /// Parse a compact `r ‖ s` encoding, enforcing the exact width and
    /// the `[1, n−1]` range of both scalars.
    pub fn from_bytes(ec: &Curve, bytes: &[u8]) -> Result<Self, FormatError> {
        let nsize = ec.nsize();
        if bytes.len() != 2 * nsize {
            return Err(FormatError::InvalidLength);
        }
        let r = octets::uint_from_be_bytes(&bytes[..nsize]);
        let s = octets::uint_from_be_bytes(&bytes[nsize..]);
        if r.is_zero() || r >= *ec.n() || s.is_zero() || s >= *ec.n() {
            return Err(FormatError::InvalidEncoding);
        }
        Ok(Signature { r, s })
    }
}
