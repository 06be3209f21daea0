//! The "Bitcoin Signed Message" protocol.
//!
//! A signer proves control of an address without revealing the public
//! key up front: the 65-byte signature carries a recovery flag, the
//! verifier recovers the candidate key the flag names, re-derives the
//! address-type identity and compares it with the claimed address.
//!
//! Wire format: `flag ‖ r ‖ s` (1 + 32 + 32 bytes), base64. The flag is
//! `27 + key_id` for uncompressed P2PKH, shifted by 4 per address type:
//!
//! | flag  | address type        |
//! |-------|---------------------|
//! | 27–30 | P2PKH, uncompressed |
//! | 31–34 | P2PKH, compressed   |
//! | 35–38 | P2WPKH-P2SH         |
//! | 39–42 | P2WPKH (bech32)     |
//!
//! Only signing with a P2PKH address is produced here; all four types
//! are accepted on verification.

use crate::{
    address::{self, AddressError, Network},
    signature::Signature,
};
use base64::{engine::general_purpose, Engine as _};
use core::fmt;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use weierstrassfun::{bytes_from_point, curves::SECP256K1, DomainError};

/// Length-prefixed domain separator hashed in front of every message.
pub const MAGIC_PREFIX: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// Address types a recovery flag can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigAddressType {
    P2pkhUncompressed,
    P2pkhCompressed,
    P2wpkhP2sh,
    P2wpkh,
}

impl SigAddressType {
    /// Split a flag byte into its address type and key_id. `None`
    /// outside [27, 42].
    pub fn from_flag(flag: u8) -> Option<(SigAddressType, u8)> {
        let kind = match flag {
            27..=30 => SigAddressType::P2pkhUncompressed,
            31..=34 => SigAddressType::P2pkhCompressed,
            35..=38 => SigAddressType::P2wpkhP2sh,
            39..=42 => SigAddressType::P2wpkh,
            _ => return None,
        };
        Some((kind, (flag - 27) % 4))
    }
}

/// Failure while producing a signed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignMessageError {
    /// The one-byte length prefix caps messages at 255 bytes.
    MessageTooLong,
    /// The private key is outside [1, n−1].
    Domain(DomainError),
    /// No recovery slot reproduced the signer's public key. Signals an
    /// arithmetic defect; a correct signer never hits this.
    NotRecovered,
}

impl fmt::Display for SignMessageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignMessageError::MessageTooLong => {
                write!(f, "message exceeds the 255-byte protocol limit")
            }
            SignMessageError::Domain(e) => write!(f, "{}", e),
            SignMessageError::NotRecovered => {
                write!(f, "signer's public key missing from its own recovery set")
            }
        }
    }
}

impl std::error::Error for SignMessageError {}

impl From<DomainError> for SignMessageError {
    fn from(e: DomainError) -> Self {
        SignMessageError::Domain(e)
    }
}

/// Why a signed message failed to parse. [`verify`] collapses all of
/// these to `false`; [`verify_inner`] surfaces them for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The signature string is not valid base64.
    InvalidBase64,
    /// The decoded signature is not exactly 65 bytes.
    InvalidLength,
    /// The flag byte is outside [27, 42].
    InvalidFlag(u8),
    /// r or s is outside [1, n−1].
    InvalidSignature,
    /// The message cannot be magic-hashed (too long).
    Message(SignMessageError),
    /// The claimed address does not parse as the flagged type.
    Address(AddressError),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use VerifyError::*;
        match self {
            InvalidBase64 => write!(f, "signature is not valid base64"),
            InvalidLength => write!(f, "signature must decode to 65 bytes"),
            InvalidFlag(flag) => write!(f, "recovery flag {} outside [27, 42]", flag),
            InvalidSignature => write!(f, "r or s outside [1, n-1]"),
            Message(e) => write!(f, "{}", e),
            Address(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for VerifyError {}

impl From<SignMessageError> for VerifyError {
    fn from(e: SignMessageError) -> Self {
        VerifyError::Message(e)
    }
}

impl From<AddressError> for VerifyError {
    fn from(e: AddressError) -> Self {
        VerifyError::Address(e)
    }
}

/// The digest the protocol actually signs:
/// `SHA256(MAGIC_PREFIX ‖ len(msg) ‖ msg)`.
///
/// The length rides in a single byte, so messages longer than 255 bytes
/// are rejected rather than silently encoded in a way no other
/// implementation would reproduce.
pub fn magic_hash(msg: &[u8]) -> Result<[u8; 32], SignMessageError> {
    if msg.len() > 255 {
        return Err(SignMessageError::MessageTooLong);
    }
    let mut hasher = Sha256::new();
    hasher.update(MAGIC_PREFIX);
    hasher.update([msg.len() as u8]);
    hasher.update(msg);
    Ok(hasher.finalize().into())
}

/// Sign a message with a secp256k1 private key, yielding the signer's
/// P2PKH address and the base64 signature.
///
/// The recovery flag is found by scanning the recovery slots for the
/// signer's own public key; a miss is [`SignMessageError::NotRecovered`]
/// and cannot happen unless the arithmetic is broken.
pub fn sign(
    msg: &[u8],
    privkey: &BigUint,
    compressed: bool,
    network: Network,
) -> Result<(String, String), SignMessageError> {
    let ec = &*SECP256K1;
    let digest = magic_hash(msg)?;
    let sig = crate::sign::<Sha256>(ec, &digest, privkey)?;

    let pubkey = ec.mult(privkey);
    let pubkey_bytes = bytes_from_point(ec, &pubkey, compressed)?;
    let addr = address::p2pkh_address(&pubkey_bytes, network);

    let key_id = crate::pubkey_recovery(ec, &digest, &sig)
        .iter()
        .position(|slot| slot.as_ref() == Some(&pubkey))
        .ok_or(SignMessageError::NotRecovered)?;

    // the 1-byte flag encodes a key_id < 4, which assumes cofactor 1
    let flag = 27 + key_id as u8 + if compressed { 4 } else { 0 };
    let mut wire = Vec::with_capacity(65);
    wire.push(flag);
    wire.extend_from_slice(&sig.to_bytes(ec).expect("r, s < n fit 32 bytes each"));
    Ok((addr, general_purpose::STANDARD.encode(wire)))
}

/// Check a base64 signature against a message and a claimed address.
/// Total: any parse failure is just `false`.
pub fn verify(msg: &[u8], addr: &str, b64sig: &str) -> bool {
    verify_inner(msg, addr, b64sig).unwrap_or(false)
}

/// The fallible core of [`verify`]: `Ok(false)` is an honest mismatch,
/// `Err` explains why the inputs never got as far as a comparison.
pub fn verify_inner(msg: &[u8], addr: &str, b64sig: &str) -> Result<bool, VerifyError> {
    let ec = &*SECP256K1;

    let wire = general_purpose::STANDARD
        .decode(b64sig)
        .map_err(|_| VerifyError::InvalidBase64)?;
    if wire.len() != 65 {
        return Err(VerifyError::InvalidLength);
    }
    let flag = wire[0];
    let (addr_type, key_id) =
        SigAddressType::from_flag(flag).ok_or(VerifyError::InvalidFlag(flag))?;
    let sig =
        Signature::from_bytes(ec, &wire[1..]).map_err(|_| VerifyError::InvalidSignature)?;

    let digest = magic_hash(msg)?;
    let slots = crate::pubkey_recovery(ec, &digest, &sig);
    let pubkey = match &slots[key_id as usize] {
        Some(point) => point,
        None => return Ok(false),
    };

    match addr_type {
        SigAddressType::P2pkhUncompressed => {
            let pk = bytes_from_point(ec, pubkey, false).expect("recovered point is on curve");
            let (h160, _) = address::h160_from_p2pkh(addr)?;
            Ok(h160 == address::hash160(&pk))
        }
        SigAddressType::P2pkhCompressed => {
            let pk = bytes_from_point(ec, pubkey, true).expect("recovered point is on curve");
            let (h160, _) = address::h160_from_p2pkh(addr)?;
            Ok(h160 == address::hash160(&pk))
        }
        SigAddressType::P2wpkhP2sh => {
            let pk = bytes_from_point(ec, pubkey, true).expect("recovered point is on curve");
            let script = address::witness_script(&address::hash160(&pk));
            let (h160, _) = address::h160_from_p2sh(addr)?;
            Ok(h160 == address::hash160(&script))
        }
        SigAddressType::P2wpkh => {
            let pk = bytes_from_point(ec, pubkey, true).expect("recovered point is on curve");
            let (program, _) = address::witness_from_bech32(addr)?;
            Ok(program == address::hash160(&pk))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn magic_hash_is_length_prefixed() {
        let h1 = magic_hash(b"a").unwrap();
        let h2 = magic_hash(b"b").unwrap();
        assert_ne!(h1, h2);

        // boundary: 255 bytes is fine, 256 is not
        assert!(magic_hash(&[0x61; 255]).is_ok());
        assert_eq!(
            magic_hash(&[0x61; 256]),
            Err(SignMessageError::MessageTooLong)
        );
    }

    #[test]
    fn flag_table() {
        assert_eq!(
            SigAddressType::from_flag(27),
            Some((SigAddressType::P2pkhUncompressed, 0))
        );
        assert_eq!(
            SigAddressType::from_flag(34),
            Some((SigAddressType::P2pkhCompressed, 3))
        );
        assert_eq!(
            SigAddressType::from_flag(35),
            Some((SigAddressType::P2wpkhP2sh, 0))
        );
        assert_eq!(SigAddressType::from_flag(42), Some((SigAddressType::P2wpkh, 3)));
        assert_eq!(SigAddressType::from_flag(26), None);
        assert_eq!(SigAddressType::from_flag(43), None);
        assert_eq!(SigAddressType::from_flag(0), None);
    }
}
