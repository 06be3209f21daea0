//! Bitcoin address derivation and decoding: hash160, base58check,
//! P2PKH / P2WPKH-P2SH / P2WPKH (bech32 segwit v0).

use bech32::{segwit, Fe32, Hrp};
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// The Bitcoin networks this crate can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// base58check version byte for P2PKH addresses.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    /// base58check version byte for P2SH addresses.
    pub fn p2sh_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet => 0xc4,
        }
    }

    /// bech32 human-readable part for native segwit addresses.
    pub fn hrp(self) -> Hrp {
        match self {
            Network::Mainnet => bech32::hrp::BC,
            Network::Testnet => bech32::hrp::TB,
        }
    }

    fn from_p2pkh_version(version: u8) -> Option<Network> {
        match version {
            0x00 => Some(Network::Mainnet),
            0x6f => Some(Network::Testnet),
            _ => None,
        }
    }

    fn from_p2sh_version(version: u8) -> Option<Network> {
        match version {
            0x05 => Some(Network::Mainnet),
            0xc4 => Some(Network::Testnet),
            _ => None,
        }
    }

    fn from_hrp(hrp: Hrp) -> Option<Network> {
        if hrp == bech32::hrp::BC {
            Some(Network::Mainnet)
        } else if hrp == bech32::hrp::TB {
            Some(Network::Testnet)
        } else {
            None
        }
    }
}

/// Failure while encoding or decoding an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A character outside the base58 alphabet.
    InvalidCharacter,
    /// The double-SHA256 checksum does not match.
    InvalidChecksum,
    /// Decoded payload has the wrong length for the address type.
    InvalidLength,
    /// Version byte or human-readable part names no known network.
    UnknownNetwork,
    /// Not a well-formed bech32 segwit address.
    InvalidBech32,
    /// Witness version other than 0.
    UnsupportedWitnessVersion,
    /// Segwit addresses commit to a compressed (33-byte) public key.
    NotCompressed,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AddressError::*;
        match self {
            InvalidCharacter => write!(f, "character outside the base58 alphabet"),
            InvalidChecksum => write!(f, "base58check checksum mismatch"),
            InvalidLength => write!(f, "payload has the wrong length"),
            UnknownNetwork => write!(f, "unknown network prefix"),
            InvalidBech32 => write!(f, "malformed bech32 segwit address"),
            UnsupportedWitnessVersion => write!(f, "only witness version 0 is supported"),
            NotCompressed => write!(f, "segwit requires a compressed public key"),
        }
    }
}

impl std::error::Error for AddressError {}

/// RIPEMD160(SHA256(data)), the 20-byte key/script identity.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

fn sha256d_checksum(data: &[u8]) -> [u8; 4] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&digest[..4]);
    checksum
}

const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn base58_index(c: u8) -> Option<u32> {
    BASE58_ALPHABET.iter().position(|&a| a == c).map(|i| i as u32)
}

/// base58check: version ‖ payload ‖ first 4 bytes of sha256d, rendered
/// in the 58-character alphabet with leading zero bytes as '1's.
pub fn base58check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256d_checksum(&data);
    data.extend_from_slice(&checksum);

    let zeros = data.iter().take_while(|&&b| b == 0).count();
    let mut num = BigUint::from_bytes_be(&data);
    let mut digits = Vec::new();
    while !num.is_zero() {
        let rem = (&num % 58u32).to_u32_digits().first().copied().unwrap_or(0);
        digits.push(BASE58_ALPHABET[rem as usize]);
        num /= 58u32;
    }
    digits.extend(core::iter::repeat_n(b'1', zeros));
    digits.reverse();
    String::from_utf8(digits).expect("alphabet is ASCII")
}

/// Inverse of [`base58check_encode`]: returns the version byte and the
/// payload after verifying the checksum.
pub fn base58check_decode(s: &str) -> Result<(u8, Vec<u8>), AddressError> {
    let mut num = BigUint::zero();
    for c in s.bytes() {
        let v = base58_index(c).ok_or(AddressError::InvalidCharacter)?;
        num = num * 58u32 + v;
    }
    let zeros = s.bytes().take_while(|&b| b == b'1').count();
    let mut data = vec![0u8; zeros];
    if !num.is_zero() {
        data.extend_from_slice(&num.to_bytes_be());
    }
    if data.len() < 5 {
        return Err(AddressError::InvalidLength);
    }
    let (body, checksum) = data.split_at(data.len() - 4);
    if sha256d_checksum(body) != checksum {
        return Err(AddressError::InvalidChecksum);
    }
    Ok((body[0], body[1..].to_vec()))
}

// OP_0 PUSH20 h160: the v0 witness program as a script
pub(crate) fn witness_script(h160: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(22);
    script.push(0x00);
    script.push(0x14);
    script.extend_from_slice(h160);
    script
}

/// Legacy pay-to-pubkey-hash address for a SEC 1 encoded public key,
/// compressed or uncompressed.
pub fn p2pkh_address(pubkey: &[u8], network: Network) -> String {
    base58check_encode(network.p2pkh_version(), &hash160(pubkey))
}

/// Segwit-in-P2SH address. Requires the compressed public key.
pub fn p2wpkh_p2sh_address(pubkey: &[u8], network: Network) -> Result<String, AddressError> {
    if pubkey.len() != 33 {
        return Err(AddressError::NotCompressed);
    }
    let script = witness_script(&hash160(pubkey));
    Ok(base58check_encode(network.p2sh_version(), &hash160(&script)))
}

/// Native segwit v0 (bech32) address. Requires the compressed public key.
pub fn p2wpkh_address(pubkey: &[u8], network: Network) -> Result<String, AddressError> {
    if pubkey.len() != 33 {
        return Err(AddressError::NotCompressed);
    }
    segwit::encode_v0(network.hrp(), &hash160(pubkey)).map_err(|_| AddressError::InvalidLength)
}

/// The hash160 payload of a P2PKH address, plus which network it names.
pub fn h160_from_p2pkh(addr: &str) -> Result<([u8; 20], Network), AddressError> {
    let (version, payload) = base58check_decode(addr)?;
    let network = Network::from_p2pkh_version(version).ok_or(AddressError::UnknownNetwork)?;
    let h160: [u8; 20] = payload.try_into().map_err(|_| AddressError::InvalidLength)?;
    Ok((h160, network))
}

/// The hash160 payload of a P2SH address, plus which network it names.
pub fn h160_from_p2sh(addr: &str) -> Result<([u8; 20], Network), AddressError> {
    let (version, payload) = base58check_decode(addr)?;
    let network = Network::from_p2sh_version(version).ok_or(AddressError::UnknownNetwork)?;
    let h160: [u8; 20] = payload.try_into().map_err(|_| AddressError::InvalidLength)?;
    Ok((h160, network))
}

/// The 20-byte witness program of a native segwit v0 address, plus which
/// network it names. Anything other than version 0 with a 20-byte program
/// is rejected.
pub fn witness_from_bech32(addr: &str) -> Result<([u8; 20], Network), AddressError> {
    let (hrp, version, program) =
        segwit::decode(addr).map_err(|_| AddressError::InvalidBech32)?;
    if version != Fe32::Q {
        return Err(AddressError::UnsupportedWitnessVersion);
    }
    let network = Network::from_hrp(hrp).ok_or(AddressError::UnknownNetwork)?;
    let program: [u8; 20] = program.try_into().map_err(|_| AddressError::InvalidLength)?;
    Ok((program, network))
}
