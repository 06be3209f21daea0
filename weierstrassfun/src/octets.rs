//! Byte-string utilities: hex conversion and fixed-width big-endian integers.
use crate::errors::FormatError;
use num_bigint::BigUint;

#[doc(hidden)]
pub fn hex_val(c: u8) -> Result<u8, FormatError> {
    match c {
        b'A'..=b'F' => Ok(c - b'A' + 10),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'0'..=b'9' => Ok(c - b'0'),
        _ => Err(FormatError::InvalidHex),
    }
}

/// Decode a hex string into a `Vec<u8>`.
///
/// # Examples
/// ```
/// use weierstrassfun::octets;
/// let gx = octets::bytes_from_hex("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
/// assert_eq!(gx.len(), 32);
/// ```
pub fn bytes_from_hex(hex: &str) -> Result<Vec<u8>, FormatError> {
    if (hex.len() % 2) != 0 {
        return Err(FormatError::InvalidHex);
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for hex_byte in hex.as_bytes().chunks(2) {
        bytes.push(hex_val(hex_byte[0])? << 4 | hex_val(hex_byte[1])?)
    }
    Ok(bytes)
}

/// Encode some bytes as a hex `String`.
pub fn hex_from_bytes(bytes: &[u8]) -> String {
    use core::fmt::Write;
    let mut hex = String::new();
    for byte in bytes {
        write!(hex, "{:02x}", byte).expect("writing to a String")
    }
    hex
}

/// Parse a hex string as an unsigned big-endian integer.
pub fn uint_from_hex(hex: &str) -> Result<BigUint, FormatError> {
    if hex.is_empty() {
        return Err(FormatError::InvalidHex);
    }
    BigUint::parse_bytes(hex.as_bytes(), 16).ok_or(FormatError::InvalidHex)
}

/// Serialize an unsigned integer as exactly `width` big-endian bytes,
/// left-padded with zeros. Fails with [`FormatError::InvalidLength`] when
/// the value does not fit.
pub fn uint_to_be_bytes(n: &BigUint, width: usize) -> Result<Vec<u8>, FormatError> {
    let raw = n.to_bytes_be();
    if raw.len() > width {
        return Err(FormatError::InvalidLength);
    }
    let mut out = vec![0u8; width - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Read an unsigned big-endian integer from bytes. Leading zeros are fine.
pub fn uint_from_be_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
