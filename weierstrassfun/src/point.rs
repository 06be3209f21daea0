//! Affine points and their SEC 1 byte encodings.

use crate::{
    curve::Curve,
    errors::{DecodeError, DomainError, FormatError},
    octets,
};
use num_bigint::BigUint;
use num_integer::Integer;

/// A point in a curve's affine coordinate space.
///
/// Either a finite pair `(x, y)` with both coordinates in `[0, p−1]`, or
/// the distinguished point at infinity (the group identity). A finite
/// point produced by this crate always satisfies `y² = x³ + ax + b (mod p)`;
/// hand-built points can be checked with [`Curve::is_on_curve`].
///
/// Points are plain values: cheap to clone, never mutated after
/// construction, and tied to a curve only by context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Point {
    /// A finite point with both coordinates reduced modulo p.
    Affine {
        /// x coordinate in [0, p−1].
        x: BigUint,
        /// y coordinate in [0, p−1].
        y: BigUint,
    },
    /// The point at infinity.
    Infinity,
}

impl Point {
    /// A finite point from its coordinates.
    pub fn affine(x: BigUint, y: BigUint) -> Self {
        Point::Affine { x, y }
    }

    /// Is this the point at infinity?
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// The x coordinate of a finite point.
    pub fn x(&self) -> Option<&BigUint> {
        match self {
            Point::Affine { x, .. } => Some(x),
            Point::Infinity => None,
        }
    }

    /// The y coordinate of a finite point.
    pub fn y(&self) -> Option<&BigUint> {
        match self {
            Point::Affine { y, .. } => Some(y),
            Point::Infinity => None,
        }
    }
}

/// Serialize a point in the SEC 1 encoding: `02/03 ‖ x` (compressed,
/// prefix picks the even or odd root) or `04 ‖ x ‖ y` (uncompressed),
/// with coordinates as fixed-width big-endian integers.
///
/// The point at infinity has no encoding
/// ([`DomainError::InfinityHasNoEncoding`]); off-curve input is refused.
pub fn bytes_from_point(
    ec: &Curve,
    point: &Point,
    compressed: bool,
) -> Result<Vec<u8>, DomainError> {
    let (x, y) = match point {
        Point::Infinity => return Err(DomainError::InfinityHasNoEncoding),
        Point::Affine { x, y } => (x, y),
    };
    if !ec.is_on_curve(point)? {
        return Err(DomainError::PointNotOnCurve);
    }

    let psize = ec.psize();
    let x_bytes = octets::uint_to_be_bytes(x, psize).expect("x < p fits in psize bytes");
    if compressed {
        let mut out = Vec::with_capacity(1 + psize);
        out.push(if y.is_odd() { 0x03 } else { 0x02 });
        out.extend_from_slice(&x_bytes);
        Ok(out)
    } else {
        let y_bytes = octets::uint_to_be_bytes(y, psize).expect("y < p fits in psize bytes");
        let mut out = Vec::with_capacity(1 + 2 * psize);
        out.push(0x04);
        out.extend_from_slice(&x_bytes);
        out.extend_from_slice(&y_bytes);
        Ok(out)
    }
}

/// Parse a SEC 1 encoded point, dispatching on the prefix byte and total
/// length. Compressed input recomputes y from the curve equation and picks
/// the root matching the prefix parity; the result is checked to lie on
/// the curve.
pub fn point_from_bytes(ec: &Curve, bytes: &[u8]) -> Result<Point, DecodeError> {
    let psize = ec.psize();

    if bytes.len() == 1 + psize {
        let parity_odd = match bytes[0] {
            0x02 => false,
            0x03 => true,
            _ => return Err(FormatError::InvalidPrefix.into()),
        };
        let x = octets::uint_from_be_bytes(&bytes[1..]);
        if x >= *ec.p() {
            return Err(DomainError::CoordinateOutOfRange.into());
        }
        let y = ec.y_odd(&x, parity_odd)?;
        return Ok(Point::affine(x, y));
    }

    if bytes.len() == 1 + 2 * psize {
        if bytes[0] != 0x04 {
            return Err(FormatError::InvalidPrefix.into());
        }
        let x = octets::uint_from_be_bytes(&bytes[1..1 + psize]);
        let y = octets::uint_from_be_bytes(&bytes[1 + psize..]);
        let point = Point::affine(x, y);
        if !ec.is_on_curve(&point)? {
            return Err(FormatError::InvalidEncoding.into());
        }
        return Ok(point);
    }

    Err(FormatError::InvalidLength.into())
}

/// [`point_from_bytes`] over a hex string.
pub fn point_from_hex(ec: &Curve, hex: &str) -> Result<Point, DecodeError> {
    let bytes = octets::bytes_from_hex(hex)?;
    point_from_bytes(ec, &bytes)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curves;

    #[test]
    fn roundtrip_both_encodings_all_curves() {
        for ec in curves::all_curves() {
            // an arbitrary finite point
            let q = ec.mult(&(ec.p() % ec.n()));
            let q = if q.is_infinity() { ec.g().clone() } else { q };

            for compressed in [true, false] {
                let bytes = bytes_from_point(ec, &q, compressed).unwrap();
                let expected_len = if compressed { 1 + ec.psize() } else { 1 + 2 * ec.psize() };
                assert_eq!(bytes.len(), expected_len);
                assert_eq!(point_from_bytes(ec, &bytes).unwrap(), q);

                let hex = octets::hex_from_bytes(&bytes);
                assert_eq!(point_from_hex(ec, &hex).unwrap(), q);
            }
        }
    }

    #[test]
    fn compressed_prefix_tracks_parity() {
        let ec = &*curves::SECP256K1;
        let g_bytes = bytes_from_point(ec, ec.g(), true).unwrap();
        // Gy is even
        assert_eq!(g_bytes[0], 0x02);
        let minus_g = ec.opposite(ec.g());
        let mg_bytes = bytes_from_point(ec, &minus_g, true).unwrap();
        assert_eq!(mg_bytes[0], 0x03);
        assert_eq!(g_bytes[1..], mg_bytes[1..]);
    }

    #[test]
    fn infinity_has_no_encoding() {
        let ec = &*curves::SECP256K1;
        assert_eq!(
            bytes_from_point(ec, &Point::Infinity, true),
            Err(DomainError::InfinityHasNoEncoding)
        );
        assert_eq!(
            bytes_from_point(ec, &Point::Infinity, false),
            Err(DomainError::InfinityHasNoEncoding)
        );
    }

    #[test]
    fn known_generator_encoding() {
        let ec = &*curves::SECP256K1;
        let g = point_from_hex(
            ec,
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        )
        .unwrap();
        assert_eq!(&g, ec.g());

        let g_unc = point_from_hex(
            ec,
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        )
        .unwrap();
        assert_eq!(&g_unc, ec.g());
    }

    #[test]
    fn malformed_encodings_are_rejected() {
        for ec in curves::all_curves() {
            // right length, unknown prefix
            let bad_prefix = vec![0x01; ec.psize() + 1];
            assert_eq!(
                point_from_bytes(ec, &bad_prefix),
                Err(DecodeError::Format(FormatError::InvalidPrefix))
            );
            // neither compressed nor uncompressed length
            let bad_len = vec![0x02; ec.psize() + 2];
            assert_eq!(
                point_from_bytes(ec, &bad_len),
                Err(DecodeError::Format(FormatError::InvalidLength))
            );
            // uncompressed length with a compressed prefix
            let bad_unc = vec![0x02; 2 * ec.psize() + 1];
            assert_eq!(
                point_from_bytes(ec, &bad_unc),
                Err(DecodeError::Format(FormatError::InvalidPrefix))
            );
        }
    }

    #[test]
    fn x_without_square_root_is_a_domain_error() {
        let ec = &*curves::SECP256K1;
        // x³ + 7 is a non-residue for this x
        let x_hex = "eefdea4cdb677750a420fee807eacf21eb9898ae79b9768766e4faa04a2d4a34";
        let err = point_from_hex(ec, &format!("03{}", x_hex)).unwrap_err();
        assert_eq!(err, DecodeError::Domain(DomainError::NonResidue));

        // same x with a bogus y in uncompressed form
        let err = point_from_hex(ec, &format!("04{}{}", x_hex, x_hex)).unwrap_err();
        assert_eq!(err, DecodeError::Format(FormatError::InvalidEncoding));
    }
}
