//! Short-Weierstrass elliptic curve arithmetic over arbitrary prime
//! fields, built on [`num_bigint`].
//!
//! The crate is organized around one central type, [`Curve`]: validated
//! domain parameters bundled with the group law. Everything a curve can
//! do — point addition, scalar multiplication, y-coordinate recovery,
//! SEC 1 point codecs — hangs off it or takes it as the first argument.
//!
//! ```
//! use weierstrassfun::{curves::SECP256K1, Point};
//! use num_bigint::BigUint;
//!
//! let ec = &*SECP256K1;
//! let q = ec.mult(&BigUint::from(3u32));
//! assert_eq!(q, ec.add(ec.g(), &ec.mult(&BigUint::from(2u32))));
//! assert!(ec.is_on_curve(&q).unwrap());
//! assert!(ec.mult(ec.n()).is_infinity());
//! ```
//!
//! The arithmetic here is variable-time. It is meant for protocol work,
//! interop and testing where the scalar is not a long-lived secret, or
//! where the caller accepts timing leakage; see the README.

pub mod curve;
pub mod curves;
pub mod errors;
pub mod numbertheory;
pub mod octets;
pub mod point;

pub use curve::{Curve, CurveParams};
pub use errors::{DecodeError, DomainError, FormatError, SecurityWarning, ValidationError};
pub use point::{bytes_from_point, point_from_bytes, point_from_hex, Point};

/// Re-export of the RNG traits our APIs are generic over.
pub use rand_core;

#[doc(hidden)]
/// How hard randomized tests try before concluding soundness.
pub const TEST_SOUNDNESS: usize = 20;
