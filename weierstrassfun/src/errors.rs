//! Error types shared across the crate.
use core::fmt;

/// A hard defect in a set of curve parameters, detected at construction.
///
/// A [`Curve`] that would violate any of its invariants is never built;
/// every constructor returns one of these variants instead.
///
/// [`Curve`]: crate::Curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field modulus p is even.
    ModulusNotOdd,
    /// The field modulus p is composite.
    ModulusNotPrime,
    /// A curve coefficient is not reduced into [0, p−1].
    CoefficientOutOfRange,
    /// 4a³ + 27b² ≡ 0 (mod p); the Weierstrass equation is singular.
    SingularCurve,
    /// The generator does not satisfy the curve equation.
    GeneratorNotOnCurve,
    /// The subgroup order n is composite (or < 2).
    OrderNotPrime,
    /// h·n falls outside the Hasse interval around p + 1.
    CofactorInconsistent,
    /// n·G ≠ ∞, so n is not the order of the generator's subgroup.
    WrongSubgroupOrder,
    /// Exhaustive point counting found a group order different from h·n.
    WrongGroupOrder,
    /// The declared security level is not in [1, bits(p)/2].
    SecurityBitsOutOfRange,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ValidationError::*;
        match self {
            ModulusNotOdd => write!(f, "field modulus must be an odd prime"),
            ModulusNotPrime => write!(f, "field modulus is not prime"),
            CoefficientOutOfRange => write!(f, "curve coefficient not reduced modulo p"),
            SingularCurve => write!(f, "zero discriminant: 4a^3 + 27b^2 = 0 mod p"),
            GeneratorNotOnCurve => write!(f, "generator is not on the curve"),
            OrderNotPrime => write!(f, "subgroup order n is not prime"),
            CofactorInconsistent => write!(f, "h*n is outside the Hasse interval"),
            WrongSubgroupOrder => write!(f, "n*G is not the point at infinity"),
            WrongGroupOrder => write!(f, "h*n does not match the exhaustive point count"),
            SecurityBitsOutOfRange => write!(f, "security bits not in [1, bits(p)/2]"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A curve validated fine but is weaker than the strength a caller asked for.
///
/// Unlike [`ValidationError`] this is not fatal: the curve exists and works,
/// it just should not be trusted for the requested security level. Returned
/// by [`Curve::require_security`].
///
/// [`Curve::require_security`]: crate::Curve::require_security
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityWarning {
    /// The strength the caller asked for, in bits.
    pub required: u32,
    /// The strength the curve declares, in bits.
    pub available: u32,
}

impl fmt::Display for SecurityWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "curve provides {}-bit security but {} bits were required",
            self.available, self.required
        )
    }
}

impl std::error::Error for SecurityWarning {}

/// Input that is outside the mathematical domain of a pure operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The element shares a factor with the modulus and has no inverse.
    NotInvertible,
    /// The element is not a quadratic residue; no square root exists.
    NonResidue,
    /// A point coordinate is not reduced into [0, p−1].
    CoordinateOutOfRange,
    /// A scalar (private key or nonce) is not in [1, n−1].
    ScalarOutOfRange,
    /// Residue-based y disambiguation needs p ≡ 3 (mod 4).
    ResidueDisambiguationUnavailable,
    /// The point at infinity has no byte encoding.
    InfinityHasNoEncoding,
    /// The coordinates do not satisfy the curve equation.
    PointNotOnCurve,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use DomainError::*;
        match self {
            NotInvertible => write!(f, "element is not invertible modulo m"),
            NonResidue => write!(f, "element is not a quadratic residue"),
            CoordinateOutOfRange => write!(f, "coordinate not in [0, p-1]"),
            ScalarOutOfRange => write!(f, "scalar not in [1, n-1]"),
            ResidueDisambiguationUnavailable => {
                write!(f, "quadratic residue disambiguation requires p = 3 mod 4")
            }
            InfinityHasNoEncoding => write!(f, "the point at infinity cannot be encoded"),
            PointNotOnCurve => write!(f, "point does not satisfy the curve equation"),
        }
    }
}

impl std::error::Error for DomainError {}

/// Error representing malformed bytes or hex for the target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The string was not a valid hex string.
    InvalidHex,
    /// The input was not the right length for the target type.
    InvalidLength,
    /// The leading byte did not announce a known encoding.
    InvalidPrefix,
    /// The bytes did not encode a valid value for the target type.
    InvalidEncoding,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use FormatError::*;
        match self {
            InvalidHex => write!(f, "invalid hex string"),
            InvalidLength => write!(f, "input had an invalid length"),
            InvalidPrefix => write!(f, "unknown encoding prefix byte"),
            InvalidEncoding => write!(f, "bytes did not encode the expected type"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Failure while decoding a point: either the framing was wrong
/// ([`FormatError`]) or the framed coordinates were mathematically
/// impossible ([`DomainError`], e.g. an x with no square root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Malformed framing: length, prefix or hex.
    Format(FormatError),
    /// Well-framed but out-of-domain coordinates.
    Domain(DomainError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Format(e) => write!(f, "{}", e),
            DecodeError::Domain(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<FormatError> for DecodeError {
    fn from(e: FormatError) -> Self {
        DecodeError::Format(e)
    }
}

impl From<DomainError> for DecodeError {
    fn from(e: DomainError) -> Self {
        DecodeError::Domain(e)
    }
}
