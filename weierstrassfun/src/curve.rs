//! Validated short-Weierstrass curves and their group law.
//!
//! A [`Curve`] is an immutable bundle of domain parameters that has passed
//! every construction-time invariant; once built it is safe to share
//! freely across threads. All arithmetic routes through Jacobian
//! coordinates internally so chained additions and doublings cost no
//! field inversions; the Jacobian representation never crosses this
//! module's boundary.

use crate::{
    errors::{DomainError, FormatError, SecurityWarning, ValidationError},
    numbertheory::{is_prime, legendre_symbol, mod_inverse, mod_sqrt},
    octets,
    point::Point,
};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::RngCore;

/// Raw, unvalidated domain parameters for a short-Weierstrass curve
/// `y² = x³ + ax + b` over the prime field F_p.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParams {
    /// Field modulus.
    pub p: BigUint,
    /// Coefficient of the linear term.
    pub a: BigUint,
    /// Constant coefficient.
    pub b: BigUint,
    /// Generator x coordinate.
    pub gx: BigUint,
    /// Generator y coordinate.
    pub gy: BigUint,
    /// Order of the generator's subgroup.
    pub n: BigUint,
    /// Cofactor: (group order) / n.
    pub h: u32,
    /// Declared security level in bits.
    pub sec_bits: u32,
}

impl CurveParams {
    /// Parameters from big-endian hex strings, as they appear in the
    /// SEC 2 / NIST parameter listings.
    pub fn from_hex(
        p: &str,
        a: &str,
        b: &str,
        gx: &str,
        gy: &str,
        n: &str,
        h: u32,
        sec_bits: u32,
    ) -> Result<Self, FormatError> {
        Ok(CurveParams {
            p: octets::uint_from_hex(p)?,
            a: octets::uint_from_hex(a)?,
            b: octets::uint_from_hex(b)?,
            gx: octets::uint_from_hex(gx)?,
            gy: octets::uint_from_hex(gy)?,
            n: octets::uint_from_hex(n)?,
            h,
            sec_bits,
        })
    }

    /// Small parameters, convenient for the low-cardinality test curves.
    pub fn from_u64(p: u64, a: u64, b: u64, gx: u64, gy: u64, n: u64, h: u32, sec_bits: u32) -> Self {
        CurveParams {
            p: BigUint::from(p),
            a: BigUint::from(a),
            b: BigUint::from(b),
            gx: BigUint::from(gx),
            gy: BigUint::from(gy),
            n: BigUint::from(n),
            h,
            sec_bits,
        }
    }
}

/// A point in Jacobian projective coordinates: `(X, Y, Z)` stands for the
/// affine point `(X/Z², Y/Z³)`, with `Z = 0` marking infinity. Internal to
/// this module; conversion happens only at the API boundary.
#[derive(Debug, Clone)]
pub(crate) struct JacobianPoint {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

/// A validated short-Weierstrass curve over a prime field.
///
/// Constructing a `Curve` runs every hard parameter invariant; see
/// [`Curve::new`]. The struct is immutable afterwards — every group
/// operation takes `&self` and allocates its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    p: BigUint,
    a: BigUint,
    b: BigUint,
    g: Point,
    n: BigUint,
    h: u32,
    sec_bits: u32,
    psize: usize,
    nsize: usize,
}

/// Fields at most this wide get their group order verified by exhaustive
/// point counting during validation.
const EXHAUSTIVE_COUNT_MAX_BITS: u64 = 16;

impl Curve {
    /// Validate domain parameters and build the curve.
    ///
    /// Hard invariants, each with its own [`ValidationError`] variant:
    /// p odd prime; a, b reduced mod p; non-zero discriminant; G on the
    /// curve; n prime; h·n inside the Hasse interval around p+1;
    /// n·G = ∞; declared security in [1, bits(p)/2]. For tiny fields
    /// (≤ 16-bit p) the group order is additionally counted exhaustively
    /// and compared against h·n.
    pub fn new(params: CurveParams) -> Result<Self, ValidationError> {
        let CurveParams { p, a, b, gx, gy, n, h, sec_bits } = params;

        if p.is_even() {
            return Err(ValidationError::ModulusNotOdd);
        }
        if !is_prime(&p) {
            return Err(ValidationError::ModulusNotPrime);
        }
        if a >= p || b >= p {
            return Err(ValidationError::CoefficientOutOfRange);
        }

        // 4a³ + 27b² ≠ 0 (mod p)
        let discriminant =
            (BigUint::from(4u32) * &a * &a * &a + BigUint::from(27u32) * &b * &b) % &p;
        if discriminant.is_zero() {
            return Err(ValidationError::SingularCurve);
        }

        if gx >= p || gy >= p {
            return Err(ValidationError::GeneratorNotOnCurve);
        }
        let lhs = (&gy * &gy) % &p;
        let rhs = ((&gx * &gx * &gx) + &a * &gx + &b) % &p;
        if lhs != rhs {
            return Err(ValidationError::GeneratorNotOnCurve);
        }

        if !is_prime(&n) {
            return Err(ValidationError::OrderNotPrime);
        }

        // |h·n − (p+1)|² ≤ 4p, squared to sidestep integer sqrt rounding
        if h < 1 {
            return Err(ValidationError::CofactorInconsistent);
        }
        let hn = BigUint::from(h) * &n;
        let p_plus_1 = &p + 1u32;
        let gap = if hn >= p_plus_1 { &hn - &p_plus_1 } else { &p_plus_1 - &hn };
        if &gap * &gap > BigUint::from(4u32) * &p {
            return Err(ValidationError::CofactorInconsistent);
        }

        let pbits = p.bits() as u32;
        if sec_bits < 1 || sec_bits > pbits / 2 {
            return Err(ValidationError::SecurityBitsOutOfRange);
        }

        let ec = Curve {
            psize: ((p.bits() + 7) / 8) as usize,
            nsize: ((n.bits() + 7) / 8) as usize,
            g: Point::affine(gx, gy),
            p,
            a,
            b,
            n,
            h,
            sec_bits,
        };

        if !ec.mult(&ec.n).is_infinity() {
            return Err(ValidationError::WrongSubgroupOrder);
        }

        if ec.p.bits() <= EXHAUSTIVE_COUNT_MAX_BITS && ec.count_points() != hn {
            return Err(ValidationError::WrongGroupOrder);
        }

        Ok(ec)
    }

    // Exact group order by scanning every x. Only for tiny fields.
    fn count_points(&self) -> BigUint {
        let p = self.p.to_u64().expect("p fits u64 below the exhaustive bound");
        let a = self.a.to_u64().expect("a < p");
        let b = self.b.to_u64().expect("b < p");
        let mut order = 1u64; // the point at infinity
        for x in 0..p {
            let rhs = (x * x % p * x + a * x + b) % p;
            // 2 points for a residue, 1 for rhs = 0, none otherwise
            order += (1 + legendre_symbol(&BigUint::from(rhs), &self.p)) as u64;
        }
        BigUint::from(order)
    }

    /// Check the curve against a caller-requested strength. A shortfall
    /// is reported as a non-fatal [`SecurityWarning`]; the curve remains
    /// perfectly usable for testing or legacy interop.
    pub fn require_security(&self, required_bits: u32) -> Result<(), SecurityWarning> {
        if required_bits > self.sec_bits {
            return Err(SecurityWarning { required: required_bits, available: self.sec_bits });
        }
        Ok(())
    }

    /// Field modulus.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Coefficient a.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Coefficient b.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// The generator.
    pub fn g(&self) -> &Point {
        &self.g
    }

    /// Subgroup order.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Cofactor.
    pub fn h(&self) -> u32 {
        self.h
    }

    /// Declared security level in bits.
    pub fn sec_bits(&self) -> u32 {
        self.sec_bits
    }

    /// Width of a serialized field element in bytes.
    pub fn psize(&self) -> usize {
        self.psize
    }

    /// Width of a serialized scalar in bytes.
    pub fn nsize(&self) -> usize {
        self.nsize
    }

    // ---- field helpers: operands and results always reduced mod p ----

    fn fadd(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let s = a + b;
        if s >= self.p { s - &self.p } else { s }
    }

    fn fsub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b { a - b } else { &self.p - (b - a) }
    }

    fn fmul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    // x³ + ax + b mod p for a reduced x
    fn y2(&self, x: &BigUint) -> BigUint {
        ((x * x % &self.p) * x + &self.a * x + &self.b) % &self.p
    }

    /// Does the point satisfy the curve equation? `Ok(false)` for a
    /// well-formed point that simply is not on the curve; a
    /// [`DomainError`] only for coordinates outside `[0, p−1]`. The
    /// point at infinity is the group identity and counts as on-curve.
    pub fn is_on_curve(&self, point: &Point) -> Result<bool, DomainError> {
        match point {
            Point::Infinity => Ok(true),
            Point::Affine { x, y } => {
                if *x >= self.p || *y >= self.p {
                    return Err(DomainError::CoordinateOutOfRange);
                }
                Ok((y * y) % &self.p == self.y2(x))
            }
        }
    }

    /// The group inverse: `(x, p−y)` for finite points, infinity for
    /// infinity. Involutive.
    pub fn opposite(&self, point: &Point) -> Point {
        match point {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => {
                let neg_y = if y.is_zero() { BigUint::zero() } else { &self.p - y };
                Point::affine(x.clone(), neg_y)
            }
        }
    }

    // ---- affine group law (reference path) ----

    /// Group addition straight from the chord-and-tangent formulas, one
    /// field inversion per call. [`Curve::add`] is the inversion-free
    /// production path; this one stays around as the readable reference
    /// the Jacobian path is tested against.
    pub fn add_affine(&self, p1: &Point, p2: &Point) -> Point {
        let (x1, y1) = match p1 {
            Point::Infinity => return p2.clone(),
            Point::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match p2 {
            Point::Infinity => return p1.clone(),
            Point::Affine { x, y } => (x, y),
        };

        let lambda = if x1 == x2 {
            if self.fadd(y1, y2).is_zero() {
                // opposite points, or doubling a 2-torsion point
                return Point::Infinity;
            }
            // tangent: (3x² + a) / 2y
            let num = self.fadd(&self.fmul(&BigUint::from(3u32), &self.fmul(x1, x1)), &self.a);
            let den = self.fmul(&BigUint::from(2u32), y1);
            let den_inv = mod_inverse(&den, &self.p).expect("2y ≠ 0 mod prime p");
            self.fmul(&num, &den_inv)
        } else {
            // chord: (y2 − y1) / (x2 − x1)
            let num = self.fsub(y2, y1);
            let den = self.fsub(x2, x1);
            let den_inv = mod_inverse(&den, &self.p).expect("x2 ≠ x1 mod prime p");
            self.fmul(&num, &den_inv)
        };

        let x3 = self.fsub(&self.fsub(&self.fmul(&lambda, &lambda), x1), x2);
        let y3 = self.fsub(&self.fmul(&lambda, &self.fsub(x1, &x3)), y1);
        Point::affine(x3, y3)
    }

    // ---- Jacobian group law (production path) ----

    pub(crate) fn jac_from_aff(&self, point: &Point) -> JacobianPoint {
        match point {
            Point::Infinity => JacobianPoint {
                x: BigUint::one(),
                y: BigUint::one(),
                z: BigUint::zero(),
            },
            Point::Affine { x, y } => JacobianPoint {
                x: x.clone(),
                y: y.clone(),
                z: BigUint::one(),
            },
        }
    }

    pub(crate) fn aff_from_jac(&self, point: &JacobianPoint) -> Point {
        if point.z.is_zero() {
            return Point::Infinity;
        }
        let z_inv = mod_inverse(&point.z, &self.p).expect("z ≠ 0 mod prime p");
        let z_inv2 = self.fmul(&z_inv, &z_inv);
        let x = self.fmul(&point.x, &z_inv2);
        let y = self.fmul(&point.y, &self.fmul(&z_inv2, &z_inv));
        Point::affine(x, y)
    }

    pub(crate) fn double_jacobian(&self, p1: &JacobianPoint) -> JacobianPoint {
        if p1.z.is_zero() || p1.y.is_zero() {
            return self.jac_from_aff(&Point::Infinity);
        }
        let ysq = self.fmul(&p1.y, &p1.y);
        let s = self.fmul(&BigUint::from(4u32), &self.fmul(&p1.x, &ysq));
        let zsq = self.fmul(&p1.z, &p1.z);
        let m = self.fadd(
            &self.fmul(&BigUint::from(3u32), &self.fmul(&p1.x, &p1.x)),
            &self.fmul(&self.a, &self.fmul(&zsq, &zsq)),
        );
        let x3 = self.fsub(&self.fmul(&m, &m), &self.fadd(&s, &s));
        let y3 = self.fsub(
            &self.fmul(&m, &self.fsub(&s, &x3)),
            &self.fmul(&BigUint::from(8u32), &self.fmul(&ysq, &ysq)),
        );
        let z3 = self.fmul(&BigUint::from(2u32), &self.fmul(&p1.y, &p1.z));
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    pub(crate) fn add_jacobian(&self, p1: &JacobianPoint, p2: &JacobianPoint) -> JacobianPoint {
        if p1.z.is_zero() {
            return p2.clone();
        }
        if p2.z.is_zero() {
            return p1.clone();
        }

        let z1z1 = self.fmul(&p1.z, &p1.z);
        let z2z2 = self.fmul(&p2.z, &p2.z);
        let u1 = self.fmul(&p1.x, &z2z2);
        let u2 = self.fmul(&p2.x, &z1z1);
        let s1 = self.fmul(&p1.y, &self.fmul(&p2.z, &z2z2));
        let s2 = self.fmul(&p2.y, &self.fmul(&p1.z, &z1z1));

        if u1 == u2 {
            if s1 != s2 {
                return self.jac_from_aff(&Point::Infinity);
            }
            return self.double_jacobian(p1);
        }

        let h = self.fsub(&u2, &u1);
        let r = self.fsub(&s2, &s1);
        let h2 = self.fmul(&h, &h);
        let h3 = self.fmul(&h, &h2);
        let u1h2 = self.fmul(&u1, &h2);

        let x3 = self.fsub(
            &self.fsub(&self.fmul(&r, &r), &h3),
            &self.fadd(&u1h2, &u1h2),
        );
        let y3 = self.fsub(
            &self.fmul(&r, &self.fsub(&u1h2, &x3)),
            &self.fmul(&s1, &h3),
        );
        let z3 = self.fmul(&self.fmul(&p1.z, &p2.z), &h);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    /// Group addition. Handles every case of the group law: either
    /// operand at infinity, opposite operands, doubling, general chord.
    pub fn add(&self, p1: &Point, p2: &Point) -> Point {
        let j = self.add_jacobian(&self.jac_from_aff(p1), &self.jac_from_aff(p2));
        self.aff_from_jac(&j)
    }

    /// Scalar multiple of the generator: `k·G`.
    pub fn mult(&self, k: &BigUint) -> Point {
        self.mult_point(k, &self.g)
    }

    /// Scalar multiple of an arbitrary point by left-to-right
    /// double-and-add over Jacobian coordinates. `mult_point(0, P)` is
    /// infinity; the scalar is used as given, so `n·G` lands on infinity
    /// by the group structure rather than by prior reduction.
    pub fn mult_point(&self, k: &BigUint, point: &Point) -> Point {
        let base = self.jac_from_aff(point);
        let mut acc = self.jac_from_aff(&Point::Infinity);
        for i in (0..k.bits()).rev() {
            acc = self.double_jacobian(&acc);
            if k.bit(i) {
                acc = self.add_jacobian(&acc, &base);
            }
        }
        self.aff_from_jac(&acc)
    }

    /// A uniformly random scalar in [1, n−1] by rejection sampling.
    pub fn random_scalar(&self, rng: &mut impl RngCore) -> BigUint {
        let mut buf = vec![0u8; self.nsize];
        loop {
            rng.fill_bytes(&mut buf);
            let k = octets::uint_from_be_bytes(&buf);
            if !k.is_zero() && k < self.n {
                return k;
            }
        }
    }

    // ---- y disambiguation ----

    // the square root of x³+ax+b, or why there is none
    fn y(&self, x: &BigUint) -> Result<BigUint, DomainError> {
        if *x >= self.p {
            return Err(DomainError::CoordinateOutOfRange);
        }
        mod_sqrt(&self.y2(x), &self.p)
    }

    /// The y root with the requested parity. When y = 0 the two roots
    /// coincide and only the even choice exists.
    pub fn y_odd(&self, x: &BigUint, odd: bool) -> Result<BigUint, DomainError> {
        let root = self.y(x)?;
        if root.is_zero() {
            return if odd { Err(DomainError::NonResidue) } else { Ok(root) };
        }
        if root.is_odd() == odd { Ok(root) } else { Ok(&self.p - root) }
    }

    /// The y root with the requested evenness; alias of [`Curve::y_odd`]
    /// with the flag flipped.
    pub fn y_even(&self, x: &BigUint, even: bool) -> Result<BigUint, DomainError> {
        self.y_odd(x, !even)
    }

    /// The numerically smaller (`low = true`) or larger y root.
    pub fn y_low(&self, x: &BigUint, low: bool) -> Result<BigUint, DomainError> {
        let root = self.y(x)?;
        if root.is_zero() {
            return if low { Ok(root) } else { Err(DomainError::NonResidue) };
        }
        let other = &self.p - &root;
        let (lo, hi) = if root < other { (root, other) } else { (other, root) };
        Ok(if low { lo } else { hi })
    }

    /// The y root that is (or is not) itself a quadratic residue. Only
    /// meaningful for p ≡ 3 (mod 4), where exactly one of the two roots
    /// is a residue; other moduli get
    /// [`DomainError::ResidueDisambiguationUnavailable`].
    pub fn y_quadratic_residue(&self, x: &BigUint, residue: bool) -> Result<BigUint, DomainError> {
        if (&self.p % 4u32) != BigUint::from(3u32) {
            return Err(DomainError::ResidueDisambiguationUnavailable);
        }
        let root = self.y(x)?;
        if root.is_zero() {
            return if residue { Ok(root) } else { Err(DomainError::NonResidue) };
        }
        let root_is_residue = legendre_symbol(&root, &self.p) == 1;
        if root_is_residue == residue { Ok(root) } else { Ok(&self.p - root) }
    }

    /// True iff the point is finite and its y coordinate is a quadratic
    /// residue. Infinity is defined as false.
    pub fn has_square_y(&self, point: &Point) -> Result<bool, DomainError> {
        match point {
            Point::Infinity => Ok(false),
            Point::Affine { x, y } => {
                if *x >= self.p || *y >= self.p {
                    return Err(DomainError::CoordinateOutOfRange);
                }
                Ok(legendre_symbol(y, &self.p) == 1)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::curves;

    fn tiny(p: u64, a: u64, b: u64, gx: u64, gy: u64, n: u64, h: u32) -> Result<Curve, ValidationError> {
        Curve::new(CurveParams::from_u64(p, a, b, gx, gy, n, h, 1))
    }

    #[test]
    fn construction_accepts_a_good_curve() {
        tiny(11, 2, 7, 6, 9, 7, 1).unwrap();
    }

    #[test]
    fn construction_rejects_bad_parameters() {
        // p even
        assert_eq!(tiny(10, 2, 7, 6, 9, 7, 1), Err(ValidationError::ModulusNotOdd));
        // p composite
        assert_eq!(tiny(15, 2, 7, 6, 9, 7, 1), Err(ValidationError::ModulusNotPrime));
        // a not reduced
        assert_eq!(tiny(11, 12, 7, 6, 9, 7, 1), Err(ValidationError::CoefficientOutOfRange));
        // b not reduced
        assert_eq!(tiny(11, 2, 12, 6, 9, 7, 1), Err(ValidationError::CoefficientOutOfRange));
        // zero discriminant: 4·7³ + 27·7² ≡ 0 (mod 11)
        assert_eq!(tiny(11, 7, 7, 6, 9, 7, 1), Err(ValidationError::SingularCurve));
        // generator off curve
        assert_eq!(tiny(11, 2, 7, 7, 9, 7, 1), Err(ValidationError::GeneratorNotOnCurve));
        // generator coordinates out of range
        assert_eq!(tiny(11, 2, 7, 17, 9, 7, 1), Err(ValidationError::GeneratorNotOnCurve));
        // n composite
        assert_eq!(tiny(11, 2, 7, 6, 9, 8, 1), Err(ValidationError::OrderNotPrime));
        // h·n way outside the Hasse interval
        assert_eq!(tiny(11, 2, 7, 6, 9, 7, 3), Err(ValidationError::CofactorInconsistent));
        assert_eq!(tiny(11, 2, 7, 6, 9, 7, 0), Err(ValidationError::CofactorInconsistent));
        // n prime and Hasse-plausible, but not the generator's order
        assert_eq!(tiny(11, 2, 7, 6, 9, 13, 1), Err(ValidationError::WrongSubgroupOrder));
        // n·G = ∞ but h·n ≠ exhaustive point count
        assert_eq!(tiny(11, 2, 7, 6, 9, 7, 2), Err(ValidationError::WrongGroupOrder));
    }

    #[test]
    fn construction_checks_declared_security() {
        // bits(11) = 4, so sec_bits must be 1 or 2
        let params = CurveParams::from_u64(11, 2, 7, 6, 9, 7, 1, 3);
        assert_eq!(Curve::new(params), Err(ValidationError::SecurityBitsOutOfRange));
        let params = CurveParams::from_u64(11, 2, 7, 6, 9, 7, 1, 0);
        assert_eq!(Curve::new(params), Err(ValidationError::SecurityBitsOutOfRange));
    }

    #[test]
    fn security_shortfall_is_a_warning_not_an_error() {
        let ec = &*curves::SECP256K1;
        assert_eq!(ec.require_security(128), Ok(()));
        assert_eq!(
            ec.require_security(256),
            Err(SecurityWarning { required: 256, available: 128 })
        );
        // the warned-about curve still works
        assert_eq!(ec.mult(&BigUint::one()), *ec.g());
    }

    #[test]
    fn group_identities_hold_on_every_curve() {
        for ec in curves::all_curves() {
            let inf = Point::Infinity;
            let g = ec.g();

            assert_eq!(ec.add(&inf, g), *g);
            assert_eq!(ec.add(g, &inf), *g);
            assert_eq!(ec.add(&inf, &inf), inf);

            assert_eq!(ec.mult(&BigUint::zero()), inf);
            assert_eq!(ec.mult(&BigUint::one()), *g);
            assert_eq!(ec.add(g, g), ec.mult(&BigUint::from(2u32)));

            let n_minus_1 = ec.mult(&(ec.n() - 1u32));
            assert_eq!(ec.add(&n_minus_1, g), inf);
            assert_eq!(ec.mult(ec.n()), inf);

            // scalar multiples of infinity stay at infinity
            for k in [0u32, 1, 25] {
                assert_eq!(ec.mult_point(&BigUint::from(k), &inf), inf);
            }
        }
    }

    #[test]
    fn opposite_is_the_group_inverse() {
        for ec in curves::all_curves() {
            let q = ec.mult(&(ec.p() % ec.n()));
            let q = if q.is_infinity() { ec.g().clone() } else { q };
            let minus_q = ec.opposite(&q);
            assert!(ec.is_on_curve(&minus_q).unwrap());
            assert_eq!(ec.add(&q, &minus_q), Point::Infinity);
            assert_eq!(ec.opposite(&minus_q), q);
            assert_eq!(ec.opposite(&Point::Infinity), Point::Infinity);

            // and the Jacobian path agrees
            let sum = ec.add_jacobian(&ec.jac_from_aff(&q), &ec.jac_from_aff(&minus_q));
            assert!(ec.aff_from_jac(&sum).is_infinity());
        }
    }

    #[test]
    fn affine_and_jacobian_addition_agree() {
        for ec in curves::all_curves() {
            let q1 = ec.mult(&(ec.p() % ec.n()));
            let q1 = if q1.is_infinity() { ec.g().clone() } else { q1 };
            let cases = [
                (q1.clone(), ec.g().clone()),      // general chord
                (ec.g().clone(), Point::Infinity), // identity operand
                (Point::Infinity, ec.g().clone()),
                (q1.clone(), q1.clone()),          // doubling
                (q1.clone(), ec.opposite(&q1)),    // opposite operands
            ];
            for (lhs, rhs) in cases {
                assert_eq!(ec.add_affine(&lhs, &rhs), ec.add(&lhs, &rhs));
            }
        }
    }

    #[test]
    fn jacobian_conversions_roundtrip() {
        for ec in curves::all_curves() {
            let q = ec.mult(&(ec.p() % ec.n()));
            let q = if q.is_infinity() { ec.g().clone() } else { q };
            assert_eq!(ec.aff_from_jac(&ec.jac_from_aff(&q)), q);
            assert_eq!(
                ec.aff_from_jac(&ec.jac_from_aff(&Point::Infinity)),
                Point::Infinity
            );
        }
    }

    #[test]
    fn scalar_multiplication_is_additive() {
        for ec in curves::all_curves() {
            let k1 = BigUint::from(3u32);
            let k2 = BigUint::from(5u32);
            let sum = ec.add(&ec.mult(&k1), &ec.mult(&k2));
            assert_eq!(sum, ec.mult(&(k1 + k2)));
        }
    }

    #[test]
    fn y_parity_disambiguation() {
        for ec in curves::all_curves() {
            let gx = ec.g().x().unwrap();
            let y_odd = ec.y_odd(gx, true).unwrap();
            assert!(y_odd.is_odd());
            let y_even = ec.y_odd(gx, false).unwrap();
            assert!(y_even.is_even());
            let gy = ec.g().y().unwrap();
            assert!(*gy == y_odd || *gy == y_even);
            // the alias flips the flag
            assert_eq!(ec.y_even(gx, true).unwrap(), y_even);
            assert_eq!(ec.y_even(gx, false).unwrap(), y_odd);
        }
    }

    #[test]
    fn y_low_orders_the_roots() {
        for ec in curves::all_curves() {
            let gx = ec.g().x().unwrap();
            let lo = ec.y_low(gx, true).unwrap();
            let hi = ec.y_low(gx, false).unwrap();
            assert!(lo < hi);
            assert_eq!(&lo + &hi, *ec.p());
        }
    }

    #[test]
    fn y_residue_disambiguation_needs_p_3_mod_4() {
        // p = 11 ≡ 3 (mod 4): exactly one root is a residue
        let ec = &*curves::EC11_7;
        let gx = ec.g().x().unwrap();
        let res = ec.y_quadratic_residue(gx, true).unwrap();
        assert_eq!(legendre_symbol(&res, ec.p()), 1);
        let non_res = ec.y_quadratic_residue(gx, false).unwrap();
        assert_eq!(legendre_symbol(&non_res, ec.p()), -1);
        assert_eq!(&res + &non_res, *ec.p());
        assert_eq!(mod_sqrt(&non_res, ec.p()), Err(DomainError::NonResidue));

        // p = 17 ≡ 1 (mod 4): the disambiguation is undefined
        let ec = &*curves::EC17_19;
        let gx = ec.g().x().unwrap();
        assert_eq!(
            ec.y_quadratic_residue(gx, true),
            Err(DomainError::ResidueDisambiguationUnavailable)
        );
        assert_eq!(
            ec.y_quadratic_residue(gx, false),
            Err(DomainError::ResidueDisambiguationUnavailable)
        );
    }

    #[test]
    fn has_square_y_follows_legendre() {
        for ec in curves::all_curves() {
            assert_eq!(ec.has_square_y(&Point::Infinity), Ok(false));
            let q = ec.mult(&BigUint::from(2u32));
            let expected = legendre_symbol(q.y().unwrap(), ec.p()) == 1;
            assert_eq!(ec.has_square_y(&q), Ok(expected));
        }
    }

    #[test]
    fn out_of_range_coordinates_are_domain_errors() {
        let ec = &*curves::EC11_7;
        let bogus = Point::affine(BigUint::from(11u32), BigUint::from(3u32));
        assert_eq!(ec.is_on_curve(&bogus), Err(DomainError::CoordinateOutOfRange));
        assert_eq!(ec.has_square_y(&bogus), Err(DomainError::CoordinateOutOfRange));
        assert_eq!(ec.y_odd(&BigUint::from(11u32), true), Err(DomainError::CoordinateOutOfRange));

        // off-curve but in-range is a clean false
        let off = Point::affine(BigUint::from(0u32), BigUint::from(1u32));
        assert_eq!(ec.is_on_curve(&off), Ok(false));
    }

    #[test]
    fn random_scalars_are_in_range() {
        let mut rng = rand::thread_rng();
        for ec in curves::all_curves() {
            for _ in 0..crate::TEST_SOUNDNESS {
                let k = ec.random_scalar(&mut rng);
                assert!(!k.is_zero() && k < *ec.n());
            }
        }
    }
}
