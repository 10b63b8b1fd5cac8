use crate::bigint::BigUint;
use crate::binary_field::BinaryFieldElement;
use crate::error::{EcError, EcResult};
use crate::field::{FieldElement, PrimeFieldElement};
use crate::multiplier::{BasicMultiplier, EcMultiplier};
use crate::point::Point;
use log::debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Coordinate system a curve performs its group arithmetic in.
///
/// The choice trades field multiplications, squarings and inversions per
/// group operation; all systems represent the same group elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// Plain (x, y) pairs; every add and double costs an inversion.
    Affine,
    /// (X:Y:Z) with affine image (X/Z, Y/Z).
    Homogeneous,
    /// (X:Y:Z) with affine image (X/Z^2, Y/Z^3).
    Jacobian,
    /// Jacobian with cached Z^2 and Z^3.
    JacobianChudnovsky,
    /// Jacobian with cached W = a*Z^4.
    JacobianModified,
    /// (x, lambda) with lambda = x + y/x; binary fields only.
    LambdaAffine,
    /// (X, L, Z) lambda coordinates; binary fields only.
    LambdaProjective,
}

impl CoordinateSystem {
    pub fn name(&self) -> &'static str {
        match self {
            CoordinateSystem::Affine => "affine",
            CoordinateSystem::Homogeneous => "homogeneous",
            CoordinateSystem::Jacobian => "jacobian",
            CoordinateSystem::JacobianChudnovsky => "jacobian-chudnovsky",
            CoordinateSystem::JacobianModified => "jacobian-modified",
            CoordinateSystem::LambdaAffine => "lambda-affine",
            CoordinateSystem::LambdaProjective => "lambda-projective",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "affine" => CoordinateSystem::Affine,
            "homogeneous" => CoordinateSystem::Homogeneous,
            "jacobian" => CoordinateSystem::Jacobian,
            "jacobian-chudnovsky" => CoordinateSystem::JacobianChudnovsky,
            "jacobian-modified" => CoordinateSystem::JacobianModified,
            "lambda-affine" => CoordinateSystem::LambdaAffine,
            "lambda-projective" => CoordinateSystem::LambdaProjective,
            _ => return None,
        })
    }

    /// Lambda systems store lambda = x + y/x in the y slot.
    pub(crate) fn is_lambda(&self) -> bool {
        matches!(
            self,
            CoordinateSystem::LambdaAffine | CoordinateSystem::LambdaProjective
        )
    }
}

/// Description of the finite field a curve is defined over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSpec {
    /// Prime field F_p.
    Prime { modulus: BigUint },
    /// Binary field F_2^m with the full degree-m reduction polynomial.
    Binary { m: u32, irreducible: BigUint },
}

impl FieldSpec {
    pub fn is_binary(&self) -> bool {
        matches!(self, FieldSpec::Binary { .. })
    }

    /// Field size in bits: bits of p, or the extension degree m.
    pub fn size(&self) -> usize {
        match self {
            FieldSpec::Prime { modulus } => modulus.bit_len(),
            FieldSpec::Binary { m, .. } => *m as usize,
        }
    }
}

#[derive(Debug)]
struct CurveParams {
    field: FieldSpec,
    a: FieldElement,
    b: FieldElement,
    order: Option<BigUint>,
    cofactor: Option<BigUint>,
    coord: CoordinateSystem,
}

/// A short-Weierstrass curve: parameters, field, and the coordinate
/// system its points carry.
///
/// `Curve` is a cheap handle over immutable shared parameters; clone it
/// freely. Equality is structural over (field, a, b): two curves with the
/// same parameters are interchangeable even when their coordinate systems
/// differ (use [`Curve::import_point`] to re-represent points).
#[derive(Debug, Clone)]
pub struct Curve {
    params: Arc<CurveParams>,
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.params.field == other.params.field
            && self.params.a == other.params.a
            && self.params.b == other.params.b
    }
}

impl Eq for Curve {}

impl Hash for Curve {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.params.field.hash(state);
        self.params.a.hash(state);
        self.params.b.hash(state);
    }
}

impl Curve {
    /// Creates a curve y^2 = x^3 + ax + b over F_p.
    pub fn new_prime(
        p: BigUint,
        a: BigUint,
        b: BigUint,
        order: Option<BigUint>,
        cofactor: Option<BigUint>,
        coord: CoordinateSystem,
    ) -> EcResult<Curve> {
        if p.bit_len() < 3 || p.is_even() {
            return Err(EcError::invalid("field characteristic must be an odd prime"));
        }
        match coord {
            CoordinateSystem::Affine
            | CoordinateSystem::Homogeneous
            | CoordinateSystem::Jacobian
            | CoordinateSystem::JacobianChudnovsky
            | CoordinateSystem::JacobianModified => {}
            _ => return Err(EcError::UnsupportedCoordinateSystem),
        }

        let a = FieldElement::Fp(PrimeFieldElement::new(a, p.clone()));
        let b = FieldElement::Fp(PrimeFieldElement::new(b, p.clone()));
        debug!(
            "prime curve over {}-bit field, {} coordinates",
            p.bit_len(),
            coord.name()
        );
        Ok(Curve {
            params: Arc::new(CurveParams {
                field: FieldSpec::Prime { modulus: p },
                a,
                b,
                order,
                cofactor,
                coord,
            }),
        })
    }

    /// Creates a curve y^2 + xy = x^3 + ax^2 + b over F_2^m.
    ///
    /// `irreducible` is the full reduction polynomial including the x^m
    /// term.
    pub fn new_binary(
        m: u32,
        irreducible: BigUint,
        a: BigUint,
        b: BigUint,
        order: Option<BigUint>,
        cofactor: Option<BigUint>,
        coord: CoordinateSystem,
    ) -> EcResult<Curve> {
        if irreducible.bit_len() != m as usize + 1 {
            return Err(EcError::invalid(
                "irreducible polynomial degree must equal the extension degree",
            ));
        }
        match coord {
            CoordinateSystem::Affine
            | CoordinateSystem::Homogeneous
            | CoordinateSystem::LambdaAffine
            | CoordinateSystem::LambdaProjective => {}
            _ => return Err(EcError::UnsupportedCoordinateSystem),
        }

        let a = FieldElement::F2m(BinaryFieldElement::new(a, m, irreducible.clone()));
        let b = FieldElement::F2m(BinaryFieldElement::new(b, m, irreducible.clone()));
        if b.is_zero() {
            return Err(EcError::invalid("binary curve requires b != 0"));
        }
        debug!("binary curve over F_2^{}, {} coordinates", m, coord.name());
        Ok(Curve {
            params: Arc::new(CurveParams {
                field: FieldSpec::Binary { m, irreducible },
                a,
                b,
                order,
                cofactor,
                coord,
            }),
        })
    }

    pub fn field(&self) -> &FieldSpec {
        &self.params.field
    }

    pub fn is_binary(&self) -> bool {
        self.params.field.is_binary()
    }

    pub fn a(&self) -> &FieldElement {
        &self.params.a
    }

    pub fn b(&self) -> &FieldElement {
        &self.params.b
    }

    pub fn order(&self) -> Option<&BigUint> {
        self.params.order.as_ref()
    }

    pub fn cofactor(&self) -> Option<&BigUint> {
        self.params.cofactor.as_ref()
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.params.coord
    }

    /// Field size in bits.
    pub fn field_size(&self) -> usize {
        self.params.field.size()
    }

    /// Fixed element encoding width in bytes.
    pub(crate) fn element_width(&self) -> usize {
        (self.field_size() + 7) / 8
    }

    /// Embeds an integer into the curve's field, reducing it.
    pub fn from_biguint(&self, k: &BigUint) -> FieldElement {
        match &self.params.field {
            FieldSpec::Prime { modulus } => {
                FieldElement::Fp(PrimeFieldElement::new(k.clone(), modulus.clone()))
            }
            FieldSpec::Binary { m, irreducible } => {
                FieldElement::F2m(BinaryFieldElement::new(k.clone(), *m, irreducible.clone()))
            }
        }
    }

    /// Initial projective auxiliaries for a freshly created affine-valued
    /// point, per coordinate system.
    pub(crate) fn initial_zs(&self) -> Vec<FieldElement> {
        let one = self.from_biguint(&BigUint::one());
        match self.params.coord {
            CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => Vec::new(),
            CoordinateSystem::Homogeneous
            | CoordinateSystem::Jacobian
            | CoordinateSystem::LambdaProjective => vec![one],
            CoordinateSystem::JacobianChudnovsky => vec![one.clone(), one.clone(), one],
            CoordinateSystem::JacobianModified => vec![one, self.params.a.clone()],
        }
    }

    /// The point at infinity on this curve.
    pub fn infinity(&self) -> Point {
        Point::infinity(self.clone())
    }

    /// Low-level constructor that does not revalidate the curve equation.
    ///
    /// For use after algebraic operations that preserve curve membership;
    /// use [`Curve::create_point`] for untrusted coordinates.
    pub fn create_raw_point(
        &self,
        x: FieldElement,
        y: FieldElement,
        zs: Vec<FieldElement>,
        with_compression: bool,
    ) -> Point {
        Point::new(self.clone(), x, y, zs, with_compression)
    }

    /// Checks the affine curve equation for the curve's family.
    pub fn is_on_curve(&self, x: &FieldElement, y: &FieldElement) -> bool {
        if self.is_binary() {
            // y^2 + xy = x^3 + ax^2 + b
            let lhs = y.square().add(&x.multiply(y));
            let x_sq = x.square();
            let rhs = x_sq.multiply(x).add(&self.params.a.multiply(&x_sq)).add(&self.params.b);
            lhs == rhs
        } else {
            // y^2 = x^3 + ax + b
            let lhs = y.square();
            let rhs = x
                .square()
                .multiply(x)
                .add(&self.params.a.multiply(x))
                .add(&self.params.b);
            lhs == rhs
        }
    }

    /// Creates a point from affine coordinates, validating the curve
    /// equation.
    pub fn create_point(&self, x: &BigUint, y: &BigUint) -> EcResult<Point> {
        let xe = self.from_biguint(x);
        let ye = self.from_biguint(y);
        if !self.is_on_curve(&xe, &ye) {
            return Err(EcError::InvariantViolation(
                "point is not on the curve".to_string(),
            ));
        }
        Ok(self.affine_to_repr(xe, ye, false))
    }

    /// Wraps known-good affine coordinates into the curve's coordinate
    /// system (computing lambda for the lambda systems).
    pub(crate) fn affine_to_repr(
        &self,
        x: FieldElement,
        y: FieldElement,
        with_compression: bool,
    ) -> Point {
        let y_slot = if self.params.coord.is_lambda() && !x.is_zero() {
            // The order-2 point (x = 0) keeps its affine y; lambda is
            // undefined there.
            x.add(&y.divide(&x))
        } else {
            y
        };
        Point::new(self.clone(), x, y_slot, self.initial_zs(), with_compression)
    }

    /// Re-represents a point from an equivalent curve in this curve's
    /// coordinate system.
    ///
    /// Detached affine points are adopted after an on-curve check.
    pub fn import_point(&self, p: &Point) -> EcResult<Point> {
        match p.curve() {
            None => {
                let x = p
                    .x_coord()
                    .ok_or_else(|| EcError::invalid("cannot import a detached infinity"))?
                    .to_biguint();
                let y = p
                    .y_coord()
                    .ok_or_else(|| EcError::invalid("cannot import a detached infinity"))?
                    .to_biguint();
                self.create_point(&x, &y)
            }
            Some(c) => {
                if c != self {
                    return Err(EcError::CurveMismatch);
                }
                if p.is_infinity() {
                    return Ok(self.infinity());
                }
                if c.coordinate_system() == self.coordinate_system() {
                    return Ok(p.clone());
                }
                let n = p.normalize();
                let x = n.raw_x().clone();
                let y = n
                    .y_coord()
                    .expect("normalized non-infinity point has a y-coordinate");
                Ok(self.affine_to_repr(x, y, p.is_compressed()))
            }
        }
    }

    /// Normalizes a batch of points with Montgomery's simultaneous
    /// inversion: one field inversion plus 3(N-1) multiplications.
    ///
    /// Infinity and already-normalized entries are left untouched.
    pub fn normalize_all(&self, points: &mut [Point]) -> EcResult<()> {
        let mut indices = Vec::new();
        let mut zs = Vec::new();
        for (i, p) in points.iter().enumerate() {
            match p.curve() {
                Some(c) if c == self => {}
                _ => return Err(EcError::CurveMismatch),
            }
            if !p.is_normalized() {
                indices.push(i);
                zs.push(p.z_coord(0).expect("projective point has a z-coordinate"));
            }
        }
        if indices.is_empty() {
            return Ok(());
        }
        debug!("batch-normalizing {} of {} points", indices.len(), points.len());

        // Forward pass: running products of the z-coordinates.
        let mut prods = Vec::with_capacity(zs.len());
        prods.push(zs[0].clone());
        for z in &zs[1..] {
            let last = prods.last().expect("running product is non-empty").clone();
            prods.push(last.multiply(z));
        }

        // One inversion of the total, then distribute backwards.
        let mut u = prods.last().expect("running product is non-empty").invert();
        for i in (0..indices.len()).rev() {
            let z_inv = if i == 0 {
                u.clone()
            } else {
                let inv = u.multiply(&prods[i - 1]);
                u = u.multiply(&zs[i]);
                inv
            };
            points[indices[i]] = points[indices[i]].normalize_with(&z_inv);
        }
        Ok(())
    }

    /// Decodes a SEC1-encoded point.
    ///
    /// Accepts `00` (infinity), `02`/`03` || X (compressed) and
    /// `04` || X || Y (uncompressed); anything else is rejected.
    pub fn decode_point(&self, bytes: &[u8]) -> EcResult<Point> {
        let width = self.element_width();
        let reject = |why: &str| {
            debug!("rejected point encoding: {}", why);
            Err(EcError::invalid(format!("invalid point encoding: {}", why)))
        };

        match bytes.first().copied() {
            None => reject("empty"),
            Some(0x00) => {
                if bytes.len() != 1 {
                    return reject("infinity encoding has excess bytes");
                }
                Ok(self.infinity())
            }
            Some(tag) if tag == 0x02 || tag == 0x03 => {
                if bytes.len() != 1 + width {
                    return reject("wrong length for a compressed point");
                }
                let x = BigUint::from_bytes_be(&bytes[1..]);
                if !self.integer_in_field(&x) {
                    return reject("x-coordinate out of field range");
                }
                self.decompress_point(&x, tag == 0x03)
            }
            Some(0x04) => {
                if bytes.len() != 1 + 2 * width {
                    return reject("wrong length for an uncompressed point");
                }
                let x = BigUint::from_bytes_be(&bytes[1..1 + width]);
                let y = BigUint::from_bytes_be(&bytes[1 + width..]);
                if !self.integer_in_field(&x) || !self.integer_in_field(&y) {
                    return reject("coordinate out of field range");
                }
                self.create_point(&x, &y)
                    .map_err(|_| EcError::invalid("invalid point encoding: not on the curve"))
            }
            Some(_) => reject("unknown leading byte"),
        }
    }

    fn integer_in_field(&self, k: &BigUint) -> bool {
        match &self.params.field {
            FieldSpec::Prime { modulus } => k < modulus,
            FieldSpec::Binary { m, .. } => k.bit_len() <= *m as usize,
        }
    }

    fn decompress_point(&self, x: &BigUint, y_tilde: bool) -> EcResult<Point> {
        let xe = self.from_biguint(x);
        if self.is_binary() {
            if xe.is_zero() {
                // y^2 = b at x = 0; the root is unique in char 2.
                let y = self.params.b.sqrt().expect("binary sqrt is total");
                return Ok(self.affine_to_repr(xe, y, true));
            }
            // With y = x*z the equation becomes z^2 + z = x + a + b/x^2.
            let beta = xe
                .add(&self.params.a)
                .add(&self.params.b.multiply(&xe.square().invert()));
            let mut z = match beta.solve_quadratic() {
                Some(z) => z,
                None => {
                    return Err(EcError::invalid(
                        "invalid point encoding: no point for this x-coordinate",
                    ))
                }
            };
            if z.test_bit_zero() != y_tilde {
                z = z.add_one();
            }
            let y = xe.multiply(&z);
            Ok(self.affine_to_repr(xe, y, true))
        } else {
            let rhs = xe
                .square()
                .multiply(&xe)
                .add(&self.params.a.multiply(&xe))
                .add(&self.params.b);
            let mut y = match rhs.sqrt() {
                Some(y) => y,
                None => {
                    return Err(EcError::invalid(
                        "invalid point encoding: no point for this x-coordinate",
                    ))
                }
            };
            if y.test_bit_zero() != y_tilde {
                y = y.negate();
            }
            // A zero y cannot flip parity, so a set bit there is bogus.
            if y.test_bit_zero() != y_tilde {
                return Err(EcError::invalid("invalid point encoding: bad parity bit"));
            }
            Ok(self.affine_to_repr(xe, y, true))
        }
    }

    /// The scalar multiplier consumed by [`Point::multiply`].
    pub fn multiplier(&self) -> &'static dyn EcMultiplier {
        &BasicMultiplier
    }
}
