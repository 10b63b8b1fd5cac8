use crate::bigint::BigUint;
use crate::curve::{CoordinateSystem, Curve};
use crate::error::{EcError, EcResult};
use crate::field::FieldElement;
use crate::multiplier::PreComp;
use crate::{point_f2m, point_fp};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// A point on an elliptic curve, in the coordinate system of its curve.
///
/// Points are immutable values: every group operation returns a new
/// point. `x` and `y` are both absent exactly for the point at infinity;
/// `zs` holds the projective auxiliaries whose length and meaning are
/// fixed by the coordinate system. A point without a curve is "detached":
/// a bare affine coordinate pair that supports equality, hashing and
/// encoding but no arithmetic.
#[derive(Debug, Clone)]
pub struct Point {
    curve: Option<Curve>,
    x: Option<FieldElement>,
    y: Option<FieldElement>,
    zs: Vec<FieldElement>,
    with_compression: bool,
    pre_comp: Arc<RwLock<Option<PreComp>>>,
}

impl Point {
    pub(crate) fn new(
        curve: Curve,
        x: FieldElement,
        y: FieldElement,
        zs: Vec<FieldElement>,
        with_compression: bool,
    ) -> Point {
        Point {
            curve: Some(curve),
            x: Some(x),
            y: Some(y),
            zs,
            with_compression,
            pre_comp: Arc::new(RwLock::new(None)),
        }
    }

    pub(crate) fn infinity(curve: Curve) -> Point {
        Point {
            curve: Some(curve),
            x: None,
            y: None,
            zs: Vec::new(),
            with_compression: false,
            pre_comp: Arc::new(RwLock::new(None)),
        }
    }

    /// A curve-less affine point.
    ///
    /// Panics when `x` and `y` come from different fields.
    pub fn detached(x: FieldElement, y: FieldElement) -> Point {
        if !x.same_field(&y) {
            panic!("detached point coordinates must share a field");
        }
        Point {
            curve: None,
            x: Some(x),
            y: Some(y),
            zs: Vec::new(),
            with_compression: false,
            pre_comp: Arc::new(RwLock::new(None)),
        }
    }

    /// Rebuilds with the same curve attachment and compression hint.
    pub(crate) fn with_coords(
        &self,
        x: FieldElement,
        y: FieldElement,
        zs: Vec<FieldElement>,
    ) -> Point {
        Point {
            curve: self.curve.clone(),
            x: Some(x),
            y: Some(y),
            zs,
            with_compression: self.with_compression,
            pre_comp: Arc::new(RwLock::new(None)),
        }
    }

    pub fn curve(&self) -> Option<&Curve> {
        self.curve.as_ref()
    }

    pub(crate) fn curve_ref(&self) -> &Curve {
        self.curve.as_ref().expect("point is attached to a curve")
    }

    /// The curve's coordinate system; detached points are affine.
    pub fn coordinate_system(&self) -> CoordinateSystem {
        match &self.curve {
            Some(c) => c.coordinate_system(),
            None => CoordinateSystem::Affine,
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.x.is_none() || (!self.zs.is_empty() && self.zs[0].is_zero())
    }

    /// The encoding hint carried by this point; never affects arithmetic.
    pub fn is_compressed(&self) -> bool {
        self.with_compression
    }

    /// Returns an equal point carrying the given compression hint.
    pub fn with_compression_hint(&self, with_compression: bool) -> Point {
        let mut p = self.clone();
        p.with_compression = with_compression;
        p.pre_comp = Arc::new(RwLock::new(None));
        p
    }

    /// The raw x-coordinate; affine only when the point is normalized.
    pub fn x_coord(&self) -> Option<&FieldElement> {
        self.x.as_ref()
    }

    /// The y-coordinate.
    ///
    /// In the lambda systems the stored slot is lambda = x + y/x; this
    /// accessor converts it back to the affine-style Y on read (divided
    /// once by Z in the projective case), even for points that are not
    /// normalized.
    pub fn y_coord(&self) -> Option<FieldElement> {
        if self.is_infinity() {
            return self.y.clone();
        }
        let y = self.y.as_ref()?;
        if self.coordinate_system().is_lambda() {
            let x = self.x.as_ref()?;
            if x.is_zero() {
                // The order-2 point stores its affine y directly.
                return Some(y.clone());
            }
            let mut out = y.subtract(x).multiply(x);
            if self.coordinate_system() == CoordinateSystem::LambdaProjective {
                let z = &self.zs[0];
                if !z.is_one() {
                    out = out.divide(z);
                }
            }
            Some(out)
        } else {
            Some(y.clone())
        }
    }

    /// The projective auxiliary at `index`, if the coordinate system has
    /// one. For modified-Jacobian points index 1 yields W = a*Z^4,
    /// computing it when the producing operation omitted it.
    pub fn z_coord(&self, index: usize) -> Option<FieldElement> {
        if index == 1
            && self.coordinate_system() == CoordinateSystem::JacobianModified
            && !self.is_infinity()
        {
            return Some(point_fp::jacobian_modified_w(self));
        }
        self.zs.get(index).cloned()
    }

    pub fn z_coords(&self) -> &[FieldElement] {
        &self.zs
    }

    pub(crate) fn raw_x(&self) -> &FieldElement {
        self.x.as_ref().expect("infinity has no coordinates")
    }

    pub(crate) fn raw_y(&self) -> &FieldElement {
        self.y.as_ref().expect("infinity has no coordinates")
    }

    pub(crate) fn z0(&self) -> &FieldElement {
        &self.zs[0]
    }

    /// True when the coordinates already reflect affine values: affine
    /// systems, infinity, or Z = 1.
    pub fn is_normalized(&self) -> bool {
        matches!(
            self.coordinate_system(),
            CoordinateSystem::Affine | CoordinateSystem::LambdaAffine
        ) || self.is_infinity()
            || self.zs[0].is_one()
    }

    /// An equivalent point whose coordinates are affine values (Z = 1).
    ///
    /// Costs one field inversion; callers normalizing many points should
    /// prefer [`Curve::normalize_all`].
    pub fn normalize(&self) -> Point {
        if self.is_normalized() {
            return self.clone();
        }
        self.normalize_with(&self.zs[0].invert())
    }

    /// Scales coordinates by a precomputed Z inverse.
    pub(crate) fn normalize_with(&self, z_inv: &FieldElement) -> Point {
        let (sx, sy) = match self.coordinate_system() {
            CoordinateSystem::Homogeneous | CoordinateSystem::LambdaProjective => {
                (z_inv.clone(), z_inv.clone())
            }
            _ => {
                let z_inv2 = z_inv.square();
                let z_inv3 = z_inv2.multiply(z_inv);
                (z_inv2, z_inv3)
            }
        };
        let curve = self.curve_ref();
        curve.create_raw_point(
            self.raw_x().multiply(&sx),
            self.raw_y().multiply(&sy),
            curve.initial_zs(),
            self.with_compression,
        )
    }

    /// The affine x-coordinate; fails unless the point is normalized.
    pub fn affine_x_coord(&self) -> EcResult<FieldElement> {
        if !self.is_normalized() {
            return Err(EcError::NotNormalized);
        }
        self.x
            .clone()
            .ok_or_else(|| EcError::invalid("the point at infinity has no affine coordinates"))
    }

    /// The affine y-coordinate; fails unless the point is normalized.
    pub fn affine_y_coord(&self) -> EcResult<FieldElement> {
        if !self.is_normalized() {
            return Err(EcError::NotNormalized);
        }
        self.y_coord()
            .ok_or_else(|| EcError::invalid("the point at infinity has no affine coordinates"))
    }

    fn require_attached(&self, other: Option<&Point>) -> EcResult<&Curve> {
        if let Some(p) = other {
            if p.curve.is_none() {
                return Err(EcError::invalid("arithmetic on a detached point"));
            }
        }
        self.curve
            .as_ref()
            .ok_or_else(|| EcError::invalid("arithmetic on a detached point"))
    }

    /// Re-represents `b` on this point's curve when its coordinate
    /// system differs, so the family arithmetic can read its z-slots.
    fn align<'a>(&self, b: &'a Point, curve: &Curve) -> EcResult<std::borrow::Cow<'a, Point>> {
        if b.coordinate_system() == curve.coordinate_system() {
            Ok(std::borrow::Cow::Borrowed(b))
        } else {
            Ok(std::borrow::Cow::Owned(curve.import_point(b)?))
        }
    }

    /// Group addition.
    pub fn add(&self, b: &Point) -> EcResult<Point> {
        let curve = self.require_attached(Some(b))?;
        let b = self.align(b, curve)?;
        if curve.is_binary() {
            point_f2m::add(self, &b)
        } else {
            point_fp::add(self, &b)
        }
    }

    /// `self - b`, as addition of the negation; an infinity subtrahend
    /// short-circuits.
    pub fn subtract(&self, b: &Point) -> EcResult<Point> {
        if b.is_infinity() {
            return Ok(self.clone());
        }
        self.add(&b.negate())
    }

    /// Point doubling.
    pub fn twice(&self) -> EcResult<Point> {
        let curve = self.require_attached(None)?;
        if curve.is_binary() {
            point_f2m::twice(self)
        } else {
            point_fp::twice(self)
        }
    }

    /// `2*self + b`, using an inversion-trading identity where the
    /// coordinate system has one.
    pub fn twice_plus(&self, b: &Point) -> EcResult<Point> {
        let curve = self.require_attached(Some(b))?;
        let b = self.align(b, curve)?;
        if curve.is_binary() {
            point_f2m::twice_plus(self, &b)
        } else {
            point_fp::twice_plus(self, &b)
        }
    }

    /// `3*self`.
    pub fn three_times(&self) -> EcResult<Point> {
        let curve = self.require_attached(None)?;
        if curve.is_binary() {
            // No dedicated tripling identity in characteristic 2.
            point_f2m::twice_plus(self, self)
        } else {
            point_fp::three_times(self)
        }
    }

    /// Group negation, in the point's own coordinate system.
    pub fn negate(&self) -> Point {
        if self.is_infinity() {
            return self.clone();
        }
        let x = self.raw_x();
        let y = self.raw_y();
        if x.is_binary() {
            // -P = (X, X + Y): a point with X = 0 is its own inverse.
            if x.is_zero() {
                return self.clone();
            }
            match self.coordinate_system() {
                CoordinateSystem::LambdaAffine => {
                    self.with_coords(x.clone(), y.add_one(), self.zs.clone())
                }
                CoordinateSystem::LambdaProjective => {
                    self.with_coords(x.clone(), y.add(&self.zs[0]), self.zs.clone())
                }
                _ => self.with_coords(x.clone(), y.add(x), self.zs.clone()),
            }
        } else {
            self.with_coords(x.clone(), y.negate(), self.zs.clone())
        }
    }

    /// `2^e * self` by `e` repeated doublings.
    pub fn times_pow2(&self, e: i32) -> EcResult<Point> {
        if e < 0 {
            return Err(EcError::invalid("'e' cannot be negative"));
        }
        let mut p = self.clone();
        for _ in 0..e {
            p = p.twice()?;
        }
        Ok(p)
    }

    /// `k * self`, delegating to the curve's multiplier.
    pub fn multiply(&self, k: &BigUint) -> EcResult<Point> {
        let curve = self.require_attached(None)?;
        curve.multiplier().multiply(self, k)
    }

    /// The Frobenius endomorphism (x, y) -> (x^2, y^2); binary fields
    /// only.
    pub fn tau(&self) -> EcResult<Point> {
        let curve = self.require_attached(None)?;
        if !curve.is_binary() {
            return Err(EcError::invalid("tau is defined for binary-field points only"));
        }
        point_f2m::tau(self)
    }

    /// Verifies the representation's curve-equation invariant.
    pub fn check_curve_equation(&self) -> EcResult<()> {
        if self.is_infinity() {
            return Ok(());
        }
        let curve = self
            .curve
            .as_ref()
            .ok_or_else(|| EcError::invalid("detached point has no curve to check against"))?;
        if self.coordinate_system().is_lambda() {
            return point_f2m::check_lambda_equation(self);
        }
        let n = self.normalize();
        let y = n
            .y_coord()
            .expect("normalized non-infinity point has a y-coordinate");
        if curve.is_on_curve(n.raw_x(), &y) {
            Ok(())
        } else {
            Err(EcError::InvariantViolation(
                "point does not satisfy the curve equation".to_string(),
            ))
        }
    }

    /// SEC1 encoding using this point's compression hint.
    pub fn encoded(&self) -> Vec<u8> {
        self.get_encoded(self.with_compression)
    }

    /// SEC1 encoding: a single zero byte for infinity, `02/03 || X`
    /// compressed, `04 || X || Y` uncompressed, with fixed-width
    /// coordinates.
    pub fn get_encoded(&self, compressed: bool) -> Vec<u8> {
        if self.is_infinity() {
            return vec![0];
        }

        let normed = self.normalize();
        let x = normed.raw_x().encoded();

        if compressed {
            let mut out = Vec::with_capacity(x.len() + 1);
            out.push(if normed.compression_y_tilde() { 0x03 } else { 0x02 });
            out.extend_from_slice(&x);
            return out;
        }

        let y = normed
            .y_coord()
            .expect("normalized non-infinity point has a y-coordinate")
            .encoded();
        let mut out = Vec::with_capacity(x.len() + y.len() + 1);
        out.push(0x04);
        out.extend_from_slice(&x);
        out.extend_from_slice(&y);
        out
    }

    /// The compression parity bit of a normalized point.
    fn compression_y_tilde(&self) -> bool {
        let x = self.raw_x();
        let y = self.raw_y();
        if x.is_binary() {
            if x.is_zero() {
                return false;
            }
            if self.coordinate_system().is_lambda() {
                // The y slot already holds lambda = X + Y/X.
                y.subtract(x).test_bit_zero()
            } else {
                y.divide(x).test_bit_zero()
            }
        } else {
            y.test_bit_zero()
        }
    }

    /// Caller-owned precomputation attached to this point, if the given
    /// producer stored one.
    pub fn pre_comp(&self, producer: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        let guard = self.pre_comp.read().ok()?;
        guard
            .as_ref()
            .filter(|info| info.producer() == producer)
            .map(|info| info.value())
    }

    /// Replaces the precomputation slot.
    pub fn set_pre_comp(&self, info: PreComp) {
        if let Ok(mut guard) = self.pre_comp.write() {
            *guard = Some(info);
        }
    }

    fn points_equal(&self, other: &Point) -> bool {
        let i1 = self.is_infinity();
        let i2 = other.is_infinity();
        if i1 || i2 {
            return i1
                && i2
                && match (&self.curve, &other.curve) {
                    (Some(c1), Some(c2)) => c1 == c2,
                    _ => true,
                };
        }

        match (&self.curve, &other.curve) {
            (None, None) => self.x == other.x && self.y == other.y,
            (None, Some(_)) => {
                let n = other.normalize();
                self.x.as_ref() == Some(n.raw_x()) && self.y_coord() == n.y_coord()
            }
            (Some(_), None) => other.points_equal(self),
            (Some(c1), Some(c2)) => {
                if c1 != c2 {
                    return false;
                }
                let imported = match c1.import_point(other) {
                    Ok(p) => p,
                    Err(_) => return false,
                };
                let mut pair = [self.clone(), imported];
                if c1.normalize_all(&mut pair).is_err() {
                    return false;
                }
                pair[0].x == pair[1].x && pair[0].y == pair[1].y
            }
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.points_equal(other)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_infinity() {
            0u8.hash(state);
            self.curve.hash(state);
        } else {
            // Hash affine values only so that equal points in different
            // coordinate systems (or detached copies) collide.
            1u8.hash(state);
            let n = self.normalize();
            n.raw_x().hash(state);
            n.y_coord().hash(state);
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinity() {
            return write!(f, "INF");
        }
        write!(f, "({},{}", self.raw_x(), self.raw_y())?;
        for z in &self.zs {
            write!(f, ",{}", z)?;
        }
        write!(f, ")")
    }
}
