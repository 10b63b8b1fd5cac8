//! Group arithmetic for short-Weierstrass curves over binary fields, in
//! affine, homogeneous and lambda coordinates.
//!
//! Characteristic 2 collapses subtraction into addition, so the formulas
//! below freely exchange the two.

use crate::bigint::BigUint;
use crate::curve::CoordinateSystem;
use crate::error::{EcError, EcResult};
use crate::point::Point;

/// Operand compatibility for binary-curve addition: both points must lie
/// on curves with equal parameters.
fn check_points(a: &Point, b: &Point) -> EcResult<()> {
    match (a.curve(), b.curve()) {
        (Some(c1), Some(c2)) if c1 == c2 => Ok(()),
        _ => Err(EcError::CurveMismatch),
    }
}

pub(crate) fn add(p: &Point, b: &Point) -> EcResult<Point> {
    check_points(p, b)?;
    add_simple(p, b)
}

fn add_simple(p: &Point, b: &Point) -> EcResult<Point> {
    if p.is_infinity() {
        return Ok(b.clone());
    }
    if b.is_infinity() {
        return Ok(p.clone());
    }

    let curve = p.curve_ref();
    let x1 = p.raw_x();
    let x2 = b.raw_x();

    match curve.coordinate_system() {
        CoordinateSystem::Affine => {
            let y1 = p.raw_y();
            let y2 = b.raw_y();

            if x1 == x2 {
                if y1 == y2 {
                    return twice(p);
                }
                return Ok(curve.infinity());
            }

            let sum_x = x1.add(x2);
            let l = y1.add(y2).divide(&sum_x);

            let x3 = l.square().add(&l).add(&sum_x).add(curve.a());
            let y3 = l.multiply(&x1.add(&x3)).add(&x3).add(y1);
            Ok(p.with_coords(x3, y3, Vec::new()))
        }

        CoordinateSystem::Homogeneous => {
            let y1 = p.raw_y();
            let z1 = p.z0();
            let y2 = b.raw_y();
            let z2 = b.z0();

            let z2_is_one = z2.is_one();

            let u1 = z1.multiply(y2);
            let u2 = if z2_is_one { y1.clone() } else { y1.multiply(z2) };
            let u = u1.subtract(&u2);
            let v1 = z1.multiply(x2);
            let v2 = if z2_is_one { x1.clone() } else { x1.multiply(z2) };
            let v = v1.subtract(&v2);

            if v1 == v2 {
                if u1 == u2 {
                    return twice(p);
                }
                return Ok(curve.infinity());
            }

            let v_sq = v.square();
            let w = if z2_is_one { z1.clone() } else { z1.multiply(z2) };
            let a = u
                .square()
                .add(&u.multiply(&v).add(&v_sq.multiply(curve.a())))
                .multiply(&w)
                .add(&v.multiply(&v_sq));

            let x3 = v.multiply(&a);
            let v_sq_z2 = if z2_is_one { v_sq.clone() } else { v_sq.multiply(z2) };
            let y3 = v_sq_z2
                .multiply(&u.multiply(x1).add(&y1.multiply(&v)))
                .add(&a.multiply(&u.add(&v)));
            let z3 = v_sq.multiply(&v).multiply(&w);
            Ok(p.with_coords(x3, y3, vec![z3]))
        }

        CoordinateSystem::LambdaProjective => {
            if x1.is_zero() {
                if x2.is_zero() {
                    // Both operands are the order-2 point, which is its
                    // own inverse.
                    return Ok(curve.infinity());
                }
                // Put the order-2 operand second.
                return add_simple(b, p);
            }

            let l1 = p.raw_y();
            let z1 = p.z0();
            let l2 = b.raw_y();
            let z2 = b.z0();

            let z1_is_one = z1.is_one();
            let (u2, s2) = if z1_is_one {
                (x2.clone(), l2.clone())
            } else {
                (x2.multiply(z1), l2.multiply(z1))
            };

            let z2_is_one = z2.is_one();
            let (u1, s1) = if z2_is_one {
                (x1.clone(), l1.clone())
            } else {
                (x1.multiply(z2), l1.multiply(z2))
            };

            let a = s1.add(&s2);
            let bb = u1.add(&u2);

            if bb.is_zero() {
                if a.is_zero() {
                    return twice(p);
                }
                return Ok(curve.infinity());
            }

            if x2.is_zero() {
                // The addend is the order-2 point (0, sqrt(b)). Drop back
                // to an affine computation on normalized inputs and
                // re-wrap with Z = 1.
                let pn = p.normalize();
                let x1n = pn.raw_x().clone();
                let y1 = pn
                    .y_coord()
                    .expect("normalized non-infinity point has a y-coordinate");
                let y2 = b
                    .normalize()
                    .y_coord()
                    .expect("normalized non-infinity point has a y-coordinate");

                let l = y1.add(&y2).divide(&x1n);
                let x3 = l.square().add(&l).add(&x1n).add(curve.a());
                let y3 = l.multiply(&x1n.add(&x3)).add(&x3).add(&y1);
                let l3 = if x3.is_zero() {
                    y3
                } else {
                    y3.divide(&x3).add(&x3)
                };
                let z3 = curve.from_biguint(&BigUint::one());
                Ok(p.with_coords(x3, l3, vec![z3]))
            } else {
                let bb = bb.square();

                let au1 = a.multiply(&u1);
                let au2 = a.multiply(&u2);
                let mut abz2 = a.multiply(&bb);
                if !z2_is_one {
                    abz2 = abz2.multiply(z2);
                }

                let x3 = au1.multiply(&au2);
                let l3 = au2.add(&bb).square().add(&abz2.multiply(&l1.add(z1)));

                let mut z3 = abz2;
                if !z1_is_one {
                    z3 = z3.multiply(z1);
                }
                Ok(p.with_coords(x3, l3, vec![z3]))
            }
        }

        _ => Err(EcError::UnsupportedCoordinateSystem),
    }
}

pub(crate) fn twice(p: &Point) -> EcResult<Point> {
    if p.is_infinity() {
        return Ok(p.clone());
    }

    let curve = p.curve_ref();

    let x1 = p.raw_x();
    if x1.is_zero() {
        // A point with X = 0 is its own additive inverse.
        return Ok(curve.infinity());
    }

    match curve.coordinate_system() {
        CoordinateSystem::Affine => {
            let y1 = p.raw_y();

            let l1 = y1.divide(x1).add(x1);

            let x3 = l1.square().add(&l1).add(curve.a());
            let y3 = x1.square().add(&x3.multiply(&l1.add_one()));
            Ok(p.with_coords(x3, y3, Vec::new()))
        }

        CoordinateSystem::Homogeneous => {
            let y1 = p.raw_y();
            let z1 = p.z0();

            let z1_is_one = z1.is_one();
            let x1z1 = if z1_is_one { x1.clone() } else { x1.multiply(z1) };
            let y1z1 = if z1_is_one { y1.clone() } else { y1.multiply(z1) };

            let x1_sq = x1.square();
            let s = x1_sq.add(&y1z1);
            let v = x1z1;
            let v_squared = v.square();
            let h = s
                .square()
                .add(&s.multiply(&v))
                .add(&curve.a().multiply(&v_squared));

            let x3 = v.multiply(&h);
            let y3 = h.multiply(&s.add(&v)).add(&x1_sq.square().multiply(&v));
            let z3 = v.multiply(&v_squared);
            Ok(p.with_coords(x3, y3, vec![z3]))
        }

        CoordinateSystem::LambdaProjective => {
            let l1 = p.raw_y();
            let z1 = p.z0();

            let z1_is_one = z1.is_one();
            let l1z1 = if z1_is_one { l1.clone() } else { l1.multiply(z1) };
            let z1_sq = if z1_is_one { z1.clone() } else { z1.square() };
            let a = curve.a();
            let a_z1_sq = if z1_is_one { a.clone() } else { a.multiply(&z1_sq) };
            let t = l1.square().add(&l1z1).add(&a_z1_sq);

            let x3 = t.square();
            let z3 = if z1_is_one { t.clone() } else { t.multiply(&z1_sq) };

            // Two equivalent lambda expressions; pick the one that is
            // cheaper for this curve's b.
            let b_param = curve.b();
            let l3 = if b_param.bit_len() < (curve.field_size() >> 1) {
                let t1 = l1.add(x1).square();
                let t2 = a_z1_sq.square();
                let t3 = b_param.multiply(&z1_sq.square());
                t1.add(&t)
                    .add(&z1_sq)
                    .multiply(&t1)
                    .add(&t2.add(&t3))
                    .add(&x3)
                    .add(&a.add_one().multiply(&z3))
            } else {
                let x1z1 = if z1_is_one { x1.clone() } else { x1.multiply(z1) };
                x1z1.square().add(&x3).add(&t.multiply(&l1z1)).add(&z3)
            };
            Ok(p.with_coords(x3, l3, vec![z3]))
        }

        _ => Err(EcError::UnsupportedCoordinateSystem),
    }
}

pub(crate) fn twice_plus(p: &Point, b: &Point) -> EcResult<Point> {
    if p.is_infinity() {
        return Ok(b.clone());
    }
    if b.is_infinity() {
        return twice(p);
    }

    let curve = p.curve_ref();

    let x1 = p.raw_x();
    if x1.is_zero() {
        // 2P = O for the order-2 point, so 2P + Q = Q.
        return Ok(b.clone());
    }

    match curve.coordinate_system() {
        CoordinateSystem::LambdaProjective => {
            // Dedicated path only for a lambda-affine style addend
            // (Z2 = 1, X2 != 0).
            let x2 = b.raw_x();
            let z2 = match b.z_coords().first() {
                Some(z) => z,
                None => return twice(p)?.add(b),
            };
            if x2.is_zero() || !z2.is_one() {
                return twice(p)?.add(b);
            }

            let l1 = p.raw_y();
            let z1 = p.z0();
            let l2 = b.raw_y();

            let x1_sq = x1.square();
            let l1_sq = l1.square();
            let z1_sq = z1.square();
            let l1z1 = l1.multiply(z1);

            let t = curve.a().multiply(&z1_sq).add(&l1_sq).add(&l1z1);
            let l2_plus_1 = l2.add_one();
            let a = curve
                .a()
                .add(&l2_plus_1)
                .multiply(&z1_sq)
                .add(&l1_sq)
                .multiply(&t)
                .add(&x1_sq.multiply(&z1_sq));
            let x2z1_sq = x2.multiply(&z1_sq);
            let bb = x2z1_sq.add(&t).square();

            let x3 = a.square().multiply(&x2z1_sq);
            let z3 = a.multiply(&bb).multiply(&z1_sq);
            let l3 = a.add(&bb).square().multiply(&t).add(&l2_plus_1.multiply(&z3));
            Ok(p.with_coords(x3, l3, vec![z3]))
        }
        _ => twice(p)?.add(b),
    }
}

/// The Frobenius endomorphism: squares every coordinate. Identity on
/// infinity.
pub(crate) fn tau(p: &Point) -> EcResult<Point> {
    if p.is_infinity() {
        return Ok(p.clone());
    }

    let x1 = p.raw_x();
    let y1 = p.raw_y();

    match p.coordinate_system() {
        CoordinateSystem::Affine | CoordinateSystem::LambdaAffine => {
            Ok(p.with_coords(x1.square(), y1.square(), Vec::new()))
        }
        CoordinateSystem::Homogeneous | CoordinateSystem::LambdaProjective => {
            let z1 = p.z0();
            Ok(p.with_coords(x1.square(), y1.square(), vec![z1.square()]))
        }
        _ => Err(EcError::UnsupportedCoordinateSystem),
    }
}

/// Verifies the lambda-representation curve invariant:
/// (L^2 + L*Z + a*Z^2) * X^2 = b*Z^4 + X^4, with Y^2 = b*Z at X = 0.
pub(crate) fn check_lambda_equation(p: &Point) -> EcResult<()> {
    let curve = p.curve_ref();

    let z = match p.coordinate_system() {
        CoordinateSystem::LambdaAffine => curve.from_biguint(&BigUint::one()),
        CoordinateSystem::LambdaProjective => p.z0().clone(),
        _ => return Ok(()),
    };

    let x = p.raw_x();
    if x.is_zero() {
        // At X = 0 the y slot holds the affine y, not lambda.
        let y = p.raw_y();
        if y.square() != curve.b().multiply(&z) {
            return Err(EcError::InvariantViolation(
                "order-2 lambda point does not satisfy y^2 = b*z".to_string(),
            ));
        }
        return Ok(());
    }

    let l = p.raw_y();
    let x_sq = x.square();
    let z_sq = z.square();

    let lhs = l
        .square()
        .add(&l.multiply(&z))
        .add(&curve.a().multiply(&z_sq))
        .multiply(&x_sq);
    let rhs = z_sq.square().multiply(curve.b()).add(&x_sq.square());

    if lhs == rhs {
        Ok(())
    } else {
        Err(EcError::InvariantViolation(
            "lambda-projective invariant broken".to_string(),
        ))
    }
}
