#![allow(dead_code)]

//! Shared fixtures: P-256 for the prime-field suites, sect233k1
//! parameters for the binary-field suites.

use weierstrass::{BigUint, CoordinateSystem, Curve, Point};

pub const P256_P: &str = "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";
pub const P256_A: &str = "ffffffff00000001000000000000000000000000fffffffffffffffffffffffc";
pub const P256_B: &str = "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b";
pub const P256_GX: &str = "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
pub const P256_GY: &str = "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";
pub const P256_N: &str = "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551";
pub const P256_2G_X: &str = "7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978";
pub const P256_2G_Y: &str = "07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1";

pub fn hex(s: &str) -> BigUint {
    BigUint::from_hex(s).unwrap()
}

pub fn p256(coord: CoordinateSystem) -> Curve {
    Curve::new_prime(
        hex(P256_P),
        hex(P256_A),
        hex(P256_B),
        Some(hex(P256_N)),
        Some(BigUint::one()),
        coord,
    )
    .unwrap()
}

pub fn p256_generator(curve: &Curve) -> Point {
    curve.create_point(&hex(P256_GX), &hex(P256_GY)).unwrap()
}

/// sect233k1 field polynomial: x^233 + x^74 + 1.
pub fn sect233k1_poly() -> BigUint {
    let mut poly = BigUint::one();
    poly.set_bit(74);
    poly.set_bit(233);
    poly
}

pub fn sect233k1(coord: CoordinateSystem) -> Curve {
    Curve::new_binary(
        233,
        sect233k1_poly(),
        BigUint::zero(),
        BigUint::one(),
        None,
        Some(BigUint::from_u64(4)),
        coord,
    )
    .unwrap()
}

/// A base point on sect233k1, derived on-curve by scanning small
/// x-coordinates through compressed-point decoding.
///
/// Candidates in the cofactor subgroup (order dividing 4, e.g. the
/// (1, 0) point) are skipped so the base has large order.
pub fn sect233k1_base(curve: &Curve) -> Point {
    let width = (233 + 7) / 8;
    for x in 1u64..200 {
        let mut enc = vec![0x02];
        enc.extend(BigUint::from_u64(x).to_bytes_be_padded(width));
        if let Ok(p) = curve.decode_point(&enc) {
            if !p.times_pow2(2).unwrap().is_infinity() {
                return p;
            }
        }
    }
    panic!("no sect233k1 base point in the scanned range");
}

pub const FP_COORDS: [CoordinateSystem; 4] = [
    CoordinateSystem::Affine,
    CoordinateSystem::Homogeneous,
    CoordinateSystem::Jacobian,
    CoordinateSystem::JacobianModified,
];

pub const F2M_COORDS: [CoordinateSystem; 3] = [
    CoordinateSystem::Affine,
    CoordinateSystem::Homogeneous,
    CoordinateSystem::LambdaProjective,
];

/// One (curve, base point) fixture per prime-field coordinate system.
pub fn fp_fixtures() -> Vec<(Curve, Point)> {
    FP_COORDS
        .iter()
        .map(|&coord| {
            let curve = p256(coord);
            let g = p256_generator(&curve);
            (curve, g)
        })
        .collect()
}

/// One (curve, base point) fixture per binary-field coordinate system.
pub fn f2m_fixtures() -> Vec<(Curve, Point)> {
    F2M_COORDS
        .iter()
        .map(|&coord| {
            let curve = sect233k1(coord);
            let g = sect233k1_base(&curve);
            (curve, g)
        })
        .collect()
}
