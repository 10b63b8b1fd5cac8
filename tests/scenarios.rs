//! End-to-end scenarios on standard curve parameters.

mod common;

use common::*;
use weierstrass::{field, BigUint, CoordinateSystem};

// G + G in affine and Jacobian coordinates agree, and the x-coordinate
// matches the published 2G.
#[test]
fn s1_p256_doubling_matches_published_value() {
    let affine = p256(CoordinateSystem::Affine);
    let jacobian = p256(CoordinateSystem::Jacobian);

    let two_g_affine = {
        let g = p256_generator(&affine);
        g.add(&g.clone()).unwrap()
    };
    let two_g_jacobian = {
        let g = p256_generator(&jacobian);
        g.add(&g.clone()).unwrap().normalize()
    };

    assert_eq!(two_g_affine, two_g_jacobian);
    assert_eq!(
        two_g_jacobian.affine_x_coord().unwrap().to_biguint(),
        hex(P256_2G_X)
    );
    assert_eq!(
        two_g_jacobian.affine_y_coord().unwrap().to_biguint(),
        hex(P256_2G_Y)
    );
}

#[test]
fn s2_infinity_idempotence() {
    for coord in FP_COORDS {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        let inf = curve.infinity();

        assert!(g.add(&g.negate()).unwrap().is_infinity(), "{:?}", coord);
        assert!(inf.add(&inf).unwrap().is_infinity(), "{:?}", coord);
        assert!(inf.twice().unwrap().is_infinity(), "{:?}", coord);
        assert!(
            inf.multiply(&BigUint::from_u64(123_456)).unwrap().is_infinity(),
            "{:?}",
            coord
        );
    }
}

// Multiplying the generator by the group order lands on infinity; by
// order - 1 on the negated generator.
#[test]
fn s3_p256_order_annihilates_generator() {
    for coord in [
        CoordinateSystem::Jacobian,
        CoordinateSystem::JacobianModified,
    ] {
        let curve = p256(coord);
        let g = p256_generator(&curve);
        let n = curve.order().unwrap().clone();

        assert!(g.multiply(&n).unwrap().is_infinity(), "{:?}", coord);

        let n_minus_1 = &n - &BigUint::one();
        assert_eq!(g.multiply(&n_minus_1).unwrap(), g.negate(), "{:?}", coord);
    }
}

#[test]
fn s4_p256_encodings() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);

    let compressed = g.get_encoded(true);
    assert_eq!(compressed.len(), 33);
    // The P-256 generator has an odd y.
    assert_eq!(compressed[0], 0x03);
    assert_eq!(&compressed[1..], hex(P256_GX).to_bytes_be_padded(32));

    let uncompressed = g.get_encoded(false);
    assert_eq!(uncompressed.len(), 65);
    assert_eq!(uncompressed[0], 0x04);
    assert_eq!(&uncompressed[1..33], hex(P256_GX).to_bytes_be_padded(32));
    assert_eq!(&uncompressed[33..], hex(P256_GY).to_bytes_be_padded(32));

    assert_eq!(curve.infinity().get_encoded(true), vec![0]);
    assert_eq!(curve.infinity().get_encoded(false), vec![0]);
}

// 100 doublings in lambda-projective coordinates produce the same bytes
// as 100 doublings in affine coordinates.
#[test]
fn s5_sect233k1_lambda_round_trip() {
    let affine = sect233k1(CoordinateSystem::Affine);
    let lambda = sect233k1(CoordinateSystem::LambdaProjective);

    let base = sect233k1_base(&affine);
    let base_lambda = lambda.import_point(&base).unwrap();

    let affine_result = base.times_pow2(100).unwrap();
    let lambda_result = base_lambda.times_pow2(100).unwrap().normalize();

    assert_eq!(
        affine_result.get_encoded(false),
        lambda_result.get_encoded(false)
    );
    assert_eq!(affine_result, lambda_result);
}

// Batch normalization of ten Jacobian multiples matches individual
// normalization and costs exactly one field inversion.
#[test]
fn s6_batch_normalize_counts_one_inversion() {
    let curve = p256(CoordinateSystem::Jacobian);
    let g = p256_generator(&curve);

    let mut points = Vec::new();
    for k in 1..=10u64 {
        points.push(g.multiply(&BigUint::from_u64(k * 7 + 1)).unwrap());
    }
    let individually: Vec<_> = points.iter().map(|p| p.normalize()).collect();

    field::reset_inversion_count();
    curve.normalize_all(&mut points).unwrap();
    assert_eq!(field::inversion_count(), 1);

    for (batch, single) in points.iter().zip(individually.iter()) {
        assert!(batch.is_normalized());
        assert_eq!(batch, single);
    }
}
