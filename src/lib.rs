//! # weierstrass - Elliptic Curve Point Arithmetic
//!
//! A library for point arithmetic on short-Weierstrass elliptic curves
//! over prime fields (F_p) and binary fields (F_2^m), under several
//! projective coordinate systems chosen to trade field multiplications,
//! squarings and inversions.
//!
//! ## Features
//!
//! - **Big Integer Arithmetic**: Arbitrary precision unsigned integers
//! - **Prime Fields (F_p)**: Modular arithmetic behind an opaque element type
//! - **Binary Fields (F_2^m)**: Polynomial-basis arithmetic in characteristic 2
//! - **Curves and Points**: Immutable curve parameters and value-semantic points
//! - **Coordinate Systems**: Affine, homogeneous, Jacobian, modified-Jacobian
//!   and lambda representations, all producing the same group elements
//! - **Batch Normalization**: Montgomery's simultaneous-inversion trick
//! - **SEC1 Encoding**: Compressed and uncompressed point encoding/decoding
//! - **Serialization**: JSON interop via serde with base 10/16/64 numerics
//!
//! ## Quick Start
//!
//! ```rust
//! use weierstrass::{BigUint, CoordinateSystem, Curve};
//!
//! // y^2 = x^3 + 2x + 3 over F_97, doing its arithmetic in Jacobian
//! // coordinates
//! let curve = Curve::new_prime(
//!     BigUint::from_u64(97),
//!     BigUint::from_u64(2),
//!     BigUint::from_u64(3),
//!     None,
//!     None,
//!     CoordinateSystem::Jacobian,
//! )
//! .unwrap();
//!
//! let g = curve
//!     .create_point(&BigUint::from_u64(3), &BigUint::from_u64(6))
//!     .unwrap();
//!
//! // Group operations return new points; normalize to read affine values.
//! let three_g = g.twice_plus(&g).unwrap().normalize();
//! assert_eq!(three_g, g.multiply(&BigUint::from_u64(3)).unwrap());
//! ```
//!
//! ## Module Overview
//!
//! - [`bigint`] - Arbitrary precision unsigned integers
//! - [`field`] - The two-family field element type (F_p / F_2^m)
//! - [`binary_field`] - Binary field arithmetic (F_2^m)
//! - [`curve`] - Curve parameters, coordinate systems, batch utilities
//! - [`point`] - Points and the representation-independent operations
//! - [`multiplier`] - Scalar multiplication glue and precomputation slots
//! - [`error`] - Error kinds surfaced by curve and point operations
//! - [`serialization`] - JSON/hex interoperability

pub mod bigint;
pub mod binary_field;
pub mod curve;
pub mod error;
pub mod field;
pub mod multiplier;
pub mod point;
mod point_f2m;
mod point_fp;
pub mod serialization;

pub use bigint::BigUint;
pub use binary_field::BinaryFieldElement;
pub use curve::{CoordinateSystem, Curve, FieldSpec};
pub use error::{EcError, EcResult};
pub use field::{FieldElement, PrimeFieldElement};
pub use multiplier::{BasicMultiplier, EcMultiplier, PreComp};
pub use point::Point;
pub use serialization::{SerializableCurve, SerializablePoint, SerializationFormat};
