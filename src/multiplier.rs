use crate::bigint::BigUint;
use crate::error::{EcError, EcResult};
use crate::point::Point;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Scalar multiplication strategy.
///
/// Implementations may only use the public point operations; windowed and
/// NAF strategies can cache per-point tables through the [`PreComp`]
/// slot.
pub trait EcMultiplier: Send + Sync {
    /// Computes `k * p`.
    fn multiply(&self, p: &Point, k: &BigUint) -> EcResult<Point>;
}

/// Plain double-and-add over the scalar bits, least significant first.
pub struct BasicMultiplier;

impl EcMultiplier for BasicMultiplier {
    fn multiply(&self, p: &Point, k: &BigUint) -> EcResult<Point> {
        let curve = p
            .curve()
            .ok_or_else(|| EcError::invalid("cannot multiply a detached point"))?;
        let mut result = curve.infinity();
        if k.is_zero() || p.is_infinity() {
            return Ok(result);
        }

        let bits = k.bit_len();
        let mut base = p.clone();
        for i in 0..bits {
            if k.get_bit(i) {
                result = result.add(&base)?;
            }
            if i + 1 < bits {
                base = base.twice()?;
            }
        }
        Ok(result)
    }
}

/// Opaque precomputation attached to a point by a multiplier.
///
/// The tag identifies the producer so unrelated multipliers do not read
/// each other's caches; the payload is producer-defined.
#[derive(Clone)]
pub struct PreComp {
    producer: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl PreComp {
    pub fn new(producer: &'static str, value: Arc<dyn Any + Send + Sync>) -> PreComp {
        PreComp { producer, value }
    }

    pub fn producer(&self) -> &'static str {
        self.producer
    }

    pub fn value(&self) -> Arc<dyn Any + Send + Sync> {
        Arc::clone(&self.value)
    }
}

impl fmt::Debug for PreComp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreComp")
            .field("producer", &self.producer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CoordinateSystem, Curve};

    fn f97_curve() -> Curve {
        Curve::new_prime(
            BigUint::from_u64(97),
            BigUint::from_u64(2),
            BigUint::from_u64(3),
            None,
            None,
            CoordinateSystem::Affine,
        )
        .unwrap()
    }

    #[test]
    fn multiply_small_scalars() {
        let curve = f97_curve();
        let p = curve
            .create_point(&BigUint::from_u64(3), &BigUint::from_u64(6))
            .unwrap();

        assert_eq!(p.multiply(&BigUint::zero()).unwrap(), curve.infinity());
        assert_eq!(p.multiply(&BigUint::one()).unwrap(), p);
        assert_eq!(
            p.multiply(&BigUint::from_u64(2)).unwrap(),
            p.twice().unwrap()
        );
        assert_eq!(
            p.multiply(&BigUint::from_u64(3)).unwrap(),
            p.twice().unwrap().add(&p).unwrap()
        );
    }

    #[test]
    fn multiply_infinity_is_infinity() {
        let curve = f97_curve();
        let inf = curve.infinity();
        assert_eq!(inf.multiply(&BigUint::from_u64(12345)).unwrap(), inf);
    }

    #[test]
    fn multiply_distributes_over_addition() {
        let curve = f97_curve();
        let p = curve
            .create_point(&BigUint::from_u64(3), &BigUint::from_u64(6))
            .unwrap();
        // (2 + 3) * P = 2P + 3P
        let lhs = p.multiply(&BigUint::from_u64(5)).unwrap();
        let rhs = p
            .multiply(&BigUint::from_u64(2))
            .unwrap()
            .add(&p.multiply(&BigUint::from_u64(3)).unwrap())
            .unwrap();
        assert_eq!(lhs, rhs);
    }
}
