use crate::bigint::BigUint;
use crate::binary_field::BinaryFieldElement;
use std::cell::Cell;
use std::fmt;

thread_local! {
    static INVERSION_COUNT: Cell<u64> = const { Cell::new(0) };
}

/// Number of field inversions performed on this thread since the last
/// reset. Division counts as one inversion. Batch normalization is
/// expected to cost exactly one regardless of batch size.
pub fn inversion_count() -> u64 {
    INVERSION_COUNT.with(|c| c.get())
}

/// Resets the per-thread inversion counter.
pub fn reset_inversion_count() {
    INVERSION_COUNT.with(|c| c.set(0));
}

fn record_inversion() {
    INVERSION_COUNT.with(|c| c.set(c.get() + 1));
}

/// Element of a prime field F_p.
///
/// Carries its modulus alongside the reduced value, so elements of
/// different fields can coexist and guard against being mixed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimeFieldElement {
    value: BigUint,
    modulus: BigUint,
}

impl PrimeFieldElement {
    /// Creates an element, reducing `value` modulo `modulus`.
    pub fn new(value: BigUint, modulus: BigUint) -> Self {
        let value = &value % &modulus;
        PrimeFieldElement { value, modulus }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    pub fn same_field(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }

    fn check_same_field(&self, other: &Self) {
        if !self.same_field(other) {
            panic!("cannot combine elements of different prime fields");
        }
    }

    fn with_value(&self, value: BigUint) -> Self {
        PrimeFieldElement {
            value,
            modulus: self.modulus.clone(),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        self.check_same_field(other);
        self.with_value(self.value.add_mod(&other.value, &self.modulus))
    }

    pub fn subtract(&self, other: &Self) -> Self {
        self.check_same_field(other);
        self.with_value(self.value.sub_mod(&other.value, &self.modulus))
    }

    pub fn multiply(&self, other: &Self) -> Self {
        self.check_same_field(other);
        self.with_value(self.value.mul_mod(&other.value, &self.modulus))
    }

    pub fn square(&self) -> Self {
        self.with_value(self.value.mul_mod(&self.value, &self.modulus))
    }

    pub fn negate(&self) -> Self {
        if self.value.is_zero() {
            self.clone()
        } else {
            self.with_value(&self.modulus - &self.value)
        }
    }

    pub fn add_one(&self) -> Self {
        self.with_value(self.value.add_mod(&BigUint::one(), &self.modulus))
    }

    /// Multiplicative inverse, or `None` for zero.
    pub fn inverse(&self) -> Option<Self> {
        self.value
            .inv_mod(&self.modulus)
            .map(|inv| self.with_value(inv))
    }

    /// A square root of this element, or `None` when it is a non-residue.
    ///
    /// Only moduli with p = 3 (mod 4) are supported (root by raising to
    /// (p+1)/4); other primes return `None`.
    pub fn sqrt(&self) -> Option<Self> {
        if !(self.modulus.get_bit(0) && self.modulus.get_bit(1)) {
            return None;
        }
        let exp = &(&self.modulus + &BigUint::one()) >> 2;
        let root = self.with_value(self.value.pow_mod(&exp, &self.modulus));
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }

    pub fn bit_len(&self) -> usize {
        self.value.bit_len()
    }

    pub fn test_bit_zero(&self) -> bool {
        self.value.get_bit(0)
    }
}

impl fmt::Display for PrimeFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A field element of either supported family.
///
/// Closed two-variant dispatch: the variant tag doubles as the curve
/// family discriminant, so point arithmetic can branch on
/// (family, coordinate system) without trait objects or per-operation
/// allocation beyond the word vectors themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldElement {
    /// Prime-field element (F_p).
    Fp(PrimeFieldElement),
    /// Binary-field element (F_2^m).
    F2m(BinaryFieldElement),
}

impl FieldElement {
    pub fn is_zero(&self) -> bool {
        match self {
            FieldElement::Fp(e) => e.is_zero(),
            FieldElement::F2m(e) => e.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            FieldElement::Fp(e) => e.is_one(),
            FieldElement::F2m(e) => e.is_one(),
        }
    }

    /// True for binary-field (F_2^m) elements.
    pub fn is_binary(&self) -> bool {
        matches!(self, FieldElement::F2m(_))
    }

    /// True when both elements belong to the same field.
    pub fn same_field(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldElement::Fp(a), FieldElement::Fp(b)) => a.same_field(b),
            (FieldElement::F2m(a), FieldElement::F2m(b)) => a.same_field(b),
            _ => false,
        }
    }

    fn binary_op(
        &self,
        other: &Self,
        fp: impl FnOnce(&PrimeFieldElement, &PrimeFieldElement) -> PrimeFieldElement,
        f2m: impl FnOnce(&BinaryFieldElement, &BinaryFieldElement) -> BinaryFieldElement,
    ) -> Self {
        match (self, other) {
            (FieldElement::Fp(a), FieldElement::Fp(b)) => FieldElement::Fp(fp(a, b)),
            (FieldElement::F2m(a), FieldElement::F2m(b)) => FieldElement::F2m(f2m(a, b)),
            _ => panic!("cannot combine elements of different field families"),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        self.binary_op(other, PrimeFieldElement::add, BinaryFieldElement::add)
    }

    pub fn subtract(&self, other: &Self) -> Self {
        self.binary_op(
            other,
            PrimeFieldElement::subtract,
            BinaryFieldElement::subtract,
        )
    }

    pub fn multiply(&self, other: &Self) -> Self {
        self.binary_op(
            other,
            PrimeFieldElement::multiply,
            BinaryFieldElement::multiply,
        )
    }

    pub fn square(&self) -> Self {
        match self {
            FieldElement::Fp(e) => FieldElement::Fp(e.square()),
            FieldElement::F2m(e) => FieldElement::F2m(e.square()),
        }
    }

    /// Multiplicative inverse.
    ///
    /// Panics when called on zero; callers branch on the algebraic special
    /// cases before inverting.
    pub fn invert(&self) -> Self {
        record_inversion();
        match self {
            FieldElement::Fp(e) => FieldElement::Fp(
                e.inverse()
                    .expect("attempted to invert the zero field element"),
            ),
            FieldElement::F2m(e) => FieldElement::F2m(
                e.inverse()
                    .expect("attempted to invert the zero field element"),
            ),
        }
    }

    /// `self / other` as multiplication by the inverse; one inversion.
    pub fn divide(&self, other: &Self) -> Self {
        self.multiply(&other.invert())
    }

    pub fn negate(&self) -> Self {
        match self {
            FieldElement::Fp(e) => FieldElement::Fp(e.negate()),
            FieldElement::F2m(e) => FieldElement::F2m(e.negate()),
        }
    }

    pub fn add_one(&self) -> Self {
        match self {
            FieldElement::Fp(e) => FieldElement::Fp(e.add_one()),
            FieldElement::F2m(e) => FieldElement::F2m(e.add_one()),
        }
    }

    /// A square root, when one exists in the field.
    pub fn sqrt(&self) -> Option<Self> {
        match self {
            FieldElement::Fp(e) => e.sqrt().map(FieldElement::Fp),
            FieldElement::F2m(e) => Some(FieldElement::F2m(e.sqrt())),
        }
    }

    /// Solves `z^2 + z = self`; binary fields only.
    pub fn solve_quadratic(&self) -> Option<Self> {
        match self {
            FieldElement::Fp(_) => None,
            FieldElement::F2m(e) => e.solve_quadratic().map(FieldElement::F2m),
        }
    }

    /// Bit length of the canonical representative.
    pub fn bit_len(&self) -> usize {
        match self {
            FieldElement::Fp(e) => e.bit_len(),
            FieldElement::F2m(e) => e.bit_len(),
        }
    }

    /// Low bit of the canonical representative.
    pub fn test_bit_zero(&self) -> bool {
        match self {
            FieldElement::Fp(e) => e.test_bit_zero(),
            FieldElement::F2m(e) => e.test_bit_zero(),
        }
    }

    /// The canonical representative as an integer.
    pub fn to_biguint(&self) -> BigUint {
        match self {
            FieldElement::Fp(e) => e.value().clone(),
            FieldElement::F2m(e) => e.value().clone(),
        }
    }

    /// Bit size of the containing field: bits of p, or the extension
    /// degree m.
    pub fn field_size(&self) -> usize {
        match self {
            FieldElement::Fp(e) => e.modulus().bit_len(),
            FieldElement::F2m(e) => e.degree() as usize,
        }
    }

    /// Fixed-width big-endian encoding, width = ceil(field_size / 8).
    pub fn encoded(&self) -> Vec<u8> {
        let width = (self.field_size() + 7) / 8;
        self.to_biguint().to_bytes_be_padded(width)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldElement::Fp(e) => write!(f, "{}", e),
            FieldElement::F2m(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f97(v: u64) -> FieldElement {
        FieldElement::Fp(PrimeFieldElement::new(
            BigUint::from_u64(v),
            BigUint::from_u64(97),
        ))
    }

    #[test]
    fn prime_field_arithmetic() {
        let a = f97(90);
        let b = f97(15);

        assert_eq!(a.add(&b), f97(8));
        assert_eq!(a.subtract(&b), f97(75));
        assert_eq!(b.subtract(&a), f97(22));
        assert_eq!(a.multiply(&b), f97(1350 % 97));
        assert_eq!(a.square(), f97(90 * 90 % 97));
        assert_eq!(a.negate(), f97(7));
        assert_eq!(f97(0).negate(), f97(0));
        assert_eq!(a.add_one(), f97(91));
    }

    #[test]
    fn invert_and_divide() {
        reset_inversion_count();
        let a = f97(13);
        let inv = a.invert();
        assert!(a.multiply(&inv).is_one());
        assert_eq!(inversion_count(), 1);

        let b = f97(5);
        assert_eq!(a.divide(&b).multiply(&b), a);
        assert_eq!(inversion_count(), 2);
    }

    #[test]
    #[should_panic(expected = "invert the zero")]
    fn invert_zero_panics() {
        let _ = f97(0).invert();
    }

    #[test]
    fn sqrt_on_residues() {
        // 97 = 1 (mod 4): unsupported by the (p+1)/4 route
        assert!(f97(4).sqrt().is_none());

        // 103 = 3 (mod 4)
        let p = BigUint::from_u64(103);
        let a = FieldElement::Fp(PrimeFieldElement::new(BigUint::from_u64(5), p.clone()));
        let sq = a.square();
        let root = sq.sqrt().unwrap();
        assert_eq!(root.square(), sq);

        // A non-residue has no root.
        let mut found_none = false;
        for v in 1..103u64 {
            let e = FieldElement::Fp(PrimeFieldElement::new(BigUint::from_u64(v), p.clone()));
            if e.sqrt().is_none() {
                found_none = true;
                break;
            }
        }
        assert!(found_none);
    }

    #[test]
    fn encoded_is_fixed_width() {
        let p = BigUint::from_hex(
            "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        )
        .unwrap();
        let small = FieldElement::Fp(PrimeFieldElement::new(BigUint::from_u64(5), p));
        let bytes = small.encoded();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 5);
        assert!(bytes[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn family_and_field_guards() {
        let a = f97(1);
        let b = FieldElement::F2m(BinaryFieldElement::new(
            BigUint::one(),
            4,
            BigUint::from_u64(0b10011),
        ));
        assert!(!a.same_field(&b));
        assert_ne!(a, b);
        assert!(b.is_binary());
        assert_eq!(b.field_size(), 4);
    }

    #[test]
    #[should_panic(expected = "different field families")]
    fn mixed_family_arithmetic_panics() {
        let a = f97(1);
        let b = FieldElement::F2m(BinaryFieldElement::new(
            BigUint::one(),
            4,
            BigUint::from_u64(0b10011),
        ));
        let _ = a.add(&b);
    }
}
