use crate::bigint::BigUint;
use std::fmt;
use std::mem;

/// Element of a binary field F_2^m in polynomial basis.
///
/// The value is a polynomial over F_2 whose coefficient bits live in a
/// [`BigUint`]; bit `i` is the coefficient of `x^i`. Every element carries
/// its field description (extension degree `m` and the full reduction
/// polynomial including the `x^m` term), and all arithmetic reduces
/// modulo that polynomial. Addition and subtraction are both XOR.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryFieldElement {
    value: BigUint,
    m: u32,
    irreducible: BigUint,
}

impl BinaryFieldElement {
    /// Creates an element, reducing `value` modulo the irreducible
    /// polynomial.
    ///
    /// Panics if the polynomial's degree is not exactly `m`.
    pub fn new(value: BigUint, m: u32, irreducible: BigUint) -> Self {
        if irreducible.bit_len() != m as usize + 1 {
            panic!("irreducible polynomial must have degree m");
        }
        BinaryFieldElement {
            value: reduce(value, m, &irreducible),
            m,
            irreducible,
        }
    }

    pub fn zero(m: u32, irreducible: BigUint) -> Self {
        Self::new(BigUint::zero(), m, irreducible)
    }

    pub fn one(m: u32, irreducible: BigUint) -> Self {
        Self::new(BigUint::one(), m, irreducible)
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Extension degree m of the field F_2^m.
    pub fn degree(&self) -> u32 {
        self.m
    }

    pub fn irreducible(&self) -> &BigUint {
        &self.irreducible
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// True when both elements belong to the same field F_2^m.
    pub fn same_field(&self, other: &Self) -> bool {
        self.m == other.m && self.irreducible == other.irreducible
    }

    fn check_same_field(&self, other: &Self) {
        if !self.same_field(other) {
            panic!("cannot combine elements of different binary fields");
        }
    }

    fn with_value(&self, value: BigUint) -> Self {
        BinaryFieldElement {
            value,
            m: self.m,
            irreducible: self.irreducible.clone(),
        }
    }

    /// Addition is coefficient-wise XOR.
    pub fn add(&self, other: &Self) -> Self {
        self.check_same_field(other);
        self.with_value(&self.value ^ &other.value)
    }

    /// Subtraction coincides with addition in characteristic 2.
    pub fn subtract(&self, other: &Self) -> Self {
        self.add(other)
    }

    /// Negation is the identity in characteristic 2.
    pub fn negate(&self) -> Self {
        self.clone()
    }

    pub fn add_one(&self) -> Self {
        self.with_value(&self.value ^ &BigUint::one())
    }

    /// Carry-less product reduced modulo the irreducible polynomial.
    pub fn multiply(&self, other: &Self) -> Self {
        self.check_same_field(other);
        let product = poly_mul(&self.value, &other.value);
        self.with_value(reduce(product, self.m, &self.irreducible))
    }

    pub fn square(&self) -> Self {
        self.with_value(reduce(
            poly_mul(&self.value, &self.value),
            self.m,
            &self.irreducible,
        ))
    }

    /// Multiplicative inverse by the extended Euclidean algorithm over
    /// F_2[x], or `None` for zero.
    pub fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        let mut u = self.value.clone();
        let mut v = self.irreducible.clone();
        let mut g1 = BigUint::one();
        let mut g2 = BigUint::zero();

        while !u.is_one() {
            if u.is_zero() {
                return None;
            }
            let mut j = u.bit_len() as isize - v.bit_len() as isize;
            if j < 0 {
                mem::swap(&mut u, &mut v);
                mem::swap(&mut g1, &mut g2);
                j = -j;
            }
            u = &u ^ &(&v << j as usize);
            g1 = &g1 ^ &(&g2 << j as usize);
        }

        Some(self.with_value(reduce(g1, self.m, &self.irreducible)))
    }

    /// Square root: squaring is a bijection on F_2^m, so the root is the
    /// (m-1)-fold square.
    pub fn sqrt(&self) -> Self {
        let mut r = self.clone();
        for _ in 1..self.m {
            r = r.square();
        }
        r
    }

    /// Absolute trace Tr(c) = c + c^2 + c^4 + ... + c^(2^(m-1)), an
    /// element of F_2.
    pub fn trace(&self) -> bool {
        let mut t = self.clone();
        let mut acc = self.clone();
        for _ in 1..self.m {
            t = t.square();
            acc = acc.add(&t);
        }
        acc.is_one()
    }

    /// Half-trace H(c) = sum of c^(2^(2i)) for i in 0..=(m-1)/2; for odd m
    /// this solves z^2 + z = c whenever Tr(c) = 0.
    fn half_trace(&self) -> Self {
        let mut t = self.clone();
        let mut acc = self.clone();
        for _ in 0..(self.m - 1) / 2 {
            t = t.square().square();
            acc = acc.add(&t);
        }
        acc
    }

    /// Solves `z^2 + z = self`, returning one of the two roots (the other
    /// is `z + 1`). `None` when no solution exists or m is even.
    pub fn solve_quadratic(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(self.with_value(BigUint::zero()));
        }
        if self.m % 2 == 0 {
            return None;
        }
        let z = self.half_trace();
        if z.square().add(&z) == *self {
            Some(z)
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

/// Carry-less polynomial product over F_2, no reduction.
fn poly_mul(a: &BigUint, b: &BigUint) -> BigUint {
    let mut acc = BigUint::zero();
    let mut shifted = a.clone();
    for i in 0..b.bit_len() {
        if b.get_bit(i) {
            acc = &acc ^ &shifted;
        }
        shifted = &shifted << 1;
    }
    acc
}

/// Reduces a polynomial modulo the degree-m irreducible, cancelling the
/// top term with a shifted copy until the degree drops below m.
fn reduce(value: BigUint, m: u32, irreducible: &BigUint) -> BigUint {
    let mut v = value;
    while v.bit_len() > m as usize {
        let shift = v.bit_len() - (m as usize + 1);
        v = &v ^ &(irreducible << shift);
    }
    v
}

impl fmt::Display for BinaryFieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // F_2^4 with x^4 + x + 1
    fn gf16(v: u64) -> BinaryFieldElement {
        BinaryFieldElement::new(BigUint::from_u64(v), 4, BigUint::from_u64(0b10011))
    }

    #[test]
    fn addition_is_xor_and_self_inverse() {
        let a = gf16(0b0011);
        let b = gf16(0b0101);
        assert_eq!(a.add(&b), gf16(0b0110));
        assert!(a.add(&a).is_zero());
        assert_eq!(a.subtract(&b), a.add(&b));
        assert_eq!(a.negate(), a);
    }

    #[test]
    fn multiplication_reduces() {
        // (x+1)(x^2+1) = x^3 + x^2 + x + 1, below the reduction threshold
        assert_eq!(gf16(0b0011).multiply(&gf16(0b0101)), gf16(0b1111));
        // x^3 * x = x^4 = x + 1 mod (x^4 + x + 1)
        assert_eq!(gf16(0b1000).multiply(&gf16(0b0010)), gf16(0b0011));
    }

    #[test]
    fn square_matches_multiply() {
        for v in 0..16u64 {
            let a = gf16(v);
            assert_eq!(a.square(), a.multiply(&a));
        }
    }

    #[test]
    fn inverse_of_every_nonzero_element() {
        for v in 1..16u64 {
            let a = gf16(v);
            let inv = a.inverse().unwrap();
            assert!(a.multiply(&inv).is_one(), "failed for {}", v);
        }
        assert!(gf16(0).inverse().is_none());
    }

    #[test]
    fn sqrt_inverts_square() {
        for v in 0..16u64 {
            let a = gf16(v);
            assert_eq!(a.square().sqrt(), a);
        }
    }

    #[test]
    fn trace_splits_field_in_half() {
        // Over F_2^m exactly half the elements have trace 0.
        let count = (0..16u64).filter(|&v| gf16(v).trace()).count();
        assert_eq!(count, 8);
    }

    #[test]
    fn solve_quadratic_on_large_field() {
        // sect233k1 field: x^233 + x^74 + 1
        let mut irr = BigUint::one();
        irr.set_bit(74);
        irr.set_bit(233);
        let c = BinaryFieldElement::new(BigUint::from_u64(0x1234_5678), 233, irr);

        // z^2 + z always has solvable image: build beta from a known z.
        let z = c.multiply(&c).add(&c.sqrt());
        let beta = z.square().add(&z);
        let solved = beta.solve_quadratic().unwrap();
        assert!(solved == z || solved == z.add_one());
    }

    #[test]
    #[should_panic(expected = "different binary fields")]
    fn mixed_field_arithmetic_panics() {
        let a = gf16(3);
        let b = BinaryFieldElement::new(BigUint::from_u64(3), 3, BigUint::from_u64(0b1011));
        let _ = a.add(&b);
    }

    #[test]
    #[should_panic(expected = "degree m")]
    fn bad_irreducible_panics() {
        let _ = BinaryFieldElement::new(BigUint::one(), 5, BigUint::from_u64(0b10011));
    }
}
