use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::{Mul, Neg},
};

use rug::{ops::Pow, Integer as ArbitraryPrecisionInteger};

use crate::utils;

use super::{rational::Rational, InternalOrdering};

/// Trial division is used up to this bound when extracting square factors.
/// The remaining cofactor is only tested for being a perfect square.
const TRIAL_DIVISION_LIMIT: u32 = 1 << 12;

/// An arbitrary-precision integer. Values that fit in an `i64` are always
/// stored as [Integer::Natural], so that structural equality is value equality.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Integer {
    Natural(i64),
    Large(ArbitraryPrecisionInteger),
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::Natural(value)
    }
}

impl From<ArbitraryPrecisionInteger> for Integer {
    fn from(value: ArbitraryPrecisionInteger) -> Self {
        Integer::from_large(value)
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Integer::Natural(n) => n.fmt(f),
            Integer::Large(r) => r.fmt(f),
        }
    }
}

impl Integer {
    pub fn new(num: i64) -> Integer {
        Integer::Natural(num)
    }

    pub fn zero() -> Integer {
        Integer::Natural(0)
    }

    pub fn one() -> Integer {
        Integer::Natural(1)
    }

    /// Create an integer from an arbitrary-precision integer, downcasting when possible.
    pub fn from_large(r: ArbitraryPrecisionInteger) -> Integer {
        match r.to_i64() {
            Some(n) => Integer::Natural(n),
            None => Integer::Large(r),
        }
    }

    /// Convert a float with an integral value, or return `None`.
    pub fn from_f64(f: f64) -> Option<Integer> {
        if !f.is_finite() || f.fract() != 0. {
            return None;
        }

        ArbitraryPrecisionInteger::from_f64(f).map(Integer::from_large)
    }

    fn from_i128(n: i128) -> Integer {
        match i64::try_from(n) {
            Ok(n) => Integer::Natural(n),
            Err(_) => Integer::Large(ArbitraryPrecisionInteger::from(n)),
        }
    }

    pub fn to_large(&self) -> ArbitraryPrecisionInteger {
        match self {
            Integer::Natural(n) => ArbitraryPrecisionInteger::from(*n),
            Integer::Large(r) => r.clone(),
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer::Natural(n) => Some(*n),
            Integer::Large(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Integer::Natural(n) => *n as f64,
            Integer::Large(r) => r.to_f64(),
        }
    }

    pub fn to_rational(&self) -> Rational {
        Rational::from(self.clone())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Integer::Natural(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Integer::Natural(1))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Natural(n) => *n < 0,
            Integer::Large(r) => r.cmp0() == Ordering::Less,
        }
    }

    pub fn abs(&self) -> Integer {
        match self {
            Integer::Natural(n) => match n.checked_abs() {
                Some(a) => Integer::Natural(a),
                None => Integer::Large(ArbitraryPrecisionInteger::from(*n).abs()),
            },
            Integer::Large(r) => Integer::Large(r.clone().abs()),
        }
    }

    /// Compute the non-negative greatest common divisor.
    pub fn gcd(&self, other: &Integer) -> Integer {
        match (self, other) {
            (Integer::Natural(a), Integer::Natural(b)) => {
                let g = utils::gcd_signed(*a, *b);
                match i64::try_from(g) {
                    Ok(g) => Integer::Natural(g),
                    Err(_) => Integer::Large(ArbitraryPrecisionInteger::from(g)),
                }
            }
            _ => Integer::from_large(self.to_large().gcd(&other.to_large())),
        }
    }

    pub fn pow(&self, e: u32) -> Integer {
        match self {
            Integer::Natural(n) => {
                if let Some(pn) = n.checked_pow(e) {
                    Integer::Natural(pn)
                } else {
                    Integer::Large(ArbitraryPrecisionInteger::from(*n).pow(e))
                }
            }
            Integer::Large(r) => Integer::from_large(r.clone().pow(e)),
        }
    }

    /// Return the exact `n`th root, if it exists.
    pub fn nth_root(&self, n: u32) -> Option<Integer> {
        debug_assert!(n > 0);

        if n == 1 {
            return Some(self.clone());
        }

        let negative = self.is_negative();
        if negative && n % 2 == 0 {
            return None;
        }

        let abs = self.abs().to_large();
        let root = abs.clone().root(n);
        if root.clone().pow(n) != abs {
            return None;
        }

        let root = Integer::from_large(root);
        Some(if negative { -&root } else { root })
    }

    /// Split a non-negative integer `n` into `(f, r)` such that `n = f^2 * r`.
    ///
    /// Square factors of primes below an internal trial division bound are always
    /// extracted. A cofactor with larger prime factors is only extracted when it is
    /// a perfect square itself.
    pub fn square_part(&self) -> (Integer, Integer) {
        debug_assert!(!self.is_negative());

        if self.is_zero() {
            return (Integer::zero(), Integer::one());
        }

        let mut rest = self.to_large();
        let mut outside = ArbitraryPrecisionInteger::from(1);
        let mut inside = ArbitraryPrecisionInteger::from(1);

        let mut p = 2u32;
        while p <= TRIAL_DIVISION_LIMIT && ArbitraryPrecisionInteger::from(p).square() <= rest {
            let mut count = 0;
            while rest.is_divisible_u(p) {
                rest.div_exact_u_mut(p);
                count += 1;
            }

            if count >= 2 {
                outside *= ArbitraryPrecisionInteger::from(p).pow(count / 2);
            }
            if count % 2 == 1 {
                inside *= p;
            }

            p += if p == 2 { 1 } else { 2 };
        }

        if rest.is_perfect_square() {
            outside *= rest.sqrt();
        } else {
            inside *= rest;
        }

        (Integer::from_large(outside), Integer::from_large(inside))
    }
}

impl InternalOrdering for Integer {
    fn internal_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Integer::Natural(a), Integer::Natural(b)) => a.cmp(b),
            _ => self.to_large().cmp(&other.to_large()),
        }
    }
}

impl<'a> Mul<&'a Integer> for &'a Integer {
    type Output = Integer;

    fn mul(self, rhs: &'a Integer) -> Integer {
        match (self, rhs) {
            (Integer::Natural(a), Integer::Natural(b)) => {
                Integer::from_i128(*a as i128 * *b as i128)
            }
            _ => Integer::from_large(self.to_large() * rhs.to_large()),
        }
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        match self {
            Integer::Natural(n) => match n.checked_neg() {
                Some(n) => Integer::Natural(n),
                None => Integer::Large(-ArbitraryPrecisionInteger::from(*n)),
            },
            Integer::Large(r) => Integer::from_large(-r.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Integer;

    #[test]
    fn downcast() {
        let big = Integer::new(i64::MAX).pow(2);
        assert!(matches!(big, Integer::Large(_)));

        let back = big.nth_root(2).unwrap();
        assert_eq!(back, Integer::new(i64::MAX));

        let min = -&Integer::new(i64::MIN);
        assert!(matches!(min, Integer::Large(_)));
        assert_eq!(-&min, Integer::new(i64::MIN));
    }

    #[test]
    fn floats() {
        assert_eq!(Integer::from_f64(-6.), Some(Integer::new(-6)));
        assert_eq!(Integer::from_f64(2.5), None);
        assert_eq!(Integer::from_f64(f64::INFINITY), None);
        assert_eq!(Integer::from_f64(1e30).map(|n| n.to_i64()), Some(None));
    }

    #[test]
    fn gcd() {
        assert_eq!(Integer::new(6).gcd(&Integer::new(-9)), Integer::new(3));
        let a = Integer::new(2).pow(100);
        let b = Integer::new(6).pow(3);
        assert_eq!(a.gcd(&b), Integer::new(8));
    }

    #[test]
    fn roots() {
        assert_eq!(Integer::new(27).nth_root(3), Some(Integer::new(3)));
        assert_eq!(Integer::new(-27).nth_root(3), Some(Integer::new(-3)));
        assert_eq!(Integer::new(-4).nth_root(2), None);
        assert_eq!(Integer::new(10).nth_root(2), None);
    }

    #[test]
    fn square_part() {
        assert_eq!(
            Integer::new(72).square_part(),
            (Integer::new(6), Integer::new(2))
        );
        assert_eq!(
            Integer::new(16).square_part(),
            (Integer::new(4), Integer::new(1))
        );
        assert_eq!(
            Integer::new(15).square_part(),
            (Integer::new(1), Integer::new(15))
        );

        // a square of a prime above the trial division bound
        let p = Integer::new(1_000_003);
        let n = &(&p * &p) * &Integer::new(12);
        assert_eq!(n.square_part(), (&p * &Integer::new(2), Integer::new(3)));
    }
}
