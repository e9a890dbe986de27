use std::{
    cmp::Ordering,
    fmt::Display,
    ops::{Add, Div, Mul, Neg, Sub},
};

use rug::{ops::Pow, Integer as ArbitraryPrecisionInteger, Rational as ArbitraryPrecisionRational};

use crate::utils;

use super::{integer::Integer, InternalOrdering};

/// An exact fraction. The fraction is always reduced and has a positive denominator.
/// Fractions whose numerator and denominator fit in an `i64` are always stored
/// as [Rational::Natural].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Rational {
    Natural(i64, i64),
    Large(ArbitraryPrecisionRational),
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::Natural(value, 1)
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        match value {
            Integer::Natural(n) => Rational::Natural(n, 1),
            Integer::Large(r) => Rational::Large(ArbitraryPrecisionRational::from(r)),
        }
    }
}

impl From<ArbitraryPrecisionRational> for Rational {
    fn from(value: ArbitraryPrecisionRational) -> Self {
        Rational::from_large(value)
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rational::Natural(n, d) => {
                if *d == 1 {
                    f.write_fmt(format_args!("{}", n))
                } else {
                    f.write_fmt(format_args!("{}/{}", n, d))
                }
            }
            Rational::Large(r) => r.fmt(f),
        }
    }
}

impl Rational {
    /// Create a new reduced fraction `num/den`.
    ///
    /// Panics when `den` is zero.
    pub fn new(num: i64, den: i64) -> Rational {
        assert!(den != 0, "Denominator of a rational number cannot be zero");
        Rational::from_i128(num as i128, den as i128)
    }

    fn from_i128(num: i128, den: i128) -> Rational {
        let g = utils::gcd_signed_i128(num, den) as i128;
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }

        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(n), Ok(d)) => Rational::Natural(n, d),
            _ => Rational::Large(ArbitraryPrecisionRational::from((
                ArbitraryPrecisionInteger::from(num),
                ArbitraryPrecisionInteger::from(den),
            ))),
        }
    }

    /// Create a fraction from two integers. Panics when `den` is zero.
    pub fn from_integers(num: &Integer, den: &Integer) -> Rational {
        assert!(
            !den.is_zero(),
            "Denominator of a rational number cannot be zero"
        );
        match (num, den) {
            (Integer::Natural(n), Integer::Natural(d)) => {
                Rational::from_i128(*n as i128, *d as i128)
            }
            _ => Rational::from_large(ArbitraryPrecisionRational::from((
                num.to_large(),
                den.to_large(),
            ))),
        }
    }

    /// Create a rational from an arbitrary-precision rational, downcasting when possible.
    pub fn from_large(r: ArbitraryPrecisionRational) -> Rational {
        match (r.numer().to_i64(), r.denom().to_i64()) {
            (Some(n), Some(d)) => Rational::Natural(n, d),
            _ => Rational::Large(r),
        }
    }

    pub fn to_large(&self) -> ArbitraryPrecisionRational {
        match self {
            Rational::Natural(n, d) => ArbitraryPrecisionRational::from((*n, *d)),
            Rational::Large(r) => r.clone(),
        }
    }

    pub fn zero() -> Rational {
        Rational::Natural(0, 1)
    }

    pub fn one() -> Rational {
        Rational::Natural(1, 1)
    }

    pub fn numerator(&self) -> Integer {
        match self {
            Rational::Natural(n, _) => Integer::Natural(*n),
            Rational::Large(r) => Integer::from_large(r.numer().clone()),
        }
    }

    pub fn denominator(&self) -> Integer {
        match self {
            Rational::Natural(_, d) => Integer::Natural(*d),
            Rational::Large(r) => Integer::from_large(r.denom().clone()),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Rational::Natural(0, _))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Rational::Natural(1, 1))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Rational::Natural(n, _) => *n < 0,
            Rational::Large(r) => r.cmp0() == Ordering::Less,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Rational::Natural(_, d) => *d == 1,
            Rational::Large(r) => *r.denom() == 1,
        }
    }

    /// Return the value as an `i64` if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Rational::Natural(n, 1) => Some(*n),
            _ => None,
        }
    }

    pub fn to_integer(&self) -> Option<Integer> {
        if self.is_integer() {
            Some(self.numerator())
        } else {
            None
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Rational::Natural(n, d) => *n as f64 / *d as f64,
            Rational::Large(r) => r.to_f64(),
        }
    }

    pub fn abs(&self) -> Rational {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    pub fn add(&self, other: &Rational) -> Rational {
        match (self, other) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                let g = utils::gcd_signed(*d1, *d2) as i64;
                if let Some(lcm) = d2.checked_mul(d1 / g) {
                    if let Some(num2) = n2.checked_mul(lcm / d2) {
                        if let Some(num1) = n1.checked_mul(lcm / d1) {
                            if let Some(num) = num1.checked_add(num2) {
                                let g = utils::gcd_signed(num, lcm) as i64;
                                return Rational::Natural(num / g, lcm / g);
                            }
                        }
                    }
                }
                Rational::from_large(
                    ArbitraryPrecisionRational::from((*n1, *d1))
                        + ArbitraryPrecisionRational::from((*n2, *d2)),
                )
            }
            _ => Rational::from_large(self.to_large() + other.to_large()),
        }
    }

    pub fn sub(&self, other: &Rational) -> Rational {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Rational) -> Rational {
        match (self, other) {
            (Rational::Natural(0, _), _) | (_, Rational::Natural(0, _)) => Rational::zero(),
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                let gcd1 = utils::gcd_signed(*n1, *d2) as i64;
                let gcd2 = utils::gcd_signed(*d1, *n2) as i64;

                match (n2 / gcd2).checked_mul(n1 / gcd1) {
                    Some(nn) => match (d1 / gcd2).checked_mul(d2 / gcd1) {
                        Some(nd) => Rational::Natural(nn, nd),
                        None => Rational::from_large(ArbitraryPrecisionRational::from((
                            nn,
                            ArbitraryPrecisionInteger::from(d1 / gcd2)
                                * ArbitraryPrecisionInteger::from(d2 / gcd1),
                        ))),
                    },
                    None => Rational::from_large(ArbitraryPrecisionRational::from((
                        ArbitraryPrecisionInteger::from(n1 / gcd1)
                            * ArbitraryPrecisionInteger::from(n2 / gcd2),
                        ArbitraryPrecisionInteger::from(d1 / gcd2)
                            * ArbitraryPrecisionInteger::from(d2 / gcd1),
                    ))),
                }
            }
            _ => Rational::from_large(self.to_large() * other.to_large()),
        }
    }

    /// Divide by `other`. Panics when `other` is zero.
    pub fn div(&self, other: &Rational) -> Rational {
        self.mul(&other.inv())
    }

    pub fn neg(&self) -> Rational {
        match self {
            Rational::Natural(n, d) => {
                if let Some(neg) = n.checked_neg() {
                    Rational::Natural(neg, *d)
                } else {
                    Rational::Large(ArbitraryPrecisionRational::from((*n, *d)).neg())
                }
            }
            Rational::Large(r) => Rational::from_large(r.clone().neg()),
        }
    }

    /// Compute `1/self`. Panics when `self` is zero.
    pub fn inv(&self) -> Rational {
        assert!(!self.is_zero(), "Cannot invert zero");
        match self {
            Rational::Natural(n, d) => {
                if *n < 0 {
                    if let (Some(nd), Some(nn)) = (d.checked_neg(), n.checked_neg()) {
                        Rational::Natural(nd, nn)
                    } else {
                        Rational::from_large(ArbitraryPrecisionRational::from((*n, *d)).recip())
                    }
                } else {
                    Rational::Natural(*d, *n)
                }
            }
            Rational::Large(r) => Rational::from_large(r.clone().recip()),
        }
    }

    /// Raise to a signed integer power. Panics when the magnitude of the exponent
    /// exceeds `u32::MAX` or when zero is raised to a negative power.
    pub fn pow(&self, e: i64) -> Rational {
        if e.unsigned_abs() > u32::MAX as u64 {
            panic!("Power of exponentation is larger than 2^32: {}", e);
        }

        if e < 0 {
            return self.inv().pow(-e);
        }
        let e = e as u32;

        match self {
            Rational::Natural(n1, d1) => {
                if let Some(pn) = n1.checked_pow(e) {
                    if let Some(pd) = d1.checked_pow(e) {
                        return Rational::Natural(pn, pd);
                    }
                }

                Rational::from_large(ArbitraryPrecisionRational::from((*n1, *d1)).pow(e))
            }
            Rational::Large(r) => Rational::from_large(r.clone().pow(e)),
        }
    }

    /// Raise to a rational power, returning `None` when the result is not a rational number.
    pub fn pow_rational(&self, e: &Rational) -> Option<Rational> {
        let p = e.numerator().to_i64()?;
        let q = u32::try_from(e.denominator().to_i64()?).ok()?;

        if p.unsigned_abs() > u32::MAX as u64 || (self.is_zero() && p < 0) {
            return None;
        }

        let root = if q == 1 {
            self.clone()
        } else {
            let n = self.numerator().nth_root(q)?;
            let d = self.denominator().nth_root(q)?;
            Rational::from_integers(&n, &d)
        };

        Some(root.pow(p))
    }

    /// Write the square root of a non-negative rational as `f * sqrt(r)`, where `r`
    /// is an integer without small square factors.
    pub fn reduce_square_root(&self) -> (Rational, Integer) {
        debug_assert!(!self.is_negative());

        // sqrt(n/d) = sqrt(n*d)/d
        let d = self.denominator();
        let (f, r) = (&self.numerator() * &d).square_part();
        (Rational::from_integers(&f, &d), r)
    }
}

impl InternalOrdering for Rational {
    fn internal_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                (*n1 as i128 * *d2 as i128).cmp(&(*n2 as i128 * *d1 as i128))
            }
            _ => self.to_large().cmp(&other.to_large()),
        }
    }
}

impl<'a> Add<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn add(self, rhs: &'a Rational) -> Rational {
        Rational::add(self, rhs)
    }
}

impl<'a> Sub<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn sub(self, rhs: &'a Rational) -> Rational {
        Rational::sub(self, rhs)
    }
}

impl<'a> Mul<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn mul(self, rhs: &'a Rational) -> Rational {
        Rational::mul(self, rhs)
    }
}

impl<'a> Div<&'a Rational> for &'a Rational {
    type Output = Rational;

    fn div(self, rhs: &'a Rational) -> Rational {
        Rational::div(self, rhs)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational::neg(self)
    }
}
