use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::{Add, Mul, Neg, Sub},
};

use super::{rational::Rational, InternalOrdering};

/// A field of real scalars that can be used as the real and imaginary part of a [Complex] number.
pub trait Real: Clone + PartialEq {
    fn zero() -> Self;
    fn one() -> Self;
    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    fn neg(&self) -> Self;
    fn is_zero(&self) -> bool;
    fn is_negative(&self) -> bool;
}

impl Real for Rational {
    fn zero() -> Self {
        Rational::zero()
    }

    fn one() -> Self {
        Rational::one()
    }

    fn add(&self, other: &Self) -> Self {
        Rational::add(self, other)
    }

    fn sub(&self, other: &Self) -> Self {
        Rational::sub(self, other)
    }

    fn mul(&self, other: &Self) -> Self {
        Rational::mul(self, other)
    }

    fn neg(&self) -> Self {
        Rational::neg(self)
    }

    fn is_zero(&self) -> bool {
        Rational::is_zero(self)
    }

    fn is_negative(&self) -> bool {
        Rational::is_negative(self)
    }
}

impl Real for f64 {
    fn zero() -> Self {
        0.
    }

    fn one() -> Self {
        1.
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self
    }

    fn is_zero(&self) -> bool {
        *self == 0.
    }

    fn is_negative(&self) -> bool {
        *self < 0.
    }
}

/// A complex number `re + im*i`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: InternalOrdering> InternalOrdering for Complex<T> {
    fn internal_cmp(&self, other: &Self) -> Ordering {
        self.re
            .internal_cmp(&other.re)
            .then_with(|| self.im.internal_cmp(&other.im))
    }
}

impl<T: Real> Complex<T> {
    pub fn new(re: T, im: T) -> Complex<T> {
        Complex { re, im }
    }

    pub fn one() -> Complex<T> {
        Complex::new(T::one(), T::zero())
    }

    /// The imaginary unit.
    pub fn i() -> Complex<T> {
        Complex::new(T::zero(), T::one())
    }

    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    pub fn conj(&self) -> Complex<T> {
        Complex::new(self.re.clone(), self.im.neg())
    }

    /// Compute `re^2 + im^2`.
    pub fn norm_squared(&self) -> T {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }
}

impl Complex<Rational> {
    pub fn is_gaussian_integer(&self) -> bool {
        self.re.is_integer() && self.im.is_integer()
    }

    /// Compute `1/self`, or `None` for zero.
    pub fn inv(&self) -> Option<Complex<Rational>> {
        let n = self.norm_squared();
        if n.is_zero() {
            return None;
        }

        let n = n.inv();
        Some(Complex::new(self.re.mul(&n), self.im.neg().mul(&n)))
    }

    /// Raise to a signed integer power by repeated squaring. Negative powers
    /// go through the inverse. Returns `None` for `0^e` with `e < 0`.
    pub fn pow(&self, e: i64) -> Option<Complex<Rational>> {
        let mut base = if e < 0 { self.inv()? } else { self.clone() };
        let mut e = e.unsigned_abs();

        let mut result = Complex::one();
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &base;
            }
            e >>= 1;
            if e > 0 {
                base = &base * &base;
            }
        }

        Some(result)
    }

    pub fn to_f64(&self) -> Complex<f64> {
        Complex::new(self.re.to_f64(), self.im.to_f64())
    }
}

impl Complex<f64> {
    pub fn norm(&self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn arg(&self) -> f64 {
        self.im.atan2(self.re)
    }

    pub fn from_polar(r: f64, phi: f64) -> Complex<f64> {
        Complex::new(r * phi.cos(), r * phi.sin())
    }

    pub fn inv(&self) -> Complex<f64> {
        let n = self.norm_squared();
        Complex::new(self.re / n, -self.im / n)
    }

    pub fn is_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    /// Compute `self^e` through the principal branch of the logarithm.
    pub fn powf(&self, e: &Complex<f64>) -> Complex<f64> {
        if self.re == 0. && self.im == 0. {
            return if e.re > 0. {
                Complex::new(0., 0.)
            } else if e.re == 0. && e.im == 0. {
                Complex::one()
            } else {
                Complex::new(f64::NAN, f64::NAN)
            };
        }

        let (ln_r, phi) = (self.norm().ln(), self.arg());
        let re = e.re * ln_r - e.im * phi;
        let im = e.im * ln_r + e.re * phi;
        Complex::from_polar(re.exp(), im)
    }
}

impl<'a, T: Real> Add<&'a Complex<T>> for &'a Complex<T> {
    type Output = Complex<T>;

    fn add(self, rhs: &'a Complex<T>) -> Complex<T> {
        Complex::new(self.re.add(&rhs.re), self.im.add(&rhs.im))
    }
}

impl<'a, T: Real> Sub<&'a Complex<T>> for &'a Complex<T> {
    type Output = Complex<T>;

    fn sub(self, rhs: &'a Complex<T>) -> Complex<T> {
        Complex::new(self.re.sub(&rhs.re), self.im.sub(&rhs.im))
    }
}

impl<'a, T: Real> Mul<&'a Complex<T>> for &'a Complex<T> {
    type Output = Complex<T>;

    fn mul(self, rhs: &'a Complex<T>) -> Complex<T> {
        Complex::new(
            self.re.mul(&rhs.re).sub(&self.im.mul(&rhs.im)),
            self.re.mul(&rhs.im).add(&self.im.mul(&rhs.re)),
        )
    }
}

impl<T: Real> Neg for &Complex<T> {
    type Output = Complex<T>;

    fn neg(self) -> Complex<T> {
        Complex::new(self.re.neg(), self.im.neg())
    }
}

impl<T: Real + Display> Display for Complex<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.im.is_zero() {
            return self.re.fmt(f);
        }

        if !self.re.is_zero() {
            self.re.fmt(f)?;
            if !self.im.is_negative() {
                f.write_str("+")?;
            }
        }

        if self.im == T::one() {
            f.write_str("i")
        } else if self.im == T::one().neg() {
            f.write_str("-i")
        } else {
            f.write_fmt(format_args!("{}i", self.im))
        }
    }
}

#[cfg(test)]
mod test {
    use super::Complex;
    use crate::domains::rational::Rational;

    fn gaussian(re: i64, im: i64) -> Complex<Rational> {
        Complex::new(Rational::from(re), Rational::from(im))
    }

    #[test]
    fn exact_arithmetic() {
        let a = gaussian(1, 1);
        let b = gaussian(1, -1);
        assert_eq!(&a * &b, gaussian(2, 0));
        assert_eq!(a.conj(), b);
        assert_eq!(a.pow(4), Some(gaussian(-4, 0)));
        assert_eq!(
            a.pow(-1),
            Some(Complex::new(Rational::new(1, 2), Rational::new(-1, 2)))
        );
        assert_eq!(gaussian(0, 0).pow(-1), None);
        assert!(gaussian(3, -2).is_gaussian_integer());
    }

    #[test]
    fn float_power() {
        let i = Complex::<f64>::i();
        let r = i.powf(&Complex::new(2., 0.));
        assert!((r.re + 1.).abs() < 1e-12);
        assert!(r.im.abs() < 1e-12);
    }

    #[test]
    fn display() {
        assert_eq!(gaussian(1, -1).to_string(), "1-i");
        assert_eq!(gaussian(0, 2).to_string(), "2i");
        assert_eq!(gaussian(-3, 1).to_string(), "-3+i");
    }
}
