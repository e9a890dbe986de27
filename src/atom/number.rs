use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
};

use crate::domains::{
    complex::Complex,
    integer::Integer,
    rational::Rational,
    InternalOrdering,
};

/// A numeric literal. Exact numbers are rationals or Gaussian rationals,
/// inexact numbers are (complex) floats. `NaN` and the infinities are floats.
///
/// Constructors normalize the representation: a complex number with a
/// vanishing imaginary part is stored as its real counterpart.
///
/// Floats compare and hash by bit pattern, so that `NaN` is
/// structurally equal to itself.
#[derive(Clone, Debug)]
pub enum Number {
    Rational(Rational),
    Complex(Complex<Rational>),
    Float(f64),
    ComplexFloat(Complex<f64>),
}

impl From<Rational> for Number {
    fn from(value: Rational) -> Self {
        Number::Rational(value)
    }
}

impl From<Integer> for Number {
    fn from(value: Integer) -> Self {
        Number::Rational(value.into())
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Rational(value.into())
    }
}

impl From<(i64, i64)> for Number {
    fn from(value: (i64, i64)) -> Self {
        Number::Rational(Rational::new(value.0, value.1))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<Complex<Rational>> for Number {
    fn from(value: Complex<Rational>) -> Self {
        if value.im.is_zero() {
            Number::Rational(value.re)
        } else {
            Number::Complex(value)
        }
    }
}

impl From<Complex<f64>> for Number {
    fn from(value: Complex<f64>) -> Self {
        if value.im == 0. {
            Number::Float(value.re)
        } else {
            Number::ComplexFloat(value)
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a == b,
            (Number::Complex(a), Number::Complex(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            (Number::ComplexFloat(a), Number::ComplexFloat(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Number::Rational(r) => r.hash(state),
            Number::Complex(c) => c.hash(state),
            Number::Float(f) => f.to_bits().hash(state),
            Number::ComplexFloat(c) => {
                c.re.to_bits().hash(state);
                c.im.to_bits().hash(state);
            }
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            (Number::Complex(a), Number::Complex(b)) => a.internal_cmp(b),
            (Number::Float(a), Number::Float(b)) => a.internal_cmp(b),
            (Number::ComplexFloat(a), Number::ComplexFloat(b)) => a.internal_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Rational(r) => r.fmt(f),
            Number::Complex(c) => c.fmt(f),
            Number::Float(x) => {
                if x.is_nan() {
                    f.write_str("NaN")
                } else if x.is_infinite() {
                    f.write_str(if *x > 0. { "Infinity" } else { "-Infinity" })
                } else {
                    f.write_fmt(format_args!("{:?}", x))
                }
            }
            Number::ComplexFloat(c) => c.fmt(f),
        }
    }
}

impl Number {
    fn rank(&self) -> u8 {
        match self {
            Number::Rational(_) => 0,
            Number::Complex(_) => 1,
            Number::Float(_) => 2,
            Number::ComplexFloat(_) => 3,
        }
    }

    pub fn zero() -> Number {
        Number::Rational(Rational::zero())
    }

    pub fn one() -> Number {
        Number::Rational(Rational::one())
    }

    pub fn negative_one() -> Number {
        Number::Rational(Rational::from(-1))
    }

    /// The imaginary unit.
    pub fn i() -> Number {
        Number::Complex(Complex::i())
    }

    pub fn nan() -> Number {
        Number::Float(f64::NAN)
    }

    pub fn infinity(positive: bool) -> Number {
        Number::Float(if positive {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        })
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Rational(_) | Number::Complex(_))
    }

    /// Check if the number is zero. Both an exact and a floating zero qualify.
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.,
            Number::Complex(_) | Number::ComplexFloat(_) => false,
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_one())
    }

    pub fn is_negative_one(&self) -> bool {
        matches!(self, Number::Rational(Rational::Natural(-1, 1)))
    }

    /// Check if the number is real and strictly negative.
    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => *f < 0.,
            Number::Complex(_) | Number::ComplexFloat(_) => false,
        }
    }

    /// Check if the number is real and strictly positive.
    pub fn is_positive(&self) -> bool {
        match self {
            Number::Rational(r) => !r.is_negative() && !r.is_zero(),
            Number::Float(f) => *f > 0.,
            Number::Complex(_) | Number::ComplexFloat(_) => false,
        }
    }

    pub fn is_nan(&self) -> bool {
        match self {
            Number::Float(f) => f.is_nan(),
            Number::ComplexFloat(c) => c.is_nan(),
            _ => false,
        }
    }

    pub fn is_infinity(&self) -> bool {
        match self {
            Number::Float(f) => f.is_infinite(),
            Number::ComplexFloat(c) => c.re.is_infinite() || c.im.is_infinite(),
            _ => false,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer())
    }

    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Number::Rational(r) => Some(r),
            _ => None,
        }
    }

    /// Convert any number to a complex float.
    pub fn to_complex_f64(&self) -> Complex<f64> {
        match self {
            Number::Rational(r) => Complex::new(r.to_f64(), 0.),
            Number::Complex(c) => c.to_f64(),
            Number::Float(f) => Complex::new(*f, 0.),
            Number::ComplexFloat(c) => *c,
        }
    }

    /// Convert to an exact complex number, if the number is exact.
    pub fn to_complex_rational(&self) -> Option<Complex<Rational>> {
        match self {
            Number::Rational(r) => Some(Complex::new(r.clone(), Rational::zero())),
            Number::Complex(c) => Some(c.clone()),
            _ => None,
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(r.neg()),
            Number::Complex(c) => Number::Complex(-c),
            Number::Float(f) => Number::Float(-f),
            Number::ComplexFloat(c) => Number::ComplexFloat(-c),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a.add(b)),
            (Number::Float(a), Number::Float(b)) => Number::Float(a + b),
            (Number::Float(a), Number::Rational(b)) | (Number::Rational(b), Number::Float(a)) => {
                Number::Float(a + b.to_f64())
            }
            _ => match (self.to_complex_rational(), other.to_complex_rational()) {
                (Some(a), Some(b)) => (&a + &b).into(),
                _ => (&self.to_complex_f64() + &other.to_complex_f64()).into(),
            },
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a.mul(b)),
            (Number::Float(a), Number::Float(b)) => Number::Float(a * b),
            (Number::Float(a), Number::Rational(b)) | (Number::Rational(b), Number::Float(a)) => {
                Number::Float(a * b.to_f64())
            }
            _ => match (self.to_complex_rational(), other.to_complex_rational()) {
                (Some(a), Some(b)) => (&a * &b).into(),
                _ => (&self.to_complex_f64() * &other.to_complex_f64()).into(),
            },
        }
    }

    /// Compute `1/self`. The inverse of an exact zero is `NaN`.
    pub fn inv(&self) -> Number {
        match self {
            Number::Rational(r) => {
                if r.is_zero() {
                    Number::nan()
                } else {
                    Number::Rational(r.inv())
                }
            }
            Number::Complex(c) => match c.inv() {
                Some(c) => c.into(),
                None => Number::nan(),
            },
            Number::Float(f) => Number::Float(1. / f),
            Number::ComplexFloat(c) => c.inv().into(),
        }
    }

    pub fn div(&self, other: &Number) -> Number {
        self.mul(&other.inv())
    }

    /// Raise `self` to the power `e`. Exact inputs yield `None` when the
    /// result has no exact representation, for example `2^(1/2)`.
    pub fn pow(&self, e: &Number) -> Option<Number> {
        if self.is_exact() && e.is_exact() {
            let e = e.as_rational()?;

            if let Number::Rational(b) = self {
                if b.is_zero() && e.is_negative() {
                    return Some(Number::nan());
                }
                return b.pow_rational(e).map(Number::Rational);
            }

            let n = e.to_i64()?;
            if n.unsigned_abs() > u32::MAX as u64 {
                return None;
            }
            return match self.to_complex_rational()?.pow(n) {
                Some(c) => Some(c.into()),
                None => Some(Number::nan()),
            };
        }

        match (self, e) {
            (Number::Float(_) | Number::Rational(_), Number::Float(_) | Number::Rational(_))
                if !self.is_negative() || e.is_integer() =>
            {
                let b = self.to_complex_f64().re;
                let x = e.to_complex_f64().re;
                Some(Number::Float(b.powf(x)))
            }
            _ => Some(self.to_complex_f64().powf(&e.to_complex_f64()).into()),
        }
    }
}
