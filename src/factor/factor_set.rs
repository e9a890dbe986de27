use std::{cmp::Ordering, fmt};

use ahash::HashMap;
use tracing::{debug, trace};

use crate::{
    atom::{canonical, Atom, Number},
    domains::{complex::Complex, integer::Integer, rational::Rational},
};

use super::together;

/// Get the parity of an integer literal exponent: `Some(true)` if it is odd,
/// `Some(false)` if it is even and `None` if it is not an integer literal.
fn integer_parity(e: &Atom) -> Option<bool> {
    let r = e.as_rational().filter(|r| r.is_integer())?;
    Some(!r.mul(&Rational::new(1, 2)).is_integer())
}

/// Get a rational exponent as a machine integer that can be used for exact powers.
fn small_integer(r: &Rational) -> Option<i64> {
    r.to_i64().filter(|n| n.unsigned_abs() <= u32::MAX as u64)
}

/// Fold `q^e` into `rational * sqrt(radicand)` if it has an exact value.
fn fold_rational(
    q: &Rational,
    e: &Rational,
    rational: &mut Rational,
    radicand: &mut Rational,
) -> bool {
    let twice = e.mul(&Rational::from(2));

    if twice.is_integer() && !q.is_negative() {
        let Some(t) = small_integer(&twice) else {
            return false;
        };

        // q^e = q^floor(e) * sqrt(q)^(2e mod 2)
        *rational = rational.mul(&q.pow(t.div_euclid(2)));
        if t.rem_euclid(2) == 1 {
            *radicand = radicand.mul(q);
        }
        true
    } else if let Some(v) = q.pow_rational(e) {
        *rational = rational.mul(&v);
        true
    } else {
        false
    }
}

/// Get `(b, e)` if `base^exponent` is an integer power `b^e` with `e >= 0`.
fn integer_power(base: &Atom, exponent: &Atom) -> Option<(Integer, u32)> {
    let b = match base.as_number()? {
        Number::Rational(r) => r.to_integer()?,
        Number::Float(f) => Integer::from_f64(*f)?,
        _ => return None,
    };

    let e = exponent
        .as_rational()
        .filter(|e| !e.is_negative())
        .and_then(Rational::to_i64)
        .and_then(|e| u32::try_from(e).ok())?;

    Some((b, e))
}

/// Compare two real numeric exponents.
fn compare_exponents(a: &Number, b: &Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Rational(a), Number::Rational(b)) => Some(a.cmp(b)),
        (Number::Complex(_) | Number::ComplexFloat(_), _)
        | (_, Number::Complex(_) | Number::ComplexFloat(_)) => None,
        _ => a.to_complex_f64().re.partial_cmp(&b.to_complex_f64().re),
    }
}

/// The multiplicative decomposition of an expression into a sign and
/// a list of `(base, exponent)` pairs with unique bases.
///
/// NaN, infinity and zero are absorbing: once such a factor is seen, it
/// determines the result of [FactorSet::as_expression].
#[derive(Clone, Debug)]
pub struct FactorSet {
    entries: Vec<(Atom, Atom)>,
    index: HashMap<Atom, usize>,
    sign: i8,
    has_nan: bool,
    has_infinity: bool,
    has_zero: bool,
}

impl Default for FactorSet {
    fn default() -> Self {
        FactorSet::empty()
    }
}

impl FactorSet {
    /// Create a factor set that represents `1`.
    pub fn empty() -> FactorSet {
        FactorSet {
            entries: vec![],
            index: HashMap::default(),
            sign: 1,
            has_nan: false,
            has_infinity: false,
            has_zero: false,
        }
    }

    /// Decompose `expr`, after combining its fractions with [together].
    pub fn new(expr: &Atom) -> FactorSet {
        let mut f = FactorSet::empty();
        f.mul(&together(expr), &Atom::one());
        f
    }

    /// The `(base, exponent)` pairs, in insertion order.
    pub fn entries(&self) -> &[(Atom, Atom)] {
        &self.entries
    }

    pub fn sign(&self) -> i8 {
        self.sign
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_nan(&self) -> bool {
        self.has_nan
    }

    pub fn has_infinity(&self) -> bool {
        self.has_infinity
    }

    pub fn has_zero(&self) -> bool {
        self.has_zero
    }

    /// Get the exponent of `base`, if it is present.
    pub fn find(&self, base: &Atom) -> Option<&Atom> {
        self.index.get(base).map(|&i| &self.entries[i].1)
    }

    pub fn has(&self, base: &Atom) -> bool {
        self.index.contains_key(base)
    }

    fn flip_sign(&mut self) {
        self.sign = -self.sign;
    }

    /// Multiply the set by `factor^exponent`.
    pub fn mul(&mut self, factor: &Atom, exponent: &Atom) {
        match factor {
            Atom::Neg(x) => match integer_parity(exponent) {
                Some(odd) => {
                    if odd {
                        self.flip_sign();
                    }
                    self.mul(x, exponent);
                }
                None => self.insert(factor.clone(), exponent.clone()),
            },
            Atom::Div(n, d) => {
                self.mul(n, exponent);
                self.mul(d, &canonical::neg(exponent.clone()));
            }
            Atom::Mul(args) => {
                for a in args {
                    self.mul(a, exponent);
                }
            }
            Atom::Pow(b, e) => {
                self.mul(b, &canonical::mul([exponent.clone(), (**e).clone()]));
            }
            Atom::Sqrt(x) => {
                self.mul(x, &canonical::mul([exponent.clone(), Atom::half()]));
            }
            Atom::Num(n) if n.is_negative() => match integer_parity(exponent) {
                Some(odd) => {
                    if odd {
                        self.flip_sign();
                    }
                    self.insert(Atom::Num(n.neg()), exponent.clone());
                }
                None => self.insert(factor.clone(), exponent.clone()),
            },
            _ => self.insert(factor.clone(), exponent.clone()),
        }
    }

    /// Divide the set by `factor`.
    pub fn div(&mut self, factor: &Atom) {
        if factor.is_one() {
            return;
        }
        if factor.is_negative_one() {
            self.flip_sign();
            return;
        }

        self.mul(factor, &Atom::negative_one());
    }

    fn insert(&mut self, base: Atom, exponent: Atom) {
        if exponent.is_zero() || base.is_one() {
            return;
        }

        if base.is_nan() {
            self.has_nan = true;
            return;
        }

        if base.is_zero() {
            if exponent.is_nonnegative() {
                self.has_zero = true;
            } else {
                self.has_nan = true;
            }
            return;
        }

        if base.is_infinity() {
            if exponent.is_nonnegative() {
                self.has_infinity = true;
            } else {
                self.has_nan = true;
            }
            return;
        }

        if let Some(&i) = self.index.get(&base) {
            let e = canonical::add([self.entries[i].1.clone(), exponent]);
            if e.is_zero() {
                self.remove(i);
            } else {
                self.entries[i].1 = e;
            }
        } else {
            self.index.insert(base.clone(), self.entries.len());
            self.entries.push((base, exponent));
        }
    }

    fn remove(&mut self, i: usize) {
        let (base, _) = self.entries.remove(i);
        self.index.remove(&base);
        for v in self.index.values_mut() {
            if *v > i {
                *v -= 1;
            }
        }
    }

    /// Replace all entries and rebuild the base index.
    fn set_entries(&mut self, entries: Vec<(Atom, Atom)>) {
        self.index.clear();
        self.entries.clear();
        for (b, e) in entries {
            self.index.insert(b.clone(), self.entries.len());
            self.entries.push((b, e));
        }
    }

    /// The product of all integer bases raised to non-negative integer exponents,
    /// or `None` if there are no such entries. Floats with an integral value count
    /// as integers.
    pub fn integer_coefficient(&self) -> Option<Integer> {
        let mut result: Option<Integer> = None;
        for (b, e) in &self.entries {
            let Some((b, e)) = integer_power(b, e) else {
                continue;
            };

            let p = b.pow(e);
            result = Some(match result {
                Some(r) => &r * &p,
                None => p,
            });
        }
        result
    }

    /// Check if an entry has a numeric base that is not exact.
    fn has_inexact_base(&self) -> bool {
        self.entries
            .iter()
            .any(|(b, _)| b.is_number() && !b.is_exact())
    }

    /// Combine the numeric entries. Exact arithmetic is used unless some
    /// numeric base is inexact, in which case all numbers are folded into one float.
    pub fn reduce(&mut self) {
        if self.has_inexact_base() {
            self.reduce_numbers()
        } else {
            self.reduce_exact_numbers()
        }
    }

    /// Evaluate every entry with a numeric base and a numeric exponent in floating
    /// point and fold them into a single numeric factor.
    pub fn reduce_numbers(&mut self) {
        let mut value = Number::Float(1.);
        let mut folded = false;
        let mut kept = Vec::with_capacity(self.entries.len());

        for (b, e) in std::mem::take(&mut self.entries) {
            let p = match (b.as_number(), e.as_number()) {
                (Some(nb), Some(ne)) => Some(
                    nb.pow(ne)
                        .unwrap_or_else(|| nb.to_complex_f64().powf(&ne.to_complex_f64()).into()),
                ),
                _ => None,
            };

            match p {
                Some(p) => {
                    value = value.mul(&p);
                    folded = true;
                }
                None => kept.push((b, e)),
            }
        }

        self.set_entries(kept);

        if folded && value != Number::Float(1.) {
            trace!("Folded numeric factors into {}", value);
            self.mul(&Atom::Num(value), &Atom::one());
        }
    }

    /// Fold all exact numeric entries into at most one rational, one square root
    /// of a rational and one Gaussian number, without any loss of precision.
    pub fn reduce_exact_numbers(&mut self) {
        // the product is `rational * sqrt(radicand) * gaussian`
        let mut rational = Rational::one();
        let mut radicand = Rational::one();
        let mut gaussian: Complex<Rational> = Complex::one();
        let mut kept = Vec::with_capacity(self.entries.len());

        for (b, e) in std::mem::take(&mut self.entries) {
            let folded = match (b.as_number(), e.as_rational()) {
                (Some(Number::Rational(q)), Some(er)) => {
                    fold_rational(q, er, &mut rational, &mut radicand)
                }
                (Some(Number::Complex(c)), Some(er))
                    if c.is_gaussian_integer() && er.is_integer() =>
                {
                    match small_integer(er).and_then(|n| c.pow(n)) {
                        Some(p) => {
                            gaussian = &gaussian * &p;
                            true
                        }
                        None => false,
                    }
                }
                (None, Some(er)) => match b.as_rational_sqrt() {
                    Some(q) => {
                        let half = er.mul(&Rational::new(1, 2));
                        fold_rational(q, &half, &mut rational, &mut radicand)
                    }
                    None => false,
                },
                _ => false,
            };

            if !folded {
                kept.push((b, e));
            }
        }

        self.set_entries(kept);

        let (extracted, residual) = radicand.reduce_square_root();
        rational = rational.mul(&extracted);

        if gaussian.is_real() {
            rational = rational.mul(&gaussian.re);
        } else if rational.is_integer() {
            let r = Complex::new(rational, Rational::zero());
            self.mul(&Atom::num(&gaussian * &r), &Atom::one());
            rational = Rational::one();
        } else {
            self.mul(&Atom::num(gaussian), &Atom::one());
        }

        debug!("Exact numeric factors: {} * sqrt({})", rational, residual);

        if !rational.is_one() {
            self.mul(&Atom::num(rational), &Atom::one());
        }
        if !residual.is_one() {
            // kept as a single base, so that it does not merge with the rational
            self.insert(canonical::sqrt(Atom::num(residual)), Atom::one());
        }
    }

    /// Reassemble the factors into a canonical expression.
    pub fn as_expression(self) -> Atom {
        if self.has_nan {
            return Atom::nan();
        }
        if self.has_infinity {
            return Atom::infinity(self.sign > 0);
        }
        if self.has_zero {
            return Atom::zero();
        }

        let signed = |a: Atom| {
            if self.sign < 0 {
                canonical::neg(a)
            } else {
                a
            }
        };

        if self.entries.len() == 1 {
            let (b, e) = self.entries[0].clone();
            return signed(canonical::pow(b, e));
        }

        let mut num = vec![];
        let mut den = vec![];
        for (b, e) in &self.entries {
            if e.is_negative() {
                den.push(canonical::pow(b.clone(), canonical::neg(e.clone())));
            } else {
                num.push(canonical::pow(b.clone(), e.clone()));
            }
        }

        let numerator = match num.len() {
            0 => Atom::one(),
            1 => num.swap_remove(0),
            _ => canonical::mul(num),
        };
        let numerator = signed(numerator);

        match den.len() {
            0 => numerator,
            1 => canonical::div(numerator, den.swap_remove(0)),
            _ => canonical::div(numerator, canonical::mul(den)),
        }
    }
}

impl fmt::Display for FactorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_nan {
            return f.write_str("NaN");
        }
        if self.has_infinity || self.has_zero {
            f.write_str(if self.sign < 0 { "-" } else { "" })?;
            return f.write_str(if self.has_infinity { "Infinity" } else { "0" });
        }

        write!(f, "{}", self.sign)?;
        for (b, e) in &self.entries {
            write!(f, " * ({})^({})", b, e)?;
        }
        Ok(())
    }
}

/// Compute the factor that `lhs` and `rhs` have in common.
///
/// Bases present on both sides contribute with the exponent that is closest
/// to zero, if both exponents have the same sign. Integer powers with a
/// non-negative exponent are left out of that comparison, since the integer
/// coefficients of both sides contribute their gcd.
pub fn common_factors(lhs: &FactorSet, rhs: &FactorSet) -> Atom {
    let mut shared = vec![];

    for (b, e1) in lhs.entries() {
        let Some(e2) = rhs.find(b) else {
            continue;
        };

        // covered by the gcd of the integer coefficients
        if integer_power(b, e1).is_some() && integer_power(b, e2).is_some() {
            continue;
        }

        if e1 == e2 {
            shared.push(canonical::pow(b.clone(), e1.clone()));
            continue;
        }

        let (Some(n1), Some(n2)) = (e1.as_number(), e2.as_number()) else {
            continue;
        };

        let e = if n1.is_positive() && n2.is_positive() {
            match compare_exponents(n1, n2) {
                Some(Ordering::Greater) => e2,
                Some(_) => e1,
                None => continue,
            }
        } else if n1.is_negative() && n2.is_negative() {
            match compare_exponents(n1, n2) {
                Some(Ordering::Less) => e2,
                Some(_) => e1,
                None => continue,
            }
        } else {
            continue;
        };

        shared.push(canonical::pow(b.clone(), e.clone()));
    }

    if let (Some(a), Some(b)) = (lhs.integer_coefficient(), rhs.integer_coefficient()) {
        let g = a.gcd(&b);
        if !g.is_one() {
            shared.push(Atom::num(g));
        }
    }

    canonical::mul(shared)
}

#[cfg(test)]
mod test {
    use super::{common_factors, FactorSet};
    use crate::{
        atom::{canonical, Atom, Number},
        domains::{complex::Complex, integer::Integer, rational::Rational},
        parse,
    };

    fn reduced(a: &Atom) -> FactorSet {
        let mut f = FactorSet::new(a);
        f.reduce();
        f
    }

    #[test]
    fn decomposition() {
        let f = FactorSet::new(&parse!("-3*x^2*sqrt(y)/z"));
        assert_eq!(f.sign(), -1);
        assert_eq!(f.find(&Atom::num(3)), Some(&Atom::one()));
        assert_eq!(f.find(&Atom::var("x")), Some(&Atom::num(2)));
        assert_eq!(f.find(&Atom::var("y")), Some(&Atom::half()));
        assert_eq!(f.find(&Atom::var("z")), Some(&Atom::negative_one()));
        assert!(!f.has(&Atom::var("w")));
        assert_eq!(f.len(), 4);
    }

    #[test]
    fn merging() {
        let x = Atom::var("x");
        let mut f = FactorSet::empty();
        f.mul(&x, &Atom::num(2));
        f.mul(&x, &Atom::var("n"));
        assert_eq!(f.find(&x), Some(&parse!("n + 2")));

        f.mul(&x, &parse!("-n - 2"));
        assert!(f.is_empty());

        f.mul(&Atom::one(), &Atom::num(5));
        f.mul(&x, &Atom::zero());
        assert!(f.is_empty());
    }

    #[test]
    fn negative_bases() {
        let mut f = FactorSet::empty();
        f.mul(&Atom::num(-2), &Atom::num(2));
        assert_eq!(f.sign(), 1);
        assert_eq!(f.find(&Atom::num(2)), Some(&Atom::num(2)));

        f.mul(&Atom::num(-3), &Atom::num(3));
        assert_eq!(f.sign(), -1);

        f.mul(&Atom::num(-5), &Atom::half());
        assert!(f.has(&Atom::num(-5)));

        f.div(&Atom::negative_one());
        assert_eq!(f.sign(), 1);
    }

    #[test]
    fn absorbing_factors() {
        let mut f = FactorSet::empty();
        f.mul(&Atom::var("x"), &Atom::one());
        f.mul(&Atom::zero(), &Atom::one());
        assert!(f.has_zero());
        assert_eq!(f.clone().as_expression(), Atom::zero());

        f.mul(&Atom::infinity(false), &Atom::one());
        assert_eq!(f.clone().as_expression(), Atom::infinity(false));

        f.mul(&Atom::zero(), &Atom::negative_one());
        assert_eq!(f.as_expression(), Atom::nan());

        let mut f = FactorSet::empty();
        f.mul(&Atom::infinity(true), &Atom::var("n"));
        assert_eq!(f.as_expression(), Atom::nan());
    }

    #[test]
    fn exact_reduction() {
        let f = reduced(&Atom::Mul(vec![
            Atom::Sqrt(Box::new(Atom::num(2))),
            Atom::Sqrt(Box::new(Atom::num(8))),
        ]));
        assert_eq!(f.as_expression(), Atom::num(4));

        let f = reduced(&Atom::Mul(vec![
            Atom::Sqrt(Box::new(Atom::num(12))),
            Atom::var("x"),
        ]));
        assert_eq!(f.as_expression(), parse!("2*sqrt(3)*x"));

        let f = reduced(&Atom::Pow(
            Box::new(Atom::num(8)),
            Box::new(Atom::num((1, 3))),
        ));
        assert_eq!(f.as_expression(), Atom::num(2));

        let f = reduced(&Atom::Div(
            Box::new(Atom::num(6)),
            Box::new(Atom::Sqrt(Box::new(Atom::num(2)))),
        ));
        assert_eq!(f.as_expression(), parse!("3*sqrt(2)"));
    }

    #[test]
    fn gaussian_reduction() {
        let one_plus_i = Atom::num(Complex::new(Rational::one(), Rational::one()));
        let one_minus_i = Atom::num(Complex::new(Rational::one(), Rational::from(-1)));

        let f = reduced(&Atom::Mul(vec![one_plus_i.clone(), one_minus_i]));
        assert_eq!(f.as_expression(), Atom::num(2));

        let f = reduced(&Atom::Mul(vec![Atom::i(), Atom::i(), Atom::var("x")]));
        assert_eq!(f.as_expression(), canonical::neg(Atom::var("x")));

        let f = reduced(&Atom::Mul(vec![one_plus_i.clone(), Atom::num(3)]));
        assert_eq!(
            f.as_expression(),
            Atom::num(Complex::new(Rational::from(3), Rational::from(3)))
        );

        // a fractional rational is kept next to the complex entry
        let f = reduced(&Atom::Mul(vec![one_plus_i.clone(), Atom::num((1, 2))]));
        assert_eq!(f.len(), 2);
        assert!(f.has(&one_plus_i));
        assert!(f.has(&Atom::num((1, 2))));
        assert_eq!(
            f.as_expression(),
            Atom::num(Complex::new(Rational::new(1, 2), Rational::new(1, 2)))
        );
    }

    #[test]
    fn inexact_reduction() {
        let f = reduced(&Atom::Mul(vec![
            Atom::num(Number::from(0.5)),
            Atom::num(4),
            Atom::var("x"),
        ]));
        assert_eq!(
            f.as_expression(),
            canonical::mul([Atom::num(Number::from(2.)), Atom::var("x")])
        );
    }

    #[test]
    fn reassembly() {
        for s in ["2*x^2/y^3", "-x*y", "x/(y*z)", "-1/x", "x^n*y", "7"] {
            let e = parse!(s);
            assert_eq!(FactorSet::new(&e).as_expression(), e);
        }

        assert_eq!(FactorSet::empty().as_expression(), Atom::one());
        let mut f = FactorSet::empty();
        f.div(&Atom::negative_one());
        assert_eq!(f.as_expression(), Atom::negative_one());
    }

    #[test]
    fn integer_coefficient() {
        let f = FactorSet::new(&parse!("12*x^2"));
        assert_eq!(f.integer_coefficient(), Some(Integer::new(12)));

        let f = FactorSet::new(&parse!("x/3"));
        assert_eq!(f.integer_coefficient(), None);

        let f = FactorSet::new(&parse!("2.0*x"));
        assert_eq!(f.integer_coefficient(), Some(Integer::new(2)));

        let f = FactorSet::new(&parse!("2^x*y"));
        assert_eq!(f.integer_coefficient(), None);
    }

    #[test]
    fn common() {
        let a = reduced(&parse!("6*x^3*y/z^2"));
        let b = reduced(&parse!("4*x^2*w/z^3"));
        assert_eq!(common_factors(&a, &b), parse!("2*x^2/z^2"));

        let a = reduced(&parse!("x^2/y"));
        let b = reduced(&parse!("y*z"));
        assert_eq!(common_factors(&a, &b), Atom::one());

        let a = reduced(&parse!("x^n*y"));
        let b = reduced(&parse!("x^n"));
        assert_eq!(common_factors(&a, &b), parse!("x^n"));

        let a = reduced(&parse!("2^x*a"));
        let b = reduced(&parse!("2^x*b"));
        assert_eq!(common_factors(&a, &b), parse!("2^x"));

        let a = reduced(&parse!("3^x*6"));
        let b = reduced(&parse!("3^(x+1)*4"));
        assert_eq!(common_factors(&a, &b), Atom::num(2));
    }
}
