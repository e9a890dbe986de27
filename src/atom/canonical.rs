//! Canonicalizing constructors.
//!
//! Every function in this module expects canonical arguments and returns a
//! canonical atom. A product is represented as an optional numeric coefficient
//! followed by sorted factors with unique bases, and all division is hoisted into a
//! single top-level [Atom::Div]. A sum holds sorted terms with collected
//! coefficients and the numeric constant last.
use ahash::HashMap;
use smallvec::SmallVec;

use crate::domains::{complex::Complex, rational::Rational};

use super::{Atom, Number, Relation};

/// Split a product factor into a base and a numeric exponent.
fn base_exponent(a: Atom) -> (Atom, Number) {
    match a {
        Atom::Pow(b, e) => match *e {
            Atom::Num(n) => (*b, n),
            e => (Atom::Pow(b, Box::new(e)), Number::one()),
        },
        Atom::Sqrt(x) => (*x, Number::from((1, 2))),
        a => (a, Number::one()),
    }
}

/// Accumulates the factors of a quotient.
struct Product {
    coeff: Number,
    factors: Vec<(Atom, Number)>,
}

impl Product {
    fn new() -> Product {
        Product {
            coeff: Number::one(),
            factors: vec![],
        }
    }

    fn push(&mut self, a: Atom, inverse: bool) {
        match a {
            Atom::Num(n) => {
                self.coeff = if inverse {
                    self.coeff.div(&n)
                } else {
                    self.coeff.mul(&n)
                };
            }
            Atom::Neg(x) => {
                self.coeff = self.coeff.neg();
                self.push(*x, inverse);
            }
            Atom::Mul(args) => {
                for x in args {
                    self.push(x, inverse);
                }
            }
            Atom::Div(n, d) => {
                self.push(*n, inverse);
                self.push(*d, !inverse);
            }
            a => {
                let (b, e) = base_exponent(a);
                let e = if inverse { e.neg() } else { e };

                if let Some((_, e2)) = self.factors.iter_mut().find(|(b2, _)| *b2 == b) {
                    *e2 = e2.add(&e);
                } else {
                    self.factors.push((b, e));
                }
            }
        }
    }

    fn finish(mut self) -> Atom {
        if self.coeff.is_nan() || self.coeff.is_zero() {
            return Atom::Num(self.coeff);
        }

        let mut num = vec![];
        let mut den = vec![];
        for (b, e) in self.factors {
            if e.is_zero() {
                continue;
            }

            let (e, inverse) = if e.is_negative() {
                (e.neg(), true)
            } else {
                (e, false)
            };

            match pow(b, Atom::Num(e)) {
                Atom::Num(n) => {
                    self.coeff = if inverse {
                        self.coeff.div(&n)
                    } else {
                        self.coeff.mul(&n)
                    };
                }
                Atom::Neg(x) => {
                    self.coeff = self.coeff.neg();
                    if inverse {
                        den.push(*x);
                    } else {
                        num.push(*x);
                    }
                }
                p => {
                    if inverse {
                        den.push(p);
                    } else {
                        num.push(p);
                    }
                }
            }
        }

        if self.coeff.is_nan() || self.coeff.is_zero() {
            return Atom::Num(self.coeff);
        }

        num.sort();
        den.sort();

        let negate = self.coeff.is_negative_one();
        let numerator = if num.is_empty() {
            if negate && !den.is_empty() {
                Atom::one()
            } else {
                Atom::Num(self.coeff.clone())
            }
        } else if self.coeff.is_one() || negate {
            if num.len() == 1 {
                num.swap_remove(0)
            } else {
                Atom::Mul(num)
            }
        } else {
            num.insert(0, Atom::Num(self.coeff.clone()));
            Atom::Mul(num)
        };

        let r = match den.len() {
            0 => {
                if negate && !matches!(numerator, Atom::Num(_)) {
                    return Atom::Neg(Box::new(numerator));
                }
                return numerator;
            }
            1 => Atom::Div(Box::new(numerator), Box::new(den.swap_remove(0))),
            _ => Atom::Div(Box::new(numerator), Box::new(Atom::Mul(den))),
        };

        if negate {
            Atom::Neg(Box::new(r))
        } else {
            r
        }
    }
}

/// Multiply the factors.
pub fn mul<I: IntoIterator<Item = Atom>>(factors: I) -> Atom {
    let mut p = Product::new();
    for f in factors {
        p.push(f, false);
    }
    p.finish()
}

/// Divide `n` by `d`. Division by an exact zero yields `NaN`.
pub fn div(n: Atom, d: Atom) -> Atom {
    if d.is_one() {
        return n;
    }

    let mut p = Product::new();
    p.push(n, false);
    p.push(d, true);
    p.finish()
}

/// Split a term of a sum into its numeric coefficient and the rest.
fn split_term(a: Atom) -> (Number, Atom) {
    match a {
        Atom::Neg(x) => {
            let (c, r) = split_term(*x);
            (c.neg(), r)
        }
        Atom::Mul(mut args) => match args.first() {
            Some(Atom::Num(c)) => {
                let c = c.clone();
                args.remove(0);
                let r = if args.len() == 1 {
                    args.swap_remove(0)
                } else {
                    Atom::Mul(args)
                };
                (c, r)
            }
            _ => (Number::one(), Atom::Mul(args)),
        },
        Atom::Div(n, d) => match split_term(*n) {
            (c, r) if !c.is_one() => (c, div(r, *d)),
            (_, r) => (Number::one(), Atom::Div(Box::new(r), d)),
        },
        Atom::Num(n) => (n, Atom::one()),
        a => (Number::one(), a),
    }
}

/// Add the terms.
pub fn add<I: IntoIterator<Item = Atom>>(terms: I) -> Atom {
    let mut constant = Number::zero();
    let mut collected: Vec<(Atom, Number)> = vec![];
    let mut index: HashMap<Atom, usize> = HashMap::default();

    let mut stack: SmallVec<[Atom; 8]> = terms.into_iter().collect();
    stack.reverse();

    while let Some(t) = stack.pop() {
        match t {
            Atom::Add(args) => stack.extend(args.into_iter().rev()),
            Atom::Num(n) => constant = constant.add(&n),
            t => {
                let (c, r) = split_term(t);
                if let Some(&i) = index.get(&r) {
                    collected[i].1 = collected[i].1.add(&c);
                } else {
                    index.insert(r.clone(), collected.len());
                    collected.push((r, c));
                }
            }
        }
    }

    let mut out = vec![];
    for (r, c) in collected {
        if c.is_zero() {
            continue;
        }

        let t = if c.is_one() {
            r
        } else if c.is_negative_one() {
            neg(r)
        } else {
            mul([Atom::Num(c), r])
        };

        match t {
            Atom::Num(n) => constant = constant.add(&n),
            t => out.push(t),
        }
    }

    if constant.is_nan() {
        return Atom::Num(constant);
    }

    out.sort();
    if !constant.is_zero() || out.is_empty() {
        out.push(Atom::Num(constant));
    }

    if out.len() == 1 {
        out.swap_remove(0)
    } else {
        Atom::Add(out)
    }
}

/// Negate the atom.
pub fn neg(a: Atom) -> Atom {
    match a {
        Atom::Num(n) => Atom::Num(n.neg()),
        Atom::Neg(x) => *x,
        a => mul([Atom::negative_one(), a]),
    }
}

/// Raise `b` to the power `e`.
pub fn pow(b: Atom, e: Atom) -> Atom {
    if e.is_zero() {
        return Atom::one();
    }
    if e.is_one() {
        return b;
    }
    if b.is_one() {
        return Atom::one();
    }

    if let (Atom::Num(nb), Atom::Num(ne)) = (&b, &e) {
        if let Some(r) = nb.pow(ne) {
            return Atom::Num(r);
        }
    }

    if e.as_rational() == Some(&Rational::new(1, 2)) {
        return sqrt(b);
    }

    if e.is_negative() {
        return div(Atom::one(), pow(b, neg(e)));
    }

    let Some(n) = e.as_rational().filter(|r| r.is_integer()).cloned() else {
        return Atom::Pow(Box::new(b), Box::new(e));
    };

    match b {
        Atom::Pow(b2, e2) => match *e2 {
            Atom::Num(e2) => pow(*b2, Atom::Num(e2.mul(&Number::Rational(n)))),
            e2 => Atom::Pow(Box::new(Atom::Pow(b2, Box::new(e2))), Box::new(e)),
        },
        Atom::Sqrt(x) => pow(*x, Atom::Num(Number::Rational(n.mul(&Rational::new(1, 2))))),
        Atom::Neg(x) => {
            let odd = !n.mul(&Rational::new(1, 2)).is_integer();
            let p = pow(*x, e);
            if odd {
                neg(p)
            } else {
                p
            }
        }
        b => Atom::Pow(Box::new(b), Box::new(e)),
    }
}

/// Take the square root of `x`. Perfect squares of rationals and floats are evaluated.
pub fn sqrt(x: Atom) -> Atom {
    match &x {
        Atom::Num(Number::Rational(r)) => {
            if let Some(s) = r.abs().pow_rational(&Rational::new(1, 2)) {
                if r.is_negative() {
                    Atom::num(Complex::new(Rational::zero(), s))
                } else {
                    Atom::num(s)
                }
            } else {
                Atom::Sqrt(Box::new(x))
            }
        }
        Atom::Num(n @ (Number::Float(_) | Number::ComplexFloat(_))) => {
            match n.pow(&Number::from((1, 2))) {
                Some(r) => Atom::Num(r),
                None => Atom::Sqrt(Box::new(x)),
            }
        }
        _ => Atom::Sqrt(Box::new(x)),
    }
}

/// Create a relation. Both sides are kept as-is.
pub fn rel(r: Relation, lhs: Atom, rhs: Atom) -> Atom {
    Atom::Rel(r, Box::new(lhs), Box::new(rhs))
}

#[cfg(test)]
mod test {
    use super::{add, div, mul, neg, pow, sqrt};
    use crate::atom::{Atom, Number};

    fn x() -> Atom {
        Atom::var("x")
    }

    fn y() -> Atom {
        Atom::var("y")
    }

    #[test]
    fn products() {
        assert_eq!(
            mul([x(), Atom::num(2), x()]),
            Atom::Mul(vec![Atom::num(2), pow(x(), Atom::num(2))])
        );
        assert_eq!(mul([Atom::num(-1), x()]), Atom::Neg(Box::new(x())));
        assert_eq!(mul([Atom::zero(), x()]), Atom::zero());
        assert_eq!(mul([Atom::nan(), Atom::zero()]), Atom::nan());
        assert_eq!(mul([sqrt(Atom::num(2)), sqrt(Atom::num(2))]), Atom::num(2));
        assert_eq!(mul([x(), div(Atom::one(), x())]), Atom::one());
    }

    #[test]
    fn quotients() {
        assert_eq!(div(x(), x()), Atom::one());
        assert_eq!(div(Atom::zero(), x()), Atom::zero());
        assert!(div(x(), Atom::zero()).is_nan());
        assert_eq!(div(Atom::num(1), Atom::num(4)), Atom::num((1, 4)));
        assert_eq!(
            div(neg(x()), y()),
            Atom::Neg(Box::new(Atom::Div(Box::new(x()), Box::new(y()))))
        );
        assert_eq!(div(div(x(), y()), x()), div(Atom::one(), y()));
        assert_eq!(
            div(mul([Atom::num(2), x()]), y()),
            Atom::Div(
                Box::new(Atom::Mul(vec![Atom::num(2), x()])),
                Box::new(y())
            )
        );
    }

    #[test]
    fn sums() {
        assert_eq!(add([x(), x()]), mul([Atom::num(2), x()]));
        assert_eq!(add([x(), neg(x())]), Atom::zero());
        assert_eq!(
            add([Atom::num(1), x(), Atom::num(2)]),
            Atom::Add(vec![x(), Atom::num(3)])
        );
        assert_eq!(add([Atom::nan(), x()]), Atom::nan());
    }

    #[test]
    fn powers() {
        assert_eq!(pow(x(), Atom::zero()), Atom::one());
        assert_eq!(pow(Atom::num(2), Atom::num(3)), Atom::num(8));
        assert_eq!(pow(Atom::num(2), Atom::half()), sqrt(Atom::num(2)));
        assert_eq!(
            pow(pow(x(), Atom::num(2)), Atom::num(3)),
            pow(x(), Atom::num(6))
        );
        assert_eq!(pow(sqrt(x()), Atom::num(2)), x());
        assert_eq!(pow(neg(x()), Atom::num(3)), neg(pow(x(), Atom::num(3))));
        assert_eq!(
            pow(x(), Atom::num(-1)),
            Atom::Div(Box::new(Atom::one()), Box::new(x()))
        );
    }

    #[test]
    fn square_roots() {
        assert_eq!(sqrt(Atom::num(9)), Atom::num(3));
        assert_eq!(sqrt(Atom::num(-4)), mul([Atom::num(2), Atom::i()]));
        assert_eq!(sqrt(Atom::num(8)), Atom::Sqrt(Box::new(Atom::num(8))));
        assert_eq!(
            sqrt(Atom::num(Number::from(2.25))),
            Atom::num(Number::from(1.5))
        );
    }
}
