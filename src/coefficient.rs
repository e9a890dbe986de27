//! Split a term into its exact numeric coefficient and its symbolic remainder.
use crate::atom::{canonical, Atom, Number};

/// Split `expr` into `(coefficient, remainder)` such that their product is `expr`.
///
/// The coefficient collects numeric literals and square roots of rationals.
/// When nothing can be split off, `(1, expr)` is returned.
pub fn as_coefficient(expr: &Atom) -> (Atom, Atom) {
    match expr {
        Atom::Mul(args) => {
            let (numeric, rest): (Vec<_>, Vec<_>) = args
                .iter()
                .cloned()
                .partition(|a| a.is_number() || a.as_rational_sqrt().is_some());

            let coeff = canonical::mul(numeric);
            if coeff.is_one() {
                return (Atom::one(), expr.clone());
            }

            (coeff, canonical::mul(rest))
        }
        Atom::Div(n, d) => {
            let (cn, rn) = as_coefficient(n);
            let (cd, rd) = as_coefficient(d);

            if rn.is_one() && rd.is_one() {
                return (expr.clone(), Atom::one());
            }

            let coeff = canonical::div(cn, cd);
            if rd.is_one() {
                return (coeff, rn);
            }
            if coeff.is_one() {
                return (Atom::one(), expr.clone());
            }

            (coeff, canonical::div(rn, rd))
        }
        Atom::Pow(b, e) if e.is_number() => {
            let (c, r) = as_coefficient(b);
            if c.is_one() {
                return (Atom::one(), expr.clone());
            }

            (
                canonical::pow(c, (**e).clone()),
                canonical::pow(r, (**e).clone()),
            )
        }
        Atom::Sqrt(x) => {
            let (c, r) = as_coefficient(x);
            (canonical::sqrt(c), canonical::sqrt(r))
        }
        Atom::Neg(x) => {
            let (c, r) = as_coefficient(x);
            (canonical::neg(c), r)
        }
        Atom::Num(n) => {
            let negative_real = match n {
                Number::Complex(c) => c.re.is_negative(),
                Number::ComplexFloat(c) => c.re < 0.,
                _ => false,
            };

            if negative_real {
                (Atom::negative_one(), Atom::Num(n.neg()))
            } else {
                (expr.clone(), Atom::one())
            }
        }
        _ => (Atom::one(), expr.clone()),
    }
}

impl Atom {
    /// Split the atom into its exact numeric coefficient and the symbolic remainder.
    /// See [as_coefficient].
    pub fn as_coefficient(&self) -> (Atom, Atom) {
        as_coefficient(self)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        atom::{canonical, Atom},
        domains::{complex::Complex, rational::Rational},
        parse,
    };

    use super::as_coefficient;

    #[test]
    fn products() {
        let (c, r) = parse!("3*sqrt(2)*x*y").as_coefficient();
        assert_eq!(c, parse!("3*sqrt(2)"));
        assert_eq!(r, parse!("x*y"));

        let e = parse!("x*y");
        assert_eq!(e.as_coefficient(), (Atom::one(), e.clone()));
    }

    #[test]
    fn negation() {
        let e = Atom::Neg(Box::new(Atom::Mul(vec![Atom::num(2), Atom::var("x")])));
        assert_eq!(as_coefficient(&e), (Atom::num(-2), Atom::var("x")));
    }

    #[test]
    fn quotients() {
        let e = parse!("2*x/(3*y)");
        assert_eq!(e.as_coefficient(), (Atom::num((2, 3)), parse!("x/y")));

        let e = parse!("6*x/3");
        assert_eq!(e.as_coefficient(), (Atom::num(2), Atom::var("x")));

        let e = parse!("x/y");
        assert_eq!(e.as_coefficient(), (Atom::one(), e.clone()));

        let numeric = Atom::Div(Box::new(Atom::num(2)), Box::new(Atom::num(3)));
        assert_eq!(as_coefficient(&numeric), (numeric.clone(), Atom::one()));
    }

    #[test]
    fn powers_and_roots() {
        let e = Atom::Pow(Box::new(parse!("2*x")), Box::new(Atom::num(3)));
        assert_eq!(as_coefficient(&e), (Atom::num(8), parse!("x^3")));

        let e = Atom::Sqrt(Box::new(parse!("4*x")));
        assert_eq!(as_coefficient(&e), (Atom::num(2), parse!("sqrt(x)")));

        let e = parse!("x^y");
        assert_eq!(e.as_coefficient(), (Atom::one(), e.clone()));
    }

    #[test]
    fn numbers() {
        let c = Atom::num(Complex::new(Rational::from(-1), Rational::from(2)));
        assert_eq!(
            c.as_coefficient(),
            (
                Atom::negative_one(),
                Atom::num(Complex::new(Rational::from(1), Rational::from(-2)))
            )
        );

        assert_eq!(Atom::num(5).as_coefficient(), (Atom::num(5), Atom::one()));
        assert_eq!(parse!("a+b").as_coefficient(), (Atom::one(), parse!("a+b")));
    }

    #[test]
    fn product_is_preserved() {
        for s in ["3*sqrt(2)*x", "-5*x/(2*y)", "2*x/(3*y)", "x + 1", "7"] {
            let e = parse!(s);
            let (c, r) = e.as_coefficient();
            assert_eq!(canonical::mul([c, r]), e);
        }
    }
}
