//! Exact factorization into a rational normal form.
//!
//! An expression is decomposed into a [FactorSet], its exact numbers are
//! merged without floating point approximation and the result is reassembled
//! through the canonical constructors.
mod factor_set;
mod together;

use tracing::{debug, instrument, trace};

use crate::atom::{canonical, Atom};

pub use self::factor_set::{common_factors, FactorSet};
pub use self::together::together;

fn reduced(expr: &Atom) -> FactorSet {
    let mut f = FactorSet::new(expr);
    f.reduce();
    f
}

/// Factor a canonical expression.
///
/// - A relation is divided on both sides by the factor the sides have in common.
///   The sign of that factor is not taken into account.
/// - A sum yields the greatest common factor of its terms.
/// - Any other expression has its fractions combined and its exact numbers merged.
#[instrument(level = "trace", fields(%expr))]
pub fn factor(expr: &Atom) -> Atom {
    debug_assert!(
        expr.is_canonical(),
        "factor expects a canonical expression"
    );

    match expr {
        Atom::Rel(r, lhs, rhs) => {
            let mut lhs = reduced(lhs);
            let mut rhs = reduced(rhs);

            let common = common_factors(&lhs, &rhs);
            if !common.is_one() {
                debug!("Dividing both sides by {}", common);
                lhs.div(&common);
                lhs.reduce();
                rhs.div(&common);
                rhs.reduce();
            }

            canonical::rel(*r, lhs.as_expression(), rhs.as_expression())
        }
        Atom::Add(terms) => {
            let mut terms = terms.iter();
            let Some(first) = terms.next() else {
                return Atom::zero();
            };

            let mut common = reduced(first);
            for t in terms {
                let c = common_factors(&common, &reduced(t));
                trace!("Common factor so far: {}", c);
                if c.is_one() {
                    return c;
                }
                common = reduced(&c);
            }

            common.as_expression()
        }
        _ => reduced(expr).as_expression(),
    }
}

impl Atom {
    /// Factor the atom. See [factor].
    pub fn factor(&self) -> Atom {
        factor(self)
    }

    /// Combine the fractions in the atom. See [together].
    pub fn together(&self) -> Atom {
        together(self)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        atom::{canonical, Atom, Relation},
        parse,
    };

    #[test]
    fn products() {
        assert_eq!(parse!("sqrt(2)*sqrt(8)").factor(), Atom::num(4));
        assert_eq!(parse!("sqrt(8)*x").factor(), parse!("2*sqrt(2)*x"));
        assert_eq!(parse!("x^2*y/x").factor(), parse!("x*y"));
        assert_eq!(parse!("-x*sqrt(18)/3").factor(), parse!("-sqrt(2)*x"));
    }

    #[test]
    fn fractions() {
        assert_eq!(parse!("x/sqrt(2)").factor(), parse!("sqrt(2)*x/2"));
        assert_eq!(
            parse!("-(a/b + c/d)").factor(),
            canonical::neg(parse!("(a + c)/(b + d)"))
        );
        assert_eq!(parse!("a/b + c/b").factor(), parse!("1/b"));
    }

    #[test]
    fn relations() {
        let r = canonical::rel(Relation::Less, parse!("2*x"), parse!("2*y"));
        assert_eq!(r.factor(), parse!("x < y"));

        let r = parse!("6*x*z == 4*y*z");
        assert_eq!(r.factor(), parse!("3*x == 2*y"));

        let r = parse!("2^x*a < 2^x*b");
        assert_eq!(r.factor(), parse!("a < b"));

        let r = parse!("2.0*x < 4*y");
        assert_eq!(r.factor(), parse!("x < 2*y"));

        let r = parse!("x >= y");
        assert_eq!(r.factor(), r);
    }

    #[test]
    fn sums() {
        assert_eq!(parse!("6*x + 9*y").factor(), Atom::num(3));
        assert_eq!(parse!("4*x*y + 6*x^2").factor(), parse!("2*x"));
        assert_eq!(parse!("x + y").factor(), Atom::one());
        assert_eq!(parse!("2^x*a + 2^x*b").factor(), parse!("2^x"));
    }

    #[test]
    fn special_values() {
        assert_eq!(parse!("0*x").factor(), Atom::zero());
        assert_eq!(parse!("NaN*x").factor(), Atom::nan());
        assert_eq!(parse!("-Infinity*x").factor(), Atom::infinity(false));
    }

    #[test]
    fn idempotence() {
        for s in ["sqrt(2)*sqrt(8)*x", "-3*x^2/y", "6*x + 9*y", "2*x < 4*y"] {
            let f = parse!(s).factor();
            assert_eq!(f.factor(), f);
        }
    }
}
