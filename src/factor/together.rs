use smallvec::SmallVec;

use crate::atom::{canonical, Atom};

/// Combine the fractions of a sum into a single fraction.
///
/// The numerators of all terms are added, and so are the denominators of all
/// quotient terms: `a/b + c/d` becomes `(a + c)/(b + d)`. Terms are not
/// cross-multiplied. A sum without quotient terms is returned unchanged.
/// Relations are rewritten on both sides.
pub fn together(expr: &Atom) -> Atom {
    match expr {
        Atom::Rel(r, lhs, rhs) => canonical::rel(*r, together(lhs), together(rhs)),
        Atom::Div(n, d) => canonical::div((**n).clone(), (**d).clone()),
        Atom::Add(terms) => {
            let mut num: SmallVec<[Atom; 6]> = SmallVec::new();
            let mut den: SmallVec<[Atom; 6]> = SmallVec::new();

            for t in terms {
                match t {
                    Atom::Div(n, d) => {
                        num.push((**n).clone());
                        den.push((**d).clone());
                    }
                    t => num.push(t.clone()),
                }
            }

            if den.is_empty() {
                return expr.clone();
            }

            canonical::div(canonical::add(num), canonical::add(den))
        }
        Atom::Neg(x) => canonical::neg(together(x)),
        _ => expr.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::together;
    use crate::{
        atom::{canonical, Atom, Relation},
        parse,
    };

    #[test]
    fn sums() {
        let a = parse!("a/b + c/d");
        assert_eq!(together(&a), parse!("(a + c)/(b + d)"));

        let a = parse!("x + 1/y");
        assert_eq!(together(&a), parse!("(x + 1)/y"));

        let a = parse!("x + y");
        assert_eq!(together(&a), a);
    }

    #[test]
    fn wrappers() {
        let q = Atom::Div(Box::new(Atom::var("x")), Box::new(Atom::var("x")));
        assert_eq!(together(&q), Atom::one());

        let n = Atom::Neg(Box::new(parse!("a/b + c/d")));
        assert_eq!(together(&n), canonical::neg(parse!("(a + c)/(b + d)")));

        let r = parse!("a/b + c/d < 1/y + x/y");
        assert_eq!(
            together(&r),
            canonical::rel(
                Relation::Less,
                parse!("(a + c)/(b + d)"),
                parse!("(x + 1)/(2*y)"),
            )
        );

        assert_eq!(together(&Atom::var("x")), Atom::var("x"));
    }
}
