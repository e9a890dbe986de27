//! Defines the expression tree that the factorization engine consumes and produces.
//!
//! Atoms are plain owned trees. All constructors in [canonical] normalize their
//! output, so that two mathematically identical expressions that are built the
//! same way are structurally equal.
//!
//! # Examples
//!
//! Parse an expression and factor it:
//!
//! ```
//! use symfactor::parse;
//!
//! let a = parse!("sqrt(2)*sqrt(8)*x");
//! assert_eq!(a.factor(), parse!("4*x"));
//! ```
//!
//! Build an expression with operator overloading:
//!
//! ```
//! use symfactor::{atom::Atom, parse};
//!
//! let x = Atom::var("x");
//! let expr = &x * &Atom::num(2) + Atom::num(1);
//! assert_eq!(expr, parse!("2*x + 1"));
//! ```
pub mod canonical;
pub mod number;
mod ops;

use std::{cmp::Ordering, fmt};

use smartstring::{LazyCompact, SmartString};

use crate::{
    domains::rational::Rational,
    parser::Token,
    printer::{AtomPrinter, PrintOptions},
};

pub use self::number::Number;

/// The name of a variable or function.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(SmartString<LazyCompact>);

impl Symbol {
    pub fn new(name: &str) -> Symbol {
        Symbol(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The comparison operator of a relational atom.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Relation {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Equal => "==",
            Relation::NotEqual => "!=",
            Relation::Less => "<",
            Relation::LessEqual => "<=",
            Relation::Greater => ">",
            Relation::GreaterEqual => ">=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbolic expression.
///
/// The variants can be constructed directly to obtain a raw, unnormalized tree.
/// Use the functions in [canonical] or the operator overloads to obtain
/// a canonical expression.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Num(Number),
    Var(Symbol),
    Fun(Symbol, Vec<Atom>),
    Mul(Vec<Atom>),
    Add(Vec<Atom>),
    Div(Box<Atom>, Box<Atom>),
    Pow(Box<Atom>, Box<Atom>),
    Sqrt(Box<Atom>),
    Neg(Box<Atom>),
    Rel(Relation, Box<Atom>, Box<Atom>),
}

impl Default for Atom {
    fn default() -> Self {
        Atom::zero()
    }
}

impl From<Number> for Atom {
    fn from(n: Number) -> Self {
        Atom::Num(n)
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The canonical order of atoms: numbers first, then variables, functions,
/// powers and all compound atoms.
impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Atom::Num(a), Atom::Num(b)) => a.cmp(b),
            (Atom::Var(a), Atom::Var(b)) => a.cmp(b),
            (Atom::Fun(f1, a1), Atom::Fun(f2, a2)) => f1.cmp(f2).then_with(|| a1.cmp(a2)),
            (Atom::Pow(b1, e1), Atom::Pow(b2, e2)) => b1.cmp(b2).then_with(|| e1.cmp(e2)),
            (Atom::Sqrt(a), Atom::Sqrt(b)) | (Atom::Neg(a), Atom::Neg(b)) => a.cmp(b),
            (Atom::Mul(a), Atom::Mul(b)) | (Atom::Add(a), Atom::Add(b)) => a.cmp(b),
            (Atom::Div(n1, d1), Atom::Div(n2, d2)) => n1.cmp(n2).then_with(|| d1.cmp(d2)),
            (Atom::Rel(r1, l1, h1), Atom::Rel(r2, l2, h2)) => r1
                .cmp(r2)
                .then_with(|| l1.cmp(l2))
                .then_with(|| h1.cmp(h2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&AtomPrinter::new(self), f)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&AtomPrinter::new(self), f)
    }
}

impl Atom {
    fn rank(&self) -> u8 {
        match self {
            Atom::Num(_) => 0,
            Atom::Var(_) => 1,
            Atom::Fun(_, _) => 2,
            Atom::Pow(_, _) => 3,
            Atom::Sqrt(_) => 4,
            Atom::Mul(_) => 5,
            Atom::Add(_) => 6,
            Atom::Div(_, _) => 7,
            Atom::Neg(_) => 8,
            Atom::Rel(_, _, _) => 9,
        }
    }

    /// Create a numeric literal.
    pub fn num<T: Into<Number>>(n: T) -> Atom {
        Atom::Num(n.into())
    }

    pub fn var(name: &str) -> Atom {
        Atom::Var(Symbol::new(name))
    }

    /// Create an opaque function call.
    pub fn fun(name: &str, args: Vec<Atom>) -> Atom {
        Atom::Fun(Symbol::new(name), args)
    }

    pub fn zero() -> Atom {
        Atom::Num(Number::zero())
    }

    pub fn one() -> Atom {
        Atom::Num(Number::one())
    }

    pub fn negative_one() -> Atom {
        Atom::Num(Number::negative_one())
    }

    pub fn half() -> Atom {
        Atom::num((1, 2))
    }

    /// The imaginary unit.
    pub fn i() -> Atom {
        Atom::Num(Number::i())
    }

    pub fn nan() -> Atom {
        Atom::Num(Number::nan())
    }

    pub fn infinity(positive: bool) -> Atom {
        Atom::Num(Number::infinity(positive))
    }

    /// Parse an atom from a string. The result is canonical.
    pub fn parse(input: &str) -> Result<Atom, String> {
        Token::parse(input)?.to_atom()
    }

    /// Construct a printer for the atom with special options.
    pub fn printer(&self, opts: PrintOptions) -> AtomPrinter<'_> {
        AtomPrinter::new_with_options(self, opts)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Atom::Num(_))
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Atom::Num(n) => Some(n),
            _ => None,
        }
    }

    /// Get the value of an exact rational literal.
    pub fn as_rational(&self) -> Option<&Rational> {
        self.as_number().and_then(Number::as_rational)
    }

    /// Get `q` if the atom has the shape `sqrt(q)` or `q^(1/2)` for an exact rational `q`.
    pub fn as_rational_sqrt(&self) -> Option<&Rational> {
        match self {
            Atom::Sqrt(x) => x.as_rational(),
            Atom::Pow(b, e) => {
                if e.as_rational() == Some(&Rational::new(1, 2)) {
                    b.as_rational()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_one())
    }

    pub fn is_negative_one(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_negative_one())
    }

    /// Check if the atom is a numeric literal that is known to be negative.
    pub fn is_negative(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_negative())
    }

    /// Check if the atom is a numeric literal that is known to be positive.
    pub fn is_positive(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_positive())
    }

    /// Check if the atom is a numeric literal that is known to be zero or positive.
    /// Symbolic atoms have an unknown sign and yield `false`.
    pub fn is_nonnegative(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_positive() || n.is_zero())
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_nan())
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_infinity())
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_exact())
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Atom::Num(n) if n.is_integer())
    }

    /// Rebuild the atom bottom-up through the canonical constructors.
    pub fn canonicalize(&self) -> Atom {
        match self {
            Atom::Num(_) | Atom::Var(_) => self.clone(),
            Atom::Fun(f, args) => {
                Atom::Fun(f.clone(), args.iter().map(Atom::canonicalize).collect())
            }
            Atom::Mul(args) => canonical::mul(args.iter().map(Atom::canonicalize)),
            Atom::Add(args) => canonical::add(args.iter().map(Atom::canonicalize)),
            Atom::Div(n, d) => canonical::div(n.canonicalize(), d.canonicalize()),
            Atom::Pow(b, e) => canonical::pow(b.canonicalize(), e.canonicalize()),
            Atom::Sqrt(x) => canonical::sqrt(x.canonicalize()),
            Atom::Neg(x) => canonical::neg(x.canonicalize()),
            Atom::Rel(r, a, b) => canonical::rel(*r, a.canonicalize(), b.canonicalize()),
        }
    }

    /// Check if the atom is unchanged by [Atom::canonicalize].
    pub fn is_canonical(&self) -> bool {
        self.canonicalize() == *self
    }
}

/// Parse an atom from a string.
/// Panics when the input is not a valid expression. Use [try_parse!](crate::try_parse) for fallible parsing.
///
/// # Examples
/// ```
/// use symfactor::parse;
/// let a = parse!("x^2 + 5 + f(x)");
/// println!("{}", a);
/// ```
#[macro_export]
macro_rules! parse {
    ($s: expr) => {
        $crate::try_parse!($s).unwrap()
    };
}

/// Try to parse an atom from a string. Use [parse!](crate::parse) for parsing that panics on an error.
#[macro_export]
macro_rules! try_parse {
    ($s: expr) => {
        $crate::atom::Atom::parse($s)
    };
}

#[cfg(test)]
mod test {
    use super::{Atom, Number, Relation};
    use crate::domains::rational::Rational;

    #[test]
    fn ordering() {
        let mut v = vec![
            Atom::Neg(Box::new(Atom::var("x"))),
            Atom::var("y"),
            Atom::num(3),
            Atom::fun("f", vec![Atom::var("x")]),
            Atom::var("x"),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Atom::num(3),
                Atom::var("x"),
                Atom::var("y"),
                Atom::fun("f", vec![Atom::var("x")]),
                Atom::Neg(Box::new(Atom::var("x"))),
            ]
        );
    }

    #[test]
    fn predicates() {
        assert!(Atom::num(-2).is_negative());
        assert!(!Atom::var("x").is_negative());
        assert!(!Atom::var("x").is_nonnegative());
        assert!(Atom::zero().is_nonnegative());
        assert!(Atom::nan().is_nan());
        assert!(Atom::infinity(false).is_infinity());
        assert!(Atom::num(Number::from(1.5)).is_number());
        assert!(!Atom::num(Number::from(1.5)).is_exact());
    }

    #[test]
    fn rational_sqrt_shapes() {
        let s = Atom::Sqrt(Box::new(Atom::num(3)));
        assert_eq!(s.as_rational_sqrt(), Some(&Rational::from(3)));

        let p = Atom::Pow(Box::new(Atom::num((2, 3))), Box::new(Atom::half()));
        assert_eq!(p.as_rational_sqrt(), Some(&Rational::new(2, 3)));

        let q = Atom::Pow(Box::new(Atom::num(2)), Box::new(Atom::num((1, 3))));
        assert_eq!(q.as_rational_sqrt(), None);
    }

    #[test]
    fn canonical_check() {
        let raw = Atom::Mul(vec![Atom::var("x"), Atom::num(2)]);
        assert!(!raw.is_canonical());
        assert!(raw.canonicalize().is_canonical());

        let rel = Atom::Rel(
            Relation::Less,
            Box::new(Atom::var("x")),
            Box::new(Atom::var("y")),
        );
        assert!(rel.is_canonical());
    }
}
