use std::fmt::{self, Write};

use crate::atom::{Atom, Number};

/// Options that control the textual output of an atom.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// The symbol that separates factors of a product.
    pub multiplication_operator: char,
    /// Print `sqrt(x)` as `x^(1/2)`.
    pub square_root_as_power: bool,
    /// Print exponentiation as `**` instead of `^`.
    pub double_star_for_exponentiation: bool,
}

impl PrintOptions {
    pub const fn new() -> PrintOptions {
        PrintOptions {
            multiplication_operator: '*',
            square_root_as_power: false,
            double_star_for_exponentiation: false,
        }
    }

    /// Output that can be read by Python-like languages.
    pub const fn python() -> PrintOptions {
        PrintOptions {
            multiplication_operator: '*',
            square_root_as_power: true,
            double_star_for_exponentiation: true,
        }
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions::new()
    }
}

/// Binding strength of the outermost operator of an atom.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Rel,
    Add,
    Mul,
    Neg,
    Pow,
    Atom,
}

fn number_precedence(n: &Number) -> Precedence {
    match n {
        Number::Rational(r) => {
            if r.is_negative() {
                Precedence::Neg
            } else if !r.is_integer() {
                Precedence::Mul
            } else {
                Precedence::Atom
            }
        }
        Number::Complex(c) => {
            if !c.re.is_zero() {
                Precedence::Add
            } else if c.im.is_negative() {
                Precedence::Neg
            } else if c.im.is_one() {
                Precedence::Atom
            } else {
                Precedence::Mul
            }
        }
        Number::Float(f) => {
            if *f < 0. {
                Precedence::Neg
            } else {
                Precedence::Atom
            }
        }
        Number::ComplexFloat(_) => Precedence::Add,
    }
}

fn precedence(a: &Atom) -> Precedence {
    match a {
        Atom::Num(n) => number_precedence(n),
        Atom::Var(_) | Atom::Fun(_, _) | Atom::Sqrt(_) => Precedence::Atom,
        Atom::Pow(_, _) => Precedence::Pow,
        Atom::Neg(_) => Precedence::Neg,
        Atom::Mul(_) | Atom::Div(_, _) => Precedence::Mul,
        Atom::Add(_) => Precedence::Add,
        Atom::Rel(_, _, _) => Precedence::Rel,
    }
}

pub struct AtomPrinter<'a> {
    pub atom: &'a Atom,
    pub print_opts: PrintOptions,
}

impl<'a> AtomPrinter<'a> {
    /// Create a new atom printer with default print options.
    pub fn new(atom: &'a Atom) -> AtomPrinter<'a> {
        AtomPrinter {
            atom,
            print_opts: PrintOptions::default(),
        }
    }

    pub fn new_with_options(atom: &'a Atom, print_opts: PrintOptions) -> AtomPrinter<'a> {
        AtomPrinter { atom, print_opts }
    }
}

impl fmt::Display for AtomPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.atom.format(f, &self.print_opts)
    }
}

impl Atom {
    /// Write the atom, with parentheses when it binds weaker than `min`.
    fn format_with_min<W: Write>(
        &self,
        f: &mut W,
        opts: &PrintOptions,
        min: Precedence,
    ) -> fmt::Result {
        if precedence(self) < min {
            f.write_char('(')?;
            self.format(f, opts)?;
            f.write_char(')')
        } else {
            self.format(f, opts)
        }
    }

    fn format_exponent_operator<W: Write>(f: &mut W, opts: &PrintOptions) -> fmt::Result {
        if opts.double_star_for_exponentiation {
            f.write_str("**")
        } else {
            f.write_char('^')
        }
    }

    pub(crate) fn format<W: Write>(&self, f: &mut W, opts: &PrintOptions) -> fmt::Result {
        match self {
            Atom::Num(n) => write!(f, "{}", n),
            Atom::Var(v) => f.write_str(v.as_str()),
            Atom::Fun(name, args) => {
                f.write_str(name.as_str())?;
                f.write_char('(')?;

                let mut first = true;
                for x in args {
                    if !first {
                        f.write_char(',')?;
                    }
                    first = false;

                    x.format(f, opts)?;
                }

                f.write_char(')')
            }
            Atom::Mul(args) => {
                let mut first = true;
                for x in args {
                    if !first {
                        f.write_char(opts.multiplication_operator)?;
                    }

                    // a leading coefficient may carry a sign or be a fraction
                    if first && matches!(x, Atom::Num(Number::Rational(_))) {
                        x.format(f, opts)?;
                    } else {
                        x.format_with_min(f, opts, Precedence::Pow)?;
                    }
                    first = false;
                }
                Ok(())
            }
            Atom::Add(args) => {
                let mut first = true;
                for x in args {
                    let mut term = String::new();
                    x.format_with_min(&mut term, opts, Precedence::Mul)?;

                    if !first && !term.starts_with('-') {
                        f.write_char('+')?;
                    }
                    first = false;

                    f.write_str(&term)?;
                }
                Ok(())
            }
            Atom::Div(n, d) => {
                n.format_with_min(f, opts, Precedence::Mul)?;
                f.write_char('/')?;
                d.format_with_min(f, opts, Precedence::Pow)
            }
            Atom::Pow(b, e) => {
                if opts.square_root_as_power && matches!(**b, Atom::Sqrt(_)) {
                    f.write_char('(')?;
                    b.format(f, opts)?;
                    f.write_char(')')?;
                } else {
                    b.format_with_min(f, opts, Precedence::Atom)?;
                }
                Atom::format_exponent_operator(f, opts)?;
                e.format_with_min(f, opts, Precedence::Atom)
            }
            Atom::Sqrt(x) => {
                if opts.square_root_as_power {
                    x.format_with_min(f, opts, Precedence::Atom)?;
                    Atom::format_exponent_operator(f, opts)?;
                    f.write_str("(1/2)")
                } else {
                    f.write_str("sqrt(")?;
                    x.format(f, opts)?;
                    f.write_char(')')
                }
            }
            Atom::Neg(x) => {
                f.write_char('-')?;
                x.format_with_min(f, opts, Precedence::Mul)
            }
            Atom::Rel(r, a, b) => {
                a.format_with_min(f, opts, Precedence::Add)?;
                f.write_str(r.as_str())?;
                b.format_with_min(f, opts, Precedence::Add)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        atom::{Atom, Relation},
        parse,
        printer::PrintOptions,
    };

    #[test]
    fn canonical_output() {
        assert_eq!(parse!("2*x + y^2 - 3").to_string(), "y^2+2*x-3");
        assert_eq!(parse!("-x/(y*z)").to_string(), "-x/(y*z)");
        assert_eq!(parse!("(x+1)^(1/3)").to_string(), "(x+1)^(1/3)");
        assert_eq!(parse!("x*(-1/2)").to_string(), "-1/2*x");
        assert_eq!(parse!("sqrt(2)*(a+b)").to_string(), "sqrt(2)*(a+b)");
        assert_eq!(parse!("x < y + 1").to_string(), "x<y+1");
    }

    #[test]
    fn raw_trees() {
        let a = Atom::Neg(Box::new(Atom::Add(vec![Atom::var("a"), Atom::var("b")])));
        assert_eq!(a.to_string(), "-(a+b)");

        let r = Atom::Rel(
            Relation::GreaterEqual,
            Box::new(Atom::Rel(
                Relation::Less,
                Box::new(Atom::var("a")),
                Box::new(Atom::var("b")),
            )),
            Box::new(Atom::var("c")),
        );
        assert_eq!(r.to_string(), "(a<b)>=c");
    }

    #[test]
    fn options() {
        let a = parse!("sqrt(x)*y^2");
        let opts = PrintOptions {
            multiplication_operator: ' ',
            ..PrintOptions::new()
        };
        assert_eq!(a.printer(opts).to_string(), "y^2 sqrt(x)");
        assert_eq!(
            a.printer(PrintOptions::python()).to_string(),
            "y**2*x**(1/2)"
        );
    }
}
