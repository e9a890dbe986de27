use crate::atom::{canonical, Atom};

// Unary negation
impl std::ops::Neg for &Atom {
    type Output = Atom;
    fn neg(self) -> Atom {
        canonical::neg(self.clone())
    }
}

impl std::ops::Neg for Atom {
    type Output = Atom;
    fn neg(self) -> Atom {
        canonical::neg(self)
    }
}

fn subtract(lhs: Atom, rhs: Atom) -> Atom {
    canonical::add([lhs, canonical::neg(rhs)])
}

/// Implements the binary operations and their assignment forms for owned and
/// borrowed atoms. All results are canonical.
macro_rules! impl_atom_arithmetic {
    () => {
        impl_binary_ops!(Add, add, |a, b| canonical::add([a, b]));
        impl_binary_ops!(Sub, sub, subtract);
        impl_binary_ops!(Mul, mul, |a, b| canonical::mul([a, b]));
        impl_binary_ops!(Div, div, canonical::div);

        impl_assign_ops!(AddAssign, add_assign, Add, add);
        impl_assign_ops!(SubAssign, sub_assign, Sub, sub);
        impl_assign_ops!(MulAssign, mul_assign, Mul, mul);
        impl_assign_ops!(DivAssign, div_assign, Div, div);
    };
}

macro_rules! impl_binary_ops {
    ($op_trait:ident, $op_method:ident, $op_fn:expr) => {
        // Atom op Atom
        impl std::ops::$op_trait<Atom> for Atom {
            type Output = Atom;
            fn $op_method(self, rhs: Atom) -> Atom {
                let f: fn(Atom, Atom) -> Atom = $op_fn;
                f(self, rhs)
            }
        }

        // &Atom op Atom
        impl std::ops::$op_trait<Atom> for &Atom {
            type Output = Atom;
            fn $op_method(self, rhs: Atom) -> Atom {
                let f: fn(Atom, Atom) -> Atom = $op_fn;
                f(self.clone(), rhs)
            }
        }

        // Atom op &Atom
        impl std::ops::$op_trait<&Atom> for Atom {
            type Output = Atom;
            fn $op_method(self, rhs: &Atom) -> Atom {
                let f: fn(Atom, Atom) -> Atom = $op_fn;
                f(self, rhs.clone())
            }
        }

        // &Atom op &Atom
        impl std::ops::$op_trait<&Atom> for &Atom {
            type Output = Atom;
            fn $op_method(self, rhs: &Atom) -> Atom {
                let f: fn(Atom, Atom) -> Atom = $op_fn;
                f(self.clone(), rhs.clone())
            }
        }
    };
}

macro_rules! impl_assign_ops {
    ($assign_trait:ident, $assign_method:ident, $op_trait:ident, $op_method:ident) => {
        impl std::ops::$assign_trait<Atom> for Atom {
            fn $assign_method(&mut self, rhs: Atom) {
                let lhs = std::mem::take(self);
                *self = std::ops::$op_trait::$op_method(lhs, rhs);
            }
        }

        impl std::ops::$assign_trait<&Atom> for Atom {
            fn $assign_method(&mut self, rhs: &Atom) {
                let lhs = std::mem::take(self);
                *self = std::ops::$op_trait::$op_method(lhs, rhs);
            }
        }
    };
}

impl_atom_arithmetic!();

#[cfg(test)]
mod test {
    use crate::{atom::Atom, parse};

    #[test]
    fn arithmetic() {
        let x = Atom::var("x");
        let y = Atom::var("y");

        assert_eq!(&x + &x, parse!("2*x"));
        assert_eq!(&x - &x, Atom::zero());
        assert_eq!(&x * &y / &x, y);
        assert_eq!(-(-&x), x);

        let mut z = x.clone();
        z *= &y;
        z += Atom::num(1);
        assert_eq!(z, parse!("x*y + 1"));
    }
}
