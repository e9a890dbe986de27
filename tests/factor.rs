use symfactor::{
    atom::{canonical, Atom, Relation},
    domains::{complex::Complex, rational::Rational},
    factor::{common_factors, factor, together, FactorSet},
    parse,
};

#[test]
fn square_roots() {
    let input = Atom::parse("sqrt(2)*sqrt(8)").unwrap();
    assert_eq!(factor(&input), Atom::num(4));

    let input = Atom::parse("sqrt(3)*sqrt(6)*y").unwrap();
    assert_eq!(input.factor(), parse!("3*sqrt(2)*y"));
}

#[test]
fn gaussian_integers() {
    let product = Atom::Mul(vec![
        Atom::num(Complex::new(Rational::one(), Rational::one())),
        Atom::num(Complex::new(Rational::one(), Rational::from(-1))),
    ]);

    let mut f = FactorSet::new(&product);
    f.reduce();
    assert_eq!(f.as_expression(), Atom::num(2));

    // the parser evaluates the product right away
    assert_eq!(parse!("(1+i)*(1-i)").factor(), Atom::num(2));
}

#[test]
fn coefficients() {
    let e = Atom::Neg(Box::new(Atom::Mul(vec![Atom::num(2), Atom::var("x")])));
    assert_eq!(e.as_coefficient(), (Atom::num(-2), Atom::var("x")));

    let e = parse!("-3*sqrt(5)*x^2/y");
    let (c, r) = e.as_coefficient();
    assert_eq!(c, parse!("-3*sqrt(5)"));
    assert_eq!(r, parse!("x^2/y"));
    assert_eq!(canonical::mul([c, r]), e);
}

#[test]
fn fractions() {
    let a = Atom::var("a");
    let b = Atom::var("b");
    let c = Atom::var("c");
    let d = Atom::var("d");

    let sum = Atom::Add(vec![
        Atom::Div(Box::new(a.clone()), Box::new(b.clone())),
        Atom::Div(Box::new(c.clone()), Box::new(d.clone())),
    ]);

    assert_eq!(
        together(&sum),
        Atom::Div(
            Box::new(Atom::Add(vec![a, c])),
            Box::new(Atom::Add(vec![b, d]))
        )
    );
}

#[test]
fn relations() {
    let r = canonical::rel(Relation::Less, parse!("2*x"), parse!("2*y"));
    assert_eq!(
        r.factor(),
        Atom::Rel(
            Relation::Less,
            Box::new(Atom::var("x")),
            Box::new(Atom::var("y"))
        )
    );

    let r = parse!("x^2*z/3 != x*z^2");
    assert_eq!(r.factor(), parse!("x/3 != z"));
}

#[test]
fn common_factor_of_sums() {
    assert_eq!(parse!("6*x + 9*y").factor(), Atom::num(3));
    assert_eq!(parse!("x^2*y + x^3*z").factor(), parse!("x^2"));

    let a = FactorSet::new(&parse!("10*x/y"));
    let b = FactorSet::new(&parse!("15/y^2"));
    assert_eq!(common_factors(&a, &b), parse!("5/y"));
}

#[test]
fn absorbing_values() {
    let zero_inverse = Atom::Pow(Box::new(Atom::zero()), Box::new(Atom::negative_one()));
    let e = Atom::Mul(vec![Atom::var("x"), zero_inverse, Atom::num(3)]);
    assert_eq!(FactorSet::new(&e).as_expression(), Atom::nan());

    let e = Atom::Mul(vec![Atom::var("x"), Atom::zero()]);
    assert_eq!(FactorSet::new(&e).as_expression(), Atom::zero());
}

#[test]
fn round_trip() {
    for s in ["x^3/y^2", "-2*a*b^4/(c*d^2)", "x*f(y)^2", "-z"] {
        let e = parse!(s);
        assert_eq!(FactorSet::new(&e).as_expression(), e);
    }
}

#[test]
fn idempotence() {
    for s in [
        "sqrt(12)*x",
        "x/sqrt(2)",
        "4*x*y + 6*x^2",
        "8^(1/3)*x^2/y",
        "3*x == 6*y",
    ] {
        let f = parse!(s).factor();
        assert_eq!(f.factor(), f, "{}", s);
    }
}

#[test]
fn printing() {
    assert_eq!(
        parse!("sqrt(8)*x/(6*y)").factor().to_string(),
        "1/3*x*sqrt(2)/y"
    );
}
