use std::{
    fmt::{Display, Write},
    string::String,
};

use rug::Integer as MultiPrecisionInteger;
use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};

use crate::{
    atom::{canonical, Atom, Number, Relation},
    domains::integer::Integer,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ParseState {
    Identifier,
    Number,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Mul,
    Add,
    Pow,
    Argument, // comma
    Neg,      // left side should be tagged as 'finished'
    Inv,      // left side should be tagged as 'finished', for internal use
    Rel(Relation),
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Mul => f.write_char('*'),
            Operator::Add => f.write_char('+'),
            Operator::Pow => f.write_char('^'),
            Operator::Argument => f.write_char(','),
            Operator::Neg => f.write_char('-'),
            Operator::Inv => f.write_char('/'),
            Operator::Rel(r) => f.write_str(r.as_str()),
        }
    }
}

impl Operator {
    #[inline]
    pub fn get_arity(&self) -> usize {
        match self {
            Operator::Neg | Operator::Inv => 1,
            _ => 2,
        }
    }

    #[inline]
    pub fn get_precedence(&self) -> u8 {
        match self {
            Operator::Mul => 9,
            Operator::Add => 8,
            Operator::Pow => 12,
            Operator::Argument => 6,
            Operator::Neg => 11,
            Operator::Inv => 10,
            Operator::Rel(_) => 7,
        }
    }

    #[inline]
    pub fn right_associative(&self) -> bool {
        match self {
            Operator::Mul => true,
            Operator::Add => true,
            Operator::Pow => false,
            Operator::Argument => true,
            Operator::Neg => true,
            Operator::Inv => true,
            Operator::Rel(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Number(SmartString<LazyCompact>),
    ID(SmartString<LazyCompact>),
    Op(bool, bool, Operator, Vec<Token>),
    Fn(bool, Vec<Token>),
    Start,
    OpenParenthesis,
    CloseParenthesis,
    EOF,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => f.write_str(n),
            Token::ID(v) => f.write_str(v),
            Token::Op(_, _, o, m) => {
                let mut first = true;
                f.write_char('(')?;

                for mm in m {
                    if !first {
                        match o {
                            Operator::Neg => f.write_char('-')?,
                            Operator::Inv => f.write_str("1/")?,
                            o => o.fmt(f)?,
                        }
                    } else if *o == Operator::Neg {
                        f.write_char('-')?;
                    } else if *o == Operator::Inv {
                        f.write_str("1/")?;
                    }
                    first = false;

                    mm.fmt(f)?;
                }
                f.write_char(')')
            }
            Token::Fn(_, args) => {
                let mut first = true;

                if let Some(name) = args.first() {
                    name.fmt(f)?;
                }

                f.write_char('(')?;
                for aa in args.iter().skip(1) {
                    if !first {
                        f.write_char(',')?;
                    }
                    first = false;

                    aa.fmt(f)?;
                }
                f.write_char(')')
            }
            Token::Start => f.write_str("START"),
            Token::OpenParenthesis => f.write_char('('),
            Token::CloseParenthesis => f.write_char(')'),
            Token::EOF => f.write_str("EOF"),
        }
    }
}

/// Check if a token on top of the stack still expects an argument to its right,
/// so that a following `+`, `-` or `/` is unary.
fn expects_argument(t: Option<&Token>) -> bool {
    matches!(
        t,
        Some(Token::Start | Token::OpenParenthesis | Token::Fn(true, _) | Token::Op(_, true, _, _))
    )
}

impl Token {
    /// Return if the token does not require any further arguments.
    fn is_normal(&self) -> bool {
        match self {
            Token::Number(_) => true,
            Token::ID(_) => true,
            Token::Op(more_left, more_right, _, _) => !more_left && !more_right,
            Token::Fn(more_right, _) => !more_right,
            _ => false,
        }
    }

    /// Get the precedence of the token.
    #[inline]
    fn get_precedence(&self) -> u8 {
        match self {
            Token::Number(_) => 12,
            Token::ID(_) => 12,
            Token::Op(_, _, o, _) => o.get_precedence(),
            Token::Fn(_, _) | Token::OpenParenthesis | Token::CloseParenthesis => 5,
            Token::Start | Token::EOF => 4,
        }
    }

    /// Add `other` to the left side of `self`, where `self` is a binary operation.
    #[inline]
    fn add_left(&mut self, other: Token) -> Result<(), String> {
        if let Token::Op(ml, _, o1, args) = self {
            debug_assert!(*ml);
            *ml = false;

            if let Token::Op(ml, mr, o2, mut args2) = other {
                debug_assert!(!ml && !mr);
                if *o1 == o2 && o2.right_associative() {
                    // add from the left by swapping and then extending from the right
                    std::mem::swap(args, &mut args2);
                    args.append(&mut args2);
                } else {
                    args.insert(0, Token::Op(false, false, o2, args2));
                }
            } else {
                args.insert(0, other);
            }
            Ok(())
        } else {
            Err(format!(
                "operator expected, but found '{}'. Are parentheses unbalanced?",
                self
            ))
        }
    }

    /// Add `other` to right side of `self`, where `self` is a binary operation.
    #[inline]
    fn add_right(&mut self, mut other: Token) -> Result<(), String> {
        if let Token::Op(_, mr, o1, args) = self {
            debug_assert!(*mr);
            *mr = false;

            if *o1 == Operator::Neg {
                if let Token::Number(n) = &mut other {
                    if n.starts_with('-') {
                        n.remove(0);
                    } else {
                        n.insert(0, '-');
                    }
                    *self = other;
                    return Ok(());
                }
            }

            if let Token::Op(ml, mr, o2, mut args2) = other {
                debug_assert!(!ml && !mr);
                if *o1 == o2 && o2.right_associative() {
                    if o2 == Operator::Neg || o2 == Operator::Inv {
                        // twice unary minus or inv cancels out
                        debug_assert!(args2.len() == 1);
                        if let Some(inner) = args2.pop() {
                            *self = inner;
                        }
                    } else {
                        args.append(&mut args2)
                    }
                } else {
                    args.push(Token::Op(false, false, o2, args2));
                }
            } else {
                args.push(other);
            }

            Ok(())
        } else {
            Err(format!(
                "operator expected, but found '{}'. Are parentheses unbalanced?",
                self
            ))
        }
    }

    fn number_to_atom(n: &str) -> Result<Atom, String> {
        if n.contains('.') {
            return n
                .parse::<f64>()
                .map(Atom::num)
                .map_err(|e| format!("Could not parse number {}: {}", n, e));
        }

        if let Ok(x) = n.parse::<i64>() {
            return Ok(Atom::num(x));
        }

        n.parse::<MultiPrecisionInteger>()
            .map(|x| Atom::num(Integer::from_large(x)))
            .map_err(|e| format!("Could not parse number {}: {}", n, e))
    }

    /// Parse the token into a canonical atom.
    pub fn to_atom(&self) -> Result<Atom, String> {
        match self {
            Token::Number(n) => Token::number_to_atom(n),
            Token::ID(x) => Ok(match x.as_str() {
                "i" => Atom::i(),
                "NaN" => Atom::nan(),
                "Infinity" => Atom::infinity(true),
                x => Atom::var(x),
            }),
            Token::Op(_, _, op, args) => match op {
                Operator::Mul => {
                    let mut factors = Vec::with_capacity(args.len());
                    for a in args {
                        factors.push(a.to_atom()?);
                    }
                    Ok(canonical::mul(factors))
                }
                Operator::Add => {
                    let mut terms = Vec::with_capacity(args.len());
                    for a in args {
                        terms.push(a.to_atom()?);
                    }
                    Ok(canonical::add(terms))
                }
                Operator::Pow => {
                    // pow is right associative
                    let mut it = args.iter().rev();
                    let mut out = it
                        .next()
                        .ok_or_else(|| "Power without arguments".to_string())?
                        .to_atom()?;
                    for a in it {
                        out = canonical::pow(a.to_atom()?, out);
                    }
                    Ok(out)
                }
                Operator::Argument => Err("Unexpected argument operator".into()),
                Operator::Neg => {
                    debug_assert!(args.len() == 1);
                    Ok(canonical::neg(Token::single_argument(args)?.to_atom()?))
                }
                Operator::Inv => {
                    debug_assert!(args.len() == 1);
                    Ok(canonical::div(
                        Atom::one(),
                        Token::single_argument(args)?.to_atom()?,
                    ))
                }
                Operator::Rel(r) => {
                    if let [lhs, rhs] = args.as_slice() {
                        Ok(canonical::rel(*r, lhs.to_atom()?, rhs.to_atom()?))
                    } else {
                        Err(format!(
                            "Relation '{}' requires exactly two sides, found {}",
                            r,
                            args.len()
                        ))
                    }
                }
            },
            Token::Fn(_, args) => {
                let name = match args.first() {
                    Some(Token::ID(s)) => s,
                    _ => return Err(format!("Invalid function {}", self)),
                };

                let mut fn_args = Vec::with_capacity(args.len() - 1);
                for a in args.iter().skip(1) {
                    fn_args.push(a.to_atom()?);
                }

                if name == "sqrt" {
                    if fn_args.len() != 1 {
                        return Err(format!(
                            "sqrt requires exactly one argument, found {}",
                            fn_args.len()
                        ));
                    }
                    Ok(canonical::sqrt(fn_args.remove(0)))
                } else {
                    Ok(Atom::fun(name, fn_args))
                }
            }
            x => Err(format!("Unexpected token {}", x)),
        }
    }

    fn single_argument(args: &[Token]) -> Result<&Token, String> {
        args.first()
            .ok_or_else(|| "Unary operator without argument".to_string())
    }

    /// Parse an expression.
    pub fn parse(input: &str) -> Result<Token, String> {
        let mut stack: Vec<_> = Vec::with_capacity(20);
        stack.push(Token::Start);
        let mut state = ParseState::Any;

        let ops = [
            '\0', '^', '+', '*', '-', '(', ')', '/', ',', '<', '>', '=', '!',
        ];
        let whitespace = [' ', '\t', '\n', '\r', '\\'];
        let forbidden = [';', ':', '&', '%', '[', ']'];

        let mut char_iter = input.chars();
        let mut c = char_iter.next().unwrap_or('\0'); // add EOF as a token
        let mut extra_ops: SmallVec<[char; 6]> = SmallVec::new();

        let mut id_buffer = String::with_capacity(30);

        let mut line_counter = 1;
        let mut column_counter = 1;

        loop {
            match state {
                ParseState::Identifier => {
                    if ops.contains(&c) || whitespace.contains(&c) {
                        state = ParseState::Any;
                        stack.push(Token::ID(id_buffer.as_str().into()));
                        id_buffer.clear();
                    } else if !forbidden.contains(&c) {
                        id_buffer.push(c);
                    } else {
                        // check for some symbols that could be the result of copy-paste errors
                        // when importing from other languages
                        Err(format!(
                            "Unexpected '{}' in input at line {} and column {}",
                            c, line_counter, column_counter
                        ))?;
                    }
                }
                ParseState::Number => {
                    if c != '_' && c != '.' && !c.is_ascii_digit() {
                        state = ParseState::Any;
                        stack.push(Token::Number(id_buffer.as_str().into()));
                        id_buffer.clear();
                    } else if c != '_' {
                        id_buffer.push(c);
                    }
                }
                ParseState::Any => {}
            }

            if state == ParseState::Any {
                if whitespace.contains(&c) {
                    if c == '\n' {
                        column_counter = 1;
                        line_counter += 1;
                    } else {
                        column_counter += 1;
                    }

                    c = char_iter.next().unwrap_or('\0');
                    continue;
                }

                match c {
                    '+' => {
                        if expects_argument(stack.last()) {
                            // unary + operator, can be ignored as plus is the default
                        } else {
                            stack.push(Token::Op(true, true, Operator::Add, vec![]))
                        }
                    }
                    '^' => stack.push(Token::Op(true, true, Operator::Pow, vec![])),
                    '*' => {
                        // accept ** as exponentiation
                        if char_iter.clone().next() == Some('*') {
                            char_iter.next();
                            column_counter += 1;
                            stack.push(Token::Op(true, true, Operator::Pow, vec![]));
                        } else {
                            stack.push(Token::Op(true, true, Operator::Mul, vec![]));
                        }
                    }
                    '-' => {
                        if expects_argument(stack.last()) {
                            // unary minus only requires an argument to the right
                            stack.push(Token::Op(false, true, Operator::Neg, vec![]));
                        } else {
                            stack.push(Token::Op(true, true, Operator::Add, vec![]));
                            extra_ops.push('-'); // push a unary minus
                        }
                    }
                    '<' | '>' | '=' | '!' => {
                        let followed_by_eq = char_iter.clone().next() == Some('=');
                        if followed_by_eq {
                            char_iter.next();
                            column_counter += 1;
                        }

                        let r = match (c, followed_by_eq) {
                            ('<', false) => Relation::Less,
                            ('<', true) => Relation::LessEqual,
                            ('>', false) => Relation::Greater,
                            ('>', true) => Relation::GreaterEqual,
                            ('=', _) => Relation::Equal,
                            ('!', true) => Relation::NotEqual,
                            _ => Err(format!(
                                "Unexpected '{}' in input at line {} and column {}",
                                c, line_counter, column_counter
                            ))?,
                        };

                        stack.push(Token::Op(true, true, Operator::Rel(r), vec![]));
                    }
                    '(' => {
                        // check if the opening bracket belongs to a function
                        if let Some(Token::ID(_)) = stack.last() {
                            if let Some(name) = stack.pop() {
                                stack.push(Token::Fn(true, vec![name])); // serves as open paren
                            }
                        } else if stack.last().map(Token::is_normal).unwrap_or(false) {
                            // insert multiplication: x(...) -> x*(...)
                            stack.push(Token::Op(true, true, Operator::Mul, vec![]));
                            extra_ops.push(c);
                        } else {
                            stack.push(Token::OpenParenthesis)
                        }
                    }
                    ')' => stack.push(Token::CloseParenthesis),
                    '/' => {
                        if expects_argument(stack.last()) {
                            // unary inv only requires an argument to the right
                            stack.push(Token::Op(false, true, Operator::Inv, vec![]));
                        } else {
                            stack.push(Token::Op(true, true, Operator::Mul, vec![]));
                            extra_ops.push('/'); // push a (unary) inverse
                        }
                    }
                    ',' => stack.push(Token::Op(true, true, Operator::Argument, vec![])),
                    '\0' => stack.push(Token::EOF),
                    _ => {
                        if stack.last().map(Token::is_normal).unwrap_or(false) {
                            // insert multiplication: x y -> x*y
                            stack.push(Token::Op(true, true, Operator::Mul, vec![]));
                            extra_ops.push(c);
                        } else if c.is_ascii_digit() {
                            state = ParseState::Number;
                            id_buffer.push(c);
                        } else if !forbidden.contains(&c) {
                            state = ParseState::Identifier;
                            id_buffer.push(c);
                        } else {
                            Err(format!(
                                "Unexpected '{}' in input at line {} and column {}",
                                c, line_counter, column_counter
                            ))?;
                        }
                    }
                }
            }

            // match on triplets of type operator identifier operator
            while state == ParseState::Any && stack.len() > 2 {
                if !stack[stack.len() - 2].is_normal() {
                    // check if the left operator needs a right-hand side and the new operator still needs a left-hand side
                    match &stack[stack.len() - 1] {
                        Token::Op(true, _, op, _) => {
                            Err(format!(
                            "Error at line {} and position {}: operator '{}' is missing left-hand side",
                            line_counter, column_counter, op,
                        ))?;
                        }

                        Token::CloseParenthesis => {
                            let pos = stack.len() - 2;
                            // check if we have an empty function
                            if let Token::Fn(f, _) = &mut stack[pos] {
                                *f = false;
                                stack.pop();
                            } else {
                                Err(format!(
                                    "Error at line {} and position {}: unexpected ')'",
                                    line_counter, column_counter,
                                ))?;
                            }
                        }
                        _ => {}
                    }

                    // no simplification, get new token
                    break;
                }

                let (Some(mut last), Some(middle)) = (stack.pop(), stack.pop()) else {
                    break;
                };
                let Some(mut first) = stack.last_mut() else {
                    return Err(format!("Unknown parsing error at token {}", middle));
                };

                match first.get_precedence().cmp(&last.get_precedence()) {
                    std::cmp::Ordering::Greater => {
                        first.add_right(middle).map_err(|e| {
                            format!(
                                "Error at line {} and position {}: ",
                                line_counter, column_counter
                            ) + e.as_str()
                        })?;
                        stack.push(last);
                    }
                    std::cmp::Ordering::Less => {
                        last.add_left(middle).map_err(|e| {
                            format!(
                                "Error at line {} and position {}: ",
                                line_counter, column_counter
                            ) + e.as_str()
                        })?;

                        stack.push(last);
                    }
                    std::cmp::Ordering::Equal => {
                        // same degree, special merges!
                        match (&mut first, middle, last) {
                            (Token::Start, mid, Token::EOF) => {
                                *first = mid;
                            }
                            (Token::Fn(mr, args), mid, Token::CloseParenthesis) => {
                                debug_assert!(*mr);
                                *mr = false;

                                if let Token::Op(_, _, Operator::Argument, arg2) = mid {
                                    args.extend(arg2);
                                } else {
                                    args.push(mid);
                                }
                            }
                            (Token::OpenParenthesis, mid, Token::CloseParenthesis) => {
                                *first = mid;
                            }
                            (
                                Token::Op(ml1, mr1, o1, m),
                                mid,
                                Token::Op(ml2, mr2, mut o2, mut mm),
                            ) => {
                                debug_assert!(!*ml1);
                                debug_assert!(*mr1 && ml2);
                                // same precedence, so left associate

                                // flatten if middle identifier is also a binary operator of the same type that
                                // is also right associative
                                if let Token::Op(_, _, o_mid, mut m_mid) = mid {
                                    if o_mid == *o1 && o_mid.right_associative() {
                                        m.append(&mut m_mid);
                                    } else {
                                        m.push(Token::Op(false, false, o_mid, m_mid));
                                    }
                                } else {
                                    m.push(mid)
                                }

                                // may not be the same operator, in the case of * and /
                                if *o1 == o2 {
                                    m.append(&mut mm);
                                    *mr1 = mr2;
                                } else {
                                    // embed operator 1 in operator 2
                                    *mr1 = mr2;
                                    std::mem::swap(o1, &mut o2);
                                    std::mem::swap(m, &mut mm);
                                    m.insert(0, Token::Op(false, false, o2, mm));
                                }
                            }
                            _ => return Err("Cannot merge operator".to_string()),
                        }
                    }
                }
            }

            if c == '\0' {
                break;
            }

            // first drain the queue of extra operators
            if extra_ops.is_empty() {
                if c == '\n' {
                    column_counter = 1;
                    line_counter += 1;
                } else {
                    column_counter += 1;
                }

                c = char_iter.next().unwrap_or('\0');
            } else {
                c = extra_ops.remove(0);
            }
        }

        if stack.len() == 1 {
            stack.pop().ok_or_else(|| "Expression is empty".to_string())
        } else {
            match stack.get(stack.len().saturating_sub(2)) {
                Some(Token::Op(false, true, op, _)) => Err(format!(
                    "Unexpected end of input: missing right-hand side for operator '{}'",
                    op
                )),
                Some(Token::OpenParenthesis) => {
                    Err("Unexpected end of input: open parenthesis is not closed".to_string())
                }

                Some(Token::Fn(true, args)) => Err(format!(
                    "Unexpected end of input: Missing closing parenthesis for function '{}'",
                    args.first().map(|a| a.to_string()).unwrap_or_default()
                )),
                Some(Token::Start) => Err("Expression is empty".to_string()),
                _ => Err(format!("Unknown parsing error: {:?}", stack)),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        atom::{canonical, Atom, Number, Relation},
        domains::{complex::Complex, rational::Rational},
        parse,
    };

    #[test]
    fn arithmetic() {
        let x = Atom::var("x");
        let y = Atom::var("y");

        assert_eq!(
            parse!("2x + 3*y"),
            canonical::add([
                canonical::mul([Atom::num(2), x.clone()]),
                canonical::mul([Atom::num(3), y.clone()])
            ])
        );
        assert_eq!(parse!("x/y"), canonical::div(x.clone(), y.clone()));
        assert_eq!(
            parse!("-x^2"),
            canonical::neg(canonical::pow(x.clone(), Atom::num(2)))
        );
        assert_eq!(parse!("2^3^2"), Atom::num(512));
        assert_eq!(parse!("x**2"), canonical::pow(x.clone(), Atom::num(2)));
        assert_eq!(parse!("--x"), x);
    }

    #[test]
    fn numbers() {
        assert_eq!(parse!("-3/4"), Atom::num((-3, 4)));
        assert_eq!(parse!("1.5"), Atom::num(Number::from(1.5)));
        assert_eq!(
            parse!("2i"),
            Atom::num(Complex::new(Rational::zero(), Rational::from(2)))
        );
        assert!(parse!("NaN").is_nan());
        assert!(parse!("-Infinity").is_infinity());
        assert!(matches!(
            parse!("123456789012345678901234567890"),
            Atom::Num(Number::Rational(Rational::Large(_)))
        ));
    }

    #[test]
    fn functions() {
        assert_eq!(
            parse!("f(x, 1+1)"),
            Atom::fun("f", vec![Atom::var("x"), Atom::num(2)])
        );
        assert_eq!(parse!("sqrt(8)"), Atom::Sqrt(Box::new(Atom::num(8))));
        assert_eq!(parse!("sqrt(9)"), Atom::num(3));
        assert_eq!(parse!("g()"), Atom::fun("g", vec![]));
    }

    #[test]
    fn relations() {
        let r = parse!("2x <= y + 1");
        assert_eq!(
            r,
            canonical::rel(Relation::LessEqual, parse!("2x"), parse!("y+1"))
        );
        assert!(matches!(
            parse!("x != y"),
            Atom::Rel(Relation::NotEqual, _, _)
        ));
        assert!(matches!(parse!("x == y"), Atom::Rel(Relation::Equal, _, _)));
        assert!(matches!(
            parse!("x > y"),
            Atom::Rel(Relation::Greater, _, _)
        ));
    }

    #[test]
    fn errors() {
        assert!(Atom::parse("").is_err());
        assert!(Atom::parse("(x+1").is_err());
        assert!(Atom::parse("x +").is_err());
        assert!(Atom::parse("x;y").is_err());
        assert!(Atom::parse("x ! y").is_err());
        assert!(Atom::parse("a < b < c").is_err());
    }
}
