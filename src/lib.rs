//! Symfactor is an exact factorization engine for symbolic expressions.
//!
//! It combines the fractions of a sum, decomposes products into bases and
//! exponents, and merges integers, rationals, Gaussian integers and square
//! roots of rationals without any floating point approximation.
//!
//! For example:
//!
//! ```
//! use symfactor::{atom::Atom, parse};
//!
//! fn main() {
//!     let input = Atom::parse("sqrt(8)*x/(6*y)").unwrap();
//!     let f = input.factor();
//!     println!("factor({}) = {}", input, f);
//!     assert_eq!(f, parse!("sqrt(2)*x/(3*y)"));
//! }
//! ```
//!
//! The engine expects canonical expressions. All constructors in
//! [atom::canonical], the operator overloads on [atom::Atom] and the parser
//! produce them.

pub mod atom;
pub mod coefficient;
pub mod domains;
pub mod factor;
pub mod parser;
pub mod printer;
pub mod utils;
