//! Exact and inexact number domains.
//!
//! - [Integer](integer::Integer) is an arbitrary-precision integer that stays in a machine word when it fits.
//! - [Rational](rational::Rational) is an always-reduced fraction built on top of it.
//! - [Complex](complex::Complex) pairs a real and imaginary part, and is used both for exact Gaussian
//!   numbers (`Complex<Rational>`) and for floating-point complex numbers (`Complex<f64>`).
//!
//! Large values are delegated to [rug].
pub mod complex;
pub mod integer;
pub mod rational;

/// The internal ordering trait is used to compare elements of a domain.
/// This ordering is defined even for domains that do not have a total ordering, such
/// as complex numbers or floats with `NaN`.
pub trait InternalOrdering {
    /// Compare two elements using an internal ordering.
    fn internal_cmp(&self, other: &Self) -> std::cmp::Ordering;
}

impl InternalOrdering for f64 {
    fn internal_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total_cmp(other)
    }
}
