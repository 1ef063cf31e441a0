//! Error type shared by relation validation, context construction and the
//! fallible arithmetic entry points.

use thiserror::Error;

/// Errors reported by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QadicError {
    /// The relation has no terms.
    #[error("defining relation has no terms")]
    EmptyRelation,
    /// Coefficient and exponent sequences differ in length.
    #[error("relation has {coeffs} coefficients but {exps} exponents")]
    LengthMismatch { coeffs: usize, exps: usize },
    /// Exponents are not strictly increasing at the given term index.
    #[error("relation exponents are not strictly increasing at term {index}")]
    ExponentsNotIncreasing { index: usize },
    /// The relation has degree zero.
    #[error("defining relation must have degree at least 1")]
    ZeroDegree,
    /// The leading coefficient vanishes (or is not a unit) modulo `p`.
    #[error("leading coefficient of the relation is not a unit modulo p")]
    LeadingCoeffNotUnit,
    /// The supplied prime is not prime.
    #[error("{0} is not prime")]
    NotPrime(String),
    /// The working precision is zero.
    #[error("precision must be at least 1")]
    ZeroPrecision,
    /// An element has no inverse modulo the relation and `p`.
    #[error("element is not invertible")]
    NotInvertible,
    /// The relation's derivative has no inverse at the residue-field root.
    ///
    /// The relation is not irreducible and separable modulo `p`.
    #[error("derivative of the relation is not invertible modulo p; relation is not separable")]
    DerivativeNotInvertible,
}
