//! Sparse defining relations for unramified extensions.
//!
//! The extension `Q_p[x]/(F(x))` is described by a polynomial `F` that is
//! usually very sparse (Conway polynomials and trinomials are typical), so it
//! is stored as parallel `(coefficient, exponent)` sequences and reduction is
//! driven by the non-zero terms only.

use core::fmt;

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::error::QadicError;
use crate::structures::modpoly::{self, reduce};

/// A validated sparse polynomial `F(x) = Σ a_k x^{j_k}`.
///
/// Invariants:
/// - at least one term
/// - exponents strictly increasing
/// - the last exponent is the extension degree `d ≥ 1`
///
/// The low-level routines ([`reduce`](Self::reduce),
/// [`mul_mod`](Self::mul_mod) and the composer) assume the leading
/// coefficient is `1`; [`QadicContext`](crate::QadicContext) makes any
/// unit-leading relation monic before use.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::SparseRelation;
///
/// // x^2 - 2
/// let f = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
/// assert_eq!(f.degree(), 2);
/// assert_eq!(f.num_terms(), 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RelationTerms", into = "RelationTerms")
)]
pub struct SparseRelation {
    coeffs: Vec<BigInt>,
    exps: Vec<usize>,
}

/// Unvalidated wire form of a relation.
#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct RelationTerms {
    coeffs: Vec<BigInt>,
    exps: Vec<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<RelationTerms> for SparseRelation {
    type Error = QadicError;

    fn try_from(terms: RelationTerms) -> Result<Self, Self::Error> {
        Self::new(terms.coeffs, terms.exps)
    }
}

#[cfg(feature = "serde")]
impl From<SparseRelation> for RelationTerms {
    fn from(f: SparseRelation) -> Self {
        Self {
            coeffs: f.coeffs,
            exps: f.exps,
        }
    }
}

impl SparseRelation {
    /// Create a relation from parallel coefficient and exponent sequences.
    ///
    /// # Errors
    ///
    /// - [`QadicError::EmptyRelation`] if there are no terms.
    /// - [`QadicError::LengthMismatch`] if the sequences differ in length.
    /// - [`QadicError::ExponentsNotIncreasing`] if exponents do not strictly increase.
    /// - [`QadicError::ZeroDegree`] if the last exponent is zero.
    /// - [`QadicError::LeadingCoeffNotUnit`] if the leading coefficient is zero.
    pub fn new(coeffs: Vec<BigInt>, exps: Vec<usize>) -> Result<Self, QadicError> {
        if coeffs.len() != exps.len() {
            return Err(QadicError::LengthMismatch {
                coeffs: coeffs.len(),
                exps: exps.len(),
            });
        }
        if exps.is_empty() {
            return Err(QadicError::EmptyRelation);
        }
        if let Some(index) = exps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(QadicError::ExponentsNotIncreasing { index: index + 1 });
        }
        if exps[exps.len() - 1] == 0 {
            return Err(QadicError::ZeroDegree);
        }
        if coeffs[coeffs.len() - 1].is_zero() {
            return Err(QadicError::LeadingCoeffNotUnit);
        }

        Ok(Self { coeffs, exps })
    }

    /// Build a relation from dense coefficients in ascending order.
    ///
    /// Zero coefficients are dropped and trailing zeros are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use num_bigint::BigInt;
    /// use qadic::SparseRelation;
    ///
    /// // x^3 + x + 1
    /// let dense: Vec<BigInt> = [1, 1, 0, 1].into_iter().map(BigInt::from).collect();
    /// let f = SparseRelation::from_dense(&dense).unwrap();
    /// assert_eq!(f.degree(), 3);
    /// assert_eq!(f.exponents(), &[0, 1, 3]);
    /// ```
    pub fn from_dense(dense: &[BigInt]) -> Result<Self, QadicError> {
        let (coeffs, exps): (Vec<BigInt>, Vec<usize>) = dense
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, c)| (c.clone(), i))
            .unzip();
        Self::new(coeffs, exps)
    }

    /// Build a relation from `(coefficient, exponent)` pairs in increasing exponent order.
    pub fn from_terms<I>(terms: I) -> Result<Self, QadicError>
    where
        I: IntoIterator<Item = (BigInt, usize)>,
    {
        let (coeffs, exps): (Vec<BigInt>, Vec<usize>) = terms.into_iter().unzip();
        Self::new(coeffs, exps)
    }

    /// The extension degree `d`.
    pub fn degree(&self) -> usize {
        self.exps[self.exps.len() - 1]
    }

    /// Number of non-zero terms.
    pub fn num_terms(&self) -> usize {
        self.exps.len()
    }

    /// Coefficients, in increasing exponent order.
    pub fn coefficients(&self) -> &[BigInt] {
        &self.coeffs
    }

    /// Exponents, strictly increasing.
    pub fn exponents(&self) -> &[usize] {
        &self.exps
    }

    /// Iterate over `(coefficient, exponent)` terms.
    pub fn terms(&self) -> impl Iterator<Item = (&BigInt, usize)> + '_ {
        self.coeffs.iter().zip(self.exps.iter().copied())
    }

    /// The coefficient of `x^d`.
    pub fn leading_coeff(&self) -> &BigInt {
        &self.coeffs[self.coeffs.len() - 1]
    }

    /// Check whether the leading coefficient is exactly `1`.
    pub fn is_monic(&self) -> bool {
        self.leading_coeff().is_one()
    }

    /// Scale the relation so its leading coefficient is `1` modulo `m`.
    ///
    /// Coefficients of the result are canonical residues modulo `m`.
    ///
    /// # Errors
    ///
    /// Returns [`QadicError::LeadingCoeffNotUnit`] if the leading coefficient
    /// has no inverse modulo `m`.
    pub fn monic(&self, m: &BigInt) -> Result<Self, QadicError> {
        let lc_inv = reduce(self.leading_coeff(), m)
            .modinv(m)
            .ok_or(QadicError::LeadingCoeffNotUnit)?;
        Ok(self.scaled_monic(&lc_inv, m))
    }

    /// Multiply by `lc_inv`, the inverse of the leading coefficient modulo
    /// `m`, and pin the leading coefficient to `1`.
    pub(crate) fn scaled_monic(&self, lc_inv: &BigInt, m: &BigInt) -> Self {
        let mut coeffs = modpoly::scalar_mul(&self.coeffs, lc_inv, m);
        let last = coeffs.len() - 1;
        coeffs[last] = BigInt::one();
        Self {
            coeffs,
            exps: self.exps.clone(),
        }
    }

    /// Dense form of `F` modulo `m`, of length `d + 1`.
    pub fn to_dense(&self, m: &BigInt) -> Vec<BigInt> {
        let mut dense = modpoly::zero(self.degree() + 1);
        for (c, j) in self.terms() {
            dense[j] = reduce(c, m);
        }
        dense
    }

    /// Dense form of the formal derivative `F'` modulo `m`, of length `d`.
    pub fn derivative_dense(&self, m: &BigInt) -> Vec<BigInt> {
        let mut dense = modpoly::zero(self.degree());
        for (c, j) in self.terms().filter(|&(_, j)| j > 0) {
            dense[j - 1] = reduce(&(c * BigInt::from(j)), m);
        }
        dense
    }

    /// Reduce a dense buffer of any length modulo `(F, m)`.
    ///
    /// Returns exactly `d` canonical coefficients. Each coefficient above
    /// `x^{d-1}` is folded down using only the non-zero lower terms of `F`,
    /// so the cost is `O((len - d) * terms)` rather than `O((len - d) * d)`.
    ///
    /// # Example
    ///
    /// ```
    /// use num_bigint::BigInt;
    /// use qadic::SparseRelation;
    ///
    /// // x^2 - 2 over Z/25: x^3 = 2x
    /// let f = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
    /// let x3: Vec<BigInt> = [0, 0, 0, 1].into_iter().map(BigInt::from).collect();
    /// let r = f.reduce(x3, &BigInt::from(25));
    /// assert_eq!(r, vec![BigInt::from(0), BigInt::from(2)]);
    /// ```
    pub fn reduce(&self, mut buf: Vec<BigInt>, m: &BigInt) -> Vec<BigInt> {
        debug_assert!(self.is_monic(), "relation must be monic");
        let d = self.degree();
        let lower = self.num_terms() - 1;

        for i in (d..buf.len()).rev() {
            let c = core::mem::take(&mut buf[i]);
            let c = reduce(&c, m);
            if c.is_zero() {
                continue;
            }
            for (a, j) in self.terms().take(lower) {
                let k = j + i - d;
                buf[k] = &buf[k] - &c * a;
            }
        }

        buf.truncate(d);
        buf.resize(d, BigInt::zero());
        for c in buf.iter_mut() {
            *c = reduce(c, m);
        }
        buf
    }

    /// Multiply two elements of length at most `d` and reduce modulo `(F, m)`.
    pub fn mul_mod(&self, a: &[BigInt], b: &[BigInt], m: &BigInt) -> Vec<BigInt> {
        if a.is_empty() || b.is_empty() {
            return modpoly::zero(self.degree());
        }
        self.reduce(modpoly::mul(a, b, m), m)
    }
}

impl fmt::Debug for SparseRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (c, j) in self.terms() {
            if !first {
                write!(f, " + ")?;
            }
            first = false;

            match j {
                0 => write!(f, "{}", c)?,
                1 if c.is_one() => write!(f, "x")?,
                1 => write!(f, "{}*x", c)?,
                _ if c.is_one() => write!(f, "x^{}", j)?,
                _ => write!(f, "{}*x^{}", c, j)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for SparseRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
