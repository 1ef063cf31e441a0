//! Elements of unramified extensions of `Q_p` at finite precision.
//!
//! A [`QadicContext`] fixes the prime `p`, the defining relation `F` of degree
//! `d` and the working precision `N`. A [`Qadic`] is `p^v * a(x)` with
//! `a(x) ∈ Z[x]` of degree `< d`, meaningful modulo `p^N`, so its unit part
//! `a` is stored modulo `p^{N - v}`.
//!
//! Like [`SparseRelation`]'s low-level routines, arithmetic takes the
//! context explicitly: elements do not carry it.

use core::fmt;
use std::borrow::Cow;

use num_bigint::{BigInt, BigUint};
use num_traits::{pow, One, Zero};

use crate::error::QadicError;
use crate::structures::compose;
use crate::structures::frobenius;
use crate::structures::modpoly;
use crate::structures::relation::SparseRelation;
use crate::utils::is_prime;

/// Prime, defining relation and precision of an unramified extension.
///
/// The relation is stored scaled to be monic modulo `p^N`; the relation as
/// supplied is kept so the context can be rebuilt at another precision, and
/// so it can be made monic modulo `p^n` for `n > N` (see
/// [`relation_at`](Self::relation_at)).
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::{QadicContext, SparseRelation};
///
/// // Q_5(sqrt 2) to precision 5^4; 2 is not a square modulo 5
/// let rel = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
/// let ctx = QadicContext::new(BigInt::from(5), rel, 4).unwrap();
/// assert_eq!(ctx.degree(), 2);
/// assert_eq!(ctx.modulus(), &BigInt::from(625));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QadicContext {
    p: BigInt,
    /// Monic modulo `p^N`, canonical residues
    relation: SparseRelation,
    supplied: SparseRelation,
    /// Inverse of the supplied leading coefficient modulo `p^N`
    lc_inv: BigInt,
    precision: usize,
    /// `p^N`
    modulus: BigInt,
}

impl QadicContext {
    /// Create a context.
    ///
    /// Irreducibility of the relation modulo `p` is not checked; a relation
    /// that is not separable modulo `p` is reported by the Frobenius map.
    ///
    /// # Errors
    ///
    /// - [`QadicError::NotPrime`] if `p` is not prime.
    /// - [`QadicError::ZeroPrecision`] if `precision == 0`.
    /// - [`QadicError::LeadingCoeffNotUnit`] if `p` divides the leading coefficient.
    pub fn new(p: BigInt, relation: SparseRelation, precision: usize) -> Result<Self, QadicError> {
        if !is_prime(&p) {
            return Err(QadicError::NotPrime(p.to_string()));
        }
        if precision == 0 {
            return Err(QadicError::ZeroPrecision);
        }

        let modulus = pow(p.clone(), precision);
        let lc_inv = modpoly::reduce(relation.leading_coeff(), &modulus)
            .modinv(&modulus)
            .ok_or(QadicError::LeadingCoeffNotUnit)?;
        Ok(Self {
            p,
            relation: relation.scaled_monic(&lc_inv, &modulus),
            supplied: relation,
            lc_inv,
            precision,
            modulus,
        })
    }

    /// The same extension at a different precision.
    ///
    /// # Errors
    ///
    /// Returns [`QadicError::ZeroPrecision`] if `precision == 0`.
    pub fn with_precision(&self, precision: usize) -> Result<Self, QadicError> {
        Self::new(self.p.clone(), self.supplied.clone(), precision)
    }

    /// The prime `p`.
    pub fn prime(&self) -> &BigInt {
        &self.p
    }

    /// The extension degree `d`.
    pub fn degree(&self) -> usize {
        self.relation.degree()
    }

    /// The working precision `N`.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// The monic defining relation, with coefficients modulo `p^N`.
    pub fn relation(&self) -> &SparseRelation {
        &self.relation
    }

    /// The monic defining relation with coefficients modulo `p^n`.
    ///
    /// Up to the working precision this is [`relation`](Self::relation).
    /// Elements of negative valuation carry more than `N` digits in their
    /// unit part; for those the inverse of the leading coefficient is lifted
    /// to `p^n` and the supplied relation rescaled by it.
    ///
    /// # Example
    ///
    /// ```
    /// use num_bigint::BigInt;
    /// use qadic::{QadicContext, SparseRelation};
    ///
    /// // 3x^2 - 6 is x^2 - 2 at every precision
    /// let rel = SparseRelation::new(vec![BigInt::from(-6), BigInt::from(3)], vec![0, 2]).unwrap();
    /// let ctx = QadicContext::new(BigInt::from(5), rel, 2).unwrap();
    /// assert_eq!(ctx.relation_at(2).coefficients(), &[BigInt::from(23), BigInt::from(1)]);
    /// assert_eq!(ctx.relation_at(4).coefficients(), &[BigInt::from(623), BigInt::from(1)]);
    /// ```
    pub fn relation_at(&self, n: usize) -> Cow<'_, SparseRelation> {
        if n <= self.precision {
            return Cow::Borrowed(&self.relation);
        }

        let lc = self.supplied.leading_coeff();
        let mut inv = self.lc_inv.clone();
        let mut k = self.precision;
        while k < n {
            k = (2 * k).min(n);
            // inv <- inv * (2 - lc * inv)
            let step = BigInt::from(2u32) - lc * &inv;
            inv = modpoly::reduce(&(inv * step), &self.pow_p(k));
        }
        Cow::Owned(self.supplied.scaled_monic(&inv, &self.pow_p(n)))
    }

    /// `p^N`.
    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// `p^k`.
    pub fn pow_p(&self, k: usize) -> BigInt {
        pow(self.p.clone(), k)
    }

    /// `N - val` if positive: the number of `p`-adic digits an element of
    /// valuation `val` has left at this precision.
    pub fn relative_precision(&self, val: i64) -> Option<usize> {
        let n = self.precision as i64 - val;
        (n > 0).then_some(n as usize)
    }
}

/// An element `p^v * a(x)` of an unramified extension.
///
/// Canonical form, maintained by every operation:
/// - zero is `v = 0` with no coefficients
/// - otherwise `v < N`, the coefficients of `a` lie in `[0, p^{N-v})`, they
///   are not all divisible by `p`, and there are no trailing zeros
///
/// Elements built by hand or deserialized should be passed through
/// [`reduce`](Self::reduce) before comparison.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qadic {
    val: i64,
    coeffs: Vec<BigInt>,
}

impl Qadic {
    /// The zero element.
    pub fn zero() -> Self {
        Self {
            val: 0,
            coeffs: Vec::new(),
        }
    }

    /// The element `1`.
    pub fn one() -> Self {
        Self {
            val: 0,
            coeffs: vec![BigInt::one()],
        }
    }

    /// The generator `x` of the extension.
    pub fn gen(ctx: &QadicContext) -> Self {
        Self::from_coeffs(0, vec![BigInt::zero(), BigInt::one()], ctx)
    }

    /// The integer `n`, as an element of the base subfield.
    pub fn from_int<T: Into<BigInt>>(n: T, ctx: &QadicContext) -> Self {
        Self::from_coeffs(0, vec![n.into()], ctx)
    }

    /// The element `p^val * Σ coeffs[i] x^i`, reduced to canonical form.
    ///
    /// `coeffs` may be longer than `d` and need not be reduced.
    ///
    /// # Example
    ///
    /// ```
    /// use num_bigint::BigInt;
    /// use qadic::{Qadic, QadicContext, SparseRelation};
    ///
    /// let rel = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
    /// let ctx = QadicContext::new(BigInt::from(5), rel, 4).unwrap();
    ///
    /// // 10 + 5x^2 = 5 * (2 + x^2) = 5 * 4
    /// let a = Qadic::from_coeffs(0, vec![BigInt::from(10), BigInt::from(0), BigInt::from(5)], &ctx);
    /// assert_eq!(a.valuation(), 1);
    /// assert_eq!(a.coeffs(), &[BigInt::from(4)]);
    /// ```
    pub fn from_coeffs(val: i64, coeffs: Vec<BigInt>, ctx: &QadicContext) -> Self {
        Self { val, coeffs }.reduced(ctx)
    }

    /// Raw constructor; the caller reduces.
    pub(crate) fn from_parts(val: i64, coeffs: Vec<BigInt>) -> Self {
        Self { val, coeffs }
    }

    /// The valuation `v`; `0` for zero.
    pub fn valuation(&self) -> i64 {
        self.val
    }

    /// Coefficients of the unit part, ascending.
    pub fn coeffs(&self) -> &[BigInt] {
        &self.coeffs
    }

    /// Number of significant coefficients.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Check if this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Check if this is the element `1`.
    pub fn is_one(&self) -> bool {
        self.val == 0 && self.coeffs.len() == 1 && self.coeffs[0].is_one()
    }

    /// Bring the element into canonical form at the context's precision.
    pub fn reduce(&mut self, ctx: &QadicContext) {
        let n = match ctx.relative_precision(self.val) {
            Some(n) if !modpoly::is_zero(&self.coeffs) => n,
            _ => {
                *self = Self::zero();
                return;
            }
        };

        let m = ctx.pow_p(n);
        let mut coeffs = modpoly::reduce_vec(&self.coeffs, &m);
        if coeffs.len() > ctx.degree() {
            coeffs = ctx.relation_at(n).reduce(coeffs, &m);
        }
        if modpoly::is_zero(&coeffs) {
            *self = Self::zero();
            return;
        }

        // Move common factors of p into the valuation
        let p = ctx.prime();
        let mut val = self.val;
        while coeffs.iter().all(|c| (c % p).is_zero()) {
            for c in coeffs.iter_mut() {
                *c /= p;
            }
            val += 1;
        }
        if ctx.relative_precision(val).is_none() {
            *self = Self::zero();
            return;
        }

        while coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        self.val = val;
        self.coeffs = coeffs;
    }

    /// Canonical form of a copy of the element.
    pub fn reduced(&self, ctx: &QadicContext) -> Self {
        let mut out = self.clone();
        out.reduce(ctx);
        out
    }

    /// `self + other`.
    pub fn add_mod(&self, other: &Self, ctx: &QadicContext) -> Self {
        if self.is_zero() {
            return other.reduced(ctx);
        }
        if other.is_zero() {
            return self.reduced(ctx);
        }

        let (lo, hi) = if self.val <= other.val { (self, other) } else { (other, self) };
        let n = match ctx.relative_precision(lo.val) {
            Some(n) => n,
            None => return Self::zero(),
        };
        let shift = (hi.val - lo.val) as usize;
        if shift >= n {
            return lo.reduced(ctx);
        }

        let m = ctx.pow_p(n);
        let scaled = modpoly::scalar_mul(&hi.coeffs, &ctx.pow_p(shift), &m);
        let coeffs = modpoly::add(&lo.coeffs, &scaled, &m);
        Self::from_parts(lo.val, coeffs).reduced(ctx)
    }

    /// `-self`.
    pub fn neg_mod(&self, ctx: &QadicContext) -> Self {
        match ctx.relative_precision(self.val) {
            Some(n) if !self.is_zero() => {
                let m = ctx.pow_p(n);
                Self::from_parts(self.val, modpoly::neg(&self.coeffs, &m)).reduced(ctx)
            }
            _ => Self::zero(),
        }
    }

    /// `self - other`.
    pub fn sub_mod(&self, other: &Self, ctx: &QadicContext) -> Self {
        self.add_mod(&other.neg_mod(ctx), ctx)
    }

    /// `self * other`.
    pub fn mul_mod(&self, other: &Self, ctx: &QadicContext) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let val = self.val + other.val;
        let n = match ctx.relative_precision(val) {
            Some(n) => n,
            None => return Self::zero(),
        };

        let m = ctx.pow_p(n);
        let coeffs = ctx.relation_at(n).mul_mod(&self.coeffs, &other.coeffs, &m);
        Self::from_parts(val, coeffs).reduced(ctx)
    }

    /// `self^exp`.
    pub fn pow_mod(&self, exp: u64, ctx: &QadicContext) -> Self {
        if exp == 0 {
            return Self::one().reduced(ctx);
        }
        if self.is_zero() {
            return Self::zero();
        }
        let val = self.val.saturating_mul(exp as i64);
        let n = match ctx.relative_precision(val) {
            Some(n) => n,
            None => return Self::zero(),
        };

        let m = ctx.pow_p(n);
        let coeffs = compose::pow_mod(&self.coeffs, &BigUint::from(exp), &ctx.relation_at(n), &m);
        Self::from_parts(val, coeffs).reduced(ctx)
    }

    /// `self^{-1}`.
    ///
    /// The unit part is inverted modulo `p^{N + v}` so that the result is
    /// correct to precision `N`.
    ///
    /// # Errors
    ///
    /// Returns [`QadicError::NotInvertible`] for zero, or if the relation is
    /// not irreducible modulo `p`.
    pub fn inverse_mod(&self, ctx: &QadicContext) -> Result<Self, QadicError> {
        if self.is_zero() {
            return Err(QadicError::NotInvertible);
        }
        let n = match ctx.relative_precision(-self.val) {
            Some(n) => n,
            None => return Ok(Self::zero()),
        };

        let inv = compose::inv_mod(&self.coeffs, &ctx.relation_at(n), ctx.prime(), n)?;
        Ok(Self::from_parts(-self.val, inv).reduced(ctx))
    }

    /// `σ^e(self)`, where `σ` is the Frobenius automorphism.
    ///
    /// See [`frobenius::frobenius`].
    ///
    /// # Errors
    ///
    /// Returns [`QadicError::DerivativeNotInvertible`] if the relation is not
    /// separable modulo `p`.
    pub fn frobenius(&self, e: i64, ctx: &QadicContext) -> Result<Self, QadicError> {
        frobenius::frobenius(self, e, ctx)
    }

    /// Replace `self` by `σ^e(self)`.
    ///
    /// The image is computed into fresh storage, which then replaces the
    /// element's coefficients; on error `self` is unchanged.
    pub fn frobenius_assign(&mut self, e: i64, ctx: &QadicContext) -> Result<(), QadicError> {
        let image = frobenius::frobenius(self, e, ctx)?;
        *self = image;
        Ok(())
    }

    /// The `d` Galois conjugates `σ^0(self), ..., σ^{d-1}(self)`.
    pub fn conjugates(&self, ctx: &QadicContext) -> Result<Vec<Self>, QadicError> {
        (0..ctx.degree() as i64).map(|i| self.frobenius(i, ctx)).collect()
    }

    /// Trace to `Q_p`: the sum of all conjugates.
    ///
    /// The result lies in the base subfield.
    pub fn trace(&self, ctx: &QadicContext) -> Result<Self, QadicError> {
        Ok(self
            .conjugates(ctx)?
            .iter()
            .fold(Self::zero(), |acc, c| acc.add_mod(c, ctx)))
    }

    /// Norm to `Q_p`: the product of all conjugates.
    ///
    /// The result lies in the base subfield.
    pub fn norm(&self, ctx: &QadicContext) -> Result<Self, QadicError> {
        Ok(self
            .conjugates(ctx)?
            .iter()
            .fold(Self::one().reduced(ctx), |acc, c| acc.mul_mod(c, ctx)))
    }
}

impl Default for Qadic {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Qadic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let terms = self.coeffs.iter().enumerate().filter(|(_, c)| !c.is_zero()).count();
        let wrap = self.val != 0 && terms > 1;
        if wrap {
            write!(f, "(")?;
        }

        let mut first = true;
        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;

            match i {
                0 => write!(f, "{}", c)?,
                1 if c.is_one() => write!(f, "x")?,
                1 => write!(f, "{}*x", c)?,
                _ if c.is_one() => write!(f, "x^{}", i)?,
                _ => write!(f, "{}*x^{}", c, i)?,
            }
        }

        if wrap {
            write!(f, ")")?;
        }
        if self.val != 0 {
            write!(f, " * p^{}", self.val)?;
        }
        Ok(())
    }
}

impl fmt::Display for Qadic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
