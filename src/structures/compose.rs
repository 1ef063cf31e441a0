//! Modular composition, exponentiation and inversion in `(Z/m)[x]/(F)`.
//!
//! Composition `f(g(x)) mod (F, m)` is the workhorse of the Frobenius map:
//! it evaluates the relation at a Newton approximation, evaluates the
//! derivative for the inverse update, and finally substitutes the image of the
//! generator into an arbitrary element.
//!
//! Two algorithms are provided:
//!
//! - **Horner**: `len(f) - 1` multiplications by `g`, each followed by a
//!   reduction against `F`.
//! - **Blocks** (Paterson–Stockmeyer): precompute `g, g^2, ..., g^B` with
//!   `B = floor(sqrt(len(f)))`, form each block of `B` coefficients of `f` as a
//!   linear combination of those powers, and combine the blocks with the giant
//!   step `g^B`. This needs `O(sqrt(len(f)))` full multiplications instead of
//!   `O(len(f))`, at the cost of storing `B` reduced powers.

use log::{debug, trace};
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::error::QadicError;
use crate::structures::modpoly;
use crate::structures::relation::SparseRelation;
use crate::structures::schedule::PrecisionSchedule;
use crate::utils::floor_sqrt;

/// Length of `f` from which [`compose_mod`] switches to the block method.
///
/// Below this the precomputation of powers costs more than it saves.
pub const BLOCK_THRESHOLD: usize = 6;

/// Algorithm used by [`compose_mod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComposeStrategy {
    /// Horner evaluation over the quotient ring.
    Horner,
    /// Paterson–Stockmeyer baby-step/giant-step evaluation.
    Blocks,
}

impl ComposeStrategy {
    /// The strategy [`compose_mod`] uses for an outer polynomial of length `len1`.
    ///
    /// # Example
    ///
    /// ```
    /// use qadic::ComposeStrategy;
    ///
    /// assert_eq!(ComposeStrategy::for_len(5), ComposeStrategy::Horner);
    /// assert_eq!(ComposeStrategy::for_len(6), ComposeStrategy::Blocks);
    /// ```
    pub const fn for_len(len1: usize) -> Self {
        if len1 < BLOCK_THRESHOLD {
            Self::Horner
        } else {
            Self::Blocks
        }
    }
}

fn check_operands(f: &[BigInt], g: &[BigInt], relation: &SparseRelation) {
    assert!(!f.is_empty(), "outer polynomial must be non-empty");
    assert!(
        !g.is_empty() && g.len() <= relation.degree(),
        "inner polynomial length {} outside 1..={}",
        g.len(),
        relation.degree()
    );
}

/// `f` evaluated at the constant `g0`, as a length-`d` buffer.
fn evaluate_scalar(f: &[BigInt], g0: &BigInt, d: usize, m: &BigInt) -> Vec<BigInt> {
    let mut out = modpoly::zero(d);
    out[0] = modpoly::evaluate(f, g0, m);
    out
}

/// Compute `f(g(x)) mod (F, m)` as a length-`d` buffer.
///
/// Dispatches on the length of `f` via [`ComposeStrategy::for_len`]. The
/// relation must be monic.
///
/// # Panics
///
/// Panics if `f` is empty, or if `g` is empty or longer than `d`.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::{compose_mod, SparseRelation};
///
/// let v = |xs: &[i64]| xs.iter().map(|&x| BigInt::from(x)).collect::<Vec<_>>();
///
/// // In (Z/25)[x]/(x^2 - 2): f(y) = y^2 + 1 at g = 3x gives 9*2 + 1 = 19
/// let rel = SparseRelation::new(v(&[-2, 1]), vec![0, 2]).unwrap();
/// let r = compose_mod(&v(&[1, 0, 1]), &v(&[0, 3]), &rel, &BigInt::from(25));
/// assert_eq!(r, v(&[19, 0]));
/// ```
pub fn compose_mod(f: &[BigInt], g: &[BigInt], relation: &SparseRelation, m: &BigInt) -> Vec<BigInt> {
    let strategy = ComposeStrategy::for_len(f.len());
    trace!("compose_mod: len1={}, len2={}, {:?}", f.len(), g.len(), strategy);
    match strategy {
        ComposeStrategy::Horner => compose_mod_horner(f, g, relation, m),
        ComposeStrategy::Blocks => compose_mod_blocks(f, g, relation, m),
    }
}

/// Compute `f(g(x)) mod (F, m)` by Horner's rule.
///
/// # Panics
///
/// Same preconditions as [`compose_mod`].
pub fn compose_mod_horner(f: &[BigInt], g: &[BigInt], relation: &SparseRelation, m: &BigInt) -> Vec<BigInt> {
    check_operands(f, g, relation);
    let d = relation.degree();

    if f.len() == 1 {
        let mut out = modpoly::zero(d);
        out[0] = modpoly::reduce(&f[0], m);
        return out;
    }
    if g.len() == 1 {
        return evaluate_scalar(f, &g[0], d, m);
    }

    let top = f.len() - 1;
    let mut acc = modpoly::scalar_mul(g, &f[top], m);
    acc.resize(d, BigInt::zero());
    acc[0] = modpoly::reduce(&(&acc[0] + &f[top - 1]), m);

    for c in f[..top - 1].iter().rev() {
        acc = relation.mul_mod(&acc, g, m);
        acc[0] = modpoly::reduce(&(&acc[0] + c), m);
    }
    acc
}

/// Compute `f(g(x)) mod (F, m)` by the Paterson–Stockmeyer block method.
///
/// Correct for every length of `f`; [`compose_mod`] only selects it from
/// [`BLOCK_THRESHOLD`] upwards.
///
/// # Panics
///
/// Same preconditions as [`compose_mod`].
pub fn compose_mod_blocks(f: &[BigInt], g: &[BigInt], relation: &SparseRelation, m: &BigInt) -> Vec<BigInt> {
    check_operands(f, g, relation);
    let d = relation.degree();

    if g.len() == 1 {
        return evaluate_scalar(f, &g[0], d, m);
    }

    let block = floor_sqrt(f.len());
    let blocks = f.len().div_ceil(block);
    debug!("compose_mod_blocks: len1={}, block={}, blocks={}", f.len(), block, blocks);

    // Baby steps: powers[i] = g^{i+1}, each reduced to length d
    let mut powers: Vec<Vec<BigInt>> = Vec::with_capacity(block);
    let mut first = modpoly::reduce_vec(g, m);
    first.resize(d, BigInt::zero());
    powers.push(first);
    for i in 1..block {
        let next = relation.mul_mod(&powers[i - 1], g, m);
        powers.push(next);
    }

    let mut acc = modpoly::zero(d);
    let mut giant: Option<Vec<BigInt>> = None;

    for (k, chunk) in f.chunks(block).enumerate() {
        // Coefficient polynomial of this block
        let mut c = modpoly::zero(d);
        c[0] = modpoly::reduce(&chunk[0], m);
        for (coeff, power) in chunk[1..].iter().zip(&powers) {
            modpoly::scalar_mul_add_assign(&mut c, power, coeff, m);
        }

        match &giant {
            None => modpoly::add_assign(&mut acc, &c, m),
            Some(gk) => {
                let term = relation.mul_mod(&c, gk, m);
                modpoly::add_assign(&mut acc, &term, m);
            }
        }

        if k + 1 < blocks {
            let top = &powers[block - 1];
            giant = Some(match giant {
                None => top.clone(),
                Some(gk) => relation.mul_mod(&gk, top, m),
            });
        }
    }
    acc
}

/// Compute `op^exp mod (F, m)` by square-and-multiply.
///
/// `op` may be of any length; it is reduced against the relation first.
/// Returns a length-`d` buffer; `exp = 0` gives `1`.
pub fn pow_mod(op: &[BigInt], exp: &BigUint, relation: &SparseRelation, m: &BigInt) -> Vec<BigInt> {
    let d = relation.degree();
    let mut result = modpoly::zero(d);
    result[0] = modpoly::reduce(&BigInt::one(), m);
    if exp.is_zero() {
        return result;
    }

    let base = relation.reduce(modpoly::reduce_vec(op, m), m);
    for i in (0..exp.bits()).rev() {
        result = relation.mul_mod(&result, &result, m);
        if exp.bit(i) {
            result = relation.mul_mod(&result, &base, m);
        }
    }
    result
}

/// Inverse of `op` modulo `(F, p)` for a prime `p`.
///
/// When `F` is irreducible modulo `p` the quotient is the field `F_{p^d}`,
/// whose non-zero elements satisfy `a^{p^d - 2} = a^{-1}`. The candidate is
/// verified, so a reducible relation or a zero residue is reported rather than
/// returning a wrong answer.
///
/// # Errors
///
/// Returns [`QadicError::NotInvertible`] if no inverse was found.
pub fn inv_mod_prime(op: &[BigInt], relation: &SparseRelation, p: &BigInt) -> Result<Vec<BigInt>, QadicError> {
    let d = relation.degree();
    let a = relation.reduce(modpoly::reduce_vec(op, p), p);
    if modpoly::is_zero(&a) {
        return Err(QadicError::NotInvertible);
    }

    let order = p.magnitude().pow(d as u32);
    let inv = pow_mod(&a, &(order - 2u32), relation, p);

    let check = relation.mul_mod(&a, &inv, p);
    if check[0].is_one() && modpoly::is_zero(&check[1..]) {
        Ok(inv)
    } else {
        Err(QadicError::NotInvertible)
    }
}

/// One quadratic inverse update `inv * (2 - a * inv) mod (F, m)`.
///
/// If `a * inv = 1 mod p^k` then the result is an inverse modulo `p^{2k}`.
pub(crate) fn refine_inverse(a: &[BigInt], inv: &[BigInt], relation: &SparseRelation, m: &BigInt) -> Vec<BigInt> {
    let mut t = relation.mul_mod(inv, a, m);
    t[0] -= 2u32;
    let t = modpoly::neg(&t, m);
    relation.mul_mod(inv, &t, m)
}

/// Inverse of `op` modulo `(F, p^n)`.
///
/// Inverts modulo `p` and Hensel-lifts along a [`PrecisionSchedule`].
///
/// # Errors
///
/// Returns [`QadicError::NotInvertible`] if `op` is not a unit modulo `p`.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::{inv_mod, SparseRelation};
///
/// let v = |xs: &[i64]| xs.iter().map(|&x| BigInt::from(x)).collect::<Vec<_>>();
///
/// // x^2 - 2 over Z/5^4: x * (x/2) = 1, and 1/2 = 313 mod 625
/// let rel = SparseRelation::new(v(&[-2, 1]), vec![0, 2]).unwrap();
/// let inv = inv_mod(&v(&[0, 1]), &rel, &BigInt::from(5), 4).unwrap();
/// assert_eq!(inv, v(&[0, 313]));
/// ```
pub fn inv_mod(op: &[BigInt], relation: &SparseRelation, p: &BigInt, n: usize) -> Result<Vec<BigInt>, QadicError> {
    let schedule = PrecisionSchedule::new(p, n);
    let mut inv = inv_mod_prime(op, relation, p)?;
    for (e, m) in schedule.refinements() {
        let a = relation.reduce(modpoly::reduce_vec(op, m), m);
        inv = refine_inverse(&a, &inv, relation, m);
        trace!("inv_mod: lifted inverse to precision {}", e);
    }
    Ok(inv)
}
