//! Dense polynomial primitives modulo a big-integer modulus.
//!
//! Polynomials are plain coefficient slices in ascending order of degree:
//! `a[i]` is the coefficient of `x^i`. Every function returns canonical
//! residues in `[0, m)` whether or not its inputs were reduced, and treats
//! the shorter operand as zero-extended.
//!
//! These are the building blocks for composition and Newton lifting; they
//! know nothing about the defining relation.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Reduce a single integer into `[0, m)`.
///
/// `m` must be positive.
#[inline]
pub fn reduce(a: &BigInt, m: &BigInt) -> BigInt {
    let r = a % m;
    if r.is_negative() {
        r + m
    } else {
        r
    }
}

/// Reduce every coefficient into `[0, m)`.
pub fn reduce_vec(a: &[BigInt], m: &BigInt) -> Vec<BigInt> {
    a.iter().map(|c| reduce(c, m)).collect()
}

/// A zero buffer of length `n`.
pub fn zero(n: usize) -> Vec<BigInt> {
    vec![BigInt::zero(); n]
}

/// Check whether every coefficient is zero.
pub fn is_zero(a: &[BigInt]) -> bool {
    a.iter().all(Zero::is_zero)
}

/// Coefficientwise `a + b mod m`.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::modpoly;
///
/// let m = BigInt::from(7);
/// let a = [BigInt::from(5), BigInt::from(1)];
/// let b = [BigInt::from(4)];
/// assert_eq!(modpoly::add(&a, &b, &m), vec![BigInt::from(2), BigInt::from(1)]);
/// ```
pub fn add(a: &[BigInt], b: &[BigInt], m: &BigInt) -> Vec<BigInt> {
    let n = a.len().max(b.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let s = match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => x + y,
            (Some(x), None) | (None, Some(x)) => x.clone(),
            (None, None) => unreachable!(),
        };
        out.push(reduce(&s, m));
    }
    out
}

/// Coefficientwise `a - b mod m`.
pub fn sub(a: &[BigInt], b: &[BigInt], m: &BigInt) -> Vec<BigInt> {
    let n = a.len().max(b.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let d = match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => x - y,
            (Some(x), None) => x.clone(),
            (None, Some(y)) => -y,
            (None, None) => unreachable!(),
        };
        out.push(reduce(&d, m));
    }
    out
}

/// Coefficientwise `-a mod m`.
pub fn neg(a: &[BigInt], m: &BigInt) -> Vec<BigInt> {
    a.iter().map(|c| reduce(&-c, m)).collect()
}

/// `c * a mod m`.
pub fn scalar_mul(a: &[BigInt], c: &BigInt, m: &BigInt) -> Vec<BigInt> {
    a.iter().map(|x| reduce(&(x * c), m)).collect()
}

/// In-place `acc += b mod m`. `acc` must be at least as long as `b`.
pub fn add_assign(acc: &mut [BigInt], b: &[BigInt], m: &BigInt) {
    debug_assert!(acc.len() >= b.len());
    for (x, y) in acc.iter_mut().zip(b) {
        *x = reduce(&(&*x + y), m);
    }
}

/// In-place `acc += c * a mod m`. `acc` must be at least as long as `a`.
pub fn scalar_mul_add_assign(acc: &mut [BigInt], a: &[BigInt], c: &BigInt, m: &BigInt) {
    debug_assert!(acc.len() >= a.len());
    if c.is_zero() {
        return;
    }
    for (x, y) in acc.iter_mut().zip(a) {
        *x = reduce(&(&*x + y * c), m);
    }
}

/// Full product `a * b mod m` by schoolbook convolution.
///
/// The result has length `a.len() + b.len() - 1`, or is empty if either
/// operand is empty. No reduction against any relation is performed.
pub fn mul(a: &[BigInt], b: &[BigInt], m: &BigInt) -> Vec<BigInt> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut out = zero(a.len() + b.len() - 1);
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    for c in out.iter_mut() {
        *c = reduce(c, m);
    }
    out
}

/// Evaluate `a` at the scalar `x` modulo `m` using Horner's method.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::modpoly;
///
/// // 1 + 2x + 3x^2 at x = 2 is 17 = 3 mod 7
/// let a = [BigInt::from(1), BigInt::from(2), BigInt::from(3)];
/// let m = BigInt::from(7);
/// assert_eq!(modpoly::evaluate(&a, &BigInt::from(2), &m), BigInt::from(3));
/// ```
pub fn evaluate(a: &[BigInt], x: &BigInt, m: &BigInt) -> BigInt {
    let mut acc = BigInt::zero();
    for c in a.iter().rev() {
        acc = reduce(&(acc * x + c), m);
    }
    acc
}
