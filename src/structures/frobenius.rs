//! The Frobenius automorphism of an unramified extension `Q_q = Q_p[x]/(F)`.
//!
//! On the residue field `F_q` Frobenius is `a ↦ a^p`. Its lift to `Z_q` is
//! determined by where it sends the generator `x`: the image `σ^e(x)` is the
//! unique root of `F` that is congruent to `x^{p^e}` modulo `p`. That root is
//! found by Newton iteration from `x^{p^e} mod p`, lifting the root and the
//! inverse of `F'` at the root together so that no division is needed at
//! full precision. An arbitrary element `a(x)` then maps to `a(σ^e(x))`,
//! a single modular composition.

use log::{debug, trace};
use num_bigint::{BigInt, BigUint};
use num_traits::pow;

use crate::error::QadicError;
use crate::structures::compose::{compose_mod, inv_mod_prime, pow_mod, refine_inverse};
use crate::structures::modpoly;
use crate::structures::qadic::{Qadic, QadicContext};
use crate::structures::relation::SparseRelation;
use crate::structures::schedule::PrecisionSchedule;

/// State of the Newton iteration after one step.
#[derive(Debug, Clone, Copy)]
pub struct NewtonStep<'a> {
    /// Precision `e_k`: `root` is correct modulo `p^{e_k}`.
    pub precision: usize,
    /// Current approximation of `σ^e(x)`, reduced modulo `p^{e_k}`.
    pub root: &'a [BigInt],
    /// Inverse of `F'(root)` modulo `p^{e_k}`, or `None` on the final step,
    /// where the inverse is no longer refined.
    pub inverse: Option<&'a [BigInt]>,
}

/// Image of the generator `x` under `σ^e`, modulo `(F, p^n)`.
///
/// See [`frobenius_generator_with`]; this variant does not observe the steps.
///
/// # Errors
///
/// Returns [`QadicError::DerivativeNotInvertible`] if `F` is not separable
/// modulo `p`.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::{frobenius_generator, SparseRelation};
///
/// let v = |xs: &[i64]| xs.iter().map(|&x| BigInt::from(x)).collect::<Vec<_>>();
///
/// // Over Q_5(sqrt 2), Frobenius swaps sqrt 2 and -sqrt 2
/// let rel = SparseRelation::new(v(&[-2, 1]), vec![0, 2]).unwrap();
/// let img = frobenius_generator(1, &rel, &BigInt::from(5), 4).unwrap();
/// assert_eq!(img, v(&[0, 624]));
/// ```
pub fn frobenius_generator(
    e: usize,
    relation: &SparseRelation,
    p: &BigInt,
    n: usize,
) -> Result<Vec<BigInt>, QadicError> {
    frobenius_generator_with(e, relation, p, n, |_| {})
}

/// Image of the generator `x` under `σ^e`, modulo `(F, p^n)`, reporting
/// every Newton step to `observe`.
///
/// The relation must be monic. `observe` is called once for the base case at
/// precision `1` and once after each refinement; the inverse it reports
/// satisfies `F'(root) * inverse = 1` modulo `p^{precision}`.
///
/// # Errors
///
/// Returns [`QadicError::DerivativeNotInvertible`] if `F'` has no inverse at
/// the residue-field root, which happens exactly when `F` is not separable
/// modulo `p`.
///
/// # Panics
///
/// Panics if `n == 0`.
pub fn frobenius_generator_with<O>(
    e: usize,
    relation: &SparseRelation,
    p: &BigInt,
    n: usize,
    mut observe: O,
) -> Result<Vec<BigInt>, QadicError>
where
    O: FnMut(NewtonStep<'_>),
{
    let schedule = PrecisionSchedule::new(p, n);
    debug!(
        "frobenius_generator: e={}, d={}, precision={}, levels={}",
        e,
        relation.degree(),
        n,
        schedule.levels()
    );

    let f = relation.to_dense(schedule.finest());
    let df = relation.derivative_dense(schedule.finest());

    // Base case: x^{p^e} and 1/F'(x^{p^e}) in the residue field
    let exp: BigUint = pow(p.magnitude().clone(), e);
    let mut root = pow_mod(&[BigInt::from(0u32), BigInt::from(1u32)], &exp, relation, p);
    let df_root = compose_mod(&df, &root, relation, p);
    let mut inv = inv_mod_prime(&df_root, relation, p).map_err(|_| QadicError::DerivativeNotInvertible)?;
    observe(NewtonStep {
        precision: 1,
        root: &root,
        inverse: Some(&inv),
    });

    let last = schedule.levels() - 1;
    for k in (0..last).rev() {
        let m = schedule.modulus(k);
        let precision = schedule.exponents()[k];

        // root <- root - F(root) / F'(root)
        let f_root = compose_mod(&f, &root, relation, m);
        let step = relation.mul_mod(&f_root, &inv, m);
        root = modpoly::sub(&root, &step, m);

        if k > 0 {
            // inv <- inv * (2 - F'(root) * inv)
            let df_root = compose_mod(&df, &root, relation, m);
            inv = refine_inverse(&df_root, &inv, relation, m);
            trace!("frobenius_generator: root and inverse lifted to precision {}", precision);
            observe(NewtonStep {
                precision,
                root: &root,
                inverse: Some(&inv),
            });
        } else {
            trace!("frobenius_generator: root lifted to precision {}", precision);
            observe(NewtonStep {
                precision,
                root: &root,
                inverse: None,
            });
        }
    }

    Ok(root)
}

/// Apply `σ^e` to a dense element `op` modulo `(F, p^n)`.
///
/// - Length-1 operands lie in `Z_p`, which Frobenius fixes pointwise.
/// - At precision `1` Frobenius is the power map `a ↦ a^{p^e}`.
/// - Otherwise `op` is composed with the generator image `σ^e(x)`.
///
/// Returns a length-`d` buffer. The relation must be monic.
///
/// # Errors
///
/// Returns [`QadicError::DerivativeNotInvertible`] if `F` is not separable
/// modulo `p`.
///
/// # Panics
///
/// Panics if `op` is empty or longer than `d`, or if `n == 0`.
pub fn frobenius_evaluate(
    op: &[BigInt],
    e: usize,
    relation: &SparseRelation,
    p: &BigInt,
    n: usize,
) -> Result<Vec<BigInt>, QadicError> {
    let d = relation.degree();
    assert!(
        !op.is_empty() && op.len() <= d,
        "operand length {} outside 1..={}",
        op.len(),
        d
    );
    assert!(n >= 1, "precision must be at least 1");

    let m = pow(p.clone(), n);
    if op.len() == 1 {
        let mut out = modpoly::zero(d);
        out[0] = modpoly::reduce(&op[0], &m);
        return Ok(out);
    }
    if n == 1 {
        let exp: BigUint = pow(p.magnitude().clone(), e);
        return Ok(pow_mod(op, &exp, relation, p));
    }

    let image = frobenius_generator(e, relation, p, n)?;
    Ok(compose_mod(op, &image, relation, &m))
}

/// Apply the `e`-th power of Frobenius to `op`.
///
/// `e` may be any integer; it is reduced modulo the extension degree, so
/// negative exponents give the inverse automorphism. The result is in
/// canonical form at the context's precision. `op` is left untouched; see
/// [`Qadic::frobenius_assign`] for the in-place form.
///
/// # Errors
///
/// Returns [`QadicError::DerivativeNotInvertible`] if the context's relation
/// is not separable modulo `p`.
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::{frobenius, Qadic, QadicContext, SparseRelation};
///
/// let rel = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
/// let ctx = QadicContext::new(BigInt::from(5), rel, 4).unwrap();
///
/// let x = Qadic::gen(&ctx);
/// assert_eq!(frobenius(&x, 1, &ctx).unwrap(), x.neg_mod(&ctx));
/// assert_eq!(frobenius(&x, 2, &ctx).unwrap(), x);
/// assert_eq!(frobenius(&x, -1, &ctx).unwrap(), x.neg_mod(&ctx));
/// ```
pub fn frobenius(op: &Qadic, e: i64, ctx: &QadicContext) -> Result<Qadic, QadicError> {
    let d = ctx.degree();
    let e = e.rem_euclid(d as i64) as usize;

    // Hand-built or deserialized elements may carry more than d coefficients
    let op = op.reduced(ctx);
    let n = match ctx.relative_precision(op.valuation()) {
        Some(n) if !op.is_zero() => n,
        _ => return Ok(Qadic::zero()),
    };
    if e == 0 {
        return Ok(op);
    }

    let coeffs = frobenius_evaluate(op.coeffs(), e, &ctx.relation_at(n), ctx.prime(), n)?;
    Ok(Qadic::from_parts(op.valuation(), coeffs).reduced(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    fn v(xs: &[i64]) -> Vec<BigInt> {
        xs.iter().map(|&x| BigInt::from(x)).collect()
    }

    fn sqrt2() -> SparseRelation {
        SparseRelation::new(v(&[-2, 1]), vec![0, 2]).unwrap()
    }

    // x^7 + x + 1, irreducible over F_2
    fn deg7() -> SparseRelation {
        SparseRelation::new(v(&[1, 1, 1]), vec![0, 1, 7]).unwrap()
    }

    #[test]
    fn generator_of_quadratic_extension() {
        let p = BigInt::from(5);
        let rel = sqrt2();
        assert_eq!(frobenius_generator(0, &rel, &p, 4).unwrap(), v(&[0, 1]));
        assert_eq!(frobenius_generator(1, &rel, &p, 4).unwrap(), v(&[0, 624]));
        assert_eq!(frobenius_generator(2, &rel, &p, 4).unwrap(), v(&[0, 1]));
        assert_eq!(frobenius_generator(1, &rel, &p, 1).unwrap(), v(&[0, 4]));
    }

    #[test]
    fn generator_image_is_a_root() {
        let p = BigInt::from(2);
        let rel = deg7();
        let n = 40;
        let m = pow(p.clone(), n);
        let f = rel.to_dense(&m);
        for e in 0..7 {
            let img = frobenius_generator(e, &rel, &p, n).unwrap();
            assert!(modpoly::is_zero(&compose_mod(&f, &img, &rel, &m)), "e = {}", e);

            // and it reduces to x^{2^e} modulo 2
            let expected = pow_mod(&v(&[0, 1]), &pow(BigUint::from(2u32), e), &rel, &p);
            assert_eq!(modpoly::reduce_vec(&img, &p), expected, "e = {}", e);
        }
    }

    #[test]
    fn newton_inverse_is_exact_at_every_step() {
        let p = BigInt::from(2);
        let rel = deg7();
        let df = rel.derivative_dense(&BigInt::from(1u64 << 62));
        let mut seen = Vec::new();

        frobenius_generator_with(3, &rel, &p, 37, |step| {
            seen.push(step.precision);
            let m = pow(p.clone(), step.precision);
            if let Some(inv) = step.inverse {
                let df_root = compose_mod(&df, step.root, &rel, &m);
                let prod = rel.mul_mod(&df_root, inv, &m);
                assert!(prod[0].is_one(), "precision {}", step.precision);
                assert!(modpoly::is_zero(&prod[1..]), "precision {}", step.precision);
            }
        })
        .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 5, 10, 19, 37]);
    }

    #[test]
    fn inseparable_relation_is_reported() {
        // x^5 - 2 over Q_5: F' = 5x^4 vanishes modulo 5
        let rel = SparseRelation::new(v(&[-2, 1]), vec![0, 5]).unwrap();
        assert_eq!(
            frobenius_generator(1, &rel, &BigInt::from(5), 3),
            Err(QadicError::DerivativeNotInvertible)
        );
    }

    #[test]
    fn evaluate_dispatch_paths() {
        let p = BigInt::from(5);
        let rel = sqrt2();

        // base subfield: fixed
        assert_eq!(frobenius_evaluate(&v(&[7]), 1, &rel, &p, 3).unwrap(), v(&[7, 0]));
        // unit precision: power map
        assert_eq!(frobenius_evaluate(&v(&[2, 3]), 1, &rel, &p, 1).unwrap(), v(&[2, 2]));
        // full: 2 + 3x -> 2 - 3x
        assert_eq!(frobenius_evaluate(&v(&[2, 3]), 1, &rel, &p, 3).unwrap(), v(&[2, 122]));
    }

    #[test]
    #[should_panic(expected = "operand length")]
    fn evaluate_rejects_long_operand() {
        let _ = frobenius_evaluate(&v(&[1, 2, 3]), 1, &sqrt2(), &BigInt::from(5), 2);
    }
}
