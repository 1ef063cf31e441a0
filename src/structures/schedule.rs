//! Precision schedules for Newton lifting.
//!
//! Lifting a solution from precision `p^1` to `p^N` by Newton iteration
//! doubles the number of correct digits per step. Working backwards from the
//! target gives the exponents `e_0 = N`, `e_{k+1} = ceil(e_k / 2)`, ending at
//! `1`. A [`PrecisionSchedule`] computes these exponents and the moduli
//! `p^{e_k}` once, so the lifting loop only indexes into them.

use num_bigint::BigInt;

/// Precomputed exponents and moduli for a precision-doubling lift.
///
/// Index `0` is the finest precision (the target `N`), the last index is the
/// coarsest (`1`).
///
/// # Example
///
/// ```
/// use num_bigint::BigInt;
/// use qadic::PrecisionSchedule;
///
/// let s = PrecisionSchedule::new(&BigInt::from(5), 10);
/// assert_eq!(s.exponents(), &[10, 5, 3, 2, 1]);
/// assert_eq!(s.modulus(0), &BigInt::from(9765625));
/// assert_eq!(s.coarsest(), &BigInt::from(5));
/// ```
#[derive(Clone, Debug)]
pub struct PrecisionSchedule {
    /// Exponents `e_k`, strictly decreasing to 1
    exps: Vec<usize>,
    /// Moduli `p^{e_k}`
    moduli: Vec<BigInt>,
}

impl PrecisionSchedule {
    /// Build the schedule for lifting to `p^n`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn new(p: &BigInt, n: usize) -> Self {
        assert!(n >= 1, "precision must be at least 1");

        let mut exps = vec![n];
        while exps[exps.len() - 1] > 1 {
            let e = exps[exps.len() - 1];
            exps.push((e + 1) / 2);
        }

        // Square upwards from p; e_k is either 2e_{k+1} or 2e_{k+1} - 1.
        let mut moduli = vec![BigInt::from(0u32); exps.len()];
        let last = exps.len() - 1;
        moduli[last] = p.clone();
        for k in (0..last).rev() {
            let sq = &moduli[k + 1] * &moduli[k + 1];
            moduli[k] = if exps[k] == 2 * exps[k + 1] { sq } else { sq / p };
        }

        Self { exps, moduli }
    }

    /// Number of precision levels (always at least 1).
    pub fn levels(&self) -> usize {
        self.exps.len()
    }

    /// The exponents, finest first.
    pub fn exponents(&self) -> &[usize] {
        &self.exps
    }

    /// The modulus `p^{e_k}` at level `k`.
    pub fn modulus(&self, k: usize) -> &BigInt {
        &self.moduli[k]
    }

    /// The modulus `p^N`.
    pub fn finest(&self) -> &BigInt {
        &self.moduli[0]
    }

    /// The modulus `p`.
    pub fn coarsest(&self) -> &BigInt {
        &self.moduli[self.moduli.len() - 1]
    }

    /// Refinement levels `(e_k, p^{e_k})` from coarse to fine, excluding the
    /// coarsest level itself.
    pub fn refinements(&self) -> impl Iterator<Item = (usize, &BigInt)> + '_ {
        let last = self.exps.len() - 1;
        (0..last).rev().map(move |k| (self.exps[k], &self.moduli[k]))
    }
}
