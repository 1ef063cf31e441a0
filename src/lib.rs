//! Frobenius maps on unramified extensions of the p-adic numbers.
//!
//! An unramified extension `Q_q = Q_p[x]/(F)` is fixed by a [`QadicContext`]
//! (prime, sparse defining relation, working precision). Elements are
//! [`Qadic`] values `p^v * a(x)`. The Frobenius automorphism is computed by
//! Newton-lifting the image of the generator and substituting it with a
//! size-dispatched modular composition.
//!
//! ```
//! use num_bigint::BigInt;
//! use qadic::{Qadic, QadicContext, SparseRelation};
//!
//! // Q_5(sqrt 2) to precision 5^4
//! let rel = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
//! let ctx = QadicContext::new(BigInt::from(5), rel, 4).unwrap();
//!
//! let a = Qadic::from_coeffs(0, vec![BigInt::from(3), BigInt::from(2)], &ctx);
//! let b = a.frobenius(1, &ctx).unwrap();
//! assert_eq!(b, Qadic::from_coeffs(0, vec![BigInt::from(3), BigInt::from(-2)], &ctx));
//! assert_eq!(b.frobenius(1, &ctx).unwrap(), a);
//! ```

pub mod error;
pub mod structures;
pub mod utils;

pub use error::QadicError;

pub use structures::compose::{
    compose_mod, compose_mod_blocks, compose_mod_horner, inv_mod, inv_mod_prime, pow_mod,
    ComposeStrategy, BLOCK_THRESHOLD,
};
pub use structures::frobenius::{
    frobenius, frobenius_evaluate, frobenius_generator, frobenius_generator_with, NewtonStep,
};
pub use structures::modpoly;
pub use structures::qadic::{Qadic, QadicContext};
pub use structures::relation::SparseRelation;
pub use structures::schedule::PrecisionSchedule;
pub use utils::is_prime;
