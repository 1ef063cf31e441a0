use num_bigint::BigInt;
use proptest::prelude::*;

use qadic::{frobenius, Qadic, QadicContext, SparseRelation};

fn relation(terms: &[(i64, usize)]) -> SparseRelation {
    SparseRelation::from_terms(terms.iter().map(|&(c, j)| (BigInt::from(c), j))).unwrap()
}

/// Q_5(sqrt 2), precision 5^4.
fn ctx_quadratic() -> QadicContext {
    QadicContext::new(BigInt::from(5), relation(&[(-2, 0), (1, 2)]), 4).unwrap()
}

/// x^3 + x + 1 over Q_5, precision 5^6.
fn ctx_cubic() -> QadicContext {
    QadicContext::new(BigInt::from(5), relation(&[(1, 0), (1, 1), (1, 3)]), 6).unwrap()
}

/// x^7 + x + 1 over Q_2, precision 2^16. Frobenius composes the length-8
/// relation, which goes through the block method.
fn ctx_septic() -> QadicContext {
    QadicContext::new(BigInt::from(2), relation(&[(1, 0), (1, 1), (1, 7)]), 16).unwrap()
}

fn contexts() -> Vec<QadicContext> {
    vec![ctx_quadratic(), ctx_cubic(), ctx_septic()]
}

/// Non-negative valuation: integral elements.
fn arb_raw() -> impl Strategy<Value = (i64, Vec<u64>)> {
    (0i64..3, prop::collection::vec(0u64..1_000_000, 7))
}

/// Valuation of either sign.
fn arb_signed() -> impl Strategy<Value = (i64, Vec<u64>)> {
    (-3i64..3, prop::collection::vec(0u64..1_000_000, 7))
}

/// Negative valuation with coefficients below `p^{N+1}` in every context,
/// so the same element is representable unchanged at a finer precision.
fn arb_fractional() -> impl Strategy<Value = (i64, Vec<u64>)> {
    (-3i64..0, prop::collection::vec(0u64..3000, 7))
}

fn build(raw: &(i64, Vec<u64>), ctx: &QadicContext) -> Qadic {
    let coeffs = raw.1.iter().take(ctx.degree()).map(|&c| BigInt::from(c)).collect();
    Qadic::from_coeffs(raw.0, coeffs, ctx)
}

// ===== Concrete scenario =====

#[test]
fn sqrt2_over_q5() {
    let ctx = ctx_quadratic();
    let x = Qadic::gen(&ctx);

    let image = frobenius(&x, 1, &ctx).unwrap();
    assert_eq!(image.valuation(), 0);
    assert_eq!(image.coeffs(), &[BigInt::from(0), BigInt::from(624)]);
    assert_eq!(image, x.neg_mod(&ctx));

    assert_eq!(frobenius(&x, 2, &ctx).unwrap(), x);
}

#[test]
fn zero_and_vanishing_operands() {
    for ctx in contexts() {
        assert!(frobenius(&Qadic::zero(), 1, &ctx).unwrap().is_zero());

        // p^N is zero at precision N
        let n = ctx.precision() as i64;
        let vanishing = Qadic::from_coeffs(n, vec![BigInt::from(1)], &ctx);
        assert!(frobenius(&vanishing, 1, &ctx).unwrap().is_zero());
    }
}

#[test]
fn valuation_is_preserved() {
    let ctx = ctx_cubic();
    let a = Qadic::from_coeffs(2, vec![BigInt::from(1), BigInt::from(2), BigInt::from(3)], &ctx);
    let b = a.frobenius(1, &ctx).unwrap();
    assert_eq!(b.valuation(), 2);
    assert_eq!(b.frobenius(2, &ctx).unwrap(), a);
}

#[test]
fn generator_orbit_has_degree_elements() {
    let ctx = ctx_septic();
    let x = Qadic::gen(&ctx);
    let orbit = x.conjugates(&ctx).unwrap();
    for i in 0..orbit.len() {
        for j in (i + 1)..orbit.len() {
            assert_ne!(orbit[i], orbit[j], "conjugates {} and {} coincide", i, j);
        }
    }
}

// ===== Automorphism laws =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn additive(a in arb_signed(), b in arb_signed(), e in 0i64..8) {
        for ctx in contexts() {
            let (a, b) = (build(&a, &ctx), build(&b, &ctx));
            let lhs = a.add_mod(&b, &ctx).frobenius(e, &ctx).unwrap();
            let rhs = a.frobenius(e, &ctx).unwrap().add_mod(&b.frobenius(e, &ctx).unwrap(), &ctx);
            prop_assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn multiplicative(a in arb_raw(), b in arb_raw(), e in 0i64..8) {
        for ctx in contexts() {
            let (a, b) = (build(&a, &ctx), build(&b, &ctx));
            let lhs = a.mul_mod(&b, &ctx).frobenius(e, &ctx).unwrap();
            let rhs = a.frobenius(e, &ctx).unwrap().mul_mod(&b.frobenius(e, &ctx).unwrap(), &ctx);
            prop_assert_eq!(lhs, rhs);
        }
    }
}

// ===== Order and identity =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn order_divides_degree(a in arb_signed()) {
        for ctx in contexts() {
            let a = build(&a, &ctx);
            let d = ctx.degree() as i64;
            prop_assert_eq!(a.frobenius(d, &ctx).unwrap(), a.clone());
        }
    }

    #[test]
    fn identity_for_multiples_of_degree(a in arb_signed(), k in -3i64..4) {
        for ctx in contexts() {
            let a = build(&a, &ctx);
            let d = ctx.degree() as i64;
            prop_assert_eq!(a.frobenius(0, &ctx).unwrap(), a.clone());
            prop_assert_eq!(a.frobenius(k * d, &ctx).unwrap(), a.clone());
        }
    }

    #[test]
    fn powers_compose(a in arb_signed(), e1 in 0i64..7, e2 in -7i64..7) {
        for ctx in contexts() {
            let a = build(&a, &ctx);
            let twice = a.frobenius(e1, &ctx).unwrap().frobenius(e2, &ctx).unwrap();
            prop_assert_eq!(twice, a.frobenius(e1 + e2, &ctx).unwrap());
        }
    }

    #[test]
    fn base_subfield_is_fixed(c in -100_000i64..100_000, e in -10i64..10) {
        for ctx in contexts() {
            let a = Qadic::from_int(c, &ctx);
            prop_assert_eq!(a.frobenius(e, &ctx).unwrap(), a.clone());
        }
    }

    #[test]
    fn in_place_matches_out_of_place(a in arb_signed(), e in -7i64..7) {
        for ctx in contexts() {
            let mut a = build(&a, &ctx);
            let expected = a.frobenius(e, &ctx).unwrap();
            a.frobenius_assign(e, &ctx).unwrap();
            prop_assert_eq!(a, expected);
        }
    }
}

// ===== Trace and norm =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn trace_and_norm_land_in_base_field(a in arb_raw()) {
        for ctx in contexts() {
            let a = build(&a, &ctx);
            prop_assert!(a.trace(&ctx).unwrap().len() <= 1);
            prop_assert!(a.norm(&ctx).unwrap().len() <= 1);
        }
    }

    #[test]
    fn trace_of_base_element(c in 0i64..1000) {
        for ctx in contexts() {
            let a = Qadic::from_int(c, &ctx);
            let d = ctx.degree() as i64;
            prop_assert_eq!(a.trace(&ctx).unwrap(), Qadic::from_int(c * d, &ctx));
        }
    }
}

// ===== Inverses and negative valuations =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn inverse_round_trip(a in arb_raw()) {
        for ctx in contexts() {
            let a = build(&a, &ctx);
            prop_assume!(!a.is_zero());
            let inv = a.inverse_mod(&ctx).unwrap();
            prop_assert_eq!(inv.valuation(), -a.valuation());
            prop_assert!(a.mul_mod(&inv, &ctx).is_one());
            prop_assert_eq!(inv.inverse_mod(&ctx).unwrap(), a.clone());
        }
    }

    #[test]
    fn fractional_elements_agree_with_finer_precision(
        a in arb_fractional(),
        b in arb_fractional(),
        e in 1i64..7,
    ) {
        for ctx in contexts() {
            let fine = ctx.with_precision(ctx.precision() + 4).unwrap();
            let (a0, b0) = (build(&a, &ctx), build(&b, &ctx));
            let (a1, b1) = (build(&a, &fine), build(&b, &fine));
            prop_assume!(!a0.is_zero() && !b0.is_zero());

            prop_assert_eq!(a0.mul_mod(&b0, &ctx), a1.mul_mod(&b1, &fine).reduced(&ctx));
            prop_assert_eq!(
                a0.frobenius(e, &ctx).unwrap(),
                a1.frobenius(e, &fine).unwrap().reduced(&ctx)
            );
            prop_assert_eq!(
                a0.inverse_mod(&ctx).unwrap(),
                a1.inverse_mod(&fine).unwrap().reduced(&ctx)
            );
        }
    }
}
