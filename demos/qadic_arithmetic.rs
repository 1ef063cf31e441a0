//! Arithmetic in Unramified Extensions
//!
//! This example demonstrates `Qadic` elements:
//! - Canonical form and valuations
//! - Ring operations at a fixed precision
//! - Inverses, including of non-units
//! - Monic normalization of the defining relation
//!
//! Run with: cargo run --example qadic_arithmetic

use num_bigint::BigInt;
use qadic::{Qadic, QadicContext, QadicError, SparseRelation};

fn v(xs: &[i64]) -> Vec<BigInt> {
    xs.iter().map(|&x| BigInt::from(x)).collect()
}

fn main() {
    println!("=== Arithmetic in Q_7[x]/(x^3 - 3) ===\n");

    // x^3 - 3 has no root modulo 7, since 3 is not a cube there
    let rel = SparseRelation::new(v(&[-3, 1]), vec![0, 3]).unwrap();
    let ctx = QadicContext::new(BigInt::from(7), rel, 5).unwrap();

    canonical_form(&ctx);
    ring_operations(&ctx);
    inverses(&ctx);
    contexts();
}

fn canonical_form(ctx: &QadicContext) {
    println!("--- Canonical Form ---\n");

    // 7 + 14x = 7 * (1 + 2x)
    let a = Qadic::from_coeffs(0, v(&[7, 14]), ctx);
    println!("7 + 14x        -> {} (valuation {})", a, a.valuation());

    // p^N vanishes at precision N
    let b = Qadic::from_coeffs(5, v(&[1]), ctx);
    println!("7^5            -> {}", b);

    // x^3 reduces to 3
    let c = Qadic::from_coeffs(0, v(&[0, 0, 0, 1]), ctx);
    println!("x^3            -> {}", c);
    println!();
}

fn ring_operations(ctx: &QadicContext) {
    println!("--- Ring Operations ---\n");

    let a = Qadic::from_coeffs(0, v(&[1, 2, 3]), ctx);
    let b = Qadic::from_coeffs(1, v(&[4, 0, 1]), ctx);

    println!("a     = {}", a);
    println!("b     = {}", b);
    println!("a + b = {}", a.add_mod(&b, ctx));
    println!("a - b = {}", a.sub_mod(&b, ctx));
    println!("a * b = {}", a.mul_mod(&b, ctx));
    println!("a^10  = {}", a.pow_mod(10, ctx));
    println!();
}

fn inverses(ctx: &QadicContext) {
    println!("--- Inverses ---\n");

    let a = Qadic::from_coeffs(0, v(&[1, 2, 3]), ctx);
    let a_inv = a.inverse_mod(ctx).unwrap();
    println!("1/a       = {}", a_inv);
    println!("a * (1/a) = {}", a.mul_mod(&a_inv, ctx));

    // A non-unit inverts to negative valuation
    let b = Qadic::from_coeffs(2, v(&[1, 1]), ctx);
    let b_inv = b.inverse_mod(ctx).unwrap();
    println!("1/b       = {} (valuation {})", b_inv, b_inv.valuation());

    match Qadic::zero().inverse_mod(ctx) {
        Err(QadicError::NotInvertible) => println!("1/0       -> not invertible"),
        other => println!("1/0       -> {:?}", other),
    }
    println!();
}

fn contexts() {
    println!("--- Contexts ---\n");

    // 3x^2 + x + 1 is made monic modulo 5^3
    let rel = SparseRelation::new(v(&[1, 1, 3]), vec![0, 1, 2]).unwrap();
    let ctx = QadicContext::new(BigInt::from(5), rel, 3).unwrap();
    println!("supplied 3x^2 + x + 1, working with {}", ctx.relation());

    let finer = ctx.with_precision(6).unwrap();
    println!("at precision 6: {}", finer.relation());

    for err in [
        QadicContext::new(BigInt::from(9), ctx.relation().clone(), 3).unwrap_err(),
        QadicContext::new(BigInt::from(5), ctx.relation().clone(), 0).unwrap_err(),
        SparseRelation::new(v(&[1, 1]), vec![2, 1]).unwrap_err(),
    ] {
        println!("error: {}", err);
    }
}
