//! Frobenius on Unramified Extensions
//!
//! This example walks through the Frobenius automorphism:
//! - The image of the generator, and its Newton lift
//! - Applying powers of Frobenius to elements
//! - The orbit of an element, its trace and norm
//!
//! Run with: cargo run --example frobenius

use num_bigint::BigInt;
use qadic::{frobenius_generator_with, Qadic, QadicContext, SparseRelation};

fn main() {
    println!("=== Frobenius on Q_5(sqrt 2) and Q_2[x]/(x^7 + x + 1) ===\n");

    quadratic_extension();
    newton_lift();
    septic_orbit();
}

/// Frobenius swaps the two square roots of 2 in Q_5
fn quadratic_extension() {
    println!("--- Q_5(sqrt 2) at precision 5^4 ---\n");

    let rel = SparseRelation::new(vec![BigInt::from(-2), BigInt::from(1)], vec![0, 2]).unwrap();
    let ctx = QadicContext::new(BigInt::from(5), rel, 4).unwrap();
    println!("F(x) = {}", ctx.relation());

    let x = Qadic::gen(&ctx);
    let sx = x.frobenius(1, &ctx).unwrap();
    println!("x          = {}", x);
    println!("sigma(x)   = {}", sx);
    println!("sigma^2(x) = {}", sx.frobenius(1, &ctx).unwrap());

    let a = Qadic::from_coeffs(1, vec![BigInt::from(3), BigInt::from(2)], &ctx);
    println!();
    println!("a          = {}", a);
    println!("sigma(a)   = {}", a.frobenius(1, &ctx).unwrap());
    println!("sigma^-1(a) = {}", a.frobenius(-1, &ctx).unwrap());
    println!();
}

/// Watch the root and the inverse derivative double in precision
fn newton_lift() {
    println!("--- Newton lift of sigma(x) for x^7 + x + 1 over Q_2 ---\n");

    let rel = SparseRelation::new(vec![BigInt::from(1); 3], vec![0, 1, 7]).unwrap();
    let p = BigInt::from(2);

    let image = frobenius_generator_with(1, &rel, &p, 40, |step| {
        let kind = if step.inverse.is_some() { "root + inverse" } else { "root" };
        println!("precision {:>2}: {}", step.precision, kind);
    })
    .unwrap();

    println!("sigma(x) mod 2^40 = {:?}", image);
    println!();
}

/// The seven conjugates of an element, and what they sum and multiply to
fn septic_orbit() {
    println!("--- Orbit in Q_2[x]/(x^7 + x + 1) at precision 2^32 ---\n");

    let rel = SparseRelation::new(vec![BigInt::from(1); 3], vec![0, 1, 7]).unwrap();
    let ctx = QadicContext::new(BigInt::from(2), rel, 32).unwrap();

    let a = Qadic::from_coeffs(0, (1..=7).map(BigInt::from).collect(), &ctx);
    for (i, c) in a.conjugates(&ctx).unwrap().iter().enumerate() {
        println!("sigma^{}(a) = {}", i, c);
    }

    println!();
    println!("Tr(a) = {}", a.trace(&ctx).unwrap());
    println!("N(a)  = {}", a.norm(&ctx).unwrap());
    println!("sigma^7(a) == a: {}", a.frobenius(7, &ctx).unwrap() == a);
}
