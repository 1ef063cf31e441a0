pub mod compose;
pub mod frobenius;
pub mod modpoly;
pub mod qadic;
pub mod relation;
pub mod schedule;
