use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Small primes used for trial division and as Miller-Rabin bases.
const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Check if `n` is a prime number.
///
/// Trial division by the primes below 40, then Miller-Rabin with those primes
/// as bases. The test is deterministic for `n < 3.3 * 10^24` and a strong
/// probable-prime test beyond that. Suitable for validating a context's prime
/// at construction, not for prime search.
pub fn is_prime(n: &BigInt) -> bool {
    if n < &BigInt::from(2u32) {
        return false;
    }
    for &q in &SMALL_PRIMES {
        let q = BigInt::from(q);
        if n == &q {
            return true;
        }
        if (n % &q).is_zero() {
            return false;
        }
    }

    // n - 1 = 2^s * r with r odd
    let one = BigInt::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let r = &n_minus_one >> s;

    'witness: for &a in &SMALL_PRIMES {
        let mut x = BigInt::from(a).modpow(&r, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Integer square root, rounded down.
pub fn floor_sqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }
    // Newton's method from an upper bound
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
