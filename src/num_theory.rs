use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::RngCore;
use thiserror::Error;

/// Miller-Rabin witness count.
const MILLER_RABIN_ROUNDS: usize = 40;

/// Attempt ceiling for the randomized sampling loops. Sampling converges in a
/// handful of iterations for any sane random source; hitting the cap means the
/// source is broken, not the input.
const MAX_SAMPLING_ATTEMPTS: usize = 100_000;

/// The first 100 primes. Used for trial-division pre-filtering before the
/// Miller-Rabin rounds, and as the fixed witness set.
pub const FIRST_PRIMES: [u32; 100] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541,
];

#[derive(Error, Debug)]
pub enum NumTheoryError {
    #[error("modular inverse does not exist for non-coprime inputs")]
    NotCoprime,
    #[error("bit length out of range")]
    InvalidBitLength,
    #[error("random sampling failed to converge after {0} attempts")]
    GenerationExhausted(usize),
}

/// Number of bits in the binary magnitude of `n`. Zero counts as a single
/// zero bit, so `bit_length(0) == 1`.
pub fn bit_length(n: &BigInt) -> u64 {
    if n.is_zero() {
        1
    } else {
        n.bits()
    }
}

/// Euclidean remainder of `a` modulo `n`, always in `[0, n)` even for
/// negative `a`. The `%` operator truncates toward zero instead.
pub fn positive_mod(a: &BigInt, n: &BigInt) -> BigInt {
    ((a % n) + n) % n
}

/// Extended Euclidean algorithm: returns `(g, x, y)` with `a*x + b*y = g`
/// and `g = gcd(a, b)`.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        (a.clone(), BigInt::one(), BigInt::zero())
    } else {
        let (g, x, y) = extended_gcd(b, &(a % b));
        let q = a / b;
        (g, y.clone(), x - q * y)
    }
}

/// The unique `x` in `[0, n)` with `a*x = 1 (mod n)`. Fails when `a` and `n`
/// are not coprime, including the degenerate zero cases.
pub fn mod_inverse(a: &BigInt, n: &BigInt) -> Result<BigInt, NumTheoryError> {
    if n.is_zero() {
        return Err(NumTheoryError::NotCoprime);
    }
    let (g, x, _) = extended_gcd(a, n);
    if !g.is_one() {
        return Err(NumTheoryError::NotCoprime);
    }
    Ok(positive_mod(&x, n))
}

/// Probabilistic primality test: trial division by `FIRST_PRIMES`, then
/// Miller-Rabin with the table primes as witnesses. Deterministic for all
/// inputs below 3.3e24 with this witness set.
pub fn is_prime(n: &BigInt) -> bool {
    let two = BigInt::from(2);
    if n < &two {
        return false;
    }
    for &p in FIRST_PRIMES.iter() {
        let p = BigInt::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }
    let last = u64::from(FIRST_PRIMES[FIRST_PRIMES.len() - 1]);
    if *n < BigInt::from(last * last) {
        // survived trial division by every prime up to its square root
        return true;
    }

    // write n - 1 = d * 2^s with d odd
    let n_minus_one = n - BigInt::one();
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    'witness: for &a in FIRST_PRIMES.iter().take(MILLER_RABIN_ROUNDS) {
        let mut x = BigInt::from(a).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Uniformly random non-negative integer whose bit length is exactly `bits`:
/// the top bit is forced set, so the result is never shorter than requested.
pub fn generate_random(bits: usize, rng: &mut impl RngCore) -> Result<BigInt, NumTheoryError> {
    if bits == 0 {
        return Err(NumTheoryError::InvalidBitLength);
    }
    let len = (bits + 7) / 8;
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    let mut n = BigInt::from_bytes_be(Sign::Plus, &bytes);
    n >>= len * 8 - bits;
    n |= BigInt::one() << (bits - 1);
    Ok(n)
}

/// Random prime of exactly `bits` bits. Candidates are forced odd before
/// testing, so `bits` must be at least 2.
pub fn generate_random_prime(
    bits: usize,
    rng: &mut impl RngCore,
) -> Result<BigInt, NumTheoryError> {
    if bits < 2 {
        return Err(NumTheoryError::InvalidBitLength);
    }
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = generate_random(bits, rng)? | BigInt::one();
        if is_prime(&candidate) {
            return Ok(candidate);
        }
    }
    Err(NumTheoryError::GenerationExhausted(MAX_SAMPLING_ATTEMPTS))
}

/// Random integer of exactly `bits` bits that is coprime to `n`. Callers that
/// additionally need the sample below `n` request `bit_length(n) - 1` bits.
pub fn generate_coprime(
    n: &BigInt,
    bits: usize,
    rng: &mut impl RngCore,
) -> Result<BigInt, NumTheoryError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = generate_random(bits, rng)?;
        if candidate.gcd(n).is_one() {
            return Ok(candidate);
        }
    }
    Err(NumTheoryError::GenerationExhausted(MAX_SAMPLING_ATTEMPTS))
}

/// Canonical non-negative integer from a raw big-endian byte string: the
/// value is truncated to the low `bits` bits and the top bit is forced set,
/// so the bit length of the result is exactly `bits`.
pub fn create_positive_number(data: &[u8], bits: usize) -> BigInt {
    assert!(bits > 0, "bits must be positive");
    let mut n = BigInt::from_bytes_be(Sign::Plus, data);
    n &= (BigInt::one() << bits) - 1;
    n | (BigInt::one() << (bits - 1))
}

/// True when `gcd(a, b) == 1`.
pub fn is_coprime(a: &BigInt, b: &BigInt) -> bool {
    a.gcd(b).is_one()
}
