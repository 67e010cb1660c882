use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;
use rand::RngCore;
use thiserror::Error;

use crate::num_theory::{bit_length, generate_random_prime, mod_inverse};
use crate::priv_key::PrivateKey;
use crate::pub_key::PublicKey;

/// Smallest key the signature identity tolerates: `n^2` must stay wider than
/// the 256-bit message digest.
const MIN_KEY_BITS: usize = 160;

/// Retry ceiling for the modulus-width loop. Two fresh half-width primes
/// land on the exact target width after a couple of draws.
const MAX_MODULUS_ATTEMPTS: usize = 128;

#[derive(Error, Debug)]
pub enum KeyGenError {
    #[error("key must be at least 160 bits: got {0}")]
    KeyTooSmall(usize),
    #[error("prime generation failed: {0}")]
    PrimeGeneration(String),
    #[error("key generation failed to converge after {0} attempts")]
    GenerationExhausted(usize),
    #[error("cryptographic operation failed: {0}")]
    CryptoError(String),
}

/// Generate a Paillier key pair with a modulus of exactly `bits` bits.
///
/// Two independent primes of `bits / 2` bits are drawn, resampling on an
/// accidental collision or on a product whose width misses the target.
/// `gcd(p*q, (p-1)(q-1)) = 1` is assured by the primes having equal length.
pub fn generate_key_pair(
    bits: usize,
    rng: &mut impl RngCore,
) -> Result<(PublicKey, PrivateKey), KeyGenError> {
    if bits < MIN_KEY_BITS {
        return Err(KeyGenError::KeyTooSmall(bits));
    }

    for _ in 0..MAX_MODULUS_ATTEMPTS {
        let p = generate_random_prime(bits / 2, rng)
            .map_err(|e| KeyGenError::PrimeGeneration(e.to_string()))?;
        let q = generate_random_prime(bits / 2, rng)
            .map_err(|e| KeyGenError::PrimeGeneration(e.to_string()))?;
        if p == q {
            continue;
        }
        let n = &p * &q;
        if bit_length(&n) as usize != bits {
            continue;
        }

        // Carmichael's function lambda = lcm(p - 1, q - 1)
        let p1 = &p - BigInt::one();
        let q1 = &q - BigInt::one();
        let lambda = (&p1 * &q1) / p1.gcd(&q1);

        // g = n + 1 has order n in Z*_{n^2}, which collapses
        // L(g^lambda mod n^2) to lambda mod n
        let g = &n + BigInt::one();
        let n_squared = &n * &n;
        let u = g.modpow(&lambda, &n_squared);
        let l = (u - BigInt::one()) / &n;
        let mu = mod_inverse(&l, &n).map_err(|e| KeyGenError::CryptoError(e.to_string()))?;

        return Ok((PublicKey::new(n, g), PrivateKey::new(lambda, mu)));
    }
    Err(KeyGenError::GenerationExhausted(MAX_MODULUS_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num_theory::positive_mod;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_key_generation_hits_exact_modulus_width() {
        let mut rng = StdRng::seed_from_u64(41);
        for bits in [160, 256, 512] {
            let (pk, sk) = generate_key_pair(bits, &mut rng).unwrap();
            assert_eq!(bit_length(&pk.n) as usize, bits);
            assert_eq!(pk.g, &pk.n + BigInt::one());
            assert_eq!(pk.n_squared, &pk.n * &pk.n);
            assert!(!sk.lambda.is_zero());
            assert!(!sk.mu.is_zero());
        }
    }

    #[test]
    fn test_key_generation_rejects_small_keys() {
        let mut rng = StdRng::seed_from_u64(42);
        for bits in [0, 64, 159] {
            assert!(matches!(
                generate_key_pair(bits, &mut rng),
                Err(KeyGenError::KeyTooSmall(_))
            ));
        }
    }

    #[test]
    fn test_mu_inverts_lambda_mod_n() {
        let mut rng = StdRng::seed_from_u64(43);
        let (pk, sk) = generate_key_pair(160, &mut rng).unwrap();
        // with g = n + 1, L(g^lambda mod n^2) is lambda mod n
        let product = positive_mod(&(&sk.lambda * &sk.mu), &pk.n);
        assert!(product.is_one());
    }
}
