use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use thiserror::Error;
use zeroize::Zeroize;

use crate::hashing::sha256_int;
use crate::num_theory::mod_inverse;
use crate::pub_key::PublicKey;
use crate::signature::Signature;

#[derive(Error, Debug)]
pub enum PrivKeyError {
    #[error("ciphertext must be less than n^2")]
    CiphertextOutOfRange,
    #[error("signature generation failed: {0}")]
    SignatureGeneration(String),
}

/// Paillier private key: the Carmichael value `lambda = lcm(p-1, q-1)` and
/// `mu = L(g^lambda mod n^2)^-1 mod n`. Owned exclusively by the decrypting
/// authority; zeroized on drop.
#[derive(Debug, Clone)]
pub struct PrivateKey {
    pub lambda: BigInt,
    pub mu: BigInt,
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.lambda = BigInt::zero();
        self.mu = BigInt::zero();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PrivateKey {
    pub fn new(lambda: BigInt, mu: BigInt) -> Self {
        PrivateKey { lambda, mu }
    }

    /// Retrieve the plaintext: `m = L(c^lambda mod n^2) * mu mod n` where
    /// `L(u) = (u - 1) / n`.
    pub fn decrypt(&self, c: &BigInt, pk: &PublicKey) -> Result<BigInt, PrivKeyError> {
        if c.sign() == Sign::Minus || c >= &pk.n_squared {
            return Err(PrivKeyError::CiphertextOutOfRange);
        }
        let u = c.modpow(&self.lambda, &pk.n_squared);
        let l = (u - BigInt::one()) / &pk.n;
        Ok((l * &self.mu) % &pk.n)
    }

    /// Sign the hash of `m`:
    /// `s1 = L(h^lambda mod n^2) * mu mod n` and
    /// `s2 = (h * g^-s1)^(n^-1 mod lambda) mod n`.
    /// Relies on `g = n + 1`, the same shortcut key generation fixes.
    pub fn sign(&self, m: &BigInt, pk: &PublicKey) -> Result<Signature, PrivKeyError> {
        let h = sha256_int(m);

        let s1_num = (h.modpow(&self.lambda, &pk.n_squared) - BigInt::one()) / &pk.n;
        let s1 = (s1_num * &self.mu) % &pk.n;

        let inv_n = mod_inverse(&pk.n, &self.lambda)
            .map_err(|e| PrivKeyError::SignatureGeneration(e.to_string()))?;
        let g_s1 = pk.g.modpow(&s1, &pk.n);
        let inv_g = mod_inverse(&g_s1, &pk.n)
            .map_err(|e| PrivKeyError::SignatureGeneration(e.to_string()))?;
        let s2 = (h * inv_g).modpow(&inv_n, &pk.n);

        Ok(Signature::new(s1, s2))
    }
}
