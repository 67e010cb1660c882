use num_bigint::{BigInt, Sign};
use rand::RngCore;
use thiserror::Error;

use crate::num_theory::{bit_length, generate_coprime};
use crate::zk_proof::{ZkpCommitment, ZkpError};

#[derive(Error, Debug)]
pub enum PubKeyError {
    #[error("plaintext must be less than modulus n")]
    PlaintextOutOfRange,
    #[error("randomizer generation failed: {0}")]
    RandomizerGeneration(String),
}

/// Paillier public key. Immutable once generated and shared by every party
/// that encrypts, verifies signatures, or verifies proofs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigInt,
    pub n_squared: BigInt,
    pub g: BigInt,
}

impl PublicKey {
    pub fn new(n: BigInt, g: BigInt) -> Self {
        let n_squared = &n * &n;
        PublicKey { n, n_squared, g }
    }

    /// Encrypt `m` with a fresh randomizer, returning `(ciphertext, r)`.
    /// The randomizer is sampled coprime to `n` with bit length one below
    /// the modulus, so it already lies in `Z*_n`.
    pub fn encrypt(
        &self,
        m: &BigInt,
        rng: &mut impl RngCore,
    ) -> Result<(BigInt, BigInt), PubKeyError> {
        let r = self.generate_randomizer(rng)?;
        let c = self.encrypt_fixed(m, &r)?;
        Ok((c, r))
    }

    /// Encrypt `m` with the caller-supplied randomizer `r`. Deterministic
    /// given `r`: `c = g^m * r^n mod n^2`, with `g = n + 1` collapsing the
    /// first factor to `n*m + 1 mod n^2`.
    pub fn encrypt_fixed(&self, m: &BigInt, r: &BigInt) -> Result<BigInt, PubKeyError> {
        if m.sign() == Sign::Minus || m >= &self.n {
            return Err(PubKeyError::PlaintextOutOfRange);
        }
        let gm = (&self.n * m + 1u32) % &self.n_squared;
        let rn = r.modpow(&self.n, &self.n_squared);
        Ok((gm * rn) % &self.n_squared)
    }

    /// Encrypt `m` and attach a disjunctive proof that the ciphertext
    /// encodes one of the `valid` plaintexts.
    pub fn encrypt_with_proof(
        &self,
        m: &BigInt,
        valid: &[BigInt],
        rng: &mut impl RngCore,
    ) -> Result<(BigInt, ZkpCommitment), ZkpError> {
        let (c, r) = self
            .encrypt(m, rng)
            .map_err(|e| ZkpError::Encryption(e.to_string()))?;
        let commitment = ZkpCommitment::create(m, &c, &r, valid, self, rng)?;
        Ok((c, commitment))
    }

    /// d(e(m1) * e(m2) mod n^2) = m1 + m2 mod n
    pub fn add_encrypted(&self, c1: &BigInt, c2: &BigInt) -> BigInt {
        (c1 * c2) % &self.n_squared
    }

    /// d(e(m) * g^k mod n^2) = m + k mod n
    pub fn add_scalar(&self, c: &BigInt, k: &BigInt) -> BigInt {
        (c * self.g.modpow(k, &self.n_squared)) % &self.n_squared
    }

    /// d(e(m)^k mod n^2) = k * m mod n
    pub fn mul_scalar(&self, c: &BigInt, k: &BigInt) -> BigInt {
        c.modpow(k, &self.n_squared)
    }

    /// Fresh randomizer in `Z*_n`. The bit length keeps the sample below
    /// `n`; the re-loop is a precaution and should never trigger.
    pub(crate) fn generate_randomizer(
        &self,
        rng: &mut impl RngCore,
    ) -> Result<BigInt, PubKeyError> {
        let bits = bit_length(&self.n) as usize - 1;
        loop {
            let r = generate_coprime(&self.n, bits, rng)
                .map_err(|e| PubKeyError::RandomizerGeneration(e.to_string()))?;
            if r < self.n {
                return Ok(r);
            }
        }
    }
}
