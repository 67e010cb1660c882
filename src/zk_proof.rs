use num_bigint::{BigInt, Sign};
use num_traits::One;
use rand::RngCore;
use thiserror::Error;

use crate::hashing::{sha256_ints, HASH_BITS};
use crate::num_theory::{bit_length, generate_coprime, generate_random, mod_inverse, positive_mod};
use crate::pub_key::PublicKey;

#[derive(Error, Debug)]
pub enum ZkpError {
    #[error("message is not in the list of valid messages")]
    MessageNotInValidSet,
    #[error("commitment shape does not match the valid message list: expected {0}, got {1}")]
    ShapeMismatch(usize, usize),
    #[error("encryption failed: {0}")]
    Encryption(String),
    #[error("randomizer generation failed: {0}")]
    RandomizerGeneration(String),
    #[error("arithmetic failure: {0}")]
    Arithmetic(String),
}

/// Non-interactive disjunctive proof that a ciphertext encrypts one of an
/// ordered list of admissible plaintexts, without revealing which index.
///
/// The three sequences share the valid-set's order: `a[i]` is the commitment
/// for candidate `i`, `e[i]` its challenge share, `z[i]` its response. The
/// verification predicate ties the shares together through the Fiat-Shamir
/// hash of `a`: `sum(e) mod 2^256 == sha256(a)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZkpCommitment {
    pub a: Vec<BigInt>,
    pub e: Vec<BigInt>,
    pub z: Vec<BigInt>,
}

impl ZkpCommitment {
    /// Build a proof that `c` encrypts `m` with randomizer `r`, where `m`
    /// occurs in `valid`. Every index other than the true one gets a
    /// simulated transcript from a freely chosen challenge share; the true
    /// index's share is pinned afterwards by the global challenge, which is
    /// where knowledge of `r` enters.
    pub fn create(
        m: &BigInt,
        c: &BigInt,
        r: &BigInt,
        valid: &[BigInt],
        pk: &PublicKey,
        rng: &mut impl RngCore,
    ) -> Result<Self, ZkpError> {
        let true_index = valid
            .iter()
            .position(|mi| mi == m)
            .ok_or(ZkpError::MessageNotInValidSet)?;

        // Choose random omega in Z*_n
        let omega = pk
            .generate_randomizer(rng)
            .map_err(|e| ZkpError::RandomizerGeneration(e.to_string()))?;

        let n_squared = &pk.n_squared;
        let randomizer_bits = bit_length(&pk.n) as usize - 1;
        // Challenge shares stay shorter than p and q so that a cheating
        // prover cannot balance the global challenge across two indices.
        let share_bits = bit_length(&pk.n) as usize / 2 - 1;

        let count = valid.len();
        let mut a: Vec<BigInt> = Vec::with_capacity(count);
        let mut e: Vec<Option<BigInt>> = vec![None; count];
        let mut z: Vec<Option<BigInt>> = vec![None; count];

        for (i, mi) in valid.iter().enumerate() {
            if i == true_index {
                // a[k] = omega^n mod n^2; challenge and response deferred
                a.push(omega.modpow(&pk.n, n_squared));
                continue;
            }

            // u[i] = c / g^m[i] mod n^2
            let g_mi = pk.g.modpow(mi, n_squared);
            let inv_g_mi = mod_inverse(&g_mi, n_squared)
                .map_err(|e| ZkpError::Arithmetic(e.to_string()))?;
            let u_i = (c * inv_g_mi) % n_squared;

            let e_i = generate_random(share_bits, rng)
                .map_err(|e| ZkpError::RandomizerGeneration(e.to_string()))?;
            let z_i = generate_coprime(&pk.n, randomizer_bits, rng)
                .map_err(|e| ZkpError::RandomizerGeneration(e.to_string()))?;

            // a[i] = z[i]^n / u[i]^e[i] mod n^2
            let z_n = z_i.modpow(&pk.n, n_squared);
            let u_e = u_i.modpow(&e_i, n_squared);
            let inv_u_e =
                mod_inverse(&u_e, n_squared).map_err(|e| ZkpError::Arithmetic(e.to_string()))?;
            a.push((z_n * inv_u_e) % n_squared);

            e[i] = Some(e_i);
            z[i] = Some(z_i);
        }

        // Non-interactive challenge over the full commitment list
        let challenge = sha256_ints(&a);
        let hash_mod = BigInt::one() << HASH_BITS;

        // e[k] = challenge - sum(e[i]) mod 2^256
        let share_sum = e.iter().flatten().sum::<BigInt>() % &hash_mod;
        let e_k = positive_mod(&(challenge - share_sum), &hash_mod);
        // z[k] = omega * r^e[k] mod n
        let z_k = (omega * r.modpow(&e_k, &pk.n)) % &pk.n;
        e[true_index] = Some(e_k);
        z[true_index] = Some(z_k);

        Ok(ZkpCommitment {
            a,
            e: e.into_iter().flatten().collect(),
            z: z.into_iter().flatten().collect(),
        })
    }

    /// Check the proof against a ciphertext and the same ordered valid-set
    /// the prover used. `Ok(false)` is the routine "reject this ballot"
    /// outcome; only a commitment whose shape cannot belong to the valid-set
    /// is an error.
    pub fn verify(
        &self,
        c: &BigInt,
        valid: &[BigInt],
        pk: &PublicKey,
    ) -> Result<bool, ZkpError> {
        let count = valid.len();
        if self.a.len() != count || self.e.len() != count || self.z.len() != count {
            return Err(ZkpError::ShapeMismatch(
                count,
                self.a.len().min(self.e.len()).min(self.z.len()),
            ));
        }
        // Negative shares cannot come from an honest prover
        if self.e.iter().any(|e_i| e_i.sign() == Sign::Minus) {
            return Ok(false);
        }

        // sum(e) must reproduce the Fiat-Shamir challenge
        let challenge = sha256_ints(&self.a);
        let hash_mod = BigInt::one() << HASH_BITS;
        let share_sum = self.e.iter().sum::<BigInt>() % &hash_mod;
        if share_sum != challenge {
            return Ok(false);
        }

        let n_squared = &pk.n_squared;
        for (i, mi) in valid.iter().enumerate() {
            // u[i] = c / g^m[i] mod n^2
            let g_mi = pk.g.modpow(mi, n_squared);
            let inv_g_mi = mod_inverse(&g_mi, n_squared)
                .map_err(|e| ZkpError::Arithmetic(e.to_string()))?;
            let u_i = (c * inv_g_mi) % n_squared;

            // z[i]^n = a[i] * u[i]^e[i] mod n^2
            let z_n = self.z[i].modpow(&pk.n, n_squared);
            let u_e = u_i.modpow(&self.e[i], n_squared);
            if z_n != positive_mod(&(&self.a[i] * u_e), n_squared) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::generate_key_pair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ints(values: &[u32]) -> Vec<BigInt> {
        values.iter().map(|&v| BigInt::from(v)).collect()
    }

    fn pow2(exp: u32) -> BigInt {
        BigInt::one() << exp
    }

    #[test]
    fn test_zkp_accepts_honest_prover() {
        let mut rng = StdRng::seed_from_u64(51);
        let cases: Vec<(usize, BigInt, Vec<BigInt>)> = vec![
            (256, BigInt::from(0u32), ints(&[0, 1, 2, 3])),
            (256, BigInt::from(1u32), ints(&[1, 2, 3])),
            (256, pow2(255), vec![pow2(16), pow2(64), pow2(255)]),
            (512, pow2(300), vec![pow2(100), pow2(200), pow2(300)]),
        ];
        for (key_size, m, valid) in cases {
            let (pk, _) = generate_key_pair(key_size, &mut rng).unwrap();
            let (c, commitment) = pk.encrypt_with_proof(&m, &valid, &mut rng).unwrap();
            assert!(commitment.verify(&c, &valid, &pk).unwrap());
        }
    }

    #[test]
    fn test_zkp_rejects_mismatched_ciphertext() {
        let mut rng = StdRng::seed_from_u64(52);
        let cases: Vec<(BigInt, BigInt, Vec<BigInt>)> = vec![
            (BigInt::from(1u32), BigInt::from(1u32), ints(&[1, 2, 3])),
            (BigInt::from(1u32), BigInt::from(4u32), ints(&[1, 2, 3])),
            (
                pow2(128),
                pow2(129),
                vec![pow2(16), pow2(128), pow2(255)],
            ),
        ];
        for (m, cheat_m, valid) in cases {
            let (pk, _) = generate_key_pair(256, &mut rng).unwrap();
            let (_, commitment) = pk.encrypt_with_proof(&m, &valid, &mut rng).unwrap();
            // a fresh encryption never matches the committed transcript,
            // even when it encrypts the same plaintext
            let (cheat_c, _) = pk.encrypt(&cheat_m, &mut rng).unwrap();
            assert!(!commitment.verify(&cheat_c, &valid, &pk).unwrap());
        }
    }

    #[test]
    fn test_zkp_rejects_message_outside_valid_set() {
        let mut rng = StdRng::seed_from_u64(53);
        let (pk, _) = generate_key_pair(256, &mut rng).unwrap();
        let valid = ints(&[1, 2, 3]);
        let result = pk.encrypt_with_proof(&BigInt::from(4u32), &valid, &mut rng);
        assert!(matches!(result, Err(ZkpError::MessageNotInValidSet)));
    }

    #[test]
    fn test_zkp_rejects_tampered_commitment() {
        let mut rng = StdRng::seed_from_u64(54);
        let (pk, _) = generate_key_pair(256, &mut rng).unwrap();
        let valid = ints(&[0, 1, 2, 3]);
        let (c, commitment) = pk
            .encrypt_with_proof(&BigInt::from(2u32), &valid, &mut rng)
            .unwrap();

        let mut tampered = commitment.clone();
        tampered.a[0] = &tampered.a[0] + 1u32;
        assert!(!tampered.verify(&c, &valid, &pk).unwrap());

        let mut tampered = commitment.clone();
        tampered.e[1] = &tampered.e[1] + 1u32;
        assert!(!tampered.verify(&c, &valid, &pk).unwrap());

        let mut tampered = commitment;
        tampered.e[2] = -tampered.e[2].clone();
        assert!(!tampered.verify(&c, &valid, &pk).unwrap());
    }

    #[test]
    fn test_zkp_rejects_commitment_with_wrong_shape() {
        let mut rng = StdRng::seed_from_u64(55);
        let (pk, _) = generate_key_pair(256, &mut rng).unwrap();
        let valid = ints(&[0, 1, 2]);
        let (c, commitment) = pk
            .encrypt_with_proof(&BigInt::from(1u32), &valid, &mut rng)
            .unwrap();

        let mut truncated = commitment.clone();
        truncated.z.pop();
        assert!(matches!(
            truncated.verify(&c, &valid, &pk),
            Err(ZkpError::ShapeMismatch(3, 2))
        ));

        let shorter_set = ints(&[0, 1]);
        assert!(matches!(
            commitment.verify(&c, &shorter_set, &pk),
            Err(ZkpError::ShapeMismatch(2, 3))
        ));
    }

    #[test]
    fn test_commitment_covers_every_candidate() {
        let mut rng = StdRng::seed_from_u64(56);
        let (pk, _) = generate_key_pair(256, &mut rng).unwrap();
        let valid = ints(&[0, 1, 2, 3]);
        let (c, commitment) = pk
            .encrypt_with_proof(&BigInt::from(3u32), &valid, &mut rng)
            .unwrap();
        assert!(commitment.verify(&c, &valid, &pk).unwrap());
        assert_eq!(commitment.a.len(), 4);
        assert_eq!(commitment.e.len(), 4);
        assert_eq!(commitment.z.len(), 4);
    }
}
