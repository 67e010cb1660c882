use num_bigint::{BigInt, Sign};

use crate::hashing::sha256_int;
use crate::pub_key::PublicKey;

/// Paillier signature over a plaintext integer, bound to the message through
/// the hash bridge. An integrity layer orthogonal to encryption: it signs a
/// plaintext, not a ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub s1: BigInt,
    pub s2: BigInt,
}

impl Signature {
    pub fn new(s1: BigInt, s2: BigInt) -> Self {
        Signature { s1, s2 }
    }

    /// Check `g^s1 * s2^n mod n^2 == h(m)`. A `false` result is the routine
    /// "reject this message" outcome, not a fault; malformed components with
    /// negative sign also verify as `false`.
    pub fn verify(&self, m: &BigInt, pk: &PublicKey) -> bool {
        if self.s1.sign() == Sign::Minus || self.s2.sign() == Sign::Minus {
            return false;
        }
        let h = sha256_int(m);
        let g_s1 = pk.g.modpow(&self.s1, &pk.n_squared);
        let s2_n = self.s2.modpow(&pk.n, &pk.n_squared);
        (g_s1 * s2_n) % &pk.n_squared == h
    }
}
