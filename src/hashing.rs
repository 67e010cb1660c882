use num_bigint::BigInt;
use sha2::{Digest, Sha256};

use crate::num_theory::create_positive_number;

/// Width of the integer the bridge produces, equal to the SHA-256 output.
pub const HASH_BITS: usize = 256;

/// Raw SHA-256 digest of a byte string.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Deterministic map from a byte string to a 256-bit non-negative integer.
pub fn sha256_to_int(data: &[u8]) -> BigInt {
    create_positive_number(&sha256_bytes(data), HASH_BITS)
}

/// Hash of a single integer's big-endian magnitude.
pub fn sha256_int(n: &BigInt) -> BigInt {
    sha256_to_int(&n.to_bytes_be().1)
}

/// Hash of the concatenated big-endian magnitudes of a list of integers.
/// Both prover and verifier derive Fiat-Shamir challenges through this
/// function, so it must stay salt-free and stable across runs.
pub fn sha256_ints(args: &[BigInt]) -> BigInt {
    let mut buffer: Vec<u8> = Vec::new();
    for arg in args {
        buffer.extend_from_slice(&arg.to_bytes_be().1);
    }
    sha256_to_int(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num_theory::bit_length;
    use hex_literal::hex;

    #[test]
    fn test_sha256_bytes_known_vectors() {
        assert_eq!(
            sha256_bytes(b"The quick brown fox jumps over the lazy dog"),
            hex!("d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592")
        );
        assert_eq!(
            sha256_bytes(&[0x01, 0x02, 0x03]),
            hex!("039058c6f2c0cb492c533b0a4d14ef77cc0f78abccced5287d84a1a2011cfb81")
        );
        assert_eq!(
            sha256_bytes(b"Hello World!"),
            hex!("7f83b1657ff1fc53b92dc18148a1d65dfc2d4b1fa3d677284addd200126d9069")
        );
    }

    #[test]
    fn test_sha256_int_is_256_bits() {
        for i in 1u32..50 {
            let n = BigInt::from(i) << i;
            let h = sha256_int(&n);
            assert_eq!(bit_length(&h) as usize, HASH_BITS);
        }
    }

    #[test]
    fn test_sha256_int_deterministic() {
        let n = BigInt::from(123456789u64);
        assert_eq!(sha256_int(&n), sha256_int(&n));
        assert_ne!(sha256_int(&n), sha256_int(&BigInt::from(123456790u64)));
    }

    #[test]
    fn test_sha256_ints_single_matches_int() {
        let n = BigInt::from(987654321u64);
        assert_eq!(sha256_ints(&[n.clone()]), sha256_int(&n));
    }

    #[test]
    fn test_sha256_ints_order_sensitive() {
        let a: BigInt = BigInt::from(2u32) << 64;
        let b: BigInt = BigInt::from(3u32) << 64;
        assert_ne!(
            sha256_ints(&[a.clone(), b.clone()]),
            sha256_ints(&[b, a])
        );
    }
}
