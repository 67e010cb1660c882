//! Additive vote tallying on the Paillier cryptosystem.
//!
//! Based on:
//! [Paillier, 1999](https://www.cs.tau.ac.il/~fiat/crypt07/papers/Pai99pai.pdf)
//! and the disjunctive plaintext-membership proof described in
//! [Paillier Zero Knowledge Proof](https://paillier.daylightingsociety.org/Paillier_Zero_Knowledge_Proof.pdf).
//!
//! Voters encode a ballot into disjoint bit fields of one integer, encrypt it,
//! and prove in zero knowledge that the ciphertext encodes one of the legal
//! single-choice encodings. A tallier multiplies verified ciphertexts together
//! and decrypts only the final sum, which decodes back into per-choice counts.
//!
//! # Example
//! ```
//! use num_bigint::BigInt;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use paillier_voting::{generate_key_pair, vote_encoder};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let (pk, sk) = generate_key_pair(256, &mut rng).unwrap();
//!
//! // three candidates, one bin, 8-bit tally fields
//! let valid = vote_encoder::single_choice_permutations(3, 1, 8).unwrap();
//!
//! let mut tally = pk.encrypt(&BigInt::from(0u32), &mut rng).unwrap().0;
//! for &choice in &[2usize, 0, 2] {
//!     let ballot = vote_encoder::encode(choice, 3, 8).unwrap();
//!     let (cipher, proof) = pk.encrypt_with_proof(&ballot, &valid, &mut rng).unwrap();
//!     assert!(proof.verify(&cipher, &valid, &pk).unwrap());
//!     tally = pk.add_encrypted(&tally, &cipher);
//! }
//!
//! let sum = sk.decrypt(&tally, &pk).unwrap();
//! let counts = vote_encoder::decode(&sum, 3, 8).unwrap();
//! assert_eq!(counts, vec![1, 0, 2]);
//! ```

pub mod hashing;
pub mod keygen;
pub mod num_theory;
pub mod priv_key;
pub mod pub_key;
pub mod signature;
pub mod vote_encoder;
pub mod zk_proof;

pub use keygen::generate_key_pair;
pub use priv_key::PrivateKey;
pub use pub_key::PublicKey;
pub use signature::Signature;
pub use zk_proof::ZkpCommitment;
