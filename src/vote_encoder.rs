use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use thiserror::Error;

/// Widest per-choice field the decoder can hand back through its native
/// `u64` counter cast.
const MAX_FIELD_BITS: usize = 62;

#[derive(Error, Debug)]
pub enum VoteEncoderError {
    #[error("choice index {0} out of range for {1} choices")]
    InvalidChoice(usize, usize),
    #[error("bin index {0} out of range for {1} bins")]
    InvalidBin(usize, usize),
    #[error("bits per choice must be at least 2, got {0}")]
    FieldTooNarrow(usize),
    #[error("bits per choice {0} exceeds the decodable counter width")]
    FieldTooWide(usize),
    #[error("at least two choices and one bin are required")]
    InvalidBallotShape,
}

fn check_field_width(bits_per_choice: usize) -> Result<(), VoteEncoderError> {
    if bits_per_choice < 2 {
        return Err(VoteEncoderError::FieldTooNarrow(bits_per_choice));
    }
    if bits_per_choice > MAX_FIELD_BITS {
        return Err(VoteEncoderError::FieldTooWide(bits_per_choice));
    }
    Ok(())
}

/// Encode a single choice within one of several independent bins as a sparse
/// integer: one set bit at the start of the field reserved for
/// `(bin, choice)`. Homomorphic summation across many such encodings tallies
/// every field independently as long as per-field counts stay under
/// `2^(bits_per_choice - 1)`, which callers ensure by sizing the field for
/// the expected ballot volume.
pub fn encode_grouped(
    choice: usize,
    num_choices: usize,
    bin: usize,
    num_bins: usize,
    bits_per_choice: usize,
) -> Result<BigInt, VoteEncoderError> {
    if choice >= num_choices {
        return Err(VoteEncoderError::InvalidChoice(choice, num_choices));
    }
    if num_bins > 0 && bin >= num_bins {
        return Err(VoteEncoderError::InvalidBin(bin, num_bins));
    }
    check_field_width(bits_per_choice)?;
    Ok(BigInt::one() << (bits_per_choice * (bin * num_choices + choice)))
}

/// Encode a single choice without grouping.
pub fn encode(
    choice: usize,
    num_choices: usize,
    bits_per_choice: usize,
) -> Result<BigInt, VoteEncoderError> {
    encode_grouped(choice, num_choices, 0, 0, bits_per_choice)
}

/// Encode several choices from one ballot into one bin. Fields never
/// overlap, so the sum carries no information across field boundaries.
pub fn encode_many_grouped(
    choices: &[usize],
    num_choices: usize,
    bin: usize,
    num_bins: usize,
    bits_per_choice: usize,
) -> Result<BigInt, VoteEncoderError> {
    let mut result = BigInt::zero();
    for &choice in choices {
        result += encode_grouped(choice, num_choices, bin, num_bins, bits_per_choice)?;
    }
    Ok(result)
}

/// Encode several choices without grouping.
pub fn encode_many(
    choices: &[usize],
    num_choices: usize,
    bits_per_choice: usize,
) -> Result<BigInt, VoteEncoderError> {
    encode_many_grouped(choices, num_choices, 0, 0, bits_per_choice)
}

fn decode_field(encoded: &BigInt, index: usize, bits_per_choice: usize) -> u64 {
    let mask = BigInt::from((1u64 << (bits_per_choice - 1)) - 1);
    let field = (encoded >> (index * bits_per_choice)) & mask;
    field.to_u64().expect("masked field fits in u64")
}

/// Recover per-choice counts from an aggregated (decrypted) tally.
pub fn decode(
    encoded: &BigInt,
    num_choices: usize,
    bits_per_choice: usize,
) -> Result<Vec<u64>, VoteEncoderError> {
    check_field_width(bits_per_choice)?;
    Ok((0..num_choices)
        .map(|choice| decode_field(encoded, choice, bits_per_choice))
        .collect())
}

/// Recover per-`(bin, choice)` counts, bins as the outer dimension.
pub fn decode_grouped(
    encoded: &BigInt,
    num_choices: usize,
    num_bins: usize,
    bits_per_choice: usize,
) -> Result<Vec<Vec<u64>>, VoteEncoderError> {
    check_field_width(bits_per_choice)?;
    Ok((0..num_bins)
        .map(|bin| {
            (0..num_choices)
                .map(|choice| decode_field(encoded, bin * num_choices + choice, bits_per_choice))
                .collect()
        })
        .collect())
}

/// Total width of the packed field space. Zero bins count as one.
pub fn total_votes_bits(num_choices: usize, num_bins: usize, bits_per_choice: usize) -> u64 {
    if num_choices == 0 || bits_per_choice == 0 {
        return 0;
    }
    let bins = if num_bins == 0 { 1 } else { num_bins };
    (num_choices * bins * bits_per_choice) as u64
}

/// Every legal single-choice encoding across all bins, in bin-major order.
/// This enumeration is the ZKP valid-set for single-choice ballots; its
/// order must be identical between prover and verifier.
pub fn single_choice_permutations(
    num_choices: usize,
    num_bins: usize,
    bits_per_choice: usize,
) -> Result<Vec<BigInt>, VoteEncoderError> {
    if num_choices < 2 || num_bins < 1 {
        return Err(VoteEncoderError::InvalidBallotShape);
    }
    let mut list = Vec::with_capacity(num_choices * num_bins);
    for bin in 0..num_bins {
        for choice in 0..num_choices {
            list.push(encode_grouped(
                choice,
                num_choices,
                bin,
                num_bins,
                bits_per_choice,
            )?);
        }
    }
    Ok(list)
}
