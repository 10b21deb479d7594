//! Minimizer selection over both strands with down-weighting of flagged k-mers.

use crate::error::{ErrorKind, Result};
use crate::interface::alphabet::{Alphabet, ComplementableCharacter};
use crate::interface::oracle::MembershipOracle;
use crate::kmer_hash::{KmerHashIterator, ReverseComplementKmerHashIterator};
use crate::minimizer::Minimizer;
use crate::shape::Shape;
use log::debug;

/// The type returned by [weighted_minimizer_hash].
pub type WeightedMinimizerHash<AlphabetType, SourceIterator, Oracle> =
    Minimizer<WeightedStrandHashIterator<AlphabetType, SourceIterator, Oracle>>;

/// An iterator combining the hash sequences of the forward and the reverse-complement strand
/// into one value per position.
///
/// Positions where neither strand's hash value is flagged by the oracle contribute the smaller
/// of the two seed-scrambled values, which is the canonical choice. Positions where either raw
/// hash value is flagged contribute the larger one instead, demoting the k-mer from minimizer
/// candidacy. The oracle is queried with the raw hash values, before seed scrambling, so the
/// weighting is independent of the seed.
#[derive(Clone)]
pub struct WeightedStrandHashIterator<AlphabetType, SourceIterator, Oracle> {
    forward: KmerHashIterator<AlphabetType, SourceIterator>,
    reverse_complement: ReverseComplementKmerHashIterator<AlphabetType, SourceIterator>,
    oracle: Oracle,
    seed: u64,
}

impl<
        AlphabetType: Alphabet,
        SourceIterator: Iterator<Item = AlphabetType::CharacterType> + Clone,
        Oracle: MembershipOracle,
    > WeightedStrandHashIterator<AlphabetType, SourceIterator, Oracle>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    /// Creates the combined strand iterator for the given symbol sequence.
    pub fn new(sequence: SourceIterator, shape: Shape, oracle: Oracle, seed: u64) -> Result<Self> {
        Ok(Self {
            forward: KmerHashIterator::new(sequence.clone(), shape.clone())?,
            reverse_complement: ReverseComplementKmerHashIterator::new(sequence, shape)?,
            oracle,
            seed,
        })
    }
}

impl<
        AlphabetType: Alphabet,
        SourceIterator: Iterator<Item = AlphabetType::CharacterType>,
        Oracle: MembershipOracle,
    > Iterator for WeightedStrandHashIterator<AlphabetType, SourceIterator, Oracle>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let forward_hash = self.forward.next()?;
        let reverse_hash = self.reverse_complement.next()?;
        let scrambled_forward_hash = forward_hash ^ self.seed;
        let scrambled_reverse_hash = reverse_hash ^ self.seed;

        Some(
            if self.oracle.contains(forward_hash) || self.oracle.contains(reverse_hash) {
                scrambled_forward_hash.max(scrambled_reverse_hash)
            } else {
                scrambled_forward_hash.min(scrambled_reverse_hash)
            },
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.forward.size_hint()
    }
}

/// Creates an iterator over the weighted canonical minimizers of the given symbol sequence.
///
/// Per position, the smaller seed-scrambled hash value of the forward and the
/// reverse-complement strand enters the window; if the oracle flags either strand's raw hash
/// value, the larger one enters instead, making the flagged k-mer unlikely to be selected.
/// `window_size` is measured in symbols, so each minimizer window spans
/// `window_size - shape.size() + 1` hash values. The crate-level
/// [DEFAULT_SEED](crate::DEFAULT_SEED) is the recommended seed; a seed of zero selects by plain
/// lexicographic order.
///
/// A k-mer that equals its own reverse complement cannot be down-weighted, since both strands
/// produce the same hash value. This ambiguity is inherent to the weighting scheme.
///
/// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the size of the shape is
/// greater than the window size.
pub fn weighted_minimizer_hash<
    AlphabetType: Alphabet,
    SourceIterator: Iterator<Item = AlphabetType::CharacterType> + Clone,
    Oracle: MembershipOracle,
>(
    sequence: SourceIterator,
    shape: Shape,
    window_size: usize,
    oracle: Oracle,
    seed: u64,
) -> Result<WeightedMinimizerHash<AlphabetType, SourceIterator, Oracle>>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    if shape.size() > window_size {
        return Err(ErrorKind::InvalidArgument(format!(
            "the size of the shape ({}) cannot be greater than the window size ({})",
            shape.size(),
            window_size
        ))
        .into());
    }

    let values_per_window = window_size - shape.size() + 1;
    debug!(
        "selecting weighted minimizers with shape {} over windows of {} symbols ({} hash values)",
        shape, window_size, values_per_window
    );

    let combined = WeightedStrandHashIterator::new(sequence, shape, oracle, seed)?;
    Ok(Minimizer::new_unchecked(combined, values_per_window))
}
