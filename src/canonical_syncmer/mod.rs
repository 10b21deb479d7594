//! Syncmer selection over canonical k-mer hashes, i.e. the strand-minimal hash value per
//! position.

use crate::error::{ErrorKind, Result};
use crate::interface::alphabet::{Alphabet, ComplementableCharacter};
use crate::kmer_hash::{
    KmerHashIterator, ReverseComplementKmerHashIterator, SeededHashIterator,
};
use crate::shape::Shape;
use crate::syncmer::Syncmer;
use log::debug;

/// The type returned by [canonical_syncmer_hash].
pub type CanonicalSyncmerHash<AlphabetType, SourceIterator> = Syncmer<
    CanonicalKmerHashIterator<AlphabetType, SourceIterator>,
    SeededHashIterator<KmerHashIterator<AlphabetType, SourceIterator>>,
    SeededHashIterator<ReverseComplementKmerHashIterator<AlphabetType, SourceIterator>>,
>;

/// An iterator over the canonical k-mer hash values of a symbol sequence: per window position,
/// the smaller of the seed-scrambled forward and reverse-complement hash values.
#[derive(Clone)]
pub struct CanonicalKmerHashIterator<AlphabetType, SourceIterator> {
    forward: KmerHashIterator<AlphabetType, SourceIterator>,
    reverse_complement: ReverseComplementKmerHashIterator<AlphabetType, SourceIterator>,
    seed: u64,
}

impl<
        AlphabetType: Alphabet,
        SourceIterator: Iterator<Item = AlphabetType::CharacterType> + Clone,
    > CanonicalKmerHashIterator<AlphabetType, SourceIterator>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    /// Creates an iterator over the canonical hash values of all windows of the given shape in
    /// the given symbol sequence.
    pub fn new(sequence: SourceIterator, shape: Shape, seed: u64) -> Result<Self> {
        Ok(Self {
            forward: KmerHashIterator::new(sequence.clone(), shape.clone())?,
            reverse_complement: ReverseComplementKmerHashIterator::new(sequence, shape)?,
            seed,
        })
    }
}

impl<AlphabetType: Alphabet, SourceIterator: Iterator<Item = AlphabetType::CharacterType>> Iterator
    for CanonicalKmerHashIterator<AlphabetType, SourceIterator>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let forward_hash = self.forward.next()? ^ self.seed;
        let reverse_hash = self.reverse_complement.next()? ^ self.seed;
        Some(forward_hash.min(reverse_hash))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.forward.size_hint()
    }
}

impl<AlphabetType: Alphabet, SourceIterator> ExactSizeIterator
    for CanonicalKmerHashIterator<AlphabetType, SourceIterator>
where
    SourceIterator: ExactSizeIterator<Item = AlphabetType::CharacterType>,
    AlphabetType::CharacterType: ComplementableCharacter,
{
}

/// Creates an iterator over the canonical syncmers of the given symbol sequence.
///
/// Four hash sequences are derived from the sequence and scrambled with the seed: forward and
/// reverse-complement k-mers, and forward and reverse-complement s-mers. The k-mer sequences are
/// combined into their per-position minimum, and a canonical k-mer is selected iff the minimal
/// s-mer of either strand sits at `submer_offset`, read from the respective strand's own
/// direction. The crate-level [DEFAULT_SEED](crate::DEFAULT_SEED) is the recommended seed; a
/// seed of zero selects by plain lexicographic order.
///
/// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the size of the k-mer shape
/// is smaller than the size of the s-mer shape.
pub fn canonical_syncmer_hash<
    AlphabetType: Alphabet,
    SourceIterator: Iterator<Item = AlphabetType::CharacterType> + Clone,
>(
    sequence: SourceIterator,
    kmer_shape: Shape,
    smer_shape: Shape,
    submer_offset: usize,
    seed: u64,
) -> Result<CanonicalSyncmerHash<AlphabetType, SourceIterator>>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    if kmer_shape.size() < smer_shape.size() {
        return Err(ErrorKind::InvalidArgument(format!(
            "the size of the k-mer shape ({}) cannot be smaller than the size of the s-mer shape ({})",
            kmer_shape.size(),
            smer_shape.size()
        ))
        .into());
    }

    let window_size = kmer_shape.size() - smer_shape.size();
    debug!(
        "selecting canonical syncmers with k-mer shape {} and s-mer shape {} at submer offset {}",
        kmer_shape, smer_shape, submer_offset
    );

    let canonical_kmer_hashes =
        CanonicalKmerHashIterator::new(sequence.clone(), kmer_shape, seed)?;
    let smer_hashes = SeededHashIterator::new(
        KmerHashIterator::new(sequence.clone(), smer_shape.clone())?,
        seed,
    );
    let reverse_smer_hashes = SeededHashIterator::new(
        ReverseComplementKmerHashIterator::new(sequence, smer_shape)?,
        seed,
    );

    Syncmer::with_reverse_complement(
        canonical_kmer_hashes,
        smer_hashes,
        reverse_smer_hashes,
        window_size,
        submer_offset,
    )
}

#[cfg(test)]
mod tests {
    use crate::canonical_syncmer::canonical_syncmer_hash;
    use crate::error::ErrorKind;
    use crate::interface::alphabet::dna_alphabet::{DnaAlphabet, DnaCharacter};
    use crate::interface::alphabet::{Alphabet, ComplementableCharacter};
    use crate::shape::Shape;
    use crate::DEFAULT_SEED;
    use bitvec::bitvec;
    use bitvec::order::Lsb0;

    fn dna(sequence: &[u8]) -> Vec<DnaCharacter> {
        DnaAlphabet::characters_from_slice(sequence).unwrap()
    }

    fn canonical_syncmers(
        sequence: &[DnaCharacter],
        kmer_shape: Shape,
        smer_shape: Shape,
        submer_offset: usize,
        seed: u64,
    ) -> Vec<u64> {
        canonical_syncmer_hash::<DnaAlphabet, _>(
            sequence.iter().cloned(),
            kmer_shape,
            smer_shape,
            submer_offset,
            seed,
        )
        .unwrap()
        .collect()
    }

    #[test]
    fn test_canonical_syncmers() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        // ACGGC, cgccg, CGACG, cgtcg, acgtt, aacgt, GTTTA, lowercase for reverse complements.
        assert_eq!(
            canonical_syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(3).unwrap(),
                0,
                0
            ),
            vec![105, 406, 390, 109, 27, 6, 764]
        );
    }

    #[test]
    fn test_canonical_syncmers_with_gapped_smers() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        assert_eq!(
            canonical_syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::new(bitvec![1, 0, 1]).unwrap(),
                0,
                0
            ),
            vec![105, 406, 390, 109, 27, 6, 764]
        );
    }

    #[test]
    fn test_canonical_syncmers_of_short_smers() {
        let sequence = dna(b"GGCAAGT");
        // cttgc, acttg
        assert_eq!(
            canonical_syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(2).unwrap(),
                0,
                0
            ),
            vec![505, 126]
        );
    }

    #[test]
    fn test_output_is_strand_symmetric() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        let reverse_complement_sequence: Vec<_> = sequence
            .iter()
            .rev()
            .map(ComplementableCharacter::complement)
            .collect();

        let forward = canonical_syncmers(
            &sequence,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            0,
            0,
        );
        let mut backward = canonical_syncmers(
            &reverse_complement_sequence,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            0,
            0,
        );
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_constant_input_is_emitted_once() {
        let sequence = dna(b"AAAAAAAAAAAAAAAAAAA");
        assert_eq!(
            canonical_syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(2).unwrap(),
                0,
                DEFAULT_SEED
            ),
            vec![0x8F3F73B5CF1C9921]
        );
    }

    #[test]
    fn test_short_input_yields_no_syncmers() {
        let sequence = dna(b"AC");
        assert!(canonical_syncmers(
            &sequence,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            0,
            0
        )
        .is_empty());
    }

    #[test]
    fn test_truncated_input_yields_prefix_of_syncmers() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        let truncated: Vec<_> = sequence
            .iter()
            .cloned()
            .take_while(|character| u8::from(*character) != b'T')
            .collect();

        let full = canonical_syncmers(
            &sequence,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            0,
            0,
        );
        let prefix = canonical_syncmers(
            &truncated,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            0,
            0,
        );
        assert_eq!(prefix, vec![105, 406, 390]);
        assert_eq!(prefix, full[..prefix.len()]);
    }

    #[test]
    fn test_smer_shape_bigger_than_kmer_shape_is_rejected() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        let error = canonical_syncmer_hash::<DnaAlphabet, _>(
            sequence.iter().cloned(),
            Shape::ungapped(3).unwrap(),
            Shape::ungapped(5).unwrap(),
            0,
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(error.kind(), ErrorKind::InvalidArgument(_)));
    }
}
