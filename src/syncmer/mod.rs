//! Selection of syncmers: k-mers whose minimal s-mer value sits at a fixed offset of the k-mer
//! window.
//!
//! Compared to minimizers, this decides for each k-mer in isolation whether it is selected, which
//! stabilizes the selection under repeats (robust winnowing): shifting the window cannot move the
//! selection away from a k-mer unless the k-mer itself leaves the window.

use crate::error::{ErrorKind, Result};
use std::collections::VecDeque;
use std::iter::Empty;

/// The sliding window over one s-mer hash sequence, tracking its minimal value.
///
/// The stored values are necessary because a shift can evict the current minimum.
#[derive(Clone)]
struct SmerWindow<SourceIterator> {
    source: SourceIterator,
    values: VecDeque<u64>,
    minimum: u64,
}

impl<SourceIterator: Iterator<Item = u64>> SmerWindow<SourceIterator> {
    fn new(source: SourceIterator) -> Self {
        Self {
            source,
            values: VecDeque::new(),
            minimum: 0,
        }
    }

    /// Fills the window up to the given length, returning `None` if the source is too short.
    fn prime(&mut self, window_length: usize) -> Option<()> {
        while self.values.len() < window_length {
            self.values.push_back(self.source.next()?);
        }
        self.minimum = *self
            .values
            .iter()
            .min()
            .expect("the window contains at least one value");
        Some(())
    }

    /// Evicts the oldest value and pushes the next one, updating the tracked minimum.
    fn shift(&mut self) -> Option<()> {
        let new_value = self.source.next()?;
        let evicted_value = self
            .values
            .pop_front()
            .expect("the window is full after priming");
        self.values.push_back(new_value);

        if evicted_value == self.minimum {
            // The minimum may have left the window, so the remaining values decide.
            self.minimum = *self
                .values
                .iter()
                .min()
                .expect("the window contains at least one value");
        } else if new_value < self.minimum {
            self.minimum = new_value;
        }

        Some(())
    }

    /// Returns true if the value at the given position equals the window minimum.
    fn minimum_is_at(&self, position: usize) -> bool {
        self.values[position] == self.minimum
    }
}

/// An iterator over the syncmers of a k-mer hash sequence: each k-mer hash whose window of
/// `window_size + 1` aligned s-mer hash values has its minimum at position `submer_offset`.
/// Ties count, so a minimal s-mer value occurring at the offset in addition to elsewhere
/// still selects the k-mer.
///
/// In the reverse complement mode, a second s-mer window is tracked independently for the
/// reverse-complement strand and checked at the mirrored offset, so a k-mer is selected if its
/// distinguishing s-mer sits at the configured offset on either strand.
///
/// A syncmer equal to the previously emitted value is not emitted again, so consecutive emitted
/// values are always distinct. If either input sequence is too short for a single window, the
/// iterator is empty.
#[derive(Clone)]
pub struct Syncmer<KmerIterator, SmerIterator, ReverseSmerIterator = Empty<u64>> {
    kmer_hashes: KmerIterator,
    smer_window: SmerWindow<SmerIterator>,
    reverse_smer_window: Option<SmerWindow<ReverseSmerIterator>>,
    window_size: usize,
    submer_offset: usize,
    last_emitted: Option<u64>,
    primed: bool,
}

impl<KmerIterator: Iterator<Item = u64>, SmerIterator: Iterator<Item = u64>>
    Syncmer<KmerIterator, SmerIterator>
{
    /// Creates an iterator over the syncmers of the given k-mer hash sequence, judged by the
    /// given aligned s-mer hash sequence.
    ///
    /// `window_size` is the number of s-mer shifts per k-mer window, i.e. the difference of the
    /// k-mer and s-mer shape sizes, so that each k-mer covers `window_size + 1` s-mers.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if `submer_offset` points
    /// past the last s-mer of a window.
    pub fn new(
        kmer_hashes: KmerIterator,
        smer_hashes: SmerIterator,
        window_size: usize,
        submer_offset: usize,
    ) -> Result<Self> {
        Self::from_windows(kmer_hashes, smer_hashes, None, window_size, submer_offset)
    }
}

impl<
        KmerIterator: Iterator<Item = u64>,
        SmerIterator: Iterator<Item = u64>,
        ReverseSmerIterator: Iterator<Item = u64>,
    > Syncmer<KmerIterator, SmerIterator, ReverseSmerIterator>
{
    /// Creates an iterator over the syncmers of the given k-mer hash sequence, judged by the
    /// aligned s-mer hash sequences of both strands.
    ///
    /// The reverse-complement s-mer window is checked at the mirrored offset
    /// `window_size - submer_offset`, which is the configured offset as seen from the reverse
    /// strand's reading direction.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if `submer_offset` points
    /// past the last s-mer of a window.
    pub fn with_reverse_complement(
        kmer_hashes: KmerIterator,
        smer_hashes: SmerIterator,
        reverse_smer_hashes: ReverseSmerIterator,
        window_size: usize,
        submer_offset: usize,
    ) -> Result<Self> {
        Self::from_windows(
            kmer_hashes,
            smer_hashes,
            Some(reverse_smer_hashes),
            window_size,
            submer_offset,
        )
    }

    fn from_windows(
        kmer_hashes: KmerIterator,
        smer_hashes: SmerIterator,
        reverse_smer_hashes: Option<ReverseSmerIterator>,
        window_size: usize,
        submer_offset: usize,
    ) -> Result<Self> {
        if submer_offset > window_size {
            return Err(ErrorKind::InvalidArgument(format!(
                "the submer offset {} points past the last of the {} s-mers of a window",
                submer_offset,
                window_size + 1
            ))
            .into());
        }

        Ok(Self {
            kmer_hashes,
            smer_window: SmerWindow::new(smer_hashes),
            reverse_smer_window: reverse_smer_hashes.map(SmerWindow::new),
            window_size,
            submer_offset,
            last_emitted: None,
            primed: false,
        })
    }

    /// Returns true if the current k-mer window has its minimal s-mer at the configured offset
    /// on either strand.
    fn current_window_is_syncmer(&self) -> bool {
        if self.smer_window.minimum_is_at(self.submer_offset) {
            return true;
        }
        if let Some(reverse_smer_window) = &self.reverse_smer_window {
            return reverse_smer_window.minimum_is_at(self.window_size - self.submer_offset);
        }
        false
    }
}

impl<
        KmerIterator: Iterator<Item = u64>,
        SmerIterator: Iterator<Item = u64>,
        ReverseSmerIterator: Iterator<Item = u64>,
    > Iterator for Syncmer<KmerIterator, SmerIterator, ReverseSmerIterator>
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        // Advance k-mer by k-mer until one qualifies or the input ends.
        loop {
            let kmer_hash = if !self.primed {
                let window_length = self.window_size + 1;
                self.smer_window.prime(window_length)?;
                if let Some(reverse_smer_window) = self.reverse_smer_window.as_mut() {
                    reverse_smer_window.prime(window_length)?;
                }
                let kmer_hash = self.kmer_hashes.next()?;
                self.primed = true;
                kmer_hash
            } else {
                let kmer_hash = self.kmer_hashes.next()?;
                self.smer_window.shift()?;
                if let Some(reverse_smer_window) = self.reverse_smer_window.as_mut() {
                    reverse_smer_window.shift()?;
                }
                kmer_hash
            };

            if self.current_window_is_syncmer() && self.last_emitted != Some(kmer_hash) {
                self.last_emitted = Some(kmer_hash);
                return Some(kmer_hash);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::interface::alphabet::dna_alphabet::{DnaAlphabet, DnaCharacter};
    use crate::interface::alphabet::Alphabet;
    use crate::kmer_hash::KmerHashSliceIterator;
    use crate::shape::Shape;
    use crate::syncmer::Syncmer;
    use bitvec::bitvec;
    use bitvec::order::Lsb0;

    fn dna(sequence: &[u8]) -> Vec<DnaCharacter> {
        DnaAlphabet::characters_from_slice(sequence).unwrap()
    }

    fn kmer_hashes(sequence: &[DnaCharacter], shape: Shape) -> KmerHashSliceIterator<DnaAlphabet> {
        KmerHashSliceIterator::<DnaAlphabet>::from_slice(sequence, shape).unwrap()
    }

    fn syncmers(
        sequence: &[DnaCharacter],
        kmer_shape: Shape,
        smer_shape: Shape,
        window_size: usize,
        submer_offset: usize,
    ) -> Vec<u64> {
        Syncmer::new(
            kmer_hashes(sequence, kmer_shape),
            kmer_hashes(sequence, smer_shape),
            window_size,
            submer_offset,
        )
        .unwrap()
        .collect()
    }

    #[test]
    fn test_syncmers_of_kmer_hashes() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        // ACGGC, CGGCG, ACGTT, CGTTT, GTTTA
        assert_eq!(
            syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(3).unwrap(),
                2,
                0
            ),
            vec![105, 422, 111, 447, 764]
        );
    }

    #[test]
    fn test_syncmers_with_gapped_smers() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        assert_eq!(
            syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::new(bitvec![1, 0, 1]).unwrap(),
                2,
                0
            ),
            vec![105, 422, 111, 447, 764]
        );
    }

    #[test]
    fn test_syncmers_with_interior_submer_offset() {
        let sequence = dna(b"ACGTCGACGTTTAG");
        // ACGTC, CGTCG, ACGTT, CGTTT, GTTTA
        assert_eq!(
            syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(3).unwrap(),
                2,
                0
            ),
            vec![109, 438, 111, 447, 764]
        );
        // TCGAC, GACGT
        assert_eq!(
            syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(3).unwrap(),
                2,
                1
            ),
            vec![865, 539]
        );
        // TCGAC, GACGT, TTTAG
        assert_eq!(
            syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::new(bitvec![1, 0, 1]).unwrap(),
                2,
                1
            ),
            vec![865, 539, 1010]
        );
    }

    #[test]
    fn test_constant_input_is_emitted_once() {
        let sequence = dna(b"AAAAAAAAAAAAAAAAAAA");
        assert_eq!(
            syncmers(
                &sequence,
                Shape::ungapped(5).unwrap(),
                Shape::ungapped(3).unwrap(),
                2,
                0
            ),
            vec![0]
        );
    }

    #[test]
    fn test_short_input_yields_no_syncmers() {
        let sequence = dna(b"AC");
        assert!(syncmers(
            &sequence,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            2,
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

        let full = syncmers(
            &sequence,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            2,
            0,
        );
        let prefix = syncmers(
            &truncated,
            Shape::ungapped(5).unwrap(),
            Shape::ungapped(3).unwrap(),
            2,
            0,
        );
        assert_eq!(prefix, vec![105, 422]);
        assert_eq!(prefix, full[..prefix.len()]);
    }

    #[test]
    fn test_submer_offset_past_the_window_is_rejected() {
        let error = Syncmer::new([1u64, 2].into_iter(), [1u64, 2, 3].into_iter(), 2, 3)
            .err()
            .unwrap();
        assert!(matches!(error.kind(), ErrorKind::InvalidArgument(_)));
    }

    #[test]
    fn test_cloned_syncmers_are_independent_passes() {
        let sequence = dna(b"ACGGCGACGTTTAG");
        let syncmer = Syncmer::new(
            kmer_hashes(&sequence, Shape::ungapped(5).unwrap()),
            kmer_hashes(&sequence, Shape::ungapped(3).unwrap()),
            2,
            0,
        )
        .unwrap();
        let clone = syncmer.clone();
        assert_eq!(syncmer.collect::<Vec<_>>(), clone.collect::<Vec<_>>());
    }
}
