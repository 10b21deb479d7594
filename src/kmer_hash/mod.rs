//! Lazy polynomial hashing of the windows of a symbol sequence.
//!
//! The hash of a window treats the ranks of its included symbols as the digits of a number whose
//! base is the alphabet size, with the leftmost included symbol as the most significant digit.
//! Ungapped shapes are hashed with an O(1) rolling update per step, gapped shapes are recomputed
//! from a bounded rank buffer in O(weight) per step.

use crate::error::{ErrorKind, Result};
use crate::interface::alphabet::{Alphabet, AlphabetCharacter, ComplementableCharacter};
use crate::shape::Shape;
use std::collections::VecDeque;
use std::iter::Cloned;
use std::marker::PhantomData;
use std::slice;

/// The type of [KmerHashIterator]s that borrow their characters from a slice.
pub type KmerHashSliceIterator<'a, AlphabetType> = KmerHashIterator<
    AlphabetType,
    Cloned<slice::Iter<'a, <AlphabetType as Alphabet>::CharacterType>>,
>;

/// The type of [ReverseComplementKmerHashIterator]s that borrow their characters from a slice.
pub type ReverseComplementKmerHashSliceIterator<'a, AlphabetType> =
    ReverseComplementKmerHashIterator<
        AlphabetType,
        Cloned<slice::Iter<'a, <AlphabetType as Alphabet>::CharacterType>>,
    >;

/// Computes the place value of the most significant digit of a hash with the given amount of
/// digits, or fails if such hashes do not fit into 64 bits.
fn leading_radix_power(radix: u64, weight: usize) -> Result<u64> {
    radix
        .checked_pow((weight - 1) as u32)
        .filter(|&power| power.checked_mul(radix).is_some() || power.wrapping_mul(radix) == 0)
        .ok_or_else(|| {
            ErrorKind::InvalidArgument(format!(
                "hash values of a shape with weight {} over an alphabet of size {} do not fit into 64 bits",
                weight, radix
            ))
            .into()
        })
}

/// An iterator over the hash values of all windows of a symbol sequence, advancing by one symbol
/// per step.
///
/// If the sequence is shorter than the shape, the iterator is empty.
#[derive(Clone)]
pub struct KmerHashIterator<AlphabetType, SourceIterator> {
    source: SourceIterator,
    shape: Shape,
    ungapped: bool,
    radix: u64,
    leading_radix_power: u64,
    ranks: VecDeque<u64>,
    hash: u64,
    primed: bool,
    alphabet: PhantomData<AlphabetType>,
}

impl<AlphabetType: Alphabet, SourceIterator: Iterator<Item = AlphabetType::CharacterType>>
    KmerHashIterator<AlphabetType, SourceIterator>
{
    /// Creates an iterator over the hash values of all windows of the given shape in the given
    /// symbol sequence.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the hash values of the
    /// shape do not fit into 64 bits.
    pub fn new(source: SourceIterator, shape: Shape) -> Result<Self> {
        let radix = AlphabetType::size() as u64;
        let leading_radix_power = leading_radix_power(radix, shape.weight())?;

        Ok(Self {
            source,
            ungapped: shape.is_ungapped(),
            shape,
            radix,
            leading_radix_power,
            ranks: VecDeque::new(),
            hash: 0,
            primed: false,
            alphabet: PhantomData,
        })
    }

    fn recompute_gapped_hash(&self) -> u64 {
        self.shape
            .included_positions()
            .fold(0, |hash, position| hash * self.radix + self.ranks[position])
    }
}

impl<'a, AlphabetType: Alphabet>
    KmerHashIterator<AlphabetType, Cloned<slice::Iter<'a, AlphabetType::CharacterType>>>
{
    /// Creates an iterator over the hash values of all windows of the given shape, borrowing the
    /// characters from the given slice.
    pub fn from_slice(characters: &'a [AlphabetType::CharacterType], shape: Shape) -> Result<Self> {
        Self::new(characters.iter().cloned(), shape)
    }
}

impl<AlphabetType: Alphabet, SourceIterator: Iterator<Item = AlphabetType::CharacterType>> Iterator
    for KmerHashIterator<AlphabetType, SourceIterator>
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.primed {
            while self.ranks.len() < self.shape.size() {
                self.ranks.push_back(self.source.next()?.index() as u64);
            }
            if self.ungapped {
                self.hash = self
                    .ranks
                    .iter()
                    .fold(0, |hash, &rank| hash * self.radix + rank);
            }
            self.primed = true;
        } else {
            let new_rank = self.source.next()?.index() as u64;
            let evicted_rank = self
                .ranks
                .pop_front()
                .expect("the rank buffer holds a full window after priming");
            self.ranks.push_back(new_rank);
            if self.ungapped {
                self.hash =
                    (self.hash - evicted_rank * self.leading_radix_power) * self.radix + new_rank;
            }
        }

        Some(if self.ungapped {
            self.hash
        } else {
            self.recompute_gapped_hash()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (source_lower, source_upper) = self.source.size_hint();
        let remaining = |source_length: usize| {
            if self.primed {
                source_length
            } else {
                (source_length + self.ranks.len()).saturating_sub(self.shape.size() - 1)
            }
        };
        (remaining(source_lower), source_upper.map(remaining))
    }
}

impl<AlphabetType: Alphabet, SourceIterator> ExactSizeIterator
    for KmerHashIterator<AlphabetType, SourceIterator>
where
    SourceIterator: ExactSizeIterator<Item = AlphabetType::CharacterType>,
{
}

/// An iterator over the hash values of the reverse complements of all windows of a symbol
/// sequence, aligned with the forward window positions.
///
/// This is equivalent to complementing the sequence, reversing it, hashing it and reversing the
/// resulting hash sequence, but streams forward in a single pass with a bounded buffer.
#[derive(Clone)]
pub struct ReverseComplementKmerHashIterator<AlphabetType, SourceIterator> {
    source: SourceIterator,
    shape: Shape,
    ungapped: bool,
    radix: u64,
    leading_radix_power: u64,
    complement_ranks: VecDeque<u64>,
    hash: u64,
    primed: bool,
    alphabet: PhantomData<AlphabetType>,
}

impl<AlphabetType: Alphabet, SourceIterator: Iterator<Item = AlphabetType::CharacterType>>
    ReverseComplementKmerHashIterator<AlphabetType, SourceIterator>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    /// Creates an iterator over the reverse complement hash values of all windows of the given
    /// shape in the given symbol sequence.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the hash values of the
    /// shape do not fit into 64 bits.
    pub fn new(source: SourceIterator, shape: Shape) -> Result<Self> {
        let radix = AlphabetType::size() as u64;
        let leading_radix_power = leading_radix_power(radix, shape.weight())?;

        Ok(Self {
            source,
            ungapped: shape.is_ungapped(),
            shape,
            radix,
            leading_radix_power,
            complement_ranks: VecDeque::new(),
            hash: 0,
            primed: false,
            alphabet: PhantomData,
        })
    }

    /// The window read in reverse makes the stored complement rank of the physically last symbol
    /// the most significant digit.
    fn recompute_gapped_hash(&self) -> u64 {
        let last_position = self.shape.size() - 1;
        self.shape.included_positions().fold(0, |hash, position| {
            hash * self.radix + self.complement_ranks[last_position - position]
        })
    }
}

impl<'a, AlphabetType: Alphabet>
    ReverseComplementKmerHashIterator<
        AlphabetType,
        Cloned<slice::Iter<'a, AlphabetType::CharacterType>>,
    >
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    /// Creates an iterator over the reverse complement hash values of all windows of the given
    /// shape, borrowing the characters from the given slice.
    pub fn from_slice(characters: &'a [AlphabetType::CharacterType], shape: Shape) -> Result<Self> {
        Self::new(characters.iter().cloned(), shape)
    }
}

impl<AlphabetType: Alphabet, SourceIterator: Iterator<Item = AlphabetType::CharacterType>> Iterator
    for ReverseComplementKmerHashIterator<AlphabetType, SourceIterator>
where
    AlphabetType::CharacterType: ComplementableCharacter,
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.primed {
            while self.complement_ranks.len() < self.shape.size() {
                let complement_rank = self.source.next()?.complement().index() as u64;
                self.complement_ranks.push_back(complement_rank);
            }
            if self.ungapped {
                // Reading the window backwards makes the oldest symbol the least significant
                // digit, so the rolling hash accumulates in reverse.
                self.hash = self
                    .complement_ranks
                    .iter()
                    .rev()
                    .fold(0, |hash, &rank| hash * self.radix + rank);
            }
            self.primed = true;
        } else {
            let new_rank = self.source.next()?.complement().index() as u64;
            let evicted_rank = self
                .complement_ranks
                .pop_front()
                .expect("the rank buffer holds a full window after priming");
            self.complement_ranks.push_back(new_rank);
            if self.ungapped {
                self.hash =
                    (self.hash - evicted_rank) / self.radix + new_rank * self.leading_radix_power;
            }
        }

        Some(if self.ungapped {
            self.hash
        } else {
            self.recompute_gapped_hash()
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (source_lower, source_upper) = self.source.size_hint();
        let remaining = |source_length: usize| {
            if self.primed {
                source_length
            } else {
                (source_length + self.complement_ranks.len())
                    .saturating_sub(self.shape.size() - 1)
            }
        };
        (remaining(source_lower), source_upper.map(remaining))
    }
}

impl<AlphabetType: Alphabet, SourceIterator> ExactSizeIterator
    for ReverseComplementKmerHashIterator<AlphabetType, SourceIterator>
where
    SourceIterator: ExactSizeIterator<Item = AlphabetType::CharacterType>,
    AlphabetType::CharacterType: ComplementableCharacter,
{
}

/// An iterator adaptor that XOR-scrambles an upstream hash sequence with a seed.
///
/// A seed of zero passes the hash values through unchanged.
#[derive(Clone)]
pub struct SeededHashIterator<SourceIterator> {
    source: SourceIterator,
    seed: u64,
}

impl<SourceIterator: Iterator<Item = u64>> SeededHashIterator<SourceIterator> {
    /// Creates an iterator that XORs every value of the given hash sequence with the given seed.
    pub fn new(source: SourceIterator, seed: u64) -> Self {
        Self { source, seed }
    }
}

impl<SourceIterator: Iterator<Item = u64>> Iterator for SeededHashIterator<SourceIterator> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next().map(|hash| hash ^ self.seed)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<SourceIterator: ExactSizeIterator<Item = u64>> ExactSizeIterator
    for SeededHashIterator<SourceIterator>
{
}
