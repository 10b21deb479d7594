//! Selection of the minimal hash value per sliding window of a hash sequence.

use crate::error::{ErrorKind, Result};
use std::collections::VecDeque;
use std::iter::Empty;

/// The source of the combined hash values of a [Minimizer], selected at construction.
///
/// In dual mode, two aligned hash sequences are combined into their pointwise minimum, which
/// selects the canonical hash value per position.
#[derive(Clone)]
enum RangeSource<PrimaryIterator, SecondaryIterator> {
    SingleRange(PrimaryIterator),
    DualRange(PrimaryIterator, SecondaryIterator),
}

impl<PrimaryIterator: Iterator<Item = u64>, SecondaryIterator: Iterator<Item = u64>> Iterator
    for RangeSource<PrimaryIterator, SecondaryIterator>
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RangeSource::SingleRange(primary) => primary.next(),
            RangeSource::DualRange(primary, secondary) => {
                match (primary.next(), secondary.next()) {
                    (Some(primary_value), Some(secondary_value)) => {
                        Some(primary_value.min(secondary_value))
                    }
                    _ => None,
                }
            }
        }
    }
}

/// An iterator over the minimizers of a hash sequence: the minimal value of each window of
/// `window_size` consecutive hash values, advancing by one value per step.
///
/// A minimizer shared by consecutive windows is emitted only once, so consecutive emitted values
/// are always distinct. Ties within a window are broken by retaining the first occurrence: the
/// incumbent minimizer survives unless strictly beaten.
///
/// If the hash sequence is shorter than the window, the iterator is empty.
#[derive(Clone)]
pub struct Minimizer<PrimaryIterator, SecondaryIterator = Empty<u64>> {
    source: RangeSource<PrimaryIterator, SecondaryIterator>,
    window_size: usize,
    window_values: VecDeque<u64>,
    minimizer_value: u64,
    last_emitted: Option<u64>,
    primed: bool,
}

impl<PrimaryIterator: Iterator<Item = u64>> Minimizer<PrimaryIterator> {
    /// Creates an iterator over the minimizers of the windows of `window_size` consecutive
    /// values of the given hash sequence.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if `window_size` is below
    /// two, since a window of one value would return the hash sequence unchanged.
    ///
    /// ```rust
    /// use genome_sketch::minimizer::Minimizer;
    ///
    /// let values = [28u64, 100, 9, 23, 4, 1, 72, 37, 8];
    /// let minimizers: Vec<_> = Minimizer::new(values.into_iter(), 4).unwrap().collect();
    /// assert_eq!(minimizers, vec![9, 4, 1]);
    /// ```
    pub fn new(values: PrimaryIterator, window_size: usize) -> Result<Self> {
        if window_size < 2 {
            return Err(ErrorKind::InvalidArgument(
                "a minimizer window over a single range must contain at least two values"
                    .to_string(),
            )
            .into());
        }

        Ok(Self::from_source(RangeSource::SingleRange(values), window_size))
    }

    /// Creates a minimizer iterator without validating the window size.
    ///
    /// Used by orchestrating selectors whose combined hash sequence is meaningful even with a
    /// window of one value.
    pub(crate) fn new_unchecked(values: PrimaryIterator, window_size: usize) -> Self {
        debug_assert!(window_size > 0);
        Self::from_source(RangeSource::SingleRange(values), window_size)
    }
}

impl<PrimaryIterator: Iterator<Item = u64>, SecondaryIterator: Iterator<Item = u64>>
    Minimizer<PrimaryIterator, SecondaryIterator>
{
    /// Creates an iterator over the minimizers of two aligned hash sequences, where each window
    /// position contributes the smaller of the two hash values at that position.
    ///
    /// The typical use case is passing the hash sequences of the forward and the
    /// reverse-complement strand of the same sequence, which makes the minimizers canonical.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the two sequences have
    /// different lengths, or if `window_size` is zero.
    pub fn with_second_range(
        primary: PrimaryIterator,
        secondary: SecondaryIterator,
        window_size: usize,
    ) -> Result<Self>
    where
        PrimaryIterator: ExactSizeIterator,
        SecondaryIterator: ExactSizeIterator,
    {
        if primary.len() != secondary.len() {
            return Err(ErrorKind::InvalidArgument(format!(
                "the two ranges must have the same length, but they have lengths {} and {}",
                primary.len(),
                secondary.len()
            ))
            .into());
        }
        if window_size == 0 {
            return Err(ErrorKind::InvalidArgument(
                "a minimizer window must contain at least one value".to_string(),
            )
            .into());
        }

        Ok(Self::from_source(
            RangeSource::DualRange(primary, secondary),
            window_size,
        ))
    }

    fn from_source(
        source: RangeSource<PrimaryIterator, SecondaryIterator>,
        window_size: usize,
    ) -> Self {
        Self {
            source,
            window_size,
            window_values: VecDeque::with_capacity(window_size),
            minimizer_value: 0,
            last_emitted: None,
            primed: false,
        }
    }
}

impl<PrimaryIterator: Iterator<Item = u64>, SecondaryIterator: Iterator<Item = u64>> Iterator
    for Minimizer<PrimaryIterator, SecondaryIterator>
{
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.primed {
            while self.window_values.len() < self.window_size {
                self.window_values.push_back(self.source.next()?);
            }
            self.minimizer_value = *self
                .window_values
                .iter()
                .min()
                .expect("the window contains at least one value");
            self.primed = true;
            self.last_emitted = Some(self.minimizer_value);
            return Some(self.minimizer_value);
        }

        // Shift the window until the minimizer changes or the input ends.
        loop {
            let new_value = self.source.next()?;
            let evicted_value = self
                .window_values
                .pop_front()
                .expect("the window is full after priming");
            self.window_values.push_back(new_value);

            if evicted_value == self.minimizer_value {
                // The minimizer may have left the window, so the remaining values decide.
                self.minimizer_value = *self
                    .window_values
                    .iter()
                    .min()
                    .expect("the window contains at least one value");
            } else if new_value < self.minimizer_value {
                self.minimizer_value = new_value;
            }

            if self.last_emitted != Some(self.minimizer_value) {
                self.last_emitted = Some(self.minimizer_value);
                return Some(self.minimizer_value);
            }
        }
    }
}
