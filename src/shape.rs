//! Shapes describing which positions of a hashing window contribute to the hash value.

use crate::error::{ErrorKind, Result};
use bitvec::vec::BitVec;
use itertools::Itertools;
use std::fmt;

/// A bitmask over a window of consecutive symbols, where a set bit marks a position that
/// contributes to the hash value and an unset bit marks a gap.
///
/// A shape is immutable once constructed. Its first and last position must be included,
/// since a gap at the boundary would only shrink the window.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Shape {
    mask: BitVec,
}

impl Shape {
    /// Constructs a shape from the given bitmask.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the mask is empty or
    /// if its first or last position is a gap.
    pub fn new(mask: BitVec) -> Result<Self> {
        if mask.is_empty() {
            return Err(ErrorKind::InvalidArgument("a shape must contain at least one position".to_string()).into());
        }
        if !mask[0] || !mask[mask.len() - 1] {
            return Err(ErrorKind::InvalidArgument(
                "a shape must begin and end with an included position".to_string(),
            )
            .into());
        }

        Ok(Self { mask })
    }

    /// Constructs a shape without gaps spanning the given amount of positions.
    ///
    /// Returns an [InvalidArgument](ErrorKind::InvalidArgument) error if the span is zero.
    pub fn ungapped(span: usize) -> Result<Self> {
        if span == 0 {
            return Err(ErrorKind::InvalidArgument("a shape must contain at least one position".to_string()).into());
        }

        Ok(Self {
            mask: BitVec::repeat(true, span),
        })
    }

    /// Returns the total amount of positions this shape spans, including gaps.
    pub fn size(&self) -> usize {
        self.mask.len()
    }

    /// Returns the amount of positions that contribute to the hash value.
    pub fn weight(&self) -> usize {
        self.mask.count_ones()
    }

    /// Returns true if this shape has no gaps.
    pub fn is_ungapped(&self) -> bool {
        self.weight() == self.size()
    }

    /// Returns an iterator over the included positions of this shape, in increasing order.
    pub fn included_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask.iter_ones()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}",
            self.mask.iter().map(|bit| if *bit { '1' } else { '0' }).join("")
        )
    }
}
