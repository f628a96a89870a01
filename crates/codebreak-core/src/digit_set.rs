//! A set of digits 0-9.
//!
//! This module provides [`DigitSet`], a bitset with one bit per [`Digit`].
//!
//! # Examples
//!
//! ```
//! use codebreak_core::{Digit, DigitSet};
//!
//! let a = DigitSet::from_iter([Digit::D1, Digit::D2, Digit::D3]);
//! let b = DigitSet::from_iter([Digit::D2, Digit::D3, Digit::D4]);
//!
//! assert_eq!((a & b).len(), 2);
//! assert_eq!((a | b).len(), 4);
//! assert!(a.difference(b).contains(Digit::D1));
//! ```

use std::{
    fmt,
    iter::FusedIterator,
    ops::{BitAnd, BitOr},
};

use crate::Digit;

/// A set of digits 0-9, represented as a 10-bit mask.
///
/// Bit `d` is set when digit `d` is a member. Iteration yields digits in
/// increasing order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DigitSet {
    bits: u16,
}

impl DigitSet {
    /// The empty set.
    pub const EMPTY: Self = Self { bits: 0 };
    /// The set containing every digit 0-9.
    pub const FULL: Self = Self { bits: 0b11_1111_1111 };

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    const fn bit(digit: Digit) -> u16 {
        1 << digit.value()
    }

    /// Inserts a digit, returning `true` if it was not already present.
    pub fn insert(&mut self, digit: Digit) -> bool {
        let inserted = !self.contains(digit);
        self.bits |= Self::bit(digit);
        inserted
    }

    /// Removes a digit, returning `true` if it was present.
    pub fn remove(&mut self, digit: Digit) -> bool {
        let removed = self.contains(digit);
        self.bits &= !Self::bit(digit);
        removed
    }

    /// Returns `true` if the digit is a member of the set.
    #[must_use]
    pub const fn contains(self, digit: Digit) -> bool {
        self.bits & Self::bit(digit) != 0
    }

    /// Returns the number of digits in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns the digits present in both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Returns the digits present in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns the digits in `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Returns an iterator over the members in increasing order.
    #[must_use]
    pub fn iter(self) -> DigitSetIter {
        DigitSetIter { bits: self.bits }
    }
}

impl fmt::Debug for DigitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl BitAnd for DigitSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitOr for DigitSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl FromIterator<Digit> for DigitSet {
    fn from_iter<T: IntoIterator<Item = Digit>>(iter: T) -> Self {
        let mut set = Self::new();
        for digit in iter {
            set.insert(digit);
        }
        set
    }
}

impl IntoIterator for DigitSet {
    type Item = Digit;
    type IntoIter = DigitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`DigitSet`].
#[derive(Debug, Clone)]
pub struct DigitSetIter {
    bits: u16,
}

impl Iterator for DigitSetIter {
    type Item = Digit;

    fn next(&mut self) -> Option<Digit> {
        if self.bits == 0 {
            return None;
        }
        #[expect(clippy::cast_possible_truncation)]
        let index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Some(Digit::from_value(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for DigitSetIter {}
impl FusedIterator for DigitSetIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = DigitSet::new();
        assert!(set.insert(Digit::D0));
        assert!(!set.insert(Digit::D0));
        assert!(set.insert(Digit::D9));
        assert_eq!(set.len(), 2);
        assert!(set.remove(Digit::D0));
        assert!(!set.remove(Digit::D0));
        assert!(!set.contains(Digit::D0));
        assert!(set.contains(Digit::D9));
    }

    #[test]
    fn test_iteration_order() {
        let set = DigitSet::from_iter([Digit::D9, Digit::D0, Digit::D5, Digit::D3]);
        let collected: Vec<_> = set.iter().collect();
        assert_eq!(collected, vec![Digit::D0, Digit::D3, Digit::D5, Digit::D9]);
        assert_eq!(set.iter().len(), 4);
    }

    #[test]
    fn test_constants() {
        assert!(DigitSet::EMPTY.is_empty());
        assert_eq!(DigitSet::FULL.len(), 10);
        for digit in Digit::ALL {
            assert!(DigitSet::FULL.contains(digit));
        }
        assert_eq!(DigitSet::FULL.iter().collect::<Vec<_>>(), Digit::ALL.to_vec());
    }
}
