//! Validated digit sequences.
//!
//! A [`Sequence`] is the value guessed or hidden as a secret: `N` digits
//! (`N` being a [`SequenceLength`]) with no digit repeated. The only way to
//! obtain one is through validation, so every `Sequence` in the program is
//! known to be well-formed.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CoreError, Digit, DigitSet};

/// The longest supported sequence length.
pub const MAX_LENGTH: usize = 4;

/// The number of digits in every sequence of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SequenceLength {
    /// Two-digit sequences.
    Two = 2,
    /// Three-digit sequences.
    Three = 3,
    /// Four-digit sequences.
    Four = 4,
}

impl SequenceLength {
    /// All supported lengths, shortest first.
    pub const ALL: [Self; 3] = [Self::Two, Self::Three, Self::Four];

    /// Returns the length as a `usize`.
    #[must_use]
    pub const fn get(self) -> usize {
        self as usize
    }

    /// Returns the number of distinct valid sequences of this length, `10!/(10-n)!`.
    ///
    /// ```
    /// use codebreak_core::SequenceLength;
    ///
    /// assert_eq!(SequenceLength::Two.hypothesis_count(), 90);
    /// assert_eq!(SequenceLength::Three.hypothesis_count(), 720);
    /// assert_eq!(SequenceLength::Four.hypothesis_count(), 5040);
    /// ```
    #[must_use]
    pub const fn hypothesis_count(self) -> usize {
        let mut count = 1;
        let mut i = 0;
        while i < self.get() {
            count *= 10 - i;
            i += 1;
        }
        count
    }
}

impl fmt::Display for SequenceLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}

impl From<SequenceLength> for u8 {
    fn from(length: SequenceLength) -> u8 {
        length as u8
    }
}

impl TryFrom<u8> for SequenceLength {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(usize::from(value))
    }
}

impl TryFrom<usize> for SequenceLength {
    type Error = CoreError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            _ => Err(CoreError::UnsupportedLength(value)),
        }
    }
}

/// Reasons a candidate string is not a valid sequence.
///
/// Rules are checked in declaration order and the first failure wins, so the
/// same input always produces the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    /// The candidate does not have exactly `expected` characters.
    #[display("expected {expected} digits, got {actual} characters")]
    WrongLength {
        /// The match's sequence length.
        expected: usize,
        /// The number of characters supplied.
        actual: usize,
    },
    /// A character is not an ASCII digit.
    #[display("character {found:?} at position {index} is not a digit")]
    NonDigit {
        /// Zero-based position of the offending character.
        index: usize,
        /// The offending character.
        found: char,
    },
    /// A digit appears more than once.
    #[display("digit {digit} is repeated")]
    DuplicateDigit {
        /// The first digit found twice.
        digit: Digit,
    },
}

/// An ordered, repeat-free list of digits of a supported length.
///
/// # Examples
///
/// ```
/// use codebreak_core::{Digit, Sequence, SequenceLength, ValidationError};
///
/// let seq = Sequence::parse("582", SequenceLength::Three)?;
/// assert_eq!(seq.digits(), &[Digit::D5, Digit::D8, Digit::D2]);
/// assert_eq!(seq.to_string(), "582");
///
/// assert!(matches!(
///     Sequence::parse("1123", SequenceLength::Four),
///     Err(ValidationError::DuplicateDigit { digit: Digit::D1 })
/// ));
/// # Ok::<(), ValidationError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sequence {
    length: SequenceLength,
    // Slots past `length` stay `Digit::D0` so derived comparisons only see real digits.
    digits: [Digit; MAX_LENGTH],
}

impl Sequence {
    /// Validates `candidate` as a sequence of `length` digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WrongLength`] if the character count differs from
    /// `length`, then [`ValidationError::NonDigit`] for the first non-digit character,
    /// then [`ValidationError::DuplicateDigit`] for the first repeated digit.
    pub fn parse(candidate: &str, length: SequenceLength) -> Result<Self, ValidationError> {
        let actual = candidate.chars().count();
        if actual != length.get() {
            return Err(ValidationError::WrongLength {
                expected: length.get(),
                actual,
            });
        }

        let mut digits = [Digit::D0; MAX_LENGTH];
        for (index, ch) in candidate.chars().enumerate() {
            digits[index] =
                Digit::from_char(ch).ok_or(ValidationError::NonDigit { index, found: ch })?;
        }

        Self::from_digits(&digits[..length.get()])
    }

    /// Builds a sequence from already-parsed digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WrongLength`] if `digits` does not have 2, 3 or 4
    /// elements and [`ValidationError::DuplicateDigit`] if a digit repeats.
    pub fn from_digits(digits: &[Digit]) -> Result<Self, ValidationError> {
        let length = SequenceLength::try_from(digits.len()).map_err(|_| {
            ValidationError::WrongLength {
                expected: digits.len().clamp(2, MAX_LENGTH),
                actual: digits.len(),
            }
        })?;

        let mut seen = DigitSet::new();
        let mut stored = [Digit::D0; MAX_LENGTH];
        for (slot, &digit) in stored.iter_mut().zip(digits) {
            if !seen.insert(digit) {
                return Err(ValidationError::DuplicateDigit { digit });
            }
            *slot = digit;
        }

        Ok(Self {
            length,
            digits: stored,
        })
    }

    /// Returns the sequence `0, 1, ..., n-1`.
    #[must_use]
    pub fn ascending(length: SequenceLength) -> Self {
        let mut digits = [Digit::D0; MAX_LENGTH];
        for (slot, digit) in digits.iter_mut().zip(Digit::ALL).take(length.get()) {
            *slot = digit;
        }
        Self { length, digits }
    }

    /// Returns the length of this sequence.
    #[must_use]
    pub const fn length(&self) -> SequenceLength {
        self.length
    }

    /// Returns the digits in order.
    #[must_use]
    pub fn digits(&self) -> &[Digit] {
        &self.digits[..self.length.get()]
    }

    /// Returns the set of digits used by this sequence.
    #[must_use]
    pub fn digit_set(&self) -> DigitSet {
        self.digits().iter().copied().collect()
    }

    /// Returns a copy with every digit replaced through `map`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateDigit`] if `map` sends two digits of this
    /// sequence to the same digit.
    pub fn relabel<F>(&self, mut map: F) -> Result<Self, ValidationError>
    where
        F: FnMut(Digit) -> Digit,
    {
        let mapped: Vec<Digit> = self.digits().iter().map(|&digit| map(digit)).collect();
        Self::from_digits(&mapped)
    }
}

/// Validates `candidate` against the arity `length`.
///
/// This is a free-function spelling of [`Sequence::parse`].
///
/// # Errors
///
/// See [`Sequence::parse`].
pub fn validate(candidate: &str, length: SequenceLength) -> Result<Sequence, ValidationError> {
    Sequence::parse(candidate, length)
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits() {
            write!(f, "{}", digit.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence({self})")
    }
}

impl FromStr for Sequence {
    type Err = CoreError;

    /// Parses a sequence whose length is taken from the input itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = SequenceLength::try_from(s.chars().count())?;
        Ok(Self::parse(s, length)?)
    }
}

impl TryFrom<String> for Sequence {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sequence> for String {
    fn from(sequence: Sequence) -> String {
        sequence.to_string()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_valid() {
        let seq = Sequence::parse("4725", SequenceLength::Four).unwrap();
        assert_eq!(seq.length(), SequenceLength::Four);
        assert_eq!(seq.digits(), &[Digit::D4, Digit::D7, Digit::D2, Digit::D5]);
        assert_eq!(seq.to_string(), "4725");

        let seq = Sequence::parse("05", SequenceLength::Two).unwrap();
        assert_eq!(seq.digits(), &[Digit::D0, Digit::D5]);
    }

    #[test]
    fn test_parse_reference_rejections() {
        assert_eq!(
            Sequence::parse("1123", SequenceLength::Four),
            Err(ValidationError::DuplicateDigit { digit: Digit::D1 })
        );
        assert_eq!(
            Sequence::parse("12", SequenceLength::Four),
            Err(ValidationError::WrongLength {
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(
            Sequence::parse("abcd", SequenceLength::Four),
            Err(ValidationError::NonDigit {
                index: 0,
                found: 'a'
            })
        );
    }

    #[test]
    fn test_parse_first_failure_wins() {
        // Too long and repeated: length is checked first.
        assert!(matches!(
            Sequence::parse("11111", SequenceLength::Four),
            Err(ValidationError::WrongLength { .. })
        ));
        // Repeated digit before a non-digit: non-digit is still reported.
        assert!(matches!(
            Sequence::parse("11a2", SequenceLength::Four),
            Err(ValidationError::NonDigit { index: 2, .. })
        ));
        assert!(matches!(
            Sequence::parse("", SequenceLength::Two),
            Err(ValidationError::WrongLength { actual: 0, .. })
        ));
    }

    #[test]
    fn test_parse_counts_characters_not_bytes() {
        assert_eq!(
            Sequence::parse("1é", SequenceLength::Two),
            Err(ValidationError::NonDigit {
                index: 1,
                found: 'é'
            })
        );
    }

    #[test]
    fn test_from_str_infers_length() {
        let seq: Sequence = "582".parse().unwrap();
        assert_eq!(seq.length(), SequenceLength::Three);
        assert_eq!(
            "5".parse::<Sequence>(),
            Err(CoreError::UnsupportedLength(1))
        );
        assert_eq!(
            "12345".parse::<Sequence>(),
            Err(CoreError::UnsupportedLength(5))
        );
    }

    #[test]
    fn test_ascending() {
        assert_eq!(Sequence::ascending(SequenceLength::Three).to_string(), "012");
        assert_eq!(Sequence::ascending(SequenceLength::Four).to_string(), "0123");
    }

    #[test]
    fn test_serde_as_string() {
        let seq = Sequence::parse("9876", SequenceLength::Four).unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "\"9876\"");
        assert_eq!(serde_json::from_str::<Sequence>(&json).unwrap(), seq);
        assert!(serde_json::from_str::<Sequence>("\"9886\"").is_err());
        assert!(serde_json::from_str::<SequenceLength>("5").is_err());
        assert_eq!(
            serde_json::from_str::<SequenceLength>("3").unwrap(),
            SequenceLength::Three
        );
    }

    #[test]
    fn test_length_try_from() {
        assert_eq!(SequenceLength::try_from(2_u8), Ok(SequenceLength::Two));
        assert_eq!(
            SequenceLength::try_from(1_u8),
            Err(CoreError::UnsupportedLength(1))
        );
    }

    fn length_strategy() -> impl Strategy<Value = SequenceLength> {
        prop::sample::select(SequenceLength::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_validate_accepts_iff_well_formed(
            length in length_strategy(),
            input in "[0-9a-c]{0,6}",
        ) {
            let chars: Vec<char> = input.chars().collect();
            let well_formed = chars.len() == length.get()
                && chars.iter().all(char::is_ascii_digit)
                && chars.iter().collect::<std::collections::HashSet<_>>().len() == chars.len();

            match validate(&input, length) {
                Ok(seq) => {
                    prop_assert!(well_formed);
                    prop_assert_eq!(seq.to_string(), input);
                }
                Err(ValidationError::WrongLength { expected, actual }) => {
                    prop_assert!(!well_formed);
                    prop_assert_eq!(expected, length.get());
                    prop_assert_eq!(actual, chars.len());
                }
                Err(ValidationError::NonDigit { index, found }) => {
                    prop_assert!(!well_formed);
                    prop_assert_eq!(chars.len(), length.get());
                    prop_assert_eq!(chars[index], found);
                    prop_assert!(chars[..index].iter().all(char::is_ascii_digit));
                }
                Err(ValidationError::DuplicateDigit { digit }) => {
                    prop_assert!(!well_formed);
                    prop_assert!(chars.iter().all(char::is_ascii_digit));
                    prop_assert!(chars.iter().filter(|&&c| c == digit.to_char()).count() > 1);
                }
            }
        }
    }
}
