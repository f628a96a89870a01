use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// Error returned when parsing a [`SecretSeed`] from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SecretSeedError {
    /// The text is not exactly 64 characters long.
    #[display("seed must be 64 hex characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    /// A character is not a hexadecimal digit.
    #[display("invalid hex character at position {_0}")]
    InvalidHex(#[error(not(source))] usize),
}

/// A 256-bit seed for [`SecretGenerator`](crate::SecretGenerator).
///
/// Seeds are displayed and parsed as 64 lowercase hexadecimal characters.
///
/// ```
/// use codebreak_generator::SecretSeed;
///
/// let seed: SecretSeed = "00".repeat(32).parse()?;
/// assert_eq!(seed.to_string(), "00".repeat(32));
/// assert_ne!(seed.derive("cpu"), seed.derive("timeout"));
/// # Ok::<(), codebreak_generator::SecretSeedError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretSeed([u8; 32]);

impl SecretSeed {
    /// Draws a seed from the operating system backed thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    /// Wraps raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Derives an independent seed for the sub-stream named `label`.
    ///
    /// The derived seed is `SHA-256(seed || label)`, so distinct labels give
    /// unrelated streams while staying reproducible from the parent seed.
    #[must_use]
    pub fn derive(&self, label: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(self.0)
            .chain_update(label.as_bytes())
            .finalize();
        let mut bytes = [0; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretSeed({self})")
    }
}

impl fmt::Display for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for SecretSeed {
    type Err = SecretSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(SecretSeedError::InvalidLength(s.len()));
        }
        if let Some(pos) = s.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(SecretSeedError::InvalidHex(pos));
        }
        let mut bytes = [0; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = s
                .get(i * 2..i * 2 + 2)
                .ok_or(SecretSeedError::InvalidHex(i * 2))?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| SecretSeedError::InvalidHex(i * 2))?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for SecretSeed {
    type Error = SecretSeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SecretSeed> for String {
    fn from(seed: SecretSeed) -> String {
        seed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_round_trip() {
        let seed = SecretSeed::from_bytes(std::array::from_fn(|i| u8::try_from(i * 7).unwrap()));
        let text = seed.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<SecretSeed>(), Ok(seed));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<SecretSeed>(),
            Err(SecretSeedError::InvalidLength(3))
        );
        let mut text = "0".repeat(64);
        text.replace_range(10..11, "g");
        assert_eq!(
            text.parse::<SecretSeed>(),
            Err(SecretSeedError::InvalidHex(10))
        );
        // Multi-byte characters never split a pair silently.
        let text = format!("é{}", "0".repeat(62));
        assert_eq!(text.parse::<SecretSeed>(), Err(SecretSeedError::InvalidHex(0)));
        let text = "+f".repeat(32);
        assert_eq!(text.parse::<SecretSeed>(), Err(SecretSeedError::InvalidHex(0)));
    }

    #[test]
    fn test_derive_is_deterministic_and_label_sensitive() {
        let seed = SecretSeed::from_bytes([42; 32]);
        assert_eq!(seed.derive("cpu"), seed.derive("cpu"));
        assert_ne!(seed.derive("cpu"), seed.derive("cpu-1"));
        assert_ne!(seed.derive("cpu"), seed);
    }

    #[test]
    fn test_random_seeds_differ() {
        assert_ne!(SecretSeed::random(), SecretSeed::random());
    }
}
