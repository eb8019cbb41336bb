//! Short code generation.
//!
//! Codes are drawn symbol by symbol from an alphabet using a cryptographically
//! secure entropy source. Uniqueness is not this module's concern: see
//! [`crate::application::services::Allocator`].

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::entities::{DEFAULT_ALPHABET, MAX_CODE_LENGTH, ShortCode};

/// The secure random source could not supply entropy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("secure random source unavailable: {0}")]
pub struct RandomSourceError(pub String);

/// Errors raised while configuring or running a [`CodeGenerator`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("code length must be between 1 and {MAX_CODE_LENGTH}, got {0}")]
    InvalidLength(usize),

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error(transparent)]
    RandomSource(#[from] RandomSourceError),
}

/// A source of cryptographically secure random bytes.
///
/// Implementations must fail rather than fall back to a weaker generator.
pub trait EntropySource: Send + Sync {
    /// Fills `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomSourceError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomSourceError> {
        getrandom::fill(buf).map_err(|e| RandomSourceError(e.to_string()))
    }
}

/// Generates fixed-length random codes from an alphabet.
///
/// Each position is an independent uniform draw. Bytes are mapped onto the
/// alphabet with rejection sampling so that no symbol is favoured when the
/// alphabet size does not divide 256.
#[derive(Clone)]
pub struct CodeGenerator {
    alphabet: Vec<u8>,
    length: usize,
    entropy: Arc<dyn EntropySource>,
}

impl CodeGenerator {
    /// Creates a generator over the default 62-symbol alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidLength`] if `length` is 0 or above
    /// [`MAX_CODE_LENGTH`].
    pub fn new(length: usize, entropy: Arc<dyn EntropySource>) -> Result<Self, GeneratorError> {
        Self::with_alphabet(DEFAULT_ALPHABET, length, entropy)
    }

    /// Creates a generator backed by the operating system CSPRNG.
    pub fn os(length: usize) -> Result<Self, GeneratorError> {
        Self::new(length, Arc::new(OsEntropy))
    }

    /// Creates a generator over a custom alphabet.
    ///
    /// The alphabet must hold between 2 and 256 distinct ASCII alphanumeric
    /// symbols so that every generated code is a valid [`ShortCode`].
    pub fn with_alphabet(
        alphabet: &[u8],
        length: usize,
        entropy: Arc<dyn EntropySource>,
    ) -> Result<Self, GeneratorError> {
        validate_length(length)?;

        if alphabet.len() < 2 || alphabet.len() > 256 {
            return Err(GeneratorError::InvalidAlphabet(format!(
                "expected 2..=256 symbols, got {}",
                alphabet.len()
            )));
        }

        if !alphabet.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(GeneratorError::InvalidAlphabet(
                "symbols must be ASCII letters or digits".to_string(),
            ));
        }

        let mut seen = [false; 256];
        for &b in alphabet {
            if std::mem::replace(&mut seen[b as usize], true) {
                return Err(GeneratorError::InvalidAlphabet(format!(
                    "duplicate symbol '{}'",
                    b as char
                )));
            }
        }

        Ok(Self {
            alphabet: alphabet.to_vec(),
            length,
            entropy,
        })
    }

    /// Configured code length.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    /// Generates a code of the configured length.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError`] if the entropy source fails.
    pub fn generate(&self) -> Result<ShortCode, RandomSourceError> {
        self.draw(self.length)
    }

    /// Generates a code of an explicit length.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidLength`] for out-of-range lengths and
    /// [`GeneratorError::RandomSource`] if the entropy source fails.
    pub fn generate_with_length(&self, length: usize) -> Result<ShortCode, GeneratorError> {
        validate_length(length)?;
        Ok(self.draw(length)?)
    }

    /// Draws until the code is not one of [`crate::domain::entities::RESERVED_CODES`].
    fn draw(&self, length: usize) -> Result<ShortCode, RandomSourceError> {
        loop {
            let code = self.draw_once(length)?;
            if !code.is_reserved() {
                return Ok(code);
            }
            debug!(code = %code, "discarding reserved short code");
        }
    }

    fn draw_once(&self, length: usize) -> Result<ShortCode, RandomSourceError> {
        let size = self.alphabet.len();
        // Largest multiple of `size` that fits in a byte's range.
        let limit = 256 - (256 % size);

        let mut code = String::with_capacity(length);
        let mut buffer = vec![0u8; length];

        while code.len() < length {
            let missing = length - code.len();
            let chunk = &mut buffer[..missing];
            self.entropy.fill(chunk)?;

            for &byte in chunk.iter() {
                let value = byte as usize;
                if value < limit {
                    code.push(self.alphabet[value % size] as char);
                }
            }
        }

        Ok(ShortCode::new_unchecked(code))
    }
}

fn validate_length(length: usize) -> Result<(), GeneratorError> {
    if length == 0 || length > MAX_CODE_LENGTH {
        return Err(GeneratorError::InvalidLength(length));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingEntropy, ScriptedEntropy};
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_generate_has_configured_length() {
        let generator = CodeGenerator::os(6).unwrap();
        let code = generator.generate().unwrap();
        assert_eq!(code.len(), 6);
    }

    #[test]
    fn test_generate_every_length_uses_alphabet() {
        let generator = CodeGenerator::os(6).unwrap();

        for length in 1..=MAX_CODE_LENGTH {
            let code = generator.generate_with_length(length).unwrap();
            assert_eq!(code.len(), length);
            assert!(
                code.as_str().bytes().all(|b| DEFAULT_ALPHABET.contains(&b)),
                "unexpected symbol in {code}"
            );
        }
    }

    #[test]
    fn test_reserved_code_is_redrawn() {
        let entropy = ScriptedEntropy::from_codes(&["shorten", "abcdefg"]);
        let generator = CodeGenerator::new(7, Arc::new(entropy)).unwrap();

        assert_eq!(generator.generate().unwrap().as_str(), "abcdefg");
    }

    #[test]
    fn test_zero_length_rejected() {
        assert_eq!(
            CodeGenerator::os(0).err(),
            Some(GeneratorError::InvalidLength(0))
        );

        let generator = CodeGenerator::os(6).unwrap();
        assert_eq!(
            generator.generate_with_length(0).unwrap_err(),
            GeneratorError::InvalidLength(0)
        );
    }

    #[test]
    fn test_too_long_rejected() {
        assert!(matches!(
            CodeGenerator::os(MAX_CODE_LENGTH + 1),
            Err(GeneratorError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_custom_alphabet() {
        let generator = CodeGenerator::with_alphabet(b"ab", 16, Arc::new(OsEntropy)).unwrap();
        let code = generator.generate().unwrap();
        assert_eq!(code.len(), 16);
        assert!(code.as_str().bytes().all(|b| b == b'a' || b == b'b'));
    }

    #[test]
    fn test_invalid_alphabets_rejected() {
        let entropy: Arc<dyn EntropySource> = Arc::new(OsEntropy);

        assert!(matches!(
            CodeGenerator::with_alphabet(b"a", 6, entropy.clone()),
            Err(GeneratorError::InvalidAlphabet(_))
        ));
        assert!(matches!(
            CodeGenerator::with_alphabet(b"abca", 6, entropy.clone()),
            Err(GeneratorError::InvalidAlphabet(_))
        ));
        assert!(matches!(
            CodeGenerator::with_alphabet(b"ab-", 6, entropy),
            Err(GeneratorError::InvalidAlphabet(_))
        ));
    }

    #[test]
    fn test_biased_bytes_are_rejected() {
        // 248..=255 would over-weight the first eight symbols, so they are skipped.
        let entropy = ScriptedEntropy::new([248, 255, 0, 61, 62, 247]);
        let generator = CodeGenerator::new(4, Arc::new(entropy)).unwrap();

        let code = generator.generate().unwrap();
        assert_eq!(code.as_str(), "0z0z");
    }

    #[test]
    fn test_scripted_codes_replay_in_order() {
        let entropy = ScriptedEntropy::from_codes(&["abc123", "ZZZZZZ"]);
        let generator = CodeGenerator::new(6, Arc::new(entropy)).unwrap();

        assert_eq!(generator.generate().unwrap().as_str(), "abc123");
        assert_eq!(generator.generate().unwrap().as_str(), "ZZZZZZ");
        assert!(generator.generate().is_err());
    }

    #[test]
    fn test_random_source_failure_is_reported() {
        let generator = CodeGenerator::new(6, Arc::new(FailingEntropy)).unwrap();

        let err = generator.generate().unwrap_err();
        assert!(err.to_string().contains("entropy pool closed"));

        assert!(matches!(
            generator.generate_with_length(3),
            Err(GeneratorError::RandomSource(_))
        ));
    }

    #[test]
    fn test_collision_rate_matches_uniform_sampling() {
        // 10k draws over 62^6 codes: expected colliding pairs is about 0.0009.
        let generator = CodeGenerator::os(6).unwrap();
        let mut seen = HashSet::new();
        let mut collisions = 0;

        for _ in 0..10_000 {
            if !seen.insert(generator.generate().unwrap()) {
                collisions += 1;
            }
        }

        assert!(collisions <= 2, "too many collisions: {collisions}");
    }

    #[test]
    fn test_symbol_frequencies_are_uniform() {
        let generator = CodeGenerator::os(6).unwrap();
        let mut counts: HashMap<u8, usize> = HashMap::new();

        for _ in 0..10_000 {
            for b in generator.generate().unwrap().as_str().bytes() {
                *counts.entry(b).or_default() += 1;
            }
        }

        // 60k symbols over 62 buckets: ~968 each, standard deviation ~31.
        let expected = 60_000 / 62;
        assert_eq!(counts.len(), 62);
        for (symbol, count) in counts {
            assert!(
                count.abs_diff(expected) < expected / 4,
                "symbol '{}' drawn {count} times",
                symbol as char
            );
        }
    }
}
