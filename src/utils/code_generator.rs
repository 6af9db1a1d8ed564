//! Short code generation.
//!
//! Codes are fixed-length strings drawn uniformly from a URL-safe alphabet.
//! Generation does not guarantee uniqueness: the storage layer enforces it
//! and the shortening service retries on collision.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Default code length.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Upper bound on code length, matching the `urls.short_code` column width.
pub const MAX_CODE_LENGTH: usize = 10;

/// Lower bound on code length.
pub const MIN_CODE_LENGTH: usize = 4;

/// The default base62 alphabet.
pub const BASE62_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Errors raised while building a generator from configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodeGeneratorError {
    #[error("alphabet must contain at least 2 characters, got {0}")]
    AlphabetTooSmall(usize),

    #[error("alphabet contains a character that is not URL-safe: {0:?}")]
    UnsafeCharacter(char),

    #[error("alphabet contains duplicate character {0:?}")]
    DuplicateCharacter(char),

    #[error("code length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH}, got {0}")]
    InvalidLength(usize),
}

/// Produces candidate short codes.
///
/// Implementations are pure generators and never touch storage.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Returns a new candidate code.
    fn generate(&self) -> String;

    /// Length of every code this generator produces.
    fn code_length(&self) -> usize;

    /// Characters a generated code may contain.
    fn alphabet(&self) -> &str;
}

/// A validated set of distinct URL-safe ASCII characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAlphabet {
    chars: Vec<u8>,
}

impl CodeAlphabet {
    /// Builds an alphabet from `symbols`.
    ///
    /// Allowed characters are `A-Z`, `a-z`, `0-9`, `-` and `_`.
    pub fn new(symbols: &str) -> Result<Self, CodeGeneratorError> {
        let mut chars: Vec<u8> = Vec::with_capacity(symbols.len());

        for c in symbols.chars() {
            if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(CodeGeneratorError::UnsafeCharacter(c));
            }
            let b = c as u8;
            if chars.contains(&b) {
                return Err(CodeGeneratorError::DuplicateCharacter(c));
            }
            chars.push(b);
        }

        if chars.len() < 2 {
            return Err(CodeGeneratorError::AlphabetTooSmall(chars.len()));
        }

        Ok(Self { chars })
    }

    pub fn base62() -> Self {
        Self {
            chars: BASE62_ALPHABET.as_bytes().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever pushed in `new`.
        std::str::from_utf8(&self.chars).unwrap_or_default()
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.chars.contains(&(c as u8))
    }
}

impl Default for CodeAlphabet {
    fn default() -> Self {
        Self::base62()
    }
}

enum Entropy {
    /// Thread-local OS-seeded generator, fetched on every call.
    Thread,
    /// Deterministic stream for reproducible runs.
    Seeded(Mutex<StdRng>),
}

/// Random fixed-length code generator.
///
/// The default instance holds no RNG state of its own; every call draws from
/// `rand::rng()`. [`RandomCodeGenerator::seeded`] gives a reproducible
/// sequence instead.
pub struct RandomCodeGenerator {
    alphabet: CodeAlphabet,
    length: usize,
    entropy: Entropy,
}

impl RandomCodeGenerator {
    /// Creates a generator producing `length`-character codes from `alphabet`.
    pub fn new(alphabet: CodeAlphabet, length: usize) -> Result<Self, CodeGeneratorError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(CodeGeneratorError::InvalidLength(length));
        }

        Ok(Self {
            alphabet,
            length,
            entropy: Entropy::Thread,
        })
    }

    /// Same as [`RandomCodeGenerator::new`] but driven by a seeded `StdRng`.
    pub fn seeded(
        alphabet: CodeAlphabet,
        length: usize,
        seed: u64,
    ) -> Result<Self, CodeGeneratorError> {
        let mut generator = Self::new(alphabet, length)?;
        generator.entropy = Entropy::Seeded(Mutex::new(StdRng::seed_from_u64(seed)));
        Ok(generator)
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let chars = &self.alphabet.chars;
        (0..self.length)
            .map(|_| chars[rng.random_range(0..chars.len())] as char)
            .collect()
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: CodeAlphabet::base62(),
            length: DEFAULT_CODE_LENGTH,
            entropy: Entropy::Thread,
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        match &self.entropy {
            Entropy::Thread => self.draw(&mut rand::rng()),
            Entropy::Seeded(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                self.draw(&mut *rng)
            }
        }
    }

    fn code_length(&self) -> usize {
        self.length
    }

    fn alphabet(&self) -> &str {
        self.alphabet.as_str()
    }
}
