use super::error::{FizzBuzzError, Result};
use std::fmt;

/// Delimiter used by the canonical key encoding
pub const KEY_DELIMITER: char = ',';

/// Identity of a FizzBuzz request shape, used for caching and hit counting
///
/// The canonical encoding joins the five fields with [`KEY_DELIMITER`] in
/// declaration order. Words are taken verbatim, so words containing the
/// delimiter can produce colliding keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterKey {
    pub first_divisor: i64,
    pub second_divisor: i64,
    pub limit: i64,
    pub first_word: String,
    pub second_word: String,
}

impl ParameterKey {
    /// Create a new parameter key
    pub fn new(
        first_divisor: i64,
        second_divisor: i64,
        limit: i64,
        first_word: impl Into<String>,
        second_word: impl Into<String>,
    ) -> Self {
        Self {
            first_divisor,
            second_divisor,
            limit,
            first_word: first_word.into(),
            second_word: second_word.into(),
        }
    }

    /// Canonical flat string form, e.g. `3,5,15,Fizz,Buzz`
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Parse a canonical string back into a key
    ///
    /// Only the first four delimiters split fields; anything after the fourth
    /// belongs to the second word.
    pub fn parse(encoded: &str) -> Result<Self> {
        let mut parts = encoded.splitn(5, KEY_DELIMITER);
        let mut next_field = |name: &str| {
            parts.next().ok_or_else(|| {
                FizzBuzzError::CorruptEntry(format!("missing {} in key '{}'", name, encoded))
            })
        };

        let first_divisor = parse_int(next_field("int1")?, "int1", encoded)?;
        let second_divisor = parse_int(next_field("int2")?, "int2", encoded)?;
        let limit = parse_int(next_field("limit")?, "limit", encoded)?;
        let first_word = next_field("str1")?.to_string();
        let second_word = next_field("str2")?.to_string();

        Ok(Self {
            first_divisor,
            second_divisor,
            limit,
            first_word,
            second_word,
        })
    }
}

fn parse_int(raw: &str, name: &str, encoded: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|e| {
        FizzBuzzError::CorruptEntry(format!("failed to parse {} in key '{}': {}", name, encoded, e))
    })
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.first_divisor,
            self.second_divisor,
            self.limit,
            self.first_word,
            self.second_word,
            d = KEY_DELIMITER
        )
    }
}

/// Hit count recorded for a parameter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub key: ParameterKey,
    pub hits: u64,
}

impl FrequencyEntry {
    pub fn new(key: ParameterKey, hits: u64) -> Self {
        Self { key, hits }
    }
}
