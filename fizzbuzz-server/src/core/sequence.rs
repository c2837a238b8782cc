//! Generalized FizzBuzz sequence computation
//!
//! Pure, stateless and safe to share between any number of tasks.

use super::error::{FizzBuzzError, Result};
use std::fmt::Write;

/// Separator between tokens of a sequence
const TOKEN_SEPARATOR: char = ',';

/// Computes generalized FizzBuzz sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceEngine;

impl SequenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Reject non-positive divisors or limit
    pub fn validate(first_divisor: i64, second_divisor: i64, limit: i64) -> Result<()> {
        if first_divisor <= 0 || second_divisor <= 0 || limit <= 0 {
            return Err(FizzBuzzError::InvalidParameters(format!(
                "int1, int2 and limit must be greater than zero (got int1={}, int2={}, limit={})",
                first_divisor, second_divisor, limit
            )));
        }
        Ok(())
    }

    /// Produce the comma-joined token sequence for positions `1..=limit`
    ///
    /// Multiples of both divisors yield `first_word` followed by `second_word`,
    /// multiples of one divisor yield that divisor's word, everything else
    /// yields the decimal position. Equal divisors combine at multiples of the
    /// single value rather than its square.
    pub fn calculate(
        &self,
        first_divisor: i64,
        second_divisor: i64,
        limit: i64,
        first_word: &str,
        second_word: &str,
    ) -> Result<String> {
        Self::validate(first_divisor, second_divisor, limit)?;

        // An overflowing product is larger than any reachable position
        let combined = if first_divisor == second_divisor {
            Some(first_divisor)
        } else {
            first_divisor.checked_mul(second_divisor)
        };

        let mut out = String::with_capacity(estimate_capacity(limit, first_word, second_word));
        for i in 1..=limit {
            if i > 1 {
                out.push(TOKEN_SEPARATOR);
            }

            if combined.is_some_and(|both| i % both == 0) {
                out.push_str(first_word);
                out.push_str(second_word);
            } else if i % first_divisor == 0 {
                out.push_str(first_word);
            } else if i % second_divisor == 0 {
                out.push_str(second_word);
            } else {
                // Writing into a String cannot fail
                let _ = write!(out, "{}", i);
            }
        }

        Ok(out)
    }
}

/// Rough upper bound for the output size, capped to avoid huge upfront allocations
fn estimate_capacity(limit: i64, first_word: &str, second_word: &str) -> usize {
    const MAX_PREALLOC: usize = 16 * 1024 * 1024;

    let digits = limit.unsigned_abs().to_string().len();
    let per_token = digits.max(first_word.len() + second_word.len()) + 1;
    usize::try_from(limit)
        .unwrap_or(usize::MAX)
        .saturating_mul(per_token)
        .min(MAX_PREALLOC)
}
