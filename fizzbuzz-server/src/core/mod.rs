pub mod error;
pub mod sequence;
pub mod types;

pub use error::{FizzBuzzError, Result};
pub use sequence::SequenceEngine;
pub use types::{FrequencyEntry, KEY_DELIMITER, ParameterKey};
