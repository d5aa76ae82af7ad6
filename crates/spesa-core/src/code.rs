//! List codes
//!
//! A list is identified by a short 6-character code that doubles as the
//! storage key suffix. The alphabet excludes visually ambiguous characters
//! (0/O, 1/I/l), leaving 33 symbols. Lookup is case-insensitive; codes are
//! always upper-cased internally.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in a list code
pub const CODE_LENGTH: usize = 6;

/// Characters allowed in a list code, excluding ambiguous 0/O/1/I/l
pub const CODE_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Errors from parsing a list code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// The code is not exactly six characters long
    #[error("List code must be {CODE_LENGTH} characters, got {0}")]
    WrongLength(usize),

    /// The code contains a character outside the safe alphabet
    #[error("List code contains invalid character '{0}'")]
    InvalidChar(char),
}

/// A validated 6-character list code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListCode(String);

impl ListCode {
    /// Generate a random code
    ///
    /// Each position is drawn uniformly from the safe alphabet. No
    /// uniqueness check happens here; `ListRegistry::create_list` retries
    /// on the (rare) collision with an existing list.
    pub fn generate() -> Self {
        let alphabet: Vec<char> = CODE_ALPHABET.chars().collect();
        let mut rng = rand::thread_rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        Self(code)
    }

    /// Parse user input into a code
    ///
    /// Trims whitespace and upper-cases before validating.
    pub fn parse(input: &str) -> Result<Self, CodeError> {
        let code = input.trim().to_uppercase();
        if code.chars().count() != CODE_LENGTH {
            return Err(CodeError::WrongLength(code.chars().count()));
        }
        if let Some(bad) = code.chars().find(|c| !CODE_ALPHABET.contains(*c)) {
            return Err(CodeError::InvalidChar(bad));
        }
        Ok(Self(code))
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backend key for this list's item collection
    pub fn list_key(&self) -> String {
        format!("spesa:lista:{}", self.0)
    }

    /// Backend key for this list's purchase-frequency history
    pub fn history_key(&self) -> String {
        format!("spesa:storico:{}", self.0)
    }
}

impl std::fmt::Display for ListCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ListCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ListCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ListCode> for String {
    fn from(code: ListCode) -> Self {
        code.0
    }
}
