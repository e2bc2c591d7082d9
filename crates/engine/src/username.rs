//! Dashboard owner names.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

const MAX_LEN: usize = 64;

/// A validated dashboard owner (a single user or a group account).
///
/// Usernames are trimmed and NFC-normalized, 1 to 64 characters long, and
/// only contain letters, digits, `_`, `-` or `.`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> ResultEngine<Self> {
        let normalized: String = raw.trim().nfc().collect();
        if normalized.is_empty() {
            return Err(EngineError::InvalidUsername(
                "username must not be empty".to_string(),
            ));
        }
        if normalized.chars().count() > MAX_LEN {
            return Err(EngineError::InvalidUsername(format!(
                "username must be at most {MAX_LEN} characters"
            )));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(EngineError::InvalidUsername(format!(
                "unexpected character {bad:?}"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
