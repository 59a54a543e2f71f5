use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Length of identifiers produced by [`DocumentId::random`].
pub const ID_LENGTH: usize = 10;

/// Symbols used for generated identifiers: lowercase letters and digits.
pub const ID_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Upper bound for identifiers accepted from callers or seeded on disk.
pub const MAX_ID_LENGTH: usize = 64;

/// Opaque document identifier, also used as the storage key.
///
/// Accepted identifiers contain only lowercase ASCII letters, digits, `-`
/// and `_`, so they are always a plain file name inside the storage root,
/// never collide with a sidecar (`<id>.meta`) or a staging file, and never
/// alias another identifier on a case-insensitive filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() || raw.len() > MAX_ID_LENGTH {
            return Err(DomainError::invalid_input(format!(
                "identifier must be 1 to {MAX_ID_LENGTH} characters"
            )));
        }

        if !raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'_'))
        {
            return Err(DomainError::invalid_input(
                "identifier may only contain lowercase letters, digits, '-' and '_'",
            ));
        }

        Ok(Self(raw.to_string()))
    }

    /// Draws a fresh candidate uniformly from the identifier space.
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}
