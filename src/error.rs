//! Error type for identifier generation.

use std::fmt;

/// Result type for identifier generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating an identifier.
///
/// When no cryptographic source answers, the caller gets this error and nothing weaker is tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No configured source exposed a direct UUID or byte-filling capability.
    RandomSourceUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomSourceUnavailable => f.write_str("Secure random generator unavailable"),
        }
    }
}

impl std::error::Error for Error {}
