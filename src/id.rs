//! Identifier generation over an ordered chain of randomness sources.
//!
//! Selection per call, first match wins:
//! 1. each source's direct UUID capability, in chain order (returned unmodified)
//! 2. each source's byte filler, in chain order, over a fresh 16-byte buffer
//! 3. [`Error::RandomSourceUnavailable`]
//!
//! Nothing is retried and no non-cryptographic fallback exists.

use crate::config::FallbackFormat;
use crate::encode::{self, ID_BYTES};
use crate::error::{Error, Result};
use crate::source::{OsSource, RandomSource, ThreadRngSource};
use serde::Serialize;
use std::fmt;

/// An opaque identifier; owned by the caller and never reused by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the identifier text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

/// Which capability produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// A source's direct UUID generator.
    DirectUuid,
    /// A source's byte filler, encoded per [`FallbackFormat`].
    FilledBytes,
}

/// Where an identifier came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    /// Name of the source that answered.
    pub source: String,
    /// Capability used.
    pub tier: Tier,
}

/// An identifier together with its [`Origin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// The identifier.
    pub id: Identifier,
    /// Source and capability that produced it.
    #[serde(flatten)]
    pub origin: Origin,
}

/// Stateless identifier generator over an ordered source chain (index 0 is the primary).
pub struct Generator {
    sources: Vec<Box<dyn RandomSource>>,
    fallback_format: FallbackFormat,
}

impl Generator {
    /// Build a generator that consults `sources` in order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn RandomSource>>) -> Self {
        Self {
            sources,
            fallback_format: FallbackFormat::default(),
        }
    }

    /// Choose how byte-filled identifiers are rendered.
    #[must_use]
    pub fn with_fallback_format(mut self, format: FallbackFormat) -> Self {
        self.fallback_format = format;
        self
    }

    /// How byte-filled identifiers are rendered.
    #[must_use]
    pub const fn fallback_format(&self) -> FallbackFormat {
        self.fallback_format
    }

    /// Source names in priority order.
    pub fn source_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.iter().map(|s| s.name())
    }

    /// Generate a fresh identifier.
    ///
    /// # Errors
    /// Returns [`Error::RandomSourceUnavailable`] when no source exposes either capability.
    pub fn generate(&self) -> Result<Identifier> {
        self.generate_with_origin().map(|g| g.id)
    }

    /// Generate a fresh identifier and report which source and capability produced it.
    ///
    /// # Errors
    /// Returns [`Error::RandomSourceUnavailable`] when no source exposes either capability.
    pub fn generate_with_origin(&self) -> Result<Generated> {
        for source in &self.sources {
            if let Some(uuid) = source.random_uuid() {
                tracing::debug!(source = source.name(), "identifier from direct uuid");
                return Ok(Generated {
                    id: Identifier(uuid),
                    origin: Origin {
                        source: source.name().to_string(),
                        tier: Tier::DirectUuid,
                    },
                });
            }
        }

        for source in &self.sources {
            let mut raw = [0_u8; ID_BYTES];
            if source.fill_random(&mut raw) {
                tracing::debug!(
                    source = source.name(),
                    format = ?self.fallback_format,
                    "identifier from filled bytes"
                );
                let text = match self.fallback_format {
                    FallbackFormat::RawHex => encode::lower_hex(&raw),
                    FallbackFormat::UuidV4 => encode::uuid_v4(raw),
                };
                return Ok(Generated {
                    id: Identifier(text),
                    origin: Origin {
                        source: source.name().to_string(),
                        tier: Tier::FilledBytes,
                    },
                });
            }
        }

        tracing::error!(sources = self.sources.len(), "no secure random source available");
        Err(Error::RandomSourceUnavailable)
    }
}

impl Default for Generator {
    /// OS entropy first, then the thread-local CSPRNG.
    fn default() -> Self {
        Self::new(vec![Box::new(OsSource), Box::new(ThreadRngSource)])
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("sources", &self.source_names().collect::<Vec<_>>())
            .field("fallback_format", &self.fallback_format)
            .finish()
    }
}

/// Generate an identifier with [`Generator::default`].
///
/// # Errors
/// Returns [`Error::RandomSourceUnavailable`] when neither OS entropy nor the thread RNG answers.
pub fn generate() -> Result<Identifier> {
    Generator::default().generate()
}
