//! Generator configuration: which sources to consult, in what order, and how to render
//! byte-filled identifiers.
//!
//! Configuration is plain JSON (see [`GeneratorConfig::load`]); every field is optional.

use crate::id::Generator;
use crate::source::{FillOnly, OsSource, RandomSource, ThreadRngSource};
use anyhow::Context;
use clap::builder::PossibleValue;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// A built-in randomness source.
pub enum SourceKind {
    /// Operating-system entropy.
    Os,
    /// Thread-local userspace CSPRNG seeded from the OS.
    Thread,
}

impl SourceKind {
    /// Instantiate the source.
    #[must_use]
    pub fn build(self) -> Box<dyn RandomSource> {
        match self {
            Self::Os => Box::new(OsSource),
            Self::Thread => Box::new(ThreadRngSource),
        }
    }
}

impl ValueEnum for SourceKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Os, Self::Thread]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let pv = match self {
            Self::Os => PossibleValue::new("os").help("Operating-system entropy"),
            Self::Thread => PossibleValue::new("thread").help("Thread-local CSPRNG"),
        };
        Some(pv)
    }
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("os") => Ok(Self::Os),
            s if s.eq_ignore_ascii_case("thread") => Ok(Self::Thread),
            _ => Err(anyhow::anyhow!("invalid SourceKind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Rendering of identifiers produced from filled bytes.
///
/// Direct UUID results are never rewritten; this only affects the byte-filling tier.
pub enum FallbackFormat {
    /// 32 lowercase hex characters, bytes encoded as-is (no version/variant bits).
    #[default]
    RawHex,
    /// Canonical UUID-v4 text with version and variant bits forced.
    UuidV4,
}

impl ValueEnum for FallbackFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::RawHex, Self::UuidV4]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let pv = match self {
            Self::RawHex => PossibleValue::new("raw-hex").help("32 lowercase hex chars"),
            Self::UuidV4 => PossibleValue::new("uuid-v4").help("Hyphenated UUID-v4 text"),
        };
        Some(pv)
    }
}

impl std::str::FromStr for FallbackFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("raw-hex") => Ok(Self::RawHex),
            s if s.eq_ignore_ascii_case("uuid-v4") => Ok(Self::UuidV4),
            _ => Err(anyhow::anyhow!("invalid FallbackFormat: {s}")),
        }
    }
}

/// Settings used to build a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Sources in priority order; the first is the primary.
    pub sources: Vec<SourceKind>,
    /// Whether sources may answer with their direct UUID capability.
    pub direct_uuid: bool,
    /// Rendering of byte-filled identifiers.
    pub fallback_format: FallbackFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sources: vec![SourceKind::Os, SourceKind::Thread],
            direct_uuid: true,
            fallback_format: FallbackFormat::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
    }

    /// Build the generator described by this config.
    ///
    /// An empty source list is allowed; such a generator always fails with
    /// [`crate::Error::RandomSourceUnavailable`].
    #[must_use]
    pub fn build(&self) -> Generator {
        let sources = self
            .sources
            .iter()
            .map(|kind| {
                let source = kind.build();
                if self.direct_uuid {
                    source
                } else {
                    Box::new(FillOnly(source)) as Box<dyn RandomSource>
                }
            })
            .collect();
        Generator::new(sources).with_fallback_format(self.fallback_format)
    }
}
