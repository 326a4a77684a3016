//! `secure_id` generates statistically unique identifiers from cryptographically strong
//! randomness, backing the `secure-id` CLI binary.
//!
//! It provides:
//! - An ordered chain of randomness sources, probed on every call
//! - Direct UUID-v4 generation, with a 16-byte hex fallback
//! - A single failure mode when no secure source is available
//!
//! ```
//! let id = secure_id::generate()?;
//! assert_eq!(id.as_str().len(), 36);
//! # Ok::<(), secure_id::Error>(())
//! ```

/// Generator configuration (source order, fallback rendering).
pub mod config;
/// Hex and UUID-v4 text encodings of raw bytes.
pub mod encode;
/// The single error kind.
pub mod error;
/// Identifier generation.
pub mod id;
/// Randomness sources and their capabilities.
pub mod source;

pub use config::{FallbackFormat, GeneratorConfig, SourceKind};
pub use error::{Error, Result};
pub use id::{generate, Generated, Generator, Identifier, Origin, Tier};
pub use source::RandomSource;
