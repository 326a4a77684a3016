//! Randomness capabilities that identifier generation can draw from.
//!
//! A [`RandomSource`] may expose two optional capabilities:
//! - a direct UUID generator producing canonical UUID-v4 text
//! - a byte filler writing cryptographically strong bytes into a caller buffer
//!
//! Availability is answered by the call itself (`None` / `false`), so every generation re-probes
//! the source and nothing about a previous call is remembered.

use crate::encode::{self, ID_BYTES};
use rand::{CryptoRng, RngCore};
use std::fmt;
use std::sync::Mutex;

/// A provider of cryptographically strong randomness.
///
/// Both capabilities default to "absent"; implementors override the ones they support.
pub trait RandomSource: Send + Sync {
    /// Short, stable label for logs and CLI output.
    fn name(&self) -> &str;

    /// Generate canonical UUID-v4 text, or `None` when the capability is currently absent.
    fn random_uuid(&self) -> Option<String> {
        None
    }

    /// Fill `dest` with secure random bytes.
    ///
    /// Returns `false` when the capability is currently absent; `dest` must then be ignored.
    fn fill_random(&self, _dest: &mut [u8]) -> bool {
        false
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn random_uuid(&self) -> Option<String> {
        (**self).random_uuid()
    }

    fn fill_random(&self, dest: &mut [u8]) -> bool {
        (**self).fill_random(dest)
    }
}

fn uuid_from_filler<S: RandomSource + ?Sized>(source: &S) -> Option<String> {
    let mut raw = [0_u8; ID_BYTES];
    source.fill_random(&mut raw).then(|| encode::uuid_v4(raw))
}

/// Operating-system entropy (`rand::rngs::OsRng`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSource;

impl RandomSource for OsSource {
    fn name(&self) -> &str {
        "os"
    }

    fn random_uuid(&self) -> Option<String> {
        uuid_from_filler(self)
    }

    fn fill_random(&self, dest: &mut [u8]) -> bool {
        match rand::rngs::OsRng.try_fill_bytes(dest) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(source = "os", error = %err, "read OS randomness failed");
                false
            }
        }
    }
}

/// The thread-local userspace CSPRNG (`rand::thread_rng`), reseeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn name(&self) -> &str {
        "thread"
    }

    fn random_uuid(&self) -> Option<String> {
        uuid_from_filler(self)
    }

    fn fill_random(&self, dest: &mut [u8]) -> bool {
        match rand::thread_rng().try_fill_bytes(dest) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(source = "thread", error = %err, "read thread RNG failed");
                false
            }
        }
    }
}

/// Adapts any generator marked [`CryptoRng`] into a byte-filling source.
///
/// Generators without the marker do not satisfy the bound, so a non-cryptographic PRNG cannot
/// be plugged in here.
pub struct CryptoRngSource<R> {
    name: String,
    rng: Mutex<R>,
}

impl<R: RngCore + CryptoRng + Send> CryptoRngSource<R> {
    /// Wrap `rng` under the label `name`.
    pub fn new(name: impl Into<String>, rng: R) -> Self {
        Self {
            name: name.into(),
            rng: Mutex::new(rng),
        }
    }
}

impl<R> fmt::Debug for CryptoRngSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoRngSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<R: RngCore + CryptoRng + Send> RandomSource for CryptoRngSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fill_random(&self, dest: &mut [u8]) -> bool {
        let Ok(mut rng) = self.rng.lock() else {
            tracing::warn!(source = %self.name, "rng lock poisoned");
            return false;
        };
        match rng.try_fill_bytes(dest) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(source = %self.name, error = %err, "rng fill failed");
                false
            }
        }
    }
}

/// Hides the direct UUID capability of `S`, forwarding only byte filling.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillOnly<S>(pub S);

impl<S: RandomSource> RandomSource for FillOnly<S> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn fill_random(&self, dest: &mut [u8]) -> bool {
        self.0.fill_random(dest)
    }
}

type UuidFn = Box<dyn Fn() -> String + Send + Sync>;
type FillFn = Box<dyn Fn(&mut [u8]) + Send + Sync>;

/// A source assembled from optional closures, for injecting platform capabilities.
///
/// ```
/// use secure_id::source::{CapabilitySet, RandomSource};
///
/// let source = CapabilitySet::new("fixed").with_fill_random(|buf: &mut [u8]| buf.fill(7));
/// let mut buf = [0_u8; 4];
/// assert!(source.fill_random(&mut buf));
/// assert_eq!(buf, [7; 4]);
/// assert!(source.random_uuid().is_none());
/// ```
pub struct CapabilitySet {
    name: String,
    random_uuid: Option<UuidFn>,
    fill_random: Option<FillFn>,
}

impl CapabilitySet {
    /// A source named `name` with no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            random_uuid: None,
            fill_random: None,
        }
    }

    /// Install a direct UUID capability.
    #[must_use]
    pub fn with_random_uuid(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.random_uuid = Some(Box::new(f));
        self
    }

    /// Install a byte-filling capability.
    #[must_use]
    pub fn with_fill_random(mut self, f: impl Fn(&mut [u8]) + Send + Sync + 'static) -> Self {
        self.fill_random = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitySet")
            .field("name", &self.name)
            .field("random_uuid", &self.random_uuid.is_some())
            .field("fill_random", &self.fill_random.is_some())
            .finish()
    }
}

impl RandomSource for CapabilitySet {
    fn name(&self) -> &str {
        &self.name
    }

    fn random_uuid(&self) -> Option<String> {
        self.random_uuid.as_ref().map(|f| f())
    }

    fn fill_random(&self, dest: &mut [u8]) -> bool {
        let Some(fill) = &self.fill_random else {
            return false;
        };
        fill(dest);
        true
    }
}
