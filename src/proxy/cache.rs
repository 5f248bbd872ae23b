//! The process-lifetime cache of generated proxy descriptors.
//!
//! Descriptor synthesis runs at most once per contract; afterwards every builder and
//! proxy instance shares the same [`ProxyDescriptor`]. The cache is the *only* shared
//! mutable state in the engine, and the check-and-insert during first use is its only
//! synchronization point - once a contract is populated, creating instances and
//! dispatching members take no lock at all.
//!
//! # Thread Safety
//!
//! Backed by a [`DashMap`] keyed by contract identity. First use goes through the
//! entry API, so concurrent first requests for the *same* contract serialize on its
//! shard and collapse to a single surviving descriptor, while contracts on other shards
//! build independently. An atomic counter records how many descriptors were ever
//! synthesized - the observable probe that cached contracts are not rebuilt.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::debug;

use crate::contract::{Contract, ProxyDescriptor};
use crate::Result;

/// Mapping from contract identity to its generated [`ProxyDescriptor`].
///
/// Write-once per key; populated lazily, never evicted. A cache is normally owned by a
/// [`ProxyFactory`](crate::proxy::ProxyFactory) - the process-global factory's cache is
/// the convenience default, an explicitly constructed factory keeps its descriptors
/// private.
#[derive(Debug, Default)]
pub struct ProxyTypeCache {
    descriptors: DashMap<TypeId, Arc<ProxyDescriptor>>,
    builds: AtomicUsize,
}

impl ProxyTypeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        ProxyTypeCache {
            descriptors: DashMap::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Returns the descriptor for `C`, synthesizing and registering it on first use.
    ///
    /// Concurrent first requests for the same contract collapse to one build; later
    /// requests are lock-free reads of the shared descriptor.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedContract`](crate::Error::UnsupportedContract) when the
    /// contract's member table fails validation. Failed contracts are not cached, so
    /// the error is reported to every caller that requests them.
    pub fn obtain<C: Contract + ?Sized>(&self) -> Result<Arc<ProxyDescriptor>> {
        let key = TypeId::of::<C>();

        if let Some(descriptor) = self.descriptors.get(&key) {
            return Ok(Arc::clone(&descriptor));
        }

        match self.descriptors.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let descriptor = Arc::new(ProxyDescriptor::build::<C>()?);
                self.builds.fetch_add(1, Ordering::Relaxed);
                debug!(
                    contract = descriptor.name(),
                    members = descriptor.members().len(),
                    "synthesized proxy descriptor"
                );
                entry.insert(Arc::clone(&descriptor));
                Ok(descriptor)
            }
        }
    }

    /// Whether a descriptor for `C` has been registered.
    #[must_use]
    pub fn contains<C: Contract + ?Sized>(&self) -> bool {
        self.descriptors.contains_key(&TypeId::of::<C>())
    }

    /// Number of contracts with a registered descriptor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no descriptor has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// How many descriptors this cache has ever synthesized.
    ///
    /// Stays at one per contract no matter how many builders were requested - the
    /// build-count probe used to verify descriptor reuse.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}
