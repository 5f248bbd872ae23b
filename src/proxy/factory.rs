//! The public entry point for requesting proxies.

use std::sync::OnceLock;

use crate::contract::Contract;
use crate::proxy::{ProxyBuilder, ProxyTypeCache};
use crate::Result;

/// Validates contracts, owns the descriptor cache, and hands out builders.
///
/// A factory owns exactly one [`ProxyTypeCache`]; which factory a component uses decides
/// which cache its descriptors live in. [`ProxyFactory::global`] is the process-wide
/// convenience instance; components that want an isolated or explicitly managed cache
/// construct their own with [`ProxyFactory::new`] or [`ProxyFactory::with_cache`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use interpose::ProxyFactory;
///
/// interpose::contract! {
///     pub trait Counter {
///         fn get(&self) -> u64;
///     }
/// }
///
/// struct Fixed;
///
/// impl Counter for Fixed {
///     fn get(&self) -> u64 {
///         7
///     }
/// }
///
/// # fn main() -> interpose::Result<()> {
/// let builder = ProxyFactory::global().create_proxy::<dyn Counter>()?;
/// let proxy = builder.create_instance(Arc::new(Fixed), []);
/// assert_eq!(proxy.get(), 7);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ProxyFactory {
    cache: ProxyTypeCache,
}

impl ProxyFactory {
    /// Creates a factory with its own empty descriptor cache.
    #[must_use]
    pub fn new() -> Self {
        ProxyFactory {
            cache: ProxyTypeCache::new(),
        }
    }

    /// Creates a factory around an explicitly constructed cache.
    #[must_use]
    pub fn with_cache(cache: ProxyTypeCache) -> Self {
        ProxyFactory { cache }
    }

    /// The process-wide factory, created lazily on first use.
    #[must_use]
    pub fn global() -> &'static ProxyFactory {
        static GLOBAL: OnceLock<ProxyFactory> = OnceLock::new();
        GLOBAL.get_or_init(ProxyFactory::new)
    }

    /// Requests a builder for contract `C`, synthesizing its descriptor on first use.
    ///
    /// Validation and synthesis happen once per distinct contract - concurrent first
    /// requests collapse to a single build - and every returned builder shares the cached
    /// descriptor.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedContract`](crate::Error::UnsupportedContract) when the
    /// contract's member table fails validation (possible for hand-written
    /// [`Contract`] backends; `contract!`-declared contracts validate by construction).
    pub fn create_proxy<C: Contract + ?Sized>(&self) -> Result<ProxyBuilder<C>> {
        Ok(ProxyBuilder::new(self.cache.obtain::<C>()?))
    }

    /// The descriptor cache this factory owns.
    #[must_use]
    pub fn cache(&self) -> &ProxyTypeCache {
        &self.cache
    }
}
