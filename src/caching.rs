//! The caching-proxy convenience collaborator.
//!
//! A thin configuration layer over the proxy engine: [`CacheFactory`] requests a proxy
//! for a contract and installs the single default [`PassThrough`] interceptor. That
//! pass-through is the only interceptor behavior the base system ships - no caching or
//! memoization policy is implemented here, and none should be assumed; an actual policy
//! would be supplied as a different interceptor by an external collaborator.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::caching::CacheFactory;
//!
//! interpose::contract! {
//!     pub trait Clock {
//!         fn now(&self) -> u64;
//!     }
//! }
//!
//! struct Frozen;
//!
//! impl Clock for Frozen {
//!     fn now(&self) -> u64 {
//!         1_234
//!     }
//! }
//!
//! # fn main() -> interpose::Result<()> {
//! let factory = CacheFactory::new();
//! let proxy = factory
//!     .caching_proxy::<dyn Clock>()?
//!     .for_instance(Arc::new(Frozen))
//!     .build()?;
//! assert_eq!(proxy.now(), 1_234);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::contract::Contract;
use crate::interception::{Interceptor, PassThrough};
use crate::proxy::{Proxy, ProxyBuilder, ProxyFactory};
use crate::{Error, Result};

/// Entry point of the caching-proxy collaborator.
///
/// Owns the [`ProxyFactory`] its configurations build through; the default constructor
/// keeps an isolated factory, [`with_factory`](CacheFactory::with_factory) injects one
/// (sharing its descriptor cache with whatever else uses it).
#[derive(Debug, Default)]
pub struct CacheFactory {
    factory: ProxyFactory,
}

impl CacheFactory {
    /// Creates a factory with its own proxy engine underneath.
    #[must_use]
    pub fn new() -> Self {
        CacheFactory {
            factory: ProxyFactory::new(),
        }
    }

    /// Creates a factory building through an explicitly supplied proxy engine.
    #[must_use]
    pub fn with_factory(factory: ProxyFactory) -> Self {
        CacheFactory { factory }
    }

    /// The proxy engine this factory builds through.
    #[must_use]
    pub fn factory(&self) -> &ProxyFactory {
        &self.factory
    }

    /// Starts a caching-proxy configuration for contract `C`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedContract`] when the contract's member table fails
    /// validation.
    pub fn caching_proxy<C: Contract + ?Sized>(&self) -> Result<CachingProxyConfiguration<C>> {
        Ok(CachingProxyConfiguration {
            builder: self.factory.create_proxy::<C>()?,
            target: None,
        })
    }
}

/// Builder-style configuration for one caching proxy.
///
/// Configure the target with [`for_instance`](CachingProxyConfiguration::for_instance),
/// then [`build`](CachingProxyConfiguration::build) the proxy.
pub struct CachingProxyConfiguration<C: ?Sized> {
    builder: ProxyBuilder<C>,
    target: Option<Arc<C>>,
}

impl<C: Contract + ?Sized> CachingProxyConfiguration<C> {
    /// Sets the target instance the built proxy forwards to.
    #[must_use]
    pub fn for_instance(mut self, target: Arc<C>) -> Self {
        self.target = Some(target);
        self
    }

    /// The configured target, if one has been set.
    #[must_use]
    pub fn target(&self) -> Option<&Arc<C>> {
        self.target.as_ref()
    }

    /// Builds the proxy: the configured target behind the single default
    /// [`PassThrough`] interceptor.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`] when no target was configured.
    pub fn build(&self) -> Result<Proxy<C>> {
        let Some(target) = &self.target else {
            return Err(Error::MissingTarget {
                contract: self.builder.descriptor().name(),
            });
        };

        let interceptors: [Arc<dyn Interceptor>; 1] = [Arc::new(PassThrough)];
        Ok(self
            .builder
            .create_instance(Arc::clone(target), interceptors))
    }
}
