//! Per-contract proxy builders.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::contract::{Contract, ProxyDescriptor};
use crate::interception::Interceptor;
use crate::proxy::Proxy;

/// Manufactures proxy instances for one contract from its cached descriptor.
///
/// Obtained from [`ProxyFactory::create_proxy`](crate::proxy::ProxyFactory::create_proxy),
/// which is where validation and descriptor synthesis happen - a builder never
/// re-validates or re-synthesizes anything. Builders are cheap to clone and hold no
/// per-instance state; every instance they create shares the same descriptor.
pub struct ProxyBuilder<C: ?Sized> {
    descriptor: Arc<ProxyDescriptor>,
    _contract: PhantomData<fn() -> Box<C>>,
}

impl<C: Contract + ?Sized> ProxyBuilder<C> {
    pub(crate) fn new(descriptor: Arc<ProxyDescriptor>) -> Self {
        ProxyBuilder {
            descriptor,
            _contract: PhantomData,
        }
    }

    /// The generated descriptor backing every instance this builder creates.
    #[must_use]
    pub fn descriptor(&self) -> &ProxyDescriptor {
        &self.descriptor
    }

    /// Creates a proxy bound to `target` and an ordered interceptor sequence.
    ///
    /// The interceptor sequence is copied into the instance, so mutating whatever
    /// collection the caller assembled afterwards never affects the proxy. An empty
    /// sequence is valid: calls then go straight to the target.
    pub fn create_instance<I>(&self, target: Arc<C>, interceptors: I) -> Proxy<C>
    where
        I: IntoIterator<Item = Arc<dyn Interceptor>>,
    {
        Proxy::new(
            Arc::clone(&self.descriptor),
            target,
            interceptors.into_iter().collect(),
        )
    }
}

impl<C: ?Sized> Clone for ProxyBuilder<C> {
    fn clone(&self) -> Self {
        ProxyBuilder {
            descriptor: Arc::clone(&self.descriptor),
            _contract: PhantomData,
        }
    }
}
