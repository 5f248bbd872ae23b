//! Live proxy instances and the member-forwarding pipeline.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::contract::{Contract, ProxyDescriptor};
use crate::interception::{Interceptor, Invocation};
use crate::value::Value;

/// A live proxy bound to one target and an ordered interceptor list.
///
/// For a contract declared through [`contract!`](crate::contract!), `Proxy<dyn Trait>`
/// implements `Trait` itself: every member forwards through the interception pipeline to
/// the target. Instances are created by
/// [`ProxyBuilder::create_instance`](crate::proxy::ProxyBuilder::create_instance);
/// independent instances share only the generated [`ProxyDescriptor`], never target or
/// interceptor state.
///
/// Proxies are `Send + Sync` and cheap to clone (the clone shares target, descriptor and
/// interceptor list). Concurrent calls on one instance proceed on independent
/// [`Invocation`]s with no engine-level locking; thread-safety of the target and the
/// interceptors themselves is the caller's concern.
pub struct Proxy<C: ?Sized> {
    descriptor: Arc<ProxyDescriptor>,
    target: Arc<C>,
    interceptors: Box<[Arc<dyn Interceptor>]>,
}

impl<C: Contract + ?Sized> Proxy<C> {
    pub(crate) fn new(
        descriptor: Arc<ProxyDescriptor>,
        target: Arc<C>,
        interceptors: Box<[Arc<dyn Interceptor>]>,
    ) -> Self {
        Proxy {
            descriptor,
            target,
            interceptors,
        }
    }

    /// The generated descriptor this instance forwards through.
    #[must_use]
    pub fn descriptor(&self) -> &ProxyDescriptor {
        &self.descriptor
    }

    /// The target object calls are ultimately forwarded to.
    #[must_use]
    pub fn target(&self) -> &Arc<C> {
        &self.target
    }

    /// The interceptor chain, in execution order.
    #[must_use]
    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    /// Forwards one member call through the interception pipeline.
    ///
    /// This is the body behind every generated forwarding stub: it wraps the boxed
    /// call-site arguments in an [`Invocation`] positioned before the first interceptor,
    /// drives the continuation protocol to completion on the calling thread, and hands
    /// back whatever ended up in the return slot (`None` both for void members and for
    /// chains that stopped without a result - the stub's return conversion turns the
    /// latter into the declared type's default value).
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range for the contract's member table. Generated stubs
    /// always pass their own member's slot.
    pub fn dispatch(&self, slot: usize, arguments: Box<[Value]>) -> Option<Value> {
        let member = self.descriptor.member(slot);
        trace!(
            contract = member.contract(),
            member = member.name(),
            interceptors = self.interceptors.len(),
            "dispatching proxied call"
        );

        let terminal =
            |arguments: &mut [Value]| C::call_target(self.target.as_ref(), slot, arguments);
        let mut invocation =
            Invocation::new(self, member, arguments, &self.interceptors, &terminal);
        invocation.proceed();
        invocation.complete()
    }
}

impl<C: ?Sized> Clone for Proxy<C> {
    fn clone(&self) -> Self {
        Proxy {
            descriptor: Arc::clone(&self.descriptor),
            target: Arc::clone(&self.target),
            interceptors: self.interceptors.clone(),
        }
    }
}

impl<C: ?Sized> fmt::Debug for Proxy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("contract", &self.descriptor.name())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
