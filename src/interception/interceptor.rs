//! The interceptor hook and the default pass-through implementation.

use crate::interception::Invocation;

/// A single unit of cross-cutting behavior, invoked once per proxied call.
///
/// Interceptors run strictly in the order supplied at instance-creation time. Within
/// [`intercept`](Interceptor::intercept) an implementation may inspect or mutate the
/// invocation's argument snapshot, assign its return value, and either call
/// [`Invocation::proceed`] exactly once to let the chain (and eventually the target)
/// run, or decline to, which stops everything further down.
///
/// Implementations must be `Send + Sync`: one interceptor instance may serve concurrent
/// calls on the same proxy, each with its own [`Invocation`]. The engine shares no other
/// mutable state between calls; whatever state an interceptor keeps is its own to
/// synchronize.
///
/// # Examples
///
/// An interceptor that short-circuits with a synthesized result:
///
/// ```rust
/// use interpose::{Interceptor, Invocation};
///
/// struct Stubbed;
///
/// impl Interceptor for Stubbed {
///     fn intercept(&self, invocation: &mut Invocation<'_>) {
///         // No `proceed`: the target is never reached.
///         invocation.set_return_value(20_000_i32);
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync {
    /// Handles one proxied call.
    fn intercept(&self, invocation: &mut Invocation<'_>);
}

/// The default pass-through interceptor: immediately continues, nothing else.
///
/// This is the single interceptor the caching-proxy collaborator
/// ([`CacheFactory`](crate::caching::CacheFactory)) installs, and the only interceptor
/// behavior the base system ships.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl Interceptor for PassThrough {
    fn intercept(&self, invocation: &mut Invocation<'_>) {
        invocation.proceed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `PassThrough` behavior itself is covered with real proxies in the integration
    // suites; here we only pin down that it stays zero-sized and constructible as a
    // default.
    #[test]
    fn test_pass_through_is_trivial() {
        let _ = PassThrough::default();
        assert_eq!(std::mem::size_of::<PassThrough>(), 0);
    }
}
