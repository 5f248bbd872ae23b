use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Everything in this enum surfaces while a proxy is being configured or its descriptor is
/// being synthesized - never in the middle of a forwarded call. Failures raised by target
/// objects or interceptors during a call propagate unchanged through the normal call stack;
/// the engine adds no wrapping layer of its own.
///
/// # Error Categories
///
/// ## Contract Validation Errors
/// - [`Error::UnsupportedContract`] - The contract shape cannot be proxied
///
/// ## Configuration Errors
/// - [`Error::MissingTarget`] - A caching-proxy configuration was built without a target
///
/// # Examples
///
/// ```rust
/// use interpose::{Error, ProxyFactory};
///
/// interpose::contract! {
///     pub trait Greeter {
///         fn greet(&self) -> String;
///     }
/// }
///
/// match ProxyFactory::global().create_proxy::<dyn Greeter>() {
///     Ok(builder) => {
///         println!("descriptor for {}", builder.descriptor().name());
///     }
///     Err(Error::UnsupportedContract { contract, reason }) => {
///         eprintln!("cannot proxy {contract}: {reason}");
///     }
///     Err(e) => {
///         eprintln!("other error: {e}");
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The requested contract cannot be turned into a proxy descriptor.
    ///
    /// Raised synchronously while the descriptor for a contract is first synthesized,
    /// when the member table violates the rules in
    /// [`ProxyDescriptor::build`](crate::contract::ProxyDescriptor::build) - duplicate or
    /// empty member names, or accessor members whose parameter/return shape does not match
    /// their accessor category. Contracts declared through [`contract!`](crate::contract!)
    /// never trip this at runtime; generic methods are already rejected when the macro
    /// expands, and the remaining rules hold by construction. Hand-written
    /// [`Contract`](crate::Contract) backends can.
    ///
    /// Not retried; the caller must pick a different contract.
    #[error("Unsupported contract `{contract}` - {reason}")]
    UnsupportedContract {
        /// Name of the offending contract
        contract: &'static str,
        /// Which validation rule the member table violated
        reason: String,
    },

    /// A caching-proxy configuration was built without a target instance.
    ///
    /// [`CachingProxyConfiguration::build`](crate::caching::CachingProxyConfiguration::build)
    /// needs a target to forward to; configure one with
    /// [`for_instance`](crate::caching::CachingProxyConfiguration::for_instance) first.
    #[error("No target instance configured for contract `{contract}`")]
    MissingTarget {
        /// Name of the contract the configuration was created for
        contract: &'static str,
    },
}
