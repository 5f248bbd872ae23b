//! Proxy manufacturing: factory, per-contract builders, descriptor cache, and live
//! instances.
//!
//! # Data Flow
//!
//! ```text
//! ProxyFactory::create_proxy::<dyn Trait>()      validate + synthesize (once, cached)
//!         │
//!         ▼
//! ProxyBuilder<dyn Trait>::create_instance(..)   bind target + interceptor list
//!         │
//!         ▼
//! Proxy<dyn Trait>  ──member call──►  dispatch   per-call Invocation → chain → target
//! ```

mod builder;
mod cache;
mod factory;
mod instance;

pub use builder::ProxyBuilder;
pub use cache::ProxyTypeCache;
pub use factory::ProxyFactory;
pub use instance::Proxy;
