//! # interpose Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the interpose library. Import this module to get quick access to the essential
//! types for declaring contracts, building proxies and writing interceptors.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all interpose operations
pub use crate::Error;

/// The result type used throughout interpose
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Validating entry point owning the descriptor cache
pub use crate::proxy::ProxyFactory;

/// Per-contract manufacturer of proxy instances
pub use crate::proxy::ProxyBuilder;

/// A live proxy bound to a target and an interceptor list
pub use crate::proxy::Proxy;

// ================================================================================================
// Interception
// ================================================================================================

/// The interception hook, the per-call context and its state machine
pub use crate::interception::{Interceptor, Invocation, InvocationState};

/// The default pass-through interceptor
pub use crate::interception::PassThrough;

// ================================================================================================
// Contract Metadata
// ================================================================================================

/// The code-generation backend contract and the generated member tables
pub use crate::contract::{Contract, MemberDescriptor, MemberKind, ProxyDescriptor};

// ================================================================================================
// Values
// ================================================================================================

/// The uniform boxed representation and its conversion helpers
pub use crate::value::{boxed, AnyValue, Value};

// ================================================================================================
// Caching Collaborator
// ================================================================================================

/// The caching-proxy convenience layer
pub use crate::caching::{CacheFactory, CachingProxyConfiguration};
