// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # interpose
//!
//! A dynamic proxy and interception framework for Rust trait objects: manufacture, at
//! runtime, a stand-in object that satisfies an interface contract, forwards every
//! member call to a real target, and routes each call through an ordered chain of
//! interceptors that may observe, mutate, short-circuit, or replace the call's
//! behavior.
//!
//! ## Features
//!
//! - **Contract-driven forwarding** - declare an interface once with [`contract!`];
//!   methods, property accessors and indexer accessors all forward through one pipeline
//! - **Interception pipeline** - ordered interceptors with a synchronous
//!   continuation protocol: advance the chain, rewrite arguments, synthesize results
//! - **Descriptor cache** - forwarding metadata is synthesized at most once per
//!   contract, safe under concurrent first use, lock-free afterwards
//! - **Explicit composition** - injectable factories and caches, with a process-global
//!   factory as the convenience default
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use interpose::{Interceptor, Invocation, ProxyFactory};
//!
//! interpose::contract! {
//!     pub trait Calculator {
//!         fn add(&self, a: i64, b: i64) -> i64;
//!     }
//! }
//!
//! struct Target;
//!
//! impl Calculator for Target {
//!     fn add(&self, a: i64, b: i64) -> i64 {
//!         a + b
//!     }
//! }
//!
//! struct Doubling;
//!
//! impl Interceptor for Doubling {
//!     fn intercept(&self, invocation: &mut Invocation<'_>) {
//!         invocation.proceed();
//!         let result = *invocation.return_value::<i64>().unwrap();
//!         invocation.set_return_value(result * 2);
//!     }
//! }
//!
//! # fn main() -> interpose::Result<()> {
//! let builder = ProxyFactory::global().create_proxy::<dyn Calculator>()?;
//! let interceptors: Vec<Arc<dyn Interceptor>> = vec![Arc::new(Doubling)];
//! let proxy = builder.create_instance(Arc::new(Target), interceptors);
//!
//! assert_eq!(proxy.add(2, 3), 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! `interpose` is organized into several key modules:
//!
//! - [`contract`] - contract metadata and the [`Contract`] seam any code-generation
//!   backend satisfies; [`contract!`] is the shipped backend
//! - [`interception`] - the [`Interceptor`] hook and the per-call [`Invocation`]
//!   continuation protocol
//! - [`proxy`] - [`ProxyFactory`], [`ProxyBuilder`], the [`ProxyTypeCache`] and live
//!   [`Proxy`] instances
//! - [`value`] - the uniform boxed representation arguments and results travel in
//! - [`caching`] - the thin caching-proxy collaborator (a single default pass-through
//!   interceptor; no caching policy of its own)
//! - [`Error`] and [`Result`] - error handling
//!
//! ## Call Flow
//!
//! A call on a proxy member builds an argument snapshot, wraps it in an
//! [`Invocation`] positioned before the first interceptor, and drives the chain on the
//! calling thread: each interceptor runs exactly once, in order, and the terminal step
//! invokes the real target member with the current snapshot. The result flows back
//! through the same call frames; an unset result decays to the member's default return
//! value. Failures from targets or interceptors unwind through the chain unchanged -
//! the engine never wraps or swallows them.

#[macro_use]
mod macros;

pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use interpose::prelude::*;
///
/// let factory = ProxyFactory::new();
/// assert!(factory.cache().is_empty());
/// ```
pub mod prelude;

/// The caching-proxy convenience collaborator.
///
/// A configuration layer that requests proxies wired with the single default
/// [`PassThrough`] interceptor. Carries no caching policy of its own.
pub mod caching;

/// Contract metadata and the code-generation backend seam.
///
/// # Key Types
///
/// - [`Contract`] - what a backend supplies per contract: a static member table and the
///   terminal-dispatch function
/// - [`contract::ProxyDescriptor`] / [`contract::MemberDescriptor`] - the validated
///   member table shared by every proxy of a contract
/// - [`contract::ContractShape`] / [`contract::MemberShape`] /
///   [`contract::MemberKind`] - declaration-side metadata
pub mod contract;

/// The per-call interception pipeline.
///
/// # Key Types
///
/// - [`Interceptor`] - one unit of cross-cutting behavior, invoked once per call
/// - [`Invocation`] - the mutable per-call context threading the chain to the target
/// - [`interception::InvocationState`] - progress through the continuation protocol
/// - [`PassThrough`] - the default interceptor: continues immediately, nothing else
pub mod interception;

/// Proxy manufacturing: factory, builders, descriptor cache, live instances.
///
/// # Key Types
///
/// - [`ProxyFactory`] - validating entry point owning a [`ProxyTypeCache`]
/// - [`ProxyBuilder`] - manufactures instances for one contract
/// - [`Proxy`] - a live instance bound to a target and an interceptor list
pub mod proxy;

/// Uniform boxed representation for arguments and return values.
pub mod value;

/// `interpose` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all operations in this crate.
///
/// See [`error::Error`] for the full taxonomy; everything here surfaces during proxy
/// configuration or descriptor synthesis, never mid-call.
pub use error::Error;

/// The code-generation backend contract implemented per proxied interface.
pub use contract::Contract;

/// The interception hook and the per-call context it receives.
pub use interception::{Interceptor, Invocation, InvocationState, PassThrough};

/// The main entry points for manufacturing proxies.
pub use proxy::{Proxy, ProxyBuilder, ProxyFactory, ProxyTypeCache};
