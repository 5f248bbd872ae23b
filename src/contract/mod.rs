//! Contract definitions and the code-generation backend contract.
//!
//! A *contract* is the interface a proxy must satisfy: in Rust terms, an object-safe
//! trait whose trait-object type (`dyn MyTrait`) implements [`Contract`]. The
//! [`contract!`](crate::contract!) macro is the shipped code-generation backend - it
//! derives everything from the trait declaration at compile time - but the engine only
//! depends on the [`Contract`] trait itself, so alternative backends (hand-written
//! dispatch tables, build-script generators) plug in at the same seam.
//!
//! # Key Components
//!
//! - [`Contract`] - what a code-generation backend must supply per contract
//! - [`ContractShape`] / [`MemberShape`] / [`ParamShape`] / [`MemberKind`] - static
//!   declaration-side metadata
//! - [`ProxyDescriptor`] / [`MemberDescriptor`] - the validated runtime member table,
//!   built at most once per contract

mod descriptor;
mod shape;

pub use descriptor::{MemberDescriptor, ProxyDescriptor};
pub use shape::{ContractShape, MemberKind, MemberShape, ParamShape};

use crate::value::Value;

/// The contract a code-generation backend must satisfy, per proxied interface.
///
/// Implemented for the *trait-object type* of a contract trait (`dyn MyTrait`), normally
/// by [`contract!`](crate::contract!). The two functions are the whole seam between the
/// engine and any way of producing forwarding code:
///
/// - [`shape`](Contract::shape) describes the members so the engine can validate them and
///   synthesize the shared [`ProxyDescriptor`];
/// - [`call_target`](Contract::call_target) is the terminal step of the interception
///   pipeline - a table from member slot to a bound call on the real target.
///
/// Contract identity is `TypeId::of::<dyn MyTrait>()`; two contracts are the same
/// exactly when they are the same trait, never structurally.
pub trait Contract: Send + Sync + 'static {
    /// The static member table of this contract, in slot order.
    fn shape() -> &'static ContractShape;

    /// Invokes the real member `slot` on `target`, passing the current argument
    /// snapshot.
    ///
    /// Arguments are unboxed from the snapshot in declaration order; the snapshot itself
    /// stays intact so interceptor frames resuming afterwards still observe it. Returns
    /// the boxed result for returning members and `None` for void members.
    ///
    /// # Panics
    ///
    /// Implementations panic when a snapshot entry no longer holds the declared
    /// parameter type - a contract violation by whichever interceptor replaced it
    /// (see [`extract_argument`](crate::value::extract_argument)).
    fn call_target(target: &Self, slot: usize, arguments: &mut [Value]) -> Option<Value>;
}
