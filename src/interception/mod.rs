//! The per-call interception pipeline.
//!
//! Every call on a proxy member constructs an [`Invocation`] and drives it through the
//! continuation protocol: interceptors run in order, each deciding whether the chain
//! advances toward the terminal call on the real target. See [`Invocation`] for the
//! state machine and [`Interceptor`] for the hook contract.

mod interceptor;
mod invocation;

pub use interceptor::{Interceptor, PassThrough};
pub use invocation::{Invocation, InvocationState};
