//! Per-call invocation context and the continuation protocol.
//!
//! An [`Invocation`] is created by a proxy's forwarding stub for exactly one member call
//! and destroyed when that call returns. It threads the interceptor chain to the eventual
//! target call: a cursor walks the ordered interceptor list, and each
//! [`proceed`](Invocation::proceed) either dispatches the next interceptor or - past the
//! end of the list - executes the terminal step against the real target.
//!
//! # State Machine
//!
//! ```text
//! Pending ──proceed──► Dispatching ──...──► Invoked ──stub──► Done
//!    │                                         ▲
//!    └──────────(no interceptors)──────────────┘
//! ```
//!
//! Everything is synchronous and call-stack based: dispatching interceptor *i* keeps
//! interceptor *i-1*'s `intercept` frame on the stack, so post-continuation logic runs in
//! reverse order as the frames unwind. There are no suspension points and no cross-thread
//! handoffs within a single invocation.

use std::any::Any;
use std::sync::Arc;

use strum::Display;

use crate::contract::MemberDescriptor;
use crate::interception::Interceptor;
use crate::value::{boxed, Value};

/// Progress of an [`Invocation`] through the interception pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InvocationState {
    /// The cursor sits before the first interceptor; nothing has run yet.
    Pending,
    /// An interceptor's `intercept` routine is currently on the stack.
    Dispatching,
    /// The terminal step has executed against the real target.
    Invoked,
    /// Control has returned to the forwarding stub.
    Done,
}

/// The mutable per-call context driving one proxied member call.
///
/// Interceptors receive `&mut Invocation` and may, in any combination:
///
/// - inspect the member being called ([`member`](Invocation::member)) and the calling
///   proxy ([`proxy`](Invocation::proxy)),
/// - read and overwrite entries of the argument snapshot - downstream interceptors and
///   the target observe the mutated values,
/// - assign the return value, with or without continuing, to synthesize a result,
/// - call [`proceed`](Invocation::proceed) exactly once to advance the chain, or decline
///   to, which stops the chain short of the target.
pub struct Invocation<'a> {
    proxy: &'a dyn Any,
    member: &'a MemberDescriptor,
    arguments: Box<[Value]>,
    return_value: Option<Value>,
    interceptors: &'a [Arc<dyn Interceptor>],
    terminal: &'a dyn Fn(&mut [Value]) -> Option<Value>,
    cursor: usize,
    state: InvocationState,
    stopped: bool,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        proxy: &'a dyn Any,
        member: &'a MemberDescriptor,
        arguments: Box<[Value]>,
        interceptors: &'a [Arc<dyn Interceptor>],
        terminal: &'a dyn Fn(&mut [Value]) -> Option<Value>,
    ) -> Self {
        debug_assert_eq!(
            arguments.len(),
            member.arity(),
            "argument snapshot does not match `{}`",
            member.signature()
        );

        Invocation {
            proxy,
            member,
            arguments,
            return_value: None,
            interceptors,
            terminal,
            cursor: 0,
            state: InvocationState::Pending,
            stopped: false,
        }
    }

    /// Advances the chain by one step: the next interceptor if one remains, otherwise
    /// the terminal call on the real target.
    ///
    /// Dispatching is synchronous - the calling interceptor's own `intercept` frame stays
    /// on the stack and resumes once the rest of the chain has run (or stopped). When the
    /// terminal step runs, the target member receives the *current* argument snapshot,
    /// and its result (for returning members) overwrites the return slot.
    ///
    /// # Panics
    ///
    /// Panics on duplicate continuation: each interceptor may call `proceed` at most once
    /// per invocation. A second call - whether the chain already reached the target or an
    /// interceptor further down declined to continue - is a bug in interceptor code and
    /// surfaces immediately.
    pub fn proceed(&mut self) {
        if self.stopped || matches!(self.state, InvocationState::Invoked | InvocationState::Done)
        {
            panic!(
                "interceptor contract violation: duplicate continuation of `{}`",
                self.member.signature()
            );
        }

        let index = self.cursor;
        self.cursor += 1;

        if index < self.interceptors.len() {
            self.state = InvocationState::Dispatching;
            let interceptor = Arc::clone(&self.interceptors[index]);
            interceptor.intercept(self);
            if self.state != InvocationState::Invoked {
                // An interceptor below declined to continue; the frames unwinding above
                // it have all spent their continuation already.
                self.stopped = true;
            }
        } else {
            let terminal = self.terminal;
            let result = terminal(&mut self.arguments);
            if result.is_some() {
                self.return_value = result;
            }
            self.state = InvocationState::Invoked;
        }
    }

    /// The proxy instance this call was made on, as `&dyn Any`.
    ///
    /// Interceptors that know the contract can downcast it to the concrete
    /// [`Proxy<dyn Trait>`](crate::proxy::Proxy) type.
    #[must_use]
    pub fn proxy(&self) -> &dyn Any {
        self.proxy
    }

    /// The member being invoked.
    #[must_use]
    pub fn member(&self) -> &MemberDescriptor {
        self.member
    }

    /// Current progress of this invocation.
    ///
    /// After a `proceed` call returns, `Invoked` tells an interceptor the target actually
    /// ran, while `Dispatching` means someone further down stopped the chain.
    #[must_use]
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// The argument snapshot, in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Mutable access to the argument snapshot.
    ///
    /// The snapshot's length is fixed by the member descriptor; entries may be
    /// overwritten freely, and the mutated values are what downstream interceptors and
    /// the target observe.
    #[must_use]
    pub fn arguments_mut(&mut self) -> &mut [Value] {
        &mut self.arguments
    }

    /// The argument at `index`, downcast to `T`; `None` if out of range or of another
    /// type.
    #[must_use]
    pub fn argument<T: Any>(&self, index: usize) -> Option<&T> {
        self.arguments
            .get(index)
            .and_then(|value| value.as_any().downcast_ref::<T>())
    }

    /// Overwrites the argument at `index`.
    ///
    /// The stored value must have the declared parameter type by the time the terminal
    /// step runs, or the unboxing there panics.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the member's parameter list.
    pub fn replace_argument<T: Any + Clone + Send>(&mut self, index: usize, value: T) {
        let Some(slot) = self.arguments.get_mut(index) else {
            panic!(
                "argument {index} of `{}` replaced, but the snapshot holds {} entries",
                self.member.signature(),
                self.arguments.len()
            );
        };
        *slot = boxed(value);
    }

    /// The current return value, downcast to `T`; `None` while unset or of another type.
    #[must_use]
    pub fn return_value<T: Any>(&self) -> Option<&T> {
        self.return_value
            .as_ref()
            .and_then(|value| value.as_any().downcast_ref::<T>())
    }

    /// Whether a return value has been assigned, by an interceptor or the target.
    #[must_use]
    pub fn has_return_value(&self) -> bool {
        self.return_value.is_some()
    }

    /// Assigns the return value.
    ///
    /// Interceptors may do this at any point, with or without continuing, to synthesize a
    /// result without invoking the real target. If the chain does reach a returning
    /// target member afterwards, the target's result overwrites this value.
    pub fn set_return_value<T: Any + Clone + Send>(&mut self, value: T) {
        self.return_value = Some(boxed(value));
    }

    /// Clears the return value back to unset.
    ///
    /// For value-type members an unset slot decays to the type's default value at the
    /// stub boundary.
    pub fn clear_return_value(&mut self) {
        self.return_value = None;
    }

    /// Ends the invocation and hands the return slot back to the forwarding stub.
    pub(crate) fn complete(mut self) -> Option<Value> {
        self.state = InvocationState::Done;
        self.return_value.take()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::contract::{Contract, ContractShape, MemberKind, MemberShape, ProxyDescriptor};

    struct Probe;

    static PROBE_SHAPE: ContractShape = ContractShape {
        name: "Probe",
        members: &[MemberShape {
            name: "poke",
            kind: MemberKind::Method,
            parameters: &[],
            returns: Some("i32"),
        }],
    };

    impl Contract for Probe {
        fn shape() -> &'static ContractShape {
            &PROBE_SHAPE
        }

        fn call_target(_: &Self, _: usize, _: &mut [Value]) -> Option<Value> {
            unreachable!("invocation tests drive the terminal closure directly")
        }
    }

    fn probe_descriptor() -> ProxyDescriptor {
        ProxyDescriptor::build::<Probe>().unwrap()
    }

    struct Continuing;

    impl Interceptor for Continuing {
        fn intercept(&self, invocation: &mut Invocation<'_>) {
            invocation.proceed();
        }
    }

    struct Declining;

    impl Interceptor for Declining {
        fn intercept(&self, invocation: &mut Invocation<'_>) {
            invocation.set_return_value(-1_i32);
        }
    }

    struct Greedy;

    impl Interceptor for Greedy {
        fn intercept(&self, invocation: &mut Invocation<'_>) {
            invocation.proceed();
            invocation.proceed();
        }
    }

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Interceptor for Recording {
        fn intercept(&self, invocation: &mut Invocation<'_>) {
            self.log.lock().unwrap().push(format!("{}-enter", self.name));
            invocation.proceed();
            self.log.lock().unwrap().push(format!("{}-exit", self.name));
        }
    }

    #[test]
    fn test_empty_chain_reaches_terminal_once() {
        let descriptor = probe_descriptor();
        let calls = AtomicUsize::new(0);
        let terminal = |_: &mut [Value]| {
            calls.fetch_add(1, Ordering::SeqCst);
            Some(boxed(10_i32))
        };

        let mut invocation =
            Invocation::new(&(), descriptor.member(0), Box::new([]), &[], &terminal);
        assert_eq!(invocation.state(), InvocationState::Pending);

        invocation.proceed();
        assert_eq!(invocation.state(), InvocationState::Invoked);
        assert_eq!(invocation.return_value::<i32>(), Some(&10));

        assert!(invocation.complete().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_chain_runs_in_supplied_order() {
        let descriptor = probe_descriptor();
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let interceptors: Vec<Arc<dyn Interceptor>> = vec![
            Arc::new(Recording { name: "a", log: Arc::clone(&log) }),
            Arc::new(Recording { name: "b", log: Arc::clone(&log) }),
        ];
        let terminal = {
            let log = Arc::clone(&log);
            move |_: &mut [Value]| {
                log.lock().unwrap().push(String::from("target"));
                Some(boxed(0_i32))
            }
        };

        let mut invocation = Invocation::new(
            &(),
            descriptor.member(0),
            Box::new([]),
            &interceptors,
            &terminal,
        );
        invocation.proceed();

        assert_eq!(
            *log.lock().unwrap(),
            ["a-enter", "b-enter", "target", "b-exit", "a-exit"]
        );
    }

    #[test]
    fn test_declined_continuation_stops_chain() {
        let descriptor = probe_descriptor();
        let reached = AtomicUsize::new(0);
        let interceptors: Vec<Arc<dyn Interceptor>> =
            vec![Arc::new(Declining), Arc::new(Continuing)];
        let terminal = |_: &mut [Value]| {
            reached.fetch_add(1, Ordering::SeqCst);
            Some(boxed(10_i32))
        };

        let mut invocation = Invocation::new(
            &(),
            descriptor.member(0),
            Box::new([]),
            &interceptors,
            &terminal,
        );
        invocation.proceed();

        assert_eq!(invocation.state(), InvocationState::Dispatching);
        assert_eq!(reached.load(Ordering::SeqCst), 0);
        assert_eq!(invocation.return_value::<i32>(), Some(&-1));
    }

    #[test]
    #[should_panic(expected = "duplicate continuation")]
    fn test_duplicate_continuation_panics() {
        let descriptor = probe_descriptor();
        let interceptors: Vec<Arc<dyn Interceptor>> = vec![Arc::new(Greedy)];
        let terminal = |_: &mut [Value]| Some(boxed(10_i32));

        let mut invocation = Invocation::new(
            &(),
            descriptor.member(0),
            Box::new([]),
            &interceptors,
            &terminal,
        );
        invocation.proceed();
    }

    #[test]
    #[should_panic(expected = "duplicate continuation")]
    fn test_continuation_after_stopped_chain_panics() {
        let descriptor = probe_descriptor();
        // Greedy's second `proceed` fires after Declining stopped the chain below it.
        let interceptors: Vec<Arc<dyn Interceptor>> =
            vec![Arc::new(Greedy), Arc::new(Declining)];
        let terminal = |_: &mut [Value]| Some(boxed(10_i32));

        let mut invocation = Invocation::new(
            &(),
            descriptor.member(0),
            Box::new([]),
            &interceptors,
            &terminal,
        );
        invocation.proceed();
    }

    #[test]
    fn test_return_slot_accessors() {
        let descriptor = probe_descriptor();
        let terminal = |_: &mut [Value]| Some(boxed(10_i32));
        let mut invocation =
            Invocation::new(&(), descriptor.member(0), Box::new([]), &[], &terminal);

        assert!(!invocation.has_return_value());
        invocation.set_return_value(55_i32);
        assert_eq!(invocation.return_value::<i32>(), Some(&55));
        assert_eq!(invocation.return_value::<String>(), None);

        invocation.clear_return_value();
        assert!(!invocation.has_return_value());
        assert!(invocation.complete().is_none());
    }
}
