//! Uniform boxed representation for arguments and return values.
//!
//! Every value crossing the proxy boundary - call-site arguments entering an
//! [`Invocation`](crate::interception::Invocation), values an interceptor substitutes, and
//! the eventual return value - travels as a [`Value`]: a boxed, type-erased, cloneable
//! payload. Interceptors can inspect and replace entries without knowing the static
//! signature of the member being called, and the forwarding stubs convert back to the
//! declared parameter/return types at the edges.
//!
//! # Type Requirements
//!
//! Contract parameter types must be `Any + Clone + Send`. The clone happens when the
//! terminal step unboxes an argument for the target call, which keeps the snapshot intact
//! for interceptors that inspect it afterwards; passing `Arc<T>` gives shared-reference
//! semantics, a plain value behaves like an unboxed copy. Return types additionally need
//! `Default`, which is what an unset return slot decays to for the caller.

use std::any::Any;
use std::fmt;

/// Object-safe view over a boxed argument or return value.
///
/// Blanket-implemented for every `Any + Clone + Send` type; user code never implements
/// this directly. The trait exists so a [`Value`] can be cloned and downcast without
/// knowing its concrete type.
pub trait AnyValue: Any + Send {
    /// Clones the underlying value into a fresh box.
    fn clone_value(&self) -> Value;

    /// Borrows the underlying value as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrows the underlying value as [`Any`] for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Consumes the box, yielding the underlying value as [`Any`].
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// The `type_name` of the underlying value, for diagnostics.
    fn value_type_name(&self) -> &'static str;
}

impl<T: Any + Clone + Send> AnyValue for T {
    fn clone_value(&self) -> Value {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl fmt::Debug for dyn AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.value_type_name())
    }
}

/// A boxed, type-erased argument or return value.
///
/// The Rust counterpart of the original engine's `object` slots: one uniform
/// representation usable by arbitrary interceptors regardless of the member's static
/// signature.
pub type Value = Box<dyn AnyValue>;

/// Boxes a concrete value into the uniform [`Value`] representation.
///
/// # Examples
///
/// ```rust
/// use interpose::value::{boxed, Value};
///
/// let value: Value = boxed(42_i32);
/// assert_eq!(value.as_any().downcast_ref::<i32>(), Some(&42));
/// ```
pub fn boxed<T: Any + Clone + Send>(value: T) -> Value {
    Box::new(value)
}

/// Extracts the argument at `index` from a snapshot as a concrete `T`.
///
/// Clones the current snapshot entry, so the snapshot stays observable by interceptor
/// frames that resume after the target call. Used by generated terminal-dispatch code;
/// hand-written [`Contract`](crate::Contract) backends call it the same way.
///
/// # Panics
///
/// Panics if `index` is out of bounds for the member's parameter list, or if the entry
/// does not hold a `T`. Both are contract violations by interceptor code (the engine
/// itself always builds snapshots matching the member descriptor), surfaced with the
/// member name and the offending types.
pub fn extract_argument<T: Any>(member: &str, arguments: &[Value], index: usize) -> T {
    let Some(slot) = arguments.get(index) else {
        panic!(
            "argument {index} of `{member}` requested, but the snapshot holds {} entries",
            arguments.len()
        );
    };

    match slot.clone_value().into_any().downcast::<T>() {
        Ok(value) => *value,
        Err(_) => panic!(
            "argument {index} of `{member}` holds a `{}` where a `{}` is required",
            slot.value_type_name(),
            std::any::type_name::<T>()
        ),
    }
}

/// Converts a return slot into the member's declared return type.
///
/// A set slot is unboxed to `T`; an unset slot produces `T::default()`, so a member whose
/// chain neither reached the target nor synthesized a result still returns the declared
/// type's default value rather than failing.
///
/// # Panics
///
/// Panics if the slot holds a value of a different type - a contract violation by the
/// interceptor that stored it.
pub fn coerce_return<T: Any + Default>(member: &str, value: Option<Value>) -> T {
    match value {
        Some(value) => {
            let actual = value.value_type_name();
            match value.into_any().downcast::<T>() {
                Ok(value) => *value,
                Err(_) => panic!(
                    "return value of `{member}` holds a `{actual}` where a `{}` is required",
                    std::any::type_name::<T>()
                ),
            }
        }
        None => T::default(),
    }
}
