//! Runtime member tables synthesized from contract shapes.
//!
//! A [`ProxyDescriptor`] is the generated forwarding implementation for one contract: the
//! validated table of [`MemberDescriptor`] entries every proxy instance of that contract
//! shares. Descriptors are built at most once per contract by the
//! [`ProxyTypeCache`](crate::proxy::ProxyTypeCache), wrapped in an `Arc`, and never
//! mutated afterwards, so unlimited concurrent reads need no locking.
//!
//! Construction is also where contract validation lives. The member table rules checked
//! here are the runtime half of contract validation - the half a hand-written
//! [`Contract`](crate::contract::Contract) backend could get wrong. (The other half,
//! rejecting generic methods, happens when [`contract!`](crate::contract!) expands.)

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt::Write;

use crate::contract::{Contract, ContractShape, MemberKind, MemberShape, ParamShape};
use crate::{Error, Result};

/// Immutable per-member metadata owned by a [`ProxyDescriptor`].
///
/// Created once when a contract is first processed; every
/// [`Invocation`](crate::interception::Invocation) for the member borrows the same
/// descriptor entry.
#[derive(Debug)]
pub struct MemberDescriptor {
    slot: usize,
    contract: &'static str,
    name: &'static str,
    kind: MemberKind,
    parameters: &'static [ParamShape],
    returns: Option<&'static str>,
    signature: String,
}

impl MemberDescriptor {
    fn new(slot: usize, contract: &'static str, shape: &MemberShape) -> Self {
        let mut signature = format!("{contract}::{}(", shape.name);
        for (index, parameter) in shape.parameters.iter().enumerate() {
            if index > 0 {
                signature.push_str(", ");
            }
            let _ = write!(signature, "{}: {}", parameter.name, parameter.ty);
        }
        signature.push(')');
        if let Some(returns) = shape.returns {
            let _ = write!(signature, " -> {returns}");
        }

        MemberDescriptor {
            slot,
            contract,
            name: shape.name,
            kind: shape.kind,
            parameters: shape.parameters,
            returns: shape.returns,
            signature,
        }
    }

    /// Slot of this member within its contract's member table.
    #[must_use]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Name of the contract this member belongs to.
    #[must_use]
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    /// Member name as declared in the contract.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Accessor category of the member.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Ordered parameter list, excluding the receiver.
    #[must_use]
    pub fn parameters(&self) -> &'static [ParamShape] {
        self.parameters
    }

    /// Number of declared parameters - the fixed length of every argument snapshot for
    /// this member.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Declared return type, `None` for void members.
    #[must_use]
    pub fn return_type(&self) -> Option<&'static str> {
        self.returns
    }

    /// Full display signature, e.g. `Repository::find(id: u64) -> Option<String>`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// The generated, validated forwarding table for one contract.
///
/// Shared read-only (via `Arc`) across every proxy instance created for the contract;
/// lives for the rest of the process once registered in the
/// [`ProxyTypeCache`](crate::proxy::ProxyTypeCache).
#[derive(Debug)]
pub struct ProxyDescriptor {
    contract_id: TypeId,
    name: &'static str,
    members: Box<[MemberDescriptor]>,
}

impl ProxyDescriptor {
    /// Validates a contract's shape and synthesizes its member table.
    ///
    /// This is the descriptor-construction step of the engine; callers normally go
    /// through [`ProxyFactory::create_proxy`](crate::proxy::ProxyFactory::create_proxy),
    /// which builds each contract at most once and caches the result.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedContract`] when the member table is malformed:
    /// - empty or duplicate member names,
    /// - property getters with parameters or without a return type,
    /// - property setters not taking exactly the assigned value, or returning one,
    /// - indexer getters without index keys or without a return type,
    /// - indexer setters without index keys plus a trailing assigned value, or
    ///   returning one.
    pub fn build<C: Contract + ?Sized>() -> Result<Self> {
        let shape = C::shape();

        let mut seen = HashSet::with_capacity(shape.members.len());
        for member in shape.members {
            validate_member(shape, member)?;
            if !seen.insert(member.name) {
                return Err(unsupported(
                    shape,
                    format!("duplicate member name `{}`", member.name),
                ));
            }
        }

        let members = shape
            .members
            .iter()
            .enumerate()
            .map(|(slot, member)| MemberDescriptor::new(slot, shape.name, member))
            .collect();

        Ok(ProxyDescriptor {
            contract_id: TypeId::of::<C>(),
            name: shape.name,
            members,
        })
    }

    /// Identity of the contract this descriptor was generated for.
    #[must_use]
    pub fn contract_id(&self) -> TypeId {
        self.contract_id
    }

    /// Contract name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The full member table, in slot order.
    #[must_use]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// The member at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range. Generated forwarding code only passes slots
    /// taken from the contract's own table.
    #[must_use]
    pub fn member(&self, slot: usize) -> &MemberDescriptor {
        &self.members[slot]
    }

    /// Looks a member up by name.
    #[must_use]
    pub fn member_named(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|member| member.name == name)
    }
}

fn unsupported(shape: &ContractShape, reason: String) -> Error {
    Error::UnsupportedContract {
        contract: shape.name,
        reason,
    }
}

fn validate_member(shape: &ContractShape, member: &MemberShape) -> Result<()> {
    if member.name.is_empty() {
        return Err(unsupported(shape, String::from("member with an empty name")));
    }

    let fault = match member.kind {
        MemberKind::Method => None,
        MemberKind::PropertyGet => {
            if member.arity() != 0 {
                Some("property getters take no parameters")
            } else if member.is_void() {
                Some("property getters must declare a return type")
            } else {
                None
            }
        }
        MemberKind::PropertySet => {
            if member.arity() != 1 {
                Some("property setters take exactly the assigned value")
            } else if !member.is_void() {
                Some("property setters return nothing")
            } else {
                None
            }
        }
        MemberKind::IndexGet => {
            if member.arity() == 0 {
                Some("indexer getters take at least one index key")
            } else if member.is_void() {
                Some("indexer getters must declare a return type")
            } else {
                None
            }
        }
        MemberKind::IndexSet => {
            if member.arity() < 2 {
                Some("indexer setters take index keys plus the assigned value")
            } else if !member.is_void() {
                Some("indexer setters return nothing")
            } else {
                None
            }
        }
    };

    match fault {
        Some(fault) => Err(unsupported(
            shape,
            format!("member `{}` - {fault}", member.name),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct WellFormed;

    static WELL_FORMED_SHAPE: ContractShape = ContractShape {
        name: "WellFormed",
        members: &[
            MemberShape {
                name: "find",
                kind: MemberKind::Method,
                parameters: &[ParamShape { name: "id", ty: "u64" }],
                returns: Some("Option<String>"),
            },
            MemberShape {
                name: "capacity",
                kind: MemberKind::PropertyGet,
                parameters: &[],
                returns: Some("usize"),
            },
            MemberShape {
                name: "set_capacity",
                kind: MemberKind::PropertySet,
                parameters: &[ParamShape { name: "value", ty: "usize" }],
                returns: None,
            },
        ],
    };

    impl Contract for WellFormed {
        fn shape() -> &'static ContractShape {
            &WELL_FORMED_SHAPE
        }

        fn call_target(_: &Self, _: usize, _: &mut [Value]) -> Option<Value> {
            unreachable!("descriptor tests never dispatch")
        }
    }

    struct BrokenSetter;

    static BROKEN_SETTER_SHAPE: ContractShape = ContractShape {
        name: "BrokenSetter",
        members: &[MemberShape {
            name: "set_capacity",
            kind: MemberKind::PropertySet,
            parameters: &[],
            returns: Some("usize"),
        }],
    };

    impl Contract for BrokenSetter {
        fn shape() -> &'static ContractShape {
            &BROKEN_SETTER_SHAPE
        }

        fn call_target(_: &Self, _: usize, _: &mut [Value]) -> Option<Value> {
            unreachable!("descriptor tests never dispatch")
        }
    }

    struct Duplicated;

    static DUPLICATED_SHAPE: ContractShape = ContractShape {
        name: "Duplicated",
        members: &[
            MemberShape {
                name: "poke",
                kind: MemberKind::Method,
                parameters: &[],
                returns: None,
            },
            MemberShape {
                name: "poke",
                kind: MemberKind::Method,
                parameters: &[],
                returns: None,
            },
        ],
    };

    impl Contract for Duplicated {
        fn shape() -> &'static ContractShape {
            &DUPLICATED_SHAPE
        }

        fn call_target(_: &Self, _: usize, _: &mut [Value]) -> Option<Value> {
            unreachable!("descriptor tests never dispatch")
        }
    }

    #[test]
    fn test_build_well_formed() {
        let descriptor = ProxyDescriptor::build::<WellFormed>().unwrap();

        assert_eq!(descriptor.name(), "WellFormed");
        assert_eq!(descriptor.members().len(), 3);

        let find = descriptor.member(0);
        assert_eq!(find.slot(), 0);
        assert_eq!(find.kind(), MemberKind::Method);
        assert_eq!(find.arity(), 1);
        assert_eq!(
            find.signature(),
            "WellFormed::find(id: u64) -> Option<String>"
        );

        let setter = descriptor.member_named("set_capacity").unwrap();
        assert_eq!(setter.slot(), 2);
        assert_eq!(setter.return_type(), None);
        assert_eq!(setter.signature(), "WellFormed::set_capacity(value: usize)");
    }

    #[test]
    fn test_build_rejects_malformed_setter() {
        let error = ProxyDescriptor::build::<BrokenSetter>().unwrap_err();
        match error {
            Error::UnsupportedContract { contract, reason } => {
                assert_eq!(contract, "BrokenSetter");
                assert!(reason.contains("set_capacity"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_rejects_duplicate_members() {
        let error = ProxyDescriptor::build::<Duplicated>().unwrap_err();
        match error {
            Error::UnsupportedContract { reason, .. } => {
                assert!(reason.contains("duplicate member name"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
