//! Static member metadata emitted by the [`contract!`](crate::contract!) macro.
//!
//! A [`ContractShape`] is the declaration-side description of an interface contract: the
//! contract name and an ordered table of [`MemberShape`] entries, one per member, in slot
//! order. Shapes live in `static` storage (the macro emits them as `static` items), carry
//! no behavior, and are the raw input that
//! [`ProxyDescriptor::build`](crate::contract::ProxyDescriptor::build) validates and turns
//! into the runtime member table.
//!
//! Property and indexer accessors are ordinary members here; [`MemberKind`] is the only
//! thing distinguishing them from plain methods. Their parameter conventions:
//!
//! - getters carry the index keys (none for plain properties) and declare a return type,
//! - setters carry the index keys plus the assigned value as the trailing parameter and
//!   return nothing.

use strum::{Display, EnumIter};

/// Accessor category of a contract member.
///
/// Forwarding and interception are identical across categories; the kind only records how
/// the caller-facing surface maps accessor syntax onto the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MemberKind {
    /// A plain method.
    Method,
    /// A property getter: no parameters, returns the property value.
    PropertyGet,
    /// A property setter: single parameter carrying the assigned value, returns nothing.
    PropertySet,
    /// An indexer getter: index-key parameters, returns the element value.
    IndexGet,
    /// An indexer setter: index-key parameters plus the assigned value last, returns
    /// nothing.
    IndexSet,
}

impl MemberKind {
    /// Whether members of this kind declare a return type.
    #[must_use]
    pub fn returns_value(&self) -> bool {
        matches!(self, MemberKind::Method | MemberKind::PropertyGet | MemberKind::IndexGet)
    }
}

/// A single declared parameter of a contract member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    /// Parameter name as declared in the contract.
    pub name: &'static str,
    /// Parameter type, as written in the contract declaration.
    pub ty: &'static str,
}

/// Declaration-side description of one contract member.
#[derive(Debug, Clone, Copy)]
pub struct MemberShape {
    /// Member name; unique within the contract.
    pub name: &'static str,
    /// Accessor category of the member.
    pub kind: MemberKind,
    /// Ordered parameter list, excluding the receiver.
    pub parameters: &'static [ParamShape],
    /// Declared return type as written in the contract, `None` for void members.
    pub returns: Option<&'static str>,
}

impl MemberShape {
    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the member returns nothing.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.returns.is_none()
    }
}

/// Declaration-side description of a whole interface contract.
///
/// Member order is slot order: the position of a [`MemberShape`] in `members` is the slot
/// the generated forwarding code and
/// [`Contract::call_target`](crate::contract::Contract::call_target) use to identify it.
#[derive(Debug, Clone, Copy)]
pub struct ContractShape {
    /// Contract name, for diagnostics and error messages.
    pub name: &'static str,
    /// Ordered member table.
    pub members: &'static [MemberShape],
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_kind_return_conventions() {
        for kind in MemberKind::iter() {
            let expected = matches!(
                kind,
                MemberKind::Method | MemberKind::PropertyGet | MemberKind::IndexGet
            );
            assert_eq!(kind.returns_value(), expected, "kind: {kind}");
        }
    }

    #[test]
    fn test_member_shape_helpers() {
        static PARAMS: [ParamShape; 2] = [
            ParamShape { name: "key", ty: "String" },
            ParamShape { name: "value", ty: "u64" },
        ];
        let member = MemberShape {
            name: "set_entry",
            kind: MemberKind::IndexSet,
            parameters: &PARAMS,
            returns: None,
        };

        assert_eq!(member.arity(), 2);
        assert!(member.is_void());
    }
}
