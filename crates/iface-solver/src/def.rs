//! Type definitions (interfaces, classes and structs).

use crate::types::{DefId, MemberId, TypeId, TypeParamId};
use bitflags::bitflags;

/// Kind of type definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    Interface,
    Class,
    Struct,
}

impl DefKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Class => "class",
            Self::Struct => "struct",
        }
    }
}

bitflags! {
    /// Modifiers on the type declaration itself.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeModifiers: u8 {
        const ABSTRACT = 1 << 0;
        const SEALED = 1 << 1;
        const STATIC = 1 << 2;
    }
}

/// A bound type declaration.
///
/// Owns its members. `self_type` is the declaration instantiated with its own
/// type parameters (`C<T>` inside `class C<T>`), the type resolution starts
/// from when the declaration itself is the implementing type.
#[derive(Clone, Debug)]
pub struct TypeDefinition {
    pub id: DefId,
    pub name: String,
    pub kind: DefKind,
    pub modifiers: TypeModifiers,
    pub type_params: Vec<TypeParamId>,
    /// Base class (classes only; structs and interfaces have none).
    pub base: Option<TypeId>,
    /// Directly listed interfaces, in declaration order.
    pub interfaces: Vec<TypeId>,
    /// Declared members in declaration order. Accessors follow their owner.
    pub members: Vec<MemberId>,
    pub self_type: TypeId,
}

impl TypeDefinition {
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, DefKind::Interface)
    }

    /// Types that may leave interface members unimplemented.
    pub fn may_leave_unimplemented(&self) -> bool {
        self.is_interface() || self.modifiers.contains(TypeModifiers::ABSTRACT)
    }

    pub fn arity(&self) -> usize {
        self.type_params.len()
    }
}
