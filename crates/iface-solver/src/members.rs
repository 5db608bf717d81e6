//! Bound members: kinds, modifier sets, dispatch slots.

use crate::def::DefKind;
use crate::signature::Signature;
use crate::types::{DefId, MemberId, TypeId, TypeParamId};
use bitflags::bitflags;
use smallvec::SmallVec;
use std::fmt;

// =============================================================================
// Member kinds
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// Overloadable operator tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperatorToken {
    Plus,
    Minus,
    LogicalNot,
    BitwiseNot,
    Increment,
    Decrement,
    True,
    False,
    Multiply,
    Divide,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    LeftShift,
    RightShift,
    Equality,
    Inequality,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Implicit,
    Explicit,
}

/// Shape family an operator belongs to once its arity is known.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperatorCategory {
    Unary,
    Increment,
    TrueFalse,
    Binary,
    Shift,
    Conversion,
}

impl OperatorToken {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token.trim() {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "!" => Self::LogicalNot,
            "~" => Self::BitwiseNot,
            "++" => Self::Increment,
            "--" => Self::Decrement,
            "true" => Self::True,
            "false" => Self::False,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "%" => Self::Modulo,
            "&" => Self::BitwiseAnd,
            "|" => Self::BitwiseOr,
            "^" => Self::ExclusiveOr,
            "<<" => Self::LeftShift,
            ">>" => Self::RightShift,
            "==" => Self::Equality,
            "!=" => Self::Inequality,
            "<" => Self::LessThan,
            ">" => Self::GreaterThan,
            "<=" => Self::LessThanOrEqual,
            ">=" => Self::GreaterThanOrEqual,
            "implicit" => Self::Implicit,
            "explicit" => Self::Explicit,
            _ => return None,
        })
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::LogicalNot => "!",
            Self::BitwiseNot => "~",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::True => "true",
            Self::False => "false",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::ExclusiveOr => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Equality => "==",
            Self::Inequality => "!=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThanOrEqual => ">=",
            Self::Implicit => "implicit",
            Self::Explicit => "explicit",
        }
    }

    /// Arities the token accepts. `+` and `-` are both unary and binary.
    pub const fn accepts_arity(self, arity: usize) -> bool {
        match self {
            Self::Plus | Self::Minus => arity == 1 || arity == 2,
            Self::LogicalNot
            | Self::BitwiseNot
            | Self::Increment
            | Self::Decrement
            | Self::True
            | Self::False
            | Self::Implicit
            | Self::Explicit => arity == 1,
            _ => arity == 2,
        }
    }

    /// Arity used in diagnostics when the declared one is rejected.
    pub const fn expected_arity(self) -> usize {
        match self {
            Self::LogicalNot
            | Self::BitwiseNot
            | Self::Increment
            | Self::Decrement
            | Self::True
            | Self::False
            | Self::Implicit
            | Self::Explicit => 1,
            _ => 2,
        }
    }

    pub const fn category(self, arity: usize) -> OperatorCategory {
        match self {
            Self::Plus | Self::Minus if arity == 1 => OperatorCategory::Unary,
            Self::LogicalNot | Self::BitwiseNot => OperatorCategory::Unary,
            Self::Increment | Self::Decrement => OperatorCategory::Increment,
            Self::True | Self::False => OperatorCategory::TrueFalse,
            Self::LeftShift | Self::RightShift => OperatorCategory::Shift,
            Self::Implicit | Self::Explicit => OperatorCategory::Conversion,
            _ => OperatorCategory::Binary,
        }
    }

    /// Metadata name for the operator at the given arity.
    pub const fn metadata_name(self, arity: usize) -> &'static str {
        match self {
            Self::Plus if arity == 1 => "op_UnaryPlus",
            Self::Minus if arity == 1 => "op_UnaryNegation",
            Self::Plus => "op_Addition",
            Self::Minus => "op_Subtraction",
            Self::LogicalNot => "op_LogicalNot",
            Self::BitwiseNot => "op_OnesComplement",
            Self::Increment => "op_Increment",
            Self::Decrement => "op_Decrement",
            Self::True => "op_True",
            Self::False => "op_False",
            Self::Multiply => "op_Multiply",
            Self::Divide => "op_Division",
            Self::Modulo => "op_Modulus",
            Self::BitwiseAnd => "op_BitwiseAnd",
            Self::BitwiseOr => "op_BitwiseOr",
            Self::ExclusiveOr => "op_ExclusiveOr",
            Self::LeftShift => "op_LeftShift",
            Self::RightShift => "op_RightShift",
            Self::Equality => "op_Equality",
            Self::Inequality => "op_Inequality",
            Self::LessThan => "op_LessThan",
            Self::GreaterThan => "op_GreaterThan",
            Self::LessThanOrEqual => "op_LessThanOrEqual",
            Self::GreaterThanOrEqual => "op_GreaterThanOrEqual",
            Self::Implicit => "op_Implicit",
            Self::Explicit => "op_Explicit",
        }
    }

    /// The operator that must be declared alongside this one, if any.
    pub const fn required_counterpart(self) -> Option<Self> {
        match self {
            Self::Equality => Some(Self::Inequality),
            Self::Inequality => Some(Self::Equality),
            Self::LessThan => Some(Self::GreaterThan),
            Self::GreaterThan => Some(Self::LessThan),
            Self::LessThanOrEqual => Some(Self::GreaterThanOrEqual),
            Self::GreaterThanOrEqual => Some(Self::LessThanOrEqual),
            Self::True => Some(Self::False),
            Self::False => Some(Self::True),
            _ => None,
        }
    }

    pub const fn is_conversion(self) -> bool {
        matches!(self, Self::Implicit | Self::Explicit)
    }
}

impl fmt::Display for OperatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Member kind. Indexers are properties with parameters, named `Item`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Event,
    Operator(OperatorToken),
    Constructor,
    Field,
    Accessor(AccessorKind),
}

impl MemberKind {
    pub const fn is_operator(self) -> bool {
        matches!(self, Self::Operator(_))
    }

    pub const fn is_accessor(self) -> bool {
        matches!(self, Self::Accessor(_))
    }

    /// Kinds that own accessors.
    pub const fn has_accessors(self) -> bool {
        matches!(self, Self::Property | Self::Event)
    }

    /// Kinds that can occupy an interface slot.
    pub const fn is_implementable(self) -> bool {
        matches!(
            self,
            Self::Method | Self::Property | Self::Event | Self::Operator(_) | Self::Accessor(_)
        )
    }

    /// Kinds with an invocable body (what emission needs an implementation for).
    pub const fn is_method_like(self) -> bool {
        matches!(self, Self::Method | Self::Operator(_) | Self::Accessor(_))
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::Event => "event",
            Self::Operator(_) => "operator",
            Self::Constructor => "constructor",
            Self::Field => "field",
            Self::Accessor(_) => "accessor",
        }
    }
}

// =============================================================================
// Modifiers
// =============================================================================

bitflags! {
    /// Member modifier set, access level included.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const ABSTRACT = 1 << 0;
        const VIRTUAL = 1 << 1;
        const SEALED = 1 << 2;
        const STATIC = 1 << 3;
        const OVERRIDE = 1 << 4;
        const EXTERN = 1 << 5;
        const PARTIAL = 1 << 6;
        const NEW = 1 << 7;
        const READONLY = 1 << 8;
        const PUBLIC = 1 << 9;
        const PROTECTED = 1 << 10;
        const INTERNAL = 1 << 11;
        const PRIVATE = 1 << 12;

        const ACCESS = Self::PUBLIC.bits()
            | Self::PROTECTED.bits()
            | Self::INTERNAL.bits()
            | Self::PRIVATE.bits();
        const DISPATCH = Self::ABSTRACT.bits() | Self::VIRTUAL.bits() | Self::OVERRIDE.bits();
    }
}

const MODIFIER_KEYWORDS: [(Modifiers, &str); 13] = [
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::INTERNAL, "internal"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::NEW, "new"),
    (Modifiers::STATIC, "static"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::VIRTUAL, "virtual"),
    (Modifiers::SEALED, "sealed"),
    (Modifiers::OVERRIDE, "override"),
    (Modifiers::EXTERN, "extern"),
    (Modifiers::PARTIAL, "partial"),
    (Modifiers::READONLY, "readonly"),
];

impl Modifiers {
    /// Source keyword of a single modifier flag; empty for combinations.
    pub fn keyword(self) -> &'static str {
        MODIFIER_KEYWORDS
            .iter()
            .find(|(flag, _)| *flag == self)
            .map_or("", |(_, keyword)| keyword)
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        MODIFIER_KEYWORDS
            .iter()
            .find(|(_, candidate)| *candidate == keyword)
            .map(|(flag, _)| *flag)
    }

    pub fn access(self) -> Self {
        self & Self::ACCESS
    }

    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, keyword) in MODIFIER_KEYWORDS {
            if !self.contains(flag) {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
            first = false;
        }
        Ok(())
    }
}

/// Dispatch slot behaviour of a member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// `abstract` / `virtual`: introduces a new dispatch slot.
    NewSlot,
    /// `override` or explicit implementation: re-uses an existing slot.
    Override,
    NonDispatching,
}

impl SlotKind {
    pub fn from_modifiers(modifiers: Modifiers, is_explicit: bool) -> Self {
        if is_explicit || modifiers.contains(Modifiers::OVERRIDE) {
            Self::Override
        } else if modifiers.intersects(Modifiers::ABSTRACT | Modifiers::VIRTUAL) {
            Self::NewSlot
        } else {
            Self::NonDispatching
        }
    }
}

// =============================================================================
// Member
// =============================================================================

/// Target of an explicit implementation (`void I<int>.M()`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplicitTarget {
    /// The interface as written, resolved in the declaring type's scope.
    pub interface: TypeId,
    pub member_name: String,
    /// The interface member matched by name and signature, once bound.
    pub slot: Option<MemberId>,
}

/// Linkage between the two parts of a partial member.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartialPart {
    /// The body-less defining declaration.
    Definition { implementation: Option<MemberId> },
    /// The bodied implementing declaration.
    Implementation { definition: MemberId },
}

#[derive(Clone, Debug)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub kind: MemberKind,
    pub declaring: DefId,
    pub container: DefKind,
    /// Modifiers as written.
    pub declared_modifiers: Modifiers,
    /// Modifiers after implied defaults and conflict recovery.
    pub modifiers: Modifiers,
    pub signature: Signature,
    /// Method type parameters.
    pub type_params: Vec<TypeParamId>,
    pub has_body: bool,
    pub slot: SlotKind,
    pub explicit_target: Option<ExplicitTarget>,
    /// Accessors of a property or event.
    pub accessors: SmallVec<[MemberId; 2]>,
    /// Owning property or event of an accessor.
    pub owner: Option<MemberId>,
    pub partial: Option<PartialPart>,
}

impl Member {
    /// A member with no modifiers, no body and no accessors. `id` is assigned
    /// by `Program::add_member`.
    pub fn new(
        name: impl Into<String>,
        kind: MemberKind,
        declaring: DefId,
        container: DefKind,
        signature: Signature,
    ) -> Self {
        Self {
            id: MemberId(u32::MAX),
            name: name.into(),
            kind,
            declaring,
            container,
            declared_modifiers: Modifiers::empty(),
            modifiers: Modifiers::empty(),
            signature,
            type_params: Vec::new(),
            has_body: false,
            slot: SlotKind::NonDispatching,
            explicit_target: None,
            accessors: SmallVec::new(),
            owner: None,
            partial: None,
        }
    }

    /// Sets declared and effective modifiers and derives the slot kind.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.declared_modifiers = modifiers;
        self.modifiers = modifiers;
        self.slot = SlotKind::from_modifiers(modifiers, self.explicit_target.is_some());
        self
    }

    #[must_use]
    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }

    pub const fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    pub const fn is_public(&self) -> bool {
        self.modifiers.is_public()
    }

    pub const fn is_explicit(&self) -> bool {
        self.explicit_target.is_some()
    }

    /// A static interface member without a mandatory body.
    ///
    /// Such members can only be reached through a type parameter constrained
    /// to their interface.
    pub fn has_static_contract(&self) -> bool {
        matches!(self.container, DefKind::Interface)
            && self.is_static()
            && (!self.has_body || self.modifiers.contains(Modifiers::ABSTRACT))
    }

    /// Interface members that introduce a slot an implementing type must fill.
    pub fn is_interface_slot(&self) -> bool {
        matches!(self.container, DefKind::Interface)
            && self.kind.is_implementable()
            && self.slot == SlotKind::NewSlot
            && !self.is_explicit()
    }

    /// Members that take part in name lookup. The implementing half of a
    /// partial member is folded into its definition.
    pub fn is_lookup_visible(&self) -> bool {
        !matches!(self.partial, Some(PartialPart::Implementation { .. }))
    }
}

#[cfg(test)]
#[path = "tests/members_tests.rs"]
mod tests;
