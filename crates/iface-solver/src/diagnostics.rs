//! Pending diagnostics.
//!
//! Validators never format text. They produce a [`PendingDiagnostic`] holding
//! a numeric code and typed [`DiagnosticArg`] slots (members, types, modifier
//! sets, capability levels); [`crate::DiagnosticFormatter`] renders them into
//! `iface_common::Diagnostic` only when a consumer asks for text.

use crate::members::Modifiers;
use crate::types::{DefId, MemberId, TypeId, TypeParamId, Variance};
use iface_common::{LanguageFeature, LanguageVersion};
use std::sync::Arc;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Suggestion,
    Message,
}

// =============================================================================
// Lazy Diagnostic Arguments
// =============================================================================

/// Argument for a diagnostic message template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticArg {
    Member(MemberId),
    /// An interface member viewed through an instantiated interface type.
    Slot { interface: TypeId, member: MemberId },
    Type(TypeId),
    TypeParam(TypeParamId),
    Def(DefId),
    Modifier(Modifiers),
    Feature(LanguageFeature),
    Version(LanguageVersion),
    Variance(Variance),
    String(Arc<str>),
    Number(usize),
}

macro_rules! impl_from_diagnostic_arg {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for DiagnosticArg {
            fn from(v: $source) -> Self { Self::$variant(v) }
        })*
    };
}

impl_from_diagnostic_arg! {
    MemberId        => Member,
    TypeId          => Type,
    TypeParamId     => TypeParam,
    DefId           => Def,
    Modifiers       => Modifier,
    LanguageFeature => Feature,
    LanguageVersion => Version,
    Variance        => Variance,
    usize           => Number,
}

impl From<&str> for DiagnosticArg {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for DiagnosticArg {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

/// Declaration a diagnostic is reported on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticLocation {
    Def(DefId),
    Member(MemberId),
}

/// A diagnostic that hasn't been rendered yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDiagnostic {
    pub code: u32,
    pub args: Vec<DiagnosticArg>,
    pub location: Option<DiagnosticLocation>,
    pub severity: DiagnosticSeverity,
    /// Related information (e.g. the closest candidate member).
    pub related: Vec<PendingDiagnostic>,
}

impl PendingDiagnostic {
    pub fn error(code: u32, args: Vec<DiagnosticArg>) -> Self {
        Self {
            code,
            args,
            location: None,
            severity: DiagnosticSeverity::Error,
            related: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: DiagnosticLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn at_member(self, member: MemberId) -> Self {
        self.at(DiagnosticLocation::Member(member))
    }

    #[must_use]
    pub fn at_def(self, def: DefId) -> Self {
        self.at(DiagnosticLocation::Def(def))
    }

    #[must_use]
    pub fn with_related(mut self, related: PendingDiagnostic) -> Self {
        self.related.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Short aliases for the codes used across the engine.
pub mod codes {
    use iface_common::diagnostics::diagnostic_codes as dc;

    // Modifiers
    pub use dc::ABSTRACT_AND_SEALED;
    pub use dc::ABSTRACT_FIELD;
    pub use dc::ABSTRACT_HAS_BODY;
    pub use dc::ABSTRACT_IN_NON_ABSTRACT_TYPE;
    pub use dc::ABSTRACT_MEMBER_CANNOT_BE_VIRTUAL as ABSTRACT_AND_VIRTUAL;
    pub use dc::EXTERN_AND_ABSTRACT;
    pub use dc::EXTERN_HAS_BODY;
    pub use dc::INSTANCE_MEMBER_IN_STATIC_TYPE;
    pub use dc::INTERFACE_INSTANCE_CONSTRUCTOR;
    pub use dc::INTERFACE_INSTANCE_FIELD;
    pub use dc::MISSING_BODY;
    pub use dc::MODIFIER_NOT_VALID_FOR_ITEM as MODIFIER_NOT_VALID;
    pub use dc::MULTIPLE_ACCESS_MODIFIERS;
    pub use dc::OVERRIDE_WITH_NEW_OR_VIRTUAL;
    pub use dc::PARTIAL_DEFINITION_ABSTRACT;
    pub use dc::PARTIAL_IMPLEMENTATION_ABSTRACT;
    pub use dc::SEALED_NON_OVERRIDE;
    pub use dc::STATIC_MEMBER_CANNOT_BE_MARKED;
    pub use dc::VIRTUAL_OR_ABSTRACT_PRIVATE;

    // Implementation
    pub use dc::CLOSEST_CANDIDATE;
    pub use dc::DUPLICATE_EXPLICIT_IMPLEMENTATION as DUPLICATE_EXPLICIT_IMPL;
    pub use dc::EXPLICIT_IMPLEMENTATION_INTERFACE_NOT_DECLARED as EXPLICIT_IMPL_INTERFACE_NOT_DECLARED;
    pub use dc::EXPLICIT_IMPLEMENTATION_NOT_FOUND as EXPLICIT_IMPL_NOT_FOUND;
    pub use dc::IMPLEMENTATION_IS_STATIC;
    pub use dc::IMPLEMENTATION_NOT_PUBLIC;
    pub use dc::IMPLEMENTATION_NOT_STATIC;
    pub use dc::IMPLEMENTATION_WRONG_RETURN_TYPE;
    pub use dc::INTERFACE_MEMBER_NOT_IMPLEMENTED as NOT_IMPLEMENTED;

    // Signature shape
    pub use dc::BINARY_OPERATOR_PARAMETER;
    pub use dc::BINARY_OPERATOR_PARAMETER_CONSTRAINED;
    pub use dc::CONVERSION_INVOLVES_INTERFACE;
    pub use dc::CONVERSION_MUST_INVOLVE_CONTAINING_TYPE;
    pub use dc::CONVERSION_MUST_INVOLVE_CONTAINING_TYPE_CONSTRAINED;
    pub use dc::CONVERSION_TO_SELF;
    pub use dc::DUPLICATE_TRUE_FALSE_OPERATOR;
    pub use dc::INCREMENT_OPERATOR_PARAMETER;
    pub use dc::INCREMENT_OPERATOR_PARAMETER_CONSTRAINED;
    pub use dc::INCREMENT_OPERATOR_RETURN;
    pub use dc::INCREMENT_OPERATOR_RETURN_CONSTRAINED;
    pub use dc::INTERFACE_OPERATOR_MUST_BE_ABSTRACT;
    pub use dc::INVALID_VARIANCE;
    pub use dc::OPERATOR_MUST_BE_PUBLIC_STATIC;
    pub use dc::OPERATOR_REQUIRES_MATCHING;
    pub use dc::OPERATOR_RETURNS_VOID;
    pub use dc::OPERATOR_WRONG_ARITY;
    pub use dc::SHIFT_OPERATOR_OPERANDS;
    pub use dc::SHIFT_OPERATOR_OPERANDS_CONSTRAINED;
    pub use dc::TRUE_FALSE_OPERATOR_RETURN;
    pub use dc::UNARY_OPERATOR_PARAMETER;
    pub use dc::UNARY_OPERATOR_PARAMETER_CONSTRAINED;
    pub use dc::VARIANCE_ON_NON_INTERFACE;

    // Capability gates
    pub use dc::FEATURE_NOT_AVAILABLE_IN_VERSION as FEATURE_NOT_AVAILABLE;
    pub use dc::RUNTIME_DOES_NOT_SUPPORT_FEATURE as RUNTIME_NOT_SUPPORTED;

    // Constraint gate and receivers
    pub use dc::INSTANCE_MEMBER_WITHOUT_INSTANCE;
    pub use dc::NON_VIRTUAL_STATIC_THROUGH_TYPE_PARAMETER;
    pub use dc::STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER;
    pub use dc::STATIC_CONTRACT_INTERFACE_TYPE_ARGUMENT as STATIC_CONTRACT_TYPE_ARGUMENT;
    pub use dc::STATIC_MEMBER_THROUGH_INSTANCE;
    pub use dc::TYPE_PARAMETER_NOT_CONSTRAINED_TO_INTERFACE;

    // Binding
    pub use dc::BASE_TYPE_MUST_BE_CLASS;
    pub use dc::CANNOT_FIND_TYPE;
    pub use dc::DUPLICATE_TYPE_DECLARATION;
    pub use dc::MALFORMED_TYPE_EXPRESSION;
    pub use dc::NOT_AN_INTERFACE;
    pub use dc::PARTIAL_MULTIPLE_DEFINITIONS;
    pub use dc::UNKNOWN_OPERATOR;
    pub use dc::WRONG_TYPE_ARGUMENT_COUNT;

    pub use dc::MALFORMED_HIERARCHY;
}
