//! Diagnostic codes and message templates.
//!
//! Templates use `{0}`, `{1}`, ... placeholders filled by `format_message`.
//! Code families:
//! - `1xxx` modifier conflicts, body and containment rules
//! - `2xxx` unimplemented interface members, explicit implementations
//! - `3xxx` signature shape (operators, variance)
//! - `4xxx` capability gates
//! - `5xxx` generic constraint gate, receiver usability
//! - `6xxx` binding
//! - `9xxx` fatal malformed input

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    // Modifiers
    pub const MODIFIER_NOT_VALID_FOR_ITEM: u32 = 1001;
    pub const STATIC_MEMBER_CANNOT_BE_MARKED: u32 = 1002;
    pub const ABSTRACT_MEMBER_CANNOT_BE_VIRTUAL: u32 = 1003;
    pub const ABSTRACT_AND_SEALED: u32 = 1004;
    pub const SEALED_NON_OVERRIDE: u32 = 1005;
    pub const OVERRIDE_WITH_NEW_OR_VIRTUAL: u32 = 1006;
    pub const ABSTRACT_HAS_BODY: u32 = 1007;
    pub const EXTERN_AND_ABSTRACT: u32 = 1008;
    pub const EXTERN_HAS_BODY: u32 = 1009;
    pub const VIRTUAL_OR_ABSTRACT_PRIVATE: u32 = 1010;
    pub const ABSTRACT_FIELD: u32 = 1011;
    pub const MULTIPLE_ACCESS_MODIFIERS: u32 = 1012;
    pub const PARTIAL_IMPLEMENTATION_ABSTRACT: u32 = 1013;
    pub const PARTIAL_DEFINITION_ABSTRACT: u32 = 1014;
    pub const MISSING_BODY: u32 = 1020;
    pub const ABSTRACT_IN_NON_ABSTRACT_TYPE: u32 = 1021;
    pub const INTERFACE_INSTANCE_FIELD: u32 = 1022;
    pub const INTERFACE_INSTANCE_CONSTRUCTOR: u32 = 1023;
    pub const INSTANCE_MEMBER_IN_STATIC_TYPE: u32 = 1024;

    // Implementation
    pub const INTERFACE_MEMBER_NOT_IMPLEMENTED: u32 = 2001;
    pub const IMPLEMENTATION_NOT_STATIC: u32 = 2002;
    pub const IMPLEMENTATION_IS_STATIC: u32 = 2003;
    pub const IMPLEMENTATION_NOT_PUBLIC: u32 = 2004;
    pub const IMPLEMENTATION_WRONG_RETURN_TYPE: u32 = 2005;
    pub const CLOSEST_CANDIDATE: u32 = 2006;
    pub const EXPLICIT_IMPLEMENTATION_NOT_FOUND: u32 = 2010;
    pub const EXPLICIT_IMPLEMENTATION_INTERFACE_NOT_DECLARED: u32 = 2011;
    pub const DUPLICATE_EXPLICIT_IMPLEMENTATION: u32 = 2012;

    // Signature shape
    pub const UNARY_OPERATOR_PARAMETER: u32 = 3001;
    pub const UNARY_OPERATOR_PARAMETER_CONSTRAINED: u32 = 3002;
    pub const INCREMENT_OPERATOR_PARAMETER: u32 = 3003;
    pub const INCREMENT_OPERATOR_PARAMETER_CONSTRAINED: u32 = 3004;
    pub const INCREMENT_OPERATOR_RETURN: u32 = 3005;
    pub const INCREMENT_OPERATOR_RETURN_CONSTRAINED: u32 = 3006;
    pub const BINARY_OPERATOR_PARAMETER: u32 = 3007;
    pub const BINARY_OPERATOR_PARAMETER_CONSTRAINED: u32 = 3008;
    pub const SHIFT_OPERATOR_OPERANDS: u32 = 3009;
    pub const SHIFT_OPERATOR_OPERANDS_CONSTRAINED: u32 = 3010;
    pub const TRUE_FALSE_OPERATOR_RETURN: u32 = 3011;
    pub const OPERATOR_REQUIRES_MATCHING: u32 = 3012;
    pub const DUPLICATE_TRUE_FALSE_OPERATOR: u32 = 3013;
    pub const INTERFACE_OPERATOR_MUST_BE_ABSTRACT: u32 = 3014;
    pub const OPERATOR_MUST_BE_PUBLIC_STATIC: u32 = 3015;
    pub const OPERATOR_WRONG_ARITY: u32 = 3016;
    pub const OPERATOR_RETURNS_VOID: u32 = 3017;
    pub const CONVERSION_MUST_INVOLVE_CONTAINING_TYPE: u32 = 3018;
    pub const CONVERSION_MUST_INVOLVE_CONTAINING_TYPE_CONSTRAINED: u32 = 3019;
    pub const CONVERSION_TO_SELF: u32 = 3020;
    pub const CONVERSION_INVOLVES_INTERFACE: u32 = 3021;
    pub const INVALID_VARIANCE: u32 = 3030;
    pub const VARIANCE_ON_NON_INTERFACE: u32 = 3031;

    // Capability gates
    pub const FEATURE_NOT_AVAILABLE_IN_VERSION: u32 = 4001;
    pub const RUNTIME_DOES_NOT_SUPPORT_FEATURE: u32 = 4002;

    // Constraint gate and receivers
    pub const STATIC_CONTRACT_INTERFACE_TYPE_ARGUMENT: u32 = 5001;
    pub const STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER: u32 = 5002;
    pub const STATIC_MEMBER_THROUGH_INSTANCE: u32 = 5003;
    pub const INSTANCE_MEMBER_WITHOUT_INSTANCE: u32 = 5004;
    pub const TYPE_PARAMETER_NOT_CONSTRAINED_TO_INTERFACE: u32 = 5005;
    pub const NON_VIRTUAL_STATIC_THROUGH_TYPE_PARAMETER: u32 = 5006;

    // Binding
    pub const CANNOT_FIND_TYPE: u32 = 6001;
    pub const WRONG_TYPE_ARGUMENT_COUNT: u32 = 6002;
    pub const DUPLICATE_TYPE_DECLARATION: u32 = 6003;
    pub const PARTIAL_MULTIPLE_DEFINITIONS: u32 = 6004;
    pub const BASE_TYPE_MUST_BE_CLASS: u32 = 6005;
    pub const NOT_AN_INTERFACE: u32 = 6006;
    pub const UNKNOWN_OPERATOR: u32 = 6007;
    pub const MALFORMED_TYPE_EXPRESSION: u32 = 6008;

    // Fatal
    pub const MALFORMED_HIERARCHY: u32 = 9001;
}

pub mod diagnostic_messages {
    pub const MODIFIER_NOT_VALID_FOR_ITEM: &str = "The modifier '{1}' is not valid for '{0}'.";
    pub const STATIC_MEMBER_CANNOT_BE_MARKED: &str =
        "A static member '{0}' cannot be marked as '{1}'.";
    pub const ABSTRACT_MEMBER_CANNOT_BE_VIRTUAL: &str =
        "The abstract member '{0}' cannot be marked virtual.";
    pub const ABSTRACT_AND_SEALED: &str = "'{0}' cannot be both abstract and sealed.";
    pub const SEALED_NON_OVERRIDE: &str = "'{0}' cannot be sealed because it is not an override.";
    pub const OVERRIDE_WITH_NEW_OR_VIRTUAL: &str =
        "A member '{0}' marked as override cannot be marked as new or virtual.";
    pub const ABSTRACT_HAS_BODY: &str =
        "'{0}' cannot declare a body because it is marked abstract.";
    pub const EXTERN_AND_ABSTRACT: &str = "'{0}' cannot be both extern and abstract.";
    pub const EXTERN_HAS_BODY: &str = "'{0}' cannot be extern and declare a body.";
    pub const VIRTUAL_OR_ABSTRACT_PRIVATE: &str =
        "'{0}': virtual or abstract members cannot be private.";
    pub const ABSTRACT_FIELD: &str =
        "The modifier 'abstract' is not valid on field '{0}'. Try using a property instead.";
    pub const MULTIPLE_ACCESS_MODIFIERS: &str = "More than one protection modifier on '{0}'.";
    pub const PARTIAL_IMPLEMENTATION_ABSTRACT: &str =
        "The implementation part of partial member '{0}' cannot be marked abstract.";
    pub const PARTIAL_DEFINITION_ABSTRACT: &str = "The definition part of partial member '{0}' can only be abstract when its implementation part is non-abstract and has a body.";
    pub const MISSING_BODY: &str =
        "'{0}' must declare a body because it is not marked abstract, extern, or partial.";
    pub const ABSTRACT_IN_NON_ABSTRACT_TYPE: &str =
        "'{0}' is abstract but it is contained in non-abstract type '{1}'.";
    pub const INTERFACE_INSTANCE_FIELD: &str = "Interfaces cannot contain instance fields ('{0}').";
    pub const INTERFACE_INSTANCE_CONSTRUCTOR: &str =
        "Interfaces cannot contain instance constructors ('{0}').";
    pub const INSTANCE_MEMBER_IN_STATIC_TYPE: &str =
        "'{0}': cannot declare instance members in a static type.";

    pub const INTERFACE_MEMBER_NOT_IMPLEMENTED: &str =
        "'{0}' does not implement interface member '{1}'.";
    pub const IMPLEMENTATION_NOT_STATIC: &str = "'{0}' does not implement interface member '{1}'. '{2}' cannot implement the static member because it is not static.";
    pub const IMPLEMENTATION_IS_STATIC: &str = "'{0}' does not implement interface member '{1}'. '{2}' cannot implement an instance member because it is static.";
    pub const IMPLEMENTATION_NOT_PUBLIC: &str = "'{0}' does not implement interface member '{1}'. '{2}' cannot implement an interface member because it is not public.";
    pub const IMPLEMENTATION_WRONG_RETURN_TYPE: &str = "'{0}' does not implement interface member '{1}'. '{2}' cannot implement '{1}' because it does not have the matching return type of '{3}'.";
    pub const CLOSEST_CANDIDATE: &str = "The closest candidate is '{0}'.";
    pub const EXPLICIT_IMPLEMENTATION_NOT_FOUND: &str = "'{0}' in explicit interface declaration is not found among members of the interface that can be implemented.";
    pub const EXPLICIT_IMPLEMENTATION_INTERFACE_NOT_DECLARED: &str =
        "'{0}': containing type does not implement interface '{1}'.";
    pub const DUPLICATE_EXPLICIT_IMPLEMENTATION: &str =
        "Interface member '{1}' is explicitly implemented more than once in '{0}'.";

    pub const UNARY_OPERATOR_PARAMETER: &str =
        "The parameter of unary operator '{0}' must be the containing type.";
    pub const UNARY_OPERATOR_PARAMETER_CONSTRAINED: &str = "The parameter of unary operator '{0}' must be the containing type, or its type parameter constrained to it.";
    pub const INCREMENT_OPERATOR_PARAMETER: &str =
        "The parameter type for ++ or -- operator '{0}' must be the containing type.";
    pub const INCREMENT_OPERATOR_PARAMETER_CONSTRAINED: &str = "The parameter type for ++ or -- operator '{0}' must be the containing type, or its type parameter constrained to it.";
    pub const INCREMENT_OPERATOR_RETURN: &str = "The return type for ++ or -- operator '{0}' must match the parameter type or be derived from the parameter type.";
    pub const INCREMENT_OPERATOR_RETURN_CONSTRAINED: &str = "The return type for ++ or -- operator '{0}' must match the parameter type, be derived from the parameter type, or be the containing type's type parameter constrained to it when the parameter type is a different such type parameter.";
    pub const BINARY_OPERATOR_PARAMETER: &str =
        "One of the parameters of binary operator '{0}' must be the containing type.";
    pub const BINARY_OPERATOR_PARAMETER_CONSTRAINED: &str = "One of the parameters of binary operator '{0}' must be the containing type, or its type parameter constrained to it.";
    pub const SHIFT_OPERATOR_OPERANDS: &str = "The first operand of shift operator '{0}' must have the same type as the containing type, and the type of the second operand must be int.";
    pub const SHIFT_OPERATOR_OPERANDS_CONSTRAINED: &str = "The first operand of shift operator '{0}' must have the same type as the containing type or its type parameter constrained to it, and the type of the second operand must be int.";
    pub const TRUE_FALSE_OPERATOR_RETURN: &str =
        "The return type of operator true or false ('{0}') must be bool.";
    pub const OPERATOR_REQUIRES_MATCHING: &str =
        "The operator '{0}' requires a matching operator '{1}' to also be defined.";
    pub const DUPLICATE_TRUE_FALSE_OPERATOR: &str =
        "Interface '{0}' declares operator '{1}' more than once.";
    pub const INTERFACE_OPERATOR_MUST_BE_ABSTRACT: &str = "Interfaces cannot contain conversion, equality, or inequality operators unless they are abstract ('{0}').";
    pub const OPERATOR_MUST_BE_PUBLIC_STATIC: &str =
        "User-defined operator '{0}' must be declared static and public.";
    pub const OPERATOR_WRONG_ARITY: &str = "Overloaded operator '{0}' takes {1} parameter(s).";
    pub const OPERATOR_RETURNS_VOID: &str = "User-defined operator '{0}' cannot return void.";
    pub const CONVERSION_MUST_INVOLVE_CONTAINING_TYPE: &str =
        "User-defined conversion '{0}' must convert to or from the enclosing type.";
    pub const CONVERSION_MUST_INVOLVE_CONTAINING_TYPE_CONSTRAINED: &str = "User-defined conversion '{0}' must convert to or from the enclosing type, or its type parameter constrained to it.";
    pub const CONVERSION_TO_SELF: &str =
        "User-defined conversion '{0}' cannot convert a type to itself.";
    pub const CONVERSION_INVOLVES_INTERFACE: &str =
        "User-defined conversion '{0}': conversions to or from an interface are not allowed.";
    pub const INVALID_VARIANCE: &str = "Invalid variance: The type parameter '{1}' must be {3} valid on '{0}'. '{1}' is {2}.";
    pub const VARIANCE_ON_NON_INTERFACE: &str = "Invalid variance modifier on '{0}'. Only interface type parameters can be specified as variant.";

    pub const FEATURE_NOT_AVAILABLE_IN_VERSION: &str = "Feature '{0}' is not available in language version {1}. Please use language version {2} or greater.";
    pub const RUNTIME_DOES_NOT_SUPPORT_FEATURE: &str = "Target runtime doesn't support {0} ('{1}').";

    pub const STATIC_CONTRACT_INTERFACE_TYPE_ARGUMENT: &str = "The type '{0}' cannot be used as type argument for '{1}': interface '{2}' has static abstract members that can only be reached through a type parameter constrained to it.";
    pub const STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER: &str =
        "A static virtual or abstract interface member '{0}' can be accessed only on a type parameter.";
    pub const STATIC_MEMBER_THROUGH_INSTANCE: &str = "Member '{0}' cannot be accessed with an instance reference; qualify it with a type name instead.";
    pub const INSTANCE_MEMBER_WITHOUT_INSTANCE: &str =
        "An object reference is required for the non-static member '{0}'.";
    pub const TYPE_PARAMETER_NOT_CONSTRAINED_TO_INTERFACE: &str =
        "Type parameter '{1}' is not constrained to interface '{2}' declaring '{0}'.";
    pub const NON_VIRTUAL_STATIC_THROUGH_TYPE_PARAMETER: &str =
        "Cannot access non-virtual static member '{0}' through type parameter '{1}'.";

    pub const CANNOT_FIND_TYPE: &str = "The type name '{0}' could not be found.";
    pub const WRONG_TYPE_ARGUMENT_COUNT: &str = "Using the generic type '{0}' requires {1} type arguments.";
    pub const DUPLICATE_TYPE_DECLARATION: &str = "The type '{0}' is already declared.";
    pub const PARTIAL_MULTIPLE_DEFINITIONS: &str =
        "A partial member may not have multiple defining declarations ('{0}').";
    pub const BASE_TYPE_MUST_BE_CLASS: &str = "'{0}': base type '{1}' must be a class.";
    pub const NOT_AN_INTERFACE: &str = "'{0}': type '{1}' in interface list is not an interface.";
    pub const UNKNOWN_OPERATOR: &str = "'{0}' is not an overloadable operator.";
    pub const MALFORMED_TYPE_EXPRESSION: &str = "Malformed type expression '{0}': {1}.";

    pub const MALFORMED_HIERARCHY: &str =
        "Malformed type hierarchy: '{0}' participates in a base-type cycle or exceeds the inheritance depth limit.";
}

macro_rules! message_table {
    ($($category:ident $name:ident),* $(,)?) => {
        pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
            $(DiagnosticMessage {
                code: diagnostic_codes::$name,
                category: DiagnosticCategory::$category,
                message: diagnostic_messages::$name,
            },)*
        ];
    };
}

message_table! {
    Error MODIFIER_NOT_VALID_FOR_ITEM,
    Error STATIC_MEMBER_CANNOT_BE_MARKED,
    Error ABSTRACT_MEMBER_CANNOT_BE_VIRTUAL,
    Error ABSTRACT_AND_SEALED,
    Error SEALED_NON_OVERRIDE,
    Error OVERRIDE_WITH_NEW_OR_VIRTUAL,
    Error ABSTRACT_HAS_BODY,
    Error EXTERN_AND_ABSTRACT,
    Error EXTERN_HAS_BODY,
    Error VIRTUAL_OR_ABSTRACT_PRIVATE,
    Error ABSTRACT_FIELD,
    Error MULTIPLE_ACCESS_MODIFIERS,
    Error PARTIAL_IMPLEMENTATION_ABSTRACT,
    Error PARTIAL_DEFINITION_ABSTRACT,
    Error MISSING_BODY,
    Error ABSTRACT_IN_NON_ABSTRACT_TYPE,
    Error INTERFACE_INSTANCE_FIELD,
    Error INTERFACE_INSTANCE_CONSTRUCTOR,
    Error INSTANCE_MEMBER_IN_STATIC_TYPE,
    Error INTERFACE_MEMBER_NOT_IMPLEMENTED,
    Error IMPLEMENTATION_NOT_STATIC,
    Error IMPLEMENTATION_IS_STATIC,
    Error IMPLEMENTATION_NOT_PUBLIC,
    Error IMPLEMENTATION_WRONG_RETURN_TYPE,
    Message CLOSEST_CANDIDATE,
    Error EXPLICIT_IMPLEMENTATION_NOT_FOUND,
    Error EXPLICIT_IMPLEMENTATION_INTERFACE_NOT_DECLARED,
    Error DUPLICATE_EXPLICIT_IMPLEMENTATION,
    Error UNARY_OPERATOR_PARAMETER,
    Error UNARY_OPERATOR_PARAMETER_CONSTRAINED,
    Error INCREMENT_OPERATOR_PARAMETER,
    Error INCREMENT_OPERATOR_PARAMETER_CONSTRAINED,
    Error INCREMENT_OPERATOR_RETURN,
    Error INCREMENT_OPERATOR_RETURN_CONSTRAINED,
    Error BINARY_OPERATOR_PARAMETER,
    Error BINARY_OPERATOR_PARAMETER_CONSTRAINED,
    Error SHIFT_OPERATOR_OPERANDS,
    Error SHIFT_OPERATOR_OPERANDS_CONSTRAINED,
    Error TRUE_FALSE_OPERATOR_RETURN,
    Error OPERATOR_REQUIRES_MATCHING,
    Error DUPLICATE_TRUE_FALSE_OPERATOR,
    Error INTERFACE_OPERATOR_MUST_BE_ABSTRACT,
    Error OPERATOR_MUST_BE_PUBLIC_STATIC,
    Error OPERATOR_WRONG_ARITY,
    Error OPERATOR_RETURNS_VOID,
    Error CONVERSION_MUST_INVOLVE_CONTAINING_TYPE,
    Error CONVERSION_MUST_INVOLVE_CONTAINING_TYPE_CONSTRAINED,
    Error CONVERSION_TO_SELF,
    Error CONVERSION_INVOLVES_INTERFACE,
    Error INVALID_VARIANCE,
    Error VARIANCE_ON_NON_INTERFACE,
    Error FEATURE_NOT_AVAILABLE_IN_VERSION,
    Error RUNTIME_DOES_NOT_SUPPORT_FEATURE,
    Error STATIC_CONTRACT_INTERFACE_TYPE_ARGUMENT,
    Error STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER,
    Error STATIC_MEMBER_THROUGH_INSTANCE,
    Error INSTANCE_MEMBER_WITHOUT_INSTANCE,
    Error TYPE_PARAMETER_NOT_CONSTRAINED_TO_INTERFACE,
    Error NON_VIRTUAL_STATIC_THROUGH_TYPE_PARAMETER,
    Error CANNOT_FIND_TYPE,
    Error WRONG_TYPE_ARGUMENT_COUNT,
    Error DUPLICATE_TYPE_DECLARATION,
    Error PARTIAL_MULTIPLE_DEFINITIONS,
    Error BASE_TYPE_MUST_BE_CLASS,
    Error NOT_AN_INTERFACE,
    Error UNKNOWN_OPERATOR,
    Error MALFORMED_TYPE_EXPRESSION,
    Error MALFORMED_HIERARCHY,
}
