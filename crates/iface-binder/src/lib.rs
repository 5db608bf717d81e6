//! Binding for the iface interface-resolution engine.
//!
//! The binder takes declaration records (from JSON or built in code), resolves
//! every type expression against the declared types, validates each member's
//! modifiers, links partial members and explicit implementations, and hands
//! back a [`iface_solver::Program`] with the diagnostics found on the way.

// Declaration records and their JSON form
pub mod declarations;
pub use declarations::{
    AccessorDeclaration, AccessorToken, AnnotationDecl, CompilationUnit, MemberDeclKind,
    MemberDeclaration, ModifierToken, ParamDeclaration, RefToken, TypeDeclaration, TypeKind,
    TypeParamDeclaration, VarianceToken,
};

// Type expressions as written
pub mod type_expr;
pub use type_expr::{TypeExpr, TypeExprError};

// Modifier rule table
pub mod modifiers;
pub use modifiers::{MemberShape, ModifierConflict, ModifierOutcome, PartialRole};

// Binder state and phases
mod state;
mod state_members;
mod state_types;
pub use state::{BindResult, BinderState, bind, bind_unit};
