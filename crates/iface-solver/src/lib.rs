//! Type, member and signature model for the interface-resolution engine.
//!
//! This crate holds everything the validators and the matching engine share:
//!
//! - **Interning**: structural `TypeData` interned to `TypeId` (O(1) identity)
//! - **Program**: bound definitions, members and type parameters plus the
//!   hierarchy walks (base chains, interface closures, constraint closures)
//! - **Signatures**: substitution-aware comparison that ignores annotations
//!   for identity but keeps them for forwarding stubs
//! - **Variance** and the **constraint gate** for static-contract interfaces
//! - **Pending diagnostics** with typed arguments, rendered by
//!   `DiagnosticFormatter`
mod constraints;
pub mod def;
pub mod diagnostics;
mod format;
mod instantiate;
mod intern;
pub mod members;
mod program;
pub mod recursion;
pub mod signature;
pub mod types;
pub mod variance;

pub use constraints::{ConstraintGate, Generic, StaticContractIndex};
pub use def::{DefKind, TypeDefinition, TypeModifiers};
pub use diagnostics::{
    DiagnosticArg, DiagnosticLocation, DiagnosticSeverity, PendingDiagnostic, codes,
};
pub use format::{DiagnosticFormatter, TypeFormatter};
pub use instantiate::{TypeSubstitution, instantiate_type};
pub use intern::TypeInterner;
pub use members::{
    AccessorKind, ExplicitTarget, Member, MemberKind, Modifiers, OperatorCategory, OperatorToken,
    PartialPart, SlotKind,
};
pub use program::{HierarchyFault, MalformedHierarchy, Program};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use signature::{
    Annotation, Param, RefKind, Signature, TypeOccurrence, canonicalize, parameters_match,
    signatures_equal, signatures_identical_including_annotations,
};
pub use types::{
    DefId, IntrinsicKind, MemberId, TypeData, TypeId, TypeParamId, TypeParamInfo, TypeParamOwner,
    Variance,
};
pub use variance::{Position, VarianceChecker, VarianceViolation, check_interface_variance};
