//! Declaration records.
//!
//! These are what a parser hands to the engine: one record per type and per
//! member, with modifiers as written and type expressions as source text.
//! They deserialize from the JSON compilation-unit format and can also be
//! assembled in code with the fluent constructors below:
//!
//! ```
//! use iface_binder::{MemberDeclaration, ModifierToken, TypeDeclaration};
//!
//! let iface = TypeDeclaration::interface("I1").member(
//!     MemberDeclaration::method("M", "void")
//!         .modifier(ModifierToken::Static)
//!         .modifier(ModifierToken::Abstract),
//! );
//! let class = TypeDeclaration::class("C").implements("I1").member(
//!     MemberDeclaration::method("M", "void")
//!         .modifier(ModifierToken::Public)
//!         .modifier(ModifierToken::Static)
//!         .body(),
//! );
//! # let _ = (iface, class);
//! ```

use iface_common::Capabilities;
use iface_solver::{AccessorKind, DefKind, Modifiers, RefKind, Variance};
use serde::{Deserialize, Serialize};

/// A whole input: optional capability options plus type declarations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Capabilities>,
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn with_options(mut self, options: Capabilities) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_type(mut self, decl: TypeDeclaration) -> Self {
        self.types.push(decl);
        self
    }
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Interface,
    Class,
    Struct,
}

impl From<TypeKind> for DefKind {
    fn from(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Interface => DefKind::Interface,
            TypeKind::Class => DefKind::Class,
            TypeKind::Struct => DefKind::Struct,
        }
    }
}

/// A modifier keyword as written.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierToken {
    Public,
    Protected,
    Internal,
    Private,
    New,
    Static,
    Abstract,
    Virtual,
    Sealed,
    Override,
    Extern,
    Partial,
    Readonly,
}

impl ModifierToken {
    pub const fn to_modifiers(self) -> Modifiers {
        match self {
            Self::Public => Modifiers::PUBLIC,
            Self::Protected => Modifiers::PROTECTED,
            Self::Internal => Modifiers::INTERNAL,
            Self::Private => Modifiers::PRIVATE,
            Self::New => Modifiers::NEW,
            Self::Static => Modifiers::STATIC,
            Self::Abstract => Modifiers::ABSTRACT,
            Self::Virtual => Modifiers::VIRTUAL,
            Self::Sealed => Modifiers::SEALED,
            Self::Override => Modifiers::OVERRIDE,
            Self::Extern => Modifiers::EXTERN,
            Self::Partial => Modifiers::PARTIAL,
            Self::Readonly => Modifiers::READONLY,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceToken {
    In,
    Out,
}

impl From<VarianceToken> for Variance {
    fn from(token: VarianceToken) -> Self {
        match token {
            VarianceToken::In => Variance::Contravariant,
            VarianceToken::Out => Variance::Covariant,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefToken {
    Ref,
    Out,
    In,
}

impl From<RefToken> for RefKind {
    fn from(token: RefToken) -> Self {
        match token {
            RefToken::Ref => RefKind::Ref,
            RefToken::Out => RefKind::Out,
            RefToken::In => RefKind::In,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorToken {
    Get,
    Set,
    Add,
    Remove,
}

impl From<AccessorToken> for AccessorKind {
    fn from(token: AccessorToken) -> Self {
        match token {
            AccessorToken::Get => AccessorKind::Get,
            AccessorToken::Set => AccessorKind::Set,
            AccessorToken::Add => AccessorKind::Add,
            AccessorToken::Remove => AccessorKind::Remove,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberDeclKind {
    Method,
    Property,
    Indexer,
    Event,
    Operator,
    Constructor,
    Field,
}

// =============================================================================
// Records
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParamDeclaration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<VarianceToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

impl TypeParamDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variance: None,
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn covariant(mut self) -> Self {
        self.variance = Some(VarianceToken::Out);
        self
    }

    #[must_use]
    pub fn contravariant(mut self) -> Self {
        self.variance = Some(VarianceToken::In);
        self
    }

    #[must_use]
    pub fn constraint(mut self, ty: impl Into<String>) -> Self {
        self.constraints.push(ty.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParamDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Vec::new(),
            type_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    #[must_use]
    pub fn modifier(mut self, token: ModifierToken) -> Self {
        self.modifiers.push(token);
        self
    }

    /// Add an invariant, unconstrained type parameter.
    #[must_use]
    pub fn generic(self, name: impl Into<String>) -> Self {
        self.type_param(TypeParamDeclaration::new(name))
    }

    #[must_use]
    pub fn type_param(mut self, param: TypeParamDeclaration) -> Self {
        self.type_params.push(param);
        self
    }

    /// Set the base class.
    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add an interface to the interface list (base interfaces for an interface).
    #[must_use]
    pub fn implements(mut self, iface: impl Into<String>) -> Self {
        self.interfaces.push(iface.into());
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }
}

/// A custom modifier on a type occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDecl {
    #[serde(default)]
    pub required: bool,
    pub modifier: String,
}

impl AnnotationDecl {
    pub fn optional(modifier: impl Into<String>) -> Self {
        Self {
            required: false,
            modifier: modifier.into(),
        }
    }

    pub fn required(modifier: impl Into<String>) -> Self {
        Self {
            required: true,
            modifier: modifier.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_kind: Option<RefToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDecl>,
}

impl ParamDeclaration {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ref_kind: None,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn by_ref(mut self, kind: RefToken) -> Self {
        self.ref_kind = Some(kind);
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationDecl) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorDeclaration {
    pub kind: AccessorToken,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierToken>,
    #[serde(default)]
    pub has_body: bool,
}

impl AccessorDeclaration {
    pub fn new(kind: AccessorToken) -> Self {
        Self {
            kind,
            modifiers: Vec::new(),
            has_body: false,
        }
    }

    #[must_use]
    pub fn modifier(mut self, token: ModifierToken) -> Self {
        self.modifiers.push(token);
        self
    }

    #[must_use]
    pub fn body(mut self) -> Self {
        self.has_body = true;
        self
    }
}

/// One member declaration.
///
/// `name` is the operator token (`+`, `==`, `implicit`) for operators and is
/// ignored for indexers and constructors. `return_type` is the property,
/// indexer, event or field type for those kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDeclaration {
    pub kind: MemberDeclKind,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierToken>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParamDeclaration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDeclaration>,
    #[serde(default = "void_type")]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub return_annotations: Vec<AnnotationDecl>,
    #[serde(default)]
    pub has_body: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessors: Vec<AccessorDeclaration>,
    /// Qualifying interface of an explicit implementation (`I<int>` in
    /// `void I<int>.M()`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<String>,
}

fn void_type() -> String {
    "void".to_string()
}

impl MemberDeclaration {
    pub fn new(kind: MemberDeclKind, name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Vec::new(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: ty.into(),
            return_annotations: Vec::new(),
            has_body: false,
            accessors: Vec::new(),
            explicit_interface: None,
        }
    }

    pub fn method(name: impl Into<String>, ret: impl Into<String>) -> Self {
        Self::new(MemberDeclKind::Method, name, ret)
    }

    pub fn property(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(MemberDeclKind::Property, name, ty)
    }

    pub fn indexer(ty: impl Into<String>) -> Self {
        Self::new(MemberDeclKind::Indexer, "this", ty)
    }

    pub fn event(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(MemberDeclKind::Event, name, ty)
    }

    pub fn operator(token: impl Into<String>, ret: impl Into<String>) -> Self {
        Self::new(MemberDeclKind::Operator, token, ret)
    }

    pub fn constructor() -> Self {
        Self::new(MemberDeclKind::Constructor, ".ctor", "void")
    }

    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(MemberDeclKind::Field, name, ty)
    }

    #[must_use]
    pub fn modifier(mut self, token: ModifierToken) -> Self {
        self.modifiers.push(token);
        self
    }

    #[must_use]
    pub fn modifiers(mut self, tokens: impl IntoIterator<Item = ModifierToken>) -> Self {
        self.modifiers.extend(tokens);
        self
    }

    #[must_use]
    pub fn type_param(mut self, param: TypeParamDeclaration) -> Self {
        self.type_params.push(param);
        self
    }

    #[must_use]
    pub fn param(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.param_decl(ParamDeclaration::new(name, ty))
    }

    #[must_use]
    pub fn param_decl(mut self, param: ParamDeclaration) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn return_annotation(mut self, annotation: AnnotationDecl) -> Self {
        self.return_annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn body(mut self) -> Self {
        self.has_body = true;
        self
    }

    #[must_use]
    pub fn accessor(mut self, accessor: AccessorDeclaration) -> Self {
        self.accessors.push(accessor);
        self
    }

    #[must_use]
    pub fn getter(self) -> Self {
        self.accessor(AccessorDeclaration::new(AccessorToken::Get))
    }

    #[must_use]
    pub fn setter(self) -> Self {
        self.accessor(AccessorDeclaration::new(AccessorToken::Set))
    }

    #[must_use]
    pub fn explicit(mut self, iface: impl Into<String>) -> Self {
        self.explicit_interface = Some(iface.into());
        self
    }
}

#[cfg(test)]
#[path = "tests/declarations_tests.rs"]
mod tests;
