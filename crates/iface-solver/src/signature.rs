//! Signature model.
//!
//! A signature is a member kind plus parameter and return type occurrences.
//! Every occurrence carries an ordered list of annotations (`modopt`/`modreq`
//! style custom modifiers). Annotations never affect identity, so
//! [`signatures_equal`] ignores them, but they must survive unchanged into any
//! synthesized forwarding member, which is why they are kept on the
//! occurrence rather than folded into the type.

use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::intern::TypeInterner;
use crate::members::MemberKind;
use crate::types::TypeId;
use smallvec::SmallVec;

/// A custom modifier attached to one type occurrence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// `modreq` when `true`, `modopt` otherwise.
    pub required: bool,
    pub modifier: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeOccurrence {
    pub ty: TypeId,
    pub annotations: SmallVec<[Annotation; 1]>,
}

impl TypeOccurrence {
    pub fn plain(ty: TypeId) -> Self {
        Self {
            ty,
            annotations: SmallVec::new(),
        }
    }

    pub fn annotated(ty: TypeId, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        Self {
            ty,
            annotations: annotations.into_iter().collect(),
        }
    }
}

impl From<TypeId> for TypeOccurrence {
    fn from(ty: TypeId) -> Self {
        Self::plain(ty)
    }
}

/// Parameter passing mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: String,
    pub ty: TypeOccurrence,
    pub ref_kind: RefKind,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeOccurrence>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ref_kind: RefKind::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub kind: MemberKind,
    pub params: Vec<Param>,
    /// For properties and events this is the property/event type.
    pub ret: TypeOccurrence,
    /// Number of method type parameters.
    pub type_param_count: u32,
}

impl Signature {
    pub fn new(kind: MemberKind, params: Vec<Param>, ret: impl Into<TypeOccurrence>) -> Self {
        Self {
            kind,
            params,
            ret: ret.into(),
            type_param_count: 0,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn param_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.params.iter().map(|p| p.ty.ty)
    }

    /// Return type identity takes part in matching only for conversions.
    fn return_is_identity(&self) -> bool {
        matches!(self.kind, MemberKind::Operator(op) if op.is_conversion())
    }
}

/// Apply `subst` to every parameter and the return type.
///
/// Annotations are copied unchanged unless the annotation modifier is itself
/// a type parameter, in which case it is substituted too.
pub fn canonicalize(
    interner: &TypeInterner,
    signature: &Signature,
    subst: &TypeSubstitution,
) -> Signature {
    if subst.is_empty() {
        return signature.clone();
    }
    let occurrence = |occ: &TypeOccurrence| TypeOccurrence {
        ty: instantiate_type(interner, occ.ty, subst),
        annotations: occ
            .annotations
            .iter()
            .map(|annotation| match interner.as_type_param(annotation.modifier) {
                Some(_) => Annotation {
                    required: annotation.required,
                    modifier: instantiate_type(interner, annotation.modifier, subst),
                },
                None => *annotation,
            })
            .collect(),
    };
    Signature {
        kind: signature.kind,
        params: signature
            .params
            .iter()
            .map(|p| Param {
                name: p.name.clone(),
                ty: occurrence(&p.ty),
                ref_kind: p.ref_kind,
            })
            .collect(),
        ret: occurrence(&signature.ret),
        type_param_count: signature.type_param_count,
    }
}

/// Kind, arity, method type-parameter count, parameter types and passing
/// modes, and return type are identical. Annotations are ignored.
pub fn signatures_equal(a: &Signature, b: &Signature) -> bool {
    a.kind == b.kind
        && a.type_param_count == b.type_param_count
        && a.params.len() == b.params.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(x, y)| x.ty.ty == y.ty.ty && x.ref_kind == y.ref_kind)
        && a.ret.ty == b.ret.ty
}

/// [`signatures_equal`], and every annotation list matches positionally.
pub fn signatures_identical_including_annotations(a: &Signature, b: &Signature) -> bool {
    signatures_equal(a, b)
        && a.ret.annotations == b.ret.annotations
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(x, y)| x.ty.annotations == y.ty.annotations)
}

/// The part of a signature that identifies a member for hiding: parameters
/// and method arity, plus the return type for conversion operators.
///
/// Properties match properties and events match events regardless of the
/// property/event type, which is checked later as the "return type".
pub fn parameters_match(a: &Signature, b: &Signature) -> bool {
    a.kind == b.kind
        && a.type_param_count == b.type_param_count
        && a.params.len() == b.params.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(x, y)| x.ty.ty == y.ty.ty && x.ref_kind == y.ref_kind)
        && (!a.return_is_identity() || a.ret.ty == b.ret.ty)
}

#[cfg(test)]
#[path = "tests/signature_tests.rs"]
mod tests;
