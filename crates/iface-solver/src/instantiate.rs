//! Type substitution.

use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::{TypeData, TypeId, TypeParamId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Mapping from type parameters to the types replacing them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeParamId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `params` with `args` positionally. Extra entries on either side
    /// are ignored; arity errors are reported during binding.
    pub fn from_args(params: &[TypeParamId], args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (&param, &arg) in params.iter().zip(args) {
            subst.insert(param, arg);
        }
        subst
    }

    pub fn insert(&mut self, param: TypeParamId, ty: TypeId) {
        self.map.insert(param, ty);
    }

    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Adds every mapping of `other` not already present.
    pub fn extend_from(&mut self, other: &Self) {
        for (&param, &ty) in &other.map {
            self.map.entry(param).or_insert(ty);
        }
    }
}

/// Replace every type-parameter occurrence in `ty` per `subst`.
pub fn instantiate_type(interner: &TypeInterner, ty: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() || ty.is_intrinsic() {
        return ty;
    }
    let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeNesting);
    instantiate_inner(interner, ty, subst, &mut guard)
}

fn instantiate_inner(
    interner: &TypeInterner,
    ty: TypeId,
    subst: &TypeSubstitution,
    guard: &mut RecursionGuard<TypeId>,
) -> TypeId {
    if ty.is_intrinsic() {
        return ty;
    }
    let Some(data) = interner.lookup(ty) else {
        return ty;
    };
    // Interned types are acyclic; the guard only bounds pathological nesting.
    guard
        .scope(ty, |guard| match data {
            TypeData::Intrinsic(_) => ty,
            TypeData::TypeParam(param) => subst.get(param).unwrap_or(ty),
            TypeData::Named { def, args } => {
                let new_args: SmallVec<[TypeId; 2]> = args
                    .iter()
                    .map(|&arg| instantiate_inner(interner, arg, subst, guard))
                    .collect();
                if new_args == args {
                    ty
                } else {
                    interner.intern(TypeData::Named {
                        def,
                        args: new_args,
                    })
                }
            }
            TypeData::Array(element) => {
                let element = instantiate_inner(interner, element, subst, guard);
                interner.array(element)
            }
            TypeData::Nullable(inner) => {
                let inner = instantiate_inner(interner, inner, subst, guard);
                interner.nullable(inner)
            }
        })
        .unwrap_or(ty)
}

#[cfg(test)]
#[path = "tests/instantiate_tests.rs"]
mod tests;
