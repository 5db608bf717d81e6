//! Concurrent type interner.
//!
//! Binding interns every type expression it resolves; substitution during
//! resolution interns instantiated types on demand, possibly from several
//! analysis threads at once. The map is a sharded `DashMap` and the reverse
//! table an append-only vector behind an `RwLock`.

use crate::types::{DefId, IntrinsicKind, TypeData, TypeId, TypeParamId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::{PoisonError, RwLock};

pub struct TypeInterner {
    map: DashMap<TypeData, TypeId, FxBuildHasher>,
    types: RwLock<Vec<TypeData>>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = Self {
            map: DashMap::with_hasher(FxBuildHasher),
            types: RwLock::new(Vec::with_capacity(64)),
        };
        for kind in IntrinsicKind::ALL {
            let id = interner.intern(TypeData::Intrinsic(kind));
            debug_assert_eq!(id, kind.type_id());
        }
        interner
    }

    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.map.get(&data) {
            return *id;
        }
        match self.map.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.0 as usize).cloned()
    }

    /// Number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Convenience constructors

    pub fn named(&self, def: DefId, args: impl IntoIterator<Item = TypeId>) -> TypeId {
        self.intern(TypeData::Named {
            def,
            args: args.into_iter().collect::<SmallVec<[TypeId; 2]>>(),
        })
    }

    pub fn type_param(&self, param: TypeParamId) -> TypeId {
        self.intern(TypeData::TypeParam(param))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn nullable(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::Nullable(inner))
    }

    // Shallow queries

    pub fn as_type_param(&self, id: TypeId) -> Option<TypeParamId> {
        match self.lookup(id)? {
            TypeData::TypeParam(param) => Some(param),
            _ => None,
        }
    }

    pub fn as_named(&self, id: TypeId) -> Option<(DefId, SmallVec<[TypeId; 2]>)> {
        match self.lookup(id)? {
            TypeData::Named { def, args } => Some((def, args)),
            _ => None,
        }
    }

    pub fn nullable_inner(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::Nullable(inner) => Some(inner),
            _ => None,
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;
