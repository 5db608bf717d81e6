//! The bound program: definitions, members and type parameters, plus the
//! hierarchy queries every component is built on.
//!
//! A `Program` is filled in by the binder and then frozen behind an `Arc`.
//! All queries take `&self`; the only interior mutability is the type
//! interner, which is safe to use from several threads.

use crate::def::{DefKind, TypeDefinition, TypeModifiers};
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::intern::TypeInterner;
use crate::members::{AccessorKind, Member, MemberKind};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::signature::{Signature, canonicalize};
use crate::types::{DefId, MemberId, TypeData, TypeId, TypeParamId, TypeParamInfo};
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::fmt;
use tracing::trace;

type TypeSet = IndexSet<TypeId, FxBuildHasher>;

/// A base-type cycle or an inheritance chain deeper than the configured limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MalformedHierarchy {
    /// The type whose hierarchy walk failed.
    pub ty: TypeId,
    pub fault: HierarchyFault,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HierarchyFault {
    Cycle,
    TooDeep,
}

impl HierarchyFault {
    fn from_denied(result: RecursionResult) -> Self {
        if result.is_cycle() {
            Self::Cycle
        } else {
            Self::TooDeep
        }
    }
}

impl fmt::Display for MalformedHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fault {
            HierarchyFault::Cycle => write!(f, "type {:?} participates in a base-type cycle", self.ty),
            HierarchyFault::TooDeep => {
                write!(f, "type {:?} exceeds the inheritance depth limit", self.ty)
            }
        }
    }
}

impl std::error::Error for MalformedHierarchy {}

#[derive(Default)]
pub struct Program {
    pub interner: TypeInterner,
    defs: Vec<TypeDefinition>,
    members: Vec<Member>,
    type_params: Vec<TypeParamInfo>,
    names: FxHashMap<String, DefId>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Declare a type. Type parameters are added with [`Self::add_type_param`]
    /// followed by [`Self::refresh_self_type`].
    pub fn declare_type(
        &mut self,
        name: impl Into<String>,
        kind: DefKind,
        modifiers: TypeModifiers,
    ) -> DefId {
        let id = DefId(self.defs.len() as u32);
        let name = name.into();
        let self_type = self.interner.named(id, []);
        self.names.entry(name.clone()).or_insert(id);
        trace!(def = id.0, name = %name, kind = kind.keyword(), "declare_type");
        self.defs.push(TypeDefinition {
            id,
            name,
            kind,
            modifiers,
            type_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            self_type,
        });
        id
    }

    pub fn add_type_param(&mut self, info: TypeParamInfo) -> TypeParamId {
        let id = TypeParamId(self.type_params.len() as u32);
        self.type_params.push(info);
        id
    }

    /// Recompute `self_type` after the type parameter list changed.
    pub fn refresh_self_type(&mut self, def: DefId) {
        let args: Vec<TypeId> = self.defs[def.0 as usize]
            .type_params
            .iter()
            .map(|&param| self.interner.type_param(param))
            .collect();
        let self_type = self.interner.named(def, args);
        self.defs[def.0 as usize].self_type = self_type;
    }

    /// Add a member to its declaring type. The member's `id` is assigned here.
    pub fn add_member(&mut self, mut member: Member) -> MemberId {
        let id = MemberId(self.members.len() as u32);
        member.id = id;
        let declaring = member.declaring;
        self.members.push(member);
        self.defs[declaring.0 as usize].members.push(id);
        id
    }

    pub fn def_mut(&mut self, id: DefId) -> &mut TypeDefinition {
        &mut self.defs[id.0 as usize]
    }

    pub fn member_mut(&mut self, id: MemberId) -> &mut Member {
        &mut self.members[id.0 as usize]
    }

    pub fn type_param_mut(&mut self, id: TypeParamId) -> &mut TypeParamInfo {
        &mut self.type_params[id.0 as usize]
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn def(&self, id: DefId) -> &TypeDefinition {
        &self.defs[id.0 as usize]
    }

    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.0 as usize]
    }

    pub fn type_param(&self, id: TypeParamId) -> &TypeParamInfo {
        &self.type_params[id.0 as usize]
    }

    pub fn defs(&self) -> &[TypeDefinition] {
        &self.defs
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn def_by_name(&self, name: &str) -> Option<DefId> {
        self.names.get(name).copied()
    }

    /// The definition a (possibly instantiated) named type refers to.
    pub fn def_of(&self, ty: TypeId) -> Option<&TypeDefinition> {
        let (def, _) = self.interner.as_named(ty)?;
        Some(self.def(def))
    }

    pub fn is_interface_type(&self, ty: TypeId) -> bool {
        self.def_of(ty).is_some_and(TypeDefinition::is_interface)
    }

    pub fn accessor_of(&self, member: MemberId, kind: AccessorKind) -> Option<MemberId> {
        self.member(member)
            .accessors
            .iter()
            .copied()
            .find(|&id| self.member(id).kind == MemberKind::Accessor(kind))
    }

    // =========================================================================
    // Instantiation
    // =========================================================================

    /// Substitution mapping a named type's declaration parameters to its arguments.
    pub fn substitution_of(&self, ty: TypeId) -> TypeSubstitution {
        match self.interner.as_named(ty) {
            Some((def, args)) => TypeSubstitution::from_args(&self.def(def).type_params, &args),
            None => TypeSubstitution::new(),
        }
    }

    /// Signature of interface member `slot` as seen through `interface`, with
    /// its method type parameters renamed to `candidate`'s by ordinal so the
    /// result compares directly against `candidate`'s own signature.
    pub fn slot_signature(&self, interface: TypeId, slot: MemberId, candidate: MemberId) -> Signature {
        let mut subst = self.substitution_of(interface);
        let slot_params = &self.member(slot).type_params;
        let candidate_params = &self.member(candidate).type_params;
        for (&from, &to) in slot_params.iter().zip(candidate_params) {
            subst.insert(from, self.interner.type_param(to));
        }
        canonicalize(&self.interner, &self.member(slot).signature, &subst)
    }

    pub fn instantiate(&self, ty: TypeId, subst: &TypeSubstitution) -> TypeId {
        instantiate_type(&self.interner, ty, subst)
    }

    /// Base class of `ty`, instantiated with `ty`'s type arguments.
    pub fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        let def = self.def_of(ty)?;
        let base = def.base?;
        Some(self.instantiate(base, &self.substitution_of(ty)))
    }

    /// Directly listed interfaces of `ty`, instantiated.
    pub fn direct_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let Some(def) = self.def_of(ty) else {
            return Vec::new();
        };
        let subst = self.substitution_of(ty);
        def.interfaces
            .iter()
            .map(|&iface| self.instantiate(iface, &subst))
            .collect()
    }

    // =========================================================================
    // Hierarchy walks
    // =========================================================================

    /// `ty` followed by its base classes, most derived first.
    pub fn base_chain(&self, ty: TypeId) -> Result<Vec<TypeId>, MalformedHierarchy> {
        let mut guard: RecursionGuard<DefId> =
            RecursionGuard::with_profile(RecursionProfile::BaseChain);
        let mut chain = Vec::new();
        let mut current = Some(ty);
        let mut result = Ok(());
        while let Some(level) = current {
            let Some((def, _)) = self.interner.as_named(level) else {
                break;
            };
            let entered = guard.enter(def);
            if entered.is_denied() {
                trace!(ty = ty.0, def = def.0, ?entered, "base_chain: malformed");
                result = Err(MalformedHierarchy {
                    ty,
                    fault: HierarchyFault::from_denied(entered),
                });
                break;
            }
            chain.push(level);
            current = self.base_type(level);
        }
        guard.reset();
        result.map(|()| chain)
    }

    /// Interfaces listed by `ty` itself and their base interfaces, in
    /// depth-first declaration order. Interfaces inherited through base
    /// classes are not included.
    pub fn declared_interface_closure(&self, ty: TypeId) -> Vec<TypeId> {
        let mut set = TypeSet::default();
        let mut guard = RecursionGuard::with_profile(RecursionProfile::InterfaceClosure);
        self.collect_interfaces(ty, &mut set, &mut guard);
        set.into_iter().collect()
    }

    fn collect_interfaces(&self, ty: TypeId, set: &mut TypeSet, guard: &mut RecursionGuard<TypeId>) {
        let _ = guard.scope(ty, |guard| {
            for iface in self.direct_interfaces(ty) {
                if set.insert(iface) {
                    self.collect_interfaces(iface, set, guard);
                }
            }
        });
    }

    /// Every interface `ty` implements: its own closure, then each base
    /// class's closure. A malformed base chain truncates the walk.
    pub fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let chain = match self.base_chain(ty) {
            Ok(chain) => chain,
            Err(_) => vec![ty],
        };
        let mut set = TypeSet::default();
        for level in chain {
            set.extend(self.declared_interface_closure(level));
        }
        set.into_iter().collect()
    }

    /// `true` when `ty` re-declares `iface` in its own interface list
    /// (directly or through a listed interface's bases).
    pub fn declares_interface(&self, ty: TypeId, iface: TypeId) -> bool {
        self.declared_interface_closure(ty).contains(&iface)
    }

    /// `true` when the interface graph reachable from `def` contains a cycle.
    pub fn has_interface_cycle(&self, def: DefId) -> bool {
        let mut guard: RecursionGuard<DefId> =
            RecursionGuard::with_profile(RecursionProfile::InterfaceClosure);
        let found = self.interface_cycle_from(def, &mut guard);
        guard.reset();
        found
    }

    fn interface_cycle_from(&self, def: DefId, guard: &mut RecursionGuard<DefId>) -> bool {
        match guard.enter(def) {
            RecursionResult::Entered => {}
            _ => return true,
        }
        let found = self.def(def).interfaces.iter().any(|&iface| {
            self.interner
                .as_named(iface)
                .is_some_and(|(base, _)| self.interface_cycle_from(base, guard))
        });
        guard.leave(def);
        found
    }

    /// Transitive constraint types of a type parameter. Constraints that are
    /// themselves type parameters are followed; class and interface
    /// constraints contribute themselves and everything they implement.
    pub fn constraint_closure(&self, param: TypeParamId) -> Vec<TypeId> {
        let mut set = TypeSet::default();
        let mut guard = RecursionGuard::with_profile(RecursionProfile::ConstraintChain);
        self.collect_constraints(param, &mut set, &mut guard);
        set.into_iter().collect()
    }

    fn collect_constraints(
        &self,
        param: TypeParamId,
        set: &mut TypeSet,
        guard: &mut RecursionGuard<TypeParamId>,
    ) {
        let _ = guard.scope(param, |guard| {
            for &constraint in &self.type_param(param).constraints {
                if let Some(inner) = self.interner.as_type_param(constraint) {
                    self.collect_constraints(inner, set, guard);
                    continue;
                }
                if set.insert(constraint) {
                    if let Ok(chain) = self.base_chain(constraint) {
                        set.extend(chain.into_iter().skip(1));
                    }
                    set.extend(self.all_interfaces(constraint));
                }
            }
        });
    }

    pub fn is_constrained_to(&self, param: TypeParamId, target: TypeId) -> bool {
        self.constraint_closure(param).contains(&target)
    }

    /// Identity, base-class derivation, interface implementation, or a type
    /// parameter whose constraints derive from `target`.
    pub fn is_derived_from(&self, ty: TypeId, target: TypeId) -> bool {
        if ty == target {
            return true;
        }
        if let Some(param) = self.interner.as_type_param(ty) {
            return self.is_constrained_to(param, target);
        }
        match self.interner.lookup(ty) {
            Some(TypeData::Named { .. }) => {
                self.base_chain(ty).is_ok_and(|chain| chain.contains(&target))
                    || self.all_interfaces(ty).contains(&target)
            }
            _ => false,
        }
    }

    /// Members of `iface`'s declaration that introduce a slot, with each
    /// property/event followed by its accessors.
    pub fn interface_slots(&self, iface: TypeId) -> Vec<MemberId> {
        let Some(def) = self.def_of(iface) else {
            return Vec::new();
        };
        if !def.is_interface() {
            return Vec::new();
        }
        let mut slots = Vec::new();
        for &id in &def.members {
            let member = self.member(id);
            if member.kind.is_accessor() || !member.is_interface_slot() {
                continue;
            }
            slots.push(id);
            slots.extend(member.accessors.iter().copied());
        }
        slots
    }
}

#[cfg(test)]
#[path = "tests/program_tests.rs"]
mod tests;
