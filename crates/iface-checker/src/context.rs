//! The compilation object and its memoized queries.
//!
//! A `Compilation` owns a bound program frozen behind an `Arc` plus the
//! per-compilation caches. Implementation maps are keyed by
//! `(type, capability snapshot)`, computed in full on first request and
//! published with first-writer-wins semantics, so concurrent callers never
//! observe a partial map. A race costs at most a redundant computation.
//!
//! Map requests recurse into the base type's map. The in-progress set for
//! that recursion is local to one request (a `RecursionGuard`), so a
//! re-entrant request for a type already being computed on the same call
//! stack turns into a `MalformedHierarchy` instead of unbounded recursion,
//! while unrelated threads computing the same type are unaffected.

use crate::implementation_map::{
    EmittedImplementation, ImplementationMap, InterfaceSlot, Resolution, Unimplemented,
};
use crate::matching::MapBuilder;
use crate::receiver::{ReceiverContext, is_usable_as_receiver};
use dashmap::DashMap;
use iface_binder::{BindResult, CompilationUnit, bind, bind_unit};
use iface_common::Capabilities;
use iface_solver::{
    ConstraintGate, DefId, DiagnosticFormatter, Generic, HierarchyFault, MalformedHierarchy,
    MemberId, PendingDiagnostic, Program, RecursionGuard, RecursionProfile, RecursionResult,
    StaticContractIndex, TypeId,
};
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::{debug, trace};

pub type MapResult = Result<Arc<ImplementationMap>, MalformedHierarchy>;

pub struct Compilation {
    program: Arc<Program>,
    capabilities: Capabilities,
    bind_diagnostics: Vec<PendingDiagnostic>,
    maps: DashMap<(TypeId, Capabilities), MapResult, FxBuildHasher>,
    static_contracts: StaticContractIndex,
}

impl Compilation {
    pub fn new(bound: BindResult) -> Self {
        Self {
            program: Arc::new(bound.program),
            capabilities: bound.capabilities,
            bind_diagnostics: bound.diagnostics,
            maps: DashMap::default(),
            static_contracts: StaticContractIndex::new(),
        }
    }

    /// Bind `unit` under its own options.
    pub fn from_unit(unit: &CompilationUnit) -> Self {
        Self::new(bind_unit(unit))
    }

    pub fn with_capabilities(unit: &CompilationUnit, capabilities: Capabilities) -> Self {
        Self::new(bind(unit, capabilities))
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn shared_program(&self) -> Arc<Program> {
        Arc::clone(&self.program)
    }

    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Diagnostics raised while binding, in the order they were found.
    pub fn bind_diagnostics(&self) -> &[PendingDiagnostic] {
        &self.bind_diagnostics
    }

    pub fn formatter(&self) -> DiagnosticFormatter<'_> {
        DiagnosticFormatter::new(&self.program)
    }

    /// Drop every cached answer. Required after the program changes.
    pub fn invalidate(&self) {
        self.maps.clear();
        self.static_contracts.clear();
    }

    // =========================================================================
    // Implementation maps
    // =========================================================================

    pub fn implementation_map(&self, ty: TypeId) -> MapResult {
        self.implementation_map_with(ty, self.capabilities)
    }

    /// The map of `def` instantiated with its own type parameters.
    pub fn implementation_map_for_def(&self, def: DefId) -> MapResult {
        self.implementation_map(self.program.def(def).self_type)
    }

    pub fn implementation_map_with(&self, ty: TypeId, capabilities: Capabilities) -> MapResult {
        let mut guard: RecursionGuard<TypeId> =
            RecursionGuard::with_profile(RecursionProfile::BaseChain);
        let result = self.map_guarded(ty, capabilities, &mut guard);
        guard.reset();
        result
    }

    fn map_guarded(
        &self,
        ty: TypeId,
        capabilities: Capabilities,
        guard: &mut RecursionGuard<TypeId>,
    ) -> MapResult {
        let key = (ty, capabilities);
        if let Some(hit) = self.maps.get(&key) {
            trace!(ty = ty.0, "implementation map: cache hit");
            return hit.value().clone();
        }
        match guard.enter(ty) {
            RecursionResult::Entered => {}
            denied => {
                debug!(ty = ty.0, ?denied, "implementation map: re-entrant request");
                return Err(MalformedHierarchy {
                    ty,
                    fault: if denied.is_cycle() {
                        HierarchyFault::Cycle
                    } else {
                        HierarchyFault::TooDeep
                    },
                });
            }
        }
        let computed = self.compute_map(ty, capabilities, guard);
        guard.leave(ty);
        let published = self.maps.entry(key).or_insert(computed).value().clone();
        debug!(ty = ty.0, ok = published.is_ok(), "implementation map published");
        published
    }

    fn compute_map(
        &self,
        ty: TypeId,
        capabilities: Capabilities,
        guard: &mut RecursionGuard<TypeId>,
    ) -> MapResult {
        let program = &*self.program;
        let Some(def) = program.def_of(ty) else {
            return Ok(Arc::new(ImplementationMap::new(ty)));
        };
        let chain = program.base_chain(ty)?;
        let base_map = match chain.get(1) {
            Some(&base) => Some(self.map_guarded(base, capabilities, guard)?),
            None => None,
        };
        let map = MapBuilder::new(program, capabilities, def, ty, chain, base_map).build();
        Ok(Arc::new(map))
    }

    // =========================================================================
    // Consumer queries
    // =========================================================================

    /// The semantic answer for one slot. A slot of an interface `ty` does
    /// not implement is reported as missing.
    pub fn resolve_implementation(
        &self,
        ty: TypeId,
        slot: InterfaceSlot,
    ) -> Result<Resolution, MalformedHierarchy> {
        let map = self.implementation_map(ty)?;
        Ok(map
            .resolution(slot)
            .unwrap_or(Resolution::Unresolved(Unimplemented::missing())))
    }

    /// The emission answer for one slot: a member or a forwarding stub.
    pub fn emitted_implementation(
        &self,
        ty: TypeId,
        slot: InterfaceSlot,
    ) -> Result<Option<EmittedImplementation>, MalformedHierarchy> {
        let map = self.implementation_map(ty)?;
        Ok(map.emitted(slot).cloned())
    }

    pub fn has_static_contract_members(&self, iface: TypeId) -> bool {
        self.static_contracts
            .has_static_contract_members(&self.program, iface)
    }

    /// Gate a type-argument list supplied to a generic type or method.
    pub fn check_instantiation(&self, generic: Generic, args: &[TypeId]) -> Vec<PendingDiagnostic> {
        self.constraint_gate().check_instantiation(generic, args)
    }

    pub fn constraint_gate(&self) -> ConstraintGate<'_> {
        ConstraintGate::new(&self.program, &self.static_contracts)
    }

    pub fn is_usable_as_receiver(
        &self,
        member: MemberId,
        context: ReceiverContext,
    ) -> Result<(), PendingDiagnostic> {
        is_usable_as_receiver(&self.program, member, context)
    }
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod tests;
