//! Static-contract index and the generic instantiation gate.
//!
//! An interface "has static contract members" when it, or any interface it
//! extends, declares a static member without a mandatory body. Such an
//! interface may only be used as a constraint satisfied through another type
//! parameter: supplying a concrete type argument for a parameter constrained
//! to it is rejected.

use crate::diagnostics::{DiagnosticArg, PendingDiagnostic, codes};
use crate::instantiate::TypeSubstitution;
use crate::program::Program;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::{DefId, MemberId, TypeData, TypeId, TypeParamId};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;

/// Memoized "has static contract members" per interface declaration.
///
/// Safe to share between threads; a race computes the same answer twice.
#[derive(Default)]
pub struct StaticContractIndex {
    cache: DashMap<DefId, bool, FxBuildHasher>,
}

impl StaticContractIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when `iface` (or a base interface, transitively) declares a
    /// static-contract member. Non-interface types answer `false`.
    pub fn has_static_contract_members(&self, program: &Program, iface: TypeId) -> bool {
        let Some(def) = program.def_of(iface) else {
            return false;
        };
        if !def.is_interface() {
            return false;
        }
        let mut guard = RecursionGuard::with_profile(RecursionProfile::InterfaceClosure);
        let found = self.lookup_def(program, def.id, &mut guard);
        guard.reset();
        found
    }

    fn lookup_def(&self, program: &Program, def: DefId, guard: &mut RecursionGuard<DefId>) -> bool {
        if let Some(hit) = self.cache.get(&def).map(|entry| *entry) {
            return hit;
        }
        let computed = guard.scope(def, |guard| {
            let decl = program.def(def);
            decl.members
                .iter()
                .any(|&m| program.member(m).has_static_contract())
                || decl.interfaces.iter().any(|&base| {
                    program.interner.as_named(base).is_some_and(|(base_def, _)| {
                        program.def(base_def).is_interface()
                            && self.lookup_def(program, base_def, guard)
                    })
                })
        });
        match computed {
            Ok(found) => {
                self.cache.insert(def, found);
                found
            }
            // Cyclic interface lists are reported elsewhere; leave them uncached.
            Err(_) => false,
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// The generic declaration a list of type arguments is supplied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Generic {
    Type(DefId),
    Method(MemberId),
}

impl Generic {
    fn params<'p>(&self, program: &'p Program) -> &'p [TypeParamId] {
        match *self {
            Self::Type(def) => &program.def(def).type_params,
            Self::Method(member) => &program.member(member).type_params,
        }
    }

    fn as_arg(self) -> DiagnosticArg {
        match self {
            Self::Type(def) => DiagnosticArg::Def(def),
            Self::Method(member) => DiagnosticArg::Member(member),
        }
    }
}

/// Structural check of type arguments against static-contract constraints.
pub struct ConstraintGate<'a> {
    program: &'a Program,
    index: &'a StaticContractIndex,
}

impl<'a> ConstraintGate<'a> {
    pub fn new(program: &'a Program, index: &'a StaticContractIndex) -> Self {
        Self { program, index }
    }

    /// Check one argument for one parameter. `subst` maps the generic's
    /// parameters to the full argument list so constraints like `I<T>` are
    /// compared in their instantiated form.
    pub fn check_type_argument(
        &self,
        generic: Generic,
        param: TypeParamId,
        arg: TypeId,
        subst: &TypeSubstitution,
    ) -> Option<PendingDiagnostic> {
        let program = self.program;
        for &constraint in &program.type_param(param).constraints {
            let constraint = program.instantiate(constraint, subst);
            if !self.index.has_static_contract_members(program, constraint) {
                continue;
            }
            let propagated = program
                .interner
                .as_type_param(arg)
                .is_some_and(|arg_param| program.is_constrained_to(arg_param, constraint));
            if propagated {
                continue;
            }
            trace!(arg = arg.0, constraint = constraint.0, "constraint gate: rejected");
            return Some(PendingDiagnostic::error(
                codes::STATIC_CONTRACT_TYPE_ARGUMENT,
                vec![arg.into(), generic.as_arg(), constraint.into()],
            ));
        }
        None
    }

    /// Check a full argument list supplied to `generic`.
    pub fn check_instantiation(&self, generic: Generic, args: &[TypeId]) -> Vec<PendingDiagnostic> {
        let params = generic.params(self.program);
        let subst = TypeSubstitution::from_args(params, args);
        params
            .iter()
            .zip(args)
            .filter_map(|(&param, &arg)| self.check_type_argument(generic, param, arg, &subst))
            .collect()
    }

    /// Check every instantiation nested inside a type occurrence.
    pub fn check_type(&self, ty: TypeId) -> Vec<PendingDiagnostic> {
        let mut out = Vec::new();
        let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeNesting);
        self.visit(ty, &mut out, &mut guard);
        guard.reset();
        out
    }

    fn visit(&self, ty: TypeId, out: &mut Vec<PendingDiagnostic>, guard: &mut RecursionGuard<TypeId>) {
        if ty.is_intrinsic() {
            return;
        }
        let _ = guard.scope(ty, |guard| match self.program.interner.lookup(ty) {
            Some(TypeData::Named { def, args }) => {
                out.extend(self.check_instantiation(Generic::Type(def), &args));
                for &arg in &args {
                    self.visit(arg, out, guard);
                }
            }
            Some(TypeData::Array(inner) | TypeData::Nullable(inner)) => self.visit(inner, out, guard),
            _ => {}
        });
    }

    /// Gate every type occurrence in a declaration: member signatures and
    /// type-parameter constraints. The declaration's own base type and
    /// interface list are conformance statements and are not gated here.
    pub fn check_declaration(&self, def: DefId) -> Vec<PendingDiagnostic> {
        let program = self.program;
        let decl = program.def(def);
        let mut out = Vec::new();
        for &param in &decl.type_params {
            for &constraint in &program.type_param(param).constraints {
                out.extend(self.check_type(constraint).into_iter().map(|d| d.at_def(def)));
            }
        }
        for &id in &decl.members {
            let member = program.member(id);
            let sig = &member.signature;
            let mut occurrences: Vec<TypeId> = sig.params.iter().map(|p| p.ty.ty).collect();
            occurrences.push(sig.ret.ty);
            for &param in &member.type_params {
                occurrences.extend(program.type_param(param).constraints.iter().copied());
            }
            for ty in occurrences {
                out.extend(self.check_type(ty).into_iter().map(|d| d.at_member(id)));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/constraints_tests.rs"]
mod tests;
