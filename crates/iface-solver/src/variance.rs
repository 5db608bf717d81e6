//! Variance safety of generic interface members.
//!
//! Every occurrence of a variant type parameter gets an effective position:
//! output (return types, getters), input (parameters, setters, events,
//! method constraints) or both (`ref`/`out` parameters, invariant slots).
//! Nested generic arguments compose: a covariant slot keeps the position, a
//! contravariant slot flips it, an invariant slot requires both.

use crate::diagnostics::{PendingDiagnostic, codes};
use crate::members::{AccessorKind, Member, MemberKind};
use crate::program::Program;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::signature::RefKind;
use crate::types::{DefId, MemberId, TypeData, TypeId, TypeParamId, TypeParamOwner, Variance};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use tracing::debug;

/// Required validity of a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Position {
    /// Covariantly valid.
    Output,
    /// Contravariantly valid.
    Input,
    /// Invariantly valid.
    Both,
}

impl Position {
    pub const fn flip(self) -> Self {
        match self {
            Self::Output => Self::Input,
            Self::Input => Self::Output,
            Self::Both => Self::Both,
        }
    }

    /// Position of an argument in a slot with the given declared variance.
    pub const fn through(self, slot: Variance) -> Self {
        match slot {
            Variance::Covariant => self,
            Variance::Contravariant => self.flip(),
            Variance::Invariant => Self::Both,
        }
    }

    pub const fn allows(self, variance: Variance) -> bool {
        match variance {
            Variance::Invariant => true,
            Variance::Covariant => matches!(self, Self::Output),
            Variance::Contravariant => matches!(self, Self::Input),
        }
    }

    /// Adverb used in the diagnostic text.
    pub const fn requirement(self) -> &'static str {
        match self {
            Self::Output => "covariantly",
            Self::Input => "contravariantly",
            Self::Both => "invariantly",
        }
    }
}

/// One rejected occurrence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VarianceViolation {
    /// The member, or `None` for a base-interface occurrence.
    pub member: Option<MemberId>,
    pub param: TypeParamId,
    pub required: Position,
}

impl VarianceViolation {
    pub fn to_diagnostic(&self, program: &Program, interface: DefId) -> PendingDiagnostic {
        let info = program.type_param(self.param);
        let subject = match self.member {
            Some(member) => crate::diagnostics::DiagnosticArg::Member(member),
            None => crate::diagnostics::DiagnosticArg::Def(interface),
        };
        let diag = PendingDiagnostic::error(
            codes::INVALID_VARIANCE,
            vec![
                subject,
                info.name.as_str().into(),
                info.variance.into(),
                self.required.requirement().into(),
            ],
        );
        match self.member {
            Some(member) => diag.at_member(member),
            None => diag.at_def(interface),
        }
    }
}

pub struct VarianceChecker<'a> {
    program: &'a Program,
    interface: DefId,
    guard: RecursionGuard<TypeId>,
    seen: IndexSet<(Option<MemberId>, TypeParamId), FxBuildHasher>,
    violations: Vec<VarianceViolation>,
}

impl<'a> VarianceChecker<'a> {
    pub fn new(program: &'a Program, interface: DefId) -> Self {
        Self {
            program,
            interface,
            guard: RecursionGuard::with_profile(RecursionProfile::TypeNesting),
            seen: IndexSet::default(),
            violations: Vec::new(),
        }
    }

    /// Check every member signature and base interface of the interface.
    /// At most one violation is reported per (member, type parameter).
    pub fn check(mut self) -> Vec<VarianceViolation> {
        let program = self.program;
        let def = program.def(self.interface);
        if !def.is_interface()
            || !def
                .type_params
                .iter()
                .any(|&p| program.type_param(p).variance.is_variant())
        {
            return Vec::new();
        }
        for &base in &def.interfaces {
            self.visit(None, base, Position::Output);
        }
        for &id in &def.members {
            let member = program.member(id);
            if member.kind.is_accessor() || is_exempt(member) {
                continue;
            }
            self.check_member(member);
        }
        debug!(
            interface = self.interface.0,
            violations = self.violations.len(),
            "variance check"
        );
        self.violations
    }

    fn check_member(&mut self, member: &'a Member) {
        let program = self.program;
        let id = Some(member.id);
        let sig = &member.signature;
        match member.kind {
            MemberKind::Property => {
                let has_get = program.accessor_of(member.id, AccessorKind::Get).is_some();
                let has_set = program.accessor_of(member.id, AccessorKind::Set).is_some();
                let position = match (has_get, has_set) {
                    (true, false) => Position::Output,
                    (false, true) => Position::Input,
                    _ => Position::Both,
                };
                self.visit(id, sig.ret.ty, position);
                for param in &sig.params {
                    self.visit(id, param.ty.ty, Position::Input);
                }
            }
            MemberKind::Event => self.visit(id, sig.ret.ty, Position::Input),
            MemberKind::Field => self.visit(id, sig.ret.ty, Position::Both),
            _ => {
                self.visit(id, sig.ret.ty, Position::Output);
                for param in &sig.params {
                    let position = match param.ref_kind {
                        RefKind::None | RefKind::In => Position::Input,
                        RefKind::Ref | RefKind::Out => Position::Both,
                    };
                    self.visit(id, param.ty.ty, position);
                }
                for &tp in &member.type_params {
                    for &constraint in &program.type_param(tp).constraints {
                        self.visit(id, constraint, Position::Input);
                    }
                }
            }
        }
    }

    fn visit(&mut self, member: Option<MemberId>, ty: TypeId, position: Position) {
        if ty.is_intrinsic() {
            return;
        }
        let program = self.program;
        let Some(data) = program.interner.lookup(ty) else {
            return;
        };
        if self.guard.enter(ty).is_denied() {
            return;
        }
        match data {
            TypeData::Intrinsic(_) => {}
            TypeData::TypeParam(param) => self.check_param(member, param, position),
            TypeData::Named { def, args } => {
                let params = &program.def(def).type_params;
                for (i, &arg) in args.iter().enumerate() {
                    let slot = params
                        .get(i)
                        .map_or(Variance::Invariant, |&p| program.type_param(p).variance);
                    self.visit(member, arg, position.through(slot));
                }
            }
            TypeData::Array(element) => self.visit(member, element, position),
            TypeData::Nullable(inner) => self.visit(member, inner, Position::Both),
        }
        self.guard.leave(ty);
    }

    fn check_param(&mut self, member: Option<MemberId>, param: TypeParamId, position: Position) {
        let info = self.program.type_param(param);
        if info.owner != TypeParamOwner::Type(self.interface) || position.allows(info.variance) {
            return;
        }
        if self.seen.insert((member, param)) {
            self.violations.push(VarianceViolation {
                member,
                param,
                required: position,
            });
        }
    }
}

/// Non-virtual statics (other than operators) and explicit implementations
/// take no part in variance.
fn is_exempt(member: &Member) -> bool {
    member.is_explicit()
        || matches!(member.kind, MemberKind::Constructor)
        || (member.is_static() && !member.has_static_contract() && !member.kind.is_operator())
}

/// Run the variance check for one interface and render violations as diagnostics.
pub fn check_interface_variance(program: &Program, interface: DefId) -> Vec<PendingDiagnostic> {
    VarianceChecker::new(program, interface)
        .check()
        .iter()
        .map(|violation| violation.to_diagnostic(program, interface))
        .collect()
}

#[cfg(test)]
#[path = "tests/variance_tests.rs"]
mod tests;
