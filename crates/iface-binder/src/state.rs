//! Binder state.
//!
//! `BinderState` turns a [`CompilationUnit`] into a bound [`Program`]. Binding
//! runs in phases because later phases need earlier ones complete across the
//! whole unit: every type is declared before any type expression is resolved,
//! and every member's modifiers are validated before explicit implementations
//! look for the interface slot they target.

use crate::declarations::CompilationUnit;
use crate::type_expr::TypeExpr;
use iface_common::Capabilities;
use iface_solver::{
    DiagnosticArg, DiagnosticLocation, IntrinsicKind, MemberId, Modifiers, PendingDiagnostic,
    Program, TypeId, TypeParamId, codes,
};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Output of binding one compilation unit.
pub struct BindResult {
    pub program: Program,
    pub capabilities: Capabilities,
    /// Binding and modifier diagnostics, in the order they were found.
    pub diagnostics: Vec<PendingDiagnostic>,
}

impl BindResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(PendingDiagnostic::is_error)
    }
}

/// Bind `unit` under the given capabilities.
pub fn bind(unit: &CompilationUnit, capabilities: Capabilities) -> BindResult {
    let mut state = BinderState::new(capabilities);
    state.bind_unit(unit);
    state.finish()
}

/// Bind `unit` under its own `options`, or the latest capabilities when it
/// carries none.
pub fn bind_unit(unit: &CompilationUnit) -> BindResult {
    bind(unit, unit.options.unwrap_or_default())
}

/// A member waiting for modifier validation.
pub(crate) struct BoundMember {
    pub id: MemberId,
    /// Modifier tokens as written, one flag each.
    pub tokens: SmallVec<[Modifiers; 4]>,
    pub accessors: SmallVec<[(MemberId, SmallVec<[Modifiers; 4]>); 2]>,
}

pub struct BinderState {
    pub(crate) program: Program,
    pub(crate) capabilities: Capabilities,
    pub(crate) diagnostics: Vec<PendingDiagnostic>,
    /// Where diagnostics raised right now are reported.
    pub(crate) location: Option<DiagnosticLocation>,
    /// Type parameters of the enclosing type.
    pub(crate) type_scope: Vec<TypeParamId>,
    /// Type parameters of the enclosing generic method.
    pub(crate) method_scope: Vec<TypeParamId>,
    pub(crate) bound: Vec<BoundMember>,
}

impl BinderState {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            program: Program::new(),
            capabilities,
            diagnostics: Vec::new(),
            location: None,
            type_scope: Vec::new(),
            method_scope: Vec::new(),
            bound: Vec::new(),
        }
    }

    pub fn bind_unit(&mut self, unit: &CompilationUnit) {
        let defs = self.declare_types(unit);
        for (decl, &def) in unit.types.iter().zip(&defs) {
            self.bind_type_params(decl, def);
        }
        for (decl, &def) in unit.types.iter().zip(&defs) {
            self.bind_heritage(decl, def);
            self.bind_constraints(decl, def);
        }
        for (decl, &def) in unit.types.iter().zip(&defs) {
            self.bind_members(decl, def);
        }
        self.link_partials();
        self.validate_modifiers();
        self.bind_explicit_targets();
        debug!(
            types = self.program.defs().len(),
            members = self.program.members().len(),
            diagnostics = self.diagnostics.len(),
            "bind_unit: done"
        );
    }

    pub fn finish(self) -> BindResult {
        BindResult {
            program: self.program,
            capabilities: self.capabilities,
            diagnostics: self.diagnostics,
        }
    }

    pub(crate) fn report(&mut self, code: u32, args: Vec<DiagnosticArg>) {
        let mut diag = PendingDiagnostic::error(code, args);
        diag.location = self.location;
        trace!(code, location = ?diag.location, "binder diagnostic");
        self.diagnostics.push(diag);
    }

    // =========================================================================
    // Type resolution
    // =========================================================================

    fn lookup_type_param(&self, name: &str) -> Option<TypeParamId> {
        self.method_scope
            .iter()
            .chain(&self.type_scope)
            .copied()
            .find(|&param| self.program.type_param(param).name == name)
    }

    /// Parse and resolve a type written in a declaration. Failures are
    /// reported at the current location and yield `TypeId::ERROR`.
    pub(crate) fn resolve_type_text(&mut self, text: &str) -> TypeId {
        match TypeExpr::parse(text) {
            Ok(expr) => self.resolve_type(&expr),
            Err(err) => {
                self.report(
                    codes::MALFORMED_TYPE_EXPRESSION,
                    vec![text.into(), err.to_string().into()],
                );
                TypeId::ERROR
            }
        }
    }

    /// Method type parameters, then the enclosing type's parameters, then
    /// built-in names, then declared types.
    pub(crate) fn resolve_type(&mut self, expr: &TypeExpr) -> TypeId {
        match expr {
            TypeExpr::Array(element) => match self.resolve_type(element) {
                TypeId::ERROR => TypeId::ERROR,
                element => self.program.interner.array(element),
            },
            TypeExpr::Nullable(inner) => match self.resolve_type(inner) {
                TypeId::ERROR => TypeId::ERROR,
                inner => self.program.interner.nullable(inner),
            },
            TypeExpr::Name { name, args } => {
                if args.is_empty() {
                    if let Some(param) = self.lookup_type_param(name) {
                        return self.program.interner.type_param(param);
                    }
                    if let Some(intrinsic) = IntrinsicKind::from_name(name) {
                        return intrinsic.type_id();
                    }
                }
                let Some(def) = self.program.def_by_name(name) else {
                    self.report(codes::CANNOT_FIND_TYPE, vec![name.as_str().into()]);
                    return TypeId::ERROR;
                };
                let arity = self.program.def(def).arity();
                if arity != args.len() {
                    self.report(codes::WRONG_TYPE_ARGUMENT_COUNT, vec![def.into(), arity.into()]);
                    return TypeId::ERROR;
                }
                let mut resolved: SmallVec<[TypeId; 2]> = SmallVec::with_capacity(args.len());
                for arg in args {
                    let ty = self.resolve_type(arg);
                    if ty == TypeId::ERROR {
                        return TypeId::ERROR;
                    }
                    resolved.push(ty);
                }
                self.program.interner.named(def, resolved)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
