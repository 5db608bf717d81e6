//! Binder type declarations: names, type parameters, base and interface
//! lists, constraints.

use crate::declarations::{CompilationUnit, ModifierToken, TypeDeclaration, TypeKind};
use iface_solver::{
    DefId, DefKind, DiagnosticLocation, TypeId, TypeModifiers, TypeParamInfo, TypeParamOwner,
    Variance, codes,
};
use tracing::trace;

use super::state::BinderState;

impl BinderState {
    /// Declare every type up front so type expressions may refer forward.
    /// A duplicate name is reported but still declared; lookups by name find
    /// the first declaration.
    pub(crate) fn declare_types(&mut self, unit: &CompilationUnit) -> Vec<DefId> {
        let mut defs = Vec::with_capacity(unit.types.len());
        for decl in &unit.types {
            let duplicate = self.program.def_by_name(&decl.name).is_some();
            let def = self
                .program
                .declare_type(&decl.name, decl.kind.into(), TypeModifiers::empty());
            self.location = Some(DiagnosticLocation::Def(def));
            if duplicate {
                self.report(codes::DUPLICATE_TYPE_DECLARATION, vec![decl.name.as_str().into()]);
            }
            let modifiers = self.type_modifiers(def, decl);
            self.program.def_mut(def).modifiers = modifiers;
            defs.push(def);
        }
        defs
    }

    fn type_modifiers(&mut self, def: DefId, decl: &TypeDeclaration) -> TypeModifiers {
        let mut modifiers = TypeModifiers::empty();
        for &token in &decl.modifiers {
            match (token, decl.kind) {
                (ModifierToken::Abstract, TypeKind::Class) => modifiers |= TypeModifiers::ABSTRACT,
                (ModifierToken::Sealed, TypeKind::Class) => modifiers |= TypeModifiers::SEALED,
                (ModifierToken::Static, TypeKind::Class) => modifiers |= TypeModifiers::STATIC,
                (
                    ModifierToken::Public
                    | ModifierToken::Protected
                    | ModifierToken::Internal
                    | ModifierToken::Private
                    | ModifierToken::New
                    | ModifierToken::Partial,
                    _,
                )
                | (ModifierToken::Readonly, TypeKind::Struct) => {}
                _ => self.report(
                    codes::MODIFIER_NOT_VALID,
                    vec![def.into(), token.to_modifiers().into()],
                ),
            }
        }
        modifiers
    }

    pub(crate) fn enter_type(&mut self, def: DefId) {
        self.type_scope = self.program.def(def).type_params.clone();
        self.method_scope.clear();
        self.location = Some(DiagnosticLocation::Def(def));
    }

    pub(crate) fn bind_type_params(&mut self, decl: &TypeDeclaration, def: DefId) {
        self.location = Some(DiagnosticLocation::Def(def));
        let is_interface = matches!(self.program.def(def).kind, DefKind::Interface);
        for (ordinal, param) in decl.type_params.iter().enumerate() {
            let mut variance = param.variance.map(Variance::from).unwrap_or_default();
            if variance.is_variant() && !is_interface {
                self.report(codes::VARIANCE_ON_NON_INTERFACE, vec![param.name.as_str().into()]);
                variance = Variance::Invariant;
            }
            let id = self.program.add_type_param(TypeParamInfo {
                name: param.name.clone(),
                owner: TypeParamOwner::Type(def),
                ordinal: ordinal as u32,
                variance,
                constraints: Vec::new(),
            });
            self.program.def_mut(def).type_params.push(id);
        }
        self.program.refresh_self_type(def);
    }

    /// Base class and interface list.
    pub(crate) fn bind_heritage(&mut self, decl: &TypeDeclaration, def: DefId) {
        self.enter_type(def);
        let kind = self.program.def(def).kind;
        if let Some(text) = &decl.base {
            let base = self.resolve_type_text(text);
            if base != TypeId::ERROR {
                let is_class = self
                    .program
                    .def_of(base)
                    .is_some_and(|target| matches!(target.kind, DefKind::Class));
                if is_class && matches!(kind, DefKind::Class) {
                    self.program.def_mut(def).base = Some(base);
                } else {
                    self.report(codes::BASE_TYPE_MUST_BE_CLASS, vec![def.into(), base.into()]);
                }
            }
        }
        for text in &decl.interfaces {
            let iface = self.resolve_type_text(text);
            if iface == TypeId::ERROR {
                continue;
            }
            if self.program.is_interface_type(iface) {
                self.program.def_mut(def).interfaces.push(iface);
            } else {
                self.report(codes::NOT_AN_INTERFACE, vec![def.into(), iface.into()]);
            }
        }
        trace!(
            def = def.0,
            base = ?self.program.def(def).base,
            interfaces = self.program.def(def).interfaces.len(),
            "bind_heritage"
        );
    }

    /// Constraints resolve after the whole parameter list is declared, so
    /// `where T : IPair<T, U>` may mention later parameters.
    pub(crate) fn bind_constraints(&mut self, decl: &TypeDeclaration, def: DefId) {
        self.enter_type(def);
        let params = self.program.def(def).type_params.clone();
        for (param, param_decl) in params.into_iter().zip(&decl.type_params) {
            for text in &param_decl.constraints {
                let constraint = self.resolve_type_text(text);
                if constraint != TypeId::ERROR {
                    self.program.type_param_mut(param).constraints.push(constraint);
                }
            }
        }
    }
}
