//! Rendering of types, members and pending diagnostics to text.

use crate::diagnostics::{DiagnosticArg, DiagnosticLocation, PendingDiagnostic};
use crate::instantiate::TypeSubstitution;
use crate::members::{Member, MemberKind};
use crate::program::Program;
use crate::signature::{RefKind, Signature, canonicalize};
use crate::types::{DefId, MemberId, TypeData, TypeId, TypeParamId};
use iface_common::diagnostics::{
    DiagnosticRelatedInformation, format_message, get_diagnostic_category, get_message_template,
};
use iface_common::{Diagnostic, DiagnosticCategory, limits};

/// Formats types in source syntax.
pub struct TypeFormatter<'a> {
    program: &'a Program,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program }
    }

    pub fn format(&self, ty: TypeId) -> String {
        self.format_at(ty, 0)
    }

    fn format_at(&self, ty: TypeId, depth: u32) -> String {
        if depth > limits::MAX_TYPE_NESTING_DEPTH {
            return "...".to_string();
        }
        let program = self.program;
        match program.interner.lookup(ty) {
            Some(TypeData::Intrinsic(kind)) => kind.name().to_string(),
            Some(TypeData::Named { def, args }) => {
                let name = &program.def(def).name;
                if args.is_empty() {
                    name.clone()
                } else {
                    let args: Vec<String> =
                        args.iter().map(|&a| self.format_at(a, depth + 1)).collect();
                    format!("{name}<{}>", args.join(", "))
                }
            }
            Some(TypeData::TypeParam(param)) => program.type_param(param).name.clone(),
            Some(TypeData::Array(element)) => format!("{}[]", self.format_at(element, depth + 1)),
            Some(TypeData::Nullable(inner)) => format!("{}?", self.format_at(inner, depth + 1)),
            None => format!("<unknown {}>", ty.0),
        }
    }

    pub fn format_def(&self, def: DefId) -> String {
        self.format(self.program.def(def).self_type)
    }

    pub fn format_type_param(&self, param: TypeParamId) -> String {
        self.program.type_param(param).name.clone()
    }

    fn format_params(&self, sig: &Signature) -> String {
        sig.params
            .iter()
            .map(|p| {
                let ty = self.format(p.ty.ty);
                match p.ref_kind {
                    RefKind::None => ty,
                    RefKind::Ref => format!("ref {ty}"),
                    RefKind::Out => format!("out {ty}"),
                    RefKind::In => format!("in {ty}"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `C.M(int, T)`, `C.P`, `C.this[int]`, `C.P.get`, `C.operator +(C)`,
    /// or `C.I.M()` for an explicit implementation.
    pub fn format_member(&self, id: MemberId) -> String {
        let member = self.program.member(id);
        let container = self.format_def(member.declaring);
        self.member_text(&container, member, &member.signature)
    }

    /// An interface member as seen through an instantiated interface type:
    /// `I<int>.M(int)`.
    pub fn format_slot(&self, interface: TypeId, id: MemberId) -> String {
        let program = self.program;
        let member = program.member(id);
        let subst: TypeSubstitution = program.substitution_of(interface);
        let sig = canonicalize(&program.interner, &member.signature, &subst);
        self.member_text(&self.format(interface), member, &sig)
    }

    fn member_text(&self, container: &str, member: &Member, sig: &Signature) -> String {
        let program = self.program;
        let qualifier = match &member.explicit_target {
            Some(target) => format!("{container}.{}", self.format(target.interface)),
            None => container.to_string(),
        };
        match member.kind {
            MemberKind::Accessor(kind) => match member.owner {
                Some(owner) => {
                    let owner = program.member(owner);
                    format!(
                        "{}.{}",
                        self.member_text(container, owner, &owner.signature),
                        kind.keyword()
                    )
                }
                None => format!("{qualifier}.{}", member.name),
            },
            MemberKind::Property if !sig.params.is_empty() => {
                format!("{qualifier}.this[{}]", self.format_params(sig))
            }
            MemberKind::Property | MemberKind::Event | MemberKind::Field => {
                format!("{qualifier}.{}", member.name)
            }
            MemberKind::Operator(op) if op.is_conversion() => format!(
                "{qualifier}.{op} operator {}({})",
                self.format(sig.ret.ty),
                self.format_params(sig)
            ),
            MemberKind::Operator(op) => {
                format!("{qualifier}.operator {op}({})", self.format_params(sig))
            }
            MemberKind::Method | MemberKind::Constructor => {
                let name = if matches!(member.kind, MemberKind::Constructor) {
                    program.def(member.declaring).name.as_str()
                } else {
                    member.name.as_str()
                };
                let generics = if member.type_params.is_empty() {
                    String::new()
                } else {
                    let names: Vec<String> = member
                        .type_params
                        .iter()
                        .map(|&p| self.format_type_param(p))
                        .collect();
                    format!("<{}>", names.join(", "))
                };
                format!("{qualifier}.{name}{generics}({})", self.format_params(sig))
            }
        }
    }
}

/// Renders pending diagnostics into `iface_common::Diagnostic`.
pub struct DiagnosticFormatter<'a> {
    program: &'a Program,
    types: TypeFormatter<'a>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            types: TypeFormatter::new(program),
        }
    }

    pub fn types(&self) -> &TypeFormatter<'a> {
        &self.types
    }

    pub fn format_arg(&self, arg: &DiagnosticArg) -> String {
        match arg {
            DiagnosticArg::Member(id) => self.types.format_member(*id),
            DiagnosticArg::Slot { interface, member } => self.types.format_slot(*interface, *member),
            DiagnosticArg::Type(ty) => self.types.format(*ty),
            DiagnosticArg::TypeParam(param) => self.types.format_type_param(*param),
            DiagnosticArg::Def(def) => self.types.format_def(*def),
            DiagnosticArg::Modifier(modifiers) => modifiers.to_string(),
            DiagnosticArg::Feature(feature) => feature.to_string(),
            DiagnosticArg::Version(version) => version.to_string(),
            DiagnosticArg::Variance(variance) => variance.to_string(),
            DiagnosticArg::String(s) => s.to_string(),
            DiagnosticArg::Number(n) => n.to_string(),
        }
    }

    pub fn message(&self, diag: &PendingDiagnostic) -> String {
        let args: Vec<String> = diag.args.iter().map(|arg| self.format_arg(arg)).collect();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        match get_message_template(diag.code) {
            Some(template) => format_message(template, &refs),
            None => format!("Unknown diagnostic {}: {}", diag.code, refs.join(", ")),
        }
    }

    /// `Type` for declaration-level diagnostics, `Type.Member` for members.
    pub fn location(&self, location: Option<DiagnosticLocation>) -> String {
        match location {
            Some(DiagnosticLocation::Def(def)) => self.types.format_def(def),
            Some(DiagnosticLocation::Member(id)) => {
                let member = self.program.member(id);
                let container = self.types.format_def(member.declaring);
                match (member.owner, member.kind) {
                    (Some(owner), MemberKind::Accessor(kind)) => format!(
                        "{container}.{}.{}",
                        self.program.member(owner).name,
                        kind.keyword()
                    ),
                    _ => format!("{container}.{}", member.name),
                }
            }
            None => String::new(),
        }
    }

    pub fn render(&self, diag: &PendingDiagnostic) -> Diagnostic {
        let category = get_diagnostic_category(diag.code).unwrap_or(DiagnosticCategory::Error);
        let mut rendered = Diagnostic {
            location: self.location(diag.location),
            message_text: self.message(diag),
            category,
            code: diag.code,
            related_information: Vec::new(),
        };
        for related in &diag.related {
            rendered.related_information.push(DiagnosticRelatedInformation {
                location: self.location(related.location),
                message_text: self.message(related),
                category: DiagnosticCategory::Message,
                code: related.code,
            });
        }
        rendered
    }

    pub fn render_all<'d>(
        &self,
        diags: impl IntoIterator<Item = &'d PendingDiagnostic>,
    ) -> Vec<Diagnostic> {
        diags.into_iter().map(|d| self.render(d)).collect()
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
