//! Operator signature validation.
//!
//! Each operator is checked against the shape rules of its category once its
//! arity is known. Operators declared `static abstract` or `static virtual`
//! in an interface use the relaxed rule: wherever the containing type is
//! required, a type parameter of the interface constrained to the interface
//! is accepted too, and the `_CONSTRAINED` diagnostic variants are used.

use iface_solver::{
    DefId, DefKind, MemberId, MemberKind, Modifiers, OperatorCategory, OperatorToken,
    PendingDiagnostic, Program, TypeDefinition, TypeId, TypeParamOwner, codes,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// An abstract `&` or `|` on an interface that declares neither `true` nor
/// `false`. Not an error: the operator is usable, but not in `&&`/`||`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShortCircuitAdvisory {
    pub interface: DefId,
    pub operator: MemberId,
}

/// Shape rules for one operator declaration.
struct OperatorShape<'a> {
    program: &'a Program,
    def: &'a TypeDefinition,
    containing: TypeId,
    /// `T?` for struct containers.
    containing_nullable: Option<TypeId>,
    relaxed: bool,
}

impl<'a> OperatorShape<'a> {
    fn new(program: &'a Program, def: &'a TypeDefinition, modifiers: Modifiers) -> Self {
        let containing = def.self_type;
        let containing_nullable = matches!(def.kind, DefKind::Struct)
            .then(|| program.interner.nullable(containing));
        let relaxed = def.is_interface()
            && modifiers.is_static()
            && modifiers.intersects(Modifiers::ABSTRACT | Modifiers::VIRTUAL);
        Self {
            program,
            def,
            containing,
            containing_nullable,
            relaxed,
        }
    }

    /// A type parameter of the containing declaration constrained to it.
    fn is_constrained_self_param(&self, ty: TypeId) -> bool {
        let Some(param) = self.program.interner.as_type_param(ty) else {
            return false;
        };
        self.program.type_param(param).owner == TypeParamOwner::Type(self.def.id)
            && self.program.is_constrained_to(param, self.containing)
    }

    fn is_containing(&self, ty: TypeId) -> bool {
        ty == self.containing
            || Some(ty) == self.containing_nullable
            || (self.relaxed && self.is_constrained_self_param(ty))
    }

    /// Pick the strict or relaxed code.
    fn code(&self, strict: u32, constrained: u32) -> u32 {
        if self.relaxed { constrained } else { strict }
    }

    fn check_increment_return(&self, param: TypeId, ret: TypeId) -> bool {
        if ret == param || self.program.is_derived_from(ret, param) {
            return true;
        }
        self.relaxed
            && param != ret
            && self.is_constrained_self_param(param)
            && self.is_constrained_self_param(ret)
    }

    fn check_conversion(&self, id: MemberId, from: TypeId, to: TypeId) -> Option<PendingDiagnostic> {
        let program = self.program;
        if !self.is_containing(from) && !self.is_containing(to) {
            let code = self.code(
                codes::CONVERSION_MUST_INVOLVE_CONTAINING_TYPE,
                codes::CONVERSION_MUST_INVOLVE_CONTAINING_TYPE_CONSTRAINED,
            );
            return Some(PendingDiagnostic::error(code, vec![id.into()]));
        }
        let strip = |ty: TypeId| program.interner.nullable_inner(ty).unwrap_or(ty);
        if strip(from) == strip(to) {
            return Some(PendingDiagnostic::error(codes::CONVERSION_TO_SELF, vec![id.into()]));
        }
        if !self.def.is_interface()
            && (program.is_interface_type(from) || program.is_interface_type(to))
        {
            return Some(PendingDiagnostic::error(
                codes::CONVERSION_INVOLVES_INTERFACE,
                vec![id.into()],
            ));
        }
        None
    }
}

/// Validate a single operator member. Non-operators yield nothing.
pub fn check_operator(program: &Program, id: MemberId) -> Vec<PendingDiagnostic> {
    let member = program.member(id);
    let MemberKind::Operator(op) = member.kind else {
        return Vec::new();
    };
    let def = program.def(member.declaring);
    let mut out = Vec::new();

    if !member.is_public() || !member.is_static() {
        out.push(PendingDiagnostic::error(
            codes::OPERATOR_MUST_BE_PUBLIC_STATIC,
            vec![id.into()],
        ));
    }
    if def.is_interface()
        && (op.is_conversion() || matches!(op, OperatorToken::Equality | OperatorToken::Inequality))
        && !member.modifiers.contains(Modifiers::ABSTRACT)
    {
        out.push(PendingDiagnostic::error(
            codes::INTERFACE_OPERATOR_MUST_BE_ABSTRACT,
            vec![id.into()],
        ));
    }

    let sig = &member.signature;
    let arity = sig.arity();
    if !op.accepts_arity(arity) {
        out.push(PendingDiagnostic::error(
            codes::OPERATOR_WRONG_ARITY,
            vec![id.into(), op.expected_arity().into()],
        ));
        return finish(out, id);
    }
    if sig.ret.ty == TypeId::VOID {
        out.push(PendingDiagnostic::error(codes::OPERATOR_RETURNS_VOID, vec![id.into()]));
    }

    let shape = OperatorShape::new(program, def, member.modifiers);
    let params: SmallVec<[TypeId; 2]> = sig.param_types().collect();
    let ret = sig.ret.ty;
    let shape_error = match op.category(arity) {
        OperatorCategory::Unary => (!shape.is_containing(params[0])).then(|| {
            shape.code(
                codes::UNARY_OPERATOR_PARAMETER,
                codes::UNARY_OPERATOR_PARAMETER_CONSTRAINED,
            )
        }),
        OperatorCategory::TrueFalse => {
            if ret != TypeId::BOOL {
                out.push(PendingDiagnostic::error(
                    codes::TRUE_FALSE_OPERATOR_RETURN,
                    vec![id.into()],
                ));
            }
            (!shape.is_containing(params[0])).then(|| {
                shape.code(
                    codes::UNARY_OPERATOR_PARAMETER,
                    codes::UNARY_OPERATOR_PARAMETER_CONSTRAINED,
                )
            })
        }
        OperatorCategory::Increment => {
            if !shape.is_containing(params[0]) {
                Some(shape.code(
                    codes::INCREMENT_OPERATOR_PARAMETER,
                    codes::INCREMENT_OPERATOR_PARAMETER_CONSTRAINED,
                ))
            } else if !shape.check_increment_return(params[0], ret) {
                Some(shape.code(
                    codes::INCREMENT_OPERATOR_RETURN,
                    codes::INCREMENT_OPERATOR_RETURN_CONSTRAINED,
                ))
            } else {
                None
            }
        }
        OperatorCategory::Binary => {
            (!shape.is_containing(params[0]) && !shape.is_containing(params[1])).then(|| {
                shape.code(
                    codes::BINARY_OPERATOR_PARAMETER,
                    codes::BINARY_OPERATOR_PARAMETER_CONSTRAINED,
                )
            })
        }
        OperatorCategory::Shift => {
            (!shape.is_containing(params[0]) || params[1] != TypeId::INT32).then(|| {
                shape.code(
                    codes::SHIFT_OPERATOR_OPERANDS,
                    codes::SHIFT_OPERATOR_OPERANDS_CONSTRAINED,
                )
            })
        }
        OperatorCategory::Conversion => {
            out.extend(shape.check_conversion(id, params[0], ret));
            None
        }
    };
    if let Some(code) = shape_error {
        out.push(PendingDiagnostic::error(code, vec![id.into()]));
    }
    finish(out, id)
}

fn finish(out: Vec<PendingDiagnostic>, id: MemberId) -> Vec<PendingDiagnostic> {
    if !out.is_empty() {
        trace!(member = id.0, count = out.len(), "operator shape violations");
    }
    out.into_iter().map(|d| d.at_member(id)).collect()
}

/// Validate every operator of `def`, then the per-type rules: matching
/// pairs and, for interfaces, at most one `true` and one `false`.
pub fn check_operators(program: &Program, def: DefId) -> Vec<PendingDiagnostic> {
    let decl = program.def(def);
    let mut out = Vec::new();
    let mut declared: FxHashMap<OperatorToken, MemberId> = FxHashMap::default();
    for &id in &decl.members {
        let MemberKind::Operator(op) = program.member(id).kind else {
            continue;
        };
        out.extend(check_operator(program, id));
        let first = *declared.entry(op).or_insert(id);
        if first != id && decl.is_interface() && matches!(op, OperatorToken::True | OperatorToken::False) {
            out.push(
                PendingDiagnostic::error(
                    codes::DUPLICATE_TRUE_FALSE_OPERATOR,
                    vec![def.into(), op.token().into()],
                )
                .at_member(id),
            );
        }
    }
    for &id in &decl.members {
        let MemberKind::Operator(op) = program.member(id).kind else {
            continue;
        };
        let Some(counterpart) = op.required_counterpart() else {
            continue;
        };
        if !declared.contains_key(&counterpart) {
            out.push(
                PendingDiagnostic::error(
                    codes::OPERATOR_REQUIRES_MATCHING,
                    vec![id.into(), counterpart.token().into()],
                )
                .at_member(id),
            );
        }
    }
    out
}

/// Abstract `&`/`|` operators of an interface whose interface closure
/// declares neither `true` nor `false`.
pub fn short_circuit_advisories(program: &Program, def: DefId) -> Vec<ShortCircuitAdvisory> {
    let decl = program.def(def);
    if !decl.is_interface() {
        return Vec::new();
    }
    let declares_truth = |def: &TypeDefinition| {
        def.members.iter().any(|&id| {
            matches!(
                program.member(id).kind,
                MemberKind::Operator(OperatorToken::True | OperatorToken::False)
            )
        })
    };
    let has_truth = declares_truth(decl)
        || program
            .declared_interface_closure(decl.self_type)
            .into_iter()
            .filter_map(|iface| program.def_of(iface))
            .any(declares_truth);
    if has_truth {
        return Vec::new();
    }
    decl.members
        .iter()
        .copied()
        .filter(|&id| {
            let member = program.member(id);
            matches!(
                member.kind,
                MemberKind::Operator(OperatorToken::BitwiseAnd | OperatorToken::BitwiseOr)
            ) && member.modifiers.contains(Modifiers::ABSTRACT)
        })
        .map(|operator| ShortCircuitAdvisory {
            interface: def,
            operator,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/operators_tests.rs"]
mod tests;
