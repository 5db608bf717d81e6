use super::*;
use iface_binder::{
    BindResult, CompilationUnit, MemberDeclaration, ModifierToken, TypeDeclaration,
    TypeParamDeclaration, bind_unit,
};
use iface_solver::{DiagnosticArg, DiagnosticLocation, MemberKind, OperatorToken};

fn bound(unit: &CompilationUnit) -> BindResult {
    let result = bind_unit(unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result
}

fn def(result: &BindResult, name: &str) -> DefId {
    result.program.def_by_name(name).expect("type declared")
}

/// Operators are bound under their metadata names, so look them up by kind.
fn operator(result: &BindResult, ty: &str, token: &str) -> MemberId {
    let op = OperatorToken::from_token(token).expect("known operator token");
    let program = &result.program;
    program
        .def(def(result, ty))
        .members
        .iter()
        .copied()
        .find(|&id| program.member(id).kind == MemberKind::Operator(op))
        .unwrap_or_else(|| panic!("{ty}.operator {token} not bound"))
}

fn codes_of(diags: &[PendingDiagnostic]) -> Vec<u32> {
    diags.iter().map(|d| d.code).collect()
}

fn public_static() -> [ModifierToken; 2] {
    [ModifierToken::Public, ModifierToken::Static]
}

fn static_abstract() -> [ModifierToken; 2] {
    [ModifierToken::Static, ModifierToken::Abstract]
}

#[test]
fn test_unconstrained_type_parameter_operand_is_rejected() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("I3").generic("T1").member(
            MemberDeclaration::operator("+", "T1")
                .modifiers(static_abstract())
                .param("x", "T1"),
        ),
    );
    let result = bound(&unit);
    let plus = operator(&result, "I3", "+");
    let diags = check_operator(&result.program, plus);
    assert_eq!(codes_of(&diags), vec![codes::UNARY_OPERATOR_PARAMETER_CONSTRAINED]);
    assert_eq!(
        diags[0].location,
        Some(DiagnosticLocation::Member(plus))
    );
}

#[test]
fn test_constrained_type_parameter_operand_is_accepted() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("I3")
            .type_param(TypeParamDeclaration::new("T1").constraint("I3<T1>"))
            .member(
                MemberDeclaration::operator("+", "T1")
                    .modifiers(static_abstract())
                    .param("x", "T1"),
            )
            .member(
                MemberDeclaration::operator("++", "T1")
                    .modifiers(static_abstract())
                    .param("x", "T1"),
            ),
    );
    let result = bound(&unit);
    assert!(check_operators(&result.program, def(&result, "I3")).is_empty());
}

#[test]
fn test_class_operator_uses_strict_codes() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C")
            .member(
                MemberDeclaration::operator("-", "C")
                    .modifiers(public_static())
                    .param("x", "int")
                    .body(),
            )
            .member(
                MemberDeclaration::operator("*", "C")
                    .modifiers(public_static())
                    .param("a", "int")
                    .param("b", "int")
                    .body(),
            ),
    );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "C"));
    assert_eq!(
        codes_of(&diags),
        vec![codes::UNARY_OPERATOR_PARAMETER, codes::BINARY_OPERATOR_PARAMETER]
    );
}

#[test]
fn test_wrong_arity_stops_shape_checks() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C").member(
            MemberDeclaration::operator("!", "void")
                .modifiers(public_static())
                .param("a", "C")
                .param("b", "C")
                .body(),
        ),
    );
    let result = bound(&unit);
    let not = operator(&result, "C", "!");
    let diags = check_operator(&result.program, not);
    assert_eq!(codes_of(&diags), vec![codes::OPERATOR_WRONG_ARITY]);
    assert_eq!(diags[0].args[1], DiagnosticArg::Number(1));
}

#[test]
fn test_shift_operator_requires_int_count() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C")
            .member(
                MemberDeclaration::operator("<<", "C")
                    .modifiers(public_static())
                    .param("a", "C")
                    .param("b", "long")
                    .body(),
            )
            .member(
                MemberDeclaration::operator(">>", "C")
                    .modifiers(public_static())
                    .param("a", "C")
                    .param("b", "int")
                    .body(),
            ),
    );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "C"));
    assert_eq!(codes_of(&diags), vec![codes::SHIFT_OPERATOR_OPERANDS]);
    assert_eq!(
        diags[0].location,
        Some(DiagnosticLocation::Member(operator(&result, "C", "<<")))
    );
}

#[test]
fn test_equality_needs_inequality_counterpart() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C").member(
            MemberDeclaration::operator("==", "bool")
                .modifiers(public_static())
                .param("a", "C")
                .param("b", "C")
                .body(),
        ),
    );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "C"));
    assert_eq!(codes_of(&diags), vec![codes::OPERATOR_REQUIRES_MATCHING]);
    assert_eq!(diags[0].args[1], DiagnosticArg::from("!="));
}

#[test]
fn test_interface_equality_must_be_abstract() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("I")
            .type_param(TypeParamDeclaration::new("T").constraint("I<T>"))
            .member(
                MemberDeclaration::operator("==", "bool")
                    .modifiers([ModifierToken::Static, ModifierToken::Virtual])
                    .param("a", "T")
                    .param("b", "T")
                    .body(),
            )
            .member(
                MemberDeclaration::operator("!=", "bool")
                    .modifiers(static_abstract())
                    .param("a", "T")
                    .param("b", "T"),
            ),
    );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "I"));
    assert_eq!(codes_of(&diags), vec![codes::INTERFACE_OPERATOR_MUST_BE_ABSTRACT]);
}

#[test]
fn test_non_static_operator_is_rejected() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C").member(
            MemberDeclaration::operator("~", "C")
                .modifier(ModifierToken::Public)
                .param("x", "C")
                .body(),
        ),
    );
    let result = bound(&unit);
    let diags = check_operator(&result.program, operator(&result, "C", "~"));
    assert_eq!(codes_of(&diags), vec![codes::OPERATOR_MUST_BE_PUBLIC_STATIC]);
}

#[test]
fn test_conversion_to_self_and_to_interface() {
    let unit = CompilationUnit::new()
        .with_type(TypeDeclaration::interface("I"))
        .with_type(
            TypeDeclaration::structure("S")
                .member(
                    MemberDeclaration::operator("implicit", "S")
                        .modifiers(public_static())
                        .param("x", "S?")
                        .body(),
                )
                .member(
                    MemberDeclaration::operator("explicit", "I")
                        .modifiers(public_static())
                        .param("x", "S")
                        .body(),
                ),
        );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "S"));
    assert_eq!(
        codes_of(&diags),
        vec![codes::CONVERSION_TO_SELF, codes::CONVERSION_INVOLVES_INTERFACE]
    );
}

#[test]
fn test_duplicate_true_operator_in_interface() {
    let truth = || {
        MemberDeclaration::operator("true", "bool")
            .modifiers(static_abstract())
            .param("x", "T")
    };
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("I")
            .type_param(TypeParamDeclaration::new("T").constraint("I<T>"))
            .member(truth())
            .member(truth())
            .member(
                MemberDeclaration::operator("false", "bool")
                    .modifiers(static_abstract())
                    .param("x", "T"),
            ),
    );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "I"));
    assert_eq!(codes_of(&diags), vec![codes::DUPLICATE_TRUE_FALSE_OPERATOR]);
}

#[test]
fn test_true_operator_must_return_bool() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C")
            .member(
                MemberDeclaration::operator("true", "int")
                    .modifiers(public_static())
                    .param("x", "C")
                    .body(),
            )
            .member(
                MemberDeclaration::operator("false", "bool")
                    .modifiers(public_static())
                    .param("x", "C")
                    .body(),
            ),
    );
    let result = bound(&unit);
    let diags = check_operators(&result.program, def(&result, "C"));
    assert_eq!(codes_of(&diags), vec![codes::TRUE_FALSE_OPERATOR_RETURN]);
}

#[test]
fn test_short_circuit_advisory_without_truth_operators() {
    let and = || {
        MemberDeclaration::operator("&", "T")
            .modifiers(static_abstract())
            .param("a", "T")
            .param("b", "T")
    };
    let unit = CompilationUnit::new()
        .with_type(
            TypeDeclaration::interface("IAnd")
                .type_param(TypeParamDeclaration::new("T").constraint("IAnd<T>"))
                .member(and()),
        )
        .with_type(
            TypeDeclaration::interface("ILogic")
                .type_param(TypeParamDeclaration::new("T").constraint("ILogic<T>"))
                .member(and())
                .member(
                    MemberDeclaration::operator("true", "bool")
                        .modifiers(static_abstract())
                        .param("x", "T"),
                )
                .member(
                    MemberDeclaration::operator("false", "bool")
                        .modifiers(static_abstract())
                        .param("x", "T"),
                ),
        );
    let result = bound(&unit);
    let advisories = short_circuit_advisories(&result.program, def(&result, "IAnd"));
    assert_eq!(
        advisories,
        vec![ShortCircuitAdvisory {
            interface: def(&result, "IAnd"),
            operator: operator(&result, "IAnd", "&"),
        }]
    );
    assert!(short_circuit_advisories(&result.program, def(&result, "ILogic")).is_empty());
}
