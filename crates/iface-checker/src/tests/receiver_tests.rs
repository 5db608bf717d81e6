use super::*;
use iface_binder::{
    BindResult, CompilationUnit, MemberDeclaration, ModifierToken, TypeDeclaration,
    TypeParamDeclaration, bind_unit,
};

fn fixture() -> BindResult {
    let unit = CompilationUnit::new()
        .with_type(
            TypeDeclaration::interface("I1")
                .member(
                    MemberDeclaration::method("M", "void")
                        .modifiers([ModifierToken::Static, ModifierToken::Abstract]),
                )
                .member(
                    MemberDeclaration::method("Helper", "void")
                        .modifier(ModifierToken::Static)
                        .body(),
                ),
        )
        .with_type(TypeDeclaration::interface("I2"))
        .with_type(
            TypeDeclaration::class("C")
                .member(
                    MemberDeclaration::method("Create", "void")
                        .modifiers([ModifierToken::Public, ModifierToken::Static])
                        .body(),
                )
                .member(
                    MemberDeclaration::method("Run", "void")
                        .modifier(ModifierToken::Public)
                        .body(),
                )
                .member(
                    MemberDeclaration::method("Use", "void")
                        .type_param(TypeParamDeclaration::new("T").constraint("I1"))
                        .type_param(TypeParamDeclaration::new("U").constraint("T"))
                        .type_param(TypeParamDeclaration::new("V").constraint("I2"))
                        .body(),
                ),
        );
    let result = bind_unit(&unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    result
}

fn member(result: &BindResult, ty: &str, name: &str) -> MemberId {
    let program = &result.program;
    let def = program.def_by_name(ty).expect("type declared");
    program
        .def(def)
        .members
        .iter()
        .copied()
        .find(|&id| program.member(id).name == name)
        .unwrap_or_else(|| panic!("{ty}.{name} not bound"))
}

fn type_param(result: &BindResult, name: &str) -> TypeParamId {
    let program = &result.program;
    let method = program.member(member(result, "C", "Use"));
    method
        .type_params
        .iter()
        .copied()
        .find(|&param| program.type_param(param).name == name)
        .expect("method type parameter")
}

fn self_type(result: &BindResult, name: &str) -> TypeId {
    let program = &result.program;
    program.def(program.def_by_name(name).expect("type declared")).self_type
}

fn code(outcome: Result<(), PendingDiagnostic>) -> Option<u32> {
    outcome.err().map(|diag| diag.code)
}

#[test]
fn test_static_contract_member_requires_type_parameter() {
    let result = fixture();
    let program = &result.program;
    let m = member(&result, "I1", "M");
    let i1 = self_type(&result, "I1");
    assert_eq!(
        code(is_usable_as_receiver(program, m, ReceiverContext::TypeName(i1))),
        Some(codes::STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER)
    );
    assert_eq!(
        code(is_usable_as_receiver(program, m, ReceiverContext::Instance(i1))),
        Some(codes::STATIC_CONTRACT_ACCESS_REQUIRES_TYPE_PARAMETER)
    );
}

#[test]
fn test_static_contract_member_through_constrained_parameter() {
    let result = fixture();
    let program = &result.program;
    let m = member(&result, "I1", "M");
    let t = type_param(&result, "T");
    assert_eq!(
        is_usable_as_receiver(program, m, ReceiverContext::TypeParameter(t)),
        Ok(())
    );
    // Constraints are followed through other type parameters.
    let u = type_param(&result, "U");
    assert_eq!(
        is_usable_as_receiver(program, m, ReceiverContext::TypeParameter(u)),
        Ok(())
    );
}

#[test]
fn test_static_contract_member_through_unrelated_parameter() {
    let result = fixture();
    let program = &result.program;
    let m = member(&result, "I1", "M");
    let v = type_param(&result, "V");
    let err = is_usable_as_receiver(program, m, ReceiverContext::TypeParameter(v))
        .expect_err("V is not constrained to I1");
    assert_eq!(err.code, codes::TYPE_PARAMETER_NOT_CONSTRAINED_TO_INTERFACE);
    assert_eq!(
        err.args,
        vec![
            DiagnosticArg::Member(m),
            DiagnosticArg::TypeParam(v),
            DiagnosticArg::Def(program.def_by_name("I1").expect("I1")),
        ]
    );
}

#[test]
fn test_ordinary_static_members() {
    let result = fixture();
    let program = &result.program;
    let create = member(&result, "C", "Create");
    let helper = member(&result, "I1", "Helper");
    let c = self_type(&result, "C");
    let t = type_param(&result, "T");
    assert_eq!(
        is_usable_as_receiver(program, create, ReceiverContext::TypeName(c)),
        Ok(())
    );
    assert_eq!(
        code(is_usable_as_receiver(program, create, ReceiverContext::Instance(c))),
        Some(codes::STATIC_MEMBER_THROUGH_INSTANCE)
    );
    assert_eq!(
        is_usable_as_receiver(program, helper, ReceiverContext::TypeName(self_type(&result, "I1"))),
        Ok(())
    );
    assert_eq!(
        code(is_usable_as_receiver(program, helper, ReceiverContext::TypeParameter(t))),
        Some(codes::NON_VIRTUAL_STATIC_THROUGH_TYPE_PARAMETER)
    );
}

#[test]
fn test_instance_member_needs_instance() {
    let result = fixture();
    let program = &result.program;
    let run = member(&result, "C", "Run");
    let c = self_type(&result, "C");
    assert_eq!(
        is_usable_as_receiver(program, run, ReceiverContext::Instance(c)),
        Ok(())
    );
    assert_eq!(
        code(is_usable_as_receiver(program, run, ReceiverContext::TypeName(c))),
        Some(codes::INSTANCE_MEMBER_WITHOUT_INSTANCE)
    );
    assert_eq!(
        code(is_usable_as_receiver(
            program,
            run,
            ReceiverContext::TypeParameter(type_param(&result, "T"))
        )),
        Some(codes::INSTANCE_MEMBER_WITHOUT_INSTANCE)
    );
}
