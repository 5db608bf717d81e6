//! End-to-end binding of compilation units built with the declaration
//! builders and from JSON.

use iface_binder::{
    AnnotationDecl, BindResult, CompilationUnit, MemberDeclaration, ModifierToken,
    ParamDeclaration, RefToken, TypeDeclaration, TypeParamDeclaration, bind, bind_unit,
};
use iface_common::{Capabilities, LanguageFeature, LanguageVersion, RuntimeFeatures};
use iface_solver::{
    AccessorKind, DiagnosticArg, DiagnosticFormatter, Member, MemberKind, Modifiers,
    OperatorToken, PartialPart, RefKind, SlotKind, TypeId, codes,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("iface_binder=trace")
        .try_init();
}

fn member<'a>(result: &'a BindResult, ty: &str, name: &str) -> &'a Member {
    let def = result.program.def_by_name(ty).expect("type declared");
    result
        .program
        .def(def)
        .members
        .iter()
        .map(|&id| result.program.member(id))
        .find(|member| member.name == name)
        .unwrap_or_else(|| panic!("{ty}.{name} not bound"))
}

fn codes_of(result: &BindResult) -> Vec<u32> {
    result.diagnostics.iter().map(|d| d.code).collect()
}

fn static_abstract() -> [ModifierToken; 2] {
    [ModifierToken::Static, ModifierToken::Abstract]
}

#[test]
fn test_static_abstract_interface_and_implementer() {
    init_tracing();
    let unit = CompilationUnit::new()
        .with_type(
            TypeDeclaration::interface("I1")
                .member(MemberDeclaration::method("M01", "void").modifiers(static_abstract())),
        )
        .with_type(
            TypeDeclaration::class("C").implements("I1").member(
                MemberDeclaration::method("M01", "void")
                    .modifiers([ModifierToken::Public, ModifierToken::Static])
                    .body(),
            ),
        );
    let result = bind_unit(&unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let slot = member(&result, "I1", "M01");
    assert_eq!(
        slot.modifiers,
        Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::ABSTRACT
    );
    assert!(slot.is_interface_slot());
    assert!(slot.has_static_contract());

    let implementation = member(&result, "C", "M01");
    assert_eq!(implementation.modifiers, Modifiers::PUBLIC | Modifiers::STATIC);
    assert_eq!(implementation.slot, SlotKind::NonDispatching);

    let c = result.program.def_by_name("C").expect("C");
    let i1 = result.program.def(result.program.def_by_name("I1").expect("I1")).self_type;
    assert_eq!(result.program.def(c).interfaces, vec![i1]);
}

#[test]
fn test_property_accessors_follow_owner() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("I2").member(
            MemberDeclaration::property("P", "int")
                .modifiers(static_abstract())
                .getter()
                .setter(),
        ),
    );
    let result = bind_unit(&unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let property = member(&result, "I2", "P");
    assert_eq!(property.accessors.len(), 2);
    let getter = result
        .program
        .accessor_of(property.id, AccessorKind::Get)
        .expect("getter");
    let setter = result.program.member(
        result
            .program
            .accessor_of(property.id, AccessorKind::Set)
            .expect("setter"),
    );
    assert_eq!(result.program.member(getter).name, "get_P");
    assert_eq!(result.program.member(getter).owner, Some(property.id));
    assert_eq!(setter.name, "set_P");
    assert_eq!(setter.signature.ret.ty, TypeId::VOID);
    assert_eq!(setter.signature.params[0].ty.ty, TypeId::INT32);
    assert!(setter.modifiers.contains(Modifiers::STATIC | Modifiers::ABSTRACT));

    let def = result.program.def_by_name("I2").expect("I2");
    let slots = result.program.interface_slots(result.program.def(def).self_type);
    assert_eq!(slots, vec![property.id, getter, setter.id]);
}

#[test]
fn test_indexers_and_events() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("IStore")
            .member(
                MemberDeclaration::indexer("string")
                    .param("index", "int")
                    .getter(),
            )
            .member(MemberDeclaration::event("Changed", "object")),
    );
    let result = bind_unit(&unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let indexer = member(&result, "IStore", "Item");
    assert_eq!(indexer.kind, MemberKind::Property);
    assert_eq!(indexer.signature.params.len(), 1);
    let getter = result.program.member(indexer.accessors[0]);
    assert_eq!(getter.name, "get_Item");
    assert_eq!(getter.signature.params[0].ty.ty, TypeId::INT32);
    assert_eq!(getter.signature.ret.ty, TypeId::STRING);

    let event = member(&result, "IStore", "Changed");
    let names: Vec<&str> = event
        .accessors
        .iter()
        .map(|&id| result.program.member(id).name.as_str())
        .collect();
    assert_eq!(names, vec!["add_Changed", "remove_Changed"]);
}

#[test]
fn test_operators_use_metadata_names() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::interface("INumber")
            .type_param(TypeParamDeclaration::new("T").constraint("INumber<T>"))
            .member(
                MemberDeclaration::operator("+", "T")
                    .modifiers(static_abstract())
                    .param("a", "T")
                    .param("b", "T"),
            )
            .member(
                MemberDeclaration::operator("-", "T")
                    .modifiers(static_abstract())
                    .param("a", "T"),
            )
            .member(
                MemberDeclaration::operator("<=>", "T")
                    .modifiers(static_abstract())
                    .param("a", "T"),
            ),
    );
    let result = bind_unit(&unit);
    assert_eq!(codes_of(&result), vec![codes::UNKNOWN_OPERATOR]);

    let plus = member(&result, "INumber", "op_Addition");
    assert_eq!(plus.kind, MemberKind::Operator(OperatorToken::Plus));
    let negate = member(&result, "INumber", "op_UnaryNegation");
    assert_eq!(negate.signature.arity(), 1);

    let def = result.program.def_by_name("INumber").expect("INumber");
    let t = result.program.def(def).type_params[0];
    assert_eq!(
        result.program.type_param(t).constraints,
        vec![result.program.def(def).self_type]
    );
}

#[test]
fn test_explicit_implementations_bind_to_slots() {
    let unit = CompilationUnit::new()
        .with_type(
            TypeDeclaration::interface("I")
                .generic("T")
                .member(MemberDeclaration::method("M", "void").param("x", "T"))
                .member(MemberDeclaration::property("P", "int").getter()),
        )
        .with_type(TypeDeclaration::interface("J"))
        .with_type(
            TypeDeclaration::class("C")
                .implements("I<string>")
                .member(
                    MemberDeclaration::method("M", "void")
                        .param("x", "string")
                        .explicit("I<string>")
                        .body(),
                )
                .member(
                    MemberDeclaration::method("M", "void")
                        .param("x", "string")
                        .explicit("I<string>")
                        .body(),
                )
                .member(
                    MemberDeclaration::method("M", "void")
                        .param("x", "int")
                        .explicit("I<string>")
                        .body(),
                )
                .member(MemberDeclaration::method("N", "void").explicit("J").body())
                .member(
                    MemberDeclaration::property("P", "int")
                        .explicit("I<string>")
                        .getter()
                        .setter(),
                ),
        );
    let result = bind_unit(&unit);
    assert_eq!(
        codes_of(&result),
        vec![
            codes::DUPLICATE_EXPLICIT_IMPL,
            codes::EXPLICIT_IMPL_NOT_FOUND,
            codes::EXPLICIT_IMPL_INTERFACE_NOT_DECLARED,
            codes::EXPLICIT_IMPL_NOT_FOUND,
        ]
    );

    let c = result.program.def_by_name("C").expect("C");
    let members = &result.program.def(c).members;
    let first = result.program.member(members[0]);
    let slot = first
        .explicit_target
        .as_ref()
        .and_then(|target| target.slot)
        .expect("first explicit implementation wins");
    assert_eq!(result.program.member(slot).name, "M");
    assert_eq!(first.slot, SlotKind::Override);
    assert_eq!(first.modifiers.access(), Modifiers::PRIVATE);
    assert!(
        result.program.member(members[1])
            .explicit_target
            .as_ref()
            .is_some_and(|target| target.slot.is_none())
    );

    // The getter pairs with the interface getter; the setter has no target.
    let property = member(&result, "C", "P");
    let getter = result.program.member(property.accessors[0]);
    let target = getter.explicit_target.as_ref().and_then(|t| t.slot).expect("getter slot");
    assert_eq!(result.program.member(target).name, "get_P");
    assert_eq!(
        result.diagnostics[3].location,
        Some(iface_solver::DiagnosticLocation::Member(property.accessors[1]))
    );
}

#[test]
fn test_partial_members_are_linked() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C")
            .member(
                MemberDeclaration::method("M", "void")
                    .modifiers([ModifierToken::Partial])
                    .param("x", "int"),
            )
            .member(
                MemberDeclaration::method("M", "void")
                    .modifiers([ModifierToken::Partial])
                    .param("x", "int")
                    .body(),
            )
            .member(
                MemberDeclaration::method("M", "void")
                    .modifiers([ModifierToken::Partial])
                    .param("x", "string"),
            ),
    );
    let result = bind_unit(&unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let c = result.program.def_by_name("C").expect("C");
    let ids = result.program.def(c).members.clone();
    assert_eq!(
        result.program.member(ids[0]).partial,
        Some(PartialPart::Definition {
            implementation: Some(ids[1])
        })
    );
    assert_eq!(
        result.program.member(ids[1]).partial,
        Some(PartialPart::Implementation { definition: ids[0] })
    );
    assert!(!result.program.member(ids[1]).is_lookup_visible());
    assert_eq!(
        result.program.member(ids[2]).partial,
        Some(PartialPart::Definition {
            implementation: None
        })
    );
}

#[test]
fn test_parameters_and_annotations() {
    let unit = CompilationUnit::new()
        .with_type(TypeDeclaration::class("IsConst"))
        .with_type(
            TypeDeclaration::interface("I").member(
                MemberDeclaration::method("M", "int")
                    .param_decl(
                        ParamDeclaration::new("x", "int")
                            .by_ref(RefToken::In)
                            .annotated(AnnotationDecl::required("IsConst")),
                    )
                    .return_annotation(AnnotationDecl::optional("IsConst")),
            ),
        );
    let result = bind_unit(&unit);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let m = member(&result, "I", "M");
    let is_const = result
        .program
        .def(result.program.def_by_name("IsConst").expect("IsConst"))
        .self_type;
    assert_eq!(m.signature.params[0].ref_kind, RefKind::In);
    assert!(m.signature.params[0].ty.annotations[0].required);
    assert_eq!(m.signature.params[0].ty.annotations[0].modifier, is_const);
    assert!(!m.signature.ret.annotations[0].required);
}

#[test]
fn test_heritage_errors() {
    let unit = CompilationUnit::new()
        .with_type(TypeDeclaration::interface("I"))
        .with_type(TypeDeclaration::class("B"))
        .with_type(TypeDeclaration::structure("S").extends("B"))
        .with_type(TypeDeclaration::class("C").extends("I").implements("B"))
        .with_type(TypeDeclaration::class("D").extends("Nope"));
    let result = bind_unit(&unit);
    assert_eq!(
        codes_of(&result),
        vec![
            codes::BASE_TYPE_MUST_BE_CLASS,
            codes::BASE_TYPE_MUST_BE_CLASS,
            codes::NOT_AN_INTERFACE,
            codes::CANNOT_FIND_TYPE,
        ]
    );
    let c = result.program.def_by_name("C").expect("C");
    assert!(result.program.def(c).base.is_none());
    assert!(result.program.def(c).interfaces.is_empty());
}

#[test]
fn test_capability_gate_from_unit_options() {
    let json = r#"{
        "options": { "languageVersion": "8" },
        "types": [
            { "name": "I", "kind": "interface",
              "members": [
                { "kind": "method", "name": "M", "modifiers": ["static", "abstract"] },
                { "kind": "method", "name": "N", "hasBody": true }
              ] }
        ]
    }"#;
    let unit = CompilationUnit::from_json(json).expect("valid unit");
    let result = bind_unit(&unit);
    assert_eq!(result.capabilities.language_version, LanguageVersion::V8);
    assert_eq!(codes_of(&result), vec![codes::FEATURE_NOT_AVAILABLE]);
    assert_eq!(
        result.diagnostics[0].args,
        vec![
            DiagnosticArg::Feature(LanguageFeature::StaticAbstractMembersInInterfaces),
            DiagnosticArg::Version(LanguageVersion::V8),
            DiagnosticArg::Version(LanguageVersion::V11),
        ]
    );
    assert!(member(&result, "I", "M").modifiers.contains(Modifiers::ABSTRACT));

    let no_runtime = Capabilities::new(LanguageVersion::LATEST, RuntimeFeatures::empty());
    let result = bind(&unit, no_runtime);
    assert_eq!(
        codes_of(&result),
        vec![codes::RUNTIME_NOT_SUPPORTED, codes::RUNTIME_NOT_SUPPORTED]
    );
}

#[test]
fn test_rendered_modifier_diagnostic() {
    let unit = CompilationUnit::new().with_type(
        TypeDeclaration::class("C").member(
            MemberDeclaration::method("M", "void")
                .modifiers([ModifierToken::Public, ModifierToken::Static, ModifierToken::Virtual])
                .body(),
        ),
    );
    let result = bind_unit(&unit);
    let rendered = DiagnosticFormatter::new(&result.program).render(&result.diagnostics[0]);
    assert_eq!(rendered.code, codes::STATIC_MEMBER_CANNOT_BE_MARKED);
    assert_eq!(rendered.location, "C.M");
    assert!(rendered.message_text.contains("C.M()"), "{}", rendered.message_text);
    assert!(rendered.message_text.contains("virtual"), "{}", rendered.message_text);
}
