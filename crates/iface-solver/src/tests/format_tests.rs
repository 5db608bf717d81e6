use super::*;
use crate::def::{DefKind, TypeModifiers};
use crate::diagnostics::codes;
use crate::members::{AccessorKind, ExplicitTarget, Modifiers, OperatorToken};
use crate::signature::Param;
use crate::types::{TypeParamInfo, TypeParamOwner, Variance};

fn generic_interface(program: &mut Program, name: &str) -> (DefId, TypeId) {
    let def = program.declare_type(name, DefKind::Interface, TypeModifiers::empty());
    let param = program.add_type_param(TypeParamInfo {
        name: "T".to_string(),
        owner: TypeParamOwner::Type(def),
        ordinal: 0,
        variance: Variance::Invariant,
        constraints: Vec::new(),
    });
    program.def_mut(def).type_params.push(param);
    program.refresh_self_type(def);
    (def, program.interner.type_param(param))
}

#[test]
fn test_format_types() {
    let mut program = Program::new();
    let (list, t) = generic_interface(&mut program, "IList");
    let list_of_int = program.interner.named(list, [TypeId::INT32]);
    let nested = program.interner.array(program.interner.named(list, [t]));
    let nullable = program.interner.nullable(TypeId::INT64);

    let fmt = TypeFormatter::new(&program);
    assert_eq!(fmt.format(TypeId::STRING), "string");
    assert_eq!(fmt.format(list_of_int), "IList<int>");
    assert_eq!(fmt.format(nested), "IList<T>[]");
    assert_eq!(fmt.format(nullable), "long?");
    assert_eq!(fmt.format_def(list), "IList<T>");
}

#[test]
fn test_format_members() {
    let mut program = Program::new();
    let (iface, t) = generic_interface(&mut program, "I");
    let sig = Signature::new(
        MemberKind::Method,
        vec![Param::new("a", TypeId::INT32), Param::new("b", t)],
        TypeId::VOID,
    );
    let m = program.add_member(Member::new("M", MemberKind::Method, iface, DefKind::Interface, sig));
    let indexer_sig = Signature::new(MemberKind::Property, vec![Param::new("i", TypeId::INT32)], t);
    let indexer = program.add_member(Member::new(
        "Item",
        MemberKind::Property,
        iface,
        DefKind::Interface,
        indexer_sig,
    ));
    let getter_sig = Signature::new(
        MemberKind::Accessor(AccessorKind::Get),
        vec![Param::new("i", TypeId::INT32)],
        t,
    );
    let mut getter = Member::new(
        "get_Item",
        MemberKind::Accessor(AccessorKind::Get),
        iface,
        DefKind::Interface,
        getter_sig,
    );
    getter.owner = Some(indexer);
    let getter = program.add_member(getter);
    program.member_mut(indexer).accessors.push(getter);

    let iface_ty = program.def(iface).self_type;
    let op_sig = Signature::new(
        MemberKind::Operator(OperatorToken::Plus),
        vec![Param::new("x", iface_ty), Param::new("y", iface_ty)],
        iface_ty,
    );
    let op = program.add_member(Member::new(
        "op_Addition",
        MemberKind::Operator(OperatorToken::Plus),
        iface,
        DefKind::Interface,
        op_sig,
    ));

    let fmt = TypeFormatter::new(&program);
    assert_eq!(fmt.format_member(m), "I<T>.M(int, T)");
    assert_eq!(fmt.format_member(indexer), "I<T>.this[int]");
    assert_eq!(fmt.format_member(getter), "I<T>.this[int].get");
    assert_eq!(fmt.format_member(op), "I<T>.operator +(I<T>, I<T>)");

    let i_of_string = program.interner.named(iface, [TypeId::STRING]);
    assert_eq!(fmt.format_slot(i_of_string, m), "I<string>.M(int, string)");
}

#[test]
fn test_format_explicit_implementation() {
    let mut program = Program::new();
    let iface = program.declare_type("I", DefKind::Interface, TypeModifiers::empty());
    let class = program.declare_type("C", DefKind::Class, TypeModifiers::empty());
    let iface_ty = program.def(iface).self_type;
    let mut member = Member::new(
        "M",
        MemberKind::Method,
        class,
        DefKind::Class,
        Signature::new(MemberKind::Method, Vec::new(), TypeId::VOID),
    );
    member.explicit_target = Some(ExplicitTarget {
        interface: iface_ty,
        member_name: "M".to_string(),
        slot: None,
    });
    let m = program.add_member(member.with_body());

    assert_eq!(TypeFormatter::new(&program).format_member(m), "C.I.M()");
}

#[test]
fn test_render_pending_diagnostic() {
    let mut program = Program::new();
    let iface = program.declare_type("I", DefKind::Interface, TypeModifiers::empty());
    let class = program.declare_type("C", DefKind::Class, TypeModifiers::empty());
    let sig = Signature::new(MemberKind::Method, Vec::new(), TypeId::VOID);
    let slot = program.add_member(
        Member::new("M", MemberKind::Method, iface, DefKind::Interface, sig.clone())
            .with_modifiers(Modifiers::PUBLIC | Modifiers::ABSTRACT),
    );
    let candidate = program.add_member(
        Member::new("M", MemberKind::Method, class, DefKind::Class, sig)
            .with_modifiers(Modifiers::PRIVATE)
            .with_body(),
    );
    let iface_ty = program.def(iface).self_type;

    let pending = PendingDiagnostic::error(
        codes::NOT_IMPLEMENTED,
        vec![
            class.into(),
            DiagnosticArg::Slot {
                interface: iface_ty,
                member: slot,
            },
        ],
    )
    .at_def(class)
    .with_related(
        PendingDiagnostic::error(codes::CLOSEST_CANDIDATE, vec![candidate.into()])
            .at_member(candidate),
    );

    let rendered = DiagnosticFormatter::new(&program).render(&pending);
    assert_eq!(rendered.location, "C");
    assert_eq!(rendered.code, codes::NOT_IMPLEMENTED);
    assert_eq!(
        rendered.message_text,
        "'C' does not implement interface member 'I.M()'."
    );
    assert_eq!(rendered.related_information.len(), 1);
    assert_eq!(rendered.related_information[0].location, "C.M");
    assert_eq!(
        rendered.related_information[0].message_text,
        "The closest candidate is 'C.M()'."
    );
}

#[test]
fn test_render_modifier_and_unknown_code() {
    let program = Program::new();
    let fmt = DiagnosticFormatter::new(&program);
    assert_eq!(
        fmt.format_arg(&DiagnosticArg::Modifier(Modifiers::STATIC | Modifiers::ABSTRACT)),
        "static abstract"
    );
    let unknown = PendingDiagnostic::error(77, vec!["x".into()]);
    assert_eq!(fmt.message(&unknown), "Unknown diagnostic 77: x");
    assert_eq!(fmt.render(&unknown).location, "");
}
