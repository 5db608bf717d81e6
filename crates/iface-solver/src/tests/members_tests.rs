use super::*;
use crate::signature::Signature;
use crate::types::TypeId;

fn interface_method(modifiers: Modifiers) -> Member {
    Member::new(
        "M",
        MemberKind::Method,
        DefId(0),
        DefKind::Interface,
        Signature::new(MemberKind::Method, Vec::new(), TypeId::VOID),
    )
    .with_modifiers(modifiers)
}

#[test]
fn test_static_contract_requires_static_without_mandatory_body() {
    let contract = interface_method(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::ABSTRACT);
    assert!(contract.has_static_contract());

    let bodied_virtual =
        interface_method(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::VIRTUAL).with_body();
    assert!(!bodied_virtual.has_static_contract());

    let bodiless_static = interface_method(Modifiers::PUBLIC | Modifiers::STATIC);
    assert!(bodiless_static.has_static_contract());

    let instance = interface_method(Modifiers::PUBLIC | Modifiers::ABSTRACT);
    assert!(!instance.has_static_contract());
}

#[test]
fn test_static_contract_is_interface_only() {
    let mut class_member = interface_method(Modifiers::PUBLIC | Modifiers::STATIC);
    class_member.container = DefKind::Class;
    assert!(!class_member.has_static_contract());
}

#[test]
fn test_slot_kind_from_modifiers() {
    assert_eq!(
        SlotKind::from_modifiers(Modifiers::ABSTRACT, false),
        SlotKind::NewSlot
    );
    assert_eq!(
        SlotKind::from_modifiers(Modifiers::OVERRIDE | Modifiers::SEALED, false),
        SlotKind::Override
    );
    assert_eq!(SlotKind::from_modifiers(Modifiers::VIRTUAL, true), SlotKind::Override);
    assert_eq!(
        SlotKind::from_modifiers(Modifiers::PUBLIC | Modifiers::STATIC, false),
        SlotKind::NonDispatching
    );
}

#[test]
fn test_interface_slot_excludes_explicit_and_non_virtual() {
    let abstract_member = interface_method(Modifiers::PUBLIC | Modifiers::ABSTRACT);
    assert!(abstract_member.is_interface_slot());

    let sealed = interface_method(Modifiers::PUBLIC | Modifiers::SEALED).with_body();
    assert!(!sealed.is_interface_slot());

    let mut explicit = interface_method(Modifiers::ABSTRACT);
    explicit.explicit_target = Some(ExplicitTarget {
        interface: TypeId(20),
        member_name: "M".to_string(),
        slot: None,
    });
    explicit.slot = SlotKind::from_modifiers(explicit.modifiers, true);
    assert!(!explicit.is_interface_slot());
}

#[test]
fn test_operator_names_depend_on_arity() {
    assert_eq!(OperatorToken::Minus.metadata_name(1), "op_UnaryNegation");
    assert_eq!(OperatorToken::Minus.metadata_name(2), "op_Subtraction");
    assert_eq!(OperatorToken::Minus.category(1), OperatorCategory::Unary);
    assert_eq!(OperatorToken::Minus.category(2), OperatorCategory::Binary);
    assert_eq!(OperatorToken::LeftShift.category(2), OperatorCategory::Shift);
    assert!(OperatorToken::Plus.accepts_arity(1));
    assert!(!OperatorToken::Increment.accepts_arity(2));
    assert_eq!(OperatorToken::from_token("<="), Some(OperatorToken::LessThanOrEqual));
    assert_eq!(OperatorToken::from_token("=>"), None);
}

#[test]
fn test_modifier_keywords_round_trip() {
    assert_eq!(Modifiers::from_keyword("sealed"), Some(Modifiers::SEALED));
    assert_eq!(Modifiers::SEALED.keyword(), "sealed");
    assert_eq!(Modifiers::ACCESS.keyword(), "");
    assert_eq!(
        (Modifiers::STATIC | Modifiers::PUBLIC | Modifiers::ABSTRACT).to_string(),
        "public static abstract"
    );
}
