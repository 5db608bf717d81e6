use super::*;
use crate::types::Variance;

fn generic_param(program: &mut Program, def: DefId, name: &str) -> TypeParamId {
    let ordinal = program.def(def).type_params.len() as u32;
    let param = program.add_type_param(TypeParamInfo {
        name: name.to_string(),
        owner: crate::types::TypeParamOwner::Type(def),
        ordinal,
        variance: Variance::Invariant,
        constraints: Vec::new(),
    });
    program.def_mut(def).type_params.push(param);
    program.refresh_self_type(def);
    param
}

#[test]
fn test_base_chain_is_most_derived_first() {
    let mut program = Program::new();
    let a = program.declare_type("A", DefKind::Class, TypeModifiers::empty());
    let b = program.declare_type("B", DefKind::Class, TypeModifiers::empty());
    let c = program.declare_type("C", DefKind::Class, TypeModifiers::empty());
    let a_ty = program.def(a).self_type;
    let b_ty = program.def(b).self_type;
    program.def_mut(b).base = Some(a_ty);
    program.def_mut(c).base = Some(b_ty);

    let c_ty = program.def(c).self_type;
    assert_eq!(program.base_chain(c_ty), Ok(vec![c_ty, b_ty, a_ty]));
}

#[test]
fn test_base_chain_cycle_is_malformed() {
    let mut program = Program::new();
    let a = program.declare_type("A", DefKind::Class, TypeModifiers::empty());
    let b = program.declare_type("B", DefKind::Class, TypeModifiers::empty());
    let a_ty = program.def(a).self_type;
    let b_ty = program.def(b).self_type;
    program.def_mut(a).base = Some(b_ty);
    program.def_mut(b).base = Some(a_ty);

    let err = program.base_chain(a_ty).expect_err("cycle should be reported");
    assert_eq!(err.fault, HierarchyFault::Cycle);
    assert_eq!(err.ty, a_ty);
}

#[test]
fn test_generic_base_is_instantiated() {
    let mut program = Program::new();
    let base = program.declare_type("Base", DefKind::Class, TypeModifiers::empty());
    let t = generic_param(&mut program, base, "T");
    let derived = program.declare_type("Derived", DefKind::Class, TypeModifiers::empty());
    let base_of_int = program.interner.named(base, [TypeId::INT32]);
    program.def_mut(derived).base = Some(base_of_int);

    let derived_ty = program.def(derived).self_type;
    assert_eq!(program.base_type(derived_ty), Some(base_of_int));
    assert_eq!(
        program.substitution_of(base_of_int).get(t),
        Some(TypeId::INT32)
    );
}

#[test]
fn test_interface_closure_and_inherited_interfaces() {
    let mut program = Program::new();
    let i = program.declare_type("I", DefKind::Interface, TypeModifiers::empty());
    let j = program.declare_type("J", DefKind::Interface, TypeModifiers::empty());
    let k = program.declare_type("K", DefKind::Interface, TypeModifiers::empty());
    let b = program.declare_type("B", DefKind::Class, TypeModifiers::empty());
    let d = program.declare_type("D", DefKind::Class, TypeModifiers::empty());
    let (i_ty, j_ty, k_ty) = (
        program.def(i).self_type,
        program.def(j).self_type,
        program.def(k).self_type,
    );
    let b_ty = program.def(b).self_type;
    program.def_mut(j).interfaces.push(i_ty);
    program.def_mut(b).interfaces.push(j_ty);
    program.def_mut(d).base = Some(b_ty);
    program.def_mut(d).interfaces.push(k_ty);

    let d_ty = program.def(d).self_type;
    assert_eq!(program.declared_interface_closure(b_ty), vec![j_ty, i_ty]);
    assert_eq!(program.declared_interface_closure(d_ty), vec![k_ty]);
    assert_eq!(program.all_interfaces(d_ty), vec![k_ty, j_ty, i_ty]);
    assert!(program.declares_interface(b_ty, i_ty));
    assert!(!program.declares_interface(d_ty, i_ty));
    assert!(program.is_derived_from(d_ty, i_ty));
    assert!(program.is_derived_from(d_ty, b_ty));
    assert!(!program.is_derived_from(b_ty, d_ty));
}

#[test]
fn test_interface_cycle_detection() {
    let mut program = Program::new();
    let i = program.declare_type("I", DefKind::Interface, TypeModifiers::empty());
    let j = program.declare_type("J", DefKind::Interface, TypeModifiers::empty());
    let i_ty = program.def(i).self_type;
    let j_ty = program.def(j).self_type;
    program.def_mut(i).interfaces.push(j_ty);
    assert!(!program.has_interface_cycle(i));

    program.def_mut(j).interfaces.push(i_ty);
    assert!(program.has_interface_cycle(i));
    assert!(program.has_interface_cycle(j));
}

#[test]
fn test_constraint_closure_follows_type_parameters() {
    let mut program = Program::new();
    let i = program.declare_type("I", DefKind::Interface, TypeModifiers::empty());
    let j = program.declare_type("J", DefKind::Interface, TypeModifiers::empty());
    let i_ty = program.def(i).self_type;
    let j_ty = program.def(j).self_type;
    program.def_mut(j).interfaces.push(i_ty);

    let g = program.declare_type("G", DefKind::Class, TypeModifiers::empty());
    let t = generic_param(&mut program, g, "T");
    let u = generic_param(&mut program, g, "U");
    let t_ty = program.interner.type_param(t);
    program.type_param_mut(t).constraints.push(j_ty);
    program.type_param_mut(u).constraints.push(t_ty);

    assert_eq!(program.constraint_closure(u), vec![j_ty, i_ty]);
    assert!(program.is_constrained_to(u, i_ty));
    let u_ty = program.interner.type_param(u);
    assert!(program.is_derived_from(u_ty, i_ty));
    assert!(!program.is_derived_from(i_ty, u_ty));
}

#[test]
fn test_slot_signature_maps_method_type_params_by_ordinal() {
    use crate::members::{Member, MemberKind};
    use crate::signature::{Param, Signature};

    let mut program = Program::new();
    let iface = program.declare_type("I", DefKind::Interface, TypeModifiers::empty());
    let t = generic_param(&mut program, iface, "T");
    let class = program.declare_type("C", DefKind::Class, TypeModifiers::empty());

    let method_param = |program: &mut Program, owner: MemberId, name: &str| {
        let id = program.add_type_param(TypeParamInfo {
            name: name.to_string(),
            owner: crate::types::TypeParamOwner::Member(owner),
            ordinal: 0,
            variance: Variance::Invariant,
            constraints: Vec::new(),
        });
        program.member_mut(owner).type_params.push(id);
        program.member_mut(owner).signature.type_param_count = 1;
        program.interner.type_param(id)
    };

    let placeholder = Signature::new(MemberKind::Method, Vec::new(), TypeId::VOID);
    let slot = program.add_member(Member::new(
        "M",
        MemberKind::Method,
        iface,
        DefKind::Interface,
        placeholder.clone(),
    ));
    let u = method_param(&mut program, slot, "U");
    let t_ty = program.interner.type_param(t);
    program.member_mut(slot).signature.params = vec![Param::new("a", t_ty), Param::new("b", u)];

    let candidate = program.add_member(Member::new(
        "M",
        MemberKind::Method,
        class,
        DefKind::Class,
        placeholder,
    ));
    let v = method_param(&mut program, candidate, "V");
    program.member_mut(candidate).signature.params =
        vec![Param::new("a", TypeId::STRING), Param::new("b", v)];

    let i_of_string = program.interner.named(iface, [TypeId::STRING]);
    let seen = program.slot_signature(i_of_string, slot, candidate);
    assert!(crate::signature::signatures_equal(
        &seen,
        &program.member(candidate).signature
    ));
}
