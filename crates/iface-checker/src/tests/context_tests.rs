use super::*;
use iface_binder::{MemberDeclaration, ModifierToken, TypeDeclaration};
use iface_common::{LanguageVersion, RuntimeFeatures};

fn def(compilation: &Compilation, name: &str) -> DefId {
    compilation.program().def_by_name(name).expect("type declared")
}

fn simple_unit() -> CompilationUnit {
    CompilationUnit::new()
        .with_type(TypeDeclaration::interface("I").member(MemberDeclaration::method("M", "void")))
        .with_type(
            TypeDeclaration::class("C").implements("I").member(
                MemberDeclaration::method("M", "void")
                    .modifier(ModifierToken::Public)
                    .body(),
            ),
        )
        .with_type(TypeDeclaration::class("D").extends("C"))
}

#[test]
fn test_repeated_request_returns_published_map() {
    let compilation = Compilation::from_unit(&simple_unit());
    let c = def(&compilation, "C");
    let first = compilation.implementation_map_for_def(c).expect("well formed");
    let second = compilation.implementation_map_for_def(c).expect("well formed");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 1);
}

#[test]
fn test_derived_request_publishes_base_map() {
    let compilation = Compilation::from_unit(&simple_unit());
    let d = compilation.implementation_map_for_def(def(&compilation, "D")).expect("well formed");
    assert_eq!(d.len(), 1);
    let c_ty = compilation.program().def(def(&compilation, "C")).self_type;
    assert!(compilation.maps.contains_key(&(c_ty, compilation.capabilities())));
}

#[test]
fn test_invalidate_drops_cached_maps() {
    let compilation = Compilation::from_unit(&simple_unit());
    let c = def(&compilation, "C");
    let before = compilation.implementation_map_for_def(c).expect("well formed");
    compilation.invalidate();
    assert!(compilation.maps.is_empty());
    let after = compilation.implementation_map_for_def(c).expect("well formed");
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.entries().count(), after.entries().count());
}

#[test]
fn test_maps_are_keyed_by_capabilities() {
    let compilation = Compilation::from_unit(&simple_unit());
    let c_ty = compilation.program().def(def(&compilation, "C")).self_type;
    let latest = compilation.implementation_map(c_ty).expect("well formed");
    let legacy = Capabilities::new(LanguageVersion::V7_3, RuntimeFeatures::empty());
    let other = compilation
        .implementation_map_with(c_ty, legacy)
        .expect("well formed");
    assert!(!Arc::ptr_eq(&latest, &other));
    assert_eq!(compilation.maps.len(), 2);
}

#[test]
fn test_base_cycle_is_malformed_for_every_member_of_the_cycle() {
    let unit = CompilationUnit::new()
        .with_type(TypeDeclaration::class("A").extends("B"))
        .with_type(TypeDeclaration::class("B").extends("A"))
        .with_type(TypeDeclaration::class("Ok"));
    let compilation = Compilation::from_unit(&unit);
    for name in ["A", "B"] {
        let err = compilation
            .implementation_map_for_def(def(&compilation, name))
            .expect_err("cyclic base chain");
        assert_eq!(err.fault, HierarchyFault::Cycle);
    }
    let ok = compilation
        .implementation_map_for_def(def(&compilation, "Ok"))
        .expect("unaffected sibling");
    assert!(ok.is_empty());
}

#[test]
fn test_resolve_implementation_of_foreign_slot_is_missing() {
    let unit = simple_unit().with_type(
        TypeDeclaration::interface("J").member(MemberDeclaration::method("N", "void")),
    );
    let compilation = Compilation::from_unit(&unit);
    let program = compilation.program();
    let j = program.def(def(&compilation, "J"));
    let slot = InterfaceSlot::new(j.self_type, j.members[0]);
    let c_ty = program.def(def(&compilation, "C")).self_type;
    assert_eq!(
        compilation.resolve_implementation(c_ty, slot),
        Ok(Resolution::Unresolved(Unimplemented::missing()))
    );
}
