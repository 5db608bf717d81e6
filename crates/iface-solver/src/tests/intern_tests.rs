use super::*;
use crate::types::TypeData;

#[test]
fn test_interner_intrinsics() {
    let interner = TypeInterner::new();

    assert_eq!(
        interner.lookup(TypeId::INT32),
        Some(TypeData::Intrinsic(IntrinsicKind::Int32))
    );
    assert_eq!(
        interner.lookup(TypeId::CHAR),
        Some(TypeData::Intrinsic(IntrinsicKind::Char))
    );
    assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();

    let list_int = interner.named(DefId(0), [TypeId::INT32]);
    let list_int_again = interner.named(DefId(0), [TypeId::INT32]);
    let list_string = interner.named(DefId(0), [TypeId::STRING]);

    assert_eq!(list_int, list_int_again);
    assert_ne!(list_int, list_string);
    assert!(!list_int.is_intrinsic());
}

#[test]
fn test_interner_shallow_queries() {
    let interner = TypeInterner::new();
    let param = interner.type_param(TypeParamId(3));
    let nullable = interner.nullable(TypeId::INT32);

    assert_eq!(interner.as_type_param(param), Some(TypeParamId(3)));
    assert_eq!(interner.as_type_param(TypeId::INT32), None);
    assert_eq!(interner.nullable_inner(nullable), Some(TypeId::INT32));
    assert!(interner.as_named(param).is_none());
}

#[test]
fn test_interner_concurrent_interning_agrees() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let ids: Vec<TypeId> = (0..256u32)
        .into_par_iter()
        .map(|i| interner.array(interner.type_param(TypeParamId(i % 8))))
        .collect();

    for (i, id) in ids.iter().enumerate() {
        let expected = interner.array(interner.type_param(TypeParamId(i as u32 % 8)));
        assert_eq!(*id, expected, "index {i}");
    }
    // 9 intrinsics + 8 params + 8 arrays
    assert_eq!(interner.len(), 25);
}
