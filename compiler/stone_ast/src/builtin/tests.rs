use super::*;

#[test]
fn test_names_are_distinct() {
    let mut names: Vec<&str> = BuiltinTypeKind::ALL.iter().map(|k| k.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), BuiltinTypeKind::ALL.len());
}

#[test]
fn test_classification() {
    assert!(BuiltinTypeKind::Int32.is_signed_integer());
    assert!(BuiltinTypeKind::UInt.is_unsigned_integer());
    assert!(BuiltinTypeKind::Float128.is_float());
    assert!(!BuiltinTypeKind::Bool.is_integer());
    assert!(!BuiltinTypeKind::Null.is_float());
}

#[test]
fn test_bit_width() {
    assert_eq!(BuiltinTypeKind::Int8.bit_width(), Some(8));
    assert_eq!(BuiltinTypeKind::Float16.bit_width(), Some(16));
    assert_eq!(BuiltinTypeKind::UInt128.bit_width(), Some(128));
    assert_eq!(BuiltinTypeKind::Int.bit_width(), None);
    assert_eq!(BuiltinTypeKind::Void.bit_width(), None);
}

#[test]
fn test_every_kind_allocated_once() {
    let ctx = Context::new();
    for &kind in BuiltinTypeKind::ALL {
        let id = ctx.builtin().get(kind);
        assert_eq!(ctx[id].kind(), kind);
        assert_eq!(ctx.builtin().lookup(ctx[id].name()), Some(id));
    }
    assert_eq!(ctx.builtin().iter().count(), BuiltinTypeKind::ALL.len());
}
