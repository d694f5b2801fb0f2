use super::*;
use proptest::prelude::*;

#[test]
fn test_intern_and_lookup() {
    let table = IdentifierTable::new();

    let hello = table.intern("hello");
    let world = table.intern("world");
    let hello2 = table.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);
    assert_eq!(&*table.lookup(hello), "hello");
    assert_eq!(&*table.lookup(world), "world");
}

#[test]
fn test_case_sensitive() {
    let table = IdentifierTable::new();
    assert_ne!(table.intern("Stone"), table.intern("stone"));
}

#[test]
fn test_empty_spelling() {
    let table = IdentifierTable::new();
    assert_eq!(table.intern(""), Identifier::EMPTY);
    assert_eq!(&*table.lookup(Identifier::EMPTY), "");
    assert!(table.is_empty());
}

#[test]
fn test_indices_are_dense() {
    let table = IdentifierTable::new();
    let a = table.intern("a");
    let b = table.intern("b");
    assert_eq!(a.index(), 1);
    assert_eq!(b.index(), 2);
    assert_eq!(a.table(), Some(table.id()));
}

#[test]
fn test_keywords_pre_interned() {
    let table = IdentifierTable::with_keywords();
    assert_eq!(table.len(), TokenKind::KEYWORDS.len() + 1);

    let fun = table.get("fun");
    assert!(fun.is_some());
    assert_eq!(table.intern("fun"), fun.unwrap_or_default());
    assert_eq!(table.get("not_a_keyword"), None);
}

#[test]
fn test_len_counts_each_spelling_once() {
    let table = IdentifierTable::new();
    table.intern("a");
    table.intern("b");
    table.intern("a");
    assert_eq!(table.len(), 3);
}

#[test]
fn test_dropping_table_frees_spellings() {
    let table = IdentifierTable::new();
    let id = table.intern("transient");
    let weak = Arc::downgrade(&table.lookup(id));
    assert!(weak.upgrade().is_some());

    drop(table);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_lookup_outlives_table() {
    let table = IdentifierTable::new();
    let id = table.intern("kept");
    let spelling = table.lookup(id);
    let weak = Arc::downgrade(&spelling);

    drop(table);
    assert_eq!(&*spelling, "kept");
    drop(spelling);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_shared_table_frees_with_last_clone() {
    let table = SharedIdentifierTable::new(IdentifierTable::new());
    let clone = table.clone();
    let id = table.intern("shared");
    let weak = Arc::downgrade(&table.lookup(id));

    drop(table);
    assert_eq!(&*clone.lookup(id), "shared");
    drop(clone);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_tables_are_distinct() {
    let a = IdentifierTable::new();
    let b = IdentifierTable::new();
    assert_ne!(a.id(), b.id());

    let in_a = a.intern("same");
    let in_b = b.intern("same");
    assert_ne!(in_a, in_b);
    assert!(a.owns(in_a));
    assert!(!a.owns(in_b));
    assert!(a.owns(Identifier::EMPTY));
    assert!(b.owns(Identifier::EMPTY));
}

#[test]
#[should_panic(expected = "resolved against table")]
fn test_lookup_foreign_identifier_panics() {
    let a = IdentifierTable::new();
    let b = IdentifierTable::new();
    let id = a.intern("only_in_a");
    b.intern("padding");
    b.lookup(id);
}

#[test]
fn test_table_full_display() {
    let err = IdentifierError::TableFull { count: 7 };
    assert_eq!(err.to_string(), "identifier table is full: 7 spellings");
}

#[test]
fn test_shared_table() {
    let table = SharedIdentifierTable::new(IdentifierTable::new());
    let table2 = table.clone();

    let a = table.intern("shared");
    let b = table2.intern("shared");
    assert_eq!(a, b);
    assert_eq!(&*IdentifierLookup::lookup(&table2, a), "shared");
}

#[test]
fn test_concurrent_interning_agrees() {
    let table = SharedIdentifierTable::new(IdentifierTable::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let table = table.clone();
            std::thread::spawn(move || {
                (0..100)
                    .map(|i| table.intern(&format!("name{i}")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<Identifier>> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_default())
        .collect();
    for r in &results[1..] {
        assert_eq!(r, &results[0]);
    }
    assert_eq!(table.len(), 101);
}

proptest! {
    #[test]
    fn prop_identifier_identity(a in "[a-zA-Z_][a-zA-Z0-9_]{0,12}", b in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        let table = IdentifierTable::new();
        let ia = table.intern(&a);
        let ib = table.intern(&b);
        prop_assert_eq!(ia == ib, a == b);
        prop_assert_eq!(&*table.lookup(ia), a.as_str());
        prop_assert_eq!(table.intern(&a), ia);
    }
}
