use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stone_ast::IdentifierTable;

#[test]
fn test_tuple_conversion() {
    let table = IdentifierTable::new();
    let x = table.intern("x");
    let args = (DeclKind::Var, x, 3u64).into_arguments();
    assert_eq!(
        args.as_slice(),
        &[
            DiagnosticArgument::Syntax(SyntaxArgument::DeclKind(DeclKind::Var)),
            DiagnosticArgument::Syntax(SyntaxArgument::Identifier(x)),
            DiagnosticArgument::UInt(3),
        ]
    );
    assert!(().into_arguments().is_empty());
}

#[test]
fn test_format_substitutes_in_order() {
    let table = IdentifierTable::new();
    let f = table.intern("frobnicate");
    let args = (DeclKind::Fun, f).into_arguments();
    assert_eq!(
        format_diagnostic_text("redefinition of %0 '%1'", &args, Some(&table)),
        "redefinition of function 'frobnicate'"
    );
}

#[test]
fn test_format_reuses_and_reorders() {
    let args = ("a", "b").into_arguments();
    assert_eq!(format_diagnostic_text("%1%0%1", &args, None), "bab");
}

#[test]
fn test_format_all_argument_kinds() {
    let args = (true, -4i64, String::from("out.o"), TokenKind::RParen).into_arguments();
    assert_eq!(
        format_diagnostic_text("%0 %1 %2 %3", &args, None),
        "true -4 out.o )"
    );
}

#[test]
fn test_format_escapes_and_missing() {
    let args = (7u64,).into_arguments();
    assert_eq!(format_diagnostic_text("100%% of %0", &args, None), "100% of 7");
    assert_eq!(format_diagnostic_text("%3 left", &args, None), "%3 left");
    assert_eq!(format_diagnostic_text("50% off", &args, None), "50% off");
    assert_eq!(format_diagnostic_text("trailing %", &args, None), "trailing %");
}

#[test]
fn test_identifier_without_table() {
    let table = IdentifierTable::new();
    let id = table.intern("y");
    let args = (id,).into_arguments();
    assert_eq!(
        format_diagnostic_text("'%0'", &args, None),
        format!("'#{}'", id.index())
    );
}

proptest! {
    #[test]
    fn prop_text_without_percent_is_unchanged(text in "[^%]{0,40}") {
        prop_assert_eq!(format_diagnostic_text(&text, &[], None), text);
    }
}
