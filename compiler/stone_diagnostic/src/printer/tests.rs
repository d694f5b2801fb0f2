use super::*;
use crate::{diag, DiagnosticEngine};
use pretty_assertions::assert_eq;
use stone_ast::{Span, TokenKind};

/// Writer that refuses every write.
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_message_without_source() {
    let mut printer = TextDiagnosticPrinter::new(Vec::new());
    let message = DiagnosticMessage {
        id: crate::DiagId::UnreachableCode,
        level: DiagnosticLevel::Warning,
        loc: Span::new(4, 9),
        text: "will never be executed".to_owned(),
        highlights: Vec::new(),
        fix_its: vec![crate::FixIt::new(Span::new(4, 9), "")],
    };
    printer.consume(&message);
    assert!(!printer.finish());

    let out = String::from_utf8_lossy(&printer.into_inner()).into_owned();
    assert_eq!(
        out,
        "4..9: warning: will never be executed [UnreachableCode]\n  fix-it: remove 4..9\n"
    );
}

#[test]
fn test_line_and_column_from_source() {
    let source = "fun main() {\n  call(1\n}\n";
    let mut printer = TextDiagnosticPrinter::new(Vec::new())
        .with_source("main.stone", source)
        .with_names(false);
    let message = DiagnosticMessage {
        id: crate::DiagId::ExpectedToken,
        level: DiagnosticLevel::Error,
        loc: Span::new(22, 23),
        text: "expected ')'".to_owned(),
        highlights: Vec::new(),
        fix_its: Vec::new(),
    };
    printer.consume(&message);

    // The `}` starts a line, so the report moves to the end of `call(1`.
    let out = String::from_utf8_lossy(&printer.into_inner()).into_owned();
    assert_eq!(out, "main.stone:2:9: error: expected ')'\n");
}

#[test]
fn test_colors() {
    let mut printer =
        TextDiagnosticPrinter::new(Vec::new()).with_color_mode(ColorMode::Always, false);
    let message = DiagnosticMessage {
        id: crate::DiagId::ExpectedExpression,
        level: DiagnosticLevel::Fatal,
        loc: Span::new(0, 1),
        text: "expected expression".to_owned(),
        highlights: Vec::new(),
        fix_its: Vec::new(),
    };
    printer.consume(&message);
    let out = String::from_utf8_lossy(&printer.into_inner()).into_owned();
    assert!(out.starts_with("0..1: \x1b[1;35mfatal error\x1b[0m: "));
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn test_summary() {
    let mut printer = TextDiagnosticPrinter::new(Vec::new());
    printer.write_summary(0, 0);
    printer.write_summary(1, 0);
    printer.write_summary(0, 2);
    printer.write_summary(2, 1);
    let out = String::from_utf8_lossy(&printer.into_inner()).into_owned();
    assert_eq!(
        out,
        "1 error generated.\n2 warnings generated.\n2 errors and 1 warning generated.\n"
    );
}

#[test]
fn test_write_failure_reported_by_finish() {
    let mut engine = DiagnosticEngine::new();
    engine.add_consumer(Box::new(TextDiagnosticPrinter::new(BrokenPipe)));
    engine
        .diagnose(Span::DUMMY, diag::ExpectedToken, (TokenKind::Semi,))
        .flush();
    assert!(engine.finish());
}
