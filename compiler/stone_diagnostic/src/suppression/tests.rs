use super::*;
use crate::{diag, CollectingConsumer};
use stone_ast::Span;

#[test]
fn test_consumers_restored() {
    let collector = CollectingConsumer::new();
    let mut engine = DiagnosticEngine::new();
    engine.add_consumer(Box::new(collector.clone()));
    {
        let mut quiet = engine.suppress();
        assert_eq!(quiet.consumer_count(), 0);
        quiet
            .diagnose(Span::DUMMY, diag::ExpectedExpression, ())
            .flush();
    }
    assert!(collector.is_empty());
    assert!(engine.had_any_error());
    assert_eq!(engine.consumer_count(), 1);

    engine.diagnose(Span::DUMMY, diag::UnreachableCode, ()).flush();
    assert_eq!(collector.len(), 1);
}

#[test]
fn test_consumer_added_while_suppressed() {
    let early = CollectingConsumer::new();
    let late = CollectingConsumer::new();
    let mut engine = DiagnosticEngine::new();
    let early_id = engine.add_consumer(Box::new(early.clone()));
    {
        let mut quiet = engine.suppress();
        quiet.add_consumer(Box::new(late.clone()));
        quiet.diagnose(Span::DUMMY, diag::UnreachableCode, ()).flush();
    }
    assert!(early.is_empty());
    assert_eq!(late.len(), 1);
    assert_eq!(engine.consumer_count(), 2);
    assert!(engine.remove_consumer(early_id).is_some());
}
