use super::*;
use crate::{ArenaKind, FunDecl, ModuleDecl, Span, StructDecl, VarDecl};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn fun(ctx: &mut Context, name: &str) -> NodeId<FunDecl> {
    let name = ctx.get_identifier(name);
    FunDecl::create(ctx, ArenaKind::Compilation, name, Span::DUMMY, &[], false)
}

/// D1 <- D2 <- D3, each linked to the one before.
fn three_member_chain(ctx: &mut Context) -> [NodeId<FunDecl>; 3] {
    let d1 = fun(ctx, "f");
    let d2 = fun(ctx, "f");
    let d3 = fun(ctx, "f");
    ctx.set_previous_decl(d2, Some(d1));
    ctx.set_previous_decl(d3, Some(d2));
    [d1, d2, d3]
}

#[test]
fn test_fresh_decl_is_canonical_singleton() {
    let mut ctx = Context::new();
    let d = fun(&mut ctx, "f");
    assert!(ctx.is_first_decl(d));
    assert_eq!(ctx.first_decl(d), d);
    assert_eq!(ctx.previous_decl(d), None);
    assert_eq!(ctx[d].redecl_link().link(), DeclLink::UninitializedLatest(ctx.id()));
}

#[test]
fn test_most_recent_initialises_lazily() {
    let mut ctx = Context::new();
    let d = fun(&mut ctx, "f");
    assert_eq!(ctx.most_recent_decl(d), d);
    assert_eq!(
        ctx[d].redecl_link().link(),
        DeclLink::KnownLatest {
            ctx: ctx.id(),
            latest: d,
            incomplete: false,
        }
    );
}

#[test]
fn test_three_member_chain() {
    let mut ctx = Context::new();
    let [d1, d2, d3] = three_member_chain(&mut ctx);

    for d in [d1, d2, d3] {
        assert_eq!(ctx.first_decl(d), d1);
        assert_eq!(ctx.most_recent_decl(d), d3);
    }
    assert!(ctx.is_first_decl(d1));
    assert!(!ctx.is_first_decl(d2));
    assert!(!ctx.is_first_decl(d3));
    assert_eq!(ctx.previous_decl(d3), Some(d2));
    assert_eq!(ctx.previous_decl(d2), Some(d1));
    assert_eq!(ctx.previous_decl(d1), None);
}

#[test]
fn test_redecls_from_every_member() {
    let mut ctx = Context::new();
    let [d1, d2, d3] = three_member_chain(&mut ctx);

    assert_eq!(ctx.redecls(d1).collect::<Vec<_>>(), vec![d1, d3, d2]);
    assert_eq!(ctx.redecls(d2).collect::<Vec<_>>(), vec![d2, d1, d3]);
    assert_eq!(ctx.redecls(d3).collect::<Vec<_>>(), vec![d3, d2, d1]);

    let expected: HashSet<_> = [d1, d2, d3].into_iter().collect();
    for start in [d1, d2, d3] {
        let seen: HashSet<_> = ctx.redecls(start).collect();
        assert_eq!(seen, expected);
    }
}

#[test]
fn test_single_member_redecls_terminates() {
    let mut ctx = Context::new();
    let name = ctx.get_identifier("S");
    let s = StructDecl::create(&mut ctx, ArenaKind::Compilation, name, Span::DUMMY);
    let mut iter = ctx.redecls(s);
    assert_eq!(iter.next(), Some(s));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_redecls_is_restartable() {
    let mut ctx = Context::new();
    let [d1, _, _] = three_member_chain(&mut ctx);
    let iter = ctx.redecls(d1);
    assert_eq!(iter.clone().count(), 3);
    assert_eq!(iter.count(), 3);
}

#[test]
fn test_linking_after_non_latest_member() {
    // Linking to an older member still appends after the newest one.
    let mut ctx = Context::new();
    let [d1, _, d3] = three_member_chain(&mut ctx);
    let d4 = fun(&mut ctx, "f");
    ctx.set_previous_decl(d4, Some(d1));

    assert_eq!(ctx.previous_decl(d4), Some(d3));
    assert_eq!(ctx.most_recent_decl(d1), d4);
    assert_eq!(ctx.first_decl(d4), d1);
    assert_eq!(ctx.redecls(d4).count(), 4);
}

#[test]
fn test_set_previous_none_keeps_singleton() {
    let mut ctx = Context::new();
    let name = ctx.get_identifier("x");
    let v = VarDecl::create(&mut ctx, ArenaKind::Compilation, name, Span::DUMMY, false);
    ctx.set_previous_decl(v, None);
    assert!(ctx.is_first_decl(v));
    assert_eq!(ctx.redecls(v).collect::<Vec<_>>(), vec![v]);
}

#[test]
#[should_panic(expected = "already belongs to a redeclaration chain")]
fn test_relinking_chain_member_panics() {
    let mut ctx = Context::new();
    let [_, d2, _] = three_member_chain(&mut ctx);
    let other = fun(&mut ctx, "g");
    ctx.set_previous_decl(d2, Some(other));
}

#[test]
#[should_panic(expected = "already belongs to a redeclaration chain")]
fn test_relinking_canonical_of_chain_panics() {
    let mut ctx = Context::new();
    let [d1, _, _] = three_member_chain(&mut ctx);
    let other = fun(&mut ctx, "g");
    ctx.set_previous_decl(d1, Some(other));
}

#[test]
#[should_panic(expected = "into its own redeclaration chain")]
fn test_self_link_panics() {
    let mut ctx = Context::new();
    let d = fun(&mut ctx, "f");
    ctx.set_previous_decl(d, Some(d));
}

#[test]
#[should_panic(expected = "used with context")]
fn test_cross_context_link_panics() {
    let mut a = Context::new();
    let mut b = Context::new();
    let da = fun(&mut a, "f");
    let db = fun(&mut b, "f");
    a.set_previous_decl(da, Some(db));
}

#[test]
fn test_incomplete_protocol() {
    let mut ctx = Context::new();
    let [d1, d2, d3] = three_member_chain(&mut ctx);
    assert!(!ctx.is_redecl_chain_incomplete(d2));

    ctx.mark_incomplete(d2);
    assert!(ctx.is_redecl_chain_incomplete(d1));
    // The stale value stays readable.
    assert_eq!(ctx.most_recent_decl(d2), d3);

    // A loader found a newer member and reports it.
    let d4 = fun(&mut ctx, "f");
    ctx.set_previous_decl(d4, Some(d3));
    assert!(ctx.is_redecl_chain_incomplete(d1));
    ctx.set_latest_resolved(d1, d4);
    assert!(!ctx.is_redecl_chain_incomplete(d1));
    assert_eq!(ctx.most_recent_decl(d3), d4);
}

#[test]
fn test_appending_keeps_chain_incomplete() {
    let mut ctx = Context::new();
    let d1 = fun(&mut ctx, "f");
    let d2 = fun(&mut ctx, "f");
    ctx.mark_incomplete(d1);
    ctx.set_previous_decl(d2, Some(d1));
    assert!(ctx.is_redecl_chain_incomplete(d1));
    assert_eq!(ctx.most_recent_decl(d1), d2);

    ctx.set_latest(d1, d2);
    assert!(ctx.is_redecl_chain_incomplete(d2));
}

#[test]
fn test_resolve_without_pending_flag() {
    let mut ctx = Context::new();
    let d = fun(&mut ctx, "f");
    ctx.set_latest_resolved(d, d);
    assert!(!ctx.is_redecl_chain_incomplete(d));
    assert_eq!(ctx.most_recent_decl(d), d);
}

#[test]
fn test_mark_incomplete_on_fresh_chain() {
    let mut ctx = Context::new();
    let d = fun(&mut ctx, "f");
    ctx.mark_incomplete(d);
    assert!(ctx.is_redecl_chain_incomplete(d));
    assert_eq!(ctx.most_recent_decl(d), d);
}

#[test]
#[should_panic(expected = "not a canonical declaration")]
fn test_set_latest_requires_canonical() {
    let mut ctx = Context::new();
    let [_, d2, d3] = three_member_chain(&mut ctx);
    ctx.set_latest(d2, d3);
}

#[test]
#[should_panic(expected = "passed the canonical declaration twice")]
fn test_malformed_chain_panics() {
    let mut ctx = Context::new();
    let [d1, _, _] = three_member_chain(&mut ctx);
    let stray = fun(&mut ctx, "g");
    // d1's latest now names a canonical member of another chain.
    ctx.set_latest(d1, stray);
    ctx.set_latest(stray, d1);
    let _ = ctx.redecls(stray).count();
}

#[test]
fn test_mergeable_is_its_own_first() {
    let mut ctx = Context::new();
    let name = ctx.get_identifier("std");
    let m = ModuleDecl::create(&mut ctx, ArenaKind::Compilation, name, Span::DUMMY, false);
    assert_eq!(ModuleDecl::first_decl(m), m);
    assert!(ModuleDecl::is_first_decl(m));
}
