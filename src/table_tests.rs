//! Tests for parsing-table construction and conflict detection

use super::*;
use crate::grammars::load_grammar_from_str;
use crate::sets::{compute_first_k, compute_follow_k};

fn ab_grammar() -> Grammar {
    let json = r#"{
        "name": "ab",
        "start": "<S>",
        "rules": {
            "<S>": [["<A>", "<B>"]],
            "<A>": [["a"], []],
            "<B>": [["b"]]
        }
    }"#;
    load_grammar_from_str(json).expect("Failed to load grammar").0
}

fn ac_grammar() -> Grammar {
    let json = r#"{
        "name": "ac",
        "start": "<S>",
        "rules": {
            "<S>": [["<A>", "<C>"]],
            "<A>": [["a", "<A>"], ["b"]],
            "<C>": [["c", "<C>"], []]
        }
    }"#;
    load_grammar_from_str(json).expect("Failed to load grammar").0
}

fn build(grammar: &Grammar, k: usize) -> (ParseTable, Vec<Conflict>) {
    let first = compute_first_k(grammar, k).unwrap();
    let follow = compute_follow_k(grammar, k, &first);
    build_table(grammar, &first, &follow)
}

/// Build a TerminalString from characters; '$' is the end marker
fn ts(grammar: &Grammar, text: &str) -> TerminalString {
    let mut result = TerminalString::epsilon();
    for c in text.chars() {
        let part = if c == '$' {
            TerminalString::end_marker()
        } else {
            TerminalString::terminal(grammar.terminals.get_id(&c.to_string()).unwrap())
        };
        result = result.concat(&part, usize::MAX);
    }
    result
}

fn nt(grammar: &Grammar, name: &str) -> u32 {
    grammar.non_terminals.get_id(name).unwrap()
}

#[test]
fn test_ll1_table_ab_grammar() {
    let g = ab_grammar();
    let (table, conflicts) = build(&g, 1);

    assert!(conflicts.is_empty());
    assert_eq!(table.k(), 1);
    assert_eq!(table.len(), 5);

    let (s, a, b) = (nt(&g, "<S>"), nt(&g, "<A>"), nt(&g, "<B>"));

    // FIRST_1(A B) = { a, b }, both select the only S production
    assert_eq!(table.get(s, &ts(&g, "a")), Some(0));
    assert_eq!(table.get(s, &ts(&g, "b")), Some(0));
    // A -> 'a' on a, A -> ε on FOLLOW_1(A) = { b }
    assert_eq!(table.get(a, &ts(&g, "a")), Some(0));
    assert_eq!(table.get(a, &ts(&g, "b")), Some(1));
    assert_eq!(table.get(b, &ts(&g, "b")), Some(0));

    assert_eq!(table.get(b, &ts(&g, "a")), None);
    assert_eq!(table.get(a, &ts(&g, "$")), None);
}

#[test]
fn test_ll2_table_ac_grammar() {
    let g = ac_grammar();
    let (table, conflicts) = build(&g, 2);

    assert!(conflicts.is_empty());
    let (s, a, c) = (nt(&g, "<S>"), nt(&g, "<A>"), nt(&g, "<C>"));

    assert_eq!(table.get(s, &ts(&g, "aa")), Some(0));
    assert_eq!(table.get(s, &ts(&g, "ab")), Some(0));
    assert_eq!(table.get(s, &ts(&g, "b")), Some(0));
    assert_eq!(table.get(s, &ts(&g, "bc")), Some(0));

    assert_eq!(table.get(a, &ts(&g, "aa")), Some(0));
    assert_eq!(table.get(a, &ts(&g, "ab")), Some(0));
    assert_eq!(table.get(a, &ts(&g, "b")), Some(1));

    assert_eq!(table.get(c, &ts(&g, "c")), Some(0));
    assert_eq!(table.get(c, &ts(&g, "cc")), Some(0));
    // ε-production selected on FOLLOW_2(C) = { $ }
    assert_eq!(table.get(c, &ts(&g, "$")), Some(1));

    assert_eq!(table.len(), 10);
}

#[test]
fn test_predict_falls_back_to_shorter_prefixes() {
    let g = ac_grammar();
    let (table, _) = build(&g, 2);
    let (a, c) = (nt(&g, "<A>"), nt(&g, "<C>"));

    // Near end of input the lookahead is 'b' plus the end marker; no cell
    // holds "b$", so the length-1 prefix decides
    assert_eq!(table.predict(a, &ts(&g, "b$")), Some(1));
    assert_eq!(table.predict(c, &ts(&g, "c$")), Some(0));
    // Full-length match wins when present
    assert_eq!(table.predict(a, &ts(&g, "ab")), Some(0));
    // No prefix matches at all
    assert_eq!(table.predict(c, &ts(&g, "b$")), None);
}

#[test]
fn test_conflict_detection() {
    // S -> a | a : both productions claim (S, a)
    let json = r#"{
        "name": "twice",
        "start": "<S>",
        "rules": { "<S>": [["a"], ["a"]] }
    }"#;
    let (g, _) = load_grammar_from_str(json).unwrap();
    let (table, conflicts) = build(&g, 1);

    assert_eq!(
        conflicts,
        vec![Conflict {
            nonterminal: nt(&g, "<S>"),
            lookahead: ts(&g, "a"),
            existing: 0,
            replacement: 1,
        }]
    );
    // The disputed cell keeps the last write, for diagnostics only
    assert_eq!(table.get(nt(&g, "<S>"), &ts(&g, "a")), Some(1));
}

#[test]
fn test_first_first_conflict_not_ll1() {
    // Classic non-LL(1) but LL(2) grammar: S -> a b | a c
    let json = r#"{
        "name": "needs_two",
        "start": "<S>",
        "rules": { "<S>": [["a", "b"], ["a", "c"]] }
    }"#;
    let (g, _) = load_grammar_from_str(json).unwrap();

    let (_, conflicts) = build(&g, 1);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].lookahead, ts(&g, "a"));

    // One more symbol of lookahead resolves it
    let (table, conflicts) = build(&g, 2);
    assert!(conflicts.is_empty());
    assert_eq!(table.get(nt(&g, "<S>"), &ts(&g, "ab")), Some(0));
    assert_eq!(table.get(nt(&g, "<S>"), &ts(&g, "ac")), Some(1));
}

#[test]
fn test_table_determinism() {
    let g = ac_grammar();
    let (table_a, conflicts_a) = build(&g, 2);
    let (table_b, conflicts_b) = build(&g, 2);
    assert_eq!(table_a, table_b);
    assert_eq!(conflicts_a, conflicts_b);
}

#[test]
fn test_conflict_render() {
    let json = r#"{
        "name": "twice",
        "start": "<S>",
        "rules": { "<S>": [["a"], ["a"]] }
    }"#;
    let (g, _) = load_grammar_from_str(json).unwrap();
    let (_, conflicts) = build(&g, 1);

    let rendered = conflicts[0].render(&g);
    assert!(rendered.contains("<S>"));
    assert!(rendered.contains("'a'"));
}
