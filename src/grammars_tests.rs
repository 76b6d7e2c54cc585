//! Tests for the grammar model - JSON loading and validation

use super::*;

const AB_JSON: &str = r#"{
    "name": "ab",
    "start": "<S>",
    "rules": {
        "<S>": [["<A>", "<B>"]],
        "<A>": [["a"], []],
        "<B>": [["b"]]
    },
    "tests": ["ab", "b"]
}"#;

fn ab_grammar() -> Grammar {
    let (grammar, _) = load_grammar_from_str(AB_JSON).expect("Failed to load grammar");
    grammar
}

#[test]
fn test_load_ab_grammar() {
    let grammar = ab_grammar();

    assert_eq!(grammar.name, "ab");
    assert_eq!(grammar.start_str(), Some("<S>"));
    assert_eq!(grammar.num_non_terminals(), 3);
    assert_eq!(grammar.num_terminals(), 2);
    assert_eq!(grammar.production_count(), 4);
    assert_eq!(grammar.tests.len(), 2);

    // Start symbol always gets ID 0
    assert_eq!(grammar.start, 0);
}

#[test]
fn test_epsilon_normalization() {
    let grammar = ab_grammar();

    // The empty production array becomes the ε-production
    let a_id = grammar.non_terminals.get_id("<A>").unwrap();
    let productions = grammar.get_productions(a_id).unwrap();
    assert_eq!(productions.len(), 2);
    assert_eq!(productions[1], vec![Symbol::Epsilon]);

    let a_term = grammar.terminals.get_id("a").unwrap();
    assert_eq!(productions[0], vec![Symbol::Terminal(a_term)]);
}

#[test]
fn test_epsilon_spelled_out() {
    let json = r#"{
        "name": "eps",
        "start": "<S>",
        "rules": {
            "<S>": [["ε"]]
        }
    }"#;
    let (grammar, _) = load_grammar_from_str(json).expect("Failed to load grammar");
    let productions = grammar.get_productions(grammar.start).unwrap();
    assert_eq!(productions[0], vec![Symbol::Epsilon]);
}

#[test]
fn test_default_k() {
    let (_, k) = load_grammar_from_str(AB_JSON).expect("Failed to load grammar");
    assert_eq!(k, 1);

    let json = r#"{
        "name": "deep",
        "start": "<S>",
        "k": 3,
        "rules": { "<S>": [["a"]] }
    }"#;
    let (_, k) = load_grammar_from_str(json).expect("Failed to load grammar");
    assert_eq!(k, 3);
}

#[test]
fn test_tokenize() {
    let grammar = ab_grammar();
    let a_id = grammar.terminals.get_id("a").unwrap();
    let b_id = grammar.terminals.get_id("b").unwrap();

    assert_eq!(grammar.tokenize("ab"), Some(vec![a_id, b_id]));
    assert_eq!(grammar.tokenize(""), Some(vec![]));
    assert_eq!(grammar.tokenize("ax"), None);
}

#[test]
fn test_load_invalid_json() {
    let err = load_grammar_from_str("{ not json").unwrap_err();
    assert!(matches!(err, LoadError::InvalidJson(_)));
}

#[test]
fn test_load_missing_file() {
    let err = load_grammar_from_file("grammars/does_not_exist.json").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn test_load_rejects_unknown_terminal_in_test_input() {
    // 'x' never appears in any production, so "axb" cannot be tokenized
    let json = r#"{
        "name": "ab",
        "start": "<S>",
        "rules": {
            "<S>": [["<A>", "<B>"]],
            "<A>": [["a"], []],
            "<B>": [["b"]]
        },
        "tests": ["ab", "axb"]
    }"#;
    let err = load_grammar_from_str(json).unwrap_err();
    match err {
        LoadError::UnknownTestSymbol { input, symbol } => {
            assert_eq!(input, "axb");
            assert_eq!(symbol, "x");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_validate_ok() {
    assert_eq!(ab_grammar().validate(), Ok(()));
}

#[test]
fn test_validate_undefined_symbols_reported_once_sorted() {
    // <C> and <B> are referenced (twice each) but own no rules
    let json = r#"{
        "name": "broken",
        "start": "<S>",
        "rules": {
            "<S>": [["<C>", "<B>"], ["<B>", "<C>"]]
        }
    }"#;
    let (grammar, _) = load_grammar_from_str(json).expect("Failed to load grammar");

    assert_eq!(
        grammar.validate(),
        Err(GrammarError::UndefinedSymbols(vec![
            "<B>".to_string(),
            "<C>".to_string()
        ]))
    );
}

#[test]
fn test_validate_empty_grammar() {
    let grammar = Grammar::new("empty");
    assert_eq!(grammar.validate(), Err(GrammarError::EmptyGrammar));
}

#[test]
fn test_validate_start_without_rules() {
    let mut grammar = Grammar::new("no_start");
    let s_id = grammar.non_terminals.get_or_insert("S");
    let a_id = grammar.non_terminals.get_or_insert("A");
    let x_id = grammar.terminals.get_or_insert("x");

    grammar.start = s_id;
    grammar.rules.insert(a_id, vec![vec![Symbol::Terminal(x_id)]]);

    assert_eq!(
        grammar.validate(),
        Err(GrammarError::StartWithoutRules("S".to_string()))
    );
}

#[test]
fn test_production_str() {
    let grammar = ab_grammar();
    let s_id = grammar.non_terminals.get_id("<S>").unwrap();
    let a_id = grammar.non_terminals.get_id("<A>").unwrap();

    assert_eq!(
        grammar.production_str(&grammar.rules[&s_id][0]),
        "<A> <B>"
    );
    assert_eq!(grammar.production_str(&grammar.rules[&a_id][1]), "ε");
}
