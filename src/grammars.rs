// Grammar model - loads grammars from JSON files into a numeric representation

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{GrammarError, LoadError};

// ============================================================================
// Symbol Table - maps between strings and numeric IDs
// ============================================================================

/// Bidirectional mapping between symbols (strings) and numeric IDs
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    str_to_id: FxHashMap<String, u32>,
    id_to_str: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Get or create an ID for a symbol string
    pub fn get_or_insert(&mut self, symbol: &str) -> u32 {
        if let Some(&id) = self.str_to_id.get(symbol) {
            id
        } else {
            let id = self.id_to_str.len() as u32;
            self.str_to_id.insert(symbol.to_string(), id);
            self.id_to_str.push(symbol.to_string());
            id
        }
    }

    pub fn get_id(&self, symbol: &str) -> Option<u32> {
        self.str_to_id.get(symbol).copied()
    }

    pub fn get_str(&self, id: u32) -> Option<&str> {
        self.id_to_str.get(id as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.id_to_str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_str.is_empty()
    }
}

// ============================================================================
// Grammar representation
// ============================================================================

/// A grammar symbol. Terminals and nonterminals live in disjoint ID spaces
/// and are distinguished by tag, never by naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Terminal(u32),
    NonTerminal(u32),
    /// The empty-derivation marker. Only appears as the sole symbol of an
    /// ε-production; the loader normalizes `[]` and `["ε"]` to this.
    Epsilon,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

/// One right-hand-side alternative for a nonterminal
pub type Production = Vec<Symbol>;

/// A context-free grammar: nonterminal -> ordered productions, with an
/// explicit start symbol. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: String,
    /// Start nonterminal ID. Always set explicitly, never inferred from
    /// insertion order.
    pub start: u32,
    pub rules: FxHashMap<u32, Vec<Production>>,
    /// Sample inputs from the grammar file, tokenized to terminal IDs
    pub tests: Vec<Vec<u32>>,
    pub terminals: SymbolTable,
    pub non_terminals: SymbolTable,
}

impl Grammar {
    pub fn new(name: &str) -> Self {
        Grammar {
            name: name.to_string(),
            start: 0,
            rules: FxHashMap::default(),
            tests: Vec::new(),
            terminals: SymbolTable::new(),
            non_terminals: SymbolTable::new(),
        }
    }

    pub fn terminal_str(&self, id: u32) -> Option<&str> {
        self.terminals.get_str(id)
    }

    pub fn non_terminal_str(&self, id: u32) -> Option<&str> {
        self.non_terminals.get_str(id)
    }

    pub fn symbol_to_str(&self, sym: &Symbol) -> Option<&str> {
        match sym {
            Symbol::Terminal(id) => self.terminals.get_str(*id),
            Symbol::NonTerminal(id) => self.non_terminals.get_str(*id),
            Symbol::Epsilon => Some("ε"),
        }
    }

    pub fn start_str(&self) -> Option<&str> {
        self.non_terminals.get_str(self.start)
    }

    /// Tokenize an input string to numeric terminal IDs, one per character.
    /// Returns None if any character is not a known terminal.
    pub fn tokenize(&self, input: &str) -> Option<Vec<u32>> {
        input
            .chars()
            .map(|c| self.terminals.get_id(&c.to_string()))
            .collect()
    }

    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }

    pub fn num_non_terminals(&self) -> usize {
        self.non_terminals.len()
    }

    pub fn production_count(&self) -> usize {
        self.rules.values().map(|v| v.len()).sum()
    }

    pub fn get_productions(&self, nt: u32) -> Option<&Vec<Production>> {
        self.rules.get(&nt)
    }

    /// Nonterminal IDs in ascending order, for deterministic iteration
    pub fn sorted_nonterminals(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.rules.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Check the grammar for structural problems, reported as a batch:
    /// all undefined nonterminals at once (each listed once, sorted), an
    /// empty rule set, or a start symbol without rules.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }
        if !self.rules.contains_key(&self.start) {
            let name = self.start_str().unwrap_or("?").to_string();
            return Err(GrammarError::StartWithoutRules(name));
        }

        let mut undefined = BTreeSet::new();
        for productions in self.rules.values() {
            for prod in productions {
                for sym in prod {
                    if let Symbol::NonTerminal(id) = sym {
                        if !self.rules.contains_key(id) {
                            undefined
                                .insert(self.non_terminal_str(*id).unwrap_or("?").to_string());
                        }
                    }
                }
            }
        }
        if !undefined.is_empty() {
            return Err(GrammarError::UndefinedSymbols(
                undefined.into_iter().collect(),
            ));
        }
        Ok(())
    }

    /// Render one production right-hand side, terminals quoted
    pub fn production_str(&self, prod: &Production) -> String {
        let rhs: Vec<String> = prod
            .iter()
            .map(|sym| match sym {
                Symbol::Terminal(id) => format!("'{}'", self.terminal_str(*id).unwrap_or("?")),
                Symbol::NonTerminal(id) => self.non_terminal_str(*id).unwrap_or("?").to_string(),
                Symbol::Epsilon => "ε".to_string(),
            })
            .collect();
        rhs.join(" ")
    }

    pub fn debug_print(&self) {
        println!("=== Grammar: {} ===", self.name);
        println!(
            "Start symbol: {} (id={})",
            self.start_str().unwrap_or("?"),
            self.start
        );

        for nt_id in self.sorted_nonterminals() {
            let nt_str = self.non_terminal_str(nt_id).unwrap_or("?");
            for prod in &self.rules[&nt_id] {
                println!("  {} -> {}", nt_str, self.production_str(prod));
            }
        }
        println!("=== End Grammar ===\n");
    }
}

// ============================================================================
// Grammar loading from JSON
// ============================================================================

/// String-based symbol, intermediate representation while loading
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StrSymbol {
    Terminal(String),
    NonTerminal(String),
    Epsilon,
}

/// JSON structure for grammar files
#[derive(Debug, Deserialize)]
struct GrammarJson {
    name: String,
    start: String,
    rules: FxHashMap<String, Vec<Vec<String>>>,
    #[serde(default)]
    tests: Vec<String>,
    /// Suggested lookahead depth for this grammar
    #[serde(default = "default_k")]
    k: usize,
}

fn default_k() -> usize {
    1
}

/// Load a grammar from a JSON file. Returns the grammar and its suggested
/// lookahead depth.
pub fn load_grammar_from_file<P: AsRef<Path>>(path: P) -> Result<(Grammar, usize), LoadError> {
    let content = fs::read_to_string(&path)?;
    load_grammar_from_str(&content)
}

/// Load a grammar from a JSON string.
///
/// Symbols wrapped in angle brackets (`<S>`) are nonterminals, everything
/// else is a terminal; an empty production array or the single symbol `ε`
/// denotes the ε-production. The start symbol is required.
pub fn load_grammar_from_str(json: &str) -> Result<(Grammar, usize), LoadError> {
    let parsed: GrammarJson = serde_json::from_str(json)?;

    let mut grammar = Grammar::new(&parsed.name);

    let mut str_rules: FxHashMap<String, Vec<Vec<StrSymbol>>> = FxHashMap::default();
    for (lhs, productions) in &parsed.rules {
        let productions = productions
            .iter()
            .map(|prod| parse_production(prod))
            .collect();
        str_rules.insert(lhs.clone(), productions);
    }

    // Register nonterminals first, sorted for deterministic IDs; the start
    // symbol gets ID 0.
    grammar.non_terminals.get_or_insert(&parsed.start);
    let mut nt_names: Vec<String> = str_rules.keys().cloned().collect();
    nt_names.sort();
    for lhs in &nt_names {
        grammar.non_terminals.get_or_insert(lhs);
    }

    // Register all symbols from productions, in sorted rule order
    for lhs in &nt_names {
        for prod in &str_rules[lhs] {
            for sym in prod {
                match sym {
                    StrSymbol::Terminal(s) => {
                        grammar.terminals.get_or_insert(s);
                    }
                    StrSymbol::NonTerminal(s) => {
                        grammar.non_terminals.get_or_insert(s);
                    }
                    StrSymbol::Epsilon => {}
                }
            }
        }
    }

    grammar.start = grammar
        .non_terminals
        .get_id(&parsed.start)
        .ok_or_else(|| LoadError::StartNotFound(parsed.start.clone()))?;

    // Convert rules to numeric form
    for (lhs, productions) in str_rules {
        let lhs_id = grammar.non_terminals.get_id(&lhs).unwrap();
        let num_productions: Vec<Production> = productions
            .into_iter()
            .map(|prod| {
                prod.into_iter()
                    .map(|sym| match sym {
                        StrSymbol::Terminal(s) => {
                            Symbol::Terminal(grammar.terminals.get_id(&s).unwrap())
                        }
                        StrSymbol::NonTerminal(s) => {
                            Symbol::NonTerminal(grammar.non_terminals.get_id(&s).unwrap())
                        }
                        StrSymbol::Epsilon => Symbol::Epsilon,
                    })
                    .collect()
            })
            .collect();
        grammar.rules.insert(lhs_id, num_productions);
    }

    // Tokenize embedded test inputs against the now-complete terminal set;
    // a stray character must not mint a terminal the rules never mention.
    for test in &parsed.tests {
        let mut tokens = Vec::with_capacity(test.chars().count());
        for c in test.chars() {
            match grammar.terminals.get_id(&c.to_string()) {
                Some(id) => tokens.push(id),
                None => {
                    return Err(LoadError::UnknownTestSymbol {
                        input: test.clone(),
                        symbol: c.to_string(),
                    })
                }
            }
        }
        grammar.tests.push(tokens);
    }

    Ok((grammar, parsed.k))
}

/// Parse a single production. An empty array or a lone `ε` becomes the
/// ε-production.
fn parse_production(symbols: &[String]) -> Vec<StrSymbol> {
    if symbols.is_empty() || (symbols.len() == 1 && symbols[0] == "ε") {
        return vec![StrSymbol::Epsilon];
    }
    symbols
        .iter()
        .map(|s| {
            if s.starts_with('<') && s.ends_with('>') {
                StrSymbol::NonTerminal(s.to_string())
            } else if s == "ε" {
                StrSymbol::Epsilon
            } else {
                StrSymbol::Terminal(s.to_string())
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "grammars_tests.rs"]
mod tests;
