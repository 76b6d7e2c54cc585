// FIRST_k / FOLLOW_k computation via monotone fixpoint over truncated
// terminal-string concatenation

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::error::GrammarError;
use crate::grammars::{Grammar, Symbol};

// ============================================================================
// Terminal strings
// ============================================================================

/// A sequence of at most k terminals, optionally terminated by the
/// end-of-input marker `$`. The empty string is ε; the end marker counts
/// toward the length. FIRST_k strings never contain the marker, FOLLOW_k
/// strings and parser lookaheads may end with it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TerminalString {
    syms: Vec<u32>,
    end: bool,
}

impl TerminalString {
    /// The empty string ε
    pub fn epsilon() -> Self {
        TerminalString::default()
    }

    /// A single terminal
    pub fn terminal(t: u32) -> Self {
        TerminalString {
            syms: vec![t],
            end: false,
        }
    }

    /// The bare end-of-input marker `$`
    pub fn end_marker() -> Self {
        TerminalString {
            syms: Vec::new(),
            end: true,
        }
    }

    /// Terminals from `input`, truncated to k, followed by the end marker if
    /// the whole remainder fit. This is exactly the parser's lookahead shape.
    pub fn lookahead(input: &[u32], k: usize) -> Self {
        if input.len() >= k {
            TerminalString {
                syms: input[..k].to_vec(),
                end: false,
            }
        } else {
            TerminalString {
                syms: input.to_vec(),
                end: true,
            }
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.syms.is_empty() && !self.end
    }

    /// Length counting the end marker as one position
    pub fn len(&self) -> usize {
        self.syms.len() + usize::from(self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn terminals(&self) -> &[u32] {
        &self.syms
    }

    pub fn ends_input(&self) -> bool {
        self.end
    }

    /// Concatenation truncated to k positions. Nothing follows the end
    /// marker; the marker itself is dropped when truncation cuts it off.
    pub fn concat(&self, other: &TerminalString, k: usize) -> TerminalString {
        if self.end {
            return self.clone();
        }
        let mut syms = self.syms.clone();
        syms.extend_from_slice(&other.syms);
        if syms.len() >= k {
            syms.truncate(k);
            TerminalString { syms, end: false }
        } else {
            TerminalString {
                syms,
                end: other.end,
            }
        }
    }

    /// The prefix holding the first `len` positions
    pub fn prefix(&self, len: usize) -> TerminalString {
        if len >= self.len() {
            self.clone()
        } else {
            TerminalString {
                syms: self.syms[..len].to_vec(),
                end: false,
            }
        }
    }

    /// Human-readable form using the grammar's terminal names
    pub fn render(&self, grammar: &Grammar) -> String {
        if self.is_epsilon() {
            return "ε".to_string();
        }
        let mut out = String::new();
        for &t in &self.syms {
            out.push_str(grammar.terminal_str(t).unwrap_or("?"));
        }
        if self.end {
            out.push('$');
        }
        out
    }
}

/// Elementwise truncated concatenation of two sets: { trunc_k(a · b) }.
/// ε is the empty string, so ε · b = b and a · ε = a fall out of `concat`.
/// An empty operand yields the empty set.
pub fn concat_sets(
    a: &BTreeSet<TerminalString>,
    b: &BTreeSet<TerminalString>,
    k: usize,
) -> BTreeSet<TerminalString> {
    let mut result = BTreeSet::new();
    for x in a {
        for y in b {
            result.insert(x.concat(y, k));
        }
    }
    result
}

/// FIRST_k of a symbol sequence against the given per-nonterminal sets.
/// Folding from {ε} keeps ε in the result only while every prefix symbol can
/// derive empty; a still-empty nonterminal set collapses the whole result,
/// so no undershort strings appear mid-fixpoint.
fn sequence_first(
    sets: &FxHashMap<u32, BTreeSet<TerminalString>>,
    sequence: &[Symbol],
    k: usize,
) -> BTreeSet<TerminalString> {
    let mut result = BTreeSet::new();
    result.insert(TerminalString::epsilon());

    for sym in sequence {
        let sym_first = match sym {
            Symbol::Terminal(t) => {
                let mut s = BTreeSet::new();
                s.insert(TerminalString::terminal(*t));
                s
            }
            Symbol::Epsilon => {
                let mut s = BTreeSet::new();
                s.insert(TerminalString::epsilon());
                s
            }
            Symbol::NonTerminal(id) => sets.get(id).cloned().unwrap_or_default(),
        };
        result = concat_sets(&result, &sym_first, k);
    }
    result
}

// ============================================================================
// FIRST_k
// ============================================================================

/// FIRST_k sets for every nonterminal of one (grammar, k) pair.
/// Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    k: usize,
    sets: FxHashMap<u32, BTreeSet<TerminalString>>,
}

impl FirstSets {
    pub fn k(&self) -> usize {
        self.k
    }

    /// FIRST_k of a single symbol: {t} for a terminal, {ε} for ε, the
    /// computed set for a nonterminal.
    pub fn of_symbol(&self, sym: Symbol) -> BTreeSet<TerminalString> {
        let mut single = BTreeSet::new();
        match sym {
            Symbol::Terminal(t) => {
                single.insert(TerminalString::terminal(t));
            }
            Symbol::Epsilon => {
                single.insert(TerminalString::epsilon());
            }
            Symbol::NonTerminal(id) => {
                return self.sets.get(&id).cloned().unwrap_or_default();
            }
        }
        single
    }

    pub fn of_nonterminal(&self, id: u32) -> Option<&BTreeSet<TerminalString>> {
        self.sets.get(&id)
    }

    /// FIRST_k of an arbitrary symbol sequence. Contains ε only if the whole
    /// sequence can derive empty.
    pub fn of_sequence(&self, sequence: &[Symbol]) -> BTreeSet<TerminalString> {
        sequence_first(&self.sets, sequence, self.k)
    }
}

/// Compute FIRST_k for every nonterminal by fixpoint: sets only grow, and the
/// universe of ≤k-truncated terminal strings is finite, so the loop
/// terminates.
pub fn compute_first_k(grammar: &Grammar, k: usize) -> Result<FirstSets, GrammarError> {
    grammar.validate()?;

    let mut sets: FxHashMap<u32, BTreeSet<TerminalString>> = FxHashMap::default();
    for &nt in grammar.rules.keys() {
        sets.insert(nt, BTreeSet::new());
    }

    let order = grammar.sorted_nonterminals();
    let mut changed = true;
    while changed {
        changed = false;
        for &nt in &order {
            for production in &grammar.rules[&nt] {
                let prod_first = sequence_first(&sets, production, k);
                let target = sets.get_mut(&nt).unwrap();
                for s in prod_first {
                    if target.insert(s) {
                        changed = true;
                    }
                }
            }
        }
    }

    Ok(FirstSets { k, sets })
}

// ============================================================================
// FOLLOW_k
// ============================================================================

/// FOLLOW_k sets for every nonterminal of one (grammar, k) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    k: usize,
    sets: FxHashMap<u32, BTreeSet<TerminalString>>,
}

impl FollowSets {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn of_nonterminal(&self, id: u32) -> Option<&BTreeSet<TerminalString>> {
        self.sets.get(&id)
    }
}

/// Compute FOLLOW_k for every nonterminal. The start symbol is seeded with
/// the end marker; then for every occurrence A -> α B β, FOLLOW(B) absorbs
/// FIRST_k(β) \ {ε}, plus FOLLOW(A) whenever β can derive empty.
/// Self-referential occurrences (A on both sides) are applied like any other;
/// the sets are bounded and monotone, so the fixpoint converges.
pub fn compute_follow_k(grammar: &Grammar, k: usize, first: &FirstSets) -> FollowSets {
    let mut sets: FxHashMap<u32, BTreeSet<TerminalString>> = FxHashMap::default();
    for &nt in grammar.rules.keys() {
        sets.insert(nt, BTreeSet::new());
    }
    sets.entry(grammar.start)
        .or_default()
        .insert(TerminalString::end_marker());

    let order = grammar.sorted_nonterminals();
    let mut changed = true;
    while changed {
        changed = false;
        for &nt in &order {
            for production in &grammar.rules[&nt] {
                for (i, sym) in production.iter().enumerate() {
                    let Symbol::NonTerminal(b) = *sym else {
                        continue;
                    };
                    let beta = &production[i + 1..];
                    let first_beta = first.of_sequence(beta);
                    let has_epsilon = first_beta.contains(&TerminalString::epsilon());

                    // FOLLOW(nt) cloned up front: nt and b may be the same set
                    let inherited = if has_epsilon {
                        sets.get(&nt).cloned().unwrap_or_default()
                    } else {
                        BTreeSet::new()
                    };

                    let target = sets.entry(b).or_default();
                    for s in first_beta {
                        if !s.is_epsilon() && target.insert(s) {
                            changed = true;
                        }
                    }
                    for s in inherited {
                        if target.insert(s) {
                            changed = true;
                        }
                    }
                }
            }
        }
    }

    FollowSets { k, sets }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "sets_tests.rs"]
mod tests;
