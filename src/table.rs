// LL(k) parsing table construction with conflict detection

use rustc_hash::FxHashMap;

use crate::grammars::Grammar;
use crate::sets::{FirstSets, FollowSets, TerminalString};

/// A table cell claimed by two different productions of the same
/// nonterminal: the grammar is not LL(k). Production indices refer to the
/// nonterminal's ordered production list, so reports are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub nonterminal: u32,
    pub lookahead: TerminalString,
    pub existing: usize,
    pub replacement: usize,
}

impl Conflict {
    pub fn render(&self, grammar: &Grammar) -> String {
        let nt = grammar.non_terminal_str(self.nonterminal).unwrap_or("?");
        let prods = &grammar.rules[&self.nonterminal];
        format!(
            "conflict at ({}, '{}'): {} -> {} vs {} -> {}",
            nt,
            self.lookahead.render(grammar),
            nt,
            grammar.production_str(&prods[self.existing]),
            nt,
            grammar.production_str(&prods[self.replacement]),
        )
    }
}

/// Partial mapping (nonterminal, lookahead string) -> production index.
/// Built once per (grammar, k) pair, immutable afterwards. A table built
/// from a conflicting grammar keeps the last write in each disputed cell
/// for diagnostics, but must not be used for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    k: usize,
    entries: FxHashMap<(u32, TerminalString), usize>,
}

impl ParseTable {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-key lookup
    pub fn get(&self, nonterminal: u32, lookahead: &TerminalString) -> Option<usize> {
        self.entries.get(&(nonterminal, lookahead.clone())).copied()
    }

    /// Lookahead matching discipline: try the full current lookahead (the
    /// ≤k-truncated remaining input including the end marker), then fall back
    /// to successively shorter prefixes down to length 1. The builder stores
    /// the shortest strings that distinguish productions, so the first hit is
    /// the chosen production.
    pub fn predict(&self, nonterminal: u32, lookahead: &TerminalString) -> Option<usize> {
        for len in (1..=lookahead.len()).rev() {
            if let Some(&idx) = self.entries.get(&(nonterminal, lookahead.prefix(len))) {
                return Some(idx);
            }
        }
        None
    }

    /// All cells sorted by (nonterminal, lookahead), for rendering
    pub fn cells_sorted(&self) -> Vec<(u32, &TerminalString, usize)> {
        let mut cells: Vec<_> = self
            .entries
            .iter()
            .map(|((nt, la), &idx)| (*nt, la, idx))
            .collect();
        cells.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        cells
    }
}

/// Build the predictive parsing table from the computed sets.
///
/// For every production P of A: each non-ε string in FIRST_k(P) claims the
/// cell (A, string); if ε ∈ FIRST_k(P) (which covers the ε-production
/// itself), every string in FOLLOW_k(A) claims its cell. A second different
/// claim on a cell is recorded as a conflict and overwrites the cell, so the
/// returned table reflects the last write; callers must treat a nonempty
/// conflict list as "not LL(k), do not parse".
pub fn build_table(
    grammar: &Grammar,
    first: &FirstSets,
    follow: &FollowSets,
) -> (ParseTable, Vec<Conflict>) {
    debug_assert_eq!(first.k(), follow.k());
    let k = first.k();

    let mut entries: FxHashMap<(u32, TerminalString), usize> = FxHashMap::default();
    let mut conflicts = Vec::new();

    let mut claim = |nt: u32, lookahead: TerminalString, idx: usize| {
        if let Some(existing) = entries.insert((nt, lookahead.clone()), idx) {
            if existing != idx {
                conflicts.push(Conflict {
                    nonterminal: nt,
                    lookahead,
                    existing,
                    replacement: idx,
                });
            }
        }
    };

    for nt in grammar.sorted_nonterminals() {
        for (idx, production) in grammar.rules[&nt].iter().enumerate() {
            let prod_first = first.of_sequence(production);
            let derives_empty = prod_first.contains(&TerminalString::epsilon());

            for s in prod_first {
                if !s.is_epsilon() {
                    claim(nt, s, idx);
                }
            }
            if derives_empty {
                if let Some(follow_set) = follow.of_nonterminal(nt) {
                    for f in follow_set {
                        claim(nt, f.clone(), idx);
                    }
                }
            }
        }
    }

    (ParseTable { k, entries }, conflicts)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
