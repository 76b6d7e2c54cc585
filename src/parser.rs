// Table-driven LL(k) predictive parser with simultaneous AST construction

use crate::error::{BuildError, SyntaxError};
use crate::grammars::{Grammar, Symbol};
use crate::parse_tree::{ParseSymbol, ParseTree};
use crate::sets::{compute_first_k, compute_follow_k, TerminalString};
use crate::table::{build_table, ParseTable};

/// A conflict-checked LL(k) parser for one (grammar, k) pair.
///
/// Construction runs the full pipeline (FIRST_k, FOLLOW_k, table) and fails
/// if the grammar is malformed or not LL(k). The resulting parser is
/// read-only; each call to [`recognize`](Self::recognize) or
/// [`parse`](Self::parse) owns its own stack and tree.
pub struct LLkParser {
    grammar: Grammar,
    k: usize,
    table: ParseTable,
}

/// AST node under construction, children addressed by arena index
struct Node {
    name: ParseSymbol,
    children: Vec<usize>,
    leaf: Option<String>,
}

impl LLkParser {
    pub fn new(grammar: &Grammar, k: usize) -> Result<Self, BuildError> {
        if k == 0 {
            return Err(BuildError::InvalidLookahead(k));
        }
        let first = compute_first_k(grammar, k)?;
        let follow = compute_follow_k(grammar, k, &first);
        let (table, conflicts) = build_table(grammar, &first, &follow);
        if !conflicts.is_empty() {
            return Err(BuildError::Conflicts(conflicts));
        }
        Ok(LLkParser {
            grammar: grammar.clone(),
            k,
            table,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Current lookahead: up to k remaining terminals, with the end marker
    /// appended when the remainder is shorter than k.
    fn lookahead(&self, input: &[u32], cursor: usize) -> TerminalString {
        TerminalString::lookahead(&input[cursor..], self.k)
    }

    fn no_rule(&self, nt: u32, lookahead: &TerminalString) -> SyntaxError {
        SyntaxError::NoRule {
            nonterminal: self.grammar.non_terminal_str(nt).unwrap_or("?").to_string(),
            lookahead: lookahead.render(&self.grammar),
        }
    }

    fn mismatch(&self, expected: u32, found: Option<u32>) -> SyntaxError {
        SyntaxError::Mismatch {
            expected: self
                .grammar
                .terminal_str(expected)
                .unwrap_or("?")
                .to_string(),
            found: found
                .and_then(|t| self.grammar.terminal_str(t))
                .unwrap_or("$")
                .to_string(),
        }
    }

    /// Run the stack machine over the input without building a tree.
    /// Accepts exactly when the stack empties with the input fully consumed.
    pub fn recognize(&self, input: &[u32]) -> Result<(), SyntaxError> {
        let mut stack = vec![Symbol::NonTerminal(self.grammar.start)];
        let mut cursor = 0;

        while let Some(top) = stack.pop() {
            match top {
                Symbol::Terminal(t) => match input.get(cursor) {
                    Some(&token) if token == t => cursor += 1,
                    other => return Err(self.mismatch(t, other.copied())),
                },
                Symbol::NonTerminal(nt) => {
                    let la = self.lookahead(input, cursor);
                    let idx = self
                        .table
                        .predict(nt, &la)
                        .ok_or_else(|| self.no_rule(nt, &la))?;
                    // Push the chosen production in reverse; ε expands to
                    // nothing on the stack
                    for sym in self.grammar.rules[&nt][idx].iter().rev() {
                        if *sym != Symbol::Epsilon {
                            stack.push(*sym);
                        }
                    }
                }
                // ε on the stack pops without consuming input
                Symbol::Epsilon => {}
            }
        }

        if cursor == input.len() {
            Ok(())
        } else {
            Err(SyntaxError::NotFullyParsed)
        }
    }

    /// Parse the input, building the AST as the stack machine runs.
    ///
    /// The stack holds (symbol, arena slot) pairs. Expanding a nonterminal
    /// creates all child nodes in production order, then pushes the non-ε
    /// symbols in reverse so they are matched left to right; a matched
    /// terminal records its text as the node's leaf value.
    pub fn parse(&self, input: &[u32]) -> Result<ParseTree, SyntaxError> {
        let root_name = self.grammar.start_str().unwrap_or("?").to_string();
        let mut nodes = vec![Node {
            name: ParseSymbol::NonTerminal(root_name),
            children: Vec::new(),
            leaf: None,
        }];
        let mut stack: Vec<(Symbol, usize)> = vec![(Symbol::NonTerminal(self.grammar.start), 0)];
        let mut cursor = 0;

        while let Some((top, slot)) = stack.pop() {
            match top {
                Symbol::Terminal(t) => match input.get(cursor) {
                    Some(&token) if token == t => {
                        let text = self.grammar.terminal_str(t).unwrap_or("?").to_string();
                        nodes[slot].leaf = Some(text);
                        cursor += 1;
                    }
                    other => return Err(self.mismatch(t, other.copied())),
                },
                Symbol::NonTerminal(nt) => {
                    let la = self.lookahead(input, cursor);
                    let idx = self
                        .table
                        .predict(nt, &la)
                        .ok_or_else(|| self.no_rule(nt, &la))?;
                    let production = self.grammar.rules[&nt][idx].clone();

                    let mut created: Vec<(Symbol, usize)> = Vec::with_capacity(production.len());
                    for sym in &production {
                        let name = match sym {
                            Symbol::Terminal(id) => ParseSymbol::Terminal(
                                self.grammar.terminal_str(*id).unwrap_or("?").to_string(),
                            ),
                            Symbol::NonTerminal(id) => ParseSymbol::NonTerminal(
                                self.grammar.non_terminal_str(*id).unwrap_or("?").to_string(),
                            ),
                            Symbol::Epsilon => ParseSymbol::Epsilon,
                        };
                        let id = nodes.len();
                        nodes.push(Node {
                            name,
                            children: Vec::new(),
                            leaf: None,
                        });
                        created.push((*sym, id));
                    }
                    nodes[slot].children = created.iter().map(|&(_, id)| id).collect();
                    // ε children stay in the tree but never reach the stack
                    for &(sym, id) in created.iter().rev() {
                        if sym != Symbol::Epsilon {
                            stack.push((sym, id));
                        }
                    }
                }
                Symbol::Epsilon => {}
            }
        }

        if cursor == input.len() {
            Ok(materialize(&nodes, 0))
        } else {
            Err(SyntaxError::NotFullyParsed)
        }
    }
}

/// Convert the arena into the owned tree handed to the caller
fn materialize(nodes: &[Node], id: usize) -> ParseTree {
    let node = &nodes[id];
    ParseTree {
        name: node.name.clone(),
        children: node
            .children
            .iter()
            .map(|&child| materialize(nodes, child))
            .collect(),
        leaf: node.leaf.clone(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
