//! Error taxonomy for the grammar pipeline.
//!
//! Grammar-level problems are reported as a batch before any parse is
//! attempted; parse-time errors end the parse attempt and are returned to the
//! caller, never thrown past it.

use thiserror::Error;

use crate::table::Conflict;

/// Failure to get a grammar out of a JSON file, before any structural
/// validation runs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read grammar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse grammar JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("start symbol '{0}' not found among the grammar's nonterminals")]
    StartNotFound(String),

    /// A sample input in the file's `tests` array uses a character that is
    /// not a terminal of the grammar.
    #[error("test input '{input}' contains unknown terminal '{symbol}'")]
    UnknownTestSymbol { input: String, symbol: String },
}

/// Malformed grammar input. Fatal to further processing of that grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Nonterminals referenced in some production but owning no rules.
    /// Each symbol is listed once, sorted by name.
    #[error("undefined nonterminals referenced in productions: {}", .0.join(", "))]
    UndefinedSymbols(Vec<String>),

    #[error("grammar has no rules")]
    EmptyGrammar,

    #[error("start symbol '{0}' has no rules")]
    StartWithoutRules(String),
}

/// Failure to construct a usable parser from a grammar and a lookahead depth.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("lookahead depth must be at least 1, got {0}")]
    InvalidLookahead(usize),

    /// The grammar is not LL(k): one or more table cells were claimed by two
    /// different productions. The full list is reported together.
    #[error("grammar is not LL(k): {} conflicting table cell(s)", .0.len())]
    Conflicts(Vec<Conflict>),
}

/// A parse-time failure. The parser stops at the first unrecoverable
/// mismatch; there is no recovery or resynchronization.
///
/// Symbol names are rendered at construction time so the error is
/// self-contained; `$` stands for the end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("syntax error: no rule for {nonterminal} with lookahead '{lookahead}'")]
    NoRule {
        nonterminal: String,
        lookahead: String,
    },

    #[error("syntax error: expected '{expected}', but found '{found}'")]
    Mismatch { expected: String, found: String },

    #[error("syntax error: input not fully parsed")]
    NotFullyParsed,
}
