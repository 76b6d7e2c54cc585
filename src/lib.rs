//! Generalized LL(k) predictive parsing.
//!
//! The pipeline is a chain of pure stages:
//! grammar -> FIRST_k/FOLLOW_k sets -> parsing table -> table-driven parser.
//! Each stage's output is an immutable value handed to the next, so the set
//! engine and the table builder can be exercised independently.

pub mod error;
pub mod grammars;
pub mod parse_tree;
pub mod parser;
pub mod sets;
pub mod table;

pub use error::{BuildError, GrammarError, LoadError, SyntaxError};
pub use grammars::{Grammar, Production, Symbol};
pub use parse_tree::{ParseSymbol, ParseTree};
pub use parser::LLkParser;
pub use sets::{compute_first_k, compute_follow_k, FirstSets, FollowSets, TerminalString};
pub use table::{build_table, Conflict, ParseTable};
