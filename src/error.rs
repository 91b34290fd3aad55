//! Error types for grammar ingestion and parser construction.

use thiserror::Error;

/// Errors that abort grammar ingestion or LL(1) table construction.
///
/// Parse rejections are not errors; the predictive driver reports those as a
/// [`crate::ll1::Verdict`].
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("invalid symbol name {0:?}: names must not contain whitespace, `]` or `_`")]
    InvalidSymbolName(String),

    #[error("{0:?} is reserved and must not be declared")]
    ReservedSymbol(String),

    #[error("symbol {0:?} is declared as both a terminal and a non-terminal")]
    SymbolClassMismatch(String),

    #[error("unknown symbol {0:?}")]
    UnknownSymbol(String),

    #[error("left-hand side {0:?} is not a non-terminal")]
    TerminalLhs(String),

    #[error("malformed production rule {0:?}: expected `LHS -> [ s1 s2 ... sk ]`")]
    MalformedRule(String),

    #[error("non-terminal {0:?} has no production rules")]
    MissingProductions(String),

    #[error("start symbol {0:?} is not a declared non-terminal")]
    InvalidStartSymbol(String),

    #[error(
        "the grammar is not LL(1): conflict at M[{nonterminal}, {terminal}]:\n  {existing}\n  {candidate}"
    )]
    NotLl1 {
        nonterminal: String,
        terminal: String,
        existing: String,
        candidate: String,
    },

    #[error("invalid input: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
