//! Error types for every stage of a chain: lexing, parsing, compiling and
//! dispatching against a store.

use thiserror::Error;

/// Errors raised while splitting chain text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence \\{ch} at position {position}")]
    InvalidEscape { ch: char, position: usize },

    #[error("invalid number literal '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },

    #[error("unexpected '=' at position {position} (did you mean '==' or '=>'?)")]
    LoneEquals { position: usize },
}

/// Errors raised while building the syntax tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, got {found}")]
    Expected { expected: String, found: String },

    #[error("unexpected token in expression: {0}")]
    UnexpectedToken(String),
}

/// Errors raised while turning a syntax tree into documents.
///
/// Every variant is fatal: no partial document is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("unrecognized chain step: {node}")]
    UnrecognizedShape { node: String },

    #[error("cannot resolve a field path from {node}")]
    UnresolvablePath { node: String },

    #[error("then_sort_by requires an earlier sort_by on the same push_each")]
    ThenSortWithoutSort,

    #[error("defer() must be the last call of a chain")]
    MisplacedDefer,

    #[error("{operator} produced no clause for {node}")]
    TranslatorRefused { operator: String, node: String },

    #[error("cannot patch update document: {0}")]
    Patch(String),
}

/// Failures reported by a store collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server rejected the request: {0}")]
    Rejected(String),
}

/// Errors raised when a compiled chain is bound and executed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("binding error: {0}")]
    Binding(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
