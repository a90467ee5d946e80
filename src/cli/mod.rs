//! CLI support for chainql
//!
//! Provides programmatic access to the `chainql` commands so other tools can
//! embed them without spawning the binary.

mod compile;
mod docs;
mod onboard;

pub use compile::{CompileCommand, CompileResult, execute_compile, render};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use onboard::get_onboarding_content;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] crate::CompileError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No chain provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'chainql docs' to see available categories.")]
    UnknownCategory(String),
}
