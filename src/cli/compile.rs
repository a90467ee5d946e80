//! Compile chain text to wire documents

use serde_json::Value;

use super::CliError;
use crate::{
    Lexer, Parser,
    assemble::{CompileOptions, compile},
};

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileCommand {
    /// The chain to compile
    pub chain: String,
    /// Pretty-print the output
    pub pretty: bool,
    /// Fail instead of dropping steps without a wire form
    pub strict: bool,
    /// Only validate syntax, don't compile
    pub syntax_only: bool,
}

/// Result of a compile operation
#[derive(Debug)]
pub enum CompileResult {
    /// Syntax validation passed
    SyntaxValid,
    /// `{"query": …}` or `{"query": …, "update": …}`
    Success(Value),
}

/// Execute a chainql compile operation
///
/// The CLI has no store, so every chain is reported as its deferred
/// documents whether or not it ends in `defer()`.
pub fn execute_compile(command: &CompileCommand) -> Result<CompileResult, CliError> {
    let chain = command.chain.trim();
    if chain.is_empty() {
        return Err(CliError::NoInput);
    }

    let expr = Parser::new(Lexer::new(chain))?.parse()?;
    if command.syntax_only {
        return Ok(CompileResult::SyntaxValid);
    }

    let options = CompileOptions {
        strict: command.strict,
    };
    let compiled = compile(&expr, &options)?;
    Ok(CompileResult::Success(compiled.documents().to_value()))
}

/// Render a compile result the way the binary prints it.
pub fn render(value: &Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
