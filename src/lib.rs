pub mod assemble;
pub mod ast;
pub mod chain;
pub mod cli;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod patch;
pub mod path;
pub mod recognize;
pub mod store;
pub mod translate;
pub mod wire;

pub use assemble::{CompileOptions, Compiled, Documents, Dropped, compile, compile_report, compile_str};
pub use ast::{BinOp, Expr, Token};
pub use dispatch::{Catalog, Dispatcher, Outcome, QueryScope, QueryView, SourceBinding};
pub use error::{CompileError, DispatchError, LexError, ParseError, StoreError};
pub use lexer::{Lexer, Position};
pub use parser::{Parser, parse_str};
pub use store::{Collection, DocumentStream, QueryFlags, WriteOutcome};
pub use wire::Document;
