//! # chainql - Abstract Syntax Tree
//!
//! This module defines the syntax tree for chain expressions: a source
//! followed by method calls, each call carrying lambdas and literal operands.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (sources, bindings, access, calls, literals)
//! - **[operators]** - Binary operators (comparison, arithmetic, logical)
//!
//! ## Quick Start
//!
//! ```text
//! $people
//!   .where(@p => @p.age >= 18)
//!   .update()
//!   .set(@p => @p.visits, @p.visits + 1)
//! ```
//!
//! compiles to the query `{"age": {"$gte": 18}}` and the update
//! `{"$inc": {"visits": 1}}`.
//!
//! ## Core Concepts
//!
//! ### Chains
//!
//! A chain is a source (`$`, `$name` or an array literal) followed by calls.
//! The parser builds it inside out: the last call is the outermost node and
//! its receiver is everything written before it.
//!
//! ### Bindings
//!
//! `@p => ...` introduces the binding `p` for the current document. Field
//! paths are written with member access (`@p.address.city`) or indexed
//! access (`@p["address"]["city"]`, `@p.tags[0]`).
//!
//! ### Absence
//!
//! `absent` is the value of a field that should not exist; setting a field
//! to `absent` unsets it.

pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use operators::BinOp;
pub use tokens::Token;
