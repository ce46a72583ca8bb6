//! Marginalia is the type checker and name resolver for a small expression
//! language used to annotate contracts written in a Solidity-like host
//! language. Annotations may refer to anything in scope at their site and
//! extend the host expression grammar with `old(...)`, `$result`,
//! `let ... in ...` and logical implication (`==>`).
//!
//! The crate consumes two inputs: the parsed annotation AST ([`ast`]) and
//! the host compiler's resolved symbol table ([`sol`]). The checker itself
//! lives in [`typechecker`] and is entered through
//! [`typechecker::check_expression`].

pub mod ast;
pub mod sol;
pub mod typechecker;

pub use ast::{ExprBuilder, Expression, Span};
pub use typechecker::{check_expression, Context, SolType, TypeCheckError};
