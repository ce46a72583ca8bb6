//! Type checking and name resolution for annotation expressions.
//!
//! The driver builds a [`Context`] describing where an annotation sits
//! (source units, contract, optionally a function) and hands the parsed
//! expression to [`check_expression`]. Checking walks the AST bottom-up,
//! records the type of every subexpression in the context's
//! [`TypeCache`], stamps resolved identifiers with their def-site and
//! either returns the root type or aborts with the first
//! [`TypeCheckError`].
//!
//! Checking is deterministic and re-entrant: running the same expression
//! against the same context twice returns the same type, the second time
//! straight from the cache.

mod builtins;
mod cast;
mod context;
pub mod error;
mod expression;
mod ingest;
mod scope;
mod types;

pub use self::builtins::{address_member, builtin_symbol};
pub use self::cast::{implicitly_castable, unify};
pub use self::context::{Context, TypeCache};
pub use self::error::TypeCheckError;
pub use self::ingest::{
    detect_builtin_type, elementary_type, ingest_type_name, ingest_variable,
};
pub use self::scope::{LetScope, Scope, ScopeEntry, VarLookup};
pub use self::types::{Callable, SolType};

use crate::ast::Expression;

pub type TypeResult<T> = Result<T, TypeCheckError>;

pub trait TypeCheckable {
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType>;
}

/// Assign a type to `expr` in `ctx`, caching every subexpression's type
/// along the way.
pub fn check_expression(expr: &Expression, ctx: &mut Context) -> TypeResult<SolType> {
    expr.check(ctx)
}
