mod binary;
mod call;
mod conditional;
mod identifier;
mod index;
mod let_expression;
mod literals;
mod member;
mod result;
mod unary;

use log::trace;

use crate::ast::Expression;

use super::{Context, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for Expression {
    /// Cache-first dispatch: every node is checked at most once per
    /// context, later checks of the same node return the stored type.
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        if let Some(cached) = ctx.cache.get(self.id()) {
            trace!("type cache hit for node {}", self.id());
            return Ok(cached.clone());
        }

        let ty = match self {
            Expression::NumberLiteral(node) => node.check(ctx),
            Expression::BooleanLiteral(node) => node.check(ctx),
            Expression::StringLiteral(node) => node.check(ctx),
            Expression::AddressLiteral(node) => node.check(ctx),
            Expression::Identifier(node) => node.check(ctx),
            Expression::Result(node) => node.check(ctx),
            Expression::Unary(node) => node.check(ctx),
            Expression::Binary(node) => node.check(ctx),
            Expression::Conditional(node) => node.check(ctx),
            Expression::Index(node) => node.check(ctx),
            Expression::Member(node) => node.check(ctx),
            Expression::Let(node) => node.check(ctx),
            Expression::Call(node) => node.check(ctx),
        }?;

        debug_assert!(
            ty.is_well_formed(),
            "checker produced ill-formed type '{ty}' for node {}",
            self.id()
        );

        ctx.cache.insert(self.id(), ty.clone());
        Ok(ty)
    }
}
