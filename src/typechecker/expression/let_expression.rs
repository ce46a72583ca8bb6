use crate::ast::LetExpression;
use crate::typechecker::error::{ExprCountMismatch, TypeCheckError};
use crate::typechecker::{Context, LetScope, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for LetExpression {
    /// The right-hand side is checked first (its cached type is what the
    /// bindings resolve against), then the body under an extended scope.
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let rhs_type = self.rhs.check(ctx)?;

        let bound = match &rhs_type {
            SolType::Tuple(elements) => elements.len(),
            _ => 1,
        };
        if bound != self.names.len() {
            return Err(TypeCheckError::ExprCountMismatch(
                ExprCountMismatch {
                    expected: self.names.len(),
                    actual: bound,
                },
                self.rhs.position(),
            ));
        }

        ctx.scope.push_let(LetScope {
            rhs: self.rhs.id(),
            names: self.names.clone(),
        });
        let body_type = self.body.check(ctx);
        ctx.scope.pop();

        body_type
    }
}
