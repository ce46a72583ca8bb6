use crate::ast::Conditional;
use crate::typechecker::error::{TypeCheckError, WrongType};
use crate::typechecker::{unify, Context, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for Conditional {
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let condition_type = self.condition.check(ctx)?;
        if condition_type != SolType::Bool {
            return Err(TypeCheckError::WrongType(
                WrongType {
                    actual: condition_type,
                },
                self.condition.position(),
            ));
        }

        let true_type = self.true_branch.check(ctx)?;
        let false_type = self.false_branch.check(ctx)?;

        unify(&true_type, &false_type, &self.position)
    }
}
