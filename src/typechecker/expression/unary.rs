use crate::ast::{UnaryExpression, UnaryOperator};
use crate::typechecker::error::{TypeCheckError, WrongType};
use crate::typechecker::{Context, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for UnaryExpression {
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let operand_type = self.operand.check(ctx)?;

        match self.operator {
            UnaryOperator::Not => {
                if operand_type != SolType::Bool {
                    return Err(TypeCheckError::WrongType(
                        WrongType {
                            actual: operand_type,
                        },
                        self.operand.position(),
                    ));
                }
                Ok(SolType::Bool)
            }
            UnaryOperator::Neg => {
                if !operand_type.is_int_like() {
                    return Err(TypeCheckError::WrongType(
                        WrongType {
                            actual: operand_type,
                        },
                        self.operand.position(),
                    ));
                }
                Ok(operand_type)
            }
            // `old(e)` marks pre-state evaluation; the type is untouched
            UnaryOperator::Old => Ok(operand_type),
        }
    }
}
