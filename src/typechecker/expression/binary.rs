use crate::ast::{BinaryExpression, BinaryOperator, Expression};
use crate::typechecker::error::{TypeCheckError, WrongType};
use crate::typechecker::{unify, Context, SolType, TypeCheckable, TypeResult};

fn wrong_type(actual: SolType, expr: &Expression) -> TypeCheckError {
    TypeCheckError::WrongType(WrongType { actual }, expr.position())
}

fn require_int_like(ty: &SolType, expr: &Expression) -> TypeResult<()> {
    if ty.is_int_like() {
        Ok(())
    } else {
        Err(wrong_type(ty.clone(), expr))
    }
}

fn require_int_or_fixed_bytes(ty: &SolType, expr: &Expression) -> TypeResult<()> {
    if ty.is_int_like() || matches!(ty, SolType::FixedBytes { .. }) {
        Ok(())
    } else {
        Err(wrong_type(ty.clone(), expr))
    }
}

fn require_bool(ty: &SolType, expr: &Expression) -> TypeResult<()> {
    if *ty == SolType::Bool {
        Ok(())
    } else {
        Err(wrong_type(ty.clone(), expr))
    }
}

impl TypeCheckable for BinaryExpression {
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let left_type = self.left.check(ctx)?;
        let right_type = self.right.check(ctx)?;

        match self.operator {
            BinaryOperator::Pow => {
                require_int_like(&left_type, &self.left)?;
                require_int_like(&right_type, &self.right)?;

                // exponents are unsigned; a literal exponent must not be
                // negative
                if matches!(right_type, SolType::Int { signed: true, .. }) {
                    return Err(wrong_type(right_type, &self.right));
                }
                if let Expression::NumberLiteral(num) = self.right.as_ref() {
                    if num.value < 0 {
                        return Err(wrong_type(right_type, &self.right));
                    }
                }

                Ok(if left_type == SolType::IntLiteral {
                    right_type
                } else {
                    left_type
                })
            }
            BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Mod
            | BinaryOperator::Add
            | BinaryOperator::Sub => {
                require_int_like(&left_type, &self.left)?;
                require_int_like(&right_type, &self.right)?;
                unify(&left_type, &right_type, &self.position)
            }
            BinaryOperator::Shl | BinaryOperator::Shr => {
                require_int_or_fixed_bytes(&left_type, &self.left)?;
                require_int_like(&right_type, &self.right)?;

                Ok(if left_type == SolType::IntLiteral {
                    right_type
                } else {
                    left_type
                })
            }
            BinaryOperator::Lt | BinaryOperator::Gt | BinaryOperator::Le | BinaryOperator::Ge => {
                require_int_or_fixed_bytes(&left_type, &self.left)?;
                require_int_or_fixed_bytes(&right_type, &self.right)?;
                unify(&left_type, &right_type, &self.position)?;
                Ok(SolType::Bool)
            }
            BinaryOperator::Eq | BinaryOperator::Ne => {
                unify(&left_type, &right_type, &self.position)?;
                Ok(SolType::Bool)
            }
            BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor => {
                require_int_or_fixed_bytes(&left_type, &self.left)?;
                require_int_or_fixed_bytes(&right_type, &self.right)?;
                unify(&left_type, &right_type, &self.position)
            }
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Implies => {
                require_bool(&left_type, &self.left)?;
                require_bool(&right_type, &self.right)?;
                Ok(SolType::Bool)
            }
        }
    }
}
