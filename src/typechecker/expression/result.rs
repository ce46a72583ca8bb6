use crate::ast::ResultExpr;
use crate::typechecker::error::{InvalidKeyword, MissingSolidityType, TypeCheckError};
use crate::typechecker::{ingest_variable, Context, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for ResultExpr {
    /// `$result` stands for the return value(s) of the function the
    /// annotation is attached to; several returns make a tuple.
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let function = ctx
            .scope
            .enclosing_function()
            .filter(|f| !f.returns.is_empty());

        let Some(function) = function else {
            return Err(TypeCheckError::InvalidKeyword(
                InvalidKeyword {
                    keyword: "$result".into(),
                },
                self.position.clone(),
            ));
        };

        let mut types = vec![];
        for ret in &function.returns {
            let Some(ty) = ingest_variable(ret, None) else {
                return Err(TypeCheckError::MissingSolidityType(
                    MissingSolidityType {
                        name: ret.name.clone(),
                    },
                    self.position.clone(),
                ));
            };
            types.push(ty);
        }

        if types.len() == 1 {
            Ok(types.remove(0))
        } else {
            Ok(SolType::Tuple(types))
        }
    }
}
