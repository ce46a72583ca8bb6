use crate::ast::IndexAccess;
use crate::typechecker::error::{TypeCheckError, WrongType};
use crate::typechecker::{implicitly_castable, Context, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for IndexAccess {
    fn check(&self, ctx: &mut Context) -> TypeResult<SolType> {
        let base_type = self.base.check(ctx)?;
        let index_type = self.index.check(ctx)?;

        let int_index = |result: SolType| -> TypeResult<SolType> {
            if index_type.is_int_like() {
                Ok(result)
            } else {
                Err(TypeCheckError::WrongType(
                    WrongType {
                        actual: index_type.clone(),
                    },
                    self.index.position(),
                ))
            }
        };

        match &base_type {
            SolType::FixedBytes { .. } => int_index(SolType::uint(8)),
            SolType::Pointer { to, .. } => match to.as_ref() {
                SolType::Bytes => int_index(SolType::uint(8)),
                SolType::Array { element, .. } => int_index(element.as_ref().clone()),
                SolType::Mapping { key, value } => {
                    if implicitly_castable(&index_type, key) {
                        Ok(value.as_ref().clone())
                    } else {
                        Err(TypeCheckError::WrongType(
                            WrongType {
                                actual: index_type.clone(),
                            },
                            self.index.position(),
                        ))
                    }
                }
                _ => Err(TypeCheckError::WrongType(
                    WrongType {
                        actual: base_type.clone(),
                    },
                    self.base.position(),
                )),
            },
            _ => Err(TypeCheckError::WrongType(
                WrongType {
                    actual: base_type.clone(),
                },
                self.base.position(),
            )),
        }
    }
}
