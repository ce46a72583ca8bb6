use crate::ast::{AddressLiteral, BooleanLiteral, NumberLiteral, StringLiteral};
use crate::typechecker::{Context, SolType, TypeCheckable, TypeResult};

impl TypeCheckable for NumberLiteral {
    fn check(&self, _ctx: &mut Context) -> TypeResult<SolType> {
        Ok(SolType::IntLiteral)
    }
}

impl TypeCheckable for BooleanLiteral {
    fn check(&self, _ctx: &mut Context) -> TypeResult<SolType> {
        Ok(SolType::Bool)
    }
}

impl TypeCheckable for StringLiteral {
    fn check(&self, _ctx: &mut Context) -> TypeResult<SolType> {
        Ok(SolType::StringLiteral)
    }
}

impl TypeCheckable for AddressLiteral {
    fn check(&self, _ctx: &mut Context) -> TypeResult<SolType> {
        Ok(SolType::Address { payable: true })
    }
}
