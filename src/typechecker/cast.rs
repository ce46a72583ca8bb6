use crate::ast::Span;

use super::{
    error::{IncompatibleTypes, TypeCheckError},
    types::SolType,
    TypeResult,
};

/// Whether a value of type `from` may be used where `to` is expected
/// without an explicit conversion.
///
/// The relation is deliberately small: equality, literal widening, integer
/// widening within the same signedness, dropping `payable`, and pointers to
/// equal types regardless of location.
pub fn implicitly_castable(from: &SolType, to: &SolType) -> bool {
    if from == to {
        return true;
    }

    match (from, to) {
        (SolType::IntLiteral, SolType::Int { .. }) => true,
        (SolType::StringLiteral, SolType::Pointer { to, .. }) => {
            matches!(to.as_ref(), SolType::Bytes | SolType::String)
        }
        (
            SolType::Int { bits: n, signed: s },
            SolType::Int { bits: m, signed: t },
        ) => s == t && n <= m,
        (SolType::Address { .. }, SolType::Address { payable: false }) => true,
        (SolType::Pointer { to: a, .. }, SolType::Pointer { to: b, .. }) => a == b,
        _ => false,
    }
}

/// The common type of two operands: the one the other side implicitly
/// casts into. Fails with [`IncompatibleTypes`] when neither direction
/// works.
pub fn unify(left: &SolType, right: &SolType, position: &Span) -> TypeResult<SolType> {
    if implicitly_castable(left, right) {
        Ok(right.clone())
    } else if implicitly_castable(right, left) {
        Ok(left.clone())
    } else {
        Err(TypeCheckError::IncompatibleTypes(
            IncompatibleTypes {
                left: left.clone(),
                right: right.clone(),
            },
            position.clone(),
        ))
    }
}
