use std::{error::Error, fmt::Display};

use crate::ast::Span;

use super::types::SolType;

/// Everything that can go wrong while checking one annotation expression.
/// Every variant carries the range of the offending subexpression; checking
/// aborts at the first error.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeCheckError {
    NoField(NoField, Span),
    WrongType(WrongType, Span),
    UnknownId(UnknownId, Span),
    MissingSolidityType(MissingSolidityType, Span),
    ExprCountMismatch(ExprCountMismatch, Span),
    UnresolvedFun(UnresolvedFun, Span),
    FunNoReturn(FunNoReturn, Span),
    ArgumentMismatch(ArgumentMismatch, Span),
    IncompatibleTypes(IncompatibleTypes, Span),
    InvalidKeyword(InvalidKeyword, Span),
    UnsupportedFeature(UnsupportedFeature, Span),
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.span().to_string(self.err()).as_str())
    }
}

impl TypeCheckError {
    /// The source range this diagnostic should be reported at.
    pub fn span(&self) -> Span {
        match self {
            TypeCheckError::NoField(_, span) => span.clone(),
            TypeCheckError::WrongType(_, span) => span.clone(),
            TypeCheckError::UnknownId(_, span) => span.clone(),
            TypeCheckError::MissingSolidityType(_, span) => span.clone(),
            TypeCheckError::ExprCountMismatch(_, span) => span.clone(),
            TypeCheckError::UnresolvedFun(_, span) => span.clone(),
            TypeCheckError::FunNoReturn(_, span) => span.clone(),
            TypeCheckError::ArgumentMismatch(_, span) => span.clone(),
            TypeCheckError::IncompatibleTypes(_, span) => span.clone(),
            TypeCheckError::InvalidKeyword(_, span) => span.clone(),
            TypeCheckError::UnsupportedFeature(_, span) => span.clone(),
        }
    }

    fn err(&self) -> Box<dyn Error> {
        match self {
            TypeCheckError::NoField(e, _) => Box::new(e.clone()),
            TypeCheckError::WrongType(e, _) => Box::new(e.clone()),
            TypeCheckError::UnknownId(e, _) => Box::new(e.clone()),
            TypeCheckError::MissingSolidityType(e, _) => Box::new(e.clone()),
            TypeCheckError::ExprCountMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::UnresolvedFun(e, _) => Box::new(e.clone()),
            TypeCheckError::FunNoReturn(e, _) => Box::new(e.clone()),
            TypeCheckError::ArgumentMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::IncompatibleTypes(e, _) => Box::new(e.clone()),
            TypeCheckError::InvalidKeyword(e, _) => Box::new(e.clone()),
            TypeCheckError::UnsupportedFeature(e, _) => Box::new(e.clone()),
        }
    }
}

impl Error for TypeCheckError {}

#[derive(Clone, Debug, PartialEq)]
pub struct NoField {
    pub member: String,
}

impl Display for NoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "tried to access unknown member '{}'",
            self.member
        ))
    }
}

impl Error for NoField {}

#[derive(Clone, Debug, PartialEq)]
pub struct WrongType {
    pub actual: SolType,
}

impl Display for WrongType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "expression of type '{}' is not valid here",
            self.actual
        ))
    }
}

impl Error for WrongType {}

#[derive(Clone, Debug, PartialEq)]
pub struct UnknownId {
    pub name: String,
}

impl Display for UnknownId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("unknown identifier '{}'", self.name))
    }
}

impl Error for UnknownId {}

#[derive(Clone, Debug, PartialEq)]
pub struct MissingSolidityType {
    pub name: String,
}

impl Display for MissingSolidityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "declaration '{}' has no resolvable host type",
            self.name
        ))
    }
}

impl Error for MissingSolidityType {}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprCountMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl Display for ExprCountMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "expected {} expression(s) but got {}",
            self.expected, self.actual
        ))
    }
}

impl Error for ExprCountMismatch {}

#[derive(Clone, Debug, PartialEq)]
pub struct UnresolvedFun {
    pub name: String,
}

impl Display for UnresolvedFun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "no matching overload for call to '{}'",
            self.name
        ))
    }
}

impl Error for UnresolvedFun {}

#[derive(Clone, Debug, PartialEq)]
pub struct FunNoReturn {
    pub callee: String,
}

impl Display for FunNoReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' returns nothing and cannot be used as a value",
            self.callee
        ))
    }
}

impl Error for FunNoReturn {}

#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentMismatch {
    pub expected: SolType,
    pub actual: SolType,
}

impl Display for ArgumentMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "expected argument of type '{}' but got '{}'",
            self.expected, self.actual
        ))
    }
}

impl Error for ArgumentMismatch {}

#[derive(Clone, Debug, PartialEq)]
pub struct IncompatibleTypes {
    pub left: SolType,
    pub right: SolType,
}

impl Display for IncompatibleTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "types '{}' and '{}' are incompatible",
            self.left, self.right
        ))
    }
}

impl Error for IncompatibleTypes {}

#[derive(Clone, Debug, PartialEq)]
pub struct InvalidKeyword {
    pub keyword: String,
}

impl Display for InvalidKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "keyword '{}' is not valid in this context",
            self.keyword
        ))
    }
}

impl Error for InvalidKeyword {}

#[derive(Clone, Debug, PartialEq)]
pub struct UnsupportedFeature {
    pub feature: String,
}

impl Display for UnsupportedFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} is not supported yet", self.feature))
    }
}

impl Error for UnsupportedFeature {}
