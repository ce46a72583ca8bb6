//! AST of the annotation expression language.
//!
//! The parser for annotations lives outside this crate; it hands every
//! checked expression over in the shape defined here. Each node carries a
//! [`NodeId`] (the key of the type cache) and a [`Span`] pointing back into
//! the annotation source. Identifier nodes additionally carry a mutable
//! def-site slot which the name resolver stamps exactly once per checking
//! run.

mod builder;
mod span;

pub use self::builder::ExprBuilder;
pub use self::span::Span;

use std::cell::RefCell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::sol::VarDecl;

/// Identity of an AST node, assigned by the [`ExprBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct NodeId(pub u32);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an identifier resolved to. Stored on the identifier node itself so
/// downstream passes can re-read the resolution without repeating it.
#[derive(Debug, Clone)]
pub enum DefSite {
    /// A host-language variable declaration.
    Var(Rc<VarDecl>),
    /// The `index`-th name bound by the `let` whose right-hand side is `scope`.
    LetBinding { scope: NodeId, index: usize },
    /// The `this` keyword.
    This,
    /// A function name (the identifier names an overload set).
    FunctionName,
    /// A user-defined type name.
    TypeName,
}

impl PartialEq for DefSite {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DefSite::Var(a), DefSite::Var(b)) => Rc::ptr_eq(a, b),
            (
                DefSite::LetBinding { scope: a, index: i },
                DefSite::LetBinding { scope: b, index: j },
            ) => a == b && i == j,
            (DefSite::This, DefSite::This) => true,
            (DefSite::FunctionName, DefSite::FunctionName) => true,
            (DefSite::TypeName, DefSite::TypeName) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberLiteral {
    pub id: NodeId,
    pub value: i128,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub id: NodeId,
    pub value: bool,
    pub position: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    Utf8,
    Hex,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub id: NodeId,
    pub value: String,
    pub kind: StringKind,
    pub position: Span,
}

/// A 20-byte address literal (`0x` followed by 40 hex digits).
#[derive(Debug, Clone)]
pub struct AddressLiteral {
    pub id: NodeId,
    pub value: String,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub id: NodeId,
    pub name: String,
    pub def_site: RefCell<Option<DefSite>>,
    pub position: Span,
}

impl Identifier {
    pub fn def_site(&self) -> Option<DefSite> {
        self.def_site.borrow().clone()
    }

    pub(crate) fn stamp_def_site(&self, site: DefSite) {
        *self.def_site.borrow_mut() = Some(site);
    }
}

/// The `$result` keyword.
#[derive(Debug, Clone)]
pub struct ResultExpr {
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Neg,
    Old,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub id: NodeId,
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Implies,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let token = match self {
            BinaryOperator::Pow => "**",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
            BinaryOperator::Le => "<=",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Implies => "==>",
        };
        f.write_str(token)
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub id: NodeId,
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Conditional {
    pub id: NodeId,
    pub condition: Box<Expression>,
    pub true_branch: Box<Expression>,
    pub false_branch: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct IndexAccess {
    pub id: NodeId,
    pub base: Box<Expression>,
    pub index: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct MemberAccess {
    pub id: NodeId,
    pub base: Box<Expression>,
    pub member: String,
    pub member_position: Span,
    pub position: Span,
}

/// `let x₁, …, xₙ = rhs in body`
#[derive(Debug, Clone)]
pub struct LetExpression {
    pub id: NodeId,
    pub names: Vec<String>,
    pub rhs: Box<Expression>,
    pub body: Box<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub id: NodeId,
    pub callee: Box<Expression>,
    pub args: Vec<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub enum Expression {
    NumberLiteral(NumberLiteral),
    BooleanLiteral(BooleanLiteral),
    StringLiteral(StringLiteral),
    AddressLiteral(AddressLiteral),
    Identifier(Identifier),
    Result(ResultExpr),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Conditional(Conditional),
    Index(IndexAccess),
    Member(MemberAccess),
    Let(LetExpression),
    Call(FunctionCall),
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::NumberLiteral(NumberLiteral { id, .. }) => *id,
            Expression::BooleanLiteral(BooleanLiteral { id, .. }) => *id,
            Expression::StringLiteral(StringLiteral { id, .. }) => *id,
            Expression::AddressLiteral(AddressLiteral { id, .. }) => *id,
            Expression::Identifier(Identifier { id, .. }) => *id,
            Expression::Result(ResultExpr { id, .. }) => *id,
            Expression::Unary(UnaryExpression { id, .. }) => *id,
            Expression::Binary(BinaryExpression { id, .. }) => *id,
            Expression::Conditional(Conditional { id, .. }) => *id,
            Expression::Index(IndexAccess { id, .. }) => *id,
            Expression::Member(MemberAccess { id, .. }) => *id,
            Expression::Let(LetExpression { id, .. }) => *id,
            Expression::Call(FunctionCall { id, .. }) => *id,
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Expression::NumberLiteral(NumberLiteral { position, .. }) => position.clone(),
            Expression::BooleanLiteral(BooleanLiteral { position, .. }) => position.clone(),
            Expression::StringLiteral(StringLiteral { position, .. }) => position.clone(),
            Expression::AddressLiteral(AddressLiteral { position, .. }) => position.clone(),
            Expression::Identifier(Identifier { position, .. }) => position.clone(),
            Expression::Result(ResultExpr { position, .. }) => position.clone(),
            Expression::Unary(UnaryExpression { position, .. }) => position.clone(),
            Expression::Binary(BinaryExpression { position, .. }) => position.clone(),
            Expression::Conditional(Conditional { position, .. }) => position.clone(),
            Expression::Index(IndexAccess { position, .. }) => position.clone(),
            Expression::Member(MemberAccess { position, .. }) => position.clone(),
            Expression::Let(LetExpression { position, .. }) => position.clone(),
            Expression::Call(FunctionCall { position, .. }) => position.clone(),
        }
    }
}
