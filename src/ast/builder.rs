use std::cell::Cell;
use std::cell::RefCell;

use super::{
    AddressLiteral, BinaryExpression, BinaryOperator, BooleanLiteral, Conditional, Expression,
    FunctionCall, Identifier, IndexAccess, LetExpression, MemberAccess, NodeId, NumberLiteral,
    ResultExpr, Span, StringKind, StringLiteral, UnaryExpression, UnaryOperator,
};

/// Factory for expression nodes with unique [`NodeId`]s.
///
/// The annotation parser drives one of these per source unit; tests use it
/// directly. Positions default to [`Span::default`] and are filled in by the
/// parser where real source text is available.
#[derive(Debug, Default)]
pub struct ExprBuilder {
    next: Cell<u32>,
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }

    pub fn number(&self, value: i128) -> Expression {
        Expression::NumberLiteral(NumberLiteral {
            id: self.next_id(),
            value,
            position: Span::default(),
        })
    }

    pub fn boolean(&self, value: bool) -> Expression {
        Expression::BooleanLiteral(BooleanLiteral {
            id: self.next_id(),
            value,
            position: Span::default(),
        })
    }

    pub fn string(&self, value: impl ToString) -> Expression {
        Expression::StringLiteral(StringLiteral {
            id: self.next_id(),
            value: value.to_string(),
            kind: StringKind::Utf8,
            position: Span::default(),
        })
    }

    pub fn hex_string(&self, value: impl ToString) -> Expression {
        Expression::StringLiteral(StringLiteral {
            id: self.next_id(),
            value: value.to_string(),
            kind: StringKind::Hex,
            position: Span::default(),
        })
    }

    pub fn address(&self, value: impl ToString) -> Expression {
        Expression::AddressLiteral(AddressLiteral {
            id: self.next_id(),
            value: value.to_string(),
            position: Span::default(),
        })
    }

    pub fn ident(&self, name: impl ToString) -> Expression {
        Expression::Identifier(Identifier {
            id: self.next_id(),
            name: name.to_string(),
            def_site: RefCell::new(None),
            position: Span::default(),
        })
    }

    pub fn result(&self) -> Expression {
        Expression::Result(ResultExpr {
            id: self.next_id(),
            position: Span::default(),
        })
    }

    pub fn unary(&self, operator: UnaryOperator, operand: Expression) -> Expression {
        Expression::Unary(UnaryExpression {
            id: self.next_id(),
            operator,
            operand: Box::new(operand),
            position: Span::default(),
        })
    }

    pub fn binary(&self, operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
        Expression::Binary(BinaryExpression {
            id: self.next_id(),
            operator,
            left: Box::new(left),
            right: Box::new(right),
            position: Span::default(),
        })
    }

    pub fn conditional(
        &self,
        condition: Expression,
        true_branch: Expression,
        false_branch: Expression,
    ) -> Expression {
        Expression::Conditional(Conditional {
            id: self.next_id(),
            condition: Box::new(condition),
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
            position: Span::default(),
        })
    }

    pub fn index(&self, base: Expression, index: Expression) -> Expression {
        Expression::Index(IndexAccess {
            id: self.next_id(),
            base: Box::new(base),
            index: Box::new(index),
            position: Span::default(),
        })
    }

    pub fn member(&self, base: Expression, member: impl ToString) -> Expression {
        Expression::Member(MemberAccess {
            id: self.next_id(),
            base: Box::new(base),
            member: member.to_string(),
            member_position: Span::default(),
            position: Span::default(),
        })
    }

    pub fn let_in(&self, names: &[&str], rhs: Expression, body: Expression) -> Expression {
        Expression::Let(LetExpression {
            id: self.next_id(),
            names: names.iter().map(|n| n.to_string()).collect(),
            rhs: Box::new(rhs),
            body: Box::new(body),
            position: Span::default(),
        })
    }

    pub fn call(&self, callee: Expression, args: Vec<Expression>) -> Expression {
        Expression::Call(FunctionCall {
            id: self.next_id(),
            callee: Box::new(callee),
            args,
            position: Span::default(),
        })
    }
}
