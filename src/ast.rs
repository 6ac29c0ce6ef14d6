use std::fmt;
use std::rc::Rc;

use crate::token::{Literal, Token};

#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub name: Token,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryNode {
    pub op: Token,
    pub operand: Box<Expression>,
}

/// Shared by `Binary` and `Logical`; only the evaluation rule differs.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpNode {
    pub lhs: Box<Expression>,
    pub op: Token,
    pub rhs: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    pub callee: Box<Expression>,
    // closing paren, used to report call errors
    pub paren: Token,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Variable(Token),
    Assign(AssignNode),
    Unary(UnaryNode),
    Binary(BinaryOpNode),
    Logical(BinaryOpNode),
    Grouping(Box<Expression>),
    Call(CallNode),
}

impl fmt::Display for Expression {
    /// Fully parenthesized prefix form, e.g. `(+ 1 (* 2 3))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(v) => write!(f, "{}", v),
            Expression::Variable(name) => write!(f, "{}", name.lexeme),
            Expression::Assign(node) => write!(f, "(= {} {})", node.name.lexeme, node.value),
            Expression::Unary(node) => write!(f, "({} {})", node.op.lexeme, node.operand),
            Expression::Binary(node) | Expression::Logical(node) => {
                write!(f, "({} {} {})", node.op.lexeme, node.lhs, node.rhs)
            }
            Expression::Grouping(inner) => write!(f, "(group {})", inner),
            Expression::Call(node) => {
                write!(f, "(call {}", node.callee)?;
                for arg in &node.args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarNode {
    pub name: Token,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub cond: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileNode {
    pub cond: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: StatementList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnNode {
    pub keyword: Token,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expr(Expression),
    Print(Expression),
    Var(VarNode),
    Block(StatementList),
    If(IfNode),
    While(WhileNode),
    // shared with every function value created from it
    Function(Rc<FunctionDecl>),
    Return(ReturnNode),
}

pub type StatementList = Vec<Statement>;
