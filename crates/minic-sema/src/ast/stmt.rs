//! Statement AST nodes

use super::{Expr, VarDecl};
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn expr(expr: Expr) -> Self {
        let span = expr.span;
        Self::new(StmtKind::Expr(expr), span)
    }

    pub fn ret(value: Option<Expr>, span: Span) -> Self {
        Self::new(StmtKind::Return(value), span)
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Expression statement: expr;
    Expr(Expr),

    /// Empty statement: ;
    Empty,

    /// Local variable declaration: int x = 1, y;
    Declaration(Vec<VarDecl>),

    /// If statement: if (cond) { ... } [else { ... }]
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    /// While loop: while (cond) { ... }
    While { condition: Expr, body: Block },

    /// Return statement: return [expr];
    Return(Option<Expr>),
}

/// Braced statement list. Blocks do not open a new scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }
}
