//! Declaration AST nodes

use super::{Block, Expr, Type};
use crate::common::Span;

/// Variable declaration: int x = 5;
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            init: None,
            span,
        }
    }

    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(init);
        self
    }
}

/// Function prototype or definition
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Option<Block>,
    pub span: Span,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>, return_type: Type, params: Vec<Param>, span: Span) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
            body: None,
            span,
        }
    }

    pub fn with_body(mut self, body: Block) -> Self {
        self.body = Some(body);
        self
    }

    /// Check if this is just a prototype (no body)
    pub fn is_declaration(&self) -> bool {
        self.body.is_none()
    }

    /// Check if this is a definition (has body)
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

/// Function parameter. Prototype parameters may be unnamed: `int f(int, int);`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: Type,
    pub span: Span,
}

impl Param {
    pub fn new(name: Option<String>, ty: Type, span: Span) -> Self {
        Self { name, ty, span }
    }

    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self::new(Some(name.into()), Type::Int, span)
    }

    pub fn unnamed(span: Span) -> Self {
        Self::new(None, Type::Int, span)
    }
}
