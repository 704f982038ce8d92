//! Abstract Syntax Tree definitions
//!
//! The tree is produced by an external parser; the analyzer only reads it.

mod decl;
mod expr;
mod stmt;
mod types;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

use crate::common::Span;

/// A complete translation unit (source file)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
}

impl TranslationUnit {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// Top-level item, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

impl Item {
    pub fn new(kind: ItemKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn variables(vars: Vec<VarDecl>, span: Span) -> Self {
        Self::new(ItemKind::Variables(vars), span)
    }

    pub fn function(func: FuncDecl) -> Self {
        let span = func.span;
        Self::new(ItemKind::Function(func), span)
    }

    pub fn statement(stmt: Stmt) -> Self {
        let span = stmt.span;
        Self::new(ItemKind::Statement(stmt), span)
    }
}

/// Top-level item kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Global variable declaration(s): int a, b = 1;
    Variables(Vec<VarDecl>),

    /// Function prototype or definition
    Function(FuncDecl),

    /// Statement outside any function: a = f(); printf("x");
    Statement(Stmt),
}
