//! Error taxonomy for semantic analysis

use std::fmt;

use thiserror::Error;

use super::Span;
use crate::sema::SymbolKind;

/// Category of a semantic diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A name reused across variable and function kinds
    KindConflict,
    /// A second prototype for the same function
    DuplicateDeclaration,
    /// A second body for the same function
    DuplicateDefinition,
    /// A function name used without call syntax
    FunctionUsedAsValue,
    /// Call syntax applied to a variable
    VariableCalledAsFunction,
    /// An `int` function whose body never returns
    MissingReturn,
    /// No `main` function in a unit that requires one
    MissingMain,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::KindConflict => "kind conflict",
            ErrorKind::DuplicateDeclaration => "duplicate declaration",
            ErrorKind::DuplicateDefinition => "duplicate definition",
            ErrorKind::FunctionUsedAsValue => "function used as value",
            ErrorKind::VariableCalledAsFunction => "variable called as function",
            ErrorKind::MissingReturn => "missing return",
            ErrorKind::MissingMain => "missing main",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict reported by the symbol table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("'{name}' is already declared as a {existing} and cannot be redeclared as a {requested}")]
    KindConflict {
        name: String,
        existing: SymbolKind,
        requested: SymbolKind,
        previous: Option<Span>,
    },

    #[error("redeclaration of function '{name}' is not allowed")]
    DuplicateDeclaration { name: String, previous: Option<Span> },

    #[error("redefinition of function '{name}'")]
    DuplicateDefinition { name: String, previous: Option<Span> },
}

impl SymbolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SymbolError::KindConflict { .. } => ErrorKind::KindConflict,
            SymbolError::DuplicateDeclaration { .. } => ErrorKind::DuplicateDeclaration,
            SymbolError::DuplicateDefinition { .. } => ErrorKind::DuplicateDefinition,
        }
    }

    /// Span of the earlier mention this conflict collides with.
    /// `None` when that mention is a builtin with no source location.
    pub fn previous(&self) -> Option<Span> {
        match self {
            SymbolError::KindConflict { previous, .. }
            | SymbolError::DuplicateDeclaration { previous, .. }
            | SymbolError::DuplicateDefinition { previous, .. } => *previous,
        }
    }
}

pub type SymbolResult<T> = Result<T, SymbolError>;
