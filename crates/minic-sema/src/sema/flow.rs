//! Return presence check for function bodies
//!
//! No reachability analysis: a `return` anywhere in the body, at any nesting
//! depth, satisfies an `int` function.

use crate::ast::{Block, StmtKind, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnState {
    NoReturnSeen,
    ReturnSeen,
}

/// Per-body state machine; `ReturnSeen` is terminal
#[derive(Debug, Clone)]
pub struct ReturnChecker {
    state: ReturnState,
}

impl ReturnChecker {
    pub fn new() -> Self {
        Self {
            state: ReturnState::NoReturnSeen,
        }
    }

    pub fn state(&self) -> ReturnState {
        self.state
    }

    pub fn visit_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            if self.state == ReturnState::ReturnSeen {
                return;
            }
            match &stmt.kind {
                StmtKind::Return(_) => self.state = ReturnState::ReturnSeen,
                StmtKind::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    self.visit_block(then_branch);
                    if let Some(else_branch) = else_branch {
                        self.visit_block(else_branch);
                    }
                }
                StmtKind::While { body, .. } => self.visit_block(body),
                StmtKind::Expr(_) | StmtKind::Empty | StmtKind::Declaration(_) => {}
            }
        }
    }

    /// Whether a body with the given return type ends without a required return
    pub fn is_missing_return(&self, return_type: Type) -> bool {
        match return_type {
            Type::Void => false,
            Type::Int => self.state == ReturnState::NoReturnSeen,
        }
    }
}

impl Default for ReturnChecker {
    fn default() -> Self {
        Self::new()
    }
}
