//! Call-site validation
//!
//! Every identifier occurrence is classified as a call (`name(args...)`) or a
//! value and checked against the kind it resolves to. Calls to unknown names
//! are accepted and recorded as implicit external functions; arity is never
//! checked.

use crate::ast::{Block, Expr, ExprKind, Stmt, StmtKind, VarDecl};
use crate::common::{ErrorKind, Span};

use super::diagnostics::{Diagnostic, Diagnostics};
use super::symbols::{Binding, SymbolKind, SymbolTable};

/// One identifier occurrence inside an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'e> {
    pub name: &'e str,
    pub span: Span,
    pub is_called_as_function: bool,
    /// Only meaningful for calls
    pub argument_count: usize,
}

impl<'e> CallSite<'e> {
    pub fn value(name: &'e str, span: Span) -> Self {
        Self {
            name,
            span,
            is_called_as_function: false,
            argument_count: 0,
        }
    }

    pub fn call(name: &'e str, span: Span, argument_count: usize) -> Self {
        Self {
            name,
            span,
            is_called_as_function: true,
            argument_count,
        }
    }
}

/// Walks statements and expressions, checking each call site
pub struct CallSiteValidator<'a> {
    table: &'a mut SymbolTable,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> CallSiteValidator<'a> {
    pub fn new(table: &'a mut SymbolTable, diagnostics: &'a mut Diagnostics) -> Self {
        Self { table, diagnostics }
    }

    pub fn check_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
    }

    pub fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.check_expr(expr),
            StmtKind::Empty => {}
            StmtKind::Declaration(vars) => self.declare_variables(vars),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_expr(condition);
                self.check_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_block(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.check_expr(condition);
                self.check_block(body);
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.check_expr(value);
                }
            }
        }
    }

    /// Declare variables, checking each initializer before its variable.
    /// Inside a function body they are locals, otherwise globals.
    pub fn declare_variables(&mut self, vars: &[VarDecl]) {
        for var in vars {
            if let Some(init) = &var.init {
                self.check_expr(init);
            }

            if self.table.in_function() {
                self.table.bind_local(&var.name);
            } else if let Err(err) =
                self.table.declare(&var.name, SymbolKind::Variable, None, var.span)
            {
                self.diagnostics.push(Diagnostic::from_symbol_error(&err, var.span));
            }
        }
    }

    pub fn check_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLiteral(_) | ExprKind::StringLiteral(_) => {}

            ExprKind::Identifier(name) => self.check_site(CallSite::value(name, expr.span)),

            ExprKind::Binary { left, right, .. } => {
                self.check_expr(left);
                self.check_expr(right);
            }

            ExprKind::Unary { operand, .. } => self.check_expr(operand),

            ExprKind::Assign { target, value } => {
                match target.as_identifier() {
                    Some(name) => self.check_assign_target(name, target.span),
                    None => self.check_expr(target),
                }
                self.check_expr(value);
            }

            ExprKind::Call { callee, args } => {
                match callee.as_identifier() {
                    Some(name) => self.check_site(CallSite::call(name, callee.span, args.len())),
                    None => self.check_expr(callee),
                }
                for arg in args {
                    self.check_expr(arg);
                }
            }
        }
    }

    pub fn check_site(&mut self, site: CallSite<'_>) {
        match (self.classify(site.name), site.is_called_as_function) {
            (Some((SymbolKind::Function, previous)), false) => {
                self.report(
                    ErrorKind::FunctionUsedAsValue,
                    site.span,
                    format!(
                        "'{}' is a function and must be called as '{}(...)'",
                        site.name, site.name
                    ),
                    previous,
                );
            }
            (Some((SymbolKind::Variable, previous)), true) => {
                self.report(
                    ErrorKind::VariableCalledAsFunction,
                    site.span,
                    format!("'{}' is not a function", site.name),
                    previous,
                );
            }
            (None, true) => {
                self.table.declare_implicit(site.name, site.span);
            }
            _ => {
                log::trace!(
                    "call site '{}' ok (called: {}, args: {})",
                    site.name,
                    site.is_called_as_function,
                    site.argument_count
                );
            }
        }
    }

    /// `name = ...`: unseen names become global variables
    fn check_assign_target(&mut self, name: &str, span: Span) {
        match self.classify(name) {
            Some((SymbolKind::Function, previous)) => {
                self.report(
                    ErrorKind::FunctionUsedAsValue,
                    span,
                    format!("cannot assign to function '{}'", name),
                    previous,
                );
            }
            Some((SymbolKind::Variable, _)) => {}
            None => {
                if let Err(err) = self.table.declare(name, SymbolKind::Variable, None, span) {
                    self.diagnostics.push(Diagnostic::from_symbol_error(&err, span));
                }
            }
        }
    }

    /// Kind `name` resolves to, with the declaration to point back at
    fn classify(&self, name: &str) -> Option<(SymbolKind, Option<Span>)> {
        match self.table.resolve(name) {
            Binding::Local => Some((SymbolKind::Variable, None)),
            Binding::Global(symbol) => Some((symbol.kind, symbol.location())),
            Binding::Unbound => None,
        }
    }

    fn report(&mut self, kind: ErrorKind, span: Span, message: String, previous: Option<Span>) {
        let mut diagnostic = Diagnostic::new(kind, span, message);
        diagnostic.previous = previous;
        self.diagnostics.push(diagnostic);
    }
}
