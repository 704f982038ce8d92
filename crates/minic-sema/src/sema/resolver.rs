//! Declaration resolver - walks top-level items in source order

use crate::ast::*;
use crate::common::{ErrorKind, Span};

use super::calls::CallSiteValidator;
use super::config::AnalyzerConfig;
use super::diagnostics::{AnalysisResult, Diagnostic, Diagnostics};
use super::flow::ReturnChecker;
use super::symbols::{Signature, SymbolKind, SymbolTable};

/// Single forward pass over one translation unit.
///
/// Owns the symbol table for the duration of the pass; use a fresh resolver
/// for every unit.
pub struct DeclarationResolver {
    table: SymbolTable,
    diagnostics: Diagnostics,
    config: AnalyzerConfig,
}

impl DeclarationResolver {
    pub fn new(config: AnalyzerConfig) -> Self {
        let mut table = SymbolTable::new();
        for name in &config.builtins {
            table.declare_builtin(name);
        }
        Self {
            table,
            diagnostics: Diagnostics::new(),
            config,
        }
    }

    /// Analyze a translation unit
    pub fn analyze(&mut self, tu: &TranslationUnit) -> AnalysisResult {
        for item in &tu.items {
            self.resolve_item(item);
        }

        if self.config.require_main {
            let end = tu.items.last().map_or(0, |item| item.span.end);
            self.check_main(Span::new(end, end));
        }

        AnalysisResult::from(std::mem::take(&mut self.diagnostics))
    }

    /// Symbols collected so far
    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    fn resolve_item(&mut self, item: &Item) {
        match &item.kind {
            ItemKind::Variables(vars) => {
                CallSiteValidator::new(&mut self.table, &mut self.diagnostics)
                    .declare_variables(vars);
            }
            ItemKind::Function(func) => match &func.body {
                Some(body) => self.resolve_definition(func, body),
                None => self.resolve_prototype(func),
            },
            ItemKind::Statement(stmt) => {
                CallSiteValidator::new(&mut self.table, &mut self.diagnostics).check_stmt(stmt);
            }
        }
    }

    fn resolve_prototype(&mut self, func: &FuncDecl) {
        log::debug!("prototype '{}'", func.name);
        let signature = Signature::of(func);
        if let Err(err) = self
            .table
            .declare(&func.name, SymbolKind::Function, Some(signature), func.span)
        {
            self.diagnostics.push(Diagnostic::from_symbol_error(&err, func.span));
        }
    }

    fn resolve_definition(&mut self, func: &FuncDecl, body: &Block) {
        log::debug!("definition '{}'", func.name);
        // The symbol exists before the body is walked, so recursion resolves
        if let Err(err) = self.table.define(&func.name, Signature::of(func), func.span) {
            self.diagnostics.push(Diagnostic::from_symbol_error(&err, func.span));
        }

        self.table.enter_function();
        for param in &func.params {
            if let Some(name) = &param.name {
                self.table.bind_local(name);
            }
        }
        CallSiteValidator::new(&mut self.table, &mut self.diagnostics).check_block(body);
        self.table.leave_function();

        let mut flow = ReturnChecker::new();
        flow.visit_block(body);
        if flow.is_missing_return(func.return_type) {
            self.diagnostics.error(
                ErrorKind::MissingReturn,
                func.span,
                format!(
                    "function '{}' returns {} but has no return statement",
                    func.name, func.return_type
                ),
            );
        }
    }

    fn check_main(&mut self, at: Span) {
        let has_main = self
            .table
            .lookup("main")
            .is_some_and(|symbol| symbol.is_function() && !symbol.is_implicit());
        if !has_main {
            self.diagnostics
                .error(ErrorKind::MissingMain, at, "main function is missing");
        }
    }
}

impl Default for DeclarationResolver {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
