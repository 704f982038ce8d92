//! minic semantic core - declaration consistency and symbol resolution
//!
//! Consumes an already-parsed translation unit and reports every
//! declaration-vs-definition conflict, kind mismatch, misused function name
//! and missing return in a single forward pass.
//!
//! ## Architecture
//!
//! - **AST** (`ast/`): data model produced by an external parser
//! - **Semantic analysis** (`sema/`): symbol table, declaration resolver,
//!   call-site validator, return checker, diagnostic collector
//! - **Common** (`common/`): spans and the error taxonomy

pub mod ast;
pub mod common;
pub mod sema;

// Re-exports for convenience
pub use common::{ErrorKind, Span, SymbolError};
pub use sema::{AnalysisResult, AnalyzerConfig, DeclarationResolver, Diagnostic, SymbolTable};

/// Analyze one translation unit with the default configuration
pub fn analyze(tu: &ast::TranslationUnit) -> AnalysisResult {
    analyze_with(tu, &AnalyzerConfig::default())
}

/// Analyze one translation unit with an independent symbol table
pub fn analyze_with(tu: &ast::TranslationUnit, config: &AnalyzerConfig) -> AnalysisResult {
    DeclarationResolver::new(config.clone()).analyze(tu)
}
