//! Semantic analysis module
//!
//! This module resolves declarations and validates identifier usage.

mod calls;
mod config;
mod diagnostics;
mod flow;
mod resolver;
mod symbols;

pub use calls::{CallSite, CallSiteValidator};
pub use config::{AnalyzerConfig, DEFAULT_BUILTINS};
pub use diagnostics::{AnalysisResult, Diagnostic, Diagnostics};
pub use flow::{ReturnChecker, ReturnState};
pub use resolver::DeclarationResolver;
pub use symbols::{Binding, Name, Origin, Signature, Symbol, SymbolKind, SymbolState, SymbolTable};
