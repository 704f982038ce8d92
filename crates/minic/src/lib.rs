//! minic front end and checker driver
//!
//! Turns source text into the AST consumed by `minic-sema` and renders the
//! resulting diagnostics.
//!
//! ## Architecture
//!
//! - **Lexer** (`lexer/`): logos-based tokenizer
//! - **Parser** (`parser/`): recursive descent parser
//! - **Driver** (`driver/`): per-file check pipeline
//! - **Common** (`common/`): front-end errors and the diagnostic reporter

pub mod common;
pub mod driver;
pub mod lexer;
pub mod parser;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter};
pub use driver::{CheckOptions, Checker};
