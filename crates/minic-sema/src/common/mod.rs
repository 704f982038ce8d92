//! Common infrastructure shared by the AST and the analyzer

mod error;
mod span;

pub use error::{ErrorKind, SymbolError, SymbolResult};
pub use span::Span;
