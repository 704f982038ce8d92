//! Parser module for minic source code

#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;
