//! Front-end errors and diagnostic rendering

mod error;

pub use error::{CompileError, CompileResult, DiagnosticReporter};
