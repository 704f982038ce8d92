//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};
use minic_sema::{ErrorKind, Span};
use thiserror::Error;

/// Front-end error with source location
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

fn error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::KindConflict => "E0001",
        ErrorKind::DuplicateDeclaration => "E0002",
        ErrorKind::DuplicateDefinition => "E0003",
        ErrorKind::FunctionUsedAsValue => "E0004",
        ErrorKind::VariableCalledAsFunction => "E0005",
        ErrorKind::MissingReturn => "E0006",
        ErrorKind::MissingMain => "E0007",
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(choice: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(choice),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = Self::error_to_codespan(file_id, error);
        self.emit(&diagnostic);
    }

    pub fn report_diagnostic(&self, file_id: usize, diagnostic: &minic_sema::Diagnostic) {
        let diagnostic = Self::semantic_to_codespan(file_id, diagnostic);
        self.emit(&diagnostic);
    }

    /// Closing line after all diagnostics of a file
    pub fn report_summary(&self, file_id: usize, count: usize) {
        let name = self.files.get(file_id).map(|f| f.name().clone()).unwrap_or_default();
        let plural = if count == 1 { "" } else { "s" };
        let diagnostic = Diagnostic::error()
            .with_message(format!("{}: rejected with {} error{}", name, count, plural));
        self.emit(&diagnostic);
    }

    /// Render a semantic diagnostic without colors
    pub fn render(&self, file_id: usize, diagnostic: &minic_sema::Diagnostic) -> String {
        let diagnostic = Self::semantic_to_codespan(file_id, diagnostic);
        let mut buffer = Buffer::no_color();
        if term::emit(&mut buffer, &self.config, &self.files, &diagnostic).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    fn emit(&self, diagnostic: &Diagnostic<usize>) {
        let mut writer = self.writer.lock();
        let _ = term::emit(&mut writer, &self.config, &self.files, diagnostic);
        let _ = writer.reset();
    }

    fn error_to_codespan(file_id: usize, error: &CompileError) -> Diagnostic<usize> {
        match error {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, *span).with_message(message)
                ]),

            CompileError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, *span).with_message(message)
                ]),

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    fn semantic_to_codespan(file_id: usize, diagnostic: &minic_sema::Diagnostic) -> Diagnostic<usize> {
        let mut labels = vec![
            Label::primary(file_id, diagnostic.span)
                .with_message(diagnostic.message.clone()),
        ];
        if let Some(previous) = diagnostic.previous {
            labels.push(
                Label::secondary(file_id, previous)
                    .with_message("previous declaration here"),
            );
        }

        Diagnostic::error()
            .with_message(diagnostic.kind.to_string())
            .with_code(error_code(diagnostic.kind))
            .with_labels(labels)
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_code_and_previous_label() {
        let source = "int der();\nint der();\n";
        let mut reporter = DiagnosticReporter::with_color(ColorChoice::Never);
        let file_id = reporter.add_file("dup.c", source);

        let diagnostic = minic_sema::Diagnostic::new(
            ErrorKind::DuplicateDeclaration,
            Span::new(11, 21),
            "redeclaration of function 'der' is not allowed",
        )
        .with_previous(Span::new(0, 10));

        let rendered = reporter.render(file_id, &diagnostic);
        assert!(rendered.contains("error[E0002]: duplicate declaration"));
        assert!(rendered.contains("dup.c:2:1"));
        assert!(rendered.contains("previous declaration here"));
    }
}
