//! Check pipeline: lex, parse, analyze, report

use std::path::Path;

use minic_sema::sema::{Origin, Symbol, SymbolKind, SymbolState};
use minic_sema::{AnalysisResult, AnalyzerConfig, DeclarationResolver};

use crate::common::{CompileResult, DiagnosticReporter};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Options for checking one or more translation units
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_symbols: bool,
    pub verbose: bool,
    pub analyzer: AnalyzerConfig,
}

/// Runs the pipeline over translation units, one fresh symbol table each
pub struct Checker {
    options: CheckOptions,
}

impl Checker {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    /// Read, register and check a file. Returns whether it was accepted.
    pub fn check_file(&self, path: &Path, reporter: &mut DiagnosticReporter) -> CompileResult<bool> {
        let source = std::fs::read_to_string(path)?;
        let filename = path.display().to_string();
        let file_id = reporter.add_file(filename.clone(), source.clone());

        let result = self.check_source(&source, &filename, reporter, file_id)?;
        if result.is_accepted() {
            if self.options.verbose {
                eprintln!("{}: ok", filename);
            }
        } else {
            reporter.report_summary(file_id, result.diagnostics.len());
        }
        Ok(result.is_accepted())
    }

    /// Check source text already registered with the reporter under `file_id`.
    ///
    /// Lexer and parser errors are reported and returned; semantic
    /// diagnostics are reported and collected in the result.
    pub fn check_source(
        &self,
        source: &str,
        filename: &str,
        reporter: &DiagnosticReporter,
        file_id: usize,
    ) -> CompileResult<AnalysisResult> {
        // Phase 1: Lexing (optional token dump)
        if self.options.dump_tokens {
            match Lexer::new(source).tokenize_all() {
                Ok(tokens) => {
                    eprintln!("=== Tokens: {} ===", filename);
                    for token in &tokens {
                        eprintln!("{:?}", token);
                    }
                    eprintln!("=== End Tokens ===\n");
                }
                Err(e) => {
                    reporter.report_error(file_id, &e);
                    return Err(e);
                }
            }
        }

        // Phase 2: Parsing
        log::info!("parsing {}", filename);
        let tu = match Parser::new(source).and_then(|mut parser| parser.parse()) {
            Ok(tu) => tu,
            Err(e) => {
                reporter.report_error(file_id, &e);
                return Err(e);
            }
        };

        if self.options.dump_ast {
            eprintln!("=== AST: {} ===", filename);
            eprintln!("{:#?}", tu);
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic analysis
        log::info!("analyzing {} ({} items)", filename, tu.items.len());
        let mut resolver = DeclarationResolver::new(self.options.analyzer.clone());
        let result = resolver.analyze(&tu);

        if self.options.dump_symbols {
            eprintln!("=== Symbols: {} ===", filename);
            if resolver.symbols().is_empty() {
                eprintln!("(none)");
            }
            for (name, symbol) in resolver.symbols().iter() {
                eprintln!("{}", describe_symbol(name, symbol));
            }
            eprintln!("=== End Symbols ===\n");
        }

        for diagnostic in &result.diagnostics {
            reporter.report_diagnostic(file_id, diagnostic);
        }

        Ok(result)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckOptions::default())
    }
}

/// One line of the symbol dump
pub fn describe_symbol(name: &str, symbol: &Symbol) -> String {
    if symbol.kind == SymbolKind::Variable {
        return format!("{}: variable", name);
    }

    let signature = match &symbol.signature {
        Some(sig) => sig.to_string(),
        None => "(unknown signature)".to_string(),
    };
    let state = match symbol.state {
        SymbolState::Declared => "declared",
        SymbolState::Defined => "defined",
    };
    let origin = match symbol.origin {
        Origin::Source => "",
        Origin::ImplicitCall => ", implicit",
        Origin::Builtin => ", builtin",
    };
    format!("{}: function {} [{}{}]", name, signature, state, origin)
}
