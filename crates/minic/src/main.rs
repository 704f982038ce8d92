//! minic - declaration consistency checker for a small C subset
//!
//! Usage: minic [OPTIONS] <inputs>...

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser as ClapParser;
use log::LevelFilter;
use minic::common::{CompileError, DiagnosticReporter};
use minic::driver::{CheckOptions, Checker};
use minic_sema::AnalyzerConfig;
use simple_logger::SimpleLogger;

#[derive(ClapParser, Debug)]
#[command(name = "minic")]
#[command(version)]
#[command(about = "Checks declaration consistency of minic translation units", long_about = None)]
struct Args {
    /// Source files; each is checked with its own symbol table
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Reject units that do not define a `main` function
    #[arg(long)]
    require_main: bool,

    /// Extra routine callable without a prototype (repeatable)
    #[arg(long = "builtin", value_name = "NAME")]
    builtins: Vec<String>,

    /// Do not pre-declare printf and scanf
    #[arg(long)]
    no_default_builtins: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump the symbol table after analysis
    #[arg(long)]
    dump_symbols: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn analyzer_config(&self) -> AnalyzerConfig {
        let base = if self.no_default_builtins {
            AnalyzerConfig::bare()
        } else {
            AnalyzerConfig::default()
        };
        self.builtins
            .iter()
            .fold(base, |config, name| config.with_builtin(name.as_str()))
            .with_require_main(self.require_main)
    }

    fn check_options(&self) -> CheckOptions {
        CheckOptions {
            dump_tokens: self.dump_tokens,
            dump_ast: self.dump_ast,
            dump_symbols: self.dump_symbols,
            verbose: self.verbose,
            analyzer: self.analyzer_config(),
        }
    }
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns whether every input was accepted
fn run(args: &Args) -> anyhow::Result<bool> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("failed to initialize logger")?;

    let checker = Checker::new(args.check_options());
    let mut reporter = DiagnosticReporter::new();
    let mut all_accepted = true;

    for input in &args.inputs {
        match checker.check_file(input, &mut reporter) {
            Ok(accepted) => all_accepted &= accepted,
            Err(CompileError::Io(e)) => {
                return Err(e).with_context(|| format!("failed to read {}", input.display()));
            }
            // Already reported with source context
            Err(_) => all_accepted = false,
        }
    }

    Ok(all_accepted)
}
