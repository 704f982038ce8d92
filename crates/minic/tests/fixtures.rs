use std::fs;
use std::path::{Path, PathBuf};

use minic::parser::Parser;
use minic_sema::{AnalysisResult, AnalyzerConfig, ErrorKind};
use pretty_assertions::assert_eq;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn analyze_file(path: &Path, config: &AnalyzerConfig) -> (String, AnalysisResult) {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read {:?}: {}", path, err));
    let tu = Parser::new(&source)
        .and_then(|mut parser| parser.parse())
        .unwrap_or_else(|err| panic!("failed to parse {:?}: {}", path, err));
    let result = minic_sema::analyze_with(&tu, config);
    (source, result)
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn render(source: &str, result: &AnalysisResult) -> String {
    if result.is_accepted() {
        return "<no diagnostics>\n".to_string();
    }
    let mut output = String::new();
    for diag in &result.diagnostics {
        output.push_str(&format!(
            "{}: {}: {}\n",
            line_of(source, diag.span.start),
            diag.kind,
            diag.message
        ));
    }
    output
}

fn collect_fixture_files(dir: &Path) -> Vec<PathBuf> {
    let mut fixtures: Vec<PathBuf> = fs::read_dir(dir)
        .expect("failed to read fixtures directory")
        .map(|entry| entry.expect("failed to read fixture entry").path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("c"))
        .collect();
    fixtures.sort();
    fixtures
}

#[test]
fn fixture_expectations() {
    let fixtures = collect_fixture_files(&fixtures_dir());
    assert!(!fixtures.is_empty(), "no fixtures found");

    for fixture in fixtures {
        let (source, result) = analyze_file(&fixture, &AnalyzerConfig::default());
        let actual = render(&source, &result);

        let expected_path = fixture.with_extension("expected");
        let expected = fs::read_to_string(&expected_path)
            .unwrap_or_else(|_| panic!("missing expected file {}", expected_path.display()))
            .replace("\r\n", "\n");

        assert_eq!(actual, expected, "diagnostic mismatch for {:?}", fixture);
    }
}

#[test]
fn each_file_gets_a_fresh_symbol_table() {
    let config = AnalyzerConfig::default();
    let dir = fixtures_dir();

    // Analyzing another unit first must not leak its symbols
    let _ = analyze_file(&dir.join("kinds.c"), &config);
    let (_, result) = analyze_file(&dir.join("clean.c"), &config);
    assert!(result.is_accepted());
}

#[test]
fn kind_conflict_points_at_previous_declaration() {
    let (source, result) = analyze_file(&fixtures_dir().join("kinds.c"), &AnalyzerConfig::default());

    let conflict = &result.diagnostics[0];
    assert_eq!(conflict.kind, ErrorKind::KindConflict);
    let previous = conflict.previous.expect("conflict should carry the earlier declaration");
    assert_eq!(&source[previous.start..previous.end], "a");
    assert_eq!(line_of(&source, previous.start), 1);
}

#[test]
fn require_main() {
    let dir = fixtures_dir();
    let config = AnalyzerConfig::default().with_require_main(true);

    let (_, result) = analyze_file(&dir.join("clean.c"), &config);
    assert!(result.is_accepted());

    let (_, result) = analyze_file(&dir.join("redeclaration.c"), &config);
    assert_eq!(result.count(ErrorKind::MissingMain), 1);
    assert_eq!(result.kinds().last(), Some(&ErrorKind::MissingMain));
}

#[test]
fn without_builtins_printf_is_still_an_implicit_external() {
    let (_, result) = analyze_file(&fixtures_dir().join("clean.c"), &AnalyzerConfig::bare());
    assert!(result.is_accepted());
}
