//! Pipeline orchestration: lexing, parsing, semantic analysis, and IR
//! generation wired together the way `gsc build`/`gsc check` need them.
//!
//! The only `IrBuilder` this crate links against is
//! [`gsc_ir::recording::RecordingIrBuilder`] - the reference implementation
//! the rest of the corpus tests its IR generator against, and the backend
//! `gsc build` lowers to until a real code generator exists.

use std::path::{Path, PathBuf};

use gsc_ir::recording::RecordingIrBuilder;
use gsc_ir::{IrBuilder, Module};
use gsc_lex::FileSource;
use gsc_par::{Node, Parser};
use gsc_util::diagnostic::{Diagnostic, Level};
use gsc_util::Handler;

use crate::error::{DrvError, Result};

/// One `.gs` file's result through semantic analysis: its annotated AST
/// plus every diagnostic the lexer, parser, and semantic analyzer reported.
pub struct CheckReport {
    pub path: PathBuf,
    pub module: Node,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.level == Level::Error).count()
    }
}

/// One `.gs` file's result through IR generation. `module` is the compiled
/// artifact - empty (no records, no function-pointer table) when `check`
/// already reported errors, since generation never runs against a module
/// semantic analysis rejected.
pub struct BuildReport {
    pub check: CheckReport,
    pub module: Module<<RecordingIrBuilder as IrBuilder>::Fragment>,
}

impl BuildReport {
    pub fn has_errors(&self) -> bool {
        self.check.has_errors()
    }
}

/// Runs the pipeline through semantic analysis only: lex, parse, analyze.
/// No IR is generated, so this is the fast path `gsc check` exists for.
pub fn check(path: &Path) -> Result<CheckReport> {
    validate_source_path(path)?;

    let handler = Handler::new();
    let source = FileSource::open(path)?;
    let mut parser = Parser::new(source, &handler);
    let mut module = parser.parse();
    gsc_sem::analyze(&mut module, &handler);

    Ok(CheckReport { path: path.to_path_buf(), module, diagnostics: handler.diagnostics() })
}

/// Runs the full pipeline: lex, parse, analyze, then (if analysis reported
/// no errors) IR generation.
pub fn build(path: &Path) -> Result<BuildReport> {
    let report = check(path)?;
    if report.has_errors() {
        return Ok(BuildReport { module: Module::new(), check: report });
    }

    let handler = Handler::new();
    let mut builder = RecordingIrBuilder::new();
    let mut target = Module::new();
    gsc_ir::generate(&report.module, &mut builder, &mut target, &handler);

    let mut diagnostics = report.diagnostics;
    diagnostics.extend(handler.diagnostics());
    Ok(BuildReport { check: CheckReport { diagnostics, ..report }, module: target })
}

fn validate_source_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DrvError::Validation(format!("source path does not exist: {}", path.display())));
    }
    if !path.is_file() {
        return Err(DrvError::Validation(format!("source path is not a file: {}", path.display())));
    }
    Ok(())
}

/// Collects every `.gs` file under `path`, or `path` itself if it is
/// already a single file. Directory traversal recurses into
/// subdirectories, skipping any entry whose name starts with `.`.
pub fn discover_sources(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(DrvError::Validation(format!("source path does not exist: {}", path.display())));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sources = Vec::new();
    collect_gs_files(path, &mut sources)?;
    sources.sort();
    Ok(sources)
}

fn collect_gs_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_hidden = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with('.'));
        if is_hidden {
            continue;
        }

        if path.is_dir() {
            collect_gs_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("gs") {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_reports_no_errors_for_valid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.gs");
        std::fs::write(&path, "package \"test\"; public int32 main() { return 0; }").unwrap();

        let report = check(&path).unwrap();
        assert!(!report.has_errors());
    }

    #[test]
    fn test_check_reports_parser_errors_for_invalid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.gs");
        std::fs::write(&path, "this is not gunderscript at all {{{").unwrap();

        let report = check(&path).unwrap();
        assert!(report.has_errors());
    }

    #[test]
    fn test_check_on_missing_file_errors() {
        let result = check(Path::new("/nonexistent/main.gs"));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_generates_a_module_for_valid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.gs");
        std::fs::write(&path, "package \"test\"; public int32 main() { return 0; }").unwrap();

        let report = build(&path).unwrap();
        assert!(!report.has_errors());
        assert_eq!(report.module.records().len(), 1);
    }

    #[test]
    fn test_build_skips_ir_generation_after_check_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.gs");
        std::fs::write(&path, "this is not gunderscript at all {{{").unwrap();

        let report = build(&path).unwrap();
        assert!(report.has_errors());
        assert!(report.module.records().is_empty());
    }

    #[test]
    fn test_discover_sources_finds_nested_gs_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.gs"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b.gs"), "").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "").unwrap();

        let sources = discover_sources(dir.path()).unwrap();
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_discover_sources_on_a_single_file_returns_just_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.gs");
        std::fs::write(&path, "").unwrap();

        let sources = discover_sources(&path).unwrap();
        assert_eq!(sources, vec![path]);
    }
}
