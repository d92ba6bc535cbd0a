//! `gsc check` - runs the pipeline through semantic analysis only.

use std::path::PathBuf;

use tracing::info;

use crate::commands::common::format_diagnostic;
use crate::commands::traits::Command;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{self, CheckReport};

/// Arguments for the `check` subcommand.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// File or directory to check. Falls back to `config.source_dir` when
    /// omitted.
    pub path: Option<PathBuf>,
}

/// `check` command handler.
pub struct CheckCommand {
    args: CheckArgs,
    config: Config,
}

impl CheckCommand {
    pub fn with_config(args: CheckArgs, config: Config) -> Self {
        Self { args, config }
    }

    fn source_path(&self) -> PathBuf {
        self.args.path.clone().unwrap_or_else(|| PathBuf::from(&self.config.source_dir))
    }

    fn run_report(&self) -> Result<Vec<CheckReport>> {
        let root = self.source_path();
        let sources = pipeline::discover_sources(&root)?;

        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            info!(file = %source.display(), "checking");
            reports.push(pipeline::check(&source)?);
        }
        Ok(reports)
    }
}

impl Command for CheckCommand {
    type Args = CheckArgs;

    fn new(args: Self::Args) -> Self {
        Self { args, config: Config::default() }
    }

    fn execute(&self) -> Result<i32> {
        let reports = self.run_report()?;
        let mut error_count = 0;

        for report in &reports {
            for diag in &report.diagnostics {
                eprintln!("{}", format_diagnostic(&report.path, diag));
            }
            error_count += report.error_count();
        }

        if error_count > 0 {
            Ok(1)
        } else {
            Ok(0)
        }
    }

    fn name() -> &'static str {
        "check"
    }
}

/// Runs `gsc check`, returning its exit code.
pub fn run_check(args: CheckArgs, config: Config) -> Result<i32> {
    CheckCommand::with_config(args, config).execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_command_reports_success_for_valid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.gs");
        std::fs::write(&path, "package \"test\"; public int32 main() { return 0; }").unwrap();

        let code = run_check(CheckArgs { path: Some(path) }, Config::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_check_command_reports_failure_for_invalid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.gs");
        std::fs::write(&path, "this is not gunderscript {{{").unwrap();

        let code = run_check(CheckArgs { path: Some(path) }, Config::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_check_command_falls_back_to_config_source_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.gs"), "package \"test\"; public int32 main() { return 0; }")
            .unwrap();

        let mut config = Config::default();
        config.source_dir = dir.path().to_string_lossy().to_string();

        let code = run_check(CheckArgs { path: None }, config).unwrap();
        assert_eq!(code, 0);
    }
}
