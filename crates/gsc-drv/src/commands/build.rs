//! `gsc build` - runs the full pipeline through IR generation.

use std::path::PathBuf;

use tracing::info;

use crate::commands::common::format_diagnostic;
use crate::commands::traits::Command;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{self, BuildReport};

/// Arguments for the `build` subcommand.
#[derive(Debug, Clone)]
pub struct BuildArgs {
    /// File or directory to build. Falls back to `config.source_dir` when
    /// omitted.
    pub path: Option<PathBuf>,
}

/// `build` command handler.
pub struct BuildCommand {
    args: BuildArgs,
    config: Config,
}

impl BuildCommand {
    pub fn with_config(args: BuildArgs, config: Config) -> Self {
        Self { args, config }
    }

    fn source_path(&self) -> PathBuf {
        self.args.path.clone().unwrap_or_else(|| PathBuf::from(&self.config.source_dir))
    }

    fn run_report(&self) -> Result<Vec<BuildReport>> {
        let root = self.source_path();
        let sources = pipeline::discover_sources(&root)?;

        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            info!(file = %source.display(), "building");
            reports.push(pipeline::build(&source)?);
        }
        Ok(reports)
    }

    /// Prints the exported-function-count / pointer-table-length summary
    /// `gsc build` reports for each successfully compiled module. `optimize`
    /// is accepted in config but is currently a no-op: the IR generator has
    /// no optimization passes to run.
    fn print_summary(&self, report: &BuildReport) {
        println!(
            "{}: {} function(s), {} pointer-table slot(s)",
            report.check.path.display(),
            report.module.records().len(),
            report.module.function_table().len(),
        );
    }
}

impl Command for BuildCommand {
    type Args = BuildArgs;

    fn new(args: Self::Args) -> Self {
        Self { args, config: Config::default() }
    }

    fn execute(&self) -> Result<i32> {
        let reports = self.run_report()?;
        let mut error_count = 0;

        for report in &reports {
            for diag in &report.check.diagnostics {
                eprintln!("{}", format_diagnostic(&report.check.path, diag));
            }
            error_count += report.check.error_count();

            if !report.has_errors() {
                self.print_summary(report);
            }
        }

        if error_count > 0 {
            Ok(1)
        } else {
            Ok(0)
        }
    }

    fn name() -> &'static str {
        "build"
    }
}

/// Runs `gsc build`, returning its exit code.
pub fn run_build(args: BuildArgs, config: Config) -> Result<i32> {
    BuildCommand::with_config(args, config).execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_command_reports_success_for_valid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.gs");
        std::fs::write(&path, "package \"test\"; public int32 main() { return 0; }").unwrap();

        let code = run_build(BuildArgs { path: Some(path) }, Config::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_build_command_reports_failure_for_invalid_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.gs");
        std::fs::write(&path, "this is not gunderscript {{{").unwrap();

        let code = run_build(BuildArgs { path: Some(path) }, Config::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_run_report_collects_one_report_per_source_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.gs"), "package \"test\"; public int32 main() { return 0; }")
            .unwrap();
        std::fs::write(dir.path().join("b.gs"), "package \"test\"; public int32 main() { return 0; }")
            .unwrap();

        let command = BuildCommand::with_config(
            BuildArgs { path: Some(dir.path().to_path_buf()) },
            Config::default(),
        );
        let reports = command.run_report().unwrap();
        assert_eq!(reports.len(), 2);
    }
}
