//! Shared formatting and message constants for `gsc` subcommands.

use std::path::Path;

use gsc_util::diagnostic::{Diagnostic, Level};

/// Formats one diagnostic as `<file>:<line>:<column>: <code>: <message>`,
/// falling back to the diagnostic's level when it carries no code (internal
/// lexer/parser/semantic/ir codes always set one; the fallback only ever
/// fires for a diagnostic built by hand without `.code(...)`).
pub fn format_diagnostic(path: &Path, diag: &Diagnostic) -> String {
    let code = diag.code.map(|c| c.as_str()).unwrap_or_else(|| level_label(diag.level));
    format!("{}:{}:{}: {}: {}", path.display(), diag.span.line, diag.span.column, code, diag.message)
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warning => "warning",
        Level::Note => "note",
        Level::Help => "help",
        Level::Bug => "bug",
    }
}

/// Standard output message templates, mirroring the corpus's own
/// emoji-tagged progress lines.
pub mod output_messages {
    pub const INFO: &str = "ℹ️";
    pub const OK: &str = "✅";
    pub const ERROR: &str = "❌";
}

/// Standard error message fragments shared across commands.
pub mod error_messages {
    pub const SOURCE_PATH_NOT_EXIST: &str = "source path does not exist:";
    pub const NO_SOURCES_FOUND: &str = "no .gs files found under";
}
