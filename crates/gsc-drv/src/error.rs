//! Error handling for the `gsc` driver.
//!
//! Structured error types using `thiserror`, following the same shape as
//! the corpus's own CLI error taxonomy: one variant per driver-level
//! failure category, with `Io`/`Source` errors captured via `#[from]`.
//! Diagnostics the compiler pipeline itself reports (parse/semantic
//! errors) are not driver errors; they're returned as `Diagnostic`s and
//! printed by the command layer instead.

use thiserror::Error;

/// Main error type for the `gsc` driver.
#[derive(Error, Debug)]
pub enum DrvError {
    /// A configuration file could not be found, read, or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A source path was missing, not a `.gs` file, or not a directory.
    #[error("validation error: {0}")]
    Validation(String),

    /// Reading a source file off disk failed.
    #[error("source error: {0}")]
    Source(#[from] gsc_lex::SourceError),

    /// Any other filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`DrvError`].
pub type Result<T> = std::result::Result<T, DrvError>;
