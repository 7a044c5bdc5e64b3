//! Compiler error types.
//!
//! Fragment-level resolution failures are recovered locally (the fragment is
//! skipped); everything here is fatal to the compile that raised it.

use std::path::PathBuf;
use thiserror::Error;

/// A failure raised by one of the pluggable transformers (LESS compiler or
/// JS minifier).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(pub String);

/// Fatal compiler errors.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// Missing or invalid required configuration field. Surfaced
    /// immediately, never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// The LESS compiler or JS minifier black box failed. No
    /// partial-content fallback.
    #[error("transform failed")]
    Transform(#[from] TransformError),

    /// Filesystem initialization or write failure. Fail-closed: a missing
    /// cached asset breaks page rendering, so the caller decides the
    /// user-facing behavior.
    #[error("storage failure at `{path}`")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
