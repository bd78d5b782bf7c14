// Copyright 2021-2025 Martin Pool

//! The closed set of errors the mutation core can raise.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Everything that can go wrong while discovering, applying, or testing mutants.
#[derive(Debug, Error)]
pub enum Error {
    #[error("source file not found: {path}")]
    SourceFileNotFound { path: Utf8PathBuf },

    #[error("package path not found: {path}")]
    PackagePathNotFound { path: Utf8PathBuf },

    #[error("baseline tests failed in a clean tree")]
    BaselineTestsFailed,

    #[error("no tests were executed{}", filter.as_ref().map(|f| format!(" (filter: {f})")).unwrap_or_default())]
    NoTestsExecuted { filter: Option<String> },

    #[error("failed to restore {path} from backup; the working tree may be left modified")]
    BackupRestoreFailed { path: Utf8PathBuf },

    #[error("coverage data unavailable")]
    CoverageDataUnavailable,

    #[error("invalid source file: {reason}")]
    InvalidSourceFile { reason: String },

    #[error("build error ratio {actual:.3} exceeded limit {limit:.3}")]
    BuildErrorRatioExceeded { actual: f64, limit: f64 },

    #[error("working tree is dirty: {root}")]
    WorkingTreeDirty { root: Utf8PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
