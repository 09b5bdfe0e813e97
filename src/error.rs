//! Error taxonomy
//!
//! One `thiserror` enum per fallible boundary, matching the granularity of
//! the callers that need to distinguish failure modes. There is no generic
//! "everything" error type inside the library; `anyhow` is only introduced at
//! the CLI boundary (`src/bin/qr_factor.rs`).

/// Errors raised while validating a [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `alpha` was zero.
    #[error("alpha must be positive")]
    AlphaZero,
    /// `beta` was zero.
    #[error("beta must be positive")]
    BetaZero,
    /// `beta` is not a multiple of `alpha`.
    #[error("beta ({beta}) must be a multiple of alpha ({alpha})")]
    BetaNotMultipleOfAlpha {
        /// Configured column-block width.
        alpha: usize,
        /// Configured panel height.
        beta: usize,
    },
    /// `num_workers` was zero.
    #[error("num_workers must be at least 1")]
    NoWorkers,
}

/// Errors raised while loading or saving a matrix as text.
#[derive(Debug, thiserror::Error)]
pub enum MatrixIoError {
    /// The underlying file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A row had a different number of columns than the first row.
    #[error("ragged row {row}: expected {expected} columns, found {found}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count actually found.
        found: usize,
    },
    /// A token could not be parsed as an `f64`.
    #[error("row {row}, col {col}: invalid number {token:?}")]
    InvalidNumber {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        col: usize,
        /// The offending token.
        token: String,
    },
    /// The file contained no numeric rows.
    #[error("matrix file is empty")]
    Empty,
}

/// Errors raised by [`crate::factorize`].
#[derive(Debug, thiserror::Error)]
pub enum FactorizeError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Matrix dimensions were non-positive, or did not match the config.
    #[error("invalid matrix dimensions: rows={rows}, cols={cols}")]
    BadDimensions {
        /// Row count supplied.
        rows: usize,
        /// Column count supplied.
        cols: usize,
    },
    /// A worker thread panicked; its payload (if a string) is captured here.
    #[error("worker thread panicked: {0}")]
    WorkerPanicked(String),
}
