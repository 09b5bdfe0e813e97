//! Factorization parameters
//!
//! `Config` bundles the block sizes and scheduling knobs that the distilled
//! design calls `ALPHA`, `BETA`, `NUM_THREADS`, and
//! `USE_PRIORITY_MAIN_QUEUE`. It is constructed either directly, from a small
//! `key=value` config file (one assignment per line, `#` comments, parsed
//! with the same forgiving style as the CLI flag parser), or overridden
//! piecemeal by CLI flags — mirroring the precedence CLI binaries in this
//! crate's lineage use (file first, flags last).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Column-block width (`ALPHA` in the design notes).
pub const DEFAULT_ALPHA: usize = 64;
/// Panel height (`BETA` in the design notes).
pub const DEFAULT_BETA: usize = 256;
/// Default worker-thread count.
pub const DEFAULT_NUM_WORKERS: usize = 8;

/// Validated factorization configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Column-block width. Must be positive.
    pub alpha: usize,
    /// Panel height. Must be positive and a multiple of `alpha`.
    pub beta: usize,
    /// Number of worker threads to spawn. Must be at least 1.
    pub num_workers: usize,
    /// If `true`, the ready queue is priority-ordered (panel factors first,
    /// then smaller panel index). If `false`, it is plain FIFO.
    pub use_priority_queue: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            num_workers: DEFAULT_NUM_WORKERS,
            use_priority_queue: false,
        }
    }
}

impl Config {
    /// Validate block-size and worker-count constraints.
    ///
    /// This is the single point where `ALPHA`, `BETA`, and `num_workers` are
    /// checked; [`crate::factorize`] calls this before building any tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alpha == 0 {
            return Err(ConfigError::AlphaZero);
        }
        if self.beta == 0 {
            return Err(ConfigError::BetaZero);
        }
        if self.beta % self.alpha != 0 {
            return Err(ConfigError::BetaNotMultipleOfAlpha {
                alpha: self.alpha,
                beta: self.beta,
            });
        }
        if self.num_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }

    /// Load a `key=value` config file, applying each assignment on top of
    /// [`Config::default`]. Unknown keys are ignored (forward-compatible with
    /// future knobs); malformed values fall back to the default for that
    /// field rather than erroring, matching the tolerant CSV/flag loaders
    /// elsewhere in this crate's lineage.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let text = std::fs::read_to_string(path)?;
        let mut cfg = Self::default();
        for line_raw in text.lines() {
            let mut line = line_raw.trim();
            if let Some(hash) = line.find('#') {
                line = &line[..hash];
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "alpha" => {
                    if let Ok(v) = value.parse() {
                        cfg.alpha = v;
                    }
                }
                "beta" => {
                    if let Ok(v) = value.parse() {
                        cfg.beta = v;
                    }
                }
                "num_workers" => {
                    if let Ok(v) = value.parse() {
                        cfg.num_workers = v;
                    }
                }
                "use_priority_queue" => {
                    cfg.use_priority_queue = parse_bool(value);
                }
                _ => {}
            }
        }
        Ok(cfg)
    }
}

/// Parse a permissive boolean token, matching the CLI's flag conventions.
pub fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "true" | "True" | "TRUE" | "yes" | "y")
}
