//! Engine configuration.
//!
//! Built once by the binary from its arguments and passed down by reference.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_extension, CleanOptions};

pub const DEFAULT_THRESHOLD: f64 = 0.71;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LYRIC_EXTENSION: &str = ".lrc";

/// Amount a raise/lower decision moves the threshold by.
pub const THRESHOLD_STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum score for a lyric file to be accepted. Never clamped.
    pub similarity_threshold: f64,
    /// Number of threshold adjustments before giving up
    pub max_attempts: u32,
    /// Extension given to renamed lyric files, with leading dot
    pub target_extension: String,
    pub clean: CleanOptions,
    pub auto_accept: bool,
    /// Accepting prints the plan without renaming anything
    pub dry_run: bool,
    /// Validate song targets against the directory before the first rename
    pub preflight: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_THRESHOLD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            target_extension: DEFAULT_LYRIC_EXTENSION.to_string(),
            clean: CleanOptions::default(),
            auto_accept: false,
            dry_run: false,
            preflight: false,
        }
    }
}

impl MatchConfig {
    pub fn with_target_extension(mut self, ext: &str) -> Self {
        let normalized = normalize_extension(ext);
        self.target_extension = if normalized.is_empty() {
            DEFAULT_LYRIC_EXTENSION.to_string()
        } else {
            normalized
        };
        self
    }
}
