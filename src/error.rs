//! Error type for the lrc-match library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::safety::Conflict;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Directory could not be listed
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Rename target already exists and is a different file
    #[error("cannot rename '{from}' to '{to}': target already exists")]
    Collision { from: String, to: String },

    #[error("invalid file name '{0}'")]
    InvalidFileName(String),

    /// A rename failed partway through an apply pass. Earlier renames stay applied.
    #[error("rename of '{file}' failed after {applied}/{total} renames were applied: {source}")]
    Apply {
        applied: usize,
        total: usize,
        file: String,
        #[source]
        source: Box<Error>,
    },

    #[error("preflight check found {} conflicting rename(s)", .0.len())]
    Preflight(Vec<Conflict>),

    /// A state machine operation was called in the wrong state
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
