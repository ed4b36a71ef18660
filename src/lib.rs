//! lrc-match library - matching and rename planning shared by all binaries.

pub mod apply;
pub mod artist;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod normalize;
pub mod planner;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod safety;
pub mod scoring;
pub mod search;
pub mod session;

pub use error::{Error, Result};
