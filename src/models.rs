//! Core data models for matching and rename planning.
//!
//! Everything here is created fresh for each round and thrown away once the
//! round's decision has been made.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Inputs
// ============================================================================

/// Filenames of one directory, already split into audio and lyric files.
/// Unchanged between rounds.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub audio: Vec<String>,
    pub lyrics: Vec<String>,
    /// Every entry name present in the directory (audio, lyric and other)
    pub existing: FxHashSet<String>,
}

impl Batch {
    pub fn new(audio: Vec<String>, lyrics: Vec<String>, existing: FxHashSet<String>) -> Self {
        Self {
            audio,
            lyrics,
            existing,
        }
    }

    /// Batch whose directory contains exactly the audio and lyric files.
    pub fn from_lists(audio: Vec<String>, lyrics: Vec<String>) -> Self {
        let existing = audio.iter().chain(lyrics.iter()).cloned().collect();
        Self::new(audio, lyrics, existing)
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Comparison name (cleaned, artist removed) scored against one lyric file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub query: String,
    pub lyric: String,
    pub score: f64,
}

// ============================================================================
// Rename Plan
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub from: String,
    pub to: String,
}

impl RenameEntry {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

/// Result of one scoring pass at a fixed threshold.
#[derive(Clone, Debug, Serialize)]
pub struct Round {
    pub threshold: f64,
    pub artist: String,
    /// Audio cleanup, one entry per audio file in input order
    pub song_renames: Vec<RenameEntry>,
    /// Matched lyric files, in the order their audio names were scored
    pub lyric_renames: Vec<RenameEntry>,
    /// Audio names whose best lyric candidate stayed below the threshold
    pub unmatched_audio: Vec<String>,
}

impl Round {
    pub fn summary(&self, total_audio: usize, total_lyrics: usize, attempt: u32) -> RoundSummary {
        let matches = self.lyric_renames.len();
        RoundSummary {
            threshold: self.threshold,
            attempt,
            total_audio,
            total_lyrics,
            matches,
            missed_lyrics: total_lyrics.saturating_sub(matches),
            unmatched_audio: self.unmatched_audio.len(),
            songs_changed: self
                .song_renames
                .iter()
                .filter(|e| !e.is_identity())
                .count(),
        }
    }
}

/// Counts shown to the user before asking for a decision.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSummary {
    pub threshold: f64,
    pub attempt: u32,
    pub total_audio: usize,
    pub total_lyrics: usize,
    pub matches: usize,
    pub missed_lyrics: usize,
    pub unmatched_audio: usize,
    pub songs_changed: usize,
}

/// Accepted plan as written by `--json`.
#[derive(Clone, Debug, Serialize)]
pub struct PlanExport<'a> {
    pub directory: String,
    pub dry_run: bool,
    pub summary: &'a RoundSummary,
    pub round: &'a Round,
}

impl PlanExport<'_> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
