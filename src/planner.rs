//! Rename plan construction.
//!
//! Lyric targets are derived from the cleaned audio name and made unique
//! against everything already in the directory plus everything claimed
//! earlier in the same batch, by appending "(n)" before the extension.
//!
//! When several audio names pick the same lyric file, the last one scored
//! keeps it; the lyric file keeps the position of its first claim.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::models::RenameEntry;
use crate::normalize::strip_extension;

/// Accepted (lyric file, cleaned audio name) pairs of one round.
#[derive(Debug, Default)]
pub struct LyricClaims {
    pairs: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl LyricClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `cleaned_audio` matched `lyric`. A later claim on the same
    /// lyric file replaces the earlier audio name.
    pub fn claim(&mut self, lyric: &str, cleaned_audio: &str) {
        match self.index.get(lyric) {
            Some(&i) => {
                let previous = std::mem::replace(&mut self.pairs[i].1, cleaned_audio.to_string());
                debug!(lyric, previous = %previous, audio = cleaned_audio, "Lyric file reclaimed");
            }
            None => {
                self.index.insert(lyric.to_string(), self.pairs.len());
                self.pairs.push((lyric.to_string(), cleaned_audio.to_string()));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(l, a)| (l.as_str(), a.as_str()))
    }
}

pub struct RenamePlanner {
    target_extension: String,
    /// Names on disk plus targets claimed in this batch
    taken: FxHashSet<String>,
    /// Lyric files that already have an entry
    planned: FxHashSet<String>,
    entries: Vec<RenameEntry>,
}

impl RenamePlanner {
    pub fn new<I, S>(existing: I, target_extension: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_extension: target_extension.to_string(),
            taken: existing.into_iter().map(Into::into).collect(),
            planned: FxHashSet::default(),
            entries: Vec::new(),
        }
    }

    /// Plan the rename of `lyric` after `cleaned_audio`.
    ///
    /// Returns `None` when `lyric` already has an entry. Resolve competing
    /// claims with [`LyricClaims`] first.
    pub fn plan(&mut self, lyric: &str, cleaned_audio: &str) -> Option<&RenameEntry> {
        if !self.planned.insert(lyric.to_string()) {
            debug!(lyric, audio = cleaned_audio, "Lyric file already planned, skipping");
            return None;
        }

        let stem = strip_extension(cleaned_audio);
        let mut target = format!("{}{}", stem, self.target_extension);
        let mut counter = 1u32;
        // A file keeps its own name even though that name is on disk
        while target != lyric && self.taken.contains(&target) {
            target = format!("{}({}){}", stem, counter, self.target_extension);
            counter += 1;
        }
        if counter > 1 {
            debug!(lyric, target = %target, "Resolved lyric target collision");
        }

        self.taken.insert(target.clone());
        self.entries.push(RenameEntry::new(lyric, target));
        self.entries.last()
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn finish(self) -> Vec<RenameEntry> {
        self.entries
    }
}

/// One entry per audio file, raw name to cleaned name, identity included.
pub fn song_renames(raw: &[String], cleaned: &[String]) -> Vec<RenameEntry> {
    raw.iter()
        .zip(cleaned)
        .map(|(from, to)| RenameEntry::new(from.as_str(), to.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_gets_counter_suffix() {
        let mut planner = RenamePlanner::new(["x.lrc", "y.lrc"], ".lrc");
        assert_eq!(planner.plan("x.lrc", "Song.mp3").unwrap().to, "Song.lrc");
        assert_eq!(planner.plan("y.lrc", "Song.m4a").unwrap().to, "Song(1).lrc");
        let targets: Vec<String> = planner.finish().into_iter().map(|e| e.to).collect();
        assert_eq!(targets, vec!["Song.lrc", "Song(1).lrc"]);
    }

    #[test]
    fn test_existing_file_on_disk_is_avoided() {
        let mut planner =
            RenamePlanner::new(["Song.lrc", "Song(1).lrc", "other.lrc"], ".lrc");
        assert_eq!(planner.plan("other.lrc", "Song.mp3").unwrap().to, "Song(2).lrc");
    }

    #[test]
    fn test_lyric_already_named_correctly_keeps_name() {
        let mut planner = RenamePlanner::new(["Song.lrc"], ".lrc");
        let entry = planner.plan("Song.lrc", "Song.mp3").unwrap();
        assert!(entry.is_identity());
    }

    #[test]
    fn test_lyric_planned_once() {
        let mut planner = RenamePlanner::new(["a.lrc"], ".lrc");
        assert!(planner.plan("a.lrc", "First.mp3").is_some());
        assert!(planner.plan("a.lrc", "Second.mp3").is_none());
        assert_eq!(planner.entries().len(), 1);
        assert_eq!(planner.entries()[0].to, "First.lrc");
    }

    #[test]
    fn test_last_claim_wins_first_position_kept() {
        let mut claims = LyricClaims::new();
        claims.claim("a.lrc", "First.mp3");
        claims.claim("b.lrc", "Other.mp3");
        claims.claim("a.lrc", "Second.mp3");

        assert_eq!(claims.len(), 2);
        let pairs: Vec<(&str, &str)> = claims.iter().collect();
        assert_eq!(pairs, vec![("a.lrc", "Second.mp3"), ("b.lrc", "Other.mp3")]);
    }

    #[test]
    fn test_targets_unique_across_batch() {
        let lyrics: Vec<String> = (0..5).map(|i| format!("l{}.lrc", i)).collect();
        let mut planner = RenamePlanner::new(lyrics.iter().cloned(), ".txt");
        for lyric in &lyrics {
            planner.plan(lyric, "Same.flac");
        }
        let entries = planner.finish();
        let unique: FxHashSet<&str> = entries.iter().map(|e| e.to.as_str()).collect();
        assert_eq!(unique.len(), entries.len());
        assert_eq!(entries[4].to, "Same(4).txt");
    }

    #[test]
    fn test_song_renames_one_to_one() {
        let raw = vec!["a [x1].mp3".to_string(), "b.mp3".to_string()];
        let cleaned = vec!["a.mp3".to_string(), "b.mp3".to_string()];
        let entries = song_renames(&raw, &cleaned);
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_identity());
        assert!(entries[1].is_identity());
    }
}
