//! Filename normalization for audio tracks.
//!
//! Cleaning only ever deletes characters and always keeps the extension, so
//! the cleaned name of `x.mp3` still ends in `.mp3`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Ripping artefacts: bracketed ASCII alphanumerics with at least one digit,
/// e.g. "[as238]", "[USL1276]". Letter-only tags like "[live]" are kept.
pub static TAG_ARTEFACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Za-z0-9]*[0-9][A-Za-z0-9]*\]").unwrap());

/// Explicit rating markers, exact case only.
pub static RATING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[E\]|\[e\]").unwrap());

pub static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Separator run right before the extension: "Song - .mp3" → "Song.mp3"
pub static PUNCTUATION_BEFORE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s.\-_]+(\.[a-zA-Z0-9]+)$").unwrap());

/// Edge characters trimmed after whitespace, in order.
const EDGE_TRIMS: [char; 4] = ['-', '_', '.', '-'];

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Remove ripping artefacts and explicit rating markers
    pub strip_tags: bool,
    /// Remove separator runs in front of the extension
    pub strip_punctuation: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            strip_tags: true,
            strip_punctuation: true,
        }
    }
}

// ============================================================================
// CLEANING
// ============================================================================

/// Clean a raw audio filename into its canonical form.
///
/// The cleaning pass is repeated until the name stops changing, which makes
/// the function idempotent: trimming a leading "-" can expose whitespace, and
/// removing a tag can leave a new one behind ("[[a1]2]" → "[2]").
///
/// A pass that would empty the name or change its extension is discarded,
/// so "[as238].mp3" stays as it is rather than becoming "mp3".
pub fn clean_filename(name: &str, options: &CleanOptions) -> String {
    let mut current = name.to_string();
    loop {
        let next = clean_once(&current, options);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(name: &str, options: &CleanOptions) -> String {
    let result = clean_pass(name, options);
    if result.is_empty() || split_extension(&result).1 != split_extension(name).1 {
        return name.to_string();
    }
    result
}

fn clean_pass(name: &str, options: &CleanOptions) -> String {
    let mut result = name.to_string();

    if options.strip_tags {
        result = TAG_ARTEFACT.replace_all(&result, "").to_string();
        result = RATING_MARKER.replace_all(&result, "").to_string();
    }

    result = MULTI_SPACE.replace_all(&result, " ").to_string();

    let mut trimmed = result.trim();
    for c in EDGE_TRIMS {
        trimmed = trimmed.trim_matches(c);
    }
    result = trimmed.to_string();

    if options.strip_punctuation {
        result = PUNCTUATION_BEFORE_EXTENSION
            .replace(&result, "$1")
            .to_string();
    }

    result
}

// ============================================================================
// EXTENSION HELPERS
// ============================================================================

/// Split a filename into stem and extension (extension keeps its dot).
/// Leading dots never start an extension: ".hidden" → (".hidden", "").
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => name.split_at(leading_dots + idx),
        None => (name, ""),
    }
}

pub fn strip_extension(name: &str) -> &str {
    split_extension(name).0
}

/// "lrc", ".lrc" and " .lrc " all become ".lrc".
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(".{}", trimmed)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(name: &str) -> String {
        clean_filename(name, &CleanOptions::default())
    }

    #[test]
    fn test_bracket_selectivity() {
        assert_eq!(clean("track [as12] - Song.mp3"), "track - Song.mp3");
        assert_eq!(clean("Song [feat. Artist].mp3"), "Song [feat. Artist].mp3");
        assert_eq!(clean("Song [live].mp3"), "Song [live].mp3");
        assert_eq!(clean("Song [USL1276].flac"), "Song.flac");
    }

    #[test]
    fn test_rating_markers() {
        assert_eq!(clean("Song [E].mp3"), "Song.mp3");
        assert_eq!(clean("Song [e].mp3"), "Song.mp3");
        assert_eq!(clean("Song [Explicit].mp3"), "Song [Explicit].mp3");
    }

    #[test]
    fn test_separator_cleanup() {
        assert_eq!(clean("  Song   Name  .mp3"), "Song Name.mp3");
        assert_eq!(clean("- Song.mp3"), "Song.mp3");
        assert_eq!(clean("__Song__.mp3"), "Song.mp3");
        assert_eq!(clean("Song - .mp3"), "Song.mp3");
        assert_eq!(clean("Song_.m4a"), "Song.m4a");
    }

    #[test]
    fn test_options_disable_steps() {
        let keep_tags = CleanOptions {
            strip_tags: false,
            strip_punctuation: true,
        };
        assert_eq!(clean_filename("Song [E].mp3", &keep_tags), "Song [E].mp3");

        let keep_punctuation = CleanOptions {
            strip_tags: true,
            strip_punctuation: false,
        };
        assert_eq!(clean_filename("Song [a1] .mp3", &keep_punctuation), "Song .mp3");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "track [as12] - Song.mp3",
            "- [a1] Song.mp3",
            "[[ab1]] Song.mp3",
            "[[a1]2] Song.mp3",
            "- .mp3",
            "Artist Name - Track One [as12].mp3",
            "...Song...",
            "  _-Song [E] - .flac",
            "Song [feat. Artist].mp3",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_extension_preserved() {
        let samples = [
            "Song [E].mp3",
            "a [b2] c.FLAC",
            "x - y.ogg",
            "[as238].mp3",
            "[E].flac",
            "- .mp3",
            "- [a1].mp3",
        ];
        for sample in samples {
            let (_, before) = split_extension(sample);
            let cleaned = clean(sample);
            let (stem, after) = split_extension(&cleaned);
            assert_eq!(before, after, "extension changed for {:?}", sample);
            assert!(!stem.is_empty(), "stem emptied for {:?}", sample);
        }
    }

    #[test]
    fn test_stem_that_cleans_away_is_kept() {
        assert_eq!(clean("[as238].mp3"), "[as238].mp3");
        assert_eq!(clean("[E].flac"), "[E].flac");
        assert_eq!(clean("- .mp3"), "- .mp3");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("Song.mp3"), ("Song", ".mp3"));
        assert_eq!(split_extension("a.b.lrc"), ("a.b", ".lrc"));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(strip_extension("Artist - Song.mp3"), "Artist - Song");
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("lrc"), ".lrc");
        assert_eq!(normalize_extension(".lrc"), ".lrc");
        assert_eq!(normalize_extension(" .txt "), ".txt");
        assert_eq!(normalize_extension(""), "");
    }
}
