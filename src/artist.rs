//! Artist token extraction.
//!
//! Album directories repeat the artist verbatim in every track name. A word
//! counts as common when every filename of the batch contains it; runs of
//! adjacent common words are preferred over isolated ones so that stopwords
//! like "the" do not win on their own.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Extract the longest run of words shared by every name in the batch.
///
/// Returns an empty string when no run exists or the batch has fewer than
/// two names (with a single file every word is trivially common).
pub fn extract_artist<S: AsRef<str>>(names: &[S]) -> String {
    if names.len() < 2 {
        return String::new();
    }

    let tokenized: Vec<Vec<&str>> = names
        .iter()
        .map(|n| n.as_ref().split_whitespace().collect())
        .collect();

    // Presence per filename, not total occurrences
    let mut word_counts: FxHashMap<&str, usize> = FxHashMap::default();
    for words in &tokenized {
        let distinct: FxHashSet<&str> = words.iter().copied().collect();
        for word in distinct {
            *word_counts.entry(word).or_insert(0) += 1;
        }
    }
    let common: FxHashSet<&str> = word_counts
        .into_iter()
        .filter(|&(_, count)| count == names.len())
        .map(|(word, _)| word)
        .collect();

    if common.is_empty() {
        return String::new();
    }

    let mut longest = String::new();
    for words in &tokenized {
        let Some(&last) = words.last() else {
            continue;
        };

        let mut current = String::new();
        for pair in words.windows(2) {
            if common.contains(pair[0]) && common.contains(pair[1]) {
                current.push(' ');
                current.push_str(pair[0]);
            } else {
                keep_longer(&mut longest, &mut current);
            }
        }
        // Trailing common word that never started a pair
        if common.contains(last) {
            current.push(' ');
            current.push_str(last);
        }
        keep_longer(&mut longest, &mut current);
    }

    let artist = longest.trim().to_string();
    debug!(artist = %artist, names = names.len(), "Extracted artist token");
    artist
}

fn keep_longer(longest: &mut String, current: &mut String) {
    if current.chars().count() > longest.chars().count() {
        *longest = std::mem::take(current);
    } else {
        current.clear();
    }
}

/// Delete every occurrence of the artist token. An empty token is a no-op.
pub fn strip_artist(name: &str, artist: &str) -> String {
    if artist.is_empty() {
        name.to_string()
    } else {
        name.replace(artist, "")
    }
}

/// Artist token cached together with the names it was computed from.
/// A lookup with different names recomputes the token.
#[derive(Debug, Default)]
pub struct ArtistCache {
    source: Option<Vec<String>>,
    token: String,
}

impl ArtistCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_for(&mut self, names: &[String]) -> &str {
        let fresh = self.source.as_deref() == Some(names);
        if !fresh {
            self.token = extract_artist(names);
            self.source = Some(names.to_vec());
        }
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_artist_basic() {
        let names = ["Artist Name - Track1.mp3", "Artist Name - Track2.mp3"];
        assert_eq!(extract_artist(&names), "Artist Name");
    }

    #[test]
    fn test_extract_artist_no_common_words() {
        let names = ["Alpha Beta.mp3", "Gamma Delta.mp3"];
        assert_eq!(extract_artist(&names), "");
    }

    #[test]
    fn test_extract_artist_single_name() {
        assert_eq!(extract_artist(&["Artist Name - Track One.mp3"]), "");
        assert_eq!(extract_artist::<&str>(&[]), "");
    }

    #[test]
    fn test_extract_artist_ignores_isolated_common_word() {
        // "the" is in every name but never next to another common word
        let names = [
            "01 the Song.mp3",
            "02 Another the Tune.mp3",
            "03 Last the One.mp3",
        ];
        assert_eq!(extract_artist(&names), "");
    }

    #[test]
    fn test_extract_artist_counts_presence_not_occurrences() {
        // "Echo" twice in one name must not make it common
        let names = ["Echo Echo Band - A.mp3", "The Band - B.mp3"];
        assert_eq!(extract_artist(&names), "Band");
    }

    #[test]
    fn test_extract_artist_trailing_word() {
        let names = ["Intro by Daft Punk", "Outro by Daft Punk"];
        assert_eq!(extract_artist(&names), "by Daft Punk");
    }

    #[test]
    fn test_strip_artist() {
        assert_eq!(strip_artist("Artist - Song.mp3", "Artist"), " - Song.mp3");
        assert_eq!(strip_artist("Abc Abc", "Abc"), " ");
        assert_eq!(strip_artist("Song.mp3", ""), "Song.mp3");
    }

    #[test]
    fn test_artist_cache_recomputes_on_new_names() {
        let mut cache = ArtistCache::new();
        let first = vec!["A B - x".to_string(), "A B - y".to_string()];
        assert_eq!(cache.token_for(&first), "A B");
        assert_eq!(cache.token_for(&first), "A B");

        let second = vec!["C D - x".to_string(), "C D - y".to_string()];
        assert_eq!(cache.token_for(&second), "C D");
    }
}
