//! Terminal report for a round.
//!
//! Renames are shown as a single line per file with removed characters in
//! red and added characters in green.

use std::io::{self, Write};

use colored::Colorize;

use crate::models::{RenameEntry, Round, RoundSummary};
use crate::scoring::{opcodes, OpTag};

/// Old name with deletions in red and insertions in green, interleaved.
pub fn render_diff(old: &str, new: &str) -> String {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let slice = |chars: &[char], (start, end): (usize, usize)| -> String {
        chars[start..end].iter().collect()
    };

    let mut out = String::new();
    for op in opcodes(old, new) {
        match op.tag {
            OpTag::Equal => out.push_str(&slice(&a, op.a_range)),
            OpTag::Delete => out.push_str(&slice(&a, op.a_range).red().to_string()),
            OpTag::Insert => out.push_str(&slice(&b, op.b_range).green().to_string()),
            OpTag::Replace => {
                out.push_str(&slice(&a, op.a_range).red().to_string());
                out.push_str(&slice(&b, op.b_range).green().to_string());
            }
        }
    }
    out
}

fn write_renames<W: Write>(out: &mut W, title: &str, entries: &[RenameEntry]) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    for entry in entries {
        writeln!(out, "{}", render_diff(&entry.from, &entry.to))?;
    }
    writeln!(out)
}

/// Full round report: header, both rename lists and the totals.
pub fn write_round<W: Write>(
    out: &mut W,
    round: &Round,
    summary: &RoundSummary,
    lyric_extension: &str,
) -> io::Result<()> {
    writeln!(out, "Artist: {}", round.artist.yellow())?;
    writeln!(
        out,
        "Similarity threshold: {}\n",
        format!("{:.2}", round.threshold).yellow()
    )?;

    write_renames(out, "Proposed song renames:", &round.song_renames)?;
    write_renames(
        out,
        &format!("Proposed {} renames:", lyric_extension),
        &round.lyric_renames,
    )?;

    if !round.unmatched_audio.is_empty() {
        writeln!(out, "Songs without a lyric match:")?;
        for name in &round.unmatched_audio {
            writeln!(out, "  {}", name.red())?;
        }
        writeln!(out)?;
    }

    let lyrics = summary.total_lyrics;
    writeln!(out, "Total song files: {}", summary.total_audio.to_string().yellow())?;
    writeln!(out, "Total {} files: {}", lyric_extension, lyrics.to_string().yellow())?;
    writeln!(
        out,
        "Total proposed renames: {}",
        format!("{}/{}", summary.matches, lyrics).yellow()
    )?;
    writeln!(
        out,
        "Missed lyric files: {}\n",
        format!("{}/{}", summary.missed_lyrics, lyrics).red()
    )
}

pub fn write_adjusting<W: Write>(out: &mut W, raised: bool) -> io::Result<()> {
    if raised {
        writeln!(out, "{}", "Files not renamed, increasing match threshold...".yellow())
    } else {
        writeln!(out, "{}", "Files not renamed, lowering match threshold...".red())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_diff_plain_text() {
        plain();
        assert_eq!(render_diff("Song.mp3", "Song.mp3"), "Song.mp3");
        assert_eq!(render_diff("abc", "abXc"), "abXc");
        // Deleted characters stay visible in the diff
        assert_eq!(render_diff("Song [E].mp3", "Song.mp3"), "Song [E].mp3");
    }

    #[test]
    fn test_write_round() {
        plain();
        let round = Round {
            threshold: 0.7099999,
            artist: "Band".to_string(),
            song_renames: vec![RenameEntry::new("Band - A [x1].mp3", "Band - A.mp3")],
            lyric_renames: vec![RenameEntry::new("a.lrc", "Band - A.lrc")],
            unmatched_audio: vec![],
        };
        let summary = round.summary(1, 3, 1);

        let mut out = Vec::new();
        write_round(&mut out, &round, &summary, ".lrc").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Artist: Band"));
        assert!(text.contains("Similarity threshold: 0.71"));
        assert!(text.contains("Proposed .lrc renames:"));
        assert!(text.contains("Total proposed renames: 1/3"));
        assert!(text.contains("Missed lyric files: 2/3"));
        assert!(!text.contains("Songs without a lyric match"));
    }
}
