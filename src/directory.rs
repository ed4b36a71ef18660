//! Directory listing and classification of entries into audio and lyric files.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Batch;

/// Audio extensions recognised as tracks (compared case-insensitively).
pub const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".m4a", ".wav", ".flac", ".ogg", ".aac", ".wma"];

/// Names of the regular files directly inside `dir`, sorted.
/// Subdirectories are ignored; non-UTF-8 names are skipped with a warning.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "Skipping file with non-UTF-8 name"),
        }
    }
    names.sort();
    Ok(names)
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() > ext.len()
        && name.is_char_boundary(name.len() - ext.len())
        && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
}

pub fn is_audio_file(name: &str) -> bool {
    AUDIO_EXTENSIONS.iter().any(|ext| has_extension(name, ext))
}

/// Split names into (audio, lyrics), keeping input order.
pub fn classify<S: AsRef<str>>(names: &[S], lyric_extension: &str) -> (Vec<String>, Vec<String>) {
    let mut audio = Vec::new();
    let mut lyrics = Vec::new();
    for name in names {
        let name = name.as_ref();
        if is_audio_file(name) {
            audio.push(name.to_string());
        } else if !lyric_extension.is_empty() && has_extension(name, lyric_extension) {
            lyrics.push(name.to_string());
        }
    }
    (audio, lyrics)
}

/// List `dir` once and build the batch every round works on.
pub fn load_batch(dir: &Path, lyric_extension: &str) -> Result<Batch> {
    let names = list_file_names(dir)?;
    let (audio, lyrics) = classify(&names, lyric_extension);
    debug!(
        audio = audio.len(),
        lyrics = lyrics.len(),
        other = names.len() - audio.len() - lyrics.len(),
        "Loaded directory"
    );
    Ok(Batch::new(audio, lyrics, names.into_iter().collect()))
}
