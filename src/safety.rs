//! Safety checks run before files are renamed.
//!
//! Rename targets must be plain file names inside the working directory. The
//! optional preflight pass looks for song renames that would hit a file that
//! is already there, before anything is touched.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::RenameEntry;

/// Reject empty names, "." / "..", and anything with a path separator.
pub fn validate_file_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConflictKind {
    /// Target already exists on disk and is not the file being renamed
    ExistingFile,
    /// Two entries of the batch want the same target
    DuplicateTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub from: String,
    pub to: String,
    pub kind: ConflictKind,
}

/// Two-phase check for song renames: every non-identity target must be free
/// on disk and unique within the batch. Lyric renames are collision-free by
/// construction and are not checked here.
pub fn preflight(song_renames: &[RenameEntry], existing: &FxHashSet<String>) -> Result<()> {
    let mut conflicts = Vec::new();
    let mut claimed: FxHashSet<&str> = FxHashSet::default();

    for entry in song_renames.iter().filter(|e| !e.is_identity()) {
        let kind = if existing.contains(&entry.to) {
            ConflictKind::ExistingFile
        } else if !claimed.insert(&entry.to) {
            ConflictKind::DuplicateTarget
        } else {
            continue;
        };
        conflicts.push(Conflict {
            from: entry.from.clone(),
            to: entry.to.clone(),
            kind,
        });
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(Error::Preflight(conflicts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_names() {
        assert!(validate_file_name("Song.mp3").is_ok());
        assert!(validate_file_name("Song(1).lrc").is_ok());
        assert!(validate_file_name("..hidden").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", ".", "..", "a/b.mp3", "a\\b.mp3"] {
            assert!(
                matches!(validate_file_name(name), Err(Error::InvalidFileName(_))),
                "accepted {:?}",
                name
            );
        }
    }

    #[test]
    fn test_preflight_clean_plan() {
        let renames = vec![
            RenameEntry::new("a [x1].mp3", "a.mp3"),
            RenameEntry::new("b.mp3", "b.mp3"),
        ];
        assert!(preflight(&renames, &existing(&["a [x1].mp3", "b.mp3"])).is_ok());
    }

    #[test]
    fn test_preflight_existing_target() {
        let renames = vec![RenameEntry::new("a [x1].mp3", "a.mp3")];
        let result = preflight(&renames, &existing(&["a [x1].mp3", "a.mp3"]));
        let Err(Error::Preflight(conflicts)) = result else {
            panic!("expected preflight failure");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::ExistingFile);
    }

    #[test]
    fn test_preflight_duplicate_target() {
        let renames = vec![
            RenameEntry::new("Song [a1].mp3", "Song.mp3"),
            RenameEntry::new("Song [b2].mp3", "Song.mp3"),
        ];
        let result = preflight(&renames, &existing(&["Song [a1].mp3", "Song [b2].mp3"]));
        let Err(Error::Preflight(conflicts)) = result else {
            panic!("expected preflight failure");
        };
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::DuplicateTarget);
        assert_eq!(conflicts[0].from, "Song [b2].mp3");
    }
}
