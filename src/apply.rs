//! Applying rename plans to the filesystem.
//!
//! Renames run one at a time in plan order. There is no rollback: when a
//! rename fails the pass stops, and every rename before it stays applied.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::RenameEntry;
use crate::safety::validate_file_name;

/// Performs one rename inside a directory.
pub trait Renamer {
    /// Fails with [`Error::Collision`] when `new` exists and is not `old`.
    fn rename(&mut self, dir: &Path, old: &str, new: &str) -> Result<()>;
}

/// Renames files on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRenamer;

impl Renamer for FsRenamer {
    fn rename(&mut self, dir: &Path, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let target = dir.join(new);
        if target.exists() {
            return Err(Error::Collision {
                from: old.to_string(),
                to: new.to_string(),
            });
        }
        fs::rename(dir.join(old), target)?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub renamed: usize,
    /// Identity entries that needed no rename
    pub unchanged: usize,
}

impl ApplyReport {
    pub fn merge(self, other: ApplyReport) -> ApplyReport {
        ApplyReport {
            renamed: self.renamed + other.renamed,
            unchanged: self.unchanged + other.unchanged,
        }
    }
}

/// Apply `entries` in order, skipping identity entries.
pub fn apply_renames<R: Renamer + ?Sized>(
    dir: &Path,
    entries: &[RenameEntry],
    renamer: &mut R,
) -> Result<ApplyReport> {
    let total = entries.iter().filter(|e| !e.is_identity()).count();
    let mut report = ApplyReport::default();

    for entry in entries {
        if entry.is_identity() {
            report.unchanged += 1;
            continue;
        }

        let attempt = validate_file_name(&entry.to)
            .and_then(|_| renamer.rename(dir, &entry.from, &entry.to));
        if let Err(source) = attempt {
            return Err(Error::Apply {
                applied: report.renamed,
                total,
                file: entry.from.clone(),
                source: Box::new(source),
            });
        }
        debug!(from = %entry.from, to = %entry.to, "Renamed");
        report.renamed += 1;
    }

    info!(renamed = report.renamed, unchanged = report.unchanged, "Apply pass finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Records renames instead of touching the disk; fails on `fail_on`.
    #[derive(Default)]
    struct RecordingRenamer {
        calls: Vec<(String, String)>,
        fail_on: Option<String>,
    }

    impl Renamer for RecordingRenamer {
        fn rename(&mut self, _dir: &Path, old: &str, new: &str) -> Result<()> {
            if self.fail_on.as_deref() == Some(old) {
                return Err(Error::Collision {
                    from: old.to_string(),
                    to: new.to_string(),
                });
            }
            self.calls.push((old.to_string(), new.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_apply_skips_identity() {
        let entries = vec![
            RenameEntry::new("a [x1].mp3", "a.mp3"),
            RenameEntry::new("b.mp3", "b.mp3"),
        ];
        let mut renamer = RecordingRenamer::default();
        let report = apply_renames(Path::new("."), &entries, &mut renamer).unwrap();
        assert_eq!(report, ApplyReport { renamed: 1, unchanged: 1 });
        assert_eq!(renamer.calls, vec![("a [x1].mp3".to_string(), "a.mp3".to_string())]);
    }

    #[test]
    fn test_apply_stops_at_first_failure_without_rollback() {
        let entries = vec![
            RenameEntry::new("1.mp3", "one.mp3"),
            RenameEntry::new("2.mp3", "two.mp3"),
            RenameEntry::new("3.mp3", "three.mp3"),
        ];
        let mut renamer = RecordingRenamer {
            fail_on: Some("2.mp3".to_string()),
            ..Default::default()
        };
        let err = apply_renames(Path::new("."), &entries, &mut renamer).unwrap_err();
        match err {
            Error::Apply { applied, total, file, .. } => {
                assert_eq!(applied, 1);
                assert_eq!(total, 3);
                assert_eq!(file, "2.mp3");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(renamer.calls.len(), 1);
    }

    #[test]
    fn test_apply_rejects_path_in_target() {
        let entries = vec![RenameEntry::new("a.mp3", "../a.mp3")];
        let mut renamer = RecordingRenamer::default();
        let err = apply_renames(Path::new("."), &entries, &mut renamer).unwrap_err();
        let Error::Apply { source, .. } = err else {
            panic!("expected apply error");
        };
        assert!(matches!(*source, Error::InvalidFileName(_)));
        assert!(renamer.calls.is_empty());
    }

    #[test]
    fn test_fs_renamer_collision() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Song [a1].mp3"), b"one").unwrap();
        fs::write(dir.path().join("Song.mp3"), b"two").unwrap();

        let result = FsRenamer.rename(dir.path(), "Song [a1].mp3", "Song.mp3");
        assert!(matches!(result, Err(Error::Collision { .. })));
        assert_eq!(fs::read(dir.path().join("Song.mp3")).unwrap(), b"two");
    }

    #[test]
    fn test_fs_renamer_moves_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("old.lrc"), b"[00:01.00]la").unwrap();

        FsRenamer.rename(dir.path(), "old.lrc", "new.lrc").unwrap();
        assert!(!dir.path().join("old.lrc").exists());
        assert!(dir.path().join("new.lrc").exists());
    }
}
