// Copyright 2021-2025 Martin Pool

//! Backs up, overwrites, and restores a single source file in place.
//!
//! This is the Source File Manager: `backup`/`writeMutated`/`restore`/
//! `hasStaleBackup`/`restoreIfNeeded`. It operates directly on the file at
//! `packagePath` rather than copying a whole tree to a scratch directory
//! first (that whole-tree-copy-and-build approach belongs to the external
//! collaborator that fans work out across files).

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::Error;
use crate::Result;

/// Suffix appended to a source file's name to derive its backup path.
const BACKUP_SUFFIX: &str = ".orig";

/// Manages backup, overwrite, and restore of exactly one source file.
///
/// On construction it reads the file's current contents as the "clean"
/// baseline text; all later restores write back exactly that text.
pub struct SourceFileManager {
    path: Utf8PathBuf,
    backup_path: Utf8PathBuf,
    original_text: String,
}

impl SourceFileManager {
    /// Open a source file, reading its current contents.
    pub fn open(path: &Utf8Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::SourceFileNotFound { path: path.to_owned() });
        }
        // Read verbatim, with no line-ending normalization: `backup()` copies
        // the on-disk bytes as-is, so `original_text` must match them
        // exactly, or `restore()` would silently rewrite line endings and
        // violate the invariant that the file ends up byte-identical to what
        // was read at backup time.
        let original_text =
            fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        let backup_path = backup_path_for(path);
        Ok(SourceFileManager {
            path: path.to_owned(),
            backup_path,
            original_text,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The clean, unmutated text of this file.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// True if a backup file exists from a previous, unfinished run.
    pub fn has_stale_backup(&self) -> bool {
        self.backup_path.is_file()
    }

    /// If a stale backup exists from a previous, unfinished run, restore the
    /// original file from it, remove the backup, and refresh the in-memory
    /// clean text from the recovered contents. A no-op otherwise.
    pub fn restore_if_needed(&mut self) -> Result<()> {
        if self.has_stale_backup() {
            warn!(path = %self.path, "recovering from stale backup left by a previous run");
            let text = fs::read_to_string(&self.backup_path)
                .map_err(|source| Error::Io { path: self.backup_path.clone(), source })?;
            write_atomically(&self.path, &text)?;
            fs::remove_file(&self.backup_path)
                .map_err(|source| Error::Io { path: self.backup_path.clone(), source })?;
            self.original_text = text;
        }
        Ok(())
    }

    /// Copy the current file contents to the backup path.
    pub fn backup(&self) -> Result<()> {
        fs::copy(&self.path, &self.backup_path)
            .map_err(|source| Error::Io { path: self.backup_path.clone(), source })?;
        Ok(())
    }

    /// Atomically overwrite the file with `mutated_text`.
    pub fn write_mutated(&self, mutated_text: &str) -> Result<()> {
        write_atomically(&self.path, mutated_text)
    }

    /// Restore the file to its original text and remove the backup.
    ///
    /// A failure here (`backupRestoreFailed`) is the one error that
    /// intentionally leaves the filesystem dirty: we do not try to paper
    /// over it, because silently continuing could leave the user's tree
    /// mutated without their knowledge.
    pub fn restore(&self) -> Result<()> {
        write_atomically(&self.path, &self.original_text)
            .map_err(|_| Error::BackupRestoreFailed { path: self.path.clone() })?;
        if self.backup_path.is_file() {
            fs::remove_file(&self.backup_path)
                .map_err(|_| Error::BackupRestoreFailed { path: self.path.clone() })?;
        }
        Ok(())
    }
}

fn backup_path_for(path: &Utf8Path) -> Utf8PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_owned();
    name.push_str(BACKUP_SUFFIX);
    path.with_file_name(name)
}

/// Write `text` to `path` by writing a temp file in the same directory and
/// renaming it into place, so a crash never leaves a half-written file.
fn write_atomically(path: &Utf8Path, text: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Utf8Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io { path: path.to_owned(), source })?;
    temp.write_all(text.as_bytes())
        .map_err(|source| Error::Io { path: path.to_owned(), source })?;
    temp.persist(path)
        .map_err(|err| Error::Io { path: path.to_owned(), source: err.error })?;
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn backup_write_and_restore_round_trips() {
        let dir = tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("lib.rs");
        fs::write(&path, "fn f() {}\n").unwrap();
        let manager = SourceFileManager::open(&path).unwrap();
        assert!(!manager.has_stale_backup());

        manager.backup().unwrap();
        manager.write_mutated("fn f() { panic!() }\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn f() { panic!() }\n");

        manager.restore().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn f() {}\n");
        assert!(!manager.backup_path.is_file());
    }

    #[test]
    fn stale_backup_is_recovered_on_open() {
        let dir = tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("lib.rs");
        fs::write(&path, "fn f() { mutated() }\n").unwrap();
        let backup_path = backup_path_for(&path);
        fs::write(&backup_path, "fn f() {}\n").unwrap();

        let mut manager = SourceFileManager::open(&path).unwrap();
        assert!(manager.has_stale_backup());
        manager.restore_if_needed().unwrap();
        assert!(!manager.has_stale_backup());
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn f() {}\n");
        assert_eq!(manager.original_text(), "fn f() {}\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("missing.rs");
        assert!(matches!(
            SourceFileManager::open(&path),
            Err(Error::SourceFileNotFound { .. })
        ));
    }

    #[test]
    fn crlf_line_endings_survive_a_round_trip_unchanged() {
        let dir = tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("lib.rs");
        let crlf_original = "fn f() {}\r\n";
        fs::write(&path, crlf_original).unwrap();
        let manager = SourceFileManager::open(&path).unwrap();
        assert_eq!(manager.original_text(), crlf_original);

        manager.backup().unwrap();
        manager.write_mutated("fn f() { panic!() }\r\n").unwrap();
        manager.restore().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), crlf_original);
    }
}
