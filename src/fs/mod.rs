// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Filesystem access.
//!
//! The browser only ever touches the disk through the [`FileSystem`] trait,
//! which is driven from the background task worker. [`LocalFileSystem`] is
//! the real implementation; it uses `WalkDir` for recursive copies and
//! deletes of directories.
//!
//! Hidden entries (names starting with `.`) are filtered out here, so the
//! rest of the application never sees them.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    error::{AppError, Result},
    model::{self, EntryKind, FileEntry},
};

pub(crate) trait FileSystem: Send {
    /// Lists the visible entries of a directory, sorted for display.
    fn list_entries(&self, path: &Path) -> Result<Vec<FileEntry>>;
    fn stat(&self, path: &Path) -> Result<FileEntry>;
    fn copy(&self, src: &Path, dst: &Path) -> Result<()>;
    fn move_entry(&self, src: &Path, dst: &Path) -> Result<()>;
    fn delete(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default)]
pub(crate) struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_entries(&self, path: &Path) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        for dirent in fs::read_dir(path).map_err(|e| AppError::io(path, e))? {
            let dirent = dirent.map_err(|e| AppError::io(path, e))?;
            if is_hidden(&dirent.file_name()) {
                continue;
            }
            // Entries can vanish between listing and stat; skip them.
            match self.stat(&dirent.path()) {
                Ok(entry) => entries.push(entry),
                Err(e) => debug!(error = %e, "skipping unreadable entry"),
            }
        }

        model::sort_entries(&mut entries);
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> Result<FileEntry> {
        // Follow symlinks so a link to a directory browses like one.
        let metadata = fs::metadata(path)
            .or_else(|_| fs::symlink_metadata(path))
            .map_err(|e| AppError::io(path, e))?;

        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(FileEntry {
            name,
            path: path.to_path_buf(),
            kind,
            size: (kind == EntryKind::File).then_some(metadata.len()),
            modified_at: metadata.modified().ok().map(DateTime::<Local>::from),
        })
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<()> {
        let metadata = fs::metadata(src).map_err(|e| AppError::io(src, e))?;
        if !metadata.is_dir() {
            fs::copy(src, dst).map_err(|e| AppError::io(src, e))?;
            return Ok(());
        }

        if dst.starts_with(src) {
            return Err(AppError::io(
                dst,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "cannot copy a directory into itself",
                ),
            ));
        }

        for item in WalkDir::new(src) {
            let item = item.map_err(|e| {
                let path = e.path().unwrap_or(src).to_path_buf();
                AppError::io(path, e.into())
            })?;
            let relative = item.path().strip_prefix(src).unwrap_or(Path::new(""));
            let target = dst.join(relative);

            if item.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| AppError::io(&target, e))?;
            } else {
                fs::copy(item.path(), &target).map_err(|e| AppError::io(item.path(), e))?;
            }
        }

        Ok(())
    }

    fn move_entry(&self, src: &Path, dst: &Path) -> Result<()> {
        if fs::rename(src, dst).is_ok() {
            return Ok(());
        }
        // Renames fail across filesystems.
        debug!(src = %src.display(), dst = %dst.display(), "rename failed, copying instead");
        self.copy(src, dst)?;
        self.delete(src)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let metadata = fs::symlink_metadata(path).map_err(|e| AppError::io(path, e))?;
        if metadata.is_dir() {
            // Children first, so every directory is empty when removed.
            for item in WalkDir::new(path).contents_first(true) {
                let item = item.map_err(|e| {
                    let failed = e.path().unwrap_or(path).to_path_buf();
                    AppError::io(failed, e.into())
                })?;
                if item.file_type().is_dir() {
                    fs::remove_dir(item.path()).map_err(|e| AppError::io(item.path(), e))?;
                } else {
                    fs::remove_file(item.path()).map_err(|e| AppError::io(item.path(), e))?;
                }
            }
            Ok(())
        } else {
            fs::remove_file(path).map_err(|e| AppError::io(path, e))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Picks a destination for `name` inside `dir` that does not exist yet.
///
/// Collisions get the smallest free ` (n)` suffix, placed before the
/// extension: `report.txt` becomes `report (1).txt`, then `report (2).txt`.
pub(crate) fn unique_destination(fs: &dyn FileSystem, dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !fs.exists(&candidate) {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){extension}")))
        .find(|candidate| !fs.exists(candidate))
        .unwrap_or(candidate)
}
