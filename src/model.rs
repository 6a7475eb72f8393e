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

//! Core data records shared by every layer of the browser.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Directory,
}

/// One file or directory shown in the grid.
///
/// Entries are produced by the filesystem provider and never modified
/// afterwards. Two entries are the same entry when their paths are equal.
#[derive(Debug, Clone)]
pub(crate) struct FileEntry {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) kind: EntryKind,
    pub(crate) size: Option<u64>,
    pub(crate) modified_at: Option<DateTime<Local>>,
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FileEntry {}

impl FileEntry {
    pub(crate) fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Lower-cased extension, without the leading dot.
    pub(crate) fn extension(&self) -> Option<String> {
        if self.is_dir() {
            return None;
        }
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    #[cfg(test)]
    pub(crate) fn file(dir: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: Path::new(dir).join(name),
            kind: EntryKind::File,
            size: Some(0),
            modified_at: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn directory(dir: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: Path::new(dir).join(name),
            kind: EntryKind::Directory,
            size: None,
            modified_at: None,
        }
    }
}

/// Sorts entries with directories first, then by name.
///
/// Names compare without regard to case or accents, so `Émile` sorts among
/// the `e`s. Ties fall back to the lowercased and then the exact name.
pub(crate) fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by_cached_key(|entry| {
        (
            !entry.is_dir(),
            collation_key(&entry.name),
            entry.name.to_lowercase(),
            entry.name.clone(),
        )
    });
}

/// `name` decomposed, stripped of combining marks and lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipboardOperation {
    Copy,
    Cut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TerminalSize {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl TerminalSize {
    pub(crate) const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A 0-based screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Position {
    pub(crate) x: u16,
    pub(crate) y: u16,
}

impl Position {
    pub(crate) const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}
