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

//! Unicode and Emoji symbols for the desktop.
//!
//! This module maps file extensions to the icon glyph, short type label and
//! semantic category drawn in the grid. Glyphs are selected for compatibility
//! with most modern terminal emulators and fonts; all of them are two columns
//! wide.

use crate::model::FileEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    Directory,
    Code,
    Image,
    Audio,
    Video,
    Archive,
    Document,
    Data,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Icon {
    pub(crate) glyph: &'static str,
    pub(crate) label: &'static str,
    pub(crate) category: Category,
}

pub(crate) const ICON_FOLDER: &str = "\u{1F4C1}";
pub(crate) const ICON_FOLDER_OPEN: &str = "\u{1F4C2}";
pub(crate) const ICON_EMPTY: &str = "\u{1F4ED}";

const ICON_FILE: &str = "\u{1F4C4}";
const ICON_CODE: &str = "\u{1F4DD}";
const ICON_IMAGE: &str = "\u{1F3A8}";
const ICON_AUDIO: &str = "\u{1F3B5}";
const ICON_VIDEO: &str = "\u{1F3AC}";
const ICON_ARCHIVE: &str = "\u{1F4E6}";
const ICON_DOCUMENT: &str = "\u{1F4D5}";
const ICON_DATA: &str = "\u{1F4CA}";

/// Looks up the icon for an entry.
pub(crate) fn icon_for(entry: &FileEntry) -> Icon {
    if entry.is_dir() {
        return Icon {
            glyph: ICON_FOLDER,
            label: "Folder",
            category: Category::Directory,
        };
    }

    let ext = entry.extension().unwrap_or_default();
    let (glyph, label, category) = match ext.as_str() {
        "rs" | "py" | "js" | "ts" | "go" | "c" | "h" | "cpp" | "java" | "rb" | "sh" | "lua" => {
            (ICON_CODE, "Source", Category::Code)
        }
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "webp" => {
            (ICON_IMAGE, "Image", Category::Image)
        }
        "mp3" | "flac" | "ogg" | "wav" | "m4a" | "opus" => (ICON_AUDIO, "Audio", Category::Audio),
        "mp4" | "mkv" | "avi" | "mov" | "webm" => (ICON_VIDEO, "Video", Category::Video),
        "zip" | "tar" | "gz" | "xz" | "bz2" | "7z" | "rar" => {
            (ICON_ARCHIVE, "Archive", Category::Archive)
        }
        "pdf" | "doc" | "docx" | "odt" | "md" | "txt" | "rtf" => {
            (ICON_DOCUMENT, "Document", Category::Document)
        }
        "json" | "toml" | "yaml" | "yml" | "csv" | "xml" | "db" | "sqlite" => {
            (ICON_DATA, "Data", Category::Data)
        }
        _ => (ICON_FILE, "File", Category::Other),
    };

    Icon {
        glyph,
        label,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_icon() {
        let icon = icon_for(&FileEntry::directory("/", "src"));
        assert_eq!(icon.category, Category::Directory);
        assert_eq!(icon.glyph, ICON_FOLDER);
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        assert_eq!(icon_for(&FileEntry::file("/", "a.RS")).category, Category::Code);
        assert_eq!(icon_for(&FileEntry::file("/", "b.Png")).category, Category::Image);
        assert_eq!(icon_for(&FileEntry::file("/", "noext")).category, Category::Other);
    }
}
