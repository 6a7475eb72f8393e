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

use std::{path::PathBuf, rc::Rc, time::Instant};

use crate::{
    layout::{LayoutInfo, calculate_layout},
    model::{ClipboardOperation, FileEntry, Position, TerminalSize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The root of all application state.
///
/// Cloning is cheap: every sub-state is reference counted and shared until
/// an action replaces it.
#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) viewport: Rc<ViewportState>,
    pub(crate) selection: Rc<SelectionState>,
    pub(crate) context_menu: Rc<ContextMenuState>,
    pub(crate) clipboard: Rc<ClipboardState>,
    pub(crate) status: Option<Rc<StatusMessage>>,
}

impl AppState {
    pub(crate) fn initial(current_path: PathBuf, terminal_size: TerminalSize) -> Self {
        let layout = calculate_layout(terminal_size);
        Self {
            viewport: Rc::new(ViewportState {
                current_path,
                entries: Rc::from(Vec::new()),
                terminal_size,
                items_per_row: layout.items_per_row,
                total_rows: layout.total_rows,
                scroll_offset: 0,
            }),
            selection: Rc::new(SelectionState::default()),
            context_menu: Rc::new(ContextMenuState::default()),
            clipboard: Rc::new(ClipboardState::default()),
            status: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ViewportState {
    pub(crate) current_path: PathBuf,
    /// Directories first, then case-insensitive name order. Replaced
    /// wholesale on every load.
    pub(crate) entries: Rc<[FileEntry]>,
    pub(crate) terminal_size: TerminalSize,
    pub(crate) items_per_row: usize,
    pub(crate) total_rows: usize,
    /// First visible grid row.
    pub(crate) scroll_offset: usize,
}

impl ViewportState {
    /// Full geometry for the current terminal size, with the cached
    /// row/column counts.
    pub(crate) fn layout(&self) -> LayoutInfo {
        LayoutInfo {
            items_per_row: self.items_per_row,
            total_rows: self.total_rows,
            ..calculate_layout(self.terminal_size)
        }
    }
}

#[derive(Debug, Clone)]
struct Selected {
    index: usize,
    entry: FileEntry,
}

/// The selected entry, if any.
///
/// An index and its entry are only ever stored together, and the entry is
/// always read out of the entry list at selection time.
#[derive(Debug, Clone, Default)]
pub(crate) struct SelectionState(Option<Selected>);

impl SelectionState {
    pub(crate) fn select(entries: &[FileEntry], index: usize) -> Self {
        Self(entries.get(index).map(|entry| Selected {
            index,
            entry: entry.clone(),
        }))
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.0.as_ref().map(|s| s.index)
    }

    pub(crate) fn entry(&self) -> Option<&FileEntry> {
        self.0.as_ref().map(|s| &s.entry)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ContextMenuState {
    pub(crate) visible: bool,
    pub(crate) position: Position,
    /// `None` when the menu was opened over empty space.
    pub(crate) target: Option<FileEntry>,
}

#[derive(Debug, Clone)]
struct ClipboardSlot {
    entry: FileEntry,
    operation: ClipboardOperation,
}

/// Single-slot clipboard; an entry and its operation are set and cleared
/// together.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClipboardState(Option<ClipboardSlot>);

impl ClipboardState {
    pub(crate) fn holding(entry: FileEntry, operation: ClipboardOperation) -> Self {
        Self(Some(ClipboardSlot { entry, operation }))
    }

    pub(crate) fn entry(&self) -> Option<&FileEntry> {
        self.0.as_ref().map(|slot| &slot.entry)
    }

    pub(crate) fn operation(&self) -> Option<ClipboardOperation> {
        self.0.as_ref().map(|slot| slot.operation)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusLevel {
    Info,
    Error,
}

/// Transient text shown in place of the item count.
#[derive(Debug, Clone)]
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) level: StatusLevel,
    pub(crate) expires_at: Instant,
}

impl StatusMessage {
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
