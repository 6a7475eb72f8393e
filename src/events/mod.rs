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

//! Application events, topics and handlers.
//!
//! This module acts as the central hub for the "Controller" logic of the
//! application. It organizes how inputs and background completions are
//! translated into state changes.
//!
//! # Organization
//!
//! * [`bus`]: The synchronous publish/subscribe dispatcher.
//! * [`handlers`]: One handler per topic, mutating the store and queueing
//!   background tasks.
//! * [`key_handlers`]: The default key bindings, mapping decoded keys to
//!   events.
//!
//! Every [`AppEvent`] variant has a fixed payload and belongs to exactly one
//! [`Topic`]; the controller subscribes handlers per topic.

pub(crate) mod bus;
pub(crate) mod handlers;
pub(crate) mod key_handlers;

use std::{path::PathBuf, time::Instant};

use crate::{
    error::AppError,
    model::{ClipboardOperation, FileEntry, TerminalSize},
    state::Direction,
};

pub(crate) use bus::EventBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Navigation {
    Move(Direction),
    Back,
    First,
    Last,
}

/// Actions offered by the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuAction {
    Open,
    OpenWithEditor,
    Copy,
    Cut,
    Paste,
    Delete,
    Refresh,
}

impl MenuAction {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            MenuAction::Open => "open",
            MenuAction::OpenWithEditor => "open-with-editor",
            MenuAction::Copy => "copy",
            MenuAction::Cut => "cut",
            MenuAction::Paste => "paste",
            MenuAction::Delete => "delete",
            MenuAction::Refresh => "refresh",
        }
    }
}

/// Result of a background filesystem or launcher task.
#[derive(Debug)]
pub(crate) enum OperationOutcome {
    Pasted {
        operation: ClipboardOperation,
        destination: PathBuf,
    },
    Deleted(PathBuf),
    Launched(PathBuf),
}

#[derive(Debug)]
pub(crate) enum AppEvent {
    /// A raw chunk read from stdin.
    Input { bytes: Vec<u8>, at: Instant },

    Navigation(Navigation),

    PointerClick { x: u16, y: u16 },
    PointerDoubleClick { x: u16, y: u16 },
    PointerRightClick { x: u16, y: u16 },

    FileOpened,
    OpenWithEditor,
    FileCopy,
    FileCut,
    FilePaste,
    FileDelete,

    ShowContextMenu,
    HideContextMenu,
    ContextMenuAction(MenuAction),

    Refresh,
    Resize(TerminalSize),

    DirectoryLoaded {
        generation: u64,
        path: PathBuf,
        result: Result<Vec<FileEntry>, AppError>,
    },
    OperationFinished(Result<OperationOutcome, AppError>),

    Tick,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Topic {
    Input,
    Navigation,
    PointerClick,
    PointerDoubleClick,
    PointerRightClick,
    FileOpened,
    OpenWithEditor,
    FileCopy,
    FileCut,
    FilePaste,
    FileDelete,
    ShowContextMenu,
    HideContextMenu,
    ContextMenuAction,
    Refresh,
    Resize,
    DirectoryLoaded,
    OperationFinished,
    Tick,
    Quit,
}

impl AppEvent {
    pub(crate) fn topic(&self) -> Topic {
        match self {
            AppEvent::Input { .. } => Topic::Input,
            AppEvent::Navigation(_) => Topic::Navigation,
            AppEvent::PointerClick { .. } => Topic::PointerClick,
            AppEvent::PointerDoubleClick { .. } => Topic::PointerDoubleClick,
            AppEvent::PointerRightClick { .. } => Topic::PointerRightClick,
            AppEvent::FileOpened => Topic::FileOpened,
            AppEvent::OpenWithEditor => Topic::OpenWithEditor,
            AppEvent::FileCopy => Topic::FileCopy,
            AppEvent::FileCut => Topic::FileCut,
            AppEvent::FilePaste => Topic::FilePaste,
            AppEvent::FileDelete => Topic::FileDelete,
            AppEvent::ShowContextMenu => Topic::ShowContextMenu,
            AppEvent::HideContextMenu => Topic::HideContextMenu,
            AppEvent::ContextMenuAction(_) => Topic::ContextMenuAction,
            AppEvent::Refresh => Topic::Refresh,
            AppEvent::Resize(_) => Topic::Resize,
            AppEvent::DirectoryLoaded { .. } => Topic::DirectoryLoaded,
            AppEvent::OperationFinished(_) => Topic::OperationFinished,
            AppEvent::Tick => Topic::Tick,
            AppEvent::Quit => Topic::Quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_action_names() {
        assert_eq!(MenuAction::OpenWithEditor.as_str(), "open-with-editor");
        assert_eq!(MenuAction::Refresh.as_str(), "refresh");
    }

    #[test]
    fn test_topics() {
        assert_eq!(AppEvent::Refresh.topic(), Topic::Refresh);
        assert_eq!(
            AppEvent::PointerRightClick { x: 1, y: 2 }.topic(),
            Topic::PointerRightClick
        );
        assert_eq!(
            AppEvent::Navigation(Navigation::Back).topic(),
            Topic::Navigation
        );
    }
}
