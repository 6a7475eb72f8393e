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

//! Default key bindings.

use crate::{
    events::{AppEvent, Navigation},
    input::{Key, KeyEvent},
    state::Direction,
};

/// Maps a decoded key to the application event it triggers.
///
/// This function acts as the primary keyboard router, translating decoded
/// [`KeyEvent`]s into high-level events. It handles:
///
/// * **Application Control**: quitting with `q` or `ctrl+c`.
/// * **Navigation**: arrow keys or `hjkl` to move, `backspace` to go up a
///   directory, `home`/`end` to jump.
/// * **File Operations**: open, copy, cut, paste, delete and refresh.
/// * **Context Menu**: `m` opens it for the selection, `escape` closes it.
///
/// Keys without a binding, including opaque escape sequences, map to `None`.
pub(crate) fn map_key(key: &KeyEvent, menu_visible: bool) -> Option<AppEvent> {
    let event = match &key.key {
        Key::Ctrl('c') | Key::Char('q') => AppEvent::Quit,

        Key::Up | Key::Char('k') => AppEvent::Navigation(Navigation::Move(Direction::Up)),
        Key::Down | Key::Char('j') => AppEvent::Navigation(Navigation::Move(Direction::Down)),
        Key::Left | Key::Char('h') => AppEvent::Navigation(Navigation::Move(Direction::Left)),
        Key::Right | Key::Char('l') => AppEvent::Navigation(Navigation::Move(Direction::Right)),
        Key::Home => AppEvent::Navigation(Navigation::First),
        Key::End => AppEvent::Navigation(Navigation::Last),
        Key::Backspace => AppEvent::Navigation(Navigation::Back),

        Key::Enter => AppEvent::FileOpened,
        Key::Char('e') => AppEvent::OpenWithEditor,
        Key::Char('c') => AppEvent::FileCopy,
        Key::Char('x') => AppEvent::FileCut,
        Key::Char('v') => AppEvent::FilePaste,
        Key::Delete => AppEvent::FileDelete,

        // F5 arrives as `CSI 15~`.
        Key::Char('r') | Key::F(15) => AppEvent::Refresh,

        Key::Char('m') => AppEvent::ShowContextMenu,
        Key::Escape if menu_visible => AppEvent::HideContextMenu,

        _ => return None,
    };

    Some(event)
}
