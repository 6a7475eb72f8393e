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

//! Application state store.
//!
//! The store holds a single immutable [`AppState`] snapshot. Every change goes
//! through a named action method, which builds a new snapshot from the old
//! one (sharing untouched sub-states through `Rc`), installs it, and then
//! notifies every listener once, in subscription order. Listeners receive no
//! payload; they call [`Store::get_state`] to read the new snapshot.
//!
//! The store is single-threaded by construction: it lives on the main loop
//! and is shared with event handlers through `Rc`.

mod types;

pub(crate) use types::*;

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::{
    layout::{self, calculate_layout},
    model::{ClipboardOperation, FileEntry, Position, TerminalSize},
};

/// Token returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

pub(crate) struct Store {
    state: RefCell<Rc<AppState>>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl Store {
    /// Creates a store for `path` with no entries, no selection, a hidden
    /// menu and an empty clipboard.
    pub(crate) fn new(path: PathBuf, terminal_size: TerminalSize) -> Self {
        Self {
            state: RefCell::new(Rc::new(AppState::initial(path, terminal_size))),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub(crate) fn get_state(&self) -> Rc<AppState> {
        Rc::clone(&self.state.borrow())
    }

    pub(crate) fn subscribe(&self, listener: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener, returning false if it was already gone.
    pub(crate) fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn set_path(&self, path: PathBuf) {
        self.update(|state| {
            let changed = state.viewport.current_path != path;
            AppState {
                viewport: Rc::new(ViewportState {
                    current_path: path,
                    scroll_offset: if changed { 0 } else { state.viewport.scroll_offset },
                    ..(*state.viewport).clone()
                }),
                selection: if changed {
                    Rc::new(SelectionState::default())
                } else {
                    Rc::clone(&state.selection)
                },
                ..state.clone()
            }
        });
    }

    /// Replaces the entry list wholesale and recomputes the layout.
    ///
    /// A selection whose index is still in range is kept, with its entry
    /// re-read from the new list; otherwise the selection is cleared.
    pub(crate) fn set_entries(&self, entries: Vec<FileEntry>) {
        self.update(|state| {
            let entries: Rc<[FileEntry]> = entries.into();
            let layout = calculate_layout(state.viewport.terminal_size);
            let selection = match state.selection.index() {
                Some(index) => SelectionState::select(&entries, index),
                None => SelectionState::default(),
            };
            let scroll_offset = state
                .viewport
                .scroll_offset
                .min(layout::max_scroll_offset(entries.len(), &layout));

            AppState {
                viewport: Rc::new(ViewportState {
                    entries,
                    items_per_row: layout.items_per_row,
                    total_rows: layout.total_rows,
                    scroll_offset,
                    ..(*state.viewport).clone()
                }),
                selection: Rc::new(selection),
                ..state.clone()
            }
        });
    }

    /// Stores new terminal dimensions and the layout derived from them.
    pub(crate) fn set_terminal_size(&self, terminal_size: TerminalSize) {
        self.update(|state| {
            let layout = calculate_layout(terminal_size);
            let entries = state.viewport.entries.len();
            let mut scroll_offset = state
                .viewport
                .scroll_offset
                .min(layout::max_scroll_offset(entries, &layout));
            if let Some(index) = state.selection.index() {
                scroll_offset = layout::get_scroll_offset_for_item(index, scroll_offset, &layout);
            }

            AppState {
                viewport: Rc::new(ViewportState {
                    terminal_size,
                    items_per_row: layout.items_per_row,
                    total_rows: layout.total_rows,
                    scroll_offset,
                    ..(*state.viewport).clone()
                }),
                ..state.clone()
            }
        });
    }

    /// Selects the entry at `index`, or clears the selection for `None` or an
    /// out-of-range index. The grid scrolls to keep the selection visible.
    pub(crate) fn set_selection(&self, index: Option<usize>) {
        self.update(|state| {
            let selection = match index {
                Some(index) => SelectionState::select(&state.viewport.entries, index),
                None => SelectionState::default(),
            };
            with_selection(state, selection)
        });
    }

    /// Moves the selection one step on the grid, clamping at the edges.
    ///
    /// Does nothing (and notifies no one) when there are no entries. With no
    /// current selection the move starts from just before the first entry, so
    /// Down lands on the last item of the first row and every other direction
    /// on the first entry.
    pub(crate) fn move_selection(&self, direction: Direction) {
        let state = self.get_state();
        let len = state.viewport.entries.len();
        if len == 0 {
            return;
        }

        let per_row = state.viewport.items_per_row.max(1);
        let index = match (state.selection.index(), direction) {
            (None, Direction::Down) => (per_row - 1).min(len - 1),
            (None, _) => 0,
            (Some(index), Direction::Left) => index.saturating_sub(1),
            (Some(index), Direction::Right) => (index + 1).min(len - 1),
            (Some(index), Direction::Up) => index.saturating_sub(per_row),
            (Some(index), Direction::Down) => (index + per_row).min(len - 1),
        };

        self.set_selection(Some(index));
    }

    pub(crate) fn show_context_menu(&self, position: Position, target: Option<FileEntry>) {
        self.update(|state| AppState {
            context_menu: Rc::new(ContextMenuState {
                visible: true,
                position,
                target,
            }),
            ..state.clone()
        });
    }

    pub(crate) fn hide_context_menu(&self) {
        self.update(|state| AppState {
            context_menu: Rc::new(ContextMenuState {
                visible: false,
                ..(*state.context_menu).clone()
            }),
            ..state.clone()
        });
    }

    /// Puts an entry in the clipboard, replacing whatever was there.
    pub(crate) fn set_clipboard(&self, entry: FileEntry, operation: ClipboardOperation) {
        self.update(|state| AppState {
            clipboard: Rc::new(ClipboardState::holding(entry, operation)),
            ..state.clone()
        });
    }

    pub(crate) fn clear_clipboard(&self) {
        self.update(|state| AppState {
            clipboard: Rc::new(ClipboardState::default()),
            ..state.clone()
        });
    }

    pub(crate) fn set_status(&self, text: impl Into<String>, level: StatusLevel, ttl: Duration) {
        let message = StatusMessage {
            text: text.into(),
            level,
            expires_at: Instant::now() + ttl,
        };
        self.update(|state| AppState {
            status: Some(Rc::new(message)),
            ..state.clone()
        });
    }

    pub(crate) fn clear_status(&self) {
        self.update(|state| AppState {
            status: None,
            ..state.clone()
        });
    }

    fn update(&self, reduce: impl FnOnce(&AppState) -> AppState) {
        let next = reduce(&self.get_state());
        *self.state.borrow_mut() = Rc::new(next);
        self.notify();
    }

    // Listeners are cloned out first so they may subscribe, unsubscribe or
    // dispatch further actions while being notified.
    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener();
        }
    }
}

fn with_selection(state: &AppState, selection: SelectionState) -> AppState {
    let layout = state.viewport.layout();
    let scroll_offset = match selection.index() {
        Some(index) => {
            layout::get_scroll_offset_for_item(index, state.viewport.scroll_offset, &layout)
        }
        None => state.viewport.scroll_offset,
    };

    AppState {
        viewport: if scroll_offset == state.viewport.scroll_offset {
            Rc::clone(&state.viewport)
        } else {
            Rc::new(ViewportState {
                scroll_offset,
                ..(*state.viewport).clone()
            })
        },
        selection: Rc::new(selection),
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<FileEntry> {
        (0..n)
            .map(|i| FileEntry::file("/tmp", &format!("file{i:02}.txt")))
            .collect()
    }

    fn store_with(n: usize) -> Store {
        let store = Store::new(PathBuf::from("/tmp"), TerminalSize::new(80, 24));
        store.set_entries(entries(n));
        store
    }

    fn assert_selection_consistent(state: &AppState) {
        match (state.selection.index(), state.selection.entry()) {
            (None, None) => {}
            (Some(index), Some(entry)) => {
                assert!(index < state.viewport.entries.len());
                assert_eq!(&state.viewport.entries[index], entry);
            }
            other => panic!("inconsistent selection {other:?}"),
        }
    }

    #[test]
    fn test_initial_state() {
        let store = Store::new(PathBuf::from("/home"), TerminalSize::new(80, 24));
        let state = store.get_state();

        assert_eq!(state.viewport.current_path, PathBuf::from("/home"));
        assert!(state.viewport.entries.is_empty());
        assert_eq!(state.selection.index(), None);
        assert!(!state.context_menu.visible);
        assert!(state.clipboard.is_empty());
        assert_eq!(state.viewport.items_per_row, 5);
        assert_eq!(state.viewport.total_rows, 3);
    }

    #[test]
    fn test_every_action_notifies_once() {
        let store = store_with(3);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        store.subscribe(move || counter.set(counter.get() + 1));

        store.set_selection(Some(1));
        store.show_context_menu(Position::new(1, 1), None);
        store.hide_context_menu();
        store.set_terminal_size(TerminalSize::new(100, 30));
        store.set_entries(entries(2));

        assert_eq!(count.get(), 5);
    }

    #[test]
    fn test_listeners_run_in_subscription_order_and_can_unsubscribe() {
        let store = store_with(1);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let id = store.subscribe(move || first.borrow_mut().push("first"));
        let second = Rc::clone(&log);
        store.subscribe(move || second.borrow_mut().push("second"));

        store.clear_status();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.clear_status();

        assert_eq!(*log.borrow(), vec!["first", "second", "second"]);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_listener_sees_new_state() {
        let store = Rc::new(store_with(4));
        let seen = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&store);
        let slot = Rc::clone(&seen);
        store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                slot.set(store.get_state().selection.index());
            }
        });

        store.set_selection(Some(2));
        assert_eq!(seen.get(), Some(2));
    }

    #[test]
    fn test_snapshots_are_not_mutated() {
        let store = store_with(3);
        let before = store.get_state();
        store.set_selection(Some(1));

        assert_eq!(before.selection.index(), None);
        assert_eq!(store.get_state().selection.index(), Some(1));
        // Untouched sub-states are shared.
        assert!(Rc::ptr_eq(&before.clipboard, &store.get_state().clipboard));
    }

    #[test]
    fn test_out_of_range_selection_clears() {
        let store = store_with(3);
        store.set_selection(Some(1));
        store.set_selection(Some(3));

        let state = store.get_state();
        assert_eq!(state.selection.index(), None);
        assert_selection_consistent(&state);
    }

    #[test]
    fn test_move_selection_clamps() {
        // 5 per row, 12 entries.
        let store = store_with(12);
        store.set_selection(Some(0));

        store.move_selection(Direction::Left);
        assert_eq!(store.get_state().selection.index(), Some(0));
        store.move_selection(Direction::Up);
        assert_eq!(store.get_state().selection.index(), Some(0));

        store.move_selection(Direction::Down);
        assert_eq!(store.get_state().selection.index(), Some(5));
        store.move_selection(Direction::Down);
        assert_eq!(store.get_state().selection.index(), Some(10));
        store.move_selection(Direction::Down);
        assert_eq!(store.get_state().selection.index(), Some(11));
        store.move_selection(Direction::Right);
        assert_eq!(store.get_state().selection.index(), Some(11));
        store.move_selection(Direction::Up);
        assert_eq!(store.get_state().selection.index(), Some(6));
    }

    #[test]
    fn test_first_move_starts_before_the_first_entry() {
        // 5 per row, 10 entries.
        let store = store_with(10);
        store.move_selection(Direction::Down);
        assert_eq!(store.get_state().selection.index(), Some(4));

        for direction in [Direction::Left, Direction::Right, Direction::Up] {
            store.set_selection(None);
            store.move_selection(direction);
            assert_eq!(store.get_state().selection.index(), Some(0));
        }

        // Fewer entries than a row.
        let store = store_with(3);
        store.move_selection(Direction::Down);
        assert_eq!(store.get_state().selection.index(), Some(2));
    }

    #[test]
    fn test_move_selection_stays_in_bounds() {
        let store = store_with(7);
        let moves = [
            Direction::Down,
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Up,
            Direction::Up,
            Direction::Right,
        ];
        for direction in moves {
            store.move_selection(direction);
            let state = store.get_state();
            let index = state.selection.index().unwrap();
            assert!(index < 7);
            assert_selection_consistent(&state);
        }
    }

    #[test]
    fn test_move_selection_on_empty_is_a_noop() {
        let store = store_with(0);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        store.subscribe(move || counter.set(counter.get() + 1));

        store.move_selection(Direction::Down);
        assert_eq!(store.get_state().selection.index(), None);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_reload_rederives_selected_entry() {
        let store = store_with(5);
        store.set_selection(Some(2));

        let mut reloaded = entries(5);
        reloaded[2] = FileEntry::file("/tmp", "renamed.txt");
        store.set_entries(reloaded);

        let state = store.get_state();
        assert_eq!(state.selection.index(), Some(2));
        assert_eq!(state.selection.entry().unwrap().name, "renamed.txt");

        store.set_entries(entries(2));
        let state = store.get_state();
        assert_eq!(state.selection.index(), None);
        assert_selection_consistent(&state);
    }

    #[test]
    fn test_changing_directory_clears_selection_and_scroll() {
        let store = store_with(40);
        store.set_selection(Some(30));
        assert!(store.get_state().viewport.scroll_offset > 0);

        store.set_path(PathBuf::from("/tmp"));
        assert_eq!(store.get_state().selection.index(), Some(30));

        store.set_path(PathBuf::from("/var"));
        let state = store.get_state();
        assert_eq!(state.selection.index(), None);
        assert_eq!(state.viewport.scroll_offset, 0);
    }

    #[test]
    fn test_selection_scrolls_into_view() {
        let store = store_with(40);
        store.set_selection(Some(22));
        assert_eq!(store.get_state().viewport.scroll_offset, 2);

        store.set_selection(Some(0));
        assert_eq!(store.get_state().viewport.scroll_offset, 0);
    }

    #[test]
    fn test_clipboard_invariant_holds() {
        let store = store_with(2);
        let entry = FileEntry::file("/tmp", "file00.txt");

        let check = |store: &Store| {
            let state = store.get_state();
            assert_eq!(state.clipboard.entry().is_none(), state.clipboard.operation().is_none());
        };

        check(&store);
        store.set_clipboard(entry.clone(), ClipboardOperation::Copy);
        check(&store);
        store.set_clipboard(FileEntry::file("/tmp", "file01.txt"), ClipboardOperation::Cut);
        check(&store);
        assert_eq!(store.get_state().clipboard.operation(), Some(ClipboardOperation::Cut));
        assert_eq!(store.get_state().clipboard.entry().unwrap().name, "file01.txt");
        store.clear_clipboard();
        check(&store);
        assert!(store.get_state().clipboard.is_empty());
    }

    #[test]
    fn test_context_menu() {
        let store = store_with(2);
        let target = FileEntry::file("/tmp", "file01.txt");
        store.show_context_menu(Position::new(10, 8), Some(target.clone()));

        let state = store.get_state();
        assert!(state.context_menu.visible);
        assert_eq!(state.context_menu.position, Position::new(10, 8));
        assert_eq!(state.context_menu.target.as_ref(), Some(&target));

        store.hide_context_menu();
        assert!(!store.get_state().context_menu.visible);
    }

    #[test]
    fn test_status_expiry() {
        let store = store_with(0);
        store.set_status("copied", StatusLevel::Info, Duration::ZERO);
        let state = store.get_state();
        let status = state.status.as_ref().unwrap();
        assert!(status.is_expired(Instant::now()));

        store.clear_status();
        assert!(store.get_state().status.is_none());
    }

    #[test]
    fn test_layout_never_zero_on_tiny_terminal() {
        let store = store_with(3);
        store.set_terminal_size(TerminalSize::new(4, 3));
        let state = store.get_state();
        assert_eq!(state.viewport.items_per_row, 1);
        assert_eq!(state.viewport.total_rows, 1);
    }
}
