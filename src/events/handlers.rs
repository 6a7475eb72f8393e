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

//! Event handlers.
//!
//! Each handler turns one event into store actions, background tasks or
//! follow-up events. Follow-up events are sent back through the main event
//! channel rather than handled inline, so they are processed in order after
//! the current event.
//!
//! Pointer coordinates are only ever translated to items through the layout
//! module; nothing here does grid arithmetic of its own.

use std::{
    cell::{Cell, RefCell},
    path::{Path, PathBuf},
    rc::Rc,
    sync::mpsc::Sender,
    time::{Duration, Instant},
};

use anyhow::Result;
use tracing::{debug, info, trace, warn};

use crate::{
    error::AppError,
    events::{AppEvent, EventBus, MenuAction, Navigation, OperationOutcome, Topic, key_handlers},
    input::{ClickKind, InputDecoder, InputEvent, PointerButton, PointerEvent},
    layout,
    model::{ClipboardOperation, FileEntry, Position, TerminalSize},
    render::menu,
    state::{AppState, StatusLevel, Store},
    tasks::AppTask,
};

/// Topics served by [`dispatch`]. Resize is registered by the controller
/// itself, and quitting is handled by the main loop.
const HANDLED_TOPICS: &[Topic] = &[
    Topic::Input,
    Topic::Navigation,
    Topic::PointerClick,
    Topic::PointerDoubleClick,
    Topic::PointerRightClick,
    Topic::FileOpened,
    Topic::OpenWithEditor,
    Topic::FileCopy,
    Topic::FileCut,
    Topic::FilePaste,
    Topic::FileDelete,
    Topic::ShowContextMenu,
    Topic::HideContextMenu,
    Topic::ContextMenuAction,
    Topic::Refresh,
    Topic::DirectoryLoaded,
    Topic::OperationFinished,
    Topic::Tick,
];

/// Bundles the shared resources every handler needs.
pub(crate) struct HandlerContext {
    pub(crate) store: Rc<Store>,
    pub(crate) decoder: RefCell<InputDecoder>,
    event_tx: Sender<AppEvent>,
    task_tx: Sender<AppTask>,
    status_timeout: Duration,
    /// Generation of the most recent directory load request.
    load_generation: Cell<u64>,
    /// Set when the last click closed the context menu, so the second half
    /// of a double-click does not land on whatever was under the menu.
    menu_absorbed_click: Cell<bool>,
}

impl HandlerContext {
    pub(crate) fn new(
        store: Rc<Store>,
        decoder: InputDecoder,
        event_tx: Sender<AppEvent>,
        task_tx: Sender<AppTask>,
        status_timeout: Duration,
    ) -> Self {
        Self {
            store,
            decoder: RefCell::new(decoder),
            event_tx,
            task_tx,
            status_timeout,
            load_generation: Cell::new(0),
            menu_absorbed_click: Cell::new(false),
        }
    }

    /// Requests a listing of the current directory.
    ///
    /// Any load still in flight is superseded; its result will be dropped.
    pub(crate) fn load_directory(&self) -> Result<()> {
        let generation = self.load_generation.get() + 1;
        self.load_generation.set(generation);

        let path = self.store.get_state().viewport.current_path.clone();
        debug!(generation, path = %path.display(), "loading directory");
        self.task_tx.send(AppTask::LoadDirectory { generation, path })?;

        Ok(())
    }

    fn navigate_to(&self, path: PathBuf) -> Result<()> {
        self.store.set_path(path);
        self.load_directory()
    }

    fn send(&self, event: AppEvent) -> Result<()> {
        self.event_tx.send(event)?;
        Ok(())
    }

    fn status(&self, text: impl Into<String>, level: StatusLevel) {
        self.store.set_status(text, level, self.status_timeout);
    }

    fn selected_entry(&self) -> Option<FileEntry> {
        self.store.get_state().selection.entry().cloned()
    }
}

/// Subscribes [`dispatch`] for every topic it serves, replacing earlier
/// bindings of those topics.
pub(crate) fn register_handlers(bus: &EventBus, ctx: &Rc<HandlerContext>) {
    for topic in HANDLED_TOPICS {
        bus.unsubscribe_all(*topic);
        let ctx = Rc::clone(ctx);
        bus.subscribe(*topic, move |event| dispatch(&ctx, event));
    }
}

/// Routes an event to its handler.
pub(crate) fn dispatch(ctx: &HandlerContext, event: &AppEvent) -> Result<()> {
    match event {
        AppEvent::Input { bytes, at } => handle_input(ctx, bytes, *at),

        AppEvent::Navigation(navigation) => handle_navigation(ctx, *navigation),

        AppEvent::PointerClick { x, y } => handle_pointer_click(ctx, *x, *y),
        AppEvent::PointerDoubleClick { x, y } => handle_pointer_double_click(ctx, *x, *y),
        AppEvent::PointerRightClick { x, y } => handle_pointer_right_click(ctx, *x, *y),

        AppEvent::FileOpened => handle_file_opened(ctx),
        AppEvent::OpenWithEditor => handle_open_with_editor(ctx),
        AppEvent::FileCopy => handle_clipboard(ctx, ClipboardOperation::Copy),
        AppEvent::FileCut => handle_clipboard(ctx, ClipboardOperation::Cut),
        AppEvent::FilePaste => handle_file_paste(ctx),
        AppEvent::FileDelete => handle_file_delete(ctx),

        AppEvent::ShowContextMenu => handle_show_context_menu(ctx),
        AppEvent::HideContextMenu => {
            hide_context_menu(ctx);
            Ok(())
        }
        AppEvent::ContextMenuAction(action) => handle_context_menu_action(ctx, *action),

        AppEvent::Refresh => ctx.load_directory(),
        AppEvent::Resize(size) => {
            handle_resize(ctx, *size);
            Ok(())
        }

        AppEvent::DirectoryLoaded {
            generation,
            path,
            result,
        } => {
            handle_directory_loaded(ctx, *generation, path, result);
            Ok(())
        }
        AppEvent::OperationFinished(result) => handle_operation_finished(ctx, result),

        AppEvent::Tick => {
            handle_tick(ctx, Instant::now());
            Ok(())
        }
        AppEvent::Quit => Ok(()),
    }
}

fn handle_input(ctx: &HandlerContext, bytes: &[u8], at: Instant) -> Result<()> {
    let inputs = ctx.decoder.borrow_mut().decode(bytes, at);

    for input in inputs {
        let event = match input {
            InputEvent::Key(key) => {
                let menu_visible = ctx.store.get_state().context_menu.visible;
                let Some(event) = key_handlers::map_key(&key, menu_visible) else {
                    trace!(key = %key.name(), "unbound key");
                    continue;
                };
                event
            }
            InputEvent::Pointer(pointer) => {
                let Some(event) = pointer_event(pointer) else {
                    continue;
                };
                event
            }
        };
        ctx.send(event)?;
    }

    Ok(())
}

fn pointer_event(pointer: PointerEvent) -> Option<AppEvent> {
    let PointerEvent { x, y, button, kind } = pointer;
    match (button, kind) {
        (PointerButton::Left, ClickKind::Click) => Some(AppEvent::PointerClick { x, y }),
        (PointerButton::Left, ClickKind::DoubleClick) => {
            Some(AppEvent::PointerDoubleClick { x, y })
        }
        (PointerButton::Right, _) => Some(AppEvent::PointerRightClick { x, y }),
        (PointerButton::Middle, _) => None,
    }
}

fn handle_navigation(ctx: &HandlerContext, navigation: Navigation) -> Result<()> {
    let state = ctx.store.get_state();
    let len = state.viewport.entries.len();

    match navigation {
        Navigation::Move(direction) => ctx.store.move_selection(direction),
        Navigation::First if len > 0 => ctx.store.set_selection(Some(0)),
        Navigation::Last if len > 0 => ctx.store.set_selection(Some(len - 1)),
        Navigation::First | Navigation::Last => {}
        Navigation::Back => {
            // The root is its own parent.
            if let Some(parent) = state.viewport.current_path.parent() {
                ctx.navigate_to(parent.to_path_buf())?;
            }
        }
    }

    Ok(())
}

/// The item under a screen cell, if any.
fn item_at(state: &AppState, x: u16, y: u16) -> Option<usize> {
    let viewport = &state.viewport;
    layout::resolve_pointer_index(
        usize::from(x),
        usize::from(y),
        &viewport.layout(),
        viewport.entries.len(),
        viewport.scroll_offset,
    )
}

fn handle_pointer_click(ctx: &HandlerContext, x: u16, y: u16) -> Result<()> {
    let state = ctx.store.get_state();

    if state.context_menu.visible {
        ctx.menu_absorbed_click.set(true);
        let geometry = menu::menu_geometry(&state.context_menu, state.viewport.terminal_size);
        let items = menu::menu_items(&state.context_menu);
        match geometry.action_at(items, usize::from(x), usize::from(y)) {
            Some(action) => ctx.send(AppEvent::ContextMenuAction(action))?,
            None => ctx.store.hide_context_menu(),
        }
        return Ok(());
    }

    ctx.menu_absorbed_click.set(false);
    ctx.store.set_selection(item_at(&state, x, y));

    Ok(())
}

fn handle_pointer_double_click(ctx: &HandlerContext, x: u16, y: u16) -> Result<()> {
    if ctx.menu_absorbed_click.replace(false) {
        return Ok(());
    }

    let state = ctx.store.get_state();
    if state.context_menu.visible {
        ctx.store.hide_context_menu();
        return Ok(());
    }

    if let Some(index) = item_at(&state, x, y) {
        ctx.store.set_selection(Some(index));
        handle_file_opened(ctx)?;
    }

    Ok(())
}

fn handle_pointer_right_click(ctx: &HandlerContext, x: u16, y: u16) -> Result<()> {
    let state = ctx.store.get_state();
    ctx.menu_absorbed_click.set(false);

    let target = match item_at(&state, x, y) {
        Some(index) => {
            ctx.store.set_selection(Some(index));
            ctx.selected_entry()
        }
        None => None,
    };
    ctx.store.show_context_menu(Position::new(x, y), target);

    Ok(())
}

fn handle_file_opened(ctx: &HandlerContext) -> Result<()> {
    let Some(entry) = ctx.selected_entry() else {
        return Ok(());
    };

    if entry.is_dir() {
        ctx.navigate_to(entry.path)
    } else {
        info!(path = %entry.path.display(), "opening file");
        ctx.status(format!("Opening {}…", entry.name), StatusLevel::Info);
        ctx.task_tx.send(AppTask::Open(entry.path))?;
        Ok(())
    }
}

fn handle_open_with_editor(ctx: &HandlerContext) -> Result<()> {
    let Some(entry) = ctx.selected_entry() else {
        return Ok(());
    };

    info!(path = %entry.path.display(), "opening in editor");
    ctx.status(format!("Editing {}…", entry.name), StatusLevel::Info);
    ctx.task_tx.send(AppTask::OpenWithEditor(entry.path))?;

    Ok(())
}

fn handle_clipboard(ctx: &HandlerContext, operation: ClipboardOperation) -> Result<()> {
    let Some(entry) = ctx.selected_entry() else {
        return Ok(());
    };

    let verb = match operation {
        ClipboardOperation::Copy => "Copied",
        ClipboardOperation::Cut => "Cut",
    };
    let message = format!("{verb} {}", entry.name);
    ctx.store.set_clipboard(entry, operation);
    ctx.status(message, StatusLevel::Info);

    Ok(())
}

fn handle_file_paste(ctx: &HandlerContext) -> Result<()> {
    let state = ctx.store.get_state();
    let (Some(entry), Some(operation)) = (state.clipboard.entry(), state.clipboard.operation())
    else {
        return Ok(());
    };

    ctx.task_tx.send(AppTask::Paste {
        entry: entry.clone(),
        operation,
        target_dir: state.viewport.current_path.clone(),
    })?;

    Ok(())
}

fn handle_file_delete(ctx: &HandlerContext) -> Result<()> {
    let Some(entry) = ctx.selected_entry() else {
        return Ok(());
    };

    info!(path = %entry.path.display(), "deleting");
    ctx.task_tx.send(AppTask::Delete(entry))?;

    Ok(())
}

// Opened from the keyboard, the menu appears over the selected item, or at
// the top of the grid when nothing is selected.
fn handle_show_context_menu(ctx: &HandlerContext) -> Result<()> {
    let state = ctx.store.get_state();
    let viewport = &state.viewport;
    let layout = viewport.layout();

    let visible = layout::get_visible_items(viewport.entries.len(), viewport.scroll_offset, &layout);
    let (position, target) = match (state.selection.index(), state.selection.entry()) {
        (Some(index), Some(entry)) if visible.contains(&index) => {
            let item = layout::get_item_position(index - visible.start, &layout);
            (
                Position::new(to_u16(item.x + 2), to_u16(item.y + 1)),
                Some(entry.clone()),
            )
        }
        _ => (
            Position::new(
                to_u16(layout::CONTENT_LEFT),
                to_u16(layout.content_start_row),
            ),
            None,
        ),
    };
    ctx.store.show_context_menu(position, target);

    Ok(())
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn hide_context_menu(ctx: &HandlerContext) {
    if ctx.store.get_state().context_menu.visible {
        ctx.store.hide_context_menu();
    }
}

fn handle_context_menu_action(ctx: &HandlerContext, action: MenuAction) -> Result<()> {
    hide_context_menu(ctx);
    debug!(action = action.as_str(), "context menu action");

    let event = match action {
        MenuAction::Open => AppEvent::FileOpened,
        MenuAction::OpenWithEditor => AppEvent::OpenWithEditor,
        MenuAction::Copy => AppEvent::FileCopy,
        MenuAction::Cut => AppEvent::FileCut,
        MenuAction::Paste => AppEvent::FilePaste,
        MenuAction::Delete => AppEvent::FileDelete,
        MenuAction::Refresh => AppEvent::Refresh,
    };
    ctx.send(event)
}

/// Stores new terminal dimensions, ignoring reports of an unchanged size.
pub(crate) fn handle_resize(ctx: &HandlerContext, size: TerminalSize) {
    if ctx.store.get_state().viewport.terminal_size != size {
        debug!(width = size.width, height = size.height, "terminal resized");
        ctx.store.set_terminal_size(size);
    }
}

fn handle_directory_loaded(
    ctx: &HandlerContext,
    generation: u64,
    path: &Path,
    result: &Result<Vec<FileEntry>, AppError>,
) {
    if generation != ctx.load_generation.get() {
        debug!(generation, path = %path.display(), "dropping superseded directory load");
        return;
    }

    match result {
        Ok(entries) => {
            debug!(count = entries.len(), path = %path.display(), "directory loaded");
            ctx.store.set_entries(entries.clone());
        }
        Err(e) => {
            warn!(error = %e, "failed to load directory");
            ctx.store.set_entries(Vec::new());
            ctx.status(e.to_string(), StatusLevel::Error);
        }
    }
}

fn handle_operation_finished(
    ctx: &HandlerContext,
    result: &Result<OperationOutcome, AppError>,
) -> Result<()> {
    match result {
        Ok(OperationOutcome::Pasted {
            operation,
            destination,
        }) => {
            if *operation == ClipboardOperation::Cut {
                ctx.store.clear_clipboard();
            }
            ctx.status(format!("Pasted {}", file_name(destination)), StatusLevel::Info);
            ctx.load_directory()
        }
        Ok(OperationOutcome::Deleted(path)) => {
            ctx.status(format!("Deleted {}", file_name(path)), StatusLevel::Info);
            ctx.load_directory()
        }
        Ok(OperationOutcome::Launched(path)) => {
            debug!(path = %path.display(), "launch finished");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "operation failed");
            ctx.status(e.to_string(), StatusLevel::Error);
            // A failed copy or delete may have got part way.
            if matches!(e, AppError::Io { .. }) {
                ctx.load_directory()?;
            }
            Ok(())
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn handle_tick(ctx: &HandlerContext, now: Instant) {
    let expired = ctx
        .store
        .get_state()
        .status
        .as_ref()
        .is_some_and(|status| status.is_expired(now));
    if expired {
        ctx.store.clear_status();
    }
}
