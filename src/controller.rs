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

//! Application lifecycle and the main event loop.
//!
//! The [`Controller`] owns the terminal, the event bus and the state store,
//! and wires them together:
//!
//! * raw input and background completions arrive on one channel and are
//!   published on the bus, one at a time;
//! * handlers turn events into store actions;
//! * every store notification renders a full frame to the terminal.
//!
//! The terminal is restored by [`Controller::stop`], which also runs when the
//! controller is dropped, so an early return or a panic unwinding through
//! `main` still leaves the user's shell usable.

use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
    rc::Rc,
    sync::mpsc::{Receiver, Sender},
    time::Instant,
};

use anyhow::{Context as _, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    events::{
        AppEvent, EventBus, Topic,
        bus::Subscription,
        handlers::{self, HandlerContext},
    },
    input::InputDecoder,
    render,
    state::{ListenerId, Store},
    tasks::AppTask,
    theme::Theme,
    util::term::Terminal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    NotStarted,
    Running,
    Stopped,
}

pub(crate) struct Controller {
    lifecycle: Lifecycle,
    terminal: Rc<RefCell<Box<dyn Terminal>>>,
    theme: Theme,
    bus: EventBus,
    ctx: Rc<HandlerContext>,
    event_rx: Receiver<AppEvent>,
    render_listener: Option<ListenerId>,
    resize_subscription: Option<Subscription>,
}

impl Controller {
    /// Creates a controller browsing `start_dir`. Nothing is written to the
    /// terminal until [`Controller::start`].
    pub(crate) fn new(
        config: &AppConfig,
        start_dir: PathBuf,
        terminal: Box<dyn Terminal>,
        event_tx: Sender<AppEvent>,
        event_rx: Receiver<AppEvent>,
        task_tx: Sender<AppTask>,
    ) -> Result<Self> {
        let size = terminal.size().context("Failed to read terminal size")?;
        let store = Rc::new(Store::new(start_dir, size));
        let ctx = HandlerContext::new(
            store,
            InputDecoder::new(config.double_click_window()),
            event_tx,
            task_tx,
            config.status_timeout(),
        );

        Ok(Self {
            lifecycle: Lifecycle::NotStarted,
            terminal: Rc::new(RefCell::new(terminal)),
            theme: Theme::default(),
            bus: EventBus::new(),
            ctx: Rc::new(ctx),
            event_rx,
            render_listener: None,
            resize_subscription: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Takes over the terminal and loads the start directory.
    ///
    /// Does nothing if already running.
    pub(crate) fn start(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::Running {
            return Ok(());
        }
        info!("starting");

        // Running from the first write, so a failed start is still undone by
        // `stop`.
        self.lifecycle = Lifecycle::Running;
        {
            let mut terminal = self.terminal.borrow_mut();
            execute!(terminal, EnterAlternateScreen, Hide)
                .context("Failed to enter alternate screen")?;
            self.ctx
                .decoder
                .borrow_mut()
                .start(&mut **terminal)
                .context("Failed to enable terminal input modes")?;
        }

        handlers::register_handlers(&self.bus, &self.ctx);
        self.ctx.load_directory()?;

        let size = self.terminal.borrow().size();
        match size {
            Ok(size) => handlers::handle_resize(&self.ctx, size),
            Err(e) => warn!(error = %e, "failed to read terminal size"),
        }

        let render = self.render_callback();
        render();
        self.render_listener = Some(self.ctx.store.subscribe(move || render()));

        let ctx = Rc::clone(&self.ctx);
        let subscription = self.bus.subscribe(Topic::Resize, move |event| {
            if let AppEvent::Resize(size) = event {
                handlers::handle_resize(&ctx, *size);
            }
            Ok(())
        });
        self.resize_subscription = Some(subscription);

        Ok(())
    }

    /// Hands the terminal back: input modes off, cursor visible, primary
    /// screen restored. Does nothing unless running.
    pub(crate) fn stop(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Running {
            return Ok(());
        }
        self.lifecycle = Lifecycle::Stopped;
        info!("stopping");

        if let Some(listener) = self.render_listener.take() {
            self.ctx.store.unsubscribe(listener);
        }
        if let Some(subscription) = self.resize_subscription.take() {
            self.bus.unsubscribe(subscription);
        }
        self.bus.clear();

        // Restore as much as possible even if one step fails.
        let mut terminal = self.terminal.borrow_mut();
        let input = self.ctx.decoder.borrow_mut().stop(&mut **terminal);
        let screen = execute!(terminal, Show, LeaveAlternateScreen);

        input.context("Failed to restore terminal input modes")?;
        screen.context("Failed to leave alternate screen")?;
        Ok(())
    }

    /// Processes events until the user quits or every sender is gone.
    pub(crate) fn run(&mut self) -> Result<()> {
        while let Ok(event) = self.event_rx.recv() {
            if !self.process_event(&event) {
                break;
            }
        }
        Ok(())
    }

    /// Publishes one event, returning false when it asks the loop to end.
    fn process_event(&self, event: &AppEvent) -> bool {
        if matches!(event, AppEvent::Quit) {
            info!("quit requested");
            return false;
        }
        self.bus.publish(event);
        true
    }

    // The listener only holds a weak reference to the store it is
    // registered with.
    fn render_callback(&self) -> Rc<dyn Fn()> {
        let store = Rc::downgrade(&self.ctx.store);
        let terminal = Rc::clone(&self.terminal);
        let theme = self.theme;
        let last_size = Cell::new(None);

        Rc::new(move || {
            let Some(store) = store.upgrade() else {
                return;
            };
            let state = store.get_state();
            let frame = render::render_frame(&state, &theme, Instant::now());

            // A resized screen can keep stale cells outside the new frame.
            let size = state.viewport.terminal_size;
            let clear = last_size.replace(Some(size)) != Some(size);

            let mut terminal = terminal.borrow_mut();
            if let Err(e) = render::write_frame(&mut *terminal, &frame, clear) {
                warn!(error = %e, "failed to draw frame");
            } else {
                debug!(rows = frame.background.area.height, "frame drawn");
            }
        })
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc::{self, Receiver};

    use crate::{
        events::Navigation,
        model::{FileEntry, TerminalSize},
        state::Direction,
        util::term::testing::FakeTerminal,
    };

    struct Harness {
        controller: Controller,
        terminal: FakeTerminal,
        event_tx: Sender<AppEvent>,
        task_rx: Receiver<AppTask>,
    }

    fn harness() -> Harness {
        let terminal = FakeTerminal::new(TerminalSize::new(80, 24));
        let (event_tx, event_rx) = mpsc::channel();
        let (task_tx, task_rx) = mpsc::channel();
        let controller = Controller::new(
            &AppConfig::default(),
            PathBuf::from("/home/user"),
            Box::new(terminal.clone()),
            event_tx.clone(),
            event_rx,
            task_tx,
        )
        .unwrap();

        Harness {
            controller,
            terminal,
            event_tx,
            task_rx,
        }
    }

    fn loaded(generation: u64, entries: Vec<FileEntry>) -> AppEvent {
        AppEvent::DirectoryLoaded {
            generation,
            path: PathBuf::from("/home/user"),
            result: Ok(entries),
        }
    }

    #[test]
    fn test_start_takes_over_terminal() {
        let mut h = harness();
        assert_eq!(h.controller.lifecycle(), Lifecycle::NotStarted);

        h.controller.start().unwrap();
        assert_eq!(h.controller.lifecycle(), Lifecycle::Running);
        assert!(*h.terminal.raw_mode.borrow());
        assert!(h.controller.ctx.decoder.borrow().is_active());

        let written = h.terminal.written();
        assert!(written.contains("\x1b[?1049h"));
        assert!(written.contains("\x1b[?25l"));
        assert!(written.contains("\x1b[?1000h"));
        assert!(written.contains("deskfm"));

        assert!(matches!(
            h.task_rx.try_recv().unwrap(),
            AppTask::LoadDirectory { generation: 1, .. }
        ));

        // Starting again changes nothing.
        h.terminal.reset();
        h.controller.start().unwrap();
        assert!(h.terminal.written().is_empty());
        assert!(h.task_rx.try_recv().is_err());
    }

    #[test]
    fn test_stop_restores_terminal_once() {
        let mut h = harness();
        h.controller.start().unwrap();
        h.terminal.reset();

        h.controller.stop().unwrap();
        assert_eq!(h.controller.lifecycle(), Lifecycle::Stopped);
        assert!(!*h.terminal.raw_mode.borrow());
        assert!(!h.controller.ctx.decoder.borrow().is_active());

        let written = h.terminal.written();
        assert!(written.contains("\x1b[?25h"));
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?1000l"));

        assert_eq!(h.controller.bus.handler_count(Topic::Navigation), 0);
        assert_eq!(h.controller.ctx.store.listener_count(), 0);

        h.terminal.reset();
        h.controller.stop().unwrap();
        assert!(h.terminal.written().is_empty());
    }

    #[test]
    fn test_failed_start_still_restores_screen() {
        let mut terminal = FakeTerminal::new(TerminalSize::new(80, 24));
        terminal.refuse_raw_mode = true;
        let (event_tx, event_rx) = mpsc::channel();
        let (task_tx, _task_rx) = mpsc::channel();
        let mut controller = Controller::new(
            &AppConfig::default(),
            PathBuf::from("/home/user"),
            Box::new(terminal.clone()),
            event_tx,
            event_rx,
            task_tx,
        )
        .unwrap();

        assert!(controller.start().is_err());
        assert!(terminal.written().contains("\x1b[?1049h"));

        drop(controller);
        let written = terminal.written();
        assert!(written.contains("\x1b[?25h"));
        assert!(written.contains("\x1b[?1049l"));
    }

    #[test]
    fn test_stop_before_start_is_a_no_op() {
        let mut h = harness();
        h.controller.stop().unwrap();
        assert_eq!(h.controller.lifecycle(), Lifecycle::NotStarted);
        assert!(h.terminal.written().is_empty());
    }

    #[test]
    fn test_each_state_change_renders_a_frame() {
        let mut h = harness();
        h.controller.start().unwrap();
        h.terminal.reset();

        let entries = vec![
            FileEntry::directory("/home/user", "docs"),
            FileEntry::file("/home/user", "notes.txt"),
        ];
        assert!(h.controller.process_event(&loaded(1, entries)));
        let written = h.terminal.written();
        assert!(written.contains("notes.txt"));
        assert!(written.contains("2 items"));

        h.terminal.reset();
        h.controller
            .process_event(&AppEvent::Navigation(Navigation::Move(Direction::Right)));
        assert!(h.terminal.written().contains("1/2 items"));

        // An ignored stale load renders nothing.
        h.terminal.reset();
        h.controller.process_event(&loaded(0, Vec::new()));
        assert!(h.terminal.written().is_empty());
    }

    #[test]
    fn test_resize_rerenders_with_clear() {
        let mut h = harness();
        h.controller.start().unwrap();
        h.terminal.reset();

        h.controller
            .process_event(&AppEvent::Resize(TerminalSize::new(100, 30)));
        assert_eq!(
            h.controller.ctx.store.get_state().viewport.terminal_size,
            TerminalSize::new(100, 30)
        );
        assert!(h.terminal.written().contains("\x1b[2J"));
    }

    #[test]
    fn test_run_ends_on_quit() {
        let mut h = harness();
        h.controller.start().unwrap();

        h.event_tx.send(loaded(1, Vec::new())).unwrap();
        h.event_tx.send(AppEvent::Quit).unwrap();
        h.event_tx.send(AppEvent::Refresh).unwrap();
        h.controller.run().unwrap();

        // The refresh after quitting was never processed.
        let _ = h.task_rx.try_recv();
        assert!(h.task_rx.try_recv().is_err());
        assert!(h.terminal.written().contains("This folder is empty"));
    }

    #[test]
    fn test_drop_restores_terminal() {
        let mut h = harness();
        h.controller.start().unwrap();
        let terminal = h.terminal.clone();

        drop(h);
        assert!(!*terminal.raw_mode.borrow());
        assert!(terminal.written().contains("\x1b[?1049l"));
    }
}
