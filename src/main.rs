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

//! # Desktop File Manager TUI.
//!
//! A terminal file browser drawn as a simulated desktop window, with an icon
//! grid, mouse support and a context menu.
//!
//! ## Architecture
//!
//! Everything that touches application state runs on the main thread, one
//! event at a time. Other threads only produce events:
//!
//! * The **Input Reader** forwards raw stdin chunks for decoding.
//! * The **Ticker** sends periodic ticks and reports terminal resizes.
//! * The **Task Worker** lists directories, runs file operations and launches
//!   external programs, sending the results back as events.
//! * The **Signal Listener** turns SIGTERM, SIGHUP and SIGINT into a quit
//!   request.
//!
//! All of them share one `std::sync::mpsc` channel drained by the
//! [`controller::Controller`], which also owns the terminal and restores it
//! on the way out.

mod config;
mod controller;
mod error;
mod events;
mod fs;
mod input;
mod launcher;
mod layout;
mod logging;
mod model;
mod render;
#[cfg(unix)]
mod signals;
mod state;
mod tasks;
mod theme;
mod util;

use std::{
    env,
    path::PathBuf,
    sync::{Arc, mpsc},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    controller::Controller,
    events::AppEvent,
    fs::LocalFileSystem,
    launcher::SystemLauncher,
    util::term::{self, CrosstermTerminal},
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// The entry point of the application.
///
/// An optional first argument names the directory to open, overriding the
/// configured start directory.
fn main() -> Result<()> {
    let mut config = config::load_config();
    if let Some(dir) = env::args_os().nth(1) {
        config.start_dir = Some(PathBuf::from(dir));
    }

    logging::init_logging(&config);
    logging::install_panic_hook();

    let start_dir = config
        .resolve_start_dir()
        .context("Failed to resolve start directory")?;
    info!(path = %start_dir.display(), "starting in directory");

    let (event_tx, event_rx) = mpsc::channel();
    let (task_tx, task_rx) = mpsc::channel();

    #[cfg(unix)]
    signals::spawn_signal_listener(event_tx.clone())?;

    tasks::spawn_task_worker(
        Box::new(LocalFileSystem),
        Arc::new(SystemLauncher::new(config.editor_command())),
        task_rx,
        event_tx.clone(),
    );

    let mut controller = Controller::new(
        &config,
        start_dir,
        Box::new(CrosstermTerminal::new()),
        event_tx.clone(),
        event_rx,
        task_tx,
    )
    .context("Failed to initialise application")?;

    controller.start().context("Failed to start")?;

    input::spawn_input_reader(event_tx.clone());
    spawn_ticker(event_tx);

    let res = controller.run();
    let stopped = controller.stop();

    res.context("Application error occurred")?;
    stopped.context("Failed to restore terminal")
}

/// Sends a periodic tick, and a resize event whenever the terminal's
/// dimensions change.
///
/// Resizes are detected by polling since raw stdin carries no resize
/// notification.
fn spawn_ticker(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let mut last_size = term::current_size().ok();
        loop {
            thread::sleep(TICK_INTERVAL);

            match term::current_size() {
                Ok(size) if Some(size) != last_size => {
                    last_size = Some(size);
                    if event_tx.send(AppEvent::Resize(size)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "failed to read terminal size"),
            }

            if event_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}
