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

//! Termination signals delivered as quit requests.
//!
//! A signal sent from outside (`kill`, a closed terminal window, an external
//! interrupt) ends the session through the same path as the quit key, so the
//! terminal is restored before the process exits.

use std::{sync::mpsc::Sender, thread};

use anyhow::{Context, Result};
use signal_hook::{
    consts::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use tracing::info;

use crate::events::AppEvent;

const TERMINATION_SIGNALS: [i32; 3] = [SIGTERM, SIGHUP, SIGINT];

/// Sends [`AppEvent::Quit`] whenever a termination signal arrives.
///
/// The handlers are registered before this returns, replacing the default
/// action of killing the process.
pub(crate) fn spawn_signal_listener(event_tx: Sender<AppEvent>) -> Result<()> {
    let mut signals =
        Signals::new(TERMINATION_SIGNALS).context("Failed to register signal handlers")?;

    thread::spawn(move || {
        for signal in signals.forever() {
            info!(signal, "termination signal received");
            if event_tx.send(AppEvent::Quit).is_err() {
                break;
            }
        }
    });

    Ok(())
}
