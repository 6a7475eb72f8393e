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

//! Raw terminal input decoding.
//!
//! Bytes are read from stdin on a dedicated thread and forwarded, unparsed,
//! to the main loop as [`AppEvent::Input`] chunks. Decoding happens on the
//! main thread through [`InputDecoder`], so the double-click tracker has a
//! single owner.
//!
//! # Organization
//!
//! * [`keyboard`]: one chunk in, one [`KeyEvent`] out.
//! * [`pointer`]: SGR and legacy mouse reports, with double-click synthesis.

pub(crate) mod keyboard;
pub(crate) mod pointer;

use std::{
    io::{self, Read},
    sync::mpsc::Sender,
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{events::AppEvent, util::term::Terminal};

pub(crate) use keyboard::{Key, KeyEvent, KeyboardDecoder};
pub(crate) use pointer::{ClickKind, PointerButton, PointerDecoder, PointerEvent};

const READ_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

/// Routes input chunks to the keyboard or pointer decoder.
pub(crate) struct InputDecoder {
    keyboard: KeyboardDecoder,
    pointer: PointerDecoder,
}

impl InputDecoder {
    pub(crate) fn new(double_click_window: Duration) -> Self {
        Self {
            keyboard: KeyboardDecoder::new(),
            pointer: PointerDecoder::new(double_click_window),
        }
    }

    /// Enables raw mode and mouse tracking. Safe to call repeatedly.
    pub(crate) fn start(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        self.keyboard.start(terminal)?;
        self.pointer.start(terminal)
    }

    /// Disables mouse tracking and raw mode. Safe to call repeatedly.
    pub(crate) fn stop(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        let pointer = self.pointer.stop(terminal);
        let keyboard = self.keyboard.stop(terminal);
        pointer.and(keyboard)
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.keyboard.is_active() || self.pointer.is_active()
    }

    pub(crate) fn decode(&mut self, chunk: &[u8], at: Instant) -> Vec<InputEvent> {
        if pointer::is_pointer_sequence(chunk) {
            return self
                .pointer
                .decode(chunk, at)
                .into_iter()
                .map(InputEvent::Pointer)
                .collect();
        }
        vec![InputEvent::Key(self.keyboard.decode(chunk))]
    }
}

/// Spawns a thread forwarding raw stdin chunks to the main loop.
///
/// The thread exits when stdin closes or the main loop has gone away.
pub(crate) fn spawn_input_reader(event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let mut stdin = io::stdin().lock();
        let mut buf = [0u8; READ_BUFFER_SIZE];

        loop {
            match stdin.read(&mut buf) {
                Ok(0) => {
                    debug!("stdin closed");
                    break;
                }
                Ok(n) => {
                    let event = AppEvent::Input {
                        bytes: buf[..n].to_vec(),
                        at: Instant::now(),
                    };
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    });
}
