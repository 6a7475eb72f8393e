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

//! Terminal environment utilities.
//!
//! This module owns the handful of raw escape sequences that `crossterm` does
//! not expose in the exact form the browser needs (click-only mouse tracking
//! with SGR coordinates), plus the [`Terminal`] abstraction the controller
//! writes frames to.
//!
//! # Compatibility
//!
//! Mouse tracking relies on the terminal emulator supporting DEC private
//! modes 1000 (button press/release reporting) and 1006 (SGR extended
//! coordinates). Most modern terminals (XTerm, iTerm2, Alacritty, Kitty)
//! support both; terminals without 1006 fall back to the legacy encoding.

use std::io::{self, Stdout, Write};

use crossterm::terminal;

use crate::model::TerminalSize;

/// Enables button press/release reporting with SGR extended coordinates.
pub(crate) const ENABLE_MOUSE_TRACKING: &[u8] = b"\x1b[?1000h\x1b[?1006h";

/// Reverses [`ENABLE_MOUSE_TRACKING`].
pub(crate) const DISABLE_MOUSE_TRACKING: &[u8] = b"\x1b[?1006l\x1b[?1000l";

/// A writable terminal with mode control.
///
/// The real implementation drives the process's controlling terminal, tests
/// substitute an in-memory buffer.
pub(crate) trait Terminal: Write {
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
    fn size(&self) -> io::Result<TerminalSize>;
}

pub(crate) struct CrosstermTerminal {
    stdout: Stdout,
}

impl CrosstermTerminal {
    pub(crate) fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Write for CrosstermTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Terminal for CrosstermTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn size(&self) -> io::Result<TerminalSize> {
        current_size()
    }
}

/// Queries the controlling terminal's dimensions.
pub(crate) fn current_size() -> io::Result<TerminalSize> {
    let (width, height) = terminal::size()?;
    Ok(TerminalSize::new(width, height))
}
