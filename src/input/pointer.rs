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

//! Pointer (mouse) decoding.
//!
//! Two wire formats are recognized and normalized into [`PointerEvent`]s with
//! 0-based cell coordinates:
//!
//! * SGR extended: `ESC [ < button ; x ; y M` (press). The `m` (release)
//!   form is ignored.
//! * Legacy X10: `ESC [ M <button> <x> <y>`, each a single byte offset by 32
//!   (button) or 33 (0-based coordinates).
//!
//! Presses of the left button are additionally run through a
//! [`ClickTracker`], which reclassifies a quick second press at (nearly) the
//! same cell as a double-click.

use std::{
    io,
    time::{Duration, Instant},
};

use crate::util::term::{DISABLE_MOUSE_TRACKING, ENABLE_MOUSE_TRACKING, Terminal};

const SGR_PREFIX: &[u8] = b"\x1b[<";
const LEGACY_PREFIX: &[u8] = b"\x1b[M";

// Button codes carrying these bits report motion or the wheel, not clicks.
const MOTION_BIT: u16 = 32;
const WHEEL_BIT: u16 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClickKind {
    Click,
    DoubleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PointerEvent {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) button: PointerButton,
    pub(crate) kind: ClickKind,
}

/// A button press before double-click classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawClick {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) button: PointerButton,
}

/// Returns true when the chunk starts with a mouse report.
pub(crate) fn is_pointer_sequence(chunk: &[u8]) -> bool {
    chunk.starts_with(SGR_PREFIX) || chunk.starts_with(LEGACY_PREFIX)
}

/// Extracts every button press contained in `chunk`.
///
/// Terminals may coalesce a press and its release (or several reports) into
/// one read, so the whole chunk is scanned. Releases, motion, wheel events
/// and malformed reports produce nothing.
pub(crate) fn parse_pointer_sequences(chunk: &[u8]) -> Vec<RawClick> {
    let mut clicks = Vec::new();
    let mut rest = chunk;

    while !rest.is_empty() {
        if rest.starts_with(SGR_PREFIX) {
            let body = &rest[SGR_PREFIX.len()..];
            let Some(end) = body.iter().position(|b| *b == b'M' || *b == b'm') else {
                break;
            };
            if body[end] == b'M' {
                if let Some(click) = parse_sgr(&body[..end]) {
                    clicks.push(click);
                }
            }
            rest = &body[end + 1..];
        } else if rest.starts_with(LEGACY_PREFIX) {
            let body = &rest[LEGACY_PREFIX.len()..];
            if body.len() < 3 {
                break;
            }
            if let Some(click) = parse_legacy(body[0], body[1], body[2]) {
                clicks.push(click);
            }
            rest = &body[3..];
        } else {
            rest = &rest[1..];
        }
    }

    clicks
}

// Body of `ESC [ < b ; x ; y`, with 1-based coordinates.
fn parse_sgr(body: &[u8]) -> Option<RawClick> {
    let text = std::str::from_utf8(body).ok()?;
    let mut fields = text.split(';').map(|f| f.parse::<u16>().ok());

    let code = fields.next()??;
    let x = fields.next()??;
    let y = fields.next()??;
    if fields.next().is_some() {
        return None;
    }

    Some(RawClick {
        x: x.saturating_sub(1),
        y: y.saturating_sub(1),
        button: button_from_code(code)?,
    })
}

fn parse_legacy(button: u8, x: u8, y: u8) -> Option<RawClick> {
    let code = u16::from(button).checked_sub(32)?;
    Some(RawClick {
        x: u16::from(x).checked_sub(33)?,
        y: u16::from(y).checked_sub(33)?,
        button: button_from_code(code)?,
    })
}

fn button_from_code(code: u16) -> Option<PointerButton> {
    if code & (MOTION_BIT | WHEEL_BIT) != 0 {
        return None;
    }
    match code & 0b11 {
        0 => Some(PointerButton::Left),
        1 => Some(PointerButton::Middle),
        2 => Some(PointerButton::Right),
        _ => None,
    }
}

/// Merges two quick left clicks at (nearly) the same cell into a double-click.
///
/// After a double-click the tracker forgets the pair, so a third rapid click
/// starts a new pair rather than producing a triple-click.
#[derive(Debug)]
pub(crate) struct ClickTracker {
    window: Duration,
    last: Option<(Instant, u16, u16)>,
}

impl ClickTracker {
    pub(crate) fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub(crate) fn classify(&mut self, click: RawClick, at: Instant) -> PointerEvent {
        let kind = if click.button != PointerButton::Left {
            ClickKind::Click
        } else if self.is_double(&click, at) {
            self.last = None;
            ClickKind::DoubleClick
        } else {
            self.last = Some((at, click.x, click.y));
            ClickKind::Click
        };

        PointerEvent {
            x: click.x,
            y: click.y,
            button: click.button,
            kind,
        }
    }

    fn is_double(&self, click: &RawClick, at: Instant) -> bool {
        let Some((last_at, last_x, last_y)) = self.last else {
            return false;
        };
        let elapsed = at.saturating_duration_since(last_at);
        elapsed < self.window && click.x.abs_diff(last_x) <= 1 && click.y.abs_diff(last_y) <= 1
    }
}

/// Decodes mouse reports and owns the mouse-tracking terminal modes.
#[derive(Debug)]
pub(crate) struct PointerDecoder {
    active: bool,
    tracker: ClickTracker,
}

impl PointerDecoder {
    pub(crate) fn new(double_click_window: Duration) -> Self {
        Self {
            active: false,
            tracker: ClickTracker::new(double_click_window),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn start(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        terminal.write_all(ENABLE_MOUSE_TRACKING)?;
        terminal.flush()?;
        self.active = true;
        Ok(())
    }

    pub(crate) fn stop(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal.write_all(DISABLE_MOUSE_TRACKING)?;
        terminal.flush()
    }

    pub(crate) fn decode(&mut self, chunk: &[u8], at: Instant) -> Vec<PointerEvent> {
        parse_pointer_sequences(chunk)
            .into_iter()
            .map(|click| self.tracker.classify(click, at))
            .collect()
    }
}
