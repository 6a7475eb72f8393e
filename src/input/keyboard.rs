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

//! Keyboard decoding.
//!
//! Turns one raw input chunk, as read from a terminal in raw mode, into
//! exactly one [`KeyEvent`]. The decoder is stateless: every chunk is assumed
//! to hold one complete key press, which is how terminals deliver keys when
//! the reader drains stdin as soon as bytes arrive.
//!
//! Unrecognized input never fails, it decodes to an opaque key
//! ([`Key::Ansi`], [`Key::EscapeSequence`] or [`Key::Unknown`]) that the
//! key bindings simply ignore.

use std::{fmt, io};

use crate::util::term::Terminal;

const ESC: u8 = 0x1b;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Key {
    Char(char),
    Ctrl(char),
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    F(u16),
    /// A CSI sequence with an unrecognized body.
    Ansi(String),
    /// Any other escape-prefixed sequence; the payload excludes the ESC.
    EscapeSequence(String),
    Unknown(u32),
}

/// Symbolic names, e.g. `up`, `ctrl+c`, `ansi:1;5A` or `unknown:128`.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Ctrl(c) => write!(f, "ctrl+{c}"),
            Key::Escape => f.write_str("escape"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
            Key::Space => f.write_str("space"),
            Key::Backspace => f.write_str("backspace"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::Insert => f.write_str("insert"),
            Key::Delete => f.write_str("delete"),
            Key::PageUp => f.write_str("pageup"),
            Key::PageDown => f.write_str("pagedown"),
            Key::F(n) => write!(f, "f{n}"),
            Key::Ansi(body) => write!(f, "ansi:{body}"),
            Key::EscapeSequence(rest) => write!(f, "escape:{rest}"),
            Key::Unknown(code) => write!(f, "unknown:{code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyEvent {
    pub(crate) key: Key,
    pub(crate) ctrl: bool,
    pub(crate) alt: bool,
    pub(crate) shift: bool,
}

impl KeyEvent {
    pub(crate) fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    /// The symbolic key name.
    pub(crate) fn name(&self) -> String {
        self.key.to_string()
    }
}

/// Decodes keyboard chunks and owns the raw-mode switch.
#[derive(Debug, Default)]
pub(crate) struct KeyboardDecoder {
    active: bool,
}

impl KeyboardDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Puts the terminal into raw (non-canonical, non-echoing) mode.
    pub(crate) fn start(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        terminal.enable_raw_mode()?;
        self.active = true;
        Ok(())
    }

    pub(crate) fn stop(&mut self, terminal: &mut dyn Terminal) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal.disable_raw_mode()
    }

    pub(crate) fn decode(&self, chunk: &[u8]) -> KeyEvent {
        decode_key(chunk)
    }
}

/// Decodes a single input chunk into a key event.
pub(crate) fn decode_key(chunk: &[u8]) -> KeyEvent {
    match chunk {
        [] => KeyEvent::plain(Key::Unknown(0)),
        // Multi-byte escape sequences must be tested before the single-byte
        // table, since CSI bodies reuse printable letters.
        [ESC, b'[', body @ ..] if !body.is_empty() => KeyEvent::plain(decode_csi(body)),
        [ESC, rest @ ..] if !rest.is_empty() => {
            let rest = String::from_utf8_lossy(rest).into_owned();
            let alt = rest.chars().count() == 1;
            KeyEvent {
                key: Key::EscapeSequence(rest),
                ctrl: false,
                alt,
                shift: false,
            }
        }
        [byte] => decode_byte(*byte),
        _ => decode_text(chunk),
    }
}

fn decode_byte(byte: u8) -> KeyEvent {
    match byte {
        0x03 => ctrl('c'),
        ESC => KeyEvent::plain(Key::Escape),
        0x0d => KeyEvent::plain(Key::Enter),
        0x09 => KeyEvent::plain(Key::Tab),
        0x20 => KeyEvent::plain(Key::Space),
        0x08 | 0x7f => KeyEvent::plain(Key::Backspace),
        0x01..=0x1a => ctrl((byte + 96) as char),
        0x21..=0x7e => {
            let c = byte as char;
            KeyEvent {
                key: Key::Char(c),
                ctrl: false,
                alt: false,
                shift: c.is_ascii_uppercase(),
            }
        }
        _ => KeyEvent::plain(Key::Unknown(byte as u32)),
    }
}

// A lone multi-byte UTF-8 character is a printable key; anything else is
// opaque.
fn decode_text(chunk: &[u8]) -> KeyEvent {
    if let Ok(text) = std::str::from_utf8(chunk) {
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return KeyEvent {
                key: Key::Char(c),
                ctrl: false,
                alt: false,
                shift: c.is_uppercase(),
            };
        }
    }
    KeyEvent::plain(Key::Unknown(chunk[0] as u32))
}

fn decode_csi(body: &[u8]) -> Key {
    match body {
        b"A" => Key::Up,
        b"B" => Key::Down,
        b"C" => Key::Right,
        b"D" => Key::Left,
        b"H" => Key::Home,
        b"F" => Key::End,
        b"2~" => Key::Insert,
        b"3~" => Key::Delete,
        b"5~" => Key::PageUp,
        b"6~" => Key::PageDown,
        [digits @ .., b'~'] if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) => {
            // All-digit bodies fit in a u16 only for sane lengths.
            std::str::from_utf8(digits)
                .ok()
                .and_then(|d| d.parse().ok())
                .map(Key::F)
                .unwrap_or_else(|| Key::Ansi(String::from_utf8_lossy(body).into_owned()))
        }
        _ => Key::Ansi(String::from_utf8_lossy(body).into_owned()),
    }
}

fn ctrl(letter: char) -> KeyEvent {
    KeyEvent {
        key: Key::Ctrl(letter),
        ctrl: true,
        alt: false,
        shift: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::TerminalSize, util::term::testing::FakeTerminal};

    #[test]
    fn test_arrow_keys() {
        assert_eq!(decode_key(b"\x1b[A").key, Key::Up);
        assert_eq!(decode_key(b"\x1b[B").key, Key::Down);
        assert_eq!(decode_key(b"\x1b[C").key, Key::Right);
        assert_eq!(decode_key(b"\x1b[D").key, Key::Left);
        assert_eq!(decode_key(b"\x1b[A").name(), "up");
    }

    #[test]
    fn test_ctrl_c() {
        let event = decode_key(&[0x03]);
        assert_eq!(event.name(), "ctrl+c");
        assert!(event.ctrl);
    }

    #[test]
    fn test_printable_passes_through() {
        let event = decode_key(b"a");
        assert_eq!(event.key, Key::Char('a'));
        assert_eq!(event.name(), "a");
        assert!(!event.ctrl && !event.alt && !event.shift);

        assert!(decode_key(b"A").shift);
    }

    #[test]
    fn test_named_control_bytes() {
        assert_eq!(decode_key(&[0x1b]).key, Key::Escape);
        assert_eq!(decode_key(&[0x0d]).key, Key::Enter);
        assert_eq!(decode_key(&[0x09]).key, Key::Tab);
        assert_eq!(decode_key(&[0x20]).key, Key::Space);
        assert_eq!(decode_key(&[0x08]).key, Key::Backspace);
        assert_eq!(decode_key(&[0x7f]).key, Key::Backspace);
    }

    #[test]
    fn test_other_control_bytes_are_ctrl_letters() {
        assert_eq!(decode_key(&[0x01]).name(), "ctrl+a");
        assert_eq!(decode_key(&[0x0a]).name(), "ctrl+j");
        assert_eq!(decode_key(&[0x1a]).name(), "ctrl+z");
    }

    #[test]
    fn test_navigation_csi_keys() {
        assert_eq!(decode_key(b"\x1b[H").key, Key::Home);
        assert_eq!(decode_key(b"\x1b[F").key, Key::End);
        assert_eq!(decode_key(b"\x1b[2~").key, Key::Insert);
        assert_eq!(decode_key(b"\x1b[3~").key, Key::Delete);
        assert_eq!(decode_key(b"\x1b[5~").key, Key::PageUp);
        assert_eq!(decode_key(b"\x1b[6~").key, Key::PageDown);
        assert_eq!(decode_key(b"\x1b[15~").name(), "f15");
    }

    #[test]
    fn test_unrecognized_sequences_are_opaque() {
        assert_eq!(decode_key(b"\x1b[1;5A").name(), "ansi:1;5A");
        assert_eq!(decode_key(b"\x1bOP").name(), "escape:OP");
        assert_eq!(decode_key(&[0x80]).name(), "unknown:128");

        let alt_x = decode_key(b"\x1bx");
        assert_eq!(alt_x.name(), "escape:x");
        assert!(alt_x.alt);
    }

    #[test]
    fn test_utf8_character() {
        assert_eq!(decode_key("é".as_bytes()).key, Key::Char('é'));
    }

    #[test]
    fn test_start_stop_are_idempotent() {
        let mut terminal = FakeTerminal::new(TerminalSize::new(80, 24));
        let mut decoder = KeyboardDecoder::new();

        decoder.start(&mut terminal).unwrap();
        decoder.start(&mut terminal).unwrap();
        assert!(decoder.is_active());
        assert!(*terminal.raw_mode.borrow());

        decoder.stop(&mut terminal).unwrap();
        decoder.stop(&mut terminal).unwrap();
        assert!(!decoder.is_active());
        assert!(!*terminal.raw_mode.borrow());
    }
}
