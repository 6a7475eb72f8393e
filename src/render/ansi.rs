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

//! Conversion of buffer rows into text with embedded escape sequences.
//!
//! Frames are drawn into `ratatui` buffers and written out a whole row at a
//! time. Cells hidden behind a wide character are skipped, so every row
//! occupies exactly the buffer's width on screen.

use crossterm::style::{Attribute, Color as TermColor, ContentStyle};
use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

const ATTRIBUTES: [(Modifier, Attribute); 5] = [
    (Modifier::BOLD, Attribute::Bold),
    (Modifier::DIM, Attribute::Dim),
    (Modifier::ITALIC, Attribute::Italic),
    (Modifier::UNDERLINED, Attribute::Underlined),
    (Modifier::REVERSED, Attribute::Reverse),
];

/// One buffer row as styled runs of text.
///
/// `y` is an absolute row of the buffer's area.
pub(crate) fn buffer_line(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    let mut line = String::new();
    let mut run = String::new();
    let mut run_style = ContentStyle::default();
    let mut hidden = 0;

    for x in area.left()..area.right() {
        if hidden > 0 {
            hidden -= 1;
            continue;
        }
        let cell = &buf[(x, y)];
        let symbol = cell.symbol();
        hidden = symbol.width().saturating_sub(1);

        let style = content_style(cell.style());
        if style != run_style && !run.is_empty() {
            push_run(&mut line, &run, run_style);
            run.clear();
        }
        run_style = style;
        run.push_str(symbol);
    }
    if !run.is_empty() {
        push_run(&mut line, &run, run_style);
    }

    line
}

fn push_run(line: &mut String, run: &str, style: ContentStyle) {
    if style == ContentStyle::default() {
        line.push_str(run);
    } else {
        line.push_str(&style.apply(run).to_string());
    }
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.and_then(term_colour);
    content.background_color = style.bg.and_then(term_colour);
    for (modifier, attribute) in ATTRIBUTES {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

// `Reset` means "leave the terminal default alone".
fn term_colour(colour: Color) -> Option<TermColor> {
    let colour = match colour {
        Color::Reset => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    };
    Some(colour)
}

/// The characters of one buffer row, without styling.
#[cfg(test)]
pub(crate) fn plain_line(buf: &Buffer, y: u16) -> String {
    let area = buf.area;
    let mut line = String::new();
    let mut hidden = 0;
    for x in area.left()..area.right() {
        if hidden > 0 {
            hidden -= 1;
            continue;
        }
        let symbol = buf[(x, y)].symbol();
        hidden = symbol.width().saturating_sub(1);
        line.push_str(symbol);
    }
    line
}
