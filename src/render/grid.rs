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

//! The icon grid.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::{
    layout::{self, LayoutInfo},
    model::FileEntry,
    render::{
        icons::{self, ICON_FOLDER_OPEN},
        to_u16,
    },
    theme::Theme,
    util::format::truncate_end,
};

/// Columns available for an item's name, inside its cell padding.
const NAME_WIDTH: usize = layout::ITEM_WIDTH - 2;

/// Draws the visible part of the grid.
///
/// The buffer spans the `terminal_width - 2` columns between the window's
/// side borders and every visible grid row, starting at screen column 1 and
/// the layout's first content row, so item blocks sit at their screen
/// positions. Blocks never overlap, so stamping order does not matter. Only
/// the rows starting at `scroll_offset` are drawn.
pub(crate) fn render_file_grid(
    entries: &[FileEntry],
    selected_index: Option<usize>,
    layout: &LayoutInfo,
    terminal_width: usize,
    scroll_offset: usize,
    theme: &Theme,
) -> Buffer {
    let area = Rect::new(
        1,
        to_u16(layout.content_start_row),
        to_u16(terminal_width.saturating_sub(2)),
        to_u16(layout.total_rows * layout.item_height),
    );
    let mut buf = Buffer::empty(area);

    let visible = layout::get_visible_items(entries.len(), scroll_offset, layout);
    let first = visible.start;

    for index in visible {
        let position = layout::get_item_position(index - first, layout);
        let cell = Rect::new(
            to_u16(position.x),
            to_u16(position.y),
            to_u16(layout.item_width),
            to_u16(layout.item_height),
        )
        .intersection(area);
        draw_item(
            &mut buf,
            cell,
            &entries[index],
            selected_index == Some(index),
            theme,
        );
    }

    buf
}

// Row 0 and row 4 are padding, the icon sits on row 1, the name on rows 2-3.
fn draw_item(buf: &mut Buffer, cell: Rect, entry: &FileEntry, selected: bool, theme: &Theme) {
    let icon = icons::icon_for(entry);
    let glyph = if selected && entry.is_dir() {
        ICON_FOLDER_OPEN
    } else {
        icon.glyph
    };

    let style = if selected {
        Style::new()
            .fg(theme.selection_fg)
            .bg(theme.selection_bg)
            .bold()
    } else {
        Style::new().fg(theme.category_colour(icon.category))
    };

    let body = Rect::new(cell.x + 1, cell.y + 1, to_u16(NAME_WIDTH), 3).intersection(cell);
    let (first, second) = wrap_name(&entry.name, NAME_WIDTH);
    Paragraph::new(vec![Line::from(glyph), Line::from(first), Line::from(second)])
        .centered()
        .style(style)
        .render(body, buf);
}

/// Splits a name over two lines of `width` columns, ellipsizing the rest.
fn wrap_name(name: &str, width: usize) -> (String, String) {
    let mut first = String::new();
    let mut used = 0;
    let mut chars = name.chars().peekable();

    while let Some(&c) = chars.peek() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        first.push(c);
        used += w;
        chars.next();
    }

    let rest: String = chars.collect();
    (first, truncate_end(&rest, width))
}
